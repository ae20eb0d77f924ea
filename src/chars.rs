//! Parsers over streams of `char`.

#[cfg(not(feature = "std"))]
use alloc::{format, string::String, vec::Vec};

use lite_parsec_core::{
    attempt, many, many1, not_followed_by, skip_many, skip_many1, token, tokens, Parser,
    SourcePosition, Stream,
};

/// Declares character classes.
///
/// Every entry `name("label") => pattern;` defines a predicate `is_name`
/// matching the char patterns and a parser `name()` reading one matching
/// char, reported as `label` when it fails.
#[macro_export]
macro_rules! char_class {
    (
        $(
            $( #[ $attr:meta ] )*
            $vis:vis $name:ident ( $label:literal ) => $($($value:literal)..=+)|+;
        )*
    ) => {
        $(
            $crate::char_class!{
                IMPL
                $( #[ $attr ] )*
                $vis $name ( $label ) => $($($value)..=+)|+
            }
        )*
    };
    (
        IMPL
        $( #[ $attr:meta ] )*
        $vis:vis $name:ident ( $label:literal ) => $($($value:literal)..=+)|+
    ) => (
        $crate::paste::paste! {
            $vis fn [< is_ $name >](c: char) -> bool {
                matches!(c, $($($value)..=+)|+)
            }

            $( #[ $attr ] )*
            $vis fn $name<I, U>() -> impl $crate::Parser<I, U, Output = char> + Clone
            where
                I: $crate::Stream<Item = char>,
                U: Clone,
            {
                $crate::label($crate::chars::satisfy([< is_ $name >]), $label)
            }
        }
    );
}

char_class! {
    /// An ASCII decimal digit.
    pub digit("digit") => '0' ..= '9';
    pub hex_digit("hexadecimal digit") => '0' ..= '9' | 'a' ..= 'f' | 'A' ..= 'F';
    /// An ASCII letter.
    pub letter("letter") => 'a' ..= 'z' | 'A' ..= 'Z';
    pub upper("uppercase letter") => 'A' ..= 'Z';
    pub lower("lowercase letter") => 'a' ..= 'z';
    pub newline("lf new-line") => '\n';
    pub tab("tab") => '\t';
}

/// One char for which `pred` holds.
pub fn satisfy<I, U, F>(pred: F) -> impl Parser<I, U, Output = char> + Clone
where
    I: Stream<Item = char>,
    U: Clone,
    F: Fn(char) -> bool + Clone,
{
    token::<I, U, _, _, _, _>(
        |c: &char| format!("{:?}", c),
        |pos: &SourcePosition, c: &char, _: &I| pos.advance(*c),
        move |c: &char| if pred(*c) { Some(*c) } else { None },
    )
}

/// Exactly `c`.
pub fn char<I, U>(c: char) -> impl Parser<I, U, Output = char> + Clone
where
    I: Stream<Item = char>,
    U: Clone,
{
    satisfy(move |x| x == c).labeled(format!("{:?}", c))
}

pub fn any_char<I, U>() -> impl Parser<I, U, Output = char> + Clone
where
    I: Stream<Item = char>,
    U: Clone,
{
    satisfy(|_| true)
}

/// Any char contained in `chars`.
pub fn one_of<I, U>(chars: &str) -> impl Parser<I, U, Output = char> + Clone
where
    I: Stream<Item = char>,
    U: Clone,
{
    let chars = String::from(chars);
    satisfy(move |c| chars.contains(c))
}

/// Any char not contained in `chars`.
pub fn none_of<I, U>(chars: &str) -> impl Parser<I, U, Output = char> + Clone
where
    I: Stream<Item = char>,
    U: Clone,
{
    let chars = String::from(chars);
    satisfy(move |c| !chars.contains(c))
}

/// Exactly the chars of `s`.
///
/// Like [`tokens`], a mismatch is reported where `s` would have started,
/// and input is consumed as soon as the first char matched.
pub fn string<I, U>(s: &str) -> impl Parser<I, U, Output = String> + Clone
where
    I: Stream<Item = char>,
    U: Clone,
{
    let text = String::from(s);
    tokens::<I, U, _, _>(
        |cs: &[char]| format!("{:?}", cs.iter().collect::<String>()),
        move |pos: &SourcePosition, _: &[char]| pos.advance_str(&text),
        s.chars().collect(),
    )
    .map(|cs: Vec<char>| cs.into_iter().collect::<String>())
}

pub fn space<I, U>() -> impl Parser<I, U, Output = char> + Clone
where
    I: Stream<Item = char>,
    U: Clone,
{
    satisfy(char::is_whitespace).labeled("space")
}

/// Skips zero or more whitespace chars.
pub fn spaces<I, U>() -> impl Parser<I, U, Output = ()> + Clone
where
    I: Stream<Item = char>,
    U: Clone,
{
    skip_many(space()).labeled("white space")
}

pub fn skip_spaces1<I, U>() -> impl Parser<I, U, Output = ()> + Clone
where
    I: Stream<Item = char>,
    U: Clone,
{
    skip_many1(space())
}

pub fn alphanum<I, U>() -> impl Parser<I, U, Output = char> + Clone
where
    I: Stream<Item = char>,
    U: Clone,
{
    satisfy(|c| is_letter(c) || is_digit(c)).labeled("letter or digit")
}

/// One or more letters or digits.
pub fn alphanums<I, U>() -> impl Parser<I, U, Output = String> + Clone
where
    I: Stream<Item = char>,
    U: Clone,
{
    many1(alphanum()).map(|cs: Vec<char>| cs.into_iter().collect::<String>())
}

/// `word` surrounded by optional whitespace.
///
/// `word` must not run on into a letter or digit, so `keyword("let")`
/// rejects `letter`. Everything up to the end of `word` backtracks on
/// failure, leading whitespace included.
pub fn keyword<I, U>(word: &str) -> impl Parser<I, U, Output = String> + Clone
where
    I: Stream<Item = char>,
    U: Clone,
{
    let lexeme = spaces()
        .discard_left(string(word))
        .discard_right(not_followed_by(alphanum::<I, U>()));
    attempt(lexeme).discard_right(spaces())
}

/// A letter followed by letters or digits, surrounded by optional
/// whitespace.
pub fn identifier<I, U>() -> impl Parser<I, U, Output = String> + Clone
where
    I: Stream<Item = char>,
    U: Clone,
{
    let name = letter::<I, U>().and_then(|first: char| {
        many(alphanum::<I, U>()).map(move |rest: Vec<char>| {
            let mut name = String::with_capacity(rest.len() + 1);
            name.push(first);
            name.extend(rest);
            name
        })
    });
    spaces()
        .discard_left(attempt(name).labeled("identifier"))
        .discard_right(spaces())
}
