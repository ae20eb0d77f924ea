//! The parser trait and the combinators every grammar is built from.
//!
//! A parser maps a [`ParseState`] to a [`ParseResult`]: a [`Reply`] tagged
//! with whether input was consumed. Sequencing and choice below follow the
//! usual Parsec rules:
//!
//! * once a step consumes input the surrounding sequence is consumed too,
//!   and a choice will not try its other branch;
//! * errors of steps that consumed nothing are merged, so a failure can
//!   report everything that was expected at its position.
//!
//! Method chains replace Parsec's operators. Reading `>>=`, `*>`, `<*`,
//! `<|>` and `<?>` as [`and_then`](Parser::and_then),
//! [`discard_left`](Parser::discard_left),
//! [`discard_right`](Parser::discard_right), [`or_else`](Parser::or_else)
//! and [`labeled`](Parser::labeled), the Parsec precedences are, from
//! tightest to loosest:
//!
//! | Parsec | here | fixity |
//! |---|---|---|
//! | `<$>` | `map` | infixl 4 |
//! | `*>`, `<*` | `discard_left`, `discard_right` | infixl 4 |
//! | `>>=` | `and_then` | infixl 1 |
//! | `<\|>` | `or_else` | infixr 1 |
//! | `<?>` | `labeled` | infix 0 |
//!
//! A method applies to everything chained before it, so
//! `a.or_else(b).labeled("x")` labels the whole choice and
//! `a.or_else(b.labeled("x"))` only `b`.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::error::{ErrorMessage, ParseError};
use crate::position::SourcePosition;
use crate::reply::{Consumed, ParseResult, Reply};
use crate::state::{ParseState, ParserContext};
use crate::traits::Stream;

pub trait Parser<I, U> {
    type Output;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<Self::Output, I, U>;

    fn and_then<F, Q>(self, f: F) -> Bind<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> Q,
        Q: Parser<I, U>,
    {
        bind(self, f)
    }

    /// Runs `self` then `next`, keeping the output of `next`.
    fn discard_left<Q>(self, next: Q) -> DiscardLeft<Self, Q>
    where
        Self: Sized,
        Q: Parser<I, U>,
    {
        discard_left(self, next)
    }

    /// Runs `self` then `next`, keeping the output of `self`.
    fn discard_right<Q>(self, next: Q) -> DiscardRight<Self, Q>
    where
        Self: Sized,
        Q: Parser<I, U>,
    {
        discard_right(self, next)
    }

    fn or_else<Q>(self, other: Q) -> Choice<Self, Q>
    where
        Self: Sized,
        Q: Parser<I, U, Output = Self::Output>,
    {
        choice(self, other)
    }

    fn labeled(self, label: impl Into<String>) -> Label<Self>
    where
        Self: Sized,
    {
        self::label(self, label)
    }

    fn labeled_all<L, S>(self, labels: L) -> Label<Self>
    where
        Self: Sized,
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self::labels(self, labels)
    }

    fn attempt(self) -> Attempt<Self>
    where
        Self: Sized,
    {
        attempt(self)
    }

    fn map<F, O>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> O,
    {
        Map { parser: self, f }
    }

    fn boxed<'a>(self) -> BoxedParser<'a, I, U, Self::Output>
    where
        Self: Sized + 'a,
    {
        BoxedParser::new(self)
    }
}

impl<'p, I, U, P: Parser<I, U> + ?Sized> Parser<I, U> for &'p P {
    type Output = P::Output;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<P::Output, I, U> {
        (**self).parse_state(state, context)
    }
}

/// Runs `next` on what `first` left behind.
///
/// Once either side consumed, the result is consumed. Errors of the two
/// sides are only merged when the second one consumed nothing.
pub(crate) fn sequence<A, B, I, U>(
    first: ParseResult<A, I, U>,
    next: impl FnOnce(A, ParseState<I, U>) -> ParseResult<B, I, U>,
) -> ParseResult<B, I, U> {
    match first {
        Consumed::Empty(Reply::Failure(err)) => Consumed::Empty(Reply::Failure(err)),
        Consumed::Consumed(Reply::Failure(err)) => Consumed::Consumed(Reply::Failure(err)),
        Consumed::Empty(Reply::Success(output, state, hint)) => match next(output, state) {
            Consumed::Empty(reply) => Consumed::Empty(reply.merge_error(hint)),
            consumed => consumed,
        },
        Consumed::Consumed(Reply::Success(output, state, hint)) => match next(output, state) {
            Consumed::Empty(reply) => Consumed::Consumed(reply.merge_error(hint)),
            consumed => consumed,
        },
    }
}

/// Tries `second` from `state` unless `first` consumed.
///
/// After an empty success `second` still runs, but only to add its error
/// to the hint; the first output stands.
pub(crate) fn alternative<O, I, U>(
    first: ParseResult<O, I, U>,
    state: ParseState<I, U>,
    second: impl FnOnce(ParseState<I, U>) -> ParseResult<O, I, U>,
) -> ParseResult<O, I, U> {
    match first {
        Consumed::Empty(Reply::Failure(err)) => match second(state) {
            Consumed::Empty(reply) => Consumed::Empty(reply.merge_error(err)),
            consumed => consumed,
        },
        Consumed::Empty(Reply::Success(output, next, hint)) => {
            let hint = match second(state) {
                Consumed::Empty(reply) => hint.merge(reply.into_error()),
                Consumed::Consumed(_) => hint,
            };
            Consumed::Empty(Reply::Success(output, next, hint))
        }
        consumed => consumed,
    }
}

pub(crate) fn empty_success<O, I, U>(output: O, state: ParseState<I, U>) -> ParseResult<O, I, U> {
    let hint = ParseError::unknown(state.position.clone());
    Consumed::Empty(Reply::Success(output, state, hint))
}

pub(crate) fn empty_failure<O, I, U>(
    message: ErrorMessage,
    state: &ParseState<I, U>,
) -> ParseResult<O, I, U> {
    Consumed::Empty(Reply::Failure(ParseError::new(
        message,
        state.position.clone(),
    )))
}

#[derive(Clone)]
pub struct Bind<P, F> {
    parser: P,
    f: F,
}

impl<I, U, P, F, Q> Parser<I, U> for Bind<P, F>
where
    P: Parser<I, U>,
    F: Fn(P::Output) -> Q,
    Q: Parser<I, U>,
{
    type Output = Q::Output;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<Q::Output, I, U> {
        sequence(self.parser.parse_state(state, context), |output, state| {
            (self.f)(output).parse_state(state, context)
        })
    }
}

/// Feeds the output of `parser` to `f` and runs the parser it returns.
pub fn bind<I, U, P, F, Q>(parser: P, f: F) -> Bind<P, F>
where
    P: Parser<I, U>,
    F: Fn(P::Output) -> Q,
    Q: Parser<I, U>,
{
    Bind { parser, f }
}

#[derive(Clone)]
pub struct DiscardLeft<P, Q> {
    first: P,
    second: Q,
}

impl<I, U, P, Q> Parser<I, U> for DiscardLeft<P, Q>
where
    P: Parser<I, U>,
    Q: Parser<I, U>,
{
    type Output = Q::Output;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<Q::Output, I, U> {
        sequence(self.first.parse_state(state, context), |_, state| {
            self.second.parse_state(state, context)
        })
    }
}

pub fn discard_left<I, U, P, Q>(first: P, second: Q) -> DiscardLeft<P, Q>
where
    P: Parser<I, U>,
    Q: Parser<I, U>,
{
    DiscardLeft { first, second }
}

#[derive(Clone)]
pub struct DiscardRight<P, Q> {
    first: P,
    second: Q,
}

impl<I, U, P, Q> Parser<I, U> for DiscardRight<P, Q>
where
    P: Parser<I, U>,
    Q: Parser<I, U>,
{
    type Output = P::Output;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<P::Output, I, U> {
        sequence(self.first.parse_state(state, context), |output, state| {
            self.second
                .parse_state(state, context)
                .map(|reply| reply.map(|_| output))
        })
    }
}

pub fn discard_right<I, U, P, Q>(first: P, second: Q) -> DiscardRight<P, Q>
where
    P: Parser<I, U>,
    Q: Parser<I, U>,
{
    DiscardRight { first, second }
}

#[derive(Clone)]
pub struct Map<P, F> {
    parser: P,
    f: F,
}

impl<I, U, P, F, O> Parser<I, U> for Map<P, F>
where
    P: Parser<I, U>,
    F: Fn(P::Output) -> O,
{
    type Output = O;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<O, I, U> {
        self.parser
            .parse_state(state, context)
            .map(|reply| reply.map(&self.f))
    }
}

#[derive(Clone)]
pub struct Choice<P, Q> {
    first: P,
    second: Q,
}

impl<I, U, P, Q> Parser<I, U> for Choice<P, Q>
where
    I: Stream,
    U: Clone,
    P: Parser<I, U>,
    Q: Parser<I, U, Output = P::Output>,
{
    type Output = P::Output;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<P::Output, I, U> {
        alternative(
            self.first.parse_state(state.clone(), context),
            state,
            |state| self.second.parse_state(state, context),
        )
    }
}

/// Tries `first`, and `second` from the same state if `first` failed
/// without consuming input.
pub fn choice<I, U, P, Q>(first: P, second: Q) -> Choice<P, Q>
where
    P: Parser<I, U>,
    Q: Parser<I, U, Output = P::Output>,
{
    Choice { first, second }
}

#[derive(Clone)]
pub struct Label<P> {
    parser: P,
    labels: Vec<String>,
}

impl<I, U, P> Parser<I, U> for Label<P>
where
    P: Parser<I, U>,
{
    type Output = P::Output;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<P::Output, I, U> {
        match self.parser.parse_state(state, context) {
            Consumed::Empty(reply) => {
                Consumed::Empty(reply.map_error(|err| err.set_expected(&self.labels)))
            }
            consumed => consumed,
        }
    }
}

/// Reports `label` as what was expected when `parser` consumes nothing.
pub fn label<P>(parser: P, label: impl Into<String>) -> Label<P> {
    let mut labels = Vec::new();
    labels.push(label.into());
    Label { parser, labels }
}

pub fn labels<P, L, S>(parser: P, labels: L) -> Label<P>
where
    L: IntoIterator<Item = S>,
    S: Into<String>,
{
    Label {
        parser,
        labels: labels.into_iter().map(Into::into).collect(),
    }
}

#[derive(Clone)]
pub struct Attempt<P> {
    parser: P,
}

impl<I, U, P> Parser<I, U> for Attempt<P>
where
    P: Parser<I, U>,
{
    type Output = P::Output;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<P::Output, I, U> {
        match self.parser.parse_state(state, context) {
            Consumed::Consumed(Reply::Failure(err)) => Consumed::Empty(Reply::Failure(err)),
            other => other,
        }
    }
}

/// Turns a failure after consuming input into a failure without, so that
/// a surrounding choice tries its next alternative.
pub fn attempt<P>(parser: P) -> Attempt<P> {
    Attempt { parser }
}

pub struct Pure<I, U, O> {
    output: O,
    _marker: PhantomData<fn() -> (I, U)>,
}

impl<I, U, O: Clone> Clone for Pure<I, U, O> {
    fn clone(&self) -> Self {
        pure(self.output.clone())
    }
}

impl<I, U, O: Clone> Parser<I, U> for Pure<I, U, O> {
    type Output = O;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        _context: &ParserContext,
    ) -> ParseResult<O, I, U> {
        empty_success(self.output.clone(), state)
    }
}

/// Succeeds with `output` without consuming input.
pub fn pure<I, U, O: Clone>(output: O) -> Pure<I, U, O> {
    Pure {
        output,
        _marker: PhantomData,
    }
}

pub struct Create<I, U, F> {
    f: F,
    _marker: PhantomData<fn() -> (I, U)>,
}

impl<I, U, F: Clone> Clone for Create<I, U, F> {
    fn clone(&self) -> Self {
        Create {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<I, U, F, O> Parser<I, U> for Create<I, U, F>
where
    F: Fn() -> O,
{
    type Output = O;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        _context: &ParserContext,
    ) -> ParseResult<O, I, U> {
        empty_success((self.f)(), state)
    }
}

/// Like [`pure`], with a fresh output from `f` on every application.
pub fn create<I, U, F, O>(f: F) -> Create<I, U, F>
where
    F: Fn() -> O,
{
    Create {
        f,
        _marker: PhantomData,
    }
}

pub struct Fail<I, U, O> {
    message: ErrorMessage,
    _marker: PhantomData<fn() -> (I, U, O)>,
}

impl<I, U, O> Clone for Fail<I, U, O> {
    fn clone(&self) -> Self {
        Fail {
            message: self.message.clone(),
            _marker: PhantomData,
        }
    }
}

impl<I, U, O> Parser<I, U> for Fail<I, U, O> {
    type Output = O;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        _context: &ParserContext,
    ) -> ParseResult<O, I, U> {
        empty_failure(self.message.clone(), &state)
    }
}

/// Fails with a free-form message, consuming nothing.
pub fn fail<I, U, O>(message: impl Into<String>) -> Fail<I, U, O> {
    Fail {
        message: ErrorMessage::Message(message.into()),
        _marker: PhantomData,
    }
}

/// Fails with an `unexpected` message, consuming nothing.
pub fn unexpected<I, U, O>(message: impl Into<String>) -> Fail<I, U, O> {
    Fail {
        message: ErrorMessage::Unexpected(message.into()),
        _marker: PhantomData,
    }
}

pub struct Zero<I, U, O> {
    _marker: PhantomData<fn() -> (I, U, O)>,
}

impl<I, U, O> Clone for Zero<I, U, O> {
    fn clone(&self) -> Self {
        zero()
    }
}

impl<I, U, O> Parser<I, U> for Zero<I, U, O> {
    type Output = O;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        _context: &ParserContext,
    ) -> ParseResult<O, I, U> {
        Consumed::Empty(Reply::Failure(ParseError::unknown(state.position)))
    }
}

/// Fails without a message. `choice(zero(), p)` behaves exactly like `p`.
pub fn zero<I, U, O>() -> Zero<I, U, O> {
    Zero {
        _marker: PhantomData,
    }
}

#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

impl<I, U, O, F> Parser<I, U> for FromFn<F>
where
    F: Fn(ParseState<I, U>, &ParserContext) -> ParseResult<O, I, U>,
{
    type Output = O;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<O, I, U> {
        (self.f)(state, context)
    }
}

/// A parser written by hand as a function of the state.
pub fn from_fn<I, U, O, F>(f: F) -> FromFn<F>
where
    F: Fn(ParseState<I, U>, &ParserContext) -> ParseResult<O, I, U>,
{
    FromFn { f }
}

#[derive(Clone)]
pub struct Lazy<F> {
    factory: F,
}

impl<I, U, F, P> Parser<I, U> for Lazy<F>
where
    F: Fn() -> P,
    P: Parser<I, U>,
{
    type Output = P::Output;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<P::Output, I, U> {
        let nested = match context.nest(&state.position) {
            Ok(nested) => nested,
            Err(err) => return Consumed::Empty(Reply::Failure(err)),
        };
        (self.factory)().parse_state(state, &nested)
    }
}

/// Builds the parser only when it is applied.
///
/// This is how a grammar refers to itself:
///
/// ```
/// use lite_parsec_core::*;
///
/// fn paren<'a>(c: char) -> impl Parser<&'a str, (), Output = char> + Clone {
///     token(
///         |t: &char| format!("{:?}", t),
///         |pos: &SourcePosition, t: &char, _: &&'a str| pos.advance(*t),
///         move |t: &char| if *t == c { Some(c) } else { None },
///     )
/// }
///
/// // nested = "(" nested ")" | ""
/// fn nested<'a>() -> BoxedParser<'a, &'a str, (), u32> {
///     paren('(')
///         .discard_left(lazy(nested))
///         .discard_right(paren(')'))
///         .map(|depth| depth + 1)
///         .or_else(pure(0))
///         .boxed()
/// }
///
/// assert_eq!(parse_input(&nested(), "((()))", ""), Ok(3));
/// ```
pub fn lazy<I, U, F, P>(factory: F) -> Lazy<F>
where
    F: Fn() -> P,
    P: Parser<I, U>,
{
    Lazy { factory }
}

/// A type-erased, cheaply cloneable parser.
pub struct BoxedParser<'a, I, U, O> {
    inner: Rc<dyn Parser<I, U, Output = O> + 'a>,
}

impl<'a, I, U, O> BoxedParser<'a, I, U, O> {
    pub fn new<P>(parser: P) -> Self
    where
        P: Parser<I, U, Output = O> + 'a,
    {
        Self {
            inner: Rc::new(parser),
        }
    }
}

impl<'a, I, U, O> Clone for BoxedParser<'a, I, U, O> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, I, U, O> Parser<I, U> for BoxedParser<'a, I, U, O> {
    type Output = O;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<O, I, U> {
        self.inner.parse_state(state, context)
    }
}

/// The whole current state.
pub fn parser_state<I: Clone, U: Clone>(
) -> impl Parser<I, U, Output = ParseState<I, U>> + Clone {
    from_fn(|state: ParseState<I, U>, _: &ParserContext| empty_success(state.clone(), state))
}

pub fn parser_position<I, U>() -> impl Parser<I, U, Output = SourcePosition> + Clone {
    from_fn(|state: ParseState<I, U>, _: &ParserContext| {
        empty_success(state.position.clone(), state)
    })
}

/// The input that is still to be read.
pub fn parser_input<I: Clone, U>() -> impl Parser<I, U, Output = I> + Clone {
    from_fn(|state: ParseState<I, U>, _: &ParserContext| empty_success(state.input.clone(), state))
}

pub fn user_state<I, U: Clone>() -> impl Parser<I, U, Output = U> + Clone {
    from_fn(|state: ParseState<I, U>, _: &ParserContext| {
        empty_success(state.user_state.clone(), state)
    })
}

/// Replaces the whole state with `f(state)` and returns the new state.
pub fn update_parser_state<I, U, F>(f: F) -> impl Parser<I, U, Output = ParseState<I, U>> + Clone
where
    I: Clone,
    U: Clone,
    F: Fn(ParseState<I, U>) -> ParseState<I, U> + Clone,
{
    from_fn(move |state: ParseState<I, U>, _: &ParserContext| {
        let state = f(state);
        empty_success(state.clone(), state)
    })
}

/// Replaces the user state with `f(user_state)`.
pub fn modify_state<I, U, F>(f: F) -> impl Parser<I, U, Output = ()> + Clone
where
    F: Fn(U) -> U + Clone,
{
    from_fn(move |state: ParseState<I, U>, _: &ParserContext| {
        let ParseState {
            input,
            user_state,
            position,
        } = state;
        empty_success((), ParseState::new(input, f(user_state), position))
    })
}

pub fn set_user_state<I, U: Clone>(user_state: U) -> impl Parser<I, U, Output = ()> + Clone {
    modify_state(move |_| user_state.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prim::{many, token, tokens};
    use crate::state::ParserOptions;

    type Result<O> = ParseResult<O, &'static str, ()>;

    fn start(input: &'static str) -> ParseState<&'static str, ()> {
        ParseState::new(input, (), SourcePosition::initial(""))
    }

    fn run<P: Parser<&'static str, ()>>(parser: P, input: &'static str) -> Result<P::Output> {
        parser.parse_state(start(input), &ParserContext::default())
    }

    fn letter<U: Clone>(c: char) -> impl Parser<&'static str, U, Output = char> + Clone {
        token(
            |item: &char| format!("{:?}", item),
            |pos: &SourcePosition, item: &char, _: &&'static str| pos.advance(*item),
            move |item: &char| if *item == c { Some(c) } else { None },
        )
        .labeled(format!("{:?}", c))
    }

    fn word<U: Clone>(s: &'static str) -> impl Parser<&'static str, U, Output = Vec<char>> + Clone {
        tokens(
            |items: &[char]| format!("{:?}", items.iter().collect::<String>()),
            |pos: &SourcePosition, items: &[char]| {
                items.iter().fold(pos.clone(), |pos, c| pos.advance(*c))
            },
            s.chars().collect(),
        )
    }

    fn expected(text: &str) -> ErrorMessage {
        ErrorMessage::Expected(text.into())
    }

    fn at(line: u32, column: u32) -> SourcePosition {
        SourcePosition::new("", line, column)
    }

    #[test]
    fn bind_stops_on_empty_failure() {
        let result = run(
            letter('x').and_then(|_| -> Pure<_, _, char> { panic!("not called") }),
            "a",
        );
        match result {
            Consumed::Empty(Reply::Failure(err)) => assert_eq!(err.messages, vec![expected("'x'")]),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn bind_merges_errors_of_empty_steps() {
        let parser = many(letter('a')).and_then(|_| letter('b'));
        match run(parser, "c") {
            Consumed::Empty(Reply::Failure(err)) => {
                assert_eq!(err.position, at(1, 1));
                assert_eq!(err.messages, vec![expected("'a'"), expected("'b'")]);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn bind_stays_consumed_after_empty_failure() {
        let parser = letter('a').and_then(|_| letter('b'));
        match run(parser, "ac") {
            Consumed::Consumed(Reply::Failure(err)) => {
                assert_eq!(err.position, at(1, 2));
                assert_eq!(err.messages, vec![expected("'b'")]);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn bind_drops_hints_once_second_step_consumes() {
        let parser = many(letter('a')).and_then(|xs| letter('b').map(move |b| (xs.len(), b)));
        match run(parser, "b") {
            Consumed::Consumed(Reply::Success((0, 'b'), state, hint)) => {
                assert_eq!(state.input, "");
                assert!(hint.is_unknown());
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn bind_feeds_output_forward() {
        let parser = letter('a').and_then(|a| letter('b').map(move |b| [a, b]));
        match run(parser, "abc") {
            Consumed::Consumed(Reply::Success(out, state, _)) => {
                assert_eq!(out, ['a', 'b']);
                assert_eq!(state.input, "c");
                assert_eq!(state.position, at(1, 3));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn discarding_keeps_the_right_side() {
        match run(letter('a').discard_right(letter('b')), "ab") {
            Consumed::Consumed(Reply::Success('a', state, _)) => assert_eq!(state.input, ""),
            other => panic!("unexpected result {:?}", other),
        }
        match run(letter('a').discard_left(letter('b')), "ab") {
            Consumed::Consumed(Reply::Success('b', state, _)) => assert_eq!(state.input, ""),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn choice_tries_second_after_empty_failure() {
        match run(letter('a').or_else(letter('b')), "b") {
            Consumed::Consumed(Reply::Success('b', _, _)) => {}
            other => panic!("unexpected result {:?}", other),
        }
        match run(letter('a').or_else(letter('b')), "c") {
            Consumed::Empty(Reply::Failure(err)) => {
                assert_eq!(err.messages, vec![expected("'a'"), expected("'b'")]);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn choice_does_not_backtrack_after_consuming() {
        let ab = letter('a').discard_left(letter('b'));
        let ac = letter('a').discard_left(letter('c'));
        match run(ab.or_else(ac), "ac") {
            Consumed::Consumed(Reply::Failure(err)) => assert_eq!(err.position, at(1, 2)),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn attempt_allows_backtracking() {
        let ab = letter('a').discard_left(letter('b')).attempt();
        let ac = letter('a').discard_left(letter('c'));
        match run(ab.or_else(ac), "ac") {
            Consumed::Consumed(Reply::Success('c', state, _)) => assert_eq!(state.input, ""),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn attempt_keeps_the_error() {
        match run(word("abc").attempt(), "abd") {
            Consumed::Empty(Reply::Failure(err)) => assert_eq!(err.position, at(1, 1)),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn choice_collects_hints_after_empty_success() {
        let parser = pure::<_, _, char>('z').or_else(letter('q'));
        match run(parser, "x") {
            Consumed::Empty(Reply::Success('z', state, hint)) => {
                assert_eq!(state.input, "x");
                assert_eq!(hint.messages, vec![expected("'q'")]);
            }
            other => panic!("unexpected result {:?}", other),
        }
        let parser = pure::<_, _, char>('z').or_else(letter('x'));
        match run(parser, "x") {
            Consumed::Empty(Reply::Success('z', state, hint)) => {
                assert_eq!(state.input, "x");
                assert!(hint.is_unknown());
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn zero_is_the_identity_of_choice() {
        let plain = run(letter('a'), "b");
        let chosen = run(zero().or_else(letter('a')), "b");
        assert_eq!(plain, chosen);
    }

    #[test]
    fn labels_only_apply_before_consuming() {
        match run(word("ab").labeled_all(["pair", "couple"]), "x") {
            Consumed::Empty(Reply::Failure(err)) => {
                assert_eq!(err.messages, vec![expected("pair"), expected("couple")])
            }
            other => panic!("unexpected result {:?}", other),
        }
        match run(word("ab").labeled("pair"), "ax") {
            Consumed::Consumed(Reply::Failure(err)) => {
                assert_eq!(err.messages[1], expected("\"ab\""))
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn fail_and_unexpected_report_at_current_position() {
        let parser = letter('a').discard_left(fail::<_, _, ()>("boom"));
        match run(parser, "ab") {
            Consumed::Consumed(Reply::Failure(err)) => {
                assert_eq!(err.position, at(1, 2));
                assert_eq!(err.messages, vec![ErrorMessage::Message("boom".into())]);
            }
            other => panic!("unexpected result {:?}", other),
        }
        match run(unexpected::<_, _, ()>("thing"), "") {
            Consumed::Empty(Reply::Failure(err)) => {
                assert_eq!(err.messages, vec![ErrorMessage::Unexpected("thing".into())])
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn accessors_read_without_consuming() {
        let parser = letter('a').discard_left(parser_position()).and_then(|pos| {
            parser_input().map(move |rest: &'static str| (pos.column(), rest))
        });
        match run(parser, "abc") {
            Consumed::Consumed(Reply::Success((2, "bc"), _, _)) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn user_state_can_be_replaced() {
        let count = letter('a').discard_left(modify_state(|n: u32| n + 1));
        let parser = many(count).discard_left(user_state());
        let state = ParseState::new("aab", 10u32, SourcePosition::initial(""));
        match parser.parse_state(state, &ParserContext::default()) {
            Consumed::Consumed(Reply::Success(12, state, _)) => assert_eq!(state.input, "b"),
            other => panic!("unexpected result {:?}", other),
        }
        let reset = set_user_state(0u32).discard_left(user_state());
        let state = ParseState::new("", 7u32, SourcePosition::initial(""));
        match reset.parse_state(state, &ParserContext::default()) {
            Consumed::Empty(Reply::Success(0, _, _)) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn update_parser_state_replaces_everything() {
        let skip_two = update_parser_state(|state: ParseState<&'static str, ()>| {
            ParseState::new(&state.input[2..], (), state.position.advance_str(&state.input[..2]))
        });
        match run(skip_two.discard_left(parser_state()), "abc") {
            Consumed::Empty(Reply::Success(state, _, _)) => {
                assert_eq!(state.input, "c");
                assert_eq!(state.position, at(1, 3));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    fn parens() -> BoxedParser<'static, &'static str, (), usize> {
        letter('(')
            .discard_left(lazy(parens))
            .discard_right(letter(')'))
            .map(|depth| depth + 1)
            .or_else(pure(0))
            .boxed()
    }

    #[test]
    fn lazy_parsers_can_recurse() {
        match run(parens(), "((()))") {
            Consumed::Consumed(Reply::Success(3, state, _)) => assert_eq!(state.input, ""),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn lazy_parsers_respect_the_nest_limit() {
        let context = ParserContext::new(ParserOptions {
            max_nest_level: Some(2),
        });
        match parens().parse_state(start("((()))"), &context) {
            Consumed::Consumed(Reply::Failure(err)) => {
                assert_eq!(err.position, at(1, 4));
                assert!(err
                    .messages
                    .contains(&ErrorMessage::Message("exceeded nest level".into())));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    fn sign<I, U>() -> impl Parser<I, U, Output = char> + Clone
    where
        I: Stream<Item = char>,
        U: Clone,
    {
        token::<I, U, _, _, _, _>(
            |c: &char| format!("{:?}", c),
            |pos: &SourcePosition, c: &char, _: &I| pos.advance(*c),
            |c: &char| if *c == '-' { Some('-') } else { None },
        )
        .or_else(pure('+'))
    }

    #[test]
    fn or_else_works_over_any_stream() {
        match run(sign(), "-1") {
            Consumed::Consumed(Reply::Success('-', state, _)) => assert_eq!(state.input, "1"),
            other => panic!("unexpected result {:?}", other),
        }
        match run(sign(), "1") {
            Consumed::Empty(Reply::Success('+', state, _)) => assert_eq!(state.input, "1"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn create_can_be_cloned() {
        let fresh = create(|| vec!['x']);
        match run(fresh.clone().or_else(fresh), "") {
            Consumed::Empty(Reply::Success(v, _, _)) => assert_eq!(v, vec!['x']),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn create_builds_fresh_outputs() {
        match run(create(Vec::<char>::new), "") {
            Consumed::Empty(Reply::Success(v, _, _)) => assert!(v.is_empty()),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
