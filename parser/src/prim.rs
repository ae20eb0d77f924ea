use alloc::string::String;
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::error::{ErrorMessage, ParseError};
use crate::parser::{sequence, Parser};
use crate::position::SourcePosition;
use crate::reply::{Consumed, ParseResult, Reply};
use crate::state::{ParseState, ParserContext};
use crate::traits::Stream;

pub struct Token<I, U, S, N, T> {
    show: S,
    next_position: N,
    test: T,
    _marker: PhantomData<fn() -> (I, U)>,
}

impl<I, U, S: Clone, N: Clone, T: Clone> Clone for Token<I, U, S, N, T> {
    fn clone(&self) -> Self {
        Token {
            show: self.show.clone(),
            next_position: self.next_position.clone(),
            test: self.test.clone(),
            _marker: PhantomData,
        }
    }
}

impl<I, U, S, N, T, O> Parser<I, U> for Token<I, U, S, N, T>
where
    I: Stream,
    S: Fn(&I::Item) -> String,
    N: Fn(&SourcePosition, &I::Item, &I) -> SourcePosition,
    T: Fn(&I::Item) -> Option<O>,
{
    type Output = O;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        _context: &ParserContext,
    ) -> ParseResult<O, I, U> {
        let ParseState {
            input,
            user_state,
            position,
        } = state;
        let (item, rest) = match input.uncons() {
            Some(next) => next,
            None => {
                return Consumed::Empty(Reply::Failure(ParseError::new(
                    ErrorMessage::SystemUnexpected(String::new()),
                    position,
                )))
            }
        };
        match (self.test)(&item) {
            Some(output) => {
                let next = (self.next_position)(&position, &item, &rest);
                let hint = ParseError::unknown(next.clone());
                Consumed::Consumed(Reply::Success(
                    output,
                    ParseState::new(rest, user_state, next),
                    hint,
                ))
            }
            None => Consumed::Empty(Reply::Failure(ParseError::new(
                ErrorMessage::SystemUnexpected((self.show)(&item)),
                position,
            ))),
        }
    }
}

/// Reads one element.
///
/// `test` decides whether the element is accepted and what it turns into,
/// `show` renders a rejected element for the error message and
/// `next_position` computes the position after an accepted element; it also
/// gets the rest of the input so that it can look at what follows.
pub fn token<I, U, O, S, N, T>(show: S, next_position: N, test: T) -> Token<I, U, S, N, T>
where
    I: Stream,
    S: Fn(&I::Item) -> String,
    N: Fn(&SourcePosition, &I::Item, &I) -> SourcePosition,
    T: Fn(&I::Item) -> Option<O>,
{
    Token {
        show,
        next_position,
        test,
        _marker: PhantomData,
    }
}

pub struct Tokens<I: Stream, U, S, N> {
    show: S,
    next_position: N,
    expected: Vec<I::Item>,
    _marker: PhantomData<fn() -> U>,
}

impl<I: Stream, U, S: Clone, N: Clone> Clone for Tokens<I, U, S, N> {
    fn clone(&self) -> Self {
        Tokens {
            show: self.show.clone(),
            next_position: self.next_position.clone(),
            expected: self.expected.clone(),
            _marker: PhantomData,
        }
    }
}

impl<I, U, S, N> Tokens<I, U, S, N>
where
    I: Stream,
    S: Fn(&[I::Item]) -> String,
{
    fn mismatch<O>(
        &self,
        matched: usize,
        found: Option<I::Item>,
        position: SourcePosition,
    ) -> ParseResult<O, I, U> {
        let found = match found {
            Some(item) => (self.show)(core::slice::from_ref(&item)),
            None => String::new(),
        };
        let err = ParseError::new(ErrorMessage::SystemUnexpected(found), position)
            .add_message(ErrorMessage::Expected((self.show)(&self.expected)));
        if matched == 0 {
            Consumed::Empty(Reply::Failure(err))
        } else {
            Consumed::Consumed(Reply::Failure(err))
        }
    }
}

impl<I, U, S, N> Parser<I, U> for Tokens<I, U, S, N>
where
    I: Stream,
    I::Item: PartialEq,
    S: Fn(&[I::Item]) -> String,
    N: Fn(&SourcePosition, &[I::Item]) -> SourcePosition,
{
    type Output = Vec<I::Item>;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        _context: &ParserContext,
    ) -> ParseResult<Vec<I::Item>, I, U> {
        let ParseState {
            input,
            user_state,
            position,
        } = state;
        if self.expected.is_empty() {
            let hint = ParseError::unknown(position.clone());
            return Consumed::Empty(Reply::Success(
                Vec::new(),
                ParseState::new(input, user_state, position),
                hint,
            ));
        }

        let mut rest = input;
        for (matched, want) in self.expected.iter().enumerate() {
            match rest.uncons() {
                Some((item, next)) if item == *want => rest = next,
                found => return self.mismatch(matched, found.map(|(item, _)| item), position),
            }
        }

        let next = (self.next_position)(&position, &self.expected);
        let hint = ParseError::unknown(next.clone());
        Consumed::Consumed(Reply::Success(
            self.expected.clone(),
            ParseState::new(rest, user_state, next),
            hint,
        ))
    }
}

/// Reads exactly the elements of `expected`.
///
/// Errors are reported at the position the match started from. The result
/// is consumed as soon as one element matched, even if a later one does not.
pub fn tokens<I, U, S, N>(show: S, next_position: N, expected: Vec<I::Item>) -> Tokens<I, U, S, N>
where
    I: Stream,
    I::Item: PartialEq,
    S: Fn(&[I::Item]) -> String,
    N: Fn(&SourcePosition, &[I::Item]) -> SourcePosition,
{
    Tokens {
        show,
        next_position,
        expected,
        _marker: PhantomData,
    }
}

/// Applies `parser` until it fails without consuming input, handing every
/// output to `push`.
///
/// A failure after consuming input fails the whole repetition. A success
/// without consuming input would repeat forever, so it panics.
fn repeat<I, U, P, A>(
    parser: &P,
    mut acc: A,
    mut push: impl FnMut(&mut A, P::Output),
    mut state: ParseState<I, U>,
    context: &ParserContext,
) -> ParseResult<A, I, U>
where
    I: Stream,
    U: Clone,
    P: Parser<I, U>,
{
    let mut consumed = false;
    let mut hint: Option<ParseError> = None;
    loop {
        match parser.parse_state(state.clone(), context) {
            Consumed::Consumed(Reply::Success(output, next, last)) => {
                push(&mut acc, output);
                state = next;
                hint = Some(last);
                consumed = true;
            }
            Consumed::Consumed(Reply::Failure(err)) => {
                return Consumed::Consumed(Reply::Failure(err));
            }
            Consumed::Empty(Reply::Failure(err)) => {
                let err = match hint {
                    Some(hint) => hint.merge(err),
                    None => err,
                };
                let reply = Reply::Success(acc, state, err);
                return if consumed {
                    Consumed::Consumed(reply)
                } else {
                    Consumed::Empty(reply)
                };
            }
            Consumed::Empty(Reply::Success(..)) => {
                tracing::error!(position = %state.position, "repeated parser accepts empty input");
                panic!(
                    "combinator 'many' is applied to a parser that accepts an empty string (at {})",
                    state.position
                );
            }
        }
    }
}

#[derive(Clone)]
pub struct Many<P> {
    parser: P,
}

impl<I, U, P> Parser<I, U> for Many<P>
where
    I: Stream,
    U: Clone,
    P: Parser<I, U>,
{
    type Output = Vec<P::Output>;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<Vec<P::Output>, I, U> {
        repeat(&self.parser, Vec::new(), Vec::push, state, context)
    }
}

/// Zero or more `parser`, outputs in order.
///
/// # Panics
/// Panics if `parser` succeeds without consuming input.
pub fn many<P>(parser: P) -> Many<P> {
    Many { parser }
}

#[derive(Clone)]
pub struct Many1<P> {
    parser: P,
}

impl<I, U, P> Parser<I, U> for Many1<P>
where
    I: Stream,
    U: Clone,
    P: Parser<I, U>,
{
    type Output = Vec<P::Output>;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<Vec<P::Output>, I, U> {
        sequence(self.parser.parse_state(state, context), |first, state| {
            let mut acc = Vec::new();
            acc.push(first);
            repeat(&self.parser, acc, Vec::push, state, context)
        })
    }
}

/// One or more `parser`.
pub fn many1<P>(parser: P) -> Many1<P> {
    Many1 { parser }
}

#[derive(Clone)]
pub struct SkipMany<P> {
    parser: P,
}

impl<I, U, P> Parser<I, U> for SkipMany<P>
where
    I: Stream,
    U: Clone,
    P: Parser<I, U>,
{
    type Output = ();

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<(), I, U> {
        repeat(&self.parser, (), |_, _| {}, state, context)
    }
}

/// Like [`many`], throwing the outputs away.
pub fn skip_many<P>(parser: P) -> SkipMany<P> {
    SkipMany { parser }
}

#[derive(Clone)]
pub struct SkipMany1<P> {
    parser: P,
}

impl<I, U, P> Parser<I, U> for SkipMany1<P>
where
    I: Stream,
    U: Clone,
    P: Parser<I, U>,
{
    type Output = ();

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<(), I, U> {
        sequence(self.parser.parse_state(state, context), |_, state| {
            repeat(&self.parser, (), |_, _| {}, state, context)
        })
    }
}

pub fn skip_many1<P>(parser: P) -> SkipMany1<P> {
    SkipMany1 { parser }
}
