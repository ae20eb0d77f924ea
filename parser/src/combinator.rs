//! Combinators derived from the engine in [`crate::parser`] and
//! [`crate::prim`].

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::marker::PhantomData;

use crate::error::{ErrorMessage, ParseError};
use crate::parser::{
    alternative, choice, empty_success, pure, sequence, Choice, Parser, Pure,
};
use crate::prim::many;
use crate::reply::{Consumed, ParseResult, Reply};
use crate::state::{ParseState, ParserContext};
use crate::traits::Stream;

/// `parser`, or `default` if it fails without consuming input.
pub fn option<I, U, P>(default: P::Output, parser: P) -> Choice<P, Pure<I, U, P::Output>>
where
    I: Stream,
    U: Clone,
    P: Parser<I, U>,
    P::Output: Clone,
{
    choice(parser, pure(default))
}

#[derive(Clone)]
pub struct Optional<P> {
    parser: P,
}

impl<I, U, P> Parser<I, U> for Optional<P>
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
        alternative(
            self.parser
                .parse_state(state.clone(), context)
                .map(|reply| reply.map(|_| ())),
            state,
            |state| empty_success((), state),
        )
    }
}

/// Runs `parser` if it applies and drops its output.
pub fn optional<P>(parser: P) -> Optional<P> {
    Optional { parser }
}

#[derive(Clone)]
pub struct Between<O, C, P> {
    open: O,
    close: C,
    parser: P,
}

impl<I, U, O, C, P> Parser<I, U> for Between<O, C, P>
where
    O: Parser<I, U>,
    C: Parser<I, U>,
    P: Parser<I, U>,
{
    type Output = P::Output;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<P::Output, I, U> {
        sequence(self.open.parse_state(state, context), |_, state| {
            sequence(self.parser.parse_state(state, context), |output, state| {
                self.close
                    .parse_state(state, context)
                    .map(|reply| reply.map(|_| output))
            })
        })
    }
}

/// `open`, then `parser`, then `close`; the output of `parser`.
pub fn between<O, C, P>(open: O, close: C, parser: P) -> Between<O, C, P> {
    Between {
        open,
        close,
        parser,
    }
}

#[derive(Clone)]
pub struct SepBy1<P, S> {
    parser: P,
    separator: S,
}

impl<I, U, P, S> Parser<I, U> for SepBy1<P, S>
where
    I: Stream,
    U: Clone,
    P: Parser<I, U>,
    S: Parser<I, U>,
{
    type Output = Vec<P::Output>;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<Vec<P::Output>, I, U> {
        sequence(self.parser.parse_state(state, context), |first, state| {
            let rest = crate::parser::discard_left::<I, U, _, _>(&self.separator, &self.parser);
            many(rest).parse_state(state, context).map(|reply| {
                reply.map(|rest| {
                    let mut outputs = Vec::with_capacity(rest.len() + 1);
                    outputs.push(first);
                    outputs.extend(rest);
                    outputs
                })
            })
        })
    }
}

/// One or more `parser`, separated by `separator`.
pub fn sep_by1<P, S>(parser: P, separator: S) -> SepBy1<P, S> {
    SepBy1 { parser, separator }
}

#[derive(Clone)]
pub struct SepBy<P, S> {
    inner: SepBy1<P, S>,
}

impl<I, U, P, S> Parser<I, U> for SepBy<P, S>
where
    I: Stream,
    U: Clone,
    P: Parser<I, U>,
    S: Parser<I, U>,
{
    type Output = Vec<P::Output>;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<Vec<P::Output>, I, U> {
        alternative(
            self.inner.parse_state(state.clone(), context),
            state,
            |state| empty_success(Vec::new(), state),
        )
    }
}

/// Zero or more `parser`, separated by `separator`.
pub fn sep_by<P, S>(parser: P, separator: S) -> SepBy<P, S> {
    SepBy {
        inner: sep_by1(parser, separator),
    }
}

pub struct Eof<I, U> {
    _marker: PhantomData<fn() -> (I, U)>,
}

impl<I, U> Clone for Eof<I, U> {
    fn clone(&self) -> Self {
        eof()
    }
}

impl<I, U> Parser<I, U> for Eof<I, U>
where
    I: Stream,
    I::Item: Debug,
{
    type Output = ();

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        _context: &ParserContext,
    ) -> ParseResult<(), I, U> {
        match state.input.peek() {
            None => empty_success((), state),
            Some(item) => Consumed::Empty(Reply::Failure(
                ParseError::new(
                    ErrorMessage::Unexpected(alloc::format!("{:?}", item)),
                    state.position,
                )
                .add_message(ErrorMessage::Expected(String::from("end of input"))),
            )),
        }
    }
}

/// Succeeds only when no input is left.
pub fn eof<I, U>() -> Eof<I, U> {
    Eof {
        _marker: PhantomData,
    }
}

#[derive(Clone)]
pub struct LookAhead<P> {
    parser: P,
}

impl<I, U, P> Parser<I, U> for LookAhead<P>
where
    I: Clone,
    U: Clone,
    P: Parser<I, U>,
{
    type Output = P::Output;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<P::Output, I, U> {
        match self.parser.parse_state(state.clone(), context) {
            Consumed::Consumed(Reply::Success(output, ..))
            | Consumed::Empty(Reply::Success(output, ..)) => {
                empty_success(output, state)
            }
            failure => failure,
        }
    }
}

/// Runs `parser` and, if it succeeds, rewinds to where it started.
///
/// Failures are returned as they are, consumed or not.
pub fn look_ahead<P>(parser: P) -> LookAhead<P> {
    LookAhead { parser }
}

#[derive(Clone)]
pub struct NotFollowedBy<P> {
    parser: P,
}

impl<I, U, P> Parser<I, U> for NotFollowedBy<P>
where
    I: Clone,
    U: Clone,
    P: Parser<I, U>,
    P::Output: Debug,
{
    type Output = ();

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<(), I, U> {
        match self.parser.parse_state(state.clone(), context).into_inner() {
            Reply::Success(output, ..) => Consumed::Empty(Reply::Failure(ParseError::new(
                ErrorMessage::Unexpected(alloc::format!("{:?}", output)),
                state.position,
            ))),
            Reply::Failure(_) => empty_success((), state),
        }
    }
}

/// Succeeds without consuming input only where `parser` would fail.
///
/// A match is reported as unexpected at the position where it started.
pub fn not_followed_by<P>(parser: P) -> NotFollowedBy<P> {
    NotFollowedBy { parser }
}

#[derive(Clone)]
pub struct ChoiceOf<P> {
    parsers: Vec<P>,
}

impl<P> ChoiceOf<P> {
    fn apply<I, U>(
        parsers: &[P],
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<P::Output, I, U>
    where
        I: Stream,
        U: Clone,
        P: Parser<I, U>,
    {
        match parsers.split_first() {
            None => Consumed::Empty(Reply::Failure(ParseError::unknown(state.position))),
            Some((first, rest)) => alternative(
                first.parse_state(state.clone(), context),
                state,
                |state| Self::apply(rest, state, context),
            ),
        }
    }
}

impl<I, U, P> Parser<I, U> for ChoiceOf<P>
where
    I: Stream,
    U: Clone,
    P: Parser<I, U>,
{
    type Output = P::Output;

    fn parse_state(
        &self,
        state: ParseState<I, U>,
        context: &ParserContext,
    ) -> ParseResult<P::Output, I, U> {
        Self::apply(&self.parsers, state, context)
    }
}

/// The first of `parsers` that succeeds or consumes input. With no
/// parsers at all it behaves like [`zero`](crate::zero).
pub fn choice_of<P>(parsers: Vec<P>) -> ChoiceOf<P> {
    ChoiceOf { parsers }
}
