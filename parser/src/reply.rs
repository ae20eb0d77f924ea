use crate::error::ParseError;
use crate::state::ParseState;

/// Outcome of applying a parser once.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<O, I, U> {
    /// The output, the state after it and a hint. The hint only matters
    /// if a later failure at the same position gets merged with it.
    Success(O, ParseState<I, U>, ParseError),
    Failure(ParseError),
}

impl<O, I, U> Reply<O, I, U> {
    pub fn map<P>(self, f: impl FnOnce(O) -> P) -> Reply<P, I, U> {
        match self {
            Reply::Success(output, state, hint) => Reply::Success(f(output), state, hint),
            Reply::Failure(err) => Reply::Failure(err),
        }
    }

    /// The failure, or the hint of a success.
    pub fn into_error(self) -> ParseError {
        match self {
            Reply::Success(_, _, hint) => hint,
            Reply::Failure(err) => err,
        }
    }

    /// Merges an error produced before this reply into it.
    pub fn merge_error(self, earlier: ParseError) -> Self {
        match self {
            Reply::Success(output, state, hint) => {
                Reply::Success(output, state, earlier.merge(hint))
            }
            Reply::Failure(err) => Reply::Failure(earlier.merge(err)),
        }
    }

    pub fn map_error(self, f: impl FnOnce(ParseError) -> ParseError) -> Self {
        match self {
            Reply::Success(output, state, hint) => Reply::Success(output, state, f(hint)),
            Reply::Failure(err) => Reply::Failure(f(err)),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Reply::Success(..))
    }
}

/// Whether a step moved past any input, independently of whether it
/// succeeded.
///
/// Once a step is `Consumed` no alternative is tried for it; this is what
/// keeps backtracking bounded.
#[derive(Debug, Clone, PartialEq)]
pub enum Consumed<R> {
    Consumed(R),
    Empty(R),
}

impl<R> Consumed<R> {
    pub fn is_consumed(&self) -> bool {
        matches!(self, Consumed::Consumed(_))
    }

    pub fn into_inner(self) -> R {
        match self {
            Consumed::Consumed(reply) | Consumed::Empty(reply) => reply,
        }
    }

    pub fn map<S>(self, f: impl FnOnce(R) -> S) -> Consumed<S> {
        match self {
            Consumed::Consumed(reply) => Consumed::Consumed(f(reply)),
            Consumed::Empty(reply) => Consumed::Empty(f(reply)),
        }
    }
}

/// What every parser returns.
pub type ParseResult<O, I, U> = Consumed<Reply<O, I, U>>;
