#![cfg_attr(not(feature = "std"), no_std)]

//! A Parsec-style parser combinator engine.
//!
//! Parsers are values implementing [`Parser`]. They are applied to a
//! [`ParseState`] and answer with a [`Reply`] tagged [`Consumed`] or
//! `Empty`, which decides whether a [`choice`] may still try its other
//! branch. [`parse`] and friends run a parser over a whole input.

extern crate alloc;

pub use crate::combinator::{
    between, choice_of, eof, look_ahead, not_followed_by, option, optional, sep_by, sep_by1,
    Between, ChoiceOf, Eof, LookAhead, NotFollowedBy, Optional, SepBy, SepBy1,
};
pub use crate::error::{ErrorMessage, ParseError};
pub use crate::parser::{
    attempt, bind, choice, create, discard_left, discard_right, fail, from_fn, label, labels, lazy,
    modify_state, parser_input, parser_position, parser_state, pure, set_user_state, unexpected,
    update_parser_state, user_state, zero, Attempt, Bind, BoxedParser, Choice, Create,
    DiscardLeft, DiscardRight, Fail, FromFn, Label, Lazy, Map, Parser, Pure, Zero,
};
pub use crate::position::SourcePosition;
pub use crate::prim::{
    many, many1, skip_many, skip_many1, token, tokens, Many, Many1, SkipMany, SkipMany1, Token,
    Tokens,
};
pub use crate::reply::{Consumed, ParseResult, Reply};
pub use crate::run::{parse, parse_input, parse_with_options, run_parser, run_parser_with_options};
pub use crate::state::{ParseState, ParserContext, ParserOptions};
pub use crate::traits::{BufferStream, Stream};

pub mod combinator;
pub mod error;
pub mod parser;
pub mod position;
pub mod prim;
pub mod reply;
pub mod run;
pub mod state;
pub mod traits;
