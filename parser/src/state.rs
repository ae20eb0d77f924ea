use alloc::string::String;

use crate::error::{ErrorMessage, ParseError};
use crate::position::SourcePosition;

/// Snapshot of a parse: what is left to read, the caller's own state and
/// where we are.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseState<I, U> {
    pub input: I,
    pub user_state: U,
    pub position: SourcePosition,
}

impl<I, U> ParseState<I, U> {
    pub fn new(input: I, user_state: U, position: SourcePosition) -> Self {
        Self {
            input,
            user_state,
            position,
        }
    }

    pub fn with_user_state<V>(self, user_state: V) -> ParseState<I, V> {
        ParseState {
            input: self.input,
            user_state,
            position: self.position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// How many [`lazy`](crate::lazy) parsers may be entered inside each
    /// other before parsing fails. `None` leaves it to the call stack.
    pub max_nest_level: Option<u32>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            max_nest_level: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserContext {
    nest_level: u32,
    options: ParserOptions,
}

impl ParserContext {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            nest_level: 0,
            options,
        }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn nest_level(&self) -> u32 {
        self.nest_level
    }

    pub fn nest(&self, position: &SourcePosition) -> Result<Self, ParseError> {
        if Some(self.nest_level) == self.options.max_nest_level {
            tracing::debug!(level = self.nest_level, %position, "nest limit reached");
            Err(ParseError::new(
                ErrorMessage::Message(String::from("exceeded nest level")),
                position.clone(),
            ))
        } else {
            Ok(Self {
                nest_level: self.nest_level + 1,
                options: self.options,
            })
        }
    }
}

impl Default for ParserContext {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_nests_up_to_the_limit() {
        let pos = SourcePosition::initial("");
        let context = ParserContext::new(ParserOptions {
            max_nest_level: Some(2),
        });
        let once = context.nest(&pos).unwrap();
        let twice = once.nest(&pos).unwrap();
        assert_eq!(twice.nest_level(), 2);
        let err = twice.nest(&pos).unwrap_err();
        assert_eq!(
            err.messages,
            vec![ErrorMessage::Message("exceeded nest level".into())]
        );
    }

    #[test]
    fn it_nests_freely_by_default() {
        let pos = SourcePosition::initial("");
        let mut context = ParserContext::default();
        for _ in 0..1000 {
            context = context.nest(&pos).unwrap();
        }
        assert_eq!(context.nest_level(), 1000);
    }
}
