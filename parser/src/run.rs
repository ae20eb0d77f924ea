//! Entry points applying a parser to a whole input.

use crate::error::ParseError;
use crate::parser::Parser;
use crate::position::SourcePosition;
use crate::reply::Reply;
use crate::state::{ParseState, ParserContext, ParserOptions};

/// Runs `parser` on `input` and also hands back the final user state.
///
/// `source_name` only shows up in positions. Parsing starts at line 1,
/// column 1.
pub fn run_parser_with_options<I, U, P>(
    parser: &P,
    input: I,
    user_state: U,
    source_name: &str,
    options: &ParserOptions,
) -> Result<(P::Output, U), ParseError>
where
    P: Parser<I, U> + ?Sized,
{
    tracing::trace!(source = source_name, "parse started");
    let state = ParseState::new(input, user_state, SourcePosition::initial(source_name));
    let context = ParserContext::new(*options);
    match parser.parse_state(state, &context).into_inner() {
        Reply::Success(output, state, _) => {
            tracing::trace!(source = source_name, position = %state.position, "parse finished");
            Ok((output, state.user_state))
        }
        Reply::Failure(err) => {
            tracing::debug!(source = source_name, position = %err.position, "parse failed");
            Err(err)
        }
    }
}

pub fn run_parser<I, U, P>(
    parser: &P,
    input: I,
    user_state: U,
    source_name: &str,
) -> Result<(P::Output, U), ParseError>
where
    P: Parser<I, U> + ?Sized,
{
    run_parser_with_options(parser, input, user_state, source_name, &ParserOptions::default())
}

pub fn parse_with_options<I, U, P>(
    parser: &P,
    input: I,
    user_state: U,
    source_name: &str,
    options: &ParserOptions,
) -> Result<P::Output, ParseError>
where
    P: Parser<I, U> + ?Sized,
{
    run_parser_with_options(parser, input, user_state, source_name, options)
        .map(|(output, _)| output)
}

/// Runs `parser` on `input`, starting from `user_state`.
pub fn parse<I, U, P>(
    parser: &P,
    input: I,
    user_state: U,
    source_name: &str,
) -> Result<P::Output, ParseError>
where
    P: Parser<I, U> + ?Sized,
{
    parse_with_options(parser, input, user_state, source_name, &ParserOptions::default())
}

/// [`parse`] for grammars without user state.
pub fn parse_input<I, P>(parser: &P, input: I, source_name: &str) -> Result<P::Output, ParseError>
where
    P: Parser<I, ()> + ?Sized,
{
    parse(parser, input, (), source_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorMessage;
    use crate::parser::{lazy, modify_state, pure, BoxedParser};
    use crate::prim::{many1, token};

    type Input = &'static str;

    fn digit<U: Clone>() -> impl Parser<Input, U, Output = u32> + Clone {
        token(
            |c: &char| format!("{:?}", c),
            |pos: &SourcePosition, c: &char, _: &Input| pos.advance(*c),
            |c: &char| c.to_digit(10),
        )
    }

    fn open<U: Clone>() -> impl Parser<Input, U, Output = char> + Clone {
        token(
            |c: &char| format!("{:?}", c),
            |pos: &SourcePosition, c: &char, _: &Input| pos.advance(*c),
            |c: &char| if *c == '[' { Some('[') } else { None },
        )
    }

    fn depth() -> BoxedParser<'static, Input, (), u32> {
        open()
            .discard_left(lazy(depth))
            .map(|d| d + 1)
            .or_else(pure(0))
            .boxed()
    }

    #[test]
    fn it_parses_with_a_source_name() {
        assert_eq!(parse_input(&many1(digit()), "123", "digits"), Ok(vec![1, 2, 3]));

        let err = parse_input(&many1(digit()), "x", "digits").unwrap_err();
        assert_eq!(err.position, SourcePosition::new("digits", 1, 1));
        assert_eq!(err.position.name(), "digits");
        assert_eq!(err.messages, vec![ErrorMessage::SystemUnexpected("'x'".into())]);
        assert_eq!(err.to_string(), "\"digits\" (line 1, column 1):\nunexpected 'x'");
    }

    #[test]
    fn it_returns_the_final_user_state() {
        let counted = many1(digit().discard_right(modify_state(|n: u32| n + 1)));
        assert_eq!(
            run_parser(&counted, "4711", 10u32, ""),
            Ok((vec![4, 7, 1, 1], 14))
        );
        assert_eq!(parse(&counted, "42", 0u32, ""), Ok(vec![4, 2]));
    }

    #[test]
    fn it_ignores_trailing_input() {
        assert_eq!(parse_input(&digit(), "12", ""), Ok(1));
    }

    #[test]
    fn it_applies_options() {
        let limited = ParserOptions {
            max_nest_level: Some(3),
        };
        assert_eq!(parse_with_options(&depth(), "[[", (), "", &limited), Ok(2));
        let err = parse_with_options(&depth(), "[[[[", (), "", &limited).unwrap_err();
        assert_eq!(err.position, SourcePosition::new("", 1, 5));
        assert_eq!(
            err.messages,
            vec![ErrorMessage::Message("exceeded nest level".into())]
        );
        assert_eq!(
            run_parser_with_options(&depth(), "[[[[", (), "", &ParserOptions::default()),
            Ok((4, ()))
        );
    }
}
