use crate::constant::*;
use crate::model::{Bindings, Value};
use crate::parser::base::{Parse, ParseError, Parser};
use crate::parser::usage::{Helps, Usage};

/// Succeeds, binding nothing, iff the input is exhausted.
pub fn done() -> Parser {
    Parser::new(
        |tokens| match tokens.peek() {
            None => Ok(Parse::empty(tokens.position())),
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: None,
                received: token.to_string(),
                position: tokens.position(),
            }),
        },
        Usage::Empty,
        Helps::default(),
    )
}

/// Always succeeds, consuming and binding nothing.
pub fn empty() -> Parser {
    Parser::new(
        |tokens| Ok(Parse::empty(tokens.position())),
        Usage::Empty,
        Helps::default(),
    )
}

/// Always succeeds with the preset `bindings`, consuming nothing.
///
/// ### Example
/// ```
/// # use combarg_builder as combarg;
/// use combarg::{defaults, Mapping};
///
/// let parser = defaults([("x", 1)]);
/// assert_eq!(parser.parse(&[]), Ok(Mapping::from([("x", 1)])));
/// ```
pub fn defaults(bindings: impl Into<Bindings>) -> Parser {
    let bindings = bindings.into();
    Parser::new(
        move |tokens| Ok(Parse::new(bindings.clone(), tokens.position())),
        Usage::Empty,
        Helps::default(),
    )
}

/// Always fails with `error`.
pub fn zero(error: ParseError) -> Parser {
    Parser::new(move |_| Err(error.clone()), Usage::Empty, Helps::default())
}

/// Consumes exactly the token `keyword`, binding nothing.
pub fn matches(keyword: impl Into<String>) -> Parser {
    let keyword = keyword.into();
    let usage = Usage::Literal(keyword.clone());
    Parser::new(
        move |tokens| match tokens.peek() {
            Some(token) if token == keyword => Ok(Parse::empty(tokens.position() + 1)),
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: Some(keyword.clone()),
                received: token.to_string(),
                position: tokens.position(),
            }),
            None => Err(ParseError::MissingArgument {
                name: keyword.clone(),
                position: tokens.position(),
            }),
        },
        usage,
        Helps::default(),
    )
}

/// Consumes any single token, binding it as text under `name`.
pub fn item(name: impl Into<String>) -> Parser {
    let name = name.into();
    let placeholder = placeholder(&name);
    let usage = Usage::Positional(placeholder.clone());
    Parser::new(
        move |tokens| match tokens.peek() {
            Some(token) => Ok(Parse::new(
                Bindings::single(&name, Value::from(token), true),
                tokens.position() + 1,
            )),
            None => Err(ParseError::MissingArgument {
                name: placeholder.clone(),
                position: tokens.position(),
            }),
        },
        usage,
        Helps::default(),
    )
}

/// Succeeds without consuming iff the next token is `keyword`.
pub fn peek(keyword: impl Into<String>) -> Parser {
    let keyword = keyword.into();
    Parser::new(
        move |tokens| match tokens.peek() {
            Some(token) if token == keyword => Ok(Parse::empty(tokens.position())),
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: Some(keyword.clone()),
                received: token.to_string(),
                position: tokens.position(),
            }),
            None => Err(ParseError::MissingArgument {
                name: keyword.clone(),
                position: tokens.position(),
            }),
        },
        Usage::Empty,
        Helps::default(),
    )
}

/// Fails with a help request (for `usage`/`helps`) iff the next token is one of the configured help tokens.
///
/// This applies whether or not the parse checks the whole input for help.
pub(crate) fn help_check(usage: Usage, helps: Helps) -> Parser {
    Parser::new(
        move |tokens| {
            if tokens.help_at_head() {
                Err(ParseError::HelpRequested {
                    usage: usage.clone(),
                    helps: helps.clone(),
                })
            } else {
                Ok(Parse::empty(tokens.position()))
            }
        },
        Usage::Empty,
        Helps::default(),
    )
}

/// The usage placeholder for a parameter name, ex: `config.max-size` -> `MAX_SIZE`.
pub(crate) fn placeholder(name: &str) -> String {
    name.rsplit(NESTING_DELIMITER)
        .next()
        .unwrap_or(name)
        .to_ascii_uppercase()
        .replace('-', "_")
}
