use std::ops::{Add, BitOr, BitXor, Shr};
use std::rc::Rc;

use crate::api::Converter;
use crate::model::{Bindings, Value};
use crate::parser::base::{Parse, ParseError, Parser, Run, Tokens};
use crate::parser::primitive::{defaults, empty, help_check};
use crate::parser::usage::{Helps, Usage};

impl Parser {
    /// Sequence: apply `self`, then `next` on the remainder.
    /// Fails with whichever side failed first.
    pub fn then(self, next: Parser) -> Parser {
        let usage = Usage::sequence(self.usage.clone(), next.usage.clone());
        let helps = self.helps.clone().merge(&next.helps);
        let (left, right) = (self.runner(), next.runner());
        Parser::new(
            move |tokens| {
                let first = left(tokens)?;
                let second = right(tokens.at(first.position))?;
                Ok(first.then(second))
            },
            usage,
            helps,
        )
    }

    /// Left-biased alternation: apply `self`, and only if it fails apply `other` to the same input.
    ///
    /// When both fail the failure of `self` is reported, unless `other` requested help.
    /// A help request from `self` is reported without trying `other`.
    pub fn or(self, other: Parser) -> Parser {
        let usage = Usage::choice(self.usage.clone(), other.usage.clone());
        let helps = self.helps.clone().merge(&other.helps);
        let (left, right) = (self.runner(), other.runner());
        Parser::new(
            move |tokens| match left(tokens) {
                Ok(parse) => Ok(parse),
                Err(error) if error.is_help() => Err(error),
                Err(left_error) => right(tokens).map_err(|right_error| {
                    if right_error.is_help() {
                        right_error
                    } else {
                        left_error
                    }
                }),
            },
            usage,
            helps,
        )
    }

    /// Exclusive-or: succeeds iff exactly one side succeeds.
    /// Fails with `ParseError::AmbiguousMatch` when both do.
    pub fn xor(self, other: Parser) -> Parser {
        let usage = Usage::exclusive(self.usage.clone(), other.usage.clone());
        let helps = self.helps.clone().merge(&other.helps);
        let (left, right) = (self.runner(), other.runner());
        Parser::new(
            move |tokens| match (left(tokens), right(tokens)) {
                (Ok(_), Ok(_)) => Err(ParseError::AmbiguousMatch {
                    position: tokens.position(),
                }),
                (Ok(parse), Err(error)) | (Err(error), Ok(parse)) => {
                    if error.is_help() {
                        Err(error)
                    } else {
                        Ok(parse)
                    }
                }
                (Err(left_error), Err(right_error)) => {
                    if right_error.is_help() && !left_error.is_help() {
                        Err(right_error)
                    } else {
                        Err(left_error)
                    }
                }
            },
            usage,
            helps,
        )
    }

    /// Unordered pair: `(self >> other) | (other >> self)`.
    ///
    /// This only permutes its two operands; `a + b + c` is `(a + b) + c`, which does not accept `b c a`.
    /// Use [`crate::nonpositional`] to accept every order.
    pub fn plus(self, other: Parser) -> Parser {
        let usage = Usage::Unordered(Box::new(self.usage.clone()), Box::new(other.usage.clone()));
        let helps = self.helps.clone().merge(&other.helps);
        let forward = self.clone().then(other.clone());
        let backward = other.then(self);
        forward.or(backward).with_usage(usage).with_helps(helps)
    }

    /// Apply `self` repeatedly until it fails (or stops consuming), accumulating the bindings.
    ///
    /// Never fails, except to report a help request.
    pub fn many(self) -> Parser {
        let usage = Usage::Many(Box::new(self.usage.clone()));
        let inner = self.runner();
        Parser::new(move |tokens| repeat(&*inner, tokens), usage, self.helps)
    }

    /// Like [`Parser::many`], but at least one application must succeed.
    /// Otherwise fails with `ParseError::MissingArgument`.
    pub fn many1(self) -> Parser {
        let usage = Usage::Many1(Box::new(self.usage.clone()));
        let name = self.usage.to_string();
        let inner = self.runner();
        Parser::new(
            move |tokens| match inner(tokens) {
                Ok(first) => {
                    let rest = repeat(&*inner, tokens.at(first.position))?;
                    Ok(first.then(rest))
                }
                Err(error) if error.is_help() => Err(error),
                Err(_) => Err(ParseError::MissingArgument {
                    name: name.clone(),
                    position: tokens.position(),
                }),
            },
            usage,
            self.helps,
        )
    }

    /// Succeed binding nothing (and consuming nothing) when `self` fails.
    pub fn optional(self) -> Parser {
        let usage = Usage::optional(self.usage.clone());
        let helps = self.helps.clone();
        let required = self.clone();
        let mut parser = self.or(empty()).with_usage(usage).with_helps(helps);
        parser.required = Some(Box::new(required));
        parser
    }

    /// Succeed with the preset `bindings` (consuming nothing) when `self` fails.
    ///
    /// ### Example
    /// ```
    /// # use combarg_builder as combarg;
    /// use combarg::{option, Converter, Mapping};
    ///
    /// let parser = option("x", Converter::parse::<i64>()).defaults([("x", 0)]);
    /// assert_eq!(parser.parse(&["-x", "2"]), Ok(Mapping::from([("x", 2)])));
    /// assert_eq!(parser.parse(&[]), Ok(Mapping::from([("x", 0)])));
    /// ```
    pub fn defaults(self, bindings: impl Into<Bindings>) -> Parser {
        let usage = Usage::optional(self.usage.clone());
        let helps = self.helps.clone();
        let required = self.clone();
        let mut parser = self.or(defaults(bindings)).with_usage(usage).with_helps(helps);
        parser.required = Some(Box::new(required));
        parser
    }

    /// Consume what `self` consumes, but discard its bindings.
    pub fn ignore(self) -> Parser {
        let required = self.required.clone().map(|r| (*r).ignore());
        let inner = self.runner();
        Parser::new(
            move |tokens| {
                inner(tokens).map(|parse| Parse {
                    bindings: Bindings::new(),
                    ..parse
                })
            },
            self.usage,
            Helps::default(),
        )
        .with_required(required)
    }

    /// Apply `self` exactly `n` times in sequence.
    pub fn n_times(self, n: usize) -> Parser {
        (0..n).fold(empty(), |parser, _| parser.then(self.clone()))
    }

    /// Succeed (consuming and binding nothing) iff `self` fails.
    pub fn fails(self) -> Parser {
        let name = self.usage.to_string();
        let inner = self.runner();
        Parser::new(
            move |tokens| match inner(tokens) {
                Ok(_) => match tokens.peek() {
                    Some(token) => Err(ParseError::UnexpectedToken {
                        expected: None,
                        received: token.to_string(),
                        position: tokens.position(),
                    }),
                    None => Err(ParseError::Rejected {
                        message: format!("Unexpected match for '{name}'."),
                        position: tokens.position(),
                    }),
                },
                Err(error) if error.is_help() => Err(error),
                Err(_) => Ok(Parse::empty(tokens.position())),
            },
            Usage::Empty,
            Helps::default(),
        )
    }

    /// Transform the failure of `self` (help requests pass through unchanged).
    pub fn map_error(self, f: impl Fn(ParseError) -> ParseError + 'static) -> Parser {
        self.map_error_shared(Rc::new(f))
    }

    fn map_error_shared(self, f: Rc<dyn Fn(ParseError) -> ParseError>) -> Parser {
        let required = self.required.clone().map(|r| (*r).map_error_shared(f.clone()));
        let inner = self.runner();
        Parser::new(
            move |tokens| {
                inner(tokens).map_err(|error| if error.is_help() { error } else { f(error) })
            },
            self.usage,
            self.helps,
        )
        .with_required(required)
    }

    /// Replace the failure of `self` with `error`.
    pub fn wrap_error(self, error: ParseError) -> Parser {
        self.map_error(move |_| error.clone())
    }

    /// Transform the bindings of `self`; an `Err` fails the parse with `ParseError::Rejected`.
    pub fn apply(self, f: impl Fn(Bindings) -> Result<Bindings, String> + 'static) -> Parser {
        self.apply_shared(Rc::new(f))
    }

    fn apply_shared(self, f: Rc<dyn Fn(Bindings) -> Result<Bindings, String>>) -> Parser {
        let required = self.required.clone().map(|r| (*r).apply_shared(f.clone()));
        let inner = self.runner();
        Parser::new(
            move |tokens| {
                let parse = inner(tokens)?;
                match f(parse.bindings) {
                    Ok(bindings) => Ok(Parse { bindings, ..parse }),
                    Err(message) => Err(ParseError::Rejected {
                        message,
                        position: tokens.position(),
                    }),
                }
            },
            self.usage,
            self.helps,
        )
        .with_required(required)
    }

    /// Fail with `ParseError::Rejected` (described by `on_fail`) unless the bindings of `self` satisfy `predicate`.
    ///
    /// ### Example
    /// ```
    /// # use combarg_builder as combarg;
    /// use combarg::{option, Converter, ParseError};
    ///
    /// let parser = option("x", Converter::parse::<i64>()).many().sat(
    ///     |bindings| bindings.iter().filter_map(|b| b.value().as_int()).sum::<i64>() > 0,
    ///     |_| "The values must sum to more than 0.".to_string(),
    /// );
    /// assert!(parser.parse(&["-x", "-1", "-x", "2"]).is_ok());
    /// assert!(matches!(parser.parse(&["-x", "-1", "-x", "1"]), Err(ParseError::Rejected { .. })));
    /// ```
    pub fn sat(
        self,
        predicate: impl Fn(&Bindings) -> bool + 'static,
        on_fail: impl Fn(&Bindings) -> String + 'static,
    ) -> Parser {
        self.apply(move |bindings| {
            if predicate(&bindings) {
                Ok(bindings)
            } else {
                Err(on_fail(&bindings))
            }
        })
    }

    /// Re-convert the most recent binding of `self` with `converter`.
    pub fn convert(self, converter: Converter) -> Parser {
        let required = self.required.clone().map(|r| (*r).convert(converter.clone()));
        let inner = self.runner();
        Parser::new(
            move |tokens| {
                let mut parse = inner(tokens)?;
                let Some(last) = parse.bindings.pop() else {
                    return Err(ParseError::Rejected {
                        message: "There is no value to convert.".to_string(),
                        position: tokens.position(),
                    });
                };
                let token = match last.value() {
                    Value::Scalar(scalar) => scalar.to_string(),
                    other => other.to_string(),
                };
                let value = converter
                    .convert(&token)
                    .map_err(|source| ParseError::ConversionError {
                        name: last.key(),
                        position: parse.position.saturating_sub(1),
                        source,
                    })?;
                parse.bindings.push(last.with_value(value));
                Ok(parse)
            },
            self.usage,
            self.helps,
        )
        .with_required(required)
    }

    /// Request help for `self` when the next token is one of the configured help tokens (by default `--help` or `-h`).
    ///
    /// Used to scope help to part of a grammar, ex: a sub-command.
    pub fn wrap_help(self) -> Parser {
        let required = self.required.clone().map(|r| (*r).wrap_help());
        let usage = self.usage.clone();
        let helps = self.helps.clone();
        help_check(usage.clone(), helps.clone())
            .then(self)
            .with_usage(usage)
            .with_helps(helps)
            .with_required(required)
    }
}

fn repeat(inner: &Run, tokens: Tokens<'_>) -> Result<Parse, ParseError> {
    let mut accumulated = Parse::empty(tokens.position());

    loop {
        match inner(tokens.at(accumulated.position)) {
            Ok(parse) if parse.position > accumulated.position => {
                accumulated = accumulated.then(parse);
            }
            // No progress; another application would match the same way forever.
            Ok(_) => break,
            Err(error) if error.is_help() => return Err(error),
            Err(_) => break,
        }
    }

    Ok(accumulated)
}

impl Shr for Parser {
    type Output = Parser;

    fn shr(self, rhs: Parser) -> Parser {
        self.then(rhs)
    }
}

impl BitOr for Parser {
    type Output = Parser;

    fn bitor(self, rhs: Parser) -> Parser {
        self.or(rhs)
    }
}

impl BitXor for Parser {
    type Output = Parser;

    fn bitxor(self, rhs: Parser) -> Parser {
        self.xor(rhs)
    }
}

impl Add for Parser {
    type Output = Parser;

    fn add(self, rhs: Parser) -> Parser {
        self.plus(rhs)
    }
}
