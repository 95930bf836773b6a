use std::rc::Rc;
use thiserror::Error;

use crate::api::InvalidConversion;
use crate::constant::*;
use crate::model::{Bindings, Mapping};
use crate::parser::primitive::done;
use crate::parser::usage::{Helps, Usage};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A mistake in the configuration of a parser, detected while building it.
#[derive(Debug, Error)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

/// Why a parse failed.
///
/// Every variant except `HelpRequested` records the token position it refers to.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A required flag/option/positional was absent.
    #[error("The following arguments are required: {name}")]
    MissingArgument {
        /// The spelling (or placeholder) of what was required.
        name: String,
        /// The position where it was expected.
        position: usize,
    },
    /// A token matched no alternative at this position.
    #[error("{}", unexpected_message(.expected, .received))]
    UnexpectedToken {
        /// What was expected, if anything specific.
        expected: Option<String>,
        /// The token that was found.
        received: String,
        /// The position of the token.
        position: usize,
    },
    /// A converter rejected a token.
    #[error("argument {name}: {source}")]
    ConversionError {
        /// The spelling (or placeholder) of the parameter.
        name: String,
        /// The position of the rejected token.
        position: usize,
        /// The converter's failure.
        #[source]
        source: InvalidConversion,
    },
    /// Both sides of an exclusive-or matched.
    #[error("Both parsers succeeded. This causes ^ to fail.")]
    AmbiguousMatch {
        /// The position both sides started from.
        position: usize,
    },
    /// A help token was recognized.
    #[error("usage: {usage}")]
    HelpRequested {
        /// The usage of the parser whose help was requested.
        usage: Usage,
        /// The help text of the parser whose help was requested.
        helps: Helps,
    },
    /// A caller supplied check failed (ex: `Parser::sat`).
    #[error("{message}")]
    Rejected {
        /// Describes the failure.
        message: String,
        /// The position the rejected parser started from.
        position: usize,
    },
}

fn unexpected_message(expected: &Option<String>, received: &str) -> String {
    match expected {
        Some(expected) => format!("Expected '{expected}'. Got '{received}'"),
        None => format!("Unrecognized argument: {received}"),
    }
}

impl ParseError {
    /// The token position of the failure (`None` for `HelpRequested`).
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::MissingArgument { position, .. }
            | ParseError::UnexpectedToken { position, .. }
            | ParseError::ConversionError { position, .. }
            | ParseError::AmbiguousMatch { position }
            | ParseError::Rejected { position, .. } => Some(*position),
            ParseError::HelpRequested { .. } => None,
        }
    }

    /// Whether this is a help request rather than a true failure.
    pub fn is_help(&self) -> bool {
        matches!(self, ParseError::HelpRequested { .. })
    }
}

/// A view of the (pre-tokenized) input from some position onwards, along with the config of the parse.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tokens<'t> {
    all: &'t [String],
    position: usize,
    config: &'t ParseConfig,
}

impl<'t> Tokens<'t> {
    pub(crate) fn new(all: &'t [String], config: &'t ParseConfig) -> Self {
        Self {
            all,
            position: 0,
            config,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn peek(&self) -> Option<&'t str> {
        self.all.get(self.position).map(String::as_str)
    }

    /// The unconsumed tokens, starting with the head.
    pub(crate) fn remaining(&self) -> &'t [String] {
        &self.all[std::cmp::min(self.position, self.all.len())..]
    }

    pub(crate) fn at(&self, position: usize) -> Self {
        Self {
            all: self.all,
            position,
            config: self.config,
        }
    }

    /// Whether the head is one of the configured help tokens.
    pub(crate) fn help_at_head(&self) -> bool {
        self.peek()
            .map_or(false, |head| self.config.help_tokens.iter().any(|t| t == head))
    }
}

/// A successful outcome: the bindings produced and where the unconsumed tail begins.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Parse {
    pub(crate) bindings: Bindings,
    pub(crate) position: usize,
    // The most specific command tree node that matched, if any.
    pub(crate) selected: Option<usize>,
}

impl Parse {
    pub(crate) fn new(bindings: Bindings, position: usize) -> Self {
        Self {
            bindings,
            position,
            selected: None,
        }
    }

    pub(crate) fn empty(position: usize) -> Self {
        Self::new(Bindings::new(), position)
    }

    /// Sequence `next` after this outcome.
    pub(crate) fn then(mut self, next: Parse) -> Self {
        self.bindings.append(next.bindings);
        Self {
            bindings: self.bindings,
            position: next.position,
            selected: next.selected.or(self.selected),
        }
    }
}

pub(crate) type Run = dyn Fn(Tokens<'_>) -> Result<Parse, ParseError>;

/// A composable parser over a pre-tokenized input.
///
/// A `Parser` is immutable; it may be reused for any number of parses.
/// Parsers are composed via the combinator methods (or their operator spellings):
/// * `a >> b`: [`Parser::then`]
/// * `a | b`: [`Parser::or`]
/// * `a ^ b`: [`Parser::xor`]
/// * `a + b`: [`Parser::plus`]
#[derive(Clone)]
pub struct Parser {
    run: Rc<Run>,
    pub(crate) usage: Usage,
    pub(crate) helps: Helps,
    // The form to apply when this parser must match (ex: the operand of `optional`).
    pub(crate) required: Option<Box<Parser>>,
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parser[{}]", self.usage)
    }
}

impl Parser {
    pub(crate) fn new(
        run: impl Fn(Tokens<'_>) -> Result<Parse, ParseError> + 'static,
        usage: Usage,
        helps: Helps,
    ) -> Self {
        Self {
            run: Rc::new(run),
            usage,
            helps,
            required: None,
        }
    }

    pub(crate) fn run(&self, tokens: Tokens<'_>) -> Result<Parse, ParseError> {
        (self.run)(tokens)
    }

    pub(crate) fn runner(&self) -> Rc<Run> {
        self.run.clone()
    }

    pub(crate) fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    pub(crate) fn with_helps(mut self, helps: Helps) -> Self {
        self.helps = helps;
        self
    }

    /// Replace the form of this parser to apply when it must match.
    pub(crate) fn with_required(mut self, required: Option<Parser>) -> Self {
        self.required = required.map(Box::new);
        self
    }

    /// The form of this parser to apply when it must match.
    pub(crate) fn required_form(&self) -> &Parser {
        match &self.required {
            Some(required) => required,
            None => self,
        }
    }

    /// Record `node` as the selected command tree node when this parser succeeds.
    pub(crate) fn select(self, node: usize) -> Self {
        let required = self.required.clone().map(|r| (*r).select(node));
        let inner = self.runner();
        Parser::new(
            move |tokens| {
                inner(tokens).map(|parse| Parse {
                    selected: Some(node),
                    ..parse
                })
            },
            self.usage,
            self.helps,
        )
        .with_required(required)
    }

    /// The usage of this parser.
    pub fn usage(&self) -> &Usage {
        &self.usage
    }

    /// The help text of this parser's parameters.
    pub fn helps(&self) -> &Helps {
        &self.helps
    }

    /// Parse `tokens` with the default [`ParseConfig`].
    ///
    /// ### Example
    /// ```
    /// # use combarg_builder as combarg;
    /// use combarg::{flag, Mapping, ParseError};
    ///
    /// let parser = flag("verbose") | flag("quiet");
    /// assert_eq!(parser.parse(&["--quiet"]), Ok(Mapping::from([("quiet", true)])));
    /// assert!(matches!(parser.parse(&[]), Err(ParseError::MissingArgument { .. })));
    /// ```
    pub fn parse(&self, tokens: &[&str]) -> Result<Mapping, ParseError> {
        self.parse_args(tokens, &ParseConfig::default())
    }

    /// Parse `tokens` into a nested [`Mapping`].
    ///
    /// Unless `config` allows unparsed tokens, all of the input must be consumed.
    /// Unless `config` disables the help check, a help token anywhere in the input fails with `ParseError::HelpRequested`.
    /// The help is scoped to the innermost [`Parser::wrap_help`] that recognized it, or this parser otherwise.
    pub fn parse_args(&self, tokens: &[&str], config: &ParseConfig) -> Result<Mapping, ParseError> {
        self.evaluate(tokens, config)
            .map(|parse| parse.bindings.to_mapping())
    }

    pub(crate) fn evaluate(&self, tokens: &[&str], config: &ParseConfig) -> Result<Parse, ParseError> {
        let owned: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        let input = Tokens::new(&owned, config);
        let result = self.run(input).and_then(|parse| {
            if config.allow_unparsed {
                Ok(parse)
            } else {
                let position = parse.position;
                done().run(input.at(position)).map(|_| parse)
            }
        });

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Parsed {:?} with {:?}: {:?}", tokens, self, result);
        }

        if config.check_help && owned.iter().any(|t| config.help_tokens.contains(t)) {
            return match result {
                Err(error @ ParseError::HelpRequested { .. }) => Err(error),
                _ => Err(ParseError::HelpRequested {
                    usage: self.usage.clone(),
                    helps: self.helps.clone(),
                }),
            };
        }

        result
    }
}

/// Settings for [`Parser::parse_args`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    pub(crate) help_tokens: Vec<String>,
    pub(crate) allow_unparsed: bool,
    pub(crate) check_help: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            help_tokens: vec![HELP_LONG.to_string(), HELP_SHORT.to_string()],
            allow_unparsed: false,
            check_help: true,
        }
    }
}

impl ParseConfig {
    /// Whether to succeed without consuming the whole input (default `false`).
    pub fn allow_unparsed(mut self, allow: bool) -> Self {
        self.allow_unparsed = allow;
        self
    }

    /// Whether to look for help tokens anywhere in the input (default `true`).
    pub fn check_help(mut self, check: bool) -> Self {
        self.check_help = check;
        self
    }

    /// Replace the help tokens (default `--help` and `-h`).
    pub fn help_tokens<S: Into<String>>(mut self, tokens: impl IntoIterator<Item = S>) -> Self {
        self.help_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }
}
