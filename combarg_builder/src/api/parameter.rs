use crate::api::Converter;
use crate::constant::NESTING_DELIMITER;
use crate::model::{Bindings, Value};
use crate::parser::{placeholder, Helps, Parse, ParseError, Parser, Tokens, Usage};

/// The accepted spellings of a flag/option; the first is used in usage/help.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Spellings(Vec<String>);

impl Spellings {
    fn new(name: &str, short: bool, string: Option<String>) -> Self {
        if let Some(string) = string {
            return Spellings(vec![string]);
        }

        let dashed = name.replace('_', "-");

        if dashed.chars().count() == 1 {
            Spellings(vec![format!("-{dashed}"), format!("--{dashed}")])
        } else {
            let mut spellings = vec![format!("--{dashed}")];

            // Nested names would all share the prefix's first character.
            if short && !name.contains(NESTING_DELIMITER) {
                if let Some(first) = dashed.chars().next() {
                    spellings.push(format!("-{first}"));
                }
            }

            Spellings(spellings)
        }
    }

    fn primary(&self) -> &str {
        &self.0[0]
    }

    fn accepts(&self, token: &str) -> bool {
        self.0.iter().any(|s| s == token)
    }

    /// The value of an `--name=value` token.
    fn inline_value<'t>(&self, token: &'t str) -> Option<&'t str> {
        self.0
            .iter()
            .find_map(|s| token.strip_prefix(s.as_str())?.strip_prefix('='))
    }

    fn help_key(&self) -> String {
        self.0.join(", ")
    }
}

fn help_text(help: Option<String>, default: Option<String>) -> Option<String> {
    match (help, default) {
        (Some(help), Some(default)) => Some(format!("{help} (default: {default})")),
        (Some(help), None) => Some(help),
        (None, Some(default)) => Some(format!("(default: {default})")),
        (None, None) => None,
    }
}

fn unexpected(spellings: &Spellings, token: &str, position: usize) -> ParseError {
    ParseError::UnexpectedToken {
        expected: Some(spellings.primary().to_string()),
        received: token.to_string(),
        position,
    }
}

/// A flag: a single token such as `--verbose`, binding a boolean.
///
/// The spelling is `--name` (underscores become dashes), or `-n` for a single character name.
/// Unless disabled, a long name is also accepted by its short spelling `-n`.
///
/// ### Example
/// ```
/// # use combarg_builder as combarg;
/// use combarg::{Flag, Mapping};
///
/// let parser = Flag::new("dry_run").default(false).help("Only print.").build();
/// assert_eq!(parser.usage().to_string(), "[--dry-run]");
/// assert_eq!(parser.parse(&["-d"]), Ok(Mapping::from([("dry_run", true)])));
/// assert_eq!(parser.parse(&[]), Ok(Mapping::from([("dry_run", false)])));
/// ```
#[derive(Debug, Clone)]
pub struct Flag {
    name: String,
    short: bool,
    string: Option<String>,
    default: Option<bool>,
    help: Option<String>,
    nesting: bool,
}

impl Flag {
    /// Create a flag which binds `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: true,
            string: None,
            default: None,
            help: None,
            nesting: true,
        }
    }

    /// Whether to also accept the short spelling `-n` (default `true`).
    pub fn short(mut self, enabled: bool) -> Self {
        self.short = enabled;
        self
    }

    /// Use exactly this spelling instead of the derived ones.
    pub fn string(mut self, spelling: impl Into<String>) -> Self {
        self.string.replace(spelling.into());
        self
    }

    /// Make the flag optional: bind `value` when absent, and `!value` when present.
    /// Without a default the flag is required, and binds `true`.
    pub fn default(mut self, value: bool) -> Self {
        self.default.replace(value);
        self
    }

    /// Document the flag.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    /// Whether a dot-delimited name binds into nested mappings (default `true`).
    pub fn nesting(mut self, enabled: bool) -> Self {
        self.nesting = enabled;
        self
    }

    /// Build the parser.
    pub fn build(self) -> Parser {
        let Flag {
            name,
            short,
            string,
            default,
            help,
            nesting,
        } = self;
        let spellings = Spellings::new(&name, short, string);
        let usage = Usage::Flag(spellings.primary().to_string());
        let helps = match help_text(help, default.map(|d| d.to_string())) {
            Some(text) => Helps::single(spellings.help_key(), text),
            None => Helps::default(),
        };
        let present = !default.unwrap_or(false);
        let key = name.clone();
        let parser = Parser::new(
            move |tokens: Tokens<'_>| match tokens.peek() {
                Some(token) if spellings.accepts(token) => Ok(Parse::new(
                    Bindings::single(&key, present, nesting),
                    tokens.position() + 1,
                )),
                Some(token) => Err(unexpected(&spellings, token, tokens.position())),
                None => Err(ParseError::MissingArgument {
                    name: spellings.primary().to_string(),
                    position: tokens.position(),
                }),
            },
            usage,
            helps,
        );

        match default {
            Some(value) => parser.defaults(Bindings::single(&name, value, nesting)),
            None => parser,
        }
    }
}

impl From<Flag> for Parser {
    fn from(value: Flag) -> Self {
        value.build()
    }
}

/// A required flag binding `name` to `true`.
/// See [`Flag`] for configuration.
pub fn flag(name: impl Into<String>) -> Parser {
    Flag::new(name).build()
}

/// An option: a spelling such as `--count` followed by its value(s), binding the converted value(s).
///
/// The value may also be attached with `=`, as in `--count=3`.
///
/// ### Example
/// ```
/// # use combarg_builder as combarg;
/// use combarg::{Converter, Mapping, Opt};
///
/// let parser = Opt::new("level", Converter::text())
///     .choices(["low", "high"])
///     .default("low")
///     .build();
/// assert_eq!(parser.usage().to_string(), "[--level {low,high}]");
/// assert_eq!(parser.parse(&["--level=high"]), Ok(Mapping::from([("level", "high")])));
/// assert_eq!(parser.parse(&[]), Ok(Mapping::from([("level", "low")])));
/// assert!(parser.parse(&["--level", "medium"]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Opt {
    name: String,
    converter: Converter,
    short: bool,
    string: Option<String>,
    default: Option<Value>,
    help: Option<String>,
    nesting: bool,
    nargs: usize,
    choices: Vec<String>,
}

impl Opt {
    /// Create an option which binds `name` to values converted by `converter`.
    pub fn new(name: impl Into<String>, converter: Converter) -> Self {
        Self {
            name: name.into(),
            converter,
            short: true,
            string: None,
            default: None,
            help: None,
            nesting: true,
            nargs: 1,
            choices: Vec::default(),
        }
    }

    /// Whether to also accept the short spelling `-n` (default `true`).
    pub fn short(mut self, enabled: bool) -> Self {
        self.short = enabled;
        self
    }

    /// Use exactly this spelling instead of the derived ones.
    pub fn string(mut self, spelling: impl Into<String>) -> Self {
        self.string.replace(spelling.into());
        self
    }

    /// Make the option optional, binding `value` when absent.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default.replace(value.into());
        self
    }

    /// Document the option.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    /// Whether a dot-delimited name binds into nested mappings (default `true`).
    pub fn nesting(mut self, enabled: bool) -> Self {
        self.nesting = enabled;
        self
    }

    /// Take precisely `n` values (default `1`, at least `1`), bound together as a list when `n > 1`.
    pub fn nargs(mut self, n: usize) -> Self {
        self.nargs = std::cmp::max(n, 1);
        self
    }

    /// Only accept these (unconverted) values.
    pub fn choices<S: Into<String>>(mut self, choices: impl IntoIterator<Item = S>) -> Self {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Build the parser.
    pub fn build(self) -> Parser {
        let Opt {
            name,
            converter,
            short,
            string,
            default,
            help,
            nesting,
            nargs,
            choices,
        } = self;
        let spellings = Spellings::new(&name, short, string);
        let value_placeholder = if choices.is_empty() {
            placeholder(&name)
        } else {
            format!("{{{}}}", choices.join(","))
        };
        let value_usage = vec![value_placeholder.clone(); nargs].join(" ");
        let usage = Usage::Option {
            flag: spellings.primary().to_string(),
            value: value_usage.clone(),
        };
        let helps = match help_text(help, default.as_ref().map(|d| d.to_string())) {
            Some(text) => Helps::single(format!("{} {value_usage}", spellings.help_key()), text),
            None => Helps::default(),
        };
        let key = name.clone();
        let parser = Parser::new(
            move |tokens: Tokens<'_>| {
                let position = tokens.position();
                let (values, next): (Vec<&str>, usize) = match tokens.peek() {
                    None => {
                        return Err(ParseError::MissingArgument {
                            name: spellings.primary().to_string(),
                            position,
                        })
                    }
                    Some(token) if spellings.accepts(token) => {
                        let remaining = tokens.remaining();

                        if remaining.len() <= nargs {
                            return Err(ParseError::MissingArgument {
                                name: value_placeholder.clone(),
                                position: position + remaining.len(),
                            });
                        }

                        (
                            remaining[1..=nargs].iter().map(String::as_str).collect(),
                            position + 1 + nargs,
                        )
                    }
                    Some(token) => match spellings.inline_value(token) {
                        Some(value) if nargs == 1 => (vec![value], position + 1),
                        _ => return Err(unexpected(&spellings, token, position)),
                    },
                };
                let mut converted = Vec::default();

                for (i, value) in values.iter().enumerate() {
                    let value_position = next - values.len() + i;

                    if !choices.is_empty() && !choices.iter().any(|c| c == value) {
                        return Err(ParseError::UnexpectedToken {
                            expected: Some(value_placeholder.clone()),
                            received: value.to_string(),
                            position: value_position,
                        });
                    }

                    let value = converter.convert(value).map_err(|source| {
                        ParseError::ConversionError {
                            name: spellings.primary().to_string(),
                            position: value_position,
                            source,
                        }
                    })?;
                    converted.push(value);
                }

                let value = if converted.len() == 1 {
                    converted.remove(0)
                } else {
                    Value::List(converted)
                };
                Ok(Parse::new(Bindings::single(&key, value, nesting), next))
            },
            usage,
            helps,
        );

        match default {
            Some(value) => parser.defaults(Bindings::single(&name, value, nesting)),
            None => parser,
        }
    }
}

impl From<Opt> for Parser {
    fn from(value: Opt) -> Self {
        value.build()
    }
}

/// A required option binding `name` to its value converted by `converter`.
/// See [`Opt`] for configuration.
pub fn option(name: impl Into<String>, converter: Converter) -> Parser {
    Opt::new(name, converter).build()
}

/// A positional argument: consumes exactly one token unconditionally, binding its converted value.
#[derive(Debug, Clone)]
pub struct Argument {
    name: String,
    converter: Converter,
    help: Option<String>,
    nesting: bool,
}

impl Argument {
    /// Create an argument which binds `name` to a value converted by `converter`.
    pub fn new(name: impl Into<String>, converter: Converter) -> Self {
        Self {
            name: name.into(),
            converter,
            help: None,
            nesting: true,
        }
    }

    /// Document the argument.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    /// Whether a dot-delimited name binds into nested mappings (default `true`).
    pub fn nesting(mut self, enabled: bool) -> Self {
        self.nesting = enabled;
        self
    }

    /// Build the parser.
    pub fn build(self) -> Parser {
        let Argument {
            name,
            converter,
            help,
            nesting,
        } = self;
        let value_placeholder = placeholder(&name);
        let usage = Usage::Positional(value_placeholder.clone());
        let helps = match help {
            Some(text) => Helps::single(value_placeholder.clone(), text),
            None => Helps::default(),
        };
        Parser::new(
            move |tokens: Tokens<'_>| match tokens.peek() {
                Some(token) => {
                    let value = converter.convert(token).map_err(|source| {
                        ParseError::ConversionError {
                            name: value_placeholder.clone(),
                            position: tokens.position(),
                            source,
                        }
                    })?;
                    Ok(Parse::new(
                        Bindings::single(&name, value, nesting),
                        tokens.position() + 1,
                    ))
                }
                None => Err(ParseError::MissingArgument {
                    name: value_placeholder.clone(),
                    position: tokens.position(),
                }),
            },
            usage,
            helps,
        )
    }
}

impl From<Argument> for Parser {
    fn from(value: Argument) -> Self {
        value.build()
    }
}

/// A positional argument binding `name` to its value converted by `converter`.
/// See [`Argument`] for configuration.
pub fn argument(name: impl Into<String>, converter: Converter) -> Parser {
    Argument::new(name, converter).build()
}
