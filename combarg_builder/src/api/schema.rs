use std::collections::HashSet;

use crate::api::{Argument, Converter, Flag, Opt};
use crate::constant::NESTING_DELIMITER;
use crate::model::{Bindings, Scalar, Value};
use crate::parser::{ConfigError, Helps, Nonpositional, Parser};

#[derive(Debug, Clone)]
enum FieldKind {
    Flag,
    Option(Converter),
    Argument(Converter),
    Parser(Parser),
}

/// One named field of a [`Schema`].
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    kind: FieldKind,
    help: Option<String>,
    default: Option<Value>,
    short: bool,
    optional: bool,
}

impl Field {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            help: None,
            default: None,
            short: true,
            optional: false,
        }
    }

    /// A boolean flag field.
    /// Without a default the flag is required.
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Flag)
    }

    /// An option field, converting its value with `converter`.
    pub fn option(name: impl Into<String>, converter: Converter) -> Self {
        Self::new(name, FieldKind::Option(converter))
    }

    /// A positional field, converting its value with `converter`.
    pub fn argument(name: impl Into<String>, converter: Converter) -> Self {
        Self::new(name, FieldKind::Argument(converter))
    }

    /// A field parsed by a custom `parser`.
    /// The parser's bindings keep their own keys (nested under the schema prefix, if any); the field name only keys its default and help.
    pub fn parser(name: impl Into<String>, parser: impl Into<Parser>) -> Self {
        Self::new(name, FieldKind::Parser(parser.into()))
    }

    /// Document the field.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    /// The value bound when the field is absent.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default.replace(value.into());
        self
    }

    /// Whether a flag/option field accepts its short spelling (default `true`).
    pub fn short(mut self, enabled: bool) -> Self {
        self.short = enabled;
        self
    }

    /// Allow the field to be absent without binding a default.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn build(self, prefix: Option<&str>, flip_bools: bool) -> Result<Parser, ConfigError> {
        let Field {
            name,
            kind,
            help,
            default,
            short,
            optional,
        } = self;
        let key = match prefix {
            Some(prefix) => format!("{prefix}{NESTING_DELIMITER}{name}"),
            None => name.clone(),
        };

        let parser = match kind {
            FieldKind::Flag => {
                let mut flag = Flag::new(&key).short(short);

                if let Some(help) = help {
                    flag = flag.help(help);
                }

                match default {
                    None => flag.build(),
                    Some(Value::Scalar(Scalar::Bool(default))) => {
                        if default && flip_bools {
                            flag = flag.string(format!("--no-{}", key.replace('_', "-")));
                        }

                        flag.default(default).build()
                    }
                    Some(other) => {
                        return Err(ConfigError(format!(
                            "flag field '{name}' cannot have the non-boolean default '{other}'."
                        )))
                    }
                }
            }
            FieldKind::Option(converter) => {
                let mut opt = Opt::new(&key, converter).short(short);

                if let Some(help) = help {
                    opt = opt.help(help);
                }

                match default {
                    Some(default) => opt.default(default).build(),
                    None => opt.build(),
                }
            }
            FieldKind::Argument(converter) => {
                let mut argument = Argument::new(&key, converter);

                if let Some(help) = help {
                    argument = argument.help(help);
                }

                match default {
                    Some(default) => argument.build().defaults(Bindings::single(&key, default, true)),
                    None => argument.build(),
                }
            }
            FieldKind::Parser(parser) => {
                let parser = match prefix {
                    Some(prefix) => {
                        let prefix = prefix.to_string();
                        parser.apply(move |bindings| {
                            Ok(bindings
                                .into_iter()
                                .map(|binding| binding.prefixed(&prefix))
                                .collect())
                        })
                    }
                    None => parser,
                };
                let parser = match help {
                    Some(help) => {
                        let helps = parser.helps.clone().merge(&Helps::single(&key, help));
                        parser.with_helps(helps)
                    }
                    None => parser,
                };

                match default {
                    Some(default) => parser.defaults(Bindings::single(&key, default, true)),
                    None => parser,
                }
            }
        };

        if optional && parser.required.is_none() {
            Ok(parser.optional())
        } else {
            Ok(parser)
        }
    }
}

/// A declarative set of named fields, accepted in any order.
///
/// This is the explicit builder form of a record of command line parameters.
/// Each field becomes a flag, option, argument or custom parser, and `build` combines them with [`Nonpositional`].
///
/// ### Example
/// ```
/// # use combarg_builder as combarg;
/// use combarg::{Converter, Field, Mapping, Schema, Value};
///
/// let parser = Schema::new()
///     .field(Field::flag("verbose").default(false))
///     .field(Field::option("count", Converter::parse::<i64>()).default(1))
///     .field(Field::flag("tests").default(true))
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     parser.parse(&["--count", "2", "--no-tests"]),
///     Ok(Mapping::from([
///         ("verbose", Value::from(false)),
///         ("count", Value::from(2)),
///         ("tests", Value::from(false)),
///     ]))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<Field>,
    prefix: Option<String>,
    flip_bools: bool,
    repeated: Option<Parser>,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            fields: Vec::default(),
            prefix: None,
            flip_bools: true,
            repeated: None,
        }
    }
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Nest every field under `prefix` (ex: `cfg` turns field `x` into `--cfg.x`, bound at `{cfg: {x: ..}}`).
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix.replace(prefix.into());
        self
    }

    /// Whether flags defaulting to `true` are spelled `--no-name` (default `true`).
    pub fn flip_bools(mut self, enabled: bool) -> Self {
        self.flip_bools = enabled;
        self
    }

    /// Allow `repeated` zero or more times between the fields (see [`Nonpositional::repeated`]).
    pub fn repeated(mut self, repeated: impl Into<Parser>) -> Self {
        self.repeated.replace(repeated.into());
        self
    }

    /// Build the parser.
    /// This checks for configuration errors (ex: a repeated field name).
    pub fn build(self) -> Result<Parser, ConfigError> {
        let Schema {
            fields,
            prefix,
            flip_bools,
            repeated,
        } = self;
        let mut names = HashSet::new();
        let mut parsers = Vec::default();

        for field in fields {
            if field.name.is_empty() {
                return Err(ConfigError("field names cannot be empty.".to_string()));
            }

            if !names.insert(field.name.clone()) {
                return Err(ConfigError(format!(
                    "Cannot duplicate the field '{}'.",
                    field.name
                )));
            }

            parsers.push(field.build(prefix.as_deref(), flip_bools)?);
        }

        let nonpositional = Nonpositional::new(parsers);

        Ok(match repeated {
            Some(repeated) => nonpositional.repeated(repeated),
            None => nonpositional,
        }
        .build())
    }
}

/// A record type with a [`Schema`], typically implemented by `#[derive(Args)]`.
pub trait Args {
    /// The schema of this record's fields.
    fn schema() -> Schema;

    /// The parser of this record's fields.
    fn parser() -> Result<Parser, ConfigError> {
        Self::schema().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{flag, option};
    use crate::model::Mapping;
    use crate::parser::ParseError;
    use crate::test::assert_contains;
    use rstest::rstest;

    fn int() -> Converter {
        Converter::parse::<i64>()
    }

    #[rstest]
    #[case(vec!["--verbose", "--count", "1"])]
    #[case(vec!["--count", "1", "--verbose"])]
    #[case(vec!["-c", "1", "-v"])]
    fn required_fields(#[case] tokens: Vec<&str>) {
        // Setup
        let parser = Schema::new()
            .field(Field::flag("verbose"))
            .field(Field::option("count", int()))
            .build()
            .unwrap();

        // Execute
        let result = parser.parse(tokens.as_slice());

        // Verify
        assert_eq!(
            result,
            Ok(Mapping::from([
                ("verbose", Value::from(true)),
                ("count", Value::from(1)),
            ]))
        );
    }

    #[test]
    fn required_field_missing() {
        // Setup
        let parser = Schema::new()
            .field(Field::flag("verbose"))
            .field(Field::option("count", int()))
            .build()
            .unwrap();

        // Execute
        let result = parser.parse(&["--verbose"]);

        // Verify
        assert_matches!(result, Err(ParseError::MissingArgument { .. }));
    }

    #[rstest]
    #[case(true, vec!["--no-tests"], false)]
    #[case(true, vec![], true)]
    #[case(false, vec!["--tests"], false)]
    #[case(false, vec![], true)]
    fn flip_bools(#[case] flip: bool, #[case] tokens: Vec<&str>, #[case] expected: bool) {
        // Setup
        let parser = Schema::new()
            .flip_bools(flip)
            .field(Field::flag("tests").default(true))
            .build()
            .unwrap();

        // Execute
        let result = parser.parse(tokens.as_slice());

        // Verify
        assert_eq!(result, Ok(Mapping::from([("tests", expected)])));
    }

    #[test]
    fn defaults_and_help() {
        // Setup
        let parser = Schema::new()
            .field(Field::option("x", int()).default(0).help("a number"))
            .field(Field::parser("y", option("y", int()).convert(Converter::new("increment", |s| {
                s.parse::<i64>()
                    .map(|v| Value::from(v + 1))
                    .map_err(|_| crate::api::InvalidConversion::InvalidType {
                        token: s.to_string(),
                        type_name: "increment".to_string(),
                    })
            }))).default(1).help("a number to increment"))
            .build()
            .unwrap();

        // Execute & verify
        assert_eq!(
            parser.parse(&["-x", "10"]),
            Ok(Mapping::from([("x", 10), ("y", 1)]))
        );
        assert_eq!(
            parser.parse(&["-y", "10"]),
            Ok(Mapping::from([("x", 0), ("y", 11)]))
        );
        assert_eq!(parser.usage().to_string(), "[-x X] [-y Y]");
        assert_eq!(
            parser.helps().iter().collect::<Vec<_>>(),
            vec![("-x, --x X", "a number (default: 0)"), ("y", "a number to increment")]
        );
    }

    #[test]
    fn prefix() {
        // Setup
        let parser = Schema::new()
            .prefix("cfg")
            .field(Field::option("size", int()).default(3))
            .field(Field::parser("mode", option("mode", Converter::text())).optional())
            .build()
            .unwrap();

        // Execute
        let result = parser.parse(&["--cfg.size", "5", "--mode", "fast"]);

        // Verify
        assert_eq!(
            result,
            Ok(Mapping::from([(
                "cfg",
                Value::Mapping(Mapping::from([
                    ("size", Value::from(5)),
                    ("mode", Value::from("fast")),
                ]))
            )]))
        );
        assert_eq!(
            parser.parse(&[]),
            Ok(Mapping::from([(
                "cfg",
                Value::Mapping(Mapping::from([("size", 3)]))
            )]))
        );
    }

    #[rstest]
    #[case(vec!["-a", "--cfg.b"], true)]
    #[case(vec!["--cfg.b", "-a"], true)]
    #[case(vec!["--cfg.b"], false)]
    fn prefix_parser_field_any_order(#[case] tokens: Vec<&str>, #[case] a: bool) {
        // Setup
        let parser = Schema::new()
            .prefix("cfg")
            .field(Field::parser("a", flag("a").defaults([("a", false)])))
            .field(Field::flag("b"))
            .build()
            .unwrap();

        // Execute
        let result = parser.parse(tokens.as_slice());

        // Verify
        assert_eq!(
            result,
            Ok(Mapping::from([(
                "cfg",
                Value::Mapping(Mapping::from([("a", a), ("b", true)]))
            )]))
        );
    }

    #[test]
    fn optional_field() {
        // Setup
        let parser = Schema::new()
            .field(Field::option("name", Converter::text()).optional())
            .field(Field::argument("path", Converter::text()))
            .build()
            .unwrap();

        // Execute & verify
        assert_eq!(parser.parse(&["p"]), Ok(Mapping::from([("path", "p")])));
        assert_eq!(
            parser.parse(&["p", "--name", "n"]),
            Ok(Mapping::from([("name", "n"), ("path", "p")]))
        );
    }

    #[test]
    fn repeated() {
        // Setup
        let parser = Schema::new()
            .field(Field::flag("x"))
            .repeated(Flag::new("debug").build().ignore())
            .build()
            .unwrap();

        // Execute & verify
        assert_eq!(
            parser.parse(&["--debug", "-x", "--debug"]),
            Ok(Mapping::from([("x", true)]))
        );
    }

    #[test]
    fn duplicate_field() {
        // Setup
        let schema = Schema::new()
            .field(Field::flag("x"))
            .field(Field::option("x", int()));

        // Execute
        let result = schema.build();

        // Verify
        assert_matches!(result, Err(ConfigError(message)) => {
            assert_contains!(message, "Cannot duplicate the field 'x'.");
        });
    }

    #[test]
    fn non_boolean_flag_default() {
        assert_matches!(
            Schema::new().field(Field::flag("x").default(1)).build(),
            Err(ConfigError(_))
        );
    }

    #[test]
    fn empty_field_name() {
        assert_matches!(
            Schema::new().field(Field::flag("")).build(),
            Err(ConfigError(_))
        );
    }

    struct Record;

    impl Args for Record {
        fn schema() -> Schema {
            Schema::new().field(Field::flag("verbose").default(false))
        }
    }

    #[test]
    fn args_parser() {
        let parser = Record::parser().unwrap();
        assert_eq!(parser.parse(&["-v"]), Ok(Mapping::from([("verbose", true)])));
    }
}
