use std::env;

use crate::model::Mapping;
use crate::parser::base::{Parse, ParseConfig, ParseError, Parser};
use crate::parser::interface::UserInterface;
use crate::parser::printer::Printer;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// How a command line parse ended, when it did not produce a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Help was requested and printed.
    Help,
    /// The input was invalid; the usage and error were printed.
    Error,
}

impl Exit {
    /// The process exit code: `0` for help, `1` for an error.
    pub fn code(&self) -> i32 {
        match self {
            Exit::Help => 0,
            Exit::Error => 1,
        }
    }
}

/// The configured command line parser.
/// Built via [`crate::CommandLineParser::build`].
pub struct GeneralParser {
    parser: Parser,
    config: ParseConfig,
    printer: Printer,
    user_interface: Box<dyn UserInterface>,
}

impl std::fmt::Debug for GeneralParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GeneralParser[{}]", self.parser.usage)
    }
}

impl GeneralParser {
    pub(crate) fn new(
        parser: Parser,
        config: ParseConfig,
        printer: Printer,
        user_interface: Box<dyn UserInterface>,
    ) -> Self {
        Self {
            parser,
            config,
            printer,
            user_interface,
        }
    }

    /// Parse, rendering any help or error through the user interface.
    pub(crate) fn invoke(&self, tokens: &[&str]) -> Result<Parse, Exit> {
        match self.parser.evaluate(tokens, &self.config) {
            Ok(parse) => Ok(parse),
            Err(ParseError::HelpRequested { usage, helps }) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Help requested: {usage}");
                }

                self.printer
                    .print_help(&usage, &helps, &*self.user_interface);
                Err(Exit::Help)
            }
            Err(error) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Parse error: {error:?}");
                }

                self.printer
                    .print_error(&self.parser.usage, error, tokens, &*self.user_interface);
                Err(Exit::Error)
            }
        }
    }

    /// Run the command line parser against the input tokens.
    ///
    /// On success, returns the nested mapping of bindings.
    /// If help is requested (ex: via `--help`), prints the help message and returns `Err(Exit::Help)`.
    /// If the input is invalid, prints the usage along with the error and returns `Err(Exit::Error)`.
    pub fn parse_tokens(&self, tokens: &[&str]) -> Result<Mapping, Exit> {
        self.invoke(tokens)
            .map(|parse| parse.bindings.to_mapping())
    }

    /// Run the command line parser against the program arguments (from [`std::env::args`]).
    ///
    /// If the parse does not succeed, exits with the code of its [`Exit`] (via [`std::process::exit`]).
    pub fn parse(&self) -> Mapping {
        let command_input: Vec<String> = env::args().skip(1).collect();

        match self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(mapping) => mapping,
            Err(exit) => std::process::exit(exit.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{argument, flag, option, Converter};
    use crate::parser::interface::util::InMemoryInterface;
    use crate::parser::primitive::matches;
    use crate::test::assert_contains;
    use rstest::rstest;

    fn general_parser(parser: Parser, interface: &InMemoryInterface) -> GeneralParser {
        GeneralParser::new(
            parser,
            ParseConfig::default(),
            Printer::new("program", None, ParseConfig::default().help_tokens, None),
            Box::new(interface.clone()),
        )
    }

    #[rstest]
    #[case(Exit::Help, 0)]
    #[case(Exit::Error, 1)]
    fn exit_code(#[case] exit: Exit, #[case] expected: i32) {
        assert_eq!(exit.code(), expected);
    }

    #[test]
    fn parse_tokens_empty() {
        // Setup
        let interface = InMemoryInterface::default();
        let parser = general_parser(crate::parser::primitive::empty(), &interface);

        // Execute
        let result = parser.parse_tokens(&[]);

        // Verify
        assert_eq!(result, Ok(Mapping::new()));
        assert_eq!(interface.consume(), (None, None, None));
    }

    #[test]
    fn parse_tokens_success() {
        // Setup
        let interface = InMemoryInterface::default();
        let parser = general_parser(
            option("x", Converter::parse::<i64>()) >> flag("verbose"),
            &interface,
        );

        // Execute
        let result = parser.parse_tokens(&["-x", "1", "-v"]);

        // Verify
        assert_eq!(
            result,
            Ok(Mapping::from([
                ("x", crate::model::Value::from(1)),
                ("verbose", crate::model::Value::from(true)),
            ]))
        );
        assert_eq!(interface.consume(), (None, None, None));
    }

    #[rstest]
    #[case(vec!["-x"], "The following arguments are required: X")]
    #[case(vec!["-x", "a"], "argument -x: cannot convert 'a' to i64.")]
    #[case(vec!["-y"], "Expected '-x'. Got '-y'")]
    #[case(vec!["-x", "1", "extra"], "Unrecognized argument: extra")]
    fn parse_tokens_error(#[case] tokens: Vec<&str>, #[case] expected: &str) {
        // Setup
        let interface = InMemoryInterface::default();
        let parser = general_parser(option("x", Converter::parse::<i64>()), &interface);

        // Execute
        let result = parser.parse_tokens(tokens.as_slice());

        // Verify
        assert_eq!(result, Err(Exit::Error));
        let (message, error, error_context) = interface.consume();
        assert_eq!(message, Some("usage: program -x X".to_string()));
        assert_eq!(error, Some(expected.to_string()));
        assert!(error_context.is_some());
    }

    #[rstest]
    #[case(vec!["-h"])]
    #[case(vec!["--help"])]
    #[case(vec!["-x", "1", "--help"])]
    fn parse_tokens_help(#[case] tokens: Vec<&str>) {
        // Setup
        let interface = InMemoryInterface::default();
        let parser = general_parser(
            option("x", Converter::parse::<i64>()) >> argument("name", Converter::text()),
            &interface,
        );

        // Execute
        let result = parser.parse_tokens(tokens.as_slice());

        // Verify
        assert_eq!(result, Err(Exit::Help));
        let message = interface.consume_message();
        assert_contains!(message, "usage: program -x X NAME");
        assert_contains!(message, "options:");
    }

    #[test]
    fn parse_tokens_help_scoped() {
        // Setup
        let interface = InMemoryInterface::default();
        let parser = general_parser(
            (matches("add") >> argument("item", Converter::text()).wrap_help())
                | (matches("remove") >> flag("all")),
            &interface,
        );

        // Execute
        let result = parser.parse_tokens(&["add", "-h"]);

        // Verify
        assert_eq!(result, Err(Exit::Help));
        let message = interface.consume_message();
        assert_contains!(message, "usage: program ITEM");
    }
}
