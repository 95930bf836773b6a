use crate::parser::{ConfigError, ConsoleInterface, GeneralParser, ParseConfig, Parser, Printer, UserInterface};

/// The base command line parser.
///
/// ### Example
/// ```
/// # use combarg_builder as combarg;
/// use combarg::{flag, option, CommandLineParser, Converter, Mapping, Value};
///
/// let parser = CommandLineParser::new(
///         "program",
///         option("x", Converter::parse::<i64>()) >> flag("verbose").defaults([("verbose", false)]),
///     )
///     .about("My program that does awesome stuff.")
///     .build();
///
/// assert_eq!(
///     parser.parse_tokens(&["-x", "1"]),
///     Ok(Mapping::from([("x", Value::from(1)), ("verbose", Value::from(false))]))
/// );
/// ```
pub struct CommandLineParser {
    program: String,
    parser: Parser,
    about: Option<String>,
    config: ParseConfig,
}

impl CommandLineParser {
    /// Create a command line parser for `program` from the composed `parser`.
    pub fn new(program: impl Into<String>, parser: impl Into<Parser>) -> Self {
        Self {
            program: program.into(),
            parser: parser.into(),
            about: None,
            config: ParseConfig::default(),
        }
    }

    /// Document the about message for this command line parser.
    /// If repeated, only the final message will apply.
    ///
    /// An about message documents the command line parser in full sentence/paragraph format.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Whether to succeed without consuming all the input tokens (default `false`).
    pub fn allow_unparsed(mut self, allow: bool) -> Self {
        self.config = self.config.allow_unparsed(allow);
        self
    }

    /// Whether a help token anywhere in the input requests help (default `true`).
    pub fn check_help(mut self, check: bool) -> Self {
        self.config = self.config.check_help(check);
        self
    }

    /// Replace the help tokens (default `--help` and `-h`).
    pub fn help_tokens<S: Into<String>>(mut self, tokens: impl IntoIterator<Item = S>) -> Self {
        self.config = self.config.help_tokens(tokens);
        self
    }

    pub(crate) fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<GeneralParser, ConfigError> {
        let CommandLineParser {
            program,
            parser,
            about,
            config,
        } = self;

        if program.is_empty() {
            return Err(ConfigError("program name cannot be empty.".to_string()));
        }

        if config.check_help && config.help_tokens.is_empty() {
            return Err(ConfigError(
                "help tokens cannot be empty when checking for help.".to_string(),
            ));
        }

        let printer = Printer::terminal(program, about, config.help_tokens.clone());
        Ok(GeneralParser::new(parser, config, printer, user_interface))
    }

    /// Build the command line parser as a Result.
    /// This finalizes the configuration and checks for errors (ex: an empty set of help tokens).
    pub fn build_parser(self) -> Result<GeneralParser, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the command line parser.
    /// This finalizes the configuration and checks for errors (ex: an empty set of help tokens).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> GeneralParser {
        match self.build_parser() {
            Ok(gp) => gp,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{argument, flag, Converter};
    use crate::model::Mapping;
    use crate::parser::util::InMemoryInterface;
    use crate::parser::Exit;
    use crate::test::assert_contains;

    #[test]
    fn build_empty_help_tokens() {
        // Setup
        let clp = CommandLineParser::new("program", flag("x")).help_tokens(Vec::<String>::default());

        // Execute
        let result = clp.build_parser();

        // Verify
        assert_matches!(result, Err(ConfigError(message)) => {
            assert_contains!(message, "help tokens");
        });
    }

    #[test]
    fn build_empty_help_tokens_unchecked() {
        let clp = CommandLineParser::new("program", flag("x"))
            .help_tokens(Vec::<String>::default())
            .check_help(false);
        assert!(clp.build_parser().is_ok());
    }

    #[test]
    fn build_empty_program() {
        assert_matches!(
            CommandLineParser::new("", flag("x")).build_parser(),
            Err(ConfigError(_))
        );
    }

    #[test]
    fn configured() {
        // Setup
        let interface = InMemoryInterface::default();
        let parser = CommandLineParser::new("program", argument("name", Converter::text()))
            .about("Greets people.")
            .allow_unparsed(true)
            .help_tokens(["-?"])
            .build_with_interface(Box::new(interface.clone()))
            .unwrap();

        // Execute & verify
        assert_eq!(
            parser.parse_tokens(&["-h", "extra"]),
            Ok(Mapping::from([("name", "-h")]))
        );
        assert_eq!(interface.consume(), (None, None, None));

        assert_eq!(parser.parse_tokens(&["a", "-?"]), Err(Exit::Help));
        let message = interface.consume_message();
        assert_contains!(message, "usage: program NAME");
        assert_contains!(message, "Greets people.");
        assert_contains!(message, "-?");
    }
}
