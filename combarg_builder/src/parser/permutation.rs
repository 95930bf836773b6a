use std::rc::Rc;

use crate::parser::base::{Parse, ParseError, Parser, Tokens};
use crate::parser::usage::{Helps, Usage};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Builds a parser that applies each of its parsers exactly once, in whichever order the input requires.
///
/// Orders are searched depth first, trying the parsers in ascending index order at every step.
/// The first order that succeeds wins, so the outcome is deterministic.
///
/// In the worst case the search visits every permutation (`N!` for `N` parsers).
/// It terminates regardless, but callers with large unordered groups should bound `N` themselves.
///
/// Parsers built with [`Parser::optional`] or [`Parser::defaults`] are tried in their required form while searching.
/// Once none of the pending parsers can match the next token, and all of them may be absent, they are applied in index order so they fall back to their defaults.
///
/// ### Example
/// ```
/// # use combarg_builder as combarg;
/// use combarg::{flag, option, Converter, Mapping, Nonpositional, Value};
///
/// let parser = Nonpositional::new([
///         flag("verbose").defaults([("verbose", false)]),
///         option("count", Converter::parse::<i64>()),
///     ])
///     .build();
///
/// assert_eq!(
///     parser.parse(&["--count", "2", "--verbose"]),
///     Ok(Mapping::from([("count", Value::from(2)), ("verbose", Value::from(true))]))
/// );
/// assert_eq!(
///     parser.parse(&["--count", "2"]),
///     Ok(Mapping::from([("count", Value::from(2)), ("verbose", Value::from(false))]))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Nonpositional {
    parsers: Vec<Parser>,
    repeated: Option<Parser>,
}

impl Nonpositional {
    /// Create a permutation over `parsers`.
    pub fn new(parsers: impl IntoIterator<Item = Parser>) -> Self {
        Self {
            parsers: parsers.into_iter().collect(),
            repeated: None,
        }
    }

    /// Allow `repeated` zero or more times before and after every parser.
    /// If repeated, only the final `repeated` applies.
    pub fn repeated(mut self, repeated: Parser) -> Self {
        self.repeated.replace(repeated);
        self
    }

    /// Build the parser.
    pub fn build(self) -> Parser {
        let Nonpositional { parsers, repeated } = self;
        let mut usages: Vec<Usage> = parsers.iter().map(|p| p.usage.clone()).collect();
        let mut helps = parsers
            .iter()
            .fold(Helps::default(), |helps, p| helps.merge(&p.helps));

        if let Some(r) = &repeated {
            usages.push(Usage::Many(Box::new(r.usage.clone())));
            helps = helps.merge(&r.helps);
        }

        let search = Rc::new(Search {
            parsers,
            repeated: repeated.map(Parser::many),
        });
        Parser::new(
            move |tokens| {
                let leading = search.repeat(tokens)?;
                let pending: Vec<usize> = (0..search.parsers.len()).collect();
                let rest = search.permute(&pending, tokens.at(leading.position))?;
                Ok(leading.then(rest))
            },
            Usage::unordered_of(usages),
            helps,
        )
    }
}

/// Apply each of `parsers` exactly once, in any order.
/// See [`Nonpositional`] for the search order, and to allow a repeated parser.
///
/// ### Example
/// ```
/// # use combarg_builder as combarg;
/// use combarg::{flag, nonpositional, Mapping};
///
/// let parser = nonpositional([flag("x"), flag("y")]);
/// assert_eq!(parser.parse(&["--y", "--x"]), Ok(Mapping::from([("x", true), ("y", true)])));
/// ```
pub fn nonpositional(parsers: impl IntoIterator<Item = Parser>) -> Parser {
    Nonpositional::new(parsers).build()
}

struct Search {
    parsers: Vec<Parser>,
    repeated: Option<Parser>,
}

impl Search {
    fn repeat(&self, tokens: Tokens<'_>) -> Result<Parse, ParseError> {
        match &self.repeated {
            Some(repeated) => repeated.run(tokens),
            None => Ok(Parse::empty(tokens.position())),
        }
    }

    fn permute(&self, pending: &[usize], tokens: Tokens<'_>) -> Result<Parse, ParseError> {
        if pending.is_empty() {
            return Ok(Parse::empty(tokens.position()));
        }

        let mut first_error: Option<ParseError> = None;

        if pending.iter().all(|i| self.parsers[*i].required.is_some()) {
            match self.all_absent(pending, tokens) {
                Ok(Some(parse)) => return Ok(parse),
                Ok(None) => {}
                Err(error) if error.is_help() => return Err(error),
                Err(error) => {
                    first_error.get_or_insert(error);
                }
            }
        }

        for (k, index) in pending.iter().enumerate() {
            #[cfg(feature = "tracing_debug")]
            {
                debug!(
                    "Trying parser #{index} ({:?}) of {pending:?} at position {}.",
                    self.parsers[*index],
                    tokens.position()
                );
            }

            let head = match self.parsers[*index].required_form().run(tokens) {
                Ok(head) => head,
                Err(error) if error.is_help() => return Err(error),
                Err(error) => {
                    first_error.get_or_insert(error);
                    continue;
                }
            };
            let head = match self.repeat(tokens.at(head.position)) {
                Ok(repeated) => head.then(repeated),
                Err(error) => return Err(error),
            };
            let rest: Vec<usize> = pending
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != k)
                .map(|(_, i)| *i)
                .collect();

            match self.permute(&rest, tokens.at(head.position)) {
                Ok(tail) => return Ok(head.then(tail)),
                Err(error) if error.is_help() => return Err(error),
                Err(error) => {
                    first_error.get_or_insert(error);
                }
            }
        }

        Err(first_error.unwrap_or_else(|| {
            unreachable!("internal error - a non-empty permutation must record an error")
        }))
    }

    /// When no pending parser matches here in its required form, apply them all in index order.
    /// `Ok(None)` means some pending parser does match here.
    fn all_absent(&self, pending: &[usize], tokens: Tokens<'_>) -> Result<Option<Parse>, ParseError> {
        for index in pending {
            match self.parsers[*index].required_form().run(tokens) {
                Ok(_) => return Ok(None),
                Err(error) if error.is_help() => return Err(error),
                Err(_) => {}
            }
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("None of {pending:?} match at position {}; applying defaults.", tokens.position());
        }

        let mut accumulated = Parse::empty(tokens.position());

        for index in pending {
            let parse = self.parsers[*index].run(tokens.at(accumulated.position))?;
            accumulated = accumulated.then(parse);
        }

        Ok(Some(accumulated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{argument, flag, option, Converter};
    use crate::model::{Mapping, Value};
    use crate::parser::primitive::matches;
    use rstest::rstest;

    fn int() -> Converter {
        Converter::parse::<i64>()
    }

    #[rstest]
    #[case(vec!["--y", "--x"])]
    #[case(vec!["--x", "--y"])]
    #[case(vec!["-x", "-y"])]
    fn order_independent(#[case] tokens: Vec<&str>) {
        // Setup
        let parser = nonpositional([flag("x"), flag("y")]);

        // Execute
        let result = parser.parse(tokens.as_slice());

        // Verify
        assert_eq!(result, Ok(Mapping::from([("x", true), ("y", true)])));
    }

    #[test]
    fn every_permutation() {
        // Setup
        let parser = nonpositional([
            option("a", int()),
            flag("bee"),
            option("c", int()),
            flag("dee"),
        ]);
        let groups: Vec<Vec<&str>> = vec![vec!["-a", "1"], vec!["--bee"], vec!["-c", "3"], vec!["--dee"]];
        let expected = Mapping::from([
            ("a", Value::from(1)),
            ("bee", Value::from(true)),
            ("c", Value::from(3)),
            ("dee", Value::from(true)),
        ]);

        // Execute & verify
        for permutation in permutations(&[0, 1, 2, 3]) {
            let tokens: Vec<&str> = permutation
                .iter()
                .flat_map(|i| groups[*i].iter().copied())
                .collect();
            assert_eq!(parser.parse(tokens.as_slice()), Ok(expected.clone()), "{tokens:?}");
        }
    }

    fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
        if items.is_empty() {
            return vec![vec![]];
        }

        let mut out = Vec::default();

        for (i, item) in items.iter().enumerate() {
            let mut rest = items.to_vec();
            rest.remove(i);

            for mut tail in permutations(&rest) {
                tail.insert(0, *item);
                out.push(tail);
            }
        }

        out
    }

    #[test]
    fn empty_group() {
        let parser = nonpositional([]);
        assert_eq!(parser.parse(&[]), Ok(Mapping::new()));
        assert_eq!(parser.usage().to_string(), "");
    }

    #[test]
    fn missing_required() {
        // Setup
        let parser = nonpositional([flag("x"), flag("y")]);

        // Execute
        let result = parser.parse(&["--x"]);

        // Verify
        assert_matches!(result, Err(ParseError::MissingArgument { position: 1, .. }));
    }

    #[test]
    fn first_error_reported() {
        // Setup
        let parser = nonpositional([flag("x"), flag("y")]);

        // Execute
        let result = parser.parse(&["--z"]);

        // Verify
        assert_eq!(
            result,
            Err(ParseError::UnexpectedToken {
                expected: Some("-x".to_string()),
                received: "--z".to_string(),
                position: 0,
            })
        );
    }

    #[rstest]
    #[case(vec![], Mapping::from([("a", false), ("b", false)]))]
    #[case(vec!["-a"], Mapping::from([("a", true), ("b", false)]))]
    #[case(vec!["-b"], Mapping::from([("a", false), ("b", true)]))]
    #[case(vec!["-b", "-a"], Mapping::from([("a", true), ("b", true)]))]
    fn optional_members(#[case] tokens: Vec<&str>, #[case] expected: Mapping) {
        // Setup
        let parser = nonpositional([
            flag("a").defaults([("a", false)]),
            flag("b").defaults([("b", false)]),
        ]);

        // Execute
        let result = parser.parse(tokens.as_slice());

        // Verify
        assert_eq!(result, Ok(expected));
    }

    #[test]
    fn optional_member_after_required() {
        // Setup
        let parser = nonpositional([
            option("x", int()).optional(),
            argument("y", int()),
        ]);

        // Execute & verify
        assert_eq!(parser.parse(&["5"]), Ok(Mapping::from([("y", 5)])));
        assert_eq!(
            parser.parse(&["5", "-x", "1"]),
            Ok(Mapping::from([("x", 1), ("y", 5)]))
        );
        assert_eq!(
            parser.parse(&["-x", "1", "5"]),
            Ok(Mapping::from([("x", 1), ("y", 5)]))
        );
    }

    #[test]
    fn tie_break_ascending_index() {
        // Both positionals accept any token; the lowest index claims the first token.
        let parser = nonpositional([argument("first", Converter::text()), argument("second", Converter::text())]);
        assert_eq!(
            parser.parse(&["a", "b"]),
            Ok(Mapping::from([("first", "a"), ("second", "b")]))
        );
    }

    #[test]
    fn repeated_anywhere() {
        // Setup
        let parser = Nonpositional::new([flag("x"), flag("y")])
            .repeated(flag("debug").ignore())
            .build();

        // Execute & verify
        assert_eq!(
            parser.parse(&["--debug", "--y", "--debug", "--debug", "--x", "--debug"]),
            Ok(Mapping::from([("x", true), ("y", true)]))
        );
        assert_eq!(parser.usage().to_string(), "-x -y [--debug ...]");
    }

    #[test]
    fn help_propagates() {
        // Setup
        let inner = matches("sub") >> flag("z").wrap_help();
        let parser = nonpositional([flag("x"), inner]);
        let config = crate::ParseConfig::default().check_help(false);

        // Execute
        let result = parser.parse_args(&["sub", "-h"], &config);

        // Verify
        assert_matches!(result, Err(ParseError::HelpRequested { usage, .. }) => {
            assert_eq!(usage.to_string(), "-z");
        });
    }
}
