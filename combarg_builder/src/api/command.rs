use std::collections::HashSet;
use std::env;

use crate::model::Mapping;
use crate::parser::{
    done, empty, help_check, matches, ConfigError, ConsoleInterface, Exit, GeneralParser, Helps,
    ParseConfig, Parser, Printer, Usage, UserInterface,
};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// How a command is selected relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    /// Selected when its own parser matches, after its parent's parser.
    Command,
    /// Selected by its name as a leading keyword, ex: `program add ...`.
    Subcommand,
}

/// A node of a [`CommandTree`]: a named parser along with the handler to dispatch to.
///
/// The handler `H` is opaque to the tree; typically it is a function `Fn(Mapping) -> R`.
pub struct Command<H> {
    name: String,
    parser: Parser,
    handler: H,
    kind: DispatchKind,
    can_run: bool,
    help: Option<String>,
    children: Vec<Command<H>>,
}

impl<H> Command<H> {
    fn new(name: impl Into<String>, parser: impl Into<Parser>, handler: H, kind: DispatchKind) -> Self {
        Self {
            name: name.into(),
            parser: parser.into(),
            handler,
            kind,
            can_run: true,
            help: None,
            children: Vec::default(),
        }
    }

    /// A command selected when its `parser` matches.
    ///
    /// As a child, the parent's parser must match first.
    /// Children are tried in the order they are added, before running the parent alone.
    pub fn command(name: impl Into<String>, parser: impl Into<Parser>, handler: H) -> Self {
        Self::new(name, parser, handler, DispatchKind::Command)
    }

    /// A command selected by the keyword `name`, followed by its `parser`.
    pub fn subcommand(name: impl Into<String>, parser: impl Into<Parser>, handler: H) -> Self {
        Self::new(name, parser, handler, DispatchKind::Subcommand)
    }

    /// Add a child command.
    pub fn child(mut self, child: Command<H>) -> Self {
        self.children.push(child);
        self
    }

    /// Whether this command may run without one of its children (default `true`).
    pub fn can_run(mut self, enabled: bool) -> Self {
        self.can_run = enabled;
        self
    }

    /// Document this command, shown in its parent's help.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    /// *Available using 'unit_test' crate feature only.*</br></br>
    /// Build a [`GeneralParser`] of this command (and its children) for testing.
    ///
    /// ### Example
    /// ```
    /// # use combarg_builder as combarg;
    /// use combarg::{flag, Command, Mapping};
    ///
    /// let command = Command::subcommand("add", flag("all"), ());
    /// let parser = command.build_parser().unwrap();
    /// assert_eq!(parser.parse_tokens(&["add", "--all"]), Ok(Mapping::from([("all", true)])));
    /// ```
    #[cfg(feature = "unit_test")]
    pub fn build_parser(self) -> Result<GeneralParser, ConfigError> {
        CommandTree::new("test-dummy")
            .add(self)
            .build_with_interface(Box::new(ConsoleInterface::default()))
            .map(|dispatcher| dispatcher.general_parser)
    }
}

struct Node<H> {
    path: Vec<String>,
    handler: H,
}

fn alternatives(parsers: Vec<Parser>) -> Option<Parser> {
    parsers.into_iter().reduce(Parser::or)
}

fn check_siblings<H>(commands: &[Command<H>]) -> Result<(), ConfigError> {
    let mut names = HashSet::new();

    for command in commands {
        if command.name.is_empty() {
            return Err(ConfigError("command names cannot be empty.".to_string()));
        }

        if !names.insert(command.name.as_str()) {
            return Err(ConfigError(format!(
                "Cannot duplicate the command '{}'.",
                command.name
            )));
        }
    }

    Ok(())
}

/// Compile `command` into its parser, recording it (and its descendants) in `nodes`.
///
/// Unless `allow_unparsed`, a command only runs once the input is exhausted.
fn compile<H>(
    command: Command<H>,
    parent_path: &[String],
    nodes: &mut Vec<Node<H>>,
    allow_unparsed: bool,
) -> Result<Parser, ConfigError> {
    let Command {
        name,
        parser,
        handler,
        kind,
        can_run,
        help: _,
        children,
    } = command;
    check_siblings(&children)?;

    if children.is_empty() && !can_run {
        return Err(ConfigError(format!(
            "command '{name}' cannot run and has no sub-commands."
        )));
    }

    let mut path = parent_path.to_vec();
    path.push(name.clone());
    let id = nodes.len();
    nodes.push(Node {
        path: path.clone(),
        handler,
    });

    let child_helps = children
        .iter()
        .filter_map(|child| child.help.as_ref().map(|help| Helps::single(&child.name, help)))
        .fold(Helps::default(), |helps, single| helps.merge(&single));
    let mut child_parsers = Vec::default();

    for child in children {
        child_parsers.push(compile(child, &path, nodes, allow_unparsed)?);
    }

    let end = || if allow_unparsed { empty() } else { done() };
    let rest = match (alternatives(child_parsers), can_run) {
        (Some(children), true) => children | end(),
        (Some(children), false) => children,
        (None, _) => end(),
    };
    let body = parser.select(id) >> rest;
    let helps = body.helps.clone().merge(&child_helps);
    let body = body.with_helps(helps);

    Ok(match kind {
        DispatchKind::Command => body,
        DispatchKind::Subcommand => {
            let usage = Usage::sequence(Usage::Literal(name.clone()), body.usage.clone());
            let scoped = help_check(usage, body.helps.clone());
            let helps = body.helps.clone();
            (matches(name) >> scoped >> body).with_helps(helps)
        }
    })
}

/// A tree of [`Command`]s, compiled into a single parser that selects the most specific matching command.
///
/// ### Example
/// ```
/// # use combarg_builder as combarg;
/// use combarg::{argument, empty, flag, Command, CommandTree, Converter, Mapping};
///
/// let dispatcher = CommandTree::new("todo")
///     .add(
///         Command::command("todo", empty(), "list")
///             .child(Command::subcommand("add", argument("item", Converter::text()), "add"))
///             .child(Command::subcommand("done", flag("all"), "done")),
///     )
///     .build();
///
/// let dispatch = dispatcher.parse_tokens(&["add", "milk"]).unwrap();
/// assert_eq!(*dispatch.handler(), "add");
/// assert_eq!(dispatch.path(), &["todo".to_string(), "add".to_string()]);
/// assert_eq!(dispatch.bindings(), &Mapping::from([("item", "milk")]));
///
/// let dispatch = dispatcher.parse_tokens(&[]).unwrap();
/// assert_eq!(*dispatch.handler(), "list");
/// ```
pub struct CommandTree<H> {
    program: String,
    about: Option<String>,
    roots: Vec<Command<H>>,
    config: ParseConfig,
}

impl<H> CommandTree<H> {
    /// Create an empty command tree for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            about: None,
            roots: Vec::default(),
            config: ParseConfig::default(),
        }
    }

    /// Add a root command.
    /// Roots are tried in the order they are added.
    pub fn add(mut self, root: Command<H>) -> Self {
        self.roots.push(root);
        self
    }

    /// Document the about message for the program.
    /// If repeated, only the final message will apply.
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
    /// Help after a sub-command keyword is recognized either way.
    pub fn check_help(mut self, check: bool) -> Self {
        self.config = self.config.check_help(check);
        self
    }

    /// Replace the help tokens (default `--help` and `-h`), including those recognized after a sub-command keyword.
    pub fn help_tokens<S: Into<String>>(mut self, tokens: impl IntoIterator<Item = S>) -> Self {
        self.config = self.config.help_tokens(tokens);
        self
    }

    pub(crate) fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<Dispatcher<H>, ConfigError> {
        let CommandTree {
            program,
            about,
            roots,
            config,
        } = self;

        if program.is_empty() {
            return Err(ConfigError("program name cannot be empty.".to_string()));
        }

        if roots.is_empty() {
            return Err(ConfigError(
                "a command tree requires at least one command.".to_string(),
            ));
        }

        if config.check_help && config.help_tokens.is_empty() {
            return Err(ConfigError(
                "help tokens cannot be empty when checking for help.".to_string(),
            ));
        }

        check_siblings(&roots)?;
        let mut nodes = Vec::default();
        let mut parsers = Vec::default();

        for root in roots {
            parsers.push(compile(root, &[], &mut nodes, config.allow_unparsed)?);
        }

        let parser = match alternatives(parsers) {
            Some(parser) => parser,
            None => unreachable!("internal error - a non-empty tree must compile"),
        };
        let printer = Printer::terminal(program, about, config.help_tokens.clone());

        Ok(Dispatcher {
            general_parser: GeneralParser::new(parser, config, printer, user_interface),
            nodes,
        })
    }

    /// Build the dispatcher as a Result.
    /// This finalizes the configuration and checks for errors (ex: duplicate sibling command names).
    pub fn build_dispatcher(self) -> Result<Dispatcher<H>, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the dispatcher.
    /// This finalizes the configuration and checks for errors (ex: duplicate sibling command names).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> Dispatcher<H> {
        match self.build_dispatcher() {
            Ok(dispatcher) => dispatcher,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

/// The selected command of a successful dispatch.
#[derive(Debug)]
pub struct Dispatch<'d, H> {
    path: &'d [String],
    handler: &'d H,
    bindings: Mapping,
}

impl<'d, H> Dispatch<'d, H> {
    /// The command names from the root to the selected command.
    pub fn path(&self) -> &'d [String] {
        self.path
    }

    /// The handler of the selected command.
    pub fn handler(&self) -> &'d H {
        self.handler
    }

    /// The bindings accumulated along the path.
    pub fn bindings(&self) -> &Mapping {
        &self.bindings
    }

    /// Take the bindings.
    pub fn into_bindings(self) -> Mapping {
        self.bindings
    }
}

/// The compiled [`CommandTree`].
pub struct Dispatcher<H> {
    general_parser: GeneralParser,
    nodes: Vec<Node<H>>,
}

impl<H> std::fmt::Debug for Dispatcher<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("general_parser", &self.general_parser)
            .field(
                "paths",
                &self.nodes.iter().map(|node| &node.path).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<H> Dispatcher<H> {
    /// Select the command matching the input tokens.
    ///
    /// Help and errors are printed as with [`GeneralParser::parse_tokens`].
    pub fn parse_tokens(&self, tokens: &[&str]) -> Result<Dispatch<'_, H>, Exit> {
        let parse = self.general_parser.invoke(tokens)?;
        let node = match parse.selected.and_then(|id| self.nodes.get(id)) {
            Some(node) => node,
            None => unreachable!("internal error - a successful dispatch must select a command"),
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Dispatching to {:?}.", node.path);
        }

        Ok(Dispatch {
            path: &node.path,
            handler: &node.handler,
            bindings: parse.bindings.to_mapping(),
        })
    }

    /// Select the command matching the program arguments (from [`std::env::args`]).
    ///
    /// If the parse does not succeed, exits with the code of its [`Exit`] (via [`std::process::exit`]).
    pub fn parse(&self) -> Dispatch<'_, H> {
        let command_input: Vec<String> = env::args().skip(1).collect();

        match self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(dispatch) => dispatch,
            Err(exit) => std::process::exit(exit.code()),
        }
    }

    /// Select the command matching the input tokens, and invoke its handler with the bindings.
    pub fn run_tokens<R>(&self, tokens: &[&str]) -> Result<R, Exit>
    where
        H: Fn(Mapping) -> R,
    {
        self.parse_tokens(tokens)
            .map(|dispatch| (dispatch.handler)(dispatch.bindings))
    }

    /// Select the command matching the program arguments, and invoke its handler with the bindings.
    ///
    /// If the parse does not succeed, exits with the code of its [`Exit`] (via [`std::process::exit`]).
    pub fn run<R>(&self) -> R
    where
        H: Fn(Mapping) -> R,
    {
        let dispatch = self.parse();
        (dispatch.handler)(dispatch.bindings)
    }
}
