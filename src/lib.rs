//! `combarg` is a declarative command line parser for Rust, assembled from parser combinators.
//!
//! Rather than configuring a parser object parameter by parameter, a `combarg` command line is an *expression*.
//! Small parsers (a flag, an option, a positional argument) are combined with operators into larger parsers, and the result is both the parser and its documentation:
//! * *Composable*:
//! Every combinator takes parsers and returns a parser, so any fragment of a command line can be named, reused and tested alone.
//! * *Self documenting*:
//! The usage line is synthesized from the structure of the parser, so it can not drift from what the parser accepts.
//! * *Order independent where it matters*:
//! Options may be given in any order via [`nonpositional`], without giving up the determinism of the parse.
//! * *Plain output*:
//! A successful parse produces a nested [`Mapping`] of [`Value`]s, keyed by parameter name.
//!
//! # Usage
//! This page includes a few demos on using `combarg`.
//!
//! A sequence of one or more integers:
//! ```no_run
#![doc = include_str!("../demos/demo_sequence.rs")]
//! ```
//!
//! ```console
//! $ summer -h
//! usage: summer ITEM [ITEM ...]
//!
//! Sum a sequence of integers.
//!
//! positional arguments:
//!  ITEM         The items to sum.
//!
//! options:
//!  --help, -h   Show this help message and exit.
//!
//! $ summer 1 2 3
//! Sum: 6
//!
//! $ summer 1 blah
//! usage: summer ITEM [ITEM ...]
//! Unrecognized argument: blah
//! 1 blah
//!   ^
//! ```
//!
//! # Combinators
//! The leaf parsers are [`flag`], [`option`] and [`argument`] (or their builders [`Flag`], [`Opt`] and [`Argument`]).
//! They combine as follows, where `p` and `q` are any [`Parser`]s:
//! ```console
//! Expression        | Accepts                                   | Usage
//! -------------------------------------------------------------------------------
//! p >> q            | p, then q                                 | P Q
//! p | q             | p, or else q (the first to succeed wins)  | P | Q
//! p ^ q             | exactly one of p and q                    | P | Q
//! p + q             | p then q, or q then p                     | P Q
//! p.many()          | p zero or more times                      | [P ...]
//! p.many1()         | p one or more times                       | P [P ...]
//! p.optional()      | p, or nothing                             | [P]
//! p.defaults(..)    | p, or else the preset bindings            | [P]
//! p.ignore()        | p, discarding its bindings                | P
//! nonpositional(..) | every parser once, in any order           | P Q .. (one per line beyond 3)
//! done()            | the end of the input                      |
//! ```
//!
//! A parser is run directly with [`Parser::parse`], or wrapped in a [`CommandLineParser`] to handle help and errors for a program.
//!
//! ```no_run
#![doc = include_str!("../demos/demo_nonpositional.rs")]
//! ```
//!
//! ```console
//! $ greeter -h
//! usage: greeter
//!        [--verbose]
//!        [--count COUNT]
//!        [--style {plain,loud}]
//!        NAME
//!
//! Greet someone; the parameters may come in any order.
//!
//! options:
//!  --help, -h                 Show this help message and exit.
//!  --verbose, -v              Describe each greeting. (default: false)
//!  --count, -c COUNT          How many greetings. (default: 1)
//!  --style, -s {plain,loud}   (default: plain)
//!
//! $ greeter --count 2 alice -v
//! [1/2] Hello alice.
//! [2/2] Hello alice.
//! ```
//!
//! # Bindings
//! Every leaf binds its value under its name.
//! Names containing a `.` nest (`--cfg.level 2` binds `{cfg: {level: 2}}`), and a name bound repeatedly collects into a list.
//! Flags bind `true` when present; a flag with `default(true)` binds `false` when present.
//!
//! # Commands
//! A [`CommandTree`] selects one of several handlers by the parse that succeeds.
//! A [`Command::command`] is selected when its own parser matches (ex: a flag), and a [`Command::subcommand`] is selected by a leading keyword.
//! Children are tried in the order they are added, before running their parent alone.
//!
//! ```no_run
#![doc = include_str!("../demos/demo_command_tree.rs")]
//! ```
//!
//! ```console
//! $ todo --all
//! Listing every item.
//!
//! $ todo add milk
//! Added 'milk'.
//!
//! $ todo done -h
//! usage: todo done INDEX
//!
//! Track the things to do.
//!
//! options:
//!  --help, -h   Show this help message and exit.
//! ```
//!
//! # Schemas
//! A record of named fields is described with a [`Schema`] (or derived, see the [derive Api](./derive/index.html)).
//! Its fields are accepted in any order, flags defaulting to `true` are spelled `--no-name`, and a prefix nests every field.
//!
//! # Features
//! * `unit_test`: For features that help with unit testing.
//! * `tracing_debug`: Emit `tracing` debug events from the parser internals.
pub mod derive;
pub use combarg_builder::*;
