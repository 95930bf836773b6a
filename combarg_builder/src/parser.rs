mod base;
mod combinator;
mod interface;
mod middleware;
mod permutation;
mod primitive;
mod printer;
mod usage;

pub use base::{ConfigError, ParseConfig, ParseError, Parser};
pub(crate) use base::{Parse, Tokens};
pub(crate) use interface::{ConsoleInterface, UserInterface};
pub use middleware::{Exit, GeneralParser};
pub use permutation::{nonpositional, Nonpositional};
pub use primitive::{defaults, done, empty, item, matches, peek, zero};
pub(crate) use primitive::{help_check, placeholder};
pub(crate) use printer::Printer;
pub use usage::{Helps, Usage};

#[cfg(test)]
pub(crate) use interface::util;
