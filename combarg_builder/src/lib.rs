//! Builder module for `combarg`.
//! See [documentation root](https://docs.rs/combarg/latest/combarg/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod model;
mod parser;
pub mod prelude;

pub use api::*;
pub use model::*;
pub use parser::{
    defaults, done, empty, item, matches, nonpositional, peek, zero, ConfigError, Exit,
    GeneralParser, Helps, Nonpositional, ParseConfig, ParseError, Parser, Usage,
};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
