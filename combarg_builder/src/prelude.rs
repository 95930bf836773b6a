//! The primitives and combinators which, typically, may be imported without concern: `use combarg::prelude::*`.

pub use crate::api::{argument, flag, option, Args, Converter};
pub use crate::model::{Mapping, Value};
pub use crate::parser::{defaults, done, empty, item, matches, nonpositional, peek, zero, Parser};
