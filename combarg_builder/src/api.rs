mod command;
mod convert;
mod core;
mod parameter;
mod schema;

pub use self::core::*;
pub use command::*;
pub use convert::*;
pub use parameter::*;
pub use schema::*;
