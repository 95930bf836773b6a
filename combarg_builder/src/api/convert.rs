use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

use crate::model::Value;

/// The failure of a [`Converter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidConversion {
    /// The token does not parse as the target type.
    #[error("cannot convert '{token}' to {type_name}.")]
    InvalidType {
        /// The rejected token.
        token: String,
        /// The name of the target type.
        type_name: String,
    },
    /// The token parses, but the value is not acceptable.
    #[error("invalid value '{token}': {message}.")]
    InvalidValue {
        /// The rejected token.
        token: String,
        /// Why the value was rejected.
        message: String,
    },
}

/// Converts a single token into a [`Value`].
///
/// Supplied per option/argument; the combinators only rely on the `&str -> Value` contract.
#[derive(Clone)]
pub struct Converter {
    type_name: String,
    convert: Rc<dyn Fn(&str) -> Result<Value, InvalidConversion>>,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Converter[{}]", self.type_name)
    }
}

impl Converter {
    /// Keep the token as text.
    pub fn text() -> Self {
        Self::new("String", |token| Ok(Value::from(token)))
    }

    /// Convert via [`FromStr`].
    ///
    /// ### Example
    /// ```
    /// # use combarg_builder as combarg;
    /// use combarg::{Converter, Value};
    ///
    /// let converter = Converter::parse::<i64>();
    /// assert_eq!(converter.convert("12"), Ok(Value::from(12)));
    /// assert!(converter.convert("twelve").is_err());
    /// ```
    pub fn parse<T>() -> Self
    where
        T: FromStr + Into<Value>,
    {
        let type_name = std::any::type_name::<T>();
        Self::new(type_name, move |token| match T::from_str(token) {
            Ok(value) => Ok(value.into()),
            Err(_) => Err(InvalidConversion::InvalidType {
                token: token.to_string(),
                type_name: type_name.to_string(),
            }),
        })
    }

    /// Convert with a custom function.
    pub fn new(
        type_name: impl Into<String>,
        convert: impl Fn(&str) -> Result<Value, InvalidConversion> + 'static,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            convert: Rc::new(convert),
        }
    }

    /// The name of the type this converter produces.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Convert a token.
    pub fn convert(&self, token: &str) -> Result<Value, InvalidConversion> {
        (self.convert)(token)
    }
}
