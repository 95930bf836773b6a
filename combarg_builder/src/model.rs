use crate::constant::NESTING_DELIMITER;

/// A leaf value bound by a parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A boolean, typically bound by a flag.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// Text, either unconverted or converted from a `String`.
    Text(String),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Int(value) => write!(f, "{value}"),
            Scalar::Float(value) => write!(f, "{value}"),
            Scalar::Text(value) => write!(f, "{value}"),
        }
    }
}

/// The output of a parse.
///
/// Leaves are [`Scalar`]s.
/// Repeated keys collect into a `List` (in encounter order), and dot-delimited keys nest into a `Mapping`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single leaf value.
    Scalar(Scalar),
    /// Values collected by repetition (or `nargs`).
    List(Vec<Value>),
    /// Values nested under a dot-delimited key.
    Mapping(Mapping),
}

impl Value {
    /// The boolean of a `Scalar::Bool`, otherwise `None`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Scalar(Scalar::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    /// The integer of a `Scalar::Int`, otherwise `None`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Int(value)) => Some(*value),
            _ => None,
        }
    }

    /// The number of a `Scalar::Float` (or `Scalar::Int`), otherwise `None`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Scalar(Scalar::Float(value)) => Some(*value),
            Value::Scalar(Scalar::Int(value)) => Some(*value as f64),
            _ => None,
        }
    }

    /// The text of a `Scalar::Text`, otherwise `None`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// The items of a `List`, otherwise `None`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// The nested `Mapping`, otherwise `None`.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Scalar(scalar) => write!(f, "{scalar}"),
            Value::List(values) => write!(
                f,
                "[{}]",
                values
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<String>>()
                    .join(", ")
            ),
            Value::Mapping(mapping) => write!(f, "{mapping}"),
        }
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Scalar(Scalar::Int(i64::from(value)))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

// Saturates at `i64::MAX`.
macro_rules! value_from_wide_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Scalar(Scalar::Int(i64::try_from(value).unwrap_or(i64::MAX)))
                }
            }
        )*
    };
}

value_from_wide_int!(isize, u64, usize);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Scalar(Scalar::Float(f64::from(value)))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(Scalar::Float(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Scalar(Scalar::Bool(value))
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Scalar(Scalar::Text(value.to_string()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(Scalar::Text(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(Scalar::Text(value.to_string()))
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Scalar(value)
    }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self {
        Value::Mapping(value)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(value: Vec<V>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

/// An insertion ordered mapping from keys to [`Value`]s.
///
/// Equality ignores the insertion order.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<(String, Value)>,
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl Mapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the value it replaced (if any).
    /// A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| k == &key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Get the value directly under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Get the value under a dot-delimited `path`, walking nested mappings.
    ///
    /// ### Example
    /// ```
    /// # use combarg_builder as combarg;
    /// use combarg::{Mapping, Value};
    ///
    /// let inner = Mapping::from([("b", 1)]);
    /// let mapping = Mapping::from([("a", Value::Mapping(inner))]);
    /// assert_eq!(mapping.get_path("a.b"), Some(&Value::from(1)));
    /// assert_eq!(mapping.get_path("a.c"), None);
    /// ```
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split(NESTING_DELIMITER);
        let mut current = self.get(parts.next()?)?;

        for part in parts {
            current = current.as_mapping()?.get(part)?;
        }

        Some(current)
    }

    /// Whether `key` is directly present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The number of top level keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate the top level entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten nested mappings into dot-delimited keys.
    /// Lists are left intact, even if they contain mappings.
    pub fn flatten(&self) -> Vec<(String, Value)> {
        let mut out = Vec::default();

        for (key, value) in &self.entries {
            match value {
                Value::Mapping(inner) => {
                    for (inner_key, inner_value) in inner.flatten() {
                        out.push((format!("{key}{NESTING_DELIMITER}{inner_key}"), inner_value));
                    }
                }
                _ => out.push((key.clone(), value.clone())),
            }
        }

        out
    }
}

impl std::fmt::Display for Mapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.entries
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Mapping::default();

        for (key, value) in iter {
            mapping.insert(key, value);
        }

        mapping
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Mapping {
    fn from(value: [(K, V); N]) -> Self {
        value.into_iter().collect()
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A single key/value pair produced by a parser.
///
/// The key is stored as a path; with nesting enabled `"a.b"` becomes `["a", "b"]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    path: Vec<String>,
    value: Value,
}

impl Binding {
    /// Create a binding, splitting `key` on `.` when `nesting` is enabled.
    pub fn new(key: &str, value: impl Into<Value>, nesting: bool) -> Self {
        let path = if nesting {
            key.split(NESTING_DELIMITER).map(str::to_string).collect()
        } else {
            vec![key.to_string()]
        };

        Self {
            path,
            value: value.into(),
        }
    }

    /// The dot-joined key.
    pub fn key(&self) -> String {
        self.path.join(&NESTING_DELIMITER.to_string())
    }

    /// The key path.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The bound value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Replace the bound value, keeping the key.
    pub fn with_value(self, value: impl Into<Value>) -> Self {
        Self {
            path: self.path,
            value: value.into(),
        }
    }

    /// Nest this binding under the dot-delimited `prefix`.
    pub fn prefixed(self, prefix: &str) -> Self {
        let mut path: Vec<String> = prefix.split(NESTING_DELIMITER).map(str::to_string).collect();
        path.extend(self.path);
        Self {
            path,
            value: self.value,
        }
    }
}

/// The ordered sequence of [`Binding`]s accumulated during a parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings(Vec<Binding>);

impl Bindings {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sequence of one binding.
    pub fn single(key: &str, value: impl Into<Value>, nesting: bool) -> Self {
        Self(vec![Binding::new(key, value, nesting)])
    }

    /// Add a binding at the end.
    pub fn push(&mut self, binding: Binding) {
        self.0.push(binding);
    }

    /// Move all of `other`'s bindings to the end.
    pub fn append(&mut self, mut other: Bindings) {
        self.0.append(&mut other.0);
    }

    /// The number of bindings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the bindings in order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.0.iter()
    }

    /// The most recent binding.
    pub fn last(&self) -> Option<&Binding> {
        self.0.last()
    }

    /// Remove and return the most recent binding.
    pub fn pop(&mut self) -> Option<Binding> {
        self.0.pop()
    }

    /// Assemble the bindings into a nested [`Mapping`].
    ///
    /// * A key bound once maps to its value.
    /// * A key bound repeatedly maps to a `List`, in encounter order.
    /// * Paths sharing a prefix nest into a `Mapping`.
    /// * A key that is both a leaf and a prefix maps to a `List` of the leaves followed by the nested `Mapping`.
    ///
    /// ### Example
    /// ```
    /// # use combarg_builder as combarg;
    /// use combarg::{Bindings, Mapping, Value};
    ///
    /// let mut bindings = Bindings::single("x", 1, true);
    /// bindings.append(Bindings::single("x", 2, true));
    /// bindings.append(Bindings::single("a.b", true, true));
    ///
    /// assert_eq!(
    ///     bindings.to_mapping(),
    ///     Mapping::from([
    ///         ("x", Value::from(vec![1, 2])),
    ///         ("a", Value::Mapping(Mapping::from([("b", true)]))),
    ///     ])
    /// );
    /// ```
    pub fn to_mapping(&self) -> Mapping {
        assemble(self.0.iter().map(|b| (b.path.as_slice(), &b.value)))
    }
}

fn assemble<'b>(bindings: impl Iterator<Item = (&'b [String], &'b Value)>) -> Mapping {
    let mut groups: Vec<(String, Vec<&Value>, Vec<(&[String], &Value)>)> = Vec::default();

    for (path, value) in bindings {
        let Some((head, rest)) = path.split_first() else {
            continue;
        };
        let index = match groups.iter().position(|(key, _, _)| key == head) {
            Some(index) => index,
            None => {
                groups.push((head.clone(), Vec::default(), Vec::default()));
                groups.len() - 1
            }
        };

        if rest.is_empty() {
            groups[index].1.push(value);
        } else {
            groups[index].2.push((rest, value));
        }
    }

    groups
        .into_iter()
        .map(|(key, leaves, nested)| {
            let value = if nested.is_empty() {
                if leaves.len() == 1 {
                    leaves[0].clone()
                } else {
                    Value::List(leaves.into_iter().cloned().collect())
                }
            } else if leaves.is_empty() {
                Value::Mapping(assemble(nested.into_iter()))
            } else {
                let mut items: Vec<Value> = leaves.into_iter().cloned().collect();
                items.push(Value::Mapping(assemble(nested.into_iter())));
                Value::List(items)
            };
            (key, value)
        })
        .collect()
}

impl IntoIterator for Bindings {
    type Item = Binding;
    type IntoIter = std::vec::IntoIter<Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<Binding> for Bindings {
    fn from_iter<I: IntoIterator<Item = Binding>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// Keys are nested, matching the parameter builders' default.
impl<V: Into<Value>, const N: usize> From<[(&str, V); N]> for Bindings {
    fn from(value: [(&str, V); N]) -> Self {
        value
            .into_iter()
            .map(|(key, v)| Binding::new(key, v, true))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn bindings(pairs: Vec<(&str, Value)>) -> Bindings {
        pairs
            .into_iter()
            .map(|(key, value)| Binding::new(key, value, true))
            .collect()
    }

    #[test]
    fn to_mapping_empty() {
        assert_eq!(Bindings::new().to_mapping(), Mapping::new());
    }

    #[test]
    fn to_mapping_repeated() {
        // Setup
        let bindings = bindings(vec![
            ("x", Value::from(1)),
            ("y", Value::from("a")),
            ("x", Value::from(2)),
            ("x", Value::from(3)),
        ]);

        // Execute
        let mapping = bindings.to_mapping();

        // Verify
        assert_eq!(
            mapping,
            Mapping::from([("x", Value::from(vec![1, 2, 3])), ("y", Value::from("a"))])
        );
        assert_eq!(
            mapping.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["x", "y"]
        );
    }

    #[test]
    fn to_mapping_nested() {
        // Setup
        let bindings = bindings(vec![
            ("a.b.c", Value::from(true)),
            ("a.d", Value::from(1)),
            ("a.b.e", Value::from(2.5)),
        ]);

        // Execute
        let mapping = bindings.to_mapping();

        // Verify
        let b = Mapping::from([("c", Value::from(true)), ("e", Value::from(2.5))]);
        let a = Mapping::from([("b", Value::Mapping(b)), ("d", Value::from(1))]);
        assert_eq!(mapping, Mapping::from([("a", Value::Mapping(a))]));
    }

    #[test]
    fn to_mapping_leaf_and_nested() {
        // Setup
        let bindings = bindings(vec![
            ("a", Value::from(1)),
            ("a.b", Value::from(2)),
            ("a", Value::from(3)),
        ]);

        // Execute
        let mapping = bindings.to_mapping();

        // Verify
        assert_eq!(
            mapping,
            Mapping::from([(
                "a",
                Value::List(vec![
                    Value::from(1),
                    Value::from(3),
                    Value::Mapping(Mapping::from([("b", 2)])),
                ])
            )])
        );
    }

    #[test]
    fn to_mapping_without_nesting() {
        // Setup
        let bindings: Bindings = vec![Binding::new("a.b", 1, false)].into_iter().collect();

        // Execute
        let mapping = bindings.to_mapping();

        // Verify
        assert_eq!(mapping, Mapping::from([("a.b", 1)]));
        assert_eq!(mapping.get_path("a.b"), None);
    }

    #[rstest]
    #[case("a")]
    #[case("a.b")]
    #[case("a.b.c")]
    #[case("config.server.port")]
    fn nesting_round_trip(#[case] key: &str) {
        // Setup
        let bindings = Bindings::single(key, 7, true);

        // Execute
        let mapping = bindings.to_mapping();

        // Verify
        assert_eq!(mapping.get_path(key), Some(&Value::from(7)));
        assert_eq!(mapping.flatten(), vec![(key.to_string(), Value::from(7))]);
    }

    #[test]
    fn mapping_equality_ignores_order() {
        let left = Mapping::from([("a", 1), ("b", 2)]);
        let right = Mapping::from([("b", 2), ("a", 1)]);
        assert_eq!(left, right);
        assert_ne!(left, Mapping::from([("a", 1)]));
        assert_ne!(left, Mapping::from([("a", 1), ("b", 3)]));
    }

    #[test]
    fn mapping_insert_replaces() {
        let mut mapping = Mapping::from([("a", 1), ("b", 2)]);
        assert_eq!(mapping.insert("a", 3), Some(Value::from(1)));
        assert_eq!(mapping.insert("c", 4), None);
        assert_eq!(
            mapping.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        assert_eq!(mapping.get("a"), Some(&Value::from(3)));
    }

    #[rstest]
    #[case(Value::from(true), "true")]
    #[case(Value::from(-3), "-3")]
    #[case(Value::from(1.5), "1.5")]
    #[case(Value::from("abc"), "abc")]
    #[case(Value::from(vec![1, 2]), "[1, 2]")]
    #[case(Value::Mapping(Mapping::from([("a", 1), ("b", 2)])), "{a: 1, b: 2}")]
    fn value_display(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[test]
    fn value_accessors() {
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(2).as_int(), Some(2));
        assert_eq!(Value::from(2).as_float(), Some(2.0));
        assert_eq!(Value::from("x").as_text(), Some("x"));
        assert_eq!(Value::from("x").as_int(), None);
        assert_eq!(
            Value::from(vec!["a"]).as_list(),
            Some([Value::from("a")].as_slice())
        );
        assert_matches!(Value::Mapping(Mapping::new()).as_mapping(), Some(m) if m.is_empty());
    }
}
