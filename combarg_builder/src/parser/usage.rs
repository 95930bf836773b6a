/// The structural shape of a parser, rendered into usage text.
///
/// Every combinator builds its usage from its operands' usages, so the rendering never depends on running the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Usage {
    /// Renders nothing (ex: `done`, `empty`).
    Empty,
    /// A flag spelling, ex: `--verbose`.
    Flag(String),
    /// An option spelling and its value placeholders, ex: `--count COUNT`.
    Option {
        /// The option spelling.
        flag: String,
        /// The placeholder(s) for the value(s).
        value: String,
    },
    /// A positional placeholder, ex: `NAME`.
    Positional(String),
    /// An exact keyword, ex: a sub-command name.
    Literal(String),
    /// Parts applied left to right.
    Sequence(Vec<Usage>),
    /// Left-biased alternatives.
    Choice(Vec<Usage>),
    /// Alternatives of which exactly one may match.
    Exclusive(Vec<Usage>),
    /// May be absent.
    Optional(Box<Usage>),
    /// Zero or more repetitions.
    Many(Box<Usage>),
    /// One or more repetitions.
    Many1(Box<Usage>),
    /// Two parts in either order.
    Unordered(Box<Usage>, Box<Usage>),
    /// Parts in any order, rendered one per line (ex: a large `nonpositional` group).
    Lines(Vec<Usage>),
}

// Unordered groups with more members than this render one member per line.
const MAX_INLINE_MEMBERS: usize = 3;

impl Usage {
    pub(crate) fn sequence(left: Usage, right: Usage) -> Usage {
        let mut parts = Vec::default();

        for usage in [left, right] {
            match usage {
                Usage::Empty => {}
                Usage::Sequence(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }

        match parts.len() {
            0 => Usage::Empty,
            1 => parts.remove(0),
            _ => Usage::Sequence(parts),
        }
    }

    pub(crate) fn sequence_of(usages: impl IntoIterator<Item = Usage>) -> Usage {
        usages.into_iter().fold(Usage::Empty, Usage::sequence)
    }

    pub(crate) fn choice(left: Usage, right: Usage) -> Usage {
        // Alternation associates left to right, so only the left side flattens.
        match left {
            Usage::Choice(mut alternatives) => {
                alternatives.push(right);
                Usage::Choice(alternatives)
            }
            other => Usage::Choice(vec![other, right]),
        }
    }

    pub(crate) fn exclusive(left: Usage, right: Usage) -> Usage {
        match left {
            Usage::Exclusive(mut alternatives) => {
                alternatives.push(right);
                Usage::Exclusive(alternatives)
            }
            other => Usage::Exclusive(vec![other, right]),
        }
    }

    /// The usage of parts accepted in any order.
    pub(crate) fn unordered_of(usages: Vec<Usage>) -> Usage {
        if usages.len() > MAX_INLINE_MEMBERS {
            Usage::Lines(usages)
        } else {
            Usage::sequence_of(usages)
        }
    }

    pub(crate) fn optional(inner: Usage) -> Usage {
        match inner {
            Usage::Empty => Usage::Empty,
            other => Usage::Optional(Box::new(other)),
        }
    }

    /// Whether this usage renders as nothing.
    pub fn is_empty(&self) -> bool {
        self.to_string().is_empty()
    }
}

fn render_parts(f: &mut std::fmt::Formatter<'_>, parts: &[Usage], separator: &str) -> std::fmt::Result {
    let rendered = parts
        .iter()
        .map(|p| p.to_string())
        .filter(|p| !p.is_empty())
        .collect::<Vec<String>>();
    let separator = if rendered.iter().any(|p| p.contains('\n')) {
        "\n"
    } else {
        separator
    };
    write!(f, "{}", rendered.join(separator))
}

fn render_alternatives(f: &mut std::fmt::Formatter<'_>, alternatives: &[Usage]) -> std::fmt::Result {
    let mut rendered: Vec<String> = Vec::default();
    let mut absent = false;

    for alternative in alternatives {
        let text = alternative.to_string();

        if text.is_empty() {
            absent = true;
        } else if !rendered.contains(&text) {
            rendered.push(text);
        }
    }

    match rendered.len() {
        0 => Ok(()),
        1 if !absent => write!(f, "{}", rendered[0]),
        _ => write!(f, "[{}]", rendered.join(" | ")),
    }
}

impl std::fmt::Display for Usage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Usage::Empty => Ok(()),
            Usage::Flag(flag) => write!(f, "{flag}"),
            Usage::Option { flag, value } => write!(f, "{flag} {value}"),
            Usage::Positional(name) => write!(f, "{name}"),
            Usage::Literal(keyword) => write!(f, "{keyword}"),
            Usage::Sequence(parts) => render_parts(f, parts, " "),
            Usage::Lines(parts) => render_parts(f, parts, "\n"),
            Usage::Choice(alternatives) | Usage::Exclusive(alternatives) => {
                render_alternatives(f, alternatives)
            }
            Usage::Optional(inner) => {
                if inner.is_empty() {
                    Ok(())
                } else {
                    write!(f, "[{inner}]")
                }
            }
            Usage::Many(inner) => {
                if inner.is_empty() {
                    Ok(())
                } else {
                    write!(f, "[{inner} ...]")
                }
            }
            Usage::Many1(inner) => {
                if inner.is_empty() {
                    Ok(())
                } else {
                    write!(f, "{inner} [{inner} ...]")
                }
            }
            Usage::Unordered(left, right) => {
                write!(f, "{}", Usage::sequence((**left).clone(), (**right).clone()))
            }
        }
    }
}

/// Help text for the parameters of a parser, keyed by the parameter's spelling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Helps(Vec<(String, String)>);

impl Helps {
    pub(crate) fn single(key: impl Into<String>, help: impl Into<String>) -> Self {
        Self(vec![(key.into(), help.into())])
    }

    /// Merge `other` into these helps; a repeated key takes the later help but keeps its position.
    pub(crate) fn merge(mut self, other: &Helps) -> Self {
        for (key, help) in &other.0 {
            match self.0.iter_mut().find(|(k, _)| k == key) {
                Some((_, existing)) => *existing = help.clone(),
                None => self.0.push((key.clone(), help.clone())),
            }
        }

        self
    }

    /// Whether there is no help text.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the `(spelling, help)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, h)| (k.as_str(), h.as_str()))
    }
}
