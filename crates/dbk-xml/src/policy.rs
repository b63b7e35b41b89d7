//! Whitespace preservation policy keyed by element name.

/// Decides which elements keep their content whitespace verbatim.
///
/// Patterns are exact element names, or prefixes when they end in `*`
/// (`literal*` matches `literal` and `literallayout`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WhitespacePolicy {
    exact: Vec<String>,
    prefixes: Vec<String>,
}

impl WhitespacePolicy {
    /// Policy covering the DocBook verbatim elements.
    #[must_use]
    pub fn docbook() -> Self {
        Self::from_patterns(["programlisting", "code", "literal*"])
    }

    /// Policy that preserves nothing.
    #[must_use]
    pub fn none() -> Self {
        Self {
            exact: Vec::new(),
            prefixes: Vec::new(),
        }
    }

    /// Build a policy from element name patterns.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut policy = Self::none();
        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            match pattern.strip_suffix('*') {
                Some(prefix) => policy.prefixes.push(prefix.to_owned()),
                None => policy.exact.push(pattern.to_owned()),
            }
        }
        policy
    }

    /// Whether whitespace inside `name` must be preserved.
    #[must_use]
    pub fn preserves(&self, name: &str) -> bool {
        self.exact.iter().any(|exact| exact == name)
            || self.prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
    }
}

impl Default for WhitespacePolicy {
    fn default() -> Self {
        Self::docbook()
    }
}
