//! Terms, operators and operations: the pieces an expression node is made of.
//!
//! A [`Term`] is a name plus an ordered list of string options. Option order
//! is part of the canonical string (see [`crate::expression`]) and therefore
//! part of the executor's cache key, so [`TermOptions`] keeps first-insertion
//! order and never reorders on overwrite.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

/// The kind of transformation an operation node applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Translate the child codebase into another project space.
    Translate,
    /// Run an editor over the child codebase.
    Edit,
}

impl Operator {
    /// Returns the single character that introduces this operator in the
    /// canonical string.
    pub fn symbol(self) -> char {
        match self {
            Operator::Translate => '>',
            Operator::Edit => '|',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Translate => f.write_str("translate"),
            Operator::Edit => f.write_str("edit"),
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Ordered string options with unique keys.
///
/// Serialized as `{k1=v1,k2=v2}`. Keys and values that are not plain tokens
/// are double-quoted with backslash escapes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct TermOptions(Vec<(String, String)>);

impl TermOptions {
    /// Creates an empty option list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `key` set to `value`.
    ///
    /// An existing key keeps its position; a new key is appended.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.set(key.into(), value.into());
        next
    }

    fn set(&mut self, key: String, value: String) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key, value)),
        }
    }

    /// Looks up the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no options are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for TermOptions
where
    K: Into<String>,
    V: Into<String>,
{
    /// Later duplicates overwrite earlier values in place, same as [`TermOptions::with`].
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (k, v) in iter {
            options.set(k.into(), v.into());
        }
        options
    }
}

impl From<Vec<(String, String)>> for TermOptions {
    fn from(pairs: Vec<(String, String)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl fmt::Display for TermOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write_token(f, key)?;
            f.write_str("=")?;
            write_token(f, value)?;
        }
        f.write_str("}")
    }
}

fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':' | '@')
}

/// Writes `token` bare when it is a non-empty run of plain characters and
/// double-quoted otherwise, escaping `"` and `\`.
pub(crate) fn write_token(f: &mut fmt::Formatter<'_>, token: &str) -> fmt::Result {
    if !token.is_empty() && token.chars().all(is_bare_char) {
        return f.write_str(token);
    }
    f.write_str("\"")?;
    for c in token.chars() {
        if matches!(c, '"' | '\\') {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("\"")
}

// ---------------------------------------------------------------------------
// Term
// ---------------------------------------------------------------------------

/// A named operation instance with ordered options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    name: String,
    #[serde(default)]
    options: TermOptions,
}

impl Term {
    /// Creates a term with no options.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, TermOptions::new())
    }

    /// Creates a term with the given options.
    pub fn with_options(name: impl Into<String>, options: TermOptions) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    /// Returns the term's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the term's options in insertion order.
    pub fn options(&self) -> &TermOptions {
        &self.options
    }

    /// Returns a new term with `key` set to `value`.
    ///
    /// Overwriting an existing key replaces its value but keeps the key where
    /// it was first inserted.
    #[must_use]
    pub fn with_option(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            options: self.options.with(key, value),
        }
    }
}

/// Always writes the option braces, so `public` with no options is `public{}`.
/// The name follows the same quoting rule as option keys and values.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_token(f, &self.name)?;
        write!(f, "{}", self.options)
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// An operator paired with the term it applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
    operator: Operator,
    term: Term,
}

impl Operation {
    /// Pairs `operator` with `term`.
    pub fn new(operator: Operator, term: Term) -> Self {
        Self { operator, term }
    }

    /// Returns the operator tag.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the term the operator applies.
    pub fn term(&self) -> &Term {
        &self.term
    }

    /// Returns a new operation with the same operator and `term`'s option updated.
    #[must_use]
    pub(crate) fn with_option(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(self.operator, self.term.with_option(key, value))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator.symbol(), self.term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_option_appends_new_keys_in_order() {
        let term = Term::new("public").with_option("a", "1").with_option("b", "2");
        let keys: Vec<_> = term.options().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn with_option_overwrites_in_place() {
        let term = Term::new("public")
            .with_option("a", "1")
            .with_option("b", "2")
            .with_option("a", "3");
        assert_eq!(term.to_string(), "public{a=3,b=2}");
        assert_eq!(term.options().len(), 2);
    }

    #[test]
    fn with_option_leaves_receiver_untouched() {
        let term = Term::new("public");
        let _ = term.with_option("a", "1");
        assert!(term.options().is_empty());
    }

    #[test]
    fn empty_term_keeps_braces() {
        assert_eq!(Term::new("public").to_string(), "public{}");
    }

    #[test]
    fn awkward_tokens_are_quoted() {
        let term = Term::new("t")
            .with_option("plain", "a/b.c")
            .with_option("nested", "repo>public{}")
            .with_option("quote", "say \"hi\"")
            .with_option("empty", "");
        assert_eq!(
            term.to_string(),
            r#"t{plain=a/b.c,nested="repo>public{}",quote="say \"hi\"",empty=""}"#
        );
    }

    #[test]
    fn term_names_with_delimiters_are_quoted() {
        let odd = Term::new("p{k=v}");
        let plain = Term::new("p").with_option("k", "v");
        assert_eq!(odd.to_string(), r#""p{k=v}"{}"#);
        assert_eq!(plain.to_string(), "p{k=v}");
        assert_ne!(odd.to_string(), plain.to_string());
    }

    #[test]
    fn operation_prefixes_operator_symbol() {
        let translate = Operation::new(Operator::Translate, Term::new("public"));
        let edit = Operation::new(Operator::Edit, Term::new("scrubber").with_option("x", "y"));
        assert_eq!(translate.to_string(), ">public{}");
        assert_eq!(edit.to_string(), "|scrubber{x=y}");
    }

    #[test]
    fn collecting_options_deduplicates_keys() {
        let options: TermOptions = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        assert_eq!(options.get("a"), Some("3"));
        assert_eq!(options.to_string(), "{a=3,b=2}");
    }

    #[test]
    fn structural_equality_depends_on_order() {
        let ab = Term::new("t").with_option("a", "1").with_option("b", "2");
        let ba = Term::new("t").with_option("b", "2").with_option("a", "1");
        assert_ne!(ab, ba);
        let rewritten = Term::new("t")
            .with_option("a", "0")
            .with_option("b", "2")
            .with_option("a", "1");
        assert_eq!(ab, rewritten);
    }
}
