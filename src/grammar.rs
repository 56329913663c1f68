//! An ordered set of named rewrite rules, the unit the compiler produces and the external
//! engine expands.

use indexmap::map::{IndexMap, Iter, Keys};
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::types::CompileError;

/// An insertion-ordered mapping from rule name to rule body.
///
/// Overwriting an existing rule keeps it at its original position, so a template's layout
/// survives having some of its rules replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grammar {
    rules: IndexMap<String, String>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rule, returning the body it replaced.
    pub fn insert(&mut self, name: impl Into<String>, body: impl Into<String>) -> Option<String> {
        self.rules.insert(name.into(), body.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.rules.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.rules.iter()
    }

    pub fn keys(&self) -> Keys<'_, String, String> {
        self.rules.keys()
    }

    /// Rewrites every rule body for which `select` returns `true`, in order.
    pub fn update<S, F>(&mut self, mut select: S, mut rewrite: F)
    where
        S: FnMut(&str) -> bool,
        F: FnMut(&str, &str) -> String,
    {
        for (name, body) in self.rules.iter_mut() {
            if select(name) {
                *body = rewrite(name, body);
            }
        }
    }

    /// Serializes the grammar as a tab-indented JSON object.
    pub fn to_json_pretty(&self) -> Result<String, CompileError> {
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"\t");
        let mut serializer = Serializer::with_formatter(&mut out, formatter);

        self.serialize(&mut serializer)
            .map_err(|e| CompileError::ParseError(format!("Failed to serialize grammar: {}", e)))?;

        String::from_utf8(out)
            .map_err(|e| CompileError::ParseError(format!("Grammar is not valid UTF-8: {}", e)))
    }
}

impl<'a> IntoIterator for &'a Grammar {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Grammar
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut grammar = Grammar::new();
        for (name, body) in iter {
            grammar.insert(name, body);
        }
        grammar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_preserved() {
        let grammar: Grammar = [("origin", "#run#"), ("run", "go"), ("alpha", "a")]
            .into_iter()
            .collect();

        let keys: Vec<&String> = grammar.keys().collect();
        assert_eq!(keys, vec!["origin", "run", "alpha"]);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut grammar: Grammar = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();

        assert_eq!(grammar.insert("a", "changed"), Some("1".to_string()));
        assert_eq!(grammar.insert("d", "4"), None);

        let keys: Vec<&String> = grammar.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c", "d"]);
        assert_eq!(grammar.get("a"), Some("changed"));
    }

    #[test]
    fn test_update_selected_rules() {
        let mut grammar: Grammar = [("keep", "x"), ("wrap", "y")].into_iter().collect();

        grammar.update(|name| name == "wrap", |name, body| format!("<{name}>{body}"));

        assert_eq!(grammar.get("keep"), Some("x"));
        assert_eq!(grammar.get("wrap"), Some("<wrap>y"));
    }

    #[test]
    fn test_serialization_is_ordered_and_tab_indented() {
        let grammar: Grammar = [("z", "last?"), ("a", "first?")].into_iter().collect();

        let json = grammar.to_json_pretty().unwrap();
        assert_eq!(json, "{\n\t\"z\": \"last?\",\n\t\"a\": \"first?\"\n}");
    }

    #[test]
    fn test_deserialization_keeps_order() {
        let grammar: Grammar = serde_json::from_str(r#"{"run": "1", "origin": "2"}"#).unwrap();

        let keys: Vec<&String> = grammar.keys().collect();
        assert_eq!(keys, vec!["run", "origin"]);
        assert!(grammar.contains("origin"));
        assert!(!grammar.contains("missing"));
    }
}
