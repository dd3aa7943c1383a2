//! Translation tree definitions

use std::sync::Arc;

use serde_json::Value;

use crate::input::source::FetchError;
use crate::types::LanguageCode;

/// Section field holding a string or a sequence of HTML fragments.
const CONTENT_FIELD: &str = "content";
/// Legacy section field, a sequence of HTML fragments.
const LEGACY_CONTENT_FIELD: &str = "contentParts";
/// Language tag declared by a section or a whole tree.
const LANG_ATTR_FIELD: &str = "langAttr";
/// Document title declared by a section.
const TITLE_FIELD: &str = "title";

/// Parsed translation data for one language.
///
/// The top level is always a JSON object. Trees are immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationTree {
    /// Always an object.
    root: Value,
}

impl TranslationTree {
    /// Parse a translation payload.
    ///
    /// # Errors
    /// Returns error if the payload is not JSON or its top level is not an object.
    pub fn parse(payload: &str) -> Result<Self, FetchError> {
        let root: Value = serde_json::from_str(payload)?;
        Self::from_value(root)
    }

    /// Wrap an already parsed value.
    ///
    /// # Errors
    /// Returns error if `root` is not an object.
    pub fn from_value(root: Value) -> Result<Self, FetchError> {
        if root.is_object() { Ok(Self { root }) } else { Err(FetchError::NotAnObject) }
    }

    /// An empty tree; every lookup misses.
    #[must_use]
    pub fn empty() -> Self {
        Self { root: Value::Object(serde_json::Map::new()) }
    }

    /// The whole tree as JSON.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.root
    }

    /// Resolve a dotted key path against this tree.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        resolve_path(Some(&self.root), path)
    }

    /// Resolve a dotted key path to a string leaf.
    #[must_use]
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Language tag declared at the top level (`langAttr`).
    #[must_use]
    pub fn lang_attr(&self) -> Option<&str> {
        self.root.get(LANG_ATTR_FIELD).and_then(Value::as_str)
    }

    /// Number of string leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        count_leaves(&self.root)
    }
}

/// Strings, numbers and booleans count as leaves.
fn count_leaves(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.values().map(count_leaves).sum(),
        Value::Array(items) => items.iter().map(count_leaves).sum(),
        Value::String(_) => 1,
        _ => 0,
    }
}

/// A tree together with the language it was actually loaded for.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTranslation {
    /// May differ from the requested code after a fallback.
    pub language: LanguageCode,
    /// Shared with the loader cache.
    pub tree: Arc<TranslationTree>,
}

impl LoadedTranslation {
    /// Pairs a tree with its language.
    #[must_use]
    pub const fn new(language: LanguageCode, tree: Arc<TranslationTree>) -> Self {
        Self { language, tree }
    }

    /// Placeholder used when no tree could be loaded for `language`.
    #[must_use]
    pub fn empty(language: LanguageCode) -> Self {
        Self { language, tree: Arc::new(TranslationTree::empty()) }
    }
}

/// The preferred-language tree and the default-language tree of one render.
///
/// Lookups prefer `preferred` whenever it defines the key, even as an empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationPair {
    /// The language being rendered.
    pub preferred: LoadedTranslation,
    /// The default language; empty when it could not be loaded.
    pub fallback: LoadedTranslation,
}

impl TranslationPair {
    /// Resolve `path` in `preferred`, then in `fallback`.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        self.preferred.tree.get(path).or_else(|| self.fallback.tree.get(path))
    }

    /// `None` also when the winning value is not a string.
    #[must_use]
    pub fn lookup_str(&self, path: &str) -> Option<&str> {
        self.lookup(path).and_then(Value::as_str)
    }
}

/// Resolve a dotted key path against a nested JSON value.
///
/// Returns `None` when the tree is absent, a segment is missing, an intermediate
/// value is not a container, or the leaf is `null`. Numeric segments index arrays.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use page_i18n::input::translation::resolve_path;
///
/// let tree = json!({ "a": { "b": { "c": "x" } } });
///
/// assert_eq!(resolve_path(Some(&tree), "a.b.c"), Some(&json!("x")));
/// assert_eq!(resolve_path(Some(&tree), "a.b.d"), None);
/// assert_eq!(resolve_path(None, "a.b.c"), None);
/// ```
#[must_use]
pub fn resolve_path<'a>(tree: Option<&'a Value>, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    let mut current = tree?;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    if current.is_null() { None } else { Some(current) }
}

/// A page section: content plus optional document metadata.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    /// Always an object.
    value: &'a Value,
}

impl<'a> Section<'a> {
    /// Look up the section bound to `key`; only objects qualify.
    ///
    /// A string, sequence or number under `key` counts as no section at all, so the
    /// page shows the other tree's section and its language.
    #[must_use]
    pub fn lookup(tree: &'a TranslationTree, key: &str) -> Option<Self> {
        tree.get(key).filter(|v| v.is_object()).map(|value| Self { value })
    }

    /// Normalize the section body to one HTML string.
    ///
    /// `content` as a string wins, then `content` as a sequence, then the legacy
    /// `contentParts` sequence. Sequence items are joined with `\n`.
    #[must_use]
    pub fn content(&self) -> Option<String> {
        match self.value.get(CONTENT_FIELD) {
            Some(Value::String(text)) => return Some(text.clone()),
            Some(Value::Array(parts)) => return Some(join_parts(parts)),
            _ => {}
        }

        match self.value.get(LEGACY_CONTENT_FIELD) {
            Some(Value::Array(parts)) => Some(join_parts(parts)),
            _ => None,
        }
    }

    /// Section-level `langAttr`.
    #[must_use]
    pub fn lang_attr(&self) -> Option<&'a str> {
        self.value.get(LANG_ATTR_FIELD).and_then(Value::as_str)
    }

    /// Document title for the page.
    #[must_use]
    pub fn title(&self) -> Option<&'a str> {
        self.value.get(TITLE_FIELD).and_then(Value::as_str)
    }
}

/// Non-string items are skipped.
fn join_parts(parts: &[Value]) -> String {
    parts.iter().filter_map(Value::as_str).collect::<Vec<_>>().join("\n")
}
