//! Core types used throughout the project.

use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

/// A short language identifier such as `en`, `zh` or `ja`.
///
/// Any string can be wrapped, but only codes handed out by [`SupportedLanguages`]
/// are guaranteed to be part of the configured set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Wraps a code as given; no normalization.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for LanguageCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LanguageCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The fixed set of languages a page can be shown in.
///
/// The default language is always a member of the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedLanguages {
    /// Configured order, without duplicates.
    codes: Vec<LanguageCode>,
    /// Fallback language, also present in `codes`.
    default: LanguageCode,
}

impl SupportedLanguages {
    /// Builds the set, appending `default` when it is not listed.
    #[must_use]
    pub fn new<I, S>(codes: I, default: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<LanguageCode> = Vec::new();
        for code in codes {
            let code = LanguageCode::new(code);
            if !list.contains(&code) {
                list.push(code);
            }
        }

        let default = LanguageCode::new(default);
        if !list.contains(&default) {
            list.push(default.clone());
        }

        Self { codes: list, default }
    }

    /// デフォルト言語
    #[must_use]
    pub const fn default_language(&self) -> &LanguageCode {
        &self.default
    }

    /// 対応言語（設定順）
    #[must_use]
    pub fn codes(&self) -> &[LanguageCode] {
        &self.codes
    }

    /// Exact membership test.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Returns the supported code exactly matching `code`.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&LanguageCode> {
        self.codes.iter().find(|c| c.as_str() == code)
    }

    /// Matches a browser locale (e.g. `zh-CN`, `ja_JP`) by its primary subtag.
    ///
    /// Comparison is case-insensitive.
    #[must_use]
    pub fn match_locale(&self, locale: &str) -> Option<&LanguageCode> {
        let primary = locale.trim().split(['-', '_']).next()?;
        if primary.is_empty() {
            return None;
        }
        self.codes.iter().find(|c| c.as_str().eq_ignore_ascii_case(primary))
    }
}
