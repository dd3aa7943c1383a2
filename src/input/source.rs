//! Translation source definitions.
//!
//! A source returns the raw payload for a language code; parsing and caching are
//! left to the loader.

use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::Arc;
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};
use std::time::Duration;

use thiserror::Error;

use crate::config::{
    I18nSettings,
    LANGUAGE_PLACEHOLDER,
};

/// Errors that make a single fetch count as failed.
#[derive(Error, Debug)]
pub enum FetchError {
    /// No payload exists for the language
    #[error("Translation source not found: {0}")]
    NotFound(String),
    /// Transport failure
    #[error("Failed to read translation source '{path}': {source}")]
    Io {
        /// 読もうとしたパス
        path: String,
        /// 元のエラー
        #[source]
        source: std::io::Error,
    },
    /// The source did not answer in time
    #[error("Translation fetch timed out after {0:?}")]
    Timeout(Duration),
    /// The payload is not JSON
    #[error("Failed to parse translation payload: {0}")]
    Parse(#[from] serde_json::Error),
    /// The payload is JSON but not an object
    #[error("Translation payload must be a JSON object")]
    NotAnObject,
}

/// Something that can deliver translation payloads by language code.
pub trait TranslationSource {
    /// Fetch the raw payload for `language`.
    fn fetch(&self, language: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

impl<T: TranslationSource + ?Sized> TranslationSource for Arc<T> {
    fn fetch(&self, language: &str) -> impl Future<Output = Result<String, FetchError>> + Send {
        (**self).fetch(language)
    }
}

/// Reads `<root>/<template>` with `{lang}` replaced by the language code.
#[derive(Debug, Clone)]
pub struct FileSource {
    /// サイトのルート
    root: PathBuf,
    /// `{lang}` を含む相対パス
    template: String,
}

impl FileSource {
    /// `root` からの相対パステンプレートで読むソース
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, template: impl Into<String>) -> Self {
        Self { root: root.into(), template: template.into() }
    }

    /// 設定の `translationPath` を使う
    #[must_use]
    pub fn from_settings(root: impl Into<PathBuf>, settings: &I18nSettings) -> Self {
        Self::new(root, settings.translation_path.clone())
    }

    /// File path for `language`, or `None` if the code could escape the root.
    #[must_use]
    pub fn path_for(&self, language: &str) -> Option<PathBuf> {
        if language.is_empty()
            || language.contains(['/', '\\'])
            || language.contains("..")
            || Path::new(language).is_absolute()
        {
            return None;
        }

        Some(self.root.join(self.template.replace(LANGUAGE_PLACEHOLDER, language)))
    }
}

impl TranslationSource for FileSource {
    async fn fetch(&self, language: &str) -> Result<String, FetchError> {
        let Some(path) = self.path_for(language) else {
            tracing::warn!(language, "Refusing to build a translation path");
            return Err(FetchError::NotFound(language.to_string()));
        };

        tracing::debug!(path = %path.display(), "Reading translation file");

        tokio::fs::read_to_string(&path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                FetchError::NotFound(path.display().to_string())
            } else {
                FetchError::Io { path: path.display().to_string(), source }
            }
        })
    }
}

/// In-memory payloads keyed by language code.
#[derive(Debug, Default)]
pub struct MemorySource {
    /// 言語コード → ペイロード
    payloads: HashMap<String, String>,
    /// `fetch` が呼ばれた回数
    fetches: AtomicUsize,
}

impl MemorySource {
    /// No payloads; every fetch is `NotFound`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the payload for `language`.
    #[must_use]
    pub fn with(mut self, language: impl Into<String>, payload: impl Into<String>) -> Self {
        self.payloads.insert(language.into(), payload.into());
        self
    }

    /// Number of fetches served or refused so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl TranslationSource for MemorySource {
    async fn fetch(&self, language: &str) -> Result<String, FetchError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.payloads
            .get(language)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(language.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    #[case::plain("en", Some("language/language-en.json"))]
    #[case::region("zh-CN", Some("language/language-zh-CN.json"))]
    #[case::empty("", None)]
    #[case::slash("../secret", None)]
    #[case::nested("a/b", None)]
    #[case::backslash("a\\b", None)]
    #[case::dots("..", None)]
    fn path_for_substitutes_language(#[case] language: &str, #[case] expected: Option<&str>) {
        let source = FileSource::new("/site", "language/language-{lang}.json");

        let path = source.path_for(language);

        assert_eq!(path, expected.map(|p| Path::new("/site").join(p)));
    }

    #[tokio::test]
    async fn file_source_reads_payload() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("i18n")).unwrap();
        fs::write(temp_dir.path().join("i18n/ja.json"), r#"{"hello": "こんにちは"}"#).unwrap();
        let source = FileSource::new(temp_dir.path(), "i18n/{lang}.json");

        let payload = source.fetch("ja").await.unwrap();

        assert_that!(payload, contains_substring("こんにちは"));
    }

    #[tokio::test]
    async fn file_source_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let source = FileSource::new(temp_dir.path(), "i18n/{lang}.json");

        let result = source.fetch("fr").await;

        assert!(matches!(result, Err(FetchError::NotFound(path)) if path.ends_with("fr.json")));
    }

    #[tokio::test]
    async fn file_source_rejects_traversal() {
        let source = FileSource::new("/site", "{lang}.json");

        let result = source.fetch("../etc/passwd").await;

        assert!(matches!(result, Err(FetchError::NotFound(_))));
    }

    #[rstest]
    fn memory_source_serves_payloads() {
        let source = MemorySource::new().with("en", "{}");

        let found = tokio_test::block_on(source.fetch("en"));
        let missing = tokio_test::block_on(source.fetch("ja"));

        assert_that!(found, ok(eq("{}")));
        assert!(matches!(missing, Err(FetchError::NotFound(code)) if code == "ja"));
        assert_that!(source.fetch_count(), eq(2));
    }

    #[rstest]
    fn arc_source_delegates() {
        let source = Arc::new(MemorySource::new().with("en", "{}"));

        let result = tokio_test::block_on(Arc::clone(&source).fetch("en"));

        assert_that!(result, ok(anything()));
        assert_that!(source.fetch_count(), eq(1));
    }
}
