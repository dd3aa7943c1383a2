//! 翻訳ツリーの取得とキャッシュ
//!
//! 取得に失敗した言語はデフォルト言語で再試行する。
//! キャッシュは成功した言語だけを保持し、削除しない。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::input::source::{
    FetchError,
    TranslationSource,
};
use crate::input::translation::{
    LoadedTranslation,
    TranslationPair,
    TranslationTree,
};
use crate::types::LanguageCode;

/// 要求した言語もデフォルト言語も取得できなかった
#[derive(Error, Debug)]
#[error("Failed to load translations for '{requested}' (default '{default}'): {source}")]
pub struct LoadError {
    /// 要求された言語コード
    pub requested: String,
    /// 再試行したデフォルト言語
    pub default: LanguageCode,
    /// デフォルト言語の取得エラー
    #[source]
    pub source: FetchError,
}

/// 翻訳ローダー
#[derive(Debug)]
pub struct TranslationLoader<S> {
    /// 翻訳データの取得元
    source: S,
    /// フォールバック先
    default_language: LanguageCode,
    /// 取得のタイムアウト（`None` なら無制限）
    timeout: Option<Duration>,
    /// 言語コード → ツリー
    cache: Arc<RwLock<HashMap<String, Arc<TranslationTree>>>>,
}

impl<S: TranslationSource + Sync> TranslationLoader<S> {
    /// 新しいローダーを作成
    #[must_use]
    pub fn new(source: S, default_language: LanguageCode, timeout: Option<Duration>) -> Self {
        Self { source, default_language, timeout, cache: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// 翻訳データの取得元
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// フォールバック先
    #[must_use]
    pub const fn default_language(&self) -> &LanguageCode {
        &self.default_language
    }

    /// 言語の翻訳を取得する
    ///
    /// 失敗した場合はデフォルト言語で再試行する。
    /// 返り値の `language` は実際に使われた言語。
    ///
    /// # Errors
    /// 要求した言語とデフォルト言語の両方で取得に失敗した場合
    pub async fn load(&self, language: &str) -> Result<LoadedTranslation, LoadError> {
        match self.load_exact(language).await {
            Ok(tree) => return Ok(LoadedTranslation::new(LanguageCode::new(language), tree)),
            Err(error) if language == self.default_language.as_str() => {
                return Err(self.load_error(language, error));
            }
            Err(error) => {
                tracing::warn!(
                    language,
                    default = %self.default_language,
                    %error,
                    "Failed to load translations, falling back to default language"
                );
            }
        }

        match self.load_exact(self.default_language.as_str()).await {
            Ok(tree) => Ok(LoadedTranslation::new(self.default_language.clone(), tree)),
            Err(error) => Err(self.load_error(language, error)),
        }
    }

    /// 優先言語とデフォルト言語を並行して取得する
    ///
    /// デフォルト言語だけが失敗した場合は空のツリーで補う。
    ///
    /// # Errors
    /// 優先言語の取得（フォールバック込み）が失敗した場合
    pub async fn load_pair(&self, language: &str) -> Result<TranslationPair, LoadError> {
        let (preferred, fallback) =
            futures::future::join(self.load(language), self.load(self.default_language.as_str()))
                .await;

        let preferred = preferred?;
        let fallback = fallback.unwrap_or_else(|error| {
            tracing::warn!(%error, "Default language unavailable, rendering without fallback");
            LoadedTranslation::empty(self.default_language.clone())
        });

        Ok(TranslationPair { preferred, fallback })
    }

    /// キャッシュ済みか
    pub async fn is_cached(&self, language: &str) -> bool {
        self.cache.read().await.contains_key(language)
    }

    /// フォールバックなしで 1 言語を取得する
    async fn load_exact(&self, language: &str) -> Result<Arc<TranslationTree>, FetchError> {
        if let Some(tree) = self.cache.read().await.get(language).cloned() {
            tracing::debug!(language, "Translation cache hit");
            return Ok(tree);
        }

        let payload = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.source.fetch(language))
                .await
                .map_err(|_| FetchError::Timeout(limit))??,
            None => self.source.fetch(language).await?,
        };
        let tree = Arc::new(TranslationTree::parse(&payload)?);

        // 並行した取得が同じ言語を先に入れていればそちらを使う
        let mut cache = self.cache.write().await;
        let tree = Arc::clone(cache.entry(language.to_string()).or_insert(tree));
        drop(cache);

        tracing::debug!(language, leaves = tree.leaf_count(), "Loaded translations");
        Ok(tree)
    }

    /// `requested` の取得失敗を `LoadError` にまとめる
    fn load_error(&self, requested: &str, source: FetchError) -> LoadError {
        LoadError { requested: requested.to_string(), default: self.default_language.clone(), source }
    }
}
