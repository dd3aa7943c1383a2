//! 言語の優先順位解決
//!
//! 以下の順で最初に一致したものを採用する:
//! 1. 明示的な指定（URL クエリパラメータ）
//! 2. 前回保存された選択
//! 3. ブラウザのロケール（プライマリサブタグで照合）
//! 4. デフォルト言語
//!
//! 未対応・不正・未取得のソースはエラーにせず読み飛ばす。

use crate::types::{
    LanguageCode,
    SupportedLanguages,
};

/// 解決に使う入力
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceSources {
    /// URL パラメータなどによる明示的な指定
    pub explicit: Option<String>,
    /// 前回のセッションで保存された言語
    pub persisted: Option<String>,
    /// ブラウザが報告するロケール（優先順）
    pub browser_locales: Vec<String>,
}

/// どのソースが採用されたか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceSource {
    /// アドレスのクエリパラメーター
    Explicit,
    /// 保存済みの言語設定
    Persisted,
    /// ブラウザのロケール
    Browser,
    /// どれも一致しなかった
    Default,
}

/// 解決結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLanguage {
    /// 決定した言語
    pub code: LanguageCode,
    /// 決定に使った入力
    pub source: PreferenceSource,
}

/// 有効な言語コードを決定する
#[must_use]
pub fn resolve_language(languages: &SupportedLanguages, sources: &PreferenceSources) -> LanguageCode {
    resolve_language_with_source(languages, sources).code
}

/// 有効な言語コードと、それを決めたソースを返す
#[must_use]
pub fn resolve_language_with_source(
    languages: &SupportedLanguages,
    sources: &PreferenceSources,
) -> ResolvedLanguage {
    let exact = |value: Option<&String>| value.and_then(|v| languages.get(v.trim())).cloned();

    let resolved = if let Some(code) = exact(sources.explicit.as_ref()) {
        ResolvedLanguage { code, source: PreferenceSource::Explicit }
    } else if let Some(code) = exact(sources.persisted.as_ref()) {
        ResolvedLanguage { code, source: PreferenceSource::Persisted }
    } else if let Some(code) =
        sources.browser_locales.iter().find_map(|locale| languages.match_locale(locale))
    {
        ResolvedLanguage { code: code.clone(), source: PreferenceSource::Browser }
    } else {
        ResolvedLanguage {
            code: languages.default_language().clone(),
            source: PreferenceSource::Default,
        }
    };

    tracing::debug!(language = %resolved.code, source = ?resolved.source, "Resolved language");
    resolved
}
