use std::collections::{
    BTreeMap,
    HashSet,
};
use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::SupportedLanguages;

/// 翻訳ファイルパス中で言語コードに置換されるプレースホルダー
pub const LANGUAGE_PLACEHOLDER: &str = "{lang}";

/// 設定値の検証エラー（1 フィールド 1 件）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "supportedLanguages[0]")
    pub field_path: String,
    /// 人が読むためのメッセージ
    pub message: String,
}

impl ValidationError {
    /// 新しい検証エラーを作成
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// 設定の読み込みエラー
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 検証で見つかったすべてのエラー
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// 設定ファイルを読めなかった
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// 設定ファイルの JSON が不正
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// 1 行 1 エラーに整形
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// サイト全体のローカライズ設定（`.page-i18n.json`）
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Language codes the site ships translations for.
    pub supported_languages: Vec<String>,
    /// Fallback language; must be one of `supported_languages`.
    pub default_language: String,

    /// Overridden per page by the root's storage-key marker.
    pub storage_key: String,

    /// Query parameter that names an explicit language (e.g. `?lang=ja`).
    pub query_parameter: String,

    /// Relative path of a translation file; `{lang}` is replaced by the code.
    pub translation_path: String,

    /// `None` waits for the source forever.
    pub fetch_timeout_ms: Option<u64>,

    /// 翻訳対象を示すマーカー属性
    pub markers: MarkerConfig,

    /// Class toggled on the `data-lang` control of the displayed language.
    pub active_class: String,

    /// Id of a `<select>` switcher whose `value` follows the displayed language.
    pub switcher_id: Option<String>,

    /// Rewrite the held page address after a successful switch.
    pub update_location: bool,
}

/// DOM マーカー属性名
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkerConfig {
    /// テキスト置換
    pub text: String,
    /// innerHTML 置換
    pub html: String,
    /// マーカー属性名 → 書き込む属性名
    pub attributes: BTreeMap<String, String>,
    /// 言語切替トリガー
    pub language: String,
    /// ルート: コンテンツコンテナの id
    pub content_id: String,
    /// ルート: セクションキー
    pub section: String,
    /// ルート: ストレージキーの上書き
    pub storage_key: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            text: "data-i18n".to_string(),
            html: "data-i18n-html".to_string(),
            attributes: BTreeMap::from([
                ("data-i18n-placeholder".to_string(), "placeholder".to_string()),
                ("data-i18n-title".to_string(), "title".to_string()),
            ]),
            language: "data-lang".to_string(),
            content_id: "data-content-id".to_string(),
            section: "data-i18n-section".to_string(),
            storage_key: "data-storage-key".to_string(),
        }
    }
}

impl MarkerConfig {
    /// 空のマーカー名を `errors` に追加する
    fn validate(&self, errors: &mut Vec<ValidationError>) {
        let named = [
            ("markers.text", &self.text),
            ("markers.html", &self.html),
            ("markers.language", &self.language),
            ("markers.contentId", &self.content_id),
            ("markers.section", &self.section),
            ("markers.storageKey", &self.storage_key),
        ];
        for (path, name) in named {
            if name.trim().is_empty() {
                errors.push(ValidationError::new(path, "The marker attribute name cannot be empty"));
            }
        }

        for (marker, attribute) in &self.attributes {
            if marker.trim().is_empty() || attribute.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("markers.attributes[{marker}]"),
                    "Both the marker and the target attribute name are required",
                ));
            }
        }
    }
}

impl I18nSettings {
    /// # Errors
    /// - Required field is empty
    /// - Default language is not supported
    /// - Translation path has no `{lang}` placeholder
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.supported_languages.is_empty() {
            errors.push(ValidationError::new(
                "supportedLanguages",
                "At least one language is required. Example: [\"en\", \"ja\"]",
            ));
        }

        let mut seen = HashSet::new();
        for (index, code) in self.supported_languages.iter().enumerate() {
            if code.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("supportedLanguages[{index}]"),
                    "The language code cannot be empty",
                ));
            } else if !seen.insert(code.as_str()) {
                errors.push(ValidationError::new(
                    format!("supportedLanguages[{index}]"),
                    format!("Duplicate language code '{code}'"),
                ));
            }
        }

        if self.default_language.trim().is_empty() {
            errors.push(ValidationError::new("defaultLanguage", "The default language cannot be empty"));
        } else if !self.supported_languages.contains(&self.default_language) {
            errors.push(ValidationError::new(
                "defaultLanguage",
                format!(
                    "'{}' is not listed in 'supportedLanguages'. Please add it or choose another default",
                    self.default_language
                ),
            ));
        }

        if self.storage_key.is_empty() {
            errors.push(ValidationError::new("storageKey", "The storage key cannot be empty"));
        }

        if self.query_parameter.is_empty() {
            errors.push(ValidationError::new("queryParameter", "The query parameter cannot be empty"));
        }

        if !self.translation_path.contains(LANGUAGE_PLACEHOLDER) {
            errors.push(ValidationError::new(
                "translationPath",
                "The path must contain '{lang}'. Example: \"language/language-{lang}.json\"",
            ));
        }

        if self.fetch_timeout_ms == Some(0) {
            errors.push(ValidationError::new(
                "fetchTimeoutMs",
                "The timeout must be greater than 0, or null to disable it",
            ));
        }

        if self.active_class.trim().is_empty() {
            errors.push(ValidationError::new("activeClass", "The class name cannot be empty"));
        }

        self.markers.validate(&mut errors);

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// 取得のタイムアウト
    #[must_use]
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    /// 対応言語の集合（デフォルト言語を必ず含む）
    #[must_use]
    pub fn languages(&self) -> SupportedLanguages {
        SupportedLanguages::new(self.supported_languages.iter().cloned(), &self.default_language)
    }
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            supported_languages: vec!["en".to_string(), "zh".to_string(), "ja".to_string()],
            default_language: "en".to_string(),
            storage_key: "siteLang".to_string(),
            query_parameter: "lang".to_string(),
            translation_path: "language/language-{lang}.json".to_string(),
            fetch_timeout_ms: Some(10_000),
            markers: MarkerConfig::default(),
            active_class: "lang-active".to_string(),
            switcher_id: Some("language-select".to_string()),
            update_location: true,
        }
    }
}
