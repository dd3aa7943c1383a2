//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use crate::dom::{
    Document,
    Element,
};

/// 英語の翻訳（デフォルト言語）
pub(crate) const EN_TRANSLATIONS: &str = r#"{
    "meta": { "title": "Privacy Policy" },
    "nav": { "home": "Home", "back": "Back" },
    "form": { "search": "Search" },
    "privacy": {
        "title": "Privacy",
        "content": ["<p>One</p>", "<p>Two</p>"]
    }
}"#;

/// 日本語の翻訳（一部のキーのみ）
pub(crate) const JA_TRANSLATIONS: &str = r#"{
    "nav": { "home": "ホーム" },
    "privacy": {
        "langAttr": "ja-JP",
        "content": "<p>一</p>"
    }
}"#;

/// マーカー付きのページを作成する
///
/// - `<title>` と見出し・検索欄にテキスト/属性マーカー
/// - `en` / `ja` / 空の言語トリガー
/// - `language-select` スイッチャーと `content` コンテナ
pub(crate) fn sample_page() -> Document {
    let mut document = Document::new();
    document.root.set_attribute("data-i18n-section", "privacy");
    document.root.set_attribute("data-content-id", "content");
    document.title = Some(Element::new("title").with_attribute("data-i18n", "meta.title"));

    document.push(Element::new("a").with_attribute("data-i18n", "nav.home").with_text("nav.home"));
    document.push(Element::new("a").with_attribute("data-i18n", "nav.back").with_text("nav.back"));
    document.push(Element::new("input").with_attribute("data-i18n-placeholder", "form.search"));
    document.push(Element::new("button").with_attribute("data-lang", "en").with_text("EN"));
    document.push(Element::new("button").with_attribute("data-lang", "ja").with_text("JA"));
    document.push(Element::new("button").with_attribute("data-lang", "").with_text("Default"));
    document.push(Element::new("select").with_id("language-select"));
    document.push(Element::new("main").with_id("content"));
    document
}
