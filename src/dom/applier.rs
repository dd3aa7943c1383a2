//! 翻訳の DOM への適用
//!
//! マーカー属性ごとにキーを解決し、要素を書き換える。
//! 解決は常に「優先言語の値 → デフォルト言語の値」の順で、
//! 優先言語で定義されていれば空文字列でもそれを使う。
//! どちらにも値がないキーは要素をそのまま残す。

use std::collections::BTreeSet;

use serde_json::Value;

use super::document::{
    Document,
    Element,
    SWITCHER_VALUE_ATTRIBUTE,
};
use crate::config::{
    I18nSettings,
    MarkerConfig,
};
use crate::input::translation::{
    Section,
    TranslationPair,
};
use crate::types::LanguageCode;

/// 適用結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// 実際に表示されている言語（インジケーターに反映した言語）
    pub displayed: LanguageCode,
    /// 書き換えたノード数
    pub applied: usize,
    /// どちらのツリーにも値がなかったキー
    pub missing_keys: BTreeSet<String>,
}

/// 翻訳を文書に適用する
#[derive(Debug, Clone, Copy)]
pub struct DomApplier<'a> {
    /// マーカー属性名
    markers: &'a MarkerConfig,
    /// 表示中の言語のトリガーに付けるクラス
    active_class: &'a str,
    /// `<select>` スイッチャーの id
    switcher_id: Option<&'a str>,
}

impl<'a> DomApplier<'a> {
    /// 設定のマーカーで適用器を作成
    #[must_use]
    pub fn new(settings: &'a I18nSettings) -> Self {
        Self {
            markers: &settings.markers,
            active_class: &settings.active_class,
            switcher_id: settings.switcher_id.as_deref(),
        }
    }

    /// 翻訳ペアを文書に適用する
    ///
    /// 同じペアを繰り返し適用しても結果は変わらない。
    pub fn apply(&self, document: &mut Document, pair: &TranslationPair) -> ApplyOutcome {
        let mut outcome = ApplyOutcome {
            displayed: pair.preferred.language.clone(),
            applied: 0,
            missing_keys: BTreeSet::new(),
        };

        apply_marker(document, pair, &self.markers.text, &mut outcome, Element::set_text);
        apply_marker(document, pair, &self.markers.html, &mut outcome, Element::set_inner_html);
        for (marker, attribute) in &self.markers.attributes {
            apply_marker(document, pair, marker, &mut outcome, |element, value| {
                element.set_attribute(attribute, value);
            });
        }
        self.apply_page_title(document, pair, &mut outcome);
        self.apply_section(document, pair, &mut outcome);
        self.update_indicators(document, &outcome.displayed);

        tracing::debug!(
            displayed = %outcome.displayed,
            applied = outcome.applied,
            missing = outcome.missing_keys.len(),
            "Applied translations"
        );
        if !outcome.missing_keys.is_empty() {
            tracing::debug!(keys = ?outcome.missing_keys, "Keys missing from both trees");
        }

        outcome
    }

    /// `<title>` にテキストマーカーがあれば同じ規則で書き換える
    fn apply_page_title(
        &self,
        document: &mut Document,
        pair: &TranslationPair,
        outcome: &mut ApplyOutcome,
    ) {
        let Some(title) = document.title.as_mut() else {
            return;
        };
        let Some(key) = title.attribute(&self.markers.text).map(str::to_string) else {
            return;
        };
        if write_resolved(title, pair, &key, outcome, &Element::set_text) {
            outcome.applied += 1;
        }
    }

    /// セクション本文・言語属性・タイトル
    fn apply_section(
        &self,
        document: &mut Document,
        pair: &TranslationPair,
        outcome: &mut ApplyOutcome,
    ) {
        let Some(section_key) = document.root_attribute(&self.markers.section).map(str::to_string)
        else {
            let lang = pair.preferred.tree.lang_attr().unwrap_or(pair.preferred.language.as_str());
            document.set_lang(lang);
            return;
        };

        let preferred = Section::lookup(&pair.preferred.tree, &section_key);
        let fallback = Section::lookup(&pair.fallback.tree, &section_key);

        // 優先言語にセクションがなければ、見えているのはデフォルト言語
        let (displayed, shown) = if preferred.is_some() {
            (&pair.preferred, preferred)
        } else {
            (&pair.fallback, fallback)
        };
        outcome.displayed = displayed.language.clone();

        let lang = shown
            .and_then(|s| s.lang_attr())
            .or_else(|| displayed.tree.lang_attr())
            .unwrap_or(displayed.language.as_str());
        document.set_lang(lang);

        if let Some(title) =
            preferred.and_then(|s| s.title()).or_else(|| fallback.and_then(|s| s.title()))
        {
            document.set_title(title);
        }

        let content =
            preferred.and_then(|s| s.content()).or_else(|| fallback.and_then(|s| s.content()));
        let container = document
            .root_attribute(&self.markers.content_id)
            .and_then(|id| document.element_by_id(id));

        match (content, container) {
            (Some(html), Some(id)) => {
                if let Some(element) = document.element_mut(id) {
                    element.set_inner_html(&html);
                    outcome.applied += 1;
                }
            }
            (None, _) => {
                outcome.missing_keys.insert(section_key);
            }
            (Some(_), None) => {
                tracing::debug!(section = %section_key, "No content container on the page");
            }
        }
    }

    /// 言語インジケーターとスイッチャーを表示中の言語に合わせる
    fn update_indicators(&self, document: &mut Document, displayed: &LanguageCode) {
        for (id, lang) in document.query_attribute(&self.markers.language) {
            if let Some(element) = document.element_mut(id) {
                element.toggle_class(self.active_class, lang == displayed.as_str());
            }
        }

        let switcher = self.switcher_id.and_then(|id| document.element_by_id(id));
        if let Some(element) = switcher.and_then(|id| document.element_mut(id)) {
            element.set_attribute(SWITCHER_VALUE_ATTRIBUTE, displayed.as_str());
        }
    }
}

/// 1 種類のマーカーを処理する
fn apply_marker(
    document: &mut Document,
    pair: &TranslationPair,
    marker: &str,
    outcome: &mut ApplyOutcome,
    write: impl Fn(&mut Element, &str),
) {
    for (id, key) in document.query_attribute(marker) {
        let Some(element) = document.element_mut(id) else {
            continue;
        };
        if write_resolved(element, pair, &key, outcome, &write) {
            outcome.applied += 1;
        }
    }
}

/// キーを解決して書き込む。書き込んだら `true`
fn write_resolved(
    element: &mut Element,
    pair: &TranslationPair,
    key: &str,
    outcome: &mut ApplyOutcome,
    write: &impl Fn(&mut Element, &str),
) -> bool {
    match pair.lookup(key) {
        Some(Value::String(value)) => {
            write(element, value);
            true
        }
        Some(_) => false,
        None => {
            outcome.missing_keys.insert(key.to_string());
            false
        }
    }
}
