//! ページのスナップショット
//!
//! ブラウザ DOM のうち、ローカライズに必要な部分だけを持つモデル。
//! 要素は文書順のフラットなリストで、`ElementId` はその添字。

use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};

/// 言語属性の名前
pub const LANG_ATTRIBUTE: &str = "lang";

/// `<select>` スイッチャーの選択値を持つ属性
pub const SWITCHER_VALUE_ATTRIBUTE: &str = "value";

/// 要素の中身
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum Content {
    /// テキストノード（エスケープされる）
    Text(String),
    /// マークアップ（そのまま挿入される）
    Html(String),
}

impl Default for Content {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Content {
    /// 中身の文字列
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) | Self::Html(text) => text,
        }
    }
}

/// 要素
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Element {
    /// タグ名
    pub tag: String,
    /// `id` 属性
    pub id: Option<String>,
    /// `id` と `class` 以外の属性
    pub attributes: BTreeMap<String, String>,
    /// クラス（順序を保つ）
    pub classes: Vec<String>,
    /// Text or markup inside the element.
    pub content: Content,
}

impl Element {
    /// Element with the given tag and nothing else.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), ..Self::default() }
    }

    /// `id` を設定する
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// 属性を追加する
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// テキストを設定する
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content = Content::Text(text.into());
        self
    }

    /// `getAttribute` 相当
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// `setAttribute` 相当
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    /// `textContent` 相当
    pub fn set_text(&mut self, text: &str) {
        self.content = Content::Text(text.to_string());
    }

    /// `innerHTML` 相当
    pub fn set_inner_html(&mut self, html: &str) {
        self.content = Content::Html(html.to_string());
    }

    /// 現在の中身（テキストでもマークアップでも）
    #[must_use]
    pub fn text(&self) -> &str {
        self.content.as_str()
    }

    /// `classList.contains` 相当
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// `classList.toggle(class, force)` 相当
    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            if !self.has_class(class) {
                self.classes.push(class.to_string());
            }
        } else {
            self.classes.retain(|c| c != class);
        }
    }
}

/// 文書内の要素を指す添字
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

/// ページ全体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    /// ルート要素（`<html>`）。ルートのマーカー属性もここに置く
    pub root: Element,
    /// `<title>` 要素
    pub title: Option<Element>,
    /// 本文の要素（文書順）
    pub elements: Vec<Element>,
}

impl Default for Document {
    fn default() -> Self {
        Self { root: Element::new("html"), title: None, elements: Vec::new() }
    }
}

impl Document {
    /// 空の文書
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 要素を末尾に追加する
    pub fn push(&mut self, element: Element) -> ElementId {
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    /// 添字の要素
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    /// 添字の要素（可変）
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    /// `getElementById` 相当（最初に一致した要素）
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.elements.iter().position(|e| e.id.as_deref() == Some(id)).map(ElementId)
    }

    /// `querySelectorAll("[attr]")` 相当
    ///
    /// 書き換え中に借用が衝突しないよう、属性値を複製して返す。
    #[must_use]
    pub fn query_attribute(&self, name: &str) -> Vec<(ElementId, String)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(index, e)| e.attribute(name).map(|v| (ElementId(index), v.to_string())))
            .collect()
    }

    /// ルートの属性
    #[must_use]
    pub fn root_attribute(&self, name: &str) -> Option<&str> {
        self.root.attribute(name)
    }

    /// `document.documentElement.lang`
    #[must_use]
    pub fn lang(&self) -> Option<&str> {
        self.root.attribute(LANG_ATTRIBUTE)
    }

    /// `document.documentElement.lang = ...`
    pub fn set_lang(&mut self, lang: &str) {
        self.root.set_attribute(LANG_ATTRIBUTE, lang);
    }

    /// `document.title`
    #[must_use]
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_ref().map(Element::text)
    }

    /// `<title>` がなければ作る
    pub fn set_title(&mut self, title: &str) {
        self.title.get_or_insert_with(|| Element::new("title")).set_text(title);
    }
}
