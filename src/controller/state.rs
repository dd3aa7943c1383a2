//! コントローラーの状態

use crate::types::{
    LanguageCode,
    SupportedLanguages,
};

/// 描画サイクルの状態
///
/// `Uninitialized → Loading → Ready` と遷移し、切り替えのたびに `Loading` へ戻る。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    /// `boot` 前
    #[default]
    Uninitialized,
    /// 翻訳の取得中
    Loading,
    /// 直近の描画が完了している
    Ready,
}

/// 現在の言語とデフォルト言語
///
/// `current` は常に対応言語のいずれか。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationContext {
    /// 表示中（または表示しようとしている）言語
    current: LanguageCode,
    /// デフォルト言語
    default: LanguageCode,
}

impl LocalizationContext {
    /// 現在の言語をデフォルト言語で初期化する
    #[must_use]
    pub fn new(languages: &SupportedLanguages) -> Self {
        let default = languages.default_language().clone();
        Self { current: default.clone(), default }
    }

    /// Language of the last successful render, or the resolved code before it.
    #[must_use]
    pub const fn current(&self) -> &LanguageCode {
        &self.current
    }

    /// フォールバック先
    #[must_use]
    pub const fn default_language(&self) -> &LanguageCode {
        &self.default
    }

    /// 現在の言語を更新する
    pub(crate) fn set_current(&mut self, code: LanguageCode) {
        self.current = code;
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn context_starts_at_default() {
        let languages = SupportedLanguages::new(["zh", "ja"], "en");

        let mut context = LocalizationContext::new(&languages);
        expect_that!(context.current().as_str(), eq("en"));

        context.set_current(LanguageCode::new("ja"));
        expect_that!(context.current().as_str(), eq("ja"));
        expect_that!(context.default_language().as_str(), eq("en"));
    }

    #[googletest::test]
    fn state_starts_uninitialized() {
        expect_that!(ControllerState::default() == ControllerState::Uninitialized, eq(true));
    }
}
