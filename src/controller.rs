//! ローカライズの制御
//!
//! 言語の解決 → 翻訳の取得 → DOM への適用 → 保存 の流れをまとめる。
//! 描画系のメソッドは `&mut self` を取るため、切り替えは常に 1 つずつ完了する。

/// アドレスのクエリパラメーター
mod location;
/// 状態とコンテキスト
mod state;

pub use location::{
    language_from_location,
    with_language,
};
pub use state::{
    ControllerState,
    LocalizationContext,
};
use url::Url;

use crate::config::I18nSettings;
use crate::dom::document::SWITCHER_VALUE_ATTRIBUTE;
use crate::dom::{
    DomApplier,
    Document,
    ElementId,
};
use crate::error::I18nError;
use crate::input::source::TranslationSource;
use crate::input::translation::TranslationPair;
use crate::loader::TranslationLoader;
use crate::resolver::{
    PreferenceSources,
    resolve_language_with_source,
};
use crate::store::PreferenceStore;
use crate::types::{
    LanguageCode,
    SupportedLanguages,
};

/// ブラウザから受け取る情報
#[derive(Debug, Clone, Default)]
pub struct BrowserEnvironment {
    /// 現在のページアドレス
    pub location: Option<Url>,
    /// `navigator.languages`（優先順）
    pub languages: Vec<String>,
}

/// ローカライズコントローラー
#[derive(Debug)]
pub struct LocalizationController<S, P> {
    /// 検証済みの設定
    settings: I18nSettings,
    /// 対応言語
    languages: SupportedLanguages,
    /// 翻訳ローダー（キャッシュを持つ）
    loader: TranslationLoader<S>,
    /// 言語設定の保存先
    store: P,
    /// 描画サイクルの状態
    state: ControllerState,
    /// 現在の言語
    context: LocalizationContext,
    /// `boot` で登録した切り替えトリガー
    triggers: Vec<ElementId>,
    /// 現在のページアドレス
    location: Option<Url>,
    /// 直近に適用した翻訳
    pair: Option<TranslationPair>,
}

impl<S, P> LocalizationController<S, P>
where
    S: TranslationSource + Send + Sync,
    P: PreferenceStore + Send,
{
    /// 設定から依存を組み立てる。描画は `boot` まで行わない
    #[must_use]
    pub fn new(settings: I18nSettings, source: S, store: P) -> Self {
        let languages = settings.languages();
        let loader = TranslationLoader::new(
            source,
            languages.default_language().clone(),
            settings.fetch_timeout(),
        );
        let context = LocalizationContext::new(&languages);

        Self {
            settings,
            languages,
            loader,
            store,
            state: ControllerState::Uninitialized,
            context,
            triggers: Vec::new(),
            location: None,
            pair: None,
        }
    }

    /// ページを初期化する
    ///
    /// 言語を解決して描画し、切り替えトリガーを登録する。
    /// 解決した言語が取得できずデフォルト言語で描画した場合は、デフォルト言語を現在の言語として保存する。
    /// 描画に失敗しても DOM はそのままで、エラーはログに残すだけ。
    pub async fn boot(&mut self, document: &mut Document, environment: &BrowserEnvironment) {
        self.location = environment.location.clone();
        let storage_key = self.storage_key(document);

        let persisted = self.store.get(&storage_key).unwrap_or_else(|error| {
            tracing::warn!(%error, key = %storage_key, "Failed to read stored language");
            None
        });
        let explicit = self
            .location
            .as_ref()
            .and_then(|url| language_from_location(url, &self.settings.query_parameter));
        let sources =
            PreferenceSources { explicit, persisted, browser_locales: environment.languages.clone() };

        let resolved = resolve_language_with_source(&self.languages, &sources);
        tracing::info!(language = %resolved.code, source = ?resolved.source, "Booting localization");
        self.context.set_current(resolved.code.clone());

        match self.render(document, &resolved.code).await {
            Ok(loaded) => {
                if let Err(error) = self.store.set(&storage_key, loaded.as_str()) {
                    tracing::warn!(%error, key = %storage_key, "Failed to store language");
                }
                self.context.set_current(loaded);
            }
            Err(error) => {
                tracing::warn!(%error, "Initial render failed, leaving the page untouched");
            }
        }

        self.attach_triggers(document);
    }

    /// 言語を切り替える
    ///
    /// 対応していないコードは何もしない。成功すると現在の言語・保存値・アドレスを更新する。
    /// 返り値は実際に描画した言語で、取得に失敗した言語はデフォルト言語に置き換わる。
    ///
    /// # Errors
    /// - 対応していない言語
    /// - 翻訳を取得できなかった（DOM は変更されない）
    /// - 選択を保存できなかった（DOM は新しい言語で描画済み）
    pub async fn switch_language(
        &mut self,
        document: &mut Document,
        code: &str,
    ) -> Result<LanguageCode, I18nError> {
        let Some(target) = self.languages.get(code.trim()).cloned() else {
            tracing::warn!(language = code, "Ignoring switch to unsupported language");
            return Err(I18nError::UnsupportedLanguage(code.to_string()));
        };

        let storage_key = self.storage_key(document);
        let loaded = self.render(document, &target).await?;

        self.context.set_current(loaded.clone());
        if self.settings.update_location {
            let parameter = &self.settings.query_parameter;
            self.location = self.location.as_ref().map(|url| with_language(url, parameter, &loaded));
        }

        self.store.set(&storage_key, loaded.as_str())?;
        Ok(loaded)
    }

    /// 切り替えトリガーのクリック（または `<select>` の変更）
    ///
    /// 空の言語マーカーはデフォルト言語への切り替え。エラーはログに残すだけ。
    pub async fn handle_trigger(&mut self, document: &mut Document, trigger: ElementId) {
        if !self.triggers.contains(&trigger) {
            tracing::debug!(?trigger, "Element is not a registered language trigger");
            return;
        }
        let Some(code) = self.trigger_language(document, trigger) else {
            return;
        };

        if let Err(error) = self.switch_language(document, &code).await {
            tracing::warn!(%error, language = %code, "Language switch failed");
        }
    }

    /// 直近に適用した翻訳でキーを引く。見つからなければキーをそのまま返す
    #[must_use]
    pub fn translate(&self, key: &str) -> String {
        self.pair
            .as_ref()
            .and_then(|pair| pair.lookup_str(key))
            .map_or_else(|| key.to_string(), str::to_string)
    }

    /// ライフサイクル状態
    #[must_use]
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// 現在の言語
    #[must_use]
    pub const fn current_language(&self) -> &LanguageCode {
        self.context.current()
    }

    /// 言語コンテキスト
    #[must_use]
    pub const fn context(&self) -> &LocalizationContext {
        &self.context
    }

    /// 対応言語
    #[must_use]
    pub const fn supported_languages(&self) -> &SupportedLanguages {
        &self.languages
    }

    /// 保持しているページのアドレス
    #[must_use]
    pub const fn location(&self) -> Option<&Url> {
        self.location.as_ref()
    }

    /// 設定
    #[must_use]
    pub const fn settings(&self) -> &I18nSettings {
        &self.settings
    }

    /// Preference store.
    #[must_use]
    pub const fn store(&self) -> &P {
        &self.store
    }

    /// Translation loader (and its cache).
    #[must_use]
    pub const fn loader(&self) -> &TranslationLoader<S> {
        &self.loader
    }

    /// `boot` で登録したトリガー
    #[must_use]
    pub fn triggers(&self) -> &[ElementId] {
        &self.triggers
    }

    /// 取得 → 適用
    ///
    /// 実際に取得できた言語を返す（`target` が取得できなければデフォルト言語）。
    /// 取得に失敗した場合は状態を元に戻し、DOM には触れない。
    /// 保存は呼び出し側が適用の成功後に行う。
    async fn render(
        &mut self,
        document: &mut Document,
        target: &LanguageCode,
    ) -> Result<LanguageCode, I18nError> {
        let previous = self.state;
        self.state = ControllerState::Loading;

        let pair = match self.loader.load_pair(target.as_str()).await {
            Ok(pair) => pair,
            Err(error) => {
                self.state = previous;
                return Err(error.into());
            }
        };

        let outcome = DomApplier::new(&self.settings).apply(document, &pair);
        let loaded = pair.preferred.language.clone();
        self.pair = Some(pair);
        self.state = ControllerState::Ready;
        tracing::info!(
            requested = %target,
            language = %loaded,
            displayed = %outcome.displayed,
            applied = outcome.applied,
            "Rendered translations"
        );
        Ok(loaded)
    }

    /// ルートのマーカーがあればそれ、なければ設定値
    fn storage_key(&self, document: &Document) -> String {
        document
            .root_attribute(&self.settings.markers.storage_key)
            .filter(|key| !key.is_empty())
            .unwrap_or(self.settings.storage_key.as_str())
            .to_string()
    }

    /// 言語マーカーの付いた要素とスイッチャーを登録する
    fn attach_triggers(&mut self, document: &Document) {
        self.triggers =
            document.query_attribute(&self.settings.markers.language).into_iter().map(|(id, _)| id).collect();

        let switcher = self.settings.switcher_id.as_deref().and_then(|id| document.element_by_id(id));
        if let Some(id) = switcher.filter(|id| !self.triggers.contains(id)) {
            self.triggers.push(id);
        }
        tracing::debug!(count = self.triggers.len(), "Attached language triggers");
    }

    /// トリガーが指す言語
    fn trigger_language(&self, document: &Document, trigger: ElementId) -> Option<String> {
        let element = document.element(trigger)?;
        let code = element
            .attribute(&self.settings.markers.language)
            .or_else(|| element.attribute(SWITCHER_VALUE_ATTRIBUTE))
            .unwrap_or_default();

        if code.is_empty() {
            Some(self.context.default_language().to_string())
        } else {
            Some(code.to_string())
        }
    }
}
