//! page-i18n
//!
//! 静的 Web ページ向けのクライアントサイドローカライズ。
//! 言語を解決し、翻訳データを取得して、マーカー属性の付いた要素に適用する。

/// 設定
pub mod config;
/// ローカライズの制御
pub mod controller;
/// ページモデルと翻訳の適用
pub mod dom;
/// 共通エラー
pub mod error;
/// 翻訳データの入力
pub mod input;
/// 翻訳の取得とキャッシュ
pub mod loader;
/// 言語の決定
pub mod resolver;
/// 言語設定の保存
pub mod store;
/// 基本型
pub mod types;

/// テスト用フィクスチャ
mod test_utils;

pub use controller::{
    BrowserEnvironment,
    ControllerState,
    LocalizationController,
};
pub use error::I18nError;
