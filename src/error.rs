//! クレート共通のエラー

use thiserror::Error;

use crate::loader::LoadError;
use crate::store::StoreError;

/// 言語切り替えのエラー
#[derive(Error, Debug)]
pub enum I18nError {
    /// 対応言語に含まれないコード
    #[error("Language '{0}' is not supported")]
    UnsupportedLanguage(String),
    /// 翻訳を取得できなかった
    #[error(transparent)]
    Load(#[from] LoadError),
    /// 選択した言語を保存できなかった
    #[error(transparent)]
    Store(#[from] StoreError),
}
