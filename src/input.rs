//! 翻訳データの入力
/// 翻訳データの取得元
pub mod source;
/// 翻訳ツリー
pub mod translation;
