//! ページモデルと翻訳の適用
/// 翻訳の適用
pub mod applier;
/// ページモデル
pub mod document;

pub use applier::{
    ApplyOutcome,
    DomApplier,
};
pub use document::{
    Content,
    Document,
    Element,
    ElementId,
};
