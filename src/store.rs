//! 言語設定の永続化
//!
//! ブラウザの `localStorage` に相当するキー・バリューストア。
//! 言語コードはプレーンテキストとして 1 キーに保存される。

use std::collections::{
    BTreeMap,
    HashMap,
};
use std::path::PathBuf;

use thiserror::Error;

/// ストア操作のエラー
#[derive(Error, Debug)]
pub enum StoreError {
    /// ファイル読み書きのエラー
    #[error("Failed to access preference store: {0}")]
    Io(#[from] std::io::Error),
    /// ストアファイルの JSON が壊れている
    #[error("Failed to parse preference store: {0}")]
    Parse(#[from] serde_json::Error),
}

/// クライアントに紐づくキー・バリューストア
pub trait PreferenceStore {
    /// 値を読み込む
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// 値を書き込む
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// メモリ上のストア
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    /// キー → 値
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// 空のストア
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期値付きで作成
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON オブジェクトとしてファイルに保存するストア
///
/// 書き込みのたびにファイル全体を書き直す。
#[derive(Debug, Clone)]
pub struct FileStore {
    /// JSON ファイルのパス
    path: PathBuf,
}

impl FileStore {
    /// Store backed by the JSON file at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// ファイルがなければ空として扱う
    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        tracing::debug!(path = %self.path.display(), key, value, "Stored preference");

        Ok(())
    }
}
