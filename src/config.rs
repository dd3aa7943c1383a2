//! `.page-i18n.json` による設定
/// Config file loader
mod loader;
/// Configuration manager
mod manager;
/// Configuration types and settings
mod types;

pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    I18nSettings,
    LANGUAGE_PLACEHOLDER,
    MarkerConfig,
    ValidationError,
};
