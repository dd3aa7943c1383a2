//! Command line entry point: localizes a page snapshot against a site's translation files.

use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use page_i18n::config::{
    ConfigError,
    ConfigManager,
    I18nSettings,
};
use page_i18n::dom::Document;
use page_i18n::input::source::FileSource;
use page_i18n::store::{
    FileStore,
    MemoryStore,
    PreferenceStore,
};
use page_i18n::{
    BrowserEnvironment,
    I18nError,
    LocalizationController,
};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

/// ログファイル名（`--log-dir` 指定時）
const LOG_FILE_NAME: &str = "page-i18n.log";

/// コマンドライン引数
#[derive(Debug)]
struct Args {
    /// 静的サイトのルート（設定ファイルと翻訳ファイルの基準）
    site: PathBuf,
    /// ページスナップショット（JSON）
    page: PathBuf,
    /// 出力先。省略時は `page` を上書き
    out: Option<PathBuf>,
    /// ページのアドレス
    url: Option<Url>,
    /// ブラウザのロケール（優先順）
    browser_languages: Vec<String>,
    /// 言語設定の保存先。省略時はメモリのみ
    store: Option<PathBuf>,
    /// 起動後に切り替える言語
    switch: Option<String>,
    /// ログファイルの出力ディレクトリ
    log_dir: Option<PathBuf>,
}

impl Args {
    /// プロセスの引数を解析する
    fn parse() -> Result<Self, CliError> {
        Self::from_arguments(pico_args::Arguments::from_env())
    }

    /// 引数を解析する。未知の引数はエラー
    fn from_arguments(mut args: pico_args::Arguments) -> Result<Self, CliError> {
        let parsed = Self {
            site: args.value_from_str("--site")?,
            page: args.value_from_str("--page")?,
            out: args.opt_value_from_str("--out")?,
            url: args.opt_value_from_fn("--url", Url::parse)?,
            browser_languages: args.values_from_str("--browser-lang")?,
            store: args.opt_value_from_str("--store")?,
            switch: args.opt_value_from_str("--switch")?,
            log_dir: args.opt_value_from_str("--log-dir")?,
        };

        let rest: Vec<String> =
            args.finish().into_iter().map(|arg| arg.to_string_lossy().into_owned()).collect();
        if !rest.is_empty() {
            return Err(CliError::UnexpectedArgs(rest));
        }
        Ok(parsed)
    }
}

/// CLI のエラー
#[derive(Error, Debug)]
enum CliError {
    /// 引数の値がない、または解析できない
    #[error("Invalid arguments: {0}")]
    Args(#[from] pico_args::Error),

    /// 解釈されずに残った引数
    #[error("Unexpected arguments: {0:?}")]
    UnexpectedArgs(Vec<String>),

    /// 設定ファイルの読み込み・検証エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// ページファイルの読み書きエラー
    #[error("Failed to access page '{path}': {source}")]
    Io {
        /// 対象のパス
        path: String,
        /// 元のエラー
        #[source]
        source: std::io::Error,
    },

    /// ページスナップショットの JSON が不正
    #[error("Invalid page snapshot '{path}': {source}")]
    Document {
        /// 対象のパス
        path: String,
        /// 元のエラー
        #[source]
        source: serde_json::Error,
    },

    /// `--switch` の切り替えに失敗
    #[error("Language switch failed: {0}")]
    Switch(#[from] I18nError),
}

/// 引数を解析して `run` を実行する。失敗は終了コードで返す
#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(error) => {
            let _guard = init_logging(None);
            tracing::error!(%error, "Failed to parse arguments");
            tracing::info!(
                "Usage: page-i18n --site <dir> --page <page.json> [--out <file>] [--url <address>] \
                 [--browser-lang <tag>]... [--store <prefs.json>] [--switch <code>] [--log-dir <dir>]"
            );
            return ExitCode::FAILURE;
        }
    };

    let _guard = init_logging(args.log_dir.as_deref());

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "page-i18n failed");
            ExitCode::FAILURE
        }
    }
}

/// stderr と（指定があれば）ファイルへのログ出力を設定する
///
/// 返り値のガードが生きている間、ファイルへの書き込みが続く。
fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = log_dir.map_or((None, None), |dir| {
        let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (Some(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
    });

    tracing_subscriber::registry().with(filter).with(stderr_layer).with(file_layer).init();
    guard
}

/// 設定を読み込み、ページを描画して書き出す
async fn run(args: &Args) -> Result<(), CliError> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(args.site.clone()))?;
    let settings = config_manager.get_settings().clone();

    let source = FileSource::from_settings(args.site.clone(), &settings);
    let mut document = read_document(&args.page).await?;
    let environment =
        BrowserEnvironment { location: args.url.clone(), languages: args.browser_languages.clone() };
    let switch = args.switch.as_deref();

    match &args.store {
        Some(path) => {
            let store = FileStore::new(path.clone());
            localize(settings, source, store, &mut document, &environment, switch).await?;
        }
        None => {
            localize(settings, source, MemoryStore::new(), &mut document, &environment, switch)
                .await?;
        }
    }

    let out = args.out.as_deref().unwrap_or(&args.page);
    write_document(out, &document).await
}

/// `boot` と任意の切り替えを実行する
async fn localize<P: PreferenceStore + Send>(
    settings: I18nSettings,
    source: FileSource,
    store: P,
    document: &mut Document,
    environment: &BrowserEnvironment,
    switch: Option<&str>,
) -> Result<(), CliError> {
    let mut controller = LocalizationController::new(settings, source, store);
    controller.boot(document, environment).await;

    if let Some(code) = switch {
        controller.switch_language(document, code).await?;
    }

    tracing::info!(
        language = %controller.current_language(),
        state = ?controller.state(),
        location = controller.location().map(Url::as_str),
        "Localized page"
    );
    Ok(())
}

/// ページスナップショットを読み込む
async fn read_document(path: &Path) -> Result<Document, CliError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io { path: path.display().to_string(), source })?;

    serde_json::from_str(&content)
        .map_err(|source| CliError::Document { path: path.display().to_string(), source })
}

/// ページスナップショットを書き出す
async fn write_document(path: &Path, document: &Document) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(document)
        .map_err(|source| CliError::Document { path: path.display().to_string(), source })?;

    tokio::fs::write(path, json)
        .await
        .map_err(|source| CliError::Io { path: path.display().to_string(), source })?;
    tracing::info!(path = %path.display(), "Wrote localized page");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::ffi::OsString;
    use std::fs;

    use googletest::prelude::*;
    use page_i18n::dom::Element;
    use tempfile::TempDir;

    use super::*;

    /// テスト用の引数列
    fn arguments(args: &[&str]) -> pico_args::Arguments {
        pico_args::Arguments::from_vec(args.iter().map(OsString::from).collect())
    }

    /// `language/language-{lang}.json` と `page.json` を持つサイト
    fn site() -> TempDir {
        let site = TempDir::new().unwrap();
        fs::create_dir_all(site.path().join("language")).unwrap();
        fs::write(
            site.path().join("language/language-en.json"),
            r#"{ "nav": { "home": "Home" } }"#,
        )
        .unwrap();
        fs::write(
            site.path().join("language/language-ja.json"),
            r#"{ "nav": { "home": "ホーム" } }"#,
        )
        .unwrap();

        let mut page = Document::new();
        page.push(Element::new("a").with_attribute("data-i18n", "nav.home"));
        fs::write(site.path().join("page.json"), serde_json::to_string(&page).unwrap()).unwrap();
        site
    }

    /// サイト内のファイルのパス
    fn path_arg(site: &TempDir, name: &str) -> String {
        site.path().join(name).display().to_string()
    }

    #[googletest::test]
    fn parse_all_options() {
        let args = Args::from_arguments(arguments(&[
            "--site",
            "site",
            "--page",
            "page.json",
            "--url",
            "https://example.com/?lang=ja",
            "--browser-lang",
            "ja-JP",
            "--browser-lang",
            "en",
            "--switch",
            "zh",
        ]))
        .unwrap();

        assert_eq!(args.site, PathBuf::from("site"));
        assert_eq!(args.browser_languages, ["ja-JP", "en"]);
        expect_that!(args.url.as_ref().and_then(Url::query), some(eq("lang=ja")));
        expect_that!(args.switch.as_deref(), some(eq("zh")));
        assert!(args.out.is_none() && args.store.is_none());
    }

    #[googletest::test]
    fn parse_rejects_unknown_arguments() {
        let result = Args::from_arguments(arguments(&["--site", "s", "--page", "p", "--verbose"]));

        assert!(matches!(result, Err(CliError::UnexpectedArgs(rest)) if rest == ["--verbose"]));
    }

    #[googletest::test]
    fn parse_requires_site() {
        let result = Args::from_arguments(arguments(&["--page", "p"]));

        assert!(matches!(result, Err(CliError::Args(pico_args::Error::MissingOption(_)))));
    }

    #[googletest::test]
    fn parse_rejects_invalid_url() {
        let result = Args::from_arguments(arguments(&["--site", "s", "--page", "p", "--url", "::"]));

        assert!(matches!(result, Err(CliError::Args(_))));
    }

    #[tokio::test]
    async fn run_localizes_page_and_stores_choice() {
        let site = site();
        let (site_arg, page_arg) = (site.path().display().to_string(), path_arg(&site, "page.json"));
        let (out_arg, store_arg) = (path_arg(&site, "out.json"), path_arg(&site, "prefs.json"));
        let args = Args::from_arguments(arguments(&[
            "--site",
            &site_arg,
            "--page",
            &page_arg,
            "--out",
            &out_arg,
            "--store",
            &store_arg,
            "--browser-lang",
            "ja-JP",
        ]))
        .unwrap();

        run(&args).await.unwrap();

        let out: Document =
            serde_json::from_str(&fs::read_to_string(site.path().join("out.json")).unwrap()).unwrap();
        assert_that!(out.elements.first().map(Element::text), some(eq("ホーム")));
        assert_that!(FileStore::new(site.path().join("prefs.json")).get("siteLang").unwrap(), some(eq("ja")));
    }

    #[tokio::test]
    async fn run_fails_on_unsupported_switch() {
        let site = site();
        let (site_arg, page_arg) = (site.path().display().to_string(), path_arg(&site, "page.json"));
        let args = Args::from_arguments(arguments(&[
            "--site", &site_arg, "--page", &page_arg, "--switch", "fr",
        ]))
        .unwrap();

        let result = run(&args).await;

        assert!(matches!(result, Err(CliError::Switch(I18nError::UnsupportedLanguage(_)))));
    }

    #[tokio::test]
    async fn run_reports_missing_page() {
        let site = site();
        let (site_arg, page_arg) = (site.path().display().to_string(), path_arg(&site, "missing.json"));
        let args =
            Args::from_arguments(arguments(&["--site", &site_arg, "--page", &page_arg])).unwrap();

        let result = run(&args).await;

        assert!(matches!(result, Err(CliError::Io { .. })));
    }
}
