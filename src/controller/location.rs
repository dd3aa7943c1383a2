//! ページアドレスの言語パラメータ

use url::Url;

use crate::types::LanguageCode;

/// クエリパラメータの値を取り出す（最初に現れたもの）
#[must_use]
pub fn language_from_location(location: &Url, parameter: &str) -> Option<String> {
    location.query_pairs().find(|(name, _)| name == parameter).map(|(_, value)| value.into_owned())
}

/// パラメータを `code` に置き換えたアドレスを返す
///
/// 他のクエリパラメータとフラグメントはそのまま残す。
#[must_use]
pub fn with_language(location: &Url, parameter: &str, code: &LanguageCode) -> Url {
    let others: Vec<(String, String)> = location
        .query_pairs()
        .filter(|(name, _)| name != parameter)
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    let mut rewritten = location.clone();
    rewritten.query_pairs_mut().clear().extend_pairs(others).append_pair(parameter, code.as_str());
    rewritten
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("https://example.com/privacy.html?lang=ja", Some("ja"))]
    #[case("https://example.com/privacy.html?ref=x&lang=zh", Some("zh"))]
    #[case("https://example.com/privacy.html?lang=", Some(""))]
    #[case("https://example.com/privacy.html", None)]
    #[case("https://example.com/privacy.html?language=ja", None)]
    fn read_language_parameter(#[case] address: &str, #[case] expected: Option<&str>) {
        let location = Url::parse(address).unwrap();

        assert_eq!(language_from_location(&location, "lang").as_deref(), expected);
    }

    #[googletest::test]
    fn rewrite_keeps_other_parameters() {
        let location = Url::parse("https://example.com/terms.html?ref=mail&lang=en#top").unwrap();

        let rewritten = with_language(&location, "lang", &LanguageCode::new("ja"));

        expect_that!(rewritten.as_str(), eq("https://example.com/terms.html?ref=mail&lang=ja#top"));
    }

    #[googletest::test]
    fn rewrite_adds_missing_parameter() {
        let location = Url::parse("https://example.com/terms.html").unwrap();

        let rewritten = with_language(&location, "lang", &LanguageCode::new("zh"));

        expect_that!(rewritten.query(), some(eq("lang=zh")));
    }
}
