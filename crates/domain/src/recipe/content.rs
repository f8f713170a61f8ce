//! # レシピ本文の正規化
//!
//! Webhook が返す本文は形式が定まっていない。以下の順で HTML に揃える。
//!
//! 1. `srcdoc="..."` 属性（iframe ラッパー）があれば、その中身を取り出す
//! 2. HTML タグらしきものを含まなければ Markdown とみなして HTML に変換する
//! 3. それ以外はそのまま使う
//!
//! 併せて、画面の「Copy」で使うタグ除去済みテキストもここで作る。

use std::sync::LazyLock;

use pulldown_cmark::{Options, Parser, html::push_html};
use regex::Regex;

/// `srcdoc="..."` の中身（非貪欲、改行を跨いでよい）
static SRCDOC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"srcdoc="([\s\S]*?)""#).expect("静的な正規表現"));

/// 英字で始まるタグが 1 つでもあれば HTML とみなす
static HTML_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<[a-z][\s\S]*>").expect("静的な正規表現"));

/// タグ（閉じ `>` のない末尾の断片を含む）
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>?").expect("静的な正規表現"));

/// Webhook 応答の生テキストを表示用 HTML に正規化する
///
/// ```rust
/// use recipebox_domain::recipe::content::normalize_webhook_response;
///
/// assert_eq!(normalize_webhook_response("<p>ok</p>"), "<p>ok</p>");
/// assert_eq!(
///     normalize_webhook_response(r#"<iframe srcdoc="<h2>Soup</h2>"></iframe>"#),
///     "<h2>Soup</h2>"
/// );
/// ```
pub fn normalize_webhook_response(raw: &str) -> String {
    let body = extract_srcdoc(raw).unwrap_or(raw);

    if looks_like_html(body) {
        body.to_string()
    } else {
        markdown_to_html(body)
    }
}

/// `srcdoc` 属性があればその中身を返す
pub fn extract_srcdoc(raw: &str) -> Option<&str> {
    SRCDOC_PATTERN
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// HTML タグを含むかどうか
pub fn looks_like_html(text: &str) -> bool {
    HTML_TAG_PATTERN.is_match(text)
}

/// Markdown（プレーンテキストを含む）を HTML に変換する
///
/// 表・取り消し線・タスクリストの GFM 拡張を有効にする。
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    push_html(&mut html, parser);
    html
}

/// HTML からタグを取り除いたプレーンテキストを返す
///
/// エンティティのデコードはしない。
pub fn strip_tags(html: &str) -> String {
    TAG_PATTERN.replace_all(html, "").into_owned()
}
