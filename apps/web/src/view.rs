//! # ページレンダラー
//!
//! tera でサーバー描画ページを生成する。テンプレートは `include_str!` で埋め込み、
//! すべて `layout.html` を継承する。
//!
//! レシピ本文（Webhook 由来の HTML）は `safe` で出力する。それ以外の値は
//! tera の自動エスケープに任せる。

use axum::response::Html;
use chrono::{DateTime, Utc};
use recipebox_domain::{favorite::Favorite, recipe::content::strip_tags};
use serde::Serialize;
use tera::{Context, Tera};

/// 一覧に出す本文の抜粋の長さ（文字数）
const SNIPPET_CHARS: usize = 160;

/// お気に入り一覧の 1 行
#[derive(Debug, Serialize)]
struct FavoriteRow {
    id:         String,
    title:      String,
    snippet:    String,
    created_at: String,
}

impl From<&Favorite> for FavoriteRow {
    fn from(favorite: &Favorite) -> Self {
        Self {
            id:         favorite.id.to_string(),
            title:      favorite.title.clone(),
            snippet:    snippet(&favorite.content),
            created_at: format_date(favorite.created_at),
        }
    }
}

/// ページレンダラー
pub struct PageRenderer {
    engine: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut engine = Tera::default();

        engine.add_raw_templates(vec![
            ("layout.html", include_str!("../templates/pages/layout.html")),
            ("index.html", include_str!("../templates/pages/index.html")),
            ("recipes.html", include_str!("../templates/pages/recipes.html")),
            ("favorites.html", include_str!("../templates/pages/favorites.html")),
            ("favorite.html", include_str!("../templates/pages/favorite.html")),
        ])?;

        Ok(Self { engine })
    }

    /// `/` サインインページ
    pub fn index(&self) -> Result<Html<String>, tera::Error> {
        self.render("index.html", &Context::new())
    }

    /// `/recipes` レシピ生成ページ
    pub fn recipes(&self, email: &str) -> Result<Html<String>, tera::Error> {
        let mut context = Context::new();
        context.insert("email", email);
        self.render("recipes.html", &context)
    }

    /// `/favorites` お気に入り一覧
    ///
    /// `confirm` が一覧内の ID と一致したら、その行の削除確認を表示する。
    pub fn favorites(
        &self,
        email: &str,
        favorites: &[Favorite],
        query: Option<&str>,
        confirm: Option<&str>,
    ) -> Result<Html<String>, tera::Error> {
        let rows: Vec<FavoriteRow> = favorites.iter().map(FavoriteRow::from).collect();
        let confirming = confirm.and_then(|id| rows.iter().find(|row| row.id == id));

        let mut context = Context::new();
        context.insert("email", email);
        context.insert("query", query.unwrap_or_default());
        context.insert("favorites", &rows);
        context.insert("confirming", &confirming);
        self.render("favorites.html", &context)
    }

    /// `/favorites/{id}` お気に入り詳細
    pub fn favorite(&self, email: &str, favorite: &Favorite) -> Result<Html<String>, tera::Error> {
        let mut context = Context::new();
        context.insert("email", email);
        context.insert("id", &favorite.id.to_string());
        context.insert("title", &favorite.title);
        context.insert("content", &favorite.content);
        context.insert("plain_text", &strip_tags(&favorite.content));
        context.insert("image_url", &favorite.image_url);
        context.insert("created_at", &format_date(favorite.created_at));
        self.render("favorite.html", &context)
    }

    fn render(&self, name: &str, context: &Context) -> Result<Html<String>, tera::Error> {
        self.engine.render(name, context).map(Html)
    }
}

fn snippet(content: &str) -> String {
    let text = strip_tags(content);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= SNIPPET_CHARS {
        return text;
    }
    let mut cut: String = text.chars().take(SNIPPET_CHARS).collect();
    cut.push('…');
    cut
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use recipebox_domain::{
        favorite::{FavoriteTitle, NewFavorite},
        user::UserId,
    };

    use super::*;

    fn favorite(title: &str, content: &str) -> Favorite {
        NewFavorite::new(
            UserId::new(),
            FavoriteTitle::new(Some(title)),
            content.to_string(),
            None,
            Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
        )
        .unwrap()
        .into_saved()
    }

    #[test]
    fn test_newが正常に初期化される() {
        assert!(PageRenderer::new().is_ok());
    }

    #[test]
    fn test_一覧に抜粋と詳細リンクが出る() {
        let renderer = PageRenderer::new().unwrap();
        let soup = favorite("Miso Soup", "<h1>Miso</h1>\n<p>Dashi and   tofu</p>");

        let Html(page) = renderer
            .favorites("chef@example.com", std::slice::from_ref(&soup), None, None)
            .unwrap();

        assert!(page.contains("Miso Soup"));
        assert!(page.contains("Miso Dashi and tofu"));
        assert!(page.contains(&format!("/favorites/{}", soup.id)));
        assert!(!page.contains("Remove this favorite?"));
    }

    #[test]
    fn test_confirmが一致した行だけ削除確認を出す() {
        let renderer = PageRenderer::new().unwrap();
        let soup = favorite("Miso Soup", "<p>x</p>");
        let id = soup.id.to_string();

        let Html(page) = renderer
            .favorites("chef@example.com", &[soup], Some("miso"), Some(&id))
            .unwrap();

        assert!(page.contains("Remove this favorite?"));
        assert!(page.contains(&format!("/favorites/{id}/delete")));
    }

    #[test]
    fn test_タイトルはエスケープされ本文はそのまま出る() {
        let renderer = PageRenderer::new().unwrap();
        let tricky = favorite("<script>alert(1)</script>", "<h2>Steps</h2>");

        let Html(page) = renderer.favorite("chef@example.com", &tricky).unwrap();

        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("<h2>Steps</h2>"));
    }

    #[test]
    fn test_長い本文は抜粋で切られる() {
        let long = format!("<p>{}</p>", "a".repeat(SNIPPET_CHARS + 20));

        let result = snippet(&long);

        assert_eq!(result.chars().count(), SNIPPET_CHARS + 1);
        assert!(result.ends_with('…'));
    }
}
