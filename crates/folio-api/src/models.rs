//! Wire models for the Folio API.
//!
//! Field names are camelCase on the wire. IDs may arrive as JSON strings or
//! numbers and are kept as strings.

use folio_core::BookId;
use serde::{Deserialize, Deserializer, Serialize};

use crate::paywall::Access;

/// Subscription plan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// No subscription; locked books show a preview.
    #[default]
    Free,
    /// Paid subscription; everything is readable.
    Premium,
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Free => "free",
            Self::Premium => "premium",
        })
    }
}

/// Authenticated account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-issued account ID.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Login email.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Current plan.
    #[serde(default)]
    pub plan: Plan,
}

/// Successful login or verification payload.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    /// Bearer token to persist.
    #[serde(default, alias = "access_token", alias = "accessToken")]
    pub token: Option<String>,
    /// Account, when the server includes it.
    #[serde(default)]
    pub user: Option<User>,
}

/// Library listing entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    /// Book ID.
    #[serde(deserialize_with = "book_id")]
    pub id: BookId,
    /// Title.
    pub title: String,
    /// Author.
    #[serde(default)]
    pub author: String,
    /// Category slug, e.g. `free` or `philosophy`.
    #[serde(default)]
    pub category: String,
    /// Whether the server flags this book as premium-only.
    #[serde(default)]
    pub is_locked: bool,
}

/// Full book record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Book ID.
    #[serde(deserialize_with = "book_id")]
    pub id: BookId,
    /// Title.
    pub title: String,
    /// Author.
    #[serde(default)]
    pub author: String,
    /// Category slug.
    #[serde(default)]
    pub category: String,
    /// Whether the server flags this book as premium-only.
    #[serde(default)]
    pub is_locked: bool,
    /// Short summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Full summarized text.
    #[serde(default)]
    pub content: Option<String>,
    /// Cover image URL.
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl Book {
    /// Readable body: full content, falling back to the summary.
    pub fn text(&self) -> &str {
        self.content
            .as_deref()
            .or(self.summary.as_deref())
            .unwrap_or_default()
    }
}

/// Book plus the per-user state the detail view shows.
#[derive(Clone, Debug, PartialEq)]
pub struct BookDetail {
    /// The book.
    pub book: Book,
    /// Whether the user has favorited it.
    pub is_favorite: bool,
    /// How much text the user may read.
    pub access: Access,
}

impl BookDetail {
    /// Text gated by [`BookDetail::access`].
    pub fn visible_text(&self) -> &str {
        crate::paywall::visible_text(self.book.text(), self.access)
    }
}

/// Favorite status for one book.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    /// Whether the book is a favorite.
    #[serde(default)]
    pub is_favorite: bool,
}

/// External checkout or billing-portal URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingLink {
    /// URL to open in a browser.
    pub url: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Num(serde_json::Number),
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match StringOrNumber::deserialize(d)? {
        StringOrNumber::Text(s) => s,
        StringOrNumber::Num(n) => n.to_string(),
    })
}

fn book_id<'de, D: Deserializer<'de>>(d: D) -> Result<BookId, D::Error> {
    string_or_number(d).map(BookId::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_accepts_numeric_id_and_defaults() {
        let book: Book = serde_json::from_value(serde_json::json!({
            "id": 17,
            "title": "The Trial",
        }))
        .unwrap();
        assert_eq!(book.id.as_str(), "17");
        assert!(!book.is_locked);
        assert_eq!(book.text(), "");
    }

    #[test]
    fn book_text_prefers_content() {
        let book: Book = serde_json::from_value(serde_json::json!({
            "id": "b1",
            "title": "T",
            "summary": "short",
            "content": "long form",
            "isLocked": true,
        }))
        .unwrap();
        assert_eq!(book.text(), "long form");
        assert!(book.is_locked);
    }

    #[test]
    fn auth_payload_accepts_token_aliases() {
        let a: AuthPayload = serde_json::from_str(r#"{"token":"t1"}"#).unwrap();
        assert_eq!(a.token.as_deref(), Some("t1"));
        let b: AuthPayload = serde_json::from_str(r#"{"access_token":"t2"}"#).unwrap();
        assert_eq!(b.token.as_deref(), Some("t2"));
        let c: AuthPayload = serde_json::from_str("{}").unwrap();
        assert!(c.token.is_none());
    }

    #[test]
    fn user_plan_defaults_to_free() {
        let user: User =
            serde_json::from_str(r#"{"id":1,"email":"a@b.c"}"#).unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.plan, Plan::Free);
    }

    #[test]
    fn plan_display_matches_wire() {
        assert_eq!(Plan::Premium.to_string(), "premium");
        assert_eq!(serde_json::to_string(&Plan::Free).unwrap(), "\"free\"");
    }
}
