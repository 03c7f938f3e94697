//! Library browsing, search, and the book detail view.

use std::fmt::Write;

use folio_core::BookId;
use reqwest::Method;

use crate::errors::ApiError;
use crate::models::{Book, BookDetail, BookSummary, Plan};
use crate::session::{Followup, Session};
use crate::{favorites, paywall};

/// One page of the library.
pub async fn list(session: &Session, page: u32) -> Result<Vec<BookSummary>, ApiError> {
    session
        .call(&format!("/books?page={}", page.max(1)), Method::GET, None)
        .await
}

/// Search by title or author. A blank query returns nothing without a call.
pub async fn search(session: &Session, query: &str) -> Result<Vec<BookSummary>, ApiError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    session
        .call(
            &format!("/books/search?q={}", encode_component(query)),
            Method::GET,
            None,
        )
        .await
}

/// Fetch one book.
pub async fn get(session: &Session, id: &BookId) -> Result<Book, ApiError> {
    session
        .call(
            &format!("/books/{}", encode_component(id.as_str())),
            Method::GET,
            None,
        )
        .await
}

/// Load the detail view: the book and its favorite status, fetched
/// concurrently, plus paywall access for `plan`.
///
/// Nothing is combined until both calls settle. Anonymous readers skip the
/// favorite lookup. A failed lookup is reported and shown as not-favorited,
/// except a rejected token, which fails the view.
#[tracing::instrument(skip(session), fields(book = %id))]
pub async fn detail(session: &Session, id: &BookId, plan: Plan) -> Result<BookDetail, ApiError> {
    let logged_in = session.is_logged_in();
    let favorite = async {
        if logged_in {
            favorites::status(session, id).await
        } else {
            Ok(false)
        }
    };
    let (book, favorite) = tokio::join!(get(session, id), favorite);
    let book = book?;
    let is_favorite = match favorite {
        Ok(flag) => flag,
        Err(err) if Followup::for_error(&err) == Followup::RedirectToLogin => return Err(err),
        Err(_) => false,
    };
    let access = paywall::access(&book, plan);
    Ok(BookDetail {
        book,
        is_favorite,
        access,
    })
}

/// Percent-encode a query value or a single path segment (RFC 3986
/// unreserved set kept), so `/`, `?` and `#` never leave the segment.
pub(crate) fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(b));
            }
            _ => {
                let _ = write!(out, "%{b:02X}");
            }
        }
    }
    out
}
