//! Favorites.

use folio_core::BookId;
use reqwest::Method;
use serde_json::Value;

use crate::books::encode_component;
use crate::errors::ApiError;
use crate::models::{BookSummary, FavoriteStatus};
use crate::session::Session;

fn favorite_path(id: &BookId) -> String {
    format!("/favorites/{}", encode_component(id.as_str()))
}

/// All favorited books.
pub async fn list(session: &Session) -> Result<Vec<BookSummary>, ApiError> {
    session.call("/favorites", Method::GET, None).await
}

/// Whether `id` is a favorite.
pub async fn status(session: &Session, id: &BookId) -> Result<bool, ApiError> {
    let status: FavoriteStatus = session
        .call(&favorite_path(id), Method::GET, None)
        .await?;
    Ok(status.is_favorite)
}

/// Mark `id` as a favorite.
pub async fn add(session: &Session, id: &BookId) -> Result<(), ApiError> {
    let _: Value = session
        .call(&favorite_path(id), Method::POST, None)
        .await?;
    let _ = session.notifier().success("Added to favorites");
    Ok(())
}

/// Remove `id` from favorites.
pub async fn remove(session: &Session, id: &BookId) -> Result<(), ApiError> {
    let _: Value = session
        .call(&favorite_path(id), Method::DELETE, None)
        .await?;
    let _ = session.notifier().success("Removed from favorites");
    Ok(())
}
