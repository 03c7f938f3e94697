//! Paywall gating: how much of a book a plan may read.
//!
//! Premium readers see everything. Free readers see everything in the
//! `free` category or not flagged as locked, and a leading preview of the rest.

use crate::models::{Book, Plan};

/// Fraction of a locked book's text shown to free readers.
pub const PREVIEW_FRACTION: f64 = 0.3;

/// Category whose books are open to every plan.
pub const FREE_CATEGORY: &str = "free";

/// Reading access to one book.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Access {
    /// Entire text.
    Full,
    /// Leading portion of the text.
    Preview {
        /// Share of characters to reveal, in `0.0..=1.0`.
        fraction: f64,
    },
}

impl Access {
    /// Whether the whole text is readable.
    pub fn is_full(self) -> bool {
        matches!(self, Self::Full)
    }
}

/// Decide access for `book` under `plan`.
pub fn access(book: &Book, plan: Plan) -> Access {
    if plan == Plan::Premium {
        return Access::Full;
    }
    if !book.is_locked || book.category.trim().eq_ignore_ascii_case(FREE_CATEGORY) {
        return Access::Full;
    }
    Access::Preview {
        fraction: PREVIEW_FRACTION,
    }
}

/// Slice of `text` permitted by `access`.
///
/// Cuts on a char boundary and backs up to the last whitespace so words
/// aren't split.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn visible_text(text: &str, access: Access) -> &str {
    let Access::Preview { fraction } = access else {
        return text;
    };

    let total = text.chars().count();
    let keep = (total as f64 * fraction.clamp(0.0, 1.0)).floor() as usize;
    if keep >= total {
        return text;
    }

    let end = text.char_indices().nth(keep).map_or(text.len(), |(i, _)| i);
    let mut cut = &text[..end];
    if let Some(ws) = cut.rfind(char::is_whitespace) {
        if ws > 0 {
            cut = &cut[..ws];
        }
    }
    cut.trim_end()
}
