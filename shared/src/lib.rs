//! Wire types shared by the item service and its clients.

mod autocomplete;
mod de;
mod envelope;
mod item;
mod pagination;

pub use autocomplete::{suggest, Suggestions};
pub use envelope::ApiResponse;
pub use item::{Item, ItemChange, ItemDraft, LookupField, NewItem, REQUIRED_FIELDS};
pub use pagination::{PageRequest, Pagination, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, RECENT_LIMIT};

use thiserror::Error;

/// Input rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("GSM, Sale Bill Number, Size, Rate, BF, Weight, Shade, and Sold To are required (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Page must be greater than 0")]
    InvalidPage,

    #[error("Limit must be between 1 and 100")]
    InvalidLimit,

    #[error("Invalid field parameter")]
    InvalidField,

    #[error("Invalid item id")]
    InvalidId,

    #[error("Invalid request body: {0}")]
    MalformedBody(String),
}
