use axum::http::StatusCode;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("slug already exists: {0}")]
    DuplicateSlug(String),
    #[error("corrupt link collection: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl RegistryError {
    /// Message shown to the person filling in the creation form.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "Invalid URL. Please enter a valid URL!",
            Self::DuplicateSlug(_) => "Slug already exists!",
            Self::Corrupt(_) | Self::Storage(_) => "Storage error. Please try again.",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
            Self::DuplicateSlug(_) => StatusCode::CONFLICT,
            Self::Corrupt(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the error stems from bad input rather than the store.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidUrl { .. } | Self::DuplicateSlug(_))
    }
}
