use std::sync::Arc;

use crate::{error::RegistryError, registry::Registry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Redirect(String),
    NotFound,
}

/// Turns a requested slug into a redirect and records the visit.
///
/// Expiry is not consulted: an expired link still redirects.
#[derive(Clone)]
pub struct Resolver {
    registry: Arc<Registry>,
}

impl Resolver {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, slug: &str) -> Result<Outcome, RegistryError> {
        if slug.is_empty() || self.registry.is_empty()? {
            return Ok(Outcome::NotFound);
        }

        if self.registry.find_by_slug(slug)?.is_none() {
            return Ok(Outcome::NotFound);
        }

        // The record can vanish between lookup and click if another handle
        // deleted it; treat that the same as a miss.
        match self.registry.record_click(slug)? {
            Some(link) => {
                tracing::debug!("Resolved '{}' (clicks={})", slug, link.clicks);
                Ok(Outcome::Redirect(link.url))
            }
            None => Ok(Outcome::NotFound),
        }
    }
}
