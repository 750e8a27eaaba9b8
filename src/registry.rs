use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, SubsecRound, Utc};
use url::Url;

use crate::{
    error::RegistryError,
    models::LinkRecord,
    slug::{RandomSlugs, SlugGenerator},
    store::KeyValueStore,
};

/// Key the whole link collection is stored under.
pub const COLLECTION_KEY: &str = "shortLinks";

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, truncated to milliseconds to match the precision of the
/// persisted ISO-8601 timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}

/// The owning collection of link records.
///
/// Every operation reads the full collection from the key-value store,
/// modifies it and writes it back. Mutations inside this process are
/// serialized by `write_lock`; writers in other processes sharing the store
/// are last-writer-wins.
pub struct Registry {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    slugs: Arc<dyn SlugGenerator>,
    write_lock: Mutex<()>,
}

impl Registry {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            slugs: Arc::new(RandomSlugs),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_slug_generator(mut self, slugs: Arc<dyn SlugGenerator>) -> Self {
        self.slugs = slugs;
        self
    }

    // ── Operations ─────────────────────────────────────────────────────────

    /// Validate `url`, pick a slug (the custom one if non-empty, otherwise a
    /// generated one) and append a new record.
    pub fn create(
        &self,
        url: &str,
        custom_slug: Option<&str>,
    ) -> Result<LinkRecord, RegistryError> {
        Url::parse(url).map_err(|source| RegistryError::InvalidUrl {
            url: url.to_owned(),
            source,
        })?;

        let slug = match custom_slug.filter(|s| !s.is_empty()) {
            Some(custom) => custom.to_owned(),
            None => self.slugs.generate(),
        };

        let _guard = self.lock();
        let mut links = self.load()?;

        if links.iter().any(|l| l.slug == slug) {
            return Err(RegistryError::DuplicateSlug(slug));
        }

        let record = LinkRecord::new(slug, url.to_owned(), self.clock.now());
        links.push(record.clone());
        self.save(&links)?;

        tracing::info!("Created link '{}' -> {}", record.slug, record.url);
        Ok(record)
    }

    /// Exact-match lookup.
    pub fn find_by_slug(&self, slug: &str) -> Result<Option<LinkRecord>, RegistryError> {
        Ok(self.load()?.into_iter().find(|l| l.slug == slug))
    }

    /// Bump the click counter and stamp `last_clicked`. Returns the updated
    /// record, or `None` if the slug is unknown.
    pub fn record_click(&self, slug: &str) -> Result<Option<LinkRecord>, RegistryError> {
        let _guard = self.lock();
        let mut links = self.load()?;

        let Some(link) = links.iter_mut().find(|l| l.slug == slug) else {
            return Ok(None);
        };
        link.clicks += 1;
        link.last_clicked = Some(self.clock.now());
        let updated = link.clone();

        self.save(&links)?;
        Ok(Some(updated))
    }

    /// Remove the record for `slug`. Returns `false`, without writing, when
    /// there was nothing to remove.
    pub fn delete(&self, slug: &str) -> Result<bool, RegistryError> {
        let _guard = self.lock();
        let mut links = self.load()?;

        let before = links.len();
        links.retain(|l| l.slug != slug);
        if links.len() == before {
            return Ok(false);
        }

        self.save(&links)?;
        tracing::info!("Deleted link '{}'", slug);
        Ok(true)
    }

    /// All records in insertion order.
    pub fn list(&self) -> Result<Vec<LinkRecord>, RegistryError> {
        self.load()
    }

    /// True when no collection has been persisted yet or it holds no records.
    pub fn is_empty(&self) -> Result<bool, RegistryError> {
        Ok(self.load()?.is_empty())
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ── Persistence ────────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> Result<Vec<LinkRecord>, RegistryError> {
        match self.store.get(COLLECTION_KEY)? {
            Some(doc) => Ok(serde_json::from_str(&doc)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, links: &[LinkRecord]) -> Result<(), RegistryError> {
        let doc = serde_json::to_string(links)?;
        self.store.set(COLLECTION_KEY, &doc)?;
        Ok(())
    }
}
