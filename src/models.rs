use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a link is advertised as valid after creation.
pub const LINK_TTL_HOURS: i64 = 24;

pub fn link_ttl() -> Duration {
    Duration::hours(LINK_TTL_HOURS)
}

/// One shortened URL as persisted in the link collection.
///
/// Field names are camelCase on the wire and timestamps are RFC 3339
/// strings, so the persisted document reads as `[{"slug": ..., "url": ...,
/// "createdAt": ..., "expiresAt": ..., "clicks": 0, "lastClicked": null}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub slug: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub clicks: u64,
    pub last_clicked: Option<DateTime<Utc>>,
}

impl LinkRecord {
    /// A fresh record: no clicks yet, expiring one TTL after `now`.
    pub fn new(slug: String, url: String, now: DateTime<Utc>) -> Self {
        Self {
            slug,
            url,
            created_at: now,
            expires_at: now + link_ttl(),
            clicks: 0,
            last_clicked: None,
        }
    }

    /// Expiry is display-only: expired records still resolve.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn status(&self, now: DateTime<Utc>) -> &'static str {
        if self.is_expired(now) {
            "Expired"
        } else {
            "Active"
        }
    }

    /// Hostname of the target, or the whole URL when it has none
    /// (e.g. `mailto:`).
    pub fn host(&self) -> String {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
            .unwrap_or_else(|| self.url.clone())
    }
}

/// `slug` escaped as a single URL path segment, so slugs containing `/`,
/// `?` or `#` still round-trip through `/:slug` routes.
pub fn slug_path(slug: &str) -> String {
    urlencoding::encode(slug).into_owned()
}

/// What the creation view and API surface after a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLink {
    pub short_url: String,
    pub slug: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

impl CreatedLink {
    pub fn from_record(record: &LinkRecord, base_url: &str) -> Self {
        Self {
            short_url: format!("{}/{}", base_url, slug_path(&record.slug)),
            slug: record.slug.clone(),
            url: record.url.clone(),
            expires_at: record.expires_at,
        }
    }
}
