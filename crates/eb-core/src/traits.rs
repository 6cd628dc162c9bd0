//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{NewPost, Post};

/// Append-only persistence for posts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepo: Send + Sync {
    /// Creates the posts table if it does not exist. Safe to call on every request.
    async fn ensure_schema(&self) -> anyhow::Result<()>;

    /// Appends a post and returns the id storage assigned to it.
    async fn insert_post(&self, post: NewPost) -> anyhow::Result<i64>;

    /// Returns at most `limit` posts, newest first.
    async fn list_recent(&self, limit: i64) -> anyhow::Result<Vec<Post>>;
}

/// IP-to-country lookup against an external, unreliable service.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Returns the two-letter country code for `ip`.
    async fn lookup_country(&self, ip: &str) -> anyhow::Result<String>;
}

/// Pseudonymous identity for anonymous posters.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait IdentityProvider: Send + Sync {
    /// Generates the 8 character daily ID (e.g., "3f9a0c1e").
    /// Same IP and date always give the same ID.
    fn daily_id(&self, ip: &str, date: NaiveDate) -> String;
}
