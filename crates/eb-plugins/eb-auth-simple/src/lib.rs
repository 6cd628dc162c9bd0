//! # eb-auth-simple
//!
//! SHA-256 implementation of `IdentityProvider`.
//! Gives anonymous posters a short daily ID without storing their IP.

use chrono::NaiveDate;
use eb_core::traits::IdentityProvider;
use sha2::{Digest, Sha256};

pub struct DailyIdProvider {
    /// Optional secret mixed into every hash. Empty means plain `ip + date`.
    salt: String,
}

impl DailyIdProvider {
    /// Accepts a salt string (e.g., from an environment variable)
    pub fn new(salt: &str) -> Self {
        Self {
            salt: salt.to_string(),
        }
    }
}

impl Default for DailyIdProvider {
    fn default() -> Self {
        Self::new("")
    }
}

impl IdentityProvider for DailyIdProvider {
    /// Generates a "Daily ID" (e.g., 3f9a0c1e).
    /// The ID changes at local midnight, so a poster cannot be followed across days.
    fn daily_id(&self, ip: &str, date: NaiveDate) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(ip.as_bytes());
        hasher.update(date.format("%Y%m%d").to_string().as_bytes());
        let hash = hex::encode(hasher.finalize());
        // Return 8 character slice for UI simplicity
        hash[..8].to_string()
    }
}
