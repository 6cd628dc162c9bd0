//! # Domain Models
//!
//! These structs represent the entities persisted by the emergency board.
//! Post ids are assigned by storage and only ever grow.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse device class derived from the `User-Agent` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceClass {
    #[serde(rename = "iPhone")]
    IPhone,
    Android,
    Windows,
    Mac,
    Linux,
    Guest,
}

impl DeviceClass {
    /// Label stored in the `device` column and shown on the board.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::IPhone => "iPhone",
            DeviceClass::Android => "Android",
            DeviceClass::Windows => "Windows",
            DeviceClass::Mac => "Mac",
            DeviceClass::Linux => "Linux",
            DeviceClass::Guest => "Guest",
        }
    }

    /// Maps a stored label back to its class. Unknown labels read as `Guest`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "iPhone" => DeviceClass::IPhone,
            "Android" => DeviceClass::Android,
            "Windows" => DeviceClass::Windows,
            "Mac" => DeviceClass::Mac,
            "Linux" => DeviceClass::Linux,
            _ => DeviceClass::Guest,
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post ready to be written. Every field is already derived and bounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub name: String,
    pub message: String,
    pub device: DeviceClass,
    /// Two-letter country code, or "??" when the lookup failed
    pub country: String,
    /// 8-character pseudonymous daily ID
    pub user_id: String,
    /// Server-local "MM/DD HH:MM" display stamp
    pub time: String,
    pub is_foreign: bool,
    pub created_at: DateTime<Utc>,
}

/// A persisted, immutable post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub name: String,
    pub message: String,
    pub device: DeviceClass,
    pub country: String,
    pub user_id: String,
    pub time: String,
    pub is_foreign: bool,
    /// Absolute insert time. `None` for rows written before the column existed.
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Attaches a storage-assigned id to a freshly inserted post.
    pub fn from_new(id: i64, new: NewPost) -> Self {
        Self {
            id,
            name: new.name,
            message: new.message,
            device: new.device,
            country: new.country,
            user_id: new.user_id,
            time: new.time,
            is_foreign: new.is_foreign,
            created_at: Some(new.created_at),
        }
    }
}
