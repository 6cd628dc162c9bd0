//! emergency-board/crates/eb-core/src/lib.rs
//!
//! The central domain logic and interface definitions for the emergency board.

pub mod config;
pub mod enrich;
pub mod error;
pub mod guard;
pub mod models;
pub mod moderation;
pub mod traits;
pub mod view;

// Re-exporting for easier access in other crates
pub use config::*;
pub use error::*;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use chrono::Utc;

    #[test]
    fn test_post_from_new_keeps_fields() {
        let new = NewPost {
            name: "Anonymous".to_string(),
            message: "Hello Rust!".to_string(),
            device: DeviceClass::Linux,
            country: "??".to_string(),
            user_id: "abc12345".to_string(),
            time: "01/01 00:00".to_string(),
            is_foreign: false,
            created_at: Utc::now(),
        };
        let post = Post::from_new(7, new.clone());
        assert_eq!(post.id, 7);
        assert_eq!(post.message, new.message);
        assert_eq!(post.created_at, Some(new.created_at));
    }

    #[test]
    fn test_device_labels_round_trip() {
        for d in [
            DeviceClass::IPhone,
            DeviceClass::Android,
            DeviceClass::Windows,
            DeviceClass::Mac,
            DeviceClass::Linux,
            DeviceClass::Guest,
        ] {
            assert_eq!(DeviceClass::from_label(d.as_str()), d);
        }
        assert_eq!(DeviceClass::from_label("Toaster"), DeviceClass::Guest);
    }
}
