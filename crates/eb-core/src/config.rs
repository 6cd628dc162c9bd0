//! # Board Configuration
//!
//! Moderation and display knobs. `Default` carries the values the board
//! ships with; the binary may override a few of them from the environment.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Language subtags rejected when found anywhere in `Accept-Language`
    pub blocked_locales: Vec<String>,
    /// Substrings a message may not contain
    pub banned_words: Vec<String>,
    /// Minimum gap between two accepted posts from one client
    pub post_interval: Duration,
    /// Number of posts rendered on the board
    pub recent_limit: i64,
    /// Country code considered domestic
    pub home_country: String,
    pub max_message_chars: usize,
    pub max_name_chars: usize,
    pub default_name: String,
    /// Age after which a post carries the stale-information warning
    pub old_after: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            blocked_locales: ["zh", "ru", "ko"].map(String::from).to_vec(),
            banned_words: ["死ね", "殺す", "詐欺", "麻薬", "闇バイト", "爆破", "テロ"]
                .map(String::from)
                .to_vec(),
            post_interval: Duration::from_secs(10),
            recent_limit: 50,
            home_country: "JP".to_string(),
            max_message_chars: 200,
            max_name_chars: 10,
            default_name: "Anonymous".to_string(),
            old_after: Duration::from_secs(24 * 60 * 60),
        }
    }
}
