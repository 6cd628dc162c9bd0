//! View models: posts turned into render-ready fields.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDateTime, Utc};

use crate::models::Post;

/// Everything the board template needs for one post.
#[derive(Debug, Clone, PartialEq)]
pub struct PostView {
    pub id: i64,
    pub name: String,
    pub message: String,
    pub device: &'static str,
    pub country: String,
    pub user_id: String,
    pub time: String,
    pub is_foreign: bool,
    pub is_old: bool,
}

impl PostView {
    pub fn from_post(post: &Post, now: DateTime<Local>, old_after: Duration) -> Self {
        Self {
            id: post.id,
            name: post.name.clone(),
            message: post.message.clone(),
            device: post.device.as_str(),
            country: post.country.clone(),
            user_id: post.user_id.clone(),
            time: post.time.clone(),
            is_foreign: post.is_foreign,
            is_old: is_old(post, now, old_after),
        }
    }
}

/// Whether a post is older than `old_after` at `now`.
///
/// Uses the absolute insert time when the row has one. Rows without it fall
/// back to reading the "MM/DD HH:MM" stamp in the current year, which is
/// wrong across New Year; unparseable stamps count as fresh.
pub fn is_old(post: &Post, now: DateTime<Local>, old_after: Duration) -> bool {
    match post.created_at {
        Some(at) => now.with_timezone(&Utc) - at > old_after,
        None => stamp_is_old(&post.time, now, old_after),
    }
}

fn stamp_is_old(stamp: &str, now: DateTime<Local>, old_after: Duration) -> bool {
    let with_year = format!("{}/{}", now.year(), stamp);
    match NaiveDateTime::parse_from_str(&with_year, "%Y/%m/%d %H:%M") {
        Ok(posted) => now.naive_local() - posted > old_after,
        Err(_) => false,
    }
}
