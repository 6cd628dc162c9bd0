//! # eb-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits.

use std::time::Instant;

use actix_web::http::header::{self, HeaderName};
use actix_web::{web, HttpRequest, HttpResponse};
use askama::Template;
use chrono::{Local, Utc};
use eb_core::config::BoardConfig;
use eb_core::enrich::{self, device_from_user_agent, display_time};
use eb_core::error::AppError;
use eb_core::guard::{Decision, RateGuard};
use eb_core::models::NewPost;
use eb_core::moderation::{contains_banned_word, is_blocked_locale};
use eb_core::traits::{GeoLocator, IdentityProvider, PostRepo};
use eb_core::view::PostView;
use eb_ui::BoardTemplate;
use serde::Deserialize;

use crate::error::ApiError;

const BOARD_TITLE: &str = "緊急連絡ボード";

/// State shared across all Actix-web workers.
pub struct AppState {
    pub repo: Box<dyn PostRepo>,
    pub geo: Box<dyn GeoLocator>,
    pub ids: Box<dyn IdentityProvider>,
    pub guard: RateGuard,
    pub config: BoardConfig,
}

impl AppState {
    pub fn new(
        repo: Box<dyn PostRepo>,
        geo: Box<dyn GeoLocator>,
        ids: Box<dyn IdentityProvider>,
        config: BoardConfig,
    ) -> Self {
        Self {
            repo,
            geo,
            ids,
            guard: RateGuard::new(config.post_interval),
            config,
        }
    }
}

/// Fields of the board's post form.
#[derive(Debug, Deserialize)]
pub struct PostForm {
    pub name: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Renders the board with the most recent posts, newest first.
pub async fn board(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let cfg = &data.config;

    data.repo.ensure_schema().await?;
    let posts = data.repo.list_recent(cfg.recent_limit).await?;

    let now = Local::now();
    let old_after = chrono::Duration::from_std(cfg.old_after)
        .map_err(|e| AppError::Internal(format!("invalid old_after: {e}")))?;
    let views: Vec<PostView> = posts
        .iter()
        .map(|p| PostView::from_post(p, now, old_after))
        .collect();

    let html = BoardTemplate {
        title: BOARD_TITLE,
        posts: &views,
        max_name_chars: cfg.max_name_chars,
        max_message_chars: cfg.max_message_chars,
    }
    .render()
    .map_err(|e| AppError::Internal(format!("template rendering failed: {e}")))?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// Accepts a new post.
///
/// Checks run in a fixed order: locale block, message shape, rate limit,
/// duplicate, banned words. Only then is the post enriched and stored.
pub async fn post_message(
    data: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<PostForm>,
) -> Result<HttpResponse, ApiError> {
    let cfg = &data.config;
    let user_agent = header_str(&req, header::USER_AGENT);
    let accept_language = header_str(&req, header::ACCEPT_LANGUAGE);
    let ip = client_ip(&req);

    // 1. Region: fail closed on a missing Accept-Language
    if is_blocked_locale(accept_language, &cfg.blocked_locales) {
        log::info!("rejected post from {ip}: blocked locale {accept_language:?}");
        return Err(AppError::Forbidden("Forbidden Region".to_string()).into());
    }

    let form = form.into_inner();
    let message = form.message.trim().to_string();
    validate_message(&message, cfg)?;

    // 2. Rate limit and duplicate check. The reservation rolls back on any early return.
    let reservation = data
        .guard
        .try_reserve(&ip, &message, Instant::now())
        .map_err(|decision| {
            log::info!("rejected post from {ip}: {decision:?}");
            rejection(decision, &data.guard)
        })?;

    // 3. Content
    if contains_banned_word(&message, &cfg.banned_words) {
        log::info!("rejected post from {ip}: banned word");
        return Err(AppError::BannedWord.into());
    }

    // 4. Enrichment
    let now = Local::now();
    let location = enrich::locate(&*data.geo, &ip, &cfg.home_country).await;
    let post = NewPost {
        name: display_name(form.name.as_deref(), cfg),
        message,
        device: device_from_user_agent(user_agent),
        country: location.country,
        user_id: data.ids.daily_id(&ip, now.date_naive()),
        time: display_time(now),
        is_foreign: location.is_foreign,
        created_at: now.with_timezone(&Utc),
    };

    // 5. Persistence
    let id = data.repo.insert_post(post).await?;
    reservation.commit();
    log::info!("accepted post {id}");

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish())
}

fn rejection(decision: Decision, guard: &RateGuard) -> ApiError {
    match decision {
        Decision::RateLimited { .. } => AppError::RateLimitExceeded(format!(
            "Wait {}s",
            guard.interval().as_secs()
        ))
        .into(),
        Decision::Duplicate => AppError::Duplicate.into(),
        // try_reserve never rejects with Accept
        Decision::Accept => AppError::Internal("guard rejected an accepted post".into()).into(),
    }
}

fn validate_message(message: &str, cfg: &BoardConfig) -> Result<(), AppError> {
    if message.is_empty() {
        return Err(AppError::ValidationError("Message is required".to_string()));
    }
    if message.chars().count() > cfg.max_message_chars {
        return Err(AppError::ValidationError(format!(
            "Message must be at most {} characters",
            cfg.max_message_chars
        )));
    }
    Ok(())
}

/// Name shown on the post: truncated to the configured length, or the
/// default name when absent or blank.
pub fn display_name(raw: Option<&str>, cfg: &BoardConfig) -> String {
    match raw.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.chars().take(cfg.max_name_chars).collect(),
        None => cfg.default_name.clone(),
    }
}

/// Client address: first `X-Forwarded-For` entry, else the peer address.
pub fn client_ip(req: &HttpRequest) -> String {
    req.headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .or_else(|| req.peer_addr().map(|a| a.ip().to_string()))
        .unwrap_or_default()
}

fn header_str(req: &HttpRequest, name: HeaderName) -> &str {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn display_name_defaults_and_truncates() {
        let cfg = BoardConfig::default();
        assert_eq!(display_name(None, &cfg), "Anonymous");
        assert_eq!(display_name(Some("   "), &cfg), "Anonymous");
        assert_eq!(display_name(Some("山田"), &cfg), "山田");
        assert_eq!(display_name(Some("あいうえおかきくけこさし"), &cfg), "あいうえおかきくけこ");
    }

    #[test]
    fn forwarded_for_wins_over_peer() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.4, 10.0.0.2"))
            .peer_addr("127.0.0.1:9000".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req), "203.0.113.4");
    }

    #[test]
    fn peer_address_is_the_fallback() {
        let req = TestRequest::default()
            .peer_addr("198.51.100.20:443".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req), "198.51.100.20");
    }

    #[test]
    fn message_shape_is_validated() {
        let cfg = BoardConfig::default();
        assert!(validate_message("", &cfg).is_err());
        assert!(validate_message(&"あ".repeat(200), &cfg).is_ok());
        assert!(validate_message(&"あ".repeat(201), &cfg).is_err());
    }
}
