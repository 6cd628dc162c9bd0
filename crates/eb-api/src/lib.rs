//! # eb-api
//!
//! The web routing and orchestration layer for the emergency board.

pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::web;

pub use error::ApiError;
pub use handlers::AppState;

/// Configures the routes for the board.
///
/// Mounted under an empty scope so the binary can move the board under a
/// prefix if needed.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            // The board itself
            .route("/", web::get().to(handlers::board))
            // The posting endpoint
            .route("/post_msg", web::post().to(handlers::post_message)),
    );
}
