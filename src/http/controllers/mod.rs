use actix_web::web;
use std::str::FromStr;

use super::error::invalid_request;
use crate::error::{Error, Result};
use crate::types::id::{marker::Marker, Id};

pub mod likes;
pub mod notifications;
pub mod posts;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(invalid_request))
        .app_data(web::QueryConfig::default().error_handler(invalid_request))
        .app_data(web::JsonConfig::default().error_handler(invalid_request))
        .service(
            web::scope("/posts")
                .route("/likes", web::get().to(posts::like_counts))
                .route("/views", web::get().to(posts::view_counts))
                .service(
                    web::resource("/{id}/likes")
                        .route(web::get().to(likes::counts))
                        .route(web::post().to(likes::add))
                        .route(web::delete().to(likes::remove)),
                )
                .route("/{id}/likes/me", web::get().to(likes::me))
                .route("/{id}/likes/total", web::get().to(likes::total))
                .route("/{id}/views", web::post().to(posts::record_view)),
        )
        .service(
            web::scope("/users")
                .route("/{id}/like-stats", web::get().to(users::like_stats))
                .service(
                    web::resource("/{id}/follow")
                        .route(web::post().to(users::follow))
                        .route(web::delete().to(users::unfollow)),
                ),
        )
        .service(
            web::scope("/notifications")
                .service(
                    web::resource("")
                        .route(web::get().to(notifications::list))
                        .route(web::post().to(notifications::create)),
                )
                .route("/unread-count", web::get().to(notifications::unread_count))
                .route("/read-all", web::post().to(notifications::read_all))
                .route("/{id}/read", web::post().to(notifications::read))
                .route("/{id}", web::delete().to(notifications::delete)),
        );
}

/// Parses a numeric id taken from the request path.
fn parse_id<M: Marker>(raw: &str) -> Result<Id<M>> {
    Id::from_str(raw).map_err(|e| Error::invalid_request(format!("{e}: {raw:?}")))
}
