//! HTTP handlers and route configuration.
//!
//! Reads that behave the same for everyone are public; everything that
//! mutates, plus the author-scoped reads, lives under `/api/auth` and
//! requires a verified bearer token.

mod comments;
mod convert;
mod forms;
mod health;
mod posts;
mod users;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Liveness + health
            .route("", web::head().to(health::liveness))
            .route("/health", web::get().to(health::health_check))
            // Public routes
            .route("/signup", web::post().to(users::signup))
            .route("/login", web::post().to(users::login))
            .route("/posts", web::get().to(posts::list_published))
            .route("/posts/{postid}", web::get().to(posts::get_published))
            .route(
                "/posts/{postid}/comments",
                web::get().to(comments::list_for_post),
            )
            // Authenticated routes
            .service(
                web::scope("/auth")
                    .route("/posts", web::post().to(posts::create))
                    .route("/posts/author", web::get().to(posts::list_by_author))
                    .route("/posts/{postid}", web::get().to(posts::get_own_view))
                    .route("/posts/{postid}/edit", web::get().to(posts::get_for_edit))
                    .route("/posts/{postid}", web::put().to(posts::update))
                    .route("/posts/{postid}", web::delete().to(posts::delete))
                    .route(
                        "/posts/{postid}/comments",
                        web::post().to(comments::create),
                    )
                    .route(
                        "/posts/{postid}/comments/{commentid}",
                        web::put().to(comments::update),
                    )
                    .route(
                        "/posts/{postid}/comments/{commentid}",
                        web::delete().to(comments::delete),
                    )
                    .route("/user", web::get().to(users::profile))
                    .route("/user/basic", web::put().to(users::update_basic))
                    .route("/user/password", web::put().to(users::change_password))
                    .route("/user", web::delete().to(users::delete_account)),
            ),
    );
}
