//! Server construction: adapter selection, route table, middleware.

mod state_builders;

pub use state_builders::{Repositories, build_http_state, build_repositories, build_upload_store};

use actix_files::Files;
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{self, HealthState};
use crate::inbound::http::{
    admin, auth, files, friends, messages, notifications, posts, uploads, users,
};
use crate::middleware::Trace;

/// Register every API route.
///
/// Shared by [`create_server`] and the HTTP integration tests so both run
/// the same routing table. Literal paths that share a prefix with a
/// parameterised sibling (`/api/posts/community`, the fixed `/api/messages`
/// views) are registered ahead of it, so the parameterised route never
/// swallows them.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register)
        .service(auth::login)
        .service(auth::me)
        .service(posts::list_official)
        .service(posts::list_community)
        .service(posts::list_bookmarks)
        .service(posts::create_post)
        .service(posts::get_post)
        .service(posts::delete_post)
        .service(posts::toggle_like)
        .service(posts::add_comment)
        .service(posts::toggle_comment_like)
        .service(posts::add_reply)
        .service(posts::toggle_reply_like)
        .service(posts::toggle_bookmark)
        .service(posts::toggle_pin)
        .service(uploads::upload)
        .service(uploads::download)
        .service(messages::send)
        .service(messages::conversations)
        .service(messages::unread_count)
        .service(messages::thread)
        .service(friends::request)
        .service(friends::accept)
        .service(friends::decline)
        .service(friends::list)
        .service(friends::pending)
        .service(friends::remove)
        .service(notifications::get_settings)
        .service(notifications::update_settings)
        .service(notifications::list)
        .service(notifications::mark_read)
        .service(notifications::clear)
        .service(users::profile)
        .service(users::get_dm_settings)
        .service(users::update_dm_settings)
        .service(users::get_icon_positions)
        .service(users::update_icon_positions)
        .service(files::list)
        .service(files::create)
        .service(files::update)
        .service(files::remove)
        .service(admin::stats)
        .service(admin::list_users)
        .service(admin::list_posts)
        .service(admin::toggle_ban)
        .service(admin::toggle_role)
        .service(admin::delete_user);
}

/// Build the adapters from `config`, wire the services, and start listening.
///
/// The returned [`Server`] must be awaited to drive the listener. Readiness
/// flips on once the socket is bound.
///
/// # Errors
/// Fails when the MongoDB deployment is unreachable, the upload directory
/// cannot be created, or the socket cannot be bound.
pub async fn create_server(config: Config) -> std::io::Result<Server> {
    let repositories = build_repositories(&config).await?;
    let upload_store = build_upload_store(&config).await?;
    let http_state = web::Data::new(build_http_state(
        &repositories,
        upload_store,
        &config.token_secret,
        config.token_ttl_seconds,
    ));

    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();
    let upload_dir = config.upload_dir.clone();

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(server_health_state.clone())
            .app_data(http_state.clone())
            .wrap(Trace)
            .configure(configure_api)
            // Stored images are served inline straight off the disk; the
            // token names make them unguessable.
            .service(Files::new("/uploads", upload_dir.clone()))
            .service(health::ready)
            .service(health::live);

        #[cfg(debug_assertions)]
        let app = app
            .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
