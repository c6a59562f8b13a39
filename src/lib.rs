pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod notify;
pub mod receipt;
pub mod schema;
pub mod session;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::billing::BillingService;
use infrastructure::bill_store::DieselBillStore;
use infrastructure::credentials::DieselCredentialVerifier;
use infrastructure::menu_store::DieselMenuStore;

pub use db::{create_pool, DbPool};
pub use notify::ChangeFeed;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Shared application state handed to every handler.
pub struct AppState {
    pub billing: BillingService<DieselBillStore>,
    pub menu: DieselMenuStore,
    pub verifier: DieselCredentialVerifier,
    pub feed: ChangeFeed,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::bills::create_draft,
        handlers::bills::update_draft,
        handlers::bills::send_to_kitchen,
        handlers::bills::list_active,
        handlers::bills::list_drafts,
        handlers::bills::history,
        handlers::bills::complete,
        handlers::bills::send_back,
        handlers::bills::cancel,
        handlers::bills::finalize,
        handlers::bills::render_receipt,
        handlers::menu::list,
        handlers::menu::create,
        handlers::menu::update,
        handlers::menu::delete,
        handlers::dashboard::stats,
        handlers::events::stream,
    ),
    tags(
        (name = "auth", description = "Credential verification"),
        (name = "bills", description = "Order lifecycle and queries"),
        (name = "menu", description = "Food item management"),
        (name = "dashboard", description = "Sales statistics"),
        (name = "events", description = "Change notification stream"),
    )
)]
pub struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    feed: ChangeFeed,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(AppState {
        billing: BillingService::new(DieselBillStore::new(pool.clone(), feed.clone())),
        menu: DieselMenuStore::new(pool.clone(), feed.clone()),
        verifier: DieselCredentialVerifier::new(pool),
        feed,
    });

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .route("/auth/login", web::post().to(handlers::auth::login))
            .route("/events", web::get().to(handlers::events::stream))
            .service(
                web::scope("/bills")
                    .route("/drafts", web::post().to(handlers::bills::create_draft))
                    .route("/drafts", web::get().to(handlers::bills::list_drafts))
                    .route("/drafts/{id}", web::put().to(handlers::bills::update_draft))
                    .route("/kitchen", web::post().to(handlers::bills::send_to_kitchen))
                    .route("/active", web::get().to(handlers::bills::list_active))
                    .route("/history", web::get().to(handlers::bills::history))
                    .route("/{id}/complete", web::post().to(handlers::bills::complete))
                    .route("/{id}/return", web::post().to(handlers::bills::send_back))
                    .route("/{id}/finalize", web::post().to(handlers::bills::finalize))
                    .route("/{id}/receipt", web::get().to(handlers::bills::render_receipt))
                    .route("/{id}", web::delete().to(handlers::bills::cancel)),
            )
            .service(
                web::scope("/menu")
                    .route("", web::get().to(handlers::menu::list))
                    .route("", web::post().to(handlers::menu::create))
                    .route("/{id}", web::put().to(handlers::menu::update))
                    .route("/{id}", web::delete().to(handlers::menu::delete)),
            )
            .route("/dashboard/stats", web::get().to(handlers::dashboard::stats))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
