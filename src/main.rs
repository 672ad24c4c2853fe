use actix::Actor;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use diesel::r2d2::ConnectionManager;
use diesel::SqliteConnection;
use tracing_subscriber::EnvFilter;

use campus_booking::relay::server::RelayServer;
use campus_booking::{account, admin, config::Config, database, faculty, relay, student, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .context("Failed to create pool")?;

    {
        let mut conn = pool.get().context("DB connection")?;
        database::init_schema(&mut conn)?;
        database::seed_admin(&mut conn, &config)?;
    }

    let relay = RelayServer::new().start();
    let state = web::Data::new(AppState {
        pool,
        config: config.clone(),
        relay,
    });

    tracing::info!(addr = %config.bind_addr, "listening");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            // account
            .service(web::scope("/account").configure(account::config))
            // student
            .service(web::scope("/student").configure(student::config))
            // faculty
            .service(web::scope("/faculty").configure(faculty::config))
            // administrator
            .service(web::scope("/admin").configure(admin::config))
            // real-time updates
            .route("/ws", web::get().to(relay::ws_route))
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    Ok(())
}
