use astra::Server;
use campus_rentals::config::Config;
use campus_rentals::db::seed::seed_all;
use campus_rentals::responses::error_response;
use campus_rentals::{handle, init_db, Database};
use tracing_subscriber::EnvFilter;

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("campus_rentals=info")),
        )
        .init();

    if let Err(e) = run() {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let db = Database::new(config.database_path.clone());
    init_db(&db)?;

    if config.seed_demo_data {
        seed_all(&db)?;
    }

    tracing::info!(addr = %config.bind_addr, workers = config.max_workers, "starting server");

    let server = Server::bind(&config.bind_addr).max_workers(config.max_workers);

    server.serve(move |req: astra::Request, _info| {
        let path = req.uri().path().to_string();
        match handle(req, &db) {
            Ok(resp) => resp,
            Err(err) => error_response(err, &path),
        }
    })?;

    tracing::info!("server shut down cleanly");
    Ok(())
}
