use tracing::{error, info, warn};

use backoffice::admin::bootstrap;
use backoffice::web::WebServer;
use backoffice::{Config, Database};

#[tokio::main]
async fn main() {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());

    let (config, load_error) = match Config::load_with_env(&config_path) {
        Ok(config) => (config, None),
        Err(e) => {
            let mut config = Config::default();
            config.apply_env_overrides();
            (config, Some(e))
        }
    };

    if let Err(e) = backoffice::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        backoffice::logging::init_console_only(&config.logging.level);
    }

    if let Some(e) = load_error {
        warn!("Failed to load {}: {}. Using default configuration.", config_path, e);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("backoffice {}", env!("CARGO_PKG_VERSION"));

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database {}: {}", config.database.path, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = bootstrap(&db, &config.bootstrap, config.auth.site_id).await {
        error!("Failed to create bootstrap administrator: {}", e);
        std::process::exit(1);
    }

    let server = match WebServer::new(&config, db.clone()) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
    }

    db.close().await;
}
