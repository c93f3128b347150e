use anyhow::Result;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = shorthost::config::init_config();
    let _log_guard = shorthost::runtime::logging::init_logging(&config.logging);

    shorthost::runtime::server::run_server().await
}
