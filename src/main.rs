use dreamizer::{logger, Config};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_file = dotenv::from_filename(".env.local").or_else(|_| dotenv::dotenv());

    logger::init_with_config(logger::LoggerConfig::from_env())?;
    match env_file {
        Ok(path) => log::info!("✅ Loaded environment from {}", path.display()),
        Err(_) => log::warn!("⚠️  No .env.local or .env file found, using system environment variables"),
    }

    let config = Config::from_env();
    logger::log_config_info(&config);

    dreamizer::server::run(config).await?;
    Ok(())
}
