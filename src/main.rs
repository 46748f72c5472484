use guildhall::bot::{run_dispatcher, Config};

#[tokio::main]
pub async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting Guildhall bot...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Startup - invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = run_dispatcher(config).await {
        log::error!("Startup - client error: {}", err);
        std::process::exit(1);
    }
}
