//! HOUSECAST — housing price inference client
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the backend dispatcher, and runs one prediction from the
//! command line.

use anyhow::{bail, Result};
use tracing::info;

use housecast::config::AppConfig;
use housecast::dispatch::Dispatcher;
use housecast::types::{PredictionResult, RawFeatureForm};

const USAGE: &str =
    "usage: housecast <hard-code|tf-serving|tf-js> <housing_median_age> <total_rooms> <total_bedrooms> <population>";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 5 {
        bail!("{USAGE}");
    }

    let form = RawFeatureForm {
        housing_median_age: Some(args[1].clone()),
        total_rooms: Some(args[2].clone()),
        total_bedrooms: Some(args[3].clone()),
        population: Some(args[4].clone()),
    };

    let dispatcher = Dispatcher::from_config(&cfg)?;

    info!(
        mode = %args[0],
        hard_code_url = %cfg.backends.hard_code_url,
        tf_serving_url = %cfg.backends.tf_serving_url,
        artifact_url = %cfg.model.artifact_url,
        "HOUSECAST starting up"
    );

    match dispatcher.predict_form(&args[0], &form).await {
        PredictionResult::Ok { price } => {
            println!("Predicted price: {price:.2}");
        }
        PredictionResult::Err { reason } => {
            eprintln!("Prediction failed: {reason}");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("housecast=info"));

    let json_logging = std::env::var("HOUSECAST_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
