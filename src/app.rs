use std::io::Write;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::DigestSession;
use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::domain::summary::NarrativeSummary;
use crate::infrastructure::config::{AppConfig, ConfigService};
use crate::infrastructure::llm_clients::{LLMClient, RouterClient};

pub fn run() {
    let _ = dotenvy::dotenv();

    let config_service = ConfigService::new();
    let config = match config_service.load() {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info");
            error!(error = %err, "Failed to load configuration");
            println!("{}", err);
            return;
        }
    };
    init_tracing(&config.log_filter);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(error = %err, "Failed to start async runtime");
            return;
        }
    };

    let llm_client: Arc<dyn LLMClient + Send + Sync> = Arc::new(RouterClient::new());
    let mut session = DigestSession::new(config.input_path.clone(), llm_client);
    let stdout = std::io::stdout();

    let outcome = runtime.block_on(run_pipeline(
        &mut session,
        &config,
        |llm| config_service.resolve_api_key(llm),
        &mut stdout.lock(),
    ));

    if let Err(err) = outcome {
        error!(error = %err, "Failed to write to stdout");
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load, aggregate and narrate, writing progress lines and the final text
/// to `out`. Every stage failure is reported as one line and absorbed; the
/// narrative is returned when all three stages succeed.
pub async fn run_pipeline<F, W>(
    session: &mut DigestSession,
    config: &AppConfig,
    resolve_api_key: F,
    out: &mut W,
) -> std::io::Result<Option<NarrativeSummary>>
where
    F: FnOnce(&LLMConfig) -> Result<String>,
    W: Write,
{
    info!(input_path = %session.input_path().display(), "Starting employee digest");

    writeln!(out, "Reading spreadsheet...")?;
    match session.load() {
        Ok(_) => writeln!(out, "Data successfully loaded.")?,
        Err(err) => writeln!(out, "{}", err)?,
    }

    writeln!(out, "Processing data...")?;
    match session.aggregate() {
        Ok(_) => writeln!(out, "Data successfully processed.")?,
        Err(err) => writeln!(out, "{}", err)?,
    }

    writeln!(out, "Generating summary...")?;
    let narrative = if session.summary().is_some() {
        match resolve_api_key(&config.llm) {
            Ok(api_key) => session.narrate(&config.llm, &api_key).await,
            Err(err) => Err(err),
        }
    } else {
        // Only the sequence guard runs here; no credential is looked up
        session.narrate(&config.llm, "").await
    };

    match narrative {
        Ok(narrative) => {
            writeln!(out)?;
            writeln!(out, "Generated Summary:")?;
            writeln!(out, "{}", narrative.text)?;
            Ok(Some(narrative))
        }
        Err(err) => {
            writeln!(out, "{}", err)?;
            Ok(None)
        }
    }
}
