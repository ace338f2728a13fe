mod config;
mod dataset;
mod errors;
mod llm_client;
mod models;
mod nearby;
mod presenter;
mod recommend;
mod routes;
mod state;

use std::io::BufRead;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::dataset::Dataset;
use crate::llm_client::openai::OpenAiGateway;
use crate::llm_client::{build_gateway, ModelGateway, Provider};
use crate::nearby::maps::{GoogleMapsClient, MapsProvider};
use crate::nearby::service::{find_nearby, NearbyRequest, DEFAULT_RADIUS_MILES};
use crate::recommend::pipeline::recommend;
use crate::routes::build_router;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "restaurant-recs", version, about = "Manhattan restaurant recommendations")]
struct Cli {
    /// Override RECOMMENDER_PROVIDER for the dataset flow
    #[arg(long, value_enum, global = true)]
    provider: Option<Provider>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Ask for recommendations from the inspection dataset
    Ask {
        /// Free-text request; read from stdin when omitted
        query: Option<String>,
    },
    /// Find top-rated restaurants near an address
    Nearby {
        #[arg(long)]
        address: String,
        #[arg(long)]
        cuisine: String,
        #[arg(long, default_value_t = DEFAULT_RADIUS_MILES)]
        radius: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(provider) = cli.provider {
        config.recommender_provider = provider;
    }

    // Logs go to stderr so console answers stay clean on stdout
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let state = build_state(config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(state).await,
        Command::Ask { query } => {
            let query = match query {
                Some(q) => q,
                None => read_query()?,
            };
            ask(&state, &query).await;
            Ok(())
        }
        Command::Nearby {
            address,
            cuisine,
            radius,
        } => {
            let request = NearbyRequest {
                address,
                cuisine,
                radius_miles: radius,
            };
            nearby(&state, &request).await;
            Ok(())
        }
    }
}

async fn build_state(config: Config) -> Result<AppState> {
    let dataset_path = config.dataset_path.clone();
    let dataset = tokio::task::spawn_blocking(move || Dataset::load_csv(&dataset_path))
        .await
        .context("dataset loader task panicked")?
        .with_context(|| format!("failed to load dataset from {}", config.dataset_path))?;
    info!("Dataset covers {} cuisines", dataset.distinct_cuisines().len());

    let recommender = build_gateway(config.recommender_provider, &config.gateway_settings())
        .context("failed to initialize recommendation model")?;
    info!(
        "Recommendation model: {} ({})",
        recommender.provider_name(),
        recommender.model_name()
    );

    let dish_model: Option<Arc<dyn ModelGateway>> = match &config.openai_api_key {
        Some(key) => {
            let gateway = OpenAiGateway::new(
                &config.openai_base_url,
                &config.openai_model,
                key.clone(),
                Duration::from_secs(config.llm_timeout_secs),
            )
            .context("failed to initialize dish suggestion model")?;
            Some(Arc::new(gateway))
        }
        None => {
            info!("OPENAI_API_KEY not set; dish suggestions disabled");
            None
        }
    };

    let maps: Option<Arc<dyn MapsProvider>> = match &config.google_maps_api_key {
        Some(key) => Some(Arc::new(GoogleMapsClient::new(key.clone()))),
        None => {
            info!("GOOGLE_MAPS_API_KEY not set; nearby search disabled");
            None
        }
    };

    Ok(AppState {
        dataset: Arc::new(dataset),
        selector: config.selector(),
        recommender,
        dish_model,
        maps,
        config,
    })
}

async fn serve(state: AppState) -> Result<()> {
    info!("Starting restaurant-recs API v{}", env!("CARGO_PKG_VERSION"));
    let port = state.config.port;

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn read_query() -> Result<String> {
    eprint!("Ask for a restaurant recommendation: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read query from stdin")?;
    Ok(line.trim().to_string())
}

async fn ask(state: &AppState, query: &str) {
    match recommend(
        query,
        &state.dataset,
        state.recommender.as_ref(),
        &state.selector,
    )
    .await
    {
        Ok(outcome) => println!("{}", presenter::render_outcome(&outcome)),
        Err(err) => {
            tracing::error!("Recommendation failed: {err}");
            println!("{}", err.user_message());
        }
    }
}

async fn nearby(state: &AppState, request: &NearbyRequest) {
    let (Some(maps), Some(dish_model)) = (&state.maps, &state.dish_model) else {
        println!("Nearby search requires GOOGLE_MAPS_API_KEY and OPENAI_API_KEY.");
        return;
    };

    match find_nearby(maps.as_ref(), dish_model.as_ref(), request).await {
        Ok(response) => println!("{}", presenter::render_nearby(&response)),
        Err(err) => {
            tracing::error!("Nearby search failed: {err}");
            println!("{}", err.user_message());
        }
    }
}
