//! Crop yield collection service entry point
//!
//! Serves the HTTP API, plus small CLI conveniences for submitting and
//! listing observations against the same store.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crop_yield_api::handler::{create_router, AppState};
use crop_yield_api::schema::CollectRequest;
use crop_yield_api::store::{MongoYieldStore, YieldStore, DEFAULT_DATABASE};

#[derive(Parser)]
#[command(name = "crop-yield-api")]
#[command(about = "Crop yield collection service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000", env = "PORT")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// MongoDB connection string
        #[arg(long, env = "MONGO_URI")]
        mongo_uri: String,

        /// Database name, used when the URI does not carry one
        #[arg(long, default_value = DEFAULT_DATABASE, env = "MONGO_DB")]
        db: String,
    },

    /// Submit a single observation
    Collect {
        /// Crop name
        #[arg(long)]
        crop_name: String,

        /// Yield amount
        #[arg(long)]
        yield_amount: f64,

        /// Location of the observation
        #[arg(long)]
        location: String,

        #[arg(long, env = "MONGO_URI")]
        mongo_uri: String,

        #[arg(long, default_value = DEFAULT_DATABASE, env = "MONGO_DB")]
        db: String,
    },

    /// Print every stored observation, newest first
    List {
        #[arg(long, env = "MONGO_URI")]
        mongo_uri: String,

        #[arg(long, default_value = DEFAULT_DATABASE, env = "MONGO_DB")]
        db: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            host,
            mongo_uri,
            db,
        } => {
            // Connect once before accepting requests; failure here is fatal
            let store = MongoYieldStore::connect(&mongo_uri, &db).await?;
            let state = Arc::new(AppState::new(Arc::new(store)));
            let router = create_router(state);

            let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
            tracing::info!("Starting crop yield service on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await?;
        }

        Commands::Collect {
            crop_name,
            yield_amount,
            location,
            mongo_uri,
            db,
        } => {
            let store = MongoYieldStore::connect(&mongo_uri, &db).await?;

            // Same validation path as the HTTP route
            let candidate = CollectRequest {
                crop_name: Some(crop_name),
                yield_amount: Some(yield_amount),
                location: Some(location),
            }
            .validate()?;

            let stored = store.insert(candidate).await?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }

        Commands::List { mongo_uri, db } => {
            let store = MongoYieldStore::connect(&mongo_uri, &db).await?;
            let records = store.list_all().await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }

    Ok(())
}
