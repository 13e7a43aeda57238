use clap::{Parser, ValueEnum};
use distrag_api::RestApi;
use distrag_core::{Embedder, Engine, EngineConfig, RecordStore};
use distrag_embed::{HashingEmbedder, HttpEmbedder, HttpEmbedderConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EmbedderKind {
    /// Offline feature hashing
    Hashing,
    /// OpenAI-compatible embeddings endpoint
    Http,
}

/// Answer questions about district rainfall, groundwater and population
#[derive(Parser, Debug)]
#[command(name = "distrag")]
#[command(about = "District data retrieval chatbot", long_about = None)]
struct Args {
    /// Path to the JSON dataset
    #[arg(short, long, default_value = "./data.json")]
    data: PathBuf,

    /// HTTP API port
    #[arg(long, default_value_t = 5000)]
    http_port: u16,

    /// Number of nearest records to consider per query
    #[arg(long, default_value_t = distrag_core::config::DEFAULT_TOP_K)]
    top_k: usize,

    /// Maximum L2 distance for a record to count as relevant
    /// [default: chosen by the embedding provider]
    #[arg(long)]
    distance_threshold: Option<f32>,

    /// Embedding provider
    #[arg(long, value_enum, default_value_t = EmbedderKind::Hashing)]
    embedder: EmbedderKind,

    /// Base URL of the embeddings server (for --embedder http)
    #[arg(long, default_value = "http://localhost:8080/v1")]
    embedding_url: String,

    /// Embedding model name (for --embedder http)
    #[arg(long, default_value = distrag_embed::http::DEFAULT_MODEL)]
    embedding_model: String,

    /// Embedding dimension
    #[arg(long, default_value_t = distrag_embed::hashing::DEFAULT_DIM)]
    embedding_dim: usize,

    /// Answer a single query, print it and exit instead of serving
    #[arg(short, long)]
    query: Option<String>,

    /// Print the one-shot answer as JSON
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn build_engine(args: &Args) -> anyhow::Result<Engine> {
    let store = RecordStore::load(&args.data)?;
    info!("Loaded {} records from {:?}", store.len(), args.data);

    let embedder: Arc<dyn Embedder> = match args.embedder {
        EmbedderKind::Hashing => Arc::new(HashingEmbedder::new(args.embedding_dim)),
        EmbedderKind::Http => Arc::new(HttpEmbedder::new(HttpEmbedderConfig::new(
            args.embedding_url.clone(),
            args.embedding_model.clone(),
            args.embedding_dim,
        ))?),
    };

    let config = EngineConfig {
        top_k: args.top_k,
        distance_threshold: args
            .distance_threshold
            .unwrap_or_else(|| embedder.recommended_threshold()),
        ..Default::default()
    };

    info!("Distance threshold {}", config.distance_threshold);

    Ok(Engine::build(store, embedder, config)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting distrag v{}", env!("CARGO_PKG_VERSION"));

    // Building embeds every record and may block on an embeddings server.
    let (engine, args) = tokio::task::spawn_blocking(move || {
        let engine = build_engine(&args);
        (engine, args)
    })
    .await?;
    let engine = Arc::new(engine?);

    if let Some(query) = args.query.clone() {
        let engine = engine.clone();
        let response = tokio::task::spawn_blocking(move || engine.handle_query(&query)).await?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            print!("{}", response);
        }
        return Ok(());
    }

    let http_port = args.http_port;
    let engine_http = engine.clone();
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(engine_http, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("distrag started successfully");
    info!("HTTP API: http://localhost:{}/chat", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use distrag_core::ResponseKind;

    fn sample_args(extra: &[&str]) -> Args {
        let data = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample.json");
        let mut argv = vec!["distrag", "--data", data];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_default_args_answer_district_query() {
        let engine = build_engine(&sample_args(&[])).unwrap();
        assert_eq!(engine.config().distance_threshold, distrag_embed::hashing::DISTANCE_THRESHOLD);

        let response = engine.handle_query("Ariyalur rainfall in 2020");
        assert_eq!(response.kind, ResponseKind::Table);
        assert_eq!(response.rows[0].district, "Ariyalur");
        assert!(response.chart.is_some());
    }

    #[test]
    fn test_explicit_threshold_wins() {
        let engine = build_engine(&sample_args(&["--distance-threshold", "0.5"])).unwrap();
        assert_eq!(engine.config().distance_threshold, 0.5);
    }
}
