use clap::Parser;
use statboard::{BlockList, Config, StatsDB};
use statboard_server::{Authorizer, Handler, run_server};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

const SNAPSHOT_FILE: &str = "statboard.snapshot";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Listen address; a bare `:port` binds every interface
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind: String,

    /// Secret required in `Authorization: Key <secret>` for writes
    #[arg(long, env = "MUTATION_KEY", hide_env_values = true)]
    mutation_key: String,

    /// Secret that lifts the leaderboard record cap
    #[arg(long, env = "LIMIT_EXPANSION_KEY", hide_env_values = true)]
    limit_expansion_key: Option<String>,

    #[arg(short, long, env = "STATS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// File of block ids counted towards `blocks_placed`
    #[arg(long, env = "BLOCK_LIST")]
    block_list: Option<PathBuf>,

    /// TOML core configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn bind_address(raw: &str) -> String {
    match raw.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{}", port),
        None => raw.to_string(),
    }
}

/// An empty value leaves any key from the config file in place.
fn with_cli_override_key(config: Config, raw: Option<&str>) -> Config {
    match raw.filter(|key| !key.is_empty()) {
        Some(key) => config.with_limit_override_key(Some(key)),
        None => config,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "statboard_server=info,statboard=info,info".into()),
        )
        .init();

    let args = Args::parse();
    let auth = Authorizer::new(&args.mutation_key)?;

    let config = match &args.config {
        Some(path) => Config::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    let config = with_cli_override_key(config, args.limit_expansion_key.as_deref());

    let mut builder = StatsDB::builder().config(config);
    if let Some(dir) = &args.data_dir {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(SNAPSHOT_FILE);
        info!("Opening database snapshot at {}", path.display());
        builder = builder.snapshot_path(path);
    } else {
        info!("Opening in-memory database");
    }
    if let Some(path) = &args.block_list {
        let blocks = BlockList::from_file(path)?;
        info!("Loaded {} block ids from {}", blocks.len(), path.display());
        builder = builder.block_classifier(Arc::new(blocks));
    }
    let db = Arc::new(builder.build()?);

    let listener = tokio::net::TcpListener::bind(bind_address(&args.bind)).await?;
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl_c signal: {}", e);
            futures::future::pending::<()>().await;
        }
    };

    run_server(listener, Handler::new(db.clone(), auth), shutdown).await?;

    info!("Flushing database");
    db.close()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        assert_eq!(bind_address(":8080"), "0.0.0.0:8080");
        assert_eq!(bind_address("127.0.0.1:3000"), "127.0.0.1:3000");
    }

    #[test]
    fn test_empty_cli_override_key_keeps_config_key() {
        let config = Config::default().with_limit_override_key(Some("from-file"));

        let merged = with_cli_override_key(config.clone(), Some(""));
        assert_eq!(merged.limit_override_key.as_deref(), Some("from-file"));

        let merged = with_cli_override_key(config.clone(), None);
        assert_eq!(merged.limit_override_key.as_deref(), Some("from-file"));

        let merged = with_cli_override_key(config, Some("from-env"));
        assert_eq!(merged.limit_override_key.as_deref(), Some("from-env"));
    }
}
