use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use dhtkv_common::{
    DEFAULT_HOST, DEFAULT_MAX_KEY_BYTES, DEFAULT_MAX_TTL_SECS, DEFAULT_MAX_VALUE_BYTES,
    DEFAULT_PORT, MAX_CONNECTIONS,
};
use dhtkv_server::serve;
use dhtkv_storage::{Db, PutPolicy, StoreConfig, StoreLimits};

#[derive(Parser, Debug)]
#[command(name = "dhtkv-server", about = "Store multi-valorado de referência do dhtkv")]
struct Args {
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
    #[arg(long, default_value_t = MAX_CONNECTIONS)]
    max_connections: usize,
    /// accumulate: todo PUT cria entrada nova; refresh: PUT repetido renova o TTL
    #[arg(long, default_value = "accumulate", value_parser = parse_put_policy)]
    put_policy: PutPolicy,
    #[arg(long, default_value_t = DEFAULT_MAX_KEY_BYTES)]
    max_key_bytes: usize,
    #[arg(long, default_value_t = DEFAULT_MAX_VALUE_BYTES)]
    max_value_bytes: usize,
    /// Maior TTL aceito em PUT/CREATE, em segundos
    #[arg(long, default_value_t = DEFAULT_MAX_TTL_SECS)]
    max_ttl_secs: u64,
}

fn parse_put_policy(s: &str) -> Result<PutPolicy, String> {
    match s.to_lowercase().as_str() {
        "accumulate" => Ok(PutPolicy::Accumulate),
        "refresh" => Ok(PutPolicy::Refresh),
        _ => Err(format!("valor inválido: '{s}'. Use: accumulate, refresh")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dhtkv_server=info".into()),
        )
        .init();

    let args = Args::parse();
    let addr = format!("{}:{}", args.host, args.port);

    let config = StoreConfig {
        put_policy: args.put_policy,
        limits: StoreLimits {
            max_key_bytes: args.max_key_bytes,
            max_value_bytes: args.max_value_bytes,
            max_ttl: Duration::from_secs(args.max_ttl_secs),
        },
    };
    let db = Db::with_config(config);

    let listener = TcpListener::bind(&addr).await?;
    info!(
        put_policy = ?config.put_policy,
        max_key_bytes = config.limits.max_key_bytes,
        max_value_bytes = config.limits.max_value_bytes,
        max_ttl_secs = config.limits.max_ttl.as_secs(),
        "dhtkv escutando em {addr}"
    );

    serve(listener, db, args.max_connections, async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("falha ao instalar handler de ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    })
    .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_put_policy() {
        assert_eq!(parse_put_policy("accumulate"), Ok(PutPolicy::Accumulate));
        assert_eq!(parse_put_policy("REFRESH"), Ok(PutPolicy::Refresh));
        assert!(parse_put_policy("dedupe").is_err());
    }

    #[test]
    fn args_defaults() {
        let args = Args::parse_from(["dhtkv-server"]);
        assert_eq!(args.port, DEFAULT_PORT);
        assert_eq!(args.put_policy, PutPolicy::Accumulate);
        assert_eq!(args.max_ttl_secs, DEFAULT_MAX_TTL_SECS);
    }
}
