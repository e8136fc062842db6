use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, CommandFactory, Parser, Subcommand, error::ErrorKind};
use tracing::debug;

use dhtkv_client::{Client, ClientConfig};
use dhtkv_common::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TTL_SECS};

mod input;

use input::{InputError, read_value};

#[derive(Parser, Debug)]
#[command(name = "dhtkv", about = "Client de linha de comando para o store multi-valorado")]
struct Cli {
    #[arg(long, env = "DHTKV_HOST", default_value = DEFAULT_HOST)]
    host: String,
    #[arg(long, short, env = "DHTKV_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Limite por operação (conexão + resposta), em milissegundos
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Acrescenta um valor à chave
    Put(WriteArgs),
    /// Grava somente se a chave ainda não tiver valores
    Create(WriteArgs),
    /// Escreve os valores da chave em stdout, sem separador
    Get {
        key: OsString,
        /// Grava os valores neste arquivo em vez de stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Não informa o TTL em stderr
        #[arg(long, short)]
        quiet: bool,
    },
    /// Remove as entradas com exatamente este valor
    Delete(ValueArgs),
    Ping,
}

#[derive(Args, Debug)]
struct ValueArgs {
    key: OsString,
    #[arg(required_unless_present = "input")]
    value: Option<OsString>,
    /// Lê o valor deste arquivo (`-` para stdin)
    #[arg(long, short, conflicts_with = "value")]
    input: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct WriteArgs {
    #[command(flatten)]
    source: ValueArgs,
    /// Tempo de vida em segundos
    #[arg(long, default_value_t = DEFAULT_TTL_SECS)]
    ttl: u64,
}

impl ValueArgs {
    async fn resolve(self) -> anyhow::Result<(Vec<u8>, Vec<u8>)> {
        let value = match read_value(self.value, self.input.as_deref()).await {
            Ok(value) => value,
            Err(InputError::MissingValue) => Cli::command()
                .error(ErrorKind::MissingRequiredArgument, InputError::MissingValue)
                .exit(),
            Err(e) => return Err(e.into()),
        };
        Ok((self.key.into_encoded_bytes(), value))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let client = Client::new(client_config(&cli));
    debug!(endpoint = %client.config().endpoint, "cli configurado");

    match cli.command {
        Cmd::Put(args) => {
            let (key, value) = args.source.resolve().await?;
            client.put(&key, &value, Duration::from_secs(args.ttl)).await?;
            println!("OK");
        }
        Cmd::Create(args) => {
            let (key, value) = args.source.resolve().await?;
            client
                .create(&key, &value, Duration::from_secs(args.ttl))
                .await?;
            println!("OK");
        }
        Cmd::Get { key, output, quiet } => {
            let entries = client.get(&key.into_encoded_bytes()).await?;

            let mut out = Vec::new();
            for entry in &entries {
                if !quiet {
                    eprintln!("ttl: {}s ({} bytes)", entry.ttl.as_secs(), entry.value.len());
                }
                out.extend_from_slice(&entry.value);
            }

            match output {
                Some(path) => tokio::fs::write(&path, &out).await?,
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&out)?;
                    stdout.flush()?;
                }
            }
        }
        Cmd::Delete(args) => {
            let (key, value) = args.resolve().await?;
            let removed = client.delete(&key, &value).await?;
            println!("{removed}");
        }
        Cmd::Ping => {
            client.ping().await?;
            println!("PONG");
        }
    }

    Ok(())
}

fn client_config(cli: &Cli) -> ClientConfig {
    let config = ClientConfig::new(format!("{}:{}", cli.host, cli.port));
    match cli.timeout_ms {
        Some(ms) => config.with_timeout(Duration::from_millis(ms)),
        None => config,
    }
}
