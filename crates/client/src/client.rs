use std::io;
use std::time::Duration;

use bytes::Bytes;
use tokio::net::TcpStream;
use tracing::{debug, trace};

use dhtkv_common::{ClientError, ClientResult, ConnectionError, DEFAULT_HOST, DEFAULT_PORT};
use dhtkv_protocol::{Command, Connection, Frame};

use crate::response;

/// Configuração do client: um único endpoint, definido na construção.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Endereço do store, e.g. "127.0.0.1:64221".
    pub endpoint: String,
    /// Limite para conexão + ida e volta. `None` espera indefinidamente.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(format!("{DEFAULT_HOST}:{DEFAULT_PORT}"))
    }
}

/// Um valor devolvido por `get`, com o TTL restante informado pelo store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub value: Bytes,
    pub ttl: Duration,
}

/// Client sem estado além da configuração.
///
/// Cada operação abre sua própria conexão, faz uma única ida e volta e a
/// fecha; clones podem ser usados de várias tasks sem sincronização.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Acrescenta `value` sob `key`. Não sobrescreve: PUTs repetidos podem
    /// gerar entradas adicionais, conforme a política do store.
    ///
    /// O TTL viaja em segundos inteiros (frações são descartadas).
    pub async fn put(&self, key: &[u8], value: &[u8], ttl: Duration) -> ClientResult<()> {
        let cmd = Command::Put {
            key: Bytes::copy_from_slice(key),
            value: Bytes::copy_from_slice(value),
            ttl_secs: ttl.as_secs(),
        };
        response::expect_ok(self.call(cmd).await?)
    }

    /// Insere somente se a chave não tiver valores vivos; caso contrário
    /// retorna `ClientError::KeyExists`.
    pub async fn create(&self, key: &[u8], value: &[u8], ttl: Duration) -> ClientResult<()> {
        let cmd = Command::Create {
            key: Bytes::copy_from_slice(key),
            value: Bytes::copy_from_slice(value),
            ttl_secs: ttl.as_secs(),
        };
        response::expect_ok(self.call(cmd).await?)
    }

    /// Todos os valores vivos da chave. Vazio quando não há nenhum.
    /// A ordem é definida pelo store e não deve ser assumida.
    pub async fn get(&self, key: &[u8]) -> ClientResult<Vec<Entry>> {
        let cmd = Command::Get(Bytes::copy_from_slice(key));
        response::expect_entries(self.call(cmd).await?)
    }

    /// Pede ao store que remova as entradas que casam exatamente com
    /// (`key`, `value`). Retorna quantas o store removeu; remover um par
    /// inexistente retorna 0.
    pub async fn delete(&self, key: &[u8], value: &[u8]) -> ClientResult<u64> {
        let cmd = Command::Delete {
            key: Bytes::copy_from_slice(key),
            value: Bytes::copy_from_slice(value),
        };
        response::expect_count(self.call(cmd).await?)
    }

    pub async fn ping(&self) -> ClientResult<()> {
        response::expect_pong(self.call(Command::Ping(None)).await?)
    }

    async fn call(&self, cmd: Command) -> ClientResult<Frame> {
        debug!(
            command = cmd.name(),
            endpoint = %self.config.endpoint,
            "enviando comando"
        );

        let frame = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.round_trip(&cmd))
                .await
                .map_err(|_| {
                    self.unavailable(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("sem resposta em {limit:?}"),
                    ))
                })??,
            None => self.round_trip(&cmd).await?,
        };

        trace!(command = cmd.name(), reply = frame.kind(), "resposta recebida");
        Ok(frame)
    }

    async fn round_trip(&self, cmd: &Command) -> ClientResult<Frame> {
        let stream = TcpStream::connect(&self.config.endpoint)
            .await
            .map_err(|e| self.unavailable(e))?;
        let mut conn = Connection::new(stream);

        conn.write_frame(&cmd.to_frame())
            .await
            .map_err(|e| self.connection_error(e))?;

        match conn.read_frame().await.map_err(|e| self.connection_error(e))? {
            Some(frame) => Ok(frame),
            None => Err(self.unavailable(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "conexão fechada antes da resposta",
            ))),
        }
    }

    fn connection_error(&self, e: ConnectionError) -> ClientError {
        match e {
            ConnectionError::Protocol(e) => ClientError::Protocol(e),
            ConnectionError::Io(e) => self.unavailable(e),
            ConnectionError::ConnectionReset => self.unavailable(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "conexão resetada no meio da resposta",
            )),
        }
    }

    fn unavailable(&self, source: io::Error) -> ClientError {
        ClientError::RemoteUnavailable {
            endpoint: self.config.endpoint.clone(),
            source,
        }
    }
}
