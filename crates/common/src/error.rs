/// Erros de parsing do protocolo RESP.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("frame incompleto")]
    Incomplete,
    #[error("byte de tipo inválido: {0:#x}")]
    InvalidFrameType(u8),
    #[error("inteiro inválido: {0}")]
    InvalidInteger(String),
    #[error("comprimento de bulk inválido: {0}")]
    InvalidBulkLength(i64),
    #[error("frame excede tamanho máximo ({0} bytes)")]
    FrameTooLarge(usize),
    #[error("encoding inválido: {0}")]
    InvalidEncoding(String),
    #[error("arrays aninhados além de {0} níveis")]
    NestingTooDeep(usize),
    #[error("resposta inesperada: {0}")]
    UnexpectedResponse(String),
}

/// Erros do store de referência.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("chave com {len} bytes excede o limite de {max}")]
    KeyTooLarge { len: usize, max: usize },
    #[error("valor com {len} bytes excede o limite de {max}")]
    ValueTooLarge { len: usize, max: usize },
    #[error("ttl de {secs}s fora do intervalo aceito [1, {max}]")]
    InvalidTtl { secs: u64, max: u64 },
    #[error("chave já possui valores")]
    KeyExists,
}

impl StorageError {
    /// Nome do argumento que violou o limite, quando houver.
    pub fn argument(&self) -> Option<&'static str> {
        match self {
            StorageError::KeyTooLarge { .. } => Some("key"),
            StorageError::ValueTooLarge { .. } => Some("value"),
            StorageError::InvalidTtl { .. } => Some("ttl"),
            StorageError::KeyExists => None,
        }
    }
}

/// Erros de conexão TCP.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("conexão resetada pelo peer")]
    ConnectionReset,
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Erros de parsing/validação de comandos.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("número errado de argumentos para '{0}'")]
    WrongArity(String),
    #[error("argumento inválido: {0}")]
    InvalidArgument(String),
    #[error("ttl inválido: {0}")]
    InvalidTtl(String),
}

impl CommandError {
    /// Nome do argumento rejeitado, quando o erro é de um argumento específico.
    pub fn argument(&self) -> Option<&'static str> {
        match self {
            CommandError::InvalidTtl(_) => Some("ttl"),
            CommandError::WrongArity(_) | CommandError::InvalidArgument(_) => None,
        }
    }
}

/// Erros devolvidos pelo client ao chamador.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("store indisponível em {endpoint}: {source}")]
    RemoteUnavailable {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("argumento '{argument}' rejeitado pelo store: {reason}")]
    InvalidArgument { argument: String, reason: String },
    #[error("chave já existe: {0}")]
    KeyExists(String),
    #[error("erro do store: {0}")]
    Server(String),
}

/// Result type alias do client.
pub type ClientResult<T> = Result<T, ClientError>;
