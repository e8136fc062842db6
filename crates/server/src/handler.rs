use tokio::sync::broadcast;
use tokio::time::Duration;
use tracing::debug;

use dhtkv_common::{CommandError, ConnectionError, StorageError};
use dhtkv_protocol::reply::{ERR_PREFIX, EXISTS_PREFIX, INVALID_ARGUMENT_PREFIX, OK, PONG};
use dhtkv_protocol::{Command, Connection, Frame};
use dhtkv_storage::Db;

/// Loop principal de tratamento de uma conexão.
pub async fn handle_connection(
    mut conn: Connection,
    db: Db,
    shutdown: &mut broadcast::Receiver<()>,
) -> Result<(), ConnectionError> {
    loop {
        let frame = tokio::select! {
            result = conn.read_frame() => result?,
            _ = shutdown.recv() => {
                return Ok(());
            }
        };

        let frame = match frame {
            Some(f) => f,
            None => return Ok(()), // EOF
        };

        let response = match Command::from_frame(frame) {
            Ok(cmd) => {
                debug!(command = cmd.name(), "comando recebido");
                execute_command(cmd, &db).await
            }
            Err(e) => command_error(e),
        };

        conn.write_frame(&response).await?;
    }
}

/// Executa um comando e retorna o Frame de resposta.
pub async fn execute_command(cmd: Command, db: &Db) -> Frame {
    match cmd {
        Command::Ping(msg) => match msg {
            Some(m) => Frame::Bulk(m),
            None => Frame::Simple(PONG.into()),
        },
        Command::Put {
            key,
            value,
            ttl_secs,
        } => match db.put(key, value, Duration::from_secs(ttl_secs)).await {
            Ok(()) => Frame::Simple(OK.into()),
            Err(e) => storage_error(e),
        },
        Command::Create {
            key,
            value,
            ttl_secs,
        } => match db.create(key, value, Duration::from_secs(ttl_secs)).await {
            Ok(()) => Frame::Simple(OK.into()),
            Err(e) => storage_error(e),
        },
        Command::Get(key) => Frame::Array(
            db.get(&key)
                .into_iter()
                .map(|(value, ttl)| {
                    Frame::Array(vec![Frame::Bulk(value), Frame::Integer(ttl_secs(ttl))])
                })
                .collect(),
        ),
        Command::Delete { key, value } => Frame::Integer(db.delete(&key, &value) as i64),
        Command::Unknown(name) => Frame::Error(format!("{ERR_PREFIX} unknown command '{name}'")),
    }
}

fn command_error(e: CommandError) -> Frame {
    match e.argument() {
        Some(argument) => Frame::Error(format!("{INVALID_ARGUMENT_PREFIX} {argument} {e}")),
        None => Frame::Error(format!("{ERR_PREFIX} {e}")),
    }
}

fn storage_error(e: StorageError) -> Frame {
    match e.argument() {
        Some(argument) => Frame::Error(format!("{INVALID_ARGUMENT_PREFIX} {argument} {e}")),
        None => Frame::Error(format!("{EXISTS_PREFIX} {e}")),
    }
}

/// TTL restante em segundos, arredondado para cima: um valor recém-gravado
/// com ttl N é lido de volta como N.
fn ttl_secs(ttl: Duration) -> i64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    i64::try_from(secs).unwrap_or(i64::MAX)
}
