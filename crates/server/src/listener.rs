use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::{Semaphore, broadcast};
use tracing::{error, info};

use dhtkv_protocol::Connection;
use dhtkv_storage::Db;

use crate::handle_connection;

/// Aceita conexões até `shutdown` completar, com no máximo
/// `max_connections` simultâneas. Cada conexão roda em sua própria task.
pub async fn serve(
    listener: TcpListener,
    db: Db,
    max_connections: usize,
    shutdown: impl Future<Output = ()>,
) {
    let semaphore = Arc::new(Semaphore::new(max_connections));
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    tokio::pin!(shutdown);

    loop {
        let permit = tokio::select! {
            permit = semaphore.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break, // semáforo fechado
            },
            _ = &mut shutdown => {
                info!("shutdown signal recebido");
                break;
            }
        };

        let (socket, addr) = tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok(v) => v,
                    Err(e) => {
                        error!("erro ao aceitar conexão: {e}");
                        continue;
                    }
                }
            }
            _ = &mut shutdown => {
                info!("shutdown signal recebido");
                break;
            }
        };

        info!("nova conexão: {addr}");
        let db = db.clone();
        let mut shutdown_rx = shutdown_tx.subscribe();

        tokio::spawn(async move {
            let conn = Connection::new(socket);
            if let Err(e) = handle_connection(conn, db, &mut shutdown_rx).await {
                error!("erro na conexão {addr}: {e}");
            }
            info!("conexão encerrada: {addr}");
            drop(permit);
        });
    }

    // Fecha o canal: conexões abertas recebem RecvError e encerram
    drop(shutdown_tx);
}
