use bytes::Bytes;
use dhtkv_common::CommandError;

use crate::{Frame, Parse};

/// Comandos aceitos pelo store. Chaves e valores são bytes opacos.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ping(Option<Bytes>),
    /// Acrescenta um valor à chave; não sobrescreve valores existentes.
    Put {
        key: Bytes,
        value: Bytes,
        ttl_secs: u64,
    },
    /// Como `Put`, mas só se a chave não tiver valores vivos.
    Create {
        key: Bytes,
        value: Bytes,
        ttl_secs: u64,
    },
    Get(Bytes),
    /// Remove as entradas cujo valor é exatamente `value`.
    Delete {
        key: Bytes,
        value: Bytes,
    },
    Unknown(String),
}

impl Command {
    /// Faz o parse de um Frame em um Command.
    pub fn from_frame(frame: Frame) -> Result<Command, CommandError> {
        let mut parse = Parse::new(frame)?;
        let cmd_name = parse.next_string()?.to_uppercase();

        let cmd = match cmd_name.as_str() {
            "PING" => {
                let msg = if parse.has_remaining() {
                    Some(parse.next_bytes()?)
                } else {
                    None
                };
                parse.finish()?;
                Command::Ping(msg)
            }
            "PUT" => {
                let (key, value, ttl_secs) = parse_insert(&mut parse, "PUT")?;
                Command::Put {
                    key,
                    value,
                    ttl_secs,
                }
            }
            "CREATE" => {
                let (key, value, ttl_secs) = parse_insert(&mut parse, "CREATE")?;
                Command::Create {
                    key,
                    value,
                    ttl_secs,
                }
            }
            "GET" => {
                expect_arity(&parse, 1, "GET")?;
                Command::Get(parse.next_bytes()?)
            }
            "DELETE" => {
                expect_arity(&parse, 2, "DELETE")?;
                let key = parse.next_bytes()?;
                let value = parse.next_bytes()?;
                Command::Delete { key, value }
            }
            _ => Command::Unknown(cmd_name),
        };

        Ok(cmd)
    }

    /// Encoda o comando como Frame para envio via RESP.
    pub fn to_frame(&self) -> Frame {
        match self {
            Command::Ping(None) => Frame::Array(vec![Frame::bulk("PING")]),
            Command::Ping(Some(msg)) => {
                Frame::Array(vec![Frame::bulk("PING"), Frame::Bulk(msg.clone())])
            }
            Command::Put {
                key,
                value,
                ttl_secs,
            } => insert_frame("PUT", key, value, *ttl_secs),
            Command::Create {
                key,
                value,
                ttl_secs,
            } => insert_frame("CREATE", key, value, *ttl_secs),
            Command::Get(key) => Frame::Array(vec![Frame::bulk("GET"), Frame::Bulk(key.clone())]),
            Command::Delete { key, value } => Frame::Array(vec![
                Frame::bulk("DELETE"),
                Frame::Bulk(key.clone()),
                Frame::Bulk(value.clone()),
            ]),
            Command::Unknown(name) => Frame::Array(vec![Frame::bulk(name)]),
        }
    }

    /// Nome do comando, para logs.
    pub fn name(&self) -> &str {
        match self {
            Command::Ping(_) => "PING",
            Command::Put { .. } => "PUT",
            Command::Create { .. } => "CREATE",
            Command::Get(_) => "GET",
            Command::Delete { .. } => "DELETE",
            Command::Unknown(name) => name,
        }
    }
}

fn expect_arity(parse: &Parse, expected: usize, name: &str) -> Result<(), CommandError> {
    if parse.remaining() != expected {
        return Err(CommandError::WrongArity(name.into()));
    }
    Ok(())
}

fn parse_insert(parse: &mut Parse, name: &str) -> Result<(Bytes, Bytes, u64), CommandError> {
    expect_arity(parse, 3, name)?;
    let key = parse.next_bytes()?;
    let value = parse.next_bytes()?;
    let ttl_secs = parse
        .next_u64()
        .map_err(|e| match e {
            CommandError::InvalidArgument(reason) => CommandError::InvalidTtl(reason),
            other => other,
        })?;
    Ok((key, value, ttl_secs))
}

fn insert_frame(name: &str, key: &Bytes, value: &Bytes, ttl_secs: u64) -> Frame {
    Frame::Array(vec![
        Frame::bulk(name),
        Frame::Bulk(key.clone()),
        Frame::Bulk(value.clone()),
        Frame::bulk(&ttl_secs.to_string()),
    ])
}
