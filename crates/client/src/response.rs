//! Decodificação das respostas do store nos tipos do client.

use std::time::Duration;

use dhtkv_common::{ClientError, ClientResult, ProtocolError};
use dhtkv_protocol::Frame;
use dhtkv_protocol::reply::{EXISTS_PREFIX, INVALID_ARGUMENT_PREFIX, OK, PONG};

use crate::Entry;

pub(crate) fn expect_ok(frame: Frame) -> ClientResult<()> {
    match frame {
        Frame::Simple(s) if s == OK => Ok(()),
        Frame::Error(msg) => Err(server_error(msg)),
        other => Err(unexpected("+OK", &other)),
    }
}

pub(crate) fn expect_pong(frame: Frame) -> ClientResult<()> {
    match frame {
        Frame::Simple(s) if s == PONG => Ok(()),
        Frame::Error(msg) => Err(server_error(msg)),
        other => Err(unexpected("+PONG", &other)),
    }
}

pub(crate) fn expect_count(frame: Frame) -> ClientResult<u64> {
    match frame {
        Frame::Integer(n) if n >= 0 => Ok(n as u64),
        Frame::Error(msg) => Err(server_error(msg)),
        other => Err(unexpected("inteiro não negativo", &other)),
    }
}

/// Espera um array de pares `[bulk valor, inteiro ttl]`.
pub(crate) fn expect_entries(frame: Frame) -> ClientResult<Vec<Entry>> {
    let items = match frame {
        Frame::Array(items) => items,
        Frame::Error(msg) => return Err(server_error(msg)),
        other => return Err(unexpected("array de entradas", &other)),
    };

    items
        .into_iter()
        .map(|item| match item {
            Frame::Array(pair) => match <[Frame; 2]>::try_from(pair) {
                Ok([Frame::Bulk(value), Frame::Integer(ttl)]) if ttl >= 0 => Ok(Entry {
                    value,
                    ttl: Duration::from_secs(ttl as u64),
                }),
                Ok(_) => Err(ProtocolError::UnexpectedResponse(
                    "entrada deve ser [bulk, inteiro >= 0]".into(),
                )
                .into()),
                Err(pair) => Err(ProtocolError::UnexpectedResponse(format!(
                    "entrada com {} elementos, esperado 2",
                    pair.len()
                ))
                .into()),
            },
            other => Err(unexpected("par [valor, ttl]", &other)),
        })
        .collect()
}

/// Traduz um `-ERRO` do store para a taxonomia do client.
pub(crate) fn server_error(msg: String) -> ClientError {
    if let Some(rest) = strip_code(&msg, INVALID_ARGUMENT_PREFIX) {
        let (argument, reason) = rest.split_once(' ').unwrap_or((rest, ""));
        return ClientError::InvalidArgument {
            argument: argument.to_string(),
            reason: reason.to_string(),
        };
    }
    if let Some(rest) = strip_code(&msg, EXISTS_PREFIX) {
        return ClientError::KeyExists(rest.to_string());
    }
    ClientError::Server(msg)
}

fn strip_code<'a>(msg: &'a str, code: &str) -> Option<&'a str> {
    let rest = msg.strip_prefix(code)?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix(' ')
}

fn unexpected(expected: &str, got: &Frame) -> ClientError {
    ProtocolError::UnexpectedResponse(format!("esperado {expected}, recebido {}", got.kind()))
        .into()
}
