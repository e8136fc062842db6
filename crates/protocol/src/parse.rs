use bytes::Bytes;
use dhtkv_common::CommandError;

use crate::Frame;

/// Cursor sobre um Frame::Array para extrair argumentos sequencialmente.
pub struct Parse {
    parts: std::vec::IntoIter<Frame>,
}

impl Parse {
    /// Cria um Parse a partir de um Frame. O frame deve ser Array.
    pub fn new(frame: Frame) -> Result<Parse, CommandError> {
        match frame {
            Frame::Array(parts) => Ok(Parse {
                parts: parts.into_iter(),
            }),
            other => Err(CommandError::InvalidArgument(format!(
                "esperado array, recebido {}",
                other.kind()
            ))),
        }
    }

    /// Retorna o próximo elemento como String (nome de comando).
    pub fn next_string(&mut self) -> Result<String, CommandError> {
        match self.next()? {
            Frame::Simple(s) => Ok(s),
            Frame::Bulk(data) => String::from_utf8(data.to_vec())
                .map_err(|_| CommandError::InvalidArgument("string UTF-8 inválida".into())),
            other => Err(CommandError::InvalidArgument(format!(
                "esperado string, recebido {}",
                other.kind()
            ))),
        }
    }

    /// Retorna o próximo elemento como bytes opacos, sem nenhuma conversão.
    pub fn next_bytes(&mut self) -> Result<Bytes, CommandError> {
        match self.next()? {
            Frame::Bulk(data) => Ok(data),
            Frame::Simple(s) => Ok(Bytes::from(s)),
            other => Err(CommandError::InvalidArgument(format!(
                "esperado bulk, recebido {}",
                other.kind()
            ))),
        }
    }

    /// Retorna o próximo elemento como inteiro sem sinal (e.g. um TTL).
    pub fn next_u64(&mut self) -> Result<u64, CommandError> {
        match self.next()? {
            Frame::Integer(n) => u64::try_from(n).map_err(|_| not_unsigned(&n.to_string())),
            Frame::Bulk(data) => {
                let s = std::str::from_utf8(&data)
                    .map_err(|_| CommandError::InvalidArgument("inteiro inválido".into()))?;
                s.parse::<u64>().map_err(|_| not_unsigned(s))
            }
            Frame::Simple(s) => s.parse::<u64>().map_err(|_| not_unsigned(&s)),
            other => Err(CommandError::InvalidArgument(format!(
                "esperado inteiro, recebido {}",
                other.kind()
            ))),
        }
    }

    /// Verifica se todos os argumentos foram consumidos.
    pub fn finish(&self) -> Result<(), CommandError> {
        if self.has_remaining() {
            Err(CommandError::InvalidArgument(
                "argumentos extras não esperados".into(),
            ))
        } else {
            Ok(())
        }
    }

    /// Verifica se ainda há argumentos restantes.
    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    /// Retorna o número de argumentos restantes.
    pub fn remaining(&self) -> usize {
        self.parts.len()
    }

    fn next(&mut self) -> Result<Frame, CommandError> {
        self.parts
            .next()
            .ok_or_else(|| CommandError::InvalidArgument("argumentos insuficientes".into()))
    }
}

fn not_unsigned(s: &str) -> CommandError {
    CommandError::InvalidArgument(format!("'{s}' não é um inteiro não negativo"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extracts_strings_and_int() {
        let frame = Frame::array_from_strs(&["PUT", "key", "value", "60"]);
        let mut parse = Parse::new(frame).unwrap();
        assert_eq!(parse.next_string().unwrap(), "PUT");
        assert_eq!(parse.next_bytes().unwrap(), Bytes::from("key"));
        assert_eq!(parse.next_bytes().unwrap(), Bytes::from("value"));
        assert_eq!(parse.next_u64().unwrap(), 60);
        parse.finish().unwrap();
    }

    #[test]
    fn next_bytes_keeps_non_utf8() {
        let raw = Bytes::from_static(&[0xff, 0x00, 0xfe]);
        let frame = Frame::Array(vec![Frame::Bulk(raw.clone())]);
        let mut parse = Parse::new(frame).unwrap();
        assert_eq!(parse.next_bytes().unwrap(), raw);
    }

    #[test]
    fn next_u64_rejects_text() {
        let frame = Frame::array_from_strs(&["abc"]);
        let mut parse = Parse::new(frame).unwrap();
        assert!(parse.next_u64().is_err());
    }

    #[test]
    fn next_u64_accepts_full_range() {
        let frame = Frame::Array(vec![
            Frame::bulk("18446744073709551615"),
            Frame::Integer(7),
            Frame::bulk("-1"),
            Frame::Integer(-1),
        ]);
        let mut parse = Parse::new(frame).unwrap();
        assert_eq!(parse.next_u64().unwrap(), u64::MAX);
        assert_eq!(parse.next_u64().unwrap(), 7);
        assert!(parse.next_u64().is_err());
        assert!(parse.next_u64().is_err());
    }

    #[test]
    fn parse_not_array_fails() {
        let frame = Frame::Simple("OK".into());
        assert!(Parse::new(frame).is_err());
    }

    #[test]
    fn parse_extra_args_fails_finish() {
        let frame = Frame::array_from_strs(&["PING", "a", "b"]);
        let mut parse = Parse::new(frame).unwrap();
        parse.next_string().unwrap();
        parse.next_bytes().unwrap();
        assert!(parse.finish().is_err());
    }

    #[test]
    fn parse_insufficient_args() {
        let frame = Frame::array_from_strs(&["GET"]);
        let mut parse = Parse::new(frame).unwrap();
        parse.next_string().unwrap();
        assert!(parse.next_bytes().is_err());
    }
}
