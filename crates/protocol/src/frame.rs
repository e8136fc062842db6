use bytes::{Buf, BufMut, Bytes, BytesMut};
use dhtkv_common::{MAX_FRAME_DEPTH, MAX_FRAME_SIZE, ProtocolError};
use std::io::Cursor;

/// Frame RESP2. Chaves e valores sempre trafegam como `Bulk`, que é
/// prefixado por comprimento e portanto seguro para bytes arbitrários.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    Null,
    Array(Vec<Frame>),
}

impl Frame {
    /// Verifica se um frame completo está disponível no buffer sem alocar.
    /// Retorna Ok(()) se completo, Err(Incomplete) se precisa mais dados.
    pub fn check(src: &mut Cursor<&[u8]>) -> Result<(), ProtocolError> {
        check_at(src, 0)
    }

    /// Faz o parse de um frame completo a partir do cursor.
    /// Deve ser chamado apenas após `check()` retornar Ok.
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Frame, ProtocolError> {
        parse_at(src, 0)
    }

    /// Encoda o frame no buffer de saída em formato RESP2.
    pub fn encode(&self, dst: &mut BytesMut) {
        match self {
            Frame::Simple(s) => {
                dst.put_u8(b'+');
                dst.put(s.as_bytes());
                dst.put(&b"\r\n"[..]);
            }
            Frame::Error(s) => {
                dst.put_u8(b'-');
                dst.put(s.as_bytes());
                dst.put(&b"\r\n"[..]);
            }
            Frame::Integer(n) => {
                dst.put_u8(b':');
                dst.put(n.to_string().as_bytes());
                dst.put(&b"\r\n"[..]);
            }
            Frame::Bulk(data) => {
                dst.put_u8(b'$');
                dst.put(data.len().to_string().as_bytes());
                dst.put(&b"\r\n"[..]);
                dst.put(data.as_ref());
                dst.put(&b"\r\n"[..]);
            }
            Frame::Null => {
                dst.put(&b"$-1\r\n"[..]);
            }
            Frame::Array(frames) => {
                dst.put_u8(b'*');
                dst.put(frames.len().to_string().as_bytes());
                dst.put(&b"\r\n"[..]);
                for frame in frames {
                    frame.encode(dst);
                }
            }
        }
    }

    /// Helper: cria um Frame::Bulk a partir de &str.
    pub fn bulk(s: &str) -> Frame {
        Frame::Bulk(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Helper: cria um Array de Bulk strings a partir de &[&str].
    pub fn array_from_strs(strs: &[&str]) -> Frame {
        Frame::Array(strs.iter().map(|s| Frame::bulk(s)).collect())
    }

    /// Nome curto do tipo do frame, usado em mensagens de erro.
    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Simple(_) => "simple",
            Frame::Error(_) => "error",
            Frame::Integer(_) => "integer",
            Frame::Bulk(_) => "bulk",
            Frame::Null => "null",
            Frame::Array(_) => "array",
        }
    }
}

fn check_at(src: &mut Cursor<&[u8]>, depth: usize) -> Result<(), ProtocolError> {
    match get_u8(src)? {
        b'+' | b'-' | b':' => {
            get_line(src)?;
            Ok(())
        }
        b'$' => {
            let len = get_decimal(src)?;
            if len == -1 {
                return Ok(());
            }
            let len = checked_len(len)?;
            skip(src, len + 2)?; // data + \r\n
            Ok(())
        }
        b'*' => {
            let depth = nested(depth)?;
            let count = get_decimal(src)?;
            if count == -1 {
                return Ok(());
            }
            let count = checked_len(count)?;
            for _ in 0..count {
                check_at(src, depth)?;
            }
            Ok(())
        }
        byte => Err(ProtocolError::InvalidFrameType(byte)),
    }
}

fn parse_at(src: &mut Cursor<&[u8]>, depth: usize) -> Result<Frame, ProtocolError> {
    match get_u8(src)? {
        b'+' => Ok(Frame::Simple(get_text(src)?)),
        b'-' => Ok(Frame::Error(get_text(src)?)),
        b':' => Ok(Frame::Integer(get_decimal(src)?)),
        b'$' => {
            let len = get_decimal(src)?;
            if len == -1 {
                return Ok(Frame::Null);
            }
            let len = checked_len(len)?;
            if src.remaining() < len + 2 {
                return Err(ProtocolError::Incomplete);
            }
            let start = src.position() as usize;
            let data = Bytes::copy_from_slice(&src.get_ref()[start..start + len]);
            src.set_position((start + len + 2) as u64);
            Ok(Frame::Bulk(data))
        }
        b'*' => {
            let depth = nested(depth)?;
            let count = get_decimal(src)?;
            if count == -1 {
                return Ok(Frame::Null);
            }
            let count = checked_len(count)?;
            let mut frames = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                frames.push(parse_at(src, depth)?);
            }
            Ok(Frame::Array(frames))
        }
        byte => Err(ProtocolError::InvalidFrameType(byte)),
    }
}

/// Profundidade dos elementos de um array; além de `MAX_FRAME_DEPTH` o
/// frame é rejeitado antes de descer na recursão.
fn nested(depth: usize) -> Result<usize, ProtocolError> {
    if depth >= MAX_FRAME_DEPTH {
        return Err(ProtocolError::NestingTooDeep(MAX_FRAME_DEPTH));
    }
    Ok(depth + 1)
}

fn checked_len(len: i64) -> Result<usize, ProtocolError> {
    if len < 0 {
        return Err(ProtocolError::InvalidBulkLength(len));
    }
    let len = len as usize;
    if len > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge(len));
    }
    Ok(len)
}

fn get_u8(src: &mut Cursor<&[u8]>) -> Result<u8, ProtocolError> {
    if !src.has_remaining() {
        return Err(ProtocolError::Incomplete);
    }
    Ok(src.get_u8())
}

fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], ProtocolError> {
    let start = src.position() as usize;
    let buf: &'a [u8] = *src.get_ref();

    match buf[start..].windows(2).position(|w| w == b"\r\n") {
        Some(offset) => {
            src.set_position((start + offset + 2) as u64);
            Ok(&buf[start..start + offset])
        }
        None => Err(ProtocolError::Incomplete),
    }
}

fn get_text(src: &mut Cursor<&[u8]>) -> Result<String, ProtocolError> {
    let line = get_line(src)?;
    String::from_utf8(line.to_vec()).map_err(|e| ProtocolError::InvalidEncoding(e.to_string()))
}

fn get_decimal(src: &mut Cursor<&[u8]>) -> Result<i64, ProtocolError> {
    let line = get_line(src)?;
    let s = std::str::from_utf8(line).map_err(|e| ProtocolError::InvalidInteger(e.to_string()))?;
    s.parse::<i64>()
        .map_err(|e| ProtocolError::InvalidInteger(e.to_string()))
}

fn skip(src: &mut Cursor<&[u8]>, n: usize) -> Result<(), ProtocolError> {
    if src.remaining() < n {
        return Err(ProtocolError::Incomplete);
    }
    src.set_position(src.position() + n as u64);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(frame: &Frame) {
        let mut buf = BytesMut::new();
        frame.encode(&mut buf);
        let bytes = buf.freeze();
        let mut cursor = Cursor::new(bytes.as_ref());
        Frame::check(&mut cursor).unwrap();
        assert_eq!(cursor.position() as usize, bytes.len());
        cursor.set_position(0);
        let parsed = Frame::parse(&mut cursor).unwrap();
        assert_eq!(&parsed, frame);
    }

    #[test]
    fn roundtrip_bulk_with_binary_payload() {
        // NUL, CRLF embutido e bytes fora de ASCII precisam sobreviver intactos
        let data: Vec<u8> = vec![0x00, b'\r', b'\n', 0xff, 0x80, b'$', b'-', b'1', 0x00];
        roundtrip(&Frame::Bulk(Bytes::from(data)));
        roundtrip(&Frame::Bulk(Bytes::new()));
    }

    #[test]
    fn roundtrip_get_reply_shape() {
        let frame = Frame::Array(vec![
            Frame::Array(vec![Frame::Bulk(Bytes::from_static(b"v1")), Frame::Integer(100)]),
            Frame::Array(vec![Frame::Bulk(Bytes::from_static(&[0xde, 0xad])), Frame::Integer(7)]),
        ]);
        roundtrip(&frame);
        roundtrip(&Frame::Array(vec![]));
    }

    #[test]
    fn roundtrip_error_and_integer() {
        roundtrip(&Frame::Error("INVALIDARG key too large".into()));
        roundtrip(&Frame::Integer(-1));
        roundtrip(&Frame::Null);
    }

    #[test]
    fn incomplete_frame() {
        let data = b"+OK\r"; // falta \n
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            Frame::check(&mut cursor),
            Err(ProtocolError::Incomplete)
        ));
    }

    #[test]
    fn incomplete_bulk() {
        let data = b"$5\r\nhel";
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            Frame::check(&mut cursor),
            Err(ProtocolError::Incomplete)
        ));
    }

    #[test]
    fn incomplete_nested_array() {
        let data = b"*2\r\n*2\r\n$2\r\nv1\r\n";
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            Frame::check(&mut cursor),
            Err(ProtocolError::Incomplete)
        ));
    }

    #[test]
    fn invalid_frame_type() {
        let data = b"?invalid\r\n";
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            Frame::check(&mut cursor),
            Err(ProtocolError::InvalidFrameType(b'?'))
        ));
    }

    #[test]
    fn negative_bulk_length_rejected() {
        let data = b"$-5\r\n";
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            Frame::check(&mut cursor),
            Err(ProtocolError::InvalidBulkLength(-5))
        ));
    }

    #[test]
    fn oversized_bulk_rejected() {
        let data = format!("${}\r\n", MAX_FRAME_SIZE + 1);
        let mut cursor = Cursor::new(data.as_bytes());
        assert!(matches!(
            Frame::check(&mut cursor),
            Err(ProtocolError::FrameTooLarge(_))
        ));
    }

    #[test]
    fn deeply_nested_arrays_rejected() {
        let data = b"*1\r\n".repeat(1_000_000);
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            Frame::check(&mut cursor),
            Err(ProtocolError::NestingTooDeep(MAX_FRAME_DEPTH))
        ));

        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            Frame::parse(&mut cursor),
            Err(ProtocolError::NestingTooDeep(_))
        ));
    }

    #[test]
    fn nesting_up_to_limit_accepted() {
        let mut frame = Frame::Integer(1);
        for _ in 0..MAX_FRAME_DEPTH {
            frame = Frame::Array(vec![frame]);
        }
        roundtrip(&frame);

        let frame = Frame::Array(vec![frame]);
        let mut buf = BytesMut::new();
        frame.encode(&mut buf);
        let mut cursor = Cursor::new(&buf[..]);
        assert!(matches!(
            Frame::check(&mut cursor),
            Err(ProtocolError::NestingTooDeep(_))
        ));
    }

    #[test]
    fn encode_put_command() {
        let frame = Frame::array_from_strs(&["PUT", "k", "v", "60"]);
        let mut buf = BytesMut::new();
        frame.encode(&mut buf);
        assert_eq!(
            &buf[..],
            b"*4\r\n$3\r\nPUT\r\n$1\r\nk\r\n$1\r\nv\r\n$2\r\n60\r\n"
        );
    }
}
