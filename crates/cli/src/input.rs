use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;

/// Falhas ao obter os bytes do valor a partir da linha de comando.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("informe VALUE ou --input")]
    MissingValue,
    #[error("não foi possível ler '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Bytes do valor: o argumento posicional ou o conteúdo de `input`
/// (`-` é stdin). O conteúdo é usado sem nenhuma transformação.
pub async fn read_value(
    value: Option<OsString>,
    input: Option<&Path>,
) -> Result<Vec<u8>, InputError> {
    match (value, input) {
        (Some(value), _) => Ok(value.into_encoded_bytes()),
        (None, Some(path)) if path == Path::new("-") => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .map_err(|source| InputError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
            Ok(buf)
        }
        (None, Some(path)) => tokio::fs::read(path).await.map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        }),
        (None, None) => Err(InputError::MissingValue),
    }
}
