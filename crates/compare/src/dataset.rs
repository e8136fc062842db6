use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// Os arquivos diferem em número de linhas ou de tokens na linha.
    #[error("Invalid data sets (linha {line})")]
    DatasetMismatch { line: usize },
    #[error("não foi possível ler '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn read(path: &Path) -> Result<String, CompareError> {
    std::fs::read_to_string(path).map_err(|source| CompareError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_pair(a: &Path, b: &Path) -> Result<Vec<(i64, i64)>, CompareError> {
    parse_pair(&read(a)?, &read(b)?)
}

pub fn load_values(path: &Path) -> Result<Vec<i64>, CompareError> {
    Ok(parse_values(&read(path)?))
}

/// Emparelha os tokens de `a` e `b` linha a linha. Um par em que algum
/// lado não é inteiro é ignorado por inteiro.
pub fn parse_pair(a: &str, b: &str) -> Result<Vec<(i64, i64)>, CompareError> {
    let mut lines_a = a.lines();
    let mut lines_b = b.lines();
    let mut pairs = Vec::new();
    let mut line = 0;

    loop {
        line += 1;
        let (la, lb) = match (lines_a.next(), lines_b.next()) {
            (None, None) => break,
            (Some(la), Some(lb)) => (la, lb),
            _ => return Err(CompareError::DatasetMismatch { line }),
        };

        let tokens_a: Vec<&str> = la.split_whitespace().collect();
        let tokens_b: Vec<&str> = lb.split_whitespace().collect();
        if tokens_a.len() != tokens_b.len() {
            return Err(CompareError::DatasetMismatch { line });
        }

        for (ta, tb) in tokens_a.into_iter().zip(tokens_b) {
            match (ta.parse::<i64>(), tb.parse::<i64>()) {
                (Ok(va), Ok(vb)) => pairs.push((va, vb)),
                _ => debug!(line, ta, tb, "par ignorado: token não inteiro"),
            }
        }
    }

    Ok(pairs)
}

/// Todos os tokens inteiros do texto, na ordem em que aparecem.
pub fn parse_values(text: &str) -> Vec<i64> {
    text.split_whitespace()
        .filter_map(|token| token.parse().ok())
        .collect()
}
