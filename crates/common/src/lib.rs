#![forbid(unsafe_code)]

mod error;

pub use error::*;

pub const DEFAULT_PORT: u16 = 64221;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const MAX_CONNECTIONS: usize = 1024;
pub const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024; // 4 KB
pub const MAX_FRAME_SIZE: usize = 64 * 1024 * 1024; // 64 MB
/// Níveis de arrays aninhados aceitos num frame (a resposta de GET usa 2).
pub const MAX_FRAME_DEPTH: usize = 4;

/// Lease padrão de um PUT feito pelo CLI.
pub const DEFAULT_TTL_SECS: u64 = 100_000;
pub const DEFAULT_MAX_KEY_BYTES: usize = 1024; // 1 KB
pub const DEFAULT_MAX_VALUE_BYTES: usize = 1024 * 1024; // 1 MB
pub const DEFAULT_MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60; // 10 anos
