use std::time::Duration;

use dhtkv_common::{DEFAULT_MAX_KEY_BYTES, DEFAULT_MAX_TTL_SECS, DEFAULT_MAX_VALUE_BYTES};

/// O que um PUT faz quando o par (chave, valor) já existe.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PutPolicy {
    /// Cada PUT cria uma nova entrada, mesmo com valor idêntico.
    #[default]
    Accumulate,
    /// PUT de um par existente apenas renova o TTL da entrada.
    Refresh,
}

/// Limites impostos pelo store (não pelo client).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLimits {
    pub max_key_bytes: usize,
    pub max_value_bytes: usize,
    pub max_ttl: Duration,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            max_key_bytes: DEFAULT_MAX_KEY_BYTES,
            max_value_bytes: DEFAULT_MAX_VALUE_BYTES,
            max_ttl: Duration::from_secs(DEFAULT_MAX_TTL_SECS),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub put_policy: PutPolicy,
    pub limits: StoreLimits,
}
