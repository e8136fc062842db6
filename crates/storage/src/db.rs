use std::collections::BTreeSet;
use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use tokio::sync::{Mutex, Notify};
use tokio::time::{Duration, Instant};
use tracing::debug;

use dhtkv_common::StorageError;

use crate::config::{PutPolicy, StoreConfig};
use crate::entry::StoredValue;

/// Item no BTreeSet de expiração: (instante, chave).
/// Ordenado por instante para purga eficiente.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd)]
struct ExpiryEntry(Instant, Bytes);

/// Estado compartilhado entre todas as conexões.
struct SharedState {
    data: DashMap<Bytes, Vec<StoredValue>>,
    expiry: Mutex<BTreeSet<ExpiryEntry>>,
    notify_expiry: Notify,
    config: StoreConfig,
}

/// Handle para o store multi-valorado in-memory.
///
/// Cada chave guarda uma lista de valores, cada um com seu próprio TTL.
/// A ordem devolvida por `get` é a de inserção.
#[derive(Clone)]
pub struct Db {
    shared: Arc<SharedState>,
}

impl Db {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        let db = Db {
            shared: Arc::new(SharedState {
                data: DashMap::new(),
                expiry: Mutex::new(BTreeSet::new()),
                notify_expiry: Notify::new(),
                config,
            }),
        };

        // Spawn background task para purgar valores expirados
        let shared = db.shared.clone();
        tokio::spawn(async move {
            purge_expired_values(shared).await;
        });

        db
    }

    pub fn config(&self) -> &StoreConfig {
        &self.shared.config
    }

    /// Acrescenta `value` sob `key`. Com `PutPolicy::Refresh`, um par
    /// já existente só tem o TTL renovado.
    pub async fn put(&self, key: Bytes, value: Bytes, ttl: Duration) -> Result<(), StorageError> {
        self.validate(&key, &value, ttl)?;

        let stored = StoredValue::new(value, ttl).ok_or_else(|| self.invalid_ttl(ttl))?;
        let expires_at = stored.expires_at;
        {
            let mut values = self.shared.data.entry(key.clone()).or_default();
            let now = Instant::now();
            values.retain(|v| !v.is_expired_at(now));

            let existing = match self.shared.config.put_policy {
                PutPolicy::Refresh => values.iter_mut().find(|v| v.value == stored.value),
                PutPolicy::Accumulate => None,
            };
            match existing {
                Some(current) => current.expires_at = expires_at,
                None => values.push(stored),
            }
        }

        self.schedule_expiry(key, expires_at).await;
        Ok(())
    }

    /// Insere apenas se a chave não tiver nenhum valor vivo.
    pub async fn create(
        &self,
        key: Bytes,
        value: Bytes,
        ttl: Duration,
    ) -> Result<(), StorageError> {
        self.validate(&key, &value, ttl)?;

        let stored = StoredValue::new(value, ttl).ok_or_else(|| self.invalid_ttl(ttl))?;
        let expires_at = stored.expires_at;
        {
            let mut values = self.shared.data.entry(key.clone()).or_default();
            let now = Instant::now();
            values.retain(|v| !v.is_expired_at(now));
            if !values.is_empty() {
                return Err(StorageError::KeyExists);
            }
            values.push(stored);
        }

        self.schedule_expiry(key, expires_at).await;
        Ok(())
    }

    /// Todos os valores vivos da chave, com o TTL restante.
    pub fn get(&self, key: &[u8]) -> Vec<(Bytes, Duration)> {
        let now = Instant::now();
        let result = match self.shared.data.get_mut(key) {
            Some(mut values) => {
                values.retain(|v| !v.is_expired_at(now));
                values
                    .iter()
                    .map(|v| (v.value.clone(), v.remaining(now)))
                    .collect::<Vec<_>>()
            }
            None => return Vec::new(),
        };

        if result.is_empty() {
            self.shared.data.remove_if(key, |_, values| values.is_empty());
        }
        result
    }

    /// Remove todas as entradas vivas de `key` cujo valor é exatamente
    /// `value`. Retorna quantas foram removidas.
    pub fn delete(&self, key: &[u8], value: &[u8]) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        let now_empty = match self.shared.data.get_mut(key) {
            Some(mut values) => {
                values.retain(|v| {
                    if v.is_expired_at(now) {
                        return false;
                    }
                    if v.value.as_ref() == value {
                        removed += 1;
                        return false;
                    }
                    true
                });
                values.is_empty()
            }
            None => return 0,
        };

        if now_empty {
            self.shared.data.remove_if(key, |_, values| values.is_empty());
        }
        removed
    }

    /// Número total de entradas (inclui expiradas ainda não purgadas).
    pub fn len(&self) -> usize {
        self.shared.data.iter().map(|values| values.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn validate(&self, key: &[u8], value: &[u8], ttl: Duration) -> Result<(), StorageError> {
        let limits = &self.shared.config.limits;
        if key.len() > limits.max_key_bytes {
            return Err(StorageError::KeyTooLarge {
                len: key.len(),
                max: limits.max_key_bytes,
            });
        }
        if value.len() > limits.max_value_bytes {
            return Err(StorageError::ValueTooLarge {
                len: value.len(),
                max: limits.max_value_bytes,
            });
        }
        if ttl < Duration::from_secs(1) || ttl > limits.max_ttl {
            return Err(self.invalid_ttl(ttl));
        }
        Ok(())
    }

    fn invalid_ttl(&self, ttl: Duration) -> StorageError {
        StorageError::InvalidTtl {
            secs: ttl.as_secs(),
            max: self.shared.config.limits.max_ttl.as_secs(),
        }
    }

    async fn schedule_expiry(&self, key: Bytes, when: Instant) {
        let mut expiry = self.shared.expiry.lock().await;
        expiry.insert(ExpiryEntry(when, key));
        drop(expiry);
        self.shared.notify_expiry.notify_one();
    }
}

impl Default for Db {
    fn default() -> Self {
        Self::new()
    }
}

/// Background task que purga valores expirados.
async fn purge_expired_values(shared: Arc<SharedState>) {
    loop {
        let next_expiry = {
            let expiry = shared.expiry.lock().await;
            expiry.iter().next().map(|e| e.0)
        };

        match next_expiry {
            Some(when) => {
                tokio::select! {
                    _ = tokio::time::sleep_until(when) => {}
                    _ = shared.notify_expiry.notified() => { continue; }
                }
            }
            None => {
                shared.notify_expiry.notified().await;
                continue;
            }
        }

        let now = Instant::now();
        let mut expiry = shared.expiry.lock().await;
        let mut due = Vec::new();

        for entry in expiry.iter() {
            if entry.0 <= now {
                due.push(entry.clone());
            } else {
                break; // BTreeSet é ordenado, os próximos são todos futuros
            }
        }

        for entry in &due {
            expiry.remove(entry);
            // O TTL pode ter sido renovado (PutPolicy::Refresh); só sai o que venceu
            if let Some(mut values) = shared.data.get_mut(&entry.1) {
                let before = values.len();
                values.retain(|v| !v.is_expired_at(now));
                if before != values.len() {
                    debug!(
                        "{} valor(es) expirado(s) removido(s) de chave com {} bytes",
                        before - values.len(),
                        entry.1.len()
                    );
                }
            }
            shared.data.remove_if(&entry.1, |_, values| values.is_empty());
        }
    }
}
