use bytes::Bytes;
use tokio::time::{Duration, Instant};

/// Um valor armazenado sob uma chave, com seu prazo de expiração.
#[derive(Debug, Clone)]
pub struct StoredValue {
    pub value: Bytes,
    pub expires_at: Instant,
}

impl StoredValue {
    /// `None` se `now + ttl` não for representável.
    pub fn new(value: Bytes, ttl: Duration) -> Option<Self> {
        let expires_at = Instant::now().checked_add(ttl)?;
        Some(Self { value, expires_at })
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// TTL restante em relação a `now` (zero se já expirou).
    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}
