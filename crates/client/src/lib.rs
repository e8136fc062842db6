//! Client binário para o store multi-valorado.
//!
//! Cada chave pode guardar vários valores, cada um com seu TTL. `put`
//! acrescenta, `get` devolve todos os valores vivos e `delete` remove pelo
//! par (chave, valor). Chaves e valores são bytes opacos do começo ao fim.
//!
//! ```no_run
//! use std::time::Duration;
//! use dhtkv_client::{Client, ClientConfig};
//!
//! # async fn demo() -> dhtkv_client::ClientResult<()> {
//! let client = Client::new(ClientConfig::new("127.0.0.1:64221"));
//! client.put(b"k1", b"hello", Duration::from_secs(60)).await?;
//! for entry in client.get(b"k1").await? {
//!     println!("{:?} (ttl {:?})", entry.value, entry.ttl);
//! }
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod client;
mod response;

pub use client::{Client, ClientConfig, Entry};
pub use dhtkv_common::{ClientError, ClientResult};
