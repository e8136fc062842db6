#![forbid(unsafe_code)]

mod config;
mod db;
mod entry;

pub use config::{PutPolicy, StoreConfig, StoreLimits};
pub use db::Db;
pub use entry::StoredValue;
