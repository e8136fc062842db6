//! Convenções das respostas do store.
//!
//! Erros chegam como `-<PREFIXO> <detalhe>`. `INVALIDARG` traz o nome do
//! argumento rejeitado logo após o prefixo (`key`, `value` ou `ttl`).

pub const OK: &str = "OK";
pub const PONG: &str = "PONG";

pub const ERR_PREFIX: &str = "ERR";
pub const INVALID_ARGUMENT_PREFIX: &str = "INVALIDARG";
pub const EXISTS_PREFIX: &str = "EXISTS";
