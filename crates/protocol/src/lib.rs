#![forbid(unsafe_code)]

mod command;
mod connection;
mod frame;
mod parse;
pub mod reply;

pub use command::Command;
pub use connection::Connection;
pub use frame::Frame;
pub use parse::Parse;
