#![forbid(unsafe_code)]

mod config;
mod db;
mod entry;
mod expiry;
mod serializer;

pub use config::StoreConfig;
pub use db::Store;
pub use entry::{Entry, Value};
pub use expiry::WorkerState;
pub use serializer::serialize;
