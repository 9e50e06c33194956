#![forbid(unsafe_code)]

mod app;
mod error;
pub mod handler;

pub use app::{AppState, router, serve};
pub use error::ApiError;
