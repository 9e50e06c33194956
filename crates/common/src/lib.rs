#![forbid(unsafe_code)]

mod error;

pub use error::*;

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(30);
