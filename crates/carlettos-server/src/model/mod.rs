//! Data models module
//!
//! - `constants` - configuration keys and defaults
//! - `config` - command line and layered configuration
//! - `response` - error envelope
//! - `app_state` - state shared across handlers
//! - `tls` - rustls setup for the HTTP server

pub mod app_state;
pub mod config;
pub mod constants;
pub mod response;
pub mod tls;

pub use app_state::AppState;
pub use config::{Cli, Command, Configuration, ImportArgs};
pub use response::Result;
pub use tls::TlsConfig;
