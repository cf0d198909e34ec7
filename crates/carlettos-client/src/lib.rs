//! Carlettos Client - typed access to the Carlettos API
//!
//! # Example
//!
//! ```ignore
//! use carlettos_client::{ApiClientConfig, CarlettosApiClient};
//!
//! let client = CarlettosApiClient::new(ApiClientConfig::from_env())?;
//! let board = client.get_chess_game().await?;
//! let tasks = client.fetch_tasks().await?;
//! ```

pub mod error;
pub mod http;

pub use error::{ClientError, Result};
pub use http::{API_IP_ENV, ApiClientConfig, CarlettosApiClient};
