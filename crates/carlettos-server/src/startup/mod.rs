//! Process startup: logging, storage, HTTP server and shutdown handling

pub mod http;
pub mod logging;
pub mod shutdown;
pub mod storage;

pub use http::main_server;
pub use logging::{LogRotation, LoggingConfig, LoggingGuard, init_logging};
pub use shutdown::{GracefulShutdown, ShutdownSignal, run_with_shutdown, wait_for_shutdown_signal};
pub use storage::create_persistence;
