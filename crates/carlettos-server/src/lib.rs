// Carlettos API process: tasks, the shared chess board, votes and 2048 highscores
// Handlers run on actix-web over a pluggable storage backend

pub mod api; // HTTP handlers and routing
pub mod error; // Error to HTTP response mapping
pub mod metrics; // Prometheus counters
pub mod middleware; // CORS
pub mod model; // Configuration, state and response types
pub mod startup; // Logging, storage, server and shutdown

pub use error::AppError;
pub use model::{AppState, Configuration};
