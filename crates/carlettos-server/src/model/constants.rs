//! Configuration keys and defaults

pub const SERVER_ADDRESS_PROPERTY: &str = "server.address";
pub const SERVER_PORT_PROPERTY: &str = "server.port";
pub const SERVER_RELEASE_PROPERTY: &str = "server.release";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8000;

pub const TLS_CERT_PATH_PROPERTY: &str = "tls.cert_path";
pub const TLS_KEY_PATH_PROPERTY: &str = "tls.key_path";

pub const WEB_DIST_DIR_PROPERTY: &str = "web.dist_dir";

pub const STORAGE_MODE_PROPERTY: &str = "storage.mode";
pub const STORAGE_DATA_DIR_PROPERTY: &str = "storage.embedded.data_dir";
pub const DEFAULT_STORAGE_DATA_DIR: &str = "data/carlettos";

pub const DB_URL_PROPERTY: &str = "db.url";
pub const DB_NAMESPACE_PROPERTY: &str = "db.namespace";
pub const DB_DATABASE_PROPERTY: &str = "db.database";
pub const DB_USERNAME_PROPERTY: &str = "db.username";
pub const DB_PASSWORD_PROPERTY: &str = "db.password";
pub const DEFAULT_DB_URL: &str = "ws://127.0.0.1:8080";
pub const DEFAULT_DB_USERNAME: &str = "root";
pub const DEFAULT_DB_PASSWORD: &str = "root";

pub const LOGGING_DIR_PROPERTY: &str = "logging.dir";
pub const LOGGING_CONSOLE_PROPERTY: &str = "logging.console";
pub const LOGGING_FILE_PROPERTY: &str = "logging.file";
pub const LOGGING_LEVEL_PROPERTY: &str = "logging.level";

pub const SHUTDOWN_TIMEOUT_PROPERTY: &str = "server.shutdown_timeout_secs";
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;
