//! Configuration management for the Carlettos API process
//!
//! Values are layered: `conf/application.yml` (optional), then
//! `CARLETTOS__*` environment variables, then command line arguments.

use std::path::PathBuf;
use std::time::Duration;

use carlettos_common::{DEFAULT_DATABASE, DEFAULT_NAMESPACE};
use carlettos_persistence::{StorageMode, SurrealConfig};
use clap::{Args, Parser, Subcommand};
use config::{Config, ConfigError, Environment, File};

use super::constants::*;
use super::tls::TlsConfig;
use crate::startup::LoggingConfig;

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command(name = "carlettos-server", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
    /// Database engine URL (ws://, http://, mem://)
    #[arg(long = "db-url", env = "DB_IP")]
    pub db_url: Option<String>,
    #[arg(short = 'p', long = "port", env = "PORT")]
    pub port: Option<u16>,
    #[arg(short = 'a', long = "address", env = "ADDRESS")]
    pub address: Option<String>,
    /// Storage backend: embedded or database
    #[arg(short = 's', long = "storage")]
    pub storage: Option<String>,
    #[arg(long = "release", env = "RELEASE")]
    pub release: bool,
    #[arg(long = "tls-cert", env = "TLS_CERT")]
    pub tls_cert: Option<String>,
    #[arg(long = "tls-key", env = "TLS_KEY")]
    pub tls_key: Option<String>,
    /// Directory of the built web client bundle
    #[arg(long = "web-dist", env = "WEB_DIST")]
    pub web_dist: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load an initialization script into the database engine
    Import(ImportArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    /// SurrealQL script to load
    pub file: PathBuf,
    #[arg(long = "ns", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,
    #[arg(long = "db", default_value = DEFAULT_DATABASE)]
    pub database: String,
    #[arg(long = "db-url", env = "DB_IP", default_value = "http://127.0.0.1:8080")]
    pub db_url: String,
    #[arg(long = "user", default_value = DEFAULT_DB_USERNAME)]
    pub username: String,
    #[arg(long = "pass", default_value = DEFAULT_DB_PASSWORD)]
    pub password: String,
}

impl ImportArgs {
    pub fn surreal_config(&self) -> SurrealConfig {
        SurrealConfig::new(self.db_url.as_str())
            .with_namespace(self.namespace.as_str())
            .with_database(self.database.as_str())
            .with_credentials(self.username.as_str(), self.password.as_str())
    }
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Parse the command line and build the layered configuration
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_cli(&Cli::parse())
    }

    pub fn from_cli(args: &Cli) -> Result<Self, ConfigError> {
        let mut config_builder = Config::builder()
            .add_source(File::with_name("conf/application.yml").required(false))
            .add_source(
                Environment::with_prefix("carlettos")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(v) = &args.db_url {
            config_builder = config_builder.set_override(DB_URL_PROPERTY, v.as_str())?;
        }
        if let Some(v) = args.port {
            config_builder = config_builder.set_override(SERVER_PORT_PROPERTY, i64::from(v))?;
        }
        if let Some(v) = &args.address {
            config_builder = config_builder.set_override(SERVER_ADDRESS_PROPERTY, v.as_str())?;
        }
        if let Some(v) = &args.storage {
            config_builder = config_builder.set_override(STORAGE_MODE_PROPERTY, v.as_str())?;
        }
        if args.release {
            config_builder = config_builder.set_override(SERVER_RELEASE_PROPERTY, true)?;
        }
        if let Some(v) = &args.tls_cert {
            config_builder = config_builder.set_override(TLS_CERT_PATH_PROPERTY, v.as_str())?;
        }
        if let Some(v) = &args.tls_key {
            config_builder = config_builder.set_override(TLS_KEY_PATH_PROPERTY, v.as_str())?;
        }
        if let Some(v) = &args.web_dist {
            config_builder = config_builder.set_override(WEB_DIST_DIR_PROPERTY, v.as_str())?;
        }

        Ok(Configuration {
            config: config_builder.build()?,
        })
    }

    /// Build from explicit key/value pairs only, ignoring files, environment
    /// and the command line
    pub fn from_overrides<'a>(
        overrides: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ConfigError> {
        let mut config_builder = Config::builder();
        for (key, value) in overrides {
            config_builder = config_builder.set_override(key, value)?;
        }
        Ok(Configuration {
            config: config_builder.build()?,
        })
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string(SERVER_ADDRESS_PROPERTY)
            .unwrap_or(DEFAULT_SERVER_ADDRESS.to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT_PROPERTY)
            .ok()
            .and_then(|port| u16::try_from(port).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    pub fn is_release(&self) -> bool {
        self.config.get_bool(SERVER_RELEASE_PROPERTY).unwrap_or(false)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        let secs = self
            .config
            .get_int(SHUTDOWN_TIMEOUT_PROPERTY)
            .ok()
            .and_then(|secs| u64::try_from(secs).ok())
            .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn tls_config(&self) -> TlsConfig {
        TlsConfig {
            cert_path: self.path_property(TLS_CERT_PATH_PROPERTY),
            key_path: self.path_property(TLS_KEY_PATH_PROPERTY),
        }
    }

    pub fn web_dist_dir(&self) -> Option<PathBuf> {
        self.path_property(WEB_DIST_DIR_PROPERTY)
    }

    /// Blank values count as unset
    fn path_property(&self, key: &str) -> Option<PathBuf> {
        self.config
            .get_string(key)
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
    }

    // ========================================================================
    // Storage Configuration
    // ========================================================================

    pub fn storage_mode(&self) -> Result<StorageMode, ConfigError> {
        match self.config.get_string(STORAGE_MODE_PROPERTY) {
            Ok(mode) => mode.parse().map_err(ConfigError::Message),
            Err(ConfigError::NotFound(_)) => Ok(StorageMode::Embedded),
            Err(e) => Err(e),
        }
    }

    pub fn embedded_data_dir(&self) -> String {
        self.config
            .get_string(STORAGE_DATA_DIR_PROPERTY)
            .unwrap_or(DEFAULT_STORAGE_DATA_DIR.to_string())
    }

    pub fn db_url(&self) -> String {
        self.config
            .get_string(DB_URL_PROPERTY)
            .unwrap_or(DEFAULT_DB_URL.to_string())
    }

    pub fn surreal_config(&self) -> SurrealConfig {
        let namespace = self
            .config
            .get_string(DB_NAMESPACE_PROPERTY)
            .unwrap_or(DEFAULT_NAMESPACE.to_string());
        let database = self
            .config
            .get_string(DB_DATABASE_PROPERTY)
            .unwrap_or(DEFAULT_DATABASE.to_string());
        let username = self
            .config
            .get_string(DB_USERNAME_PROPERTY)
            .unwrap_or(DEFAULT_DB_USERNAME.to_string());
        let password = self
            .config
            .get_string(DB_PASSWORD_PROPERTY)
            .unwrap_or(DEFAULT_DB_PASSWORD.to_string());

        let url = self.db_url();
        let config = SurrealConfig::new(url.as_str())
            .with_namespace(namespace)
            .with_database(database);
        // in-process engines have no users to sign in as
        if url.starts_with("mem:") {
            config
        } else {
            config.with_credentials(username, password)
        }
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    /// Environment variables first, then `logging.*` keys on top
    pub fn logging_config(&self) -> LoggingConfig {
        let mut logging = LoggingConfig::from_env();
        if let Ok(dir) = self.config.get_string(LOGGING_DIR_PROPERTY) {
            logging.log_dir = PathBuf::from(dir);
        }
        if let Ok(console) = self.config.get_bool(LOGGING_CONSOLE_PROPERTY) {
            logging.console_output = console;
        }
        if let Ok(file) = self.config.get_bool(LOGGING_FILE_PROPERTY) {
            logging.file_logging = file;
        }
        if let Some(level) = self
            .config
            .get_string(LOGGING_LEVEL_PROPERTY)
            .ok()
            .and_then(|level| level.parse().ok())
        {
            logging.console_level = level;
            logging.file_level = level;
        }
        logging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let configuration = Configuration::default();
        assert_eq!(configuration.server_address(), "0.0.0.0");
        assert_eq!(configuration.server_port(), 8000);
        assert!(!configuration.is_release());
        assert_eq!(configuration.storage_mode().unwrap(), StorageMode::Embedded);
        assert!(configuration.web_dist_dir().is_none());
        assert!(!configuration.tls_config().is_configured());
        assert_eq!(configuration.shutdown_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let configuration = Configuration::from_overrides([
            (SERVER_PORT_PROPERTY, "9443"),
            (STORAGE_MODE_PROPERTY, "database"),
            (DB_URL_PROPERTY, "ws://db:8000"),
            (DB_NAMESPACE_PROPERTY, "games"),
            (TLS_CERT_PATH_PROPERTY, "cert.pem"),
            (TLS_KEY_PATH_PROPERTY, "key.pem"),
        ])
        .unwrap();
        assert_eq!(configuration.server_port(), 9443);
        assert_eq!(configuration.storage_mode().unwrap(), StorageMode::Database);
        assert!(configuration.tls_config().is_configured());

        let surreal = configuration.surreal_config();
        assert_eq!(surreal.url, "ws://db:8000");
        assert_eq!(surreal.namespace, "games");
        assert_eq!(surreal.database, "database");
        assert_eq!(
            surreal.credentials,
            Some(("root".to_string(), "root".to_string()))
        );
    }

    #[test]
    fn test_shipped_config_serves_plain_http() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../conf/application.yml");
        let configuration = Configuration {
            config: Config::builder()
                .add_source(File::with_name(path))
                .build()
                .unwrap(),
        };
        assert!(!configuration.tls_config().is_configured());
        assert!(configuration.tls_config().cert_path.is_none());
        assert!(configuration.web_dist_dir().is_none());
        assert_eq!(configuration.server_port(), 8000);
        assert_eq!(configuration.storage_mode().unwrap(), StorageMode::Embedded);
    }

    #[test]
    fn test_blank_tls_paths_are_unset() {
        let configuration = Configuration::from_overrides([
            (TLS_CERT_PATH_PROPERTY, ""),
            (TLS_KEY_PATH_PROPERTY, "  "),
        ])
        .unwrap();
        assert!(!configuration.tls_config().is_configured());
    }

    #[test]
    fn test_invalid_storage_mode() {
        let configuration =
            Configuration::from_overrides([(STORAGE_MODE_PROPERTY, "sqlite")]).unwrap();
        assert!(configuration.storage_mode().is_err());
    }

    #[test]
    fn test_memory_engine_skips_credentials() {
        let configuration = Configuration::from_overrides([(DB_URL_PROPERTY, "mem://")]).unwrap();
        assert!(configuration.surreal_config().credentials.is_none());
    }

    #[test]
    fn test_cli_import_subcommand() {
        let cli = Cli::parse_from([
            "carlettos-server",
            "import",
            "conf/init.surql",
            "--ns",
            "root",
            "--db",
            "database",
            "--db-url",
            "http://localhost:8080",
        ]);
        let Some(Command::Import(args)) = cli.command else {
            panic!("expected import subcommand");
        };
        assert_eq!(args.file, PathBuf::from("conf/init.surql"));
        let surreal = args.surreal_config();
        assert_eq!(surreal.url, "http://localhost:8080");
        assert!(surreal.credentials.is_some());
    }
}
