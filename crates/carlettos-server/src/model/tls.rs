//! TLS configuration for the HTTP server
//!
//! When both a certificate chain and a private key are configured the server
//! binds with rustls instead of plain HTTP.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rustls::ServerConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};

#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    /// Path to the server certificate chain (PEM format)
    pub cert_path: Option<PathBuf>,
    /// Path to the server private key (PEM format)
    pub key_path: Option<PathBuf>,
}

impl TlsConfig {
    /// Check if TLS is properly configured
    pub fn is_configured(&self) -> bool {
        self.cert_path.is_some() && self.key_path.is_some()
    }

    /// Load certificate chain from file
    pub fn load_certs(&self) -> anyhow::Result<Vec<CertificateDer<'static>>> {
        let Some(path) = &self.cert_path else {
            anyhow::bail!("Certificate path not configured");
        };
        let mut reader = open(path)?;
        let certs = rustls_pemfile::certs(&mut reader).collect::<Result<Vec<_>, _>>()?;
        if certs.is_empty() {
            anyhow::bail!("No certificate found in {}", path.display());
        }
        Ok(certs)
    }

    /// Load private key from file
    pub fn load_key(&self) -> anyhow::Result<PrivateKeyDer<'static>> {
        let Some(path) = &self.key_path else {
            anyhow::bail!("Private key path not configured");
        };
        let mut reader = open(path)?;
        rustls_pemfile::private_key(&mut reader)?
            .ok_or_else(|| anyhow::anyhow!("No private key found in {}", path.display()))
    }

    /// Create the rustls server configuration
    pub fn server_config(&self) -> anyhow::Result<ServerConfig> {
        let certs = self.load_certs()?;
        let key = self.load_key()?;
        let config = ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(certs, key)?;
        Ok(config)
    }
}

fn open(path: &Path) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", path.display(), e))?;
    Ok(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_configured() {
        let mut config = TlsConfig::default();
        assert!(!config.is_configured());

        config.cert_path = Some(PathBuf::from("/path/to/cert.pem"));
        assert!(!config.is_configured());

        config.key_path = Some(PathBuf::from("/path/to/key.pem"));
        assert!(config.is_configured());
    }

    #[test]
    fn test_missing_files() {
        let config = TlsConfig {
            cert_path: Some(PathBuf::from("/nonexistent/cert.pem")),
            key_path: Some(PathBuf::from("/nonexistent/key.pem")),
        };
        assert!(config.load_certs().is_err());
        assert!(config.load_key().is_err());
        assert!(config.server_config().is_err());
    }

    #[test]
    fn test_pem_without_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let key_path = dir.path().join("key.pem");
        std::fs::write(&key_path, "not a pem file\n").unwrap();
        let config = TlsConfig {
            cert_path: None,
            key_path: Some(key_path),
        };
        assert!(config.load_key().is_err());
        assert!(config.load_certs().is_err());
    }
}
