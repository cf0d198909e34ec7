// HTTP server construction

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};
use tracing::info;

use crate::{api, middleware::Cors, model::AppState, model::TlsConfig};

/// Build the API server.
///
/// API routes are registered before the static bundle so that `/chess`,
/// `/tasks` and friends never fall through to the file service. Signal
/// handling is left to the caller, which stops the server through its handle.
pub fn main_server(
    app_state: Arc<AppState>,
    address: String,
    port: u16,
    tls: TlsConfig,
    web_dist: Option<PathBuf>,
    shutdown_timeout: Duration,
) -> Result<Server, std::io::Error> {
    let server = HttpServer::new(move || {
        let app = App::new()
            .wrap(Cors)
            .wrap(Logger::default())
            .app_data(web::Data::from(app_state.clone()))
            .configure(api::route::configure);

        match &web_dist {
            Some(dir) => app.service(actix_files::Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .disable_signals()
    .shutdown_timeout(shutdown_timeout.as_secs());

    let server = if tls.is_configured() {
        let rustls_config = tls
            .server_config()
            .map_err(|e| std::io::Error::other(format!("TLS setup failed: {}", e)))?;
        info!("HTTPS server listening on {}:{}", address, port);
        server.bind_rustls_0_23((address, port), rustls_config)?
    } else {
        info!("HTTP server listening on {}:{}", address, port);
        server.bind((address, port))?
    };

    Ok(server.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use carlettos_persistence::{EmbeddedPersistService, PersistenceService};

    use crate::model::Configuration;

    #[actix_web::test]
    async fn test_server_stops_through_handle() {
        let dir = tempfile::TempDir::new().unwrap();
        let persistence: Arc<dyn PersistenceService> =
            Arc::new(EmbeddedPersistService::open(dir.path()).unwrap());
        let state = Arc::new(AppState::new(Configuration::default(), persistence));

        let server = main_server(
            state,
            "127.0.0.1".to_string(),
            0,
            TlsConfig::default(),
            None,
            Duration::from_secs(1),
        )
        .unwrap();
        let handle = server.handle();
        let task = actix_web::rt::spawn(server);

        handle.stop(true).await;
        let result = tokio::time::timeout(Duration::from_secs(5), task).await;
        assert!(matches!(result, Ok(Ok(Ok(())))));
    }

    #[test]
    fn test_tls_misconfiguration_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let persistence: Arc<dyn PersistenceService> =
            Arc::new(EmbeddedPersistService::open(dir.path()).unwrap());
        let state = Arc::new(AppState::new(Configuration::default(), persistence));
        let tls = TlsConfig {
            cert_path: Some(dir.path().join("missing-cert.pem")),
            key_path: Some(dir.path().join("missing-key.pem")),
        };

        let err = main_server(
            state,
            "127.0.0.1".to_string(),
            0,
            tls,
            None,
            Duration::from_secs(1),
        )
        .err()
        .unwrap();
        assert!(err.to_string().contains("TLS setup failed"));
    }
}
