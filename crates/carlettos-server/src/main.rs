use std::sync::Arc;

use carlettos_persistence::SurrealPersistService;
use carlettos_server::{
    metrics,
    model::{AppState, Cli, Command, Configuration, ImportArgs},
    startup::{self, GracefulShutdown},
};
use clap::Parser;
use tracing::{error, info};

async fn import(args: &ImportArgs) -> anyhow::Result<()> {
    let service = SurrealPersistService::connect(args.surreal_config()).await?;
    let shutdown_signal = startup::wait_for_shutdown_signal().await;
    match startup::run_with_shutdown(service.import(&args.file), shutdown_signal.subscribe()).await {
        Some(result) => result?,
        None => anyhow::bail!("import of {} interrupted", args.file.display()),
    }
    info!(
        "Imported {} into {}/{}",
        args.file.display(),
        args.namespace,
        args.database
    );
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let configuration = Configuration::from_cli(&cli)?;

    let _logging_guard = startup::init_logging(&configuration.logging_config())?;

    if let Some(Command::Import(args)) = &cli.command {
        import(args).await.map_err(|e| {
            error!("Import failed: {:#}", e);
            e
        })?;
        return Ok(());
    }

    let persistence = startup::create_persistence(&configuration).await?;

    let mut app_state = AppState::new(configuration.clone(), persistence);
    if let Some(handle) = metrics::init_metrics() {
        app_state = app_state.with_metrics(handle);
    }
    let app_state = Arc::new(app_state);

    let shutdown_signal = startup::wait_for_shutdown_signal().await;
    let graceful_shutdown =
        GracefulShutdown::new(shutdown_signal, configuration.shutdown_timeout());

    if configuration.is_release() {
        info!("Running in release mode");
    }

    let server = startup::main_server(
        app_state,
        configuration.server_address(),
        configuration.server_port(),
        configuration.tls_config(),
        configuration.web_dist_dir(),
        graceful_shutdown.shutdown_timeout(),
    )?;
    let server_handle = server.handle();
    let mut server_task = actix_web::rt::spawn(server);

    tokio::select! {
        result = &mut server_task => {
            match result {
                Ok(Err(e)) => error!("Server error: {}", e),
                Err(e) => error!("Server task failed: {}", e),
                Ok(Ok(())) => {}
            }
        }
        _ = graceful_shutdown.wait_for_signal() => {
            if !graceful_shutdown.drain(server_handle.stop(true)).await {
                server_handle.stop(false).await;
            }
            info!("Server shut down gracefully");
        }
    }

    Ok(())
}
