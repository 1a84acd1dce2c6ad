use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use usergate::api;
use usergate::application_impl::*;
use usergate::application_port::*;
use usergate::logger::*;
use usergate::server::*;
use usergate::settings::*;

/// Background process: periodic user count plus a health endpoint.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let address: std::net::SocketAddr = project_settings.worker.address.parse()?;

    let (user_repo, pool) = connect_user_repo(&project_settings.store).await?;
    let user_service: Arc<dyn UserService> =
        Arc::new(RealUserService::new(user_repo, Arc::new(Argon2PasswordHasher)));

    let cancellation_token = CancellationToken::new();
    let reporter = UserCountReporter::new(
        user_service,
        Duration::from_secs(project_settings.worker.user_count_interval_secs),
        cancellation_token.clone(),
    );
    let reporter_handle = tokio::spawn(async move { reporter.run().await });

    let shutdown_token = cancellation_token.clone();
    let (bound, serving) = warp::serve(api::v1::health()).try_bind_with_graceful_shutdown(
        address,
        async move {
            tokio::select! {
                r = signal::ctrl_c() => {
                    if let Err(e) = r {
                        error!("could not register SIGINT: {}", e);
                    }
                }
                _ = shutdown_token.cancelled() => {}
            }
        },
    )?;
    info!("worker listening on http://{}", bound);
    serving.await;

    cancellation_token.cancel();
    match reporter_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("user count reporter failed: {:#}", e),
        Err(e) => error!("user count reporter panicked: {}", e),
    }
    if let Some(pool) = pool {
        pool.close().await;
    }
    info!("worker shutdown successfully");

    Ok(())
}
