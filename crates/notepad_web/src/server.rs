//! HTTP server bootstrap.

use crate::config::WebConfig;
use crate::state::AppState;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::info;

const SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Registers every notepad route on an actix app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    crate::controllers::notes::config(cfg);
}

/// Serves until the process receives a shutdown signal.
///
/// In-flight requests get [`SHUTDOWN_TIMEOUT_SECS`] to finish; the caller
/// owns closing the store afterwards.
pub async fn run(config: &WebConfig, state: AppState) -> std::io::Result<()> {
    let data = web::Data::new(state);
    let (host, port) = config.bind_addr();
    info!(
        "event=http_start module=web status=start host={} port={} csrf={}",
        host,
        port,
        data.csrf.is_some()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((host.as_str(), port))?
    .shutdown_timeout(SHUTDOWN_TIMEOUT_SECS)
    .run()
    .await?;

    info!("event=http_stop module=web status=ok");
    Ok(())
}
