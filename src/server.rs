use std::sync::Arc;

use crate::app::App;
use crate::cli::{RunError, ServeArgs};
use crate::config::AppConfig;
use crate::db::connection::Database;
use crate::router::handle;
use crate::templates;
use astra::Server;

pub fn run(mut config: AppConfig, db: Database, args: ServeArgs) -> Result<(), RunError> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    let addr = config.server.socket_addr().map_err(RunError::Config)?;

    let app = Arc::new(App::from_config(&config, db).map_err(RunError::Startup)?);

    let purged = app
        .isochrones
        .cache()
        .purge_expired(chrono::Utc::now().timestamp())
        .map_err(RunError::Database)?;
    if purged > 0 {
        tracing::info!(purged, "dropped expired isochrones");
    }

    tracing::info!(
        %addr,
        workers = config.server.workers,
        match_policy = %app.match_policy,
        "starting server"
    );

    let server = Server::bind(&addr).max_workers(config.server.workers);
    server
        .serve(move |req: astra::Request, _info| {
            let method = req.method().clone();
            let path = req.uri().path().to_string();
            match handle(req, &app) {
                Ok(resp) => resp,
                Err(err) => {
                    tracing::debug!(%method, %path, error = %err, "request failed");
                    templates::html_error_response(err)
                }
            }
        })
        .map_err(RunError::Server)?;

    tracing::info!("server shut down cleanly");
    Ok(())
}
