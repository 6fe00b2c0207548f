#![forbid(unused_must_use)]

use crate::app_config::{load_config, AppConfig};
use crate::countdown::CountdownFormatter;
use crate::handlers::*;
use crate::svg::{RandomColorSource, SvgRenderer};
use crate::tower_to_hyper_service::TowerToHyperService;
use axum::extract::Request;
use axum::routing::IntoMakeService;
use axum::Router;
use clap::ArgMatches;
use directories::ProjectDirs;
use futures_util::future::poll_fn;
use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tower::{Service, ServiceBuilder};
use tracing::{error, info, warn};

mod app_config;
mod commands;
mod countdown;
mod handlers;
mod health;
mod logging;
mod metrics;
mod services;
mod svg;
mod tower_to_hyper_service;

#[derive(Clone)]
pub struct AppState {
    shutdown_tx: broadcast::Sender<()>,
    formatter: CountdownFormatter,
    renderer: Arc<SvgRenderer>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let matches = commands::build_command().get_matches();
    logging::initialize_from_matches(&matches);

    info!("Hi. 👋");

    let dirs = match ProjectDirs::from("io.github", "sunsided", "countdown-badge") {
        Some(dirs) => dirs,
        None => {
            error!("Could not determine the project directories");
            return ExitCode::FAILURE;
        }
    };

    let cfg: AppConfig = match load_config(dirs.config_local_dir(), &matches) {
        Ok(config) => config,
        Err(_) => {
            return ExitCode::FAILURE;
        }
    };

    let offset = match cfg.countdown.utc_offset() {
        Ok(offset) => offset,
        Err(e) => {
            error!("Invalid countdown configuration: {error}", error = e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        "Anchoring target dates at midnight {offset}, badge size {width}×{height}",
        offset = offset,
        width = cfg.countdown.width,
        height = cfg.countdown.height
    );

    // Provide a signal that can be used to shut down the server.
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    register_shutdown_handler(shutdown_tx.clone());

    // The application state is shared with the Axum servers.
    let app_state = AppState {
        shutdown_tx: shutdown_tx.clone(),
        formatter: CountdownFormatter::new(offset),
        renderer: Arc::new(SvgRenderer::new(
            cfg.countdown.width,
            cfg.countdown.height,
            Box::new(RandomColorSource),
        )),
    };

    let exit_code = serve_requests(matches, app_state).await.err();

    // If all servers are shut down, ensure the news is broadcast as well.
    stop_all_servers(shutdown_tx);

    info!("Bye. 👋");
    exit_code.unwrap_or(ExitCode::SUCCESS)
}

fn stop_all_servers(shutdown_tx: broadcast::Sender<()>) {
    // We take ownership of this channel so that it'll be closed after.
    shutdown_tx.send(()).ok();
}

async fn serve_requests(matches: ArgMatches, app_state: AppState) -> Result<(), ExitCode> {
    let shutdown_tx = app_state.shutdown_tx.clone();

    let app = Router::new()
        .map_index_endpoint()
        .map_favicon_endpoint()
        .map_metrics_endpoint()
        .map_shutdown_endpoint()
        .map_health_endpoints()
        .map_countdown_endpoint()
        .with_state(app_state)
        .layer(services::HttpCallMetricsLayer::default());

    let make_svc = app.into_make_service();

    let service_builder = ServiceBuilder::new().service(make_svc);

    // Get the HTTP socket addresses to bind on.
    let http_sockets: Vec<SocketAddr> = matches
        .get_many("bind_http")
        .into_iter()
        .flatten()
        .cloned()
        .collect();

    let listeners = FuturesUnordered::new();
    for addr in http_sockets {
        let shutdown_tx = shutdown_tx.clone();

        match TcpListener::bind(&addr).await {
            Ok(listener) => {
                info!("Now listening on http://{addr}", addr = addr);
                listeners.push(listener_accept_loop(
                    listener,
                    addr,
                    shutdown_tx,
                    service_builder.clone(),
                ));
            }
            Err(e) => {
                error!("Unable to bind to {addr}: {error}", addr = addr, error = e);

                // No servers are currently running since no await was called on any
                // of them yet. Therefore, exiting here is "graceful".
                return Err(ExitCode::from(exitcode::NOPERM as u8));
            }
        };
    }

    // Wait for all servers to stop.
    let mut exit_code = None;
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::select! {
        _ = listeners.for_each(|_| async {}) => {
            error!("Listener task exited unexpectedly");
            exit_code = Some(ExitCode::FAILURE);
        },
        _ = shutdown_rx.recv() => {
            error!("Stopping condition met, exiting...");
        }
    }

    // Ensure that all other servers also shut down in presence
    // of an error of any one of them.
    shutdown_tx.send(()).ok();

    if let Some(exit_code) = exit_code {
        Err(exit_code)
    } else {
        Ok(())
    }
}

fn register_shutdown_handler(shutdown_tx: broadcast::Sender<()>) {
    ctrlc::set_handler(move || {
        warn!("Initiating shutdown from OS");
        shutdown_tx.send(()).ok();
    })
    .expect("Error setting process termination handler");
}

async fn listener_accept_loop(
    listener: TcpListener,
    addr: SocketAddr,
    stopping_tx: broadcast::Sender<()>,
    mut make_service: IntoMakeService<Router>,
) {
    loop {
        match listener.accept().await {
            Ok((stream, remote_addr)) => {
                info!("New connection on {addr} from {remote_addr}");

                // Ensure the service is ready before handing it the request;
                // this provides backpressure when the server is overloaded.
                poll_fn(|cx| {
                    <IntoMakeService<Router> as Service<Request>>::poll_ready(&mut make_service, cx)
                })
                .await
                .unwrap_or_else(|_infallible: Infallible| {});

                tokio::spawn(connection_handler(
                    stream,
                    remote_addr,
                    make_service.clone(),
                ));
            }
            Err(e) => {
                error!("Error on listener {}: {:?}", addr, e);
                let _ = stopping_tx.send(());
                break;
            }
        }
    }
}

/// Handles a TCP connection with the provided socket and remote address.
///
/// ## Arguments
///
/// * `socket` - The TCP stream socket to handle.
/// * `remote_addr` - The remote address of the client.
/// * `make_service` - The factory function for creating a Tower Service that will handle the incoming request.
async fn connection_handler(
    socket: TcpStream,
    remote_addr: SocketAddr,
    mut make_service: IntoMakeService<Router>,
) {
    // Hyper has its own `AsyncRead` and `AsyncWrite` traits and doesn't use tokio.
    // `TokioIo` converts between them.
    let tcp_stream = TokioIo::new(socket);

    // Create a new instance of the networking service for this connection.
    // The make-service ignores its target, so any failure here is impossible.
    let tower_service = make_service
        .call(())
        .await
        .unwrap_or_else(|err| match err {});

    let hyper_service = TowerToHyperService {
        service: tower_service,
    };

    // `server::conn::auto::Builder` supports both http1 and http2.
    //
    // `TokioExecutor` tells hyper to use `tokio::spawn` to spawn tasks.
    if let Err(err) = server::conn::auto::Builder::new(TokioExecutor::new())
        .serve_connection(tcp_stream, hyper_service)
        .await
    {
        // This error only appears when the client doesn't send a request and
        // terminates the connection.
        error!("Failed to serve connection from {remote_addr}: {err:#}");
    }
}
