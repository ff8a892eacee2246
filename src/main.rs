use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::sync::Arc;
use tokio::net::TcpListener;

mod api;
mod bootstrap;
mod config;
mod geometry;
mod logger;
mod store;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    // Bootstrap sequence: the listener is bound only after the target
    // database exists and migrations have been applied. Any failure
    // here exits the process with a non-zero status.
    logger::log_bootstrap_step(&format!(
        "Ensuring database \"{}\" exists",
        cfg.database_name()
    ));
    if let Err(err) = bootstrap::ensure_database_exists(&cfg).await {
        logger::log_bootstrap_fatal(&format!("Database existence check failed: {err:?}"));
        return Err(err.into());
    }

    let pool = match bootstrap::connect_pool(&cfg).await {
        Ok(pool) => pool,
        Err(err) => {
            logger::log_bootstrap_fatal(&format!("Could not open connection pool: {err:?}"));
            return Err(err.into());
        }
    };

    if let Err(err) = bootstrap::run_migrations(&pool, &cfg).await {
        logger::log_bootstrap_fatal(&format!("Migration failed: {err:?}"));
        return Err(err.into());
    }

    let addr = cfg.get_socket_addr()?;
    let listener = create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let spatial_store: Arc<dyn store::PolygonStore> = Arc::new(store::PgPolygonStore::new(pool));
    let state = Arc::new(config::AppState::new(cfg, spatial_store));

    loop {
        match listener.accept().await {
            Ok((stream, _peer_addr)) => {
                handle_connection(stream, Arc::clone(&state));
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection: {e}"));
            }
        }
    }
}

/// Handle a single connection in a spawned task.
///
/// Each request is handled independently; the only shared resource is
/// the store's connection pool inside `state`. No timeout is applied
/// toward the store, driver defaults apply.
fn handle_connection(stream: tokio::net::TcpStream, state: Arc<config::AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let conn = http1::Builder::new().serve_connection(
            io,
            service_fn(move |req| {
                let state_clone = Arc::clone(&state);
                async move { api::handle_request(req, state_clone).await }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}

/// Create a `TcpListener` with `SO_REUSEPORT` and `SO_REUSEADDR` enabled,
/// so a replacement process can bind while sockets linger in `TIME_WAIT`.
fn create_reusable_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_port(true)?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
