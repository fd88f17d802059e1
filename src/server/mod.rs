pub mod config;
pub mod connection;
pub mod connection_counter;
pub mod http_status;
pub mod mime;
pub mod path_resolver;
pub mod request_parser;
pub mod response_writer;
pub mod timeout_policy;

use log::{debug, error, info, warn};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use threadpool::ThreadPool;

use config::ServerConfig;
use connection::Connection;
use connection_counter::ConnectionCounter;
use http_status::HttpStatus;
use path_resolver::PathResolver;
use response_writer::Response;
use timeout_policy::TimeoutPolicy;

pub struct HttpServer {
    config: ServerConfig,
    listener: TcpListener,
    resolver: Arc<PathResolver>,
    timeouts: TimeoutPolicy,
    counter: ConnectionCounter,
    thread_pool: ThreadPool,
}

impl HttpServer {
    pub fn new(config: &ServerConfig) -> std::io::Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr)?;

        info!("Server started on {}", addr);

        let resolver = Arc::new(PathResolver::new(
            config.document_root.clone(),
            config.default_document.clone(),
        ));
        let timeouts = TimeoutPolicy::from_config(config);
        let thread_pool = ThreadPool::new(config.threads);

        Ok(Self {
            config: config.clone(),
            listener,
            resolver,
            timeouts,
            counter: ConnectionCounter::new(),
            thread_pool,
        })
    }

    /// Actual bound address; lets callers configure port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn run(&self) {
        info!("Server running with {} threads", self.config.threads);

        loop {
            match self.listener.accept() {
                Ok((stream, addr)) => self.dispatch(stream, addr),
                Err(e) => error!("Error accepting connection: {}", e),
            }
        }
    }

    fn dispatch(&self, stream: TcpStream, addr: SocketAddr) {
        let lease = match self.counter.try_acquire(self.config.max_connections) {
            Some(lease) => lease,
            None => {
                warn!(
                    "Maximum connections reached, rejecting connection from {}",
                    addr
                );
                Self::refuse(stream);
                return;
            }
        };

        info!(
            "Accepted connection from {} (open: {})",
            addr,
            self.counter.open_connections()
        );

        let resolver = Arc::clone(&self.resolver);
        let timeouts = self.timeouts;
        let counter = self.counter.clone();

        self.thread_pool.execute(move || {
            Connection::new(stream, addr, resolver, timeouts, counter, lease).run();
        });
    }

    fn refuse(mut stream: TcpStream) {
        // The 503 write is best effort; the socket is dropped either way.
        let rejection = Response::error("HTTP/1.0", HttpStatus::ServiceUnavailable);
        if let Err(e) = rejection.write_to(&mut stream) {
            debug!("Failed to deliver 503: {}", e);
        }
    }
}
