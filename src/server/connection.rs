use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader, ErrorKind};
use std::mem;
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;

use super::connection_counter::{ConnectionCounter, ConnectionLease};
use super::http_status::HttpStatus;
use super::path_resolver::{PathResolver, ResolveError, ResolvedFile};
use super::request_parser::Request;
use super::response_writer::Response;
use super::timeout_policy::TimeoutPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Normal,
    Timeout,
    Error,
}

#[derive(Debug)]
enum ConnectionStage {
    AwaitingRequest,
    Dispatching(String),
    ResponseSent { keep_alive: bool },
    Closed(CloseReason),
}

/// One accepted connection, driven to completion on a pool thread.
/// Serves request lines one at a time until the peer disconnects, the
/// protocol asks for a close, or the read deadline expires.
pub struct Connection {
    reader: BufReader<TcpStream>,
    peer: SocketAddr,
    resolver: Arc<PathResolver>,
    timeouts: TimeoutPolicy,
    counter: ConnectionCounter,
    stage: ConnectionStage,
    _lease: ConnectionLease,
}

impl Connection {
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        resolver: Arc<PathResolver>,
        timeouts: TimeoutPolicy,
        counter: ConnectionCounter,
        lease: ConnectionLease,
    ) -> Self {
        Self {
            reader: BufReader::new(stream),
            peer,
            resolver,
            timeouts,
            counter,
            stage: ConnectionStage::AwaitingRequest,
            _lease: lease,
        }
    }

    pub fn run(mut self) -> CloseReason {
        let reason = loop {
            let stage = mem::replace(&mut self.stage, ConnectionStage::AwaitingRequest);
            self.stage = match stage {
                ConnectionStage::AwaitingRequest => self.await_request(),
                ConnectionStage::Dispatching(line) => self.dispatch(&line),
                ConnectionStage::ResponseSent { keep_alive } => {
                    if keep_alive {
                        ConnectionStage::AwaitingRequest
                    } else {
                        ConnectionStage::Closed(CloseReason::Normal)
                    }
                }
                ConnectionStage::Closed(reason) => break reason,
            };
        };

        match reason {
            CloseReason::Normal => info!("Connection to {} closed", self.peer),
            CloseReason::Timeout => info!("Connection to {} closed by timeout", self.peer),
            CloseReason::Error => warn!("Connection to {} closed after an error", self.peer),
        }

        reason
    }

    fn await_request(&mut self) -> ConnectionStage {
        // The deadline is recomputed from the current number of open
        // connections before every request, not once per connection.
        let timeout = self.timeouts.read_timeout(self.counter.open_connections());
        if let Err(e) = self.reader.get_ref().set_read_timeout(Some(timeout)) {
            error!("Failed to set read timeout for {}: {}", self.peer, e);
            return ConnectionStage::Closed(CloseReason::Error);
        }
        debug!("Waiting up to {:?} for a request from {}", timeout, self.peer);

        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => {
                debug!("Connection closed by {}", self.peer);
                ConnectionStage::Closed(CloseReason::Normal)
            }
            // Bytes that are not UTF-8 are replaced, not fatal: the line
            // still reaches the parser.
            Ok(_) => {
                ConnectionStage::Dispatching(String::from_utf8_lossy(&line).into_owned())
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                info!("Read timed out after {:?} for {}", timeout, self.peer);
                ConnectionStage::Closed(CloseReason::Timeout)
            }
            Err(e) => {
                error!("Error reading from {}: {}", self.peer, e);
                ConnectionStage::Closed(CloseReason::Error)
            }
        }
    }

    fn dispatch(&mut self, line: &str) -> ConnectionStage {
        let request = match Request::parse(line) {
            Ok(request) => request,
            Err(e) => {
                warn!("Malformed request line from {}: {}", self.peer, e);
                // No protocol token was parsed: answer as HTTP/1.0 and close.
                return self.send(Response::error("HTTP/1.0", HttpStatus::BadRequest), false);
            }
        };

        debug!(
            "Request from {}: {} {} {}",
            self.peer, request.method, request.target, request.protocol
        );

        let keep_alive = request.keeps_alive();
        let response = self.build_response(&request);
        self.send(response, keep_alive)
    }

    fn build_response(&self, request: &Request) -> Response {
        if !request.is_get() {
            warn!(
                "Unsupported method {} from {}",
                request.method, self.peer
            );
            return Response::error(&request.protocol, HttpStatus::BadRequest);
        }

        match self.resolver.resolve(&request.target) {
            Ok(file) => serve_resolved(&file, &request.protocol, self.peer),
            Err(ResolveError::NotFound) => {
                Response::error(&request.protocol, HttpStatus::NotFound)
            }
            Err(ResolveError::AccessDenied) => {
                Response::error(&request.protocol, HttpStatus::Forbidden)
            }
        }
    }

    fn send(&mut self, response: Response, keep_alive: bool) -> ConnectionStage {
        match response.write_to(self.reader.get_mut()) {
            Ok(()) => {
                debug!(
                    "Sent {} {} to {}",
                    response.status.code(),
                    response.status.text(),
                    self.peer
                );
                ConnectionStage::ResponseSent { keep_alive }
            }
            Err(e) => {
                error!("Error writing response to {}: {}", self.peer, e);
                ConnectionStage::Closed(CloseReason::Error)
            }
        }
    }
}

/// Reads a file that already passed resolution; a failure here means it
/// changed underneath us and is the one condition answered with 500.
fn serve_resolved(file: &ResolvedFile, protocol: &str, peer: SocketAddr) -> Response {
    match std::fs::read(&file.path) {
        Ok(body) => {
            if body.len() as u64 != file.len {
                warn!(
                    "Size of {:?} changed during serving ({} -> {} bytes)",
                    file.path,
                    file.len,
                    body.len()
                );
            }
            info!(
                "Serving {:?} to {} ({} bytes, {})",
                file.path,
                peer,
                body.len(),
                file.content_type
            );
            Response::ok(protocol, file.content_type, body)
        }
        Err(e) => {
            error!("Error reading {:?}: {}", file.path, e);
            Response::error(protocol, HttpStatus::InternalServerError)
        }
    }
}
