//! Minimal concurrent static-content HTTP server.
//!
//! One request line per read, GET only. HTTP/1.1 clients keep their
//! connection open across requests; the per-connection read timeout
//! shrinks as the number of open connections grows.

pub mod logger;
pub mod server;
