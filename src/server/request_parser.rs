use std::error::Error;
use std::fmt;

/// A parsed request line: `GET /index.html HTTP/1.1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    pub target: String,
    pub protocol: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MalformedRequest;

impl fmt::Display for MalformedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "request line does not split into method, target and protocol"
        )
    }
}

impl Error for MalformedRequest {}

impl Request {
    pub fn parse(line: &str) -> Result<Self, MalformedRequest> {
        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(method), Some(target), Some(protocol)) => Ok(Self {
                method: method.to_string(),
                target: target.to_string(),
                protocol: protocol.to_string(),
            }),
            _ => Err(MalformedRequest),
        }
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// Only the exact token "HTTP/1.1" keeps the connection open.
    pub fn keeps_alive(&self) -> bool {
        self.protocol == "HTTP/1.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_tokens_parse_into_a_request() {
        let request = Request::parse("GET /index.html HTTP/1.1\r\n").expect("well-formed");
        assert_eq!(request.method, "GET");
        assert_eq!(request.target, "/index.html");
        assert_eq!(request.protocol, "HTTP/1.1");
    }

    #[test]
    fn extra_tokens_are_ignored() {
        let request = Request::parse("GET / HTTP/1.1 trailing garbage").expect("well-formed");
        assert_eq!(request.target, "/");
        assert_eq!(request.protocol, "HTTP/1.1");
    }

    #[test]
    fn fewer_than_three_tokens_is_malformed() {
        assert_eq!(Request::parse(""), Err(MalformedRequest));
        assert_eq!(Request::parse("   \r\n"), Err(MalformedRequest));
        assert_eq!(Request::parse("GET"), Err(MalformedRequest));
        assert_eq!(Request::parse("GET /index.html"), Err(MalformedRequest));
    }

    #[test]
    fn method_check_ignores_case() {
        assert!(Request::parse("get / HTTP/1.1").expect("well-formed").is_get());
        assert!(!Request::parse("POST / HTTP/1.1").expect("well-formed").is_get());
    }

    #[test]
    fn only_the_exact_http_11_token_keeps_alive() {
        assert!(Request::parse("GET / HTTP/1.1").expect("well-formed").keeps_alive());
        assert!(!Request::parse("GET / HTTP/1.0").expect("well-formed").keeps_alive());
        assert!(!Request::parse("GET / http/1.1").expect("well-formed").keeps_alive());
        assert!(!Request::parse("GET / HTTP/2").expect("well-formed").keeps_alive());
    }
}
