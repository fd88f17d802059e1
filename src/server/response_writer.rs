use chrono_tz::America::Los_Angeles;
use std::io::{self, Write};

use super::http_status::HttpStatus;

#[derive(Debug)]
pub struct Response {
    pub protocol: String,
    pub status: HttpStatus,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(protocol: &str, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            protocol: protocol.to_string(),
            status: HttpStatus::Ok,
            content_type,
            body,
        }
    }

    /// Error responses carry the reason phrase as a plain-text body.
    pub fn error(protocol: &str, status: HttpStatus) -> Self {
        Self {
            protocol: protocol.to_string(),
            status,
            content_type: "text/plain",
            body: status.text().as_bytes().to_vec(),
        }
    }

    pub fn keeps_alive(&self) -> bool {
        self.protocol == "HTTP/1.1"
    }

    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        let connection = if self.keeps_alive() {
            "Keep-Alive"
        } else {
            "close"
        };
        let headers = format!(
            "{} {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nDate: {}\r\nConnection: {}\r\n\r\n",
            self.protocol,
            self.status.code(),
            self.status.text(),
            self.content_type,
            self.body.len(),
            http_date(),
            connection
        );

        out.write_all(headers.as_bytes())?;
        out.write_all(&self.body)?;
        out.flush()
    }
}

pub fn http_date() -> String {
    chrono::Utc::now()
        .with_timezone(&Los_Angeles)
        .format("%a, %d %b %Y %H:%M:%S %Z")
        .to_string()
}
