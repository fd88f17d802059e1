#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HttpStatus {
    Ok,
    BadRequest,
    Forbidden,
    NotFound,
    InternalServerError,
    ServiceUnavailable,
}

impl HttpStatus {
    pub fn code(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
            Self::ServiceUnavailable => 503,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::BadRequest => "Bad Request",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::InternalServerError => "Internal Server Error",
            Self::ServiceUnavailable => "Service Unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_reason_phrases() {
        let expected = [
            (HttpStatus::Ok, 200, "OK"),
            (HttpStatus::BadRequest, 400, "Bad Request"),
            (HttpStatus::Forbidden, 403, "Forbidden"),
            (HttpStatus::NotFound, 404, "Not Found"),
            (HttpStatus::InternalServerError, 500, "Internal Server Error"),
            (HttpStatus::ServiceUnavailable, 503, "Service Unavailable"),
        ];

        for (status, code, text) in expected {
            assert_eq!(status.code(), code);
            assert_eq!(status.text(), text);
        }
    }
}
