use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use std::fmt::{self, Debug, Display};

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
    pub details: Option<Value>,
}

const INVALID_STATE: i32 = 100;
const INVALID_INPUT: i32 = 101;
const CONFLICT: i32 = 102;
const NOT_FOUND: i32 = 103;
const UNAUTHENTICATED: i32 = 104;
const UNAUTHORIZED: i32 = 105;

// postgres SQLSTATE codes
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl Error {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn status(&self) -> StatusCode {
        match self.code {
            1..=99 => StatusCode::INTERNAL_SERVER_ERROR,
            NOT_FOUND => StatusCode::NOT_FOUND,
            UNAUTHENTICATED => StatusCode::UNAUTHORIZED,
            UNAUTHORIZED => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.code, 1..=99)
    }

    pub fn is_invalid_state_error(&self) -> bool {
        self.code == INVALID_STATE
    }

    pub fn is_invalid_input_error(&self) -> bool {
        self.code == INVALID_INPUT
    }

    pub fn is_conflict_error(&self) -> bool {
        self.code == CONFLICT
    }

    pub fn is_not_found_error(&self) -> bool {
        self.code == NOT_FOUND
    }

    pub fn is_unauthenticated_error(&self) -> bool {
        self.code == UNAUTHENTICATED
    }

    pub fn is_unauthorized_error(&self) -> bool {
        self.code == UNAUTHORIZED
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => not_found_error("record"),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    invalid_input_error("a record with the same unique value already exists")
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    invalid_input_error("the operation references or is referenced by other records")
                }
                _ => database_error(err),
            },
            _ => database_error(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        io_error(err)
    }
}

impl From<printpdf::Error> for Error {
    fn from(err: printpdf::Error) -> Self {
        pdf_error(err)
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!("rejected token: {:?}", err);
        unauthenticated_error()
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        password_hash_error(err)
    }
}

impl From<oso::OsoError> for Error {
    fn from(err: oso::OsoError) -> Self {
        authorizor_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = if self.is_internal() {
            tracing::error!(code = self.code, "{}", self.message);
            "Internal Server Error"
        } else {
            self.message.as_str()
        };

        let mut body = json!({
            "code": self.code,
            "error": error_message,
        });

        if let Some(details) = &self.details {
            body["details"] = details.clone();
        }

        (status, Json(body)).into_response()
    }
}

pub fn invalid_transition_error(from: &str, to: &str) -> Error {
    Error::new(
        INVALID_STATE,
        format!("invalid status transition from {} to {}", from, to),
    )
    .with_details(json!({ "from": from, "to": to }))
}

pub fn invalid_input_error(message: impl Into<String>) -> Error {
    Error::new(INVALID_INPUT, message)
}

pub fn conflict_error(message: impl Into<String>, details: Value) -> Error {
    Error::new(CONFLICT, message).with_details(details)
}

pub fn not_found_error(resource: &str) -> Error {
    Error::new(NOT_FOUND, format!("{} not found", resource))
}

pub fn unauthenticated_error() -> Error {
    Error::new(UNAUTHENTICATED, "unauthenticated")
}

pub fn unauthorized_error() -> Error {
    Error::new(UNAUTHORIZED, "unauthorized")
}

pub fn database_error<T: Debug>(err: T) -> Error {
    Error::new(2, format!("database error: {:?}", err))
}

pub fn io_error(err: std::io::Error) -> Error {
    Error::new(3, format!("io error: {}", err))
}

pub fn pdf_error<T: Debug>(err: T) -> Error {
    Error::new(4, format!("pdf error: {:?}", err))
}

pub fn unexpected_error() -> Error {
    Error::new(5, "unexpected error")
}

pub fn password_hash_error(err: bcrypt::BcryptError) -> Error {
    Error::new(6, format!("password hash error: {}", err))
}

pub fn authorizor_error(err: oso::OsoError) -> Error {
    Error::new(7, format!("authorizor error: {}", err))
}

pub fn config_error(message: impl Into<String>) -> Error {
    Error::new(8, message)
}

pub fn token_error<T: Debug>(err: T) -> Error {
    Error::new(9, format!("token error: {:?}", err))
}
