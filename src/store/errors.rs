//! Record store errors.

use std::fmt::Display;

use thiserror::Error;

/// Failure reported by the record store. The `Display` text is the message
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductStoreError {
    /// The request never reached the server.
    #[error("Error de red: {0}")]
    Network(String),

    /// The server could not be contacted at all (status 0).
    #[error("No se puede conectar al servidor. Por favor verifique su conexión a internet.")]
    Unreachable,

    /// 400, optionally with the server's explanation.
    #[error("{}", .message.as_deref().unwrap_or("Solicitud inválida. Por favor verifique su entrada."))]
    BadRequest {
        /// Server-provided message
        message: Option<String>,
    },

    /// 404
    #[error("Producto no encontrado.")]
    NotFound,

    /// 409
    #[error("Ya existe un producto con este ID.")]
    Conflict,

    /// 500
    #[error("Error del servidor. Por favor intente más tarde.")]
    Server,

    /// 503
    #[error("Servicio temporalmente no disponible. Por favor intente más tarde.")]
    Unavailable,

    /// Any other status. The server's message wins over the status line.
    #[error("{}", status_message(.status, .message.as_deref(), .status_text.as_deref()))]
    Status {
        /// HTTP status code
        status: u16,
        /// Server-provided message
        message: Option<String>,
        /// HTTP reason phrase
        status_text: Option<String>,
    },

    /// Failure without any user-presentable detail.
    #[error("unexpected record store failure")]
    Unknown,
}

impl ProductStoreError {
    /// Classify an HTTP error response.
    pub fn from_status(
        status: u16,
        body_message: Option<String>,
        status_text: Option<String>,
    ) -> Self {
        match status {
            0 => Self::Unreachable,
            400 => Self::BadRequest {
                message: body_message,
            },
            404 => Self::NotFound,
            409 => Self::Conflict,
            500 => Self::Server,
            503 => Self::Unavailable,
            _ => Self::Status {
                status,
                message: body_message,
                status_text,
            },
        }
    }

    /// The user-facing message this error carries, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Unknown => None,
            other => Some(other.to_string()),
        }
    }
}

fn status_message(status: impl Display, message: Option<&str>, status_text: Option<&str>) -> String {
    if let Some(message) = message {
        return message.to_string();
    }

    format!(
        "Error {status}: {}",
        status_text
            .filter(|text| !text.is_empty())
            .unwrap_or("Error desconocido")
    )
}
