//! Errores de arranque de plataforma.
//!
//! Solo el arranque puede fallar. Una vez construida, la bomba de eventos y el
//! almacén de input no tienen camino de error.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// No se pudo abrir la conexión con el servidor de ventanas.
    #[error("connection to the windowing system failed: {0}")]
    Connection(String),

    #[error("required extension {0} is not available")]
    ExtensionMissing(&'static str),

    #[error("extension {0} is present but not supported by the server")]
    ExtensionUnsupported(&'static str),

    /// Una petición a una extensión devolvió error.
    #[error("request to extension {extension} failed with code {code}")]
    ExtensionRequest { extension: &'static str, code: u8 },

    #[error("window creation failed: {0}")]
    WindowCreation(String),

    #[error("flushing the connection failed: {0}")]
    Flush(i32),
}

impl PlatformError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn window_creation(msg: impl Into<String>) -> Self {
        Self::WindowCreation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
