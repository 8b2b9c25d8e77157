use axum::http::StatusCode;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("failed to read {file}: {source}")]
    StorageRead {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write {file}: {source}")]
    StorageWrite {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("cannot aggregate an empty table")]
    EmptyAggregate,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn storage_read(file: &Path, source: csv::Error) -> Self {
        Self::StorageRead {
            file: file.display().to_string(),
            source,
        }
    }

    pub fn storage_write(file: &Path, source: csv::Error) -> Self {
        Self::StorageWrite {
            file: file.display().to_string(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::EmptyAggregate => StatusCode::CONFLICT,
            Self::StorageRead { .. } | Self::StorageWrite { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), self.to_string()).into_response()
    }
}
