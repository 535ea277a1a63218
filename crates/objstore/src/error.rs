// Error types for object-store enumeration

#[derive(Debug, thiserror::Error)]
pub enum ObjectStoreError {
    #[error("S3 error: {0}")]
    S3(#[from] s3::error::S3Error),

    #[error("Invalid S3 credentials: {message}")]
    Credentials { message: String },

    #[error("Invalid S3 region '{region}'")]
    Region { region: String },

    #[error("Listing bucket '{bucket}' failed with HTTP {status}")]
    ListStatus { bucket: String, status: u16 },

    #[error("Fetching object '{key}' failed with HTTP {status}")]
    GetStatus { key: String, status: u16 },

    #[error("Object not found: {key}")]
    NotFound { key: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ObjectStoreError {
    /// Whether retrying the same request can succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ObjectStoreError::S3(_) => true,
            ObjectStoreError::ListStatus { status, .. }
            | ObjectStoreError::GetStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ObjectStoreError>;
