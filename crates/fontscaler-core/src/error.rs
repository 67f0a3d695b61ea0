pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The construction target is not an element node.
    #[error("{message}")]
    InvalidTarget { message: String },

    /// Neither the height variable nor the parent's content height is a positive number.
    #[error("{message}")]
    InvalidHeight { message: String },

    /// The fit search did not converge before the iteration ceiling.
    #[error("{message} (limit: {limit})")]
    MaxIterationsExceeded { message: String, limit: u32 },

    #[error("Invalid scaler configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid scaler configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}
