#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to assemble configuration: {0}")]
    Figment(#[from] figment::Error),

    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

pub type Result<T> = std::result::Result<T, Error>;
