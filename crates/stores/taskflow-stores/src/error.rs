use taskflow_backend::BackendError;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StoreError {
    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::Backend(err) => err.is_auth_error(),
        }
    }
}
