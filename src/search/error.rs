use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("heap is empty")]
    EmptyHeap,
}

pub type Result<T> = std::result::Result<T, SearchError>;

pub(crate) fn check_argument(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(SearchError::InvalidArgument(message()))
    }
}
