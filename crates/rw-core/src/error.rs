use derive_more::From;
use orion_error::{ErrorCode, StructError, UvsReason};

#[derive(Debug, Clone, PartialEq, thiserror::Error, From)]
pub enum CoreReason {
    #[error("invalid argument")]
    InvalidArgument,
    #[error("region catalog error")]
    Catalog,
    #[error("map widget unavailable")]
    MapUnavailable,
    #[error("map backend error")]
    MapBackend,
    #[error("snapshot sink error")]
    Snapshot,
    #[error("{0}")]
    Uvs(UvsReason),
}

impl ErrorCode for CoreReason {
    fn error_code(&self) -> i32 {
        match self {
            Self::InvalidArgument => 1001,
            Self::Catalog => 1002,
            Self::MapUnavailable => 1003,
            Self::MapBackend => 1004,
            Self::Snapshot => 1005,
            Self::Uvs(u) => u.error_code(),
        }
    }
}

pub type CoreError = StructError<CoreReason>;
pub type CoreResult<T> = Result<T, CoreError>;
