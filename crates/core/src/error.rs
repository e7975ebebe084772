use thiserror::Error;

use crate::model::{IdError, TimerError};
use crate::time::TimestampError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Timer(#[from] TimerError),
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}
