use thiserror::Error;

use crate::score::ScoreError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Score(#[from] ScoreError),
}
