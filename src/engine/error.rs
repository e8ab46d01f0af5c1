use thiserror::Error;

use crate::model::Ms;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid interval data: slot [{start}, {end}) is empty or inverted")]
    InvalidInterval { start: Ms, end: Ms },
    #[error("invalid interval data: period [{start}, {end}) is empty or inverted")]
    InvalidPeriod { start: Ms, end: Ms },
}
