pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "effective_rent")]
pub mod effective_rent;

pub use error::EffectiveRentError;
pub use types::*;

/// Standard result type for all effective-rent operations
pub type EffectiveRentResult<T> = Result<T, EffectiveRentError>;
