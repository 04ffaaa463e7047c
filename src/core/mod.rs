pub mod error;
pub mod timezone;

pub use error::{AppError, Result};
pub use timezone::BusinessClock;
