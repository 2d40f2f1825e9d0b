//! Market data: the `DataSource` trait and its adapters.

pub mod circuit_breaker;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use provider::{DataError, DataSource, PRICE_CASCADE};
pub use synthetic::SyntheticSource;
pub use yahoo::YahooSource;
