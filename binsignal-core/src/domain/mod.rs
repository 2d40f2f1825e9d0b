//! Domain types for binsignal

pub mod candle;
pub mod instrument;
pub mod outcome;
pub mod session;
pub mod signal;

pub use candle::{is_ascending, Candle, Interval, Lookback};
pub use instrument::{Instrument, InstrumentError};
pub use outcome::{Outcome, Tally, TradeResult};
pub use session::SessionLabel;
pub use signal::{join_labels, Direction, IndicatorFamily, Signal, SignalOrigin};
