//! Data models and processing for heart-rate readings.
//!
//! This module turns raw records from a [`DataSource`](crate::source::DataSource)
//! into validated readings and everything derived from them.
//!
//! ## Submodules
//!
//! - [`reading`]: Validated [`Reading`] built from a wire record
//! - [`buffer`]: Capped, ordered [`SessionBuffer`] of readings
//! - [`stats`]: Aggregate [`Statistics`] over the buffer
//! - [`threshold`]: Validated alert [`Threshold`] and [`AlertState`]
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "5s", "500ms")
//!
//! ## Data Flow
//!
//! ```text
//! HeartRateRecord (raw JSON)
//!        │
//!        ▼
//! Reading::from_record()  ──▶ dropped if incomplete
//!        │
//!        ├──▶ SessionBuffer::push()
//!        │           │
//!        │           └──▶ Statistics::from_buffer() / chart window
//!        │
//!        └──▶ AlertState::evaluate(value, threshold)
//! ```

pub mod buffer;
pub mod duration;
pub mod reading;
pub mod stats;
pub mod threshold;

pub use buffer::{ChartPoint, SessionBuffer, CHART_WINDOW};
pub use reading::Reading;
pub use stats::Statistics;
pub use threshold::{AlertState, Threshold, ThresholdError};
