//! telemetry/mod.rs
//! Transfer counters, stage timers and immutable snapshots.
//!
//! Notes:
//! - Counters are plain values merged at the end of a run; `Meter` is the
//!   shared, atomic variant used while streams are being pulled.
//! - Snapshots are serde-serialisable for `--json` output.

pub mod counters;
pub mod timers;
pub mod snapshot;
pub mod metered;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
pub use metered::*;
