//! telemetry/counters.rs
//! Mutable counters collected while a pipeline runs.
//!
//! Summary: chunk and byte counts on the input and output side of a
//! pipeline, plus merged line counts. Converted into an immutable
//! `TelemetrySnapshot` at the end.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub chunks_in: u64,
    pub bytes_in: u64,
    pub chunks_out: u64,
    pub bytes_out: u64,
    pub lines_merged: u64,
}

impl TelemetryCounters {
    /// Record one chunk pulled from the source side.
    pub fn add_input(&mut self, len: usize) {
        self.chunks_in += 1;
        self.bytes_in += len as u64;
    }

    /// Record one chunk delivered on the sink side.
    pub fn add_output(&mut self, len: usize) {
        self.chunks_out += 1;
        self.bytes_out += len as u64;
    }

    pub fn add_lines(&mut self, n: u64) {
        self.lines_merged += n;
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.chunks_in += other.chunks_in;
        self.bytes_in += other.bytes_in;
        self.chunks_out += other.chunks_out;
        self.bytes_out += other.bytes_out;
        self.lines_merged += other.lines_merged;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
