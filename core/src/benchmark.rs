//! benchmark.rs
//! Per-codec size/speed comparison over one input file.

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::compression::registry::CodecRegistry;
use crate::stream::{read_all, MemoryStream};
use crate::telemetry::{Meter, MeteredStream, Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub mode: String,
    pub snapshot: TelemetrySnapshot,
    /// Decompressed output matched the input byte for byte.
    pub verified: bool,
}

/// Compress then decompress `path` with every mode in `modes`.
/// Unknown modes fail before any work starts.
pub fn benchmark(
    registry: &CodecRegistry,
    path: &Path,
    modes: &[&str],
) -> Result<Vec<BenchmarkReport>, StreamError> {
    let codecs = modes
        .iter()
        .map(|m| registry.resolve(m))
        .collect::<Result<Vec<_>, _>>()?;

    let mut reports = Vec::with_capacity(codecs.len());
    for codec in codecs {
        let mut timer = TelemetryTimer::new();
        let mut counters = TelemetryCounters::default();
        let data = Bytes::from(timer.time(Stage::Read, || std::fs::read(path))?);

        let meter = Meter::new();
        let source = MeteredStream::new(MemoryStream::new(data.clone()), meter.clone());
        let mut encoder = codec.compress_stage(Box::new(source))?;
        let compressed = timer.time(Stage::Compress, || read_all(&mut encoder))?;
        counters.chunks_in = meter.chunks();
        counters.bytes_in = meter.bytes();
        counters.add_output(compressed.len());

        let mut decoder = codec.decompress_stage(Box::new(MemoryStream::new(compressed)))?;
        let decoded = timer.time(Stage::Decompress, || read_all(&mut decoder))?;
        let verified = timer.time(Stage::Verify, || decoded == data);
        timer.finish();

        let snapshot = TelemetrySnapshot::from(&counters, &timer);
        info!(
            mode = codec.mode,
            input = snapshot.bytes_in,
            output = snapshot.bytes_out,
            ratio = snapshot.compression_ratio,
            compress_ms = snapshot.stage_times.get_ms(Stage::Compress),
            decompress_ms = snapshot.stage_times.get_ms(Stage::Decompress),
            verified,
            "benchmark"
        );
        reports.push(BenchmarkReport { mode: codec.mode.to_string(), snapshot, verified });
    }
    Ok(reports)
}
