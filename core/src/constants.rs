/// Defaults when Option<T> is None
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024 * 1024; // 1 MiB

/// Merge output is re-chunked once the buffer grows past this size.
pub const DEFAULT_MERGE_BUFSIZE: usize = 4096;

/// Smallest accepted read chunk (tests feed 1-3 byte chunks).
pub const MIN_CHUNK_SIZE: usize = 1;

/// Max chunk size sanity bound (32 MiB).
pub const MAX_CHUNK_SIZE: usize = 32 * 1024 * 1024;

/// Bounded queue depth between a prefetch worker and its consumer.
pub const DEFAULT_PREFETCH_DEPTH: usize = 2;

/// Output growth step for incremental codecs.
pub const CODEC_OUT_STEP: usize = 64 * 1024;

/// Compression mode used by batch walks when none is given.
pub const DEFAULT_PROCESS_MODE: &str = "gzip";

/// Object store listing page size.
pub const DEFAULT_LIST_PAGE_SIZE: usize = 1000;

/// File name suffixes the read endpoint may serve pre-compressed, in
/// preference order, keyed by `Accept-Encoding` token.
pub const PRECOMPRESSED_ENCODINGS: &[(&str, &str)] = &[
    ("br", ".br"),
    ("gzip", ".gz"),
];
