//! compression/constants.rs
//! Mode names, file suffixes and default levels.

/// Mode names accepted on the command line and in configuration.
pub mod modes {
    pub const PASS: &str = "pass";
    pub const GZIP: &str = "gzip";
    pub const GZIP_FAST: &str = "gzip-fast";
    pub const BZIP2: &str = "bzip2";
    pub const XZ: &str = "xz";
    pub const LZMA: &str = "lzma";
    pub const ZSTD: &str = "zstd";
    pub const LZ4: &str = "lz4";
    pub const BROTLI: &str = "brotli";

    /// Pseudo-mode: identity, suffix left untouched.
    pub const RAW: &str = "raw";
    /// Pseudo-mode: strip the detected encoding, no re-encode.
    pub const DECOMPRESS: &str = "decompress";
}

/// File name suffixes (with leading dot). Empty means "explicit mode only".
pub mod suffixes {
    pub const NONE: &str = "";
    pub const GZIP: &str = ".gz";
    pub const BZIP2: &str = ".bz2";
    pub const XZ: &str = ".xz";
    pub const LZMA: &str = ".lzma";
    pub const ZSTD: &str = ".zstd";
    pub const LZ4: &str = ".lz4";
    pub const BROTLI: &str = ".br";
}

/// Default compression levels.
pub const LEVEL_GZIP: u32 = 9;
pub const LEVEL_GZIP_FAST: u32 = 1;
pub const LEVEL_BZIP2: u32 = 9;
pub const BZIP2_WORK_FACTOR: u32 = 30;
pub const LEVEL_XZ: u32 = 6;
pub const LEVEL_ZSTD: i32 = 3;
pub const LEVEL_BROTLI: u32 = 11;
pub const BROTLI_LG_WINDOW: u32 = 22;
pub const BROTLI_BUFFER: usize = 4096;
