#[cfg(test)]
mod tests {
    use logarchive_core::compression::{registry, CodecDescriptor};
    use logarchive_core::stream::{read_all, ByteStream, MemoryStream};
    use logarchive_core::types::StreamError;
    use proptest::prelude::*;

    fn encode(codec: &CodecDescriptor, data: &[u8], chunk: usize) -> Result<Vec<u8>, StreamError> {
        let source = MemoryStream::with_chunk_size(data.to_vec(), chunk);
        let mut stage = codec.compress_stage(Box::new(source))?;
        Ok(read_all(&mut stage)?.to_vec())
    }

    fn decode(codec: &CodecDescriptor, data: &[u8], chunk: usize) -> Result<Vec<u8>, StreamError> {
        let source = MemoryStream::with_chunk_size(data.to_vec(), chunk);
        let mut stage = codec.decompress_stage(Box::new(source))?;
        Ok(read_all(&mut stage)?.to_vec())
    }

    fn log_text(lines: usize) -> Vec<u8> {
        (0..lines)
            .map(|i| format!("2024-01-01T00:{:02}:{:02} host{} GET /index.html 200 {}\n", i / 60 % 60, i % 60, i % 7, i * 31))
            .collect::<String>()
            .into_bytes()
    }

    #[test]
    fn every_codec_round_trips_large_input() {
        let data = log_text(25_000);
        assert!(data.len() >= 1024 * 1024, "fixture should be at least 1 MiB");
        for codec in registry().descriptors() {
            let packed = encode(codec, &data, 64 * 1024).unwrap();
            let unpacked = decode(codec, &packed, 64 * 1024).unwrap();
            assert_eq!(unpacked, data, "round trip mismatch for {}", codec.mode);
            if !codec.suffix.is_empty() {
                assert!(packed.len() < data.len(), "{} did not shrink log text", codec.mode);
            }
        }
    }

    #[test]
    fn every_codec_round_trips_empty_input() {
        for codec in registry().descriptors() {
            let packed = encode(codec, b"", 16).unwrap();
            let unpacked = decode(codec, &packed, 16).unwrap();
            assert!(unpacked.is_empty(), "{} produced bytes from nothing", codec.mode);
        }
    }

    #[test]
    fn tiny_chunks_round_trip() {
        let data = log_text(50);
        for codec in registry().descriptors() {
            let packed = encode(codec, &data, 3).unwrap();
            assert_eq!(decode(codec, &packed, 3).unwrap(), data, "3-byte chunks broke {}", codec.mode);
            assert_eq!(decode(codec, &packed, 1).unwrap(), data, "1-byte chunks broke {}", codec.mode);
        }
    }

    #[test]
    fn suffixes_and_modes_map_both_ways() {
        let reg = registry();
        for codec in reg.descriptors().filter(|c| !c.suffix.is_empty()) {
            assert_eq!(reg.lookup_by_suffix(codec.suffix).map(|c| c.mode), Some(codec.mode));
            assert_eq!(reg.lookup_by_mode(codec.mode).map(|c| c.suffix), Some(codec.suffix));
        }
        assert!(reg.lookup_by_suffix(".log").is_none());
        assert!(reg.lookup_by_suffix("").is_none());
    }

    #[test]
    fn builtin_table_has_required_codecs() {
        let reg = registry();
        for (mode, suffix) in [("gzip", ".gz"), ("bzip2", ".bz2"), ("xz", ".xz"), ("lzma", ".lzma")] {
            assert_eq!(reg.lookup_by_mode(mode).map(|c| c.suffix), Some(suffix));
        }
        assert!(reg.is_available("pass"));
        assert!(!reg.is_available("raw"));
        assert!(reg.validate_mode("decompress").is_ok());
    }

    /// Every chunk a stage yields, after checking EOF stays put.
    fn chunks_until_eof(codec: &CodecDescriptor, data: &[u8], chunk: usize) -> Vec<Vec<u8>> {
        let source = MemoryStream::with_chunk_size(data.to_vec(), chunk);
        let mut stage = codec.compress_stage(Box::new(source)).unwrap();
        let mut chunks = Vec::new();
        while let Some(c) = stage.next_chunk().unwrap() {
            chunks.push(c.to_vec());
        }
        for _ in 0..3 {
            assert!(stage.next_chunk().unwrap().is_none(), "{} yielded data after EOF", codec.mode);
        }
        chunks
    }

    #[test]
    fn incremental_codecs_yield_per_chunk_then_flush() {
        let data = log_text(400);
        let chunk = 1024;
        let upstream_chunks = data.len().div_ceil(chunk);
        for mode in ["bzip2", "xz", "lzma"] {
            let codec = registry().lookup_by_mode(mode).unwrap();
            let chunks = chunks_until_eof(codec, &data, chunk);
            assert_eq!(chunks.len(), upstream_chunks + 1, "{mode}: one chunk per input plus the flush");

            let flush = chunks.last().unwrap();
            assert!(!flush.is_empty(), "{mode}: flush carries the stream trailer");
            assert_eq!(decode(codec, &chunks.concat(), 512).unwrap(), data, "{mode}: chunks in order decode");
        }
    }

    #[test]
    fn incremental_codecs_flush_empty_input() {
        for mode in ["bzip2", "xz"] {
            let codec = registry().lookup_by_mode(mode).unwrap();
            let chunks = chunks_until_eof(codec, b"", 16);
            assert_eq!(chunks.len(), 1, "{mode}: empty input yields only the flush");
            assert!(decode(codec, &chunks[0], 16).unwrap().is_empty());
        }
    }

    #[test]
    fn gzip_filter_yields_exactly_one_chunk() {
        let data = log_text(400);
        let gzip = registry().lookup_by_mode("gzip").unwrap();
        let chunks = chunks_until_eof(gzip, &data, 100);
        assert_eq!(chunks.len(), 1, "whole-buffer codecs yield a single chunk");
        assert_eq!(decode(gzip, &chunks[0], 4096).unwrap(), data);

        let chunks = chunks_until_eof(gzip, b"", 100);
        assert_eq!(chunks.len(), 1, "even empty input yields one chunk");
    }

    #[test]
    fn garbage_gzip_is_corrupt() {
        let gzip = registry().lookup_by_mode("gzip").unwrap();
        let err = decode(gzip, b"this is not gzip at all", 8).unwrap_err();
        assert!(err.is_corrupt(), "expected corrupt-stream error, got {err}");
    }

    #[test]
    fn truncated_streams_fail() {
        let data = log_text(2_000);
        for codec in registry().descriptors().filter(|c| !c.suffix.is_empty()) {
            let packed = encode(codec, &data, 4096).unwrap();
            let cut = &packed[..packed.len() / 2];
            assert!(decode(codec, cut, 4096).is_err(), "{} accepted a truncated stream", codec.mode);
        }
    }

    #[test]
    fn concatenated_gzip_members_decode() {
        let gzip = registry().lookup_by_mode("gzip").unwrap();
        let mut packed = encode(gzip, b"first\n", 64).unwrap();
        packed.extend(encode(gzip, b"second\n", 64).unwrap());
        assert_eq!(decode(gzip, &packed, 5).unwrap(), b"first\nsecond\n");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn arbitrary_bytes_round_trip(data in proptest::collection::vec(any::<u8>(), 0..4096), chunk in 1usize..97) {
            for codec in registry().descriptors() {
                let packed = encode(codec, &data, chunk).unwrap();
                let unpacked = decode(codec, &packed, chunk).unwrap();
                prop_assert_eq!(&unpacked, &data, "codec {}", codec.mode);
            }
        }
    }
}
