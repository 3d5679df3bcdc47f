#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use logarchive_core::stream::{
        merge_lines, read_all, BoxStream, ByteStream, MemoryStream, MergeStream, PipelineBuilder,
    };
    use logarchive_core::types::StreamError;
    use proptest::prelude::*;

    fn input(lines: &[&str]) -> MemoryStream {
        let text: String = lines.iter().map(|l| format!("{l}\n")).collect();
        MemoryStream::with_chunk_size(text, 3)
    }

    fn merged(inputs: Vec<MemoryStream>) -> Vec<String> {
        merge_lines(inputs)
            .map(|l| l.map(|l| l.trim_end_matches('\n').to_string()))
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn three_way_merge() {
        let out = merged(vec![input(&["a", "d", "g"]), input(&["b", "e"]), input(&["c", "f", "h"])]);
        assert_eq!(out, vec!["a", "b", "c", "d", "e", "f", "g", "h"]);
    }

    #[test]
    fn ties_keep_both_lines() {
        assert_eq!(merged(vec![input(&["x"]), input(&["x"])]), vec!["x", "x"]);
    }

    #[test]
    fn empty_inputs_are_skipped() {
        let out = merged(vec![input(&[]), input(&["a", "b"]), input(&[])]);
        assert_eq!(out, vec!["a", "b"]);
        assert!(merged(vec![]).is_empty());
        assert!(merged(vec![input(&[])]).is_empty());
    }

    #[test]
    fn merge_stream_chunks_past_bufsize() {
        let a: Vec<String> = (0..200).map(|i| format!("{i:05} a")).collect();
        let b: Vec<String> = (0..200).map(|i| format!("{i:05} b")).collect();
        let a: Vec<&str> = a.iter().map(String::as_str).collect();
        let b: Vec<&str> = b.iter().map(String::as_str).collect();

        let mut stream = MergeStream::with_bufsize(vec![input(&a), input(&b)], 64);
        let mut chunks = Vec::new();
        while let Some(chunk) = stream.next_chunk().unwrap() {
            chunks.push(chunk);
        }
        let (last, full) = chunks.split_last().unwrap();
        assert!(full.iter().all(|c| c.len() > 64), "non-final chunks exceed the buffer size");
        assert!(!last.is_empty());

        let text: Vec<u8> = chunks.concat();
        let text = String::from_utf8(text).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 400);
        assert_eq!(lines[0], "00000 a");
        assert_eq!(lines[1], "00000 b");
        assert_eq!(lines[399], "00199 b");
    }

    #[test]
    fn merge_of_nothing_is_empty_stream() {
        let mut stream = MergeStream::new(Vec::<MemoryStream>::new());
        assert_eq!(read_all(&mut stream).unwrap(), Bytes::new());
    }

    struct Broken;

    impl ByteStream for Broken {
        fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
            Err(StreamError::Validation("disk gone".into()))
        }
    }

    #[test]
    fn input_failure_surfaces() {
        let inputs: Vec<BoxStream> = vec![Box::new(input(&["a"])), Box::new(Broken)];
        let mut stream = MergeStream::new(inputs);
        assert!(read_all(&mut stream).is_err());
    }

    #[test]
    fn merge_rejects_invalid_utf8_instead_of_rewriting() {
        let mut stream = MergeStream::new(vec![MemoryStream::new(&b"a\xff\n"[..])]);
        let err = read_all(&mut stream).unwrap_err();
        assert!(matches!(err, StreamError::Utf8(_)), "got {err:?}");
    }

    #[test]
    fn merge_output_is_byte_exact_for_valid_text() {
        let text = "2024-01-01 naïve\n2024-01-02 \u{1F600}\n";
        let mut stream = MergeStream::new(vec![MemoryStream::with_chunk_size(text, 1)]);
        assert_eq!(read_all(&mut stream).unwrap(), Bytes::from(text));
    }

    #[test]
    fn merges_compressed_inputs_through_pipeline() {
        let builder = PipelineBuilder::new().chunk_size(7);
        let (gz_name, mut gz) = builder.build_bytes("day1.log", "gzip", "01 a\n03 a\n05 a\n").unwrap();
        let (xz_name, mut xz) = builder.build_bytes("day2.log", "xz", "02 b\n04 b\n").unwrap();
        assert_eq!((gz_name.as_str(), xz_name.as_str()), ("day1.log.gz", "day2.log.xz"));
        let gz = read_all(&mut gz).unwrap();
        let xz = read_all(&mut xz).unwrap();

        let (_, a) = builder.build_bytes("day1.log.gz", "decompress", gz).unwrap();
        let (_, b) = builder.build_bytes("day2.log.xz", "decompress", xz).unwrap();
        let mut stream = MergeStream::new(vec![a, b]);
        assert_eq!(
            read_all(&mut stream).unwrap(),
            Bytes::from_static(b"01 a\n02 b\n03 a\n04 b\n05 a\n")
        );
    }

    proptest! {
        #[test]
        fn merge_equals_sorted_union(
            mut inputs in proptest::collection::vec(proptest::collection::vec("[a-d]{0,4}", 0..12), 0..5)
        ) {
            for lines in inputs.iter_mut() {
                lines.sort();
            }
            let mut expected: Vec<String> = inputs.iter().flatten().cloned().collect();
            expected.sort();

            let streams = inputs
                .iter()
                .map(|lines| input(&lines.iter().map(String::as_str).collect::<Vec<_>>()))
                .collect();
            prop_assert_eq!(merged(streams), expected);
        }
    }
}
