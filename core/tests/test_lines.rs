#[cfg(test)]
mod tests {
    use std::io::Read;

    use bytes::Bytes;
    use logarchive_core::stream::{
        lines, read_all, BoxStream, ByteStream, CatStream, MemoryStream, Prefetch, StreamReader,
    };
    use logarchive_core::types::StreamError;
    use proptest::prelude::*;

    fn collect_lines<S: ByteStream>(stream: S) -> Vec<String> {
        lines(stream).collect::<Result<Vec<_>, _>>().unwrap()
    }

    /// Yields its chunks, then fails.
    struct Failing {
        chunks: Vec<&'static [u8]>,
    }

    impl ByteStream for Failing {
        fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
            if self.chunks.is_empty() {
                return Err(StreamError::Validation("upstream broke".into()));
            }
            Ok(Some(Bytes::from_static(self.chunks.remove(0))))
        }
    }

    #[test]
    fn lines_keep_newlines_and_tail() {
        let got = collect_lines(MemoryStream::with_chunk_size("a\nbb\n\nccc", 2));
        assert_eq!(got, vec!["a\n", "bb\n", "\n", "ccc"]);
    }

    #[test]
    fn lines_of_empty_stream() {
        assert!(collect_lines(MemoryStream::new(Bytes::new())).is_empty());
    }

    #[test]
    fn multibyte_characters_survive_small_chunks() {
        let text = "héllo wörld\nnäive\n";
        assert_eq!(collect_lines(MemoryStream::with_chunk_size(text, 1)), vec!["héllo wörld\n", "näive\n"]);
    }

    #[test]
    fn lines_report_upstream_error_after_complete_lines() {
        let mut it = lines(Failing { chunks: vec![b"one\ntw"] });
        assert_eq!(it.next().unwrap().unwrap(), "one\n");
        assert!(it.next().unwrap().is_err(), "error should follow the buffered line");
        assert!(it.next().is_none(), "iterator ends after an error");
    }

    #[test]
    fn cat_stream_concatenates_in_order() {
        let parts: Vec<BoxStream> = vec![
            Box::new(MemoryStream::new("ab")),
            Box::new(MemoryStream::new(Bytes::new())),
            Box::new(MemoryStream::with_chunk_size("cde", 1)),
        ];
        let mut cat = CatStream::new(parts);
        assert_eq!(read_all(&mut cat).unwrap(), Bytes::from_static(b"abcde"));
    }

    #[test]
    fn sized_reads_slice_across_chunks() {
        let mut reader = StreamReader::new(MemoryStream::with_chunk_size("0123456789", 3));
        assert_eq!(reader.read_sized(Some(4)).unwrap(), Bytes::from_static(b"0123"));
        assert_eq!(reader.read_sized(Some(0)).unwrap(), Bytes::new());
        assert_eq!(reader.read_sized(Some(5)).unwrap(), Bytes::from_static(b"45678"));
        assert!(!reader.is_eof());
        assert_eq!(reader.read_sized(Some(5)).unwrap(), Bytes::from_static(b"9"), "short read at end");
        assert!(reader.is_eof());
        assert_eq!(reader.read_sized(None).unwrap(), Bytes::new());
    }

    #[test]
    fn sized_read_none_takes_everything() {
        let mut reader = StreamReader::new(MemoryStream::with_chunk_size("abcdef", 2));
        assert_eq!(reader.read_sized(Some(1)).unwrap(), Bytes::from_static(b"a"));
        assert_eq!(reader.read_sized(None).unwrap(), Bytes::from_static(b"bcdef"));
    }

    #[test]
    fn stream_reader_is_io_read() {
        let mut reader = StreamReader::new(MemoryStream::with_chunk_size("hello world", 4));
        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();
        assert_eq!(text, "hello world");
    }

    #[test]
    fn prefetch_preserves_order() {
        let source: BoxStream = Box::new(MemoryStream::with_chunk_size("abcdefghij", 3));
        let mut prefetched = Prefetch::with_depth(source, 1);
        assert_eq!(read_all(&mut prefetched).unwrap(), Bytes::from_static(b"abcdefghij"));
        assert!(prefetched.next_chunk().unwrap().is_none());
    }

    proptest! {
        #[test]
        fn chunking_does_not_change_lines(
            body in proptest::collection::vec("[a-z ]{0,12}", 0..20),
            trailing in any::<bool>(),
            chunk in 1usize..4,
        ) {
            let mut text = body.join("\n");
            if trailing {
                text.push('\n');
            }
            let whole = collect_lines(MemoryStream::new(text.clone()));
            let pieces = collect_lines(MemoryStream::with_chunk_size(text.clone(), chunk));
            prop_assert_eq!(&whole, &pieces);
            prop_assert_eq!(whole.concat(), text);
        }
    }
}
