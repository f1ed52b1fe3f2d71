// Integration tests for BufferedReader
// Tests cover: exact reads, line splitting, CRLF at window boundaries,
// delimiter reads, error propagation

use std::io::{self, Cursor};

use bufrs::{BufError, BufferedReader, ByteSource, ReaderConfig};
use quickcheck::QuickCheck;

/// Source that hands out its data in chunks of a fixed size.
struct Chunked {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl Chunked {
    fn new(data: &[u8], chunk: usize) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
            chunk: chunk.max(1),
        }
    }
}

impl ByteSource for Chunked {
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        if self.pos == self.data.len() {
            return Ok(None);
        }
        let n = self.chunk.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(Some(n))
    }
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 + 7) as u8).collect()
}

// ============================================================================
// Exact Read Tests
// ============================================================================

#[test]
fn test_read_exact_law_quickcheck() {
    fn prop(len: u16, chunk: u8, capacity: u8, n: u16) -> bool {
        let data = pattern(len as usize % 2048);
        let n = if data.is_empty() {
            0
        } else {
            n as usize % (data.len() + 1)
        };

        let source = Chunked::new(&data, chunk as usize);
        let mut reader = BufferedReader::with_capacity(capacity as usize, source);
        let mut dest = vec![0u8; n];
        match reader.read_exact(&mut dest) {
            Ok(Some(())) => dest == data[..n],
            Ok(None) | Err(_) => false,
        }
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(u16, u8, u8, u16) -> bool);
}

#[test]
fn test_read_exact_sequence_independent_of_chunking() {
    let data = pattern(1000);
    for chunk in [1, 3, 64, 999, 4096] {
        let mut reader = BufferedReader::with_capacity(16, Chunked::new(&data, chunk));
        let mut out = Vec::new();
        let mut dest = [0u8; 100];
        for _ in 0..10 {
            reader.read_exact(&mut dest).unwrap().unwrap();
            out.extend_from_slice(&dest);
        }
        assert_eq!(out, data, "chunk size {chunk}");
        assert_eq!(reader.read_exact(&mut dest).unwrap(), None);
    }
}

#[test]
fn test_read_exact_partial_keeps_data() {
    let mut reader = BufferedReader::new(Chunked::new(b"abcde", 2));
    let mut dest = [0u8; 8];
    match reader.read_exact(&mut dest) {
        Err(BufError::PartialRead { partial }) => assert_eq!(partial, &b"abcde"[..]),
        other => panic!("expected partial read, got {other:?}"),
    }
}

// ============================================================================
// Line Tests
// ============================================================================

#[test]
fn test_line_splitting() {
    let mut reader = BufferedReader::new(Cursor::new(&b"abc\r\ndef\nghi"[..]));
    for expected in [&b"abc"[..], &b"def"[..], &b"ghi"[..]] {
        let line = reader.read_line().unwrap().unwrap();
        assert_eq!(line.line, expected);
        assert!(!line.more);
    }
    assert!(reader.read_line().unwrap().is_none());
}

#[test]
fn test_lone_cr_is_kept() {
    let mut reader = BufferedReader::new(Cursor::new(&b"a\rb\nc\r"[..]));
    assert_eq!(reader.read_line().unwrap().unwrap().line, b"a\rb");
    assert_eq!(reader.read_line().unwrap().unwrap().line, b"c\r");
}

#[test]
fn test_crlf_split_across_window_boundary() {
    let mut reader = BufferedReader::with_capacity(4, Cursor::new(&b"abc\r\ndef"[..]));

    let line = reader.read_line().unwrap().unwrap();
    assert_eq!(line.line, b"abc");
    assert!(line.more);

    // The '\r' was put back and is now seen together with its '\n'.
    let line = reader.read_line().unwrap().unwrap();
    assert_eq!(line.line, b"");
    assert!(!line.more);

    let line = reader.read_line().unwrap().unwrap();
    assert_eq!(line.line, b"def");
    assert!(!line.more);

    assert!(reader.read_line().unwrap().is_none());
}

#[test]
fn test_lines_iterator_joins_fragments() {
    let text = "short\r\na line much longer than the window\nlast";
    for chunk in [1, 2, 5, 100] {
        let reader = BufferedReader::with_capacity(8, Chunked::new(text.as_bytes(), chunk));
        let lines: Vec<String> = reader.lines().collect::<Result<_, _>>().unwrap();
        assert_eq!(
            lines,
            ["short", "a line much longer than the window", "last"],
            "chunk size {chunk}"
        );
    }
}

// ============================================================================
// Delimiter Tests
// ============================================================================

#[test]
fn test_read_slice_includes_delimiter() {
    let mut reader = BufferedReader::new(Chunked::new(b"k=v;k2=v2;", 3));
    assert_eq!(reader.read_slice(b';').unwrap(), Some(&b"k=v;"[..]));
    assert_eq!(reader.read_slice(b';').unwrap(), Some(&b"k2=v2;"[..]));
    assert_eq!(reader.read_slice(b';').unwrap(), None);
}

#[test]
fn test_buffer_full_is_recoverable() {
    let mut reader = BufferedReader::with_capacity(4, Cursor::new(&b"0123456789|x"[..]));
    let mut fragments = Vec::new();
    let tail = loop {
        match reader.read_slice(b'|') {
            Err(BufError::BufferFull { buffered }) => fragments.push(buffered),
            Ok(Some(slice)) => break slice.to_vec(),
            other => panic!("unexpected {other:?}"),
        }
    };
    assert_eq!(fragments, [&b"0123"[..], &b"4567"[..]]);
    assert_eq!(tail, b"89|");
}

#[test]
fn test_read_delimited_string_rejects_multibyte_char() {
    let mut reader = BufferedReader::new(Cursor::new(&b"abc"[..]));
    let err = reader.read_delimited_string('→').unwrap_err();
    assert!(matches!(err, BufError::InvalidDelimiter { .. }));
    assert!(err.is_fatal());
}

// ============================================================================
// Error Propagation Tests
// ============================================================================

#[test]
fn test_source_error_is_propagated() {
    struct Failing;
    impl ByteSource for Failing {
        fn read_bytes(&mut self, _: &mut [u8]) -> io::Result<Option<usize>> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    let mut reader = BufferedReader::new(Failing);
    match reader.read_byte() {
        Err(BufError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn test_config_is_validated_and_clamped() {
    assert!(ReaderConfig::new(2, 10).is_err());

    let config = ReaderConfig::default().with_capacity(1);
    assert!(config.validate().is_err());
    let reader = BufferedReader::with_config(config, io::empty());
    assert_eq!(reader.capacity(), bufrs::config::MIN_BUF_SIZE);
}
