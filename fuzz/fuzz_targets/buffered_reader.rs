#![no_main]

use std::io::{self, Cursor};

use bufrs::{BufError, BufferedReader, ByteSource};
use libfuzzer_sys::fuzz_target;

/// Hands out at most `step` bytes per read.
struct Trickle<'a> {
    data: &'a [u8],
    step: usize,
}

impl ByteSource for Trickle<'_> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        if self.data.is_empty() {
            return Ok(None);
        }
        let n = self.step.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(Some(n))
    }
}

fuzz_target!(|input: (Vec<u8>, u8, u8)| {
    let (data, capacity, step) = input;
    let step = usize::from(step).max(1);

    // Verify: line fragments joined back equal the input minus terminators
    let mut reader = BufferedReader::with_capacity(capacity.into(), Trickle { data: &data, step });
    let mut lines = Vec::new();
    let mut current = Vec::new();
    while let Some(line) = reader.read_line().unwrap() {
        current.extend_from_slice(line.line);
        if !line.more {
            lines.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    let expected: Vec<Vec<u8>> = {
        let mut reference = BufferedReader::new(Cursor::new(&data));
        let mut out = Vec::new();
        while let Some(line) = reference.read_line().unwrap() {
            out.push(line.line.to_vec());
        }
        out
    };
    if data.len() < 4096 {
        assert_eq!(lines, expected);
    }

    // Verify: byte reads and exact reads see the same stream
    let mut reader = BufferedReader::with_capacity(capacity.into(), Trickle { data: &data, step });
    let mut seen = Vec::new();
    let mut dest = [0u8; 7];
    loop {
        match reader.read_exact(&mut dest) {
            Ok(Some(())) => seen.extend_from_slice(&dest),
            Ok(None) => break,
            Err(BufError::PartialRead { partial }) => {
                seen.extend_from_slice(&partial);
                break;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
        if let Some(b) = reader.read_byte().unwrap() {
            seen.push(b);
        }
    }
    assert_eq!(seen, data);
});
