#![no_main]

use bufrs::{DelimiterSplitter, split_delimited};
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Vec<u8>, Vec<u8>, u8)| {
    let (data, delimiter, step) = input;
    let delimiter = &delimiter[..delimiter.len().min(8)];
    if delimiter.is_empty() {
        assert!(DelimiterSplitter::new(delimiter).is_err());
        return;
    }

    // Reference: the whole input in one read
    let whole: Vec<Bytes> = split_delimited(&data[..], delimiter)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    // Verify: spans plus delimiters rebuild the input
    let mut rebuilt = Vec::with_capacity(data.len());
    for (i, span) in whole.iter().enumerate() {
        if i > 0 {
            rebuilt.extend_from_slice(delimiter);
        }
        rebuilt.extend_from_slice(span);
    }
    assert_eq!(rebuilt, data);

    // Verify: feeding in arbitrary pieces gives the same spans
    let step = usize::from(step).max(1);
    let mut splitter = DelimiterSplitter::new(delimiter).unwrap();
    let mut pieces = Vec::new();
    for piece in data.chunks(step) {
        splitter.feed(piece);
        while let Some(span) = splitter.next_span() {
            pieces.push(span);
        }
    }
    pieces.push(splitter.finish());
    assert_eq!(pieces, whole);
});
