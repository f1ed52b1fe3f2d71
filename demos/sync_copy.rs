//! Buffered copy example.
//!
//! Copies records through a `BufferedWriter`, splitting the input on a
//! multi-byte delimiter and re-joining it with another.
//!
//! Run with:
//!     cargo run --example sync_copy

use bufrs::{BufferedWriter, GrowableBuffer, WriterConfig, split_delimited};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Build the input in a growable buffer
    let mut input = GrowableBuffer::new();
    for i in 0..1_000 {
        input.write_from(format!("record-{i}:{}", "x".repeat(i % 50)).as_bytes())?;
        input.write_from(b"\r\n\r\n")?;
    }
    println!("Input: {} bytes\n", input.len());

    let config = WriterConfig::new(4 * 1024)?;
    let mut writer = BufferedWriter::with_config(config, Vec::new());

    let mut records = 0;
    for span in split_delimited(input, b"\r\n\r\n")? {
        let span = span?;
        if span.is_empty() {
            continue;
        }
        writer.write(&span)?;
        writer.write(b"\n")?;
        records += 1;
    }
    writer.flush()?;

    let output = writer.into_inner();
    println!("Copied {} records, {} bytes out", records, output.len());
    println!(
        "First record: {}",
        String::from_utf8_lossy(output.split(|&b| b == b'\n').next().unwrap_or_default())
    );

    Ok(())
}
