//! Async file copy on tokio.
//!
//! Demonstrates driving the runtime-agnostic async reader and writer from
//! tokio through the `tokio_util::compat` adapters.
//!
//! Run with:
//!     cargo run --example async_tokio --features async-io -- /path/to/file

use std::env;

use bufrs::{AsyncBufferedReader, AsyncBufferedWriter};
use tokio::fs::File;
use tokio_util::compat::{TokioAsyncReadCompatExt, TokioAsyncWriteCompatExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());
    let target = env::temp_dir().join("bufrs_async_tokio.txt");

    println!("Numbering lines of {} into {}\n", path, target.display());

    let source = File::open(&path).await?;
    let sink = File::create(&target).await?;

    let mut reader = AsyncBufferedReader::new(source.compat());
    let mut writer = AsyncBufferedWriter::with_capacity(8 * 1024, sink.compat_write());

    let mut line_no = 0;
    while let Some(line) = reader.read_delimited_string('\n').await? {
        line_no += 1;
        let numbered = format!("{:>5} | {}", line_no, line);
        writer.write(numbered.as_bytes()).await?;
    }
    writer.close().await?;

    println!("Wrote {} lines", line_no);

    Ok(())
}
