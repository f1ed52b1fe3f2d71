//! Async delimited stream example.
//!
//! A producer task writes records in small, irregular pieces; the consumer
//! sees whole records as a `Stream`, no matter where the pieces were cut.
//!
//! Run with:
//!     cargo run --example async_stream --features async-io

use bufrs::split_delimited_async;
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio_util::compat::TokioAsyncReadCompatExt;

const DELIMITER: &[u8] = b"\n--\n";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (mut tx, rx) = tokio::io::duplex(64);

    let producer = tokio::spawn(async move {
        let mut payload = Vec::new();
        for i in 0..20 {
            payload.extend_from_slice(format!("message {i}: {}", "-".repeat(i)).as_bytes());
            payload.extend_from_slice(DELIMITER);
        }
        // Irregular piece sizes so delimiters straddle writes
        for (i, piece) in payload.chunks(7).enumerate() {
            tx.write_all(piece).await?;
            if i % 5 == 0 {
                tokio::task::yield_now().await;
            }
        }
        tx.shutdown().await
    });

    let mut stream = split_delimited_async(rx.compat(), DELIMITER)?;
    let mut total = 0;
    while let Some(span) = stream.next().await {
        let span = span?;
        if span.is_empty() {
            continue;
        }
        total += 1;
        println!("Received: {}", String::from_utf8_lossy(&span));
    }

    producer.await??;
    println!("\nTotal: {} messages", total);

    Ok(())
}
