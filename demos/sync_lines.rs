//! Line reading example.
//!
//! Run with:
//!     cargo run --example sync_lines -- /path/to/file

use std::env;
use std::fs::File;

use bufrs::{BufferedReader, ReaderConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    println!("Reading lines from: {}\n", path);

    // A small window makes long lines arrive in fragments
    let config = ReaderConfig::new(64, 100)?;
    let mut reader = BufferedReader::with_config(config, File::open(&path)?);

    let mut line_no = 1;
    let mut fragments = 0;
    let mut longest = 0;
    let mut current = 0;

    while let Some(line) = reader.read_line()? {
        current += line.line.len();
        if line.more {
            fragments += 1;
            continue;
        }
        if current > 0 {
            println!("{:>4}: {} bytes", line_no, current);
        }
        longest = longest.max(current);
        current = 0;
        line_no += 1;
    }

    println!("\nTotal: {} lines, {} extra fragments", line_no - 1, fragments);
    println!("Longest line: {} bytes", longest);

    // The iterator form joins fragments for you
    let words: usize = BufferedReader::new(File::open(&path)?)
        .lines()
        .map(|line| line.map(|l| l.split_whitespace().count()))
        .sum::<Result<usize, _>>()?;
    println!("Words: {}", words);

    Ok(())
}
