use anyhow::{bail, Context, Result};
use sequitur_core::Sequitur;
use std::env;
use std::fs::File;
use std::io::{BufReader, Read};

/// Streams a file byte-wise through the engine, reports the grammar size,
/// and verifies the reconstruction against a second read of the file.
///
/// Usage: cargo run --example compress <filename>
fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        bail!("usage: {} <filename>", args[0]);
    }
    let filename = &args[1];

    let file = File::open(filename).with_context(|| format!("cannot open {filename:?}"))?;
    let mut seq = Sequitur::new();
    let mut count = 0usize;

    for byte in BufReader::new(file).bytes() {
        let byte = byte.with_context(|| format!("error reading {filename:?}"))?;
        seq.push(byte);
        count += 1;

        if count % 100_000 == 0 {
            println!("{count}");
        }
    }

    let stats = seq.stats();
    println!(
        "{} bytes -> {} grammar symbols in {} rules ({:.1}%)",
        stats.input_len,
        stats.body_symbols,
        stats.rule_count,
        stats.compression_ratio()
    );

    // Re-read the file and compare against the expanded grammar.
    let file = File::open(filename).with_context(|| format!("cannot reopen {filename:?}"))?;
    let mut expanded = seq.iter();
    let mut verified = 0usize;

    for byte in BufReader::new(file).bytes() {
        let from_file = byte.with_context(|| format!("error re-reading {filename:?}"))?;
        match expanded.next() {
            Some(&from_grammar) if from_grammar == from_file => verified += 1,
            Some(&from_grammar) => bail!(
                "mismatch at byte {verified}: file has {from_file:#04x}, grammar has {from_grammar:#04x}"
            ),
            None => bail!("grammar ended early at byte {verified}"),
        }
    }
    if expanded.next().is_some() {
        bail!("grammar yields more than {verified} bytes");
    }

    println!("verified {verified} bytes");
    Ok(())
}
