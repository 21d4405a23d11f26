use gfdata::{encoding, rows, ReadOptions};
use std::env;
use std::io::ErrorKind;
use std::path::Path;

const PREVIEW_ROWS: usize = 20;
const PREVIEW_FIELDS: usize = 10;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 4 {
        eprintln!("Usage: {} <path-to-data-file> [encoding] [width]", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    let mut options = ReadOptions::default();

    if let Some(label) = args.get(2) {
        match encoding::encoding_for_label(label) {
            Some(enc) => options = options.with_encoding(enc),
            None => {
                eprintln!("ERROR: Unknown encoding label: {}", label);
                std::process::exit(1);
            }
        }
    }
    if let Some(width) = args.get(3) {
        match width.parse::<usize>() {
            Ok(w) if w > 0 => options = options.with_width(w),
            _ => {
                eprintln!("ERROR: Width must be a positive integer, got {}", width);
                std::process::exit(1);
            }
        }
    }

    if !path.exists() {
        eprintln!("ERROR: File not found: {}", path.display());
        std::process::exit(2);
    }

    println!("Reading data file: {}", path.display());
    match options.width {
        Some(w) => println!("Mode: records, width {}", w),
        None => println!("Mode: naive (one row per line)"),
    }
    println!("{}", "=".repeat(60));

    match rows::read_detailed(path, &options) {
        Ok(row_set) => {
            println!("Encoding: {}", row_set.encoding.name());
            println!("Rows: {}", row_set.rows.len());
            let truncated = row_set.truncated().count();
            if !row_set.adjustments.is_empty() {
                println!(
                    "Width adjustments: {} ({} truncated)",
                    row_set.adjustments.len(),
                    truncated
                );
            }

            println!("\nFirst rows (up to {} fields each):", PREVIEW_FIELDS);
            for (i, row) in row_set.rows.iter().take(PREVIEW_ROWS).enumerate() {
                let fields: Vec<&str> = row
                    .iter()
                    .take(PREVIEW_FIELDS)
                    .map(|f| f.as_str())
                    .collect();
                println!("  {}. {}", i + 1, fields.join(" | ").replace('\n', "\\n"));
            }

            if row_set.rows.len() > PREVIEW_ROWS {
                println!("  ... and {} more", row_set.rows.len() - PREVIEW_ROWS);
            }
        }
        Err(gfdata::GfError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            eprintln!("ERROR: File not found: {}", path.display());
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("\nERROR: Failed to read data file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
