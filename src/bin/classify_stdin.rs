//! Simple CLI that reads candidate text from stdin and prints its
//! classification as JSON.
//!
//! `--normalize` applies aggressive normalization first, `--restore` also
//! re-inserts flattened line breaks. Set `RUST_LOG=debug` to see which
//! signals fired.

use std::io::{self, Read};

use rs_sheetpeek::classify::markdown::breakdown;
use rs_sheetpeek::normalize::{normalize, restore_line_breaks, Mode};
use rs_sheetpeek::{ContentCategory, ContentClassifier};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output {
    content_type: ContentCategory,
    score: u32,
    signals: Vec<String>,
    text: String,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let restore = args.iter().any(|a| a == "--restore");
    let normalize_first = restore || args.iter().any(|a| a == "--normalize");

    let mut input = String::new();
    if io::stdin().read_to_string(&mut input).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    let mut text = input;
    if restore {
        text = restore_line_breaks(&text);
    }
    if normalize_first {
        text = normalize(&text, Mode::Aggressive);
    }

    let (text, classification) = ContentClassifier::default().prepare(&text);
    let signals = breakdown(&text)
        .into_iter()
        .map(|(name, weight)| format!("{name}+{weight}"))
        .collect::<Vec<_>>();
    log::debug!("signals: {}", signals.join(", "));

    let output = Output {
        content_type: classification.category,
        score: classification.score,
        signals,
        text,
    };
    println!("{}", serde_json::to_string(&output).unwrap_or_default());
}
