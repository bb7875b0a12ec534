//! Analyze page glyph dumps and optionally fit translations back in.
//!
//! Each page file holds one JSON object `{"width", "height", "chars": [...]}`.
//! Without `--fit` the document layout (paragraphs and font metrics) is
//! printed as JSON. With `--fit` the given translated paragraphs are fitted
//! against the metrics of those pages and printed instead.
//!
//! Usage:
//!   cargo run --release --bin reflow_layout -- page1.json page2.json
//!   cargo run --release --bin reflow_layout -- --config reflow.json \
//!       --fit translated.json page1.json
//!   RUST_LOG=debug cargo run --bin reflow_layout -- --output layout.json page1.json

use pdf_reflow::config::ReflowConfig;
use pdf_reflow::fonts::FontRegistry;
use pdf_reflow::layout::PageInput;
use pdf_reflow::pipeline::{ReflowPipeline, TranslatedParagraph};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

struct CliArgs {
    pages: Vec<PathBuf>,
    config: Option<PathBuf>,
    fit: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl CliArgs {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut parsed = Self {
            pages: Vec::new(),
            config: None,
            fit: None,
            output: None,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" => {
                    i += 1;
                    parsed.config = args.get(i).map(PathBuf::from);
                },
                "--fit" => {
                    i += 1;
                    parsed.fit = args.get(i).map(PathBuf::from);
                },
                "--output" | "-o" => {
                    i += 1;
                    parsed.output = args.get(i).map(PathBuf::from);
                },
                other => parsed.pages.push(PathBuf::from(other)),
            }
            i += 1;
        }

        parsed
    }
}

fn run(args: &CliArgs) -> pdf_reflow::Result<String> {
    let config = match &args.config {
        Some(path) => ReflowConfig::from_file(path)?,
        None => ReflowConfig::default(),
    };
    let pipeline = ReflowPipeline::with_config(config);

    let mut pages = Vec::with_capacity(args.pages.len());
    for path in &args.pages {
        let json = fs::read_to_string(path)?;
        pages.push(PageInput::from_json(&json)?);
    }

    let start = Instant::now();
    let document = pipeline.analyze_document(&pages);
    log::info!("Analyzed {} pages in {:.2?}", pages.len(), start.elapsed());

    let output = match &args.fit {
        Some(path) => {
            let translated: Vec<TranslatedParagraph> =
                serde_json::from_str(&fs::read_to_string(path)?)?;
            let mut registry = FontRegistry::with_translation_defaults();
            let fitted = pipeline.fit_paragraphs(translated, &document.font_metrics, &mut registry);
            serde_json::to_string_pretty(&fitted)?
        },
        None => serde_json::to_string_pretty(&document)?,
    };
    Ok(output)
}

fn main() {
    env_logger::init();

    let args = CliArgs::from_args();
    if args.pages.is_empty() {
        eprintln!("Usage: reflow_layout [--config FILE] [--fit FILE] [--output FILE] PAGE.json...");
        std::process::exit(2);
    }

    let json = match run(&args) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, json) {
                eprintln!("Error writing {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => println!("{}", json),
    }
}
