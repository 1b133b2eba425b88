//! Dump a decoded content stream.
//!
//! Prints the parse tree, the highlighted tokens or the folds of a content
//! stream file, as text or as JSON.
//!
//! Usage:
//!   cargo run --bin dump_content_stream -- page.content
//!   cargo run --bin dump_content_stream -- page.content --tokens
//!   cargo run --bin dump_content_stream -- page.content --folds --json
//!
//! Set `RUST_LOG=debug` for lexer and folding diagnostics.

use bytes::Bytes;
use pdf_content_lexer::editor::{compute_folds, highlight_document};
use pdf_content_lexer::{FoldOptions, HighlightOptions, Lexer, ParseTree, Result, TokenKind};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Tree,
    Tokens,
    Folds,
}

struct DumpConfig {
    path: Option<PathBuf>,
    mode: Mode,
    json: bool,
    all_folds: bool,
}

impl DumpConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut path = None;
        let mut mode = Mode::Tree;
        let mut json = false;
        let mut all_folds = false;

        for arg in args.iter().skip(1) {
            match arg.as_str() {
                "--tree" => mode = Mode::Tree,
                "--tokens" => mode = Mode::Tokens,
                "--folds" => mode = Mode::Folds,
                "--json" => json = true,
                "--all-folds" => all_folds = true,
                other if !other.starts_with("--") => path = Some(PathBuf::from(other)),
                other => eprintln!("Ignoring unknown option {}", other),
            }
        }

        Self {
            path,
            mode,
            json,
            all_folds,
        }
    }
}

/// One leaf token, as written by `--tree --json`.
#[derive(Serialize)]
struct TokenRecord {
    kind: TokenKind,
    depth: usize,
    start: usize,
    len: usize,
    text: String,
}

fn token_records(tree: &ParseTree) -> Vec<TokenRecord> {
    tree.primitives(tree.root())
        .map(|id| TokenRecord {
            kind: tree.kind(id),
            depth: tree.depth(id),
            start: tree.start_offset(id),
            len: tree.length(id),
            text: String::from_utf8_lossy(tree.text(id)).into_owned(),
        })
        .collect()
}

fn run(config: &DumpConfig, path: &Path) -> Result<()> {
    let text = Bytes::from(fs::read(path)?);
    log::debug!("Read {} bytes from {}", text.len(), path.display());

    match config.mode {
        Mode::Tree => {
            let mut lexer = Lexer::new();
            lexer.append(text);
            let tree = lexer.tree();
            if config.json {
                println!("{}", serde_json::to_string_pretty(&token_records(tree))?);
            } else {
                print!("{}", tree.dump(tree.root()));
                if !lexer.continuation().is_normal() {
                    println!("(ends inside {:?})", lexer.continuation());
                }
            }
        },
        Mode::Tokens => {
            let lines = highlight_document(&text, &HighlightOptions::default());
            if config.json {
                println!("{}", serde_json::to_string_pretty(&lines)?);
            } else {
                for (number, line) in lines.iter().enumerate() {
                    for span in &line.spans {
                        let category = span
                            .category
                            .map(|c| format!(" {:?}", c))
                            .unwrap_or_default();
                        println!(
                            "{:>5}:{:<4} {:<20} {:?}{}",
                            number + 1,
                            span.start,
                            span.kind.name(),
                            span.style,
                            category
                        );
                    }
                }
            }
        },
        Mode::Folds => {
            let options = if config.all_folds {
                FoldOptions::all()
            } else {
                FoldOptions::default()
            };
            let folds = compute_folds(&text, &options);
            if config.json {
                println!("{}", serde_json::to_string_pretty(&folds)?);
            } else {
                for fold in &folds {
                    println!(
                        "{:?} lines {}-{} bytes {}..{}",
                        fold.kind,
                        fold.start_line + 1,
                        fold.end_line + 1,
                        fold.start_offset,
                        fold.end_offset
                    );
                }
                println!("{} folds", folds.len());
            }
        },
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let config = DumpConfig::from_args();
    let Some(path) = config.path.clone() else {
        eprintln!(
            "Usage: dump_content_stream <file> [--tree|--tokens|--folds] [--json] [--all-folds]"
        );
        std::process::exit(1);
    };

    if let Err(e) = run(&config, &path) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
