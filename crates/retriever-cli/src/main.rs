//! Interactive shell collaborator for the retriever engine (spec §6 CLI
//! surface): loads a corpus, builds an index, then reads query lines from
//! stdin, optionally prefixed with `-p[N]` (phonetic correction, N rounds)
//! or `-s[N]` (spelling correction, N rounds).

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use retriever_core::{build_index, retrieve, Corrector, CorrectorConfig, CorrectorMode, Document, DocumentIdCounter};
use retriever_tokenizer::NormalizerConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Boolean information-retrieval shell", long_about = None)]
struct Args {
    /// Path to a corpus file: a JSON array of {title, content, language}.
    corpus: PathBuf,
}

#[derive(serde::Deserialize)]
struct RawDocument {
    title: String,
    content: String,
    #[serde(default = "default_language")]
    language: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let raw = fs::read_to_string(&args.corpus)?;
    let entries: Vec<RawDocument> = serde_json::from_str(&raw)?;

    let mut counter = DocumentIdCounter::new();
    let mut documents = Vec::with_capacity(entries.len());
    for entry in entries {
        let id = counter.next_id()?;
        documents.push(Document::new(id, entry.title, entry.content, entry.language));
    }

    let config = NormalizerConfig::default();
    let progress = |processed: usize, total: usize| {
        log::debug!("indexed {processed}/{total} documents");
    };
    let index = build_index(&documents, &config, Some(&progress))?;
    log::info!("indexed {} documents", index.document_count());

    let stdin = io::stdin();
    print!("> ");
    io::stdout().flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            print!("> ");
            io::stdout().flush()?;
            continue;
        }

        for query in corrected_queries(line, &index) {
            let docs = retrieve(&query, &index, &config);
            println!("{} result(s) for {query:?}:", docs.len());
            for doc in &docs {
                println!("  [{}] {}", doc.id, doc.title);
            }
        }

        print!("> ");
        io::stdout().flush()?;
    }

    Ok(())
}

/// Splits a `-p[N]`/`-s[N]`-prefixed line into its correction mode, round
/// count, and query text, then drives [`Corrector`] for that many rounds,
/// rendering each candidate phrase back into a query string. A line with
/// no prefix is returned unchanged as a single-element list.
fn corrected_queries(line: &str, index: &retriever_core::InvertedIndex) -> Vec<String> {
    let Some((mode, rounds, rest)) = parse_prefix(line) else {
        return vec![line.to_string()];
    };

    let words: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
    if words.is_empty() {
        return Vec::new();
    }

    let corrector_config = CorrectorConfig { suffix_length: 2, mode };
    let mut corrector = Corrector::new(index, words.clone(), corrector_config);

    let mut queries = Vec::new();
    for _ in 0..rounds {
        let batch = corrector.next_batch();
        if batch.is_empty() {
            break;
        }
        for phrase in batch {
            queries.push(phrase.join(" & "));
        }
    }

    if queries.is_empty() {
        queries.push(words.join(" & "));
    }
    queries
}

/// Parses a leading `-p`, `-p3`, `-s`, or `-s2`-style prefix, defaulting
/// to one round when no number follows the letter.
fn parse_prefix(line: &str) -> Option<(CorrectorMode, u32, &str)> {
    let rest = line.strip_prefix('-')?;
    let (letter, rest) = rest.split_at(1);
    let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let (digits, rest) = rest.split_at(digits_end);
    let rounds = digits.parse().unwrap_or(1).max(1);

    let mode = match letter {
        "p" => CorrectorMode::Phonetic { ignore_edit_distance: false },
        "s" => CorrectorMode::EditDistance,
        _ => return None,
    };
    Some((mode, rounds, rest.trim_start()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_phonetic_prefix_with_round_count() {
        let (mode, rounds, rest) = parse_prefix("-p2 space jem").unwrap();
        assert!(matches!(mode, CorrectorMode::Phonetic { ignore_edit_distance: false }));
        assert_eq!(rounds, 2);
        assert_eq!(rest, "space jem");
    }

    #[test]
    fn parses_spelling_prefix_defaulting_to_one_round() {
        let (mode, rounds, rest) = parse_prefix("-s spade jam").unwrap();
        assert!(matches!(mode, CorrectorMode::EditDistance));
        assert_eq!(rounds, 1);
        assert_eq!(rest, "spade jam");
    }

    #[test]
    fn plain_queries_have_no_prefix() {
        assert!(parse_prefix("space & jam").is_none());
    }
}
