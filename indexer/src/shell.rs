use anyhow::Result;
use search_core::config::REFINE_TOP;
use search_core::persist::{load_all, IndexPaths};
use search_core::tokenizer::normalize;
use search_core::{Criterion, DocId, DocStore, Field, QueryOptions, SearchEngine};

use std::io::{self, BufRead, Write};

const RULE: &str = "----------------------------------------------------------------------------------------------";

/// Interactive loop over a persisted index. Loading fails before the first prompt if any
/// artifact is missing.
pub fn run(index: &str, k: usize, options: QueryOptions) -> Result<()> {
    let (artifacts, docs, meta) = load_all(&IndexPaths::new(index))?;
    let engine = SearchEngine::new(artifacts, options);
    tracing::info!(num_docs = engine.num_docs(), created_at = %meta.created_at, "index ready");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        prompt("enter your query (:q to quit):")?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let query = line.trim();
        if query == ":q" {
            break;
        }
        let tokens = normalize(query);

        println!("\n== documents containing every term ==");
        print_books(&docs, engine.search_and(&tokens).into_iter().map(|d| (d, None)));

        println!("\n== top {k} by cosine similarity ==");
        print_books(&docs, engine.search_ranked(&tokens, k).into_iter().map(|(d, s)| (d, Some(s))));

        let criteria = read_criteria(&mut lines)?;
        println!("\n== top {REFINE_TOP} re-ranked by additional info ==");
        let refined = engine.search_refined(&tokens, &criteria, &docs);
        print_books(&docs, refined.into_iter().map(|(d, s)| (d, Some(s))));
    }
    Ok(())
}

fn prompt(text: &str) -> io::Result<()> {
    println!("{text}");
    io::stdout().flush()
}

/// Collect `field:value` lines until `end` (or end of input). Invalid lines are reported
/// and re-prompted without affecting what was already accepted.
fn read_criteria<B: BufRead>(lines: &mut io::Lines<B>) -> Result<Vec<Criterion>> {
    let fields: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
    let mut criteria = Vec::new();
    loop {
        prompt(&format!(
            "please insert additional info as field:value ({}), type \"end\" when you are done",
            fields.join(", ")
        ))?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();
        if input.eq_ignore_ascii_case("end") {
            break;
        }
        match Criterion::parse(input) {
            Ok(c) => criteria.push(c),
            Err(e) => println!("{e}, please try again"),
        }
    }
    Ok(criteria)
}

fn print_books<I>(docs: &DocStore, hits: I)
where
    I: IntoIterator<Item = (DocId, Option<f64>)>,
{
    let mut any = false;
    for (doc, score) in hits {
        let Some(book) = docs.get(doc) else {
            tracing::warn!(doc, "result has no stored record");
            continue;
        };
        any = true;
        println!();
        println!("--BOOKTITLE--\n{}\n", book.title);
        println!("--PLOT--\n{}\n", book.plot);
        println!("--URL--\n{}\n", book.url.as_deref().unwrap_or("-"));
        if let Some(score) = score {
            println!("--SIMILARITY--\n{score:.2}\n");
        }
        println!("{RULE}");
    }
    if !any {
        println!("no results");
    }
}
