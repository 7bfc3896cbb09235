use anyhow::{bail, Context, Result};
use search_core::BookRecord;
use serde::Deserialize;
use walkdir::WalkDir;

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    #[serde(default)]
    id: String,
    title: String,
    #[serde(alias = "body")]
    plot: String,
    url: Option<String>,
    #[serde(default)]
    series: Option<String>,
    #[serde(default)]
    authors: Option<String>,
    #[serde(default)]
    publishing_date: Option<String>,
    #[serde(default)]
    characters: Option<String>,
    #[serde(default)]
    setting: Option<String>,
}

impl From<InputDoc> for BookRecord {
    fn from(doc: InputDoc) -> Self {
        BookRecord {
            external_id: doc.id,
            title: doc.title,
            plot: doc.plot,
            url: doc.url,
            series: doc.series,
            authors: doc.authors,
            publishing_date: doc.publishing_date,
            characters: doc.characters,
            setting: doc.setting,
        }
    }
}

/// Every supported file under `input`, in path order so document ids are reproducible.
fn corpus_files(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        bail!("input path {} does not exist", input.display());
    }
    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file())
        .filter(|p| matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl" | "tsv")))
        .collect();
    files.sort();
    Ok(files)
}

/// Read all book records in ingestion order. Position in the result becomes the doc id.
pub fn read_corpus(input: &Path) -> Result<Vec<BookRecord>> {
    let mut records = Vec::new();
    for file in corpus_files(input)? {
        let before = records.len();
        let read = match file.extension().and_then(|s| s.to_str()) {
            Some("jsonl") => read_jsonl(&file, &mut records),
            Some("tsv") => read_tsv(&file, &mut records),
            _ => read_json(&file, &mut records),
        };
        read.with_context(|| format!("reading {}", file.display()))?;
        tracing::debug!(file = %file.display(), added = records.len() - before, "read corpus file");
    }
    for (i, record) in records.iter_mut().enumerate() {
        if record.external_id.is_empty() {
            record.external_id = i.to_string();
        }
    }
    Ok(records)
}

fn read_jsonl(file: &Path, records: &mut Vec<BookRecord>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)?;
        records.push(doc.into());
    }
    Ok(())
}

fn read_json(file: &Path, records: &mut Vec<BookRecord>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                let doc: InputDoc = serde_json::from_value(v)?;
                records.push(doc.into());
            }
        }
        serde_json::Value::Object(_) => {
            let doc: InputDoc = serde_json::from_value(json)?;
            records.push(doc.into());
        }
        other => bail!("expected a book object or an array of books, found {other}"),
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Title,
    Series,
    Authors,
    Plot,
    PublishingDate,
    Characters,
    Setting,
    Url,
}

fn column_for(header: &str) -> Option<Column> {
    let key: String = header
        .chars()
        .filter(|c| !matches!(c, '_' | ' ' | '-'))
        .collect::<String>()
        .to_lowercase();
    match key.as_str() {
        "booktitle" | "title" => Some(Column::Title),
        "bookseries" | "series" => Some(Column::Series),
        "bookauthors" | "authors" => Some(Column::Authors),
        "plot" => Some(Column::Plot),
        "publishingdate" | "date" => Some(Column::PublishingDate),
        "characters" => Some(Column::Characters),
        "setting" => Some(Column::Setting),
        "url" => Some(Column::Url),
        _ => None,
    }
}

/// Tab-separated books: one header row naming the columns, then one book per row.
/// Unrecognized columns are ignored.
fn read_tsv(file: &Path, records: &mut Vec<BookRecord>) -> Result<()> {
    let text = fs::read_to_string(file)?;
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let Some(header) = lines.next() else { return Ok(()) };
    let columns: Vec<Option<Column>> = header.split('\t').map(column_for).collect();
    if !columns.contains(&Some(Column::Plot)) {
        bail!("TSV header has no plot column");
    }

    for line in lines {
        let mut record = BookRecord::default();
        for (column, value) in columns.iter().zip(line.split('\t')) {
            let value = value.trim();
            let opt = (!value.is_empty()).then(|| value.to_string());
            match column {
                Some(Column::Title) => record.title = value.to_string(),
                Some(Column::Plot) => record.plot = value.to_string(),
                Some(Column::Series) => record.series = opt,
                Some(Column::Authors) => record.authors = opt,
                Some(Column::PublishingDate) => record.publishing_date = opt,
                Some(Column::Characters) => record.characters = opt,
                Some(Column::Setting) => record.setting = opt,
                Some(Column::Url) => record.url = opt,
                None => {}
            }
        }
        records.push(record);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_mixed_directory_in_path_order() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("a.jsonl"),
            "{\"id\":\"h\",\"title\":\"The Hobbit\",\"plot\":\"A hobbit and a dragon.\",\"authors\":\"Tolkien\"}\n\n\
             {\"title\":\"Eragon\",\"body\":\"A boy finds a dragon egg.\",\"url\":\"https://example.org/eragon\"}\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("b.tsv"),
            "bookTitle\tbookAuthors\tPlot\tsetting\tUrl\n\
             Moby-Dick\tHerman Melville\tA captain hunts a whale.\tNantucket\thttps://example.org/moby\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let records = read_corpus(dir.path()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].external_id, "h");
        assert_eq!(records[0].authors.as_deref(), Some("Tolkien"));
        assert_eq!(records[1].plot, "A boy finds a dragon egg.");
        assert_eq!(records[1].external_id, "1");
        assert_eq!(records[2].title, "Moby-Dick");
        assert_eq!(records[2].setting.as_deref(), Some("Nantucket"));
        assert_eq!(records[2].series, None);
    }

    #[test]
    fn json_scalar_is_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("scalar.json");
        fs::write(&file, "42").unwrap();
        let err = read_corpus(&file).unwrap_err();
        assert!(format!("{err:#}").contains("found 42"));
    }

    #[test]
    fn tsv_without_plot_column_is_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("bad.tsv");
        fs::write(&file, "bookTitle\tUrl\nX\thttps://example.org\n").unwrap();
        assert!(read_corpus(&file).is_err());
    }
}
