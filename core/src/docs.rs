use crate::refine::{Field, FieldLookup};
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// Stored metadata for one book. Only `plot` is indexed; the optional fields feed
/// refinement and display.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub external_id: String,
    pub title: String,
    pub plot: String,
    pub url: Option<String>,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub publishing_date: Option<String>,
    #[serde(default)]
    pub characters: Option<String>,
    #[serde(default)]
    pub setting: Option<String>,
}

impl BookRecord {
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => Some(self.title.as_str()),
            Field::Series => self.series.as_deref(),
            Field::Authors => self.authors.as_deref(),
            Field::PublishingDate => self.publishing_date.as_deref(),
            Field::Characters => self.characters.as_deref(),
            Field::Setting => self.setting.as_deref(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocStore {
    records: HashMap<DocId, BookRecord>,
}

impl DocStore {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, doc: DocId, record: BookRecord) { self.records.insert(doc, record); }

    pub fn get(&self, doc: DocId) -> Option<&BookRecord> { self.records.get(&doc) }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }
}

impl FieldLookup for DocStore {
    fn field(&self, doc: DocId, field: Field) -> Option<Cow<'_, str>> {
        self.get(doc)?.field(field).map(Cow::Borrowed)
    }
}
