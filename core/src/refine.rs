//! Second-pass re-ranking of a short cosine-ranked list by structured book fields.

use crate::config::{REFINE_BOOST, REFINE_TOP};
use crate::error::{Result, SearchError};
use crate::rank::top_k;
use crate::tokenizer::normalize_joined;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Series,
    Authors,
    PublishingDate,
    Characters,
    Setting,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Title,
        Field::Series,
        Field::Authors,
        Field::PublishingDate,
        Field::Characters,
        Field::Setting,
    ];

    /// Name accepted at the prompt, matching the corpus column header.
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "booktitle",
            Field::Series => "bookseries",
            Field::Authors => "bookauthors",
            Field::PublishingDate => "publishingdate",
            Field::Characters => "characters",
            Field::Setting => "setting",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Field {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s.trim().to_lowercase().chars().filter(|c| *c != '_').collect();
        match key.as_str() {
            "booktitle" | "title" => Ok(Field::Title),
            "bookseries" | "series" => Ok(Field::Series),
            "bookauthors" | "authors" | "author" => Ok(Field::Authors),
            "publishingdate" | "date" => Ok(Field::PublishingDate),
            "characters" => Ok(Field::Characters),
            "setting" => Ok(Field::Setting),
            _ => Err(SearchError::UnknownField(s.trim().to_string())),
        }
    }
}

/// A validated `field:value` refinement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub field: Field,
    pub value: String,
}

impl Criterion {
    pub fn new(field: Field, value: impl Into<String>) -> Self { Self { field, value: value.into() } }

    /// Parse prompt input of the form `field:value`. Only the first `:` separates the two.
    pub fn parse(input: &str) -> Result<Self> {
        let (field, value) = input
            .split_once(':')
            .ok_or_else(|| SearchError::MalformedCriterion(input.to_string()))?;
        let field: Field = field.parse()?;
        let value = value.trim();
        if value.is_empty() {
            return Err(SearchError::MalformedCriterion(input.to_string()));
        }
        Ok(Self::new(field, value))
    }
}

/// Read access to the structured fields of indexed documents.
pub trait FieldLookup {
    /// Raw value of `field` for `doc`, or `None` if the document or field is missing.
    fn field(&self, doc: DocId, field: Field) -> Option<Cow<'_, str>>;
}

/// Boost each candidate's score by [`REFINE_BOOST`] for every criterion whose normalized
/// value is a substring of the candidate's normalized field, then keep the best
/// [`REFINE_TOP`]. Boosts compound in the order the criteria are given.
///
/// Scores are not renormalized afterwards.
pub fn refine<L: FieldLookup + ?Sized>(candidates: &[(DocId, f64)], criteria: &[Criterion], lookup: &L) -> Vec<(DocId, f64)> {
    let needles: Vec<(Field, String)> = criteria
        .iter()
        .map(|c| (c.field, normalize_joined(&c.value)))
        .filter(|(_, needle)| !needle.is_empty())
        .collect();

    let rescored = candidates.iter().map(|&(doc, score)| {
        let mut total = score;
        for (field, needle) in &needles {
            let matched = lookup
                .field(doc, *field)
                .map(|value| normalize_joined(&value).contains(needle.as_str()))
                .unwrap_or(false);
            if matched {
                total *= REFINE_BOOST;
            }
        }
        (doc, total)
    });
    top_k(rescored, REFINE_TOP)
}
