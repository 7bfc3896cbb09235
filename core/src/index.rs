use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type TermId = u32;
pub type DocId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f64, // tf * idf
}

/// Term id -> ascending, duplicate-free document ids.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: HashMap<TermId, Vec<DocId>>,
}

impl InvertedIndex {
    pub fn get(&self, term: TermId) -> Option<&[DocId]> { self.postings.get(&term).map(Vec::as_slice) }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, &[DocId])> {
        self.postings.iter().map(|(t, p)| (*t, p.as_slice()))
    }
}

/// Term id -> postings carrying the tf-idf weight, ascending by document id.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedIndex {
    postings: HashMap<TermId, Vec<Posting>>,
    num_docs: u32,
}

impl WeightedIndex {
    pub fn get(&self, term: TermId) -> Option<&[Posting]> { self.postings.get(&term).map(Vec::as_slice) }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn num_docs(&self) -> u32 { self.num_docs }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, &[Posting])> {
        self.postings.iter().map(|(t, p)| (*t, p.as_slice()))
    }
}

/// ln(N / df). Zero when the term occurs in every document.
pub fn idf(num_docs: u32, df: usize) -> f64 {
    if df == 0 {
        return 0.0;
    }
    (num_docs as f64 / df as f64).ln()
}

/// One-shot builder for the plain and weighted indexes.
///
/// Documents must arrive in strictly ascending id order: postings are only ever
/// appended, so that order is what keeps every list sorted without a sort pass.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    plain: HashMap<TermId, Vec<DocId>>,
    raw: HashMap<TermId, Vec<(DocId, u32)>>,
    num_docs: u32,
    last_doc: Option<DocId>,
}

impl IndexBuilder {
    pub fn new() -> Self { Self::default() }

    /// Add one document's raw term frequencies. A document without terms still counts
    /// toward the corpus size used by IDF.
    pub fn add_document(&mut self, doc_id: DocId, term_freqs: &HashMap<TermId, u32>) -> Result<()> {
        if let Some(previous) = self.last_doc {
            if doc_id <= previous {
                return Err(SearchError::UnsortedDocument { doc_id, previous });
            }
        }
        self.last_doc = Some(doc_id);
        self.num_docs += 1;

        for (&term, &tf) in term_freqs {
            if tf == 0 {
                continue;
            }
            self.plain.entry(term).or_default().push(doc_id);
            self.raw.entry(term).or_default().push((doc_id, tf));
        }
        Ok(())
    }

    pub fn num_docs(&self) -> u32 { self.num_docs }

    /// Replace raw frequencies with tf * idf. IDF is taken from the final posting length,
    /// which is only known once every document has been added.
    pub fn finish(self) -> (InvertedIndex, WeightedIndex) {
        let num_docs = self.num_docs;
        let postings = self
            .raw
            .into_iter()
            .map(|(term, plist)| {
                let idf = idf(num_docs, plist.len());
                let weighted = plist
                    .into_iter()
                    .map(|(doc_id, tf)| Posting { doc_id, weight: tf as f64 * idf })
                    .collect();
                (term, weighted)
            })
            .collect();
        tracing::info!(num_docs, num_terms = self.plain.len(), "built inverted indexes");
        (InvertedIndex { postings: self.plain }, WeightedIndex { postings, num_docs })
    }
}
