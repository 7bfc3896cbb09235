use crate::{DocId, WeightedIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-document sum of squared tf-idf weights over all of the document's terms,
/// i.e. the squared L2 norm of its vector.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNorms {
    squared: HashMap<DocId, f64>,
}

impl DocumentNorms {
    pub fn from_weighted(index: &WeightedIndex) -> Self {
        let mut squared: HashMap<DocId, f64> = HashMap::new();
        for (_, postings) in index.iter() {
            for p in postings {
                *squared.entry(p.doc_id).or_insert(0.0) += p.weight * p.weight;
            }
        }
        squared.retain(|_, sum| *sum > 0.0);
        Self { squared }
    }

    /// Squared norm of `doc`; 0.0 for documents with no nonzero weight.
    pub fn get(&self, doc: DocId) -> f64 { self.squared.get(&doc).copied().unwrap_or(0.0) }

    pub fn len(&self) -> usize { self.squared.len() }

    pub fn is_empty(&self) -> bool { self.squared.is_empty() }
}
