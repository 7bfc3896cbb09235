use crate::config::REFINE_CANDIDATES;
use crate::error::Result;
use crate::intersect::{intersect, intersect_weighted};
use crate::rank::{cosine_scores, top_k};
use crate::refine::{refine, Criterion, FieldLookup};
use crate::{DocId, DocumentNorms, IndexBuilder, InvertedIndex, Posting, TermId, Vocabulary, WeightedIndex};
use std::collections::{HashMap, HashSet};

/// Everything built from the corpus that a query needs. Produced once, then only read.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IndexArtifacts {
    pub vocabulary: Vocabulary,
    pub inverted: InvertedIndex,
    pub weighted: WeightedIndex,
    pub norms: DocumentNorms,
}

impl IndexArtifacts {
    /// Build all artifacts from already-normalized documents, given in ascending id order.
    pub fn build<I, T>(docs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (DocId, T)>,
        T: AsRef<[String]>,
    {
        let mut vocabulary = Vocabulary::new();
        let mut builder = IndexBuilder::new();
        for (doc_id, tokens) in docs {
            let mut term_freqs: HashMap<TermId, u32> = HashMap::new();
            for token in tokens.as_ref() {
                *term_freqs.entry(vocabulary.intern(token)).or_insert(0) += 1;
            }
            builder.add_document(doc_id, &term_freqs)?;
        }
        let (inverted, weighted) = builder.finish();
        let norms = DocumentNorms::from_weighted(&weighted);
        Ok(Self { vocabulary, inverted, weighted, norms })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Collapse repeated query terms before intersection and scoring. Off by default:
    /// a repeated term then contributes once per occurrence to both the match score and
    /// the query norm.
    pub dedup_terms: bool,
}

/// Read-only query side of the search engine. Safe to share across threads.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    artifacts: IndexArtifacts,
    options: QueryOptions,
}

impl SearchEngine {
    pub fn new(artifacts: IndexArtifacts, options: QueryOptions) -> Self { Self { artifacts, options } }

    pub fn num_docs(&self) -> u32 { self.artifacts.weighted.num_docs() }

    fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Option<Vec<TermId>> {
        if tokens.is_empty() {
            tracing::debug!("empty query");
            return None;
        }
        let Some(mut terms) = self.artifacts.vocabulary.encode(tokens) else {
            tracing::debug!("query has a term outside the vocabulary");
            return None;
        };
        if self.options.dedup_terms {
            let mut seen = HashSet::new();
            terms.retain(|t| seen.insert(*t));
        }
        Some(terms)
    }

    /// Documents containing every query term, ascending by id.
    pub fn search_and<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<DocId> {
        let Some(terms) = self.encode(tokens) else { return Vec::new() };
        let lists: Option<Vec<&[DocId]>> = terms.iter().map(|t| self.artifacts.inverted.get(*t)).collect();
        match lists {
            Some(lists) => intersect(&lists),
            None => Vec::new(),
        }
    }

    /// The `k` documents containing every query term with the highest cosine similarity.
    pub fn search_ranked<S: AsRef<str>>(&self, tokens: &[S], k: usize) -> Vec<(DocId, f64)> {
        let Some(terms) = self.encode(tokens) else { return Vec::new() };
        let lists: Option<Vec<&[Posting]>> = terms.iter().map(|t| self.artifacts.weighted.get(*t)).collect();
        let Some(lists) = lists else { return Vec::new() };
        let matches = intersect_weighted(&lists);
        let scores = cosine_scores(&matches, &self.artifacts.norms, terms.len());
        tracing::debug!(terms = terms.len(), matches = matches.len(), scored = scores.len(), "ranked query");
        top_k(scores, k)
    }

    /// Cosine-ranked candidates re-scored by field criteria, best three.
    pub fn search_refined<S, L>(&self, tokens: &[S], criteria: &[Criterion], lookup: &L) -> Vec<(DocId, f64)>
    where
        S: AsRef<str>,
        L: FieldLookup + ?Sized,
    {
        let candidates = self.search_ranked(tokens, REFINE_CANDIDATES);
        refine(&candidates, criteria, lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::normalize;

    fn engine(texts: &[&str], options: QueryOptions) -> SearchEngine {
        let docs = texts.iter().enumerate().map(|(i, t)| (i as DocId + 1, normalize(t)));
        SearchEngine::new(IndexArtifacts::build(docs).unwrap(), options)
    }

    #[test]
    fn and_search_requires_every_term() {
        let e = engine(&["the cat sat", "the dog sat", "cat and dog"], QueryOptions::default());
        assert_eq!(e.search_and(&normalize("cat dog")), vec![3]);
        assert_eq!(e.search_and(&normalize("sat")), vec![1, 2]);
        assert_eq!(e.num_docs(), 3);
    }

    #[test]
    fn unknown_or_empty_query_returns_nothing() {
        let e = engine(&["the cat sat", "the dog sat"], QueryOptions::default());
        assert!(e.search_and(&normalize("cat unicorn")).is_empty());
        assert!(e.search_ranked(&normalize("cat unicorn"), 5).is_empty());
        assert!(e.search_and::<String>(&[]).is_empty());
        assert!(e.search_ranked(&normalize("the and of"), 5).is_empty());
    }

    #[test]
    fn ranked_search_prefers_focused_documents() {
        let e = engine(&["whale whale whale ocean", "whale ship captain harpoon crew", "desert sand"], QueryOptions::default());
        let hits = e.search_ranked(&normalize("whale"), 5);
        assert_eq!(hits.iter().map(|h| h.0).collect::<Vec<_>>(), vec![1, 2]);
        assert!(hits[0].1 > hits[1].1);
    }

    #[test]
    fn duplicate_terms_follow_the_dedup_option() {
        let texts = ["whale ocean", "whale ship", "desert sand"];
        let plain = engine(&texts, QueryOptions::default());
        let dedup = engine(&texts, QueryOptions { dedup_terms: true });
        let once = plain.search_ranked(&normalize("whale"), 5);
        let twice = plain.search_ranked(&normalize("whale whale"), 5);
        let collapsed = dedup.search_ranked(&normalize("whale whale"), 5);

        // sum doubles, query norm grows by sqrt(2)
        assert!((twice[0].1 - once[0].1 * 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(collapsed, once);
    }
}
