use crate::{DocId, DocumentNorms};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Cosine similarity between the query and each matched document.
///
/// `matches` holds, per document, the sum of its weights for the query terms. Every query
/// term weighs 1.0 in the query vector, so the query norm is `sqrt(query_len)`. Documents
/// with a zero norm have no defined similarity and are left out.
pub fn cosine_scores(matches: &[(DocId, f64)], norms: &DocumentNorms, query_len: usize) -> HashMap<DocId, f64> {
    if query_len == 0 {
        return HashMap::new();
    }
    let query_norm = (query_len as f64).sqrt();
    matches
        .iter()
        .filter_map(|&(doc, score)| {
            let squared = norms.get(doc);
            if squared > 0.0 {
                Some((doc, score / (squared.sqrt() * query_norm)))
            } else {
                None
            }
        })
        .collect()
}

/// The `k` highest-scoring documents, best first.
///
/// Keeps a min-heap of at most `k` entries, O(n log k). Equal scores are ordered by
/// ascending document id, so the output is fully deterministic.
pub fn top_k<I>(scores: I, k: usize) -> Vec<(DocId, f64)>
where
    I: IntoIterator<Item = (DocId, f64)>,
{
    if k == 0 {
        return Vec::new();
    }
    // Greater key = better rank: higher score first, then lower doc id.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, Reverse<DocId>)>> = BinaryHeap::with_capacity(k + 1);
    for (doc, score) in scores {
        heap.push(Reverse((OrderedFloat(score), Reverse(doc))));
        if heap.len() > k {
            heap.pop();
        }
    }
    // Ascending order of Reverse(key) is descending order of key.
    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse((score, Reverse(doc)))| (doc, score.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IndexBuilder;

    #[test]
    fn top_k_orders_descending() {
        let scores = vec![(1, 0.2), (2, 0.9), (3, 0.5), (4, 0.7)];
        assert_eq!(top_k(scores, 2), vec![(2, 0.9), (4, 0.7)]);
    }

    #[test]
    fn top_k_ties_break_on_ascending_doc_id() {
        let scores = vec![(9, 1.0), (3, 1.0), (5, 2.0), (1, 1.0)];
        assert_eq!(top_k(scores.clone(), 3), vec![(5, 2.0), (1, 1.0), (3, 1.0)]);
        assert_eq!(top_k(scores, 10), vec![(5, 2.0), (1, 1.0), (3, 1.0), (9, 1.0)]);
    }

    #[test]
    fn top_k_zero_and_empty() {
        assert!(top_k(vec![(1, 1.0)], 0).is_empty());
        assert!(top_k(Vec::new(), 5).is_empty());
    }

    #[test]
    fn cosine_of_single_term_document_is_one() {
        let mut b = IndexBuilder::new();
        b.add_document(0, &[(0, 3)].into_iter().collect()).unwrap();
        b.add_document(1, &[(1, 1)].into_iter().collect()).unwrap();
        let (_, weighted) = b.finish();
        let norms = DocumentNorms::from_weighted(&weighted);
        let w = weighted.get(0).unwrap()[0].weight;

        let scores = cosine_scores(&[(0, w)], &norms, 1);
        assert!((scores[&0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_norm_documents_are_excluded() {
        let norms = DocumentNorms::default();
        assert!(cosine_scores(&[(0, 0.0), (1, 0.0)], &norms, 2).is_empty());
    }

    #[test]
    fn empty_query_scores_nothing() {
        let mut b = IndexBuilder::new();
        b.add_document(0, &[(0, 1)].into_iter().collect()).unwrap();
        b.add_document(1, &[(1, 1)].into_iter().collect()).unwrap();
        let (_, weighted) = b.finish();
        let norms = DocumentNorms::from_weighted(&weighted);
        assert!(cosine_scores(&[(0, 1.0)], &norms, 0).is_empty());
    }
}
