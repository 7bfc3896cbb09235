//! AND-intersection of posting lists by synchronized multi-cursor merge.
//!
//! Every input list must be ascending by document id with no duplicates. That holds
//! for anything produced by [`crate::IndexBuilder`]; nothing here re-checks it, and an
//! unsorted list yields missed or phantom matches rather than an error.

use crate::{DocId, Posting};

/// Walk one cursor per list. When all cursors sit on the same document, report it
/// together with the cursor positions and step every cursor; otherwise step only the
/// cursors behind the current maximum. Stops as soon as any list is exhausted.
fn merge_join<T, K, F>(lists: &[&[T]], key: K, mut on_match: F)
where
    K: Fn(&T) -> DocId,
    F: FnMut(DocId, &[usize]),
{
    if lists.is_empty() {
        return;
    }
    let mut cursors = vec![0usize; lists.len()];
    let mut heads: Vec<DocId> = Vec::with_capacity(lists.len());
    while lists.iter().zip(&cursors).all(|(list, &c)| c < list.len()) {
        heads.clear();
        heads.extend(lists.iter().zip(&cursors).map(|(list, &c)| key(&list[c])));
        let max = heads.iter().copied().max().unwrap_or_default();
        if heads.iter().all(|&doc| doc == max) {
            on_match(max, &cursors);
            cursors.iter_mut().for_each(|c| *c += 1);
        } else {
            for (c, &doc) in cursors.iter_mut().zip(&heads) {
                if doc < max {
                    *c += 1;
                }
            }
        }
    }
}

/// Documents present in every list, ascending.
pub fn intersect(lists: &[&[DocId]]) -> Vec<DocId> {
    let mut out = Vec::new();
    merge_join(lists, |doc| *doc, |doc, _| out.push(doc));
    out
}

/// Documents present in every list, each with the sum of its per-list weights.
pub fn intersect_weighted(lists: &[&[Posting]]) -> Vec<(DocId, f64)> {
    let mut out = Vec::new();
    merge_join(lists, |p| p.doc_id, |doc, cursors| {
        let score: f64 = lists.iter().zip(cursors).map(|(list, &c)| list[c].weight).sum();
        out.push((doc, score));
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postings(pairs: &[(DocId, f64)]) -> Vec<Posting> {
        pairs.iter().map(|&(doc_id, weight)| Posting { doc_id, weight }).collect()
    }

    #[test]
    fn intersects_three_lists() {
        let a: Vec<DocId> = vec![1, 3, 5, 7, 9];
        let b: Vec<DocId> = vec![2, 3, 4, 7, 9, 11];
        let c: Vec<DocId> = vec![3, 7, 8, 9];
        assert_eq!(intersect(&[&a[..], &b[..], &c[..]]), vec![3, 7, 9]);
    }

    #[test]
    fn single_list_is_returned_as_is() {
        let a: Vec<DocId> = vec![0, 4, 8];
        assert_eq!(intersect(&[&a[..]]), vec![0, 4, 8]);
    }

    #[test]
    fn no_lists_or_an_empty_list_gives_nothing() {
        assert!(intersect(&[]).is_empty());
        let a: Vec<DocId> = vec![1, 2, 3];
        let empty: Vec<DocId> = Vec::new();
        assert!(intersect(&[&a[..], &empty[..]]).is_empty());
    }

    #[test]
    fn disjoint_lists() {
        let a: Vec<DocId> = vec![1, 3, 5];
        let b: Vec<DocId> = vec![2, 4, 6];
        assert!(intersect(&[&a[..], &b[..]]).is_empty());
    }

    #[test]
    fn same_list_twice_matches_itself() {
        let a: Vec<DocId> = vec![2, 5];
        assert_eq!(intersect(&[&a[..], &a[..]]), vec![2, 5]);
    }

    #[test]
    fn weighted_sums_weights_of_matches() {
        let a = postings(&[(1, 0.5), (2, 1.0), (6, 2.0)]);
        let b = postings(&[(2, 0.25), (3, 1.0), (6, 0.5)]);
        assert_eq!(intersect_weighted(&[&a[..], &b[..]]), vec![(2, 1.25), (6, 2.5)]);
    }

    #[test]
    fn weighted_duplicate_list_double_counts() {
        let a = postings(&[(4, 0.75)]);
        assert_eq!(intersect_weighted(&[&a[..], &a[..]]), vec![(4, 1.5)]);
    }
}
