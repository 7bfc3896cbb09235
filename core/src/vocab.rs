use crate::TermId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bijective mapping between normalized terms and dense, 0-based term ids.
///
/// Ids are handed out in first-seen order while the corpus is ingested and never
/// change afterwards. `terms[id]` is the inverse of `ids`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    ids: HashMap<String, TermId>,
    terms: Vec<String>,
}

impl Vocabulary {
    pub fn new() -> Self { Self::default() }

    /// Id for `token`, allocating the next one if the token is new. Build time only.
    pub fn intern(&mut self, token: &str) -> TermId {
        if let Some(&id) = self.ids.get(token) {
            return id;
        }
        let id = self.terms.len() as TermId;
        self.ids.insert(token.to_string(), id);
        self.terms.push(token.to_string());
        id
    }

    pub fn get(&self, token: &str) -> Option<TermId> { self.ids.get(token).copied() }

    pub fn term(&self, id: TermId) -> Option<&str> { self.terms.get(id as usize).map(String::as_str) }

    /// Encode a query. Any out-of-vocabulary token fails the whole query, since no
    /// document can contain every term in that case.
    ///
    /// Duplicate tokens encode to duplicate ids; collapsing them is the caller's decision.
    pub fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Option<Vec<TermId>> {
        tokens.iter().map(|t| self.get(t.as_ref())).collect()
    }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
}
