//! Full-text search over book plot summaries: TF-IDF inverted indexes, AND-intersection of
//! posting lists, cosine ranking, bounded top-k selection and field-based refinement.

pub mod config;
pub mod docs;
pub mod engine;
pub mod error;
pub mod index;
pub mod intersect;
pub mod norms;
pub mod persist;
pub mod rank;
pub mod refine;
pub mod tokenizer;
pub mod vocab;

pub use docs::{BookRecord, DocStore};
pub use engine::{IndexArtifacts, QueryOptions, SearchEngine};
pub use error::{Result, SearchError};
pub use index::{DocId, IndexBuilder, InvertedIndex, Posting, TermId, WeightedIndex};
pub use norms::DocumentNorms;
pub use refine::{Criterion, Field, FieldLookup};
pub use vocab::Vocabulary;
