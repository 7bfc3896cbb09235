//! Configuration constants shared by the indexer and the server.
//!
//! Runtime settings (index directory, bind address, query-term deduplication) are
//! command-line arguments of the binaries; these values are fixed at compile time.

/// Number of results returned by a ranked search when the caller does not ask for a count.
pub const DEFAULT_RANKED_K: usize = 5;

/// Upper bound on `k` accepted from callers of a ranked search.
pub const MAX_K: usize = 100;

/// How many cosine-ranked candidates the refinement pass re-scores.
pub const REFINE_CANDIDATES: usize = 10;

/// How many documents survive the refinement pass.
pub const REFINE_TOP: usize = 3;

/// Multiplier applied once per matching refinement criterion.
pub const REFINE_BOOST: f64 = 1.5;

/// Format version written to `meta.json`. Bump when any persisted layout changes.
pub const ARTIFACT_VERSION: u32 = 1;
