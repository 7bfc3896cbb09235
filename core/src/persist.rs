use crate::config::ARTIFACT_VERSION;
use crate::engine::IndexArtifacts;
use crate::error::{Result, SearchError};
use crate::{DocStore, DocumentNorms, InvertedIndex, Vocabulary, WeightedIndex};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: usize,
    pub created_at: String,
    pub version: u32,
}

impl MetaFile {
    pub fn new(artifacts: &IndexArtifacts, created_at: String) -> Self {
        Self {
            num_docs: artifacts.weighted.num_docs(),
            num_terms: artifacts.vocabulary.len(),
            created_at,
            version: ARTIFACT_VERSION,
        }
    }
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn vocabulary(&self) -> PathBuf { self.root.join("vocabulary.bin") }
    pub fn inverted(&self) -> PathBuf { self.root.join("inverted.bin") }
    pub fn weighted(&self) -> PathBuf { self.root.join("weighted.bin") }
    pub fn norms(&self) -> PathBuf { self.root.join("norms.bin") }
    pub fn docs(&self) -> PathBuf { self.root.join("docs.bin") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }

    /// Every file a query-serving process needs, in load order.
    pub fn required(&self) -> [PathBuf; 6] {
        [self.meta(), self.vocabulary(), self.inverted(), self.weighted(), self.norms(), self.docs()]
    }
}

fn open(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(SearchError::MissingArtifact { path: path.to_path_buf() });
    }
    Ok(File::open(path)?)
}

fn save_bin<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut w, value)?;
    w.flush()?;
    Ok(())
}

fn load_bin<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let r = BufReader::new(open(path)?);
    Ok(bincode::deserialize_from(r)?)
}

/// Fail fast if any required artifact is absent, before reading anything.
pub fn check_artifacts(paths: &IndexPaths) -> Result<()> {
    match paths.required().into_iter().find(|p| !p.exists()) {
        Some(path) => Err(SearchError::MissingArtifact { path }),
        None => Ok(()),
    }
}

pub fn save_index(paths: &IndexPaths, artifacts: &IndexArtifacts) -> Result<()> {
    create_dir_all(&paths.root)?;
    save_bin(&paths.vocabulary(), &artifacts.vocabulary)?;
    save_bin(&paths.inverted(), &artifacts.inverted)?;
    save_bin(&paths.weighted(), &artifacts.weighted)?;
    save_bin(&paths.norms(), &artifacts.norms)?;
    Ok(())
}

pub fn load_index(paths: &IndexPaths) -> Result<IndexArtifacts> {
    let vocabulary: Vocabulary = load_bin(&paths.vocabulary())?;
    let inverted: InvertedIndex = load_bin(&paths.inverted())?;
    let weighted: WeightedIndex = load_bin(&paths.weighted())?;
    let norms: DocumentNorms = load_bin(&paths.norms())?;
    tracing::info!(root = %paths.root.display(), num_terms = vocabulary.len(), num_docs = weighted.num_docs(), "loaded index");
    Ok(IndexArtifacts { vocabulary, inverted, weighted, norms })
}

pub fn save_docs(paths: &IndexPaths, docs: &DocStore) -> Result<()> {
    create_dir_all(&paths.root)?;
    save_bin(&paths.docs(), docs)
}

pub fn load_docs(paths: &IndexPaths) -> Result<DocStore> { load_bin(&paths.docs()) }

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let meta: MetaFile = serde_json::from_reader(BufReader::new(open(&paths.meta())?))?;
    Ok(meta)
}

/// Load everything needed to serve queries: index artifacts, documents and meta.
/// The format version in meta is checked before any bincode file is read.
pub fn load_all(paths: &IndexPaths) -> Result<(IndexArtifacts, DocStore, MetaFile)> {
    check_artifacts(paths)?;
    let meta = load_meta(paths)?;
    if meta.version != ARTIFACT_VERSION {
        return Err(SearchError::IncompatibleArtifact { found: meta.version, expected: ARTIFACT_VERSION });
    }
    let artifacts = load_index(paths)?;
    let docs = load_docs(paths)?;
    Ok((artifacts, docs, meta))
}
