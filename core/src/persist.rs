use crate::Index;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_pages: u32,
    pub num_terms: u32,
    pub created_at: String,
    pub version: u32,
}

impl MetaFile {
    pub fn for_index(index: &Index) -> Self {
        Self {
            num_pages: index.page_count() as u32,
            num_terms: index.posting_count() as u32,
            created_at: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_default(),
            version: SNAPSHOT_VERSION,
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
    fn snapshot(&self) -> PathBuf { self.root.join("index.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

pub fn save_snapshot(paths: &IndexPaths, index: &Index) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.snapshot())?;
    let bytes = bincode::serialize(index)?;
    f.write_all(&bytes)?;
    save_meta(paths, &MetaFile::for_index(index))
}

/// Load a compiled index, refusing snapshots written by another format version.
pub fn load_snapshot(paths: &IndexPaths) -> Result<Index> {
    let meta = load_meta(paths)?;
    if meta.version != SNAPSHOT_VERSION {
        bail!("snapshot version {} is not supported (expected {SNAPSHOT_VERSION})", meta.version);
    }
    let mut f = File::open(paths.snapshot()).with_context(|| format!("opening {}", paths.snapshot().display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let index: Index = bincode::deserialize(&buf)?;
    // re-check page references; the file may have been edited or truncated
    index.validate()?;
    Ok(index)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta()).with_context(|| format!("opening {}", paths.meta().display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}
