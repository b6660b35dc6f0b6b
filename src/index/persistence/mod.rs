
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{FlatIndex, MetadataRecord};
use crate::config::Config;
use crate::{Result, ReviewError};

/// The pair of files holding one persisted index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub index: PathBuf,
    pub metadata: PathBuf,
}

impl SnapshotPaths {
    #[inline]
    pub fn from_prefix(prefix: &Path) -> Self {
        let (index, metadata) = Config::snapshot_paths(prefix);
        Self { index, metadata }
    }

    #[inline]
    pub fn exists(&self) -> bool {
        self.index.exists()
    }
}

/// Overwrite both snapshot files. Not atomic: a crash between the two writes
/// leaves a mismatched pair, which `read_snapshot` rejects.
#[inline]
pub fn write_snapshot(
    paths: &SnapshotPaths,
    index: &FlatIndex,
    metadata: &[MetadataRecord],
) -> Result<()> {
    if let Some(parent) = paths.index.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    debug!("Writing index with {} vectors to {:?}", index.len(), paths.index);
    let mut writer = BufWriter::new(File::create(&paths.index)?);
    bincode::serialize_into(&mut writer, index)
        .map_err(|e| ReviewError::Persistence(format!("Failed to encode index: {}", e)))?;
    writer.flush()?;

    debug!("Writing {} metadata records to {:?}", metadata.len(), paths.metadata);
    let mut writer = BufWriter::new(File::create(&paths.metadata)?);
    serde_json::to_writer(&mut writer, metadata)
        .map_err(|e| ReviewError::Persistence(format!("Failed to encode metadata: {}", e)))?;
    writer.flush()?;

    info!(
        "Saved index snapshot ({} vectors, dimension {})",
        index.len(),
        index.dimension()
    );
    Ok(())
}

/// Read and cross-check both snapshot files
#[inline]
pub fn read_snapshot(paths: &SnapshotPaths) -> Result<(FlatIndex, Vec<MetadataRecord>)> {
    let index_file = open_existing(&paths.index)?;
    let index: FlatIndex = bincode::deserialize_from(BufReader::new(index_file))
        .map_err(|e| ReviewError::Persistence(format!("Failed to decode index: {}", e)))?;
    index.validate()?;

    let metadata_file = open_existing(&paths.metadata)?;
    let metadata: Vec<MetadataRecord> = serde_json::from_reader(BufReader::new(metadata_file))
        .map_err(|e| ReviewError::Persistence(format!("Failed to decode metadata: {}", e)))?;

    if metadata.len() != index.len() {
        return Err(ReviewError::Persistence(format!(
            "Snapshot holds {} vectors but {} metadata records",
            index.len(),
            metadata.len()
        )));
    }

    info!(
        "Loaded index snapshot ({} vectors, dimension {})",
        index.len(),
        index.dimension()
    );
    Ok((index, metadata))
}

fn open_existing(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ReviewError::IndexNotFound(path.to_path_buf())
        } else {
            ReviewError::Io(e)
        }
    })
}
