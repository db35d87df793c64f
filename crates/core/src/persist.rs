use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::Result;

/// Patient-level embedding as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub patient_id: String,
    pub encoder: String,
    pub dim: usize,
    pub embedding: Vec<f32>,
}

/// Writes the record to a sibling temp file and renames it into place,
/// so a reader never observes a partial artifact. The final path
/// doubles as the completion marker for resumed runs.
pub fn write_embedding(path: &Path, record: &EmbeddingRecord) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer(tmp.as_file(), record)?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Hex digest over the stitching, assembly, and encoding sources.
/// Output directories carry its first characters so embeddings from a
/// changed pipeline never mix with older ones.
pub fn processing_code_hash() -> String {
    let mut hasher = Sha256::new();
    hasher.update(include_str!("stitch.rs"));
    hasher.update(include_str!("assemble.rs"));
    hasher.update(include_str!("encoder.rs"));
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record() -> EmbeddingRecord {
        EmbeddingRecord {
            patient_id: "patient_001".to_string(),
            encoder: "stub".to_string(),
            dim: 3,
            embedding: vec![0.1, 0.2, 0.3],
        }
    }

    #[test]
    fn writes_readable_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("patient_001.json");
        write_embedding(&path, &record()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let loaded: EmbeddingRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(loaded.patient_id, "patient_001");
        assert_eq!(loaded.embedding.len(), loaded.dim);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/patient_001.json");
        write_embedding(&path, &record()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn hash_is_stable_within_a_build() {
        let first = processing_code_hash();
        let second = processing_code_hash();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }
}
