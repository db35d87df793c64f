use std::fs;
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{EncodeError, Result};

/// One slide's extracted tile features plus coordinate metadata.
///
/// Rows of `features` correspond 1:1 with entries of `coords_um`
/// (top-left tile corners, in microns). Built through [`FeatureSet::new`]
/// so that parity and geometry invariants hold for every instance.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    features: Array2<f32>,
    coords_um: Vec<[f64; 2]>,
    tile_size_um: f64,
    tile_size_px: u32,
}

impl FeatureSet {
    pub fn new(
        features: Array2<f32>,
        coords_um: Vec<[f64; 2]>,
        tile_size_um: f64,
        tile_size_px: u32,
    ) -> Result<Self> {
        if features.nrows() != coords_um.len() {
            return Err(EncodeError::InvalidFeatureSet(format!(
                "feature rows ({}) do not match coordinate count ({})",
                features.nrows(),
                coords_um.len()
            )));
        }
        if !(tile_size_um > 0.0) || tile_size_px == 0 {
            return Err(EncodeError::InvalidFeatureSet(format!(
                "tile sizes must be positive (um={tile_size_um}, px={tile_size_px})"
            )));
        }
        Ok(Self {
            features,
            coords_um,
            tile_size_um,
            tile_size_px,
        })
    }

    pub fn features(&self) -> &Array2<f32> {
        &self.features
    }

    pub fn coords_um(&self) -> &[[f64; 2]] {
        &self.coords_um
    }

    pub fn tile_size_um(&self) -> f64 {
        self.tile_size_um
    }

    pub fn tile_size_px(&self) -> u32 {
        self.tile_size_px
    }

    /// Physical resolution in microns per pixel, derived from the tile
    /// geometry. Strictly positive by construction.
    pub fn mpp(&self) -> f64 {
        self.tile_size_um / self.tile_size_px as f64
    }

    pub fn tile_count(&self) -> usize {
        self.coords_um.len()
    }
}

/// On-disk schema of a per-slide feature file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSetFile {
    pub features: Vec<Vec<f32>>,
    pub coords_um: Vec<[f64; 2]>,
    pub tile_size_um: f64,
    pub tile_size_px: u32,
}

impl FeatureSetFile {
    pub fn into_feature_set(self) -> Result<FeatureSet> {
        let rows = self.features.len();
        let cols = self.features.first().map(|row| row.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(EncodeError::InvalidFeatureSet(
                "feature file holds no tile features".to_string(),
            ));
        }
        let mut flat = Vec::with_capacity(rows * cols);
        for (idx, row) in self.features.iter().enumerate() {
            if row.len() != cols {
                return Err(EncodeError::InvalidFeatureSet(format!(
                    "feature row {idx} has {} values, expected {cols}",
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }
        let features = Array2::from_shape_vec((rows, cols), flat)
            .map_err(|err| EncodeError::InvalidFeatureSet(err.to_string()))?;
        FeatureSet::new(features, self.coords_um, self.tile_size_um, self.tile_size_px)
    }
}

/// Reads and validates one slide's feature file. Any failure is folded
/// into a `SlideRead` for that slide so the caller can contain it to
/// the owning patient.
pub fn read_feature_file(path: &Path) -> Result<FeatureSet> {
    let parse = || -> Result<FeatureSet> {
        let raw = fs::read_to_string(path)?;
        let file: FeatureSetFile = serde_json::from_str(&raw)?;
        file.into_feature_set()
    };
    parse().map_err(|err| EncodeError::SlideRead {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}
