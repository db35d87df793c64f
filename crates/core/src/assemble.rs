use ndarray::{concatenate, Array2, Axis};

use crate::error::{EncodeError, Result};
use crate::features::FeatureSet;
use crate::stitch::{stitch, StitchedCoords};

/// A whole patient folded into one synthetic slide: feature rows from
/// every slide in manifest order, with their stitched coordinates.
#[derive(Debug, Clone)]
pub struct VirtualSlide {
    pub features: Array2<f32>,
    pub coords: StitchedCoords,
}

impl VirtualSlide {
    pub fn tile_count(&self) -> usize {
        self.features.nrows()
    }
}

pub fn assemble(slides: &[FeatureSet]) -> Result<VirtualSlide> {
    let coords = stitch(slides)?;
    let views: Vec<_> = slides.iter().map(|slide| slide.features().view()).collect();
    let features = concatenate(Axis(0), &views).map_err(|err| {
        EncodeError::InvalidFeatureSet(format!("feature concatenation failed: {err}"))
    })?;
    Ok(VirtualSlide { features, coords })
}
