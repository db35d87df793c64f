use ndarray::ArrayView2;

use crate::assemble::VirtualSlide;
use crate::error::{EncodeError, Result};

/// Default receptor-field unit of the foundation model, in pixels.
/// A different model revision can carry a different unit, so callers
/// may override it instead of re-deriving it.
pub const DEFAULT_BASE_PATCH_PX: f64 = 256.0;

/// Capability boundary to the pretrained foundation model.
///
/// One operation: encode a slide from its patch features. Calls are
/// inference-only and deterministic given their input; implementations
/// must not mutate model state across calls.
pub trait SlideEncoder {
    /// Stable identifier, used for output-directory naming.
    fn identifier(&self) -> &str;

    /// `feats` has one row per tile; `coords_px` holds the matching
    /// integer pixel-grid positions; `patch_size_lvl0` is the patch
    /// size at native resolution. Returns exactly one embedding.
    fn encode_slide(
        &self,
        feats: ArrayView2<'_, f32>,
        coords_px: &[[i64; 2]],
        patch_size_lvl0: i64,
    ) -> Result<Vec<f32>>;
}

/// Turns a virtual slide into the pixel-grid call the foundation model
/// expects and returns its embedding.
pub struct EmbeddingGenerator<'a, E: SlideEncoder + ?Sized> {
    encoder: &'a E,
    base_patch_px: f64,
}

impl<'a, E: SlideEncoder + ?Sized> EmbeddingGenerator<'a, E> {
    pub fn new(encoder: &'a E) -> Self {
        Self {
            encoder,
            base_patch_px: DEFAULT_BASE_PATCH_PX,
        }
    }

    pub fn with_base_patch_px(encoder: &'a E, base_patch_px: f64) -> Self {
        Self {
            encoder,
            base_patch_px,
        }
    }

    /// Converts micron coordinates to the model's integer pixel grid by
    /// dividing by mpp and truncating. The model indexes patches by
    /// grid position, so truncation here must match its training grid.
    pub fn generate(&self, slide: &VirtualSlide) -> Result<Vec<f32>> {
        if slide.coords.coords_um.is_empty() {
            return Err(EncodeError::MissingCoordinates);
        }
        let mpp = slide.coords.mpp;
        let patch_size_lvl0 = (self.base_patch_px / mpp).floor() as i64;
        let coords_px: Vec<[i64; 2]> = slide
            .coords
            .coords_um
            .iter()
            .map(|&[x, y]| [(x / mpp).trunc() as i64, (y / mpp).trunc() as i64])
            .collect();
        self.encoder
            .encode_slide(slide.features.view(), &coords_px, patch_size_lvl0)
    }
}
