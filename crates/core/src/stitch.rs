use crate::error::{EncodeError, Result};
use crate::features::FeatureSet;

/// Relative tolerance when comparing slide resolutions.
pub const MPP_REL_TOLERANCE: f64 = 1e-5;

/// Tile coordinates of a patient's slides placed into one shared frame,
/// plus the tile geometry every constituent slide agreed on.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchedCoords {
    pub coords_um: Vec<[f64; 2]>,
    pub tile_size_um: f64,
    pub tile_size_px: u32,
    pub mpp: f64,
}

fn mpp_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= MPP_REL_TOLERANCE * a.abs().max(b.abs())
}

/// Places every slide's tiles into one shared coordinate frame.
///
/// A running x offset starts at zero; each slide's tiles are shifted by
/// it, then the offset advances to the rightmost shifted tile plus one
/// tile width. Coordinates are tile top-left corners, so this bound is
/// the rightmost tile's right edge and holds for sparse layouts too.
/// Input sets are never mutated.
pub fn stitch(slides: &[FeatureSet]) -> Result<StitchedCoords> {
    let first = slides.first().ok_or(EncodeError::EmptyPatient)?;
    let mpp = first.mpp();
    let total: usize = slides.iter().map(FeatureSet::tile_count).sum();
    let mut coords_um = Vec::with_capacity(total);
    let mut x_offset = 0.0_f64;
    for slide in slides {
        if !mpp_close(mpp, slide.mpp()) {
            return Err(EncodeError::ResolutionMismatch {
                expected: mpp,
                found: slide.mpp(),
            });
        }
        if slide.tile_count() == 0 {
            tracing::warn!("slide with zero tiles in patient group");
            continue;
        }
        let mut rightmost = f64::NEG_INFINITY;
        for &[x, y] in slide.coords_um() {
            let shifted = x + x_offset;
            if shifted > rightmost {
                rightmost = shifted;
            }
            coords_um.push([shifted, y]);
        }
        x_offset = rightmost + slide.tile_size_um();
    }
    Ok(StitchedCoords {
        coords_um,
        tile_size_um: first.tile_size_um(),
        tile_size_px: first.tile_size_px(),
        mpp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn slide(xs: &[f64], tile_size_um: f64, tile_size_px: u32) -> FeatureSet {
        let coords: Vec<[f64; 2]> = xs.iter().map(|&x| [x, 0.0]).collect();
        let features = Array2::from_elem((xs.len(), 4), 1.0_f32);
        FeatureSet::new(features, coords, tile_size_um, tile_size_px).unwrap()
    }

    #[test]
    fn second_slide_starts_past_first_tile_edge() {
        let slides = vec![slide(&[0.0], 100.0, 200), slide(&[0.0], 100.0, 200)];
        let stitched = stitch(&slides).unwrap();
        assert_eq!(stitched.coords_um.len(), 2);
        assert_eq!(stitched.coords_um[0], [0.0, 0.0]);
        assert!(stitched.coords_um[1][0] >= 100.0);
    }

    #[test]
    fn preserves_slide_then_tile_order() {
        let slides = vec![
            slide(&[0.0, 100.0, 200.0], 100.0, 200),
            slide(&[0.0, 100.0], 100.0, 200),
        ];
        let stitched = stitch(&slides).unwrap();
        assert_eq!(stitched.coords_um.len(), 5);
        // first slide untouched
        assert_eq!(stitched.coords_um[0][0], 0.0);
        assert_eq!(stitched.coords_um[2][0], 200.0);
        // second slide shifted past 200 + 100
        assert_eq!(stitched.coords_um[3][0], 300.0);
        assert_eq!(stitched.coords_um[4][0], 400.0);
    }

    #[test]
    fn sparse_layout_uses_actual_rightmost_tile() {
        // tiles at 0 and 500; the next slide must clear 500 + 100, not a
        // nominal slide width
        let slides = vec![slide(&[0.0, 500.0], 100.0, 200), slide(&[0.0], 100.0, 200)];
        let stitched = stitch(&slides).unwrap();
        assert_eq!(stitched.coords_um[2][0], 600.0);
    }

    #[test]
    fn no_overlap_between_consecutive_slides() {
        let slides = vec![
            slide(&[0.0, 300.0, 100.0], 100.0, 200),
            slide(&[50.0, 0.0], 100.0, 200),
            slide(&[0.0], 100.0, 200),
        ];
        let stitched = stitch(&slides).unwrap();
        let bounds = [3, 2, 1];
        let mut start = 0;
        let mut previous_edge = f64::NEG_INFINITY;
        for (slide_idx, count) in bounds.iter().enumerate() {
            let tiles = &stitched.coords_um[start..start + count];
            let min_x = tiles.iter().map(|c| c[0]).fold(f64::INFINITY, f64::min);
            let max_x = tiles.iter().map(|c| c[0]).fold(f64::NEG_INFINITY, f64::max);
            if slide_idx > 0 {
                assert!(min_x >= previous_edge, "slide {slide_idx} overlaps");
            }
            previous_edge = max_x + 100.0;
            start += count;
        }
    }

    #[test]
    fn does_not_mutate_input_sets() {
        let slides = vec![slide(&[0.0, 100.0], 100.0, 200), slide(&[0.0], 100.0, 200)];
        stitch(&slides).unwrap();
        assert_eq!(slides[1].coords_um()[0], [0.0, 0.0]);
    }

    #[test]
    fn rejects_resolution_mismatch() {
        // 0.25 vs 0.50 mpp
        let slides = vec![slide(&[0.0], 64.0, 256), slide(&[0.0], 128.0, 256)];
        let err = stitch(&slides).unwrap_err();
        assert!(matches!(err, EncodeError::ResolutionMismatch { .. }));
    }

    #[test]
    fn tolerates_tiny_resolution_drift() {
        let a = slide(&[0.0], 100.0, 200);
        let b = slide(&[0.0], 100.0 * (1.0 + 1e-7), 200);
        assert!(stitch(&[a, b]).is_ok());
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = stitch(&[]).unwrap_err();
        assert!(matches!(err, EncodeError::EmptyPatient));
    }
}
