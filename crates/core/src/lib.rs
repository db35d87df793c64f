mod assemble;
mod encoder;
mod error;
mod features;
mod persist;
mod stitch;

pub use assemble::{assemble, VirtualSlide};
pub use encoder::{EmbeddingGenerator, SlideEncoder, DEFAULT_BASE_PATCH_PX};
pub use error::{EncodeError, Result};
pub use features::{read_feature_file, FeatureSet, FeatureSetFile};
pub use persist::{processing_code_hash, write_embedding, EmbeddingRecord};
pub use stitch::{stitch, StitchedCoords, MPP_REL_TOLERANCE};
