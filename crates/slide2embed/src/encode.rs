use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use slide2embed_core::{
    assemble, processing_code_hash, read_feature_file, write_embedding, EmbeddingGenerator,
    EmbeddingRecord, EncodeError, FeatureSet, SlideEncoder,
};

use crate::logging;
use crate::manifest::SlideTable;

pub struct EncodeArgs {
    pub slide_table: PathBuf,
    pub feat_dir: PathBuf,
    pub output_dir: PathBuf,
    pub patient_label: String,
    pub filename_label: String,
    pub generate_hash: bool,
    pub base_patch_px: f64,
}

pub fn run(args: &EncodeArgs, encoder: &dyn SlideEncoder) -> Result<()> {
    run_with(args, encoder, read_feature_file, write_embedding)
}

fn encode_dir_name(identifier: &str, generate_hash: bool) -> String {
    if generate_hash {
        format!("{identifier}-pat-{}", &processing_code_hash()[..8])
    } else {
        format!("{identifier}-pat")
    }
}

fn run_with<FRead, FWrite>(
    args: &EncodeArgs,
    encoder: &dyn SlideEncoder,
    read_fn: FRead,
    write_fn: FWrite,
) -> Result<()>
where
    FRead: Fn(&Path) -> slide2embed_core::Result<FeatureSet>,
    FWrite: Fn(&Path, &EmbeddingRecord) -> slide2embed_core::Result<()>,
{
    let table = SlideTable::load(&args.slide_table, &args.patient_label, &args.filename_label)?;
    if table.is_empty() {
        logging::stage("encode", "slide table has no usable rows");
        return Ok(());
    }
    let encode_dir = args
        .output_dir
        .join(encode_dir_name(encoder.identifier(), args.generate_hash));
    fs::create_dir_all(&encode_dir)
        .with_context(|| format!("failed to create {}", encode_dir.display()))?;
    let generator = EmbeddingGenerator::with_base_patch_px(encoder, args.base_patch_px);
    let total = table.len();
    for (idx, (patient_id, filenames)) in table.iter().enumerate() {
        logging::stage("encode", format!("patient {patient_id} ({}/{total})", idx + 1));
        let output_path = encode_dir.join(format!("{patient_id}.json"));
        if output_path.exists() {
            logging::verbose(format!(
                "skipping {patient_id} because {} already exists",
                output_path.display()
            ));
            continue;
        }
        match encode_patient(filenames, &args.feat_dir, &generator, &read_fn) {
            Ok(Some(embedding)) => {
                let record = EmbeddingRecord {
                    patient_id: patient_id.clone(),
                    encoder: encoder.identifier().to_string(),
                    dim: embedding.len(),
                    embedding,
                };
                write_fn(&output_path, &record)
                    .with_context(|| format!("failed to write embedding for {patient_id}"))?;
            }
            Ok(None) => {
                logging::stage(
                    "encode",
                    format!("no features found for patient {patient_id}, skipping"),
                );
            }
            // A missing-coordinates failure is a caller-contract bug,
            // not bad slide data, so it ends the run.
            Err(err @ EncodeError::MissingCoordinates) => {
                return Err(err).context("encoder invoked without coordinates");
            }
            Err(err) => {
                logging::stage("encode", format!("skipping patient {patient_id}: {err}"));
            }
        }
    }
    Ok(())
}

/// Reads a patient's slides and encodes them as one virtual slide.
/// Any per-slide read failure or resolution mismatch surfaces as an
/// error the caller contains to this patient.
fn encode_patient<E, FRead>(
    filenames: &[String],
    feat_dir: &Path,
    generator: &EmbeddingGenerator<'_, E>,
    read_fn: &FRead,
) -> slide2embed_core::Result<Option<Vec<f32>>>
where
    E: SlideEncoder + ?Sized,
    FRead: Fn(&Path) -> slide2embed_core::Result<FeatureSet>,
{
    let mut slides = Vec::with_capacity(filenames.len());
    for filename in filenames {
        slides.push(read_fn(&feat_dir.join(filename))?);
    }
    if slides.is_empty() {
        return Ok(None);
    }
    let virtual_slide = assemble(&slides)?;
    generator.generate(&virtual_slide).map(Some)
}
