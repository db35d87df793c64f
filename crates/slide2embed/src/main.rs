mod cli;
mod config;
mod encode;
mod logging;
mod manifest;
mod remote;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::EncoderConfig;
use crate::encode::EncodeArgs;
use crate::remote::HttpSlideEncoder;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = if cli.verbose {
        true
    } else {
        logging::env_flag()
    };
    logging::init(verbose);
    match cli.command {
        Command::Encode {
            slide_table,
            feat_dir,
            output_dir,
            patient_label,
            filename_label,
            generate_hash,
        } => {
            let config = EncoderConfig::from_env()?;
            let args = EncodeArgs {
                slide_table: PathBuf::from(slide_table),
                feat_dir: PathBuf::from(feat_dir),
                output_dir: PathBuf::from(output_dir),
                patient_label,
                filename_label,
                generate_hash,
                base_patch_px: config.base_patch_px,
            };
            let encoder = HttpSlideEncoder::new(config);
            encode::run(&args, &encoder)
        }
    }
}
