use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "slide2embed", about = "patient-level slide embedding CLI")]
pub struct Cli {
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode one embedding per patient from extracted tile features.
    Encode {
        /// CSV manifest mapping patients to slide feature files.
        #[arg(long)]
        slide_table: String,
        /// Directory holding the per-slide feature files.
        #[arg(long)]
        feat_dir: String,
        #[arg(long)]
        output_dir: String,
        #[arg(long, default_value = "PATIENT")]
        patient_label: String,
        #[arg(long, default_value = "FILENAME")]
        filename_label: String,
        /// Append a processing-code hash to the output directory name.
        #[arg(long, default_value_t = false)]
        generate_hash: bool,
    },
}
