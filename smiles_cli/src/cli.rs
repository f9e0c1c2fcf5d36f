use clap::{Args, Parser, Subcommand, ValueEnum};
use predictor::batch::DispatchMode;
use predictor::export::CsvLayout;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "smiles_cli",
    version,
    about = "Predict compound activity from SMILES strings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check SMILES syntax locally, without contacting the API
    Validate(ValidateArgs),
    /// Predict the activity of a single compound
    Predict(PredictArgs),
    /// Predict every SMILES string of a .txt/.csv file and export a CSV
    Batch(BatchArgs),
    /// Read SMILES from stdin, one per line (`:help` lists commands)
    Interactive,
    /// Print the JSON schemas of the prediction API payloads
    Schema,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    pub smiles: String,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    pub smiles: String,

    #[arg(long, help = "Save the 2D structure image to this path")]
    pub image: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    pub file: PathBuf,

    #[arg(long, help = "CSV output path (defaults to the layout's file name)")]
    pub out: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    #[arg(long, value_enum)]
    pub layout: Option<LayoutArg>,

    #[arg(long, help = "Drop lines shorter than this many characters")]
    pub min_length: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Sequential,
    Batch,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LayoutArg {
    Compact,
    Detailed,
}

impl From<ModeArg> for DispatchMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Sequential => DispatchMode::Sequential,
            ModeArg::Batch => DispatchMode::Batch,
        }
    }
}

impl From<LayoutArg> for CsvLayout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Compact => CsvLayout::Compact,
            LayoutArg::Detailed => CsvLayout::Detailed,
        }
    }
}
