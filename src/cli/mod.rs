pub mod decode;
pub mod metadata;
pub mod run;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "epistola",
    about = "Metadata and relation triples from TEI manuscript descriptions",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract metadata and relation triples from every matching document
    Run(RunArgs),
    /// Print document metadata as JSON without calling the model
    Metadata {
        /// TEI files to read
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Keep a lone sender or receiver instead of dropping both
        #[arg(long)]
        keep_partial_correspondents: bool,
    },
    /// Decode generated sequences (one per line) into canonical triples
    Decode {
        /// File with one sequence per line (stdin if omitted)
        path: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Directory containing the TEI documents
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Filename pattern inside the input directory
    #[arg(long)]
    pub pattern: Option<String>,
    /// Where to write the aggregate JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Inference endpoint of the relation-extraction model
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Documents processed at once
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,
    /// Stop at the first failing document
    #[arg(long)]
    pub fail_fast: bool,
    /// Keep a lone sender or receiver instead of dropping both
    #[arg(long)]
    pub keep_partial_correspondents: bool,
}
