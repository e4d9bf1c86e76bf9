//! CLI argument definitions for QAP ingestion.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use qap_model::{QapAnalysis, ScanCategory, SchemaId};

#[derive(Parser)]
#[command(
    name = "qap-ingest",
    version,
    about = "Upload QAP quality metrics to XNAT as assessment documents",
    long_about = "Turn QAP results tables (one row per scan) into XNAT assessment\n\
                  documents (AMCZ0:anatQA, AMCZ0:fspatQA, AMCZ0:ftempQA) and store\n\
                  them in an XNAT project or a local directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow metric values and document bodies in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Upload one assessment per results row to an XNAT project.
    Upload(UploadArgs),

    /// Write one assessment document per results row to a directory.
    Render(RenderArgs),

    /// List the supported assessment datatypes.
    Schemas,
}

#[derive(Parser)]
pub struct UploadArgs {
    /// XNAT base URL, e.g. https://xnat.example.org
    #[arg(value_name = "HOST")]
    pub host: String,

    /// XNAT project ID.
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// QAP results CSV.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub selection: SchemaSelection,

    /// Credentials as user:password.
    #[arg(long = "auth", env = "QAP_XNAT_AUTH", hide_env_values = true)]
    pub auth: String,

    /// Build documents and look up scans without uploading anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct RenderArgs {
    /// QAP results CSV.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub selection: SchemaSelection,

    /// Directory the `<label>.xml` files are written to.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Scan type written to every document's `scan` element.
    #[arg(long = "scan-type", value_name = "TYPE")]
    pub scan_type: String,

    /// Project recorded in the assessment targets.
    #[arg(long = "project", default_value = "local")]
    pub project: String,
}

/// Which assessment datatype the rows become.
#[derive(Args)]
pub struct SchemaSelection {
    /// Scan category of the results table.
    #[arg(long = "scan-category", value_enum, required_unless_present = "schema")]
    pub scan_category: Option<ScanCategoryArg>,

    /// QAP analysis that produced the table (required for functional scans).
    #[arg(long = "analysis", value_enum)]
    pub analysis: Option<AnalysisArg>,

    /// Datatype identifier such as AMCZ0:ftempQA (overrides the category flags).
    #[arg(long = "schema", value_name = "ID", conflicts_with_all = ["scan_category", "analysis"])]
    pub schema: Option<String>,
}

impl SchemaSelection {
    pub fn resolve(&self) -> qap_model::Result<SchemaId> {
        if let Some(id) = &self.schema {
            return id.parse();
        }
        let category = match self.scan_category {
            Some(ScanCategoryArg::Func) => ScanCategory::Functional,
            Some(ScanCategoryArg::Anat) | None => ScanCategory::Anatomical,
        };
        SchemaId::select(category, self.analysis.map(QapAnalysis::from))
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ScanCategoryArg {
    Anat,
    Func,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AnalysisArg {
    Spatial,
    Temporal,
}

impl From<AnalysisArg> for QapAnalysis {
    fn from(value: AnalysisArg) -> Self {
        match value {
            AnalysisArg::Spatial => QapAnalysis::Spatial,
            AnalysisArg::Temporal => QapAnalysis::Temporal,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
