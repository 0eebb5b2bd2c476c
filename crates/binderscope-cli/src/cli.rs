use binderscope::core::models::side::Side;
use binderscope::workflows::inputs::DesignMethod;
use binderscope::workflows::stage::WorkflowStage;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "BinderScope Developers",
    version,
    about = "BinderScope CLI - Evaluate protein binder candidates against a target and track design projects through a staged workflow.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Directory holding saved sessions. Defaults to the OS-specific data directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub sessions_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a new design project session.
    New {
        /// Human-readable project name.
        #[arg(required = true)]
        name: String,
    },
    /// List saved sessions, most recently updated first.
    List,
    /// Show the stage, artifacts and results of a session.
    Show {
        /// Session id (or unique id prefix) or path to a session file.
        session: String,
    },
    /// Set the target protein of a session.
    Target(TargetArgs),
    /// Set the binder candidate of a session.
    Binder(BinderArgs),
    /// Store a finished structure prediction for the target or the binder, or attach
    /// confidence to a structure input.
    Predict(PredictArgs),
    /// Run interface analysis and scoring on the session's current structures.
    Analyze(AnalyzeArgs),
    /// Move a session to its next stage.
    Advance {
        /// Session id (or unique id prefix) or path to a session file.
        session: String,
    },
    /// Move a session back to an earlier stage.
    Retreat {
        /// Session id (or unique id prefix) or path to a session file.
        session: String,
        /// Stage to return to (e.g. target-input, binder-design).
        #[arg(required = true)]
        stage: WorkflowStage,
    },
    /// Replace the free-form notes of a session.
    Notes {
        /// Session id (or unique id prefix) or path to a session file.
        session: String,
        /// The new notes.
        text: String,
    },
    /// Analyze and score a target/binder pair directly, without a session.
    Evaluate(EvaluateArgs),
    /// Check a sequence or structure file against the input rules.
    Validate(ValidateArgs),
}

/// Which half of the complex a command applies to.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideArg {
    Target,
    Binder,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Target => Side::Target,
            SideArg::Binder => Side::Binder,
        }
    }
}

/// Mutually exclusive sources for the target.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct TargetSource {
    /// Amino-acid sequence (one-letter codes).
    #[arg(long, value_name = "SEQUENCE")]
    pub sequence: Option<String>,
    /// FASTA or plain-text file holding the sequence.
    #[arg(long, value_name = "PATH")]
    pub fasta: Option<PathBuf>,
    /// PDB or mmCIF structure file.
    #[arg(long, value_name = "PATH")]
    pub structure: Option<PathBuf>,
    /// Four-character PDB accession id.
    #[arg(long, value_name = "ID")]
    pub pdb_id: Option<String>,
}

/// Arguments for the `target` subcommand.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Session id (or unique id prefix) or path to a session file.
    pub session: String,

    #[command(flatten)]
    pub source: TargetSource,

    /// Local copy of the entry named by --pdb-id.
    #[arg(long, value_name = "PATH", requires = "pdb_id")]
    pub fetched_structure: Option<PathBuf>,

    /// Target residues the binder should engage, as numbers or ranges ("10-20, 45").
    #[arg(long, value_name = "RESIDUES")]
    pub binding_site: Option<String>,
}

/// Mutually exclusive sources for the binder.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct BinderSource {
    /// Amino-acid sequence (one-letter codes).
    #[arg(long, value_name = "SEQUENCE")]
    pub sequence: Option<String>,
    /// FASTA or plain-text file holding the sequence.
    #[arg(long, value_name = "PATH")]
    pub fasta: Option<PathBuf>,
    /// PDB or mmCIF structure file.
    #[arg(long, value_name = "PATH")]
    pub structure: Option<PathBuf>,
}

/// Arguments for the `binder` subcommand.
#[derive(Args, Debug)]
pub struct BinderArgs {
    /// Session id (or unique id prefix) or path to a session file.
    pub session: String,

    #[command(flatten)]
    pub source: BinderSource,

    /// How the binder was designed (manual, scaffold, template).
    #[arg(short, long, default_value = "manual")]
    pub method: DesignMethod,
}

/// Arguments for the `predict` subcommand.
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Session id (or unique id prefix) or path to a session file.
    pub session: String,

    /// Which structure the prediction belongs to.
    #[arg(value_enum)]
    pub side: SideArg,

    /// Predicted structure file (PDB or mmCIF) produced by the prediction service.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub structure: PathBuf,

    /// Per-residue confidence values (pLDDT), whitespace- or comma-separated.
    /// When omitted, confidence is read from the B-factor column.
    #[arg(long, value_name = "PATH")]
    pub confidence: Option<PathBuf>,

    /// Name of the model that produced the prediction.
    #[arg(short, long, value_name = "NAME")]
    pub model: Option<String>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Analysis overrides shared by `analyze` and `evaluate`.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Contact cutoff between representative atoms, in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Distance below which a contact is flagged as a steric clash, in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub clash_threshold: Option<f64>,

    /// Include hetero residues (ligands, waters) in the analysis.
    #[arg(long)]
    pub include_hetero: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S analysis.cutoff=6.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    /// Write the contact map as CSV to this path.
    #[arg(long, value_name = "PATH")]
    pub contacts_csv: Option<PathBuf>,

    /// Write the target and binder as one complex PDB to this path.
    #[arg(long, value_name = "PATH")]
    pub complex_pdb: Option<PathBuf>,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Session id (or unique id prefix) or path to a session file.
    pub session: String,

    #[command(flatten)]
    pub options: AnalysisOptions,
}

/// Arguments for the `evaluate` subcommand.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Target structure file (PDB or mmCIF).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub target: PathBuf,

    /// Binder structure file (PDB or mmCIF).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub binder: PathBuf,

    /// Target residues the binder should engage, as numbers or ranges ("10-20, 45").
    #[arg(long, value_name = "RESIDUES")]
    pub binding_site: Option<String>,

    #[command(flatten)]
    pub options: AnalysisOptions,
}

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ValidateArgs {
    /// Amino-acid sequence to check.
    #[arg(long, value_name = "SEQUENCE")]
    pub sequence: Option<String>,
    /// FASTA or plain-text file holding the sequence to check.
    #[arg(long, value_name = "PATH")]
    pub fasta: Option<PathBuf>,
    /// Structure file to check.
    #[arg(long, value_name = "PATH")]
    pub structure: Option<PathBuf>,
    /// PDB accession id to check.
    #[arg(long, value_name = "ID")]
    pub pdb_id: Option<String>,
}
