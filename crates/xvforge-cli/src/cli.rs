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
    author = "Stephen Chege",
    version,
    about = "XVForge CLI - Convert VASP POSCAR crystal structures into SIESTA XV files.",
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

    /// Set the number of threads used by batch conversions.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a single POSCAR file into an XV file.
    Convert(ConvertArgs),
    /// Convert many POSCAR files into a directory of XV files.
    Batch(BatchArgs),
    /// Print a summary of a POSCAR or XV file.
    Inspect(InspectArgs),
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Path to the input POSCAR file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output XV file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub conversion: ConversionArgs,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// POSCAR files to convert.
    #[arg(required = true, value_name = "INPUTS")]
    pub inputs: Vec<PathBuf>,

    /// Directory receiving one `<input stem>.XV` file per input.
    #[arg(short, long = "output-dir", required = true, value_name = "DIR")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub conversion: ConversionArgs,
}

/// Options shared by every subcommand that writes XV files.
#[derive(Args, Debug, Default)]
pub struct ConversionArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Species map file in TOML format, overriding the config file.
    #[arg(long, value_name = "PATH", conflicts_with = "species")]
    pub species_map: Option<PathBuf>,

    /// Inline species entry as TAG:Z or TAG:SYMBOL (e.g. 1:82 or 1:Pb).
    /// Repeat once per entry, in order.
    #[arg(long = "species", value_name = "TAG:Z")]
    pub species: Vec<String>,

    /// How inline species entries line up with the atoms.
    #[arg(long, value_enum, value_name = "LAYOUT", requires = "species")]
    pub layout: Option<LayoutArg>,

    /// Number of unit cells the motif layout is repeated over.
    #[arg(short, long, value_name = "INT")]
    pub multiplicity: Option<usize>,

    /// Largest off-diagonal lattice component (Angstrom) still accepted as orthogonal.
    #[arg(long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S units.bohr-in-angstrom=0.52917721
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutArg {
    /// One entry per species block.
    Blocks,
    /// One entry per atom of the unit cell.
    Motif,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// File to summarize.
    #[arg(required = true, value_name = "PATH")]
    pub path: PathBuf,

    /// Format of the file; guessed from the extension when omitted.
    #[arg(short, long, value_enum, value_name = "FORMAT")]
    pub format: Option<FormatArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Poscar,
    Xv,
}
