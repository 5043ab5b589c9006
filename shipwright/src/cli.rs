//! All the clap stuff for parsing/documenting the cli

use camino::Utf8PathBuf;
use clap::{
    builder::{PossibleValuesParser, TypedValueParser},
    Args, Parser, Subcommand, ValueEnum,
};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Clone, Debug)]
#[clap(version, about, long_about = None)]
#[clap(propagate_version = true)]
#[clap(args_conflicts_with_subcommands = true)]
/// Cross-compile, package, checksum and publish releases.
///
/// When run without a subcommand, `shipwright` will invoke the `release`
/// subcommand. See `shipwright help release` for more details.
pub struct Cli {
    /// Subcommands ("no subcommand" defaults to `release`)
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// How verbose logging should be (log level)
    #[clap(long, short)]
    #[clap(default_value_t = LevelFilter::INFO)]
    #[clap(value_parser = PossibleValuesParser::new(["off", "error", "warn", "info", "debug", "trace"]).map(|s| s.parse::<LevelFilter>().expect("possible values are valid")))]
    #[clap(help_heading = "GLOBAL OPTIONS", global = true)]
    pub verbose: LevelFilter,

    /// The format of the output
    #[clap(long, short, value_enum)]
    #[clap(default_value_t = OutputFormat::Human)]
    #[clap(help_heading = "GLOBAL OPTIONS", global = true)]
    pub output_format: OutputFormat,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Build, archive, checksum and publish a release
    #[clap(disable_version_flag = true)]
    Release(ReleaseArgs),
    /// Write an example config with every default filled in
    #[clap(disable_version_flag = true)]
    Init(InitArgs),
    /// Print the JSON Schema of the config file
    #[clap(disable_version_flag = true)]
    ConfigSchema(ConfigSchemaArgs),
}

#[derive(Args, Clone, Debug, Default)]
pub struct ReleaseArgs {
    /// Config file to load
    ///
    /// Defaults to shipwright.toml. A missing default config is only a warning,
    /// a missing explicitly requested one is an error.
    #[clap(long, short)]
    pub config: Option<Utf8PathBuf>,

    /// Load the release notes from this markdown file instead of the git log
    #[clap(long)]
    pub release_notes: Option<Utf8PathBuf>,

    /// Skip checking the git state and the environment
    #[clap(long)]
    pub skip_validate: bool,

    /// Skip publishing the release and the Homebrew formula
    #[clap(long)]
    pub skip_publish: bool,

    /// Build a snapshot: no tag needed, validation and publishing are skipped
    #[clap(long)]
    pub snapshot: bool,

    /// How many builds and uploads to run at once (defaults to 4)
    #[clap(long, short)]
    pub parallelism: Option<usize>,
}

#[derive(Args, Clone, Debug)]
pub struct InitArgs {
    /// Where to write the config
    #[clap(long, short, default_value = "shipwright.toml")]
    pub config: Utf8PathBuf,
}

#[derive(Args, Clone, Debug)]
pub struct ConfigSchemaArgs {}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum OutputFormat {
    Human,
    Json,
}
