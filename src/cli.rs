use clap::Parser;
use std::path::PathBuf;

use sbom_assembler::application::dto::OutputFormat;
use sbom_assembler::sbom_generation::domain::ComponentType;

/// Assemble collected dependency evidence into a CycloneDX SBOM
#[derive(Parser, Debug)]
#[command(name = "sbom-assembler")]
#[command(version)]
#[command(about = "Assemble collected dependency evidence into a CycloneDX SBOM", long_about = None)]
pub struct Args {
    /// Evidence bundle to read (JSON, YAML or TOML)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output format: json or yaml [default: json]
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exclude components matching patterns (supports wildcards: *)
    /// Can be specified multiple times: -e "serilog" -e "microsoft.*"
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Drop development-only components instead of marking them excluded
    #[arg(long)]
    pub exclude_dev: bool,

    /// Skip projects flagged as test projects
    #[arg(long)]
    pub exclude_test_projects: bool,

    /// Name of the BOM root
    #[arg(long, value_name = "NAME")]
    pub root_name: Option<String>,

    /// Version of the BOM root
    #[arg(long, value_name = "VERSION")]
    pub root_version: Option<String>,

    /// Component type of the BOM root (application, library, framework, ...)
    #[arg(long, value_name = "TYPE")]
    pub root_type: Option<ComponentType>,

    /// Omit the random serial number
    #[arg(long)]
    pub no_serial_number: bool,

    /// Omit the generation timestamp
    #[arg(long)]
    pub no_timestamp: bool,

    /// Config file (defaults to sbom-assembler.config.yml next to the input)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
