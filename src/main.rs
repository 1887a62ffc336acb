mod cli;
mod config;

use cli::Args;
use config::ConfigFile;
use sbom_assembler::adapters::outbound::console::StderrProgressReporter;
use sbom_assembler::adapters::outbound::filesystem::{output_presenter, EvidenceFileSource};
use sbom_assembler::application::dto::{
    OutputFormat, RootOverride, SbomRequest, DEFAULT_MAX_CONCURRENCY,
};
use sbom_assembler::application::factories::FormatterFactory;
use sbom_assembler::application::use_cases::GenerateSbomUseCase;
use sbom_assembler::sbom_generation::services::MetadataOptions;
use sbom_assembler::shared::error::ExitCode;
use sbom_assembler::shared::Result;
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    // clap reports invalid arguments itself and exits with code 2
    let args = Args::parse_args();

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    // Load config file, explicit or next to the input
    let config = load_config(&args)?;

    // Merge CLI and config options
    let (request, format) = build_request(&args, &config)?;

    // Create adapters (Dependency Injection)
    let evidence_source = EvidenceFileSource::open(&args.input)?;
    let progress_reporter = StderrProgressReporter::new();

    // Create use case with injected dependencies
    let use_case = GenerateSbomUseCase::new(evidence_source, progress_reporter);

    // Execute use case
    let response = use_case.execute(request).await?;

    // Display progress message
    eprintln!("{}", FormatterFactory::progress_message(format));

    // Create formatter using factory
    let formatter = FormatterFactory::create(format);
    let formatted_output = formatter.format(&response.bom)?;

    output_presenter(args.output).present(&formatted_output)?;

    if response.is_partial() {
        eprintln!(
            "⚠️  {} project(s) were left out of the BOM; see the errors above.",
            response.failed_projects.len()
        );
        return Ok(ExitCode::PartialFailure);
    }

    Ok(ExitCode::Success)
}

/// Loads the explicit config file, or discovers one next to the input file
fn load_config(args: &Args) -> Result<ConfigFile> {
    if let Some(path) = &args.config {
        return config::load_config_from_path(path);
    }

    let input_dir = args
        .input
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    match config::discover_config(input_dir)? {
        Some((path, config)) => {
            eprintln!("🔧 Auto-discovered config file: {}", path.display());
            Ok(config)
        }
        None => Ok(ConfigFile::default()),
    }
}

/// Builds the use case request. CLI values override config values;
/// exclusion patterns from both are combined.
fn build_request(args: &Args, config: &ConfigFile) -> Result<(SbomRequest, OutputFormat)> {
    let format = match args.format {
        Some(format) => format,
        None => config.output_format()?.unwrap_or_default(),
    };

    let mut exclude_patterns: Vec<String> = config.exclude.clone().unwrap_or_default();
    for pattern in &args.exclude {
        if !exclude_patterns.contains(pattern) {
            exclude_patterns.push(pattern.clone());
        }
    }

    let root_config = config.root.as_ref();
    let root_override = RootOverride {
        name: args
            .root_name
            .clone()
            .or_else(|| root_config.and_then(|root| root.name.clone())),
        version: args
            .root_version
            .clone()
            .or_else(|| root_config.and_then(|root| root.version.clone())),
        component_type: match args.root_type {
            Some(component_type) => Some(component_type),
            None => config.root_type()?,
        },
    };

    let metadata = MetadataOptions {
        timestamp: !args.no_timestamp && config.timestamp.unwrap_or(true),
        serial_number: !args.no_serial_number && config.serial_number.unwrap_or(true),
    };

    let request = SbomRequest::new()
        .with_exclude_patterns(exclude_patterns)
        .with_exclude_dev(args.exclude_dev || config.exclude_dev.unwrap_or(false))
        .with_exclude_test_projects(
            args.exclude_test_projects || config.exclude_test_projects.unwrap_or(false),
        )
        .with_root_override(root_override)
        .with_metadata(metadata)
        .with_max_concurrency(config.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY));

    Ok((request, format))
}
