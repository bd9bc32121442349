use crate::analyzer::EntryPointAnalyzer;
use crate::error::Error;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Entry-point discovery - Inventory the ways into an annotation-driven Java codebase
#[derive(Parser, Debug)]
#[command(name = "entrypoint-discovery")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Java repository
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Skip extracting schemas for request body types
    #[arg(long = "no-schemas")]
    pub no_schemas: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        return Err(Error::InvalidArgument(format!(
            "Project path does not exist: {}",
            args.project_path.display()
        ))
        .into());
    }

    if !args.project_path.is_dir() {
        return Err(Error::InvalidArgument(format!(
            "Project path is not a directory: {}",
            args.project_path.display()
        ))
        .into());
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if args.no_schemas {
        info!("Model schemas: skipped");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting entry-point discovery...");

    // Step 1: Scan, parse and classify
    let mut analyzer = EntryPointAnalyzer::new();
    analyzer.analyze_repository(&args.project_path)?;

    if analyzer.entry_points().is_empty() {
        log::warn!("No entry points found in the project");
    }

    // Step 2: Resolve the payload shapes of request bodies
    let model_schemas = if args.no_schemas {
        BTreeMap::new()
    } else {
        info!("Extracting model schemas...");
        analyzer.model_schemas()
    };
    info!("Extracted {} model schemas", model_schemas.len());

    // Step 3: Build the report
    let report = analyzer.into_report(model_schemas);

    // Step 4: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&report)?,
        OutputFormat::Json => serialize_json(&report)?,
    };

    // Step 5: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    // Step 6: Display summary
    info!("Discovery complete!");
    info!("Summary:");
    for (kind, count) in &report.by_type {
        info!("  - {}: {}", kind, count);
    }
    info!("  - Total: {}", report.total_entry_points);
    if !report.parse_failures.is_empty() {
        info!("  - Files skipped: {}", report.parse_failures.len());
    }

    Ok(())
}
