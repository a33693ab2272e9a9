//! OpenTelemetry Collector Schema CLI
//!
//! Command-line interface for generating a collector configuration schema.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use otelcol_schema::{
    aggregate, assemble, check_schema, CategoryDescriptions, DuplicatePolicy, GenerateOptions,
    DEFAULT_MAX_DEPTH,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "otelcol-schema")]
#[command(about = "Generate JSON Schema for OpenTelemetry Collector configuration")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate OpenTelemetry JSON schema
    GenOtelJsonSchema {
        /// Directory of YAML component metadata (cfgmetadatagen output)
        #[arg(long)]
        metadata_dir: PathBuf,

        /// File the JSON schema is written to
        #[arg(long, default_value = "schema.json")]
        output_file: PathBuf,

        /// Fail on components whose schema could only be partially built
        #[arg(long)]
        strict: bool,

        /// What to do when two descriptors share a component name in one category
        #[arg(long, value_enum, default_value_t = OnDuplicate::Overwrite)]
        on_duplicate: OnDuplicate,

        /// Maximum nested struct depth
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Compile the generated schema before writing it
        #[arg(long)]
        check: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OnDuplicate {
    /// Later file (in path order) wins
    Overwrite,
    /// Abort with an error
    Reject,
}

impl From<OnDuplicate> for DuplicatePolicy {
    fn from(value: OnDuplicate) -> Self {
        match value {
            OnDuplicate::Overwrite => DuplicatePolicy::Overwrite,
            OnDuplicate::Reject => DuplicatePolicy::Reject,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::GenOtelJsonSchema {
            metadata_dir,
            output_file,
            strict,
            on_duplicate,
            max_depth,
            check,
        } => {
            let options = GenerateOptions::new()
                .strict(strict)
                .on_duplicate(on_duplicate.into())
                .max_depth(max_depth);
            run_generate(&metadata_dir, &output_file, &options, check)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_generate(
    metadata_dir: &Path,
    output_file: &Path,
    options: &GenerateOptions,
    check: bool,
) -> Result<(), u8> {
    if !metadata_dir.is_dir() {
        eprintln!(
            "Error: metadata-dir does not exist: {}",
            metadata_dir.display()
        );
        return Err(2);
    }

    tracing::info!(
        metadata_dir = %metadata_dir.display(),
        output_file = %output_file.display(),
        "generating JSON schema"
    );

    let aggregation = aggregate(metadata_dir, options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    if !aggregation.partial.is_empty() {
        eprintln!(
            "Warning: {} of {} components have incomplete schemas",
            aggregation.partial.len(),
            aggregation.files_processed
        );
    }

    let schema = assemble(&aggregation.categories, &CategoryDescriptions::collector()).map_err(
        |e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        },
    )?;

    if check {
        check_schema(&schema).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;
    }

    let mut json_output = serde_json::to_string_pretty(&schema).map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;
    json_output.push('\n');

    if let Some(parent) = output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            eprintln!("Error creating {}: {}", parent.display(), e);
            3u8
        })?;
    }

    std::fs::write(output_file, &json_output).map_err(|e| {
        eprintln!("Error writing to {}: {}", output_file.display(), e);
        3u8
    })?;

    println!("\x1b[32mdone\x1b[0m");
    Ok(())
}
