use ahash::AHashMap;
use clap::{Parser, Subcommand};
use sentaku::prelude::*;
use serde::Deserialize;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// --- JSON Deserialization Structs (Records File Format) ---
// Maps a trigger or resource key to the records its perform routine serves.

#[derive(Deserialize, Default)]
struct RawSource {
    #[serde(default)]
    records: Vec<Record>,
    #[serde(default)]
    filter: Option<RawFilter>,
    #[serde(default, alias = "pageSize")]
    page_size: Option<usize>,
}

#[derive(Deserialize)]
struct RawFilter {
    /// Key of the earlier input field to read from the bundle.
    input: String,
    /// Record field that must equal that input.
    field: String,
}

impl RawSource {
    fn into_perform(self) -> StaticRecords {
        let mut perform = StaticRecords::new(self.records);
        if let Some(filter) = self.filter {
            perform = perform.filtered_by(&filter.input, &filter.field);
        }
        if let Some(size) = self.page_size {
            perform = perform.paged(size);
        }
        perform
    }
}

/// Validates integration app definitions and resolves their dynamic dropdowns
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the app definition JSON file
    app_path: String,

    /// Optional path to a JSON file mapping source keys to sample records
    #[arg(short, long)]
    records: Option<String>,

    /// Log level filter (error|warn|info|debug|trace); defaults to RUST_LOG or "warn"
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the app definition and report its dynamic fields
    Validate,
    /// Print or save the resolution manifest
    Manifest {
        /// Print the manifest as JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Save the manifest to this path in binary form
        #[arg(long)]
        out: Option<String>,
    },
    /// Resolve the options of one dynamic field
    Resolve {
        /// Key of the operation (trigger key or resource list alias)
        operation: String,
        /// Key of the dynamic input field
        field: String,
        /// Earlier field values, as key=value
        #[arg(short, long = "input", value_parser = parse_input)]
        inputs: Vec<(String, Scalar)>,
        /// Resolve as a dropdown-population pass
        #[arg(long)]
        prefill: bool,
        /// Zero-based page to request
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
}

fn parse_input(raw: &str) -> std::result::Result<(String, Scalar), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, found '{}'", raw))?;
    Ok((key.trim().to_string(), Scalar::parse_literal(value.trim())))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let load_start = Instant::now();
    let registry = load_registry(&cli.app_path, cli.records.as_deref());
    let load_duration = load_start.elapsed();

    match cli.command {
        Command::Validate => run_validate(&registry, load_duration),
        Command::Manifest { json, out } => run_manifest(&registry, json, out),
        Command::Resolve {
            operation,
            field,
            inputs,
            prefill,
            page,
        } => {
            let mut bundle = Bundle::new().with_page(page);
            bundle.meta.prefill = prefill;
            bundle.input_data.extend(inputs);
            run_resolve(&registry, &operation, &field, &bundle);
        }
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(format!("sentaku={}", level)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_registry(app_path: &str, records_path: Option<&str>) -> OperationRegistry {
    let app = AppDefinition::from_file(app_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load app definition: {}", e)));

    let mut sources: AHashMap<String, RawSource> = match records_path {
        Some(path) => {
            let json = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read records file '{}': {}", path, e))
            });
            serde_json::from_str(&json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to parse records JSON: {}", e))
            })
        }
        None => AHashMap::new(),
    };

    let keys: Vec<String> = app
        .triggers
        .iter()
        .map(|t| t.key.clone())
        .chain(
            app.resources
                .iter()
                .filter(|r| r.list.is_some())
                .map(|r| r.key.clone()),
        )
        .collect();

    let mut builder = OperationRegistry::builder(app);
    for key in keys {
        let source = sources.remove(&key).unwrap_or_default();
        builder = builder.with_perform(&key, source.into_perform());
    }
    for unused in sources.keys() {
        eprintln!("Warning: records for '{}' match no trigger or resource", unused);
    }

    builder
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("App definition is invalid: {}", e)))
}

fn run_validate(registry: &OperationRegistry, load_duration: std::time::Duration) {
    println!("App definition is valid (loaded and checked in {:?}).", load_duration);
    println!("  Sources:        {}", registry.sources().len());
    println!("  Visible triggers: {}", registry.visible_triggers().count());
    println!("  Dynamic fields: {}", registry.dynamic_fields().len());
    for field in registry.dynamic_fields() {
        println!(
            "    {}.{} <- {}",
            field.operation_key, field.field_key, field.reference
        );
    }
}

fn run_manifest(registry: &OperationRegistry, json: bool, out: Option<String>) {
    let manifest = registry.manifest();

    if let Some(path) = out {
        manifest
            .save(&path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save manifest: {}", e)));
        println!("Manifest saved to '{}'.", path);
        return;
    }

    if json {
        let text = manifest
            .to_json()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to render manifest: {}", e)));
        println!("{}", text);
        return;
    }

    println!("| Operation | Field | Source | Value | Label | Depends on |");
    println!("|---|---|---|---|---|---|");
    for f in &manifest.fields {
        println!(
            "| `{}` | `{}` | `{}` | {} | {} | {} |",
            f.operation_key,
            f.field_key,
            f.source_key,
            f.value_field,
            f.label_field,
            f.depends_on.join(", ")
        );
    }
}

fn run_resolve(registry: &OperationRegistry, operation: &str, field: &str, bundle: &Bundle) {
    let resolver = DynamicFieldResolver::new(registry);
    let start = Instant::now();
    match resolver.resolve_field(operation, field, bundle) {
        Ok(options) => {
            println!(
                "{} option(s) for {}.{} (page {}, resolved in {:?}):",
                options.len(),
                operation,
                field,
                bundle.meta.page,
                start.elapsed()
            );
            for option in &options {
                println!("  - {}", option);
            }
        }
        Err(e) if e.is_retryable() => {
            exit_with_error(&format!("Loading the dropdown failed, try again: {}", e))
        }
        Err(e) => exit_with_error(&format!("Could not resolve dropdown: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
