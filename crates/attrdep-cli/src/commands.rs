use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, ensure};
use tracing::{debug, info, info_span};

use attrdep_io::{
    CodecOptions, export_mappings, import_mappings, load_dependencies, load_dependency,
    load_schema_provider, save_dependency,
};
use attrdep_model::Schema;
use attrdep_validate::{SeverityPolicy, ValidationReport, validate_all};

use crate::cli::{CheckArgs, ExportArgs, ImportArgs, ShowArgs, TableArgs};
use crate::summary::render_schema;

/// Environment variable naming the default schema document.
pub const SCHEMA_ENV_VAR: &str = "ATTRDEP_SCHEMA";

/// Outcome of `check`.
#[derive(Debug)]
pub struct CheckResult {
    pub reports: Vec<ValidationReport>,
    pub policy: Option<SeverityPolicy>,
}

impl CheckResult {
    pub fn policy(&self) -> Option<&SeverityPolicy> {
        self.policy.as_ref()
    }

    pub fn has_errors(&self) -> bool {
        self.reports
            .iter()
            .any(|report| report.has_errors(self.policy()))
    }
}

/// Schema path from the flag, else from `ATTRDEP_SCHEMA`.
pub fn resolve_schema_path(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    std::env::var_os(SCHEMA_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("no schema document given (use --schema or set {SCHEMA_ENV_VAR})"))
}

fn codec_options(table: TableArgs) -> CodecOptions {
    CodecOptions {
        delimiter: table.delimiter.map(Into::into),
        culture: table.culture,
    }
}

pub fn run_check(args: &CheckArgs) -> Result<CheckResult> {
    let schema_path = resolve_schema_path(args.schema.as_deref())?;
    let provider = load_schema_provider(&schema_path)
        .with_context(|| format!("load schema {}", schema_path.display()))?;
    let mut dependencies = load_dependencies(&args.dependency)
        .with_context(|| format!("load rule sets {}", args.dependency.display()))?;

    if let Some(path) = &args.mappings {
        ensure!(
            dependencies.len() == 1,
            "--mappings needs a document with exactly one rule set, found {}",
            dependencies.len()
        );
        let options = codec_options(args.table);
        for dependency in &mut dependencies {
            import_mappings(dependency, path, &options)
                .with_context(|| format!("read mappings {}", path.display()))?;
        }
    }

    let span = info_span!("check", rule_sets = dependencies.len());
    let _guard = span.enter();
    let reports = validate_all(&dependencies, &provider);
    debug!(
        findings = reports.iter().map(ValidationReport::len).sum::<usize>(),
        "validation finished"
    );

    Ok(CheckResult {
        reports,
        policy: args.strict.then(SeverityPolicy::strict),
    })
}

pub fn run_export(args: &ExportArgs) -> Result<usize> {
    let dependency = load_dependency(&args.dependency)
        .with_context(|| format!("load rule set {}", args.dependency.display()))?;
    let options = CodecOptions {
        delimiter: args.delimiter.map(Into::into),
        ..CodecOptions::default()
    };
    export_mappings(&dependency, &args.output, &options)
        .with_context(|| format!("write mappings {}", args.output.display()))?;
    Ok(dependency.mappings.len())
}

pub fn run_import(args: &ImportArgs) -> Result<usize> {
    let mut dependency = load_dependency(&args.dependency)
        .with_context(|| format!("load rule set {}", args.dependency.display()))?;
    let count = import_mappings(&mut dependency, &args.input, &codec_options(args.table))
        .with_context(|| format!("read mappings {}", args.input.display()))?;

    let output = args.output.as_deref().unwrap_or(&args.dependency);
    save_dependency(&dependency, output)
        .with_context(|| format!("write rule set {}", output.display()))?;
    info!(output = %output.display(), mappings = count, "rule set updated");
    Ok(count)
}

pub fn run_show(args: &ShowArgs) -> Result<String> {
    let schema_path = resolve_schema_path(args.schema.as_deref())?;
    let provider = load_schema_provider(&schema_path)
        .with_context(|| format!("load schema {}", schema_path.display()))?;
    let schema = provider.get(&args.dataset).ok_or_else(|| {
        let known: Vec<&str> = provider.schemas().map(Schema::dataset_name).collect();
        anyhow!(
            "dataset '{}' not found in {} (datasets: {})",
            args.dataset,
            schema_path.display(),
            known.join(", ")
        )
    })?;
    Ok(render_schema(schema))
}
