use std::path::Path;

use anyhow::{Context, bail};
use form_config::ValidationConfig;
use form_schema::{SchemaError, Violation, validate_value};
use serde::Serialize;
use serde_json::Value;

use crate::cli::{CheckArgs, GlobalFlags};
use crate::output::output;

/// Outcome of one `check` run.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

/// Handle `formctl check`.
pub async fn handle(
    args: &CheckArgs,
    flags: &GlobalFlags,
    config: &ValidationConfig,
) -> anyhow::Result<()> {
    let schema = read_json(&args.schema)?;
    let instance = read_json(&args.instance)?;
    let report = run(schema, instance, config).await?;

    if !(flags.quiet && report.valid) {
        output(&report, flags.format)?;
    }
    if !report.valid {
        bail!(
            "{} does not satisfy {} ({} violation(s))",
            args.instance.display(),
            args.schema.display(),
            report.violations.len()
        );
    }
    Ok(())
}

/// Validate `instance`, turning engine rejections into a report. Any other
/// failure (unusable schema, task failure) is an error.
pub async fn run(
    schema: Value,
    instance: Value,
    config: &ValidationConfig,
) -> anyhow::Result<CheckReport> {
    match validate_value(schema, instance, config).await {
        Ok(value) => Ok(CheckReport {
            valid: true,
            value: Some(value),
            violations: Vec::new(),
        }),
        Err(SchemaError::ValidationFailed { violations }) => {
            tracing::debug!(count = violations.len(), "check failed");
            Ok(CheckReport {
                valid: false,
                value: None,
                violations,
            })
        }
        Err(error) => Err(error).context("validation did not run"),
    }
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}
