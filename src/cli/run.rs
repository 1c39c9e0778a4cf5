use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use epistola_core::{
    write_records, CorrespondentPolicy, FailurePolicy, HttpGenerator, Pipeline, PipelineConfig,
};

use super::RunArgs;

pub async fn run(args: RunArgs) -> Result<()> {
    let config = resolve_config(args)?;

    let generator = HttpGenerator::new(
        &config.endpoint,
        Duration::from_secs(config.request_timeout_secs),
    )
    .with_context(|| format!("invalid model endpoint {}", config.endpoint))?;
    tracing::info!(endpoint = %generator.endpoint(), "using model server");

    let paths = Pipeline::discover(&config.input_dir, &config.pattern)?;
    if paths.is_empty() {
        tracing::warn!(
            dir = %config.input_dir.display(),
            pattern = %config.pattern,
            "no input documents found"
        );
    }

    let pipeline = Pipeline::from_config(&config, Arc::new(generator));
    let output = pipeline.run(&paths).await?;

    write_records(&config.output, &output.records).await?;

    eprintln!(
        "Processed {} of {} documents -> {}",
        output.success_count(),
        paths.len(),
        config.output.display()
    );
    for (path, error) in &output.failed {
        eprintln!("  Skipped {}: {error}", path.display());
    }

    Ok(())
}

fn resolve_config(args: RunArgs) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::from_env()?;

    if let Some(input) = args.input {
        config.input_dir = input;
    }
    if let Some(pattern) = args.pattern {
        config.pattern = pattern;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if args.fail_fast {
        config.failure_policy = FailurePolicy::Abort;
    }
    if args.keep_partial_correspondents {
        config.correspondent_policy = CorrespondentPolicy::KeepAvailable;
    }

    config.validate()?;
    Ok(config)
}
