//! Pipeline orchestration: sequential execution, synthesis, aggregation,
//! linting and gated persistence.

use crate::error::{ExchangeError, PipelineError};
use futures::future::BoxFuture;
use serde::Deserialize;
use specwitness_core::ExchangeResult;
use specwitness_openapi::{
    aggregate, synthesize_with_version, AggregateConfig, AggregateDocument, Diagnostic, Fragment,
    Linter, OpenApiVersion, Server,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One deferred exchange: a zero-argument asynchronous task producing a
/// validated result or a classified failure.
pub type ExchangeTask = BoxFuture<'static, Result<ExchangeResult, ExchangeError>>;

/// Global configuration for one pipeline run.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Document title, doubling as the persistence destination: an absolute
    /// path is used as-is, anything else is joined under the current
    /// working directory.
    pub name: String,
    #[serde(default)]
    pub default_servers: Vec<Server>,
    #[serde(default)]
    pub version: OpenApiVersion,
}

impl PipelineConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_servers: Vec::new(),
            version: OpenApiVersion::default(),
        }
    }
}

/// Everything one run produced, returned to the caller even when the run
/// failed so a full report can be rendered.
#[derive(Debug)]
pub struct PipelineReport {
    pub fragments: Vec<Fragment>,
    pub errors: Vec<ExchangeError>,
    pub diagnostics: Vec<Diagnostic>,
    pub failed: bool,
    pub document: AggregateDocument,
}

/// Runs exchange tasks sequentially and gates persistence on a fully clean
/// outcome: zero exchange errors and zero lint diagnostics.
pub struct Pipeline {
    linter: Linter,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            linter: Linter::default(),
        }
    }

    pub fn with_linter(linter: Linter) -> Self {
        Self { linter }
    }

    /// Run the whole pipeline over `tasks`, in the order supplied.
    ///
    /// Task failures are accumulated and never halt the batch; the document
    /// reflects whatever succeeded. Persistence happens only on a clean run
    /// and its failures propagate instead of being swallowed.
    pub async fn run(
        &self,
        config: PipelineConfig,
        tasks: Vec<ExchangeTask>,
    ) -> Result<PipelineReport, PipelineError> {
        let mut fragments: Vec<Fragment> = Vec::new();
        let mut errors: Vec<ExchangeError> = Vec::new();

        // Strictly sequential: merge order must equal submission order.
        for (index, task) in tasks.into_iter().enumerate() {
            match task.await {
                Ok(result) => match synthesize_with_version(&result, config.version) {
                    Ok(fragment) => fragments.push(fragment),
                    Err(err) => {
                        warn!(index, error = %err, "fragment synthesis failed");
                        errors.push(ExchangeError::Synthesis(err.to_string()));
                    }
                },
                Err(err) => {
                    warn!(index, error = %err, "exchange failed");
                    errors.push(err);
                }
            }
        }

        let document = aggregate(
            &fragments,
            &AggregateConfig {
                title: config.name.clone(),
                default_servers: config.default_servers.clone(),
                version: config.version,
            },
        )?;
        let diagnostics = self.linter.lint(document.yaml())?;

        let failed = !errors.is_empty() || !diagnostics.is_empty();
        if failed {
            info!(
                errors = errors.len(),
                diagnostics = diagnostics.len(),
                "run not clean, skipping persistence"
            );
        } else {
            let destination = resolve_destination(&config.name);
            tokio::fs::write(&destination, document.yaml())
                .await
                .map_err(|source| PipelineError::Persistence {
                    path: destination.clone(),
                    source,
                })?;
            info!(path = %destination.display(), "specification written");
        }

        Ok(PipelineReport {
            fragments,
            errors,
            diagnostics,
            failed,
            document,
        })
    }
}

fn resolve_destination(name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
