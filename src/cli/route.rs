//! CLI route: single route table and run context. Dispatches to engine services and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_health, format_resolved, format_snapshot_json, format_snapshot_text, format_split_json,
    format_split_text,
};
use crate::config::{ConfigLoader, WhenConfig};
use crate::context::{resolve_context_markers, InMemoryContextStore};
use crate::error::{ApiError, PolicyError};
use crate::registry::ElementNode;
use crate::session::{ScriptedEvent, Session};
use crate::splitter::{strip_outer_parens, try_split_arguments};
use crate::submit::{HttpSubmitter, PolicySubmitter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace root and the effective configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: WhenConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };

        Ok(Self {
            workspace_root,
            config: config.validated()?,
        })
    }

    /// Run context over an already-built configuration
    pub fn with_config(workspace_root: PathBuf, config: WhenConfig) -> Self {
        Self {
            workspace_root,
            config,
        }
    }

    pub fn config(&self) -> &WhenConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let result = self.execute_inner(command);
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Split { args, format } => self.handle_split(args, format),
            Commands::Resolve { policy, context } => self.handle_resolve(policy, context),
            Commands::Replay {
                tree,
                events,
                format,
                live,
            } => self.handle_replay(tree.as_deref(), events, format, *live),
            Commands::Config => self.config.to_toml_string(),
            Commands::Health => self.handle_health(),
        }
    }

    fn handle_split(&self, args: &str, format: &str) -> Result<String, ApiError> {
        let (tokens, unbalanced_at) = match try_split_arguments(strip_outer_parens(args)) {
            Ok(tokens) => (tokens, None),
            Err(PolicyError::UnbalancedBrackets {
                position, partial, ..
            }) => (partial, Some(position)),
            Err(other) => return Err(other.into()),
        };
        match format {
            "json" => Ok(format_split_json(&tokens, unbalanced_at)),
            "text" => Ok(format_split_text(&tokens, unbalanced_at)),
            other => Err(invalid_format(other)),
        }
    }

    fn handle_resolve(
        &self,
        policy: &str,
        context: &[(String, String)],
    ) -> Result<String, ApiError> {
        let store = InMemoryContextStore::with_entries(context.iter().cloned());
        let resolved = resolve_context_markers(policy, &store, &self.config.resolver)?;
        Ok(format_resolved(&resolved))
    }

    fn handle_replay(
        &self,
        tree: Option<&Path>,
        events: &Path,
        format: &str,
        live: bool,
    ) -> Result<String, ApiError> {
        if format != "text" && format != "json" {
            return Err(invalid_format(format));
        }
        let script = ScriptedEvent::load_script(&self.resolve_path(events))?;
        debug!(events = script.len(), live, "Replaying event script");

        let snapshot = if live {
            let runtime = new_runtime()?;
            let http = HttpSubmitter::new(&self.config.backend, None, runtime.handle().clone())?;
            let root = match tree {
                Some(path) => ElementNode::from_path(&self.resolve_path(path))?,
                None => {
                    debug!(backend = %http.base_url(), "Fetching element tree");
                    runtime.block_on(http.fetch_tree())?
                }
            };
            let mut attached: Option<Arc<HttpSubmitter>> = None;
            let session = Session::with_submitter(&root, self.config.resolver, |context| {
                let submitter = Arc::new(http.with_context(context));
                attached = Some(Arc::clone(&submitter));
                submitter as Arc<dyn PolicySubmitter>
            });
            session.replay(&script);
            if let Some(submitter) = attached {
                runtime.block_on(submitter.flush());
            }
            session.snapshot()
        } else {
            let path = tree.ok_or_else(|| {
                ApiError::ConfigError("--tree is required unless --live is set".to_string())
            })?;
            let root = ElementNode::from_path(&self.resolve_path(path))?;
            let session = Session::from_tree(&root, self.config.resolver);
            session.replay(&script);
            session.snapshot()
        };

        Ok(match format {
            "json" => format_snapshot_json(&snapshot),
            _ => format_snapshot_text(&snapshot),
        })
    }

    fn handle_health(&self) -> Result<String, ApiError> {
        let runtime = new_runtime()?;
        let client = HttpSubmitter::new(&self.config.backend, None, runtime.handle().clone())?;
        let body = runtime.block_on(client.health())?;
        Ok(format_health(client.base_url(), &body))
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        }
    }
}

fn new_runtime() -> Result<Runtime, ApiError> {
    Runtime::new().map_err(|e| ApiError::ConfigError(format!("Failed to create runtime: {}", e)))
}

fn invalid_format(format: &str) -> ApiError {
    ApiError::ConfigError(format!(
        "Invalid output format: {} (must be 'text' or 'json')",
        format
    ))
}
