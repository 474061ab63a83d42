//! Command implementations.

use std::process::ExitCode;

use serde_json::Value;
use tracing::{debug, error, info};

use layerflow_config::Config;
use layerflow_core::{LOOKUP_ORDER, Resolver, ResolverBuilder};
use layerflow_protocols::{Category, FlowContext, Resolve, ResolveError};
use layerflow_samples::register_samples;

/// Result of a command, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Outcome {
    Success,
    Failed,
    Fatal,
}

impl Outcome {
    fn from_error(err: &ResolveError) -> Self {
        if err.is_fatal() {
            Outcome::Fatal
        } else {
            Outcome::Failed
        }
    }

    pub(crate) fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failed => ExitCode::from(1),
            Outcome::Fatal => ExitCode::from(2),
        }
    }
}

/// Category of a `[folders]` key.
fn folder_category(key: &str) -> Option<Category> {
    match key {
        "handler" => Some(Category::Handler),
        "divider" => Some(Category::Divider),
        "layer" => Some(Category::Layer),
        "layer_center" => Some(Category::LayerCenter),
        "handler_group" => Some(Category::HandlerGroup),
        "async_handler_group" => Some(Category::AsyncHandlerGroup),
        _ => None,
    }
}

/// Build a resolver over the configured folders with the sample types.
pub(crate) fn build_resolver(config: &Config) -> Result<Resolver, ResolveError> {
    let mut builder = ResolverBuilder::new()
        .registrar(register_samples)
        .eager(config.execution.eager);

    if let Some(dir) = &config.resolver.conf_dir {
        builder = builder.conf_dir(dir);
    }
    for (key, folder) in config.folders.entries() {
        if let Some(category) = folder_category(key) {
            builder = builder.category_folder(category, folder);
        }
    }

    builder.build()
}

fn build_or_report(config: &Config) -> Result<Resolver, Outcome> {
    build_resolver(config).map_err(|e| {
        error!(fatal = e.is_fatal(), "Failed to build resolver: {}", e);
        Outcome::from_error(&e)
    })
}

fn select_roots<'a>(config: &'a Config, roots: &'a [String]) -> Result<&'a [String], Outcome> {
    let roots = if roots.is_empty() {
        &config.execution.roots[..]
    } else {
        roots
    };
    if roots.is_empty() {
        error!("No roots given and execution.roots is empty");
        return Err(Outcome::Failed);
    }
    Ok(roots)
}

/// Handle each root with a fresh context seeded from `set`.
///
/// Stops at the first fatal error.
pub(crate) async fn run(config: &Config, roots: &[String], show_duration: bool, set: &[(String, Value)]) -> Outcome {
    let resolver = match build_or_report(config) {
        Ok(resolver) => resolver,
        Err(outcome) => return outcome,
    };
    let roots = match select_roots(config, roots) {
        Ok(roots) => roots,
        Err(outcome) => return outcome,
    };

    let mut outcome = Outcome::Success;
    for root in roots {
        let handler = match resolver.resolve_handler(root) {
            Ok(handler) => handler,
            Err(e) => {
                error!(root = %root, "{}", e);
                println!("{}: failed", root);
                outcome = outcome.max(Outcome::from_error(&e));
                if e.is_fatal() {
                    break;
                }
                continue;
            }
        };

        let ctx = FlowContext::new().show_duration(show_duration);
        for (key, value) in set {
            ctx.set(key.clone(), value);
        }

        let ok = handler.handle(&ctx).await;
        info!(root = %root, correlation_id = %ctx.correlation_id, ok, "Root handled");
        println!("{}: {}", root, if ok { "ok" } else { "failed" });
        for record in ctx.durations() {
            println!("  {} {:?}", record.name, record.elapsed);
        }
        if !ok {
            outcome = outcome.max(Outcome::Failed);
        }
    }
    outcome
}

/// Construct each root without handling it.
pub(crate) fn check(config: &Config, roots: &[String]) -> Outcome {
    let resolver = match build_or_report(config) {
        Ok(resolver) => resolver,
        Err(outcome) => return outcome,
    };
    let roots = match select_roots(config, roots) {
        Ok(roots) => roots,
        Err(outcome) => return outcome,
    };

    let mut outcome = Outcome::Success;
    for root in roots {
        match resolver.resolve(root) {
            Ok(instance) => {
                debug!(root = %root, ?instance, "Constructed");
                println!("{}: ok", root);
            }
            Err(e) => {
                println!("{}: failed ({})", root, e);
                outcome = outcome.max(Outcome::from_error(&e));
                if e.is_fatal() {
                    break;
                }
            }
        }
    }
    outcome
}

/// Print every indexed name with its declared type, object folder first.
pub(crate) fn list(config: &Config) -> Outcome {
    let resolver = match build_or_report(config) {
        Ok(resolver) => resolver,
        Err(outcome) => return outcome,
    };
    for line in listing(&resolver) {
        println!("{}", line);
    }
    Outcome::Success
}

fn listing(resolver: &Resolver) -> Vec<String> {
    let mut lines = Vec::new();
    for name in resolver.object_names() {
        let declared = resolver
            .declared_type(&name)
            .unwrap_or_else(|e| format!("<{}>", e));
        lines.push(format!("{}\t{}", name, declared));
    }
    for category in LOOKUP_ORDER {
        for name in resolver.indexed_names(category) {
            lines.push(format!("{}\t{} folder", name, category));
        }
    }
    lines
}
