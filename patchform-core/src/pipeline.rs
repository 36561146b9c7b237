//! The render pipeline, extracted from the CLI.
//!
//! `run_function` is a pure function of the request: environment patches run
//! first, then every template in declared order. Gating expressions are the
//! only thing delegated, through the [`ConditionEvaluator`] port.
//!
//! Configuration problems and patch failures are Fatal and discard the
//! partially assembled state. Readiness, connection details and
//! Required-missing sources degrade to Warnings.

use crate::adapters::DocumentFormat;
use crate::ports::{ConditionEvaluator, RequestSource, WritePort};
use crate::settings::EngineSettings;
use anyhow::Context;
use camino::Utf8Path;
use patchform_domain::{
    PatchError, PatchSetError, ValidationError, apply_patch, expand_resources, extract, is_ready,
    validate,
};
use patchform_paved::{FieldPath, PathError, get, set};
use patchform_types::envelope::{Diagnostic, Ready, Resource, RunRequest, RunResponse, State};
use patchform_types::input::ComposedTemplate;
use patchform_types::patch::{DocumentRole, PatchScope, PatchType};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use tracing::{debug, debug_span, warn};

/// Identity fields carried over from an observed composed resource.
const IDENTITY_PATHS: [&str; 2] = ["metadata.name", "metadata.namespace"];

/// Errors that abort a run. Each becomes a single Fatal diagnostic.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("request carries no input configuration")]
    MissingInput,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    PatchSet(#[from] PatchSetError),

    #[error("condition {expression:?}: {reason}")]
    Condition { expression: String, reason: String },

    #[error("environment under context key {key:?} is not an object")]
    Environment { key: String },

    #[error("environment patch {index} ({kind}): {source}")]
    EnvironmentPatch {
        index: usize,
        kind: PatchType,
        source: PatchError,
    },

    #[error("template {template:?} patch {index} ({kind}): {source}")]
    TemplatePatch {
        template: String,
        index: usize,
        kind: PatchType,
        source: PatchError,
    },

    #[error("template {template:?} has no base and no earlier stage produced it")]
    NoBase { template: String },

    #[error("encode state for conditions: {0}")]
    State(#[from] serde_json::Error),
}

/// Load a request through `source` and run it.
pub fn run(
    settings: &EngineSettings,
    source: &dyn RequestSource,
    evaluator: Option<&dyn ConditionEvaluator>,
) -> anyhow::Result<RunResponse> {
    let request = source.load_request()?;
    Ok(run_function(settings, evaluator, &request))
}

/// Run the engine over one request.
///
/// Never fails: errors are reported as diagnostics. On a Fatal diagnostic the
/// response carries the request's desired state and context unchanged.
pub fn run_function(
    settings: &EngineSettings,
    evaluator: Option<&dyn ConditionEvaluator>,
    request: &RunRequest,
) -> RunResponse {
    let mut response = RunResponse {
        desired: request.desired.clone(),
        context: request.context.clone(),
        ttl_seconds: settings.ttl_seconds,
        results: Vec::new(),
    };

    match render(settings, evaluator, request, &mut response.results) {
        Ok((desired, context)) => {
            response.desired = desired;
            response.context = context;
        }
        Err(e) => {
            warn!(error = %e, "run failed");
            response.results.push(Diagnostic::fatal(e.to_string()));
        }
    }
    response
}

/// Serialize `response` as `format` and write it to `path`, creating the
/// parent directory.
pub fn write_response(
    writer: &dyn WritePort,
    path: &Utf8Path,
    response: &RunResponse,
    format: DocumentFormat,
) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        writer.create_dir_all(parent)?;
    }
    let text = format.render(response)?;
    writer
        .write_file(path, text.as_bytes())
        .with_context(|| format!("write {path}"))
}

/// Documents every template reads from.
struct Sources<'a> {
    request: &'a RunRequest,
    composite: &'a Value,
    environment: &'a Value,
}

/// Documents assembled during the run.
struct Outputs {
    composite: Resource,
    environment: Value,
    resources: BTreeMap<String, Resource>,
}

fn render(
    settings: &EngineSettings,
    evaluator: Option<&dyn ConditionEvaluator>,
    request: &RunRequest,
    warnings: &mut Vec<Diagnostic>,
) -> Result<(State, Map<String, Value>), RunError> {
    let mut input = request.input.clone().ok_or(RunError::MissingInput)?;
    validate(&input)?;
    expand_resources(&mut input)?;

    let gated = input.condition.is_some() || input.resources.iter().any(|t| t.condition.is_some());
    let state = if gated {
        condition_state(request)?
    } else {
        Value::Null
    };

    if let Some(expr) = &input.condition
        && !evaluate(evaluator, expr, &state)?
    {
        debug!(condition = %expr, "run condition is false; passing desired state through");
        return Ok((request.desired.clone(), request.context.clone()));
    }

    let empty = Value::Object(Map::new());
    let observed_composite = request
        .observed
        .composite
        .as_ref()
        .map_or(&empty, |c| &c.resource);

    let mut desired = request.desired.clone();
    let mut composite = desired
        .composite
        .take()
        .unwrap_or_else(|| Resource::new(empty.clone()));
    if composite.resource.is_null() {
        composite.resource = empty.clone();
    }

    let mut environment = initial_environment(settings, request)?;
    if let Some(env) = &input.environment {
        for (index, patch) in env.patches.iter().enumerate() {
            debug!(patch_index = index, patch_type = %patch.kind, "environment patch");
            let result = match patch.kind.endpoints(PatchScope::Environment) {
                Some((DocumentRole::Composite, DocumentRole::Environment)) => {
                    apply_patch(patch, observed_composite, &mut environment)
                }
                Some((DocumentRole::Environment, DocumentRole::Composite)) => {
                    apply_patch(patch, &environment, &mut composite.resource)
                }
                _ => continue,
            };
            result.map_err(|source| RunError::EnvironmentPatch {
                index,
                kind: patch.kind,
                source,
            })?;
        }
    }

    let snapshot = environment.clone();
    let sources = Sources {
        request,
        composite: observed_composite,
        environment: &snapshot,
    };
    let mut out = Outputs {
        composite,
        environment,
        resources: std::mem::take(&mut desired.resources),
    };

    for template in &input.resources {
        let span = debug_span!("template", template = %template.name);
        let _enter = span.enter();

        if let Some(expr) = &template.condition
            && !evaluate(evaluator, expr, &state)?
        {
            debug!(condition = %expr, "template condition is false; skipping");
            continue;
        }
        render_template(settings, template, &sources, &mut out, warnings)?;
    }

    let mut context = request.context.clone();
    let env_is_empty = out.environment.as_object().is_some_and(Map::is_empty);
    if input.environment.is_some() || context.contains_key(&settings.environment_key) || !env_is_empty
    {
        context.insert(settings.environment_key.clone(), out.environment);
    }

    desired.composite = Some(out.composite);
    desired.resources = out.resources;
    Ok((desired, context))
}

fn render_template(
    settings: &EngineSettings,
    template: &ComposedTemplate,
    sources: &Sources<'_>,
    out: &mut Outputs,
    warnings: &mut Vec<Diagnostic>,
) -> Result<(), RunError> {
    let name = template.name.as_str();
    let observed = sources.request.observed.resources.get(name);
    let patch_error = |index: usize, kind: PatchType, source: PatchError| RunError::TemplatePatch {
        template: name.to_string(),
        index,
        kind,
        source,
    };

    let mut rendered = match (&template.base, out.resources.get(name)) {
        (Some(base), _) => base.clone(),
        (None, Some(prior)) => prior.resource.clone(),
        (None, None) => {
            return Err(RunError::NoBase {
                template: name.to_string(),
            });
        }
    };

    for (index, patch) in template.patches.iter().enumerate() {
        let source = match patch.kind.endpoints(PatchScope::Template) {
            Some((DocumentRole::Composite, DocumentRole::Composed)) => sources.composite,
            Some((DocumentRole::Environment, DocumentRole::Composed)) => sources.environment,
            _ => continue,
        };
        debug!(patch_index = index, patch_type = %patch.kind, "patch into template");
        match apply_patch(patch, source, &mut rendered) {
            Ok(_) => {}
            Err(e) if e.is_not_found() && observed.is_none() => {
                push_warning(
                    warnings,
                    format!(
                        "not rendering template {name:?}: patch {index} ({}) requires a missing source: {e}",
                        patch.kind
                    ),
                );
                return Ok(());
            }
            Err(e) if e.is_not_found() => push_warning(
                warnings,
                format!("template {name:?} patch {index} ({}) skipped: {e}", patch.kind),
            ),
            Err(e) => return Err(patch_error(index, patch.kind, e)),
        }
    }

    let to_source = observed.map_or(&rendered, |r| &r.resource);
    for (index, patch) in template.patches.iter().enumerate() {
        let target = match patch.kind.endpoints(PatchScope::Template) {
            Some((DocumentRole::Composed, DocumentRole::Composite)) => &mut out.composite.resource,
            Some((DocumentRole::Composed, DocumentRole::Environment)) => &mut out.environment,
            _ => continue,
        };
        debug!(patch_index = index, patch_type = %patch.kind, "patch from template");
        match apply_patch(patch, to_source, target) {
            Ok(_) => {}
            Err(e) if e.is_not_found() => push_warning(
                warnings,
                format!("template {name:?} patch {index} ({}) skipped: {e}", patch.kind),
            ),
            Err(e) => return Err(patch_error(index, patch.kind, e)),
        }
    }

    let mut ready = Ready::Unspecified;
    if let Some(observed) = observed {
        let extracted = extract(
            &template.connection_details,
            &observed.resource,
            &observed.connection_details,
        );
        for e in extracted.errors {
            push_warning(warnings, format!("template {name:?} connection detail: {e}"));
        }
        out.composite.connection_details.extend(extracted.details);

        ready = match is_ready(&template.readiness_checks, &observed.resource) {
            Ok(true) => Ready::True,
            Ok(false) => Ready::False,
            Err(e) => {
                push_warning(warnings, format!("template {name:?} readiness: {e}"));
                Ready::False
            }
        };

        if settings.preserve_identity
            && let Err(e) = preserve_identity(&observed.resource, &mut rendered)
        {
            push_warning(warnings, format!("template {name:?} identity: {e}"));
        }
    }

    debug!(ready = ?ready, "rendered");
    out.resources.insert(
        name.to_string(),
        Resource {
            resource: rendered,
            connection_details: Default::default(),
            ready,
        },
    );
    Ok(())
}

fn preserve_identity(observed: &Value, rendered: &mut Value) -> Result<(), PathError> {
    for path in IDENTITY_PATHS {
        let path = FieldPath::parse(path)?;
        match get(observed, &path) {
            Ok(v) => set(rendered, &path, v.clone())?,
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn initial_environment(settings: &EngineSettings, request: &RunRequest) -> Result<Value, RunError> {
    match request.context.get(&settings.environment_key) {
        None | Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(v @ Value::Object(_)) => Ok(v.clone()),
        Some(_) => Err(RunError::Environment {
            key: settings.environment_key.clone(),
        }),
    }
}

fn condition_state(request: &RunRequest) -> Result<Value, serde_json::Error> {
    Ok(json!({
        "observed": serde_json::to_value(&request.observed)?,
        "desired": serde_json::to_value(&request.desired)?,
    }))
}

fn evaluate(
    evaluator: Option<&dyn ConditionEvaluator>,
    expression: &str,
    state: &Value,
) -> Result<bool, RunError> {
    let fail = |reason: String| RunError::Condition {
        expression: expression.to_string(),
        reason,
    };
    let evaluator = evaluator.ok_or_else(|| fail("no condition evaluator configured".to_string()))?;
    match evaluator.evaluate(expression, state) {
        Ok(Value::Bool(b)) => Ok(b),
        Ok(other) => Err(fail(format!("expected a bool, got {other}"))),
        Err(e) => Err(fail(format!("{e:#}"))),
    }
}

fn push_warning(warnings: &mut Vec<Diagnostic>, message: String) {
    warn!("{message}");
    warnings.push(Diagnostic::warning(message));
}
