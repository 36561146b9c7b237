mod catalog;
mod config;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::{ConfigMerger, OutputFormat, RenderOverrides};
use patchform_core::adapters::{FsRequestSource, FsWritePort, PathConditionEvaluator, load_document};
use patchform_core::{run, write_response};
use patchform_types::input::Resources;
use patchform_types::patch::PatchType;
use std::io::Write;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "patchform",
    version,
    about = "Render composed resources from patch-and-transform templates."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the engine over a request and print or write the response.
    Render(RenderArgs),
    /// Validate an input configuration without rendering anything.
    Validate(ValidateArgs),
    /// List the transform and patch types the engine understands.
    ListTransforms(ListArgs),
    /// Describe a transform or patch type.
    Explain(ExplainArgs),
}

#[derive(Debug, Parser)]
struct RenderArgs {
    /// Request document (JSON, or YAML by extension).
    #[arg(long)]
    request: Utf8PathBuf,

    /// Input configuration; replaces any input embedded in the request.
    #[arg(long)]
    input: Option<Utf8PathBuf>,

    /// Write the response here instead of stdout.
    #[arg(long)]
    out: Option<Utf8PathBuf>,

    /// Response encoding (default: config file, then --out extension, then json).
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Cache lifetime reported in the response.
    #[arg(long)]
    ttl_seconds: Option<u64>,

    /// Context key holding the environment document.
    #[arg(long)]
    environment_key: Option<String>,

    /// Do not copy observed names onto rendered resources.
    #[arg(long, default_value_t = false)]
    no_preserve_identity: bool,

    /// Directory searched for patchform.toml (default: current directory).
    #[arg(long, default_value = ".")]
    config_dir: Utf8PathBuf,
}

#[derive(Debug, Parser)]
struct ValidateArgs {
    /// Input configuration (JSON, or YAML by extension).
    input: Utf8PathBuf,
}

#[derive(Debug, Parser)]
struct ListArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: ListFormat,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Transform type (e.g. "math") or patch type (e.g. "FromCompositeFieldPath").
    name: String,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ListFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Validate(args) => cmd_validate(args).map(|()| ExitCode::SUCCESS),
        Command::ListTransforms(args) => cmd_list_transforms(args).map(|()| ExitCode::SUCCESS),
        Command::Explain(args) => cmd_explain(args).map(|()| ExitCode::SUCCESS),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<ExitCode> {
    let file_config = config::load_or_default(&args.config_dir).context("load patchform.toml")?;
    let merged = ConfigMerger::new(file_config).merge_render_args(RenderOverrides {
        ttl_seconds: args.ttl_seconds,
        environment_key: args.environment_key,
        no_preserve_identity: args.no_preserve_identity,
        format: args.format,
        out: args.out.as_deref(),
    });
    debug!(
        "merged config: ttl_seconds={}, environment_key={}, preserve_identity={}, format={:?}",
        merged.settings.ttl_seconds,
        merged.settings.environment_key,
        merged.settings.preserve_identity,
        merged.format
    );

    let source = FsRequestSource::new(args.request, args.input);
    let response = run(&merged.settings, &source, Some(&PathConditionEvaluator))?;

    match &args.out {
        Some(path) => {
            write_response(&FsWritePort, path, &response, merged.format)?;
            info!("wrote response to {}", path);
        }
        None => {
            let text = merged.format.render(&response)?;
            std::io::stdout()
                .write_all(text.as_bytes())
                .context("write response to stdout")?;
        }
    }

    for d in &response.results {
        debug!(severity = ?d.severity, "{}", d.message);
    }
    if response.is_fatal() {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let mut input: Resources = load_document(&args.input)?;
    patchform_domain::validate(&input)
        .with_context(|| format!("validate {}", args.input))?;
    patchform_domain::expand_resources(&mut input)
        .with_context(|| format!("expand patch sets in {}", args.input))?;

    let patches: usize = input.resources.iter().map(|t| t.patches.len()).sum();
    println!(
        "{}: ok ({} templates, {} patches after patch-set expansion)",
        args.input,
        input.resources.len(),
        patches
    );
    Ok(())
}

fn cmd_list_transforms(args: ListArgs) -> anyhow::Result<()> {
    use catalog::{TRANSFORM_REGISTRY, patch_type_summary};

    match args.format {
        ListFormat::Text => {
            println!("Transforms:\n");
            println!("  {:<10} {:<20} VARIANTS", "TYPE", "TITLE");
            println!("  {:<10} {:<20} --------", "----", "-----");
            for t in TRANSFORM_REGISTRY {
                println!(
                    "  {:<10} {:<20} {}",
                    t.kind.as_str(),
                    t.title,
                    t.variants.join(", ")
                );
            }
            println!("\nPatch types:\n");
            for kind in PatchType::ALL {
                println!("  {:<24} {}", kind.as_str(), patch_type_summary(kind));
            }
            println!();
            println!("Use 'patchform explain <type>' for details.");
        }
        ListFormat::Json => {
            let transforms: Vec<_> = TRANSFORM_REGISTRY
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "type": t.kind.as_str(),
                        "title": t.title,
                        "variants": t.variants,
                    })
                })
                .collect();
            let patches: Vec<_> = PatchType::ALL
                .iter()
                .map(|k| {
                    serde_json::json!({
                        "type": k.as_str(),
                        "summary": patch_type_summary(*k),
                    })
                })
                .collect();
            let out = serde_json::json!({ "transforms": transforms, "patchTypes": patches });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    use catalog::{lookup_patch_type, lookup_transform, patch_type_summary};

    if let Some(t) = lookup_transform(&args.name) {
        println!("TRANSFORM: {} ({})", t.kind.as_str(), t.title);
        println!("--------------------------------------------------------------------------------");
        println!("{}", t.description);
        if !t.variants.is_empty() {
            println!();
            println!("Variants: {}", t.variants.join(", "));
        }
        return Ok(());
    }

    if let Some(kind) = lookup_patch_type(&args.name) {
        println!("PATCH TYPE: {}", kind.as_str());
        println!("--------------------------------------------------------------------------------");
        println!("{}", patch_type_summary(kind));
        return Ok(());
    }

    anyhow::bail!(
        "Unknown transform or patch type: '{}'\n\nRun 'patchform list-transforms' for the full list.",
        args.name
    )
}
