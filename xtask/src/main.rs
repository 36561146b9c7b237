use anyhow::Context;
use clap::{Parser, Subcommand};
use fs_err as fs;
use patchform_types::patch::PatchType;
use patchform_types::transform::TransformType;
use std::path::{Path, PathBuf};
use std::process::Command as ProcessCommand;

const FIXTURES_DIR: &str = "tests/fixtures";

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the patch and transform type names the engine accepts.
    PrintTypes,
    /// Create a golden fixture skeleton (tests/fixtures/<name>/{request.json,input.yaml}).
    InitFixture { name: String },
    /// Bless golden fixtures (overwrite expected outputs).
    BlessFixtures,
    /// Validate every fixture's input configuration with the CLI.
    Validate,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintTypes => {
            for kind in PatchType::ALL {
                println!("patch      {}", kind.as_str());
            }
            for kind in TransformType::ALL {
                println!("transform  {}", kind.as_str());
            }
        }
        Command::InitFixture { name } => {
            let dir = Path::new(FIXTURES_DIR).join(&name);
            if dir.exists() {
                anyhow::bail!("fixture {} already exists", dir.display());
            }
            fs::create_dir_all(&dir)?;
            let request = serde_json::json!({
                "observed": { "composite": { "resource": { "spec": {} } } }
            });
            fs::write(
                dir.join("request.json"),
                format!("{}\n", serde_json::to_string_pretty(&request)?),
            )?;
            fs::write(dir.join("input.yaml"), "resources: []\n")?;
            println!("initialized {}; run `cargo run -p xtask -- bless-fixtures` once filled in", dir.display());
        }
        Command::BlessFixtures => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "patchform-core", "--test", "golden_fixtures"])
                .env("PATCHFORM_BLESS", "1")
                .status()
                .context("run golden fixture blessing")?;
            if !status.success() {
                anyhow::bail!("bless-fixtures failed");
            }
        }
        Command::Validate => {
            let inputs = fixture_inputs()?;
            for input in &inputs {
                let status = ProcessCommand::new("cargo")
                    .args(["run", "-q", "-p", "patchform-cli", "--", "validate"])
                    .arg(input)
                    .status()
                    .with_context(|| format!("run patchform validate {}", input.display()))?;
                if !status.success() {
                    anyhow::bail!("validate failed for {}", input.display());
                }
            }
            println!("{} fixture inputs valid", inputs.len());
        }
    }
    Ok(())
}

fn fixture_inputs() -> anyhow::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(FIXTURES_DIR)? {
        let input = entry?.path().join("input.yaml");
        if input.is_file() {
            inputs.push(input);
        }
    }
    inputs.sort();
    Ok(inputs)
}
