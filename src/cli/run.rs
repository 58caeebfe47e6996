//! CLI command dispatch and execution

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};

use casegen_config::{Config, ConfigError};
use casegen_engine::{GenerationOutcome, Generator, GeneratorOptions};
use casegen_llm::LlmError;
use casegen_model::{Quota, TestCaseRecord};

use super::args::{Cli, Commands};

/// Parse arguments, execute the selected command, and map failures to
/// process exit codes. All output, including errors, happens here; `main`
/// only exits.
pub fn run() -> Result<(), i32> {
    let cli = Cli::parse();

    // A second init (e.g. under test harnesses) is harmless
    let _ = crate::logging::init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            ref input,
            positive,
            negative,
            edge,
            ref output,
            ref output_dir,
            json,
            no_output_file,
        } => cmd_generate(
            cli.config.as_deref(),
            input.as_deref(),
            (positive, negative, edge),
            output.as_deref(),
            output_dir,
            json,
            no_output_file,
        ),
        Commands::Doctor { json } => cmd_doctor(cli.config.as_deref(), json),
    };

    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            eprintln!("error: {err:#}");
            Err(exit_code_for(&err))
        }
    }
}

/// Exit code mapping: configuration problems are 2, everything else is 1.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ConfigError>().is_some() {
        return 2;
    }
    if matches!(
        err.downcast_ref::<LlmError>(),
        Some(LlmError::Misconfiguration(_) | LlmError::Unsupported(_))
    ) {
        return 2;
    }
    1
}

#[allow(clippy::too_many_arguments)]
fn cmd_generate(
    config_path: Option<&Path>,
    input: Option<&Path>,
    (positive, negative, edge): (Option<u32>, Option<u32>, Option<u32>),
    output: Option<&Path>,
    output_dir: &Path,
    json: bool,
    no_output_file: bool,
) -> anyhow::Result<()> {
    let requirement = read_requirement(input)?;
    if requirement.trim().is_empty() {
        bail!("requirement text is empty; provide it via --input or stdin");
    }

    let config = casegen_config::discover(config_path)?;
    let quota = resolve_quota(&config, positive, negative, edge);
    if quota.total() == 0 {
        bail!("requested quota is zero; raise --positive, --negative, or --edge");
    }

    let (backend, fallback_info) = casegen_llm::from_config_with_fallback(&config)?;
    if let Some(info) = fallback_info {
        warn!("{}", info.warning_message());
    }

    let generator = Generator::new(backend, options_from_config(&config));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let outcome = runtime.block_on(generator.generate(&requirement, &quota))?;

    match outcome {
        GenerationOutcome::Records(records) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_records(&records);
            }

            if !no_output_file {
                let path = write_records(&records, output, output_dir)?;
                info!(path = %path.display(), records = records.len(), "Saved test cases");
            }
            Ok(())
        }
        GenerationOutcome::Unparsed(raw) => {
            // Surface the raw text so the caller has something inspectable
            println!("{raw}");
            Err(anyhow!(
                "no structured test cases could be parsed from the provider; raw output shown above"
            ))
        }
    }
}

fn read_requirement(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read requirement file {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read requirement from stdin")?;
            Ok(text)
        }
    }
}

/// Quota precedence: CLI flags > config `[defaults]` > built-in 3/2/1.
fn resolve_quota(
    config: &Config,
    positive: Option<u32>,
    negative: Option<u32>,
    edge: Option<u32>,
) -> Quota {
    Quota::new(
        positive.or(config.defaults.positive).unwrap_or(3),
        negative.or(config.defaults.negative).unwrap_or(2),
        edge.or(config.defaults.edge).unwrap_or(1),
    )
}

fn options_from_config(config: &Config) -> GeneratorOptions {
    let mut options = GeneratorOptions::default();
    if let Some(temperature) = config.defaults.temperature {
        options.temperature = temperature;
    }
    if let Some(max_output_tokens) = config.defaults.max_output_tokens {
        options.max_output_tokens = max_output_tokens;
    }
    options
}

/// Render records as indented blocks, one per record, in the fixed column
/// order.
fn print_records(records: &[TestCaseRecord]) {
    for (index, record) in records.iter().enumerate() {
        let category = if record.category.is_empty() {
            String::new()
        } else {
            format!(" [{}]", record.category)
        };
        println!("#{}{} {}", index + 1, category, record.functionality);

        let row = record.to_row();
        for (name, value) in TestCaseRecord::COLUMNS.iter().zip(row.iter()).skip(1) {
            if value.is_empty() {
                continue;
            }
            let mut lines = value.lines();
            if let Some(first) = lines.next() {
                println!("  {name}: {first}");
            }
            for line in lines {
                println!("    {line}");
            }
        }
        println!();
    }
}

fn write_records(
    records: &[TestCaseRecord],
    output: Option<&Path>,
    output_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
            output_dir.join(format!("testcases_{timestamp}.json"))
        }
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }

    let contents = serde_json::to_string_pretty(records)?;
    std::fs::write(&path, contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

struct DoctorCheck {
    name: &'static str,
    ok: bool,
    detail: String,
}

fn cmd_doctor(config_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let mut checks = Vec::new();

    let config = match casegen_config::discover(config_path) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config",
                ok: true,
                detail: "configuration loaded".to_string(),
            });
            config
        }
        Err(err) => {
            checks.push(DoctorCheck {
                name: "config",
                ok: false,
                detail: err.to_string(),
            });
            Config::default()
        }
    };

    let provider = config
        .llm
        .provider
        .clone()
        .unwrap_or_else(|| "openrouter".to_string());
    checks.push(DoctorCheck {
        name: "provider",
        ok: true,
        detail: provider.clone(),
    });

    let (key_env, model) = match provider.as_str() {
        "anthropic" => (
            config
                .llm
                .anthropic
                .as_ref()
                .and_then(|a| a.api_key_env.clone())
                .unwrap_or_else(|| "ANTHROPIC_API_KEY".to_string()),
            config.llm.anthropic.as_ref().and_then(|a| a.model.clone()),
        ),
        _ => (
            config
                .llm
                .openrouter
                .as_ref()
                .and_then(|or| or.api_key_env.clone())
                .unwrap_or_else(|| "OPENROUTER_API_KEY".to_string()),
            config.llm.openrouter.as_ref().and_then(|or| or.model.clone()),
        ),
    };

    let key_present = std::env::var(&key_env).is_ok();
    checks.push(DoctorCheck {
        name: "api_key",
        ok: key_present,
        detail: if key_present {
            format!("{key_env} is set")
        } else {
            format!("{key_env} is not set")
        },
    });

    checks.push(DoctorCheck {
        name: "model",
        ok: model.is_some(),
        detail: model.unwrap_or_else(|| "no model configured".to_string()),
    });

    let ok = checks.iter().all(|check| check.ok);

    if json {
        let payload = serde_json::json!({
            "ok": ok,
            "checks": checks
                .iter()
                .map(|check| {
                    serde_json::json!({
                        "name": check.name,
                        "ok": check.ok,
                        "detail": check.detail,
                    })
                })
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        for check in &checks {
            let marker = if check.ok { "✓" } else { "✗" };
            println!("{marker} {}: {}", check.name, check.detail);
        }
    }

    if ok {
        Ok(())
    } else {
        Err(anyhow!("one or more doctor checks failed"))
    }
}
