//! # Fuzzy Risk — CLI
//!
//! **Ponto de entrada** da linha de comando. Carrega um motor (o preset de
//! risco de projeto ou um arquivo JSON), avalia uma vez e imprime o
//! resultado.
//!
//! ## Fluxo
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging (RUST_LOG, padrão "info")
//!   ├── Motor: --config FILE ou presets::project_risk()
//!   ├── Opcional: --export FILE (grava a configuração efetiva)
//!   ├── Entradas: padrões (funding=25, staffing=55) sobrescritos por -i
//!   └── evaluate / explain → stdout
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! fuzzy-risk
//! # Result: Risk is = 19.67
//!
//! fuzzy-risk -i project_funding=80 -i project_staffing=20 --explain
//! fuzzy-risk --config data/project_risk.json --json
//! RUST_LOG=fuzzy_risk=trace fuzzy-risk
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fuzzy_risk::{persistence, presets, Engine};

/// Entradas usadas quando `-i` não informa o valor.
const DEFAULT_INPUTS: &[(&str, f64)] = &[("project_funding", 25.0), ("project_staffing", 55.0)];

/// Avalia um motor de inferência fuzzy Mamdani
#[derive(Parser)]
#[command(name = "fuzzy-risk")]
#[command(about = "Mamdani fuzzy inference: project risk and custom rule bases", long_about = None)]
#[command(version)]
struct Cli {
    /// Engine configuration file (JSON); defaults to the project-risk preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Crisp input value, repeatable
    #[arg(short, long = "input", value_name = "NAME=VALUE", value_parser = parse_input)]
    inputs: Vec<(String, f64)>,

    /// Print fuzzified inputs and rule firing strengths
    #[arg(short, long)]
    explain: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Write the effective engine configuration to FILE
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,
}

fn parse_input(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("esperado NAME=VALUE, recebido '{}'", s))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("valor inválido para '{}': {}", name.trim(), e))?;
    Ok((name.trim().to_string(), value))
}

/// Padrões para as entradas que o motor conhece, sobrescritos por `-i`.
fn collect_inputs(engine: &Engine, overrides: Vec<(String, f64)>) -> BTreeMap<String, f64> {
    let mut inputs: BTreeMap<String, f64> = DEFAULT_INPUTS
        .iter()
        .filter(|(name, _)| engine.input_variable(name).is_some())
        .map(|(name, value)| (name.to_string(), *value))
        .collect();
    inputs.extend(overrides);
    inputs
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let engine = match &cli.config {
        Some(path) => persistence::load_engine(path)?,
        None => presets::project_risk().context("Falha ao montar o preset de risco de projeto")?,
    };
    tracing::debug!(engine = %engine.name(), "Motor pronto");

    if let Some(path) = &cli.export {
        persistence::save_config(path, &engine.to_config())?;
    }

    let inputs = collect_inputs(&engine, cli.inputs);
    let pairs = inputs.iter().map(|(k, v)| (k.as_str(), *v));

    if cli.explain {
        let explanation = engine.explain(pairs).context("Falha na avaliação")?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&explanation)?);
        } else {
            print!("{}", explanation);
        }
        return Ok(());
    }

    let outputs = engine.evaluate(pairs).context("Falha na avaliação")?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    } else {
        for (name, value) in &outputs {
            println!("Result: {} is = {:.2}", capitalize(name), value);
        }
    }
    Ok(())
}
