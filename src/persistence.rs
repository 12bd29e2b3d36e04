//! # Persistência — Configuração do Motor em Disco
//!
//! Lê e grava [`EngineConfig`] como JSON "pretty-printed" para facilitar
//! inspeção e edição manual.
//!
//! Os erros aqui são de **borda de aplicação** (arquivo ausente, JSON
//! corrompido, regra inválida no arquivo) e usam `anyhow` com contexto,
//! diferente dos erros tipados da biblioteca.
//!
//! ## ⚠️ Atomicidade
//!
//! A escrita **não é atômica** — crash durante a escrita pode corromper
//! o arquivo.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::EngineConfig;
use crate::engine::Engine;

/// Lê uma configuração JSON.
///
/// # Erros
///
/// Retorna erro se o arquivo não puder ser lido ou não for um
/// `EngineConfig` válido.
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Falha ao ler {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&json)
        .with_context(|| format!("Falha ao desserializar {}", path.display()))?;
    tracing::info!(path = %path.display(), engine = %config.name, "Configuração carregada");
    Ok(config)
}

/// Grava a configuração, criando o diretório pai se não existir.
pub fn save_config(path: impl AsRef<Path>, config: &EngineConfig) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Falha ao criar diretório {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(config)
        .context("Falha ao serializar EngineConfig")?;
    std::fs::write(path, json)
        .with_context(|| format!("Falha ao escrever {}", path.display()))?;
    tracing::info!(path = %path.display(), "Configuração salva");
    Ok(())
}

/// Lê a configuração e monta o motor.
pub fn load_engine(path: impl AsRef<Path>) -> Result<Engine> {
    let path = path.as_ref();
    let config = load_config(path)?;
    let engine = config
        .build()
        .with_context(|| format!("Configuração inválida em {}", path.display()))?;
    Ok(engine)
}
