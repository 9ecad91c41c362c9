//! Contrato com a engine hospedeira.
//!
//! A engine, seu carregador de extensões e sua configuração são externos a
//! este crate. Aqui ficam apenas os traits que o beacon consome e o guard
//! que desliga temporariamente o auto-install.

use crate::transport::HttpUtil;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Erros do carregamento de extensões da engine.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Extensão não encontrada: {0}")]
    NotFound(String),
}

// ──────────────────────────────────────────────
// Ambiente do processo
// ──────────────────────────────────────────────

/// Leitura de variáveis de ambiente.
pub trait Environment {
    /// `true` se a variável existe, com qualquer valor (inclusive vazio).
    fn is_set(&self, name: &str) -> bool;
}

/// Ambiente real do processo.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn is_set(&self, name: &str) -> bool {
        std::env::var_os(name).is_some()
    }
}

/// Ambiente em memória com um conjunto fixo de variáveis definidas.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: BTreeSet<String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marca a variável como definida.
    pub fn with_var(mut self, name: impl Into<String>) -> Self {
        self.vars.insert(name.into());
        self
    }
}

impl Environment for MapEnvironment {
    fn is_set(&self, name: &str) -> bool {
        self.vars.contains(name)
    }
}

// ──────────────────────────────────────────────
// Engine
// ──────────────────────────────────────────────

/// Instância da engine de banco de dados.
///
/// Implementações devem usar mutabilidade interior para o flag de
/// auto-install, já que o beacon só recebe `&self`.
pub trait DatabaseInstance: Send + Sync {
    /// Valor atual de `autoinstall_known_extensions`.
    fn autoinstall_known_extensions(&self) -> bool;

    fn set_autoinstall_known_extensions(&self, enabled: bool);

    /// Tenta carregar uma extensão já instalada, sem persistir configuração.
    fn auto_load_extension(&self, name: &str) -> Result<(), HostError>;

    fn extension_is_loaded(&self, name: &str) -> bool;

    /// Cliente HTTP configurado na engine (proxy, timeouts, TLS).
    fn http_util(&self) -> Arc<dyn HttpUtil>;

    fn platform(&self) -> String;
    fn library_version(&self) -> String;
    fn release_codename(&self) -> String;
    fn source_id(&self) -> String;
}

/// Contexto entregue à extensão durante o carregamento.
pub trait ExtensionLoader {
    fn database_instance(&self) -> Arc<dyn DatabaseInstance>;
}

/// Desliga o auto-install enquanto vivo e restaura o valor anterior no drop.
///
/// O drop roda em qualquer saída do escopo, inclusive durante unwinding.
#[must_use = "o valor anterior é restaurado quando o guard sai de escopo"]
pub struct AutoInstallGuard<'a> {
    db: &'a dyn DatabaseInstance,
    previous: bool,
}

impl<'a> AutoInstallGuard<'a> {
    pub fn disable(db: &'a dyn DatabaseInstance) -> Self {
        let previous = db.autoinstall_known_extensions();
        db.set_autoinstall_known_extensions(false);
        Self { db, previous }
    }

    /// Valor que será restaurado.
    pub fn previous(&self) -> bool {
        self.previous
    }
}

impl Drop for AutoInstallGuard<'_> {
    fn drop(&mut self) {
        self.db.set_autoinstall_known_extensions(self.previous);
    }
}
