//! Configuração via TOML.
//!
//! Endpoint e variável de opt-out são fixos ([`crate::protocol`]) e não
//! aparecem aqui. [`crate::beacon::send_telemetry`] usa sempre
//! [`BeaconConfig::default()`]; o `config.toml` só é lido pelo
//! `beacon_sender` e por hosts que montam um [`crate::beacon::Beacon`].
//! Nada é gravado em disco.

use crate::dispatch::DispatchMode;
use crate::protocol::TRANSPORT_EXTENSION;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuração do beacon.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BeaconConfig {
    /// Extensão que provê o transporte HTTP
    pub transport_extension: String,
    /// "background" ou "inline"
    pub dispatch: DispatchMode,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            transport_extension: TRANSPORT_EXTENSION.into(),
            dispatch: DispatchMode::default(),
        }
    }
}

/// Parâmetros HTTP do host standalone.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Timeout total da requisição (segundos)
    pub timeout_secs: f64,
    /// Proxy HTTP (vazio = direto)
    pub http_proxy: String,
    pub verify_ssl: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30.0,
            http_proxy: String::new(),
            verify_ssl: true,
        }
    }
}

/// Configuração raiz do `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub beacon: BeaconConfig,
    pub http: HttpConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    ///
    /// Arquivo ausente ou inválido resulta na configuração padrão.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Retorna o caminho padrão do config.toml (ao lado do executável).
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.beacon.transport_extension.is_empty() {
            errors.push("Extensão de transporte não pode ser vazia".into());
        }
        if !(self.http.timeout_secs > 0.0 && self.http.timeout_secs <= 300.0) {
            errors.push(format!(
                "Timeout HTTP inválido: {} (0–300)",
                self.http.timeout_secs
            ));
        }

        errors
    }
}
