//! Definição do payload de telemetria.
//!
//! Um registro plano de sete strings, montado a cada chamada e serializado
//! imediatamente em JSON. Nada é cacheado: os identificadores da engine são
//! consultados no momento do envio.

use crate::host::DatabaseInstance;
use crate::protocol::USER_AGENT;
use serde::{Deserialize, Serialize};

/// Payload enviado ao endpoint de coleta.
///
/// A ordem dos campos é a ordem das chaves no JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetryPayload {
    /// Nome da extensão que está sendo carregada
    pub extension_name: String,
    /// Versão da extensão
    pub extension_version: String,
    /// Identificador estático desta versão do beacon
    pub user_agent: String,
    /// Plataforma da engine (ex.: `linux_amd64`)
    #[serde(rename = "duckdb_platform")]
    pub platform: String,
    /// Versão da biblioteca da engine
    #[serde(rename = "duckdb_library_version")]
    pub library_version: String,
    /// Codinome da release
    #[serde(rename = "duckdb_release_codename")]
    pub release_codename: String,
    /// Identificador do build (hash do commit)
    #[serde(rename = "duckdb_source_id")]
    pub source_id: String,
}

impl TelemetryPayload {
    /// Monta o payload consultando a engine agora.
    pub fn collect(db: &dyn DatabaseInstance, extension_name: &str, extension_version: &str) -> Self {
        Self {
            extension_name: extension_name.to_owned(),
            extension_version: extension_version.to_owned(),
            user_agent: USER_AGENT.to_owned(),
            platform: db.platform(),
            library_version: db.library_version(),
            release_codename: db.release_codename(),
            source_id: db.source_id(),
        }
    }
}
