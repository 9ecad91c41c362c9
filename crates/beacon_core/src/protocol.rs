//! Protocolo de comunicação do beacon.
//!
//! Um único `POST` HTTP com corpo JSON compacto:
//!
//! ```text
//! POST https://duckdb-in.query-farm.services/
//! Content-Type: application/json
//!
//! {"extension_name":"…","extension_version":"…","user_agent":"…",
//!  "duckdb_platform":"…","duckdb_library_version":"…",
//!  "duckdb_release_codename":"…","duckdb_source_id":"…"}
//! ```

use crate::types::TelemetryPayload;
use serde::Serialize;

/// Endpoint fixo de coleta.
pub const TARGET_URL: &str = "https://duckdb-in.query-farm.services/";

/// Identificador desta versão do beacon.
pub const USER_AGENT: &str = "query-farm/20251011";

/// Valor do header `Content-Type`.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Variável de ambiente de opt-out. Basta existir (qualquer valor).
pub const OPT_OUT_ENV: &str = "QUERY_FARM_TELEMETRY_OPT_OUT";

/// Extensão da engine que provê o cliente HTTP.
pub const TRANSPORT_EXTENSION: &str = "httpfs";

/// Erros do protocolo.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Falha ao serializar telemetria: {0}")]
    Serialize(String),

    #[error("Falha ao serializar telemetria: saída vazia")]
    Empty,

    #[error("Erro de deserialização: {0}")]
    Deserialize(String),
}

/// Codifica qualquer valor serializável em JSON compacto.
///
/// Saída vazia é tratada como falha de serialização.
pub fn encode_payload<T: Serialize + ?Sized>(payload: &T) -> Result<Vec<u8>, ProtocolError> {
    let body = serde_json::to_vec(payload).map_err(|e| ProtocolError::Serialize(e.to_string()))?;
    if body.is_empty() {
        return Err(ProtocolError::Empty);
    }
    Ok(body)
}

/// Decodifica um corpo recebido pelo coletor.
///
/// Rejeita chaves desconhecidas e valores que não sejam string.
pub fn decode_payload(data: &[u8]) -> Result<TelemetryPayload, ProtocolError> {
    serde_json::from_slice(data).map_err(|e| ProtocolError::Deserialize(e.to_string()))
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
