//! # Beacon Core
//!
//! Beacon de telemetria opt-out para extensões de engines de banco de dados.
//! No carregamento da extensão dispara um único `POST` HTTP, best-effort e
//! assíncrono, com nome/versão da extensão e identificadores da plataforma.
//!
//! Para desativar: defina `QUERY_FARM_TELEMETRY_OPT_OUT` (qualquer valor).
//!
//! ## Módulos
//! - [`beacon`] – Fluxo do envio (opt-out, transporte, payload, despacho)
//! - [`types`] – Payload de telemetria
//! - [`protocol`] – Constantes do wire e codificação JSON
//! - [`host`] – Traits da engine hospedeira e guard do auto-install
//! - [`transport`] – Cliente HTTP da engine e implementação via reqwest
//! - [`dispatch`] – Execução em thread destacada ou inline
//! - [`config`] – Configuração via TOML

pub mod beacon;
pub mod types;
pub mod protocol;
pub mod host;
pub mod transport;
pub mod dispatch;
pub mod config;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports convenientes
pub use beacon::{Beacon, send_telemetry};
pub use types::TelemetryPayload;
pub use protocol::{ProtocolError, encode_payload, decode_payload};
pub use host::{DatabaseInstance, Environment, ExtensionLoader};
pub use transport::{HttpUtil, ReqwestTransport};
pub use config::{AppConfig, BeaconConfig, HttpConfig};
