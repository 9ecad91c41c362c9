//! Beacon de telemetria disparado no carregamento da extensão.
//!
//! Sequência linear com saídas antecipadas:
//!
//! 1. opt-out pela variável de ambiente
//! 2. auto-load do transporte HTTP com auto-install desligado
//! 3. confirma que o transporte está carregado
//! 4. monta e serializa o payload
//! 5. despacha o `POST` sem esperar a resposta
//!
//! Só a falha de serialização chega ao chamador. Indisponibilidade do
//! transporte e erros de rede são engolidos.

use crate::config::BeaconConfig;
use crate::dispatch::dispatch;
use crate::host::{AutoInstallGuard, DatabaseInstance, Environment, ExtensionLoader, ProcessEnvironment};
use crate::protocol::{CONTENT_TYPE_JSON, OPT_OUT_ENV, ProtocolError, TARGET_URL, encode_payload};
use crate::transport::{HttpHeaders, PostRequest};
use crate::types::TelemetryPayload;
use serde::Serialize;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::debug;

/// Envia o beacon com a configuração padrão e o ambiente do processo.
pub fn send_telemetry(
    loader: &dyn ExtensionLoader,
    extension_name: &str,
    extension_version: &str,
) -> Result<(), ProtocolError> {
    Beacon::default().send(loader, extension_name, extension_version)
}

/// Beacon configurável.
pub struct Beacon {
    config: BeaconConfig,
    env: Box<dyn Environment + Send + Sync>,
}

impl Default for Beacon {
    fn default() -> Self {
        Self::new(BeaconConfig::default())
    }
}

impl Beacon {
    pub fn new(config: BeaconConfig) -> Self {
        Self {
            config,
            env: Box::new(ProcessEnvironment),
        }
    }

    /// Troca a fonte das variáveis de ambiente.
    pub fn with_environment(mut self, env: impl Environment + Send + Sync + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Dispara o beacon para a extensão sendo carregada.
    ///
    /// Retorna `Ok(())` também quando nada é enviado (opt-out ou transporte
    /// indisponível). O erro só ocorre se o payload não puder ser serializado.
    pub fn send(
        &self,
        loader: &dyn ExtensionLoader,
        extension_name: &str,
        extension_version: &str,
    ) -> Result<(), ProtocolError> {
        if self.env.is_set(OPT_OUT_ENV) {
            debug!("Telemetria desativada via {OPT_OUT_ENV}");
            return Ok(());
        }

        let db = loader.database_instance();
        if !self.ensure_transport(db.as_ref()) {
            return Ok(());
        }

        let payload = TelemetryPayload::collect(db.as_ref(), extension_name, extension_version);
        self.submit(db, &payload)
    }

    /// Tenta disponibilizar o transporte sem instalar nada nem alterar a
    /// configuração persistente.
    fn ensure_transport(&self, db: &dyn DatabaseInstance) -> bool {
        let extension = self.config.transport_extension.as_str();

        {
            let _guard = AutoInstallGuard::disable(db);
            match catch_unwind(AssertUnwindSafe(|| db.auto_load_extension(extension))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    debug!("Transporte indisponível: {e}");
                    return false;
                }
                Err(_) => {
                    debug!("Panic ao carregar {extension}, telemetria ignorada");
                    return false;
                }
            }
        }

        if !db.extension_is_loaded(extension) {
            debug!("{extension} não carregada, telemetria ignorada");
            return false;
        }
        true
    }

    /// Serializa e despacha. Nenhum `POST` acontece se a serialização falhar.
    pub(crate) fn submit<P: Serialize + ?Sized>(
        &self,
        db: Arc<dyn DatabaseInstance>,
        payload: &P,
    ) -> Result<(), ProtocolError> {
        let body = encode_payload(payload)?;
        debug!(
            "Enviando telemetria ({} bytes, {:?}) para {TARGET_URL}",
            body.len(),
            self.config.dispatch
        );
        dispatch(self.config.dispatch, move || post(db.as_ref(), TARGET_URL, body));
        Ok(())
    }
}

/// Executa o `POST` e descarta o resultado, inclusive panics do transporte.
fn post(db: &dyn DatabaseInstance, url: &str, body: Vec<u8>) {
    let _ = catch_unwind(AssertUnwindSafe(move || {
        let http = db.http_util();

        let mut headers = HttpHeaders::new();
        headers.insert("Content-Type", CONTENT_TYPE_JSON);

        http.request(PostRequest {
            url: url.to_owned(),
            headers,
            params: http.initialize_parameters(url),
            body,
        })
    }));
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
