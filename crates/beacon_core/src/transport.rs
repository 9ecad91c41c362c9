//! Transporte HTTP usado pelo beacon.
//!
//! [`HttpUtil`] é o ponto de extensão: a engine entrega o seu cliente HTTP
//! (com proxy, timeouts e TLS já configurados). [`ReqwestTransport`] é a
//! implementação bloqueante via `reqwest` para hosts escritos em Rust.

use crate::config::HttpConfig;
use std::collections::BTreeMap;
use std::time::Duration;

/// Erros do transporte.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Falha ao montar cliente HTTP: {0}")]
    Build(String),

    #[error("Erro de rede: {0}")]
    Network(String),

    #[error("Resposta HTTP {0}")]
    Status(u16),
}

/// Headers de uma requisição. Nomes comparados sem distinção de caixa.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    entries: BTreeMap<String, String>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insere ou substitui um header.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.entries.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parâmetros resolvidos pela engine para uma URL de destino.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpParams {
    /// Timeout total da requisição
    pub timeout: Duration,
    /// Proxy HTTP (None = conexão direta)
    pub http_proxy: Option<String>,
    /// Verificar certificado TLS
    pub verify_ssl: bool,
}

impl Default for HttpParams {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            http_proxy: None,
            verify_ssl: true,
        }
    }
}

/// Requisição `POST` completa. O corpo pertence à requisição.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub url: String,
    pub headers: HttpHeaders,
    pub params: HttpParams,
    pub body: Vec<u8>,
}

/// Resposta do servidor. O beacon nunca a inspeciona.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
}

/// Cliente HTTP exposto pela engine.
pub trait HttpUtil: Send + Sync {
    /// Resolve parâmetros (proxy, timeout, TLS) para a URL.
    fn initialize_parameters(&self, url: &str) -> HttpParams;

    /// Executa a requisição de forma bloqueante.
    fn request(&self, request: PostRequest) -> Result<HttpResponse, TransportError>;
}

// ──────────────────────────────────────────────
// reqwest
// ──────────────────────────────────────────────

/// Transporte bloqueante baseado em `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    config: HttpConfig,
}

impl ReqwestTransport {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }
}

impl HttpUtil for ReqwestTransport {
    fn initialize_parameters(&self, _url: &str) -> HttpParams {
        HttpParams {
            // Valor negativo, NaN ou grande demais cai no padrão
            timeout: Duration::try_from_secs_f64(self.config.timeout_secs)
                .unwrap_or(HttpParams::default().timeout),
            http_proxy: (!self.config.http_proxy.is_empty()).then(|| self.config.http_proxy.clone()),
            verify_ssl: self.config.verify_ssl,
        }
    }

    fn request(&self, request: PostRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(request.params.timeout)
            .danger_accept_invalid_certs(!request.params.verify_ssl);

        // Só o proxy configurado na engine vale; variáveis do sistema são ignoradas
        builder = match &request.params.http_proxy {
            Some(proxy) => builder.proxy(
                reqwest::Proxy::all(proxy).map_err(|e| TransportError::Build(e.to_string()))?,
            ),
            None => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        let mut req = client.post(&request.url);
        for (name, value) in request.headers.iter() {
            req = req.header(name, value);
        }

        let resp = req
            .body(request.body)
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(HttpResponse {
            status: status.as_u16(),
        })
    }
}
