//! Host standalone: uma "engine" mínima para disparar o beacon fora de uma
//! engine real. O transporte é sempre o [`ReqwestTransport`].

use beacon_core::host::{DatabaseInstance, ExtensionLoader, HostError};
use beacon_core::transport::{HttpUtil, ReqwestTransport};
use beacon_core::{AppConfig, HttpConfig};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Codinome reportado pelo host standalone.
const RELEASE_CODENAME: &str = "standalone";

pub struct StandaloneDatabase {
    autoinstall: AtomicBool,
    /// Única extensão que este host sabe carregar
    transport_extension: String,
    loaded: Mutex<BTreeSet<String>>,
    http: Arc<ReqwestTransport>,
}

impl StandaloneDatabase {
    pub fn new(transport_extension: &str, http: HttpConfig) -> Self {
        Self {
            autoinstall: AtomicBool::new(false),
            transport_extension: transport_extension.to_owned(),
            loaded: Mutex::new(BTreeSet::new()),
            http: Arc::new(ReqwestTransport::new(http)),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.beacon.transport_extension, config.http.clone())
    }

    fn loaded(&self) -> std::sync::MutexGuard<'_, BTreeSet<String>> {
        // Lock envenenado só guarda nomes; seguimos com o conteúdo
        self.loaded.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DatabaseInstance for StandaloneDatabase {
    fn autoinstall_known_extensions(&self) -> bool {
        self.autoinstall.load(Ordering::SeqCst)
    }

    fn set_autoinstall_known_extensions(&self, enabled: bool) {
        self.autoinstall.store(enabled, Ordering::SeqCst);
    }

    fn auto_load_extension(&self, name: &str) -> Result<(), HostError> {
        if name != self.transport_extension {
            return Err(HostError::NotFound(name.to_owned()));
        }
        debug!("Extensão {name} carregada (standalone)");
        self.loaded().insert(name.to_owned());
        Ok(())
    }

    fn extension_is_loaded(&self, name: &str) -> bool {
        self.loaded().contains(name)
    }

    fn http_util(&self) -> Arc<dyn HttpUtil> {
        self.http.clone()
    }

    fn platform(&self) -> String {
        platform_name(std::env::consts::OS, std::env::consts::ARCH)
    }

    fn library_version(&self) -> String {
        format!("v{}", env!("CARGO_PKG_VERSION"))
    }

    fn release_codename(&self) -> String {
        RELEASE_CODENAME.into()
    }

    fn source_id(&self) -> String {
        option_env!("BEACON_SOURCE_ID").unwrap_or("unknown").into()
    }
}

/// Contexto de carregamento do host standalone.
pub struct StandaloneLoader {
    db: Arc<StandaloneDatabase>,
}

impl StandaloneLoader {
    pub fn new(db: StandaloneDatabase) -> Self {
        Self { db: Arc::new(db) }
    }
}

impl ExtensionLoader for StandaloneLoader {
    fn database_instance(&self) -> Arc<dyn DatabaseInstance> {
        self.db.clone()
    }
}

/// Nome de plataforma no formato `<os>_<arch>` (ex.: `linux_amd64`, `osx_arm64`).
pub fn platform_name(os: &str, arch: &str) -> String {
    let os = match os {
        "macos" => "osx",
        other => other,
    };
    let arch = match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "i386",
        other => other,
    };
    format!("{os}_{arch}")
}
