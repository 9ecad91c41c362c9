//! Dublês de teste da engine e do transporte.

use crate::host::{DatabaseInstance, ExtensionLoader, HostError};
use crate::transport::{HttpParams, HttpResponse, HttpUtil, PostRequest, TransportError};
use crossbeam_channel::Sender;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Comportamento de `auto_load_extension`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadBehavior {
    /// Carrega e marca como carregada
    Loads,
    /// Retorna erro
    Fails,
    /// Entra em panic
    Panics,
    /// Retorna Ok mas a extensão não fica carregada
    Silent,
}

/// Comportamento do transporte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HttpBehavior {
    Ok,
    Unreachable,
    Panics,
}

/// Transporte que grava as requisições recebidas.
pub(crate) struct RecordingHttp {
    behavior: HttpBehavior,
    requests: Mutex<Vec<PostRequest>>,
    notify: Mutex<Option<Sender<()>>>,
}

impl RecordingHttp {
    fn new(behavior: HttpBehavior) -> Self {
        Self {
            behavior,
            requests: Mutex::new(Vec::new()),
            notify: Mutex::new(None),
        }
    }

    /// Avisa pelo canal a cada requisição recebida.
    pub(crate) fn notify_on_request(&self, tx: Sender<()>) {
        *self.notify.lock().unwrap() = Some(tx);
    }

    pub(crate) fn requests(&self) -> Vec<PostRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpUtil for RecordingHttp {
    fn initialize_parameters(&self, _url: &str) -> HttpParams {
        HttpParams::default()
    }

    fn request(&self, request: PostRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        if let Some(tx) = self.notify.lock().unwrap().as_ref() {
            let _ = tx.send(());
        }

        match self.behavior {
            HttpBehavior::Ok => Ok(HttpResponse { status: 200 }),
            HttpBehavior::Unreachable => Err(TransportError::Network("connection refused".into())),
            HttpBehavior::Panics => panic!("bug no transporte"),
        }
    }
}

/// Engine em memória.
pub(crate) struct FakeDatabase {
    autoinstall: AtomicBool,
    load: LoadBehavior,
    loaded: Mutex<BTreeSet<String>>,
    load_attempts: Mutex<Vec<(String, bool)>>,
    platform: Mutex<String>,
    http: Arc<RecordingHttp>,
}

impl FakeDatabase {
    pub(crate) fn new() -> Self {
        Self {
            autoinstall: AtomicBool::new(true),
            load: LoadBehavior::Loads,
            loaded: Mutex::new(BTreeSet::new()),
            load_attempts: Mutex::new(Vec::new()),
            platform: Mutex::new("linux_amd64".into()),
            http: Arc::new(RecordingHttp::new(HttpBehavior::Ok)),
        }
    }

    pub(crate) fn with_autoinstall(self, enabled: bool) -> Self {
        self.autoinstall.store(enabled, Ordering::SeqCst);
        self
    }

    pub(crate) fn with_load(mut self, load: LoadBehavior) -> Self {
        self.load = load;
        self
    }

    pub(crate) fn with_http(mut self, behavior: HttpBehavior) -> Self {
        self.http = Arc::new(RecordingHttp::new(behavior));
        self
    }

    pub(crate) fn set_platform(&self, platform: &str) {
        *self.platform.lock().unwrap() = platform.to_owned();
    }

    pub(crate) fn http(&self) -> Arc<RecordingHttp> {
        Arc::clone(&self.http)
    }

    /// Tentativas de carga: (extensão, valor do auto-install no momento).
    pub(crate) fn load_attempts(&self) -> Vec<(String, bool)> {
        self.load_attempts.lock().unwrap().clone()
    }
}

impl DatabaseInstance for FakeDatabase {
    fn autoinstall_known_extensions(&self) -> bool {
        self.autoinstall.load(Ordering::SeqCst)
    }

    fn set_autoinstall_known_extensions(&self, enabled: bool) {
        self.autoinstall.store(enabled, Ordering::SeqCst);
    }

    fn auto_load_extension(&self, name: &str) -> Result<(), HostError> {
        self.load_attempts
            .lock()
            .unwrap()
            .push((name.to_owned(), self.autoinstall_known_extensions()));

        match self.load {
            LoadBehavior::Loads => {
                self.loaded.lock().unwrap().insert(name.to_owned());
                Ok(())
            }
            LoadBehavior::Fails => Err(HostError::NotFound(name.to_owned())),
            LoadBehavior::Panics => panic!("falha interna ao carregar {name}"),
            LoadBehavior::Silent => Ok(()),
        }
    }

    fn extension_is_loaded(&self, name: &str) -> bool {
        self.loaded.lock().unwrap().contains(name)
    }

    fn http_util(&self) -> Arc<dyn HttpUtil> {
        self.http.clone()
    }

    fn platform(&self) -> String {
        self.platform.lock().unwrap().clone()
    }

    fn library_version(&self) -> String {
        "v1.4.1".into()
    }

    fn release_codename(&self) -> String {
        "Andium".into()
    }

    fn source_id(&self) -> String {
        "b390a7c376".into()
    }
}

/// Contexto de carregamento apontando para uma [`FakeDatabase`].
pub(crate) struct FakeLoader {
    db: Arc<FakeDatabase>,
}

impl FakeLoader {
    pub(crate) fn new(db: &Arc<FakeDatabase>) -> Self {
        Self { db: Arc::clone(db) }
    }
}

impl ExtensionLoader for FakeLoader {
    fn database_instance(&self) -> Arc<dyn DatabaseInstance> {
        self.db.clone()
    }
}
