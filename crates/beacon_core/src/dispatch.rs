//! Execução do envio fora do caminho de carregamento da extensão.

use serde::Deserialize;
use std::io;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Onde o envio roda.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Thread destacada, nunca aguardada
    Background,
    /// Na thread chamadora (ambientes sem threads, ex.: wasm)
    Inline,
}

impl Default for DispatchMode {
    fn default() -> Self {
        if cfg!(target_family = "wasm") {
            DispatchMode::Inline
        } else {
            DispatchMode::Background
        }
    }
}

/// Nome da thread de envio.
pub const THREAD_NAME: &str = "telemetry-beacon";

/// Trabalho entregue à thread de envio.
type Task = Box<dyn FnOnce() + Send + 'static>;

/// Submete um trabalho sem esperar por ele.
///
/// Em `Background`, se a thread não puder ser criada o trabalho roda inline.
pub fn dispatch<F>(mode: DispatchMode, job: F)
where
    F: FnOnce() + Send + 'static,
{
    match mode {
        DispatchMode::Inline => job(),
        DispatchMode::Background => spawn_or_inline(job, |task| {
            // JoinHandle descartado: thread destacada
            std::thread::Builder::new()
                .name(THREAD_NAME.into())
                .spawn(task)
                .map(drop)
        }),
    }
}

/// `spawn` consome a closure mesmo quando falha; o trabalho fica num slot
/// compartilhado para poder ser recuperado e executado aqui.
fn spawn_or_inline<F, S>(job: F, spawn: S)
where
    F: FnOnce() + Send + 'static,
    S: FnOnce(Task) -> io::Result<()>,
{
    let slot = Arc::new(Mutex::new(Some(job)));
    let task_slot = Arc::clone(&slot);
    let task: Task = Box::new(move || {
        if let Some(job) = take(&task_slot) {
            job();
        }
    });

    if let Err(e) = spawn(task) {
        debug!("Falha ao criar thread de telemetria, enviando inline: {e}");
        if let Some(job) = take(&slot) {
            job();
        }
    }
}

fn take<F>(slot: &Mutex<Option<F>>) -> Option<F> {
    slot.lock().unwrap_or_else(|e| e.into_inner()).take()
}
