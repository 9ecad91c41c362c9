//! # Beacon Sender
//!
//! Dispara um único beacon de telemetria a partir de um host standalone.
//! Útil para testar proxy e TLS contra o endpoint fixo sem carregar uma engine real.
//!
//! ## Uso
//! ```bash
//! beacon_sender my_ext 1.2.3                      # lê config.toml ao lado do executável, se existir
//! beacon_sender my_ext 1.2.3 --config beacon.toml
//! QUERY_FARM_TELEMETRY_OPT_OUT=1 beacon_sender my_ext 1.2.3   # não envia nada
//! ```

mod standalone;

use beacon_core::Beacon;
use beacon_core::config::AppConfig;
use beacon_core::dispatch::DispatchMode;
use beacon_core::protocol::TARGET_URL;
use standalone::{StandaloneDatabase, StandaloneLoader};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

const USAGE: &str = "Uso: beacon_sender <extensão> <versão> [--config <caminho>]";

/// Argumentos de linha de comando.
#[derive(Debug, PartialEq, Eq)]
struct Args {
    extension_name: String,
    extension_version: String,
    config_path: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut config_path = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config exige um caminho")?;
                config_path = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => return Err(format!("Opção desconhecida: {flag}")),
            _ => positional.push(arg),
        }
    }

    match <[String; 2]>::try_from(positional) {
        Ok([extension_name, extension_version]) => Ok(Args {
            extension_name,
            extension_version,
            config_path,
        }),
        Err(rest) => Err(format!(
            "Esperados 2 argumentos (extensão e versão), recebidos {}",
            rest.len()
        )),
    }
}

/// Lê o config.toml se existir. Nunca grava nada em disco.
fn load_config(args: &Args) -> AppConfig {
    let config_path = args.config_path.clone().unwrap_or_else(AppConfig::default_path);
    if !config_path.exists() {
        info!("{} não encontrado, usando configuração padrão", config_path.display());
    }
    AppConfig::load(&config_path)
}

fn main() -> ExitCode {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let mut config = load_config(&args);

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("Config inválida: {e}");
        }
        return ExitCode::from(2);
    }

    // O processo encerra logo após o envio; uma thread destacada morreria antes do POST
    config.beacon.dispatch = DispatchMode::Inline;

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   QUERY.FARM BEACON SENDER");
    println!("══════════════════════════════════════════════");
    println!("  Extensão:  {} {}", args.extension_name, args.extension_version);
    println!("  Destino:   {TARGET_URL}");
    println!("  Timeout:   {:.1}s", config.http.timeout_secs);
    println!("══════════════════════════════════════════════");
    println!();

    let loader = StandaloneLoader::new(StandaloneDatabase::from_config(&config));
    let beacon = Beacon::new(config.beacon);

    match beacon.send(&loader, &args.extension_name, &args.extension_version) {
        Ok(()) => {
            // Erros de rede são descartados pelo beacon; não há como saber se chegou
            info!("Beacon processado");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
