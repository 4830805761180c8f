use std::path::PathBuf;
use std::{env, process::ExitCode};

use apidoc_engine::config::EngineConfig;
use apidoc_engine::error::{CollectingSink, Severity};
use apidoc_engine::serialize::serialize_system;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let target = if args.len() > 1 { PathBuf::from(&args[1]) } else { PathBuf::from(".") };
    let Some(base_dir) = target.parent().map(ToOwned::to_owned).filter(|p| !p.as_os_str().is_empty()) else {
        eprintln!("error: cannot determine base directory for {}", target.display());
        return ExitCode::FAILURE;
    };

    let config = EngineConfig::new(vec![target.clone()], base_dir).with_implicit_root_type_name("object");

    let mut sink = CollectingSink::new();
    tracing::info!(path = %target.display(), "scanning");
    let system = apidoc_engine::build_system(&config, &mut sink);

    for diagnostic in sink.diagnostics() {
        match diagnostic.severity {
            Severity::Error => tracing::error!("{diagnostic}"),
            Severity::Warn => tracing::warn!("{diagnostic}"),
            Severity::Info => tracing::info!("{diagnostic}"),
        }
    }

    let serialized = serialize_system(&system);
    match serde_json::to_string_pretty(&serialized) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: failed to serialize registry: {err}");
            ExitCode::FAILURE
        }
    }
}
