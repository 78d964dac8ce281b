//! Command-line entry point for the notebook service.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the note store.
//! - Answer one JSON-RPC request taken from the arguments or stdin.

mod cli;

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use log::error;
use notebook_core::db::migrations::latest_version;
use notebook_core::{
    core_version, init_logging, NoteSelector, NoteService, NotebookConfig, SqliteNoteRepository,
};
use notebook_rpc::{dispatch, handle_json, RpcMethod, RpcRequest, RpcResponse};
use serde_json::json;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("notebook: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, String> {
    if cli.command == Commands::Version {
        println!(
            "notebook_core version={} schema_version={}",
            core_version(),
            latest_version()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let config = NotebookConfig::resolve(cli.config.as_deref(), &cli.overrides())
        .map_err(|err| err.to_string())?;
    init_logging(&config).map_err(|err| err.to_string())?;

    let mut conn = notebook_core::db::open_db(&config.db_path).map_err(|err| err.to_string())?;
    let repo = SqliteNoteRepository::try_new(&mut conn).map_err(|err| err.to_string())?;
    let mut service = NoteService::new(repo);

    match cli.command {
        Commands::Version => Ok(ExitCode::SUCCESS),
        Commands::TestDb => {
            let notes = service
                .get_notes(&NoteSelector::empty())
                .map_err(|err| err.to_string())?;
            let report = json!({
                "db": config.db_path.display().to_string(),
                "schemaVersion": latest_version(),
                "notes": notes.len(),
            });
            println!("{report}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Hello => {
            let request = RpcRequest::new(0, RpcMethod::Hello.as_str(), None);
            print_response(&dispatch(&mut service, request))
        }
        Commands::Request { json } => {
            let raw = match json {
                Some(raw) => raw,
                None => read_stdin()?,
            };
            print_response(&handle_json(&mut service, &raw))
        }
    }
}

fn read_stdin() -> Result<String, String> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .map_err(|err| format!("failed to read request from stdin: {err}"))?;
    Ok(raw)
}

fn print_response(response: &RpcResponse) -> Result<ExitCode, String> {
    let rendered = serde_json::to_string(response).map_err(|err| err.to_string())?;
    println!("{rendered}");
    Ok(if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
