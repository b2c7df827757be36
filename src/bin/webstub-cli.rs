use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use http::Method;
use serde_json::{json, Value};

use webstub::config::{fixtures, loader};
use webstub::intercept::body::decode_form;
use webstub::observability::logging::init_logging;
use webstub::{Interception, Interceptor, Payload, Registry};

#[derive(Parser)]
#[command(name = "webstub-cli")]
#[command(about = "Validate stub fixtures and dry-run request resolution", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a fixtures file and list its stubs
    Check {
        fixtures: PathBuf,
    },
    /// Resolve one request against a fixtures file
    Resolve {
        fixtures: PathBuf,
        method: String,
        uri: String,
        /// Request body used as the payload
        #[arg(short, long)]
        data: Option<String>,
        /// Decode the body as application/x-www-form-urlencoded
        #[arg(long, conflicts_with = "json")]
        form: bool,
        /// Decode the body as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { fixtures: path } => {
            let config = loader::load_config(&path)?;
            init_logging(&config.observability);

            let registry = Registry::new();
            let count = fixtures::install(&config, &registry)?;
            for stub in &config.stubs {
                println!(
                    "{} {}{} ({} responses)",
                    stub.method.to_uppercase(),
                    stub.uri,
                    if stub.pattern { " [pattern]" } else { "" },
                    stub.responses.len()
                );
            }
            println!("{} stubs OK", count);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Resolve {
            fixtures: path,
            method,
            uri,
            data,
            form,
            json,
        } => {
            let config = loader::load_config(&path)?;
            init_logging(&config.observability);

            let registry = Arc::new(Registry::new());
            fixtures::install(&config, &registry)?;
            let interceptor = Interceptor::new(registry, config.intercept.clone());

            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            let payload = match data {
                Some(body) if form => Some(decode_form(body.as_bytes())),
                Some(body) if json => Some(Payload::from(serde_json::from_str::<Value>(&body)?)),
                Some(body) => Some(Payload::from(body)),
                None => None,
            };

            match interceptor.attempt_intercept(&method, &uri, payload) {
                Ok(Interception::Respond(rendered)) => {
                    let response = rendered.response;
                    let headers: serde_json::Map<String, Value> = response
                        .headers()
                        .iter()
                        .map(|(name, value)| {
                            (name.to_string(), Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()))
                        })
                        .collect();
                    let output = json!({
                        "status": response.status().as_u16(),
                        "headers": headers,
                        "body": String::from_utf8_lossy(response.body()),
                        "latency_ms": rendered.latency.map(|d| d.as_millis() as u64),
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                    Ok(ExitCode::SUCCESS)
                }
                Ok(Interception::Passthrough) => {
                    println!("passthrough: no stub registered, real connections allowed");
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
