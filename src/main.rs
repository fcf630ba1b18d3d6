//! Production-plan entry point: CLI wiring, scenario loading, and output.

use std::path::Path;
use std::process;

use production_plan::config::ConfigError;
use production_plan::dispatch::{DispatchRequest, PlanSummary};
use production_plan::io::export::export_csv;
use production_plan::telemetry::init_tracing;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    plan_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("production-plan — economic dispatch of thermal and wind units");
    eprintln!();
    eprintln!("Usage: production-plan [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load request from a TOML or JSON file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        DispatchRequest::PRESETS.join(", ")
    );
    eprintln!("  --plan-out <path>        Export the plan to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start the REST API server instead");
        eprintln!("  --port <u16>             API server port (default: 8888)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the reference preset is used.");
}

/// Returns the value following a flag, or exits with a usage error.
fn flag_value(args: &[String], i: usize, flag: &str, what: &str) -> String {
    match args.get(i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        plan_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 8888,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                cli.scenario_path = Some(flag_value(&args, i, "--scenario", "a path argument"));
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(flag_value(&args, i, "--preset", "a name argument"));
            }
            "--plan-out" => {
                i += 1;
                cli.plan_out = Some(flag_value(&args, i, "--plan-out", "a path argument"));
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = flag_value(&args, i, "--port", "a u16 argument");
                if let Ok(p) = raw.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{raw}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Loads the request: `--scenario` takes priority, then `--preset`, then the
/// reference preset.
fn load_request(cli: &CliArgs) -> Result<DispatchRequest, ConfigError> {
    if let Some(ref path) = cli.scenario_path {
        DispatchRequest::from_file(Path::new(path))
    } else if let Some(ref name) = cli.preset {
        DispatchRequest::from_preset(name)
    } else {
        Ok(DispatchRequest::reference())
    }
}

#[cfg(feature = "api")]
fn serve(port: u16) -> ! {
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("error: failed to create tokio runtime: {e}");
        process::exit(1);
    });
    if let Err(e) = rt.block_on(production_plan::api::serve(addr)) {
        eprintln!("error: API server failed on {addr}: {e}");
        process::exit(1);
    }
    process::exit(0);
}

fn main() {
    let cli = parse_args();
    init_tracing();

    #[cfg(feature = "api")]
    if cli.serve {
        serve(cli.port);
    }

    let request = load_request(&cli).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let errors = request.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let plan = request.dispatch().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });

    match serde_json::to_string_pretty(&plan) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: failed to encode plan: {e}");
            process::exit(1);
        }
    }

    // stdout carries only the plan JSON.
    let summary = PlanSummary::from_plan(&request, &plan);
    eprintln!("\n{summary}");

    if let Some(ref path) = cli.plan_out {
        if let Err(e) = export_csv(&plan, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Plan written to {path}");
    }
}
