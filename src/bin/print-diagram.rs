use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::Level;

use fortune_voronoi::{TracingLogger, VoronoiConfig, VoronoiRequest};

/// Reads a JSON request like `{"points": [[0, 0], [2, 0]]}` and prints the
/// edges of its Voronoi diagram as JSON.
#[derive(Debug, Parser)]
#[command(name = "print-diagram", version)]
struct Args {
    /// Request file. Reads stdin when left out.
    input: Option<PathBuf>,

    /// Pretty print the output.
    #[arg(long)]
    pretty: bool,

    /// Log every event of the sweep to stderr.
    #[arg(long)]
    trace: bool,

    /// Fraction of the site extent added around the bounding box.
    #[arg(long)]
    margin: Option<f64>,

    /// Tolerance for degenerate geometry.
    #[arg(long)]
    tolerance: Option<f64>
}

fn read_request(input: Option<&PathBuf>) -> Result<VoronoiRequest, String> {
    let mut text = String::new();
    let read = match input {
        Some(path) => File::open(path).and_then(|mut file| file.read_to_string(&mut text)),
        None => io::stdin().read_to_string(&mut text)
    };
    read.map_err(|err| format!("cannot read request: {}", err))?;

    serde_json::from_str(&text).map_err(|err| format!("malformed request: {}", err))
}

fn run(args: &Args) -> Result<String, String> {
    let mut config = VoronoiConfig::default();
    if let Some(margin) = args.margin {
        config.margin = margin;
    }
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }

    let request = read_request(args.input.as_ref())?;
    let response = if args.trace {
        request.solve_with_logger(&config, TracingLogger)
    } else {
        request.solve(&config)
    }.map_err(|err| err.to_string())?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    };
    json.map_err(|err| err.to_string())
}

fn main() {
    let args = Args::parse();

    if args.trace {
        tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_writer(io::stderr)
            .init();
    }

    match run(&args) {
        Ok(json) => println!("{}", json),
        Err(message) => {
            eprintln!("{}", serde_json::json!({ "error": message }));
            process::exit(1);
        }
    }
}
