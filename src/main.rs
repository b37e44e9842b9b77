//! h5value - Convert HTML into a JSON view of its parse tree

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;

use h5value::{ParseOptions, Value, convert_bytes_with_options, convert_file_with_options};

#[derive(Parser)]
#[command(name = "h5value")]
#[command(version, about = "Convert HTML into a JSON view of its parse tree", long_about = None)]
#[command(after_help = "EXAMPLES:
    h5value page.html               Convert a file
    cat page.html | h5value         Convert standard input
    h5value -s '<p>hi</p>' --root   Convert a literal, print only the root element")]
struct Cli {
    /// Input file, or `-` for standard input
    #[arg(value_name = "INPUT", conflicts_with = "string")]
    input: Option<String>,

    /// Convert this HTML string instead of reading input
    #[arg(short, long, value_name = "HTML")]
    string: Option<String>,

    /// Print only the document's root element
    #[arg(short, long)]
    root: bool,

    /// Print JSON on a single line
    #[arg(short, long)]
    compact: bool,

    /// Deepest element nesting to accept
    #[arg(long, value_name = "N", default_value_t = h5value::options::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Largest tree (in nodes) to accept
    #[arg(long, value_name = "N")]
    max_nodes: Option<usize>,

    /// Parse as if scripting were disabled
    #[arg(long)]
    no_scripting: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log conversion details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<(), String> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("H5VALUE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| format!("failed to initialize tracing subscriber: {e}"))
}

fn options(cli: &Cli) -> ParseOptions {
    let mut options = ParseOptions::new()
        .with_max_depth(cli.max_depth)
        .with_scripting(!cli.no_scripting);
    if let Some(max_nodes) = cli.max_nodes {
        options = options.with_max_nodes(max_nodes);
    }
    options
}

fn run(cli: &Cli) -> Result<(), String> {
    let options = options(cli);

    let value = match (&cli.string, cli.input.as_deref()) {
        (Some(html), _) => convert_bytes_with_options(html.as_bytes(), &options),
        (None, Some(path)) if path != "-" => convert_file_with_options(path, &options),
        (None, _) => {
            let mut input = Vec::new();
            io::stdin()
                .read_to_end(&mut input)
                .map_err(|e| e.to_string())?;
            convert_bytes_with_options(&input, &options)
        }
    }
    .map_err(|e| e.to_string())?;

    let output: &Value = if cli.root {
        value
            .get("root")
            .ok_or_else(|| "document has no root element".to_string())?
    } else {
        &value
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.compact {
        serde_json::to_writer(&mut out, output).map_err(|e| e.to_string())?;
    } else {
        serde_json::to_writer_pretty(&mut out, output).map_err(|e| e.to_string())?;
    }
    writeln!(out).map_err(|e| e.to_string())
}
