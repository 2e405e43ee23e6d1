mod echo;

use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use unclutter_core::{
    Annotation, BoilerplateFilter, Document, FilterConfig, Outcome, Report, Source, Strategy, write_file,
};

use crate::echo::{format_size, print_banner, print_detail, print_info, print_step, print_success, print_warning};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the filtered document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Html,
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: html, text, json", s)),
        }
    }
}

/// Strip navigation, ads and other chrome from an HTML page
#[derive(Parser, Debug)]
#[command(name = "unclutter")]
#[command(author = "Unclutter Contributors")]
#[command(version)]
#[command(about = "Strip boilerplate from fetched articles", long_about = None)]
struct Args {
    /// Local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    input: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (html, text, json)
    #[arg(short, long, default_value = "html", value_name = "FORMAT")]
    format: OutputFormat,

    /// Record per-candidate scores instead of pruning
    #[arg(long)]
    annotate: bool,

    /// Skip content signatures and always score
    #[arg(long)]
    no_signatures: bool,

    /// Extra content signature, tried before the built-in ones (repeatable)
    #[arg(long = "signature", value_name = "SELECTOR")]
    signatures: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "unclutter_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Body text with blank lines dropped and each line trimmed
fn body_text(doc: &Document) -> String {
    let text = doc.body().map(|body| body.text()).unwrap_or_else(|| doc.text_content());
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe(outcome: &Outcome) -> String {
    match &outcome.strategy {
        Strategy::Signature { selector } => format!("signature {}", selector),
        Strategy::Heuristic => format!("heuristic (score {:.1})", outcome.score.unwrap_or_default()),
        Strategy::Fallback => "fallback".to_string(),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "unclutter", &mut io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);
    tracing::debug!(?args, "parsed arguments");

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let input = args.input.as_deref().unwrap_or("-");
    let source = Source::from_arg(input);

    if args.verbose {
        match &source {
            Source::Stdin => print_step(1, 4, "Reading from stdin"),
            Source::File(path) => print_step(1, 4, &format!("Reading from file {}", path.bright_white())),
        }
    }

    let html = source
        .read()
        .with_context(|| format!("Failed to read input: {}", input))?;

    if args.verbose {
        print_detail("Size:", &format_size(html.len()));
        eprintln!();
        print_step(2, 4, "Parsing HTML document");
    }

    let mut doc = Document::parse(&html).context("Failed to parse HTML")?;

    if args.verbose {
        if let Some(title) = doc.title() {
            print_detail("Title:", &title);
        }
        print_detail("Elements:", &doc.element_count().to_string());
        eprintln!();
        print_step(3, 4, "Removing boilerplate");
    }

    let config = FilterConfig::builder()
        .annotate(args.annotate)
        .use_signatures(!args.no_signatures)
        .extra_signatures(args.signatures.clone())
        .build();
    let filter = BoilerplateFilter::with_config(config).context("Invalid content signature")?;

    let mut annotations: Vec<Annotation> = Vec::new();
    let outcome = filter.apply_with_sink(&mut doc, &mut annotations);

    if args.verbose {
        print_detail("Strategy:", &describe(&outcome));
        print_detail("Content root:", &outcome.best_tag);
        print_detail("Removed:", &outcome.removed.to_string());
        if outcome.annotated {
            print_detail("Annotations:", &annotations.len().to_string());
        }
        eprintln!();
    }

    if outcome.strategy == Strategy::Fallback && !outcome.annotated {
        print_warning("No content root found, document kept whole");
    }

    let output = match args.format {
        OutputFormat::Html => doc.as_string(),
        OutputFormat::Text => body_text(&doc),
        OutputFormat::Json => Report::new(&outcome, &annotations, &doc)
            .to_json()
            .context("Failed to serialize report")?,
    };

    if args.verbose {
        print_step(4, 4, "Writing output");
        print_detail("Format:", &format!("{:?}", args.format));
        eprintln!();
    }

    match args.output {
        Some(path) => {
            write_file(&path, &output).with_context(|| format!("Failed to write output: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}
