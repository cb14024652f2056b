use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use serapis_core::{
    ArticleApiExtractor, DirectFetchExtractor, ExtractionRequest, Extractor, Record, SerapisConfig, read_html_source,
};
use tracing_subscriber::EnvFilter;

mod echo;

use echo::{
    format_size, print_banner, print_error, print_info, print_record_summary, print_step, print_success,
    print_warning,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extraction backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Direct,
    ArticleApi,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "article-api" | "api" | "diffbot" => Ok(Self::ArticleApi),
            _ => Err(format!("Invalid backend: {}. Valid options: direct, article-api", s)),
        }
    }
}

/// Extract sentences mentioning a term from a web page, as JSON
#[derive(Parser, Debug)]
#[command(name = "serapis")]
#[command(author = "Serapis Contributors")]
#[command(version)]
#[command(about = "Extract term-bearing sentences and presentation features from web pages", long_about = None)]
struct Args {
    /// Page URL
    #[arg(value_name = "URL", required_unless_present = "completions")]
    url: Option<String>,

    /// Search term
    #[arg(value_name = "TERM", required_unless_present = "completions")]
    term: Option<String>,

    /// Extraction backend (direct, article-api)
    #[arg(short, long, default_value = "direct", value_name = "BACKEND")]
    backend: Backend,

    /// Configuration file (default: user config dir)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read the page from a local file or "-" for stdin instead of fetching URL
    #[arg(long, value_name = "FILE")]
    html: Option<String>,

    /// Number of fetch attempts
    #[arg(long, value_name = "NUM")]
    retries: Option<u32>,

    /// Seconds to wait between fetch attempts
    #[arg(long, value_name = "SECS")]
    retry_delay: Option<f64>,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Include the page HTML in the record
    #[arg(long)]
    save_html: bool,

    /// Article API token
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pretty-print the JSON record
    #[arg(long)]
    pretty: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "serapis_core=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

/// Configuration file (or defaults), then environment, then flags.
fn resolve_config(args: &Args) -> anyhow::Result<SerapisConfig> {
    let config = match &args.config {
        Some(path) => SerapisConfig::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => SerapisConfig::load().context("Failed to load configuration")?,
    };
    let mut config = config.with_env_overrides().context("Invalid environment configuration")?;

    if let Some(retries) = args.retries {
        config.request_retry = retries;
    }
    if let Some(delay) = args.retry_delay {
        config.request_seconds_before_retry = delay;
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_seconds = timeout;
    }
    if let Some(user_agent) = &args.user_agent {
        config.user_agent = Some(user_agent.clone());
    }
    if let Some(token) = &args.token {
        config.credentials.diffbot = Some(token.clone());
    }
    if args.save_html {
        config.save_html = true;
    }

    Ok(config)
}

fn run_extraction(args: &Args, config: SerapisConfig, request: &ExtractionRequest) -> anyhow::Result<Option<Record>> {
    match (args.backend, &args.html) {
        (Backend::Direct, Some(source)) => {
            let html = read_html_source(source).with_context(|| format!("Failed to read HTML: {}", source))?;
            if args.verbose {
                eprintln!("  {} {}", "Size:".dimmed(), format_size(html.len()).bright_white());
            }

            let extractor = DirectFetchExtractor::new(config).context("Failed to build HTTP client")?;
            let record = extractor.parse_html(request, &html).context("Failed to process HTML")?;
            Ok(Some(record))
        }
        (Backend::Direct, None) => {
            let extractor = DirectFetchExtractor::new(config).context("Failed to build HTTP client")?;
            Ok(extractor.extract(request))
        }
        (Backend::ArticleApi, Some(_)) => anyhow::bail!("--html only works with the direct backend"),
        (Backend::ArticleApi, None) => {
            let extractor = ArticleApiExtractor::new(config).context("Failed to build HTTP client")?;
            Ok(extractor.extract(request))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "serapis", &mut io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);

    let (Some(url), Some(term)) = (args.url.as_deref(), args.term.as_deref()) else {
        anyhow::bail!("URL and TERM are required");
    };

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
        print_step(1, 3, "Loading configuration");
    }

    let config = resolve_config(&args)?;

    if args.verbose {
        let message = match &args.html {
            Some(source) => format!("Reading {} as {}", source.bright_white(), url.bright_white().underline()),
            None => format!("Extracting '{}' from {}", term, url.bright_white().underline()),
        };
        print_step(2, 3, &message);
    }

    let request = ExtractionRequest::new(url, term);
    let Some(record) = run_extraction(&args, config, &request)? else {
        print_error(&format!("No record produced for {}", url));
        std::process::exit(1);
    };

    if args.verbose {
        print_record_summary(&record);
    }
    if record.sentences.is_empty() {
        print_warning(&format!("No sentences mention '{}'", term));
    }

    let output = if args.pretty {
        serde_json::to_string_pretty(&record).context("Failed to serialize record")?
    } else {
        serde_json::to_string(&record).context("Failed to serialize record")?
    };

    if args.verbose {
        print_step(3, 3, "Writing output");
    }

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", output))
                .with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Record written to {}", path.display().bright_white()));
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("direct".parse::<Backend>(), Ok(Backend::Direct));
        assert_eq!("Article-API".parse::<Backend>(), Ok(Backend::ArticleApi));
        assert!("ftp".parse::<Backend>().is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "serapis",
            "https://example.com",
            "term",
            "--retries",
            "5",
            "--retry-delay",
            "0.5",
            "--token",
            "abc",
            "--save-html",
        ]);
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.request_retry, 5);
        assert_eq!(config.request_seconds_before_retry, 0.5);
        assert_eq!(config.credentials.diffbot.as_deref(), Some("abc"));
        assert!(config.save_html);
    }

    #[test]
    fn test_url_and_term_required() {
        assert!(Args::try_parse_from(["serapis", "https://example.com"]).is_err());
        assert!(Args::try_parse_from(["serapis", "--completions", "bash"]).is_ok());
    }
}
