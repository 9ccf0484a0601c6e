use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::Parser;
use clipmark_core::{
    BulletListMarker, Capture, CaptureConfig, CaptureResult, CodeBlockStyle, Document, FetchConfig, HeadingStyle,
    HttpImageProbe, LinkStyle, content_quality_score, fetch_file, fetch_stdin, fetch_url, is_paywall_present,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use url::Url;

#[cfg(test)]
mod completions;
mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What gets written for a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// Frontmatter, a blank line, then the markdown
    Markdown,
    /// The full capture result as JSON
    Json,
    /// The cleaned HTML of the main content
    Html,
    /// Plain text of the main content
    Text,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Html => "html",
            Self::Text => "txt",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(format!("Invalid format: {}. Valid options: markdown, json, html, text", s)),
        }
    }
}

/// Capture a web page as clean markdown with YAML frontmatter
#[derive(Parser, Debug)]
#[command(name = "clipmark")]
#[command(version, about = "Capture web pages as clean markdown", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE", conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Write into DIR using a dated file name derived from the title
    #[arg(short = 'd', long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Output format (markdown, json, html, text)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    format: OutputFormat,

    /// Custom content selector, tried before the built-in ones (repeatable)
    #[arg(short = 's', long = "selector", value_name = "CSS")]
    selectors: Vec<String>,

    /// Extra selector removed from the content (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "CSS")]
    excludes: Vec<String>,

    /// Document URL for file or stdin input
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Keep ad-like blocks
    #[arg(long)]
    keep_ads: bool,

    /// Keep navigation, headers and footers
    #[arg(long)]
    keep_nav: bool,

    /// Skip the cleaning pass entirely
    #[arg(long)]
    no_clean: bool,

    /// Do not wait for images before extracting
    #[arg(long)]
    no_wait: bool,

    /// Omit the frontmatter block
    #[arg(long, conflicts_with = "minimal_frontmatter")]
    no_frontmatter: bool,

    /// Only title, url, domain, capture date, tags and word count in the frontmatter
    #[arg(long)]
    minimal_frontmatter: bool,

    /// Heading style (atx, setext)
    #[arg(long, default_value = "atx", value_name = "STYLE")]
    heading_style: HeadingStyle,

    /// Bullet list marker (-, *, +)
    #[arg(long, default_value = "-", value_name = "MARKER", allow_hyphen_values = true)]
    bullet: BulletListMarker,

    /// Code block style (fenced, indented)
    #[arg(long, default_value = "fenced", value_name = "STYLE")]
    code_style: CodeBlockStyle,

    /// Link style (inlined, referenced)
    #[arg(long, default_value = "inlined", value_name = "STYLE")]
    link_style: LinkStyle,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Print the content quality score and paywall check to stderr
    #[arg(long)]
    diagnostics: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn capture_config(&self) -> CaptureConfig {
        let mut builder = CaptureConfig::builder()
            .clean_html(!self.no_clean)
            .remove_ads(!self.keep_ads)
            .remove_navigation(!self.keep_nav)
            .wait_for_dynamic_content(!self.no_wait)
            .generate_frontmatter(!self.no_frontmatter)
            .include_metadata(!self.minimal_frontmatter)
            .heading_style(self.heading_style)
            .bullet_list_marker(self.bullet)
            .code_block_style(self.code_style)
            .link_style(self.link_style);

        for selector in &self.selectors {
            builder = builder.custom_selector(selector);
        }
        for selector in &self.excludes {
            builder = builder.exclude_selector(selector);
        }
        builder.build()
    }

    fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig { timeout: self.timeout, ..Default::default() };
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        config
    }

    fn is_remote(&self) -> bool {
        Url::parse(&self.input).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "clipmark=debug,clipmark_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn render(result: &CaptureResult, format: OutputFormat) -> anyhow::Result<String> {
    let output = match format {
        OutputFormat::Markdown => result.document(),
        OutputFormat::Json => serde_json::to_string_pretty(result).context("Failed to serialize capture")?,
        OutputFormat::Html => result.extraction.content.clone(),
        OutputFormat::Text => format!("{}\n", result.extraction.cleaned_content),
    };
    Ok(output)
}

fn output_path(args: &Args, result: &CaptureResult) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = &args.output {
        return Ok(Some(path.clone()));
    }
    let Some(dir) = &args.output_dir else {
        return Ok(None);
    };

    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let file_name = Path::new(&result.suggested_filename()).with_extension(args.format.extension());
    Ok(Some(dir.join(file_name)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let started = Instant::now();
    let mut timings = Vec::new();
    let fetch_config = args.fetch_config();

    let (html, document_url) = if args.input == "-" {
        if args.verbose {
            echo::print_step(1, 4, "Reading from stdin");
        }
        (fetch_stdin().context("Failed to read from stdin")?, args.url.clone())
    } else if args.is_remote() {
        if args.verbose {
            echo::print_step(1, 4, &format!("Fetching from {}", args.input.bright_white().underline()));
        }
        let html = fetch_url(&args.input, &fetch_config).await.context("Failed to fetch URL")?;
        (html, Some(args.url.clone().unwrap_or_else(|| args.input.clone())))
    } else {
        if args.verbose {
            echo::print_step(1, 4, &format!("Reading from file {}", args.input.bright_white()));
        }
        let html = fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?;
        (html, args.url.clone())
    };
    timings.push(("Read", started.elapsed()));
    tracing::debug!(bytes = html.len(), url = ?document_url, "input loaded");

    if html.trim().is_empty() {
        bail!("Input is empty");
    }
    if args.verbose {
        echo::print_field("Size", &echo::format_size(html.len()));
        eprintln!();
        echo::print_step(2, 4, "Parsing HTML document");
    }

    let doc = match &document_url {
        Some(url) => Document::parse_with_url(&html, url).with_context(|| format!("Invalid document URL: {}", url))?,
        None => Document::parse(&html),
    };
    if args.verbose
        && let Some(title) = doc.title()
    {
        echo::print_field("Title", &title);
        eprintln!();
    }

    if args.diagnostics {
        echo::print_diagnostics(content_quality_score(&doc), is_paywall_present(&doc));
    }

    if args.verbose {
        echo::print_step(3, 4, "Capturing main content");
    }
    let capture_started = Instant::now();
    let capture = Capture::with_config(args.capture_config());
    let result = if args.is_remote() && !args.no_wait {
        let probe = HttpImageProbe::new(&fetch_config).context("Failed to build image probe")?;
        capture.capture_settled(&doc, &probe).await
    } else {
        capture.capture(&doc)
    }
    .context("Failed to capture page")?;
    timings.push(("Capture", capture_started.elapsed()));
    tracing::debug!(method = %result.extraction.method, words = result.conversion.word_count, "capture finished");

    if args.verbose {
        echo::print_capture_details(&result);
        echo::print_step(4, 4, "Writing output");
        echo::print_field("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    let output = render(&result, args.format)?;

    match output_path(&args, &result)? {
        Some(path) => {
            if path.exists() {
                echo::print_warning(&format!("Overwriting {}", path.display()));
            }
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    if args.verbose {
        echo::print_timing_summary(started.elapsed(), &timings);
    }

    Ok(())
}
