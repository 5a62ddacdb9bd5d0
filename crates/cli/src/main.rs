use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use readmode_core::{
    ContentPattern, FetchConfig, FileStore, FontWeight, KeyValueStore, Locator, LocatorConfig, MemoryStore, Page,
    ReaderError, ReaderMode, ReaderSettings, Theme, TocEntry, fetch_file, fetch_stdin, fetch_url, handle_json,
    load_settings, parse_page_url, save_settings,
};
use tracing_subscriber::EnvFilter;
use url::Url;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What to write for the reader content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Markdown,
    Html,
    Text,
    Toc,
    Print,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            "toc" => Ok(Self::Toc),
            "print" | "pdf" => Ok(Self::Print),
            _ => Err(format!("Invalid format: {}. Valid options: markdown, html, text, toc, print", s)),
        }
    }
}

/// Show the main content of a web page in reader mode and export it to Markdown
#[derive(Parser, Debug)]
#[command(name = "readmode")]
#[command(author = "readmode contributors")]
#[command(version)]
#[command(about = "Read web pages without the clutter", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    input: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (markdown, html, text, toc, print)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    format: OutputFormat,

    /// Also save the Markdown as <title>.md in this directory
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// URL that relative links and images resolve against
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Extra content selector, tried before the built-in ones (repeatable)
    #[arg(long = "pattern", value_name = "SELECTOR")]
    patterns: Vec<String>,

    /// Settings file (default: readmode/settings.json in the config dir)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Color theme (light, dark, auto)
    #[arg(long, value_name = "THEME")]
    theme: Option<Theme>,

    /// Font size in pixels
    #[arg(long, value_name = "PX")]
    font_size: Option<u32>,

    /// Content width in pixels
    #[arg(long, value_name = "PX")]
    width: Option<u32>,

    /// Font family name, system-ui, or a custom font name
    #[arg(long, value_name = "FAMILY")]
    font_family: Option<String>,

    /// Line height multiplier
    #[arg(long, value_name = "NUM")]
    line_height: Option<f64>,

    /// Font weight (normal, 500, bold)
    #[arg(long, value_name = "WEIGHT")]
    font_weight: Option<FontWeight>,

    /// Persist the effective settings
    #[arg(long)]
    save_settings: bool,

    /// Resolve the auto theme as dark
    #[arg(long)]
    dark: bool,

    /// Send one JSON message (e.g. {"action":"toggle"}) and print the reply
    #[arg(long, value_name = "JSON")]
    message: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,
}

impl Args {
    /// Applies command-line overrides on top of stored settings.
    fn apply_overrides(&self, settings: &mut ReaderSettings) {
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if let Some(size) = self.font_size {
            settings.font_size = size;
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(line_height) = self.line_height {
            settings.line_height = line_height;
        }
        if let Some(weight) = self.font_weight {
            settings.font_weight = weight;
        }
        if let Some(family) = &self.font_family {
            match family.as_str() {
                "system-ui" | "custom" => settings.font_family = family.clone(),
                name => {
                    settings.font_family = "custom".to_string();
                    settings.custom_font = name.to_string();
                }
            }
        }
    }

    fn locator(&self) -> anyhow::Result<Locator> {
        let mut builder = LocatorConfig::builder();
        for raw in self.patterns.iter().rev() {
            let pattern: ContentPattern = raw.parse().with_context(|| format!("Invalid --pattern {:?}", raw))?;
            builder = builder.prepend_pattern(pattern);
        }
        Ok(Locator::with_config(builder.build()))
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "readmode_core=debug,readmode=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

async fn read_input(args: &Args, input: &str) -> anyhow::Result<String> {
    if input == "-" {
        if args.verbose {
            echo::print_step(1, 4, "Reading from stdin");
        }
        fetch_stdin().context("Failed to read from stdin")
    } else if is_url(input) {
        if args.verbose {
            echo::print_step(1, 4, &format!("Fetching from {}", input.bright_white().underline()));
        }
        let mut config = FetchConfig { timeout: args.timeout, ..Default::default() };
        if let Some(user_agent) = &args.user_agent {
            config.user_agent = user_agent.clone();
        }
        fetch_url(input, &config).await.context("Failed to fetch URL")
    } else {
        if args.verbose {
            echo::print_step(1, 4, &format!("Reading from file {}", input.bright_white()));
        }
        fetch_file(input).with_context(|| format!("Failed to read file: {}", input))
    }
}

fn base_url(args: &Args, input: &str) -> anyhow::Result<Option<Url>> {
    match &args.base_url {
        Some(raw) => Ok(Some(parse_page_url(raw).context("Invalid --base-url")?)),
        None if is_url(input) => Ok(parse_page_url(input).ok()),
        None => Ok(None),
    }
}

fn settings_store(args: &Args) -> Box<dyn KeyValueStore> {
    match args.settings.clone().or_else(|| FileStore::default_location("settings")) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using settings file");
            Box::new(FileStore::new(path))
        }
        None => Box::new(MemoryStore::new()),
    }
}

fn render_toc(entries: &[TocEntry]) -> String {
    if entries.is_empty() {
        return format!("{}\n", readmode_core::toc::NO_HEADINGS);
    }

    entries
        .iter()
        .map(|entry| format!("{}- [{}](#{})\n", "  ".repeat(entry.level - 1), entry.text, entry.anchor))
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "readmode", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);

    let Some(input) = args.input.as_deref() else {
        anyhow::bail!("INPUT is required");
    };

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let html = read_input(&args, input).await?;

    if args.verbose {
        echo::print_detail("Size", &echo::format_size(html.len()));
        eprintln!();
        echo::print_step(2, 4, "Parsing HTML document");
    }

    let page = Page::parse(&html, base_url(&args, input)?);

    if args.verbose
        && let Some(title) = &page.title
    {
        echo::print_detail("Title", title);
        eprintln!();
    }

    let store = settings_store(&args);
    let mut settings = load_settings(store.as_ref()).await;
    args.apply_overrides(&mut settings);

    if args.save_settings {
        if save_settings(store.as_ref(), &settings).await {
            echo::print_success("Settings saved");
        } else {
            echo::print_warning("Settings could not be saved");
        }
    }

    if args.verbose {
        echo::print_settings(&settings);
    }

    let locator = args.locator()?;
    let mut reader = ReaderMode::new(page).with_settings(settings).with_locator(locator.clone());

    if let Some(message) = &args.message {
        println!("{}", handle_json(&mut reader, message));
        return Ok(());
    }

    if args.verbose {
        echo::print_step(3, 4, "Locating main content");
        if let Some((_, location)) = locator.locate_with_reason(&reader.page().body) {
            echo::print_location(location, locator.config());
        }
        eprintln!();
    }

    if !reader.enable() {
        echo::print_error(&format!("{} in {}", ReaderError::NoContent, input));
        return Err(ReaderError::NoContent).with_context(|| format!("Failed to enable reader mode for {}", input));
    }

    let Some(view) = reader.view() else {
        anyhow::bail!("reader view missing after enabling");
    };

    let output = match args.format {
        OutputFormat::Markdown => reader.markdown().unwrap_or_default(),
        OutputFormat::Html => view.to_html(args.dark),
        OutputFormat::Print => view.to_print_html(args.dark),
        OutputFormat::Text => format!("{}\n", view.text().trim()),
        OutputFormat::Toc => render_toc(&view.toc),
    };

    if let Some(dir) = &args.export
        && let Some(export) = reader.markdown_export()
    {
        let path = export
            .write_to(dir)
            .with_context(|| format!("Failed to export Markdown to {}", dir.display()))?;
        echo::print_success(&format!("Markdown exported to {}", path.display().bright_white()));
    }

    if args.verbose {
        echo::print_step(4, 4, "Writing output");
        echo::print_detail("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    match &args.output {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["readmode", "page.html"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("MD".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("pdf".parse::<OutputFormat>().unwrap(), OutputFormat::Print);
        assert!("json".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut settings = ReaderSettings::default();
        args(&["--theme", "dark", "--font-size", "20", "--font-family", "Georgia", "--font-weight", "500"])
            .apply_overrides(&mut settings);

        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.font_size, 20);
        assert_eq!(settings.font_family, "custom");
        assert_eq!(settings.custom_font, "Georgia");
        assert_eq!(settings.font_weight, FontWeight::Medium);
        assert_eq!(settings.width, 800);
    }

    #[test]
    fn test_patterns_keep_command_line_order() {
        let locator = args(&["--pattern", ".first", "--pattern", "#second"]).locator().unwrap();
        let patterns: Vec<String> = locator.config().patterns.iter().map(|p| p.to_string()).collect();
        assert_eq!(&patterns[..3], &[".first", "#second", "article"]);
    }

    #[test]
    fn test_render_toc() {
        let entries = vec![
            TocEntry { level: 1, text: "A".into(), anchor: "heading-0".into() },
            TocEntry { level: 3, text: "B".into(), anchor: "heading-1".into() },
        ];
        assert_eq!(render_toc(&entries), "- [A](#heading-0)\n    - [B](#heading-1)\n");
        assert_eq!(render_toc(&[]), "No headings found\n");
    }

    #[test]
    fn test_args_verify() {
        Args::command().debug_assert();
    }
}
