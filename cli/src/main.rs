use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docsearch_core::emit::{paint, Instruction, RenderSink};
use docsearch_core::engine::{source_for_path, QueryOutcome, SearchEngine};
use docsearch_core::feed::IndexFeed;
use docsearch_core::navigate::{Navigation, Viewport};
use docsearch_core::persist::{save_snapshot, IndexPaths};
use docsearch_core::{PageId, SearchConfig, SearchWidget};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Search a precomputed documentation index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Index feed (JSON file) or compiled snapshot directory
    #[arg(long, default_value = "./index")]
    index: String,
    /// Search configuration (JSON)
    #[arg(long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one query and print the result rows
    Search {
        #[command(flatten)]
        source: IndexArgs,
        /// Show the pages of this term even if its group is collapsed
        #[arg(long)]
        expand: Option<String>,
        /// Print the render instructions as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Resolve the location for a result row
    Go {
        #[command(flatten)]
        source: IndexArgs,
        #[arg(long)]
        page: PageId,
        #[arg(long)]
        term: String,
        /// Location currently shown by the viewer
        #[arg(long, default_value = "")]
        current: String,
    },
    /// Decode a JSON feed once and write a compiled snapshot directory
    Compile {
        #[arg(long)]
        input: String,
        #[arg(long)]
        output: String,
    },
    /// Print page, bucket and posting counts
    Stats {
        #[command(flatten)]
        source: IndexArgs,
    },
    /// Line-driven search session; every line is a new input value
    Interactive {
        #[command(flatten)]
        source: IndexArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { source, expand, json, query } => search(&source, &query.join(" "), expand.as_deref(), json),
        Commands::Go { source, page, term, current } => go(&source, page, &term, current),
        Commands::Compile { input, output } => compile(&input, &output),
        Commands::Stats { source } => stats(&source),
        Commands::Interactive { source } => interactive(&source),
    }
}

fn open_engine(args: &IndexArgs) -> Result<SearchEngine> {
    let config = match &args.config {
        Some(path) => SearchConfig::from_json_file(path)?,
        None => SearchConfig::default(),
    };
    Ok(SearchEngine::new(source_for_path(&args.index), config))
}

fn search(args: &IndexArgs, raw: &str, expand: Option<&str>, json: bool) -> Result<()> {
    let engine = open_engine(args)?;
    let outcome = engine.search(raw, expand)?;
    if json {
        let value = match &outcome {
            QueryOutcome::NoQuery => serde_json::json!({ "no_query": true }),
            QueryOutcome::Results(r) => serde_json::to_value(r)?,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    if let QueryOutcome::Results(results) = outcome {
        paint(&results, &mut TerminalSink::default());
    }
    Ok(())
}

fn go(args: &IndexArgs, page: PageId, term: &str, current: String) -> Result<()> {
    let engine = open_engine(args)?;
    let mut viewport = Viewport::at(current);
    println!("{}", describe_navigation(&engine.navigate(page, term, &mut viewport)?));
    Ok(())
}

fn compile(input: &str, output: &str) -> Result<()> {
    let f = File::open(input).with_context(|| format!("opening feed {input}"))?;
    let index = IndexFeed::from_reader(BufReader::new(f))?.decode()?;
    save_snapshot(&IndexPaths::new(output), &index)?;
    tracing::info!(output, pages = index.page_count(), postings = index.posting_count(), "snapshot written");
    Ok(())
}

fn stats(args: &IndexArgs) -> Result<()> {
    let engine = open_engine(args)?;
    let index = engine.index()?;
    println!("pages:    {}", index.page_count());
    println!("buckets:  {}", index.bucket_count());
    println!("postings: {}", index.posting_count());
    let mut buckets: Vec<(char, usize)> = index.buckets().map(|(k, v)| (k, v.len())).collect();
    buckets.sort();
    for (letter, count) in buckets {
        println!("  {letter}  {count}");
    }
    Ok(())
}

fn interactive(args: &IndexArgs) -> Result<()> {
    let engine = open_engine(args)?;
    let mut widget = SearchWidget::new(&engine, TerminalSink::default());
    let mut viewport = Viewport::default();
    let stdin = io::stdin();

    prompt(false)?;
    for line in stdin.lock().lines() {
        let line = line?;
        match SessionCommand::parse(&line) {
            SessionCommand::Quit => break,
            SessionCommand::Clear => widget.clear_input()?,
            SessionCommand::Expand(term) => widget.expand(term)?,
            SessionCommand::GoFirst => match widget.go_first(&mut viewport)? {
                Some(nav) => println!("{}", describe_navigation(&nav)),
                None => println!("nothing to open"),
            },
            SessionCommand::Open(page, term) => {
                let term = term.unwrap_or(widget.input()).to_string();
                println!("{}", describe_navigation(&widget.activate(page, &term, &mut viewport)?));
            }
            SessionCommand::Invalid(reason) => println!("{reason}"),
            SessionCommand::Input(value) => widget.on_input(value)?,
        }
        prompt(widget.sink().clear_visible)?;
    }
    Ok(())
}

fn prompt(clear_visible: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "{}", if clear_visible { "search [x]> " } else { "search> " })?;
    out.flush()?;
    Ok(())
}

fn describe_navigation(nav: &Navigation) -> String {
    match nav {
        Navigation::Loaded(location) => format!("open {location}"),
        Navigation::AlreadyShowing => "already showing".to_string(),
        Navigation::UnknownPage => "unknown page".to_string(),
    }
}

#[derive(Debug, PartialEq)]
enum SessionCommand<'a> {
    Quit,
    Clear,
    Expand(&'a str),
    GoFirst,
    Open(PageId, Option<&'a str>),
    Invalid(&'static str),
    Input(&'a str),
}

impl<'a> SessionCommand<'a> {
    fn parse(line: &'a str) -> Self {
        let Some(rest) = line.strip_prefix(':') else {
            return SessionCommand::Input(line);
        };
        let (cmd, arg) = rest.split_once(' ').unwrap_or((rest, ""));
        match cmd {
            "q" | "quit" => SessionCommand::Quit,
            "clear" => SessionCommand::Clear,
            "go" => SessionCommand::GoFirst,
            "expand" if !arg.is_empty() => SessionCommand::Expand(arg),
            "expand" => SessionCommand::Invalid("usage: :expand TERM"),
            "open" => {
                let (id, term) = match arg.split_once(' ') {
                    Some((id, term)) => (id, Some(term)),
                    None => (arg, None),
                };
                match id.parse() {
                    Ok(id) => SessionCommand::Open(id, term),
                    Err(_) => SessionCommand::Invalid("usage: :open PAGE [TERM]"),
                }
            }
            _ => SessionCommand::Invalid("commands: :expand TERM, :go, :open PAGE [TERM], :clear, :quit"),
        }
    }
}

/// Prints result rows to stdout, pages indented under their term.
#[derive(Default)]
struct TerminalSink {
    clear_visible: bool,
}

impl RenderSink for TerminalSink {
    fn clear(&mut self) {}

    fn render(&mut self, instruction: &Instruction) { println!("{}", render_line(instruction)); }

    fn set_clear_visible(&mut self, visible: bool) { self.clear_visible = visible; }
}

fn render_line(instruction: &Instruction) -> String {
    match instruction {
        Instruction::Header { term } => term.clone(),
        Instruction::PageLink { page_id, title, .. } => format!("    [{page_id}] {title}"),
        Instruction::NoResults => "No results found".to_string(),
    }
}
