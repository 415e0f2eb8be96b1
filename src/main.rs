use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use dw_sales_assistant::intent_resolver::{self, Selection};
use dw_sales_assistant::render::{self, OutputFormat};
use dw_sales_assistant::schema;
use dw_sales_assistant::{Intent, Session, ViewerConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Sales BI assistant over CSV exports of the warehouse views
#[derive(Parser)]
#[command(name = "dw-assistant")]
#[command(about = "Answer sales BI questions from exported warehouse views")]
struct Args {
    /// Menu option to run (0 = help)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=18))]
    option: Option<u8>,

    /// Free-text question; resolved against the menu, falls back to --option
    #[arg(short, long)]
    question: Option<String>,

    /// Directory holding the CSV exports (or set DW_DATA_DIR)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// JSON config file with data_dir and per-extract file names
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Print the menu and exit
    #[arg(long)]
    menu: bool,

    /// List the extract files and whether they exist, then exit
    #[arg(long)]
    sources: bool,

    /// Print the columns each menu option reads, then exit
    #[arg(long)]
    schema: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Report tables are already capped; let polars print them whole.
fn init_table_format() {
    std::env::set_var("POLARS_FMT_MAX_ROWS", "100");
    std::env::set_var("POLARS_FMT_MAX_COLS", "20");
    std::env::set_var("POLARS_FMT_STR_LEN", "60");
    std::env::set_var("POLARS_FMT_TABLE_HIDE_COLUMN_DATA_TYPES", "1");
    std::env::set_var("POLARS_FMT_TABLE_HIDE_DATAFRAME_SHAPE", "1");
}

fn print_menu() {
    for line in Intent::menu() {
        println!("{}", line);
    }
}

fn print_sources(session: &Session) {
    for source in session.sources() {
        let mark = if source.present { "ok" } else { "missing" };
        println!("{:<28} {:<8} {}", source.kind.logical_name(), mark, source.path.display());
    }
}

fn print_schema() {
    for intent in Intent::ALL {
        println!("{}", intent);
        for line in schema::describe(intent) {
            println!("    {}", line);
        }
    }
}

fn run_once(session: &mut Session, intent: Intent, format: OutputFormat) -> Result<()> {
    let output = session.run(intent)?;
    print!("{}", render::render(&output, format)?);
    Ok(())
}

/// Read options or questions line by line until `q`; errors are printed and
/// the loop carries on with the same session.
fn interactive(session: &mut Session, format: OutputFormat) -> Result<()> {
    print_menu();
    let mut current = Intent::Help;
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("\n[{}] > ", current.id());
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if matches!(input.to_lowercase().as_str(), "q" | "quit" | "sair") {
            break;
        }
        if input.is_empty() {
            continue;
        }

        current = match intent_resolver::select_line(current, input) {
            Selection::Run(intent) => intent,
            Selection::UnknownOption(id) => {
                println!("Unknown menu option {} (0-18)", id);
                continue;
            }
        };

        if let Err(err) = run_once(session, current, format) {
            error!("Report failed: {}", err);
            println!("Error: {}", err);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();
    init_table_format();

    let args = Args::parse();
    let config = ViewerConfig::resolve(args.config.as_deref(), args.data_dir.clone())?;
    info!(data_dir = %config.data_dir.display(), "Configuration resolved");
    let mut session = Session::from_config(&config);
    let format = OutputFormat::from(args.format);

    if args.menu {
        print_menu();
        return Ok(());
    }
    if args.sources {
        print_sources(&session);
        return Ok(());
    }
    if args.schema {
        print_schema();
        return Ok(());
    }

    if args.option.is_none() && args.question.is_none() {
        return interactive(&mut session, format);
    }

    let menu = match args.option {
        Some(id) => match Intent::from_id(id) {
            Some(intent) => intent,
            None => bail!("unknown menu option {}", id),
        },
        None => Intent::Help,
    };
    let intent = intent_resolver::select(menu, args.question.as_deref());

    if let Err(err) = run_once(&mut session, intent, format) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
    Ok(())
}
