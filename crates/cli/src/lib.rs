use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use simtab_naming::ParameterMap;
use simtab_query::{
    compute_unique_within, filter, sort_by_distinctiveness, SliceOptions, Slicer,
};
use simtab_store::{Entry, Registry, SimtabConfig};

use crate::flags::{parse_constraint, parse_delimiter, DataTypeFlag};
use crate::report::SliceSummary;

mod flags;
mod report;

fn print_stdout(text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "simtab")]
#[command(about = "Browse, filter and slice parameter-named result files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: simtab.toml in the results directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Cell delimiter inside result files (a character, `tab` or `space`)
    #[arg(long, global = true, value_parser = parse_delimiter)]
    delimiter: Option<char>,

    /// Separator between base name and parameters in file names
    #[arg(long, global = true)]
    separator: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List entries with the parameters that tell them apart
    List(ListArgs),

    /// Pivot scalar results along one parameter
    Slice(SliceArgs),

    /// Print a column or an expression over columns of one file
    Get(GetArgs),

    /// Print the scalar results of one file
    Results(ResultsArgs),
}

#[derive(Args)]
struct FilterArgs {
    /// Results directory, searched recursively
    dir: PathBuf,

    /// Keep entries whose base name contains KEYWORD (repeatable)
    #[arg(long = "keyword", short = 'k')]
    keywords: Vec<String>,

    /// Keep entries whose parameter KEY starts with PREFIX (repeatable)
    #[arg(long = "where", short = 'w', value_name = "KEY=PREFIX", value_parser = parse_constraint)]
    constraints: Vec<(String, String)>,
}

impl FilterArgs {
    fn constraint_map(&self) -> ParameterMap {
        self.constraints.iter().cloned().collect()
    }
}

#[derive(Args)]
struct ListArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Output JSON summaries instead of labels
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SliceArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Parameter that varies inside a slice
    #[arg(long)]
    pivot: String,

    /// Only group entries sharing a base name
    #[arg(long)]
    match_base_name: bool,

    /// Build slices without writing them
    #[arg(long)]
    dry_run: bool,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GetArgs {
    /// Result file
    file: PathBuf,

    /// Column name, column index or expression over column names
    selector: String,

    /// Type to cast values to
    #[arg(long = "type", value_enum, default_value_t = DataTypeFlag::Float)]
    data_type: DataTypeFlag,
}

#[derive(Args)]
struct ResultsArgs {
    /// Result file
    file: PathBuf,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

/// Options shared by every subcommand
struct Settings {
    config: Option<PathBuf>,
    delimiter: Option<char>,
    separator: Option<String>,
    quiet: bool,
}

impl Settings {
    /// Configuration for files under `dir`, with command-line overrides applied.
    fn resolve(&self, dir: &Path) -> Result<SimtabConfig> {
        let mut config = match &self.config {
            Some(path) => SimtabConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => SimtabConfig::discover(dir)?,
        };
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(separator) = &self.separator {
            config.name_separator = separator.clone();
        }
        config.validate()?;
        Ok(config)
    }

    fn load_registry(&self, dir: &Path) -> Result<Registry> {
        let mut registry = Registry::new(self.resolve(dir)?);
        let report = registry
            .load_from_folder(dir)
            .with_context(|| format!("Failed to load results from {}", dir.display()))?;
        if !self.quiet {
            eprintln!("{}", report::render_load_report(&report));
        }
        Ok(registry)
    }
}

fn parent_dir(file: &Path) -> &Path {
    file.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let settings = Settings {
        config: cli.config,
        delimiter: cli.delimiter,
        separator: cli.separator,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::List(args) => run_list(&settings, args),
        Commands::Slice(args) => run_slice(&settings, args),
        Commands::Get(args) => run_get(&settings, args),
        Commands::Results(args) => run_results(&settings, args),
    }
}

fn run_list(settings: &Settings, args: ListArgs) -> Result<()> {
    let mut registry = settings.load_registry(&args.filter.dir)?;
    let constraints = args.filter.constraint_map();
    let mut selected = filter(registry.iter_mut(), &args.filter.keywords, &constraints);
    compute_unique_within(&mut selected);
    sort_by_distinctiveness(&mut selected);

    if args.json {
        let summaries: Vec<_> = selected.iter().map(|entry| entry.summary()).collect();
        print_stdout(&serde_json::to_string_pretty(&summaries)?)
    } else {
        print_stdout(&report::render_labels(&selected))
    }
}

fn run_slice(settings: &Settings, args: SliceArgs) -> Result<()> {
    let mut registry = settings.load_registry(&args.filter.dir)?;
    let slicer = Slicer::new(registry.config());
    let constraints = args.filter.constraint_map();
    let mut selected = filter(registry.iter_mut(), &args.filter.keywords, &constraints);

    let options = SliceOptions::new(&args.pivot).match_base_name(args.match_base_name);
    let derived = if args.dry_run {
        slicer.slice(&options, &mut selected)?
    } else {
        slicer
            .slice_and_save(&options, &mut selected)
            .with_context(|| format!("Failed to save slices along '{}'", args.pivot))?
    };

    if derived.is_empty() && !settings.quiet {
        eprintln!("No slices along '{}'", args.pivot);
    }
    let summaries = derived
        .iter()
        .map(SliceSummary::from_entry)
        .collect::<Result<Vec<_>>>()?;
    if args.json {
        print_stdout(&serde_json::to_string_pretty(&summaries)?)
    } else {
        print_stdout(&report::render_slices(&summaries))
    }
}

fn run_get(settings: &Settings, args: GetArgs) -> Result<()> {
    let config = settings.resolve(parent_dir(&args.file))?;
    let entry = Entry::open(&args.file, &config)?;
    let values = entry
        .get(&args.selector, args.data_type.as_domain())
        .with_context(|| format!("Failed to read '{}'", args.selector))?;

    let lines: Vec<String> = values.iter().map(ToString::to_string).collect();
    print_stdout(&lines.join("\n"))
}

fn run_results(settings: &Settings, args: ResultsArgs) -> Result<()> {
    let config = settings.resolve(parent_dir(&args.file))?;
    let mut entry = Entry::open(&args.file, &config)?;
    let results = entry.scalar_results(&config.result_columns)?;

    if args.json {
        print_stdout(&serde_json::to_string_pretty(results)?)
    } else {
        print_stdout(&report::render_scalars(results))
    }
}
