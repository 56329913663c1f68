use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tmtracery::{
    assemble, CompileOptions, GrammarFormat, Machine, MachineDescription, Mode, ProgramLoader,
    ProgramManager,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The Turing machine description to compile
    #[clap(required_unless_present_any = ["builtin", "list"])]
    machine: Option<PathBuf>,

    /// Compile one of the built-in machines instead of a file
    #[clap(short, long, conflicts_with = "machine")]
    builtin: Option<String>,

    /// List the built-in machines and exit
    #[clap(long)]
    list: bool,

    /// Optional input tape file for the machine
    #[clap(short, long)]
    input: Option<PathBuf>,

    /// Optional output filename (defaults to the machine path with `.tracery.json` appended)
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Base grammar template (defaults to the built-in template)
    #[clap(short, long)]
    template: Option<PathBuf>,

    /// Grammar format overrides as JSON
    #[clap(short, long)]
    format: Option<PathBuf>,

    /// Annotate every rule so the expanded text traces each step
    #[clap(short, long)]
    verbose: bool,

    /// Accept machines with missing transitions instead of rejecting them
    #[clap(long)]
    lenient: bool,

    /// Log filter, e.g. `info` or `tmtracery=debug` (overrides RUST_LOG)
    #[clap(long)]
    log_level: Option<String>,

    /// Suppress all logging except errors
    #[clap(short, long)]
    quiet: bool,
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if let Some(level) = &cli.log_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_description(cli: &Cli) -> Result<(MachineDescription, PathBuf)> {
    if let Some(name) = &cli.builtin {
        let description = ProgramManager::get_machine_by_name(name)
            .with_context(|| format!("unknown built-in machine '{}'", name))?;
        return Ok((description, PathBuf::from(format!("{}.json", name))));
    }

    let Some(path) = &cli.machine else {
        bail!("no machine given");
    };

    let description = ProgramLoader::load_machine(path)
        .with_context(|| format!("failed to load machine {}", path.display()))?;
    Ok((description, path.clone()))
}

fn output_path(cli: &Cli, machine_path: &Path) -> PathBuf {
    cli.output
        .clone()
        .unwrap_or_else(|| ProgramLoader::default_output_path(machine_path))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    if cli.list {
        for index in 0..ProgramManager::get_machine_count() {
            let info = ProgramManager::get_machine_info(index)?;
            println!(
                "{}: {} states, {} symbols, {} transitions",
                info.name, info.state_count, info.symbol_count, info.transition_count
            );
        }
        return Ok(());
    }

    let format = match &cli.format {
        Some(path) => ProgramLoader::load_format(path)?,
        None => GrammarFormat::default(),
    };
    format.check()?;

    let options = CompileOptions {
        mode: if cli.lenient {
            Mode::Normal
        } else {
            Mode::Strict
        },
        verbose: cli.verbose,
    };

    let (description, machine_path) = load_description(&cli)?;
    let machine = Machine::new(&description, &format, options.mode)?;

    let input = match &cli.input {
        Some(path) => ProgramLoader::load_input(path)?,
        None => String::new(),
    };

    let template = match &cli.template {
        Some(path) => ProgramLoader::load_template(path)?,
        None => ProgramManager::base_template()?,
    };

    let grammar = assemble(&machine, template, &input, &format, options)?;

    let out = output_path(&cli, &machine_path);
    ProgramLoader::write_grammar(&out, &grammar)
        .with_context(|| format!("failed to write grammar to {}", out.display()))?;

    info!(path = %out.display(), rules = grammar.len(), "grammar written");
    println!("{}", out.display());

    Ok(())
}
