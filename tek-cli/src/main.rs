use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tek_core::lint::default_rules;
use tek_core::{CheckOutput, LintConfig, check_path, check_source};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

/// Check Tek sources for syntax errors and lint problems.
#[derive(Parser, Debug)]
#[command(name = "tek", version, about, long_about = None)]
struct Cli {
    /// Files or directories to check; reads stdin when omitted.
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    #[arg(long, value_name = "RULE", help = "Do not run the named lint rule")]
    disable: Vec<String>,

    #[arg(
        long = "global",
        value_name = "NAME",
        help = "Treat NAME as defined in every file"
    )]
    globals: Vec<String>,

    #[arg(long, help = "Print the available lint rules and exit")]
    list_rules: bool,

    #[arg(short, long, help = "Log each pipeline phase to stderr")]
    verbose: bool,
}

impl Cli {
    fn lint_config(&self) -> LintConfig {
        let mut config = LintConfig::default();
        config.disabled.extend(self.disable.iter().cloned());
        config.globals.extend(self.globals.iter().cloned());
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match execute(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn execute(cli: Cli) -> Result<ExitCode> {
    let config = cli.lint_config();

    if cli.list_rules {
        for rule in default_rules(&config) {
            println!("{:<28}{}", rule.name(), rule.description());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut problems = 0;
    if cli.paths.is_empty() {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("failed to read source from stdin")?;
        let output = check_source(&source, &config).context("failed to check <stdin>")?;
        problems += print_diagnostics(Path::new("<stdin>"), &output);
    } else {
        for root in &cli.paths {
            let results = check_path(root, &config)
                .with_context(|| format!("failed to check {}", root.display()))?;
            debug!(root = %root.display(), files = results.len(), "checked path");
            for (file, output) in &results {
                problems += print_diagnostics(&file.path, output);
            }
        }
    }

    if problems > 0 {
        let plural = if problems == 1 { "" } else { "s" };
        eprintln!("found {problems} problem{plural}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_diagnostics(path: &Path, output: &CheckOutput) -> usize {
    let mut count = 0;
    for diagnostic in output.diagnostics() {
        println!("{}:{diagnostic}", path.display());
        count += 1;
    }
    count
}
