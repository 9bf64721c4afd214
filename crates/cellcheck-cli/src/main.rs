use atty::Stream;
use cellcheck_core::{Config, TestRequest};
use clap::Parser;
use color_eyre::{eyre::eyre, Result};

mod cli;
mod output;
mod style;

use cli::CellcheckCli;
use output::{emit_output, OutputOptions};
use style::Style;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = CellcheckCli::parse();
    init_tracing(cli.trace, cli.verbose);

    let config = build_config(&cli).map_err(|err| eyre!("{err:#}"))?;
    let request = TestRequest {
        paths: cli.paths.clone(),
    };
    let outcome = cellcheck_core::run_tests(&config, &request).map_err(|err| eyre!("{err:?}"))?;

    let style = Style::new(cli.no_color, atty::is(Stream::Stdout));
    let opts = OutputOptions {
        quiet: cli.quiet,
        verbose: cli.verbose,
        json: cli.json,
    };
    let code = emit_output(&opts, &style, &outcome).map_err(|err| eyre!("{err:#}"))?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn build_config(cli: &CellcheckCli) -> anyhow::Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(engine) = cli.engine {
        config = config.with_engine_kind(engine.into());
    }
    if let Some(kernel) = &cli.kernel {
        config = config.with_kernel(kernel.clone());
    }
    if let Some(python) = &cli.python {
        config = config.with_python(python.display().to_string());
    }
    if let Some(jupyter) = &cli.jupyter {
        config = config.with_jupyter(jupyter.display().to_string());
    }
    if let Some(jobs) = cli.jobs {
        config = config.with_jobs(usize::from(jobs));
    }
    Ok(config)
}

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 | 1 => "warn",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("cellcheck={level},cellcheck_core={level},cellcheck_cli={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
