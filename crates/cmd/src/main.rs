use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cmd::commands::{
    Finished, index_command, init_config_command, load_table_command, show_script_command,
    sync_command,
};
use cmd::config::{Settings, process_env};
use diagnostics::Verbosity;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "e911")]
struct Cli {
    /// YAML settings file; built-in defaults are used without one
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the HDFS JSON files into an Iceberg table through Livy
    LoadTable,
    /// Index JSON objects from S3 into a Solr collection
    Index,
    /// Copy JSON objects from S3 into HDFS
    Sync,
    /// Write a settings file with every default filled in
    InitConfig {
        /// Where to write the file
        #[arg(default_value = "e911.yaml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the Spark script that load-table submits
    ShowScript,
}

fn run(cli: &Cli, out: &mut dyn Write) -> Result<Finished> {
    if let Commands::InitConfig { path, force } = &cli.command {
        return init_config_command(path, *force, out);
    }

    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.apply_env(process_env);

    match &cli.command {
        Commands::LoadTable => load_table_command(&settings, out),
        Commands::Index => index_command(&settings, out),
        Commands::Sync => sync_command(&settings, out),
        Commands::ShowScript => show_script_command(&settings, out),
        Commands::InitConfig { .. } => Ok(Finished::Clean),
    }
}

fn main() -> ExitCode {
    diagnostics::init_diagnostics_with(Verbosity::Info);

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    match run(&cli, &mut stdout) {
        Ok(finished) => finished.exit_code(),
        Err(err) => {
            let _ = writeln!(std::io::stderr(), "Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
