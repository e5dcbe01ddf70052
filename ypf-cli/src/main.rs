//! Command-line front end for the YPF archive codec

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, Level};

use ypf_archive::{create_archive, extract_archive, inspect_archive};

#[derive(Parser)]
#[command(
    name = "ypf",
    about = "Create, extract and inspect YPF archives used by the YU-RIS visual novel engine",
    version
)]
struct Cli {
    /// Set the logging level
    #[arg(short, long, value_enum, default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Pack folders into archives (one archive per folder, `<folder>.ypf`)
    Create {
        /// YU-RIS engine version the archives target (234-500)
        #[arg(short = 'v', long)]
        engine_version: i32,

        /// Source folders to pack
        #[arg(required = true)]
        folders: Vec<PathBuf>,
    },

    /// Extract archives (each into a sibling folder named after the file)
    Extract {
        /// Archive files to extract
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print archive headers and entries, validating content checksums
    Info {
        /// Skip the data checksum validation pass
        #[arg(long)]
        skip_data_check: bool,

        /// Archive files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .init();

    // One failing archive does not stop the rest of the batch
    let mut failures = 0usize;
    let mut run = |label: &PathBuf, result: ypf_archive::Result<()>| {
        if let Err(e) = result {
            error!(archive = %label.display(), "{e}");
            failures += 1;
        }
    };

    match cli.command {
        Commands::Create {
            engine_version,
            folders,
        } => {
            for folder in &folders {
                // `<folder>.ypf` next to the source folder
                let mut output = folder.as_os_str().to_os_string();
                output.push(".ypf");
                let output = PathBuf::from(output);
                run(folder, create_archive(folder, &output, engine_version));
            }
        }
        Commands::Extract { files } => {
            for file in &files {
                let output = file.with_extension("");
                run(file, extract_archive(file, &output));
            }
        }
        Commands::Info {
            skip_data_check,
            files,
        } => {
            for file in &files {
                run(file, inspect_archive(file, skip_data_check));
            }
        }
    }

    if failures > 0 {
        error!("{failures} archive(s) failed");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
