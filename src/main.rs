use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use nky_tools::cli::{self, extract::ExtractArgs};
use nky_tools::config::Settings;
use nky_tools::keypair::KeyNames;
use nky_tools::Result;

#[derive(Parser)]
#[command(name = "nky-tools")]
#[command(version)]
#[command(about = "RSA key-pair generation and nky decryption-key recovery via openssl", long_about = None)]
struct Cli {
    /// Dump container fields and tool invocations (prints key material)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// openssl binary to use
    #[arg(long, global = true, value_name = "PATH")]
    openssl: Option<PathBuf>,

    /// Configuration file (defaults to nky-tools.json next to the executable)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a 2048-bit RSA key pair
    Keygen {
        /// File naming: og_private.pem/og_public.pem or private.pem/public.pem
        #[arg(long, value_enum)]
        names: Option<KeyNames>,

        /// Directory for the key files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Recover the decryption key from an nky file
    Extract {
        /// Path to the decryption key nky
        nky_file: PathBuf,

        /// Path to the original private key that is NOT embedded
        private_key: PathBuf,

        /// Check the private key against this public key first
        #[arg(long, value_name = "PATH")]
        public_key: Option<PathBuf>,

        /// Also decrypt the embedded private key
        #[arg(long)]
        unwrap: bool,
    },

    /// Check that a private and a public key belong together
    CheckPair {
        private_key: PathBuf,
        public_key: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(openssl) = cli.openssl {
        settings = settings.with_openssl_override(Some(openssl.into_os_string()))?;
    }
    settings.verbose |= cli.verbose;

    cli::init_tracing(settings.verbose);

    match cli.command {
        Commands::Keygen { names, out_dir } => cli::keygen::run(&settings, names, &out_dir),
        Commands::Extract {
            nky_file,
            private_key,
            public_key,
            unwrap,
        } => cli::extract::run(
            &settings,
            ExtractArgs {
                nky_file: &nky_file,
                private_key: &private_key,
                public_key: public_key.as_deref(),
                unwrap,
            },
        ),
        Commands::CheckPair {
            private_key,
            public_key,
        } => cli::check_pair::run(&settings, &private_key, &public_key),
    }
}
