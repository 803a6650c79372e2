//! pq-signer: hybrid post-quantum signature tool
//!
//! 1. Load configuration (file, then `PQ_SIGNER_*` environment variables)
//! 2. Apply command line overrides
//! 3. Run one command and print its report to stdout

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pq_crypto::AlgorithmId;
use pq_signer::commands::{self, KeySource};
use pq_signer::config;
use pq_signer::{Encoding, Keystore, OutputFormat, SignerConfig};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Hybrid (classical + post-quantum) signature tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML, JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output format
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Encoding of byte arguments and outputs
    #[arg(long, value_enum, global = true)]
    encoding: Option<Encoding>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List supported algorithms and their sizes
    Algorithms,

    /// Generate a key pair
    Keygen {
        #[arg(short, long)]
        algorithm: Option<AlgorithmId>,

        /// Also print the raw secret key (Dilithium only)
        #[arg(long, default_value_t = false)]
        reveal_secret: bool,

        /// Save the key pair as a keystore in this directory (Dilithium only)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Sign a message, printing the tagged signature
    Sign {
        /// Keystore directory written by `keygen --output-dir`
        #[arg(long, conflicts_with_all = ["public_key", "secret_key"])]
        keystore: Option<PathBuf>,

        #[arg(long, requires = "secret_key")]
        public_key: Option<String>,

        #[arg(long, requires = "public_key")]
        secret_key: Option<String>,

        #[arg(short, long)]
        message: String,

        /// Treat the message as encoded bytes instead of UTF-8 text
        #[arg(long, default_value_t = false)]
        message_encoded: bool,

        #[arg(short, long)]
        algorithm: Option<AlgorithmId>,
    },

    /// Print the public key stored in a keystore
    PublicKey {
        /// Keystore directory written by `keygen --output-dir`
        #[arg(long)]
        keystore: PathBuf,
    },

    /// Verify a tagged signature (exits non-zero when invalid)
    Verify {
        /// Take the public key from this keystore directory
        #[arg(long, conflicts_with = "public_key", required_unless_present = "public_key")]
        keystore: Option<PathBuf>,

        #[arg(long)]
        public_key: Option<String>,

        #[arg(short, long)]
        message: String,

        #[arg(long, default_value_t = false)]
        message_encoded: bool,

        #[arg(short, long)]
        signature: String,
    },

    /// Show the algorithm and size of a tagged signature
    InspectSignature { signature: String },

    /// Decode a hybrid transaction and check its PQ signature
    InspectTx { transaction: String },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load configuration
    let (mut config, missing_config) = load_configuration(args.config.as_ref())?;

    // Command line arguments override configuration
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }
    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(encoding) = args.encoding {
        config.encoding = encoding;
    }

    // 2. Initialize logging
    init_logging(&config.log_level)?;

    if let Some(path) = missing_config {
        warn!("Configuration file {} does not exist, using defaults", path.display());
    }
    debug!("Effective configuration: {:?}", config);

    // 3. Run
    let valid = run(args.command, &config)?;
    if !valid {
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize logging system (stderr, so stdout stays machine-readable)
fn init_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => {
            eprintln!("Unknown log level: {}, using WARN", log_level);
            tracing::Level::WARN
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

/// Load configuration, falling back to environment-only when the file is missing
fn load_configuration(config_path: Option<&PathBuf>) -> Result<(SignerConfig, Option<PathBuf>)> {
    match config_path {
        Some(path) if path.exists() => {
            let config = config::load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            Ok((config, None))
        }
        Some(path) => {
            let config = config::load_config_from_env()
                .context("Failed to load configuration from environment")?;
            Ok((config, Some(path.clone())))
        }
        None => {
            let config = config::load_config_from_env()
                .context("Failed to load configuration from environment")?;
            Ok((config, None))
        }
    }
}

fn message_bytes(message: &str, encoded: bool, encoding: Encoding) -> Result<Vec<u8>> {
    if encoded {
        encoding.decode_arg(message).context("Failed to decode message")
    } else {
        Ok(message.as_bytes().to_vec())
    }
}

/// Run one command; returns `false` when a verification failed
fn run(command: Command, config: &SignerConfig) -> Result<bool> {
    let encoding = config.encoding;
    let format = config.format;
    let mut valid = true;

    let rendered = match command {
        Command::Algorithms => pq_signer::output::render(format, &commands::list_algorithms())?,

        Command::Keygen {
            algorithm,
            reveal_secret,
            output_dir,
        } => {
            let algorithm = algorithm.unwrap_or(config.default_algorithm);
            let report = commands::keygen(algorithm, reveal_secret, output_dir.as_deref(), encoding)
                .with_context(|| format!("Failed to generate {} key pair", algorithm))?;
            pq_signer::output::render(format, &report)?
        }

        Command::Sign {
            keystore,
            public_key,
            secret_key,
            message,
            message_encoded,
            algorithm,
        } => {
            let source = match (keystore, public_key, secret_key) {
                (Some(dir), _, _) => KeySource::Keystore(dir),
                (None, Some(public_key), Some(secret_key)) => KeySource::Raw {
                    algorithm: algorithm.unwrap_or(config.default_algorithm),
                    public_key: encoding
                        .decode_arg(&public_key)
                        .context("Failed to decode public key")?,
                    secret_key: encoding
                        .decode_arg(&secret_key)
                        .context("Failed to decode secret key")?,
                },
                _ => anyhow::bail!("Provide --keystore or both --public-key and --secret-key"),
            };

            let key = commands::load_signing_key(source, algorithm)
                .context("Failed to load signing key")?;
            let message = message_bytes(&message, message_encoded, encoding)?;
            let report = commands::sign(&key, &message, encoding).context("Failed to sign message")?;
            pq_signer::output::render(format, &report)?
        }

        Command::PublicKey { keystore } => {
            let report = commands::public_key(&keystore, encoding)
                .with_context(|| format!("Failed to read public key from {}", keystore.display()))?;
            pq_signer::output::render(format, &report)?
        }

        Command::Verify {
            keystore,
            public_key,
            message,
            message_encoded,
            signature,
        } => {
            let public_key = match (keystore, public_key) {
                (Some(dir), _) => {
                    let (_, public_key) = Keystore::load_public_key(&dir).with_context(|| {
                        format!("Failed to read public key from {}", dir.display())
                    })?;
                    public_key
                }
                (None, Some(public_key)) => encoding
                    .decode_arg(&public_key)
                    .context("Failed to decode public key")?,
                (None, None) => anyhow::bail!("Provide --keystore or --public-key"),
            };
            let signature = encoding
                .decode_arg(&signature)
                .context("Failed to decode signature")?;
            let message = message_bytes(&message, message_encoded, encoding)?;

            let report = commands::verify(&public_key, &message, &signature)
                .context("Failed to decode tagged signature")?;
            valid = report.valid;
            pq_signer::output::render(format, &report)?
        }

        Command::InspectSignature { signature } => {
            let signature = encoding
                .decode_arg(&signature)
                .context("Failed to decode signature")?;
            let report = commands::inspect_signature(&signature)
                .context("Failed to decode tagged signature")?;
            pq_signer::output::render(format, &report)?
        }

        Command::InspectTx { transaction } => {
            let transaction = encoding
                .decode_arg(&transaction)
                .context("Failed to decode transaction bytes")?;
            let report = commands::inspect_tx(&transaction, encoding)
                .context("Failed to decode hybrid transaction")?;
            pq_signer::output::render(format, &report)?
        }
    };

    println!("{}", rendered);
    Ok(valid)
}
