use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};
mod auth;
mod viewer;
use stegpass::{DEFAULT_OUTPUT, Extraction, decode_file, encode_file, inspect_file};

#[derive(Debug, Parser)]
#[command(name = "stegpass")]
#[command(
    version,
    about = "Hide password-protected messages in the pixels of an image."
)]
struct Cli {
    /// Log filter, e.g. "debug" or "stegpass=trace"
    #[arg(
        long,
        global = true,
        value_name = "FILTER",
        env = "STEGPASS_LOG",
        default_value = "warn"
    )]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encodes a message in an image
    #[command(arg_required_else_help = true)]
    Encode {
        /// Path to the input image
        #[arg(short, long, value_name = "PATH")]
        image: PathBuf,

        /// Message to encode (read from stdin if omitted)
        #[arg(short, long)]
        message: Option<String>,

        /// Output image path; use a lossless format such as PNG
        #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Open the encoded image in the default viewer
        #[arg(long, default_value_t = false)]
        open: bool,
    },

    /// Decodes a message from an image
    #[command(arg_required_else_help = true)]
    Decode {
        /// Path to the encoded image
        #[arg(short, long, value_name = "PATH")]
        image: PathBuf,
    },

    /// Shows how many bytes an image can hide
    #[command(arg_required_else_help = true)]
    Capacity {
        /// Path to the image
        #[arg(short, long, value_name = "PATH")]
        image: PathBuf,

        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Encode {
            image,
            message,
            output,
            open,
        } => {
            let message = match message {
                Some(m) => m,
                None => auth::read_message()?,
            };
            let password = auth::read_new_password()?;

            let report = encode_file(&image, &output, &message, &password)?;
            println!("Message successfully encoded in {}", output.display());
            println!(
                "{} of {} bytes used. Decode with the same password to extract it.",
                report.payload_bytes, report.capacity
            );

            if open {
                viewer::open(&output);
            }
        }
        Commands::Decode { image } => {
            let password = auth::read_password()?;
            match decode_file(&image, &password)? {
                Extraction::Message(message) => {
                    println!("Decoded message: {message}");
                }
                Extraction::LikelyWrongPassword { .. } => {
                    eprintln!("Failed to decode message. Incorrect password most likely.");
                    return Ok(ExitCode::FAILURE);
                }
                Extraction::NotFound => {
                    eprintln!("No hidden message detected in this image. Possible reasons:");
                    eprintln!("- Incorrect password");
                    eprintln!("- The image doesn't contain a hidden message");
                    eprintln!(
                        "- The image format was changed after encoding (e.g., converted from PNG to JPEG)"
                    );
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Capacity { image, json } => {
            let info = inspect_file(&image)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{info}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(&args.log);

    match run(args.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
