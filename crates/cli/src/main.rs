use anyhow::Context;
use clap::{Parser, Subcommand};
use rx_core::config::model_timeout_from_env_value;
use rx_core::{extract, medication_info, GeminiClient, ModelConfig, VisionModel};
use rx_types::ImagePayload;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rx")]
#[command(about = "Prescription analysis CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract structured fields from model output text, offline
    Extract {
        /// Text file to read, or `-` for stdin
        input: PathBuf,
    },
    /// Send a prescription image to the model and print the extracted analysis
    Analyze {
        /// Image file (PNG, JPEG, ...)
        image: PathBuf,
        /// Print the raw model text instead of the extracted analysis
        #[arg(long)]
        raw: bool,
    },
    /// Print reference information for a medication
    MedicationInfo {
        /// Medication name (case-insensitive)
        name: String,
    },
    /// Send a free-form prompt to the model
    Generate {
        /// Prompt text
        prompt: String,
        /// Optional image sent with the prompt
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("rx_core=warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Extract { input }) => {
            let text = read_text(&input)?;
            let analysis = extract::analyse_text(&text);
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
        Some(Commands::Analyze { image, raw }) => {
            let payload = read_image(&image)?;
            let client = model_client()?;
            let text = client.analyse_prescription(&payload).await?;
            if raw {
                println!("{text}");
            } else {
                let analysis = extract::analyse_text(&text);
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            }
        }
        Some(Commands::MedicationInfo { name }) => {
            let info = medication_info::lookup(&name);
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Some(Commands::Generate { prompt, image }) => {
            let payload = image.as_deref().map(read_image).transpose()?;
            let client = model_client()?;
            let text = client.generate(&prompt, payload.as_ref()).await?;
            println!("{text}");
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

fn read_text(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))
    }
}

fn read_image(path: &Path) -> anyhow::Result<ImagePayload> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(ImagePayload::from_bytes(&bytes)?)
}

fn model_client() -> anyhow::Result<GeminiClient> {
    let api_key = std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?;
    let config = ModelConfig::new(
        api_key,
        std::env::var("GEMINI_BASE_URL").ok(),
        std::env::var("GEMINI_VISION_MODEL").ok(),
        std::env::var("GEMINI_TEXT_MODEL").ok(),
        model_timeout_from_env_value(std::env::var("RX_MODEL_TIMEOUT_SECS").ok())?,
    )?;
    Ok(GeminiClient::new(config)?)
}
