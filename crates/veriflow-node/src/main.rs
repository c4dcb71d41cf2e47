//! # Veriflow Node
//!
//! Command-line entry point.
//!
//! ```text
//! veriflow-node price 1250.5
//! veriflow-node mint --project project.json --owner-address 0x… [--image plot.jpg]
//! veriflow-node fetch bafkrei…
//! ```
//!
//! Content is published into the filesystem store under `VF_DATA_DIR`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use shared_types::Project;
use tracing::info;

use veriflow_node::{NodeConfig, VeriflowNode};
use vf_03_tokenization::{tons, ContentId, PricingEngine, TokenizationApi};

/// Veriflow: verified carbon credits from field measurements
#[derive(Parser, Debug)]
#[command(name = "veriflow-node")]
#[command(about = "Price, publish and prepare mints for verified carbon projects")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a quantity of sequestered carbon
    Price {
        /// Sequestered carbon in kilograms
        kg: f64,
    },

    /// Publish metadata for a verified project and print the mint payload
    Mint {
        /// Project record as JSON
        #[arg(long)]
        project: PathBuf,

        /// Address that receives the credit
        #[arg(long)]
        owner_address: String,

        /// Project image to publish alongside the metadata
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Print published content after checking it against its CID
    Fetch {
        cid: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = NodeConfig::from_env().context("Invalid configuration")?;
    vf_telemetry::init_logging(&config.telemetry).context("Failed to initialize logging")?;

    match args.command {
        Command::Price { kg } => price(&config, kg),
        Command::Mint {
            project,
            owner_address,
            image,
        } => mint(&config, project, &owner_address, image).await,
        Command::Fetch { cid } => fetch(&config, &cid).await,
    }
}

fn price(config: &NodeConfig, kg: f64) -> Result<()> {
    let pricing = PricingEngine::new(&config.pricing).context("Invalid pricing configuration")?;
    let quote = json!({
        "carbonKg": kg,
        "tons": tons(kg),
        "price": pricing.price_rounded(kg),
        "currency": pricing.currency(),
        "referenceValueUsd": pricing.reference_value_usd(kg),
    });
    println!("{}", serde_json::to_string_pretty(&quote)?);
    Ok(())
}

async fn mint(
    config: &NodeConfig,
    project_path: PathBuf,
    owner_address: &str,
    image_path: Option<PathBuf>,
) -> Result<()> {
    let raw = tokio::fs::read(&project_path)
        .await
        .with_context(|| format!("Failed to read {}", project_path.display()))?;
    let project: Project = serde_json::from_slice(&raw)
        .with_context(|| format!("{} is not a project record", project_path.display()))?;
    let image = match image_path {
        Some(path) => Some(
            tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };

    let node = VeriflowNode::with_fs_store(config).await?;
    let id = project.id.clone();
    node.import_project(project).await?;

    let payload = node
        .tokenization()
        .prepare_mint(&id, owner_address, image.as_deref())
        .await
        .with_context(|| format!("Failed to prepare mint for project {id}"))?;

    info!(project_id = %id, metadata_uri = %payload.metadata_uri, "Payload ready");
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

async fn fetch(config: &NodeConfig, cid: &str) -> Result<()> {
    let cid: ContentId = cid.parse().with_context(|| format!("'{cid}' is not a CID"))?;
    let node = VeriflowNode::with_fs_store(config).await?;
    let bytes = node
        .tokenization()
        .fetch(&cid)
        .await
        .with_context(|| format!("Failed to fetch {cid}"))?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.flush()?;
    Ok(())
}
