//! Notary command line.
//!
//! `run` drives the full pipeline against an in-process quorum, storage
//! provider, and ledger, which makes it a self-contained demonstration
//! and smoke test. `status` talks to a remote storage API.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use notary_attest::{AttestationIssuer, MemoryLedger, SchemaUid, SCHEMA_DECLARATION};
use notary_pipeline::{github_zip_url, HttpFetcher, Pipeline, PipelineConfig, RunRequest};
use notary_quorum::{LocalQuorum, QuorumSigner};
use notary_session::SessionAuthorizer;
use notary_store::{
    ArtifactPublisher, ContentId, DealParams, HttpStorageProvider, MemoryStorageProvider,
    StorageProvider,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "notary")]
#[command(about = "Multi-party artifact provenance pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Notarize one artifact end to end with in-process backends
    Run {
        /// Artifact URL to fetch
        #[arg(long, conflicts_with_all = ["owner", "repo", "git_ref"])]
        url: Option<String>,

        /// Repository owner (with --repo and --git-ref, derives a snapshot URL)
        #[arg(long, requires_all = ["repo", "git_ref"])]
        owner: Option<String>,

        /// Repository name
        #[arg(long)]
        repo: Option<String>,

        /// Branch, tag, or commit of the snapshot
        #[arg(long)]
        git_ref: Option<String>,

        /// Attestation subject
        #[arg(long)]
        subject: String,

        /// Attestation count to record
        #[arg(long, default_value = "1")]
        count: u64,

        /// Holding value to record
        #[arg(long, default_value = "0")]
        holding: u128,

        /// Attestation recipient address
        #[arg(long)]
        recipient: String,

        /// Quorum size (N in M-of-N)
        #[arg(short = 'n', long, default_value = "3")]
        signers: u16,

        /// Signing threshold (M in M-of-N)
        #[arg(short = 't', long, default_value = "2")]
        threshold: u16,

        /// Publish a signed bundle instead of the raw artifact
        #[arg(long)]
        bundle: bool,
    },

    /// Check the durability status of a published artifact
    Status {
        /// Base URL of the storage API
        #[arg(long)]
        base_url: String,

        /// API key for the storage API
        #[arg(long)]
        api_key: String,

        /// Content identifier to check
        #[arg(long)]
        cid: String,
    },

    /// Print the registered attestation schema declaration
    Schema,
}

// Deterministic dev-mode key material; a deployment wires real secrets in.
const QUORUM_SEED: [u8; 32] = [7u8; 32];
const SESSION_CREDENTIAL: [u8; 32] = [11u8; 32];

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Run {
            url,
            owner,
            repo,
            git_ref,
            subject,
            count,
            holding,
            recipient,
            signers,
            threshold,
            bundle,
        } => {
            let url = match (url, owner, repo, git_ref) {
                (Some(url), None, None, None) => url,
                (None, Some(owner), Some(repo), Some(git_ref)) => {
                    github_zip_url(&owner, &repo, &git_ref)?
                }
                _ => bail!("pass either --url or all of --owner, --repo, --git-ref"),
            };

            let quorum = Arc::new(LocalQuorum::new(signers, threshold, QUORUM_SEED)?);
            let pipeline = Pipeline::new(
                HttpFetcher::new(Duration::from_secs(30))?,
                SessionAuthorizer::new(SESSION_CREDENTIAL),
                QuorumSigner::new(quorum),
                ArtifactPublisher::new(
                    Arc::new(MemoryStorageProvider::new()),
                    DealParams::default(),
                ),
                AttestationIssuer::new(
                    Arc::new(MemoryLedger::new()),
                    SchemaUid::new("0xlocal-schema"),
                ),
                PipelineConfig::default(),
            );

            let request = RunRequest {
                url,
                subject,
                attestation_count: count,
                holding,
                recipient,
            };

            let report = if bundle {
                let (report, bundle) = pipeline.run_bundled(&request).await?;
                bundle.verify()?;
                report
            } else {
                pipeline.run(&request).await?
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Status {
            base_url,
            api_key,
            cid,
        } => {
            let provider = HttpStorageProvider::new(base_url, api_key, Duration::from_secs(30))?;
            let content_id = ContentId::new(cid);
            let status = provider.check_status(&content_id).await?;
            let proof = provider.fetch_proof(&content_id).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "cid": content_id,
                    "status": status,
                    "proof": proof,
                }))?
            );
        }

        Commands::Schema => {
            println!("{SCHEMA_DECLARATION}");
        }
    }

    Ok(())
}
