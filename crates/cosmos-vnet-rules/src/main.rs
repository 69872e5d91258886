//! # cosmos-vnet-rules
//!
//! Runs the provisioning sample once against the in-process control plane.
//!
//! ```bash
//! CLIENT_ID=... CLIENT_SECRET=... TENANT_ID=... SUBSCRIPTION_ID=... cosmos-vnet-rules
//! ```
//!
//! Ctrl-C stops the run between steps; the resource group is still deleted before exit.

use anyhow::Context;
use cosmos_vnet_rules::arm::LocalResourceManager;
use cosmos_vnet_rules::config::{Credentials, SampleSettings};
use cosmos_vnet_rules::lifecycle::setup_tracing;
use cosmos_vnet_rules::{CleanupOutcome, Orchestrator};
use std::process::ExitCode;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; variables may come from the shell.
    let _ = dotenvy::dotenv();
    setup_tracing();

    match run().await {
        Ok(()) => {
            info!("Sample completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Sample failed");
            error!("{:#}", e);
            error!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let settings = SampleSettings::load().context("Failed to load settings")?;

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            info!("Did not create any resources. No clean up is necessary");
            return Err(e).context("Failed to read credentials");
        }
    };

    let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, stopping after cleanup");
            let _ = cancel_tx.send(());
        }
    });
    let cancel = async move {
        // A dropped sender means no signal will ever come.
        if cancel_rx.await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let manager = LocalResourceManager::connect(&credentials, &settings);
    let orchestrator = Orchestrator::new(manager, settings);
    let outcome = orchestrator.run(cancel).await;

    orchestrator
        .into_manager()
        .shutdown()
        .await
        .context("Control plane did not shut down cleanly")?;

    if let CleanupOutcome::Failed { id, .. } = &outcome.cleanup {
        warn!(resource_group = %id, "Resource group may need manual deletion");
    }
    let report = outcome.into_result().context("Provisioning run failed")?;
    info!(
        resource_group = %report.resource_group,
        database_account = %report.database_account,
        "All steps completed"
    );
    Ok(())
}
