// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `callcast campaign`: creates a campaign from a CSV file and dispatches it.

use std::path::{Path, PathBuf};

use callcast_campaign::{ContactList, create_campaign};
use callcast_config::CallcastConfig;
use callcast_core::types::NewCampaign;
use callcast_core::{CallcastError, PluginAdapter};
use clap::Args;
use serde_json::json;
use tracing::error;

use crate::services::build_services;

/// Arguments for `callcast campaign`.
#[derive(Args, Debug)]
pub struct CampaignArgs {
    /// Campaign display name.
    #[arg(long)]
    pub name: String,
    /// Assistant record id.
    #[arg(long)]
    pub assistant: String,
    /// Outbound phone number record id.
    #[arg(long)]
    pub phone_number: String,
    /// CSV contact list with a phone column.
    #[arg(long)]
    pub file: PathBuf,
    /// Owning tenant (defaults to the assistant's tenant).
    #[arg(long)]
    pub tenant: Option<String>,
}

/// Creates the campaign, dispatches every contact, and prints the summary.
pub async fn run_campaign(config: CallcastConfig, args: CampaignArgs) -> Result<(), CallcastError> {
    let text = tokio::fs::read_to_string(&args.file).await.map_err(|e| {
        CallcastError::Internal(format!("cannot read {}: {e}", args.file.display()))
    })?;
    let contacts = ContactList::parse(&text)?;

    let services = build_services(&config).await?;
    let result = async {
        let campaign = create_campaign(
            services.storage.as_ref(),
            NewCampaign {
                tenant_id: args.tenant.clone(),
                name: args.name.clone(),
                assistant_id: args.assistant.clone(),
                phone_number_id: args.phone_number.clone(),
                csv_file_name: file_name(&args.file),
            },
            &contacts,
        )
        .await?;
        let summary = services
            .dispatcher
            .start_campaign(&campaign.id, &contacts.rows)
            .await?;
        Ok::<_, CallcastError>((campaign.id, summary))
    }
    .await;

    if let Err(e) = services.storage.shutdown().await {
        error!(error = %e, "storage shutdown failed");
    }

    let (campaign_id, summary) = result?;
    let report = json!({
        "campaign_id": campaign_id,
        "success_count": summary.success_count,
        "fail_count": summary.fail_count,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| report.to_string())
    );
    Ok(())
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
