//! Blocked-service listing and updates.
//!
//! The update endpoint takes a full replacement list, so `service update`
//! reads the current blocked set, reconciles the requested changes into it,
//! writes the result back and then re-reads it to confirm the server really
//! applied what was sent.

use crate::Context;
use crate::cli::{ServiceCommand, ServiceListCommand};
use crate::client::Client;
use crate::commands;
use crate::config::ServerConfig;
use crate::reconcile::{self, ChangeSet};
use anyhow::{Context as _, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wire form of /control/blocked_services/get.
#[derive(Debug, Deserialize)]
struct BlockedServices {
    #[serde(default)]
    ids: Vec<String>,
}

/// Wire form of one entry in /control/blocked_services/all.
#[derive(Debug, Deserialize)]
struct ServiceEntry {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ServiceCatalog {
    #[serde(default)]
    blocked_services: Vec<ServiceEntry>,
}

/// Blocked set as shown to the user.
#[derive(Debug, Serialize)]
struct BlockedSummary {
    count: usize,
    ids: Vec<String>,
}

/// Run the service command.
pub fn run(ctx: &Context, cmd: ServiceCommand) -> Result<()> {
    match cmd {
        ServiceCommand::List(list) => match list {
            ServiceListCommand::All => list_all(ctx),
            ServiceListCommand::Blocked => list_blocked(ctx),
        },
        ServiceCommand::Update { block, permit } => update(ctx, block, permit),
    }
}

// ============================================================================
// Listing
// ============================================================================

/// Print every service the server knows how to block, as a name-to-ID map.
fn list_all(ctx: &Context) -> Result<()> {
    commands::run_for_targets(ctx, |client, server| {
        let catalog: ServiceCatalog = client
            .get_json(server, "/control/blocked_services/all")
            .context("getting service catalog")?;

        let services: BTreeMap<String, String> = catalog
            .blocked_services
            .into_iter()
            .map(|service| (service.name, service.id))
            .collect();
        Ok(services)
    })
}

/// Print the currently blocked services.
fn list_blocked(ctx: &Context) -> Result<()> {
    commands::run_for_targets(ctx, |client, server| {
        let mut ids = fetch_blocked(client, server)?;
        ids.sort();
        Ok(BlockedSummary {
            count: ids.len(),
            ids,
        })
    })
}

// ============================================================================
// Updating
// ============================================================================

fn update(ctx: &Context, block: Vec<String>, permit: Vec<String>) -> Result<()> {
    let changes = ChangeSet::new(block, permit);
    if changes.is_empty() {
        bail!("Nothing to do: pass --block and/or --permit");
    }

    commands::run_for_targets(ctx, |client, server| {
        update_blocked(client, server, &changes)
    })
}

/// Reconcile, write and verify the blocked set on one server.
fn update_blocked(
    client: &Client,
    server: &ServerConfig,
    changes: &ChangeSet,
) -> Result<BlockedSummary> {
    let current = fetch_blocked(client, server)?;
    let desired = reconcile::reconcile(&current, changes)?;
    log::debug!("{}: new blocked set {:?}", server.name, desired);

    let body = serde_json::json!({ "ids": &desired, "schedule": null });
    client
        .put_json(server, "/control/blocked_services/update", &body)
        .context("updating blocked services")?;

    let mut reported = fetch_blocked(client, server)?;
    reported.sort();
    if reported != desired {
        bail!(
            "service lists unequal: expected {:?}, got {:?}",
            desired,
            reported
        );
    }

    Ok(BlockedSummary {
        count: reported.len(),
        ids: reported,
    })
}

fn fetch_blocked(client: &Client, server: &ServerConfig) -> Result<Vec<String>> {
    let blocked: BlockedServices = client
        .get_json(server, "/control/blocked_services/get")
        .context("getting blocked services")?;
    Ok(blocked.ids)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_services_parses_wire_payload() {
        let json = r#"{"schedule": {"time_zone": "UTC"}, "ids": ["youtube", "tiktok"]}"#;
        let blocked: BlockedServices = serde_json::from_str(json).unwrap();
        assert_eq!(blocked.ids, ["youtube", "tiktok"]);
    }

    #[test]
    fn blocked_services_ids_default_to_empty() {
        let blocked: BlockedServices = serde_json::from_str(r#"{"schedule": null}"#).unwrap();
        assert!(blocked.ids.is_empty());
    }

    #[test]
    fn catalog_maps_names_to_ids_sorted() {
        let json = r#"{"blocked_services": [
            {"id": "youtube", "name": "YouTube", "icon_svg": "<svg/>"},
            {"id": "9gag", "name": "9GAG", "icon_svg": "<svg/>"}
        ]}"#;
        let catalog: ServiceCatalog = serde_json::from_str(json).unwrap();

        let services: BTreeMap<String, String> = catalog
            .blocked_services
            .into_iter()
            .map(|service| (service.name, service.id))
            .collect();

        let rendered = serde_json::to_string(&services).unwrap();
        assert_eq!(rendered, r#"{"9GAG":"9gag","YouTube":"youtube"}"#);
    }

    #[test]
    fn blocked_summary_shape() {
        let summary = BlockedSummary {
            count: 2,
            ids: vec!["9gag".to_string(), "youtube".to_string()],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["ids"][0], "9gag");
    }
}
