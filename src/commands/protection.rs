//! Protection status plus the enable, disable and toggle commands.
//!
//! Disabling takes an optional duration, after which the server turns
//! protection back on by itself. The status payload reports the remaining
//! pause humanized ("29m59s") instead of raw milliseconds.

use crate::Context;
use crate::client::Client;
use crate::commands;
use crate::config::ServerConfig;
use crate::ui;
use anyhow::{Context as _, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Wire form of /control/status.
#[derive(Debug, Clone, Deserialize)]
struct Status {
    protection_enabled: bool,
    #[serde(default)]
    protection_disabled_duration: u64,
}

/// Status as shown to the user.
#[derive(Debug, Serialize)]
struct ReadableStatus {
    protection_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    protection_disabled_duration: Option<String>,
}

impl From<Status> for ReadableStatus {
    fn from(status: Status) -> Self {
        let remaining = (status.protection_disabled_duration > 0)
            .then(|| ui::format_duration(status.protection_disabled_duration));
        Self {
            protection_enabled: status.protection_enabled,
            protection_disabled_duration: remaining,
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Run the status command.
pub fn status(ctx: &Context) -> Result<()> {
    commands::run_for_targets(ctx, |client, server| {
        Ok(ReadableStatus::from(fetch_status(client, server)?))
    })
}

/// Run the enable command.
pub fn enable(ctx: &Context) -> Result<()> {
    commands::run_for_targets(ctx, |client, server| {
        set_protection(client, server, true, 0)?;
        Ok(ReadableStatus::from(fetch_status(client, server)?))
    })
}

/// Run the disable command.
pub fn disable(ctx: &Context, duration: Option<&str>) -> Result<()> {
    // Bad input fails here, before any server is contacted.
    let duration_ms = match duration {
        Some(raw) => ui::parse_duration(raw).map_err(|e| anyhow!(e))?,
        None => 0,
    };

    commands::run_for_targets(ctx, move |client, server| {
        set_protection(client, server, false, duration_ms)?;
        Ok(ReadableStatus::from(fetch_status(client, server)?))
    })
}

/// Run the toggle command.
pub fn toggle(ctx: &Context) -> Result<()> {
    commands::run_for_targets(ctx, |client, server| {
        let current = fetch_status(client, server)?;
        let target = !current.protection_enabled;
        log::debug!(
            "{}: protection {} -> {}",
            server.name,
            current.protection_enabled,
            target
        );
        set_protection(client, server, target, 0)?;
        Ok(ReadableStatus::from(fetch_status(client, server)?))
    })
}

// ============================================================================
// API calls
// ============================================================================

fn fetch_status(client: &Client, server: &ServerConfig) -> Result<Status> {
    client
        .get_json(server, "/control/status")
        .context("getting status")
}

fn set_protection(
    client: &Client,
    server: &ServerConfig,
    enabled: bool,
    duration_ms: u64,
) -> Result<()> {
    let body = serde_json::json!({ "enabled": enabled, "duration": duration_ms });
    client
        .post_json(server, "/control/protection", &body)
        .context("setting protection")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_wire_payload() {
        let json = r#"{
            "protection_enabled": false,
            "protection_disabled_duration": 1799000,
            "version": "v0.107.52",
            "dns_addresses": ["10.0.0.2"]
        }"#;
        let status: Status = serde_json::from_str(json).unwrap();
        assert!(!status.protection_enabled);
        assert_eq!(status.protection_disabled_duration, 1_799_000);
    }

    #[test]
    fn status_duration_defaults_to_zero() {
        let status: Status = serde_json::from_str(r#"{"protection_enabled": true}"#).unwrap();
        assert_eq!(status.protection_disabled_duration, 0);
    }

    #[test]
    fn readable_status_humanizes_pause() {
        let readable = ReadableStatus::from(Status {
            protection_enabled: false,
            protection_disabled_duration: 1_799_000,
        });
        assert_eq!(
            readable.protection_disabled_duration.as_deref(),
            Some("29m59s")
        );
    }

    #[test]
    fn readable_status_omits_zero_pause() {
        let readable = ReadableStatus::from(Status {
            protection_enabled: true,
            protection_disabled_duration: 0,
        });
        let json = serde_json::to_value(&readable).unwrap();
        assert_eq!(json["protection_enabled"], true);
        assert!(json.get("protection_disabled_duration").is_none());
    }
}
