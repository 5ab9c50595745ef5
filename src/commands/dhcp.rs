//! Built-in DHCP server management.
//!
//! `dhcp config` only sends what the user asked to change: the current
//! configuration is fetched first and unset flags keep their current values,
//! because the set_config endpoint replaces the whole configuration.

use crate::Context;
use crate::cli::{DhcpCommand, DhcpConfigArgs, StaticLeaseCommand};
use crate::client::Client;
use crate::commands;
use crate::config::ServerConfig;
use anyhow::{Context as _, Result, bail};
use serde::{Deserialize, Serialize};

// ============================================================================
// Wire types
// ============================================================================

/// Wire form of /control/dhcp/status.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DhcpStatus {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    interface_name: String,
    #[serde(default)]
    v4: V4Config,
    #[serde(default)]
    v6: V6Config,
    #[serde(default)]
    leases: Vec<Lease>,
    #[serde(default)]
    static_leases: Vec<StaticLease>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct V4Config {
    #[serde(default)]
    gateway_ip: String,
    #[serde(default)]
    subnet_mask: String,
    #[serde(default)]
    range_start: String,
    #[serde(default)]
    range_end: String,
    #[serde(default)]
    lease_duration: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct V6Config {
    #[serde(default)]
    range_start: String,
    #[serde(default)]
    lease_duration: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Lease {
    ip: String,
    mac: String,
    #[serde(default)]
    hostname: String,
    #[serde(default)]
    expires: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StaticLease {
    ip: String,
    mac: String,
    #[serde(default)]
    hostname: String,
}

/// Body of /control/dhcp/set_config.
#[derive(Debug, Serialize)]
struct DhcpConfig {
    enabled: bool,
    interface_name: String,
    v4: V4Config,
    v6: V6Config,
}

/// Wire form of /control/dhcp/find_active_dhcp.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DhcpSearchReport {
    #[serde(default)]
    v4: DhcpSearchV4,
    #[serde(default)]
    v6: DhcpSearchV6,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DhcpSearchV4 {
    #[serde(default)]
    other_server: OtherServer,
    #[serde(default)]
    static_ip: StaticIp,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DhcpSearchV6 {
    #[serde(default)]
    other_server: OtherServer,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct OtherServer {
    #[serde(default)]
    found: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    error: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StaticIp {
    #[serde(default)]
    r#static: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    ip: String,
}

/// Run the dhcp command.
pub fn run(ctx: &Context, cmd: DhcpCommand) -> Result<()> {
    match cmd {
        DhcpCommand::Status => status(ctx),
        DhcpCommand::Leases => leases(ctx),
        DhcpCommand::Check { interface } => check(ctx, &interface),
        DhcpCommand::Config(args) => config(ctx, &args),
        DhcpCommand::Reset => reset(ctx),
        DhcpCommand::StaticLease(cmd) => static_lease(ctx, cmd),
    }
}

// ============================================================================
// Status and probing
// ============================================================================

fn status(ctx: &Context) -> Result<()> {
    commands::run_for_targets(ctx, fetch_status)
}

fn leases(ctx: &Context) -> Result<()> {
    commands::run_for_targets(ctx, |client, server| {
        Ok(fetch_status(client, server)?.leases)
    })
}

/// Search an interface for competing DHCP servers on the network.
fn check(ctx: &Context, interface: &str) -> Result<()> {
    commands::run_for_targets(ctx, |client, server| {
        let body = serde_json::json!({ "interface": interface });
        let report: DhcpSearchReport = client
            .post_json_read(server, "/control/dhcp/find_active_dhcp", &body)
            .context("searching interface")?;
        Ok(report)
    })
}

// ============================================================================
// Configuration
// ============================================================================

fn config(ctx: &Context, args: &DhcpConfigArgs) -> Result<()> {
    commands::run_for_targets(ctx, |client, server| {
        let current = fetch_status(client, server)?;
        let merged = merge_config(&current, args);
        log::debug!("{}: new DHCP config {:?}", server.name, merged);

        client
            .post_json(server, "/control/dhcp/set_config", &merged)
            .context("setting DHCP config")?;
        fetch_status(client, server)
    })
}

fn reset(ctx: &Context) -> Result<()> {
    commands::run_for_targets(ctx, |client, server| {
        client
            .post_empty(server, "/control/dhcp/reset")
            .context("resetting DHCP")?;
        fetch_status(client, server)
    })
}

/// Overlay explicitly-passed flags on the current configuration.
fn merge_config(current: &DhcpStatus, args: &DhcpConfigArgs) -> DhcpConfig {
    let mut v4 = current.v4.clone();
    if let Some(gateway) = &args.gateway {
        v4.gateway_ip = gateway.clone();
    }
    if let Some(mask) = &args.subnet_mask {
        v4.subnet_mask = mask.clone();
    }
    if let Some(start) = &args.range_start {
        v4.range_start = start.clone();
    }
    if let Some(end) = &args.range_end {
        v4.range_end = end.clone();
    }
    if let Some(duration) = args.lease_duration {
        v4.lease_duration = duration;
    }

    let mut v6 = current.v6.clone();
    if let Some(start) = &args.v6_range_start {
        v6.range_start = start.clone();
    }
    if let Some(duration) = args.v6_lease_duration {
        v6.lease_duration = duration;
    }

    DhcpConfig {
        enabled: args.enabled.unwrap_or(current.enabled),
        interface_name: args
            .interface
            .clone()
            .unwrap_or_else(|| current.interface_name.clone()),
        v4,
        v6,
    }
}

// ============================================================================
// Static leases
// ============================================================================

fn static_lease(ctx: &Context, cmd: StaticLeaseCommand) -> Result<()> {
    match cmd {
        StaticLeaseCommand::List => commands::run_for_targets(ctx, |client, server| {
            Ok(fetch_status(client, server)?.static_leases)
        }),
        StaticLeaseCommand::Add { ip, mac, hostname } => {
            let lease = StaticLease { ip, mac, hostname };
            commands::run_for_targets(ctx, |client, server| {
                client
                    .post_json(server, "/control/dhcp/add_static_lease", &lease)
                    .context("adding static lease")?;
                Ok(fetch_status(client, server)?.static_leases)
            })
        }
        StaticLeaseCommand::Remove { ip, mac } => {
            if ip.is_none() && mac.is_none() {
                bail!("Pass --ip or --mac to select the lease");
            }
            commands::run_for_targets(ctx, |client, server| {
                remove_static_lease(client, server, ip.as_deref(), mac.as_deref())
            })
        }
        StaticLeaseCommand::Update { ip, mac, hostname } => {
            commands::run_for_targets(ctx, |client, server| {
                update_static_lease(client, server, &ip, mac.as_deref(), hostname.as_deref())
            })
        }
    }
}

/// The remove endpoint wants the full lease, so look it up by IP or MAC first.
fn remove_static_lease(
    client: &Client,
    server: &ServerConfig,
    ip: Option<&str>,
    mac: Option<&str>,
) -> Result<Vec<StaticLease>> {
    let status = fetch_status(client, server)?;
    let lease = status
        .static_leases
        .iter()
        .find(|l| ip.is_some_and(|v| l.ip == v) || mac.is_some_and(|v| l.mac == v))
        .cloned()
        .context("no static lease matches the given address")?;

    client
        .post_json(server, "/control/dhcp/remove_static_lease", &lease)
        .context("removing static lease")?;
    Ok(fetch_status(client, server)?.static_leases)
}

/// Replace the lease for an IP in a single call, keeping fields the user
/// did not change.
fn update_static_lease(
    client: &Client,
    server: &ServerConfig,
    ip: &str,
    mac: Option<&str>,
    hostname: Option<&str>,
) -> Result<Vec<StaticLease>> {
    let status = fetch_status(client, server)?;
    let old = status
        .static_leases
        .iter()
        .find(|l| l.ip == ip)
        .cloned()
        .with_context(|| format!("no static lease for {}", ip))?;

    let updated = merge_lease(&old, mac, hostname);
    client
        .post_json(server, "/control/dhcp/update_static_lease", &updated)
        .context("updating static lease")?;
    Ok(fetch_status(client, server)?.static_leases)
}

/// Overlay explicitly-passed fields on an existing lease.
fn merge_lease(old: &StaticLease, mac: Option<&str>, hostname: Option<&str>) -> StaticLease {
    StaticLease {
        ip: old.ip.clone(),
        mac: mac.map_or_else(|| old.mac.clone(), str::to_string),
        hostname: hostname.map_or_else(|| old.hostname.clone(), str::to_string),
    }
}

fn fetch_status(client: &Client, server: &ServerConfig) -> Result<DhcpStatus> {
    client
        .get_json(server, "/control/dhcp/status")
        .context("getting DHCP status")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> DhcpStatus {
        DhcpStatus {
            enabled: true,
            interface_name: "eth0".to_string(),
            v4: V4Config {
                gateway_ip: "10.0.0.1".to_string(),
                subnet_mask: "255.255.255.0".to_string(),
                range_start: "10.0.0.100".to_string(),
                range_end: "10.0.0.200".to_string(),
                lease_duration: 86_400,
            },
            v6: V6Config {
                range_start: "2001:db8::100".to_string(),
                lease_duration: 86_400,
            },
            leases: vec![],
            static_leases: vec![],
        }
    }

    fn no_args() -> DhcpConfigArgs {
        DhcpConfigArgs {
            enabled: None,
            interface: None,
            gateway: None,
            subnet_mask: None,
            range_start: None,
            range_end: None,
            lease_duration: None,
            v6_range_start: None,
            v6_lease_duration: None,
        }
    }

    #[test]
    fn merge_preserves_unset_fields() {
        let merged = merge_config(&current(), &no_args());
        assert!(merged.enabled);
        assert_eq!(merged.interface_name, "eth0");
        assert_eq!(merged.v4.gateway_ip, "10.0.0.1");
        assert_eq!(merged.v4.lease_duration, 86_400);
        assert_eq!(merged.v6.range_start, "2001:db8::100");
    }

    #[test]
    fn merge_applies_flags_over_current() {
        let mut args = no_args();
        args.enabled = Some(false);
        args.gateway = Some("10.0.0.254".to_string());
        args.lease_duration = Some(3_600);
        args.v6_lease_duration = Some(7_200);

        let merged = merge_config(&current(), &args);
        assert!(!merged.enabled);
        assert_eq!(merged.v4.gateway_ip, "10.0.0.254");
        assert_eq!(merged.v4.lease_duration, 3_600);
        assert_eq!(merged.v6.lease_duration, 7_200);
        // untouched fields ride along
        assert_eq!(merged.v4.range_start, "10.0.0.100");
        assert_eq!(merged.interface_name, "eth0");
    }

    #[test]
    fn dhcp_status_parses_wire_payload() {
        let json = r#"{
            "enabled": true,
            "interface_name": "eth0",
            "v4": {
                "gateway_ip": "10.0.0.1",
                "subnet_mask": "255.255.255.0",
                "range_start": "10.0.0.100",
                "range_end": "10.0.0.200",
                "lease_duration": 86400
            },
            "v6": {"range_start": "", "lease_duration": 86400},
            "leases": [
                {"mac": "aa:bb:cc:dd:ee:ff", "ip": "10.0.0.101", "hostname": "printer", "expires": "2026-08-24T10:00:00Z"}
            ],
            "static_leases": [
                {"mac": "11:22:33:44:55:66", "ip": "10.0.0.40", "hostname": "nas"}
            ]
        }"#;
        let status: DhcpStatus = serde_json::from_str(json).unwrap();
        assert!(status.enabled);
        assert_eq!(status.leases[0].hostname, "printer");
        assert_eq!(status.static_leases[0].ip, "10.0.0.40");
    }

    #[test]
    fn dhcp_status_tolerates_disabled_server() {
        let status: DhcpStatus = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
        assert!(!status.enabled);
        assert!(status.leases.is_empty());
        assert_eq!(status.v4.gateway_ip, "");
    }

    #[test]
    fn search_report_parses_wire_payload() {
        let json = r#"{
            "v4": {
                "other_server": {"found": "no"},
                "static_ip": {"static": "yes", "ip": "10.0.0.2/24"}
            },
            "v6": {"other_server": {"found": "not_available", "error": "no support"}}
        }"#;
        let report: DhcpSearchReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.v4.other_server.found, "no");
        assert_eq!(report.v4.static_ip.r#static, "yes");
        assert_eq!(report.v6.other_server.error, "no support");
    }

    #[test]
    fn static_lease_serializes_api_field_names() {
        let lease = StaticLease {
            ip: "10.0.0.40".to_string(),
            mac: "11:22:33:44:55:66".to_string(),
            hostname: "nas".to_string(),
        };
        let json = serde_json::to_string(&lease).unwrap();
        assert_eq!(
            json,
            r#"{"ip":"10.0.0.40","mac":"11:22:33:44:55:66","hostname":"nas"}"#
        );
    }

    #[test]
    fn merge_lease_preserves_unset_fields() {
        let old = StaticLease {
            ip: "10.0.0.40".to_string(),
            mac: "11:22:33:44:55:66".to_string(),
            hostname: "nas".to_string(),
        };

        let merged = merge_lease(&old, None, Some("printer"));
        assert_eq!(merged.ip, "10.0.0.40");
        assert_eq!(merged.mac, "11:22:33:44:55:66");
        assert_eq!(merged.hostname, "printer");

        let untouched = merge_lease(&old, None, None);
        assert_eq!(untouched.hostname, "nas");
    }

    #[test]
    fn update_sends_one_post_to_the_update_endpoint() {
        let mut server = mockito::Server::new();
        let status_body =
            r#"{"static_leases":[{"ip":"10.0.0.40","mac":"11:22:33:44:55:66","hostname":"nas"}]}"#;

        let status = server
            .mock("GET", "/control/dhcp/status")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(status_body)
            .expect(2)
            .create();
        let update = server
            .mock("POST", "/control/dhcp/update_static_lease")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "ip": "10.0.0.40",
                "mac": "11:22:33:44:55:66",
                "hostname": "printer",
            })))
            .with_status(200)
            .create();
        let remove = server
            .mock("POST", "/control/dhcp/remove_static_lease")
            .expect(0)
            .create();
        let add = server
            .mock("POST", "/control/dhcp/add_static_lease")
            .expect(0)
            .create();

        let target = ServerConfig {
            name: "attic".to_string(),
            host: server.host_with_port(),
            username: String::new(),
            password: String::new(),
        };
        let leases =
            update_static_lease(&Client::new(), &target, "10.0.0.40", None, Some("printer"))
                .unwrap();

        assert_eq!(leases.len(), 1);
        status.assert();
        update.assert();
        remove.assert();
        add.assert();
    }
}
