//! Fan-out execution across configured servers.
//!
//! A command targeting every configured server runs the same unit of work
//! against each one in turn. One server failing must not stop the rest, so
//! each run is captured as an [`Outcome`] and the whole batch is rendered as
//! a single JSON report with one entry per server, in configuration order.

use crate::config::ServerConfig;
use anyhow::Result;
use serde::Serialize;

/// Result of running one unit of work against one server.
///
/// Exactly one of `result` and `error` is set; the unset side is omitted
/// from the serialized form.
#[derive(Debug, Serialize)]
pub struct Outcome<T> {
    pub server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Outcome<T> {
    fn success(server: &str, result: T) -> Self {
        Self {
            server: server.to_string(),
            result: Some(result),
            error: None,
        }
    }

    fn failure(server: &str, err: &anyhow::Error) -> Self {
        Self {
            server: server.to_string(),
            result: None,
            // {:#} keeps the whole context chain on one line.
            error: Some(format!("{err:#}")),
        }
    }
}

/// Run `work` against every server, capturing per-server failures.
///
/// Outcomes come back in the same order as `servers`, one per server. A
/// failure is recorded and the remaining servers still run; nothing is
/// retried.
pub fn execute<T, F>(servers: &[ServerConfig], work: F) -> Vec<Outcome<T>>
where
    F: Fn(&ServerConfig) -> Result<T>,
{
    servers
        .iter()
        .map(|server| match work(server) {
            Ok(result) => Outcome::success(&server.name, result),
            Err(err) => {
                log::debug!("{} failed: {err:#}", server.name);
                Outcome::failure(&server.name, &err)
            }
        })
        .collect()
}

/// Render a report as pretty-printed JSON.
///
/// A payload that cannot be encoded becomes an error entry for its server;
/// the render itself always produces a document.
pub fn render<T: Serialize>(report: &[Outcome<T>]) -> String {
    let entries: Vec<serde_json::Value> = report
        .iter()
        .map(|outcome| {
            serde_json::to_value(outcome).unwrap_or_else(|err| {
                serde_json::json!({
                    "server": outcome.server,
                    "error": format!("cannot encode result: {err}"),
                })
            })
        })
        .collect();

    // All keys in `entries` are strings, so this serialization cannot fail.
    serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    fn server(name: &str) -> ServerConfig {
        ServerConfig {
            name: name.to_string(),
            host: format!("{name}.lan:3000"),
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[test]
    fn one_outcome_per_server_in_order() {
        let servers = vec![server("gamma"), server("alpha"), server("beta")];
        let report = execute(&servers, |s| Ok(s.host.clone()));

        let names: Vec<_> = report.iter().map(|o| o.server.as_str()).collect();
        assert_eq!(names, ["gamma", "alpha", "beta"]);
        assert!(report.iter().all(|o| o.result.is_some() && o.error.is_none()));
    }

    #[test]
    fn failure_does_not_stop_later_servers() {
        let servers = vec![server("a"), server("b"), server("c")];
        let report = execute(&servers, |s| {
            if s.name == "b" {
                bail!("connection refused");
            }
            Ok(42)
        });

        assert_eq!(report.len(), 3);
        assert_eq!(report[0].result, Some(42));
        assert_eq!(report[1].error.as_deref(), Some("connection refused"));
        assert!(report[1].result.is_none());
        assert_eq!(report[2].result, Some(42));
    }

    #[test]
    fn error_string_keeps_context_chain() {
        use anyhow::Context as _;

        let servers = vec![server("a")];
        let report = execute(&servers, |_| -> Result<()> {
            Err(anyhow::anyhow!("timed out")).context("fetching status")
        });

        assert_eq!(report[0].error.as_deref(), Some("fetching status: timed out"));
    }

    #[test]
    fn all_failures_still_fill_the_report() {
        let servers = vec![server("a"), server("b")];
        let report = execute(&servers, |_| -> Result<()> { bail!("down") });

        assert_eq!(report.len(), 2);
        assert!(report.iter().all(|o| o.error.is_some()));
    }

    #[test]
    fn render_mixes_success_and_error_entries() {
        let servers = vec![server("ok"), server("bad")];
        let report = execute(&servers, |s| {
            if s.name == "bad" {
                bail!("boom");
            }
            Ok(serde_json::json!({ "enabled": true }))
        });

        let parsed: serde_json::Value = serde_json::from_str(&render(&report)).unwrap();
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0]["server"], "ok");
        assert_eq!(entries[0]["result"]["enabled"], true);
        assert!(entries[0].get("error").is_none());

        assert_eq!(entries[1]["server"], "bad");
        assert_eq!(entries[1]["error"], "boom");
        assert!(entries[1].get("result").is_none());
    }

    #[test]
    fn render_turns_unencodable_payload_into_error_entry() {
        struct Unencodable;

        impl Serialize for Unencodable {
            fn serialize<S: serde::Serializer>(
                &self,
                _serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("not representable"))
            }
        }

        let servers = vec![server("a")];
        let report = execute(&servers, |_| Ok(Unencodable));

        let parsed: serde_json::Value = serde_json::from_str(&render(&report)).unwrap();
        let entry = &parsed.as_array().unwrap()[0];
        assert_eq!(entry["server"], "a");
        assert!(entry["error"]
            .as_str()
            .unwrap()
            .starts_with("cannot encode result"));
        assert!(entry.get("result").is_none());
    }

    #[test]
    fn render_empty_report() {
        let report: Vec<Outcome<()>> = Vec::new();
        assert_eq!(render(&report), "[]");
    }
}
