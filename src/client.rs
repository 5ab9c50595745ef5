//! HTTP client for the AdGuard Home control API.
//!
//! Every endpoint lives under `/control` on the server's host and speaks
//! JSON over plain HTTP with basic auth, so this stays a thin wrapper around
//! one [`ureq::Agent`]. Non-2xx statuses surface as [`Error::Status`].

use crate::config::ServerConfig;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from talking to an AdGuard Home server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Server entry has no host to connect to.
    #[error("server '{server}' has no host configured")]
    MissingHost {
        /// Name of the offending server entry.
        server: String,
    },

    /// Server answered with a non-success status.
    #[error("HTTP {status}: {}", status_hint(.status))]
    Status {
        /// Status code the server answered with.
        status: u16,
    },

    /// Request failed before any status came back.
    #[error("HTTP request failed: {message}")]
    Transport {
        /// Error message.
        message: String,
    },
}

/// What a status code most likely means coming from this API.
fn status_hint(status: &u16) -> &'static str {
    match status {
        401 | 403 => "authentication failed, check the configured credentials",
        404 => "no such endpoint on this server",
        _ => "the server rejected the request",
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Status { status: code },
            other => Self::Transport {
                message: other.to_string(),
            },
        }
    }
}

/// Client for the control API of one or more servers.
pub struct Client {
    agent: ureq::Agent,
}

impl Client {
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
        }
    }

    /// Control-plane base URL for a server. The appliance speaks plain HTTP.
    fn base_url(server: &ServerConfig) -> Result<String> {
        if server.host.is_empty() {
            return Err(Error::MissingHost {
                server: server.name.clone(),
            });
        }
        Ok(format!("http://{}", server.host))
    }

    /// Basic auth header value, or None when the server has no credentials.
    fn auth_header(server: &ServerConfig) -> Option<String> {
        if server.username.is_empty() {
            return None;
        }
        let credentials = format!("{}:{}", server.username, server.password);
        Some(format!("Basic {}", BASE64.encode(credentials)))
    }

    /// GET a JSON payload.
    pub fn get_json<T: DeserializeOwned>(&self, server: &ServerConfig, path: &str) -> Result<T> {
        self.get_json_with_query(server, path, &[])
    }

    /// GET a JSON payload with URL query parameters.
    pub fn get_json_with_query<T: DeserializeOwned>(
        &self,
        server: &ServerConfig,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", Self::base_url(server)?, path);
        log::debug!("GET {url}");

        let mut request = self.agent.get(&url);
        if let Some(auth) = Self::auth_header(server) {
            request = request.header("Authorization", &auth);
        }
        for (key, value) in query {
            request = request.query(*key, *value);
        }

        Ok(request.call()?.body_mut().read_json()?)
    }

    /// POST a JSON body, ignoring the response payload.
    pub fn post_json(
        &self,
        server: &ServerConfig,
        path: &str,
        body: &impl Serialize,
    ) -> Result<()> {
        let url = format!("{}{}", Self::base_url(server)?, path);
        log::debug!("POST {url}");

        let mut request = self.agent.post(&url);
        if let Some(auth) = Self::auth_header(server) {
            request = request.header("Authorization", &auth);
        }
        request.send_json(body)?;
        Ok(())
    }

    /// POST a JSON body and read a JSON response.
    pub fn post_json_read<T: DeserializeOwned>(
        &self,
        server: &ServerConfig,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let url = format!("{}{}", Self::base_url(server)?, path);
        log::debug!("POST {url}");

        let mut request = self.agent.post(&url);
        if let Some(auth) = Self::auth_header(server) {
            request = request.header("Authorization", &auth);
        }
        Ok(request.send_json(body)?.body_mut().read_json()?)
    }

    /// POST with an empty body, ignoring the response payload.
    pub fn post_empty(&self, server: &ServerConfig, path: &str) -> Result<()> {
        let url = format!("{}{}", Self::base_url(server)?, path);
        log::debug!("POST {url}");

        let mut request = self.agent.post(&url);
        if let Some(auth) = Self::auth_header(server) {
            request = request.header("Authorization", &auth);
        }
        request.send_empty()?;
        Ok(())
    }

    /// PUT a JSON body, ignoring the response payload.
    pub fn put_json(
        &self,
        server: &ServerConfig,
        path: &str,
        body: &impl Serialize,
    ) -> Result<()> {
        let url = format!("{}{}", Self::base_url(server)?, path);
        log::debug!("PUT {url}");

        let mut request = self.agent.put(&url);
        if let Some(auth) = Self::auth_header(server) {
            request = request.header("Authorization", &auth);
        }
        request.send_json(body)?;
        Ok(())
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> ServerConfig {
        ServerConfig {
            name: "attic".to_string(),
            host: "10.0.0.2:3000".to_string(),
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[test]
    fn test_base_url() {
        let url = Client::base_url(&server()).unwrap();
        assert_eq!(url, "http://10.0.0.2:3000");
    }

    #[test]
    fn test_base_url_rejects_empty_host() {
        let mut bad = server();
        bad.host = String::new();
        let err = Client::base_url(&bad).unwrap_err();
        assert!(err.to_string().contains("'attic' has no host"));
    }

    #[test]
    fn test_auth_header_encoding() {
        let auth = Client::auth_header(&server()).unwrap();
        assert_eq!(auth, "Basic YWRtaW46aHVudGVyMg==");
    }

    #[test]
    fn test_auth_header_skipped_without_username() {
        let mut anon = server();
        anon.username = String::new();
        assert!(Client::auth_header(&anon).is_none());
    }

    #[test]
    fn test_status_error_hints() {
        assert_eq!(
            Error::Status { status: 403 }.to_string(),
            "HTTP 403: authentication failed, check the configured credentials"
        );
        assert_eq!(
            Error::Status { status: 404 }.to_string(),
            "HTTP 404: no such endpoint on this server"
        );
        assert_eq!(
            Error::Status { status: 500 }.to_string(),
            "HTTP 500: the server rejected the request"
        );
    }

    #[test]
    fn test_transport_error_display() {
        let err = Error::Transport {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP request failed: connection refused");
    }
}
