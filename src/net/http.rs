//! reqwest-backed [`AuthGateway`].
//!
//! Every request goes through one client whose cookie handling is fixed at
//! construction: a cookie store on native targets, `credentials: include` on
//! `wasm32`. Response decoding lives in `types` so this file only deals with
//! transport.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use reqwest::{Method, RequestBuilder};

use super::gateway::{
    AuthGateway, CHECK_SESSION_PATH, GatewayError, SIGN_IN_PATH, SIGN_OUT_PATH, SIGN_UP_PATH, backend_message,
};
use super::types::{
    Confirmation, IdentityPayload, LoginPayload, SignInCredentials, SignUpCredentials, parse_confirmation,
    parse_identity_payload, parse_login_payload,
};
use crate::config::ClientConfig;

// =============================================================================
// CLIENT
// =============================================================================

/// Clones share the underlying connection pool and cookie jar.
#[derive(Clone)]
pub struct HttpAuthGateway {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpAuthGateway {
    /// Build a gateway with a cookie-bearing HTTP client.
    ///
    /// # Errors
    ///
    /// Returns the reqwest error if the client cannot be constructed (for
    /// example when the TLS backend fails to initialize).
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let http = build_client(&config)?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        tracing::debug!(method = method.as_str(), url = url.as_str(), "auth request");
        with_credentials(self.http.request(method, url))
    }

    /// Send and collect the body of a 2xx response; anything else becomes a
    /// [`GatewayError`].
    async fn send(&self, request: RequestBuilder, path: &str) -> Result<String, GatewayError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(path, error = %e, "auth backend unreachable");
            GatewayError::unreachable(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::status(status, format!("failed to read response body: {e}")))?;

        if !(200..300).contains(&status) {
            let message = backend_message(status, &body);
            tracing::warn!(path, status, %message, "auth request rejected");
            return Err(GatewayError::status(status, message));
        }

        Ok(body)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client(config: &ClientConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout())
        .build()
}

// The browser owns cookies and timeouts for fetch.
#[cfg(target_arch = "wasm32")]
fn build_client(_config: &ClientConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().build()
}

#[cfg(not(target_arch = "wasm32"))]
fn with_credentials(request: RequestBuilder) -> RequestBuilder {
    request
}

#[cfg(target_arch = "wasm32")]
fn with_credentials(request: RequestBuilder) -> RequestBuilder {
    request.fetch_credentials_include()
}

#[async_trait::async_trait(?Send)]
impl AuthGateway for HttpAuthGateway {
    async fn sign_up(&self, credentials: &SignUpCredentials) -> Result<Confirmation, GatewayError> {
        let request = self.request(Method::POST, SIGN_UP_PATH).json(credentials);
        let body = self.send(request, SIGN_UP_PATH).await?;
        Ok(parse_confirmation(&body))
    }

    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<LoginPayload, GatewayError> {
        let request = self.request(Method::POST, SIGN_IN_PATH).json(credentials);
        let body = self.send(request, SIGN_IN_PATH).await?;
        Ok(parse_login_payload(&body))
    }

    async fn sign_out(&self) -> Result<Confirmation, GatewayError> {
        let request = self.request(Method::POST, SIGN_OUT_PATH);
        let body = self.send(request, SIGN_OUT_PATH).await?;
        Ok(parse_confirmation(&body))
    }

    async fn check_session(&self) -> Result<IdentityPayload, GatewayError> {
        let request = self.request(Method::GET, CHECK_SESSION_PATH);
        let body = self.send(request, CHECK_SESSION_PATH).await?;
        Ok(parse_identity_payload(&body))
    }
}
