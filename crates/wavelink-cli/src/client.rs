//! HTTP client for a running Wavelink server.

use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde_json::json;

use wavelink_core::error::{AppError, ErrorKind};

/// Error body returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct UsersBody {
    users: Vec<String>,
}

/// Thin wrapper over the handshake endpoints.
pub struct ServerClient {
    base: String,
    client: Client,
}

impl ServerClient {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, AppError> {
        let mut url = Url::parse(&format!("{}{}", self.base, path)).map_err(|e| {
            AppError::with_source(
                ErrorKind::Validation,
                format!("Invalid server URL '{}'", self.base),
                e,
            )
        })?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    /// POST /handshake/send, returning the server's confirmation.
    pub async fn send_handshake(
        &self,
        uid: &str,
        kind: &str,
        to: Option<&str>,
        message: Option<&str>,
    ) -> Result<String, AppError> {
        let url = self.url("/handshake/send", &[("uid", uid)])?;
        let body = json!({
            "type": kind,
            "toIdentity": to,
            "message": message,
        });

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let body: MessageBody = parse(response).await?;
        Ok(body.message)
    }

    /// GET /handshake/active
    pub async fn active_users(&self) -> Result<Vec<String>, AppError> {
        let url = self.url("/handshake/active", &[])?;
        let response = self.client.get(url).send().await.map_err(network_error)?;
        let body: UsersBody = parse(response).await?;
        Ok(body.users)
    }
}

fn network_error(e: reqwest::Error) -> AppError {
    AppError::with_source(ErrorKind::ExternalService, format!("Network error: {e}"), e)
}

async fn parse<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_else(|_| status.to_string());
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => format!("{} ({}): {}", status, body.error, body.message),
            Err(_) => format!("{}: {}", status, text),
        };
        return Err(AppError::external(message));
    }

    response.json::<T>().await.map_err(|e| {
        AppError::with_source(ErrorKind::Serialization, "Failed to parse server response", e)
    })
}
