use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, Response};
use serde_json::Value;
use tracing::debug;

use super::{
    ApiReply, FormRequest, GameApi,
    config::ApiConfig,
    error::{ApiResult, TransportError},
};

/// `reqwest`-backed game API keeping the session cookie across calls.
#[derive(Clone)]
pub struct HttpGameApi {
    client: Client,
    base_url: Arc<str>,
}

impl HttpGameApi {
    /// Build a client with its own cookie jar for the session credential.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(user_agent) = config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|source| TransportError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::<str>::from(config.base_url.trim_end_matches('/')),
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    async fn send(
        builder: reqwest::RequestBuilder,
        path: &'static str,
    ) -> ApiResult<ApiReply> {
        let response = builder
            .send()
            .await
            .map_err(|source| TransportError::RequestSend {
                path: path.to_string(),
                source,
            })?;
        read_reply(response, path).await
    }
}

/// Read status and body; a body that is empty or not JSON becomes `None`.
async fn read_reply(response: Response, path: &'static str) -> ApiResult<ApiReply> {
    let status = response.status().as_u16();
    let bytes = response
        .bytes()
        .await
        .map_err(|source| TransportError::ReadBody {
            path: path.to_string(),
            source,
        })?;

    let body = if bytes.is_empty() {
        None
    } else {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(path, status, error = %err, "game API replied with a non-JSON body");
                None
            }
        }
    };

    Ok(ApiReply { status, body })
}

impl GameApi for HttpGameApi {
    fn get(&self, path: &'static str) -> BoxFuture<'static, ApiResult<ApiReply>> {
        let builder = self.request(Method::GET, path);
        Box::pin(Self::send(builder, path))
    }

    fn post(&self, request: FormRequest) -> BoxFuture<'static, ApiResult<ApiReply>> {
        let FormRequest { path, form } = request;
        let builder = self.request(Method::POST, path).form(&form);
        Box::pin(Self::send(builder, path))
    }
}
