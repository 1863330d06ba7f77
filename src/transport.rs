use async_trait::async_trait;
use payloads::{ErrorBody, FeedItem, VoteRequest, VoteResponse};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// How a session reaches the vote server.
#[async_trait]
pub trait VoteTransport: Send + Sync {
    /// Whether requests carry a principal. Anonymous sessions never vote.
    fn is_authenticated(&self) -> bool;

    async fn fetch_feed(&self) -> Result<Vec<FeedItem>, ClientError>;

    async fn submit_vote(&self, request: &VoteRequest) -> Result<VoteResponse, ClientError>;
}

pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl VoteTransport for HttpTransport {
    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    async fn fetch_feed(&self) -> Result<Vec<FeedItem>, ClientError> {
        let request = self.client.get(format!("{}/bookmarks", self.base_url));

        decode(self.authorize(request).send().await?).await
    }

    async fn submit_vote(&self, request: &VoteRequest) -> Result<VoteResponse, ClientError> {
        let builder = self
            .client
            .post(format!("{}/votes", self.base_url))
            .json(request);

        decode(self.authorize(builder).send().await?).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.bytes().await?;
    let (kind, message) = match serde_json::from_slice::<ErrorBody>(&body) {
        Ok(error) => (Some(error.kind), error.message),
        Err(_) => (None, String::from_utf8_lossy(&body).into_owned()),
    };

    Err(ClientError::Rejected {
        status: status.as_u16(),
        kind,
        message,
    })
}
