use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use leadsync_core::{
    ClientConfig, ErrorEnvelope, ListEnvelope, MutationResponse, Page, PageRequest, Resource,
    ResourceName, WORKSPACE_HEADER,
};
use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Logical operations a resource endpoint supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchPage,
    Create,
    Update,
    Delete,
}

impl Operation {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::FetchPage => "fetch_page",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Shared HTTP connection to the backend. One per process; cheap to clone via `Arc`.
pub struct ApiClient {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) token: Option<String>,
    pub(crate) workspace_id: Option<String>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("client", &self.client)
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("workspace_id", &self.workspace_id)
            .finish()
    }
}

impl ApiClient {
    /// Creates a client from connection settings.
    ///
    /// # Errors
    /// Returns an error if the base URL cannot carry a path, or if the HTTP
    /// client cannot be built (TLS backend failure).
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ClientError::ClientInit(format!("invalid base URL {}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::ClientInit(format!(
                "base URL cannot carry a path: {}",
                config.base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
            workspace_id: config.workspace_id.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Typed handle for one resource namespace.
    #[must_use]
    pub fn resource<R: Resource>(self: &Arc<Self>) -> ResourceClient<R> {
        ResourceClient::new(Arc::clone(self))
    }

    /// Each entry of `segments` becomes one percent-encoded path segment.
    fn request(
        &self,
        method: Method,
        namespace: ResourceName,
        segments: &[&str],
    ) -> RequestBuilder {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always has path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(namespace.as_str()).extend(segments);
        }
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(workspace_id) = &self.workspace_id {
            builder = builder.header(WORKSPACE_HEADER, workspace_id);
        }
        builder
    }

    /// Sends the request and decodes a 2xx body, mapping everything else to [`ClientError`].
    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        namespace: ResourceName,
        operation: Operation,
    ) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => envelope.data.message,
                Err(_) => truncate(&body, 200).to_owned(),
            };
            tracing::debug!(
                resource = %namespace,
                operation = operation.as_str(),
                status = status.as_u16(),
                %message,
                "request failed"
            );
            return Err(ClientError::Api { status: status.as_u16(), message });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode {
            context: format!(
                "{namespace} {} (body: {})",
                operation.as_str(),
                truncate(&body, 200)
            ),
            source: e,
        })
    }

    async fn send_mutation<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        namespace: ResourceName,
        operation: Operation,
    ) -> Result<MutationResponse<T>, ClientError> {
        let response: MutationResponse<T> = self.send(builder, namespace, operation).await?;
        if !response.success {
            return Err(ClientError::Rejected { message: response.message });
        }
        tracing::debug!(resource = %namespace, operation = operation.as_str(), "mutation accepted");
        Ok(response)
    }
}

/// The seam between transport and the query layer.
#[async_trait]
pub trait ResourceApi<R: Resource>: Send + Sync {
    /// `GET /{resource}/fetch?page&limit`
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<R::Item>, ClientError>;

    /// `POST /{resource}/create`
    async fn create(&self, input: &R::Create) -> Result<MutationResponse<R::Item>, ClientError>;

    /// `PATCH /{resource}/{edit path}` with body `{id, ...input}`
    async fn update(
        &self,
        id: &str,
        input: &R::Update,
    ) -> Result<MutationResponse<R::Item>, ClientError>;

    /// `DELETE /{resource}/delete/{id}`
    async fn delete(&self, id: &str) -> Result<MutationResponse<R::Item>, ClientError>;
}

#[derive(Serialize)]
struct UpdateBody<'a, U: Serialize> {
    id: &'a str,
    #[serde(flatten)]
    payload: &'a U,
}

/// HTTP implementation of [`ResourceApi`] for resource `R`.
pub struct ResourceClient<R> {
    api: Arc<ApiClient>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self { api: Arc::clone(&self.api), _resource: PhantomData }
    }
}

impl<R: Resource> fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("resource", &R::NAME)
            .field("api", &self.api)
            .finish()
    }
}

impl<R: Resource> ResourceClient<R> {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api, _resource: PhantomData }
    }
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for ResourceClient<R> {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<R::Item>, ClientError> {
        let builder = self
            .api
            .request(Method::GET, R::NAME, &["fetch"])
            .query(&[("page", request.page()), ("limit", request.limit())]);
        let envelope: ListEnvelope<R::Item> =
            self.api.send(builder, R::NAME, Operation::FetchPage).await?;
        tracing::debug!(
            resource = %R::NAME,
            page = request.page(),
            limit = request.limit(),
            items = envelope.data.items.len(),
            total = envelope.data.pagination.total_items,
            "page fetched"
        );
        Ok(envelope.data)
    }

    async fn create(&self, input: &R::Create) -> Result<MutationResponse<R::Item>, ClientError> {
        let builder = self.api.request(Method::POST, R::NAME, &["create"]).json(input);
        self.api.send_mutation(builder, R::NAME, Operation::Create).await
    }

    async fn update(
        &self,
        id: &str,
        input: &R::Update,
    ) -> Result<MutationResponse<R::Item>, ClientError> {
        let body = UpdateBody { id, payload: input };
        let builder = self.api.request(Method::PATCH, R::NAME, &[R::EDIT_PATH]).json(&body);
        self.api.send_mutation(builder, R::NAME, Operation::Update).await
    }

    async fn delete(&self, id: &str) -> Result<MutationResponse<R::Item>, ClientError> {
        let builder = self.api.request(Method::DELETE, R::NAME, &["delete", id]);
        self.api.send_mutation(builder, R::NAME, Operation::Delete).await
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
