//! API client implementation.

use courier_config::ClientAppConfig;
use courier_query::{QueryEncoder, QueryValue};
use http::{HeaderName, HeaderValue, Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::{
    ApiError, CredentialStore, FormPayload, HttpClientConfig, Interceptor, PendingRequest,
    RequestBody, RequestDescriptor, Response, Result, TokenInterceptor, to_form_data,
};

/// Typed API client.
///
/// Every call returns a [`PendingRequest`] immediately; the exchange runs on
/// the current tokio runtime. The auth token is read from the credential
/// store before each request and replaced whenever a `200 OK` response
/// carries a new one.
#[derive(Clone)]
pub struct ApiClient {
    inner: reqwest::Client,
    config: Arc<HttpClientConfig>,
    credentials: Arc<dyn CredentialStore>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    encoder: QueryEncoder,
}

impl ApiClient {
    /// Create a client. The token interceptor is always installed first.
    pub fn new(config: HttpClientConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent);

        if config.gzip {
            builder = builder.gzip(true);
        }
        if config.brotli {
            builder = builder.brotli(true);
        }

        let inner = builder.build()?;
        let encoder = QueryEncoder::new().with_nested_keys(config.nested_keys);
        let token: Arc<dyn Interceptor> = Arc::new(TokenInterceptor::new(credentials.clone()));

        debug!(base_url = %config.base_url, "API client created");

        Ok(Self {
            inner,
            config: Arc::new(config),
            credentials,
            interceptors: vec![token],
            encoder,
        })
    }

    /// Create a client from application configuration.
    pub fn from_app_config(
        app: &ClientAppConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        Self::new(HttpClientConfig::from_app_config(app), credentials)
    }

    /// Add an interceptor. It runs after the ones already installed.
    pub fn with_interceptor<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Get the client configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if API response caching is enabled.
    pub fn cache_enabled(&self) -> bool {
        self.config.cache_enabled
    }

    /// Get the credential store.
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Resolve a path against the API origin.
    pub fn url_for(&self, path: &str) -> Result<url::Url> {
        let joined = format!("{}/{}", self.config.base_url, path);
        url::Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{joined}: {e}")))
    }

    /// Issue a GET. With a query, `?` and its encoding are appended to the path.
    pub fn get<T>(&self, path: &str, query: Option<&QueryValue>) -> PendingRequest<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let path = match query {
            Some(query) => format!("{path}?{}", self.encoder.encode(query)),
            None => path.to_string(),
        };
        self.send(RequestDescriptor::new(Method::GET, path))
    }

    /// Issue a GET with any serializable value as the query.
    pub fn get_query<T, Q>(&self, path: &str, query: &Q) -> PendingRequest<T>
    where
        T: DeserializeOwned + Send + 'static,
        Q: Serialize + ?Sized,
    {
        match QueryValue::from_serialize(query) {
            Ok(query) => self.get(path, Some(&query)),
            Err(e) => {
                PendingRequest::rejected(RequestDescriptor::new(Method::GET, path), e.into())
            }
        }
    }

    /// Issue a POST with a JSON body.
    pub fn post<T, B>(&self, path: &str, body: &B) -> PendingRequest<T>
    where
        T: DeserializeOwned + Send + 'static,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::POST, path, body)
    }

    /// Issue a PUT with a JSON body.
    pub fn put<T, B>(&self, path: &str, body: &B) -> PendingRequest<T>
    where
        T: DeserializeOwned + Send + 'static,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PUT, path, body)
    }

    /// Issue a DELETE for `path/id`.
    pub fn del<T>(&self, path: &str, id: impl Display) -> PendingRequest<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.send(RequestDescriptor::new(Method::DELETE, format!("{path}/{id}")))
    }

    /// Issue a POST with a multipart form body.
    pub fn post_form<T>(&self, path: &str, form: FormPayload) -> PendingRequest<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.send(RequestDescriptor::new(Method::POST, path).with_form(form))
    }

    /// Issue any described request.
    pub fn send<T>(&self, descriptor: RequestDescriptor) -> PendingRequest<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let client = self.clone();
        let request = descriptor.clone();
        PendingRequest::spawn(descriptor, async move { client.exchange(&request).await })
    }

    fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> PendingRequest<T>
    where
        T: DeserializeOwned + Send + 'static,
        B: Serialize + ?Sized,
    {
        let descriptor = RequestDescriptor::new(method, path)
            .with_header(header::CONTENT_TYPE.as_str(), "application/json");

        match descriptor.clone().with_json(body) {
            Ok(descriptor) => self.send(descriptor),
            Err(e) => PendingRequest::rejected(descriptor, e),
        }
    }

    /// Run one exchange: build, intercept, apply caller headers, send,
    /// intercept the response and resolve the body.
    async fn exchange<T: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> Result<T> {
        let url = self.url_for(descriptor.path())?;
        let mut builder = self.inner.request(descriptor.method().clone(), url);

        for (name, value) in &self.config.default_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match descriptor.body() {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Form(form)) => builder.multipart(to_form_data(form)?),
            None => builder,
        };

        let mut request = builder.build()?;

        for interceptor in &self.interceptors {
            request = interceptor.intercept_request(request).await?;
        }

        for (name, value) in descriptor.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::RequestBuild(format!("header {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::RequestBuild(format!("header {name}: {e}")))?;
            request.headers_mut().insert(name, value);
        }

        debug!(method = %request.method(), url = %request.url(), "Sending API request");

        let response = self.inner.execute(request).await?;
        let mut response = Response::from_reqwest(response).await?;

        debug!(status = %response.status(), url = %response.url(), "Received API response");

        if response.status() == StatusCode::OK {
            for interceptor in &self.interceptors {
                response = interceptor.intercept_response(response).await?;
            }
        }

        trace!(bytes = response.bytes().len(), "Resolving API response body");
        response.settle()
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("interceptors", &self.interceptors.len())
            .field("encoder", &self.encoder)
            .finish()
    }
}
