use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{Account, Customer, Movement, ReportRow};
use crate::report::range::QueryBounds;
use crate::state::LoadingState;

pub mod http;
pub mod interceptors;

#[cfg(test)]
pub(crate) mod mock;


pub use http::HttpTransport;
pub use interceptors::{ErrorNormalizer, LoadingTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Outbound request, path relative to the API base.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> ApiRequest {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> ApiRequest {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> ApiRequest {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

/// Raw failure as reported by a transport, before normalization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// No response was received.
    #[error("{message}")]
    Network { message: String },
    /// A response arrived with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String, body: Value },
}

/// The one error shape every caller of the API sees.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub body: Value,
}

impl ApiError {
    fn decode(status: u16, err: serde_json::Error) -> ApiError {
        ApiError {
            status,
            message: format!("Error: unexpected response body: {}", err),
            body: Value::Null,
        }
    }

    fn encode(err: serde_json::Error) -> ApiError {
        ApiError {
            status: 0,
            message: format!("Error: could not encode request: {}", err),
            body: Value::Null,
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// One link of the interceptor chain.
#[async_trait]
pub trait Exchange: Send + Sync {
    async fn exchange(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Typed access to the backend, one method per endpoint.
///
/// Every call goes through the same chain: loading tracking outside, error
/// normalization inside, then the transport.
#[derive(Clone)]
pub struct ApiClient {
    chain: Arc<dyn Exchange>,
}

impl ApiClient {
    pub fn new<T: Transport + 'static>(transport: T, loading: LoadingState) -> ApiClient {
        let chain = LoadingTracker::new(ErrorNormalizer::new(transport), loading);
        ApiClient { chain: Arc::new(chain) }
    }

    async fn call<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        debug!("{} {}", request.method, request.path);
        let response = self.chain.exchange(request).await?;
        serde_json::from_value(response.body).map_err(|err| ApiError::decode(response.status, err))
    }

    async fn call_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        debug!("{} {}", request.method, request.path);
        self.chain.exchange(request).await.map(|_| ())
    }

    fn json<B: Serialize>(body: &B) -> Result<Value, ApiError> {
        serde_json::to_value(body).map_err(ApiError::encode)
    }

    pub async fn customers(&self) -> Result<Vec<Customer>, ApiError> {
        self.call(ApiRequest::new(Method::Get, "/clientes")).await
    }

    pub async fn customer(&self, id: i64) -> Result<Customer, ApiError> {
        self.call(ApiRequest::new(Method::Get, format!("/clientes/{}", id))).await
    }

    pub async fn create_customer(&self, customer: &Customer) -> Result<Customer, ApiError> {
        let body = Self::json(customer)?;
        self.call(ApiRequest::new(Method::Post, "/clientes").with_body(body)).await
    }

    pub async fn update_customer(&self, id: i64, customer: &Customer) -> Result<Customer, ApiError> {
        let body = Self::json(customer)?;
        self.call(ApiRequest::new(Method::Put, format!("/clientes/{}", id)).with_body(body))
            .await
    }

    pub async fn delete_customer(&self, id: i64) -> Result<(), ApiError> {
        self.call_empty(ApiRequest::new(Method::Delete, format!("/clientes/{}", id)))
            .await
    }

    pub async fn accounts(&self) -> Result<Vec<Account>, ApiError> {
        self.call(ApiRequest::new(Method::Get, "/cuentas")).await
    }

    pub async fn account(&self, id: i64) -> Result<Account, ApiError> {
        self.call(ApiRequest::new(Method::Get, format!("/cuentas/{}", id))).await
    }

    pub async fn accounts_by_customer(&self, customer_id: i64) -> Result<Vec<Account>, ApiError> {
        self.call(ApiRequest::new(Method::Get, format!("/cuentas/cliente/{}", customer_id)))
            .await
    }

    pub async fn create_account(&self, account: &Account) -> Result<Account, ApiError> {
        let body = Self::json(account)?;
        self.call(ApiRequest::new(Method::Post, "/cuentas").with_body(body)).await
    }

    pub async fn update_account(&self, id: i64, account: &Account) -> Result<Account, ApiError> {
        let body = Self::json(account)?;
        self.call(ApiRequest::new(Method::Put, format!("/cuentas/{}", id)).with_body(body))
            .await
    }

    pub async fn delete_account(&self, id: i64) -> Result<(), ApiError> {
        self.call_empty(ApiRequest::new(Method::Delete, format!("/cuentas/{}", id)))
            .await
    }

    pub async fn movements(&self) -> Result<Vec<Movement>, ApiError> {
        self.call(ApiRequest::new(Method::Get, "/movimientos")).await
    }

    pub async fn movement(&self, id: i64) -> Result<Movement, ApiError> {
        self.call(ApiRequest::new(Method::Get, format!("/movimientos/{}", id))).await
    }

    pub async fn movements_by_account(&self, account_id: i64) -> Result<Vec<Movement>, ApiError> {
        self.call(ApiRequest::new(Method::Get, format!("/movimientos/cuenta/{}", account_id)))
            .await
    }

    pub async fn create_movement(&self, movement: &Movement) -> Result<Movement, ApiError> {
        let body = Self::json(movement)?;
        self.call(ApiRequest::new(Method::Post, "/movimientos").with_body(body)).await
    }

    pub async fn update_movement(&self, id: i64, movement: &Movement) -> Result<Movement, ApiError> {
        let body = Self::json(movement)?;
        self.call(ApiRequest::new(Method::Put, format!("/movimientos/{}", id)).with_body(body))
            .await
    }

    pub async fn delete_movement(&self, id: i64) -> Result<(), ApiError> {
        self.call_empty(ApiRequest::new(Method::Delete, format!("/movimientos/{}", id)))
            .await
    }

    /// Report rows for a customer between two instants, both ends inclusive.
    pub async fn report(&self, customer_id: i64, bounds: &QueryBounds) -> Result<Vec<ReportRow>, ApiError> {
        let request = ApiRequest::new(Method::Get, "/reportes")
            .with_query("clienteId", customer_id.to_string())
            .with_query("fechaInicio", bounds.start.as_str())
            .with_query("fechaFin", bounds.end.as_str());
        self.call(request).await
    }
}
