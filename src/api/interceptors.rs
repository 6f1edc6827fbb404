use async_trait::async_trait;
use chrono::Local;
use log::error;
use serde_json::Value;

use super::{ApiError, ApiRequest, ApiResponse, Exchange, Transport, TransportError};
use crate::state::LoadingState;

/// Inner link: turns every raw transport failure into an [`ApiError`], exactly once.
pub struct ErrorNormalizer<T> {
    transport: T,
}

impl<T: Transport> ErrorNormalizer<T> {
    pub fn new(transport: T) -> ErrorNormalizer<T> {
        ErrorNormalizer { transport }
    }
}

pub fn normalize(err: TransportError) -> ApiError {
    match err {
        TransportError::Network { message } => ApiError {
            status: 0,
            message: format!("Error: {}", message),
            body: Value::Null,
        },
        TransportError::Status { status, message, body } => {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_owned)
                .unwrap_or(message);

            ApiError { status, message, body }
        },
    }
}

#[async_trait]
impl<T: Transport> Exchange for ErrorNormalizer<T> {
    async fn exchange(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let path = request.path.clone();
        self.transport.send(request).await.map_err(|err| {
            let err = normalize(err);
            error!(
                "HTTP error, status={}, message={}, path={}, at={}",
                err.status,
                err.message,
                path,
                Local::now().to_rfc3339()
            );
            err
        })
    }
}

/// Outer link: keeps the loading indicator up for the lifetime of the exchange.
pub struct LoadingTracker<E> {
    inner: E,
    loading: LoadingState,
}

impl<E: Exchange> LoadingTracker<E> {
    pub fn new(inner: E, loading: LoadingState) -> LoadingTracker<E> {
        LoadingTracker { inner, loading }
    }
}

#[async_trait]
impl<E: Exchange> Exchange for LoadingTracker<E> {
    async fn exchange(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let _guard = self.loading.begin();
        self.inner.exchange(request).await
    }
}
