//! Back-office REST API client
//!
//! The back-office is the source of truth for sellers, orders, assets and
//! daily loads. Every call forwards the operator's bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use shared::{Asset, AssetScope, DailyLoad, DailyLoadStatus, DebtPayment, Order, Seller};
use uuid::Uuid;

use crate::config::BackofficeConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::Session;

/// Operations the gateway needs from the back-office
#[async_trait]
pub trait BackofficeApi: Send + Sync {
    async fn list_sellers(&self, session: &Session) -> AppResult<Vec<Seller>>;

    async fn get_seller(&self, session: &Session, seller_id: Uuid) -> AppResult<Seller>;

    async fn list_orders_for_seller(&self, session: &Session, seller_id: Uuid)
        -> AppResult<Vec<Order>>;

    async fn get_order(&self, session: &Session, order_id: Uuid) -> AppResult<Order>;

    async fn list_assets(&self, session: &Session, scope: Option<AssetScope>)
        -> AppResult<Vec<Asset>>;

    /// Persist a new open load; the back-office decrements pending balances
    async fn create_daily_load(&self, session: &Session, load: &DailyLoad) -> AppResult<DailyLoad>;

    async fn list_daily_loads(
        &self,
        session: &Session,
        status: Option<DailyLoadStatus>,
        seller_id: Option<Uuid>,
    ) -> AppResult<Vec<DailyLoad>>;

    async fn get_daily_load(&self, session: &Session, load_id: Uuid) -> AppResult<DailyLoad>;

    /// Close a load; the back-office updates debt, asset status and deliveries
    async fn close_daily_load(
        &self,
        session: &Session,
        load_id: Uuid,
        load: &DailyLoad,
    ) -> AppResult<DailyLoad>;

    /// Record a debt payment and return the updated seller
    async fn record_payment(
        &self,
        session: &Session,
        seller_id: Uuid,
        payment: &DebtPayment,
    ) -> AppResult<Seller>;
}

/// List responses arrive either bare or wrapped in `{"data": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListEnvelope<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data,
        }
    }
}

/// reqwest implementation of [`BackofficeApi`]
#[derive(Clone)]
pub struct RestBackofficeClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestBackofficeClient {
    /// Create a client from configuration
    pub fn new(config: &BackofficeConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Create a client against a custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        let request = request.bearer_auth(&session.token);
        match &self.api_key {
            Some(key) => request.header("X-Api-Key", key),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        session: &Session,
        resource: &str,
    ) -> AppResult<T> {
        let response = self
            .authorize(request, session)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Back-office request failed: {}", e)))?;

        let response = check_status(response, resource).await?;

        response.json::<T>().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse {} response: {}", resource, e))
        })
    }

    async fn send_list<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        session: &Session,
        resource: &str,
    ) -> AppResult<Vec<T>> {
        let envelope: ListEnvelope<T> = self.send(request, session, resource).await?;
        Ok(envelope.into_vec())
    }
}

/// Map a non-success upstream status onto a gateway error
pub(crate) fn map_status(status: StatusCode, resource: &str, body: String) -> AppError {
    let detail = if body.trim().is_empty() {
        status.to_string()
    } else {
        body
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthorized {
            message: format!("Back-office denied access to {}", resource),
            message_es: "El sistema central denegó el acceso".to_string(),
        },
        StatusCode::NOT_FOUND => AppError::NotFound(resource.to_string()),
        StatusCode::CONFLICT => AppError::Conflict(detail),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            AppError::UpstreamRejected(detail)
        }
        _ => AppError::ExternalService(format!("Back-office error: {} - {}", status, detail)),
    }
}

async fn check_status(response: Response, resource: &str) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(%status, resource, "Back-office returned an error");
    Err(map_status(status, resource, body))
}

#[async_trait]
impl BackofficeApi for RestBackofficeClient {
    async fn list_sellers(&self, session: &Session) -> AppResult<Vec<Seller>> {
        let request = self.client.get(self.url("/sellers"));
        self.send_list(request, session, "Sellers").await
    }

    async fn get_seller(&self, session: &Session, seller_id: Uuid) -> AppResult<Seller> {
        let request = self.client.get(self.url(&format!("/sellers/{}", seller_id)));
        self.send(request, session, "Seller").await
    }

    async fn list_orders_for_seller(
        &self,
        session: &Session,
        seller_id: Uuid,
    ) -> AppResult<Vec<Order>> {
        let request = self
            .client
            .get(self.url("/orders"))
            .query(&[("userId", seller_id.to_string())]);
        self.send_list(request, session, "Orders").await
    }

    async fn get_order(&self, session: &Session, order_id: Uuid) -> AppResult<Order> {
        let request = self.client.get(self.url(&format!("/orders/{}", order_id)));
        self.send(request, session, "Order").await
    }

    async fn list_assets(
        &self,
        session: &Session,
        scope: Option<AssetScope>,
    ) -> AppResult<Vec<Asset>> {
        let mut request = self.client.get(self.url("/assets"));
        if let Some(scope) = scope {
            request = request.query(&[("scope", scope.as_str())]);
        }
        self.send_list(request, session, "Assets").await
    }

    async fn create_daily_load(&self, session: &Session, load: &DailyLoad) -> AppResult<DailyLoad> {
        let request = self.client.post(self.url("/daily-loads")).json(load);
        self.send(request, session, "Daily load").await
    }

    async fn list_daily_loads(
        &self,
        session: &Session,
        status: Option<DailyLoadStatus>,
        seller_id: Option<Uuid>,
    ) -> AppResult<Vec<DailyLoad>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(seller_id) = seller_id {
            query.push(("sellerId", seller_id.to_string()));
        }
        let request = self.client.get(self.url("/daily-loads")).query(&query);
        self.send_list(request, session, "Daily loads").await
    }

    async fn get_daily_load(&self, session: &Session, load_id: Uuid) -> AppResult<DailyLoad> {
        let request = self
            .client
            .get(self.url(&format!("/daily-loads/{}", load_id)));
        self.send(request, session, "Daily load").await
    }

    async fn close_daily_load(
        &self,
        session: &Session,
        load_id: Uuid,
        load: &DailyLoad,
    ) -> AppResult<DailyLoad> {
        let request = self
            .client
            .put(self.url(&format!("/daily-loads/{}/close", load_id)))
            .json(load);
        self.send(request, session, "Daily load").await
    }

    async fn record_payment(
        &self,
        session: &Session,
        seller_id: Uuid,
        payment: &DebtPayment,
    ) -> AppResult<Seller> {
        let request = self
            .client
            .post(self.url(&format!("/sellers/{}/payments", seller_id)))
            .json(payment);
        self.send(request, session, "Seller").await
    }
}
