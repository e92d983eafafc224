use std::time::Duration;


use async_trait::async_trait;
use reqwest::{header, Method, StatusCode};
use tracing::{debug, error};

use crate::providers::bunny::error::{BunnyError, BunnyErrorKind, ErrorContext};
use crate::providers::bunny::types::{
    CreateRecordRequest, ListZonesRequest, ListZonesResponse, Record, UpdateRecordRequest,
};

pub const DEFAULT_API_URL: &str = "https://api.bunny.net";

const DEFAULT_PER_PAGE: i32 = 1000;
const DEFAULT_TTL_SECONDS: u32 = 5 * 60; // the default in the Bunny.net UI

/// Typed access to the Bunny.net DNS API: pure transport, (de)serialization,
/// and error normalization. No retries, no caching.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BunnyApi: Send + Sync {
    async fn list_zones(&self, r: ListZonesRequest) -> Result<ListZonesResponse, BunnyError>;
    async fn create_record(
        &self,
        zone_id: i64,
        r: CreateRecordRequest,
    ) -> Result<Record, BunnyError>;
    async fn update_record(
        &self,
        zone_id: i64,
        record_id: i64,
        r: UpdateRecordRequest,
    ) -> Result<(), BunnyError>;
    async fn delete_record(&self, zone_id: i64, record_id: i64) -> Result<(), BunnyError>;
}

pub struct BunnyClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl BunnyClient {
    pub fn new(api_url: String, api_key: String) -> Result<Self, BunnyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ErrorContext::new("NewClient").wrap(BunnyErrorKind::Http(e)))?;

        Ok(BunnyClient {
            client,
            api_url,
            api_key,
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.api_url, path))
            .header("AccessKey", &self.api_key)
            .header(header::ACCEPT, "application/json")
    }
}

/// Best-effort decode of the error body (failures are swallowed), logged at
/// error level before the structured error is returned.
async fn unexpected_response(ctx: ErrorContext, resp: reqwest::Response) -> BunnyError {
    let status = resp.status().as_u16();
    let body = resp
        .json::<serde_json::Value>()
        .await
        .unwrap_or(serde_json::Value::Null);

    error!(status, %body, "received an unexpected response from Bunny.net");

    ctx.with("status", status)
        .wrap(BunnyErrorKind::UnexpectedStatus { status, body })
}

#[async_trait]
impl BunnyApi for BunnyClient {
    async fn list_zones(&self, mut r: ListZonesRequest) -> Result<ListZonesResponse, BunnyError> {
        if r.per_page < 1 {
            r.per_page = DEFAULT_PER_PAGE;
        }

        let ctx = ErrorContext::new("ListZones")
            .with("page", r.page)
            .with("per_page", r.per_page);

        debug!(
            page = r.page,
            per_page = r.per_page,
            search = r.search.as_deref().unwrap_or(""),
            "fetching zones from the Bunny.net API"
        );

        let mut req = self.request(Method::GET, "/dnszone").query(&[
            ("page", r.page.to_string()),
            ("perPage", r.per_page.to_string()),
        ]);
        if let Some(search) = &r.search {
            req = req.query(&[("search", search)]);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ctx.clone().wrap(BunnyErrorKind::Http(e)))?;

        if resp.status() != StatusCode::OK {
            return Err(unexpected_response(ctx, resp).await);
        }

        resp.json()
            .await
            .map_err(|e| ctx.wrap(BunnyErrorKind::Decode(e)))
    }

    async fn create_record(
        &self,
        zone_id: i64,
        mut r: CreateRecordRequest,
    ) -> Result<Record, BunnyError> {
        if r.ttl_seconds == 0 {
            r.ttl_seconds = DEFAULT_TTL_SECONDS;
        }

        let ctx = ErrorContext::new("CreateRecord")
            .with("zone_id", zone_id)
            .with("type", r.record_type)
            .with("ttl", r.ttl_seconds)
            .with("value", &r.value)
            .with("name", &r.name);

        let resp = self
            .request(Method::PUT, &format!("/dnszone/{zone_id}/records"))
            .json(&r)
            .send()
            .await
            .map_err(|e| ctx.clone().wrap(BunnyErrorKind::Http(e)))?;

        if resp.status() != StatusCode::CREATED {
            return Err(unexpected_response(ctx, resp).await);
        }

        resp.json()
            .await
            .map_err(|e| ctx.wrap(BunnyErrorKind::Decode(e)))
    }

    async fn update_record(
        &self,
        zone_id: i64,
        record_id: i64,
        r: UpdateRecordRequest,
    ) -> Result<(), BunnyError> {
        let ctx = ErrorContext::new("UpdateRecord")
            .with("zone_id", zone_id)
            .with("record_id", record_id)
            .with("ttl", r.ttl_seconds)
            .with("value", &r.value);

        let resp = self
            .request(Method::POST, &format!("/dnszone/{zone_id}/records/{record_id}"))
            .json(&r)
            .send()
            .await
            .map_err(|e| ctx.clone().wrap(BunnyErrorKind::Http(e)))?;

        if resp.status() != StatusCode::NO_CONTENT {
            return Err(unexpected_response(ctx, resp).await);
        }

        Ok(())
    }

    async fn delete_record(&self, zone_id: i64, record_id: i64) -> Result<(), BunnyError> {
        let ctx = ErrorContext::new("DeleteRecord")
            .with("zone_id", zone_id)
            .with("record_id", record_id);

        let resp = self
            .request(
                Method::DELETE,
                &format!("/dnszone/{zone_id}/records/{record_id}"),
            )
            .send()
            .await
            .map_err(|e| ctx.clone().wrap(BunnyErrorKind::Http(e)))?;

        if resp.status() != StatusCode::NO_CONTENT {
            return Err(unexpected_response(ctx, resp).await);
        }

        Ok(())
    }
}
