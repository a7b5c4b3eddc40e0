//! HTTP backend for the vendor portal: contact lookup and vendor profile
//! submission on top of the Notion API.

pub mod config;
pub mod contacts;
pub mod errors;
mod lookup;
pub mod metrics_defs;
pub mod profile;
mod router;
mod service;

#[cfg(test)]
mod testutils;

pub use errors::VendorApiError;
pub use router::Endpoint;
pub use service::{ResponseBody, VendorApi, VendorApiService};

use notion::DocumentStore;
use shared::admin_service::AdminService;
use shared::http::run_http_service;
use std::sync::Arc;

/// Serves the vendor API and the admin endpoints until either listener fails.
pub async fn run(
    config: config::Config,
    store: Arc<dyn DocumentStore>,
) -> Result<(), VendorApiError> {
    let api = VendorApi::new(store, config.databases.clone());

    let api_task = run_http_service(
        &config.listener.host,
        config.listener.port,
        VendorApiService::new(api),
    );
    let admin_task = run_http_service(
        &config.admin_listener.host,
        config.admin_listener.port,
        AdminService::<_, VendorApiError>::new(|| true),
    );

    tokio::try_join!(api_task, admin_task)?;
    Ok(())
}
