use crate::config::Databases;
use crate::contacts::lookup_contacts;
use crate::errors::VendorApiError;
use crate::metrics_defs::REQUEST_DURATION;
use crate::profile::{ProfileSubmission, submit_profile};
use crate::router::Endpoint;
use http_body_util::BodyExt;
use http_body_util::combinators::BoxBody;
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode, Uri};
use notion::DocumentStore;
use serde::Serialize;
use shared::http::{empty_response, json_response, make_boxed_error_response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

pub type ResponseBody = BoxBody<Bytes, VendorApiError>;

/// Dispatches requests to the contact lookup and profile submission handlers.
#[derive(Clone)]
pub struct VendorApi {
    store: Arc<dyn DocumentStore>,
    databases: Arc<Databases>,
}

impl VendorApi {
    pub fn new(store: Arc<dyn DocumentStore>, databases: Databases) -> Self {
        VendorApi {
            store,
            databases: Arc::new(databases),
        }
    }

    pub async fn handle(&self, request: Request<Bytes>) -> Response<ResponseBody> {
        let Some(endpoint) = Endpoint::from_path(request.uri().path()) else {
            tracing::debug!(path = %request.uri().path(), "No route matched");
            return VendorApiError::NotFound.into_client_response();
        };

        let start = Instant::now();
        let mut response = match self.dispatch(endpoint, request).await {
            Ok(response) => response,
            Err(e) => e.into_response(endpoint),
        };
        endpoint.add_cors_headers(response.headers_mut());

        shared::histogram!(
            REQUEST_DURATION,
            "endpoint" => endpoint.name(),
            "status" => response.status().as_str().to_owned()
        )
        .record(start.elapsed().as_secs_f64());

        response
    }

    async fn dispatch(
        &self,
        endpoint: Endpoint,
        request: Request<Bytes>,
    ) -> Result<Response<ResponseBody>, VendorApiError> {
        // Preflight short-circuits before anything else.
        if request.method() == Method::OPTIONS {
            return Ok(empty_response());
        }

        let expected = endpoint.method();
        if request.method() != expected {
            return Err(VendorApiError::MethodNotAllowed {
                method: request.method().clone(),
                expected,
            });
        }

        match endpoint {
            Endpoint::OrganizationContacts => {
                let token = query_param(request.uri(), "token");
                let body =
                    lookup_contacts(self.store.as_ref(), &self.databases, token.as_deref()).await?;
                ok_json(&body)
            }
            Endpoint::SubmitVendorProfile => {
                let submission: ProfileSubmission = serde_json::from_slice(request.body())
                    .map_err(|e| VendorApiError::InvalidBody(e.to_string()))?;
                let body = submit_profile(self.store.as_ref(), &self.databases, submission).await?;
                ok_json(&body)
            }
        }
    }
}

fn ok_json<T: Serialize>(body: &T) -> Result<Response<ResponseBody>, VendorApiError> {
    Ok(json_response(StatusCode::OK, body)
        .unwrap_or_else(|_| make_boxed_error_response(StatusCode::INTERNAL_SERVER_ERROR)))
}

/// First value of a query parameter.
fn query_param(uri: &Uri, name: &str) -> Option<String> {
    url::form_urlencoded::parse(uri.query()?.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

pub struct VendorApiService {
    api: VendorApi,
}

impl VendorApiService {
    pub fn new(api: VendorApi) -> Self {
        Self { api }
    }
}

impl Service<Request<Incoming>> for VendorApiService {
    type Response = Response<ResponseBody>;
    type Error = VendorApiError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let api = self.api.clone();

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let bytes = body.collect().await?.to_bytes();
            Ok(api.handle(Request::from_parts(parts, bytes)).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SUCCESS_MESSAGE;
    use crate::testutils::{MockStore, contact_row, organization_row, tag_row, test_databases};
    use hyper::header::{ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
    use serde_json::{Value, json};

    fn api(store: Arc<MockStore>) -> VendorApi {
        VendorApi::new(store, test_databases())
    }

    fn request(method: Method, uri: &str, body: &str) -> Request<Bytes> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Bytes::copy_from_slice(body.as_bytes()))
            .unwrap()
    }

    async fn body_json(response: Response<ResponseBody>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn acme_store() -> Arc<MockStore> {
        Arc::new(
            MockStore::new()
                .with_rows("orgs_db", vec![
                    organization_row("org_1", "Acme Co", "abc123"),
                    organization_row("org_2", "Vendor Co", "tok_2"),
                ])
                .with_rows("tags_db", vec![tag_row("tag_primary", "Primary Contact")])
                .with_rows("contacts_db", vec![contact_row(
                    "c_1",
                    "org_1",
                    "Jane Doe",
                    "jane@acme.test",
                    "",
                    &["tag_primary"],
                )]),
        )
    }

    #[test]
    fn test_query_param() {
        let uri: Uri = "/api/get-organization-contacts?a=1&token=abc%20123&token=second"
            .parse()
            .unwrap();
        assert_eq!(query_param(&uri, "token").as_deref(), Some("abc 123"));
        assert_eq!(query_param(&uri, "missing"), None);

        let uri: Uri = "/api/get-organization-contacts".parse().unwrap();
        assert_eq!(query_param(&uri, "token"), None);
    }

    #[tokio::test]
    async fn test_options_short_circuits() {
        for uri in ["/api/get-organization-contacts", "/api/submit-vendor-profile"] {
            let store = acme_store();
            let response = api(store.clone())
                .handle(request(Method::OPTIONS, uri, ""))
                .await;

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
            assert!(response.headers().contains_key(ACCESS_CONTROL_ALLOW_METHODS));
            let body = response.into_body().collect().await.unwrap().to_bytes();
            assert!(body.is_empty());
            assert!(store.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_get_contacts() {
        let response = api(acme_store())
            .handle(request(Method::GET, "/api/get-organization-contacts?token=abc123", ""))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "GET, OPTIONS"
        );

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["organizationName"], "Acme Co");
        assert_eq!(body["contacts"][0]["isPrimaryContact"], true);
        assert_eq!(body["contacts"][0]["isAttending"], false);
        assert_eq!(body["primaryContactsFound"], 1);
        assert_eq!(body["attendingContactsFound"], 0);
    }

    #[tokio::test]
    async fn test_get_contacts_errors() {
        let api = api(acme_store());

        let response = api
            .handle(request(Method::GET, "/api/get-organization-contacts", ""))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Token is required"}));

        let response = api
            .handle(request(Method::GET, "/api/get-organization-contacts?token=nope", ""))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN));
        assert_eq!(
            body_json(response).await,
            json!({"error": "Organization not found for token"})
        );

        let response = api
            .handle(request(Method::POST, "/api/get-organization-contacts?token=abc123", ""))
            .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_get_contacts_upstream_failure() {
        let store = Arc::new(
            MockStore::new()
                .with_rows("orgs_db", vec![organization_row("org_1", "Acme Co", "abc123")])
                .with_failing_database("contacts_db"),
        );

        let response = api(store)
            .handle(request(Method::GET, "/api/get-organization-contacts?token=abc123", ""))
            .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Failed to fetch contacts");
        assert_eq!(
            body["details"],
            "Contacts lookup failed: 500 Internal Server Error: Internal Server Error"
        );
    }

    #[tokio::test]
    async fn test_submit_profile() {
        let store = acme_store();
        let response = api(store.clone())
            .handle(request(
                Method::POST,
                "/api/submit-vendor-profile",
                r#"{"token": "tok_2", "formState": {"website": "https://example.com"}, "catalogueState": {}}"#,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "POST, OPTIONS"
        );
        assert_eq!(
            body_json(response).await,
            json!({"success": true, "organizationId": "org_2", "message": SUCCESS_MESSAGE})
        );
    }

    #[tokio::test]
    async fn test_submit_profile_errors() {
        let store = acme_store();
        let api = api(store.clone());

        let response = api
            .handle(request(Method::POST, "/api/submit-vendor-profile", "not json"))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = api
            .handle(request(Method::POST, "/api/submit-vendor-profile", r#"{"formState": {}}"#))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Token is required"}));

        let response = api
            .handle(request(Method::GET, "/api/submit-vendor-profile", ""))
            .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN));
        assert_eq!(
            body_json(response).await,
            json!({"error": "Method GET not allowed, expected POST"})
        );

        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let response = api(acme_store())
            .handle(request(Method::GET, "/api/other", ""))
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"error": "Not found"}));
    }
}
