use hyper::Method;
use hyper::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    HeaderMap, HeaderValue,
};

/// The routes served by the vendor API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /api/get-organization-contacts?token=...`
    OrganizationContacts,
    /// `POST /api/submit-vendor-profile`
    SubmitVendorProfile,
}

impl Endpoint {
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/api/get-organization-contacts" => Some(Endpoint::OrganizationContacts),
            "/api/submit-vendor-profile" => Some(Endpoint::SubmitVendorProfile),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::OrganizationContacts => "organization_contacts",
            Endpoint::SubmitVendorProfile => "submit_vendor_profile",
        }
    }

    /// The one method the endpoint serves besides `OPTIONS`.
    pub fn method(&self) -> Method {
        match self {
            Endpoint::OrganizationContacts => Method::GET,
            Endpoint::SubmitVendorProfile => Method::POST,
        }
    }

    /// `error` value of a 500 response.
    pub fn failure_summary(&self) -> &'static str {
        match self {
            Endpoint::OrganizationContacts => "Failed to fetch contacts",
            Endpoint::SubmitVendorProfile => "Failed to update vendor profile",
        }
    }

    fn allowed_methods(&self) -> &'static str {
        match self {
            Endpoint::OrganizationContacts => "GET, OPTIONS",
            Endpoint::SubmitVendorProfile => "POST, OPTIONS",
        }
    }

    /// Sets the permissive CORS headers every response of this endpoint carries.
    pub fn add_cors_headers(&self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(self.allowed_methods()),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
    }
}
