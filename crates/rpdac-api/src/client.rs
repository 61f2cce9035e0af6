// Async HTTP client for the ReportPortal v1 REST API.
//
// Base path: /api/
// Auth: Authorization: Bearer <token>

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{
    AddWidget, Dashboard, DashboardWidget, EntryCreated, Filter, NewDashboard, NewFilter,
    NewWidget, OperationCompletion, Page, ProjectSettings, UpdateDashboard, UpdateFilter, Widget,
};

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the ReportPortal REST API.
///
/// Every method maps to exactly one HTTP request. By-name lookups that match
/// nothing return [`Error::NotFound`] so callers can branch on
/// [`Error::is_not_found`].
pub struct ReportPortalClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ReportPortalClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an access token and transport config.
    ///
    /// Injects `Authorization: Bearer <token>` as a default header.
    pub fn from_token(
        endpoint: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid token header value: {e}"),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(endpoint)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(endpoint: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(endpoint)?;
        Ok(Self { http, base_url })
    }

    /// `https://host` and `https://host/` both become `https://host/api/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;

        let path = url.path().trim_end_matches('/').to_owned();
        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::InvalidToken;
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            Error::Api {
                status: status.as_u16(),
                code: err.error_code,
                message: err.message.unwrap_or_else(|| status.to_string()),
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                code: None,
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
            }
        }
    }

    // ── Dashboards ───────────────────────────────────────────────────

    pub async fn get_dashboard(&self, project: &str, id: i64) -> Result<Dashboard, Error> {
        self.get(&format!("v1/{project}/dashboard/{id}")).await
    }

    /// First dashboard whose name matches exactly, or [`Error::NotFound`].
    pub async fn get_dashboard_by_name(
        &self,
        project: &str,
        name: &str,
    ) -> Result<Dashboard, Error> {
        let page: Page<Dashboard> = self
            .get_with_params(
                &format!("v1/{project}/dashboard"),
                &[("filter.eq.name", name)],
            )
            .await?;
        page.content
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                resource: "dashboard",
                project: project.to_owned(),
                name: name.to_owned(),
            })
    }

    pub async fn create_dashboard(
        &self,
        project: &str,
        body: &NewDashboard,
    ) -> Result<i64, Error> {
        let created: EntryCreated = self.post(&format!("v1/{project}/dashboard"), body).await?;
        Ok(created.id)
    }

    pub async fn update_dashboard(
        &self,
        project: &str,
        id: i64,
        body: &UpdateDashboard,
    ) -> Result<OperationCompletion, Error> {
        self.put(&format!("v1/{project}/dashboard/{id}"), body).await
    }

    pub async fn delete_dashboard(
        &self,
        project: &str,
        id: i64,
    ) -> Result<OperationCompletion, Error> {
        self.delete(&format!("v1/{project}/dashboard/{id}")).await
    }

    /// Attach an existing widget to a dashboard at the given size/position.
    pub async fn add_widget_to_dashboard(
        &self,
        project: &str,
        dashboard_id: i64,
        widget: &DashboardWidget,
    ) -> Result<OperationCompletion, Error> {
        let body = AddWidget {
            add_widget: widget.clone(),
        };
        self.put(&format!("v1/{project}/dashboard/{dashboard_id}/add"), &body)
            .await
    }

    pub async fn remove_widget_from_dashboard(
        &self,
        project: &str,
        dashboard_id: i64,
        widget_id: i64,
    ) -> Result<OperationCompletion, Error> {
        self.delete(&format!("v1/{project}/dashboard/{dashboard_id}/{widget_id}"))
            .await
    }

    // ── Widgets ──────────────────────────────────────────────────────

    pub async fn get_widget(&self, project: &str, id: i64) -> Result<Widget, Error> {
        self.get(&format!("v1/{project}/widget/{id}")).await
    }

    pub async fn create_widget(&self, project: &str, body: &NewWidget) -> Result<i64, Error> {
        let created: EntryCreated = self.post(&format!("v1/{project}/widget"), body).await?;
        Ok(created.id)
    }

    // ── Filters ──────────────────────────────────────────────────────

    pub async fn get_filter(&self, project: &str, id: i64) -> Result<Filter, Error> {
        self.get(&format!("v1/{project}/filter/{id}")).await
    }

    /// First filter whose name matches exactly, or [`Error::NotFound`].
    pub async fn get_filter_by_name(&self, project: &str, name: &str) -> Result<Filter, Error> {
        let page: Page<Filter> = self
            .get_with_params(&format!("v1/{project}/filter"), &[("filter.eq.name", name)])
            .await?;
        page.content
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                resource: "filter",
                project: project.to_owned(),
                name: name.to_owned(),
            })
    }

    pub async fn create_filter(&self, project: &str, body: &NewFilter) -> Result<i64, Error> {
        let created: EntryCreated = self.post(&format!("v1/{project}/filter"), body).await?;
        Ok(created.id)
    }

    pub async fn update_filter(
        &self,
        project: &str,
        id: i64,
        body: &UpdateFilter,
    ) -> Result<OperationCompletion, Error> {
        self.put(&format!("v1/{project}/filter/{id}"), body).await
    }

    pub async fn delete_filter(&self, project: &str, id: i64) -> Result<OperationCompletion, Error> {
        self.delete(&format!("v1/{project}/filter/{id}")).await
    }

    // ── Project settings ─────────────────────────────────────────────

    pub async fn get_project_settings(&self, project: &str) -> Result<ProjectSettings, Error> {
        self.get(&format!("v1/{project}/settings")).await
    }
}
