// ────────────────────────────────
// src/server/admin.rs
// Routes admin requests to the status page and its result endpoint.
// ────────────────────────────────

use crate::config::Config;
use crate::metrics::MetricsCollector;
use crate::page::{render_plugin_row, render_status_page, PageViews};
use crate::plugin::{AdminHost, AdminMenu, Plugin, PLUGIN_NAME, PLUGIN_SLUG};
use crate::reachability::{CheckResult, ReachabilityChecker};
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Method, Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const PLUGINS_PATH: &str = "/wp-admin/plugins.php";

pub struct AdminApp {
    menu: AdminMenu,
    views: PageViews,
}

#[derive(Debug, Serialize)]
struct ViewStatus {
    view: Uuid,
    status: CheckResult,
}

impl AdminApp {
    pub fn new(
        config: &Config,
        checker: Arc<ReachabilityChecker>,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        let mut menu = AdminMenu::new("");
        Plugin::register(&mut menu);

        Self {
            menu,
            views: PageViews::new(checker, config.views.ttl(), metrics),
        }
    }

    pub fn views(&self) -> &PageViews {
        &self.views
    }

    pub async fn handle(&self, req: Request<Body>) -> Result<Response<Body>, AdminError> {
        if req.method() != Method::GET {
            return Err(AdminError::MethodNotAllowed);
        }

        let path = req.uri().path().to_string();
        debug!("{} {}", req.method(), req.uri());

        if path == PLUGINS_PATH {
            return match query_param(req.uri().query(), "page") {
                Some(page) => self.admin_page(&page),
                None => self.plugin_list(),
            };
        }

        let views_prefix = format!("/{}/views/", PLUGIN_SLUG);
        if let Some(id) = path.strip_prefix(views_prefix.as_str()) {
            let id = Uuid::parse_str(id).map_err(|_| AdminError::UnknownView(id.to_string()))?;
            return self.view_status(id).await;
        }

        Err(AdminError::NotFound(path))
    }

    fn admin_page(&self, slug: &str) -> Result<Response<Body>, AdminError> {
        let page = self
            .menu
            .resolve("plugins.php", slug)
            .ok_or_else(|| AdminError::NotFound(format!("{}?page={}", PLUGINS_PATH, slug)))?;

        let view = self.views.open();
        html_response(page.page_title, &render_status_page(&view))
    }

    fn plugin_list(&self) -> Result<Response<Body>, AdminError> {
        let actions = vec![format!(
            "<a href=\"{}\">Deactivate</a>",
            self.menu
                .admin_url(&format!("plugins.php?action=deactivate&plugin={}", PLUGIN_SLUG))
        )];
        let links = Plugin::action_links(&self.menu, actions);
        let body = format!(
            "<table class=\"wp-list-table plugins\">\n{}\n</table>",
            render_plugin_row(&links)
        );
        html_response("Plugins", &body)
    }

    async fn view_status(&self, id: Uuid) -> Result<Response<Body>, AdminError> {
        let status = self
            .views
            .await_result(&id)
            .await
            .ok_or_else(|| AdminError::UnknownView(id.to_string()))?;

        let body = serde_json::to_vec(&ViewStatus { view: id, status })?;
        Ok(Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))?)
    }
}

fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn html_response(title: &str, content: &str) -> Result<Response<Body>, AdminError> {
    let document = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{} &lsaquo; {}</title></head>\n<body class=\"wp-admin\">\n{}\n</body>\n</html>\n",
        title, PLUGIN_NAME, content
    );
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from(document))?)
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown page view: {0}")]
    UnknownView(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to build response: {0}")]
    Http(#[from] hyper::http::Error),
}

impl AdminError {
    pub fn status(&self) -> StatusCode {
        match self {
            AdminError::NotFound(_) | AdminError::UnknownView(_) => StatusCode::NOT_FOUND,
            AdminError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AdminError::Encode(_) | AdminError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Convert AdminError to a Hyper response for the handler
impl From<AdminError> for Response<Body> {
    fn from(err: AdminError) -> Self {
        let status = err.status();
        let mut response = Response::new(Body::from(
            status.canonical_reason().unwrap_or("Error"),
        ));
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_status_serializes_id_and_status() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(ViewStatus {
            view: id,
            status: CheckResult::Success,
        })
        .unwrap();

        assert_eq!(json["view"], id.to_string());
        assert_eq!(json["status"], "success");
    }

    #[test]
    fn test_page_query_param() {
        assert_eq!(
            query_param(Some("a=1&page=check-update-servers"), "page").as_deref(),
            Some("check-update-servers")
        );
        assert_eq!(query_param(Some("a=1"), "page"), None);
        assert_eq!(query_param(None, "page"), None);
    }
}
