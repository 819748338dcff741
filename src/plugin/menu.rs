// src/plugin/menu.rs
use super::{AdminHost, SubmenuPage};

/// In-process admin host backing the admin server's navigation.
#[derive(Debug, Clone, Default)]
pub struct AdminMenu {
    base_url: String,
    pages: Vec<SubmenuPage>,
}

impl AdminMenu {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            pages: Vec::new(),
        }
    }

    /// Finds the page registered under `parent` with the given `page` slug.
    pub fn resolve(&self, parent: &str, slug: &str) -> Option<&SubmenuPage> {
        self.pages
            .iter()
            .find(|page| page.parent == parent && page.slug == slug)
    }
}

impl AdminHost for AdminMenu {
    fn add_submenu_page(&mut self, page: SubmenuPage) {
        if self.resolve(page.parent, page.slug).is_some() {
            tracing::warn!("Admin page {}?page={} already registered", page.parent, page.slug);
            return;
        }
        self.pages.push(page);
    }

    fn admin_url(&self, path: &str) -> String {
        format!("{}/wp-admin/{}", self.base_url, path.trim_start_matches('/'))
    }
}
