// src/plugin/mod.rs
//! Registration against the host's admin extension points.
mod menu;

pub use menu::AdminMenu;

pub const PLUGIN_NAME: &str = "Check Update Servers";
pub const PLUGIN_SLUG: &str = "check-update-servers";
pub const PLUGIN_VERSION: &str = "1.0.0";

/// Admin page registered under another top-level menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmenuPage {
    pub parent: &'static str,
    pub page_title: &'static str,
    pub menu_title: &'static str,
    pub capability: &'static str,
    pub slug: &'static str,
}

/// Extension points the host admin exposes to plugins.
pub trait AdminHost {
    fn add_submenu_page(&mut self, page: SubmenuPage);

    /// Absolute admin URL for a path relative to the admin root.
    fn admin_url(&self, path: &str) -> String;
}

pub struct Plugin;

impl Plugin {
    pub fn submenu_page() -> SubmenuPage {
        SubmenuPage {
            parent: "plugins.php",
            page_title: PLUGIN_NAME,
            menu_title: PLUGIN_NAME,
            capability: "manage_options",
            slug: PLUGIN_SLUG,
        }
    }

    /// Adds the status page below the host's plugin menu.
    pub fn register<H: AdminHost + ?Sized>(host: &mut H) {
        host.add_submenu_page(Self::submenu_page());
        tracing::debug!("Registered {} {} admin page", PLUGIN_NAME, PLUGIN_VERSION);
    }

    /// Prepends the "Check Status" link to the plugin row's action links.
    pub fn action_links<H: AdminHost + ?Sized>(host: &H, actions: Vec<String>) -> Vec<String> {
        let href = host.admin_url(&format!("plugins.php?page={}", PLUGIN_SLUG));
        let mut links = Vec::with_capacity(actions.len() + 1);
        links.push(format!("<a href=\"{}\">Check Status</a>", href));
        links.extend(actions);
        links
    }
}
