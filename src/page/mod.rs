// src/page/mod.rs
mod render;
mod view;

pub use render::{render_plugin_row, render_status_page, status_path};
pub use view::{PageView, PageViews};
