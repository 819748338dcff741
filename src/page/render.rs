// src/page/render.rs
use super::PageView;
use crate::plugin::{PLUGIN_NAME, PLUGIN_SLUG};
use crate::reachability::CheckResult;
use uuid::Uuid;

const HIDDEN: &str = "display:none;";

/// Path the rendered page fetches its result from.
pub fn status_path(id: &Uuid) -> String {
    format!("/{}/views/{}", PLUGIN_SLUG, id)
}

/// Renders the status page for `view` in whatever state its indicator is in.
/// While pending, the page carries the script that fetches the outcome once.
pub fn render_status_page(view: &PageView) -> String {
    let state = view.indicator.current();
    let visible = |shown: bool| if shown { "" } else { HIDDEN };

    let script = if state.is_pending() {
        STATUS_SCRIPT.replace("{status_path}", &status_path(&view.id))
    } else {
        String::new()
    };

    format!(
        r#"<div class="wrap">
  <h2>{name}</h2>
  <div class="card" id="cus-status" data-view="{id}" data-state="{state}" style="display:flex;align-items:center;justify-content:space-between;">
    <p>Checking if wordpress.org is reachable</p>
    <p>
      <span class="spinner is-active" style="margin:0;{spinner}"></span>
      <span class="dashicons dashicons-yes success" style="color:#00ba37;{success}"></span>
      <span class="dashicons dashicons-dismiss error" style="color:#f86368;{error}"></span>
    </p>
  </div>
</div>
{script}"#,
        name = PLUGIN_NAME,
        id = view.id,
        state = state.as_str(),
        spinner = visible(state == CheckResult::Pending),
        success = visible(state == CheckResult::Success),
        error = visible(state == CheckResult::Failure),
        script = script,
    )
}

/// Plugin list row showing the plugin's action links.
pub fn render_plugin_row(links: &[String]) -> String {
    format!(
        r#"<tr class="active" data-slug="{slug}">
  <td class="plugin-title"><strong>{name}</strong>
    <div class="row-actions visible">{links}</div>
  </td>
</tr>"#,
        slug = PLUGIN_SLUG,
        name = PLUGIN_NAME,
        links = links.join(" | "),
    )
}

const STATUS_SCRIPT: &str = r#"<script>
(function () {
  var card = document.getElementById("cus-status");
  function show(status) {
    card.querySelector(".spinner").style.display = "none";
    card.querySelector(status === "success" ? ".success" : ".error").style.display = "";
    card.dataset.state = status === "success" ? "success" : "failure";
  }
  fetch("{status_path}")
    .then(function (r) { return r.ok ? r.json() : { status: "failure" }; })
    .then(function (body) { show(body.status); })
    .catch(function () { show("failure"); });
})();
</script>
"#;
