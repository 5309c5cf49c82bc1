//! System dependency table renderer
//!
//! Shows the core tools disk2iso needs, filtered out of the backend's
//! installed-software inventory. Loaded once per page view; the inventory
//! rarely changes.

use crate::client::{BackendClient, SoftwareEntry};
use d2i_common::html::escape_html;
use tracing::warn;

/// Tools required by the core system: (inventory name, display name)
pub const CORE_TOOLS: [(&str, &str); 4] = [
    ("ddrescue", "GNU ddrescue"),
    ("genisoimage", "genisoimage"),
    ("python", "Python"),
    ("flask", "Flask"),
];

const NO_INFORMATION_ROW: &str = r#"<tr><td colspan="3" style="text-align: center; padding: 20px; color: #999;">Keine Informationen verfügbar</td></tr>"#;
pub const LOAD_ERROR_ROW: &str = r#"<tr><td colspan="3" style="text-align: center; padding: 20px; color: #e53e3e;">Fehler beim Laden</td></tr>"#;

fn status_badge(entry: &SoftwareEntry) -> &'static str {
    if is_installed(entry) {
        r#"<span class="version-badge version-current">✅ Installiert</span>"#
    } else {
        r#"<span class="version-badge version-error">❌ Nicht installiert</span>"#
    }
}

fn is_installed(entry: &SoftwareEntry) -> bool {
    entry
        .installed_version
        .as_deref()
        .is_some_and(|v| !v.is_empty())
}

/// Table body rows for the given inventory, one per core tool found
pub fn render_dependency_rows(software: &[SoftwareEntry]) -> String {
    let rows: Vec<String> = CORE_TOOLS
        .iter()
        .filter_map(|(name, display_name)| {
            let entry = software.iter().find(|s| s.name == *name)?;
            let row_class = if is_installed(entry) { "" } else { "row-inactive" };
            let version = match entry.installed_version.as_deref() {
                Some(v) if !v.is_empty() => escape_html(v),
                _ => "<em>Nicht installiert</em>".to_string(),
            };

            Some(format!(
                r#"<tr class="{}">
    <td><strong>{}</strong></td>
    <td>{}</td>
    <td>{}</td>
</tr>"#,
                row_class,
                display_name,
                version,
                status_badge(entry)
            ))
        })
        .collect();

    if rows.is_empty() {
        NO_INFORMATION_ROW.to_string()
    } else {
        rows.join("\n")
    }
}

/// Fetch the inventory and render the table body
pub async fn load_dependency_rows(client: &BackendClient) -> String {
    match client.fetch_system_software().await {
        Ok(software) => render_dependency_rows(&software),
        Err(e) => {
            warn!("Fehler beim Laden der System-Dependencies: {}", e);
            LOAD_ERROR_ROW.to_string()
        }
    }
}
