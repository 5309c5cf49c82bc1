//! Module store catalog renderer
//!
//! Fetches `/api/store/catalog` and renders one card per module into the
//! three fixed store categories. A failed fetch renders the same error text
//! into every category; there is never a partial store.

use crate::client::{BackendClient, BackendError, Catalog, ModuleState};
use crate::i18n::{module_description, module_name, Locale};
use d2i_common::html::escape_html;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Store categories, in display order
pub const CATEGORY_IDS: [&str; 3] = ["core", "optional", "providers"];

/// Shown until modules ship their own manifest version
pub const MODULE_VERSION_PLACEHOLDER: &str = "1.3.0";

pub const CATALOG_REJECTED_MESSAGE: &str = "Fehler beim Laden des Katalogs";
pub const CATALOG_UNREACHABLE_MESSAGE: &str = "Katalog konnte nicht geladen werden";
const NO_MODULES_MESSAGE: &str = "Keine Module in dieser Kategorie";

/// Category of modules whose catalog entry carries no `category` field
fn legacy_category(module_id: &str) -> Option<&'static str> {
    match module_id {
        "core" => Some("core"),
        "audio" | "dvd" | "bluray" | "metadata" | "mqtt" => Some("optional"),
        "musicbrainz" | "tmdb" => Some("providers"),
        _ => None,
    }
}

/// Category a module belongs to: its own field first, then the legacy table
pub fn module_category<'a>(module_id: &str, state: &'a ModuleState) -> Option<&'a str> {
    match state.category.as_deref() {
        Some(category) if !category.is_empty() => Some(category),
        _ => legacy_category(module_id),
    }
}

pub fn module_icon(module_id: &str) -> &'static str {
    match module_id {
        "core" => "/static/img/control.svg",
        "audio" => "/static/img/audio.svg",
        "dvd" => "/static/img/dvd.svg",
        "bluray" => "/static/img/bluray.svg",
        "metadata" | "musicbrainz" | "tmdb" => "/static/img/data.svg",
        "mqtt" => "/static/img/plugin.svg",
        _ => "/static/img/package.svg",
    }
}

fn default_category_title(locale: Locale, category_id: &str) -> String {
    let title = match (locale, category_id) {
        (_, "core") => "Core",
        (Locale::De, "optional") => "Optionale Module",
        (Locale::En, "optional") => "Optional Modules",
        (Locale::De, "providers") => "Metadaten-Provider",
        (Locale::En, "providers") => "Metadata Providers",
        _ => category_id,
    };
    title.to_string()
}

/// Card action buttons; all of them are acknowledged but not yet performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAction {
    Install,
    Disable,
    Details,
}

impl StoreAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreAction::Install => "install",
            StoreAction::Disable => "disable",
            StoreAction::Details => "details",
        }
    }

    /// Placeholder acknowledgment shown instead of performing the action
    pub fn acknowledgment(&self, module_id: &str) -> String {
        match self {
            StoreAction::Install => format!(
                "Installation von {} wird in einer zukünftigen Version verfügbar sein.",
                module_id
            ),
            StoreAction::Disable => format!(
                "Deaktivierung von {} wird in einer zukünftigen Version verfügbar sein.",
                module_id
            ),
            StoreAction::Details => format!(
                "Details für {} werden in einer zukünftigen Version angezeigt.",
                module_id
            ),
        }
    }
}

impl FromStr for StoreAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "install" => Ok(StoreAction::Install),
            "disable" => Ok(StoreAction::Disable),
            "details" => Ok(StoreAction::Details),
            other => Err(format!("unknown store action: {}", other)),
        }
    }
}

/// One rendered store category
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCategory {
    pub id: String,
    /// Plain-text title (escaped on output)
    pub title: String,
    /// Inner HTML of `{id}-modules-container`
    pub container_html: String,
}

/// The three rendered store categories
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedStore {
    pub categories: Vec<RenderedCategory>,
}

impl RenderedStore {
    pub fn category(&self, id: &str) -> Option<&RenderedCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Full store markup: one section per category
    pub fn to_html(&self) -> String {
        self.categories
            .iter()
            .map(|category| {
                format!(
                    r#"<section class="store-category" id="{id}-category">
    <h3 class="category-title" id="{id}-category-title">{title}</h3>
    <div class="modules-grid" id="{id}-modules-container">{body}</div>
</section>"#,
                    id = category.id,
                    title = escape_html(&category.title),
                    body = category.container_html,
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render a loaded catalog
pub fn render_store(catalog: &Catalog, locale: Locale) -> RenderedStore {
    for (module_id, state) in &catalog.modules {
        match module_category(module_id, state) {
            Some(category) if CATEGORY_IDS.contains(&category) => {}
            other => warn!(
                module_id = %module_id,
                category = ?other,
                "Module has no store category, not rendered"
            ),
        }
    }

    let categories = CATEGORY_IDS
        .iter()
        .map(|&category_id| {
            let title = catalog
                .categories
                .iter()
                .find(|c| c.id == category_id)
                .map(|c| c.localized_name(locale.code()).to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| default_category_title(locale, category_id));

            let cards: Vec<String> = catalog
                .modules
                .iter()
                .filter(|(id, state)| module_category(id, state) == Some(category_id))
                .map(|(id, state)| render_module_card(id, state, locale))
                .collect();

            let container_html = if cards.is_empty() {
                format!(r#"<p class="no-modules">{}</p>"#, NO_MODULES_MESSAGE)
            } else {
                cards.join("\n")
            };

            RenderedCategory {
                id: category_id.to_string(),
                title,
                container_html,
            }
        })
        .collect();

    RenderedStore { categories }
}

/// Same error text in every category
pub fn render_store_error(message: &str, locale: Locale) -> RenderedStore {
    let body = format!(r#"<p class="error-message">{}</p>"#, escape_html(message));
    RenderedStore {
        categories: CATEGORY_IDS
            .iter()
            .map(|&id| RenderedCategory {
                id: id.to_string(),
                title: default_category_title(locale, id),
                container_html: body.clone(),
            })
            .collect(),
    }
}

pub fn render_module_card(module_id: &str, state: &ModuleState, locale: Locale) -> String {
    let status_class = if state.enabled { "installed" } else { "available" };
    let status_text = if state.required {
        "Core"
    } else if state.enabled {
        "Installiert"
    } else {
        "Verfügbar"
    };
    let version = state
        .version
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(MODULE_VERSION_PLACEHOLDER);
    let name = match state.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => escape_html(name),
        None => escape_html(&module_name(locale, module_id)),
    };
    // Built-in descriptions are trusted markup; catalog text is not
    let description = match state.description.as_deref().filter(|d| !d.is_empty()) {
        Some(description) => escape_html(description),
        None => module_description(locale, module_id).to_string(),
    };
    let id = escape_html(module_id);

    format!(
        r#"<div class="module-card" data-module-id="{id}">
    <div class="module-card-header">
        <div class="module-icon">
            <img src="{icon}" alt="{id}" style="width:32px;height:32px;">
        </div>
        <div class="module-info">
            <h4 class="module-name">{name}</h4>
            <span class="module-status {status_class}">{status_text}</span>
        </div>
    </div>
    <div class="module-card-body">
        <p class="module-description">{description}</p>
        <div class="module-meta">
            <span class="module-version">v{version}</span>
        </div>
    </div>
    <div class="module-card-footer">
        {actions}
    </div>
</div>"#,
        id = id,
        icon = module_icon(module_id),
        name = name,
        status_class = status_class,
        status_text = status_text,
        description = description,
        version = escape_html(version),
        actions = render_module_actions(module_id, state),
    )
}

fn render_module_actions(module_id: &str, state: &ModuleState) -> String {
    if state.required {
        return r#"<button class="btn-secondary" disabled>Core-Modul</button>"#.to_string();
    }

    let button = |class: &str, action: StoreAction, label: &str| {
        format!(
            r#"<button class="{}" data-store-action="{}" data-module="{}">{}</button>"#,
            class,
            action.as_str(),
            escape_html(module_id),
            label
        )
    };

    if state.enabled {
        format!(
            "{}\n{}",
            button("btn-secondary", StoreAction::Details, "Details"),
            button("btn-warning", StoreAction::Disable, "Deaktivieren")
        )
    } else {
        format!(
            "{}\n{}",
            button("btn-primary", StoreAction::Install, "Installieren"),
            button("btn-secondary", StoreAction::Details, "Details")
        )
    }
}

/// Loads the catalog and renders the store
#[derive(Clone)]
pub struct CatalogRenderer {
    client: BackendClient,
    locale: Locale,
    catalog: Arc<RwLock<Option<Catalog>>>,
}

impl CatalogRenderer {
    pub fn new(client: BackendClient, locale: Locale) -> Self {
        Self {
            client,
            locale,
            catalog: Arc::new(RwLock::new(None)),
        }
    }

    /// Fetch the catalog and render it; failures render the error store
    pub async fn load(&self) -> RenderedStore {
        match self.client.fetch_catalog().await {
            Ok(catalog) => {
                info!(
                    modules = catalog.modules.len(),
                    categories = catalog.categories.len(),
                    "Catalog loaded"
                );
                let rendered = render_store(&catalog, self.locale);
                *self.catalog.write().await = Some(catalog);
                rendered
            }
            Err(BackendError::Rejected(reason)) => {
                warn!("Failed to load catalog: {}", reason);
                render_store_error(CATALOG_REJECTED_MESSAGE, self.locale)
            }
            Err(e) => {
                warn!("Error loading catalog: {}", e);
                render_store_error(CATALOG_UNREACHABLE_MESSAGE, self.locale)
            }
        }
    }

    /// Reload the catalog wholesale
    pub async fn refresh(&self) -> RenderedStore {
        info!("Refreshing store");
        self.load().await
    }

    /// Catalog from the last successful load
    pub async fn catalog(&self) -> Option<Catalog> {
        self.catalog.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CategoryDescriptor;
    use std::collections::{BTreeMap, HashMap};

    fn module(enabled: bool, required: bool) -> ModuleState {
        ModuleState {
            enabled,
            required,
            ..Default::default()
        }
    }

    fn sample_catalog() -> Catalog {
        let mut modules = BTreeMap::new();
        modules.insert("core".to_string(), module(true, true));
        modules.insert("audio".to_string(), module(true, false));
        modules.insert("dvd".to_string(), module(false, false));
        modules.insert("tmdb".to_string(), module(false, false));

        let mut extra = HashMap::new();
        extra.insert("name_de".to_string(), serde_json::json!("Optionale Module (DE)"));

        Catalog {
            categories: vec![CategoryDescriptor {
                id: "optional".to_string(),
                name: "Optional".to_string(),
                extra,
            }],
            modules,
        }
    }

    #[test]
    fn test_modules_partitioned_into_categories() {
        let store = render_store(&sample_catalog(), Locale::De);

        let core = store.category("core").unwrap();
        assert!(core.container_html.contains(r#"data-module-id="core""#));
        assert!(!core.container_html.contains(r#"data-module-id="audio""#));

        let optional = store.category("optional").unwrap();
        assert!(optional.container_html.contains(r#"data-module-id="audio""#));
        assert!(optional.container_html.contains(r#"data-module-id="dvd""#));
        assert_eq!(optional.title, "Optionale Module (DE)");

        let providers = store.category("providers").unwrap();
        assert!(providers.container_html.contains(r#"data-module-id="tmdb""#));
    }

    #[test]
    fn test_category_field_overrides_legacy_table() {
        let mut catalog = sample_catalog();
        catalog.modules.insert(
            "cdtext".to_string(),
            ModuleState {
                category: Some("providers".to_string()),
                ..Default::default()
            },
        );
        catalog.modules.get_mut("dvd").unwrap().category = Some("providers".to_string());

        let store = render_store(&catalog, Locale::De);
        let providers = &store.category("providers").unwrap().container_html;
        assert!(providers.contains(r#"data-module-id="cdtext""#));
        assert!(providers.contains(r#"data-module-id="dvd""#));
        assert!(!store
            .category("optional")
            .unwrap()
            .container_html
            .contains(r#"data-module-id="dvd""#));
    }

    #[test]
    fn test_uncategorized_module_not_rendered() {
        let mut catalog = sample_catalog();
        catalog.modules.insert("hddvd".to_string(), module(false, false));
        let html = render_store(&catalog, Locale::De).to_html();
        assert!(!html.contains("hddvd"));
    }

    #[test]
    fn test_empty_category_message() {
        let catalog = Catalog {
            categories: vec![],
            modules: BTreeMap::from([("core".to_string(), module(true, true))]),
        };
        let store = render_store(&catalog, Locale::De);
        assert_eq!(
            store.category("providers").unwrap().container_html,
            r#"<p class="no-modules">Keine Module in dieser Kategorie</p>"#
        );
    }

    #[test]
    fn test_status_badges_and_actions() {
        let required = render_module_card("core", &module(true, true), Locale::De);
        assert!(required.contains(r#"<span class="module-status installed">Core</span>"#));
        assert!(required.contains(r#"<button class="btn-secondary" disabled>Core-Modul</button>"#));
        assert!(!required.contains("data-store-action"));

        let installed = render_module_card("audio", &module(true, false), Locale::De);
        assert!(installed.contains(r#"<span class="module-status installed">Installiert</span>"#));
        assert!(installed.contains(r#"data-store-action="disable""#));
        assert!(installed.contains(r#"data-store-action="details""#));

        let available = render_module_card("dvd", &module(false, false), Locale::De);
        assert!(available.contains(r#"<span class="module-status available">Verfügbar</span>"#));
        assert!(available.contains(r#"data-store-action="install""#));
    }

    #[test]
    fn test_version_placeholder_and_override() {
        let card = render_module_card("audio", &module(true, false), Locale::De);
        assert!(card.contains("v1.3.0"));

        let versioned = ModuleState {
            version: Some("2.0.1".to_string()),
            ..module(true, false)
        };
        assert!(render_module_card("audio", &versioned, Locale::De).contains("v2.0.1"));
    }

    #[test]
    fn test_catalog_name_and_description_win() {
        let custom = ModuleState {
            name: Some("Custom <Audio>".to_string()),
            description: Some("Custom description".to_string()),
            ..module(true, false)
        };
        let card = render_module_card("audio", &custom, Locale::De);
        assert!(card.contains(r#"<h4 class="module-name">Custom &lt;Audio&gt;</h4>"#));
        assert!(card.contains(r#"<p class="module-description">Custom description</p>"#));

        let blank = ModuleState {
            name: Some(String::new()),
            description: Some(String::new()),
            ..module(true, false)
        };
        let fallback = render_module_card("audio", &blank, Locale::De);
        assert!(fallback.contains(&format!(
            r#"<h4 class="module-name">{}</h4>"#,
            escape_html(&module_name(Locale::De, "audio"))
        )));
        assert!(fallback.contains(module_description(Locale::De, "audio")));
    }

    #[test]
    fn test_error_store_is_uniform() {
        let store = render_store_error(CATALOG_UNREACHABLE_MESSAGE, Locale::De);
        assert_eq!(store.categories.len(), 3);
        let first = &store.categories[0].container_html;
        assert!(first.contains(CATALOG_UNREACHABLE_MESSAGE));
        assert!(store.categories.iter().all(|c| &c.container_html == first));
    }

    #[test]
    fn test_store_action_parsing_and_ack() {
        assert_eq!("install".parse::<StoreAction>().unwrap(), StoreAction::Install);
        assert!("uninstall".parse::<StoreAction>().is_err());
        assert_eq!(
            StoreAction::Disable.acknowledgment("mqtt"),
            "Deaktivierung von mqtt wird in einer zukünftigen Version verfügbar sein."
        );
    }
}
