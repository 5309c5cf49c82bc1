//! Config field binder
//!
//! Binds one form field to one backend config key. The current value is read
//! when the form is rendered; every save is an independent PUT fired by the
//! field's save trigger (`change` for selects, `blur` for free text). A write
//! may restart a backend service as a side effect, which the toast reports.

use crate::client::{BackendClient, BackendError, ConfigValue, ConfigWriteResponse};
use crate::toast::ToastPresenter;
use d2i_common::events::ToastSeverity;
use d2i_common::html::escape_html;
use tracing::{debug, warn};

/// Kind of input control a field renders as
#[derive(Debug, Clone, PartialEq)]
pub enum FieldControl {
    Text,
    Number,
    Select(Vec<String>),
}

/// Browser event that saves a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    Change,
    Blur,
}

impl SaveTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveTrigger::Change => "change",
            SaveTrigger::Blur => "blur",
        }
    }
}

impl FieldControl {
    pub fn save_trigger(&self) -> SaveTrigger {
        match self {
            FieldControl::Select(_) => SaveTrigger::Change,
            FieldControl::Text | FieldControl::Number => SaveTrigger::Blur,
        }
    }
}

/// A form field bound to a config key
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigField {
    pub element_id: String,
    pub key: String,
    pub label: String,
    pub default_value: String,
    pub control: FieldControl,
}

impl ConfigField {
    pub fn new(
        element_id: &str,
        key: &str,
        label: &str,
        default_value: &str,
        control: FieldControl,
    ) -> Self {
        Self {
            element_id: element_id.to_string(),
            key: key.to_string(),
            label: label.to_string(),
            default_value: default_value.to_string(),
            control,
        }
    }

    /// Typed value for a raw input string
    ///
    /// Numeric fields send a JSON number when the input parses, otherwise the
    /// raw text; the backend stays the judge of validity.
    pub fn coerce(&self, raw: &str) -> ConfigValue {
        coerce_value(&self.control, raw)
    }
}

fn coerce_value(control: &FieldControl, raw: &str) -> ConfigValue {
    if *control == FieldControl::Number {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return ConfigValue::Number(n.into());
        }
        if let Some(n) = trimmed
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
        {
            return ConfigValue::Number(n);
        }
    }
    ConfigValue::Text(raw.to_string())
}

/// Core settings shown on the config page
pub fn core_fields() -> Vec<ConfigField> {
    vec![
        ConfigField::new(
            "output-dir",
            "DEFAULT_OUTPUT_DIR",
            "Ausgabeverzeichnis",
            "/media/iso",
            FieldControl::Text,
        ),
        ConfigField::new(
            "ddrescue-retries",
            "DDRESCUE_RETRIES",
            "ddrescue Wiederholungen",
            "3",
            FieldControl::Number,
        ),
        ConfigField::new(
            "usb-attempts",
            "USB_DRIVE_DETECTION_ATTEMPTS",
            "USB-Laufwerk Erkennungsversuche",
            "5",
            FieldControl::Select(vec!["3".to_string(), "5".to_string(), "10".to_string()]),
        ),
        ConfigField::new(
            "usb-delay",
            "USB_DRIVE_DETECTION_DELAY",
            "USB-Laufwerk Erkennungsverzögerung (s)",
            "3",
            FieldControl::Number,
        ),
    ]
}

/// What a successful write did to the backend services
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Restarted { service: String },
    RestartFailed,
}

impl SaveOutcome {
    pub fn from_response(response: &ConfigWriteResponse) -> Self {
        if !response.restart_required {
            SaveOutcome::Saved
        } else if response.restart_failed {
            SaveOutcome::RestartFailed
        } else {
            SaveOutcome::Restarted {
                service: response
                    .restart_service
                    .clone()
                    .unwrap_or_else(|| "Dienst".to_string()),
            }
        }
    }

    /// Toast text and severity for this outcome
    pub fn toast(&self) -> (String, ToastSeverity) {
        match self {
            SaveOutcome::Saved => ("Gespeichert".to_string(), ToastSeverity::Success),
            SaveOutcome::Restarted { service } => (
                format!("Gespeichert ({} neu gestartet)", service),
                ToastSeverity::Success,
            ),
            SaveOutcome::RestartFailed => (
                "Gespeichert, aber Service-Neustart fehlgeschlagen".to_string(),
                ToastSeverity::Warning,
            ),
        }
    }
}

/// Reads and writes bound fields through the backend
#[derive(Clone)]
pub struct ConfigBinder {
    client: BackendClient,
    toasts: ToastPresenter,
    fields: Vec<ConfigField>,
}

impl ConfigBinder {
    pub fn new(client: BackendClient, toasts: ToastPresenter, fields: Vec<ConfigField>) -> Self {
        Self {
            client,
            toasts,
            fields,
        }
    }

    pub fn fields(&self) -> &[ConfigField] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&ConfigField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Current value of a field, or its default when the read fails or is empty
    pub async fn load(&self, field: &ConfigField) -> String {
        match self.client.get_config_value(&field.key).await {
            Ok(Some(value)) if !value.is_empty() => value,
            Ok(_) => field.default_value.clone(),
            Err(e) => {
                warn!("Error reading config key {}: {}", field.key, e);
                field.default_value.clone()
            }
        }
    }

    /// Save one value and toast the outcome
    ///
    /// Keys without a bound field are written as text.
    pub async fn save(&self, key: &str, raw_value: &str) -> Result<SaveOutcome, BackendError> {
        let value = match self.field(key) {
            Some(field) => field.coerce(raw_value),
            None => ConfigValue::Text(raw_value.to_string()),
        };
        debug!(key = %key, value = %value.as_display(), "Saving config value");

        match self.client.set_config_value(key, &value).await {
            Ok(response) => {
                let outcome = SaveOutcome::from_response(&response);
                let (message, severity) = outcome.toast();
                self.toasts.show(message, severity).await;
                Ok(outcome)
            }
            Err(e) => {
                warn!("Error writing config key {}: {}", key, e);
                self.toasts
                    .error(format!("Fehler beim Speichern: {}", e.user_message()))
                    .await;
                Err(e)
            }
        }
    }

    /// Render every bound field, pre-filled with its current value
    pub async fn render_form(&self) -> String {
        let mut rows = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = self.load(field).await;
            rows.push(render_field(field, &value));
        }
        format!(
            r#"<form class="config-form" onsubmit="return false;">
{}
</form>"#,
            rows.join("\n")
        )
    }
}

/// Render one labelled input bound to its config key
pub fn render_field(field: &ConfigField, value: &str) -> String {
    let id = escape_html(&field.element_id);
    let key = escape_html(&field.key);
    let trigger = field.control.save_trigger().as_str();

    let input = match &field.control {
        FieldControl::Text => format!(
            r#"<input type="text" id="{id}" data-config-key="{key}" data-save-on="{trigger}" value="{value}">"#,
            id = id,
            key = key,
            trigger = trigger,
            value = escape_html(value),
        ),
        FieldControl::Number => format!(
            r#"<input type="number" id="{id}" data-config-key="{key}" data-save-on="{trigger}" value="{value}">"#,
            id = id,
            key = key,
            trigger = trigger,
            value = escape_html(value),
        ),
        FieldControl::Select(options) => {
            let options_html: String = options
                .iter()
                .map(|option| {
                    format!(
                        r#"<option value="{v}"{selected}>{v}</option>"#,
                        v = escape_html(option),
                        selected = if option == value { " selected" } else { "" },
                    )
                })
                .collect();
            format!(
                r#"<select id="{id}" data-config-key="{key}" data-save-on="{trigger}">{options}</select>"#,
                id = id,
                key = key,
                trigger = trigger,
                options = options_html,
            )
        }
    };

    format!(
        r#"<div class="config-field">
    <label for="{}">{}</label>
    {}
</div>"#,
        id,
        escape_html(&field.label),
        input
    )
}
