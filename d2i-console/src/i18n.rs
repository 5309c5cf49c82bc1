//! Locale selection and the module lookup tables
//!
//! Status badges, toasts and error rows are German-only like the rest of the
//! disk2iso web UI; only category titles and module names/descriptions follow
//! the configured locale.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    De,
    En,
}

impl Locale {
    /// Suffix used in `name_<locale>` category fields
    pub fn code(&self) -> &'static str {
        match self {
            Locale::De => "de",
            Locale::En => "en",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "de" => Ok(Locale::De),
            "en" => Ok(Locale::En),
            other => Err(format!("unsupported locale: {}", other)),
        }
    }
}

/// Display name of a module; unknown ids show the id itself
pub fn module_name(locale: Locale, module_id: &str) -> String {
    let name = match (locale, module_id) {
        (_, "core") => "disk2iso Core",
        (Locale::De, "audio") => "Audio-CD Modul",
        (Locale::En, "audio") => "Audio CD Module",
        (Locale::De, "dvd") => "DVD-Video Modul",
        (Locale::En, "dvd") => "DVD Video Module",
        (Locale::De, "bluray") => "Blu-ray Modul",
        (Locale::En, "bluray") => "Blu-ray Module",
        (Locale::De, "metadata") => "Metadata Modul",
        (Locale::En, "metadata") => "Metadata Module",
        (_, "mqtt") => "MQTT Integration",
        (_, "musicbrainz") => "MusicBrainz Provider",
        (_, "tmdb") => "TMDB Provider",
        _ => return module_id.to_string(),
    };
    name.to_string()
}

pub fn module_description(locale: Locale, module_id: &str) -> &'static str {
    match (locale, module_id) {
        (Locale::De, "core") => "Hauptsystem mit Web-UI und Basis-Funktionalität",
        (Locale::En, "core") => "Main system with web UI and base functionality",
        (Locale::De, "audio") => "Rippen von Audio-CDs mit MusicBrainz-Integration",
        (Locale::En, "audio") => "Audio CD ripping with MusicBrainz integration",
        (Locale::De, "dvd") => "Kopieren von DVD-Video Discs mit Menü-Unterstützung",
        (Locale::En, "dvd") => "DVD video copying with menu support",
        (Locale::De, "bluray") => "Kopieren von Blu-ray Discs",
        (Locale::En, "bluray") => "Blu-ray disc copying",
        (Locale::De, "metadata") => "Erweiterte Metadaten-Verwaltung und Cover-Art",
        (Locale::En, "metadata") => "Extended metadata management and cover art",
        (Locale::De, "mqtt") => "MQTT-Integration für Home Assistant",
        (Locale::En, "mqtt") => "MQTT integration for Home Assistant",
        (Locale::De, "musicbrainz") => "MusicBrainz Metadaten für Audio-CDs",
        (Locale::En, "musicbrainz") => "MusicBrainz metadata for audio CDs",
        (Locale::De, "tmdb") => "TMDB Metadaten für Filme und Serien",
        (Locale::En, "tmdb") => "TMDB metadata for movies and series",
        (Locale::De, _) => "Keine Beschreibung verfügbar",
        (Locale::En, _) => "No description available",
    }
}
