//! Modal markup for a disambiguation session

use super::session::DisambiguationSession;
use crate::client::{BackendClient, ReleaseCandidate};
use d2i_common::html::escape_html;
use d2i_common::human_time::format_release_duration;

/// Candidate details line: date, country, track count and duration
fn release_details(candidate: &ReleaseCandidate) -> String {
    let date = escape_html(candidate.date.as_deref().unwrap_or("Unknown"));
    let country = match candidate.country.as_deref() {
        Some(c) if !c.is_empty() && c != "unknown" => format!(" {}", escape_html(c)),
        _ => String::new(),
    };
    let duration = format_release_duration(candidate.duration);
    let duration = if duration.is_empty() {
        String::new()
    } else {
        format!(" / {}", duration)
    };

    format!(
        "<i>{}{}</i> ({} Tracks{})",
        date,
        country,
        candidate.tracks.unwrap_or(0),
        duration
    )
}

fn cover(candidate: &ReleaseCandidate) -> String {
    match candidate.id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => format!(
            r#"<img src="{}" alt="Cover" class="release-cover" onerror="this.style.display='none'">"#,
            escape_html(&BackendClient::cover_path(id))
        ),
        None => r#"<div class="release-cover-placeholder"></div>"#.to_string(),
    }
}

/// One selectable list entry
pub fn render_candidate(index: usize, candidate: &ReleaseCandidate, selected: bool) -> String {
    format!(
        r#"<div class="release-item{selected_class}" data-index="{index}">
    <input type="radio" name="release" id="release-{index}" value="{index}"{checked}>
    <label for="release-{index}">
        <div class="release-layout">
            {cover}
            <div class="release-info">
                <div class="release-title">{title}</div>
                <div class="release-artist">{artist}</div>
                <div class="release-details">{details}</div>
            </div>
        </div>
    </label>
</div>"#,
        selected_class = if selected { " selected" } else { "" },
        index = index,
        checked = if selected { " checked" } else { "" },
        cover = cover(candidate),
        title = escape_html(candidate.title.as_deref().unwrap_or("Unknown")),
        artist = escape_html(candidate.artist.as_deref().unwrap_or("Unknown Artist")),
        details = release_details(candidate),
    )
}

/// Candidate list followed by the confirm button
pub fn render_release_list(session: &DisambiguationSession) -> String {
    let mut html: Vec<String> = session
        .candidates()
        .iter()
        .enumerate()
        .map(|(i, c)| render_candidate(i, c, i == session.selected_index()))
        .collect();
    html.push(
        r#"<button type="button" class="btn btn-primary" data-mb-action="confirm">Album bestätigen</button>"#
            .to_string(),
    );
    html.join("\n")
}

/// Full modal body: message, candidate list and the manual entry form
pub fn render_modal(session: &DisambiguationSession) -> String {
    format!(
        r#"<div class="modal-content">
    <div class="modal-header">
        <h2>MusicBrainz Album-Auswahl</h2>
        <button type="button" class="modal-close" data-mb-action="close">&times;</button>
    </div>
    <p id="mb-message">{message}</p>
    <div id="mb-releases-list">
{list}
    </div>
    <div class="manual-metadata">
        <h3>Manuelle Eingabe</h3>
        <input type="text" id="manual-artist" placeholder="Künstler">
        <input type="text" id="manual-album" placeholder="Album">
        <input type="text" id="manual-year" placeholder="Jahr">
        <button type="button" class="btn btn-secondary" data-mb-action="manual">Metadaten speichern</button>
    </div>
</div>"#,
        message = escape_html(session.message()),
        list = render_release_list(session),
    )
}
