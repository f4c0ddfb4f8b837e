// ABOUTME: HTML content for marker popups and the nearest-stations panel
// ABOUTME: All station-provided text is escaped before interpolation

use std::fmt::Write;

use crate::geolocation::NearestPanel;
use crate::stations::{StationRecord, StationStatus};

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn station_popup(station: &StationRecord) -> String {
    let mut html = String::from("<div class=\"popup-content\">");
    let _ = write!(html, "<h4>{}</h4>", escape_html(&station.name));

    if station.status == StationStatus::Inactive {
        html.push_str("<div class=\"status status-inactive\">inactive</div>");
    }
    if let Some(spec) = non_empty(&station.specialization) {
        let _ = write!(html, "<div class=\"specialization\">{}</div>", escape_html(spec));
    }
    let _ = write!(html, "<div class=\"address\">{}</div>", escape_html(&station.address));

    html.push_str("<div class=\"contact\">");
    if let Some(phone) = non_empty(&station.phone) {
        let dial: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
        let _ = write!(
            html,
            "<strong>Tel:</strong> <a href=\"tel:{}\">{}</a><br>",
            escape_html(&dial),
            escape_html(phone)
        );
    }
    if let Some(email) = non_empty(&station.email) {
        let email = escape_html(email);
        let _ = write!(
            html,
            "<strong>E-Mail:</strong> <a href=\"mailto:{0}\">{0}</a><br>",
            email
        );
    }
    if let Some(website) = non_empty(&station.website) {
        let website = escape_html(website);
        let _ = write!(
            html,
            "<strong>Website:</strong> <a href=\"{0}\" target=\"_blank\" rel=\"noopener noreferrer\">{0}</a>",
            website
        );
    }
    html.push_str("</div>");

    if let Some(note) = non_empty(&station.note) {
        let _ = write!(html, "<div class=\"note\">{}</div>", escape_html(note));
    }
    html.push_str("</div>");
    html
}

pub fn nearest_popup(panel: &NearestPanel) -> String {
    let mut html = String::from("<div class=\"nearest-panel\">");
    let _ = write!(
        html,
        "<div class=\"nearest-header\"><strong>Your location</strong><br><small>Accuracy: ±{}m</small></div>",
        panel.accuracy_m
    );
    html.push_str("<strong>Nearest stations:</strong><ol>");
    for entry in &panel.entries {
        let _ = write!(
            html,
            "<li><strong>{}</strong><br><small>{} ({})</small></li>",
            escape_html(&entry.name),
            escape_html(&entry.address),
            entry.distance_label()
        );
    }
    html.push_str("</ol></div>");
    html
}
