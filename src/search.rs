// ABOUTME: Substring search over station name, address and postal code
// ABOUTME: Tracks the visible result list and keyboard highlight position

use std::collections::HashSet;

use tracing::debug;

use crate::geo::LatLng;
use crate::stations::StationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Incremental typing: result list and highlighting only.
    Live,
    /// Submit button or Enter: additionally recenters the map.
    Explicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    Enter,
    Escape,
    Up,
    Down,
}

/// What the map should do after a search interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    /// Number of matches before truncation.
    pub total: usize,
    /// Highlight keys of the stations whose markers should be highlighted.
    pub highlight: HashSet<String>,
    /// Points to frame; empty leaves the viewport alone.
    pub focus: Vec<LatLng>,
}

#[derive(Debug)]
pub struct SearchIndex {
    max_results: usize,
    query: String,
    results: Vec<usize>,
    active: Option<usize>,
    visible: bool,
}

fn matches(station: &StationRecord, query: &str, query_lower: &str) -> bool {
    if station.name.to_lowercase().contains(query_lower) {
        return true;
    }
    if station.address.to_lowercase().contains(query_lower) {
        return true;
    }
    match station.postal_code.as_deref() {
        Some(plz) if !plz.is_empty() => plz.starts_with(query),
        _ => false,
    }
}

impl SearchIndex {
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results,
            query: String::new(),
            results: Vec::new(),
            active: None,
            visible: false,
        }
    }

    pub fn search(
        &mut self,
        stations: &[StationRecord],
        query: &str,
        mode: SearchMode,
    ) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return self.clear();
        }
        let query_lower = query.to_lowercase();

        let hits: Vec<usize> = stations
            .iter()
            .enumerate()
            .filter(|(_, s)| matches(s, query, &query_lower))
            .map(|(i, _)| i)
            .collect();
        debug!("Search '{}' matched {} stations", query, hits.len());

        self.query = query.to_string();
        self.results = hits.iter().copied().take(self.max_results).collect();
        self.active = None;
        self.visible = true;

        let highlight = hits.iter().map(|&i| stations[i].highlight_key()).collect();
        let focus = match mode {
            SearchMode::Live => Vec::new(),
            SearchMode::Explicit => hits.iter().filter_map(|&i| stations[i].position()).collect(),
        };

        SearchOutcome {
            total: hits.len(),
            highlight,
            focus,
        }
    }

    /// Empties query, result list and highlighting.
    pub fn clear(&mut self) -> SearchOutcome {
        self.query.clear();
        self.results.clear();
        self.active = None;
        self.visible = false;
        SearchOutcome::default()
    }

    /// Selects one result entry: focus and highlight that station, hide the list.
    pub fn activate(&mut self, stations: &[StationRecord], index: usize) -> Option<SearchOutcome> {
        let station = stations.get(*self.results.get(index)?)?;
        self.active = Some(index);
        self.visible = false;
        Some(SearchOutcome {
            total: 1,
            highlight: [station.highlight_key()].into_iter().collect(),
            focus: station.position().into_iter().collect(),
        })
    }

    /// Keyboard handling for the search input; `input` is the current field text.
    pub fn handle_key(
        &mut self,
        stations: &[StationRecord],
        key: SearchKey,
        input: &str,
    ) -> Option<SearchOutcome> {
        match key {
            SearchKey::Enter => Some(self.search(stations, input, SearchMode::Explicit)),
            SearchKey::Escape => Some(self.clear()),
            SearchKey::Up | SearchKey::Down => {
                let len = self.results.len();
                if len == 0 {
                    return None;
                }
                let next = match (key, self.active) {
                    (SearchKey::Down, Some(i)) => (i + 1) % len,
                    (SearchKey::Down, None) => 0,
                    (_, Some(i)) => (i + len - 1) % len,
                    (_, None) => len - 1,
                };
                self.activate(stations, next)
            }
        }
    }

    pub fn results<'a>(&self, stations: &'a [StationRecord]) -> Vec<&'a StationRecord> {
        self.results.iter().filter_map(|&i| stations.get(i)).collect()
    }

    /// Lines of the result box; "No matches" for a query without hits.
    pub fn render_lines(&self, stations: &[StationRecord]) -> Vec<String> {
        if self.query.is_empty() {
            return Vec::new();
        }
        let results = self.results(stations);
        if results.is_empty() {
            return vec!["No matches".to_string()];
        }
        results.into_iter().map(entry_label).collect()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

pub fn entry_label(station: &StationRecord) -> String {
    let city = station.city.as_deref().map(capitalize).unwrap_or_default();
    format!("{} {} {}", station.postal_code(), city, station.name)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
