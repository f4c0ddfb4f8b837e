// ABOUTME: Marker variant classification and the round marker icon styles
// ABOUTME: Status flags take precedence over specialization keywords

use crate::config::MarkerColors;
use crate::stations::{StationRecord, StationStatus};

const RAPTOR_KEYWORD: &str = "greifvogel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Active,
    Inactive,
    Partner,
    Raptor,
}

impl MarkerKind {
    pub fn classify(station: &StationRecord) -> Self {
        match station.status {
            StationStatus::Inactive => MarkerKind::Inactive,
            StationStatus::Partner => MarkerKind::Partner,
            StationStatus::Active => {
                let raptor = station
                    .specialization
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(RAPTOR_KEYWORD));
                if raptor {
                    MarkerKind::Raptor
                } else {
                    MarkerKind::Active
                }
            }
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            MarkerKind::Active => "custom-marker",
            MarkerKind::Inactive => "custom-marker-inactive",
            MarkerKind::Partner => "custom-marker-nabu",
            MarkerKind::Raptor => "custom-marker-raptor",
        }
    }

    pub fn color<'a>(&self, colors: &'a MarkerColors) -> &'a str {
        match self {
            MarkerKind::Active => &colors.active,
            MarkerKind::Inactive => &colors.inactive,
            MarkerKind::Partner => &colors.partner,
            MarkerKind::Raptor => &colors.raptor,
        }
    }
}

/// 26px div icon: a 20px filled circle with a 3px white border.
#[derive(Debug, Clone, PartialEq)]
pub struct IconStyle {
    pub class_name: &'static str,
    pub html: String,
    pub size: [u32; 2],
    pub anchor: [u32; 2],
}

impl IconStyle {
    pub fn for_kind(kind: MarkerKind, colors: &MarkerColors) -> Self {
        let html = format!(
            "<div style=\"background-color: {}; width: 20px; height: 20px; border-radius: 50%; \
             border: 3px solid white; box-shadow: 0 2px 5px rgba(0,0,0,0.3);\"></div>",
            kind.color(colors)
        );
        Self {
            class_name: kind.css_class(),
            html,
            size: [26, 26],
            anchor: [13, 13],
        }
    }
}
