// ABOUTME: Which patient form fields are shown for the selected status
// ABOUTME: Exactly one conditional field (or none) is visible at a time

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalField {
    Aviary,
    SentTo,
    ReleaseLocation,
}

impl ConditionalField {
    pub const ALL: [ConditionalField; 3] = [
        ConditionalField::Aviary,
        ConditionalField::SentTo,
        ConditionalField::ReleaseLocation,
    ];

    /// Wrapper element id rendered by the form layout.
    pub fn element_id(&self) -> &'static str {
        match self {
            ConditionalField::Aviary => "div_id_aviary",
            ConditionalField::SentTo => "div_id_sent_to",
            ConditionalField::ReleaseLocation => "div_id_release_location",
        }
    }

    /// Status label (as displayed in the dropdown) that reveals this field.
    pub fn status_label(&self) -> &'static str {
        match self {
            ConditionalField::Aviary => "In Auswilderung",
            ConditionalField::SentTo => "Übermittelt",
            ConditionalField::ReleaseLocation => "Ausgewildert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldVisibility {
    pub visible: Option<ConditionalField>,
}

impl FieldVisibility {
    pub fn for_status(status_text: &str) -> Self {
        let status_text = status_text.trim();
        let visible = ConditionalField::ALL
            .into_iter()
            .find(|f| f.status_label() == status_text);
        debug!("Status '{}' shows {:?}", status_text, visible);
        Self { visible }
    }

    pub fn is_visible(&self, field: ConditionalField) -> bool {
        self.visible == Some(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(FieldVisibility::for_status("In Auswilderung").is_visible(ConditionalField::Aviary));
        assert!(FieldVisibility::for_status("Übermittelt").is_visible(ConditionalField::SentTo));
        assert!(FieldVisibility::for_status("Ausgewildert")
            .is_visible(ConditionalField::ReleaseLocation));
    }

    #[test]
    fn test_other_status_hides_everything() {
        let v = FieldVisibility::for_status("In Behandlung");
        assert!(ConditionalField::ALL.iter().all(|f| !v.is_visible(*f)));
        assert_eq!(FieldVisibility::for_status(""), FieldVisibility::default());
    }

    #[test]
    fn test_exactly_one_visible() {
        for field in ConditionalField::ALL {
            let v = FieldVisibility::for_status(field.status_label());
            let count = ConditionalField::ALL.iter().filter(|f| v.is_visible(**f)).count();
            assert_eq!(count, 1);
        }
    }
}
