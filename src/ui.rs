// ABOUTME: Event-subscription table keyed by UI element role
// ABOUTME: Built once at startup; maps (role, event kind) to an application action

use std::collections::HashMap;

use crate::search::SearchKey;

/// Interactive elements the client wires up, identified by what they do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiRole {
    SearchInput,
    SearchButton,
    SearchClear,
    ResultItem,
    Download,
    Report,
    Locate,
    BackfillStart,
    BackfillAbort,
    /// Size preset button; value is `<width>x<height>`.
    WidgetSize,
    WidgetSearchToggle,
    StatusSelect,
    ColorField,
    ColorPicker,
    QuickColor,
    /// Anywhere on the page outside the result box and the search input.
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiEventKind {
    Input,
    KeyDown,
    Click,
    Change,
    Blur,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    LiveSearch,
    SearchKey,
    ExplicitSearch,
    ClearSearch,
    HideResults,
    ActivateResult,
    ExportData,
    OpenReport,
    Locate,
    StartBackfill,
    AbortBackfill,
    UpdateWidget,
    StatusChanged,
    ColorTyped,
    ColorBlurred,
    ColorPicked,
    QuickColor,
}

/// One user interaction as delivered by the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    pub role: UiRole,
    pub kind: UiEventKind,
    /// Current value of the element (input text, selected option, color).
    pub value: String,
    pub key: Option<SearchKey>,
    /// Position of a result entry for `ResultItem` clicks.
    pub index: Option<usize>,
}

impl UiEvent {
    pub fn new(role: UiRole, kind: UiEventKind) -> Self {
        Self {
            role,
            kind,
            value: String::new(),
            key: None,
            index: None,
        }
    }

    pub fn click(role: UiRole) -> Self {
        Self::new(role, UiEventKind::Click)
    }

    pub fn input(role: UiRole, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::new(role, UiEventKind::Input)
        }
    }

    pub fn change(role: UiRole, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::new(role, UiEventKind::Change)
        }
    }

    pub fn key(role: UiRole, key: SearchKey, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            key: Some(key),
            ..Self::new(role, UiEventKind::KeyDown)
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn result_click(index: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::click(UiRole::ResultItem)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventTable {
    routes: HashMap<(UiRole, UiEventKind), UiAction>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subscription the map page, the admin forms and the backfill
    /// panel need.
    pub fn standard() -> Self {
        use UiAction as A;
        use UiEventKind as K;
        use UiRole as R;

        let mut table = Self::new();
        for (role, kind, action) in [
            (R::SearchInput, K::Input, A::LiveSearch),
            (R::SearchInput, K::KeyDown, A::SearchKey),
            (R::SearchButton, K::Click, A::ExplicitSearch),
            (R::SearchClear, K::Click, A::ClearSearch),
            (R::ResultItem, K::Click, A::ActivateResult),
            (R::Page, K::Click, A::HideResults),
            (R::Download, K::Click, A::ExportData),
            (R::Report, K::Click, A::OpenReport),
            (R::Locate, K::Click, A::Locate),
            (R::BackfillStart, K::Click, A::StartBackfill),
            (R::BackfillAbort, K::Click, A::AbortBackfill),
            (R::WidgetSize, K::Click, A::UpdateWidget),
            (R::WidgetSearchToggle, K::Change, A::UpdateWidget),
            (R::StatusSelect, K::Change, A::StatusChanged),
            (R::ColorField, K::Input, A::ColorTyped),
            (R::ColorField, K::Blur, A::ColorBlurred),
            (R::ColorPicker, K::Input, A::ColorPicked),
            (R::ColorPicker, K::Change, A::ColorPicked),
            (R::QuickColor, K::Click, A::QuickColor),
        ] {
            table.subscribe(role, kind, action);
        }
        table
    }

    /// Registers `action`; returns the action it replaced, if any.
    pub fn subscribe(
        &mut self,
        role: UiRole,
        kind: UiEventKind,
        action: UiAction,
    ) -> Option<UiAction> {
        self.routes.insert((role, kind), action)
    }

    pub fn unsubscribe(&mut self, role: UiRole, kind: UiEventKind) -> Option<UiAction> {
        self.routes.remove(&(role, kind))
    }

    pub fn action_for(&self, event: &UiEvent) -> Option<UiAction> {
        self.routes.get(&(event.role, event.kind)).copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_routes_search() {
        let table = EventTable::standard();
        assert_eq!(
            table.action_for(&UiEvent::input(UiRole::SearchInput, "Berlin")),
            Some(UiAction::LiveSearch)
        );
        assert_eq!(
            table.action_for(&UiEvent::key(UiRole::SearchInput, SearchKey::Enter, "x")),
            Some(UiAction::SearchKey)
        );
        assert_eq!(
            table.action_for(&UiEvent::click(UiRole::SearchButton)),
            Some(UiAction::ExplicitSearch)
        );
        assert_eq!(
            table.action_for(&UiEvent::result_click(2)),
            Some(UiAction::ActivateResult)
        );
        assert_eq!(
            table.action_for(&UiEvent::click(UiRole::Page)),
            Some(UiAction::HideResults)
        );
    }

    #[test]
    fn test_unsubscribed_pairs_yield_nothing() {
        let table = EventTable::standard();
        assert_eq!(table.action_for(&UiEvent::click(UiRole::SearchInput)), None);
        assert_eq!(
            table.action_for(&UiEvent::input(UiRole::Download, "")),
            None
        );
    }

    #[test]
    fn test_color_field_input_and_blur_are_distinct() {
        let table = EventTable::standard();
        assert_eq!(
            table.action_for(&UiEvent::input(UiRole::ColorField, "#fff")),
            Some(UiAction::ColorTyped)
        );
        assert_eq!(
            table.action_for(&UiEvent::new(UiRole::ColorField, UiEventKind::Blur)),
            Some(UiAction::ColorBlurred)
        );
    }

    #[test]
    fn test_subscribe_replaces_and_unsubscribe_removes() {
        let mut table = EventTable::standard();
        let before = table.len();
        let previous = table.subscribe(UiRole::Locate, UiEventKind::Click, UiAction::OpenReport);
        assert_eq!(previous, Some(UiAction::Locate));
        assert_eq!(table.len(), before);

        assert_eq!(
            table.unsubscribe(UiRole::Locate, UiEventKind::Click),
            Some(UiAction::OpenReport)
        );
        assert_eq!(table.action_for(&UiEvent::click(UiRole::Locate)), None);
        assert!(!table.is_empty());
    }
}
