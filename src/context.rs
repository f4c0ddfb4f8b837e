// ABOUTME: Application context owning the station snapshot, map, search and poller
// ABOUTME: UI events go through the subscription table to the component that owns them

use std::time::Instant;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::admin::color::DEFAULT_COLOR;
use crate::admin::{ColorPicker, FieldVisibility};
use crate::backfill::{BackfillApi, JobProgressPoller, PollerState, ProgressView};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::geolocation::{GeolocationAssistant, LocateOptions, LocationFix, NearestPanel};
use crate::map::popup::nearest_popup;
use crate::map::{MapRenderer, MapSurface, RenderSummary};
use crate::search::{SearchIndex, SearchKey, SearchMode, SearchOutcome};
use crate::stations::{
    LoadOutcome, StationDataLoader, StationRecord, StationSource, LOAD_FAILURE_MESSAGE,
};
use crate::ui::{EventTable, UiAction, UiEvent, UiRole};
use crate::widget::WidgetConfig;

pub const NO_REPORT_FORM_MESSAGE: &str =
    "No form for new stations is available at the moment. Please contact the team by e-mail.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataExport {
    pub filename: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTarget {
    /// Open this form in a new tab.
    Link(String),
    Unavailable(&'static str),
}

/// What the host page has to show after an event was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEffect {
    Ignored,
    Search { total: usize, lines: Vec<String> },
    /// The result box was closed; query and results are kept.
    ResultsHidden,
    Export(DataExport),
    Report(ReportTarget),
    /// Ask the platform for a location fix with these options.
    RequestLocation(LocateOptions),
    /// A cached fix was reused.
    Nearest(Option<NearestPanel>),
    Backfill(PollerState),
    Widget {
        embed_code: String,
        preview: (String, String),
    },
    Fields(FieldVisibility),
    Color(ColorPicker),
}

/// Result of pressing the locate control.
#[derive(Debug, Clone, PartialEq)]
pub enum LocateRequest {
    /// A fix younger than the maximum age was reused.
    Cached(Option<NearestPanel>),
    /// The platform has to look the location up with these options.
    Lookup(LocateOptions),
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("wildvogelhilfen-{}.json", date.format("%Y-%m-%d"))
}

pub struct AppContext<S, A, M> {
    config: ClientConfig,
    loader: StationDataLoader<S>,
    renderer: MapRenderer<M>,
    search: SearchIndex,
    geolocation: GeolocationAssistant,
    poller: JobProgressPoller<A>,
    events: EventTable,
    status: Option<String>,
    last_render: RenderSummary,
    color: ColorPicker,
    fields: FieldVisibility,
    widget: WidgetConfig,
    widget_base: String,
}

impl<S: StationSource, A: BackfillApi, M: MapSurface> AppContext<S, A, M> {
    pub fn new(config: ClientConfig, source: S, api: A, surface: M) -> Self {
        let renderer = MapRenderer::new(surface, &config.map);
        let widget_base = format!("{}/", config.base_url.trim_end_matches('/'));
        Self {
            loader: StationDataLoader::new(source),
            renderer,
            search: SearchIndex::new(config.map.max_results),
            geolocation: GeolocationAssistant::new(&config.geolocation),
            poller: JobProgressPoller::new(api, config.backfill.poll_interval()),
            events: EventTable::standard(),
            status: None,
            last_render: RenderSummary::default(),
            color: ColorPicker::new(DEFAULT_COLOR),
            fields: FieldVisibility::default(),
            widget: WidgetConfig::default(),
            widget_base,
            config,
        }
    }

    /// Loads the stations and draws them. A failure leaves the map as it was
    /// and shows the load failure message.
    pub async fn refresh(&mut self) -> Result<LoadOutcome, ClientError> {
        let outcome = match self.loader.load().await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.status = Some(LOAD_FAILURE_MESSAGE.to_string());
                return Err(e);
            }
        };
        self.status = None;
        if let LoadOutcome::Replaced { .. } = outcome {
            // Result indices refer to the old snapshot.
            self.search.clear();
            self.last_render = self.renderer.render(self.loader.stations());
        }
        info!("{}", self.stats());
        Ok(outcome)
    }

    pub fn stations(&self) -> &[StationRecord] {
        self.loader.stations()
    }

    pub fn stats(&self) -> String {
        format!("{} stations found", self.loader.stations().len())
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn render_summary(&self) -> RenderSummary {
        self.last_render
    }

    pub fn renderer(&self) -> &MapRenderer<M> {
        &self.renderer
    }

    pub fn search_index(&self) -> &SearchIndex {
        &self.search
    }

    pub fn poller(&self) -> &JobProgressPoller<A> {
        &self.poller
    }

    fn apply(&mut self, outcome: &SearchOutcome) {
        self.renderer.highlight(&outcome.highlight);
        if !outcome.focus.is_empty() {
            self.renderer.focus(&outcome.focus);
        }
    }

    pub fn search(&mut self, query: &str, mode: SearchMode) -> SearchOutcome {
        let outcome = self.search.search(self.loader.stations(), query, mode);
        self.apply(&outcome);
        outcome
    }

    pub fn clear_search(&mut self) -> SearchOutcome {
        let outcome = self.search.clear();
        self.apply(&outcome);
        outcome
    }

    pub fn handle_search_key(&mut self, key: SearchKey, input: &str) -> Option<SearchOutcome> {
        let outcome = self.search.handle_key(self.loader.stations(), key, input)?;
        self.apply(&outcome);
        Some(outcome)
    }

    pub fn activate_result(&mut self, index: usize) -> Option<SearchOutcome> {
        let outcome = self.search.activate(self.loader.stations(), index)?;
        self.apply(&outcome);
        Some(outcome)
    }

    fn search_effect(&self, total: usize) -> UiEffect {
        UiEffect::Search {
            total,
            lines: self.search.render_lines(self.loader.stations()),
        }
    }

    pub fn locate(&mut self) -> LocateRequest {
        match self.geolocation.cached_fix(Instant::now()) {
            Some(fix) => {
                debug!("Reusing cached location fix");
                let panel = self.geolocation.panel_for(fix, self.loader.stations());
                self.show_panel(panel.as_ref());
                LocateRequest::Cached(panel)
            }
            None => LocateRequest::Lookup(self.geolocation.options()),
        }
    }

    pub fn on_location_found(&mut self, fix: LocationFix) -> Option<NearestPanel> {
        let panel = self
            .geolocation
            .on_location_found(fix, self.loader.stations());
        self.status = None;
        self.show_panel(panel.as_ref());
        panel
    }

    fn show_panel(&mut self, panel: Option<&NearestPanel>) {
        match panel {
            Some(panel) => self.renderer.open_popup(panel.anchor, nearest_popup(panel)),
            None => debug!("No mapped stations to list near the location"),
        }
    }

    pub fn on_location_error(&mut self, message: &str) -> String {
        let shown = self.geolocation.on_location_error(message);
        self.status = Some(shown.clone());
        shown
    }

    pub fn export_on(&self, date: NaiveDate) -> Result<DataExport, ClientError> {
        let body = serde_json::to_string_pretty(self.loader.stations())?;
        Ok(DataExport {
            filename: export_filename(date),
            body,
        })
    }

    /// Pretty JSON of the current snapshot, named after today's UTC date.
    pub fn export(&self) -> Result<DataExport, ClientError> {
        self.export_on(Utc::now().date_naive())
    }

    pub fn report(&self) -> ReportTarget {
        match self.config.report_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => ReportTarget::Link(url.to_string()),
            _ => ReportTarget::Unavailable(NO_REPORT_FORM_MESSAGE),
        }
    }

    /// Page-load check: polls once. The caller enters the loop only when the
    /// returned state is still polling.
    pub async fn check_backfill(&mut self) -> Result<PollerState, ClientError> {
        self.poller.poll().await
    }

    pub async fn start_backfill(&mut self) -> Result<PollerState, ClientError> {
        self.poller.start().await
    }

    pub async fn abort_backfill(&mut self) -> Result<PollerState, ClientError> {
        self.poller.abort().await
    }

    /// Runs the poll loop after a start, an accepted abort or a page-load
    /// check left the job polling. Returns the state the loop stopped in.
    pub async fn follow_backfill<F>(&mut self, on_tick: F) -> PollerState
    where
        F: FnMut(PollerState, &ProgressView),
    {
        self.poller.run(on_tick).await
    }

    pub fn widget(&self) -> &WidgetConfig {
        &self.widget
    }

    fn widget_effect(&self) -> UiEffect {
        UiEffect::Widget {
            embed_code: self.widget.embed_code(&self.widget_base),
            preview: self.widget.preview_size(),
        }
    }

    /// Applies a `<width>x<height>` preset; malformed values are ignored.
    pub fn set_widget_size(&mut self, preset: &str) -> bool {
        match preset.split_once('x') {
            Some((w, h)) if !w.trim().is_empty() && !h.trim().is_empty() => {
                self.widget.width = w.trim().to_string();
                self.widget.height = h.trim().to_string();
                true
            }
            _ => {
                warn!("Ignoring malformed widget size '{}'", preset);
                false
            }
        }
    }

    pub fn set_widget_search(&mut self, include: bool) {
        self.widget.include_search = include;
    }

    pub fn color_picker(&self) -> &ColorPicker {
        &self.color
    }

    pub fn field_visibility(&self) -> FieldVisibility {
        self.fields
    }

    pub async fn dispatch(&mut self, event: UiEvent) -> Result<UiEffect, ClientError> {
        let Some(action) = self.events.action_for(&event) else {
            debug!("No subscription for {:?} {:?}", event.role, event.kind);
            return Ok(UiEffect::Ignored);
        };

        let effect = match action {
            UiAction::LiveSearch => {
                let outcome = self.search(&event.value, SearchMode::Live);
                self.search_effect(outcome.total)
            }
            UiAction::ExplicitSearch => {
                let outcome = self.search(&event.value, SearchMode::Explicit);
                self.search_effect(outcome.total)
            }
            UiAction::SearchKey => {
                let Some(key) = event.key else {
                    return Ok(UiEffect::Ignored);
                };
                match self.handle_search_key(key, &event.value) {
                    Some(outcome) => self.search_effect(outcome.total),
                    None => UiEffect::Ignored,
                }
            }
            UiAction::ClearSearch => {
                self.clear_search();
                self.search_effect(0)
            }
            UiAction::HideResults => {
                self.search.hide();
                UiEffect::ResultsHidden
            }
            UiAction::ActivateResult => {
                let Some(index) = event.index else {
                    return Ok(UiEffect::Ignored);
                };
                match self.activate_result(index) {
                    Some(outcome) => self.search_effect(outcome.total),
                    None => UiEffect::Ignored,
                }
            }
            UiAction::ExportData => UiEffect::Export(self.export()?),
            UiAction::OpenReport => UiEffect::Report(self.report()),
            UiAction::Locate => match self.locate() {
                LocateRequest::Cached(panel) => UiEffect::Nearest(panel),
                LocateRequest::Lookup(options) => UiEffect::RequestLocation(options),
            },
            UiAction::StartBackfill => UiEffect::Backfill(self.start_backfill().await?),
            UiAction::AbortBackfill => UiEffect::Backfill(self.abort_backfill().await?),
            UiAction::UpdateWidget => {
                match event.role {
                    UiRole::WidgetSize => {
                        self.set_widget_size(&event.value);
                    }
                    _ => self.set_widget_search(matches!(event.value.as_str(), "true" | "on")),
                }
                self.widget_effect()
            }
            UiAction::StatusChanged => {
                self.fields = FieldVisibility::for_status(&event.value);
                UiEffect::Fields(self.fields)
            }
            UiAction::ColorTyped => {
                self.color.on_text_input(&event.value);
                UiEffect::Color(self.color.clone())
            }
            UiAction::ColorBlurred => {
                if let Err(e) = self.color.on_blur() {
                    self.status = Some(e.user_message());
                    return Err(e);
                }
                UiEffect::Color(self.color.clone())
            }
            UiAction::ColorPicked => {
                self.color.on_picker_input(&event.value);
                UiEffect::Color(self.color.clone())
            }
            UiAction::QuickColor => {
                self.color.on_quick_color(&event.value);
                UiEffect::Color(self.color.clone())
            }
        };
        Ok(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{HeadlessMap, Viewport};
    use crate::remote::{AbortResponse, ProgressResponse, StartResponse, StationFetch};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FixedSource {
        responses: Mutex<VecDeque<Result<StationFetch, ClientError>>>,
    }

    #[async_trait]
    impl StationSource for FixedSource {
        async fn fetch_stations(&self, _etag: Option<&str>) -> Result<StationFetch, ClientError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(StationFetch::NotModified))
        }
    }

    #[derive(Default)]
    struct CountingApi {
        calls: AtomicUsize,
        progress: Mutex<VecDeque<ProgressResponse>>,
    }

    #[async_trait]
    impl BackfillApi for CountingApi {
        async fn progress(&self) -> Result<ProgressResponse, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.progress.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn start(&self) -> Result<StartResponse, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(StartResponse {
                started: true,
                task_id: Some("7".into()),
                reason: None,
            })
        }

        async fn abort(&self) -> Result<AbortResponse, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AbortResponse {
                aborted: true,
                reason: None,
            })
        }
    }

    fn station(
        name: &str,
        plz: &str,
        lat: serde_json::Value,
        lng: serde_json::Value,
    ) -> StationRecord {
        StationRecord {
            name: name.to_string(),
            postal_code: Some(plz.to_string()),
            latitude: lat,
            longitude: lng,
            ..Default::default()
        }
    }

    fn sample() -> Vec<StationRecord> {
        vec![
            station("Vogelhilfe Berlin", "10115", json!(52.53), json!(13.38)),
            station("Wildtierstation Hamburg", "20095", json!(53.55), json!(9.99)),
            station("Igel und Vogel Köln", "50667", json!(50.94), json!(6.96)),
            station("Ohne Koordinaten", "80331", json!(null), json!("")),
        ]
    }

    fn context(
        responses: Vec<Result<StationFetch, ClientError>>,
        config: ClientConfig,
    ) -> AppContext<FixedSource, CountingApi, HeadlessMap> {
        AppContext::new(
            config,
            FixedSource {
                responses: Mutex::new(responses.into()),
            },
            CountingApi::default(),
            HeadlessMap::new(),
        )
    }

    async fn loaded() -> AppContext<FixedSource, CountingApi, HeadlessMap> {
        let mut ctx = context(
            vec![Ok(StationFetch::Modified {
                stations: sample(),
                etag: Some("\"v1\"".into()),
            })],
            ClientConfig::default(),
        );
        ctx.refresh().await.unwrap();
        ctx
    }

    #[tokio::test]
    async fn test_refresh_renders_and_counts() {
        let ctx = loaded().await;
        assert_eq!(ctx.stats(), "4 stations found");
        assert_eq!(ctx.render_summary(), RenderSummary { placed: 3, skipped: 1 });
        assert_eq!(ctx.renderer().surface().marker_count(), 3);
        assert!(ctx.status().is_none());
    }

    #[tokio::test]
    async fn test_failed_load_sets_status_and_keeps_map() {
        let mut ctx = context(
            vec![
                Ok(StationFetch::Modified {
                    stations: sample(),
                    etag: None,
                }),
                Err(ClientError::bad_status(500, "boom")),
            ],
            ClientConfig::default(),
        );
        ctx.refresh().await.unwrap();
        assert!(ctx.refresh().await.is_err());
        assert_eq!(ctx.status(), Some(LOAD_FAILURE_MESSAGE));
        assert_eq!(ctx.renderer().surface().marker_count(), 3);
        assert_eq!(ctx.stations().len(), 4);
    }

    #[tokio::test]
    async fn test_not_modified_leaves_render_alone() {
        let mut ctx = loaded().await;
        assert_eq!(ctx.refresh().await.unwrap(), LoadOutcome::Unchanged);
        assert_eq!(ctx.renderer().surface().marker_count(), 3);
    }

    #[tokio::test]
    async fn test_live_search_highlights_without_moving() {
        let mut ctx = loaded().await;
        let before = ctx.renderer().surface().viewport().cloned();
        let effect = ctx
            .dispatch(UiEvent::input(UiRole::SearchInput, "vogel"))
            .await
            .unwrap();

        match effect {
            UiEffect::Search { total, lines } => {
                assert_eq!(total, 2);
                assert_eq!(lines.len(), 2);
            }
            other => panic!("unexpected effect {:?}", other),
        }
        assert_eq!(ctx.renderer().surface().highlighted_count(), 2);
        assert_eq!(ctx.renderer().surface().viewport().cloned(), before);
    }

    #[tokio::test]
    async fn test_result_click_flies_to_station() {
        let mut ctx = loaded().await;
        ctx.dispatch(UiEvent::input(UiRole::SearchInput, "Hamburg"))
            .await
            .unwrap();
        ctx.dispatch(UiEvent::result_click(0)).await.unwrap();

        assert!(!ctx.search_index().is_visible());
        assert_eq!(ctx.renderer().surface().highlighted_count(), 1);
        assert!(matches!(
            ctx.renderer().surface().viewport(),
            Some(Viewport::Center { zoom: 11, .. })
        ));
    }

    #[tokio::test]
    async fn test_clear_removes_highlight() {
        let mut ctx = loaded().await;
        ctx.search("vogel", SearchMode::Explicit);
        let effect = ctx
            .dispatch(UiEvent::click(UiRole::SearchClear))
            .await
            .unwrap();
        assert_eq!(
            effect,
            UiEffect::Search {
                total: 0,
                lines: Vec::new()
            }
        );
        assert_eq!(ctx.renderer().surface().highlighted_count(), 0);
    }

    #[tokio::test]
    async fn test_export_is_pretty_json_named_by_date() {
        let ctx = loaded().await;
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let export = ctx.export_on(date).unwrap();
        assert_eq!(export.filename, "wildvogelhilfen-2026-03-09.json");
        assert!(export.body.starts_with("[\n"));
        let parsed: Vec<StationRecord> = serde_json::from_str(&export.body).unwrap();
        assert_eq!(parsed.len(), 4);
    }

    #[tokio::test]
    async fn test_export_keeps_backend_only_fields_and_uses_utc_date() {
        let mut berlin = station("Vogelhilfe Berlin", "10115", json!(52.53), json!(13.38));
        berlin.extra.insert("plz_prefix".into(), json!("1"));
        berlin.extra.insert("approved_for_publication".into(), json!(true));
        let mut ctx = context(
            vec![Ok(StationFetch::Modified {
                stations: vec![berlin],
                etag: None,
            })],
            ClientConfig::default(),
        );
        ctx.refresh().await.unwrap();

        let export = ctx.export().unwrap();
        assert_eq!(export.filename, export_filename(Utc::now().date_naive()));
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&export.body).unwrap();
        assert_eq!(parsed[0]["plz_prefix"], "1");
        assert_eq!(parsed[0]["approved_for_publication"], true);
    }

    #[tokio::test]
    async fn test_page_click_hides_results_but_keeps_query() {
        let mut ctx = loaded().await;
        ctx.dispatch(UiEvent::input(UiRole::SearchInput, "vogel"))
            .await
            .unwrap();
        assert!(ctx.search_index().is_visible());

        let effect = ctx.dispatch(UiEvent::click(UiRole::Page)).await.unwrap();
        assert_eq!(effect, UiEffect::ResultsHidden);
        assert!(!ctx.search_index().is_visible());
        assert_eq!(ctx.search_index().query(), "vogel");
        assert_eq!(ctx.renderer().surface().highlighted_count(), 2);
    }

    #[tokio::test]
    async fn test_report_link_or_message() {
        let ctx = loaded().await;
        assert_eq!(ctx.report(), ReportTarget::Unavailable(NO_REPORT_FORM_MESSAGE));

        let config = ClientConfig {
            report_url: Some("https://forms.example.org/new".into()),
            ..ClientConfig::default()
        };
        let ctx = context(Vec::new(), config);
        assert_eq!(
            ctx.report(),
            ReportTarget::Link("https://forms.example.org/new".into())
        );
    }

    #[tokio::test]
    async fn test_locate_requests_then_reuses_fix() {
        let mut ctx = loaded().await;
        let effect = ctx.dispatch(UiEvent::click(UiRole::Locate)).await.unwrap();
        assert!(matches!(effect, UiEffect::RequestLocation(opts) if opts.max_zoom == 12));

        let panel = ctx
            .on_location_found(LocationFix {
                position: crate::geo::LatLng::new(52.52, 13.40),
                accuracy_m: 24.6,
            })
            .unwrap();
        assert_eq!(panel.entries[0].name, "Vogelhilfe Berlin");
        assert_eq!(panel.accuracy_m, 25);
        assert!(ctx.renderer().surface().popup().is_some());

        let effect = ctx.dispatch(UiEvent::click(UiRole::Locate)).await.unwrap();
        assert!(matches!(effect, UiEffect::Nearest(Some(_))));
    }

    #[tokio::test]
    async fn test_location_error_becomes_status() {
        let mut ctx = loaded().await;
        ctx.on_location_error("User denied Geolocation");
        assert_eq!(
            ctx.status(),
            Some("Location lookup failed: User denied Geolocation")
        );
    }

    #[tokio::test]
    async fn test_abort_before_start_sends_nothing() {
        let mut ctx = loaded().await;
        let err = ctx
            .dispatch(UiEvent::click(UiRole::BackfillAbort))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::ActionUnavailable(_)));
        assert_eq!(ctx.poller().api().calls.load(Ordering::SeqCst), 0);

        let effect = ctx
            .dispatch(UiEvent::click(UiRole::BackfillStart))
            .await
            .unwrap();
        assert_eq!(effect, UiEffect::Backfill(PollerState::Running));
    }

    fn job(active: bool, finished: bool) -> ProgressResponse {
        ProgressResponse {
            task_id: Some("7".into()),
            percent: if finished { 100.0 } else { 40.0 },
            active,
            finished,
            processed: 4,
            total: 10,
            success: 4,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_accepted_abort_keeps_following_until_terminal() {
        let mut config = ClientConfig::default();
        config.backfill.poll_interval_ms = 5;
        let mut ctx = AppContext::new(
            config,
            FixedSource {
                responses: Mutex::new(VecDeque::new()),
            },
            CountingApi {
                progress: Mutex::new(
                    vec![job(true, false), job(true, false), job(false, true)].into(),
                ),
                ..Default::default()
            },
            HeadlessMap::new(),
        );

        assert_eq!(ctx.check_backfill().await.unwrap(), PollerState::Running);
        let state = ctx.abort_backfill().await.unwrap();
        assert_eq!(state, PollerState::Aborting);
        assert!(state.is_polling());

        let mut ticks = Vec::new();
        let end = ctx.follow_backfill(|state, _| ticks.push(state)).await;
        assert_eq!(end, PollerState::Finished);
        assert!(end.is_terminal());
        assert_eq!(ticks, vec![PollerState::Aborting, PollerState::Finished]);
        assert!(!ctx.poller().view().abort_visible);
        // 3 progress polls plus the abort request
        assert_eq!(ctx.poller().api().calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_page_load_check_with_no_task_stays_idle() {
        let mut ctx = loaded().await;
        let state = ctx.check_backfill().await.unwrap();
        assert_eq!(state, PollerState::Idle);
        assert!(!state.is_polling());
        assert_eq!(ctx.poller().view().label, "No active task");
    }

    #[tokio::test]
    async fn test_widget_and_form_events() {
        let mut ctx = loaded().await;
        let effect = ctx
            .dispatch(UiEvent::click(UiRole::WidgetSize).with_value("100%x400"))
            .await
            .unwrap();
        match effect {
            UiEffect::Widget { embed_code, preview } => {
                assert!(embed_code.contains("src=\"http://localhost:8000/widget.html\""));
                assert_eq!(preview, ("100%".to_string(), "400px".to_string()));
            }
            other => panic!("unexpected effect {:?}", other),
        }
        ctx.dispatch(UiEvent::change(UiRole::WidgetSearchToggle, "false"))
            .await
            .unwrap();
        assert!(!ctx.widget().include_search);

        ctx.dispatch(UiEvent::change(UiRole::StatusSelect, "Ausgewildert"))
            .await
            .unwrap();
        assert!(ctx
            .field_visibility()
            .is_visible(crate::admin::ConditionalField::ReleaseLocation));
    }

    #[tokio::test]
    async fn test_invalid_color_on_blur_is_reported() {
        let mut ctx = loaded().await;
        ctx.dispatch(UiEvent::input(UiRole::ColorField, "12345"))
            .await
            .unwrap();
        let err = ctx
            .dispatch(UiEvent::new(UiRole::ColorField, crate::ui::UiEventKind::Blur))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(ctx.status().is_some());
        assert_eq!(ctx.color_picker().preview, DEFAULT_COLOR);
    }
}
