//! Drives the map surface from the viewer's inputs.
//!
//! Inputs (layer names, filters, selection, opacity, analysis triggers) arrive
//! through setters. Fetches and the analysis call run on the async runtime and
//! report back as [`ViewEvent`]s, which are applied on the caller's thread by
//! [`ViewOrchestrator::pump`] or [`ViewOrchestrator::next_event`]. A vector
//! completion is applied only while the layer instance it was started for is
//! still attached to its role.

use crate::analysis::coordinator::{AnalysisCoordinator, Resolution, TriggerOutcome};
use crate::analysis::payload::{AnalysisPayload, WeightedCriterion};
use crate::analysis::response::{AnalysisResponse, RasterDescriptor};
use crate::analysis::selection::SelectionStore;
use crate::core::config::ViewerConfig;
use crate::data::geojson::FeatureCollection;
use crate::layers::base::{LayerId, LayerRole};
use crate::layers::manager::{MapSurface, SurfaceHandle, SurfaceManager};
use crate::layers::spec::{LayerSpec, RasterLayerSpec, VectorLayerSpec};
use crate::layers::tracker::LoadingTracker;
use crate::net::analysis::{AnalysisClient, HttpAnalysisClient};
use crate::net::features::{FeatureSource, HttpFeatureSource};
use crate::runtime;
use crate::sources::wfs::{build_vector_request, FilterValues};
use crate::sources::wms::build_raster_request;
use crate::view::events::{self, EventReceiver, EventSender, ViewEvent};
use crate::view::snapshot::{busy_message, LayerInfo, LegendState, ViewSnapshot};
use crate::Result;
use futures::StreamExt;
use std::sync::Arc;

/// Inputs driving one vector role
#[derive(Debug, Clone, Default, PartialEq)]
struct VectorInput {
    layer_name: Option<String>,
    filter: Option<String>,
    values: Option<FilterValues>,
}

pub struct ViewOrchestrator<S: MapSurface = SurfaceManager> {
    config: ViewerConfig,
    surface: S,
    features: Arc<dyn FeatureSource>,
    analysis: Arc<dyn AnalysisClient>,
    tracker: LoadingTracker,
    coordinator: AnalysisCoordinator,
    events_tx: EventSender,
    events_rx: EventReceiver,
    primary: VectorInput,
    secondary: VectorInput,
    selection: Vec<WeightedCriterion>,
    analysis_requested: bool,
    raster_descriptor: Option<RasterDescriptor>,
    /// Descriptor waiting out the attach delay
    pending_raster: Option<RasterDescriptor>,
    legend: LegendState,
    opacity: u8,
}

impl ViewOrchestrator<SurfaceManager> {
    /// Orchestrator talking to the configured servers over HTTP
    pub fn with_http(config: ViewerConfig) -> Self {
        let surface = SurfaceManager::new().with_basemap(config.view.basemap.clone());
        let analysis = Arc::new(HttpAnalysisClient::new(config.endpoints.analysis_url.clone()));
        Self::new(config, surface, Arc::new(HttpFeatureSource::new()), analysis)
    }
}

impl<S: MapSurface> ViewOrchestrator<S> {
    pub fn new(
        config: ViewerConfig,
        surface: S,
        features: Arc<dyn FeatureSource>,
        analysis: Arc<dyn AnalysisClient>,
    ) -> Self {
        let (events_tx, events_rx) = events::channel();
        let opacity = config.view.initial_opacity.min(100);
        Self {
            config,
            surface,
            features,
            analysis,
            tracker: LoadingTracker::new(),
            coordinator: AnalysisCoordinator::new(),
            events_tx,
            events_rx,
            primary: VectorInput::default(),
            secondary: VectorInput::default(),
            selection: Vec::new(),
            analysis_requested: false,
            raster_descriptor: None,
            pending_raster: None,
            legend: LegendState::default(),
            opacity,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn tracker(&self) -> &LoadingTracker {
        &self.tracker
    }

    pub fn coordinator(&self) -> &AnalysisCoordinator {
        &self.coordinator
    }

    /// Sender for events produced outside the orchestrator, such as legend load failures
    pub fn event_sender(&self) -> EventSender {
        self.events_tx.clone()
    }

    /// Mounts the surface and loads whatever inputs were set beforehand
    pub fn mount(&mut self, target: &str) -> SurfaceHandle {
        let already = self.surface.is_initialized();
        let handle = self
            .surface
            .initialize(target, self.config.view.center, self.config.view.zoom);
        if !already {
            self.reload_vector(LayerRole::Primary);
            self.reload_vector(LayerRole::Secondary);
            if let Some(descriptor) = self.raster_descriptor.clone() {
                self.attach_raster(descriptor);
            }
        }
        handle
    }

    /// Swaps the basemap. An unknown key leaves the map unchanged and is reported.
    pub fn set_base_layer(&mut self, key: &str) -> bool {
        match self.surface.set_base_layer(key) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{}", e);
                self.tracker.set_global_error(e.to_string());
                false
            }
        }
    }

    pub fn set_primary_layer(&mut self, layer_name: Option<String>) {
        let layer_name = layer_name.filter(|n| !n.trim().is_empty());
        if self.primary.layer_name == layer_name {
            return;
        }
        self.primary.layer_name = layer_name;
        self.reload_vector(LayerRole::Primary);
    }

    pub fn set_secondary_layer(&mut self, layer_name: Option<String>) {
        let layer_name = layer_name.filter(|n| !n.trim().is_empty());
        if self.secondary.layer_name == layer_name {
            return;
        }
        self.secondary.layer_name = layer_name;
        self.reload_vector(LayerRole::Secondary);
    }

    /// Sets the attribute filter of the secondary layer
    pub fn set_secondary_filter(&mut self, filter: Option<String>, values: Option<FilterValues>) {
        if self.secondary.filter == filter && self.secondary.values == values {
            return;
        }
        self.secondary.filter = filter;
        self.secondary.values = values;
        self.reload_vector(LayerRole::Secondary);
    }

    /// Replaces the weighted selection. An empty selection removes the raster.
    pub fn set_selection(&mut self, selection: Vec<WeightedCriterion>) {
        let cleared = selection.is_empty();
        self.selection = selection;
        if cleared {
            self.set_raster_descriptor(None);
        }
    }

    pub fn selection(&self) -> &[WeightedCriterion] {
        &self.selection
    }

    /// Takes the selection from `store` and triggers an analysis
    pub fn run_analysis(&mut self, store: &dyn SelectionStore) -> TriggerOutcome {
        self.set_selection(store.selection());
        self.request_analysis()
    }

    /// Triggers an analysis of the current selection. Ignored while one is in flight.
    pub fn request_analysis(&mut self) -> TriggerOutcome {
        self.analysis_requested = true;
        let outcome = self
            .coordinator
            .trigger(AnalysisPayload::new(self.selection.clone()));

        match &outcome {
            TriggerOutcome::Started(payload) => {
                self.tracker.set_loading(LayerRole::Raster, true);
                self.tracker.clear_error();

                let client = Arc::clone(&self.analysis);
                let sender = self.events_tx.clone();
                let payload = payload.clone();
                runtime::spawn(async move {
                    let result = client.submit(&payload).await;
                    events::deliver(&sender, ViewEvent::AnalysisCompleted { result });
                });
            }
            TriggerOutcome::IgnoredInFlight => {}
            TriggerOutcome::EmptySelection => {
                self.analysis_requested = false;
                if let Some(message) = self.coordinator.last_error() {
                    self.tracker.set_global_error(message);
                }
            }
        }
        outcome
    }

    /// Shows the raster described by `descriptor`, or removes the raster and legend
    pub fn set_raster_descriptor(&mut self, descriptor: Option<RasterDescriptor>) {
        match descriptor {
            Some(descriptor) => {
                self.pending_raster = None;
                self.attach_raster(descriptor);
            }
            None => {
                self.pending_raster = None;
                self.raster_descriptor = None;
                self.legend = LegendState::default();
                if !self.coordinator.is_in_flight() {
                    self.tracker.set_loading(LayerRole::Raster, false);
                }
                if self.surface.is_initialized() {
                    if let Err(e) = self.surface.set_layer(LayerRole::Raster, None) {
                        log::warn!("failed to remove raster layer: {}", e);
                    }
                }
            }
        }
    }

    /// Sets the raster opacity percent, clamped to [0, 100]. Returns the applied value.
    pub fn set_opacity(&mut self, percent: i32) -> u8 {
        let applied = percent.clamp(0, 100) as u8;
        self.opacity = applied;
        self.surface.set_opacity(LayerRole::Raster, i32::from(applied));
        applied
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    /// Records that the legend image failed to load. Map state is unaffected.
    pub fn report_legend_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("legend failed to load: {}", message);
        self.legend.warning = Some(message);
    }

    pub fn dismiss_error(&mut self) {
        self.tracker.clear_error();
    }

    /// True while a fetch, an analysis or a raster attach is outstanding
    pub fn is_busy(&self) -> bool {
        self.tracker.is_any_loading() || self.analysis_requested || self.pending_raster.is_some()
    }

    /// Applies every event already delivered. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Waits for the next event and applies it
    pub async fn next_event(&mut self) -> bool {
        match self.events_rx.next().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Applies events until nothing is loading or in flight
    pub async fn run_until_idle(&mut self) {
        self.pump();
        while self.is_busy() {
            if !self.next_event().await {
                break;
            }
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let counts = self.tracker.feature_counts();
        let loading = self.tracker.is_any_loading();
        let analysis_pending = self.analysis_requested || self.coordinator.is_in_flight();

        ViewSnapshot {
            loading,
            busy_message: busy_message(loading, analysis_pending),
            error: self.tracker.last_error().map(str::to_string),
            layer_errors: self.tracker.layer_errors().into_iter().collect(),
            feature_counts: counts,
            raster_descriptor: self.raster_descriptor.clone(),
            legend: self.legend.clone(),
            opacity: self.opacity,
            layer_info: LayerInfo {
                primary_layer: self.primary.layer_name.clone(),
                primary_features: counts.primary,
                secondary_layer: self.secondary.layer_name.clone(),
                secondary_features: counts.secondary,
                raster_layer: self
                    .raster_descriptor
                    .as_ref()
                    .map(|d| d.layer_identifier.clone()),
            },
            analysis_status: self.coordinator.status(),
            analysis_requested: self.analysis_requested,
        }
    }

    /// Releases the surface. Completions still in flight are discarded.
    pub fn teardown(&mut self) {
        self.surface.teardown();
        for role in LayerRole::ALL {
            self.tracker.set_loading(role, false);
        }
        self.pending_raster = None;
    }

    fn input(&self, role: LayerRole) -> Option<&VectorInput> {
        match role {
            LayerRole::Primary => Some(&self.primary),
            LayerRole::Secondary => Some(&self.secondary),
            _ => None,
        }
    }

    fn reload_vector(&mut self, role: LayerRole) {
        if !self.surface.is_initialized() {
            log::debug!("{} layer change deferred until mount", role);
            return;
        }
        let Some(input) = self.input(role).cloned() else {
            return;
        };

        let Some(layer_name) = input.layer_name else {
            self.clear_vector(role);
            return;
        };

        let (filter, values) = match role {
            LayerRole::Secondary => (input.filter.as_deref(), input.values.as_ref()),
            _ => (None, None),
        };
        let url = build_vector_request(
            &self.config.endpoints.geoserver_url,
            &self.config.endpoints.default_workspace,
            &layer_name,
            filter,
            values,
        );

        let spec = LayerSpec::Vector(VectorLayerSpec::new(role, layer_name, url.clone()));
        let layer = match self.surface.set_layer(role, Some(spec)) {
            Ok(Some(layer)) => layer,
            Ok(None) => return,
            Err(e) => {
                log::error!("could not attach {} layer: {}", role, e);
                self.tracker.set_error(role, Some(e.to_string()));
                return;
            }
        };

        self.tracker.set_loading(role, true);
        self.tracker.set_error(role, None);
        if role == LayerRole::Primary {
            self.tracker.clear_error();
        }
        log::debug!("loading {} layer {} from {}", role, layer, url);

        let source = Arc::clone(&self.features);
        let sender = self.events_tx.clone();
        runtime::spawn(async move {
            let result = source.fetch(&url).await;
            events::deliver(&sender, ViewEvent::FeaturesLoaded { role, layer, result });
        });
    }

    fn clear_vector(&mut self, role: LayerRole) {
        if let Err(e) = self.surface.set_layer(role, None) {
            log::warn!("failed to remove {} layer: {}", role, e);
        }
        self.tracker.set_loading(role, false);
        self.tracker.set_feature_count(role, 0);
        self.tracker.set_error(role, None);
    }

    fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::FeaturesLoaded { role, layer, result } => {
                self.on_features_loaded(role, layer, result)
            }
            ViewEvent::AnalysisCompleted { result } => self.on_analysis_completed(result),
            ViewEvent::RasterReady { descriptor } => {
                if self.pending_raster.as_ref() == Some(&descriptor) {
                    self.pending_raster = None;
                    self.attach_raster(descriptor);
                } else {
                    log::debug!("dropping superseded raster {}", descriptor.layer_identifier);
                }
            }
            ViewEvent::LegendFailed { url, message } => {
                if self.legend.url.as_deref() == Some(url.as_str()) {
                    self.report_legend_error(message);
                }
            }
        }
    }

    fn on_features_loaded(
        &mut self,
        role: LayerRole,
        layer: LayerId,
        result: Result<FeatureCollection>,
    ) {
        if !self.surface.is_attached(role, layer) {
            log::warn!("discarding stale {} completion for {}", role, layer);
            return;
        }

        self.tracker.set_loading(role, false);
        match result {
            Ok(collection) => {
                let count = collection.len();
                self.surface.record_extent(layer, collection.extent());
                self.tracker.set_feature_count(role, count);
                self.tracker.set_error(role, None);
                self.surface.fit_to_extent(role, &self.config.fit);
                log::info!("{} layer loaded {} features", role, count);
            }
            Err(e) => {
                log::error!("failed to load {} features: {}", role, e);
                if let Err(remove_err) = self.surface.set_layer(role, None) {
                    log::warn!("failed to remove {} layer: {}", role, remove_err);
                }
                self.tracker.set_feature_count(role, 0);
                self.tracker
                    .set_error(role, Some(format!("Failed to load {} features: {}", role, e)));
            }
        }
    }

    fn on_analysis_completed(&mut self, result: Result<AnalysisResponse>) {
        let Some(resolution) = self.coordinator.resolve(result, &self.config.raster) else {
            return;
        };
        self.analysis_requested = false;

        match resolution {
            Resolution::Succeeded(descriptor) => {
                let delay = self.config.timing.raster_attach_delay();
                if delay.is_zero() {
                    self.attach_raster(descriptor);
                    return;
                }
                self.pending_raster = Some(descriptor.clone());
                let sender = self.events_tx.clone();
                runtime::spawn(async move {
                    runtime::async_delay(delay).await;
                    events::deliver(&sender, ViewEvent::RasterReady { descriptor });
                });
            }
            Resolution::Failed(message) => {
                self.tracker.set_loading(LayerRole::Raster, false);
                self.tracker.set_global_error(message);
            }
        }
    }

    fn attach_raster(&mut self, descriptor: RasterDescriptor) {
        let request = build_raster_request(
            &self.config.wms_url(),
            Some(&descriptor.workspace),
            Some(&descriptor.layer_identifier),
            &self.config.raster,
        );
        self.legend = LegendState {
            url: Some(request.legend_url.clone()),
            visible: true,
            warning: None,
        };
        self.raster_descriptor = Some(descriptor);

        if !self.surface.is_initialized() {
            log::debug!("raster attach deferred until mount");
            return;
        }

        let spec = LayerSpec::Raster(RasterLayerSpec::from_request(&request, self.opacity));
        match self.surface.set_layer(LayerRole::Raster, Some(spec)) {
            Ok(_) => log::info!("raster layer {} attached", request.layers),
            Err(e) => {
                log::error!("error setting up raster layer: {}", e);
                self.tracker
                    .set_global_error(format!("Error setting up raster layer: {}", e));
            }
        }
        if !self.coordinator.is_in_flight() {
            self.tracker.set_loading(LayerRole::Raster, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RequestTiming;
    use crate::MapError;
    use async_trait::async_trait;

    struct EmptySource;

    #[async_trait]
    impl FeatureSource for EmptySource {
        async fn fetch(&self, _url: &str) -> Result<FeatureCollection> {
            Ok(FeatureCollection::default())
        }
    }

    struct FailingAnalysis;

    #[async_trait]
    impl AnalysisClient for FailingAnalysis {
        async fn submit(&self, _payload: &AnalysisPayload) -> Result<AnalysisResponse> {
            Err(MapError::HttpStatus(503))
        }
    }

    fn orchestrator() -> ViewOrchestrator {
        let config = ViewerConfig::default().with_timing(RequestTiming::for_testing());
        ViewOrchestrator::new(
            config,
            SurfaceManager::new(),
            Arc::new(EmptySource),
            Arc::new(FailingAnalysis),
        )
    }

    #[test]
    fn test_inputs_before_mount_are_deferred() {
        let mut view = orchestrator();
        view.set_raster_descriptor(Some(RasterDescriptor::new("raster_work", "priority_map")));

        assert!(view.surface().active_layer(LayerRole::Raster).is_none());
        assert!(view.snapshot().legend.visible);
    }

    #[tokio::test]
    async fn test_mount_attaches_deferred_raster() {
        let mut view = orchestrator();
        view.set_raster_descriptor(Some(RasterDescriptor::new("raster_work", "priority_map")));
        view.mount("map");

        let layer = view.surface().active_layer(LayerRole::Raster).unwrap();
        assert_eq!(layer.spec.as_raster().unwrap().layer_identifier, "priority_map");
    }

    #[tokio::test]
    async fn test_unknown_basemap_reported() {
        let mut view = orchestrator();
        view.mount("map");

        assert!(!view.set_base_layer("mars"));
        assert!(view.snapshot().error.unwrap().contains("mars"));
        assert!(view.set_base_layer("satellite"));
    }

    #[tokio::test]
    async fn test_empty_selection_resets_flag() {
        let mut view = orchestrator();
        view.mount("map");

        assert_eq!(view.request_analysis(), TriggerOutcome::EmptySelection);
        let snapshot = view.snapshot();
        assert!(!snapshot.analysis_requested);
        assert!(snapshot.error.is_some());
        assert!(!view.is_busy());
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let mut view = orchestrator();
        view.mount("map");
        view.set_selection(vec![WeightedCriterion::new("STP_Population_Density_Raster", 26.8)]);
        view.request_analysis();
        view.run_until_idle().await;

        let snapshot = view.snapshot();
        assert!(!snapshot.analysis_requested);
        assert!(!snapshot.loading);
        assert!(snapshot
            .error
            .unwrap()
            .starts_with("Error communicating with analysis service"));
    }

    #[tokio::test]
    async fn test_legend_failure_for_current_url_only() {
        let mut view = orchestrator();
        view.mount("map");
        view.set_raster_descriptor(Some(RasterDescriptor::new("raster_work", "priority_map")));
        let url = view.snapshot().legend.url.unwrap();

        let sender = view.event_sender();
        events::deliver(
            &sender,
            ViewEvent::LegendFailed {
                url: "http://old/legend".into(),
                message: "404".into(),
            },
        );
        events::deliver(&sender, ViewEvent::LegendFailed { url, message: "timeout".into() });
        assert_eq!(view.pump(), 2);
        assert_eq!(view.pump(), 0);

        let snapshot = view.snapshot();
        assert_eq!(snapshot.legend.warning.as_deref(), Some("timeout"));
        assert!(snapshot.error.is_none());
        assert!(view.surface().active_layer(LayerRole::Raster).is_some());
    }
}
