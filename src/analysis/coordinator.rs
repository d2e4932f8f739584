use crate::analysis::payload::AnalysisPayload;
use crate::analysis::response::{AnalysisResponse, RasterDescriptor};
use crate::core::config::RasterDefaults;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Lifecycle of the most recent analysis attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// What a trigger did
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    /// A request should be sent with this payload
    Started(AnalysisPayload),
    /// Another attempt is still in flight; nothing is queued
    IgnoredInFlight,
    /// Nothing is selected; the attempt failed immediately
    EmptySelection,
}

/// How an in-flight attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Succeeded(RasterDescriptor),
    Failed(String),
}

/// Allows one analysis request in flight at a time.
///
/// ```text
/// Idle | Succeeded | Failed --trigger--> InFlight
/// InFlight --status "success"--> Succeeded
/// InFlight --other status / transport error--> Failed
/// InFlight --trigger--> InFlight (ignored)
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnalysisCoordinator {
    status: AnalysisStatus,
    attempts: u64,
    last_error: Option<String>,
}

impl AnalysisCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    pub fn is_in_flight(&self) -> bool {
        self.status == AnalysisStatus::InFlight
    }

    /// Attempts started so far
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn trigger(&mut self, payload: AnalysisPayload) -> TriggerOutcome {
        if self.is_in_flight() {
            log::debug!("analysis already in flight; ignoring trigger");
            return TriggerOutcome::IgnoredInFlight;
        }
        if payload.is_empty() {
            self.status = AnalysisStatus::Failed;
            self.last_error = Some("Select at least one category before running the analysis".into());
            return TriggerOutcome::EmptySelection;
        }

        self.status = AnalysisStatus::InFlight;
        self.attempts += 1;
        self.last_error = None;
        log::info!(
            "starting analysis #{} with {} criteria",
            self.attempts,
            payload.data.len()
        );
        TriggerOutcome::Started(payload)
    }

    /// Settles the in-flight attempt. Returns `None` when nothing was in flight.
    pub fn resolve(
        &mut self,
        result: Result<AnalysisResponse>,
        defaults: &RasterDefaults,
    ) -> Option<Resolution> {
        if !self.is_in_flight() {
            log::warn!("analysis result arrived with no attempt in flight; dropping it");
            return None;
        }

        let resolution = match result {
            Ok(response) => match (response.descriptor(defaults), response) {
                (Some(descriptor), _) => Resolution::Succeeded(descriptor),
                (None, AnalysisResponse::Failure { status }) => {
                    Resolution::Failed(format!("Analysis failed: {}", status))
                }
                (None, AnalysisResponse::Success { .. }) => {
                    Resolution::Failed("Analysis failed: no raster returned".into())
                }
            },
            Err(e) => Resolution::Failed(format!("Error communicating with analysis service: {}", e)),
        };

        match &resolution {
            Resolution::Succeeded(descriptor) => {
                self.status = AnalysisStatus::Succeeded;
                log::info!(
                    "analysis #{} produced {}:{}",
                    self.attempts,
                    descriptor.workspace,
                    descriptor.layer_identifier
                );
            }
            Resolution::Failed(message) => {
                self.status = AnalysisStatus::Failed;
                self.last_error = Some(message.clone());
                log::error!("analysis #{} failed: {}", self.attempts, message);
            }
        }
        Some(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::payload::WeightedCriterion;
    use crate::MapError;

    fn payload() -> AnalysisPayload {
        AnalysisPayload::new(vec![WeightedCriterion::new("STP_River_Stretches_Raster", 30.0)])
    }

    fn success() -> AnalysisResponse {
        AnalysisResponse::Success {
            layer_name: Some("priority_map".into()),
            layer_name_alt: None,
            id: None,
            workspace: Some("raster_work".into()),
        }
    }

    #[test]
    fn test_overlapping_trigger_ignored() {
        let mut coordinator = AnalysisCoordinator::new();
        assert!(matches!(coordinator.trigger(payload()), TriggerOutcome::Started(_)));
        assert_eq!(coordinator.trigger(payload()), TriggerOutcome::IgnoredInFlight);
        assert_eq!(coordinator.attempts(), 1);
    }

    #[test]
    fn test_success_then_retrigger() {
        let mut coordinator = AnalysisCoordinator::new();
        coordinator.trigger(payload());

        let resolution = coordinator.resolve(Ok(success()), &RasterDefaults::default());
        assert_eq!(
            resolution,
            Some(Resolution::Succeeded(RasterDescriptor::new("raster_work", "priority_map")))
        );
        assert_eq!(coordinator.status(), AnalysisStatus::Succeeded);

        assert!(matches!(coordinator.trigger(payload()), TriggerOutcome::Started(_)));
        assert_eq!(coordinator.attempts(), 2);
    }

    #[test]
    fn test_failures() {
        let mut coordinator = AnalysisCoordinator::new();
        coordinator.trigger(payload());
        let resolution = coordinator.resolve(
            Ok(AnalysisResponse::Failure { status: "error".into() }),
            &RasterDefaults::default(),
        );
        assert_eq!(resolution, Some(Resolution::Failed("Analysis failed: error".into())));
        assert_eq!(coordinator.status(), AnalysisStatus::Failed);

        coordinator.trigger(payload());
        let resolution = coordinator.resolve(Err(MapError::HttpStatus(502)), &RasterDefaults::default());
        match resolution {
            Some(Resolution::Failed(message)) => {
                assert!(message.starts_with("Error communicating with analysis service"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_resolve_without_flight_is_dropped() {
        let mut coordinator = AnalysisCoordinator::new();
        assert!(coordinator.resolve(Ok(success()), &RasterDefaults::default()).is_none());
        assert_eq!(coordinator.status(), AnalysisStatus::Idle);
    }

    #[test]
    fn test_empty_selection_fails_fast() {
        let mut coordinator = AnalysisCoordinator::new();
        assert_eq!(coordinator.trigger(AnalysisPayload::default()), TriggerOutcome::EmptySelection);
        assert_eq!(coordinator.status(), AnalysisStatus::Failed);
        assert!(coordinator.last_error().is_some());
    }
}
