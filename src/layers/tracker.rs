use crate::layers::base::LayerRole;
use serde::{Deserialize, Serialize};

/// Number of features loaded per vector role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCounts {
    pub primary: usize,
    pub secondary: usize,
}

/// Per-role loading and error state.
///
/// The aggregate busy flag is recomputed on every mutation and can only change
/// through the per-role setters. The base role never loads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadingTracker {
    primary_loading: bool,
    secondary_loading: bool,
    raster_loading: bool,
    any_loading: bool,
    feature_counts: FeatureCounts,
    primary_error: Option<String>,
    secondary_error: Option<String>,
    last_error: Option<String>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_loading(&mut self, role: LayerRole, loading: bool) {
        match role {
            LayerRole::Primary => self.primary_loading = loading,
            LayerRole::Secondary => self.secondary_loading = loading,
            LayerRole::Raster => self.raster_loading = loading,
            LayerRole::Base => {
                log::trace!("ignoring loading flag for base role");
                return;
            }
        }
        self.any_loading = self.primary_loading || self.secondary_loading || self.raster_loading;
    }

    pub fn loading(&self, role: LayerRole) -> bool {
        match role {
            LayerRole::Primary => self.primary_loading,
            LayerRole::Secondary => self.secondary_loading,
            LayerRole::Raster => self.raster_loading,
            LayerRole::Base => false,
        }
    }

    pub fn is_any_loading(&self) -> bool {
        self.any_loading
    }

    /// Records or clears the error of a role. Vector errors stay scoped to
    /// their role and also become the most recent error; raster errors are global.
    pub fn set_error(&mut self, role: LayerRole, message: Option<String>) {
        match role {
            LayerRole::Primary => self.primary_error = message.clone(),
            LayerRole::Secondary => self.secondary_error = message.clone(),
            LayerRole::Raster | LayerRole::Base => {}
        }
        if message.is_some() {
            self.last_error = message;
        }
    }

    /// Sets the global error shown to the user
    pub fn set_global_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn layer_error(&self, role: LayerRole) -> Option<&str> {
        match role {
            LayerRole::Primary => self.primary_error.as_deref(),
            LayerRole::Secondary => self.secondary_error.as_deref(),
            _ => None,
        }
    }

    /// Role-scoped errors currently recorded
    pub fn layer_errors(&self) -> Vec<(LayerRole, String)> {
        [LayerRole::Primary, LayerRole::Secondary]
            .into_iter()
            .filter_map(|role| self.layer_error(role).map(|e| (role, e.to_string())))
            .collect()
    }

    pub fn set_feature_count(&mut self, role: LayerRole, count: usize) {
        match role {
            LayerRole::Primary => self.feature_counts.primary = count,
            LayerRole::Secondary => self.feature_counts.secondary = count,
            _ => log::trace!("{} role has no feature count", role),
        }
    }

    pub fn feature_counts(&self) -> FeatureCounts {
        self.feature_counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_follows_roles() {
        let mut tracker = LoadingTracker::new();
        assert!(!tracker.is_any_loading());

        tracker.set_loading(LayerRole::Primary, true);
        tracker.set_loading(LayerRole::Raster, true);
        assert!(tracker.is_any_loading());

        tracker.set_loading(LayerRole::Primary, false);
        assert!(tracker.is_any_loading(), "raster still loading");

        tracker.set_loading(LayerRole::Raster, false);
        assert!(!tracker.is_any_loading());
    }

    #[test]
    fn test_aggregate_exhaustive() {
        for mask in 0u8..8 {
            let mut tracker = LoadingTracker::new();
            tracker.set_loading(LayerRole::Primary, mask & 1 != 0);
            tracker.set_loading(LayerRole::Secondary, mask & 2 != 0);
            tracker.set_loading(LayerRole::Raster, mask & 4 != 0);
            assert_eq!(tracker.is_any_loading(), mask != 0, "mask {mask:03b}");
        }
    }

    #[test]
    fn test_base_role_never_loads() {
        let mut tracker = LoadingTracker::new();
        tracker.set_loading(LayerRole::Base, true);
        assert!(!tracker.is_any_loading());
        assert!(!tracker.loading(LayerRole::Base));
    }

    #[test]
    fn test_errors_and_counts() {
        let mut tracker = LoadingTracker::new();
        tracker.set_error(LayerRole::Secondary, Some("HTTP status 500".into()));
        tracker.set_feature_count(LayerRole::Primary, 75);

        assert_eq!(tracker.last_error(), Some("HTTP status 500"));
        assert_eq!(tracker.layer_errors(), vec![(LayerRole::Secondary, "HTTP status 500".to_string())]);
        assert_eq!(tracker.feature_counts(), FeatureCounts { primary: 75, secondary: 0 });

        tracker.set_error(LayerRole::Secondary, None);
        assert!(tracker.layer_errors().is_empty());
        // Clearing a role error keeps the dismissible message until dismissed
        assert!(tracker.last_error().is_some());
        tracker.clear_error();
        assert!(tracker.last_error().is_none());
    }
}
