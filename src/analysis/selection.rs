use crate::analysis::payload::{AnalysisPayload, WeightedCriterion};
use serde::{Deserialize, Serialize};

/// Anything that can report the current weighted selection
pub trait SelectionStore {
    fn selection(&self) -> Vec<WeightedCriterion>;

    fn payload(&self) -> AnalysisPayload {
        AnalysisPayload::new(self.selection())
    }
}

/// A criterion raster the analysis service knows about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub raster_name: String,
    pub default_weight: f64,
}

impl Category {
    pub fn new(id: u32, name: &str, raster_name: &str, default_weight: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            raster_name: raster_name.to_string(),
            default_weight,
        }
    }
}

/// Ordered list of selectable categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Sewage treatment plant siting criteria
    pub fn stp_priority() -> Self {
        Self::new(vec![
            Category::new(1, "Proximity to Critical River Stretches", "STP_River_Stretches_Raster", 29.3),
            Category::new(2, "Population Density", "STP_Population_Density_Raster", 26.8),
            Category::new(3, "Distance from Drainage Network", "STP_Drainage_Network_Raster", 16.6),
            Category::new(4, "Buffer of the Drain Outlet based on their flow", "STP_Drain_Outlet_Raster", 9.4),
            Category::new(5, "Land Availability", "STP_Land_Availability_Raster", 6.8),
            Category::new(6, "Ground Quality", "STP_Ground_Quality_Raster", 5.9),
            Category::new(7, "GroundWater Depth", "STP_GroundWater_Depth_Raster", 5.2),
        ])
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, raster_name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.raster_name == raster_name)
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::stp_priority()
    }
}

/// The user's current picks from a catalog.
///
/// Only catalogued raster names can be selected; weights are kept in [0, 100].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySelection {
    catalog: CategoryCatalog,
    selected: Vec<WeightedCriterion>,
}

impl CategorySelection {
    pub fn new(catalog: CategoryCatalog) -> Self {
        Self {
            catalog,
            selected: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// Selects with the default weight, or deselects. Returns whether it is now selected.
    pub fn toggle(&mut self, raster_name: &str) -> bool {
        if self.is_selected(raster_name) {
            self.selected.retain(|c| c.raster_name != raster_name);
            return false;
        }
        match self.catalog.get(raster_name) {
            Some(category) => {
                self.selected
                    .push(WeightedCriterion::new(raster_name, category.default_weight));
                true
            }
            None => {
                log::warn!("ignoring unknown category '{}'", raster_name);
                false
            }
        }
    }

    /// Sets a weight, selecting the category if needed. Returns the applied weight.
    pub fn set_weight(&mut self, raster_name: &str, weight: f64) -> Option<f64> {
        self.catalog.get(raster_name)?;
        let weight = if weight.is_nan() { 0.0 } else { weight.clamp(0.0, 100.0) };

        match self.selected.iter_mut().find(|c| c.raster_name == raster_name) {
            Some(criterion) => criterion.weight = weight,
            None => self.selected.push(WeightedCriterion::new(raster_name, weight)),
        }
        Some(weight)
    }

    pub fn select_all(&mut self) {
        self.selected = self
            .catalog
            .categories()
            .iter()
            .map(|c| WeightedCriterion::new(c.raster_name.clone(), c.default_weight))
            .collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, raster_name: &str) -> bool {
        self.selected.iter().any(|c| c.raster_name == raster_name)
    }

    /// Current weight, or the default weight when not selected
    pub fn weight_of(&self, raster_name: &str) -> Option<f64> {
        self.selected
            .iter()
            .find(|c| c.raster_name == raster_name)
            .map(|c| c.weight)
            .or_else(|| self.catalog.get(raster_name).map(|c| c.default_weight))
    }

    pub fn total_weight(&self) -> f64 {
        self.selected.iter().map(|c| c.weight).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

impl SelectionStore for CategorySelection {
    /// Selected criteria in catalog order
    fn selection(&self) -> Vec<WeightedCriterion> {
        self.catalog
            .categories()
            .iter()
            .filter_map(|category| {
                self.selected
                    .iter()
                    .find(|c| c.raster_name == category.raster_name)
                    .cloned()
            })
            .collect()
    }
}

impl SelectionStore for Vec<WeightedCriterion> {
    fn selection(&self) -> Vec<WeightedCriterion> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIVER: &str = "STP_River_Stretches_Raster";
    const DEPTH: &str = "STP_GroundWater_Depth_Raster";

    #[test]
    fn test_toggle_uses_default_weight() {
        let mut selection = CategorySelection::default();
        assert!(selection.toggle(RIVER));
        assert_eq!(selection.weight_of(RIVER), Some(29.3));

        assert!(!selection.toggle(RIVER));
        assert!(selection.is_empty());

        assert!(!selection.toggle("Unknown_Raster"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_set_weight_clamps_and_selects() {
        let mut selection = CategorySelection::default();
        assert_eq!(selection.set_weight(DEPTH, 140.0), Some(100.0));
        assert!(selection.is_selected(DEPTH));
        assert_eq!(selection.set_weight(DEPTH, -3.0), Some(0.0));
        assert_eq!(selection.set_weight("nope", 10.0), None);
    }

    #[test]
    fn test_payload_in_catalog_order() {
        let mut selection = CategorySelection::default();
        selection.set_weight(DEPTH, 70.0);
        selection.set_weight(RIVER, 30.0);

        let names: Vec<_> = selection.selection().into_iter().map(|c| c.raster_name).collect();
        assert_eq!(names, [RIVER, DEPTH]);
        assert_eq!(selection.total_weight(), 100.0);
    }

    #[test]
    fn test_select_all_totals_hundred() {
        let mut selection = CategorySelection::default();
        selection.select_all();
        assert_eq!(selection.payload().data.len(), 7);
        assert!((selection.total_weight() - 100.0).abs() < 1e-9);

        selection.clear();
        assert!(selection.payload().is_empty());
    }
}
