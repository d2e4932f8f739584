use crate::core::bounds::Bounds;
use crate::core::config::FitOptions;
use crate::core::geo::{LatLng, Point};
use crate::core::viewport::Viewport;
use crate::layers::base::{LayerId, LayerProperties, LayerRole};
use crate::layers::spec::LayerSpec;
use crate::prelude::HashMap;
use crate::sources::basemap::Basemap;
use crate::{MapError, Result};

/// Handle to the mounted map surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceHandle {
    target: String,
}

impl SurfaceHandle {
    /// The element (or window id) the surface is mounted on
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// A layer currently occupying a role
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveLayer {
    pub props: LayerProperties,
    pub spec: LayerSpec,
    /// Projected extent of the loaded data; `None` until it finishes loading
    pub extent: Option<Bounds>,
}

impl ActiveLayer {
    pub fn id(&self) -> LayerId {
        self.props.id
    }

    pub fn role(&self) -> LayerRole {
        self.props.role
    }
}

/// Capabilities the orchestrator needs from whatever renders the layer stack.
///
/// [`SurfaceManager`] is the in-process implementation; a renderer binding
/// wraps one and draws [`MapSurface::layers`] in order.
pub trait MapSurface: Send {
    /// Creates the viewport on `target`. A second call returns the existing handle.
    fn initialize(&mut self, target: &str, center: LatLng, zoom: f64) -> SurfaceHandle;

    fn is_initialized(&self) -> bool;

    /// Replaces whatever occupies `role` with `spec`, or clears the role when
    /// `spec` is `None`. Returns the identity of the newly attached layer.
    fn set_layer(&mut self, role: LayerRole, spec: Option<LayerSpec>) -> Result<Option<LayerId>>;

    /// Swaps the base tile source by catalog key
    fn set_base_layer(&mut self, key: &str) -> Result<()>;

    /// Animates the viewport to frame the loaded extent of `role`.
    /// Returns false when there is nothing finite to frame.
    fn fit_to_extent(&mut self, role: LayerRole, options: &FitOptions) -> bool;

    /// Sets the opacity percent of the layer in `role`, clamped to [0, 100].
    /// Returns the applied value, or `None` when the role is empty.
    fn set_opacity(&mut self, role: LayerRole, percent: i32) -> Option<u8>;

    /// Stores the loaded extent of a layer instance. Returns false if the
    /// instance is no longer attached.
    fn record_extent(&mut self, id: LayerId, extent: Option<Bounds>) -> bool;

    /// Whether `id` is still the layer occupying `role`
    fn is_attached(&self, role: LayerRole, id: LayerId) -> bool;

    fn active_layer(&self, role: LayerRole) -> Option<&ActiveLayer>;

    /// Active layers in paint order
    fn layers(&self) -> Vec<&ActiveLayer>;

    fn viewport(&self) -> Option<&Viewport>;

    /// Releases the viewport and every layer
    fn teardown(&mut self);
}

/// Owns the viewport and the role-keyed layer stack
#[derive(Debug)]
pub struct SurfaceManager {
    handle: Option<SurfaceHandle>,
    viewport: Option<Viewport>,
    /// Active layers indexed by role
    layers: HashMap<LayerRole, ActiveLayer>,
    /// Roles in paint order (sorted by z-index)
    render_order: Vec<LayerRole>,
    next_layer_id: u64,
    viewport_size: Point,
    initial_basemap: String,
}

impl SurfaceManager {
    pub fn new() -> Self {
        Self {
            handle: None,
            viewport: None,
            layers: HashMap::default(),
            render_order: Vec::new(),
            next_layer_id: 1,
            viewport_size: Point::new(800.0, 600.0),
            initial_basemap: "osm".to_string(),
        }
    }

    /// Pixel size of the viewport created by `initialize`
    pub fn with_viewport_size(mut self, width: f64, height: f64) -> Self {
        self.viewport_size = Point::new(width, height);
        self
    }

    /// Basemap attached by `initialize`
    pub fn with_basemap(mut self, key: impl Into<String>) -> Self {
        self.initial_basemap = key.into();
        self
    }

    pub fn handle(&self) -> Option<&SurfaceHandle> {
        self.handle.as_ref()
    }

    pub fn viewport_mut(&mut self) -> Option<&mut Viewport> {
        self.viewport.as_mut()
    }

    /// Number of active layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Roles in paint order
    pub fn render_order(&self) -> &[LayerRole] {
        &self.render_order
    }

    fn allocate_id(&mut self) -> LayerId {
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;
        id
    }

    fn remove_role(&mut self, role: LayerRole) -> Option<ActiveLayer> {
        self.render_order.retain(|r| *r != role);
        let removed = self.layers.remove(&role);
        if let Some(layer) = &removed {
            log::debug!("removed {} from {} role", layer.id(), role);
        }
        removed
    }

    fn insert_role(&mut self, layer: ActiveLayer) {
        let role = layer.role();
        let z_index = layer.props.z_index;
        self.layers.insert(role, layer);

        // Insert in sorted order by z-index
        let insert_pos = self
            .render_order
            .iter()
            .position(|r| {
                self.layers
                    .get(r)
                    .map(|l| l.props.z_index > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());
        self.render_order.insert(insert_pos, role);
    }

    fn attach(&mut self, role: LayerRole, spec: LayerSpec) -> LayerId {
        let id = self.allocate_id();
        let mut props = LayerProperties::new(id, role, spec.display_name());
        if let LayerSpec::Raster(raster) = &spec {
            props.set_opacity_percent(i32::from(raster.opacity));
        }
        self.insert_role(ActiveLayer {
            props,
            spec,
            extent: None,
        });
        log::debug!("attached {} to {} role", id, role);
        id
    }
}

impl Default for SurfaceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MapSurface for SurfaceManager {
    fn initialize(&mut self, target: &str, center: LatLng, zoom: f64) -> SurfaceHandle {
        if let Some(handle) = &self.handle {
            log::debug!("surface already mounted on '{}'", handle.target);
            return handle.clone();
        }

        let handle = SurfaceHandle {
            target: target.to_string(),
        };
        self.viewport = Some(Viewport::new(center, zoom, self.viewport_size));
        self.handle = Some(handle.clone());

        let key = self.initial_basemap.clone();
        let basemap = Basemap::from_key(&key).unwrap_or_else(|| {
            log::warn!("unknown basemap '{}', using OpenStreetMap", key);
            Basemap::openstreetmap()
        });
        self.attach(LayerRole::Base, LayerSpec::Base(basemap));

        log::info!("map surface mounted on '{}'", target);
        handle
    }

    fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    fn set_layer(&mut self, role: LayerRole, spec: Option<LayerSpec>) -> Result<Option<LayerId>> {
        if !self.is_initialized() {
            log::warn!("set_layer({}) on an unmounted surface", role);
            return Err(MapError::Layer(format!(
                "cannot set {role} layer: surface not initialized"
            )));
        }

        if let Some(spec) = &spec {
            if !spec.fits_role(role) {
                return Err(MapError::Layer(format!(
                    "{} cannot occupy the {role} role",
                    spec.display_name()
                )));
            }
        }

        // Replace before create so a role never holds two instances
        self.remove_role(role);

        Ok(spec.map(|spec| self.attach(role, spec)))
    }

    fn set_base_layer(&mut self, key: &str) -> Result<()> {
        let basemap = Basemap::from_key(key)
            .ok_or_else(|| MapError::Layer(format!("unknown basemap '{key}'")))?;

        if !self.is_initialized() {
            log::warn!("set_base_layer('{}') on an unmounted surface", key);
            self.initial_basemap = key.to_string();
            return Ok(());
        }

        self.set_layer(LayerRole::Base, Some(LayerSpec::Base(basemap)))?;
        log::info!("basemap switched to '{}'", key);
        Ok(())
    }

    fn fit_to_extent(&mut self, role: LayerRole, options: &FitOptions) -> bool {
        let Some(extent) = self.layers.get(&role).and_then(|l| l.extent) else {
            return false;
        };
        if !extent.is_finite() || !extent.is_valid() {
            log::debug!("skipping fit for {}: degenerate extent", role);
            return false;
        }
        let Some(viewport) = self.viewport.as_mut() else {
            return false;
        };

        let bounds = extent.to_lat_lng_bounds();
        viewport.animate_fit(&bounds, options.padding, options.duration());
        true
    }

    fn set_opacity(&mut self, role: LayerRole, percent: i32) -> Option<u8> {
        let layer = self.layers.get_mut(&role)?;
        let applied = layer.props.set_opacity_percent(percent);
        if let LayerSpec::Raster(raster) = &mut layer.spec {
            raster.opacity = applied;
        }
        Some(applied)
    }

    fn record_extent(&mut self, id: LayerId, extent: Option<Bounds>) -> bool {
        match self.layers.values_mut().find(|l| l.id() == id) {
            Some(layer) => {
                layer.extent = extent;
                true
            }
            None => false,
        }
    }

    fn is_attached(&self, role: LayerRole, id: LayerId) -> bool {
        self.layers.get(&role).map(|l| l.id() == id).unwrap_or(false)
    }

    fn active_layer(&self, role: LayerRole) -> Option<&ActiveLayer> {
        self.layers.get(&role)
    }

    fn layers(&self) -> Vec<&ActiveLayer> {
        self.render_order
            .iter()
            .filter_map(|role| self.layers.get(role))
            .collect()
    }

    fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    fn teardown(&mut self) {
        if self.handle.is_none() {
            return;
        }
        self.layers.clear();
        self.render_order.clear();
        self.viewport = None;
        if let Some(handle) = self.handle.take() {
            log::info!("map surface on '{}' torn down", handle.target);
        }
    }
}
