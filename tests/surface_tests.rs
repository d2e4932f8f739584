#[cfg(test)]
mod surface_tests {
    use suitmap::prelude::*;

    fn mounted() -> SurfaceManager {
        let mut surface = SurfaceManager::new().with_viewport_size(1024.0, 768.0);
        surface.initialize("map", LatLng::new(20.5937, 78.9629), 6.0);
        surface
    }

    fn districts_spec(name: &str) -> LayerSpec {
        let url = build_vector_request("http://localhost:9090/geoserver", "stp_vector", name, None, None);
        LayerSpec::Vector(VectorLayerSpec::new(LayerRole::Primary, name, url))
    }

    fn raster_spec() -> LayerSpec {
        let request = build_raster_request(
            "http://localhost:9090/geoserver/wms",
            Some("raster_work"),
            Some("priority_map"),
            &RasterDefaults::default(),
        );
        LayerSpec::Raster(RasterLayerSpec::from_request(&request, 100))
    }

    #[test]
    fn test_double_set_layer_leaves_one_instance() {
        let mut surface = mounted();
        surface.set_layer(LayerRole::Primary, Some(districts_spec("a"))).unwrap();
        surface.set_layer(LayerRole::Primary, Some(districts_spec("b"))).unwrap();

        let primaries: Vec<_> = surface
            .layers()
            .into_iter()
            .filter(|l| l.role() == LayerRole::Primary)
            .collect();
        assert_eq!(primaries.len(), 1);
        assert_eq!(primaries[0].props.name, "b");
    }

    #[test]
    fn test_clearing_empty_role_is_harmless() {
        let mut surface = mounted();
        assert_eq!(surface.set_layer(LayerRole::Secondary, None).unwrap(), None);
        assert_eq!(surface.len(), 1);
    }

    #[test]
    fn test_base_swap_preserves_stack() {
        let mut surface = mounted();
        surface.set_layer(LayerRole::Raster, Some(raster_spec())).unwrap();
        surface.set_layer(LayerRole::Primary, Some(districts_spec("d"))).unwrap();
        let raster_id = surface.active_layer(LayerRole::Raster).unwrap().id();

        surface.set_base_layer("light").unwrap();

        let roles: Vec<_> = surface.layers().iter().map(|l| l.role()).collect();
        assert_eq!(roles, [LayerRole::Base, LayerRole::Primary, LayerRole::Raster]);
        assert!(surface.is_attached(LayerRole::Raster, raster_id));
        match &surface.active_layer(LayerRole::Base).unwrap().spec {
            LayerSpec::Base(basemap) => assert_eq!(basemap.key, "light"),
            other => panic!("unexpected base spec {other:?}"),
        }
    }

    #[test]
    fn test_unknown_basemap_leaves_map_unchanged() {
        let mut surface = mounted();
        let base_id = surface.active_layer(LayerRole::Base).unwrap().id();

        assert!(matches!(surface.set_base_layer("mars"), Err(MapError::Layer(_))));
        assert!(surface.is_attached(LayerRole::Base, base_id));
    }

    #[test]
    fn test_degenerate_extent_is_noop() {
        let mut surface = mounted();
        let options = FitOptions::default();
        let id = surface
            .set_layer(LayerRole::Primary, Some(districts_spec("d")))
            .unwrap()
            .unwrap();

        surface.record_extent(id, Some(Bounds::empty()));
        assert!(!surface.fit_to_extent(LayerRole::Primary, &options));

        surface.record_extent(id, Some(Bounds::from_coords(f64::NAN, 0.0, 1.0, 1.0)));
        assert!(!surface.fit_to_extent(LayerRole::Primary, &options));

        surface.record_extent(id, None);
        assert!(!surface.fit_to_extent(LayerRole::Primary, &options));

        assert!(surface.viewport().unwrap().transition().is_none());
        assert_eq!(surface.viewport().unwrap().zoom, 6.0);
    }

    #[test]
    fn test_opacity_only_touches_requested_role() {
        let mut surface = mounted();
        surface.set_layer(LayerRole::Primary, Some(districts_spec("d"))).unwrap();
        surface.set_layer(LayerRole::Raster, Some(raster_spec())).unwrap();

        assert_eq!(surface.set_opacity(LayerRole::Raster, -10), Some(0));
        assert_eq!(surface.set_opacity(LayerRole::Raster, 150), Some(100));
        assert_eq!(surface.set_opacity(LayerRole::Raster, 25), Some(25));

        let primary = surface.active_layer(LayerRole::Primary).unwrap();
        assert_eq!(primary.props.opacity_percent(), 100);
    }

    #[test]
    fn test_operations_after_teardown() {
        let mut surface = mounted();
        surface.teardown();

        assert!(surface.set_layer(LayerRole::Raster, Some(raster_spec())).is_err());
        assert_eq!(surface.set_opacity(LayerRole::Raster, 50), None);
        assert!(surface.layers().is_empty());

        // Remounting starts from a clean stack
        let handle = surface.initialize("map-2", LatLng::new(0.0, 0.0), 3.0);
        assert_eq!(handle.target(), "map-2");
        assert_eq!(surface.len(), 1);
    }
}
