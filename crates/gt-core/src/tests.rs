//! Unit tests for gt-core primitives.

#[cfg(test)]
mod ids {
    use crate::{NodeId, RawId, SessionId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(0) < NodeId(1));
        assert!(RawId(100) > RawId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(RawId::INVALID.0, u64::MAX);
        assert_eq!(SessionId::default(), SessionId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(RawId(7).to_string(), "raw#7");
        assert_eq!(NodeId(3).to_string(), "node#3");
        assert_eq!(SessionId(0).to_string(), "session#0");
    }

    #[test]
    fn validity() {
        assert!(NodeId(0).is_valid());
        assert!(!NodeId::default().is_valid());
    }
}

#[cfg(test)]
mod geo {
    use crate::{GeoBox, GeoPoint};

    fn unit_box() -> GeoBox {
        // lat 0..1, lon -1..0
        GeoBox::from_edges(1.0, -1.0, 0.0, 0.0)
    }

    #[test]
    fn euclidean_is_planar() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 1.0);
        assert!((a.euclidean(b) - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(a.euclidean_2(b), 2.0);
    }

    #[test]
    fn haversine_one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(37.0, -122.0);
        let b = GeoPoint::new(38.0, -122.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn spans_and_well_formedness() {
        let b = unit_box();
        assert_eq!(b.lon_span(), 1.0);
        assert_eq!(b.lat_span(), 1.0);
        assert!(b.is_well_formed());
        assert!(!GeoBox::from_edges(0.0, -1.0, 1.0, 0.0).is_well_formed());
        assert!(!GeoBox::from_edges(f64::NAN, -1.0, 0.0, 0.0).is_well_formed());
    }

    #[test]
    fn containment_includes_edges() {
        let b = unit_box();
        assert!(b.contains(GeoPoint::new(1.0, -1.0)));
        assert!(b.contains(GeoPoint::new(0.5, -0.5)));
        assert!(!b.contains(GeoPoint::new(1.01, -0.5)));
    }

    #[test]
    fn intersection_cross_shape() {
        // A wide, short strip crossing a tall, thin strip: neither has a
        // corner inside the other, but they overlap.
        let wide = GeoBox::from_edges(0.6, -1.0, 0.4, 0.0);
        let tall = GeoBox::from_edges(1.0, -0.6, 0.0, -0.4);
        assert!(wide.intersects(&tall));
        assert!(tall.intersects(&wide));
        let i = wide.intersection(&tall).unwrap();
        assert_eq!(i, GeoBox::from_edges(0.6, -0.6, 0.4, -0.4));
    }

    #[test]
    fn disjoint_boxes() {
        let a = unit_box();
        let b = GeoBox::from_edges(3.0, 2.0, 2.0, 3.0);
        assert!(!a.intersects(&b));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn quadrants_tile_the_parent() {
        let q = unit_box().quadrants();
        assert_eq!(q[0], GeoBox::from_edges(1.0, -1.0, 0.5, -0.5)); // NW
        assert_eq!(q[1], GeoBox::from_edges(1.0, -0.5, 0.5, 0.0));  // NE
        assert_eq!(q[2], GeoBox::from_edges(0.5, -1.0, 0.0, -0.5)); // SW
        assert_eq!(q[3], GeoBox::from_edges(0.5, -0.5, 0.0, 0.0));  // SE
        let parent = unit_box();
        assert!(q.iter().all(|c| parent.contains_box(c)));
    }

    #[test]
    fn corners_order() {
        let c = unit_box().corners();
        assert_eq!(c[1], GeoPoint::new(1.0, 0.0));
        assert_eq!(c[2], GeoPoint::new(0.0, -1.0));
    }
}

#[cfg(test)]
mod config {
    use crate::{CoreError, GeoBox, MapConfig};

    #[test]
    fn default_is_valid() {
        let c = MapConfig::default();
        c.validate().unwrap();
        assert_eq!(c.tile_size, 256);
        assert_eq!(c.max_depth, 7);
        assert_eq!(c.route_stroke.rgba, [108, 181, 230, 200]);
    }

    #[test]
    fn rejects_inverted_root() {
        let c = MapConfig {
            root_bounds: GeoBox::from_edges(0.0, 0.0, 1.0, -1.0),
            ..MapConfig::default()
        };
        assert!(matches!(c.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn rejects_depth_out_of_range() {
        for depth in [0u8, 11] {
            let c = MapConfig { max_depth: depth, ..MapConfig::default() };
            assert!(c.validate().is_err(), "depth {depth} accepted");
        }
    }

    #[test]
    fn rejects_zero_frontier() {
        let c = MapConfig { max_frontier: Some(0), ..MapConfig::default() };
        assert!(c.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_partial_override() {
        let json = r#"{ "tile_dir": "tiles", "max_depth": 5 }"#;
        let c = MapConfig::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(c.max_depth, 5);
        assert_eq!(c.tile_dir, std::path::PathBuf::from("tiles"));
        assert_eq!(c.tile_size, 256);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_invalid_is_parse_error() {
        let err = MapConfig::from_json_reader("{ not json".as_bytes()).unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));
    }
}
