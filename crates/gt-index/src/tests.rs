//! Unit tests for gt-index.
//!
//! Most tests use the unit root box lat 0..1, lon -1..0 so expected tile
//! bounds are exact binary fractions.

#[cfg(test)]
mod helpers {
    use gt_core::{GeoBox, GeoPoint};
    use rand::rngs::SmallRng;
    use rand::Rng;

    use crate::QuadTree;

    pub fn unit_root() -> GeoBox {
        GeoBox::from_edges(1.0, -1.0, 0.0, 0.0)
    }

    pub fn unit_tree() -> QuadTree {
        QuadTree::build(unit_root(), 256, 7).unwrap()
    }

    /// Random well-formed box that may hang over (or miss) the unit root.
    pub fn random_query(rng: &mut SmallRng) -> GeoBox {
        let (a, b) = distinct_pair(rng, -0.5, 1.5);
        let (c, d) = distinct_pair(rng, -1.5, 0.5);
        GeoBox::new(GeoPoint::new(a.max(b), c.min(d)), GeoPoint::new(a.min(b), c.max(d)))
    }

    fn distinct_pair(rng: &mut SmallRng, lo: f64, hi: f64) -> (f64, f64) {
        loop {
            let x = rng.gen_range(lo..hi);
            let y = rng.gen_range(lo..hi);
            if (x - y).abs() > 1e-6 {
                return (x, y);
            }
        }
    }
}

// ── TileId ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tile_id {
    use crate::{IndexError, Quadrant, TileId};

    #[test]
    fn root_children_drop_leading_zero() {
        let root = TileId::root();
        assert_eq!(root.depth(), 0);
        assert_eq!(root.child(Quadrant::Nw).as_str(), "1");
        assert_eq!(root.child(Quadrant::Se).as_str(), "4");
        assert_eq!(root.child(Quadrant::Ne).child(Quadrant::Sw).as_str(), "23");
    }

    #[test]
    fn depth_is_digit_count() {
        let id: TileId = "1432".parse().unwrap();
        assert_eq!(id.depth(), 4);
    }

    #[test]
    fn parent_chain_reaches_root() {
        let id: TileId = "312".parse().unwrap();
        assert_eq!(id.parent().unwrap().as_str(), "31");
        assert_eq!("3".parse::<TileId>().unwrap().parent(), Some(TileId::root()));
        assert_eq!(TileId::root().parent(), None);
    }

    #[test]
    fn rejects_bad_digits() {
        for bad in ["", "05", "15", "a", "00"] {
            assert!(
                matches!(bad.parse::<TileId>(), Err(IndexError::InvalidTileId(_))),
                "{bad:?} accepted"
            );
        }
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod build {
    use gt_core::{GeoBox, MapConfig};

    use crate::{IndexError, QuadTree, TileId};

    #[test]
    fn full_tree_size() {
        let tree = super::helpers::unit_tree();
        // 1 + 4 + 16 + … + 4^7
        assert_eq!(tree.len(), 21_845);
        assert_eq!(tree.nodes_at_depth(7).count(), 16_384);
        assert_eq!(tree.root().id, TileId::root());
    }

    #[test]
    fn leaves_only_at_max_depth() {
        let tree = super::helpers::unit_tree();
        for depth in 0..=7 {
            for n in tree.nodes_at_depth(depth) {
                assert_eq!(n.is_leaf(), depth == 7, "tile {}", n.id);
                assert_eq!(n.id.depth(), depth);
            }
        }
    }

    #[test]
    fn children_partition_parent() {
        let tree = super::helpers::unit_tree();
        let root = tree.root();
        let kids: Vec<_> = tree.children(root).collect();
        let ids: Vec<_> = kids.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4"]);
        assert_eq!(kids[0].bounds, GeoBox::from_edges(1.0, -1.0, 0.5, -0.5));
        assert_eq!(kids[3].bounds, GeoBox::from_edges(0.5, -0.5, 0.0, 0.0));

        let n = tree.get(&"24".parse().unwrap()).unwrap();
        assert_eq!(n.bounds, GeoBox::from_edges(0.75, -0.25, 0.5, 0.0));
    }

    #[test]
    fn node_dpp_matches_depth_resolution() {
        let tree = super::helpers::unit_tree();
        for depth in 1..=7 {
            let expected = tree.resolution_at(depth);
            for n in tree.nodes_at_depth(depth).take(8) {
                assert!((n.dpp - expected).abs() < 1e-15);
            }
        }
        assert_eq!(tree.resolution_at(1), 1.0 / 512.0);
    }

    #[test]
    fn build_is_idempotent() {
        let a = super::helpers::unit_tree();
        let b = super::helpers::unit_tree();
        assert_eq!(a.len(), b.len());
        for depth in 0..=7 {
            for (x, y) in a.nodes_at_depth(depth).zip(b.nodes_at_depth(depth)) {
                assert_eq!(x.id, y.id);
                assert_eq!(x.bounds, y.bounds);
                assert_eq!(b.get(&x.id).map(|n| n.bounds), Some(x.bounds));
            }
        }
    }

    #[test]
    fn from_default_config() {
        let tree = QuadTree::from_config(&MapConfig::default()).unwrap();
        assert_eq!(tree.max_depth(), 7);
        assert_eq!(tree.tile_size(), 256);
    }

    #[test]
    fn rejects_bad_inputs() {
        let inverted = GeoBox::from_edges(0.0, 0.0, 1.0, -1.0);
        assert!(matches!(QuadTree::build(inverted, 256, 7), Err(IndexError::InvalidBounds(_))));
        let root = super::helpers::unit_root();
        assert!(matches!(QuadTree::build(root, 0, 7), Err(IndexError::InvalidConfig(_))));
        assert!(matches!(QuadTree::build(root, 256, 0), Err(IndexError::InvalidConfig(_))));
        assert!(matches!(QuadTree::build(root, 256, 11), Err(IndexError::InvalidConfig(_))));
    }
}

// ── Depth selection ───────────────────────────────────────────────────────────

#[cfg(test)]
mod depth {
    use gt_core::GeoBox;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn full_root_at_one_tile_width_is_depth_one() {
        let tree = super::helpers::unit_tree();
        assert_eq!(tree.depth_for(&super::helpers::unit_root(), 256), 1);
    }

    #[test]
    fn finer_query_goes_deeper() {
        let tree = super::helpers::unit_tree();
        // 1/8 degree over 256 px needs 1/2048 dpp → depth 3.
        let q = GeoBox::from_edges(0.5, -0.5, 0.375, -0.375);
        assert_eq!(tree.depth_for(&q, 256), 3);
    }

    #[test]
    fn capped_at_max_depth() {
        let tree = super::helpers::unit_tree();
        let tiny = GeoBox::from_edges(0.5001, -0.5, 0.5, -0.4999);
        assert_eq!(tree.depth_for(&tiny, 4096), 7);
    }

    #[test]
    fn monotone_in_viewport_width() {
        let tree = super::helpers::unit_tree();
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let q = super::helpers::random_query(&mut rng);
            let mut prev = 1;
            for w in (0..16).map(|s| 1u32 << s) {
                let d = tree.depth_for(&q, w);
                assert!((1..=7).contains(&d), "depth {d} out of range");
                assert!(d >= prev, "depth fell from {prev} to {d} at width {w}");
                prev = d;
            }
        }
    }
}

// ── Selection ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod select {
    use gt_core::{GeoBox, GeoPoint};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use crate::IndexError;

    #[test]
    fn full_root_query() {
        let tree = super::helpers::unit_tree();
        let root = super::helpers::unit_root();
        let sel = tree.select(&root, 256).unwrap();
        assert_eq!(sel.depth, 1);
        let ids: Vec<_> = sel.tiles().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4"]);
        assert_eq!(sel.bounds(), Some(root));
        assert_eq!((sel.columns(), sel.rows()), (2, 2));
    }

    #[test]
    fn query_enclosed_by_one_tile() {
        // No tile corner lies inside the query; the query lies inside tile 1.
        let tree = super::helpers::unit_tree();
        let q = GeoBox::from_edges(0.8, -0.8, 0.7, -0.7);
        let sel = tree.select(&q, 1).unwrap();
        assert_eq!(sel.depth, 1);
        assert_eq!(sel.len(), 1);
        assert_eq!(sel.tiles()[0].id.as_str(), "1");
    }

    #[test]
    fn touching_edges_are_selected() {
        let tree = super::helpers::unit_tree();
        let nw = GeoBox::from_edges(1.0, -1.0, 0.5, -0.5);
        let sel = tree.select(&nw, 256).unwrap();
        assert_eq!(sel.depth, 1);
        assert_eq!(sel.len(), 4);
    }

    #[test]
    fn outside_root_is_empty() {
        let tree = super::helpers::unit_tree();
        let q = GeoBox::from_edges(5.0, 5.0, 4.0, 6.0);
        let sel = tree.select(&q, 512).unwrap();
        assert!(sel.is_empty());
        assert_eq!(sel.bounds(), None);
        assert_eq!((sel.columns(), sel.rows()), (0, 0));
    }

    #[test]
    fn invalid_inputs_rejected() {
        let tree = super::helpers::unit_tree();
        let inverted = GeoBox::from_edges(0.0, 0.0, 1.0, -1.0);
        assert!(matches!(tree.select(&inverted, 256), Err(IndexError::InvalidBounds(_))));
        let root = super::helpers::unit_root();
        assert!(matches!(tree.select(&root, 0), Err(IndexError::ZeroViewport)));
    }

    #[test]
    fn deep_selection_ids_have_depth_length() {
        let tree = super::helpers::unit_tree();
        let q = GeoBox::from_edges(0.51, -0.51, 0.49, -0.49);
        let sel = tree.select(&q, 2048).unwrap();
        assert_eq!(sel.depth, 7);
        assert!(sel.tiles().iter().all(|t| t.id.as_str().len() == 7));
        // The query straddles the root centre, so it touches all four quadrants.
        let first_digits: std::collections::HashSet<_> =
            sel.tiles().iter().map(|t| &t.id.as_str()[..1]).collect();
        assert_eq!(first_digits.len(), 4);
    }

    #[test]
    fn raster_order_and_full_grid() {
        let tree = super::helpers::unit_tree();
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..200 {
            let q = super::helpers::random_query(&mut rng);
            let sel = tree.select(&q, 800).unwrap();
            for pair in sel.tiles().windows(2) {
                let (a, b) = (pair[0].bounds.ul, pair[1].bounds.ul);
                assert!(
                    a.lat > b.lat || (a.lat == b.lat && a.lon < b.lon),
                    "{} before {}",
                    pair[0].id,
                    pair[1].id
                );
            }
            assert_eq!(sel.len(), sel.columns() * sel.rows());
        }
    }

    #[test]
    fn covers_query_within_root() {
        let tree = super::helpers::unit_tree();
        let root = super::helpers::unit_root();
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..200 {
            let q = super::helpers::random_query(&mut rng);
            let sel = tree.select(&q, 640).unwrap();
            let Some(region) = q.intersection(&root) else {
                assert!(sel.is_empty());
                continue;
            };
            // Sample an 11×11 grid over the covered region, edges included.
            for i in 0..=10 {
                for j in 0..=10 {
                    let p = GeoPoint::new(
                        (region.lr.lat + region.lat_span() * i as f64 / 10.0).min(region.ul.lat),
                        (region.ul.lon + region.lon_span() * j as f64 / 10.0).min(region.lr.lon),
                    );
                    assert!(
                        sel.tiles().iter().any(|t| t.bounds.contains(p)),
                        "{p} in {q} not covered"
                    );
                }
            }
            let agg = sel.bounds().unwrap();
            assert!(agg.contains_box(&region));
        }
    }
}
