//! Geographic coordinate types and planar helpers.
//!
//! Everything here works in raw degrees.  Routing and snapping use plain
//! Euclidean distance in lat/lon space ([`GeoPoint::euclidean`]); the
//! haversine distance is only used for human-facing route lengths.

/// A WGS-84 geographic coordinate stored as double-precision floats.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Straight-line distance in degrees, treating (lat, lon) as a plane.
    #[inline]
    pub fn euclidean(self, other: GeoPoint) -> f64 {
        self.euclidean_2(other).sqrt()
    }

    /// Squared form of [`euclidean`](Self::euclidean).
    #[inline]
    pub fn euclidean_2(self, other: GeoPoint) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        dlat * dlat + dlon * dlon
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── GeoBox ────────────────────────────────────────────────────────────────────

/// Axis-aligned geographic rectangle given by its upper-left (north-west) and
/// lower-right (south-east) corners.
///
/// Well-formed boxes have `ul.lat > lr.lat` and `ul.lon < lr.lon`; use
/// [`is_well_formed`](Self::is_well_formed) at trust boundaries.  All
/// containment tests treat edges as inside.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoBox {
    pub ul: GeoPoint,
    pub lr: GeoPoint,
}

impl GeoBox {
    #[inline]
    pub fn new(ul: GeoPoint, lr: GeoPoint) -> Self {
        Self { ul, lr }
    }

    /// Build from the four scalar edges in the order the request layer sends
    /// them: `ullat, ullon, lrlat, lrlon`.
    #[inline]
    pub fn from_edges(ullat: f64, ullon: f64, lrlat: f64, lrlon: f64) -> Self {
        Self::new(GeoPoint::new(ullat, ullon), GeoPoint::new(lrlat, lrlon))
    }

    /// Longitude span in degrees.
    #[inline]
    pub fn lon_span(&self) -> f64 {
        self.lr.lon - self.ul.lon
    }

    /// Latitude span in degrees.
    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.ul.lat - self.lr.lat
    }

    /// Finite corners with the upper-left strictly north-west of the
    /// lower-right.
    pub fn is_well_formed(&self) -> bool {
        self.ul.is_finite()
            && self.lr.is_finite()
            && self.ul.lat > self.lr.lat
            && self.ul.lon < self.lr.lon
    }

    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lon >= self.ul.lon && p.lon <= self.lr.lon && p.lat <= self.ul.lat && p.lat >= self.lr.lat
    }

    /// `true` if `other` lies entirely inside `self`.
    pub fn contains_box(&self, other: &GeoBox) -> bool {
        self.contains(other.ul) && self.contains(other.lr)
    }

    /// Closed-interval overlap on both axes.  Touching edges count.
    #[inline]
    pub fn intersects(&self, other: &GeoBox) -> bool {
        self.ul.lon <= other.lr.lon
            && other.ul.lon <= self.lr.lon
            && self.lr.lat <= other.ul.lat
            && other.lr.lat <= self.ul.lat
    }

    /// Overlapping region of two boxes, or `None` if they are disjoint.
    pub fn intersection(&self, other: &GeoBox) -> Option<GeoBox> {
        if !self.intersects(other) {
            return None;
        }
        Some(GeoBox::from_edges(
            self.ul.lat.min(other.ul.lat),
            self.ul.lon.max(other.ul.lon),
            self.lr.lat.max(other.lr.lat),
            self.lr.lon.min(other.lr.lon),
        ))
    }

    /// Corners in the order NW, NE, SW, SE.
    pub fn corners(&self) -> [GeoPoint; 4] {
        [
            self.ul,
            GeoPoint::new(self.ul.lat, self.lr.lon),
            GeoPoint::new(self.lr.lat, self.ul.lon),
            self.lr,
        ]
    }

    /// Midpoint of both ranges.
    #[inline]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.ul.lat + self.lr.lat) / 2.0,
            (self.ul.lon + self.lr.lon) / 2.0,
        )
    }

    /// Split into four equal quadrants, returned NW, NE, SW, SE.
    pub fn quadrants(&self) -> [GeoBox; 4] {
        let mid = self.center();
        [
            GeoBox::from_edges(self.ul.lat, self.ul.lon, mid.lat, mid.lon),
            GeoBox::from_edges(self.ul.lat, mid.lon, mid.lat, self.lr.lon),
            GeoBox::from_edges(mid.lat, self.ul.lon, self.lr.lat, mid.lon),
            GeoBox::from_edges(mid.lat, mid.lon, self.lr.lat, self.lr.lon),
        ]
    }
}

impl std::fmt::Display for GeoBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} – {}]", self.ul, self.lr)
    }
}
