use geoutils::Location;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle (haversine) distance in kilometers.
///
/// The operands are ordered before evaluation so the result is bitwise
/// identical regardless of argument order, and the intermediate term is
/// clamped to `[0, 1]` as rounding can push it just outside that range for
/// near-identical or antipodal points.
pub fn distance_km(from: &Location, to: &Location) -> f64 {
    let (a, b) = if (from.latitude(), from.longitude()) <= (to.latitude(), to.longitude()) {
        (from, to)
    } else {
        (to, from)
    };

    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Pairwise distances over two aligned sequences, truncated to the shorter one.
pub fn distances_km(from: &[Location], to: &[Location]) -> Vec<f64> {
    from.iter()
        .zip(to)
        .map(|(a, b)| distance_km(a, b))
        .collect()
}
