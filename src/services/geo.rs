use crate::models::State;

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two points given in degrees
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // rounding can push `a` just outside [0, 1] near antipodes
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// The state itself followed by its bordering whitelisted states
pub fn neighbor_states(state: State) -> &'static [State] {
    use State::*;
    match state {
        AZ => &[AZ, NV],
        CA => &[CA],
        DE => &[DE, PA],
        FL => &[FL],
        ID => &[ID, NV],
        IL => &[IL, IN, MO],
        IN => &[IN, IL],
        LA => &[LA],
        MO => &[MO, TN, IL],
        NV => &[NV, AZ, ID],
        PA => &[PA, DE],
        TN => &[TN, MO],
    }
}
