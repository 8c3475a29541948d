//! # Heading Math
//!
//! Pure conversions from magnetic field components to a geographic heading
//! and its cardinal direction.

/// 16-point compass rose, clockwise from North in 22.5 degree steps
pub const CARDINALS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Compute the declination-corrected geographic heading
///
/// # Arguments
///
/// * `x` - Magnetic field component along the X axis
/// * `y` - Magnetic field component along the Y axis
/// * `declination_deg` - Magnetic declination at the survey location
///
/// # Returns
///
/// * `f64` - Heading in degrees, always within [0, 360)
pub fn compute_heading(x: f64, y: f64, declination_deg: f64) -> f64 {
    let deg = y.atan2(x).to_degrees() - declination_deg;
    let heading = deg.rem_euclid(360.0);
    // rem_euclid rounds a tiny negative input up to exactly 360.0
    if heading >= 360.0 {
        0.0
    } else {
        heading
    }
}

/// Map a heading to its cardinal direction label
///
/// Each label covers a 22.5 degree sector centered on its bearing; 360
/// folds back onto "N".
pub fn to_cardinal(degrees: f64) -> &'static str {
    let index = (degrees.rem_euclid(360.0) / 22.5).round() as usize % 16;
    CARDINALS[index]
}
