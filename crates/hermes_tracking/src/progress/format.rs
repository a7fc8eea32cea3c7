use crate::meters::Meters;

const METERS_PER_MILE: f64 = 1609.344;
const METERS_PER_FOOT: f64 = 0.3048;

/// Formats a distance the way a US driver reads it, switching to feet under a quarter mile.
pub fn format_imperial(distance: Meters) -> String {
    let miles = distance.value() / METERS_PER_MILE;

    if miles >= 10.0 {
        format!("{miles:.0} mi")
    } else if miles >= 1.0 {
        format!("{miles:.1} mi")
    } else if miles >= 0.25 {
        format!("{miles:.2} mi")
    } else {
        format!("{:.0} ft", distance.value() / METERS_PER_FOOT)
    }
}
