//! Links to the external map service for a project's site.
//!
//! Geocoding and rendering stay with the map service; this module only builds
//! the URL that opens a satellite view of the project.

use crate::domain::Project;

const MAPS_VIEW_URL: &str = "https://www.google.com/maps/@?api=1&map_action=map";
const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1";

/// San Francisco, shown when a project has neither coordinates nor an address.
pub const DEFAULT_CENTER: (f64, f64) = (37.7749, -122.4194);
pub const DEFAULT_ZOOM: u8 = 18;

/// Satellite view centered on the project's coordinates when it has any,
/// otherwise a search for its address, otherwise the default center.
pub fn satellite_view_url(project: &Project) -> String {
    if project.has_coordinates() {
        return centered_url(project.latitude, project.longitude);
    }

    let address = if project.has_location() {
        Some(project.location.trim())
    } else {
        Some(project.description.trim()).filter(|text| !text.is_empty())
    };

    // The search endpoint takes no basemap parameter, so an address-only
    // project opens in the default layer; satellite needs coordinates.
    match address {
        Some(address) => format!(
            "{MAPS_SEARCH_URL}&query={}",
            urlencoding::encode(address)
        ),
        None => centered_url(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
    }
}

fn centered_url(latitude: f64, longitude: f64) -> String {
    format!("{MAPS_VIEW_URL}&center={latitude},{longitude}&zoom={DEFAULT_ZOOM}&basemap=satellite")
}
