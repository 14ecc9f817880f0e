//! Transit sample-data collaborators
//!
//! Place lookup, route planning, and station accessibility all return
//! fixed-shape sample records: real GTFS/alert-feed integration sits
//! behind these interfaces.

use serde::Serialize;

// ============================================================
// Places
// ============================================================

/// A place the assistant knows how to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub display_name: &'static str,
}

const PLACES: &[Place] = &[
    Place { name: "union station", lat: 43.6452, lon: -79.3806, display_name: "Union Station, Toronto" },
    Place { name: "cn tower", lat: 43.6426, lon: -79.3871, display_name: "CN Tower, Toronto" },
    Place { name: "downtown", lat: 43.6532, lon: -79.3832, display_name: "Downtown Toronto" },
    Place { name: "airport", lat: 43.6777, lon: -79.6248, display_name: "Toronto Pearson Airport" },
    Place { name: "subway station", lat: 43.6426, lon: -79.3871, display_name: "Nearest Subway Station" },
    Place { name: "bus stop", lat: 43.6532, lon: -79.3832, display_name: "Main Bus Stop" },
    Place { name: "shopping mall", lat: 43.6532, lon: -79.3832, display_name: "Eaton Centre" },
    Place { name: "hospital", lat: 43.6568, lon: -79.3908, display_name: "Toronto General Hospital" },
    Place { name: "university", lat: 43.6629, lon: -79.3957, display_name: "University of Toronto" },
    Place { name: "library", lat: 43.6677, lon: -79.3948, display_name: "Toronto Public Library" },
    Place { name: "my current location", lat: 43.6532, lon: -79.3832, display_name: "Your Current Location" },
    Place { name: "here", lat: 43.6532, lon: -79.3832, display_name: "Current Location" },
    Place { name: "shloka market", lat: 43.6500, lon: -79.3850, display_name: "Shloka Market Bus Stop" },
];

/// Resolve a normalized place name.
pub fn lookup_place(name: &str) -> Option<&'static Place> {
    let name = name.trim().to_lowercase();
    PLACES.iter().find(|p| p.name == name)
}

/// Display name for a place, falling back to the raw string.
fn display_name(raw: &str) -> String {
    lookup_place(raw).map_or_else(|| raw.to_string(), |p| p.display_name.to_string())
}

// ============================================================
// Route planning
// ============================================================

/// What a plan request optimizes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutePriority {
    Accessibility,
    Time,
    #[default]
    Balanced,
}

impl RoutePriority {
    /// Parse a query value; anything unrecognized is Balanced.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("accessibility") => RoutePriority::Accessibility,
            Some(v) if v.eq_ignore_ascii_case("time") => RoutePriority::Time,
            _ => RoutePriority::Balanced,
        }
    }
}

/// One planned route option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOption {
    pub route_id: String,
    pub origin: String,
    pub destination: String,
    pub mode: String,
    pub estimated_time_minutes: u32,
    pub stops_count: u32,
    /// 0-100 accessibility rating
    pub accessibility_score: f64,
    pub has_elevator: bool,
    pub wheelchair_accessible: bool,
    pub audio_assistance_available: bool,
}

/// Plan route options between two places, ordered per the priority.
pub fn plan_route(origin: &str, destination: &str, priority: RoutePriority) -> Vec<RouteOption> {
    let origin = display_name(origin);
    let destination = display_name(destination);

    let mut options = vec![
        RouteOption {
            route_id: "route_001".to_string(),
            origin: origin.clone(),
            destination: destination.clone(),
            mode: "bus".to_string(),
            estimated_time_minutes: 25,
            stops_count: 5,
            accessibility_score: 95.0,
            has_elevator: true,
            wheelchair_accessible: true,
            audio_assistance_available: true,
        },
        RouteOption {
            route_id: "route_002".to_string(),
            origin,
            destination,
            mode: "subway".to_string(),
            estimated_time_minutes: 15,
            stops_count: 3,
            accessibility_score: 85.0,
            has_elevator: true,
            wheelchair_accessible: true,
            audio_assistance_available: false,
        },
    ];

    match priority {
        RoutePriority::Accessibility => {
            options.sort_by(|a, b| {
                b.accessibility_score
                    .partial_cmp(&a.accessibility_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        RoutePriority::Time => {
            options.sort_by_key(|o| o.estimated_time_minutes);
        }
        RoutePriority::Balanced => {}
    }

    options
}

// ============================================================
// Station accessibility
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessibilityFeature {
    pub feature_id: String,
    pub feature_name: String,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationAccessibility {
    pub station_id: String,
    pub station_name: String,
    pub features: Vec<AccessibilityFeature>,
    pub wheelchair_accessible: bool,
    pub audio_announcements: bool,
    pub visual_displays: bool,
    pub elevators_working: bool,
    pub accessible_restrooms: bool,
}

/// Accessibility record for a station.
pub fn station_accessibility(station_id: &str) -> StationAccessibility {
    StationAccessibility {
        station_id: station_id.to_string(),
        station_name: format!("Station {station_id}"),
        features: vec![
            AccessibilityFeature {
                feature_id: "elevator_1".to_string(),
                feature_name: "Main Entrance Elevator".to_string(),
                is_available: true,
                description: Some(
                    "Accessible elevator with audio and Braille buttons".to_string(),
                ),
            },
            AccessibilityFeature {
                feature_id: "ramp_1".to_string(),
                feature_name: "Wheelchair Ramp".to_string(),
                is_available: true,
                description: Some("Gentle slope ramp meeting ADA standards".to_string()),
            },
        ],
        wheelchair_accessible: true,
        audio_announcements: true,
        visual_displays: true,
        elevators_working: true,
        accessible_restrooms: true,
    }
}

// ============================================================
// Alerts
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessibilityAlert {
    pub alert_id: String,
    pub station_id: String,
    pub station_name: String,
    pub severity: String,
    pub message: String,
    pub affected_accessibility: Vec<String>,
    pub estimated_resolution_time: String,
}

/// Active accessibility alerts, optionally filtered by station.
pub fn alerts(station_id: Option<&str>) -> Vec<AccessibilityAlert> {
    let all = vec![AccessibilityAlert {
        alert_id: "alert_001".to_string(),
        station_id: "stn_downtown".to_string(),
        station_name: "Downtown Station".to_string(),
        severity: "high".to_string(),
        message: "Main elevator out of service for maintenance".to_string(),
        affected_accessibility: vec!["wheelchair".to_string(), "mobility_impaired".to_string()],
        estimated_resolution_time: "2 hours".to_string(),
    }];

    match station_id {
        Some(id) => all.into_iter().filter(|a| a.station_id == id).collect(),
        None => all,
    }
}
