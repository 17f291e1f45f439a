//! Map marker synchronization.
//!
//! [`MarkerSynchronizer`] reconciles an abstract [`MarkerLayer`] with the
//! currently visible filtered incident set. The sync policy is a full
//! rebuild per cycle: clear everything, then recreate one marker per mapped
//! incident. An incident-keyed diff (add/update/remove) would reduce visual
//! flicker and is a possible follow-up, but the rebuild keeps the layer
//! trivially consistent with the filtered set.

use std::collections::{HashMap, HashSet};

use active_calls_models::{Incident, Priority};

/// Visual encoding for one marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    /// Fill color as a hex string.
    pub color: &'static str,
    /// Marker radius in pixels; priority 1 renders largest.
    pub radius: u8,
}

/// Style for markers whose incident has no usable priority.
pub const DEFAULT_STYLE: MarkerStyle = MarkerStyle {
    color: "#9e9e9e",
    radius: 6,
};

/// Returns the fill color and radius for a priority level.
#[must_use]
pub const fn style_for(priority: Option<Priority>) -> MarkerStyle {
    match priority {
        Some(Priority::One) => MarkerStyle {
            color: "#d73027",
            radius: 10,
        },
        Some(Priority::Two) => MarkerStyle {
            color: "#fc8d59",
            radius: 8,
        },
        Some(Priority::Three) => MarkerStyle {
            color: "#fee08b",
            radius: 7,
        },
        Some(Priority::Four) => MarkerStyle {
            color: "#4575b4",
            radius: 6,
        },
        None => DEFAULT_STYLE,
    }
}

/// Builds the marker's detail popup text from current incident data.
///
/// Re-derived at marker creation on every sync — popup content is never
/// cached across cycles, so a changed unit roster shows up on the next
/// rebuild.
#[must_use]
pub fn popup_text(incident: &Incident) -> String {
    let nature = if incident.nature_of_call.is_empty() {
        "Unknown nature"
    } else {
        &incident.nature_of_call
    };
    let priority = incident
        .priority
        .map_or_else(|| "?".to_string(), |p| p.value().to_string());
    let location = incident
        .resolved_location()
        .unwrap_or("Location unavailable");
    let units = if incident.units.is_empty() {
        "none assigned".to_string()
    } else {
        incident.units.join(", ")
    };
    format!(
        "{nature}\n#{number} · priority {priority}\n{location}\nUnits: {units}",
        number = incident.incident_number,
    )
}

/// Opaque handle to a marker created on a [`MarkerLayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

/// Everything a layer needs to create one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    /// Latitude of the marker.
    pub lat: f64,
    /// Longitude of the marker.
    pub lon: f64,
    /// Visual encoding.
    pub style: MarkerStyle,
    /// Detail popup content.
    pub popup: String,
}

/// The mapping-library seam.
///
/// Concrete frontends implement this for their map widget (circle markers,
/// popups, viewport control); [`MemoryLayer`] is the in-crate implementation
/// used by tests and headless frontends. Pan/zoom mechanics and tile
/// rendering stay on the other side of this trait.
pub trait MarkerLayer {
    /// Removes every marker from the layer.
    fn clear(&mut self);

    /// Creates a marker and returns its handle.
    fn add(&mut self, spec: MarkerSpec) -> MarkerHandle;

    /// Centers the viewport on a marker and opens its popup.
    fn focus(&mut self, handle: MarkerHandle);

    /// Fits the viewport to all current markers.
    fn fit_all(&mut self);
}

/// Result of a focus-incident request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    /// The incident is mapped; the viewport moved and its popup opened.
    Focused,
    /// The incident is visible but has no coordinates yet.
    NotMapped,
    /// No visible incident has this number; nothing happened.
    Unknown,
}

/// Owns the marker layer and the incident-number → marker lookup table.
///
/// Markers are exclusively owned here; the rest of the system refers to
/// incidents by number and goes through [`MarkerSynchronizer::focus`].
pub struct MarkerSynchronizer<L> {
    layer: L,
    by_incident: HashMap<String, MarkerHandle>,
    unmapped: HashSet<String>,
    fitted: bool,
}

impl<L: MarkerLayer> MarkerSynchronizer<L> {
    /// Wraps a marker layer with an empty lookup table.
    pub fn new(layer: L) -> Self {
        Self {
            layer,
            by_incident: HashMap::new(),
            unmapped: HashSet::new(),
            fitted: false,
        }
    }

    /// Rebuilds the marker layer from the visible incident set.
    ///
    /// Incidents without coordinates get no marker (they still appear in
    /// the list, flagged unmapped) but are remembered so a focus request
    /// can distinguish "not mapped yet" from "unknown incident". The first
    /// sync that produces at least one marker fits the viewport to all
    /// mapped points, once; later syncs never fight the user's pan/zoom.
    pub fn sync(&mut self, visible: &[&Incident]) {
        self.layer.clear();
        self.by_incident.clear();
        self.unmapped.clear();

        for incident in visible {
            let Some((lat, lon)) = incident.coordinates() else {
                self.unmapped.insert(incident.incident_number.clone());
                continue;
            };
            let handle = self.layer.add(MarkerSpec {
                lat,
                lon,
                style: style_for(incident.priority),
                popup: popup_text(incident),
            });
            self.by_incident
                .insert(incident.incident_number.clone(), handle);
        }

        if !self.fitted && !self.by_incident.is_empty() {
            self.layer.fit_all();
            self.fitted = true;
        }

        log::debug!(
            "marker sync: {} mapped, {} unmapped",
            self.by_incident.len(),
            self.unmapped.len()
        );
    }

    /// Centers the viewport on an incident's marker and opens its popup.
    pub fn focus(&mut self, incident_number: &str) -> FocusOutcome {
        if let Some(&handle) = self.by_incident.get(incident_number) {
            self.layer.focus(handle);
            return FocusOutcome::Focused;
        }
        if self.unmapped.contains(incident_number) {
            return FocusOutcome::NotMapped;
        }
        FocusOutcome::Unknown
    }

    /// Number of markers currently on the layer.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.by_incident.len()
    }

    /// Incident numbers currently holding a marker, in no particular order.
    pub fn marker_keys(&self) -> impl Iterator<Item = &str> {
        self.by_incident.keys().map(String::as_str)
    }

    /// Read access to the underlying layer.
    pub const fn layer(&self) -> &L {
        &self.layer
    }
}

/// In-memory [`MarkerLayer`] for tests and headless frontends.
#[derive(Debug, Default)]
pub struct MemoryLayer {
    markers: Vec<(MarkerHandle, MarkerSpec)>,
    next_id: u64,
    focused: Option<MarkerHandle>,
    fit_count: u32,
}

impl MemoryLayer {
    /// Creates an empty layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current markers, in creation order.
    #[must_use]
    pub fn markers(&self) -> &[(MarkerHandle, MarkerSpec)] {
        &self.markers
    }

    /// The most recently focused marker, if any.
    #[must_use]
    pub const fn focused(&self) -> Option<MarkerHandle> {
        self.focused
    }

    /// The spec of the most recently focused marker.
    #[must_use]
    pub fn focused_spec(&self) -> Option<&MarkerSpec> {
        let handle = self.focused?;
        self.markers
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, spec)| spec)
    }

    /// How many times the viewport was fit to all markers.
    #[must_use]
    pub const fn fit_count(&self) -> u32 {
        self.fit_count
    }
}

impl MarkerLayer for MemoryLayer {
    fn clear(&mut self) {
        self.markers.clear();
        self.focused = None;
    }

    fn add(&mut self, spec: MarkerSpec) -> MarkerHandle {
        self.next_id += 1;
        let handle = MarkerHandle(self.next_id);
        self.markers.push((handle, spec));
        handle
    }

    fn focus(&mut self, handle: MarkerHandle) {
        self.focused = Some(handle);
    }

    fn fit_all(&mut self) {
        self.fit_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(number: &str, coords: Option<(f64, f64)>, priority: Option<Priority>) -> Incident {
        Incident {
            incident_number: number.to_string(),
            nature_of_call: "Disturbance".to_string(),
            location: "MAIN ST".to_string(),
            lat: coords.map(|c| c.0),
            lon: coords.map(|c| c.1),
            priority,
            units: vec!["101".to_string()],
            ..Incident::default()
        }
    }

    fn sync_all<'a>(
        synchronizer: &mut MarkerSynchronizer<MemoryLayer>,
        incidents: &'a [Incident],
    ) -> Vec<&'a Incident> {
        let visible: Vec<&Incident> = incidents.iter().collect();
        synchronizer.sync(&visible);
        visible
    }

    #[test]
    fn creates_markers_only_for_mapped_incidents() {
        let incidents = vec![
            incident("A1", Some((32.78, -96.80)), Some(Priority::One)),
            incident("B2", None, Some(Priority::Three)),
        ];
        let mut sync = MarkerSynchronizer::new(MemoryLayer::new());
        sync_all(&mut sync, &incidents);

        assert_eq!(sync.marker_count(), 1);
        assert_eq!(sync.layer().markers().len(), 1);
        let (_, spec) = &sync.layer().markers()[0];
        assert!((spec.lat - 32.78).abs() < f64::EPSILON);
        assert_eq!(spec.style, style_for(Some(Priority::One)));
    }

    #[test]
    fn resync_is_idempotent() {
        let incidents = vec![
            incident("A1", Some((1.0, 2.0)), None),
            incident("B2", Some((3.0, 4.0)), None),
        ];
        let mut sync = MarkerSynchronizer::new(MemoryLayer::new());
        sync_all(&mut sync, &incidents);
        let mut first_keys: Vec<String> = sync.marker_keys().map(str::to_string).collect();
        first_keys.sort();

        sync_all(&mut sync, &incidents);
        let mut second_keys: Vec<String> = sync.marker_keys().map(str::to_string).collect();
        second_keys.sort();

        assert_eq!(sync.marker_count(), 2);
        assert_eq!(first_keys, second_keys);
        assert_eq!(sync.layer().markers().len(), 2);
    }

    #[test]
    fn fits_viewport_once() {
        let incidents = vec![incident("A1", Some((1.0, 2.0)), None)];
        let mut sync = MarkerSynchronizer::new(MemoryLayer::new());

        // No mapped incidents yet: no fit.
        sync.sync(&[]);
        assert_eq!(sync.layer().fit_count(), 0);

        sync_all(&mut sync, &incidents);
        assert_eq!(sync.layer().fit_count(), 1);

        sync_all(&mut sync, &incidents);
        sync_all(&mut sync, &incidents);
        assert_eq!(sync.layer().fit_count(), 1);
    }

    #[test]
    fn focus_outcomes() {
        let incidents = vec![
            incident("A1", Some((1.0, 2.0)), None),
            incident("B2", None, None),
        ];
        let mut sync = MarkerSynchronizer::new(MemoryLayer::new());
        sync_all(&mut sync, &incidents);

        assert_eq!(sync.focus("A1"), FocusOutcome::Focused);
        assert!(sync.layer().focused().is_some());
        assert_eq!(sync.focus("B2"), FocusOutcome::NotMapped);
        assert_eq!(sync.focus("ZZ"), FocusOutcome::Unknown);
    }

    #[test]
    fn popup_summarizes_current_incident_data() {
        let subject = incident("A1", Some((1.0, 2.0)), Some(Priority::Two));
        let popup = popup_text(&subject);
        assert!(popup.contains("Disturbance"));
        assert!(popup.contains("#A1"));
        assert!(popup.contains("priority 2"));
        assert!(popup.contains("MAIN ST"));
        assert!(popup.contains("101"));
    }

    #[test]
    fn popup_degrades_missing_fields() {
        let popup = popup_text(&Incident {
            incident_number: "A1".to_string(),
            ..Incident::default()
        });
        assert!(popup.contains("Unknown nature"));
        assert!(popup.contains("priority ?"));
        assert!(popup.contains("Location unavailable"));
        assert!(popup.contains("none assigned"));
    }

    #[test]
    fn unknown_priority_gets_default_style() {
        assert_eq!(style_for(None), DEFAULT_STYLE);
        // Highest priority renders largest.
        assert!(style_for(Some(Priority::One)).radius > style_for(Some(Priority::Four)).radius);
    }
}
