use std::collections::BTreeSet;

use crate::poi::PoiCategory;

/// Which marker kinds the host currently wants rendered.
///
/// Rendering is gated on these flags: a hidden kind contributes nothing to
/// the reconciler's target set even when its collection is non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerVisibility {
    /// Render listing markers.
    pub listings: bool,
    /// Render institution markers.
    pub institutions: bool,
}

impl Default for MarkerVisibility {
    fn default() -> Self {
        Self {
            listings: true,
            institutions: true,
        }
    }
}

/// The host-owned selection and filter snapshot the core derives all output
/// from.
///
/// The core never mutates this; every component re-derives its own output
/// purely from the latest snapshot plus the listing/institution collections.
///
/// # Examples
/// ```
/// use nestmap_core::{PoiCategory, SelectionState};
///
/// let mut state = SelectionState::default();
/// state.selected_listing = Some("1".to_owned());
/// state.enabled_categories.insert(PoiCategory::Supermarket);
/// state.pois_visible = true;
/// assert!(state.markers.listings);
/// assert!(!state.route_visible);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    /// Key of the selected listing, if any.
    pub selected_listing: Option<String>,
    /// Key of the selected institution, if any.
    pub selected_institution: Option<String>,
    /// POI categories enabled for nearby search, iterated in canonical
    /// order.
    pub enabled_categories: BTreeSet<PoiCategory>,
    /// Whether POI markers may render at all.
    pub pois_visible: bool,
    /// Whether the route overlay may render at all.
    pub route_visible: bool,
    /// Per-kind visibility for listing/institution markers.
    pub markers: MarkerVisibility,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            selected_listing: None,
            selected_institution: None,
            enabled_categories: BTreeSet::new(),
            pois_visible: false,
            route_visible: false,
            markers: MarkerVisibility::default(),
        }
    }
}
