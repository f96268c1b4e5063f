use geo::Coord;

use crate::poi::PoiCategory;

/// The kind of entity a marker represents.
///
/// Each kind occupies its own key space: a listing marker and a POI marker
/// may share an id without colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MarkerKind {
    /// A rental listing.
    Listing,
    /// An institution such as a university campus.
    Institution,
    /// A nearby point of interest.
    Poi,
}

impl MarkerKind {
    /// Stable lower-case name, as used in logs and diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::Institution => "institution",
            Self::Poi => "poi",
        }
    }
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one marker on a surface: its kind plus a stable entity id.
///
/// Reconciliation is keyed by this pair; re-rendering the same key must not
/// create a duplicate native marker.
///
/// # Examples
/// ```
/// use nestmap_core::{MarkerKey, MarkerKind};
///
/// let key = MarkerKey::listing("1");
/// assert_eq!(key.kind, MarkerKind::Listing);
/// assert_eq!(key.id, "1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerKey {
    pub kind: MarkerKind,
    pub id: String,
}

impl MarkerKey {
    /// Key for a listing marker.
    pub fn listing(id: impl Into<String>) -> Self {
        Self {
            kind: MarkerKind::Listing,
            id: id.into(),
        }
    }

    /// Key for an institution marker.
    pub fn institution(id: impl Into<String>) -> Self {
        Self {
            kind: MarkerKind::Institution,
            id: id.into(),
        }
    }

    /// Key for a POI marker.
    pub fn poi(id: impl Into<String>) -> Self {
        Self {
            kind: MarkerKind::Poi,
            id: id.into(),
        }
    }
}

impl std::fmt::Display for MarkerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// A point in surface-local screen space, in pixels.
///
/// Produced by marker click handlers and consumed by the overlay presenter
/// as a one-shot anchor; never re-projected through the map's geographic
/// coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    /// Construct a screen point from pixel coordinates.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visual description of a marker: glyph, colour, and rendered size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDescriptor {
    /// Glyph rendered inside the marker body.
    pub glyph: String,
    /// Fill colour as a `#RRGGBB` hex string.
    pub colour: String,
    /// Rendered diameter in pixels.
    pub size_px: u32,
}

/// Fill colour shared by listing markers and the route overlay.
pub const LISTING_COLOUR: &str = "#3B82F6";
/// Fill colour for institution markers.
pub const INSTITUTION_COLOUR: &str = "#10B981";

const ENTITY_MARKER_SIZE_PX: u32 = 32;
const POI_MARKER_SIZE_PX: u32 = 28;

impl MarkerDescriptor {
    /// Descriptor for a rental listing marker.
    #[must_use]
    pub fn listing() -> Self {
        Self {
            glyph: "🏠".to_owned(),
            colour: LISTING_COLOUR.to_owned(),
            size_px: ENTITY_MARKER_SIZE_PX,
        }
    }

    /// Descriptor for an institution marker.
    #[must_use]
    pub fn institution() -> Self {
        Self {
            glyph: "🏫".to_owned(),
            colour: INSTITUTION_COLOUR.to_owned(),
            size_px: ENTITY_MARKER_SIZE_PX,
        }
    }

    /// Descriptor for a POI marker, styled by its category.
    #[must_use]
    pub fn poi(category: PoiCategory) -> Self {
        Self {
            glyph: category.glyph().to_owned(),
            colour: category.colour().to_owned(),
            size_px: POI_MARKER_SIZE_PX,
        }
    }
}

/// Everything a surface needs to create one native marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    /// Geographic position, `x = longitude`, `y = latitude`.
    pub position: Coord<f64>,
    /// Accessible title; surfaces typically expose it as hover text.
    pub title: String,
    /// Visual styling for the marker body.
    pub descriptor: MarkerDescriptor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_order_by_kind_then_id() {
        let mut keys = vec![
            MarkerKey::poi("a"),
            MarkerKey::listing("2"),
            MarkerKey::listing("1"),
            MarkerKey::institution("z"),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                MarkerKey::listing("1"),
                MarkerKey::listing("2"),
                MarkerKey::institution("z"),
                MarkerKey::poi("a"),
            ]
        );
    }

    #[test]
    fn display_joins_kind_and_id() {
        assert_eq!(MarkerKey::listing("42").to_string(), "listing:42");
    }

    #[test]
    fn poi_descriptor_follows_category_styling() {
        let descriptor = MarkerDescriptor::poi(PoiCategory::Gym);
        assert_eq!(descriptor.glyph, PoiCategory::Gym.glyph());
        assert_eq!(descriptor.colour, PoiCategory::Gym.colour());
        assert_eq!(descriptor.size_px, 28);
    }
}
