use geo::Coord;

/// Category of nearby place the search coordinator can look up.
///
/// The wire name doubles as the provider's place-type parameter; the label,
/// glyph, and colour drive marker styling.
///
/// # Examples
/// ```
/// use nestmap_core::PoiCategory;
///
/// assert_eq!(PoiCategory::TransitStation.as_str(), "transit_station");
/// assert_eq!(PoiCategory::TransitStation.label(), "Bus Stop");
/// assert_eq!("Supermarket".parse::<PoiCategory>(), Ok(PoiCategory::Supermarket));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PoiCategory {
    /// Grocery shopping.
    Supermarket,
    /// Fitness facilities.
    Gym,
    /// Places to eat.
    Restaurant,
    /// Public transport stops.
    TransitStation,
}

impl PoiCategory {
    /// All categories, in canonical order.
    pub const ALL: [Self; 4] = [
        Self::Supermarket,
        Self::Gym,
        Self::Restaurant,
        Self::TransitStation,
    ];

    /// Stable wire name, also used as the provider's place-type parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Supermarket => "supermarket",
            Self::Gym => "gym",
            Self::Restaurant => "restaurant",
            Self::TransitStation => "transit_station",
        }
    }

    /// Human-readable label for filter controls and logs.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Supermarket => "Supermarket",
            Self::Gym => "Gym",
            Self::Restaurant => "Restaurant",
            Self::TransitStation => "Bus Stop",
        }
    }

    /// Marker glyph for the category.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Supermarket => "🛒",
            Self::Gym => "💪",
            Self::Restaurant => "🍽️",
            Self::TransitStation => "🚌",
        }
    }

    /// Marker fill colour as a `#RRGGBB` hex string.
    #[must_use]
    pub fn colour(self) -> &'static str {
        match self {
            Self::Supermarket => "#10B981",
            Self::Gym => "#F59E0B",
            Self::Restaurant => "#EF4444",
            Self::TransitStation => "#8B5CF6",
        }
    }
}

impl std::fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PoiCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "supermarket" => Ok(Self::Supermarket),
            "gym" => Ok(Self::Gym),
            "restaurant" => Ok(Self::Restaurant),
            "transit_station" => Ok(Self::TransitStation),
            other => Err(format!("unknown POI category: {other}")),
        }
    }
}

/// A nearby place returned by one category search.
///
/// `external_id` is the provider's stable identifier and deduplicates
/// results across overlapping category searches within one pass.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use nestmap_core::{Poi, PoiCategory};
///
/// let poi = Poi::new("p1", "Corner Market", PoiCategory::Supermarket, Coord { x: 35.0, y: 32.8 });
/// assert_eq!(poi.external_id, "p1");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Poi {
    /// Provider-assigned stable identifier.
    pub external_id: String,
    /// Display name.
    pub name: String,
    /// Category the place was found under.
    pub category: PoiCategory,
    /// Geographic position, `x = longitude`, `y = latitude`.
    pub position: Coord<f64>,
}

impl Poi {
    /// Construct a nearby place record.
    pub fn new(
        external_id: impl Into<String>,
        name: impl Into<String>,
        category: PoiCategory,
        position: Coord<f64>,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            name: name.into(),
            category,
            position,
        }
    }
}
