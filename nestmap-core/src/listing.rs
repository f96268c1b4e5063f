use geo::Coord;

/// A rental listing shown as a marker on the map.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. The id is
/// the stable key the reconciler diffs by; two listings must never share
/// one.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use nestmap_core::Listing;
///
/// let listing = Listing::new("1", "Cozy Studio", 2800, Coord { x: 35.0233, y: 32.7767 })
///     .with_address("Neve Shaanan, Haifa");
/// assert_eq!(listing.id, "1");
/// assert_eq!(listing.address, "Neve Shaanan, Haifa");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Listing {
    /// Stable unique identifier.
    pub id: String,
    /// Short headline shown on the marker and overlay.
    pub title: String,
    /// Monthly rent in whole currency units.
    pub price: u32,
    /// Geographic position, `x = longitude`, `y = latitude`.
    pub position: Coord<f64>,
    /// Free-form room description, e.g. "Studio" or "2-Room".
    pub room_type: String,
    /// Street-level address line.
    pub address: String,
    /// Longer marketing description.
    pub description: String,
    /// Image URLs in display order.
    pub image_urls: Vec<String>,
}

impl Listing {
    /// Construct a listing with the required fields; the rest default to
    /// empty.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        price: u32,
        position: Coord<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            position,
            room_type: String::new(),
            address: String::new(),
            description: String::new(),
            image_urls: Vec::new(),
        }
    }

    /// Set the room description.
    #[must_use]
    pub fn with_room_type(mut self, room_type: impl Into<String>) -> Self {
        self.room_type = room_type.into();
        self
    }

    /// Set the address line.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Set the marketing description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the image URLs.
    #[must_use]
    pub fn with_image_urls(mut self, image_urls: Vec<String>) -> Self {
        self.image_urls = image_urls;
        self
    }
}

/// An institution a listing can be routed to, such as a university.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use nestmap_core::Institution;
///
/// let technion = Institution::new(
///     "technion",
///     "Technion - Israel Institute of Technology",
///     "university",
///     Coord { x: 35.0233, y: 32.7767 },
/// );
/// assert_eq!(technion.category, "university");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Institution {
    /// Stable unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form category, e.g. "university".
    pub category: String,
    /// Geographic position, `x = longitude`, `y = latitude`.
    pub position: Coord<f64>,
}

impl Institution {
    /// Construct an institution record.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        position: Coord<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            position,
        }
    }
}
