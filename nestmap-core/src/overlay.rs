//! Selection overlay state.

use crate::listing::{Institution, Listing};
use crate::marker::{MarkerKey, ScreenPoint};

/// The entity a selection overlay describes.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlaySubject {
    Listing(Listing),
    Institution(Institution),
}

impl OverlaySubject {
    /// The marker key of the subject.
    #[must_use]
    pub fn key(&self) -> MarkerKey {
        match self {
            Self::Listing(listing) => MarkerKey::listing(listing.id.clone()),
            Self::Institution(institution) => MarkerKey::institution(institution.id.clone()),
        }
    }

    /// The display title of the subject.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Listing(listing) => &listing.title,
            Self::Institution(institution) => &institution.name,
        }
    }
}

/// A visible overlay: its subject, screen anchor, and whether it is
/// collapsed to its title bar.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    pub subject: OverlaySubject,
    pub anchor: ScreenPoint,
    pub minimised: bool,
}

/// Tracks the single selection overlay a surface may show.
///
/// At most one overlay exists at a time. Showing a subject replaces any
/// current overlay and always expands it, including when the same subject is
/// re-selected at a new anchor. Minimise and restore toggle the collapsed
/// state of a visible overlay and do nothing when no overlay is shown.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use nestmap_core::{Listing, OverlayPresenter, OverlaySubject, ScreenPoint};
///
/// let listing = Listing::new("1", "Cozy Studio", 2800, Coord { x: 35.02, y: 32.78 });
/// let mut presenter = OverlayPresenter::new();
/// presenter.show(OverlaySubject::Listing(listing), ScreenPoint::new(120.0, 80.0));
/// assert!(presenter.is_shown());
/// presenter.minimise();
/// assert!(presenter.view().is_some_and(|view| view.minimised));
/// presenter.close();
/// assert!(!presenter.is_shown());
/// ```
#[derive(Debug, Default)]
pub struct OverlayPresenter {
    view: Option<OverlayView>,
}

impl OverlayPresenter {
    /// Create a presenter with no overlay shown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the overlay for a subject, anchored at a screen point. Replaces
    /// any current overlay and expands the new one.
    pub fn show(&mut self, subject: OverlaySubject, anchor: ScreenPoint) {
        self.view = Some(OverlayView {
            subject,
            anchor,
            minimised: false,
        });
    }

    /// Collapse the overlay to its title bar. No-op when nothing is shown.
    pub fn minimise(&mut self) {
        if let Some(view) = self.view.as_mut() {
            view.minimised = true;
        }
    }

    /// Expand a collapsed overlay. No-op when nothing is shown.
    pub fn restore(&mut self) {
        if let Some(view) = self.view.as_mut() {
            view.minimised = false;
        }
    }

    /// Hide the overlay entirely.
    pub fn close(&mut self) {
        self.view = None;
    }

    /// The current overlay, if one is shown.
    #[must_use]
    pub fn view(&self) -> Option<OverlayView> {
        self.view.clone()
    }

    /// Whether an overlay is currently shown, collapsed or not.
    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.view.is_some()
    }
}
