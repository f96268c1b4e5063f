//! Built-in demo dataset: five Haifa rental listings and two institutions.
//!
//! The records match the product's sample data so the CLI demo and tests
//! run without a live directory service. Coordinates are WGS84 with
//! `x = longitude`, `y = latitude`.

use geo::Coord;
use nestmap_core::{Institution, Listing};

/// Image host serving the demo photographs.
const IMAGE_BASE: &str = "https://images.unsplash.com";

fn image_url(id: &str) -> String {
    format!("{IMAGE_BASE}/{id}?w=800&h=600&fit=crop")
}

/// The five demo rental listings around Haifa, in display order.
#[must_use]
pub fn demo_listings() -> Vec<Listing> {
    vec![
        Listing::new(
            "1",
            "Modern Studio Near Technion",
            2800,
            Coord {
                x: 35.023333,
                y: 32.776667,
            },
        )
        .with_room_type("Studio")
        .with_address("Neve Shaanan, Haifa")
        .with_description(
            "Bright and modern studio apartment just 5 minutes walk from Technion campus. \
             Perfect for students with all amenities included.",
        )
        .with_image_urls(vec![
            image_url("photo-1721322800607-8c38375eef04"),
            image_url("photo-1460925895917-afdab827c52f"),
        ]),
        Listing::new(
            "2",
            "Spacious 2-Room Near University",
            4200,
            Coord {
                x: 34.989167,
                y: 32.794167,
            },
        )
        .with_room_type("2-Room")
        .with_address("Carmel Center, Haifa")
        .with_description(
            "Beautiful 2-room apartment with balcony and parking. Close to University of \
             Haifa with great public transport.",
        )
        .with_image_urls(vec![
            image_url("photo-1486312338219-ce68d2c6f44d"),
            image_url("photo-1531297484001-80022131f5a1"),
        ]),
        Listing::new(
            "3",
            "Shared Apartment - Room Available",
            1800,
            Coord {
                x: 34.989722,
                y: 32.794444,
            },
        )
        .with_room_type("Shared")
        .with_address("Hadar HaCarmel, Haifa")
        .with_description(
            "Great room in shared apartment with 2 other students. Kitchen and living room \
             shared. Very friendly roommates!",
        )
        .with_image_urls(vec![image_url("photo-1488590528505-98d2b5aba04b")]),
        Listing::new(
            "4",
            "Luxury 3-Room with Sea View",
            6500,
            Coord { x: 34.99, y: 32.8 },
        )
        .with_room_type("3-Room")
        .with_address("German Colony, Haifa")
        .with_description(
            "Premium apartment with stunning sea view. Fully furnished with high-end \
             appliances. Perfect for serious students.",
        )
        .with_image_urls(vec![
            image_url("photo-1581091226825-a6a2a5aee158"),
            image_url("photo-1487058792275-0ad4aaf24ca7"),
        ]),
        Listing::new(
            "5",
            "Budget-Friendly Studio",
            2000,
            Coord {
                x: 34.9975,
                y: 32.8125,
            },
        )
        .with_room_type("Studio")
        .with_address("Wadi Nisnas, Haifa")
        .with_description(
            "Affordable studio perfect for students on a budget. Basic amenities but clean \
             and well-maintained.",
        )
        .with_image_urls(vec![image_url("photo-1498050108023-c5249f4df085")]),
    ]
}

/// The two demo institutions students route to, in display order.
#[must_use]
pub fn demo_institutions() -> Vec<Institution> {
    vec![
        Institution::new(
            "technion",
            "Technion - Israel Institute of Technology",
            "university",
            Coord {
                x: 35.023333,
                y: 32.776667,
            },
        ),
        Institution::new(
            "haifa-university",
            "University of Haifa",
            "university",
            Coord {
                x: 34.989167,
                y: 32.794167,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Rough bounding box around Haifa.
    fn within_haifa(position: Coord<f64>) -> bool {
        (34.9..35.1).contains(&position.x) && (32.7..32.9).contains(&position.y)
    }

    #[test]
    fn the_dataset_ships_five_listings_and_two_institutions() {
        assert_eq!(demo_listings().len(), 5);
        assert_eq!(demo_institutions().len(), 2);
    }

    #[test]
    fn listing_ids_are_unique() {
        let listings = demo_listings();
        let ids: BTreeSet<&str> = listings.iter().map(|listing| listing.id.as_str()).collect();

        assert_eq!(ids.len(), listings.len());
    }

    #[test]
    fn every_record_sits_within_haifa() {
        assert!(demo_listings().iter().all(|l| within_haifa(l.position)));
        assert!(demo_institutions().iter().all(|i| within_haifa(i.position)));
    }

    #[test]
    fn every_listing_is_fully_described() {
        for listing in demo_listings() {
            assert!(!listing.title.is_empty());
            assert!(!listing.room_type.is_empty());
            assert!(!listing.address.is_empty());
            assert!(!listing.description.is_empty());
            assert!(!listing.image_urls.is_empty());
            assert!(listing.price > 0);
        }
    }

    #[test]
    fn image_urls_point_at_the_demo_host() {
        for listing in demo_listings() {
            for url in &listing.image_urls {
                assert!(url.starts_with("https://images.unsplash.com/"));
                assert!(url.ends_with("?w=800&h=600&fit=crop"));
            }
        }
    }

    #[test]
    fn institutions_are_universities_with_stable_ids() {
        let institutions = demo_institutions();

        assert_eq!(institutions[0].id, "technion");
        assert_eq!(institutions[1].id, "haifa-university");
        assert!(institutions.iter().all(|i| i.category == "university"));
    }
}
