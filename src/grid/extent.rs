use crate::dataset::Venue;

/// Axis-aligned bounding rectangle over a set of venues, in degrees.
///
/// Derived, never stored with the dataset; `None` means the dataset had no
/// usable point and nothing should be rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl Extent {
    /// Compute the bounding box, skipping venues with non-finite
    /// coordinates rather than failing the whole computation.
    pub fn from_venues(venues: &[Venue]) -> Option<Self> {
        let mut min_lat = f64::INFINITY;
        let mut min_lng = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        let mut max_lng = f64::NEG_INFINITY;

        for venue in venues {
            if !venue.lat.is_finite() || !venue.lon.is_finite() {
                continue;
            }
            if venue.lat < min_lat {
                min_lat = venue.lat;
            }
            if venue.lon < min_lng {
                min_lng = venue.lon;
            }
            if venue.lat > max_lat {
                max_lat = venue.lat;
            }
            if venue.lon > max_lng {
                max_lng = venue.lon;
            }
        }

        if !min_lat.is_finite() {
            return None;
        }
        Some(Self {
            min_lat,
            min_lng,
            max_lat,
            max_lng,
        })
    }

    pub fn mean_lat(&self) -> f64 {
        (self.min_lat + self.max_lat) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_all_valid_venues() {
        let venues = vec![
            Venue::at(-95.5, 29.6),
            Venue::at(-95.2, 29.9),
            Venue::at(-95.4, 29.7),
        ];

        let extent = Extent::from_venues(&venues).expect("extent");

        assert_eq!(extent.min_lng, -95.5);
        assert_eq!(extent.max_lng, -95.2);
        assert_eq!(extent.min_lat, 29.6);
        assert_eq!(extent.max_lat, 29.9);
        assert_eq!(extent.mean_lat(), 29.75);
    }

    #[test]
    fn non_finite_coordinates_are_skipped() {
        let venues = vec![
            Venue::at(f64::NAN, 29.7),
            Venue::at(-95.3, f64::INFINITY),
            Venue::at(-95.3, 29.7),
        ];

        let extent = Extent::from_venues(&venues).expect("extent");

        assert_eq!(extent.min_lng, -95.3);
        assert_eq!(extent.max_lng, -95.3);
        assert_eq!(extent.min_lat, 29.7);
        assert_eq!(extent.max_lat, 29.7);
    }

    #[test]
    fn empty_or_fully_invalid_input_yields_none() {
        assert!(Extent::from_venues(&[]).is_none());

        let invalid = vec![Venue::at(f64::NAN, f64::NAN)];
        assert!(Extent::from_venues(&invalid).is_none());
    }

    #[test]
    fn single_venue_yields_degenerate_extent() {
        let venues = vec![Venue::at(-95.3, 29.7)];
        let extent = Extent::from_venues(&venues).expect("extent");
        assert_eq!(extent.min_lat, extent.max_lat);
        assert_eq!(extent.min_lng, extent.max_lng);
    }
}
