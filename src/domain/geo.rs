// src/domain/geo.rs

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_MILES: f64 = 3958.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Unparsable API values become NaN; such points never get a marker.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Great-circle distance in miles (haversine).
pub fn haversine_miles(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = ((d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_MILES * c
}

/// Geographic region visible on the map.
///
/// `west > east` means the region crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    pub fn world() -> Self {
        Self::new(-90.0, -180.0, 90.0, 180.0)
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        if !point.is_finite() || point.lat < self.south || point.lat > self.north {
            return false;
        }
        if self.west <= self.east {
            point.lng >= self.west && point.lng <= self.east
        } else {
            point.lng >= self.west || point.lng <= self.east
        }
    }

    /// Smallest box around every finite point; `None` when there are none.
    pub fn around<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinates>,
    {
        points
            .into_iter()
            .filter(Coordinates::is_finite)
            .fold(None, |acc: Option<Bounds>, p| {
                Some(match acc {
                    None => Bounds::new(p.lat, p.lng, p.lat, p.lng),
                    Some(b) => Bounds::new(
                        b.south.min(p.lat),
                        b.west.min(p.lng),
                        b.north.max(p.lat),
                        b.east.max(p.lng),
                    ),
                })
            })
    }

    pub fn center(&self) -> Coordinates {
        let lng = if self.west <= self.east {
            (self.west + self.east) / 2.0
        } else {
            let mid = (self.west + self.east + 360.0) / 2.0;
            if mid > 180.0 {
                mid - 360.0
            } else {
                mid
            }
        };
        Coordinates::new((self.south + self.north) / 2.0, lng)
    }

    fn lng_span(&self) -> f64 {
        if self.west <= self.east {
            self.east - self.west
        } else {
            self.east - self.west + 360.0
        }
    }

    /// Same span, new center. Latitude is clamped to the poles.
    pub fn recentered(&self, center: Coordinates) -> Self {
        let half_lat = (self.north - self.south) / 2.0;
        let half_lng = self.lng_span() / 2.0;
        if half_lng >= 180.0 {
            return Bounds::new(
                (center.lat - half_lat).max(-90.0),
                self.west,
                (center.lat + half_lat).min(90.0),
                self.east,
            );
        }
        Bounds::new(
            (center.lat - half_lat).max(-90.0),
            wrap_lng(center.lng - half_lng),
            (center.lat + half_lat).min(90.0),
            wrap_lng(center.lng + half_lng),
        )
    }

    /// Grow every edge by `fraction` of the span, as fit-to-bounds padding.
    pub fn padded(&self, fraction: f64) -> Self {
        let pad_lat = ((self.north - self.south) * fraction).max(0.005);
        let pad_lng = (self.lng_span() * fraction).max(0.005);
        Bounds::new(
            (self.south - pad_lat).max(-90.0),
            wrap_lng(self.west - pad_lng),
            (self.north + pad_lat).min(90.0),
            wrap_lng(self.east + pad_lng),
        )
    }
}

fn wrap_lng(lng: f64) -> f64 {
    if lng > 180.0 {
        lng - 360.0
    } else if lng < -180.0 {
        lng + 360.0
    } else {
        lng
    }
}
