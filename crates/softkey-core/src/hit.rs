//! Coordinate to key resolution over a [`KeyGeometryIndex`].

use crate::geometry::KeyGeometryIndex;
use crate::settings::Settings;

/// Outcome of resolving one coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitResult {
    /// Resolved key, `None` for "no key".
    pub primary: Option<usize>,
    /// Alternate keys ordered by distance, nearest first. Only filled when
    /// proximity correction is on.
    pub nearby: Vec<usize>,
}

impl HitResult {
    pub fn none() -> Self {
        Self::default()
    }

    /// Codes of the alternates, in the same order as `nearby`.
    pub fn nearby_codes(&self, index: &KeyGeometryIndex) -> Vec<i32> {
        self.nearby
            .iter()
            .filter_map(|&i| index.key(i))
            .map(|k| k.code)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHitResolver {
    correction: bool,
    max_nearby: usize,
}

impl KeyHitResolver {
    pub fn new(correction: bool, max_nearby: usize) -> Self {
        Self {
            correction,
            max_nearby,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.proximity.correction,
            settings.proximity.max_nearby_keys,
        )
    }

    pub fn correction(&self) -> bool {
        self.correction
    }

    /// Primary key only.
    pub fn key_at(&self, index: &KeyGeometryIndex, x: i32, y: i32) -> Option<usize> {
        self.scan(index, x, y, None)
    }

    pub fn resolve(&self, index: &KeyGeometryIndex, x: i32, y: i32) -> HitResult {
        if !self.correction {
            return HitResult {
                primary: self.scan(index, x, y, None),
                nearby: Vec::new(),
            };
        }
        let mut nearby = NearbyKeys::new(self.max_nearby);
        let primary = self.scan(index, x, y, Some(&mut nearby));
        HitResult {
            primary,
            nearby: nearby.into_indices(),
        }
    }

    /// Containment wins, first containing candidate first. Otherwise the
    /// first candidate at the minimum distance under the threshold.
    fn scan(
        &self,
        index: &KeyGeometryIndex,
        x: i32,
        y: i32,
        mut nearby: Option<&mut NearbyKeys>,
    ) -> Option<usize> {
        let threshold = index.proximity_threshold();
        let mut inside = None;
        let mut closest = None;
        let mut closest_dist = i64::MAX;

        for &i in index.candidates_at(x, y) {
            let Some(key) = index.key(i) else {
                continue;
            };
            let is_inside = key.is_inside(x, y);
            if is_inside && inside.is_none() {
                inside = Some(i);
            }
            if !self.correction {
                if inside.is_some() {
                    break;
                }
                continue;
            }
            let dist = key.squared_distance_from(x, y);
            if dist < threshold || is_inside {
                if dist < closest_dist {
                    closest_dist = dist;
                    closest = Some(i);
                }
                if let Some(nearby) = nearby.as_deref_mut() {
                    nearby.insert(i, dist);
                }
            }
        }

        inside.or(closest)
    }
}

/// Fixed-size distance-sorted array; inserting into a full array evicts the farthest.
#[derive(Debug)]
struct NearbyKeys {
    capacity: usize,
    entries: Vec<(i64, usize)>,
}

impl NearbyKeys {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity + 1),
        }
    }

    fn insert(&mut self, index: usize, dist: i64) {
        let pos = self
            .entries
            .iter()
            .position(|&(d, _)| d > dist)
            .unwrap_or(self.entries.len());
        if pos >= self.capacity {
            return;
        }
        self.entries.insert(pos, (dist, index));
        self.entries.truncate(self.capacity);
    }

    fn into_indices(self) -> Vec<usize> {
        self.entries.into_iter().map(|(_, i)| i).collect()
    }
}
