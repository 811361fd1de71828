use tracing::debug;

use super::{GeometryError, Key, KeyGeometryProvider};

pub const GRID_COLUMNS: usize = 10;
pub const GRID_ROWS: usize = 5;

/// Immutable spatial index over one keyboard's keys.
///
/// Built once per attach. The keyboard bounds are split into a
/// `GRID_COLUMNS` x `GRID_ROWS` grid; every cell stores the keys a point in
/// that cell can resolve to, so hit-testing only scans a handful of keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGeometryIndex {
    keys: Vec<Key>,
    proximity_threshold: i64,
    width: i32,
    height: i32,
    cell_width: i32,
    cell_height: i32,
    cells: Vec<Vec<usize>>,
    neighbors: Vec<Vec<usize>>,
}

/// `(mean over keys of (min(width, height) + gap))^2`, using an integer mean.
pub fn proximity_threshold(keys: &[Key]) -> i64 {
    if keys.is_empty() {
        return 0;
    }
    let sum: i64 = keys.iter().map(Key::proximity_extent).sum();
    let mean = sum / keys.len() as i64;
    mean * mean
}

impl KeyGeometryIndex {
    pub fn build(keys: &[Key]) -> Result<Self, GeometryError> {
        if keys.is_empty() {
            return Err(GeometryError::Empty);
        }
        for (i, key) in keys.iter().enumerate() {
            key.validate(i)?;
        }

        let proximity_threshold = proximity_threshold(keys);
        let width = keys.iter().map(|k| k.x + k.width).fold(1, i32::max);
        let height = keys.iter().map(|k| k.y + k.height).fold(1, i32::max);
        let cell_width = ceil_div(width, GRID_COLUMNS as i32);
        let cell_height = ceil_div(height, GRID_ROWS as i32);

        let mut cells = Vec::with_capacity(GRID_COLUMNS * GRID_ROWS);
        for row in 0..GRID_ROWS as i32 {
            for col in 0..GRID_COLUMNS as i32 {
                let x = col * cell_width;
                let y = row * cell_height;
                let corners = [
                    (x, y),
                    (x + cell_width - 1, y),
                    (x, y + cell_height - 1),
                    (x + cell_width - 1, y + cell_height - 1),
                ];
                let cell: Vec<usize> = keys
                    .iter()
                    .enumerate()
                    .filter(|(_, k)| {
                        k.intersects(x, y, cell_width, cell_height)
                            || corners
                                .iter()
                                .any(|&(cx, cy)| k.squared_distance_from(cx, cy) < proximity_threshold)
                    })
                    .map(|(i, _)| i)
                    .collect();
                cells.push(cell);
            }
        }

        let neighbors = keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let (kx, ky) = key.center();
                let mut near: Vec<usize> = Vec::new();
                for row in 0..GRID_ROWS as i32 {
                    for col in 0..GRID_COLUMNS as i32 {
                        if key.intersects(col * cell_width, row * cell_height, cell_width, cell_height) {
                            near.extend_from_slice(&cells[row as usize * GRID_COLUMNS + col as usize]);
                        }
                    }
                }
                near.sort_unstable();
                near.dedup();
                near.sort_by_key(|&j| (j != i, keys[j].squared_distance_from(kx, ky), j));
                near
            })
            .collect();

        debug!(
            keys = keys.len(),
            proximity_threshold, width, height, "built key geometry index"
        );

        Ok(Self {
            keys: keys.to_vec(),
            proximity_threshold,
            width,
            height,
            cell_width,
            cell_height,
            cells,
            neighbors,
        })
    }

    pub fn from_provider<P: KeyGeometryProvider + ?Sized>(provider: &P) -> Result<Self, GeometryError> {
        Self::build(provider.keys())
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key at `index`; any out-of-range index is "no key".
    pub fn key(&self, index: usize) -> Option<&Key> {
        self.keys.get(index)
    }

    /// Squared proximity threshold.
    pub fn proximity_threshold(&self) -> i64 {
        self.proximity_threshold
    }

    pub fn bounds(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn cell_size(&self) -> (i32, i32) {
        (self.cell_width, self.cell_height)
    }

    /// Keys a point may resolve to, in key order. Empty outside the bounds.
    pub fn candidates_at(&self, x: i32, y: i32) -> &[usize] {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return &[];
        }
        let col = ((x / self.cell_width) as usize).min(GRID_COLUMNS - 1);
        let row = ((y / self.cell_height) as usize).min(GRID_ROWS - 1);
        &self.cells[row * GRID_COLUMNS + col]
    }

    /// Keys spatially near `index`, itself first, then by center distance.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.neighbors.get(index).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn ceil_div(value: i32, parts: i32) -> i32 {
    ((value + parts - 1) / parts).max(1)
}
