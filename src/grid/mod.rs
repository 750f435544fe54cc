//! Binary grid-shift files: parsed sub-grids and bilinear shift lookup.
//!
//! All header extents are arc-seconds with longitudes positive **west**, the
//! convention of the file format. [`Grid::shift`] takes and returns ordinary
//! east-positive degrees.

mod parser;
mod source;

pub use parser::parse;
pub use source::{GridCache, GridSource};

use ndarray::Array3;

const SECONDS_PER_DEGREE: f64 = 3600.0;

/// Fixed-point iterations in [`Grid::apply_inverse`].
const INVERSE_STEPS: usize = 4;

/// Sub-file header. Extents and increments in arc-seconds, positive west.
#[derive(Clone, Debug, PartialEq)]
pub struct GridHeader {
    pub name: String,
    pub parent: String,
    pub s_lat: f64,
    pub n_lat: f64,
    pub e_long: f64,
    pub w_long: f64,
    pub lat_inc: f64,
    pub long_inc: f64,
    pub rows: usize,
    pub cols: usize,
}

impl GridHeader {
    fn contains(&self, lon_w: f64, lat: f64) -> bool {
        lat >= self.s_lat && lat <= self.n_lat && lon_w >= self.e_long && lon_w <= self.w_long
    }

    fn cell_area(&self) -> f64 {
        self.lat_inc * self.long_inc
    }
}

/// One sub-grid: header plus nodes shaped `(rows, cols, 4)`.
///
/// Rows run south to north, columns east to west. The last axis holds
/// `(lat_shift, lon_shift, lat_accuracy, lon_accuracy)` in arc-seconds.
#[derive(Clone, Debug)]
pub struct SubGrid {
    pub header: GridHeader,
    pub nodes: Array3<f32>,
}

impl SubGrid {
    /// Bilinear interpolation of `(lat_shift, lon_shift)` in arc-seconds.
    ///
    /// Indices past the last row or column reuse the edge node and the
    /// fractional offsets are clamped to [0, 1], so points outside the
    /// extent get the nearest edge value.
    fn interpolate(&self, lon_w: f64, lat: f64) -> (f64, f64) {
        let h = &self.header;
        let x = (lon_w - h.e_long) / h.long_inc;
        let y = (lat - h.s_lat) / h.lat_inc;

        let (c0, c1, dx) = corner_indices(x, h.cols);
        let (r0, r1, dy) = corner_indices(y, h.rows);

        let node = |r: usize, c: usize, k: usize| f64::from(self.nodes[[r, c, k]]);
        let blend = |k: usize| {
            let south = node(r0, c0, k) * (1.0 - dx) + node(r0, c1, k) * dx;
            let north = node(r1, c0, k) * (1.0 - dx) + node(r1, c1, k) * dx;
            south * (1.0 - dy) + north * dy
        };
        (blend(0), blend(1))
    }
}

fn corner_indices(pos: f64, len: usize) -> (usize, usize, f64) {
    let last = len.saturating_sub(1);
    // Infinite input lands on the edge; NaN casts to 0 and propagates through the offset
    let pos = pos.clamp(0.0, last as f64);
    let floor = pos.floor();
    let i0 = (floor as usize).min(last);
    let i1 = i0.saturating_add(1).min(last);
    (i0, i1, (pos - floor).clamp(0.0, 1.0))
}

/// A parsed grid-shift file.
#[derive(Clone, Debug)]
pub struct Grid {
    subgrids: Vec<SubGrid>,
}

impl Grid {
    pub fn new(subgrids: Vec<SubGrid>) -> Self {
        Self { subgrids }
    }

    pub fn subgrids(&self) -> &[SubGrid] {
        &self.subgrids
    }

    /// Finest sub-grid containing the point, else the first one.
    fn select(&self, lon_w: f64, lat: f64) -> Option<&SubGrid> {
        self.subgrids
            .iter()
            .filter(|g| g.header.contains(lon_w, lat))
            .min_by(|a, b| a.header.cell_area().total_cmp(&b.header.cell_area()))
            .or_else(|| self.subgrids.first())
    }

    /// Interpolated shift at `(lon, lat)` degrees, as `(dlon, dlat)` degrees
    /// with longitude positive east.
    pub fn shift(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lon_w = -lon * SECONDS_PER_DEGREE;
        let lat_s = lat * SECONDS_PER_DEGREE;
        match self.select(lon_w, lat_s) {
            Some(sub) => {
                let (dlat, dlon_w) = sub.interpolate(lon_w, lat_s);
                (-dlon_w / SECONDS_PER_DEGREE, dlat / SECONDS_PER_DEGREE)
            }
            None => (f64::NAN, f64::NAN),
        }
    }

    /// Apply the shift once: `out = in + shift(in)`.
    pub fn apply(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (dlon, dlat) = self.shift(lon, lat);
        (lon + dlon, lat + dlat)
    }

    /// Undo [`Grid::apply`] with four fixed-point steps of
    /// `guess = target - shift(guess)`.
    pub fn apply_inverse(&self, lon: f64, lat: f64) -> (f64, f64) {
        let mut guess = (lon, lat);
        for _ in 0..INVERSE_STEPS {
            let (dlon, dlat) = self.shift(guess.0, guess.1);
            guess = (lon - dlon, lat - dlat);
        }
        guess
    }
}
