//! Parser for the little-endian grid-shift layout.
//!
//! The file is a sequence of 16-byte records: an 8-byte space-padded ASCII key
//! followed by an 8-byte value (i32 in the low half, f64, or ASCII text). Node
//! records hold four f32 instead.

use std::collections::HashMap;

use byteorder::{ByteOrder, LittleEndian};
use log::debug;
use ndarray::Array3;

use super::{Grid, GridHeader, SubGrid};
use crate::error::GridError;

const RECORD_LEN: usize = 16;

struct Records<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Records<'a> {
    fn next(&mut self) -> Result<&'a [u8], GridError> {
        let end = self.offset + RECORD_LEN;
        if end > self.bytes.len() {
            return Err(GridError::Truncated {
                expected: end,
                actual: self.bytes.len(),
            });
        }
        let rec = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(rec)
    }

    /// Read `count` keyed records into a lookup table.
    fn block(&mut self, count: usize) -> Result<HashMap<String, &'a [u8]>, GridError> {
        let mut map = HashMap::with_capacity(count);
        for _ in 0..count {
            let rec = self.next()?;
            map.insert(key(rec), &rec[8..]);
        }
        Ok(map)
    }
}

fn key(rec: &[u8]) -> String {
    String::from_utf8_lossy(&rec[..8])
        .trim_end_matches(|c: char| c == ' ' || c == '\0')
        .to_string()
}

fn text(value: &[u8]) -> String {
    String::from_utf8_lossy(value)
        .trim_end_matches(|c: char| c == ' ' || c == '\0')
        .to_string()
}

fn int_field(map: &HashMap<String, &[u8]>, name: &'static str) -> Result<i32, GridError> {
    map.get(name)
        .map(|v| LittleEndian::read_i32(&v[..4]))
        .ok_or(GridError::MissingKey(name))
}

fn float_field(map: &HashMap<String, &[u8]>, name: &'static str) -> Result<f64, GridError> {
    map.get(name)
        .map(|v| LittleEndian::read_f64(v))
        .ok_or(GridError::MissingKey(name))
}

fn count(value: i32, name: &str) -> Result<usize, GridError> {
    usize::try_from(value)
        .map_err(|_| GridError::InvalidHeader(format!("{name} must not be negative, got {value}")))
}

/// Nodes along one axis: `extent / inc + 1`, bounded by what GS_COUNT can hold.
fn node_count(extent: f64, inc: f64, axis: &str) -> Result<usize, GridError> {
    let steps = (extent / inc).round();
    if !(steps.is_finite() && steps >= 0.0 && steps < f64::from(i32::MAX)) {
        return Err(GridError::InvalidHeader(format!(
            "{axis} extent {extent} with increment {inc} gives too many nodes"
        )));
    }
    // Bounded above, so the cast and the increment cannot overflow
    Ok(steps as usize + 1)
}

/// Parse a complete grid file held in memory.
pub fn parse(bytes: &[u8]) -> Result<Grid, GridError> {
    let mut records = Records { bytes, offset: 0 };

    let first = records.next()?;
    if key(first) != "NUM_OREC" {
        return Err(GridError::MissingKey("NUM_OREC"));
    }
    let num_orec = count(LittleEndian::read_i32(&first[8..12]), "NUM_OREC")?;
    let mut overview = records.block(num_orec.saturating_sub(1))?;
    overview.insert("NUM_OREC".to_string(), &first[8..]);

    let num_srec = count(int_field(&overview, "NUM_SREC")?, "NUM_SREC")?;
    let num_file = count(int_field(&overview, "NUM_FILE")?, "NUM_FILE")?;
    if num_file == 0 {
        return Err(GridError::InvalidHeader("file holds no sub-grids".to_string()));
    }

    let mut subgrids = Vec::with_capacity(num_file);
    for _ in 0..num_file {
        let header = records.block(num_srec)?;
        subgrids.push(parse_subgrid(&header, &mut records)?);
    }

    // Anything after the last sub-grid (usually an END record) is ignored.
    debug!(
        "parsed grid: {} sub-grid(s), {} of {} bytes used",
        subgrids.len(),
        records.offset,
        bytes.len()
    );
    Ok(Grid::new(subgrids))
}

fn parse_subgrid(
    map: &HashMap<String, &[u8]>,
    records: &mut Records<'_>,
) -> Result<SubGrid, GridError> {
    let s_lat = float_field(map, "S_LAT")?;
    let n_lat = float_field(map, "N_LAT")?;
    let e_long = float_field(map, "E_LONG")?;
    let w_long = float_field(map, "W_LONG")?;
    let lat_inc = float_field(map, "LAT_INC")?;
    let long_inc = float_field(map, "LONG_INC")?;
    let gs_count = count(int_field(map, "GS_COUNT")?, "GS_COUNT")?;

    for (name, value) in [
        ("S_LAT", s_lat),
        ("N_LAT", n_lat),
        ("E_LONG", e_long),
        ("W_LONG", w_long),
        ("LAT_INC", lat_inc),
        ("LONG_INC", long_inc),
    ] {
        if !value.is_finite() {
            return Err(GridError::InvalidHeader(format!(
                "{name} must be finite, got {value}"
            )));
        }
    }
    if !(lat_inc > 0.0 && long_inc > 0.0) {
        return Err(GridError::InvalidHeader(format!(
            "increments must be positive, got LAT_INC={lat_inc} LONG_INC={long_inc}"
        )));
    }
    if !(n_lat >= s_lat && w_long >= e_long) {
        return Err(GridError::InvalidHeader(format!(
            "empty extent: S_LAT={s_lat} N_LAT={n_lat} E_LONG={e_long} W_LONG={w_long}"
        )));
    }

    let rows = node_count(n_lat - s_lat, lat_inc, "latitude")?;
    let cols = node_count(w_long - e_long, long_inc, "longitude")?;
    let total = rows.checked_mul(cols).ok_or_else(|| {
        GridError::InvalidHeader(format!("{rows}x{cols} nodes overflow the node count"))
    })?;
    if total != gs_count {
        return Err(GridError::CountMismatch {
            expected: gs_count,
            actual: total,
        });
    }

    let needed = gs_count
        .checked_mul(RECORD_LEN)
        .and_then(|len| len.checked_add(records.offset))
        .ok_or_else(|| GridError::InvalidHeader(format!("GS_COUNT {gs_count} is too large")))?;
    if needed > records.bytes.len() {
        return Err(GridError::Truncated {
            expected: needed,
            actual: records.bytes.len(),
        });
    }

    let mut nodes = Array3::<f32>::zeros((rows, cols, 4));
    for r in 0..rows {
        for c in 0..cols {
            let rec = records.next()?;
            for k in 0..4 {
                nodes[[r, c, k]] = LittleEndian::read_f32(&rec[k * 4..k * 4 + 4]);
            }
        }
    }

    let name = map.get("SUB_NAME").map(|v| text(v)).unwrap_or_default();
    let parent = map.get("PARENT").map(|v| text(v)).unwrap_or_default();
    debug!("sub-grid {name:?}: {rows}x{cols} nodes, parent {parent:?}");

    Ok(SubGrid {
        header: GridHeader {
            name,
            parent,
            s_lat,
            n_lat,
            e_long,
            w_long,
            lat_inc,
            long_inc,
            rows,
            cols,
        },
        nodes,
    })
}
