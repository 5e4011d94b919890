//! Extracting vector shapes from raster grids.
//!
//! The inverse of rasterization: 4-connected runs of equal-valued,
//! non-nodata cells become polygon features tagged with their cell value.

use std::collections::HashMap;

use sdm_common::{
    AffineTransform, AttrValue, Band, Feature, Geometry, Polygon, RasterGrid, Result,
    VectorGeometrySet,
};

/// Extract one polygon feature per 4-connected region of same-valued,
/// non-nodata cells. Each feature carries a `"value"` attribute holding
/// the region's cell value; the output set keeps the grid's CRS.
pub fn polygonize(grid: &RasterGrid) -> Result<VectorGeometrySet> {
    polygonize_band(grid.band(), grid.transform(), grid.nodata()).map(|features| {
        VectorGeometrySet::new(features, grid.crs())
    })
}

/// [`polygonize`] over a bare band with explicit georeferencing.
pub fn polygonize_band(
    band: &Band,
    transform: &AffineTransform,
    nodata: f64,
) -> Result<Vec<Feature>> {
    let (width, height) = band.shape();
    let mut visited = vec![false; band.len()];
    let mut features = Vec::new();

    for start in 0..band.len() {
        if visited[start] || band.get_flat(start) == nodata {
            continue;
        }
        let value = band.get_flat(start);
        let component = flood_fill(band, &mut visited, start, value);
        let polygon = trace_component(&component, width, height, transform);
        features.push(
            Feature::new(Geometry::Polygon(polygon))
                .with_attribute("value", AttrValue::Float(value)),
        );
    }
    tracing::debug!("polygonized {} regions", features.len());
    Ok(features)
}

/// Collect the flat indices of the 4-connected component containing
/// `start`, marking them visited.
fn flood_fill(band: &Band, visited: &mut [bool], start: usize, value: f64) -> Vec<usize> {
    let width = band.width();
    let height = band.height();
    let mut stack = vec![start];
    let mut component = Vec::new();
    visited[start] = true;
    while let Some(index) = stack.pop() {
        component.push(index);
        let (col, row) = band.unravel(index);
        let mut push = |c: usize, r: usize| {
            let neighbor = r * width + c;
            if !visited[neighbor] && band.get_flat(neighbor) == value {
                visited[neighbor] = true;
                stack.push(neighbor);
            }
        };
        if col > 0 {
            push(col - 1, row);
        }
        if col + 1 < width {
            push(col + 1, row);
        }
        if row > 0 {
            push(col, row - 1);
        }
        if row + 1 < height {
            push(col, row + 1);
        }
    }
    component
}

/// Trace the boundary rings of a component and assemble them into a
/// polygon in world coordinates.
///
/// Every cell side not shared with another component cell contributes one
/// directed edge between lattice corners; chaining the edges yields closed
/// rings. The ring with the largest area is the exterior, the rest are
/// holes.
fn trace_component(
    component: &[usize],
    width: usize,
    height: usize,
    transform: &AffineTransform,
) -> Polygon {
    let in_component: std::collections::HashSet<usize> = component.iter().copied().collect();
    let contains = |col: i64, row: i64| -> bool {
        col >= 0
            && row >= 0
            && (col as usize) < width
            && (row as usize) < height
            && in_component.contains(&(row as usize * width + col as usize))
    };

    // Directed boundary edges between integer lattice corners, walking
    // clockwise around each cell in pixel space.
    let mut edges: Vec<((i64, i64), (i64, i64))> = Vec::new();
    for &index in component {
        let col = (index % width) as i64;
        let row = (index / width) as i64;
        if !contains(col, row - 1) {
            edges.push(((col, row), (col + 1, row)));
        }
        if !contains(col + 1, row) {
            edges.push(((col + 1, row), (col + 1, row + 1)));
        }
        if !contains(col, row + 1) {
            edges.push(((col + 1, row + 1), (col, row + 1)));
        }
        if !contains(col - 1, row) {
            edges.push(((col, row + 1), (col, row)));
        }
    }

    let rings = chain_edges(edges);

    // Largest-area ring is the exterior boundary.
    let mut world_rings: Vec<(f64, Vec<(f64, f64)>)> = rings
        .into_iter()
        .map(|ring| {
            let area = shoelace(&ring).abs();
            let world = ring
                .into_iter()
                .map(|(c, r)| transform.forward(c as f64, r as f64))
                .collect();
            (area, world)
        })
        .collect();
    world_rings.sort_by(|a, b| b.0.partial_cmp(&a.0).expect("NaN ring area"));

    let mut iter = world_rings.into_iter().map(|(_, ring)| ring);
    let exterior = iter.next().unwrap_or_default();
    Polygon::with_holes(exterior, iter.collect())
}

/// Chain directed edges into closed rings. At corners where two regions
/// touch diagonally a point has two outgoing edges; preferring the
/// sharpest right turn keeps the loops separate.
fn chain_edges(edges: Vec<((i64, i64), (i64, i64))>) -> Vec<Vec<(i64, i64)>> {
    let mut by_start: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, (start, _)) in edges.iter().enumerate() {
        by_start.entry(*start).or_default().push(i);
    }
    let mut used = vec![false; edges.len()];
    let mut rings = Vec::new();

    for first in 0..edges.len() {
        if used[first] {
            continue;
        }
        let mut ring = Vec::new();
        let mut current = first;
        loop {
            used[current] = true;
            let (start, end) = edges[current];
            ring.push(start);
            let incoming = (end.0 - start.0, end.1 - start.1);
            let candidates = match by_start.get(&end) {
                Some(c) => c,
                None => break,
            };
            let next = candidates
                .iter()
                .copied()
                .filter(|&i| !used[i])
                .min_by_key(|&i| {
                    let (s, e) = edges[i];
                    let outgoing = (e.0 - s.0, e.1 - s.1);
                    turn_priority(incoming, outgoing)
                });
            match next {
                Some(i) => current = i,
                None => break, // ring closed
            }
        }
        if ring.len() >= 4 {
            rings.push(ring);
        }
    }
    rings
}

/// Rank an outgoing direction relative to the incoming one:
/// right turn < straight < left turn (u-turns never occur on a boundary).
fn turn_priority(incoming: (i64, i64), outgoing: (i64, i64)) -> i64 {
    let cross = incoming.0 * outgoing.1 - incoming.1 * outgoing.0;
    let dot = incoming.0 * outgoing.0 + incoming.1 * outgoing.1;
    if cross > 0 {
        0 // right turn in row-down pixel space
    } else if dot > 0 {
        1 // straight
    } else {
        2 // left turn
    }
}

fn shoelace(ring: &[(i64, i64)]) -> f64 {
    let mut area2 = 0i64;
    for i in 0..ring.len() {
        let (x1, y1) = ring[i];
        let (x2, y2) = ring[(i + 1) % ring.len()];
        area2 += x1 * y2 - x2 * y1;
    }
    area2 as f64 / 2.0
}
