use nalgebra::Point3;

/// Integer coordinates of a cubic cell in a uniform spatial grid.
pub type CellIndex = (i64, i64, i64);

pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    nalgebra::distance(a, b)
}

/// Returns the cell that contains `point` in a grid of cubes with side `edge`.
///
/// Two points closer than `edge` along every axis always land in the same or in
/// adjacent cells, which is what makes a 27-cell neighborhood search exhaustive.
pub fn cell_index(point: &Point3<f64>, edge: f64) -> CellIndex {
    (
        (point.x / edge).floor() as i64,
        (point.y / edge).floor() as i64,
        (point.z / edge).floor() as i64,
    )
}

pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Point3<f64>> {
    let mut sum = nalgebra::Vector3::zeros();
    let mut count = 0usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(Point3::from(sum / count as f64))
    }
}
