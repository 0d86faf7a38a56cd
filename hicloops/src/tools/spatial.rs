//! Uniform grid over 2-D points for fixed-radius neighbour queries.
//!
//! Points are bucketed into square cells with side `cell_size`. A query with
//! radius `r <= cell_size` only needs the 3x3 block of cells around the query
//! cell, which keeps both DBSCAN neighbour counting and merge lookups close to
//! linear in the number of points.

use anyhow::ensure;
use hashbrown::HashMap;

type CellKey = (i64, i64);

#[derive(Debug, Clone)]
pub struct GridIndex {
    cell_size: f64,
    points:    Vec<(f64, f64)>,
    cells:     HashMap<CellKey, Vec<usize>>,
}

impl GridIndex {
    /// Creates an empty index. `cell_size` must be positive and finite.
    pub fn new(cell_size: f64) -> anyhow::Result<Self> {
        ensure!(
            cell_size.is_finite() && cell_size > 0.0,
            "Grid cell size must be positive and finite, got {}",
            cell_size
        );
        Ok(Self {
            cell_size,
            points: Vec::new(),
            cells: HashMap::new(),
        })
    }

    /// Builds an index over `points`; each point is identified by its
    /// position in the input.
    pub fn from_points<I>(
        cell_size: f64,
        points: I,
    ) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (f64, f64)>, {
        let mut index = Self::new(cell_size)?;
        for point in points {
            index.insert(point);
        }
        Ok(index)
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Adds a point and returns its id.
    pub fn insert(
        &mut self,
        point: (f64, f64),
    ) -> usize {
        let id = self.points.len();
        self.points.push(point);
        self.cells.entry(self.cell_of(point)).or_default().push(id);
        id
    }

    pub fn point(
        &self,
        id: usize,
    ) -> (f64, f64) {
        self.points[id]
    }

    fn cell_of(
        &self,
        (x, y): (f64, f64),
    ) -> CellKey {
        (
            (x / self.cell_size).floor() as i64,
            (y / self.cell_size).floor() as i64,
        )
    }

    /// Ids of all points with Euclidean distance `<= radius` from `query`,
    /// in ascending id order.
    ///
    /// # Panics
    /// If `radius` exceeds the cell size.
    pub fn within(
        &self,
        query: (f64, f64),
        radius: f64,
    ) -> Vec<usize> {
        assert!(
            radius <= self.cell_size,
            "Query radius {} exceeds grid cell size {}",
            radius,
            self.cell_size
        );
        let r2 = radius * radius;
        let mut found = self
            .candidates(query)
            .filter(|id| squared_dist(query, self.points[*id]) <= r2)
            .collect::<Vec<_>>();
        found.sort_unstable();
        found
    }

    /// Nearest point with distance `<= radius` from `query` as
    /// `(id, distance)`. Equidistant points resolve to the lowest id.
    pub fn nearest_within(
        &self,
        query: (f64, f64),
        radius: f64,
    ) -> Option<(usize, f64)> {
        assert!(
            radius <= self.cell_size,
            "Query radius {} exceeds grid cell size {}",
            radius,
            self.cell_size
        );
        let r2 = radius * radius;
        self.candidates(query)
            .map(|id| (id, squared_dist(query, self.points[id])))
            .filter(|(_, d2)| *d2 <= r2)
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(id, d2)| (id, d2.sqrt()))
    }

    fn candidates(
        &self,
        query: (f64, f64),
    ) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy) = self.cell_of(query);
        (cx - 1..=cx + 1)
            .flat_map(move |x| (cy - 1..=cy + 1).map(move |y| (x, y)))
            .filter_map(move |key| self.cells.get(&key))
            .flatten()
            .copied()
    }
}

fn squared_dist(
    a: (f64, f64),
    b: (f64, f64),
) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_is_boundary_inclusive() {
        let index =
            GridIndex::from_points(2.0, [(0.0, 0.0), (2.0, 0.0), (0.0, 2.1), (-1.0, -1.0)])
                .unwrap();
        assert_eq!(index.within((0.0, 0.0), 2.0), vec![0, 1, 3]);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_within_across_cells() {
        let index = GridIndex::from_points(1.0, [(0.99, 0.99), (1.01, 1.01), (3.0, 3.0)])
            .unwrap();
        assert_eq!(index.within((1.0, 1.0), 1.0), vec![0, 1]);
        assert_eq!(index.within((3.0, 3.0), 1.0), vec![2]);
        assert!(index.within((10.0, 10.0), 1.0).is_empty());
    }

    #[test]
    fn test_nearest_within() {
        let index = GridIndex::from_points(20_000.0, [
            (100_000.0, 200_000.0),
            (110_000.0, 200_000.0),
        ])
        .unwrap();
        let (id, dist) = index.nearest_within((105_000.0, 205_000.0), 20_000.0).unwrap();
        assert_eq!(id, 0);
        assert!((dist - 7071.0678).abs() < 1e-3);
        assert!(index.nearest_within((500_000.0, 900_000.0), 20_000.0).is_none());
    }

    #[test]
    fn test_negative_coordinates() {
        let index = GridIndex::from_points(1.0, [(-0.5, -0.5), (0.4, 0.4)]).unwrap();
        assert_eq!(index.within((0.0, 0.0), 1.0), vec![0, 1]);
    }

    #[test]
    fn test_invalid_cell_size() {
        assert!(GridIndex::new(0.0).is_err());
        assert!(GridIndex::new(-1.0).is_err());
        assert!(GridIndex::new(f64::INFINITY).is_err());
    }

    #[test]
    #[should_panic]
    fn test_radius_larger_than_cell_panics() {
        GridIndex::new(1.0).unwrap().within((0.0, 0.0), 2.0);
    }
}
