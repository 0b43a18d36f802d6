//! HeightGrid: local heightmap with elevation queries and ground probing.

use holdout_core::interfaces::GroundProbe;
use holdout_core::types::Position;

/// Height grid placement and resolution in simulation space.
#[derive(Debug, Clone)]
pub struct HeightGridHeader {
    /// X of the west edge (meters).
    pub origin_x: f64,
    /// Y of the south edge (meters).
    pub origin_y: f64,
    /// Meters per grid cell.
    pub cell_size: f64,
    /// Number of columns (west to east).
    pub width: u32,
    /// Number of rows (north to south).
    pub height: u32,
}

impl HeightGridHeader {
    /// Y of the north edge (meters).
    pub fn north_y(&self) -> f64 {
        self.origin_y + self.height as f64 * self.cell_size
    }

    /// X of the east edge (meters).
    pub fn east_x(&self) -> f64 {
        self.origin_x + self.width as f64 * self.cell_size
    }
}

/// Heightmap covering a rectangle of the arena.
#[derive(Debug, Clone)]
pub struct HeightGrid {
    pub header: HeightGridHeader,
    /// Elevation values in meters, row-major (north-to-south, west-to-east).
    pub elevations: Vec<f32>,
}

impl HeightGrid {
    /// Returns None when the elevation buffer does not match the header size.
    pub fn new(header: HeightGridHeader, elevations: Vec<f32>) -> Option<Self> {
        let expected = header.width as usize * header.height as usize;
        if header.width == 0 || header.height == 0 || elevations.len() != expected {
            return None;
        }
        Some(Self { header, elevations })
    }

    /// Square grid centred on the origin, filled by sampling `f(x, y)` at
    /// each cell's north-west corner.
    pub fn centered<F>(half_extent: f64, cell_size: f64, f: F) -> Self
    where
        F: Fn(f64, f64) -> f32,
    {
        let cells = ((2.0 * half_extent) / cell_size).ceil().max(1.0) as u32;
        let header = HeightGridHeader {
            origin_x: -half_extent,
            origin_y: -half_extent,
            cell_size,
            width: cells,
            height: cells,
        };
        let north = header.north_y();
        let mut elevations = Vec::with_capacity((cells * cells) as usize);
        for row in 0..cells {
            for col in 0..cells {
                let x = header.origin_x + col as f64 * cell_size;
                let y = north - row as f64 * cell_size;
                elevations.push(f(x, y));
            }
        }
        Self { header, elevations }
    }

    /// Convert a sim-space position to grid row/col (fractional).
    /// Returns None if outside grid bounds.
    fn sim_to_grid(&self, pos: &Position) -> Option<(f64, f64)> {
        let h = &self.header;
        let col = (pos.x - h.origin_x) / h.cell_size;
        // Row 0 = north edge
        let row = (h.north_y() - pos.y) / h.cell_size;

        if col < 0.0 || row < 0.0 || col >= h.width as f64 || row >= h.height as f64 {
            return None;
        }
        Some((row, col))
    }

    fn raw_elevation(&self, row: usize, col: usize) -> f32 {
        let h = &self.header;
        if row >= h.height as usize || col >= h.width as usize {
            return 0.0;
        }
        self.elevations[row * h.width as usize + col]
    }

    /// Elevation at a sim-space position with bilinear interpolation.
    /// Returns None if the position is outside the grid.
    pub fn elevation_at(&self, pos: &Position) -> Option<f64> {
        let (row, col) = self.sim_to_grid(pos)?;
        Some(self.bilinear(row, col))
    }

    fn bilinear(&self, row: f64, col: f64) -> f64 {
        let r0 = row.floor() as usize;
        let c0 = col.floor() as usize;
        let r1 = (r0 + 1).min(self.header.height as usize - 1);
        let c1 = (c0 + 1).min(self.header.width as usize - 1);

        let fr = row - r0 as f64;
        let fc = col - c0 as f64;

        let e00 = self.raw_elevation(r0, c0) as f64;
        let e01 = self.raw_elevation(r0, c1) as f64;
        let e10 = self.raw_elevation(r1, c0) as f64;
        let e11 = self.raw_elevation(r1, c1) as f64;

        let top = e00 * (1.0 - fc) + e01 * fc;
        let bot = e10 * (1.0 - fc) + e11 * fc;
        top * (1.0 - fr) + bot * fr
    }
}

impl GroundProbe for HeightGrid {
    fn probe_down(&self, origin: Position, reach: f64) -> Option<f64> {
        let ground = self.elevation_at(&origin)?;
        let drop = origin.z - ground;
        (0.0..=reach).contains(&drop).then_some(ground)
    }
}

/// Infinite flat ground at a fixed height.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGround {
    pub height: f64,
}

impl GroundProbe for FlatGround {
    fn probe_down(&self, origin: Position, reach: f64) -> Option<f64> {
        let drop = origin.z - self.height;
        (0.0..=reach).contains(&drop).then_some(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5×5 grid of 10 m cells covering (0,0)..(50,50) with a 100 m peak in the middle.
    fn make_test_grid() -> HeightGrid {
        #[rustfmt::skip]
        let elevations: Vec<f32> = vec![
            0.0,   0.0,   0.0,  0.0, 0.0,
            0.0,  50.0,  50.0, 50.0, 0.0,
            0.0,  50.0, 100.0, 50.0, 0.0,
            0.0,  50.0,  50.0, 50.0, 0.0,
            0.0,   0.0,   0.0,  0.0, 0.0,
        ];
        HeightGrid::new(
            HeightGridHeader {
                origin_x: 0.0,
                origin_y: 0.0,
                cell_size: 10.0,
                width: 5,
                height: 5,
            },
            elevations,
        )
        .unwrap()
    }

    /// Sim-space position of a fractional grid row/col.
    fn at(grid: &HeightGrid, row: f64, col: f64) -> Position {
        let h = &grid.header;
        Position::new(
            h.origin_x + col * h.cell_size,
            h.north_y() - row * h.cell_size,
            0.0,
        )
    }

    #[test]
    fn test_elevation_query_center() {
        let grid = make_test_grid();
        let e = grid.elevation_at(&at(&grid, 2.0, 2.0)).unwrap();
        assert!((e - 100.0).abs() < 1e-6, "Peak should be 100m, got {e}");
    }

    #[test]
    fn test_elevation_outside_grid() {
        let grid = make_test_grid();
        assert!(grid.elevation_at(&Position::new(-1.0, 10.0, 0.0)).is_none());
        assert!(grid.elevation_at(&Position::new(10.0, 60.0, 0.0)).is_none());
    }

    #[test]
    fn test_elevation_bilinear_interpolation() {
        let grid = make_test_grid();
        // Row 1 col 2 = 50, Row 2 col 2 = 100 → 75 halfway
        let e = grid.elevation_at(&at(&grid, 1.5, 2.0)).unwrap();
        assert!((e - 75.0).abs() < 1e-6, "Interpolated should be 75m, got {e}");
    }

    #[test]
    fn test_new_rejects_size_mismatch() {
        let header = HeightGridHeader {
            origin_x: 0.0,
            origin_y: 0.0,
            cell_size: 1.0,
            width: 3,
            height: 3,
        };
        assert!(HeightGrid::new(header, vec![0.0; 8]).is_none());
    }

    #[test]
    fn test_probe_within_reach() {
        let grid = make_test_grid();
        let mut origin = at(&grid, 2.0, 2.0);
        origin.z = 110.0;
        assert_eq!(grid.probe_down(origin, 20.0), Some(100.0));
    }

    #[test]
    fn test_probe_misses_when_ground_too_far() {
        let grid = make_test_grid();
        let mut origin = at(&grid, 2.0, 2.0);
        // Probe starts below the peak
        origin.z = 50.0;
        assert_eq!(grid.probe_down(origin, 20.0), None);
        // Probe starts far above the peak
        origin.z = 200.0;
        assert_eq!(grid.probe_down(origin, 20.0), None);
    }

    #[test]
    fn test_centered_grid_samples_function() {
        let grid = HeightGrid::centered(20.0, 5.0, |x, _y| (x * 0.1) as f32);
        assert_eq!(grid.header.width, 8);
        let e = grid.elevation_at(&Position::new(10.0, 0.0, 0.0)).unwrap();
        assert!((e - 1.0).abs() < 1e-6, "Expected 1m slope height, got {e}");
    }

    #[test]
    fn test_flat_ground() {
        let ground = FlatGround { height: 2.0 };
        assert_eq!(ground.probe_down(Position::new(5.0, 5.0, 12.0), 20.0), Some(2.0));
        assert_eq!(ground.probe_down(Position::new(5.0, 5.0, 30.0), 20.0), None);
    }
}
