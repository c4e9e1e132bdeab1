use rand::Rng;

/// Integer coordinate on one of the bridge grids (screen, minimap or raw world).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance.
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Point reflected through the centre of a square grid of `size` cells.
    pub fn mirrored(&self, size: i32) -> Point {
        Point::new(size - 1 - self.x, size - 1 - self.y)
    }

    /// Same point shifted by a uniform offset in `[-radius, radius]` on both axes.
    pub fn jittered<R: Rng + ?Sized>(&self, radius: i32, rng: &mut R) -> Point {
        if radius <= 0 {
            return *self;
        }
        self.offset(
            rng.random_range(-radius..=radius),
            rng.random_range(-radius..=radius),
        )
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

/// Inclusive rectangle on a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Bounds {
    /// Square grid `[0, size)` on both axes.
    pub fn square(size: i32) -> Self {
        let max = (size - 1).max(0);
        Self {
            min_x: 0,
            max_x: max,
            min_y: 0,
            max_y: max,
        }
    }

    pub fn contains(&self, pos: &Point) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.y >= self.min_y && pos.y <= self.max_y
    }

    pub fn clamp(&self, pos: Point) -> Point {
        Point::new(
            pos.x.clamp(self.min_x, self.max_x),
            pos.y.clamp(self.min_y, self.max_y),
        )
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2,
            (self.min_y + self.max_y) / 2,
        )
    }

    /// Corners pulled `margin` cells towards the centre, clockwise from the top left.
    pub fn inset_corners(&self, margin: i32) -> [Point; 4] {
        [
            Point::new(self.min_x + margin, self.min_y + margin),
            Point::new(self.max_x - margin, self.min_y + margin),
            Point::new(self.max_x - margin, self.max_y - margin),
            Point::new(self.min_x + margin, self.max_y - margin),
        ]
    }
}
