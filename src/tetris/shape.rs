use crate::tetris::prelude::*;

/// The outermost cells of one rotation along one direction, keyed by the
/// perpendicular index. Dropping a block only has to consider its BOT crust,
/// one cell per occupied column, instead of all four cells.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Crust {
    cells: [Coord; MAX_BLOCK_LEN],
    len: usize,
}

impl Crust {
    /// The crust cells, in perpendicular-index order.
    pub fn cells(&self) -> &[Coord] {
        &self.cells[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// One of the seven tetrominoes, fully precomputed: every distinct rotation
/// as a normalized cell table, its bounding box, and its four crusts.
/// Immutable after construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,

    /// Number of distinct rotations: 1 for O, 2 for I/S/Z, 4 for J/L/T.
    pub n_rot: usize,

    /// The larger of width and height across rotations; a spawned block is
    /// elevated by this much so no rotation can poke above the ceiling.
    pub max_dim_len: i32,

    /// Normalized cells per rotation; only the first n_rot entries are live.
    rot: [[Coord; MAX_BLOCK_LEN]; NUM_SHAPE_ROTATIONS],

    /// Bounding box (w, h) per rotation.
    rot_wh: [Coord; NUM_SHAPE_ROTATIONS],

    /// Crusts indexed by [rotation][direction].
    crust: [[Crust; 4]; NUM_SHAPE_ROTATIONS],
}

impl Shape {
    /// Builds a shape from its base cell table by rotating it a quarter turn
    /// at a time and renormalizing, stopping once the forms start repeating.
    fn new(kind: ShapeKind) -> Shape {
        let base = normalized(base_cells(kind));
        let wh = bounding_box(&base);
        let max_dim_len = wh.x.max(wh.y);

        let mut rot = [base; NUM_SHAPE_ROTATIONS];
        for r in 1..NUM_SHAPE_ROTATIONS {
            rot[r] = rotated(&rot[r - 1], max_dim_len);
        }

        // The first quarter turn that reproduces the base form bounds the
        // distinct rotation count.
        let n_rot = (1..NUM_SHAPE_ROTATIONS)
            .find(|&r| canonical(&rot[r]) == canonical(&rot[0]))
            .unwrap_or(NUM_SHAPE_ROTATIONS);

        let mut rot_wh = [Coord::default(); NUM_SHAPE_ROTATIONS];
        let mut crust = [[Crust::default(); 4]; NUM_SHAPE_ROTATIONS];
        for r in 0..n_rot {
            rot_wh[r] = bounding_box(&rot[r]);
            for dir in Direction::all() {
                crust[r][dir as usize] = crust_of(&rot[r], dir);
            }
        }

        Shape {
            kind,
            n_rot,
            max_dim_len,
            rot,
            rot_wh,
            crust,
        }
    }

    /// The normalized cells of the given rotation.
    pub fn cells(&self, rot: usize) -> &[Coord; MAX_BLOCK_LEN] {
        &self.rot[rot % self.n_rot]
    }

    /// The bounding box (w, h) of the given rotation.
    pub fn rot_wh(&self, rot: usize) -> Coord {
        self.rot_wh[rot % self.n_rot]
    }

    /// The crust of the given rotation along a direction.
    pub fn crust(&self, rot: usize, dir: Direction) -> &Crust {
        &self.crust[rot % self.n_rot][dir as usize]
    }
}

/// The catalog of all seven shapes, constructed once and borrowed everywhere.
#[derive(Clone, Debug)]
pub struct ShapeTable {
    shapes: [Shape; NUM_TETRIS_SHAPES],
}

impl ShapeTable {
    pub fn new() -> ShapeTable {
        ShapeTable {
            shapes: ShapeKind::all().map(Shape::new),
        }
    }

    /// Gets a shape by catalog index.
    pub fn get(&self, i: usize) -> &Shape {
        &self.shapes[i]
    }

    /// Gets a shape by kind.
    pub fn by_kind(&self, kind: ShapeKind) -> &Shape {
        &self.shapes[kind as usize]
    }

    pub fn count(&self) -> usize {
        NUM_TETRIS_SHAPES
    }
}

impl Default for ShapeTable {
    fn default() -> Self {
        ShapeTable::new()
    }
}

/// Base cell tables; y grows upward, so the first row listed is the bottom.
fn base_cells(kind: ShapeKind) -> [Coord; MAX_BLOCK_LEN] {
    let raw: [(i32, i32); MAX_BLOCK_LEN] = match kind {
        // ####
        ShapeKind::I => [(0, 0), (1, 0), (2, 0), (3, 0)],
        // #
        // ###
        ShapeKind::J => [(0, 0), (1, 0), (2, 0), (0, 1)],
        //   #
        // ###
        ShapeKind::L => [(0, 0), (1, 0), (2, 0), (2, 1)],
        // ##
        // ##
        ShapeKind::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
        //  ##
        // ##
        ShapeKind::S => [(0, 0), (1, 0), (1, 1), (2, 1)],
        //  #
        // ###
        ShapeKind::T => [(0, 0), (1, 0), (2, 0), (1, 1)],
        // ##
        //  ##
        ShapeKind::Z => [(1, 0), (2, 0), (0, 1), (1, 1)],
    };
    raw.map(|(x, y)| Coord::new(x, y))
}

/// Translates cells so the minimum x and y are both zero.
fn normalized(cells: [Coord; MAX_BLOCK_LEN]) -> [Coord; MAX_BLOCK_LEN] {
    let min = Coord::new(
        cells.iter().map(|c| c.x).min().unwrap_or(0),
        cells.iter().map(|c| c.y).min().unwrap_or(0),
    );
    cells.map(|c| c - min)
}

/// One quarter turn about the max_dim_len box, renormalized.
fn rotated(cells: &[Coord; MAX_BLOCK_LEN], max_dim_len: i32) -> [Coord; MAX_BLOCK_LEN] {
    normalized(cells.map(|c| Coord::new(c.y, max_dim_len - 1 - c.x)))
}

/// Sorted copy of the cells, used to compare rotation forms.
fn canonical(cells: &[Coord; MAX_BLOCK_LEN]) -> [Coord; MAX_BLOCK_LEN] {
    let mut sorted = *cells;
    sorted.sort_unstable();
    sorted
}

fn bounding_box(cells: &[Coord; MAX_BLOCK_LEN]) -> Coord {
    Coord::new(
        cells.iter().map(|c| c.x).max().unwrap_or(-1) + 1,
        cells.iter().map(|c| c.y).max().unwrap_or(-1) + 1,
    )
}

/// Keeps, for each perpendicular index, the cell extremal along dir.
fn crust_of(cells: &[Coord; MAX_BLOCK_LEN], dir: Direction) -> Crust {
    let mut best: [Option<Coord>; MAX_BLOCK_LEN] = [None; MAX_BLOCK_LEN];
    for c in cells {
        let key = match dir {
            Direction::Bot | Direction::Top => c.x,
            Direction::Left | Direction::Right => c.y,
        } as usize;
        let replace = match (dir, best[key]) {
            (_, None) => true,
            (Direction::Bot, Some(b)) => c.y < b.y,
            (Direction::Top, Some(b)) => c.y > b.y,
            (Direction::Left, Some(b)) => c.x < b.x,
            (Direction::Right, Some(b)) => c.x > b.x,
        };
        if replace {
            best[key] = Some(*c);
        }
    }

    let mut crust = Crust::default();
    for cell in best.into_iter().flatten() {
        crust.cells[crust.len] = cell;
        crust.len += 1;
    }
    crust
}
