use super::grid::Grid;
use crate::error::{Error, Result};
use log::{debug, info};
use rand::Rng;
use rand::RngExt;

pub const MIN_ROWS: usize = 9;
pub const MIN_COLS: usize = 9;

/// Display state of a single tile. Exactly one per cell at any time.
///
/// `RevealedQuestioned` and `FlaggedMine` are presentation states carried by
/// the tile sprite sheet; the former is produced by the pressed-tile preview,
/// the latter is reserved by the sheet layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TileState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
    Questioned,
    RevealedQuestioned,
    Mine,
    DetonatedMine,
    FlaggedMine,
    Count(u8),
}

impl TileState {
    /// A tile the player has not opened yet: still eligible for reveal.
    pub fn is_unopened(self) -> bool {
        matches!(self, TileState::Hidden | TileState::Flagged | TileState::Questioned)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchState {
    #[default]
    Running,
    Won,
    Lost,
}

impl MatchState {
    pub fn is_end(&self) -> bool {
        matches!(self, MatchState::Won | MatchState::Lost)
    }
}

/// The mine layout and tile-visibility grid of one match.
///
/// Mutators take `&mut self`, so exactly one mutation can be in flight at a
/// time; a reveal worklist always drains before any other call can observe
/// the board.
#[derive(Clone, Debug)]
pub struct Board {
    mines: Grid<bool>,
    tiles: Grid<TileState>,
    num_mines: usize,
    flag_budget: isize,
    remaining_hidden: usize,
    state: MatchState,
}

fn validate_dimensions(rows: usize, cols: usize, num_mines: usize) -> Result<()> {
    if rows < MIN_ROWS {
        return Err(Error::InvalidConfiguration(format!("rows must be >= {MIN_ROWS}, got {rows}")));
    }
    if cols < MIN_COLS {
        return Err(Error::InvalidConfiguration(format!("cols must be >= {MIN_COLS}, got {cols}")));
    }
    if num_mines == 0 || num_mines >= rows * cols {
        return Err(Error::InvalidConfiguration(format!(
            "num_mines must be in [1, {}), got {num_mines}",
            rows * cols
        )));
    }
    Ok(())
}

impl Board {
    /// Create a board and place `num_mines` mines with `rng`.
    ///
    /// Rejected before any allocation when the dimensions or mine count are
    /// outside the supported range.
    pub fn new(rows: usize, cols: usize, num_mines: usize, rng: &mut impl Rng) -> Result<Self> {
        validate_dimensions(rows, cols, num_mines)?;

        let mut board = Self {
            mines: Grid::filled(cols, rows, false),
            tiles: Grid::filled(cols, rows, TileState::Hidden),
            num_mines,
            flag_budget: num_mines as isize,
            remaining_hidden: rows * cols,
            state: MatchState::Running,
        };
        board.place_mines(rng);

        info!("board initialized: {rows}x{cols}, {num_mines} mines");
        Ok(board)
    }

    /// Build a board with an explicit mine layout instead of a sampled one.
    /// The dimension constraints still apply.
    pub fn with_mine_layout(rows: usize, cols: usize, mine_coords: &[(usize, usize)]) -> Result<Self> {
        validate_dimensions(rows, cols, mine_coords.len())?;

        let mut mines = Grid::filled(cols, rows, false);
        for &(x, y) in mine_coords {
            let Some(cell) = mines.get_mut(x, y) else {
                return Err(Error::InvalidConfiguration(format!("mine out of bounds: ({x}, {y})")));
            };
            if *cell {
                return Err(Error::InvalidConfiguration(format!("duplicate mine: ({x}, {y})")));
            }
            *cell = true;
        }

        Ok(Self {
            mines,
            tiles: Grid::filled(cols, rows, TileState::Hidden),
            num_mines: mine_coords.len(),
            flag_budget: mine_coords.len() as isize,
            remaining_hidden: rows * cols,
            state: MatchState::Running,
        })
    }

    /// Restart the match: same dimensions and mine count, fresh layout.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.mines.fill(false);
        self.tiles.fill(TileState::Hidden);
        self.flag_budget = self.num_mines as isize;
        self.remaining_hidden = self.mines.len();
        self.state = MatchState::Running;
        self.place_mines(rng);

        debug!("board reset: {}x{}, {} mines", self.rows(), self.cols(), self.num_mines);
    }

    /// Rejection sampling: draw a flat index, retry on collision, until
    /// exactly `num_mines` distinct cells hold a mine.
    fn place_mines(&mut self, rng: &mut impl Rng) {
        let total = self.mines.len();
        let cells = self.mines.as_slice_mut();

        let mut placed = 0;
        while placed != self.num_mines {
            let index = rng.random_range(0..total);
            if cells[index] {
                continue;
            }
            cells[index] = true;
            placed += 1;
        }
    }

    pub fn rows(&self) -> usize {
        self.tiles.rows()
    }

    pub fn cols(&self) -> usize {
        self.tiles.cols()
    }

    pub fn num_mines(&self) -> usize {
        self.num_mines
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    /// Remaining flag budget shown by the mine counter. May go negative:
    /// over-flagging is permitted and the display clamps, not the budget.
    pub fn flag_budget(&self) -> isize {
        self.flag_budget
    }

    /// Number of cells still in an unopened state. The match is won when
    /// this reaches `num_mines`.
    pub fn remaining_hidden(&self) -> usize {
        self.remaining_hidden
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<TileState> {
        self.tiles.get(x, y).copied()
    }

    pub fn tiles(&self) -> &Grid<TileState> {
        &self.tiles
    }

    /// Whether `(x, y)` holds a mine; out-of-bounds coordinates do not.
    pub fn is_mine(&self, x: usize, y: usize) -> bool {
        self.mines.get(x, y).copied().unwrap_or(false)
    }

    /// Mines among the up-to-8 neighbors of `(x, y)`.
    pub fn adjacent_mines(&self, x: usize, y: usize) -> u8 {
        self.mines
            .neighbors(x, y)
            .iter()
            .filter(|&&(nx, ny)| self.mines[(nx, ny)])
            .count() as u8
    }

    /// Open the tile at `(x, y)`, flood-filling through its connected
    /// zero-adjacency region.
    ///
    /// Out-of-bounds coordinates and already-opened tiles are no-ops. The
    /// caller guarantees the target is not a mine; mine cells are routed to
    /// [`Board::detonate`] instead.
    pub fn reveal(&mut self, x: usize, y: usize) {
        if self.state.is_end() {
            return;
        }
        if !self.tiles.in_bounds(x, y) {
            return;
        }
        debug_assert!(!self.mines[(x, y)], "reveal() called on a mine cell");

        // Iterative flood fill. The worklist may hold duplicate or stale
        // entries; each pop re-validates the tile state before opening.
        let mut worklist: Vec<(usize, usize)> = Vec::with_capacity(self.tiles.len());
        worklist.push((x, y));

        while let Some((cx, cy)) = worklist.pop() {
            let tile = self.tiles[(cx, cy)];
            if !tile.is_unopened() {
                continue;
            }

            if tile == TileState::Flagged {
                // Revealing clears the flag, so the budget gets its unit back.
                self.flag_budget += 1;
            }

            let count = self.adjacent_mines(cx, cy);
            if count == 0 {
                self.tiles[(cx, cy)] = TileState::Revealed;
                worklist.extend(self.tiles.neighbors(cx, cy));
            } else {
                self.tiles[(cx, cy)] = TileState::Count(count);
            }
            self.remaining_hidden -= 1;
        }

        self.check_win();
    }

    /// Reveal every mine, mark the clicked one, end the match.
    pub fn detonate(&mut self, x: usize, y: usize) {
        if self.state.is_end() {
            return;
        }
        if !self.tiles.in_bounds(x, y) {
            return;
        }
        debug_assert!(self.mines[(x, y)], "detonate() called on a safe cell");

        for cy in 0..self.rows() {
            for cx in 0..self.cols() {
                if self.mines[(cx, cy)] {
                    self.tiles[(cx, cy)] = TileState::Mine;
                }
            }
        }
        self.tiles[(x, y)] = TileState::DetonatedMine;
        self.state = MatchState::Lost;

        info!("mine detonated at ({x}, {y}), match lost");
    }

    /// Rotate `Hidden -> Flagged -> Questioned -> Hidden`. Any other state
    /// is left untouched.
    pub fn cycle_flag(&mut self, x: usize, y: usize) {
        if self.state.is_end() {
            return;
        }
        let Some(tile) = self.tiles.get_mut(x, y) else {
            return;
        };
        match *tile {
            TileState::Hidden => {
                *tile = TileState::Flagged;
                self.flag_budget -= 1;
            },
            TileState::Flagged => {
                *tile = TileState::Questioned;
                self.flag_budget += 1;
            },
            TileState::Questioned => {
                *tile = TileState::Hidden;
            },
            _ => (),
        }
    }

    fn check_win(&mut self) {
        if self.remaining_hidden == self.num_mines {
            self.state = MatchState::Won;
            // The counter shows zero mines left once the match is won.
            self.flag_budget = 0;
            info!("all safe tiles revealed, match won");
        }
    }
}
