use super::assets::SpriteAtlas;
use super::render::Renderer;
use crate::base::board::{Board, MatchState, TileState};

pub const TILE_WIDTH: u32 = 16;
pub const TILE_HEIGHT: u32 = 16;
pub const DIGIT_WIDTH: u32 = 13;
pub const DIGIT_HEIGHT: u32 = 23;
pub const FACE_WIDTH: u32 = 24;
pub const FACE_HEIGHT: u32 = 24;
pub const INFO_BAR_HEIGHT: u32 = 48;

pub const BACKGROUND_COLOR: u32 = 0xffc6_c6c6;

/// Pixel dimensions of the whole drawing surface for a given board shape.
pub fn surface_size(rows: usize, cols: usize) -> (u32, u32) {
    (cols as u32 * TILE_WIDTH, rows as u32 * TILE_HEIGHT + INFO_BAR_HEIGHT)
}

/// Face-button position: horizontally centered, vertically centered within
/// the info bar.
pub fn face_position(viewport_width: u32) -> (i32, i32) {
    (
        (viewport_width / 2) as i32 - (FACE_WIDTH / 2) as i32,
        (INFO_BAR_HEIGHT / 2) as i32 - (FACE_HEIGHT / 2) as i32,
    )
}

/// Tile coordinates under a screen position, when it lies inside the board
/// region below the info bar.
pub fn tile_at(px: i32, py: i32, viewport_width: u32, viewport_height: u32) -> Option<(usize, usize)> {
    if px < 0 || px >= viewport_width as i32 {
        return None;
    }
    if py < INFO_BAR_HEIGHT as i32 || py >= viewport_height as i32 {
        return None;
    }
    Some((
        (px as u32 / TILE_WIDTH) as usize,
        ((py as u32 - INFO_BAR_HEIGHT) / TILE_HEIGHT) as usize,
    ))
}

/// Whether a screen position lies on the face button.
pub fn in_face_box(px: i32, py: i32, face_pos: (i32, i32)) -> bool {
    let (fx, fy) = face_pos;
    px >= fx && px <= fx + FACE_WIDTH as i32 && py >= fy && py <= fy + FACE_HEIGHT as i32
}

/// Sheet cell `(column, row)` of a tile's sprite. The mapping is explicit;
/// the semantic enum carries no sheet arithmetic.
pub fn tile_sprite(tile: TileState) -> (u32, u32) {
    match tile {
        TileState::Hidden => (0, 0),
        TileState::Revealed => (1, 0),
        TileState::Flagged => (2, 0),
        TileState::Questioned => (3, 0),
        TileState::RevealedQuestioned => (4, 0),
        TileState::Mine => (5, 0),
        TileState::DetonatedMine => (6, 0),
        TileState::FlaggedMine => (7, 0),
        TileState::Count(n) => (u32::from(n.clamp(1, 8)) - 1, 1),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaceState {
    #[default]
    Idle,
    FacePressed,
    TilePressed,
    Won,
    Lost,
}

/// Sheet column of a face sprite.
pub fn face_sprite(face: FaceState) -> u32 {
    match face {
        FaceState::Idle => 0,
        FaceState::FacePressed => 1,
        FaceState::TilePressed => 2,
        FaceState::Won => 3,
        FaceState::Lost => 4,
    }
}

/// Everything the painter needs besides the board itself, sampled by the
/// game loop at draw time.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext {
    pub pointer: (i32, i32),
    pub left_down: bool,
    pub face_pos: (i32, i32),
    pub elapsed_seconds: u32,
}

/// Paint one full frame: background, mine counter, match timer, tiles, and
/// the face button, then present.
pub fn draw_frame(renderer: &mut dyn Renderer, atlas: &SpriteAtlas, board: &Board, ctx: &FrameContext) {
    let viewport_width = renderer.viewport_width();
    let viewport_height = renderer.viewport_height();

    renderer.clear(BACKGROUND_COLOR);

    // Mine counter, three digits, left edge of the info bar. The display
    // clamps at zero; the stored budget may be negative.
    let budget = board.flag_budget().max(0) as u32;
    draw_digit(renderer, atlas, 2 * DIGIT_WIDTH as i32, budget % 10);
    draw_digit(renderer, atlas, DIGIT_WIDTH as i32, budget / 10 % 10);
    draw_digit(renderer, atlas, 0, budget / 100 % 10);

    // Match timer, three digits, right edge.
    let seconds = ctx.elapsed_seconds;
    draw_digit(renderer, atlas, (viewport_width - DIGIT_WIDTH) as i32, seconds % 10);
    draw_digit(renderer, atlas, (viewport_width - 2 * DIGIT_WIDTH) as i32, seconds / 10 % 10);
    draw_digit(renderer, atlas, (viewport_width - 3 * DIGIT_WIDTH) as i32, seconds / 100 % 10);

    let pressed = if ctx.left_down {
        tile_at(ctx.pointer.0, ctx.pointer.1, viewport_width, viewport_height)
    } else {
        None
    };
    let state = board.state();

    for y in 0..board.rows() {
        for x in 0..board.cols() {
            let Some(mut tile) = board.tile(x, y) else {
                continue;
            };

            // Pressed preview: display-only, the board is untouched.
            if pressed == Some((x, y)) && !state.is_end() {
                tile = match tile {
                    TileState::Hidden => TileState::Revealed,
                    TileState::Questioned => TileState::RevealedQuestioned,
                    other => other,
                };
            }

            // A won match shows the remaining hidden mines as flagged.
            if state == MatchState::Won && tile == TileState::Hidden {
                tile = TileState::Flagged;
            }

            let (col, row) = tile_sprite(tile);
            renderer.draw_region(
                (x as u32 * TILE_WIDTH) as i32,
                (INFO_BAR_HEIGHT + y as u32 * TILE_HEIGHT) as i32,
                col * TILE_WIDTH,
                row * TILE_HEIGHT,
                TILE_WIDTH,
                TILE_HEIGHT,
                atlas.tiles.pixels(),
                atlas.tiles.width(),
                atlas.tiles.height(),
            );
        }
    }

    let mut face = FaceState::Idle;
    if pressed.is_some() {
        face = FaceState::TilePressed;
    }
    if ctx.left_down && in_face_box(ctx.pointer.0, ctx.pointer.1, ctx.face_pos) {
        face = FaceState::FacePressed;
    }
    match state {
        MatchState::Won => face = FaceState::Won,
        MatchState::Lost => face = FaceState::Lost,
        MatchState::Running => (),
    }
    renderer.draw_region(
        ctx.face_pos.0,
        ctx.face_pos.1,
        face_sprite(face) * FACE_WIDTH,
        0,
        FACE_WIDTH,
        FACE_HEIGHT,
        atlas.faces.pixels(),
        atlas.faces.width(),
        atlas.faces.height(),
    );

    renderer.present();
}

fn draw_digit(renderer: &mut dyn Renderer, atlas: &SpriteAtlas, x: i32, digit: u32) {
    debug_assert!(digit < 10);
    let y = (INFO_BAR_HEIGHT / 2) as i32 - (DIGIT_HEIGHT / 2) as i32;
    renderer.draw_region(
        x,
        y,
        digit * DIGIT_WIDTH,
        0,
        DIGIT_WIDTH,
        DIGIT_HEIGHT,
        atlas.numbers.pixels(),
        atlas.numbers.width(),
        atlas.numbers.height(),
    );
}
