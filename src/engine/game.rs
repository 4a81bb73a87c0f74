use crate::base::board::{Board, TileState};
use crate::config::GlobalConfig;
use crate::engine::clock::{Clock, FramePacer, SecondTicker};
use crate::engine::input::{ButtonState, InputTracker, MouseButton};
use crate::error::Result;
use crate::ui::assets::{AssetLoader, SpriteAtlas};
use crate::ui::draw::{self, FrameContext};
use crate::ui::render::Renderer;
use log::{info, log_enabled, trace};

/// One owned game instance: board, input state, capabilities, and the two
/// loop cadences. Constructed on init, dropped on shutdown; the platform
/// shell drives it by forwarding input edges and calling [`Game::tick`]
/// whenever it is idle.
pub struct Game<R: Renderer, C: Clock> {
    board: Board,
    input: InputTracker,
    renderer: R,
    clock: C,
    atlas: SpriteAtlas,
    pacer: FramePacer,
    match_timer: SecondTicker,
    elapsed_seconds: u32,
    face_pos: (i32, i32),
    left_pressed: bool,
    right_pressed: bool,
}

impl<R: Renderer, C: Clock> Game<R, C> {
    /// Initialize a match from `config`. Fails without partial state when
    /// the configuration is invalid or an asset cannot be loaded.
    pub fn new(config: &GlobalConfig, renderer: R, assets: &dyn AssetLoader, clock: C) -> Result<Self> {
        let mut rng = rand::rng();
        let board = Board::new(config.rows, config.cols, config.num_mines, &mut rng)?;
        let atlas = SpriteAtlas::load(assets)?;
        Ok(Self::assemble(board, renderer, atlas, clock))
    }

    /// Wire a game around an existing board and atlas. Intended for replay
    /// tooling and tests that need a known mine layout.
    pub fn with_board(board: Board, renderer: R, atlas: SpriteAtlas, clock: C) -> Self {
        Self::assemble(board, renderer, atlas, clock)
    }

    fn assemble(board: Board, renderer: R, atlas: SpriteAtlas, clock: C) -> Self {
        let now = clock.now();
        let face_pos = draw::face_position(renderer.viewport_width());
        info!(
            "game ready: {}x{} board, {} mines, face at ({}, {})",
            board.rows(),
            board.cols(),
            board.num_mines(),
            face_pos.0,
            face_pos.1
        );
        Self {
            board,
            input: InputTracker::new(),
            renderer,
            clock,
            atlas,
            pacer: FramePacer::new(now),
            match_timer: SecondTicker::new(now),
            elapsed_seconds: 0,
            face_pos,
            left_pressed: false,
            right_pressed: false,
        }
    }

    /// One loop iteration: at most one simulation update, always a draw.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        if self.pacer.poll_update(now) {
            self.update();
        }
        self.render_frame();
        self.pacer.frame_presented(self.clock.now());
    }

    /// Whether the current match is still accepting play. Terminal after a
    /// win or loss until the face button restarts the match.
    pub fn is_running(&self) -> bool {
        !self.board.state().is_end()
    }

    pub fn notify_resize(&mut self) {
        self.renderer.on_resize();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn fps(&self) -> u32 {
        self.pacer.fps()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    // Raw input edges, forwarded synchronously by the platform shell.

    pub fn key_down(&mut self, code: u8) {
        self.input.key_down(code);
    }

    pub fn key_up(&mut self, code: u8) {
        self.input.key_up(code);
    }

    pub fn mouse_move(&mut self, x: i32, y: i32) {
        self.input.mouse_move(x, y);
    }

    pub fn mouse_button_down(&mut self, button: MouseButton) {
        self.input.button_down(button);
    }

    pub fn mouse_button_up(&mut self, button: MouseButton) {
        self.input.button_up(button);
    }

    pub fn reset_input(&mut self) {
        self.input.reset();
    }

    /// One logical update against the sampled input state.
    fn update(&mut self) {
        let (px, py) = self.input.pointer();
        let left = self.input.button(MouseButton::Left);
        let right = self.input.button(MouseButton::Right);

        if !self.left_pressed && left == ButtonState::Down {
            self.left_pressed = true;
        }
        if self.right_pressed && right == ButtonState::Up {
            self.right_pressed = false;
        }

        // Left release: the face button restarts even on a finished match.
        if self.left_pressed && left == ButtonState::Up {
            if draw::in_face_box(px, py, self.face_pos) {
                self.restart();
            }
            if self.board.state().is_end() {
                self.left_pressed = false;
            }
        }

        if self.board.state().is_end() {
            return;
        }

        if self.match_timer.poll(self.clock.now()) {
            self.elapsed_seconds += 1;
        }

        // Left release inside the board region: reveal on confirmation,
        // so a press dragged off its tile never opens anything.
        if self.left_pressed && left == ButtonState::Up {
            if let Some((tx, ty)) = draw::tile_at(px, py, self.renderer.viewport_width(), self.renderer.viewport_height())
            {
                if self.board.is_mine(tx, ty) {
                    self.board.detonate(tx, ty);
                } else if self.board.tile(tx, ty) != Some(TileState::Flagged) {
                    self.board.reveal(tx, ty);
                }
            }
            self.left_pressed = false;
        }

        // Right press edge: one flag cycle per physical press.
        if !self.right_pressed && right == ButtonState::Down {
            if let Some((tx, ty)) = draw::tile_at(px, py, self.renderer.viewport_width(), self.renderer.viewport_height())
            {
                self.board.cycle_flag(tx, ty);
            }
            self.right_pressed = true;
        }
    }

    fn restart(&mut self) {
        info!("face button clicked, restarting match");
        let mut rng = rand::rng();
        self.board.reset(&mut rng);
        self.elapsed_seconds = 0;
        self.match_timer.reset(self.clock.now());
        self.left_pressed = false;
        self.right_pressed = false;
    }

    fn render_frame(&mut self) {
        let ctx = FrameContext {
            pointer: self.input.pointer(),
            left_down: self.input.button(MouseButton::Left) == ButtonState::Down,
            face_pos: self.face_pos,
            elapsed_seconds: self.elapsed_seconds,
        };
        draw::draw_frame(&mut self.renderer, &self.atlas, &self.board, &ctx);

        if log_enabled!(log::Level::Trace) {
            self.trace_dump();
        }
    }

    /// Per-frame diagnostic dump of the mine layout, the successor of the
    /// historical console HUD print.
    fn trace_dump(&self) {
        let mut layout = String::with_capacity(self.board.rows() * (self.board.cols() * 2 + 1));
        for y in 0..self.board.rows() {
            for x in 0..self.board.cols() {
                layout.push(if self.board.is_mine(x, y) { 'o' } else { '.' });
                layout.push(' ');
            }
            layout.push('\n');
        }
        trace!("fps: {}, mine layout:\n{layout}", self.pacer.fps());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::board::MatchState;
    use crate::engine::clock::TICK_INTERVAL;
    use crate::ui::assets::PixelBuffer;
    use crate::ui::draw::{
        DIGIT_HEIGHT, DIGIT_WIDTH, FACE_HEIGHT, FACE_WIDTH, INFO_BAR_HEIGHT, TILE_HEIGHT, TILE_WIDTH,
    };
    use crate::ui::render::FramebufferRenderer;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct TestClock(Rc<Cell<f64>>);

    impl TestClock {
        fn new() -> Self {
            Self(Rc::new(Cell::new(0.0)))
        }

        fn advance(&self, seconds: f64) {
            self.0.set(self.0.get() + seconds);
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> f64 {
            self.0.get()
        }
    }

    fn atlas() -> SpriteAtlas {
        SpriteAtlas::from_parts(
            PixelBuffer::filled(8 * TILE_WIDTH, 2 * TILE_HEIGHT, 0),
            PixelBuffer::filled(10 * DIGIT_WIDTH, DIGIT_HEIGHT, 0),
            PixelBuffer::filled(5 * FACE_WIDTH, FACE_HEIGHT, 0),
        )
        .unwrap()
    }

    /// 9x9 board with a mine wall down column 4; everything else is safe.
    fn game() -> (Game<FramebufferRenderer, TestClock>, TestClock) {
        let _ = env_logger::builder().is_test(true).try_init();
        let wall: Vec<(usize, usize)> = (0..9).map(|y| (4, y)).collect();
        let board = Board::with_mine_layout(9, 9, &wall).unwrap();
        let (w, h) = draw::surface_size(9, 9);
        let clock = TestClock::new();
        let game = Game::with_board(board, FramebufferRenderer::new(w, h), atlas(), clock.clone());
        (game, clock)
    }

    /// Advance comfortably past one simulation interval and run one loop
    /// iteration, so every step lands exactly one update.
    fn step(game: &mut Game<FramebufferRenderer, TestClock>, clock: &TestClock) {
        clock.advance(0.02);
        game.tick();
    }

    fn tile_center(x: usize, y: usize) -> (i32, i32) {
        (
            (x as u32 * TILE_WIDTH + TILE_WIDTH / 2) as i32,
            (INFO_BAR_HEIGHT + y as u32 * TILE_HEIGHT + TILE_HEIGHT / 2) as i32,
        )
    }

    fn click_left(game: &mut Game<FramebufferRenderer, TestClock>, clock: &TestClock, at: (i32, i32)) {
        game.mouse_move(at.0, at.1);
        game.mouse_button_down(MouseButton::Left);
        step(game, clock);
        game.mouse_button_up(MouseButton::Left);
        step(game, clock);
    }

    #[test]
    fn init_rejects_invalid_configuration() {
        let config = GlobalConfig {
            rows: 8,
            ..GlobalConfig::default()
        };
        let clock = TestClock::new();
        let result = Game::new(
            &config,
            FramebufferRenderer::new(16, 16),
            &crate::ui::assets::DiskAssetLoader::new("/nonexistent"),
            clock,
        );
        assert!(matches!(result, Err(crate::error::Error::InvalidConfiguration(_))));
    }

    #[test]
    fn reveal_fires_on_release_not_press() {
        let (mut game, clock) = game();
        let at = tile_center(0, 0);

        game.mouse_move(at.0, at.1);
        game.mouse_button_down(MouseButton::Left);
        step(&mut game, &clock);
        assert_eq!(game.board().tile(0, 0), Some(TileState::Hidden));

        game.mouse_button_up(MouseButton::Left);
        step(&mut game, &clock);
        assert!(!game.board().tile(0, 0).unwrap().is_unopened());
    }

    #[test]
    fn release_outside_the_board_reveals_nothing() {
        let (mut game, clock) = game();

        game.mouse_move(tile_center(0, 0).0, tile_center(0, 0).1);
        game.mouse_button_down(MouseButton::Left);
        step(&mut game, &clock);

        // Drag up into the info bar before releasing.
        game.mouse_move(5, 5);
        game.mouse_button_up(MouseButton::Left);
        step(&mut game, &clock);

        assert_eq!(game.board().remaining_hidden(), 81);

        // The consumed press must not leak into a later release.
        game.mouse_move(tile_center(8, 8).0, tile_center(8, 8).1);
        game.mouse_button_up(MouseButton::Left);
        step(&mut game, &clock);
        assert_eq!(game.board().remaining_hidden(), 81);
    }

    #[test]
    fn clicking_a_mine_loses_the_match() {
        let (mut game, clock) = game();
        click_left(&mut game, &clock, tile_center(4, 4));

        assert!(!game.is_running());
        assert_eq!(game.board().state(), MatchState::Lost);
        assert_eq!(game.board().tile(4, 4), Some(TileState::DetonatedMine));
    }

    #[test]
    fn clicking_a_flagged_safe_tile_is_a_noop() {
        let (mut game, clock) = game();
        let at = tile_center(1, 1);

        // Flag (1, 1) with a right press.
        game.mouse_move(at.0, at.1);
        game.mouse_button_down(MouseButton::Right);
        step(&mut game, &clock);
        game.mouse_button_up(MouseButton::Right);
        step(&mut game, &clock);
        assert_eq!(game.board().tile(1, 1), Some(TileState::Flagged));
        assert_eq!(game.board().flag_budget(), 8);

        click_left(&mut game, &clock, at);
        assert_eq!(game.board().tile(1, 1), Some(TileState::Flagged));
        assert_eq!(game.board().remaining_hidden(), 81);

        // Two more right presses cycle back to hidden; then the click lands.
        for _ in 0..2 {
            game.mouse_button_down(MouseButton::Right);
            step(&mut game, &clock);
            game.mouse_button_up(MouseButton::Right);
            step(&mut game, &clock);
        }
        assert_eq!(game.board().tile(1, 1), Some(TileState::Hidden));
        click_left(&mut game, &clock, at);
        assert!(!game.board().tile(1, 1).unwrap().is_unopened());
    }

    #[test]
    fn clicking_a_flagged_mine_still_detonates() {
        // Historical click ordering: the mine check precedes the flag check.
        let (mut game, clock) = game();
        let at = tile_center(4, 0);

        game.mouse_move(at.0, at.1);
        game.mouse_button_down(MouseButton::Right);
        step(&mut game, &clock);
        game.mouse_button_up(MouseButton::Right);
        step(&mut game, &clock);
        assert_eq!(game.board().tile(4, 0), Some(TileState::Flagged));

        click_left(&mut game, &clock, at);
        assert_eq!(game.board().state(), MatchState::Lost);
    }

    #[test]
    fn held_right_button_cycles_exactly_once() {
        let (mut game, clock) = game();
        let at = tile_center(2, 2);
        game.mouse_move(at.0, at.1);

        game.mouse_button_down(MouseButton::Right);
        for _ in 0..5 {
            step(&mut game, &clock);
        }
        assert_eq!(game.board().tile(2, 2), Some(TileState::Flagged));

        game.mouse_button_up(MouseButton::Right);
        step(&mut game, &clock);
        game.mouse_button_down(MouseButton::Right);
        step(&mut game, &clock);
        assert_eq!(game.board().tile(2, 2), Some(TileState::Questioned));
    }

    #[test]
    fn face_click_restarts_after_a_loss() {
        let (mut game, clock) = game();
        click_left(&mut game, &clock, tile_center(4, 4));
        assert!(!game.is_running());

        let face = draw::face_position(game.renderer().viewport_width());
        let face_center = (face.0 + (FACE_WIDTH / 2) as i32, face.1 + (FACE_HEIGHT / 2) as i32);
        click_left(&mut game, &clock, face_center);

        assert!(game.is_running());
        assert_eq!(game.board().state(), MatchState::Running);
        assert_eq!(game.board().remaining_hidden(), 81);
        assert_eq!(game.board().rows(), 9);
        assert_eq!(game.board().cols(), 9);
        assert_eq!(game.board().num_mines(), 9);
        assert_eq!(game.elapsed_seconds(), 0);
    }

    #[test]
    fn match_timer_counts_wall_seconds_and_pauses_when_over() {
        let (mut game, clock) = game();

        // ~1.4 seconds of loop iterations.
        for _ in 0..72 {
            step(&mut game, &clock);
        }
        assert_eq!(game.elapsed_seconds(), 1);

        click_left(&mut game, &clock, tile_center(4, 4));
        let frozen = game.elapsed_seconds();
        for _ in 0..120 {
            step(&mut game, &clock);
        }
        assert_eq!(game.elapsed_seconds(), frozen);
    }

    #[test]
    fn fps_metric_tracks_loop_iterations() {
        let (mut game, clock) = game();
        // Render twice per simulation interval for a bit over a second.
        for _ in 0..130 {
            clock.advance(TICK_INTERVAL / 2.0);
            game.tick();
        }
        assert!(game.fps() > 0);
    }

    #[test]
    fn reset_input_releases_a_tracked_press() {
        let (mut game, clock) = game();
        let at = tile_center(0, 0);

        game.mouse_move(at.0, at.1);
        game.mouse_button_down(MouseButton::Left);
        step(&mut game, &clock);

        game.reset_input();
        step(&mut game, &clock);

        // The latched press meets a released button: treated as a release
        // at the current pointer, which is the classic shell behavior on
        // focus loss mid-press.
        assert!(!game.board().tile(0, 0).unwrap().is_unopened());
    }
}
