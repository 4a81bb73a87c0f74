//! Classic Minesweeper engine with a frame-paced game loop and a pluggable
//! software-renderer interface.
//!
//! The crate owns the board state machine (mine placement, iterative
//! flood-fill reveal, flagging, win/loss detection), the debounced input
//! tracker, the dual-cadence game loop, and the sprite-based presentation
//! adapter. Platform concerns are capability traits — [`Renderer`],
//! [`AssetLoader`], [`Clock`] — composed at build time by a shell that
//! forwards raw input edges and calls [`Game::tick`] while idle:
//!
//! ```no_run
//! use retrosweeper::{DiskAssetLoader, FramebufferRenderer, Game, GlobalConfig, SystemClock};
//!
//! # fn main() -> retrosweeper::Result<()> {
//! let config = GlobalConfig::load_or_default();
//! let (width, height) = config.surface_size();
//! let mut game = Game::new(
//!     &config,
//!     FramebufferRenderer::new(width, height),
//!     &DiskAssetLoader::new(&config.assets_dir),
//!     SystemClock::new(),
//! )?;
//!
//! loop {
//!     // ...pump platform events into game.mouse_move() and friends...
//!     game.tick();
//!     // ...move game.renderer().front() to the screen...
//! }
//! # }
//! ```

pub mod base;
pub mod config;
pub mod engine;
pub mod error;
pub mod ui;

pub use base::board::{Board, MatchState, TileState};
pub use config::GlobalConfig;
pub use engine::clock::{Clock, SystemClock, TICK_INTERVAL};
pub use engine::game::Game;
pub use engine::input::{ButtonState, InputTracker, KeyState, MouseButton};
pub use error::{Error, Result};
pub use ui::assets::{AssetLoader, DiskAssetLoader, PixelBuffer, SpriteAtlas};
pub use ui::draw::{FaceState, FrameContext};
pub use ui::render::{FramebufferRenderer, Renderer};
