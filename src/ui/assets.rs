use crate::error::{Error, Result};
use log::{debug, info, trace};
use std::env;
use std::path::{Path, PathBuf};

/// Decoded raster image: `0xAARRGGBB` pixels, row-major.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Wrap raw pixels. The buffer length must match the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Self {
        assert_eq!(pixels.len(), (width * height) as usize, "pixel buffer length mismatch");
        Self { width, height, pixels }
    }

    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }
}

/// Asset-loading capability. Only raster sprite sheets are requested; the
/// decode format is the implementation's concern.
pub trait AssetLoader {
    fn load_pixel_buffer(&self, path: &Path) -> Result<PixelBuffer>;
}

/// Loads sheets from disk through the `image` crate.
///
/// With an explicit root every request resolves under it; without one each
/// sheet is located next to the manifest or the executable.
pub struct DiskAssetLoader {
    root: Option<PathBuf>,
}

impl DiskAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn discover() -> Self {
        Self { root: None }
    }
}

/// Look for `resource` in an `assets` directory next to the manifest, then
/// next to the executable.
fn discover_resource(resource: &Path) -> Result<PathBuf> {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        let p = PathBuf::from(manifest_dir).join("assets").join(resource);
        if p.exists() {
            debug!("found {} at: {}", resource.to_string_lossy(), p.to_string_lossy());
            return Ok(p);
        }
    }

    if let Ok(mut exe) = env::current_exe() {
        exe.pop();
        let p = exe.join("assets").join(resource);
        if p.exists() {
            debug!("found {} at: {}", resource.to_string_lossy(), p.to_string_lossy());
            return Ok(p);
        }
    }

    Err(Error::MissingResource(resource.to_string_lossy().into_owned()))
}

impl AssetLoader for DiskAssetLoader {
    fn load_pixel_buffer(&self, path: &Path) -> Result<PixelBuffer> {
        let path = match &self.root {
            Some(root) => root.join(path),
            None => discover_resource(path)?,
        };
        trace!("decoding sprite sheet: {}", path.to_string_lossy());

        let rgba = image::open(&path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                u32::from(a) << 24 | u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b)
            })
            .collect();

        Ok(PixelBuffer::new(width, height, pixels))
    }
}

pub const TILES_SHEET: &str = "tiles.png";
pub const NUMBERS_SHEET: &str = "numbers.png";
pub const FACES_SHEET: &str = "faces.png";

/// The three fixed sprite sheets the presentation adapter draws from.
///
/// Layout contract: the tile sheet carries the eight state icons on row 0
/// and the eight count sprites on row 1, all 16x16; the number sheet holds
/// ten 13x23 digit glyphs; the face sheet five 24x24 faces.
pub struct SpriteAtlas {
    pub tiles: PixelBuffer,
    pub numbers: PixelBuffer,
    pub faces: PixelBuffer,
}

impl SpriteAtlas {
    pub fn load(loader: &dyn AssetLoader) -> Result<Self> {
        let tiles = loader.load_pixel_buffer(Path::new(TILES_SHEET))?;
        let numbers = loader.load_pixel_buffer(Path::new(NUMBERS_SHEET))?;
        let faces = loader.load_pixel_buffer(Path::new(FACES_SHEET))?;
        Self::from_parts(tiles, numbers, faces)
    }

    /// Assemble an atlas from already-decoded sheets, validating that each
    /// one is large enough for its sprite grid.
    pub fn from_parts(tiles: PixelBuffer, numbers: PixelBuffer, faces: PixelBuffer) -> Result<Self> {
        Self::check_sheet("tiles", &tiles, 8 * super::draw::TILE_WIDTH, 2 * super::draw::TILE_HEIGHT)?;
        Self::check_sheet("numbers", &numbers, 10 * super::draw::DIGIT_WIDTH, super::draw::DIGIT_HEIGHT)?;
        Self::check_sheet("faces", &faces, 5 * super::draw::FACE_WIDTH, super::draw::FACE_HEIGHT)?;

        info!("sprite atlas ready");
        Ok(Self { tiles, numbers, faces })
    }

    fn check_sheet(sheet: &'static str, buffer: &PixelBuffer, min_width: u32, min_height: u32) -> Result<()> {
        if buffer.width() < min_width || buffer.height() < min_height {
            return Err(Error::SpriteSheetTooSmall {
                sheet,
                width: buffer.width(),
                height: buffer.height(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::draw::{DIGIT_HEIGHT, DIGIT_WIDTH, FACE_HEIGHT, FACE_WIDTH, TILE_HEIGHT, TILE_WIDTH};

    fn full_size_atlas() -> SpriteAtlas {
        SpriteAtlas::from_parts(
            PixelBuffer::filled(8 * TILE_WIDTH, 2 * TILE_HEIGHT, 0xff000001),
            PixelBuffer::filled(10 * DIGIT_WIDTH, DIGIT_HEIGHT, 0xff000002),
            PixelBuffer::filled(5 * FACE_WIDTH, FACE_HEIGHT, 0xff000003),
        )
        .unwrap()
    }

    #[test]
    fn atlas_accepts_exact_minimum_sheets() {
        full_size_atlas();
    }

    #[test]
    fn atlas_rejects_undersized_sheets() {
        let undersized = SpriteAtlas::from_parts(
            PixelBuffer::filled(8 * TILE_WIDTH - 1, 2 * TILE_HEIGHT, 0),
            PixelBuffer::filled(10 * DIGIT_WIDTH, DIGIT_HEIGHT, 0),
            PixelBuffer::filled(5 * FACE_WIDTH, FACE_HEIGHT, 0),
        );
        assert!(matches!(undersized, Err(Error::SpriteSheetTooSmall { sheet: "tiles", .. })));
    }

    #[test]
    fn missing_sheet_fails_loading() {
        let loader = DiskAssetLoader::new("/nonexistent-asset-root");
        assert!(SpriteAtlas::load(&loader).is_err());
    }
}
