use log::{debug, trace};

/// Software-renderer capability consumed by the presentation adapter.
///
/// Coordinates are pixels; colors and pixel buffers are `0xAARRGGBB`.
/// Implementations are selected at compose time by the platform shell.
pub trait Renderer {
    /// Fill the whole drawing surface with `color`.
    fn clear(&mut self, color: u32);

    /// Blit a `width x height` region of `pixels` (a `buffer_width x
    /// buffer_height` sheet) so that its top-left lands at `(dst_x, dst_y)`.
    /// Regions crossing the viewport edges are clipped.
    #[allow(clippy::too_many_arguments)]
    fn draw_region(
        &mut self,
        dst_x: i32,
        dst_y: i32,
        src_x: u32,
        src_y: u32,
        width: u32,
        height: u32,
        pixels: &[u32],
        buffer_width: u32,
        buffer_height: u32,
    );

    /// Publish everything drawn since the last `present`.
    fn present(&mut self);

    fn viewport_width(&self) -> u32;

    fn viewport_height(&self) -> u32;

    /// The shell's window geometry changed.
    fn on_resize(&mut self);
}

/// Double-buffered CPU blitter over an owned ARGB surface. The shell reads
/// the front buffer after `present` and moves it to the screen however it
/// likes.
pub struct FramebufferRenderer {
    width: u32,
    height: u32,
    back: Vec<u32>,
    front: Vec<u32>,
}

impl FramebufferRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        debug!("framebuffer renderer created: {width}x{height}");
        let len = (width * height) as usize;
        Self {
            width,
            height,
            back: vec![0; len],
            front: vec![0; len],
        }
    }

    /// Pixels as of the last `present`.
    pub fn front(&self) -> &[u32] {
        &self.front
    }

    /// Front-buffer pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.front.get((y * self.width + x) as usize).copied()
    }
}

impl Renderer for FramebufferRenderer {
    fn clear(&mut self, color: u32) {
        self.back.fill(color);
    }

    fn draw_region(
        &mut self,
        dst_x: i32,
        dst_y: i32,
        src_x: u32,
        src_y: u32,
        width: u32,
        height: u32,
        pixels: &[u32],
        buffer_width: u32,
        buffer_height: u32,
    ) {
        if pixels.len() < (buffer_width as usize) * (buffer_height as usize) {
            debug_assert!(false, "pixel buffer shorter than its declared dimensions");
            return;
        }

        // Clamp the copied rectangle against the source sheet.
        let width = width.min(buffer_width.saturating_sub(src_x));
        let height = height.min(buffer_height.saturating_sub(src_y));

        for row in 0..height {
            let dy = dst_y + row as i32;
            if dy < 0 {
                continue;
            }
            if dy >= self.height as i32 {
                break;
            }

            // Clip the row against the left and right viewport edges.
            let skip = dst_x.min(0).unsigned_abs();
            if skip >= width {
                continue;
            }
            let dx = (dst_x + skip as i32) as u32;
            if dx >= self.width {
                continue;
            }
            let run = (width - skip).min(self.width - dx);

            let src_start = ((src_y + row) * buffer_width + src_x + skip) as usize;
            let dst_start = (dy as u32 * self.width + dx) as usize;
            self.back[dst_start..dst_start + run as usize]
                .copy_from_slice(&pixels[src_start..src_start + run as usize]);
        }
    }

    fn present(&mut self) {
        self.front.copy_from_slice(&self.back);
    }

    fn viewport_width(&self) -> u32 {
        self.width
    }

    fn viewport_height(&self) -> u32 {
        self.height
    }

    fn on_resize(&mut self) {
        // The surface is fixed-size; the shell scales the front buffer.
        trace!("resize notification ignored by framebuffer renderer");
    }
}
