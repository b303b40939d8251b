use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::{Camera2D, RenderableKind, SceneWorld, Vec2};

use super::{world_to_screen, Viewport, PIXELS_PER_WORLD};

const CLEAR_COLOR: [u8; 4] = [20, 22, 28, 255];
const GRID_CELL_WORLD: f32 = 1.0;
const GRID_COLOR: [u8; 4] = [35, 39, 46, 255];
const PROGRESS_BAR_WIDTH_WORLD: f32 = 1.0;
const PROGRESS_BAR_HEIGHT_PX: i32 = 6;
const PROGRESS_BAR_RAISE_WORLD: f32 = 0.8;
const PROGRESS_BAR_BG_COLOR: [u8; 4] = [50, 50, 50, 255];
const PROGRESS_BAR_FILL_COLOR: [u8; 4] = [76, 175, 80, 255];
const TOAST_BANNER_HEIGHT_PX: i32 = 10;
const TOAST_BANNER_COLOR: [u8; 4] = [255, 82, 82, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScreenRectPx {
    left: i32,
    top: i32,
    width: i32,
    height: i32,
}

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_world(&mut self, world: &SceneWorld) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }

        let viewport = self.viewport;
        let frame = self.pixels.frame_mut();
        for chunk in frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&CLEAR_COLOR);
        }
        draw_world_grid(frame, viewport, world.camera());

        // Entities are stored in applied spawn order, so later spawns draw on top.
        for entity in world.entities() {
            let position = entity.transform.position;
            match entity.renderable.kind {
                RenderableKind::Block {
                    color,
                    half_size_world,
                } => {
                    let rect = block_rect(world.camera(), viewport, position, half_size_world);
                    fill_rect(frame, viewport, rect, color);
                }
                RenderableKind::ProgressBar { progress } => {
                    let (background, fill) =
                        progress_bar_rects(world.camera(), viewport, position, progress);
                    fill_rect(frame, viewport, background, PROGRESS_BAR_BG_COLOR);
                    fill_rect(frame, viewport, fill, PROGRESS_BAR_FILL_COLOR);
                }
            }
        }

        if world.latest_toast().is_some() {
            let banner = ScreenRectPx {
                left: 0,
                top: 0,
                width: viewport.width as i32,
                height: TOAST_BANNER_HEIGHT_PX,
            };
            fill_rect(frame, viewport, banner, TOAST_BANNER_COLOR);
        }

        self.pixels.render()
    }
}

fn block_rect(
    camera: &Camera2D,
    viewport: Viewport,
    center: Vec2,
    half_size_world: f32,
) -> ScreenRectPx {
    let (cx, cy) = world_to_screen(center, camera, viewport, PIXELS_PER_WORLD);
    let half_px = (half_size_world.max(0.0) * PIXELS_PER_WORLD).round() as i32;
    ScreenRectPx {
        left: cx - half_px,
        top: cy - half_px,
        width: half_px * 2,
        height: half_px * 2,
    }
}

fn progress_bar_rects(
    camera: &Camera2D,
    viewport: Viewport,
    anchor: Vec2,
    progress: f32,
) -> (ScreenRectPx, ScreenRectPx) {
    let (cx, cy) = world_to_screen(
        anchor.offset(0.0, PROGRESS_BAR_RAISE_WORLD),
        camera,
        viewport,
        PIXELS_PER_WORLD,
    );
    let width = (PROGRESS_BAR_WIDTH_WORLD * PIXELS_PER_WORLD).round() as i32;
    let background = ScreenRectPx {
        left: cx - width / 2,
        top: cy - PROGRESS_BAR_HEIGHT_PX / 2,
        width,
        height: PROGRESS_BAR_HEIGHT_PX,
    };
    let fill = ScreenRectPx {
        width: progress_fill_width_px(width, progress),
        ..background
    };
    (background, fill)
}

fn progress_fill_width_px(full_width_px: i32, progress: f32) -> i32 {
    let fraction = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    (full_width_px as f32 * fraction).round() as i32
}

fn draw_world_grid(frame: &mut [u8], viewport: Viewport, camera: &Camera2D) {
    let cell_px = GRID_CELL_WORLD * PIXELS_PER_WORLD;
    if cell_px < 2.0 {
        return;
    }
    let (origin_x, origin_y) = world_to_screen(Vec2::default(), camera, viewport, PIXELS_PER_WORLD);
    let first_x = origin_x.rem_euclid(cell_px as i32);
    let first_y = origin_y.rem_euclid(cell_px as i32);

    let mut x = first_x;
    while x < viewport.width as i32 {
        let line = ScreenRectPx {
            left: x,
            top: 0,
            width: 1,
            height: viewport.height as i32,
        };
        fill_rect(frame, viewport, line, GRID_COLOR);
        x += cell_px as i32;
    }
    let mut y = first_y;
    while y < viewport.height as i32 {
        let line = ScreenRectPx {
            left: 0,
            top: y,
            width: viewport.width as i32,
            height: 1,
        };
        fill_rect(frame, viewport, line, GRID_COLOR);
        y += cell_px as i32;
    }
}

fn fill_rect(frame: &mut [u8], viewport: Viewport, rect: ScreenRectPx, color: [u8; 4]) {
    let start_x = rect.left.max(0);
    let start_y = rect.top.max(0);
    let end_x = (rect.left + rect.width).min(viewport.width as i32);
    let end_y = (rect.top + rect.height).min(viewport.height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }

    let width = viewport.width as usize;
    for py in start_y..end_y {
        for px in start_x..end_x {
            write_pixel_rgba(frame, width, px as usize, py as usize, color);
        }
    }
}

fn write_pixel_rgba(frame: &mut [u8], width: usize, x: usize, y: usize, color: [u8; 4]) {
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }
    frame[byte_offset..end].copy_from_slice(&color);
}
