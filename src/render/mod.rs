use std::io::{self, Write};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    config,
    types::{Angles, Hsl, Vec2, Vec3},
};

/// Perspective setup shared by every word in a frame.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub center: Vec2,
    pub perspective: f32,
}

/// Visual attributes for one word in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand<'a> {
    pub text: &'a str,
    pub screen_x: f32,
    pub screen_y: f32,
    pub font_size_px: u32,
    pub opacity: f32,
    pub scale: f32,
    pub brightness: f32,
    pub color: Hsl,
    pub z_order: i32,
}

impl DrawCommand<'_> {
    pub fn brightness_filter(&self) -> String {
        format!(
            "brightness({}) drop-shadow(0 0 8px rgba(120, 190, 255, {}))",
            self.brightness,
            0.2 + self.scale * 0.2
        )
    }

    pub fn color_string(&self) -> String {
        format!(
            "hsl({}, {}%, {}%)",
            self.color.hue, self.color.saturation, self.color.lightness
        )
    }

    pub fn transform(&self) -> String {
        format!("translate(-50%, -50%) scale({})", self.scale)
    }
}

/// Consumer of per-word draw commands; one frame is `begin_frame` then a `draw` per word.
pub trait DrawSink {
    fn begin_frame(&mut self) {}
    fn draw(&mut self, command: &DrawCommand<'_>);
}

pub fn font_size_for(frequency: u32) -> u32 {
    let steps = frequency.saturating_sub(1).min(config::FONT_SIZE_MAX);
    (config::FONT_SIZE_MIN + steps * config::FONT_SIZE_STEP).min(config::FONT_SIZE_MAX)
}

/// Rotates `base` (Y then X), projects with perspective and derives the word's look.
pub fn project<'a>(
    text: &'a str,
    base: Vec3,
    rotation: Angles,
    frequency: u32,
    base_hue: u16,
    projection: Projection,
) -> DrawCommand<'a> {
    let rotated = base
        .apply_axis_angle(Vec3::UNIT_Y, rotation.y)
        .apply_axis_angle(Vec3::UNIT_X, rotation.x);

    let scale = projection.perspective / (projection.perspective - rotated.z);
    let depth_scale = scale.clamp(config::DEPTH_SCALE_MIN, config::DEPTH_SCALE_MAX);
    let brightness =
        (0.7 + depth_scale * 0.5).clamp(config::BRIGHTNESS_MIN, config::BRIGHTNESS_MAX);
    let frequency_boost = (frequency.saturating_sub(1) as f32 * config::FREQUENCY_BOOST_STEP)
        .min(config::FREQUENCY_BOOST_MAX);
    let opacity = (depth_scale + frequency_boost).clamp(config::OPACITY_MIN, 1.0);

    DrawCommand {
        text,
        screen_x: rotated.x * scale + projection.center.x,
        screen_y: rotated.y * scale + projection.center.y,
        font_size_px: font_size_for(frequency),
        opacity,
        scale: depth_scale,
        brightness,
        color: Hsl {
            hue: base_hue as f32,
            saturation: config::SATURATION,
            lightness: config::LIGHTNESS_BASE + depth_scale * config::LIGHTNESS_DEPTH,
        },
        z_order: (rotated.z + config::Z_ORDER_BIAS).floor() as i32,
    }
}

/// Fonts at or above this size are drawn bold in the terminal.
const BOLD_FONT_PX: u32 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderCell {
    pub ch: char,
    pub z_order: i32,
    pub rgb: (u8, u8, u8),
    pub bold: bool,
    /// Display columns of `ch`; 0 marks the right half of a wide glyph.
    pub width: u8,
}

impl RenderCell {
    const BLANK: RenderCell = RenderCell {
        ch: ' ',
        z_order: i32::MIN,
        rgb: (255, 255, 255),
        bold: false,
        width: 1,
    };

    pub fn is_continuation(&self) -> bool {
        self.width == 0
    }

    fn blanked(self) -> RenderCell {
        RenderCell {
            ch: ' ',
            width: 1,
            ..self
        }
    }
}

/// Terminal character grid addressed in virtual pixels.
///
/// Each column spans `px_per_col` pixels and each row `px_per_row`; overlapping words keep
/// the glyph with the higher z-order. Wide glyphs occupy two cells and are written whole or
/// not at all.
#[derive(Debug)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    px_per_col: f32,
    px_per_row: f32,
    cells: Vec<RenderCell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let mut buffer = Self {
            width,
            height,
            px_per_col: 1.0,
            px_per_row: 2.0,
            cells: Vec::new(),
        };
        buffer.resize(width, height);
        buffer
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let len = (width as usize).saturating_mul(height as usize);
        if self.cells.len() != len {
            self.cells.resize(len, RenderCell::BLANK);
        }
        self.clear();
    }

    /// Picks a pixel size per cell so a sphere of `radius` fits, keeping cells twice as tall as wide.
    pub fn fit_sphere(&mut self, radius: f32) {
        let span = radius * 2.0 * config::HOVER_RADIUS_FACTOR;
        let cols = self.width.max(1) as f32;
        let rows = self.height.max(1) as f32;
        self.px_per_col = (span / cols).max(span / (rows * 2.0)).max(f32::EPSILON);
        self.px_per_row = self.px_per_col * 2.0;
    }

    /// Viewport size in virtual pixels.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.px_per_col,
            self.height as f32 * self.px_per_row,
        )
    }

    /// Center of the cell at (`col`, `row`) in virtual pixels.
    pub fn cell_to_pixel(&self, col: u16, row: u16) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * self.px_per_col,
            (row as f32 + 0.5) * self.px_per_row,
        )
    }

    pub fn clear(&mut self) {
        self.cells.fill(RenderCell::BLANK);
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> RenderCell {
        debug_assert!(x < self.width && y < self.height, "get() out of bounds");
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        self.cells[idx]
    }

    fn put(&mut self, x: i32, y: i32, cell: RenderCell) {
        let cols = cell.width.max(1) as i32;
        if x < 0 || y < 0 || x + cols > self.width as i32 || y >= self.height as i32 {
            return;
        }
        let row_start = (y as usize) * (self.width as usize);
        let row_end = row_start + self.width as usize;
        let start = row_start + x as usize;
        let end = start + cols as usize;
        if self.cells[start..end]
            .iter()
            .any(|slot| slot.z_order > cell.z_order)
        {
            return;
        }
        // half of a wide glyph left behind would shift the rest of the row
        if self.cells[start].is_continuation() && start > row_start {
            self.cells[start - 1] = self.cells[start - 1].blanked();
        }
        if self.cells[end - 1].width == 2 && end < row_end {
            self.cells[end] = self.cells[end].blanked();
        }
        self.cells[start] = cell;
        if cols == 2 {
            self.cells[start + 1] = RenderCell {
                ch: ' ',
                width: 0,
                ..cell
            };
        }
    }
}

impl DrawSink for FrameBuffer {
    fn begin_frame(&mut self) {
        self.clear();
    }

    fn draw(&mut self, command: &DrawCommand<'_>) {
        let row = (command.screen_y / self.px_per_row).floor() as i32;
        let center_col = (command.screen_x / self.px_per_col).floor() as i32;
        let display_width = UnicodeWidthStr::width(command.text) as i32;
        let mut col = center_col - display_width / 2;
        let cell = RenderCell {
            ch: ' ',
            z_order: command.z_order,
            rgb: shade(command),
            bold: command.font_size_px >= BOLD_FONT_PX,
            width: 1,
        };
        for ch in command.text.chars() {
            let width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if width == 0 {
                continue;
            }
            self.put(
                col,
                row,
                RenderCell {
                    ch,
                    width: width as u8,
                    ..cell
                },
            );
            col += width as i32;
        }
    }
}

/// Writes each command as one line of CSS declarations, the way a DOM surface would apply them.
pub struct CssSink<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> CssSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Flushes and hands back the writer, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> DrawSink for CssSink<W> {
    fn draw(&mut self, command: &DrawCommand<'_>) {
        if self.error.is_some() {
            return;
        }
        let result = writeln!(
            self.out,
            "{}: left: {:.1}px; top: {:.1}px; font-size: {}px; opacity: {:.3}; \
             transform: {}; filter: {}; color: {}; z-index: {};",
            command.text,
            command.screen_x,
            command.screen_y,
            command.font_size_px,
            command.opacity,
            command.transform(),
            command.brightness_filter(),
            command.color_string(),
            command.z_order
        );
        if let Err(err) = result {
            self.error = Some(err);
        }
    }
}

/// HSL color, then brightness filter, then opacity against a black background.
fn shade(command: &DrawCommand<'_>) -> (u8, u8, u8) {
    let (r, g, b) = command.color.to_rgb();
    let k = command.brightness * command.opacity;
    let apply = |c: u8| (c as f32 * k).round().clamp(0.0, 255.0) as u8;
    (apply(r), apply(g), apply(b))
}
