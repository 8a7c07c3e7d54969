use serde::{Deserialize, Serialize};

use crate::errors::TimelineError;

use super::captions::DEFAULT_WORDS_PER_CHUNK;

/// Canvas geometry and text styling used when assembling layers
///
/// Vertical offsets mirror the classic 1080x1920 short-video layout: the title
/// sits well above centre, the speaker portrait just above centre and the
/// captions in the lower quarter.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Output width in pixels
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,

    /// Output height in pixels
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,

    /// Width the speaker portrait is scaled to (aspect preserved)
    #[serde(default = "default_portrait_width")]
    pub portrait_width: u32,

    /// Portrait top edge, relative to the vertical centre
    #[serde(default = "default_portrait_center_offset")]
    pub portrait_center_offset: i32,

    /// Words per caption burst
    #[serde(default = "default_words_per_chunk")]
    pub words_per_chunk: usize,

    #[serde(default = "default_caption_font_size")]
    pub caption_font_size: u32,

    #[serde(default = "default_caption_stroke_width")]
    pub caption_stroke_width: u32,

    /// Caption box top edge, measured up from the bottom of the canvas
    #[serde(default = "default_caption_bottom_offset")]
    pub caption_bottom_offset: u32,

    /// Horizontal space left free around the caption box
    #[serde(default = "default_caption_box_margin")]
    pub caption_box_margin: u32,

    #[serde(default = "default_caption_box_height")]
    pub caption_box_height: u32,

    #[serde(default = "default_title_font_size")]
    pub title_font_size: u32,

    #[serde(default = "default_title_stroke_width")]
    pub title_stroke_width: u32,

    /// Title top edge, relative to the vertical centre
    #[serde(default = "default_title_center_offset")]
    pub title_center_offset: i32,

    #[serde(default = "default_title_box_margin")]
    pub title_box_margin: u32,

    #[serde(default = "default_title_box_height")]
    pub title_box_height: u32,

    #[serde(default = "default_title_color")]
    pub title_color: String,

    /// Outline colour for all text
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            portrait_width: default_portrait_width(),
            portrait_center_offset: default_portrait_center_offset(),
            words_per_chunk: default_words_per_chunk(),
            caption_font_size: default_caption_font_size(),
            caption_stroke_width: default_caption_stroke_width(),
            caption_bottom_offset: default_caption_bottom_offset(),
            caption_box_margin: default_caption_box_margin(),
            caption_box_height: default_caption_box_height(),
            title_font_size: default_title_font_size(),
            title_stroke_width: default_title_stroke_width(),
            title_center_offset: default_title_center_offset(),
            title_box_margin: default_title_box_margin(),
            title_box_height: default_title_box_height(),
            title_color: default_title_color(),
            stroke_color: default_stroke_color(),
        }
    }
}

impl LayoutConfig {
    /// Reject layouts that cannot produce a sensible composite
    pub fn validate(&self) -> Result<(), TimelineError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(TimelineError::InvalidInput(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.portrait_width == 0 {
            return Err(TimelineError::InvalidInput(
                "portrait_width must be positive".to_string(),
            ));
        }
        if self.words_per_chunk == 0 {
            return Err(TimelineError::InvalidInput(
                "words_per_chunk must be at least 1".to_string(),
            ));
        }
        if self.caption_font_size == 0 || self.title_font_size == 0 {
            return Err(TimelineError::InvalidInput(
                "font sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn vertical_center(&self) -> i32 {
        (self.canvas_height / 2) as i32
    }

    pub fn title_top(&self) -> i32 {
        self.vertical_center() + self.title_center_offset
    }

    pub fn portrait_top(&self) -> i32 {
        self.vertical_center() + self.portrait_center_offset
    }

    pub fn caption_top(&self) -> i32 {
        self.canvas_height as i32 - self.caption_bottom_offset as i32
    }

    pub fn title_box_width(&self) -> u32 {
        self.canvas_width.saturating_sub(self.title_box_margin).max(1)
    }

    pub fn caption_box_width(&self) -> u32 {
        self.canvas_width.saturating_sub(self.caption_box_margin).max(1)
    }
}

/// Scale-and-crop that makes a source fully cover the canvas
///
/// The scale factor is the larger of the two axis ratios, so the source is
/// never letterboxed; the overflow on the other axis is cropped evenly from
/// both sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverFit {
    pub scale: f64,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub crop_x: u32,
    pub crop_y: u32,
    pub crop_width: u32,
    pub crop_height: u32,
}

impl CoverFit {
    pub fn compute(
        source_width: u32,
        source_height: u32,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<Self, TimelineError> {
        if source_width == 0 || source_height == 0 {
            return Err(TimelineError::InvalidInput(format!(
                "background source must be non-empty, got {}x{}",
                source_width, source_height
            )));
        }

        let scale = f64::max(
            canvas_width as f64 / source_width as f64,
            canvas_height as f64 / source_height as f64,
        );

        // Clamp so rounding never leaves the scaled frame a pixel short
        let scaled_width = ((source_width as f64 * scale).round() as u32).max(canvas_width);
        let scaled_height = ((source_height as f64 * scale).round() as u32).max(canvas_height);

        Ok(Self {
            scale,
            scaled_width,
            scaled_height,
            crop_x: (scaled_width - canvas_width) / 2,
            crop_y: (scaled_height - canvas_height) / 2,
            crop_width: canvas_width,
            crop_height: canvas_height,
        })
    }
}

fn default_canvas_width() -> u32 {
    1080
}

fn default_canvas_height() -> u32 {
    1920
}

fn default_portrait_width() -> u32 {
    600
}

fn default_portrait_center_offset() -> i32 {
    -100
}

fn default_words_per_chunk() -> usize {
    DEFAULT_WORDS_PER_CHUNK
}

fn default_caption_font_size() -> u32 {
    75
}

fn default_caption_stroke_width() -> u32 {
    5
}

fn default_caption_bottom_offset() -> u32 {
    450
}

fn default_caption_box_margin() -> u32 {
    120
}

fn default_caption_box_height() -> u32 {
    250
}

fn default_title_font_size() -> u32 {
    110
}

fn default_title_stroke_width() -> u32 {
    6
}

fn default_title_center_offset() -> i32 {
    -650
}

fn default_title_box_margin() -> u32 {
    100
}

fn default_title_box_height() -> u32 {
    300
}

fn default_title_color() -> String {
    "white".to_string()
}

fn default_stroke_color() -> String {
    "black".to_string()
}
