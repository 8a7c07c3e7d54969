use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::layout::CoverFit;

/// Half-open time interval `[start, end)` in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether this span lies inside `[0, total]`, allowing `epsilon` of slack
    pub fn within(&self, total: f64, epsilon: f64) -> bool {
        self.start >= -epsilon && self.end <= total + epsilon && self.start <= self.end + epsilon
    }
}

/// Where a layer sits on the canvas
///
/// Layers are always centred horizontally; `top` is the distance from the top
/// edge of the canvas to the top of the layer and may be negative on small
/// canvases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub top: i32,
}

impl Placement {
    pub fn centered(top: i32) -> Self {
        Self { top }
    }
}

/// Looping background video, scaled to cover the canvas and centre-cropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundLayer {
    pub span: Span,
    pub source: PathBuf,
    pub fit: CoverFit,
}

/// Outlined text inside a fixed box (title and captions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    pub span: Span,
    pub text: String,
    pub placement: Placement,
    pub box_width: u32,
    pub box_height: u32,
    pub font_size: u32,
    pub color: String,
    pub stroke_color: String,
    pub stroke_width: u32,
}

/// Speaker portrait shown for the duration of one line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortraitLayer {
    pub span: Span,
    pub speaker: String,
    pub image: PathBuf,
    pub width: u32,
    pub placement: Placement,
}

/// Which of the four layer families a layer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Background,
    Title,
    Portrait,
    Caption,
}

/// A time-bounded visual element of the composite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
    Background(BackgroundLayer),
    Title(TextLayer),
    Portrait(PortraitLayer),
    Caption(TextLayer),
}

impl Layer {
    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Background(_) => LayerKind::Background,
            Self::Title(_) => LayerKind::Title,
            Self::Portrait(_) => LayerKind::Portrait,
            Self::Caption(_) => LayerKind::Caption,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Background(layer) => layer.span,
            Self::Title(layer) | Self::Caption(layer) => layer.span,
            Self::Portrait(layer) => layer.span,
        }
    }
}

/// Complete, z-ordered set of layers ready for rendering
///
/// `layers` is ordered bottom to top: background, title, portraits, captions.
/// `audio_track` lists the per-line audio assets in playback order; played back
/// to back they span exactly `total_duration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub total_duration: f64,
    pub layers: Vec<Layer>,
    pub audio_track: Vec<PathBuf>,
}

impl Timeline {
    pub fn layers_of(&self, kind: LayerKind) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(move |layer| layer.kind() == kind)
    }

    pub fn count_of(&self, kind: LayerKind) -> usize {
        self.layers_of(kind).count()
    }

    /// Whether every layer lies within `[0, total_duration]`
    pub fn layers_within_bounds(&self) -> bool {
        self.layers
            .iter()
            .all(|layer| layer.span().within(self.total_duration, super::TIME_EPSILON))
    }
}
