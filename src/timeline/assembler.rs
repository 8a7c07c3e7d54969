use log::debug;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::characters::{Character, CharacterRegistry};
use crate::errors::TimelineError;
use crate::script::DialogueLine;

use super::captions::chunk_line;
use super::layers::{BackgroundLayer, Layer, Placement, PortraitLayer, Span, TextLayer, Timeline};
use super::layout::{CoverFit, LayoutConfig};
use super::timing::{schedule_lines, total_duration};

/// Background video and its native frame size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundSource {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl BackgroundSource {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }
}

/// Builds a `Timeline` from voiced dialogue lines
///
/// Borrows the registry and layout; holds no state between calls, so one
/// assembler can be reused for any number of scripts.
#[derive(Debug, Clone, Copy)]
pub struct TimelineAssembler<'a> {
    registry: &'a CharacterRegistry,
    layout: &'a LayoutConfig,
}

impl<'a> TimelineAssembler<'a> {
    pub fn new(registry: &'a CharacterRegistry, layout: &'a LayoutConfig) -> Self {
        Self { registry, layout }
    }

    /// Assemble background, title, portrait and caption layers
    ///
    /// Every input is validated before the first layer is built: an empty
    /// dialogue, a blank topic, an unknown speaker, a bad duration or a bad
    /// layout abort the whole assembly with no partial timeline.
    pub fn assemble(
        &self,
        topic: &str,
        background: &BackgroundSource,
        lines: &[DialogueLine],
    ) -> Result<Timeline, TimelineError> {
        self.layout.validate()?;

        if lines.is_empty() {
            return Err(TimelineError::EmptyDialogue);
        }

        if topic.trim().is_empty() {
            return Err(TimelineError::InvalidInput("topic is blank, nothing to title".to_string()));
        }

        let characters = lines
            .iter()
            .map(|line| self.registry.lookup(&line.speaker))
            .collect::<Result<Vec<&Character>, _>>()?;

        let fit = CoverFit::compute(
            background.width,
            background.height,
            self.layout.canvas_width,
            self.layout.canvas_height,
        )?;

        let timed = schedule_lines(lines)?;
        let total = total_duration(&timed);
        let full = Span::new(0.0, total);

        let mut layers = Vec::with_capacity(2 + timed.len() * 2);

        layers.push(Layer::Background(BackgroundLayer {
            span: full,
            source: background.path.clone(),
            fit,
        }));

        layers.push(Layer::Title(self.title_layer(topic, full)));

        for (timed_line, character) in timed.iter().zip(&characters) {
            layers.push(Layer::Portrait(PortraitLayer {
                span: timed_line.span,
                speaker: timed_line.line.speaker.clone(),
                image: character.portrait.clone(),
                width: self.layout.portrait_width,
                placement: Placement::centered(self.layout.portrait_top()),
            }));
        }

        for (timed_line, character) in timed.iter().zip(&characters) {
            for chunk in chunk_line(timed_line, self.layout.words_per_chunk, &character.color)? {
                layers.push(Layer::Caption(TextLayer {
                    span: chunk.span,
                    text: chunk.text,
                    placement: Placement::centered(self.layout.caption_top()),
                    box_width: self.layout.caption_box_width(),
                    box_height: self.layout.caption_box_height,
                    font_size: self.layout.caption_font_size,
                    color: chunk.color,
                    stroke_color: self.layout.stroke_color.clone(),
                    stroke_width: self.layout.caption_stroke_width,
                }));
            }
        }

        debug!(
            "Assembled timeline: {} lines, {} layers, {:.3}s",
            lines.len(),
            layers.len(),
            total
        );

        Ok(Timeline {
            canvas_width: self.layout.canvas_width,
            canvas_height: self.layout.canvas_height,
            total_duration: total,
            layers,
            audio_track: lines.iter().map(|line| line.audio_path.clone()).collect(),
        })
    }

    fn title_layer(&self, topic: &str, span: Span) -> TextLayer {
        TextLayer {
            span,
            text: topic.trim().to_string(),
            placement: Placement::centered(self.layout.title_top()),
            box_width: self.layout.title_box_width(),
            box_height: self.layout.title_box_height,
            font_size: self.layout.title_font_size,
            color: self.layout.title_color.clone(),
            stroke_color: self.layout.stroke_color.clone(),
            stroke_width: self.layout.title_stroke_width,
        }
    }
}
