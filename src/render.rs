/*!
 * Rendering a `Timeline` into a video file with ffmpeg.
 *
 * The timeline maps onto a single `-filter_complex` graph: the background is
 * looped, scaled to cover the canvas and cropped; title and captions become
 * `drawtext` filters and portraits become `overlay` filters, each gated with
 * `enable='between(t,start,end)'`; the per-line audio inputs are concatenated
 * in order.
 */

use async_trait::async_trait;
use log::{debug, error, info};
use std::fmt::{Debug, Write as _};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::RenderConfig;
use crate::errors::RenderError;
use crate::timeline::{BackgroundLayer, Layer, PortraitLayer, TextLayer, Timeline};

/// Turns an assembled timeline into a finished video file
#[async_trait]
pub trait Compositor: Send + Sync + Debug {
    async fn render(&self, timeline: &Timeline, output: &Path) -> Result<(), RenderError>;
}

/// `Compositor` that shells out to ffmpeg
#[derive(Debug, Clone)]
pub struct FfmpegCompositor {
    config: RenderConfig,
}

impl FfmpegCompositor {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Full ffmpeg argument list (without the binary) for `timeline`
    pub fn build_args(&self, timeline: &Timeline, output: &Path) -> Result<Vec<String>, RenderError> {
        let background = timeline
            .layers
            .iter()
            .find_map(|layer| match layer {
                Layer::Background(bg) => Some(bg),
                _ => None,
            })
            .ok_or_else(|| RenderError::Unrenderable("timeline has no background layer".to_string()))?;

        if timeline.audio_track.is_empty() {
            return Err(RenderError::Unrenderable("timeline has no audio".to_string()));
        }

        let mut args: Vec<String> = vec!["-y".into(), "-hide_banner".into()];

        // Input 0: background, looped for as long as the narration runs
        args.extend(["-stream_loop".into(), "-1".into(), "-i".into(), path_arg(&background.source)]);

        // Inputs 1..=P: one still image per portrait layer
        let portraits: Vec<&PortraitLayer> = timeline
            .layers
            .iter()
            .filter_map(|layer| match layer {
                Layer::Portrait(p) => Some(p),
                _ => None,
            })
            .collect();
        for portrait in &portraits {
            args.extend([
                "-loop".into(),
                "1".into(),
                "-t".into(),
                format_seconds(timeline.total_duration),
                "-i".into(),
                path_arg(&portrait.image),
            ]);
        }

        // Remaining inputs: line audio in playback order
        let first_audio_input = 1 + portraits.len();
        for audio in &timeline.audio_track {
            args.extend(["-i".into(), path_arg(audio)]);
        }

        let graph = self.filter_graph(timeline, background, first_audio_input);
        args.extend([
            "-filter_complex".into(),
            graph,
            "-map".into(),
            "[vout]".into(),
            "-map".into(),
            "[aout]".into(),
            "-t".into(),
            format_seconds(timeline.total_duration),
            "-r".into(),
            self.config.fps.to_string(),
            "-c:v".into(),
            self.config.video_codec.clone(),
            "-preset".into(),
            self.config.preset.clone(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-c:a".into(),
            self.config.audio_codec.clone(),
            "-threads".into(),
            self.config.threads.to_string(),
            path_arg(output),
        ]);

        Ok(args)
    }

    /// Build the `-filter_complex` graph, one filter per layer in z-order
    fn filter_graph(&self, timeline: &Timeline, background: &BackgroundLayer, first_audio_input: usize) -> String {
        let fit = &background.fit;
        let mut graph = String::new();
        let _ = write!(
            graph,
            "[0:v]scale={}:{},crop={}:{}:{}:{},setsar=1,trim=duration={},setpts=PTS-STARTPTS[v0]",
            fit.scaled_width,
            fit.scaled_height,
            fit.crop_width,
            fit.crop_height,
            fit.crop_x,
            fit.crop_y,
            format_seconds(timeline.total_duration),
        );

        let mut current = 0usize;
        let mut portrait_input = 1usize;
        for layer in &timeline.layers {
            let filter = match layer {
                Layer::Background(_) => continue,
                Layer::Title(text) => {
                    let wrapped = wrap_text(&text.text, max_chars_per_line(text));
                    format!("[v{}]{}", current, self.drawtext(text, &wrapped))
                }
                Layer::Caption(text) => format!("[v{}]{}", current, self.drawtext(text, &text.text)),
                Layer::Portrait(portrait) => {
                    let input = portrait_input;
                    portrait_input += 1;
                    format!(
                        "[{input}:v]scale={width}:-1[p{input}];[v{current}][p{input}]overlay=x=(W-w)/2:y={top}:enable='{enable}'",
                        width = portrait.width,
                        top = portrait.placement.top,
                        enable = enable_expr(portrait.span.start, portrait.span.end),
                    )
                }
            };
            let _ = write!(graph, ";{}[v{}]", filter, current + 1);
            current += 1;
        }
        let _ = write!(graph, ";[v{}]null[vout]", current);

        let audio_count = timeline.audio_track.len();
        graph.push(';');
        for i in 0..audio_count {
            let _ = write!(graph, "[{}:a]", first_audio_input + i);
        }
        let _ = write!(graph, "concat=n={}:v=0:a=1[aout]", audio_count);

        graph
    }

    fn drawtext(&self, layer: &TextLayer, text: &str) -> String {
        format!(
            "drawtext=fontfile='{font}':text='{text}':fontsize={size}:fontcolor={color}:borderw={stroke}:bordercolor={stroke_color}:line_spacing=8:x=(w-text_w)/2:y={top}+({box_h}-text_h)/2:enable='{enable}'",
            font = escape_filter_value(&self.config.font_path.to_string_lossy()),
            text = escape_drawtext_text(text),
            size = layer.font_size,
            color = layer.color,
            stroke = layer.stroke_width,
            stroke_color = layer.stroke_color,
            top = layer.placement.top,
            box_h = layer.box_height,
            enable = enable_expr(layer.span.start, layer.span.end),
        )
    }
}

#[async_trait]
impl Compositor for FfmpegCompositor {
    async fn render(&self, timeline: &Timeline, output: &Path) -> Result<(), RenderError> {
        let args = self.build_args(timeline, output)?;
        info!(
            "Rendering {:.1}s video with {} layers to {:?}",
            timeline.total_duration,
            timeline.layers.len(),
            output
        );
        debug!("ffmpeg {}", args.join(" "));

        let ffmpeg_future = Command::new(&self.config.ffmpeg_path).args(&args).output();
        let timeout = Duration::from_secs(self.config.timeout_secs);

        let result = tokio::select! {
            result = ffmpeg_future => result.map_err(|e| RenderError::Launch {
                tool: self.config.ffmpeg_path.clone(),
                message: e.to_string(),
            })?,
            _ = tokio::time::sleep(timeout) => {
                return Err(RenderError::ToolFailed {
                    tool: self.config.ffmpeg_path.clone(),
                    message: format!("timed out after {:?}", timeout),
                });
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = filter_ffmpeg_stderr(&stderr);
            error!("Rendering failed: {}", filtered);
            return Err(RenderError::ToolFailed {
                tool: self.config.ffmpeg_path.clone(),
                message: filtered,
            });
        }

        info!("Video saved to {:?}", output);
        Ok(())
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn format_seconds(seconds: f64) -> String {
    format!("{:.3}", seconds)
}

fn enable_expr(start: f64, end: f64) -> String {
    format!("between(t,{},{})", format_seconds(start), format_seconds(end))
}

/// Escape a value placed inside single quotes in a filter graph
///
/// The graph parser keeps quoted text literal and the option parser then
/// unescapes it once, so `\` and `:` are escaped for the option level.
/// Quotes cannot be escaped inside a quoted filter value, so apostrophes are
/// swapped for the typographic form.
pub fn escape_filter_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push('\u{2019}'),
            ':' => escaped.push_str("\\:"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape drawtext `text`, which drawtext expands after the option parser
///
/// `%` starts an expansion and `\` escapes the next character, so both are
/// escaped for drawtext first and then once more for the option level.
pub fn escape_drawtext_text(text: &str) -> String {
    let mut expanded = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => expanded.push_str("\\\\"),
            '%' => expanded.push_str("\\%"),
            _ => expanded.push(c),
        }
    }
    escape_filter_value(&expanded)
}

/// Greedy word wrap; words longer than `width` get a line of their own
pub fn wrap_text(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

/// Rough characters-per-line for a text box, assuming glyphs ~0.55em wide
fn max_chars_per_line(layer: &TextLayer) -> usize {
    ((layer.box_width as f64 / (layer.font_size as f64 * 0.55)).floor() as usize).max(1)
}

/// Keep only the lines of ffmpeg's stderr that describe an error
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let relevant: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            lower.contains("error") || lower.contains("invalid") || lower.contains("no such")
        })
        .collect();

    if relevant.is_empty() {
        stderr.lines().rev().take(5).collect::<Vec<_>>().into_iter().rev().collect::<Vec<_>>().join("\n")
    } else {
        relevant.join("\n")
    }
}
