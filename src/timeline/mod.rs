/*!
 * Timeline assembly for narrated dialogue videos.
 *
 * Turns voiced dialogue lines into z-ordered, time-positioned layers that an
 * external compositor can render. Everything in here is pure and synchronous:
 * the same input always yields the same `Timeline`.
 *
 * - `timing`: places lines back to back on the absolute timeline
 * - `captions`: splits a line into fixed-size word chunks with proportional spans
 * - `layout`: canvas geometry, text boxes and background cover fitting
 * - `layers`: the `Layer` sum type and the `Timeline` container
 * - `assembler`: combines the above with character lookups
 */

pub use self::assembler::{BackgroundSource, TimelineAssembler};
pub use self::captions::{chunk_line, CaptionChunk, DEFAULT_WORDS_PER_CHUNK};
pub use self::layers::{
    BackgroundLayer, Layer, LayerKind, Placement, PortraitLayer, Span, TextLayer, Timeline,
};
pub use self::layout::{CoverFit, LayoutConfig};
pub use self::timing::{schedule_lines, total_duration, TimedLine};

/// Tolerance used when comparing accumulated times, in seconds
pub const TIME_EPSILON: f64 = 1e-6;

pub mod assembler;
pub mod captions;
pub mod layers;
pub mod layout;
pub mod timing;
