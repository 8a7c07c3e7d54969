use crate::errors::TimelineError;
use crate::script::DialogueLine;

use super::layers::Span;

/// A dialogue line placed on the absolute timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedLine<'a> {
    pub line: &'a DialogueLine,
    pub span: Span,
}

impl TimedLine<'_> {
    pub fn duration(&self) -> f64 {
        self.span.duration()
    }
}

/// Place lines back to back, in order, starting at zero
///
/// A strict prefix sum over the audio durations: each line starts where the
/// previous one ended. Durations are checked before anything is placed so a
/// bad line never yields a partially built schedule.
pub fn schedule_lines(lines: &[DialogueLine]) -> Result<Vec<TimedLine<'_>>, TimelineError> {
    for line in lines {
        let duration = line.audio_duration_secs;
        if !duration.is_finite() || duration < 0.0 {
            return Err(TimelineError::InvalidInput(format!(
                "line {} ({}) has invalid audio duration {}",
                line.index, line.speaker, duration
            )));
        }
    }

    let mut cursor = 0.0;
    Ok(lines
        .iter()
        .map(|line| {
            let start = cursor;
            let end = start + line.audio_duration_secs;
            cursor = end;
            TimedLine {
                line,
                span: Span::new(start, end),
            }
        })
        .collect())
}

/// End of the last placed line, or zero for an empty schedule
pub fn total_duration(timed: &[TimedLine<'_>]) -> f64 {
    timed.last().map_or(0.0, |t| t.span.end)
}
