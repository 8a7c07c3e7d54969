use async_trait::async_trait;
use log::debug;
use std::fmt::Debug;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use crate::errors::RenderError;

// @module: Media inspection through ffprobe

/// Reads the properties the pipeline needs from audio and video files
#[async_trait]
pub trait MediaProbe: Send + Sync + Debug {
    /// Playback duration in seconds
    async fn duration_secs(&self, path: &Path) -> Result<f64, RenderError>;

    /// Width and height of the first video stream
    async fn dimensions(&self, path: &Path) -> Result<(u32, u32), RenderError>;
}

/// `MediaProbe` backed by the ffprobe binary
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    binary: String,
    timeout: Duration,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl FfprobeProbe {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: Duration::from_secs(60),
        }
    }

    async fn run(&self, args: &[&str], path: &Path) -> Result<String, RenderError> {
        let output_future = Command::new(&self.binary)
            .args(["-v", "error"])
            .args(args)
            .args(["-of", "default=noprint_wrappers=1:nokey=1"])
            .arg(path)
            .output();

        let output = tokio::select! {
            result = output_future => result.map_err(|e| RenderError::Launch {
                tool: self.binary.clone(),
                message: e.to_string(),
            })?,
            _ = tokio::time::sleep(self.timeout) => {
                return Err(RenderError::ToolFailed {
                    tool: self.binary.clone(),
                    message: format!("timed out after {:?} probing {:?}", self.timeout, path),
                });
            }
        };

        if !output.status.success() {
            return Err(RenderError::ToolFailed {
                tool: self.binary.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    async fn duration_secs(&self, path: &Path) -> Result<f64, RenderError> {
        let stdout = self.run(&["-show_entries", "format=duration"], path).await?;
        let duration = parse_duration(&stdout).ok_or_else(|| RenderError::ToolFailed {
            tool: self.binary.clone(),
            message: format!("unreadable duration {:?} for {:?}", stdout, path),
        })?;
        debug!("Probed {:?}: {:.3}s", path, duration);
        Ok(duration)
    }

    async fn dimensions(&self, path: &Path) -> Result<(u32, u32), RenderError> {
        let stdout = self
            .run(
                &["-select_streams", "v:0", "-show_entries", "stream=width,height"],
                path,
            )
            .await?;
        parse_dimensions(&stdout).ok_or_else(|| RenderError::ToolFailed {
            tool: self.binary.clone(),
            message: format!("unreadable dimensions {:?} for {:?}", stdout, path),
        })
    }
}

/// Parse ffprobe's bare `format=duration` output
fn parse_duration(stdout: &str) -> Option<f64> {
    stdout
        .lines()
        .next()
        .and_then(|line| line.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
}

/// Parse ffprobe's bare `stream=width,height` output (one value per line)
fn parse_dimensions(stdout: &str) -> Option<(u32, u32)> {
    let mut values = stdout.lines().filter_map(|l| l.trim().parse::<u32>().ok());
    let width = values.next()?;
    let height = values.next()?;
    Some((width, height))
}
