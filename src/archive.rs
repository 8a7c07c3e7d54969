use anyhow::{anyhow, Result};
use log::{debug, info};
use once_cell::sync::Lazy;
use rand::seq::IndexedRandom;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;

// @module: Background selection and output housekeeping

// Archived renders are named by a zero-padded sequence number
static ARCHIVE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(\d+)\.mp4$").unwrap());

/// Pick a random `.mp4` from `dir`
pub fn pick_random_background<P: AsRef<Path>>(dir: P) -> Result<PathBuf> {
    let dir = dir.as_ref();
    if !FileManager::dir_exists(dir) {
        return Err(anyhow!("Background directory does not exist: {:?}", dir));
    }

    let candidates = FileManager::find_files(dir, "mp4")?;
    let chosen = candidates
        .choose(&mut rand::rng())
        .cloned()
        .ok_or_else(|| anyhow!("No .mp4 backgrounds found in {:?}", dir))?;

    debug!("Picked background {:?} out of {}", chosen, candidates.len());
    Ok(chosen)
}

/// Next free archive number: one past the highest `NNN.mp4` in `dir`
///
/// Files that do not follow the naming scheme are ignored, so gaps left by
/// deleted videos are not reused.
pub fn next_archive_index<P: AsRef<Path>>(dir: P) -> Result<u32> {
    let dir = dir.as_ref();
    if !FileManager::dir_exists(dir) {
        return Ok(1);
    }

    let highest = FileManager::find_files(dir, "mp4")?
        .iter()
        .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
        .filter_map(|name| ARCHIVE_NAME.captures(name))
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    highest
        .checked_add(1)
        .ok_or_else(|| anyhow!("Archive numbering is exhausted in {:?} (highest is {})", dir, highest))
}

/// File name for archive entry `index`, e.g. `007.mp4`
pub fn archive_file_name(index: u32, extension: &str) -> String {
    format!("{:03}.{}", index, extension)
}

/// Move a finished render into `posted_dir` under the next archive number
pub fn archive_video<P1: AsRef<Path>, P2: AsRef<Path>>(video: P1, posted_dir: P2) -> Result<PathBuf> {
    let video = video.as_ref();
    let posted_dir = posted_dir.as_ref();

    if !FileManager::file_exists(video) {
        return Err(anyhow!("Rendered video not found: {:?}", video));
    }

    FileManager::ensure_dir(posted_dir)?;
    let target = posted_dir.join(archive_file_name(next_archive_index(posted_dir)?, "mp4"));
    FileManager::move_file(video, &target)?;

    info!("Archived video to {:?}", target);
    Ok(target)
}

/// Delete the plain files in `dir`, e.g. per-line audio left behind by a run
pub fn clear_directory_files<P: AsRef<Path>>(dir: P) -> Result<usize> {
    let dir = dir.as_ref();
    if !FileManager::dir_exists(dir) {
        return Ok(0);
    }
    let removed = FileManager::clear_files(dir)?;
    debug!("Removed {} files from {:?}", removed, dir);
    Ok(removed)
}
