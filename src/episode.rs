/*!
 * Episode metadata from subtitle filenames.
 *
 * Files are named `<series> - <season>x<episode> - <episode title>.<suffix>.srt`,
 * e.g. `Westworld - 1x01 - The Original.HDTV.KILLERS.en.srt`.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::EpisodeError;

// Series prefix, a single-digit season (1-3), episode number, then the title
// up to the first dot. Anything between the title and the extension is
// release-group noise.
static EPISODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?) - ([1-3])x(\d{1,2}) - ([^.]+?)(?:\..*)?\.(?i:srt)$").unwrap()
});

const SEGMENT_SEPARATOR: &str = " - ";

/// Metadata shared by every row of one episode file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeMetadata {
    pub season_num: u32,
    pub episode_num: u32,
    pub episode_name: String,
    pub source_filename: String,
}

/// Parses episode metadata from filenames
#[derive(Debug, Clone, Default)]
pub struct EpisodeMetadataExtractor {
    series_title: Option<String>,
}

impl EpisodeMetadataExtractor {
    /// Accept only filenames whose prefix is exactly the given series title.
    /// `None` accepts any single-segment title.
    pub fn new(series_title: Option<&str>) -> Self {
        let series_title = series_title
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_string);
        Self { series_title }
    }

    /// Extract metadata from a bare filename (no directory part)
    pub fn extract(&self, filename: &str) -> Result<EpisodeMetadata, EpisodeError> {
        let mismatch = || EpisodeError::FilenameFormatMismatch { filename: filename.to_string() };

        let caps = EPISODE_REGEX.captures(filename).ok_or_else(mismatch)?;

        let series = &caps[1];
        let series_ok = match &self.series_title {
            Some(title) => series == title,
            None => !series.contains(SEGMENT_SEPARATOR),
        };
        if !series_ok {
            return Err(mismatch());
        }

        let season_num = caps[2].parse().map_err(|_| mismatch())?;
        let episode_num = caps[3].parse().map_err(|_| mismatch())?;
        let episode_name = caps[4].trim();
        if episode_name.is_empty() {
            return Err(mismatch());
        }

        Ok(EpisodeMetadata {
            season_num,
            episode_num,
            episode_name: episode_name.to_string(),
            source_filename: filename.to_string(),
        })
    }
}
