use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::constants::media::*;
use crate::constants::youtube::WATCH_URL;
use crate::debug;
use crate::error::*;
use crate::utils;

/// Name of the downloaded segment inside the scratch directory
const SEGMENT_FILE: &str = "segment.mp4";

/// Metadata fields read from `yt-dlp -j`
#[derive(Debug, Deserialize)]
struct VideoMetadata {
    duration: Option<f64>,
}

/// Builds the watch URL of a video.
///
/// # Examples
/// ```
/// use ytcard::media::watch_url;
///
/// assert_eq!(watch_url("dQw4w9WgXcQ"), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
/// ```
pub fn watch_url(video_id: &str) -> String {
    format!("{}?v={}", WATCH_URL, video_id)
}

/// Produces short looping animated backgrounds out of a video using external tools.
#[derive(Debug, Clone)]
pub struct ClipGenerator {
    downloader: String,
    transcoder: String,
    show_progress: bool,
}

impl Default for ClipGenerator {
    fn default() -> Self {
        Self::new(DOWNLOADER, TRANSCODER)
    }
}

impl ClipGenerator {
    /// Creates a generator using the given downloader and transcoder binaries.
    pub fn new<D: Into<String>, T: Into<String>>(downloader: D, transcoder: T) -> Self {
        Self {
            downloader: downloader.into(),
            transcoder: transcoder.into(),
            show_progress: true,
        }
    }

    /// Disables the progress spinner.
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Generates a looping GIF from a 10 seconds segment of the video.
    ///
    /// The segment starts at a random offset and is downloaded into a scratch
    /// directory that is removed afterwards, whatever the outcome.
    ///
    /// # Arguments
    /// * `video_id` - The video to sample.
    /// * `out_gif` - Where the animated image is written.
    ///
    /// # Returns
    /// The path of the generated image.
    ///
    /// # Errors
    /// Every failure is reported as `Error::ClipGenerationFailed`.
    pub fn make_clip(&self, video_id: &str, out_gif: &Path) -> Result<PathBuf> {
        let spinner = self.spinner(video_id);
        let result = self.try_make_clip(video_id, out_gif, &spinner);
        spinner.finish_and_clear();

        result.map_err(|e| match e {
            Error::ClipGenerationFailed(_) => e,
            e => Error::ClipGenerationFailed(e.to_string()),
        })
    }

    fn try_make_clip(&self, video_id: &str, out_gif: &Path, spinner: &ProgressBar) -> Result<PathBuf> {
        if video_id.trim().is_empty() {
            return Err(Error::ClipGenerationFailed("empty video id".to_string()));
        }
        self.ensure_tools()?;

        let start = START_CANDIDATES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(START_CANDIDATES[0]);

        let scratch = tempfile::tempdir()?;
        let segment = scratch.path().join(SEGMENT_FILE);

        spinner.set_message(format!("Downloading {}s segment at {}s", CLIP_SECONDS, start));
        let args = download_args(video_id, start, &segment);
        check_status(&self.downloader, run_tool(&self.downloader, &args, DOWNLOAD_TIMEOUT)?)?;

        if !segment.is_file() {
            return Err(Error::ClipGenerationFailed(format!(
                "{} did not produce {}",
                self.downloader,
                segment.display()
            )));
        }

        if let Some(parent) = out_gif.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        match std::fs::remove_file(out_gif) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        spinner.set_message("Converting segment to GIF");
        let args = transcode_args(&segment, out_gif);
        check_status(&self.transcoder, run_tool(&self.transcoder, &args, TRANSCODE_TIMEOUT)?)?;

        let produced = std::fs::metadata(out_gif).map(|m| m.len()).unwrap_or(0);
        if produced == 0 {
            return Err(Error::ClipGenerationFailed(format!(
                "{} did not produce {}",
                self.transcoder,
                out_gif.display()
            )));
        }

        debug!("Generated clip {} ({} bytes)", out_gif.display(), produced);
        Ok(out_gif.to_path_buf())
    }

    /// Retrieves the duration of the video as `mm:ss` without downloading it.
    ///
    /// # Errors
    /// Returns an error if the downloader is missing, fails, times out or does
    /// not report a duration.
    pub fn get_duration(&self, video_id: &str) -> Result<String> {
        if !utils::command_exists(&self.downloader) {
            return Err(Error::CommandError(format!("{} not found in PATH", self.downloader)));
        }

        let args = metadata_args(video_id);
        let output = check_status(&self.downloader, run_tool(&self.downloader, &args, METADATA_TIMEOUT)?)?;
        parse_duration(&output.stdout)
    }

    fn ensure_tools(&self) -> Result<()> {
        for tool in [&self.downloader, &self.transcoder] {
            if !utils::command_exists(tool) {
                return Err(Error::ClipGenerationFailed(format!("{} not found in PATH", tool)));
            }
        }
        Ok(())
    }

    fn spinner(&self, video_id: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{prefix:.yellow} {spinner:.green} {msg} [{elapsed_precise}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_prefix(video_id.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Arguments of the segment download.
pub fn download_args(video_id: &str, start: u32, segment: &Path) -> Vec<OsString> {
    vec![
        "-f".into(),
        DOWNLOAD_FORMAT.into(),
        "--download-sections".into(),
        format!("*{}-{}", start, start + CLIP_SECONDS).into(),
        "--merge-output-format".into(),
        "mp4".into(),
        "-o".into(),
        segment.as_os_str().to_owned(),
        watch_url(video_id).into(),
    ]
}

/// Arguments of the segment to GIF conversion.
pub fn transcode_args(segment: &Path, out_gif: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        segment.as_os_str().to_owned(),
        "-vf".into(),
        GIF_FILTER.into(),
        "-loop".into(),
        "0".into(),
        out_gif.as_os_str().to_owned(),
    ]
}

/// Arguments of the metadata-only query.
pub fn metadata_args(video_id: &str) -> Vec<OsString> {
    vec!["-j".into(), "--no-playlist".into(), watch_url(video_id).into()]
}

/// Reads the `duration` field of the `yt-dlp -j` output as `mm:ss`.
///
/// # Examples
/// ```
/// use ytcard::media::parse_duration;
///
/// assert_eq!(parse_duration(br#"{"id": "x", "duration": 215}"#).unwrap(), "03:35");
/// assert_eq!(parse_duration(br#"{"duration": 61.9}"#).unwrap(), "01:01");
/// ```
pub fn parse_duration(json: &[u8]) -> Result<String> {
    let metadata: VideoMetadata = serde_json::from_slice(json)?;
    match metadata.duration {
        Some(seconds) if seconds.is_finite() && seconds >= 0.0 => {
            Ok(utils::format_mmss(seconds as u64))
        }
        _ => Err(Error::CommandError("no duration reported".to_string())),
    }
}

/// Runs an external tool and waits for it at most `timeout`.
///
/// The child is killed when the timeout elapses.
///
/// # Errors
/// Returns `Error::CommandTimeout` when the tool takes too long, or an I/O error
/// when it cannot be spawned.
pub fn run_tool(program: &str, args: &[OsString], timeout: Duration) -> Result<Output> {
    debug!("Running {} {:?}", program, args);

    let mut command = smol::process::Command::new(program);
    command.args(args).kill_on_drop(true);

    smol::block_on(async {
        let run = async { Some(command.output().await) };
        let deadline = async {
            smol::Timer::after(timeout).await;
            None
        };

        match smol::future::or(run, deadline).await {
            Some(output) => Ok(output?),
            None => Err(Error::CommandTimeout {
                program: program.to_string(),
                seconds: timeout.as_secs(),
            }),
        }
    })
}

/// Turns a non-zero exit status into an error carrying the end of stderr.
fn check_status(program: &str, output: Output) -> Result<Output> {
    if output.status.success() {
        return Ok(output);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let last_line = stderr.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("");
    Err(Error::CommandError(format!(
        "{} exited with {}: {}",
        program,
        output.status,
        last_line.trim()
    )))
}
