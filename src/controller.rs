use std::path::{Path, PathBuf};

use strum_macros::Display;

use crate::{
    config::WidgetConfig,
    constants::config::*,
    context::RenderContext,
    debug,
    error::*,
    fallback::Degradable,
    feed::{FeedClient, VideoEntry},
    fetcher::{to_data_uri, FetchedImage, HttpFetcher},
    media::ClipGenerator,
    palette::{self, AccentColors},
    reader::ThemeReader,
    renderer::SvgRenderer,
    utils, warn,
    writer::WidgetWriter,
};

/// Label shown on the left of the progress bar
pub const TIME_LEFT_LABEL: &str = "00:00";

const GIF_MIME: &str = "image/gif";

/// Picks the video shown in the card
pub trait PlaylistSource {
    fn pick_random_entry(&self, playlist_id: &str) -> Result<VideoEntry>;
}

/// Downloads the images embedded in the card
pub trait ImageSource {
    fn fetch_image(&self, url: &str) -> Result<FetchedImage>;
}

/// Produces the animated background and the duration label
pub trait ClipSource {
    fn make_clip(&self, video_id: &str, out_gif: &Path) -> Result<PathBuf>;
    fn get_duration(&self, video_id: &str) -> Result<String>;
}

impl PlaylistSource for FeedClient {
    fn pick_random_entry(&self, playlist_id: &str) -> Result<VideoEntry> {
        FeedClient::pick_random_entry(self, playlist_id)
    }
}

impl ImageSource for HttpFetcher {
    fn fetch_image(&self, url: &str) -> Result<FetchedImage> {
        HttpFetcher::fetch_image(self, url)
    }
}

impl ClipSource for ClipGenerator {
    fn make_clip(&self, video_id: &str, out_gif: &Path) -> Result<PathBuf> {
        ClipGenerator::make_clip(self, video_id, out_gif)
    }

    fn get_duration(&self, video_id: &str) -> Result<String> {
        ClipGenerator::get_duration(self, video_id)
    }
}

/// Files read and written by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub readme: PathBuf,
    pub themes_dir: PathBuf,
    pub output: PathBuf,
    pub background_gif: PathBuf,
}

impl Paths {
    /// Default layout relative to the project root.
    ///
    /// # Examples
    /// ```
    /// use std::path::Path;
    /// use ytcard::controller::Paths;
    ///
    /// let paths = Paths::from_root(Path::new("/repo"));
    /// assert_eq!(paths.output, Path::new("/repo/dist/youtube-music-widget.svg"));
    /// assert_eq!(paths.background_gif, Path::new("/repo/dist/bg.gif"));
    /// ```
    pub fn from_root(root: &Path) -> Self {
        let output = root.join(DEFAULT_OUTPUT);
        let background_gif = output
            .parent()
            .unwrap_or(root)
            .join(DEFAULT_BACKGROUND_GIF);

        Paths {
            readme: root.join(DEFAULT_README),
            themes_dir: root.join(DEFAULT_THEMES_DIR),
            output,
            background_gif,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BackgroundKind {
    #[strum(serialize = "animated clip")]
    Animated,
    #[strum(serialize = "thumbnail")]
    Thumbnail,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub output: PathBuf,
    pub background: BackgroundKind,
    pub warnings: Vec<String>,
}

/// Generates the widget: picks a video, gathers its assets, renders the theme
/// and writes the SVG. Cosmetic steps degrade to their defaults with a warning,
/// anything else aborts the run before the output is touched.
pub struct WidgetController<'a, P, I, C> {
    config: &'a WidgetConfig,
    paths: &'a Paths,
    playlist: P,
    images: I,
    clips: C,
    renderer: SvgRenderer,
}

impl<'a> WidgetController<'a, FeedClient, HttpFetcher, ClipGenerator> {
    /// Creates a controller talking to YouTube and to the local media tools.
    pub fn with_defaults(config: &'a WidgetConfig, paths: &'a Paths, clips: ClipGenerator) -> Self {
        let fetcher = HttpFetcher::default();
        Self::new(config, paths, FeedClient::new(fetcher.clone()), fetcher, clips)
    }
}

impl<'a, P, I, C> WidgetController<'a, P, I, C>
where
    P: PlaylistSource,
    I: ImageSource,
    C: ClipSource,
{
    pub fn new(config: &'a WidgetConfig, paths: &'a Paths, playlist: P, images: I, clips: C) -> Self {
        Self {
            config,
            paths,
            playlist,
            images,
            clips,
            renderer: SvgRenderer::new(),
        }
    }

    /// Runs the whole generation.
    ///
    /// # Returns
    /// The output path, the kind of background used and the warnings raised.
    ///
    /// # Errors
    /// Returns an error if the theme is missing, the playlist cannot be read,
    /// the thumbnail cannot be downloaded or the output cannot be written.
    pub fn run(&self) -> Result<RunReport> {
        let theme_path = ThemeReader::check(&self.paths.themes_dir, &self.config.theme)?;
        let theme = ThemeReader::read_file(&theme_path, &self.config.theme)?;
        debug!("Using theme {}", theme_path.to_string_lossy());

        let entry = self.playlist.pick_random_entry(&self.config.playlist_id)?;
        debug!("Picked \"{}\" ({})", entry.title, entry.video_id);

        WidgetWriter::ensure_parent_dir(&self.paths.output)?;

        let thumbnail = self.images.fetch_image(&entry.thumbnail_url)?;
        let thumb_data_uri = thumbnail.data_uri();

        let mut warnings = Vec::new();

        let (background_data_uri, background) = if self.config.animated_background {
            let clip = self.background_clip(&entry.video_id, &thumb_data_uri);
            let kind = if clip.is_resolved() {
                BackgroundKind::Animated
            } else {
                BackgroundKind::Thumbnail
            };
            let uri = settle(clip, &mut warnings, "animated background unavailable, using the thumbnail");
            (uri, kind)
        } else {
            debug!("Animated background disabled");
            (thumb_data_uri.clone(), BackgroundKind::Thumbnail)
        };

        let time_right = if self.config.animated_background {
            let duration = Degradable::or_else(self.clips.get_duration(&entry.video_id), utils::today_label);
            settle(duration, &mut warnings, "video duration unavailable, showing the date")
        } else {
            utils::today_label()
        };

        let colors = palette::extract_colors(&thumbnail.bytes);
        let AccentColors { primary, secondary } =
            settle(colors, &mut warnings, "accent colors unavailable, using black");

        let ctx = RenderContext {
            title: entry.title,
            url: entry.url,
            thumb_data_uri,
            background_data_uri,
            time_left: TIME_LEFT_LABEL.to_string(),
            time_right,
            channel_name: entry.channel_name,
            color1: primary,
            color2: secondary,
        };

        let svg = self.renderer.render(&theme, &ctx);
        WidgetWriter::write(&self.paths.output, &svg)?;

        Ok(RunReport {
            output: self.paths.output.clone(),
            background,
            warnings,
        })
    }

    /// Generates the animated background, falling back to the thumbnail.
    fn background_clip(&self, video_id: &str, thumb_data_uri: &str) -> Degradable<String> {
        let result = self
            .clips
            .make_clip(video_id, &self.paths.background_gif)
            .and_then(|gif| {
                let bytes = std::fs::read(&gif).map_err(|e| {
                    Error::ClipGenerationFailed(format!("{}: {}", gif.to_string_lossy(), e))
                })?;
                Ok(to_data_uri(&bytes, GIF_MIME))
            });
        Degradable::or_else(result, || thumb_data_uri.to_string())
    }
}

/// Consumes a degradable value, recording a warning when it fell back.
fn settle<T>(value: Degradable<T>, warnings: &mut Vec<String>, what: &str) -> T {
    if let Some(cause) = value.cause() {
        let message = format!("{}: {}", what, cause);
        warn!("{}", message);
        warnings.push(message);
    }
    value.into_value()
}
