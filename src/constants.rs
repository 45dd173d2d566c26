//! Module for shared constants used across the codebase

/// Title layout constants. The numbers are tuned against the default theme so
/// that the scroll speed looks the same whatever the title length.
pub mod layout {
    /// Font size used to estimate the rendered title width
    pub const TITLE_FONT_SIZE: u32 = 18;

    /// Width of the clipping box of the title. Wider titles scroll.
    pub const TITLE_CLIP_WIDTH: u32 = 372;

    /// X coordinate the second marquee copy is offset from
    pub const MARQUEE_BASE_X: u32 = 160;

    /// Space added after the title before it repeats
    pub const MARQUEE_PADDING: u32 = 70;

    /// Minimum scroll distance
    pub const MARQUEE_MIN_GAP: u32 = 520;

    /// Scroll speed in units per second
    pub const MARQUEE_SPEED: f64 = 55.0;

    /// Bounds of the marquee animation duration (seconds)
    pub const MARQUEE_MIN_DURATION: f64 = 10.0;
    pub const MARQUEE_MAX_DURATION: f64 = 28.0;
}

/// Names used by the theme files.
pub mod template {
    /// Region kept when the title scrolls
    pub const TITLE_FLOW: &str = "TITLE_FLOW";

    /// Region kept when the title fits
    pub const TITLE_STATIC: &str = "TITLE_STATIC";

    pub const MARKER_START_SUFFIX: &str = "_START";
    pub const MARKER_END_SUFFIX: &str = "_END";

    pub const TITLE: &str = "TITLE";
    pub const URL: &str = "URL";
    pub const THUMB_URL: &str = "THUMB_URL";
    pub const THUMB_DATA: &str = "THUMB_DATA";
    pub const BG_URL: &str = "BG_URL";
    pub const BG_DATA: &str = "BG_DATA";
    pub const TIME_LEFT: &str = "TIME_LEFT";
    pub const TIME_RIGHT: &str = "TIME_RIGHT";
    pub const CHANNEL_NAME: &str = "CHANNEL_NAME";
    pub const COLOR_1: &str = "COLOR_1";
    pub const COLOR_2: &str = "COLOR_2";
    pub const TITLE_X2: &str = "TITLE_X2";
    pub const MARQUEE_DX: &str = "MARQUEE_DX";
    pub const MARQUEE_DUR: &str = "MARQUEE_DUR";

    /// Default theme file name
    pub const DEFAULT_THEME: &str = "default.svg";
}

pub mod config {
    /// Tag line identifying the configuration comment block in the README
    pub const CONFIG_TAG: &str = "YT_MUSIC_CONFIG";

    pub const ENV_THEME: &str = "YT_MUSIC_THEME";
    pub const ENV_PLAYLIST_ID: &str = "YT_MUSIC_PLAYLIST_ID";
    pub const ENV_ANIMATED_BG: &str = "YT_MUSIC_ANIMATED_BG";

    pub const DEFAULT_README: &str = "README.md";
    pub const DEFAULT_THEMES_DIR: &str = "themes";
    pub const DEFAULT_OUTPUT: &str = "dist/youtube-music-widget.svg";
    pub const DEFAULT_BACKGROUND_GIF: &str = "bg.gif";
}

pub mod youtube {
    use std::time::Duration;

    pub const FEED_URL: &str = "https://www.youtube.com/feeds/videos.xml";
    pub const WATCH_URL: &str = "https://www.youtube.com/watch";
    pub const FEED_ACCEPT: &str = "application/atom+xml,application/xml;q=0.9,*/*;q=0.8";
    pub const IMAGE_ACCEPT: &str = "image/*,*/*;q=0.8";
    pub const USER_AGENT: &str = "Mozilla/5.0";
    pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";
    pub const UNKNOWN_CHANNEL: &str = "Unknown";

    /// Timeout applied to every direct HTTP call
    pub const HTTP_TIMEOUT: Duration = Duration::from_secs(25);

    /// Builds the thumbnail URL of a video. The CDN is assumed to always hold
    /// this quality, a missing image shows up as a broken picture in the card.
    pub fn thumbnail_url(video_id: &str) -> String {
        format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", video_id)
    }
}

pub mod media {
    use std::time::Duration;

    /// Offsets (seconds) the background clip may start at
    pub const START_CANDIDATES: [u32; 4] = [20, 30, 40, 60];

    /// Length of the background clip (seconds)
    pub const CLIP_SECONDS: u32 = 10;

    pub const DOWNLOADER: &str = "yt-dlp";
    pub const TRANSCODER: &str = "ffmpeg";

    pub const DOWNLOAD_FORMAT: &str = "best[ext=mp4]/best";
    pub const GIF_FILTER: &str = "fps=12,scale=560:-1:flags=lanczos,split[s0][s1];\
                                  [s0]palettegen[p];[s1][p]paletteuse=dither=bayer";

    pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(180);
    pub const TRANSCODE_TIMEOUT: Duration = Duration::from_secs(120);
    pub const METADATA_TIMEOUT: Duration = Duration::from_secs(60);
}

pub mod palette {
    /// Squared RGB distance the secondary accent must keep from the primary one (28²)
    pub const MIN_ACCENT_DISTANCE: u32 = 784;

    pub const FALLBACK_COLOR: &str = "#000000";

    /// Sampling step of the quantizer (1 = every pixel)
    pub const QUALITY: u8 = 10;

    pub const MAX_COLORS: u8 = 6;
}
