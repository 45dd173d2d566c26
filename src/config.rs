use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use strum_macros::Display;

use crate::constants::config::*;
use crate::constants::template::DEFAULT_THEME;
use crate::error::*;

static COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--(.*?)-->").unwrap());

static TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?m)^\s*{}\s*$", regex::escape(CONFIG_TAG))).unwrap());

static ENTRY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_-]*)\s*:\s*(.+?)\s*$").unwrap());

static PLAYLIST_ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Where the widget configuration is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ConfigSource {
    #[strum(serialize = "markdown")]
    Markdown,
    #[strum(serialize = "env")]
    Env,
}

/// Configuration resolved once at startup and handed to every component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub theme: String,
    pub playlist_id: String,
    pub animated_background: bool,
}

impl FromStr for ConfigSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" | "readme" => Ok(ConfigSource::Markdown),
            "env" | "environment" => Ok(ConfigSource::Env),
            _ => Err(Error::ArgsProcessingError(format!(
                "Invalid config source: {} (expected markdown or env)",
                s
            ))),
        }
    }
}

impl WidgetConfig {
    /// Reads the configuration from the tagged comment block of a markdown document.
    ///
    /// The first `<!-- ... -->` block holding a line equal to the tag is used.
    /// Every other line in the block is read as `key: value`; lines starting
    /// with `#` are ignored.
    ///
    /// # Arguments
    /// * `md` - The markdown document
    ///
    /// # Returns
    /// The widget configuration
    ///
    /// # Errors
    /// Returns an error if the block is missing or the playlist id is missing or malformed.
    ///
    /// # Examples
    /// ```
    /// use ytcard::config::WidgetConfig;
    ///
    /// let md = "# Me\n<!--\nYT_MUSIC_CONFIG\nplaylist_id: PLabc_12-x\n-->\n";
    /// let config = WidgetConfig::from_markdown(md).unwrap();
    /// assert_eq!(config.playlist_id, "PLabc_12-x");
    /// assert_eq!(config.theme, "default.svg");
    /// assert!(config.animated_background);
    /// ```
    pub fn from_markdown(md: &str) -> Result<Self> {
        let block = COMMENT_REGEX
            .captures_iter(md)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .find(|body| TAG_REGEX.is_match(body))
            .ok_or_else(|| Error::ConfigBlockMissing {
                tag: CONFIG_TAG.to_string(),
                file: DEFAULT_README.to_string(),
            })?;

        let mut theme = None;
        let mut playlist_id = None;
        let mut animated = None;

        for line in block.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line == CONFIG_TAG {
                continue;
            }
            if let Some(caps) = ENTRY_REGEX.captures(line) {
                let value = caps[2].trim().to_string();
                match caps[1].to_lowercase().as_str() {
                    "theme" => theme = Some(value),
                    "playlist_id" => playlist_id = Some(value),
                    "animated_background" => animated = Some(value),
                    _ => {}
                }
            }
        }

        Self::build(theme, playlist_id, animated, ConfigType::MARKDOWN)
    }

    /// Reads the markdown file and extracts the configuration block.
    pub fn from_markdown_file(path: &Path) -> Result<Self> {
        let mut md = String::new();
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut md))
            .map_err(|e| Error::ConfigReadError {
                file: path.to_string_lossy().to_string(),
                cause: e.to_string(),
            })?;

        Self::from_markdown(&md).map_err(|e| match e {
            Error::ConfigBlockMissing { tag, .. } => Error::ConfigBlockMissing {
                tag,
                file: path.to_string_lossy().to_string(),
            },
            e => e,
        })
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Reads the configuration using the given variable lookup.
    ///
    /// # Examples
    /// ```
    /// use ytcard::config::WidgetConfig;
    ///
    /// let config = WidgetConfig::from_vars(|key| match key {
    ///     "YT_MUSIC_PLAYLIST_ID" => Some("PL123".to_string()),
    ///     "YT_MUSIC_ANIMATED_BG" => Some("false".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.playlist_id, "PL123");
    /// assert!(!config.animated_background);
    /// ```
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::build(
            lookup(ENV_THEME),
            lookup(ENV_PLAYLIST_ID),
            lookup(ENV_ANIMATED_BG),
            ConfigType::ENV,
        )
    }

    fn build(
        theme: Option<String>,
        playlist_id: Option<String>,
        animated: Option<String>,
        location: ConfigType,
    ) -> Result<Self> {
        let theme = theme
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_THEME.to_string());

        let playlist_id = playlist_id
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or(Error::PlaylistIdMissing { location })?;

        if !PLAYLIST_ID_REGEX.is_match(&playlist_id) {
            return Err(Error::InvalidPlaylistId(playlist_id));
        }

        Ok(WidgetConfig {
            theme,
            playlist_id,
            animated_background: animated.map_or(true, |v| parse_flag(&v)),
        })
    }
}

/// Interprets a boolean-like value. Anything that is not an explicit "off"
/// value enables the flag.
///
/// # Examples
/// ```
/// use ytcard::config::parse_flag;
///
/// assert!(parse_flag("true"));
/// assert!(parse_flag(" YES "));
/// assert!(!parse_flag("0"));
/// assert!(!parse_flag("off"));
/// ```
pub fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "false" | "0" | "no" | "off" | ""
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_markdown() {
        let md = "# Profile\n\
                  <!-- unrelated comment -->\n\
                  Some text\n\
                  <!--\n\
                  YT_MUSIC_CONFIG\n\
                  # a comment\n\
                  Theme: neon.svg\n\
                  playlist_id:   PLrpWLWlmavXBXidc7niUbK3dK39KVnugD  \n\
                  animated_background: off\n\
                  unknown_key: ignored\n\
                  -->\n";
        let config = WidgetConfig::from_markdown(md).unwrap();
        assert_eq!(config.theme, "neon.svg");
        assert_eq!(config.playlist_id, "PLrpWLWlmavXBXidc7niUbK3dK39KVnugD");
        assert!(!config.animated_background);
    }

    #[test]
    fn test_from_markdown_uses_first_tagged_block() {
        let md = "<!--\nYT_MUSIC_CONFIG\nplaylist_id: FIRST\n-->\n<!--\nYT_MUSIC_CONFIG\nplaylist_id: SECOND\n-->";
        assert_eq!(WidgetConfig::from_markdown(md).unwrap().playlist_id, "FIRST");
    }

    #[test]
    fn test_from_markdown_tag_must_be_a_whole_line() {
        let md = "<!-- see YT_MUSIC_CONFIG below\nplaylist_id: X\n-->";
        assert!(matches!(
            WidgetConfig::from_markdown(md),
            Err(Error::ConfigBlockMissing { .. })
        ));
    }

    #[test]
    fn test_from_markdown_missing_block() {
        let result = WidgetConfig::from_markdown("# Nothing here\n");
        assert!(matches!(result, Err(Error::ConfigBlockMissing { .. })));
    }

    #[test]
    fn test_from_markdown_missing_playlist() {
        let md = "<!--\nYT_MUSIC_CONFIG\ntheme: default.svg\n-->";
        assert!(matches!(
            WidgetConfig::from_markdown(md),
            Err(Error::PlaylistIdMissing { .. })
        ));
    }

    #[test]
    fn test_from_markdown_rejects_urls() {
        let md = "<!--\nYT_MUSIC_CONFIG\nplaylist_id: https://www.youtube.com/playlist?list=PL1\n-->";
        match WidgetConfig::from_markdown(md) {
            Err(Error::InvalidPlaylistId(id)) => {
                assert_eq!(id, "https://www.youtube.com/playlist?list=PL1")
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_from_markdown_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "<!--\nYT_MUSIC_CONFIG\nplaylist_id: PL_file\n-->")?;
        file.flush()?;

        let config = WidgetConfig::from_markdown_file(file.path())?;
        assert_eq!(config.playlist_id, "PL_file");

        let missing = WidgetConfig::from_markdown_file(Path::new("/definitely/not/here.md"));
        assert!(matches!(missing, Err(Error::ConfigReadError { .. })));
        Ok(())
    }

    #[test]
    fn test_from_vars() {
        let vars: HashMap<&str, &str> = [
            ("YT_MUSIC_THEME", "dark.svg"),
            ("YT_MUSIC_PLAYLIST_ID", "PL-env_1"),
        ]
        .into_iter()
        .collect();
        let config = WidgetConfig::from_vars(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(
            config,
            WidgetConfig {
                theme: "dark.svg".to_string(),
                playlist_id: "PL-env_1".to_string(),
                animated_background: true,
            }
        );
    }

    #[test]
    fn test_from_vars_errors() {
        assert!(matches!(
            WidgetConfig::from_vars(|_| None),
            Err(Error::PlaylistIdMissing { .. })
        ));
        assert!(matches!(
            WidgetConfig::from_vars(|k| (k == "YT_MUSIC_PLAYLIST_ID").then(|| "  ".to_string())),
            Err(Error::PlaylistIdMissing { .. })
        ));
        assert!(matches!(
            WidgetConfig::from_vars(|k| (k == "YT_MUSIC_PLAYLIST_ID").then(|| "PL 1".to_string())),
            Err(Error::InvalidPlaylistId(_))
        ));
    }

    #[test]
    fn test_config_source_from_str() {
        assert_eq!("markdown".parse::<ConfigSource>().unwrap(), ConfigSource::Markdown);
        assert_eq!("ENV".parse::<ConfigSource>().unwrap(), ConfigSource::Env);
        assert!("toml".parse::<ConfigSource>().is_err());
        assert_eq!(ConfigSource::Env.to_string(), "env");
    }
}
