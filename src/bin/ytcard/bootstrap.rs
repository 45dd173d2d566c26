use std::path::{Path, PathBuf};

use clap::ArgMatches;

use ytcard::{
    config::{ConfigSource, WidgetConfig},
    controller::Paths,
    debug,
    error::*,
    media::ClipGenerator,
};

#[derive(Debug)]
pub struct BootStrap {
    config: WidgetConfig,
    paths: Paths,
    clips: ClipGenerator,
}

impl BootStrap {
    /// Resolves the paths and the widget configuration from the command line.
    ///
    /// # Errors
    /// Returns an error if a path cannot be expanded or the configuration
    /// cannot be read.
    pub fn new(matches: &ArgMatches) -> Result<Self> {
        let paths = BootStrap::resolve_paths(matches)?;

        let source = matches
            .get_one::<String>("source")
            .map_or(Ok(ConfigSource::Markdown), |s| s.parse::<ConfigSource>())?;

        let mut config = match source {
            ConfigSource::Markdown => WidgetConfig::from_markdown_file(&paths.readme)?,
            ConfigSource::Env => WidgetConfig::from_env()?,
        };
        if matches.get_flag("no-animation") {
            config.animated_background = false;
        }
        debug!("Configuration ({}) : {:?}", source, config);

        let clips = ClipGenerator::new(
            BootStrap::arg_or(matches, "yt-dlp", ytcard::constants::media::DOWNLOADER),
            BootStrap::arg_or(matches, "ffmpeg", ytcard::constants::media::TRANSCODER),
        );

        Ok(BootStrap {
            config,
            paths,
            clips,
        })
    }

    /// Retrieves the paths using the following order :
    ///
    /// - The path given explicitly in the command line
    /// - The default location relative to the project root
    pub fn resolve_paths(matches: &ArgMatches) -> Result<Paths> {
        let root = expand_path(BootStrap::arg_or(matches, "root", "."))?;
        let mut paths = Paths::from_root(&root);

        if let Some(readme) = matches.get_one::<String>("readme") {
            paths.readme = expand_path(readme)?;
        }
        if let Some(themes_dir) = matches.get_one::<String>("themes-dir") {
            paths.themes_dir = expand_path(themes_dir)?;
        }
        if let Some(output) = matches.get_one::<String>("output") {
            paths.output = expand_path(output)?;
            paths.background_gif = background_next_to(&paths.output);
        }

        Ok(paths)
    }

    fn arg_or<'a>(matches: &'a ArgMatches, id: &str, default: &'a str) -> &'a str {
        matches
            .get_one::<String>(id)
            .map(|s| s.as_str())
            .unwrap_or(default)
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn clips(&self) -> ClipGenerator {
        self.clips.clone()
    }
}

/// Expands environment variables and `~` in a path argument.
fn expand_path(value: &str) -> Result<PathBuf> {
    shellexpand::full(value)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|e| Error::InterpolationError {
            location: ConfigType::ARGS,
            cause: e.to_string(),
        })
}

fn background_next_to(output: &Path) -> PathBuf {
    output
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(ytcard::constants::config::DEFAULT_BACKGROUND_GIF)
}
