use std::io::Write;
use strum_macros::Display;
use thiserror::Error;

#[derive(Debug, Display)]
pub enum ConfigType {
    #[strum(serialize = "Markdown config")]
    MARKDOWN,
    #[strum(serialize = "Environment config")]
    ENV,
    #[strum(serialize = "Command line")]
    ARGS,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("error processing args. Cause : {0}")]
    ArgsProcessingError(String),
    #[error("HTTP client error: {0}")]
    ClientError(::isahc::Error),
    #[error("HTTP client error: {0}")]
    ClientHttpError(::isahc::http::Error),
    #[error("request to {url} failed with status {status}")]
    HttpStatusError { url: String, status: u16 },
    #[error("no {tag} comment block found in {file:?}. Expected :\n<!--\n{tag}\ntheme: ...\nplaylist_id: ...\n-->")]
    ConfigBlockMissing { tag: String, file: String },
    #[error("{location} does not define a playlist_id (e.g. playlist_id: PLrpWLWlmavXBXidc7niUbK3dK39KVnugD)")]
    PlaylistIdMissing { location: ConfigType },
    #[error("invalid playlist_id \"{0}\" (only the ID is expected, not the playlist URL)")]
    InvalidPlaylistId(String),
    #[error("unable to read configuration file {file:?}. Cause : {cause}")]
    ConfigReadError { file: String, cause: String },
    #[error("error expanding {location} value. Cause : {cause}")]
    InterpolationError { location: ConfigType, cause: String },
    #[error("Error executing command. Cause : {0}")]
    CommandError(String),
    #[error("command \"{program}\" did not finish within {seconds}s")]
    CommandTimeout { program: String, seconds: u64 },
    #[error("clip generation failed. Cause : {0}")]
    ClipGenerationFailed(String),
    #[error("unable to extract colors. Cause : {0}")]
    ColorExtractionError(String),
    #[error("unable to parse the playlist feed. Cause : {0}")]
    FeedParseError(String),
    #[error("failed to read the playlist feed (no entries): {0}")]
    EmptyFeed(String),
    #[error("an invalid video entry was selected. Cause : {0}")]
    InvalidEntry(String),
    #[error("JSON parsing error: {0}")]
    JsonError(String),
    #[error(transparent)]
    Io(#[from] ::std::io::Error),
    #[error("unable to open theme file {file:?}. Cause : {cause}")]
    ThemeNotFound { file: String, cause: String },
    #[error("unable to read theme file {file:?}. Cause : {cause}")]
    ThemeReadError { file: String, cause: String },
    #[error("error writing the widget. Cause : {0}")]
    WidgetWriteError(String),
    #[error("{0}")]
    Msg(String),
}

impl From<isahc::Error> for Error {
    fn from(error: isahc::Error) -> Self {
        Error::ClientError(error)
    }
}

impl From<isahc::http::Error> for Error {
    fn from(error: isahc::http::Error) -> Self {
        Error::ClientHttpError(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::JsonError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn default_error_handler(error: &Error, output: &mut dyn Write) {
    use nu_ansi_term::Color::Red;

    match error {
        Error::Io(io_error) if io_error.kind() == ::std::io::ErrorKind::BrokenPipe => {
            ::std::process::exit(0);
        }
        Error::ConfigBlockMissing { .. }
        | Error::PlaylistIdMissing { .. }
        | Error::InvalidPlaylistId(_)
        | Error::ConfigReadError { .. }
        | Error::InterpolationError { .. }
        | Error::ArgsProcessingError(_) => {
            writeln!(output, "{}: {}", Red.paint("[config error]"), error).ok();
        }
        Error::ClientError(_)
        | Error::ClientHttpError(_)
        | Error::HttpStatusError { .. }
        | Error::FeedParseError(_)
        | Error::EmptyFeed(_)
        | Error::InvalidEntry(_) => {
            writeln!(output, "{}: {}", Red.paint("[feed error]"), error).ok();
        }
        Error::ThemeNotFound { .. } | Error::ThemeReadError { .. } => {
            writeln!(output, "{}: {}", Red.paint("[template error]"), error).ok();
        }
        _ => {
            writeln!(output, "{}: {}", Red.paint("[ytcard error]"), error).ok();
        }
    };
}
