use crate::{error::*, log};

use nu_ansi_term::Color::Yellow;

use std::path::{Path, PathBuf};

pub struct ThemeReader {}

impl ThemeReader {
    /// Reads a theme from the themes directory.
    ///
    /// # Arguments
    /// * `themes_dir` - The themes directory.
    /// * `theme_name` - The theme file name (e.g. `default.svg`).
    ///
    /// # Returns
    /// The template text of the theme.
    ///
    /// # Errors
    /// Returns an error if the theme file does not exist or cannot be read.
    ///
    /// # Examples
    /// ```
    /// use std::fs;
    /// use ytcard::reader::ThemeReader;
    ///
    /// let temp_dir = tempfile::tempdir().unwrap();
    /// fs::write(temp_dir.path().join("dark.svg"), "<svg>{{TITLE}}</svg>").unwrap();
    ///
    /// let theme = ThemeReader::read(temp_dir.path(), "dark.svg").unwrap();
    /// assert_eq!(theme, "<svg>{{TITLE}}</svg>");
    /// ```
    pub fn read(themes_dir: &Path, theme_name: &str) -> Result<String> {
        let theme_path = ThemeReader::get_theme_path(themes_dir, theme_name);
        ThemeReader::read_file(&theme_path, theme_name)
    }

    /// Retrieves the path of the theme inside the themes directory
    pub fn get_theme_path(themes_dir: &Path, theme_name: &str) -> PathBuf {
        themes_dir.join(theme_name.trim())
    }

    /// Checks that the theme exists before any network work is started.
    pub fn check(themes_dir: &Path, theme_name: &str) -> Result<PathBuf> {
        let theme_path = ThemeReader::get_theme_path(themes_dir, theme_name);
        if theme_path.is_file() {
            Ok(theme_path)
        } else {
            Err(Error::ThemeNotFound {
                file: theme_name.to_string(),
                cause: ThemeReader::path_hint("file not found", &theme_path),
            })
        }
    }

    /// Reads the theme file.
    ///
    /// # Errors
    /// `ThemeNotFound` if the file is missing, `ThemeReadError` for any other failure.
    pub fn read_file(theme_path: &Path, theme_name: &str) -> Result<String> {
        std::fs::read_to_string(theme_path).map_err(|e| {
            let cause = ThemeReader::path_hint(e.to_string(), theme_path);
            if e.kind() == ::std::io::ErrorKind::NotFound {
                Error::ThemeNotFound {
                    file: theme_name.to_string(),
                    cause,
                }
            } else {
                Error::ThemeReadError {
                    file: theme_name.to_string(),
                    cause,
                }
            }
        })
    }

    fn path_hint<M: AsRef<str>>(message: M, theme_path: &Path) -> String {
        log::debug_message(
            message,
            Yellow
                .paint(format!("\n[Theme path] {}", theme_path.to_string_lossy()))
                .to_string(),
        )
    }
}
