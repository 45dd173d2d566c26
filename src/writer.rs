use std::{fs::create_dir_all, path::Path};

use crate::{debug, error::*};

pub struct WidgetWriter {}

impl WidgetWriter {
    /// Creates the directory holding the given file if needed.
    pub fn ensure_parent_dir(file_path: &Path) -> Result<()> {
        match file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                create_dir_all(parent).map_err(|e| {
                    Error::WidgetWriteError(format!(
                        "Cannot create directory {} -> {}",
                        parent.to_string_lossy(),
                        e
                    ))
                })
            }
            _ => Ok(()),
        }
    }

    /// Writes the rendered widget, replacing any previous version.
    ///
    /// # Examples
    /// ```
    /// use ytcard::writer::WidgetWriter;
    ///
    /// let temp_dir = tempfile::tempdir().unwrap();
    /// let output = temp_dir.path().join("dist").join("widget.svg");
    ///
    /// WidgetWriter::write(&output, "<svg/>").unwrap();
    /// assert_eq!(std::fs::read_to_string(&output).unwrap(), "<svg/>");
    /// ```
    pub fn write(file_path: &Path, svg: &str) -> Result<()> {
        WidgetWriter::ensure_parent_dir(file_path)?;
        std::fs::write(file_path, svg).map_err(|e| {
            Error::WidgetWriteError(format!(
                "Cannot write file {} -> {}",
                file_path.to_string_lossy(),
                e
            ))
        })?;
        debug!("Wrote {} bytes to {}", svg.len(), file_path.to_string_lossy());
        Ok(())
    }
}
