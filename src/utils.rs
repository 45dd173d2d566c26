use chrono::{DateTime, Local};
use std::process::Command;

/// Format of the label shown instead of the video duration
pub const DATE_LABEL_FORMAT: &str = "%m:%d";

/// Formats a number of seconds as `mm:ss`. Minutes are not wrapped at 60.
///
/// # Examples
///
/// ```
/// use ytcard::utils::format_mmss;
///
/// assert_eq!(format_mmss(0), "00:00");
/// assert_eq!(format_mmss(215), "03:35");
/// assert_eq!(format_mmss(3725), "62:05");
/// ```
pub fn format_mmss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Formats the given date as the fallback time label (`month:day`).
pub fn date_label(dt: &DateTime<Local>) -> String {
    dt.format(DATE_LABEL_FORMAT).to_string()
}

/// Today's date as the fallback time label.
pub fn today_label() -> String {
    date_label(&Local::now())
}

/// Checks if a command exists and is executable.
///
/// # Arguments
/// * `cmd` - The command to check
///
/// # Returns
/// `true` if the command exists and is executable, `false` otherwise
pub fn command_exists(cmd: &str) -> bool {
    if cmd.trim().is_empty() {
        return false;
    }

    let locator = if cfg!(target_os = "windows") {
        "where"
    } else {
        "which"
    };

    Command::new(locator)
        .arg(cmd)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
