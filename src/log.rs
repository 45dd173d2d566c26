use std::env;

use once_cell::sync::Lazy;

pub static DEBUG_ENABLED: Lazy<bool> = Lazy::new(|| {
    env::var("YTCARD_DEBUG").map_or(false, |log_level| log_level.eq("true") || log_level.eq("1"))
});

/// Builds a message that carries extra details only when debug output is enabled.
///
/// # Arguments
///
/// * `message` - The main message.
/// * `details` - Additional details appended in debug mode.
///
/// # Returns
///
/// A formatted string containing the message and, in debug mode, the details.
pub fn debug_message<M, D>(message: M, details: D) -> String
where
    M: AsRef<str>,
    D: AsRef<str>,
{
    if *DEBUG_ENABLED {
        format!("{}{}", message.as_ref(), details.as_ref())
    } else {
        message.as_ref().to_string()
    }
}

/// Logs a debug message with optional formatted arguments.
///
/// Messages are printed in yellow to stderr only when `YTCARD_DEBUG` is set
/// to `true` or `1`.
///
/// # Examples
///
/// ```
/// use ytcard::debug;
///
/// debug!("Operation completed");
/// debug!("Picked {} out of {} entries", 3, 15);
/// ```
#[macro_export]
macro_rules! debug {
    ($fmt:expr) => {
        if *$crate::log::DEBUG_ENABLED {
            eprintln!("{}", nu_ansi_term::Color::Yellow.paint(format!("{}", $fmt)));
        }
    };
    ($fmt:expr, $($arg:tt)*) => {
        if *$crate::log::DEBUG_ENABLED {
            eprintln!("{}", nu_ansi_term::Color::Yellow.paint(format!($fmt, $($arg)*)));
        }
    };
}

/// Prints a warning to stderr. Warnings are always shown.
#[macro_export]
macro_rules! warn {
    ($fmt:expr) => {
        eprintln!("{} {}", nu_ansi_term::Color::Yellow.bold().paint("[WARN]"), format!("{}", $fmt));
    };
    ($fmt:expr, $($arg:tt)*) => {
        eprintln!("{} {}", nu_ansi_term::Color::Yellow.bold().paint("[WARN]"), format!($fmt, $($arg)*));
    };
}
