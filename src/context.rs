use crate::constants::template::*;

/// Everything the renderer needs to fill a theme.
///
/// Values are plain text. Escaping for the SVG output is done by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub title: String,
    pub url: String,
    pub thumb_data_uri: String,
    pub background_data_uri: String,
    pub time_left: String,
    pub time_right: String,
    pub channel_name: String,
    pub color1: String,
    pub color2: String,
}

impl RenderContext {
    /// Retrieves the value bound to the given placeholder name (if any).
    ///
    /// Both spellings of the embedded images are accepted (`THUMB_URL` and
    /// `THUMB_DATA`, `BG_URL` and `BG_DATA`). Marquee values are computed by
    /// the renderer and are not part of the context.
    ///
    /// # Examples
    ///
    /// ```
    /// use ytcard::context::RenderContext;
    ///
    /// let ctx = RenderContext {
    ///     title: "Song".to_string(),
    ///     thumb_data_uri: "data:image/jpeg;base64,AA==".to_string(),
    ///     ..Default::default()
    /// };
    /// assert_eq!(ctx.get("TITLE"), Some("Song"));
    /// assert_eq!(ctx.get("THUMB_DATA"), ctx.get("THUMB_URL"));
    /// assert_eq!(ctx.get("MARQUEE_DUR"), None);
    /// ```
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            TITLE => &self.title,
            URL => &self.url,
            THUMB_URL | THUMB_DATA => &self.thumb_data_uri,
            BG_URL | BG_DATA => &self.background_data_uri,
            TIME_LEFT => &self.time_left,
            TIME_RIGHT => &self.time_right,
            CHANNEL_NAME => &self.channel_name,
            COLOR_1 => &self.color1,
            COLOR_2 => &self.color2,
            _ => return None,
        };
        Some(value.as_str())
    }
}
