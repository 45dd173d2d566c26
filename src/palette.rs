use color_thief::ColorFormat;

use crate::constants::palette::*;
use crate::debug;
use crate::error::*;
use crate::fallback::Degradable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Squared euclidean distance between two colors
    ///
    /// # Examples
    /// ```
    /// use ytcard::palette::Rgb;
    ///
    /// assert_eq!(Rgb(0, 0, 0).distance_sq(&Rgb(0, 0, 30)), 900);
    /// ```
    pub fn distance_sq(&self, other: &Rgb) -> u32 {
        let dr = self.0 as i32 - other.0 as i32;
        let dg = self.1 as i32 - other.1 as i32;
        let db = self.2 as i32 - other.2 as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// The two accent colors of the card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccentColors {
    pub primary: String,
    pub secondary: String,
}

impl AccentColors {
    /// Black on black, used when no palette can be extracted
    pub fn fallback() -> Self {
        AccentColors {
            primary: FALLBACK_COLOR.to_string(),
            secondary: FALLBACK_COLOR.to_string(),
        }
    }
}

/// Picks the accent colors out of a ranked palette.
///
/// The primary color is the dominant one. The secondary color is the first
/// following entry far enough from it, or the primary color itself when every
/// entry is too close.
///
/// # Examples
/// ```
/// use ytcard::palette::{pick_accents, Rgb};
///
/// let accents = pick_accents(&[Rgb(0, 0, 0), Rgb(0, 0, 10), Rgb(255, 0, 0)]).unwrap();
/// assert_eq!(accents.primary, "#000000");
/// assert_eq!(accents.secondary, "#ff0000");
/// ```
pub fn pick_accents(palette: &[Rgb]) -> Option<AccentColors> {
    let primary = palette.first()?;
    let secondary = palette
        .iter()
        .skip(1)
        .find(|c| c.distance_sq(primary) >= MIN_ACCENT_DISTANCE)
        .unwrap_or(primary);

    Some(AccentColors {
        primary: primary.hex(),
        secondary: secondary.hex(),
    })
}

/// Computes the ranked palette of an encoded image.
///
/// # Errors
/// Returns an error if the image cannot be decoded or quantized.
pub fn extract_palette(image_bytes: &[u8]) -> Result<Vec<Rgb>> {
    let image = image::load_from_memory(image_bytes)
        .map_err(|e| Error::ColorExtractionError(e.to_string()))?
        .to_rgb8();

    let palette = color_thief::get_palette(image.as_raw(), ColorFormat::Rgb, QUALITY, MAX_COLORS)
        .map_err(|e| Error::ColorExtractionError(format!("{:?}", e)))?;

    Ok(palette.iter().map(|c| Rgb(c.r, c.g, c.b)).collect())
}

/// Extracts the accent colors of an encoded image.
///
/// Accents are cosmetic: any failure yields black on black along with the cause.
pub fn extract_colors(image_bytes: &[u8]) -> Degradable<AccentColors> {
    let result = extract_palette(image_bytes).and_then(|palette| {
        debug!("Extracted palette : {:?}", palette);
        pick_accents(&palette)
            .ok_or_else(|| Error::ColorExtractionError("empty palette".to_string()))
    });
    Degradable::or_else(result, AccentColors::fallback)
}
