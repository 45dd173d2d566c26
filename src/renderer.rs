use std::borrow::Cow;

use crate::constants::layout::*;
use crate::constants::template::{MARQUEE_DUR, MARQUEE_DX, TITLE_FLOW, TITLE_STATIC, TITLE_X2};
use crate::context::RenderContext;
use crate::debug;
use crate::string_utils::{escape_markup, estimate_text_width};
use crate::template::Template;

/// Geometry and timing of the scrolling title.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarqueeParams {
    /// X coordinate of the second copy of the title
    pub title_end_x: u32,
    /// Distance scrolled by one animation cycle
    pub scroll_distance: u32,
    /// Duration of one animation cycle (seconds)
    pub duration_seconds: f64,
}

impl MarqueeParams {
    /// Computes the marquee parameters for the given title.
    ///
    /// The scroll distance never goes below `MARQUEE_MIN_GAP` and the duration
    /// is clamped so that very short or very long titles keep a sane speed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ytcard::renderer::MarqueeParams;
    ///
    /// let params = MarqueeParams::for_title(&"W".repeat(60), 18);
    /// assert_eq!(params.scroll_distance, 847);
    /// assert_eq!(params.title_end_x, 1007);
    /// ```
    pub fn for_title(title: &str, font_size: u32) -> Self {
        let gap = (estimate_text_width(title, font_size) + MARQUEE_PADDING).max(MARQUEE_MIN_GAP);
        let duration = (gap as f64 / MARQUEE_SPEED).clamp(MARQUEE_MIN_DURATION, MARQUEE_MAX_DURATION);

        MarqueeParams {
            title_end_x: MARQUEE_BASE_X + gap,
            scroll_distance: gap,
            duration_seconds: duration,
        }
    }

    /// Formats the duration the way the theme expects it (two decimals)
    pub fn duration_label(&self) -> String {
        format!("{:.2}", self.duration_seconds)
    }
}

/// How the title is laid out in the card
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TitleLayout {
    /// The title fits in the clip box and is rendered as is
    Static,
    /// The title is too wide and scrolls
    Flow(MarqueeParams),
}

impl TitleLayout {
    /// Chooses the layout of the given title from its estimated width.
    pub fn for_title(title: &str) -> Self {
        let width = estimate_text_width(title, TITLE_FONT_SIZE);
        if width > TITLE_CLIP_WIDTH {
            debug!("Title width {} exceeds {}, using marquee", width, TITLE_CLIP_WIDTH);
            TitleLayout::Flow(MarqueeParams::for_title(title, TITLE_FONT_SIZE))
        } else {
            debug!("Title width {} fits in {}, using static text", width, TITLE_CLIP_WIDTH);
            TitleLayout::Static
        }
    }

    /// The region of the theme that must be dropped for this layout
    pub fn unused_region(&self) -> &'static str {
        match self {
            TitleLayout::Static => TITLE_FLOW,
            TitleLayout::Flow(_) => TITLE_STATIC,
        }
    }
}

pub struct SvgRenderer {}

/// SvgRenderer fills a theme with the values of a render context.
///
/// It picks the title layout, drops the region of the unused layout and
/// replaces every known placeholder with its escaped value. The renderer does
/// no I/O and never fails: broken markers are left untouched and unknown
/// placeholders are kept verbatim.
impl SvgRenderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Renders the given theme source.
    ///
    /// # Arguments
    /// * `theme` - The theme source
    /// * `ctx` - The values to insert
    ///
    /// # Returns
    /// The SVG markup
    ///
    /// # Examples
    ///
    /// ```
    /// use ytcard::context::RenderContext;
    /// use ytcard::renderer::SvgRenderer;
    ///
    /// let ctx = RenderContext { title: "hi".to_string(), ..Default::default() };
    /// let theme = "A{{TITLE}}B<!-- TITLE_FLOW_START -->scroll<!-- TITLE_FLOW_END -->";
    /// assert_eq!(SvgRenderer::new().render(theme, &ctx), "AhiB");
    /// ```
    pub fn render(&self, theme: &str, ctx: &RenderContext) -> String {
        let layout = TitleLayout::for_title(&ctx.title);
        let template = Template::parse(theme);

        let marquee = match layout {
            TitleLayout::Flow(params) => Some((
                params.title_end_x.to_string(),
                params.scroll_distance.to_string(),
                params.duration_label(),
            )),
            TitleLayout::Static => None,
        };

        template.expand(&[layout.unused_region()], |name| {
            if let Some(value) = ctx.get(name) {
                return Some(escape_markup(value));
            }
            let (x2, dx, dur) = marquee.as_ref()?;
            match name {
                TITLE_X2 => Some(Cow::Borrowed(x2.as_str())),
                MARQUEE_DX => Some(Cow::Borrowed(dx.as_str())),
                MARQUEE_DUR => Some(Cow::Borrowed(dur.as_str())),
                _ => None,
            }
        })
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THEME: &str = "<svg>\
        <a href=\"{{URL}}\"><image href=\"{{THUMB_URL}}\"/><image href=\"{{BG_DATA}}\"/></a>\
        <!-- TITLE_STATIC_START --><text>{{TITLE}}</text><!-- TITLE_STATIC_END -->\
        <!-- TITLE_FLOW_START --><g dx=\"{{MARQUEE_DX}}\" dur=\"{{MARQUEE_DUR}}s\">\
        <text>{{TITLE}}</text><text x=\"{{TITLE_X2}}\">{{TITLE}}</text></g><!-- TITLE_FLOW_END -->\
        <text>{{CHANNEL_NAME}} {{TIME_LEFT}}/{{TIME_RIGHT}}</text>\
        <stop stop-color=\"{{COLOR_1}}\"/><stop stop-color=\"{{COLOR_2}}\"/>\
        </svg>";

    fn context(title: &str) -> RenderContext {
        RenderContext {
            title: title.to_string(),
            url: "https://www.youtube.com/watch?v=abc&list=PL1".to_string(),
            thumb_data_uri: "data:image/jpeg;base64,AAAA".to_string(),
            background_data_uri: "data:image/gif;base64,BBBB".to_string(),
            time_left: "00:00".to_string(),
            time_right: "04:05".to_string(),
            channel_name: "Nujabes".to_string(),
            color1: "#102030".to_string(),
            color2: "#a0b0c0".to_string(),
        }
    }

    #[test]
    fn test_static_layout() {
        let out = SvgRenderer::new().render(THEME, &context("Short title"));

        assert!(out.contains("<!-- TITLE_STATIC_START --><text>Short title</text>"));
        assert!(!out.contains("TITLE_FLOW"));
        assert!(!out.contains("MARQUEE"));
        assert!(!out.contains("<g dx="));
        assert_eq!(out.matches("Short title").count(), 1);
    }

    #[test]
    fn test_flow_layout() {
        let title = "W".repeat(60);
        let out = SvgRenderer::new().render(THEME, &context(&title));

        assert!(!out.contains("TITLE_STATIC"));
        assert!(out.contains("<!-- TITLE_FLOW_START -->"));
        assert!(out.contains("<g dx=\"847\" dur=\"15.40s\">"));
        assert!(out.contains("<text x=\"1007\">"));
        assert_eq!(out.matches(title.as_str()).count(), 2);
    }

    #[test]
    fn test_substitutes_and_escapes_values() {
        let out = SvgRenderer::new().render(THEME, &context("Rock & <Roll>"));

        assert!(out.contains("<text>Rock &amp; &lt;Roll&gt;</text>"));
        assert!(out.contains("href=\"https://www.youtube.com/watch?v=abc&amp;list=PL1\""));
        assert!(out.contains("<image href=\"data:image/jpeg;base64,AAAA\"/>"));
        assert!(out.contains("<image href=\"data:image/gif;base64,BBBB\"/>"));
        assert!(out.contains("<text>Nujabes 00:00/04:05</text>"));
        assert!(out.contains("stop-color=\"#102030\""));
        assert!(out.contains("stop-color=\"#a0b0c0\""));
        assert!(!out.contains("{{"));
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        let out = SvgRenderer::new().render("{{TITLE}} {{SOMETHING_ELSE}}", &context("hi"));
        assert_eq!(out, "hi {{SOMETHING_ELSE}}");
    }

    #[test]
    fn test_marquee_placeholders_left_in_static_layout() {
        let out = SvgRenderer::new().render("{{MARQUEE_DUR}}", &context("hi"));
        assert_eq!(out, "{{MARQUEE_DUR}}");
    }

    #[test]
    fn test_missing_markers_are_a_noop() {
        let theme = "<!-- TITLE_FLOW_START -->{{TITLE}}";
        let out = SvgRenderer::new().render(theme, &context("hi"));
        assert_eq!(out, "<!-- TITLE_FLOW_START -->hi");
    }

    #[test]
    fn test_render_is_idempotent_without_markers() {
        let theme = "<svg>{{TITLE}}|{{URL}}|{{COLOR_1}}|{{MARQUEE_DX}}</svg>";
        let renderer = SvgRenderer::new();
        let ctx = context(&"long title ".repeat(10));
        assert_eq!(renderer.render(theme, &ctx), renderer.render(theme, &ctx));
    }

    #[test]
    fn test_layout_threshold() {
        // 20 lowercase characters : 223
        assert_eq!(TitleLayout::for_title(&"a".repeat(20)), TitleLayout::Static);
        // 40 lowercase characters : 446
        assert!(matches!(
            TitleLayout::for_title(&"a".repeat(40)),
            TitleLayout::Flow(_)
        ));
        assert_eq!(TitleLayout::Static.unused_region(), TITLE_FLOW);
        assert_eq!(
            TitleLayout::for_title(&"a".repeat(40)).unused_region(),
            TITLE_STATIC
        );
    }

    #[test]
    fn test_marquee_params_bounds() {
        // Barely scrolling title : minimum gap and duration
        let params = MarqueeParams::for_title(&"a".repeat(40), 18);
        assert_eq!(params.scroll_distance, 520);
        assert_eq!(params.title_end_x, 680);
        assert_eq!(params.duration_seconds, 10.0);
        assert_eq!(params.duration_label(), "10.00");

        // Mid range
        let params = MarqueeParams::for_title(&"W".repeat(60), 18);
        assert_eq!(params.scroll_distance, 847);
        assert_eq!(params.duration_label(), "15.40");

        // Very long title : maximum duration
        let params = MarqueeParams::for_title(&"W".repeat(300), 18);
        assert!(params.scroll_distance > 3900);
        assert_eq!(params.duration_seconds, 28.0);
        assert_eq!(params.duration_label(), "28.00");
    }

    #[test]
    fn test_marquee_params_invariants() {
        for len in [0, 1, 10, 25, 60, 120, 500] {
            for title in ["a".repeat(len), "안".repeat(len), " ".repeat(len)] {
                let params = MarqueeParams::for_title(&title, 18);
                assert!(params.scroll_distance >= 520);
                assert_eq!(params.title_end_x, 160 + params.scroll_distance);
                assert!((10.0..=28.0).contains(&params.duration_seconds));
            }
        }
    }

    #[test]
    fn test_default_theme() {
        let theme = include_str!("../themes/default.svg");
        let renderer = SvgRenderer::new();

        let out = renderer.render(theme, &context("Short title"));
        assert!(!out.contains("{{"));
        assert!(!out.contains("animateTransform"));
        assert!(out.contains("<text x=\"160\" y=\"48\">Short title</text>"));

        let out = renderer.render(theme, &context(&"W".repeat(60)));
        assert!(!out.contains("{{"));
        assert!(!out.contains("TITLE_STATIC"));
        assert!(out.contains("to=\"-847 0\" dur=\"15.40s\""));
        assert!(out.contains("<text x=\"1007\" y=\"48\">"));
    }
}
