//! Scanned representation of a theme file.
//!
//! A theme is plain SVG text holding two kinds of markup:
//!
//! - placeholders, written `{{NAME}}`, replaced by values at render time
//! - removable regions, delimited by `<!-- NAME_START -->` and `<!-- NAME_END -->`
//!
//! The source is scanned once. The result keeps the byte span of every
//! placeholder and every correctly paired region, so rendering is a single
//! copy pass over the source.

use std::borrow::Cow;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::template::{MARKER_END_SUFFIX, MARKER_START_SUFFIX};
use crate::debug;

static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}|<!--\s*([A-Za-z0-9_]+)\s*-->").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub name: &'a str,
    pub span: Range<usize>,
}

/// A removable region. The span covers both markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region<'a> {
    pub name: &'a str,
    pub span: Range<usize>,
}

#[derive(Debug)]
pub struct Template<'a> {
    source: &'a str,
    placeholders: Vec<Placeholder<'a>>,
    regions: Vec<Region<'a>>,
}

impl<'a> Template<'a> {
    /// Scans the given source collecting placeholders and regions.
    ///
    /// A start marker is paired with the first end marker of the same name
    /// following it. Markers without a counterpart are kept as plain text.
    ///
    /// # Examples
    ///
    /// ```
    /// use ytcard::template::Template;
    ///
    /// let template = Template::parse("<b>{{TITLE}}</b><!-- X_START -->x<!-- X_END -->");
    /// assert!(template.has_placeholder("TITLE"));
    /// assert!(template.region("X").is_some());
    /// assert!(template.region("Y").is_none());
    /// ```
    pub fn parse(source: &'a str) -> Self {
        let mut placeholders = Vec::new();
        let mut regions: Vec<Region<'a>> = Vec::new();
        // Start markers waiting for their end marker: (name, start offset)
        let mut open: Vec<(&'a str, usize)> = Vec::new();

        for caps in TOKEN_REGEX.captures_iter(source) {
            let whole = caps.get(0).unwrap();
            if let Some(name) = caps.get(1) {
                placeholders.push(Placeholder {
                    name: name.as_str(),
                    span: whole.range(),
                });
                continue;
            }

            let marker = caps.get(2).map_or("", |m| m.as_str());
            if let Some(name) = marker.strip_suffix(MARKER_START_SUFFIX) {
                // Only the first start marker of a name opens the region
                if !open.iter().any(|(n, _)| *n == name) {
                    open.push((name, whole.start()));
                }
            } else if let Some(name) = marker.strip_suffix(MARKER_END_SUFFIX) {
                match open.iter().position(|(n, _)| *n == name) {
                    Some(idx) => {
                        let (name, start) = open.remove(idx);
                        regions.push(Region {
                            name,
                            span: start..whole.end(),
                        });
                    }
                    None => debug!("Ignoring end marker without start : {}", marker),
                }
            }
        }

        for (name, _) in &open {
            debug!("Ignoring start marker without end : {}{}", name, MARKER_START_SUFFIX);
        }

        regions.sort_by_key(|r| r.span.start);

        Template {
            source,
            placeholders,
            regions,
        }
    }

    pub fn placeholders(&self) -> &[Placeholder<'a>] {
        &self.placeholders
    }

    pub fn regions(&self) -> &[Region<'a>] {
        &self.regions
    }

    pub fn has_placeholder(&self, name: &str) -> bool {
        self.placeholders.iter().any(|p| p.name == name)
    }

    /// Retrieves the first complete region with the given name (if any)
    pub fn region(&self, name: &str) -> Option<&Region<'a>> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Produces the output text, dropping the named regions (markers included)
    /// and replacing placeholders with the value returned by `resolve`.
    ///
    /// Placeholders for which `resolve` returns `None` are kept verbatim.
    ///
    /// # Arguments
    /// * `removed` - The names of the regions to drop
    /// * `resolve` - Provides the replacement text of a placeholder
    ///
    /// # Examples
    ///
    /// ```
    /// use std::borrow::Cow;
    /// use ytcard::template::Template;
    ///
    /// let template = Template::parse("A{{N}}B<!-- X_START -->drop<!-- X_END -->{{M}}");
    /// let out = template.expand(&["X"], |name| match name {
    ///     "N" => Some(Cow::Borrowed("1")),
    ///     _ => None,
    /// });
    /// assert_eq!(out, "A1B{{M}}");
    /// ```
    pub fn expand<'v, F>(&self, removed: &[&str], resolve: F) -> String
    where
        F: Fn(&str) -> Option<Cow<'v, str>>,
    {
        let cuts: Vec<&Range<usize>> = self
            .regions
            .iter()
            .filter(|r| removed.contains(&r.name))
            .map(|r| &r.span)
            .collect();

        let mut output = String::with_capacity(self.source.len());
        let mut cursor = 0;
        let mut cuts_iter = cuts.iter().peekable();
        let mut placeholders = self.placeholders.iter().peekable();

        loop {
            let next_cut = cuts_iter.peek().map(|c| c.start);
            let next_placeholder = placeholders.peek().map(|p| p.span.start);

            match (next_cut, next_placeholder) {
                (None, None) => break,
                (Some(cut_start), p) if p.map_or(true, |p| cut_start <= p) => {
                    let cut = cuts_iter.next().unwrap();
                    if cut.start >= cursor {
                        output.push_str(&self.source[cursor..cut.start]);
                    }
                    cursor = cursor.max(cut.end);
                }
                (_, Some(_)) => {
                    let placeholder = placeholders.next().unwrap();
                    if placeholder.span.start < cursor {
                        // Inside a removed region
                        continue;
                    }
                    output.push_str(&self.source[cursor..placeholder.span.start]);
                    match resolve(placeholder.name) {
                        Some(value) => output.push_str(&value),
                        None => {
                            debug!("Unresolved placeholder left as is : {}", placeholder.name);
                            output.push_str(&self.source[placeholder.span.clone()]);
                        }
                    }
                    cursor = placeholder.span.end;
                }
                (Some(_), None) => unreachable!(),
            }
        }

        output.push_str(&self.source[cursor..]);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower(name: &str) -> Option<Cow<'static, str>> {
        Some(Cow::Owned(name.to_lowercase()))
    }

    #[test]
    fn test_parse_placeholders() {
        let template = Template::parse("{{A}} and {{B_2}} and {{A}} but not {{ c }} or {{}}");
        let names: Vec<&str> = template.placeholders().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["A", "B_2", "A"]);
        assert_eq!(template.placeholders()[0].span, 0..5);
    }

    #[test]
    fn test_parse_regions() {
        let src = "a<!-- ONE_START -->b<!-- ONE_END -->c<!--TWO_START-->d<!--   TWO_END -->";
        let template = Template::parse(src);
        assert_eq!(template.regions().len(), 2);

        let one = template.region("ONE").unwrap();
        assert_eq!(&src[one.span.clone()], "<!-- ONE_START -->b<!-- ONE_END -->");
        let two = template.region("TWO").unwrap();
        assert_eq!(&src[two.span.clone()], "<!--TWO_START-->d<!--   TWO_END -->");
    }

    #[test]
    fn test_unpaired_markers_are_ignored() {
        let template = Template::parse("<!-- A_START -->x<!-- B_END -->y");
        assert!(template.regions().is_empty());
        assert_eq!(template.expand(&["A", "B"], lower), "<!-- A_START -->x<!-- B_END -->y");

        // End before start does not pair
        let template = Template::parse("<!-- A_END -->x<!-- A_START -->");
        assert!(template.region("A").is_none());
    }

    #[test]
    fn test_expand_removes_regions_with_markers() {
        let template = Template::parse("1<!-- A_START -->{{X}}<!-- A_END -->2<!-- B_START -->{{Y}}<!-- B_END -->3");
        assert_eq!(
            template.expand(&["A"], lower),
            "12<!-- B_START -->y<!-- B_END -->3"
        );
        assert_eq!(
            template.expand(&["B"], lower),
            "1<!-- A_START -->x<!-- A_END -->23"
        );
        assert_eq!(template.expand(&["A", "B"], lower), "123");
    }

    #[test]
    fn test_expand_nested_regions() {
        let template =
            Template::parse("<!-- OUT_START -->a<!-- IN_START -->{{X}}<!-- IN_END -->b<!-- OUT_END -->c");
        assert_eq!(template.expand(&["OUT", "IN"], lower), "c");
        assert_eq!(template.expand(&["OUT"], lower), "c");
        assert_eq!(
            template.expand(&["IN"], lower),
            "<!-- OUT_START -->ab<!-- OUT_END -->c"
        );
    }

    #[test]
    fn test_expand_keeps_unresolved_placeholders() {
        let template = Template::parse("{{KNOWN}}-{{UNKNOWN}}");
        let out = template.expand(&[], |name| match name {
            "KNOWN" => Some(Cow::Borrowed("ok")),
            _ => None,
        });
        assert_eq!(out, "ok-{{UNKNOWN}}");
    }

    #[test]
    fn test_expand_does_not_rescan_values() {
        let template = Template::parse("{{A}}{{B}}");
        let out = template.expand(&[], |name| match name {
            "A" => Some(Cow::Borrowed("{{B}}")),
            "B" => Some(Cow::Borrowed("b")),
            _ => None,
        });
        assert_eq!(out, "{{B}}b");
    }

    #[test]
    fn test_expand_without_tokens() {
        let template = Template::parse("<svg></svg>");
        assert_eq!(template.expand(&["A"], lower), "<svg></svg>");
        assert_eq!(Template::parse("").expand(&[], lower), "");
    }
}
