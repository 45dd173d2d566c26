use rand::seq::SliceRandom;
use roxmltree::{Document, Node};

use crate::constants::youtube::*;
use crate::debug;
use crate::error::*;
use crate::fetcher::HttpFetcher;

const YT_NAMESPACE: &str = "http://www.youtube.com/xml/schemas/2015";

/// A video of the playlist, normalized from the feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEntry {
    pub video_id: String,
    pub channel_name: String,
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
}

/// Raw fields of a feed entry. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub video_id: Option<String>,
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub authors: Vec<String>,
}

impl TryFrom<&FeedEntry> for VideoEntry {
    type Error = Error;

    /// Normalizes a raw entry. The video id comes from `yt:videoId` or, when
    /// absent, from the last segment of the entry id (`yt:video:<id>`).
    fn try_from(entry: &FeedEntry) -> Result<Self> {
        let video_id = entry
            .video_id
            .clone()
            .or_else(|| {
                entry
                    .id
                    .as_deref()
                    .and_then(|id| id.rsplit(':').next())
                    .map(str::to_string)
            })
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::InvalidEntry("missing video id".to_string()))?;

        let title = entry
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::InvalidEntry(format!("missing title for video {}", video_id)))?;

        let url = entry
            .link
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::InvalidEntry(format!("missing link for video {}", video_id)))?;

        let channel_name = entry
            .authors
            .iter()
            .find(|a| !a.is_empty())
            .cloned()
            .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string());

        Ok(VideoEntry {
            thumbnail_url: thumbnail_url(&video_id),
            video_id,
            channel_name,
            title,
            url,
        })
    }
}

/// Parses an Atom playlist feed into its raw entries.
///
/// # Arguments
/// * `xml` - The feed document
///
/// # Returns
/// The entries in document order
///
/// # Errors
/// Returns an error if the document is not well formed XML.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let doc = Document::parse(xml).map_err(|e| Error::FeedParseError(e.to_string()))?;

    let entries = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "entry")
        .map(|entry| FeedEntry {
            video_id: child_text(entry, |n| {
                n.tag_name().name() == "videoId" && n.tag_name().namespace() == Some(YT_NAMESPACE)
            }),
            id: child_text(entry, |n| n.tag_name().name() == "id"),
            title: child_text(entry, |n| n.tag_name().name() == "title"),
            link: entry_link(entry),
            authors: entry
                .children()
                .filter(|n| n.is_element() && n.tag_name().name() == "author")
                .filter_map(|author| child_text(author, |n| n.tag_name().name() == "name"))
                .collect(),
        })
        .collect();

    Ok(entries)
}

/// Retrieves the trimmed text of the first child element matching the predicate
fn child_text<P>(node: Node, predicate: P) -> Option<String>
where
    P: Fn(&Node) -> bool,
{
    node.children()
        .filter(|n| n.is_element())
        .find(|n| predicate(n))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
}

/// Prefers the `alternate` link, falling back to the first link of the entry
fn entry_link(entry: Node) -> Option<String> {
    let links: Vec<Node> = entry
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "link")
        .collect();

    links
        .iter()
        .find(|n| n.attribute("rel") == Some("alternate"))
        .or_else(|| links.first())
        .and_then(|n| n.attribute("href"))
        .map(|href| href.trim().to_string())
}

/// Builds the feed URL of a playlist.
///
/// # Examples
/// ```
/// use ytcard::feed::feed_url;
///
/// assert_eq!(
///     feed_url("https://www.youtube.com/feeds/videos.xml", "PL123").unwrap(),
///     "https://www.youtube.com/feeds/videos.xml?playlist_id=PL123"
/// );
/// ```
pub fn feed_url(base_url: &str, playlist_id: &str) -> Result<String> {
    url::Url::parse_with_params(base_url, &[("playlist_id", playlist_id)])
        .map(|u| u.to_string())
        .map_err(|e| Error::Msg(format!("invalid feed URL {}: {}", base_url, e)))
}

/// Reads playlist feeds over HTTP.
pub struct FeedClient {
    fetcher: HttpFetcher,
    base_url: String,
}

impl FeedClient {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self::with_base_url(fetcher, FEED_URL)
    }

    /// Creates a client reading feeds from another endpoint
    pub fn with_base_url<S: Into<String>>(fetcher: HttpFetcher, base_url: S) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// Downloads and parses the feed of the given playlist.
    ///
    /// # Errors
    /// Returns an error if the request fails, the server answers with a non 2xx
    /// status, the document cannot be parsed or it holds no entries.
    pub fn fetch_playlist_entries(&self, playlist_id: &str) -> Result<Vec<FeedEntry>> {
        let url = feed_url(&self.base_url, playlist_id)?;
        debug!("Fetching playlist feed {}", url);

        let response = self.fetcher.get(&url, FEED_ACCEPT)?;
        let xml = String::from_utf8_lossy(&response.body);
        let entries = parse_feed(&xml)?;
        if entries.is_empty() {
            return Err(Error::EmptyFeed(url));
        }

        debug!("Playlist feed holds {} entries", entries.len());
        Ok(entries)
    }

    /// Picks a random video of the playlist.
    pub fn pick_random_entry(&self, playlist_id: &str) -> Result<VideoEntry> {
        let entries = self.fetch_playlist_entries(playlist_id)?;
        let entry = entries
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| Error::EmptyFeed(playlist_id.to_string()))?;
        VideoEntry::try_from(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::tests::serve_once;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
 <id>yt:playlist:PL123</id>
 <title>Chill</title>
 <author><name>Playlist Owner</name></author>
 <entry>
  <id>yt:video:AAAAAAAAAAA</id>
  <yt:videoId>AAAAAAAAAAA</yt:videoId>
  <title> Aruarian Dance </title>
  <link rel="alternate" href="https://www.youtube.com/watch?v=AAAAAAAAAAA"/>
  <author>
   <name>Nujabes</name>
   <uri>https://www.youtube.com/channel/UC1</uri>
  </author>
 </entry>
 <entry>
  <id>yt:video:BBBBBBBBBBB</id>
  <title>Feather &amp; Friends</title>
  <link href="https://www.youtube.com/watch?v=BBBBBBBBBBB"/>
 </entry>
</feed>"#;

    #[test]
    fn test_parse_feed() {
        let entries = parse_feed(FEED).unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(
            entries[0],
            FeedEntry {
                video_id: Some("AAAAAAAAAAA".to_string()),
                id: Some("yt:video:AAAAAAAAAAA".to_string()),
                title: Some("Aruarian Dance".to_string()),
                link: Some("https://www.youtube.com/watch?v=AAAAAAAAAAA".to_string()),
                authors: vec!["Nujabes".to_string()],
            }
        );
        assert_eq!(entries[1].video_id, None);
        assert_eq!(entries[1].title.as_deref(), Some("Feather & Friends"));
        assert!(entries[1].authors.is_empty());
    }

    #[test]
    fn test_parse_feed_errors() {
        assert!(matches!(parse_feed("<feed"), Err(Error::FeedParseError(_))));
        assert!(parse_feed("<feed xmlns=\"http://www.w3.org/2005/Atom\"></feed>")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_video_entry_from_feed_entry() {
        let entries = parse_feed(FEED).unwrap();

        let first = VideoEntry::try_from(&entries[0]).unwrap();
        assert_eq!(first.video_id, "AAAAAAAAAAA");
        assert_eq!(first.channel_name, "Nujabes");
        assert_eq!(
            first.thumbnail_url,
            "https://i.ytimg.com/vi/AAAAAAAAAAA/hqdefault.jpg"
        );

        // Id taken from the entry id, unknown author
        let second = VideoEntry::try_from(&entries[1]).unwrap();
        assert_eq!(second.video_id, "BBBBBBBBBBB");
        assert_eq!(second.channel_name, "Unknown");
        assert_eq!(second.url, "https://www.youtube.com/watch?v=BBBBBBBBBBB");
    }

    #[test]
    fn test_video_entry_uses_first_named_author() {
        let entry = FeedEntry {
            id: Some("yt:video:CCC".to_string()),
            title: Some("t".to_string()),
            link: Some("l".to_string()),
            authors: vec!["".to_string(), "Second".to_string()],
            ..Default::default()
        };
        assert_eq!(VideoEntry::try_from(&entry).unwrap().channel_name, "Second");
    }

    #[test]
    fn test_video_entry_missing_fields() {
        let complete = FeedEntry {
            video_id: Some("X".to_string()),
            title: Some("t".to_string()),
            link: Some("l".to_string()),
            ..Default::default()
        };
        assert!(VideoEntry::try_from(&complete).is_ok());

        for broken in [
            FeedEntry { video_id: None, ..complete.clone() },
            FeedEntry { title: None, ..complete.clone() },
            FeedEntry { link: Some(String::new()), ..complete.clone() },
        ] {
            assert!(matches!(
                VideoEntry::try_from(&broken),
                Err(Error::InvalidEntry(_))
            ));
        }
    }

    #[test]
    fn test_feed_url_encodes_id() {
        assert_eq!(
            feed_url(FEED_URL, "PL_a-b").unwrap(),
            "https://www.youtube.com/feeds/videos.xml?playlist_id=PL_a-b"
        );
        assert!(feed_url("not a url", "PL").is_err());
    }

    #[test]
    fn test_pick_random_entry_from_server() {
        let base = serve_once("200 OK", "application/atom+xml", FEED.as_bytes().to_vec());
        let client = FeedClient::with_base_url(HttpFetcher::default(), base);

        let entry = client.pick_random_entry("PL123").unwrap();
        assert!(entry.video_id == "AAAAAAAAAAA" || entry.video_id == "BBBBBBBBBBB");
        assert!(entry.url.ends_with(&entry.video_id));
    }

    #[test]
    fn test_empty_feed_is_fatal() {
        let empty = "<feed xmlns=\"http://www.w3.org/2005/Atom\"><title>x</title></feed>";
        let base = serve_once("200 OK", "application/atom+xml", empty.as_bytes().to_vec());
        let client = FeedClient::with_base_url(HttpFetcher::default(), base);

        assert!(matches!(
            client.pick_random_entry("PL123"),
            Err(Error::EmptyFeed(_))
        ));
    }

    #[test]
    fn test_server_error_is_fatal() {
        let base = serve_once("500 Internal Server Error", "text/plain", b"boom".to_vec());
        let client = FeedClient::with_base_url(HttpFetcher::default(), base);

        match client.pick_random_entry("PL123") {
            Err(Error::HttpStatusError { status, .. }) => assert_eq!(status, 500),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
