//! RSS payload decoding.
//!
//! Entries are taken from the `item` children of every `channel` child of
//! the document root. Each item yields exactly one [`Entry`]; missing
//! sub-elements become empty text. Text is kept verbatim (entities and
//! CDATA are resolved, nothing is trimmed or reformatted).

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{NewsError, Result};
use crate::news::types::Entry;

/// Decode an RSS payload into entries.
///
/// Returns an error if the payload is not UTF-8 or not well-formed XML.
/// A well-formed document without `channel` or `item` elements yields no
/// entries.
pub fn parse_entries(bytes: &[u8]) -> Result<Vec<Entry>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| NewsError::Parse(format!("payload is not valid UTF-8: {}", e)))?;

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options)
        .map_err(|e| NewsError::Parse(format!("malformed XML: {}", e)))?;

    let entries = doc
        .root_element()
        .children()
        .filter(|node| is_element(node, "channel"))
        .flat_map(|channel| channel.children().filter(|node| is_element(node, "item")))
        .map(|item| Entry {
            title: child_text(&item, "title"),
            description: child_text(&item, "description"),
            link: child_text(&item, "link"),
            pub_date: child_text(&item, "pubDate"),
        })
        .collect();

    Ok(entries)
}

fn is_element(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

/// Text of the first child element named `name`.
///
/// Un-namespaced elements win over namespaced ones, so `<atom:link/>` next
/// to `<link>` does not shadow the RSS link.
fn child_text(item: &Node<'_, '_>, name: &str) -> String {
    let found = item
        .children()
        .find(|node| is_element(node, name) && node.tag_name().namespace().is_none())
        .or_else(|| item.children().find(|node| is_element(node, name)));

    match found {
        Some(node) => node
            .children()
            .filter(|child| child.is_text())
            .filter_map(|child| child.text())
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUR_ITEMS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example</title>
    <item>
      <title>First</title>
      <description>One</description>
      <link>https://example.com/1</link>
      <pubDate>Mon, 06 Jan 2025 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Second</title>
      <description>Two</description>
      <link>https://example.com/2</link>
      <pubDate>Tue, 07 Jan 2025 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Third</title>
      <description>Three</description>
      <link>https://example.com/3</link>
      <pubDate>Wed, 08 Jan 2025 10:00:00 GMT</pubDate>
    </item>
    <item>
      <description>No title here</description>
      <link>https://example.com/4</link>
      <pubDate>Thu, 09 Jan 2025 10:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_items_with_missing_title() {
        let entries = parse_entries(FOUR_ITEMS.as_bytes()).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].title, "First");
        assert_eq!(entries[0].description, "One");
        assert_eq!(entries[0].link, "https://example.com/1");
        assert_eq!(entries[0].pub_date, "Mon, 06 Jan 2025 10:00:00 GMT");
        assert_eq!(entries[3].title, "");
        assert_eq!(entries[3].description, "No title here");
    }

    #[test]
    fn test_parse_empty_item() {
        let rss = "<rss><channel><item></item></channel></rss>";
        let entries = parse_entries(rss.as_bytes()).unwrap();
        assert_eq!(entries, vec![Entry::default()]);
    }

    #[test]
    fn test_parse_keeps_date_text_verbatim() {
        let rss = "<rss><channel><item><pubDate>2025-01-06</pubDate></item>\
                   <item><pubDate>yesterday-ish</pubDate></item></channel></rss>";
        let entries = parse_entries(rss.as_bytes()).unwrap();
        assert_eq!(entries[0].pub_date, "2025-01-06");
        assert_eq!(entries[1].pub_date, "yesterday-ish");
    }

    #[test]
    fn test_parse_cdata_and_entities() {
        let rss = r#"<rss><channel><item>
            <title>Fish &amp; Chips</title>
            <description><![CDATA[<p>Hot</p>]]></description>
        </item></channel></rss>"#;
        let entries = parse_entries(rss.as_bytes()).unwrap();
        assert_eq!(entries[0].title, "Fish & Chips");
        assert_eq!(entries[0].description, "<p>Hot</p>");
    }

    #[test]
    fn test_parse_prefers_plain_link_over_atom_link() {
        let rss = r#"<rss xmlns:atom="http://www.w3.org/2005/Atom"><channel><item>
            <atom:link href="https://example.com/self" rel="self"/>
            <link>https://example.com/article</link>
        </item></channel></rss>"#;
        let entries = parse_entries(rss.as_bytes()).unwrap();
        assert_eq!(entries[0].link, "https://example.com/article");
    }

    #[test]
    fn test_parse_without_channel_yields_nothing() {
        let xml = "<html><body><p>not a feed</p></body></html>";
        assert!(parse_entries(xml.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_items_outside_channel_are_ignored() {
        let xml = "<rss><item><title>stray</title></item><channel/></rss>";
        assert!(parse_entries(xml.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_xml() {
        let result = parse_entries(b"<rss><channel><item><title>oops</channel>");
        assert!(matches!(result, Err(NewsError::Parse(_))));
    }

    #[test]
    fn test_parse_not_xml() {
        assert!(parse_entries(b"This is not XML").is_err());
    }

    #[test]
    fn test_parse_invalid_utf8() {
        let result = parse_entries(&[0x3c, 0x72, 0xff, 0xfe]);
        assert!(result.unwrap_err().to_string().contains("UTF-8"));
    }

    #[test]
    fn test_parse_with_doctype() {
        let rss = r#"<?xml version="1.0"?>
<!DOCTYPE rss PUBLIC "-//Netscape Communications//DTD RSS 0.91//EN" "http://my.netscape.com/publish/formats/rss-0.91.dtd">
<rss version="0.91"><channel><item><title>Old</title></item></channel></rss>"#;
        let entries = parse_entries(rss.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Old");
    }
}
