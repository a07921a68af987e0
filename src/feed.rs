//! Support for creating an Atom feed from a list of posts.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;

use atom_syndication::{Entry, Error as AtomError, Feed, Link, Person};
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
};
use url::Url;

use crate::config::Author;
use crate::post::Post;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    /// The title of the feed, typically the site title.
    pub title: String,

    /// The author credited on the feed and on every entry.
    pub author: Option<Author>,

    /// The base URL of the published site. Entry links are resolved
    /// against it, since posts only carry site-relative URLs.
    pub site_root: Url,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// [`Post`]s and writes the result to a [`std::io::Write`]. This function
/// takes ownership of the provided [`FeedConfig`].
pub fn write_feed<W: Write>(config: FeedConfig, posts: &[Post], w: W) -> Result<()> {
    feed(config, posts)?.write_to(w)?;
    Ok(())
}

fn feed(config: FeedConfig, posts: &[Post]) -> Result<Feed> {
    // The feed's `updated` element reflects the content rather than the
    // build time, so rebuilding an unchanged site yields an identical feed.
    let updated = posts
        .iter()
        .map(|post| post.date)
        .max()
        .unwrap_or_else(|| NaiveDate::from_ymd(1970, 1, 1));

    Ok(Feed {
        entries: feed_entries(&config, posts)?,
        title: config.title,
        id: config.site_root.to_string(),
        updated: midnight_utc(updated),
        authors: author_to_people(config.author),
        categories: Vec::new(),
        contributors: Vec::new(),
        generator: None,
        icon: None,
        logo: None,
        rights: None,
        subtitle: None,
        extensions: HashMap::new(),
        namespaces: HashMap::new(),
        links: vec![Link {
            href: config.site_root.to_string(),
            rel: "alternate".to_string(),
            title: None,
            hreflang: None,
            mime_type: None,
            length: None,
        }],
    })
}

fn feed_entries(config: &FeedConfig, posts: &[Post]) -> Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = Vec::with_capacity(posts.len());

    for post in posts {
        let url = config.site_root.join(&post.relative_url)?;
        let date = midnight_utc(post.date);

        entries.push(Entry {
            id: url.to_string(),
            title: post.title.clone(),
            updated: date,
            authors: author_to_people(config.author.clone()),
            links: vec![Link {
                href: url.to_string(),
                rel: "alternate".to_owned(),
                title: None,
                mime_type: None,
                hreflang: None,
                length: None,
            }],
            rights: None,
            summary: None,
            categories: Vec::new(),
            contributors: Vec::new(),
            published: Some(date),
            source: None,
            content: None,
            extensions: HashMap::new(),
        })
    }
    Ok(entries)
}

// Posts carry a date but no time of day; entries publish at midnight UTC.
fn midnight_utc(date: NaiveDate) -> DateTime<FixedOffset> {
    FixedOffset::east(0)
        .from_utc_datetime(&NaiveDateTime::new(date, NaiveTime::from_hms(0, 0, 0)))
}

fn author_to_people(author: Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![Person {
            name: author.name,
            email: author.email,
            uri: None,
        }],
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O, Atom, and
/// URL-resolution issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when a post's URL cannot be resolved against the site
    /// root.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator when resolving entry links.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::*;

    fn post(title: &str, relative_url: &str, date: NaiveDate) -> Post {
        Post {
            title: title.to_owned(),
            date,
            relative_url: relative_url.to_owned(),
            file_path: PathBuf::from("unused/index.html"),
            body: String::new(),
        }
    }

    fn config() -> FeedConfig {
        FeedConfig {
            title: "Example Blog".to_owned(),
            author: Some(Author {
                name: "Jane Doe".to_owned(),
                email: None,
            }),
            site_root: Url::parse("https://example.org/").unwrap(),
        }
    }

    #[test]
    fn test_feed_entries_resolve_links() -> Result<()> {
        let posts = vec![
            post(
                "How to enforce exclusive time ranges in PostgreSQL",
                "/2023/01/15/postgresql-exclusive-ranges",
                NaiveDate::from_ymd(2023, 1, 15),
            ),
            post(
                "Hello, world!",
                "/2021/04/16/hello-world",
                NaiveDate::from_ymd(2021, 4, 16),
            ),
        ];

        let feed = feed(config(), &posts)?;
        assert_eq!(2, feed.entries.len());
        assert_eq!(
            "https://example.org/2023/01/15/postgresql-exclusive-ranges",
            feed.entries[0].id
        );
        assert_eq!(
            "https://example.org/2023/01/15/postgresql-exclusive-ranges",
            feed.entries[0].links[0].href
        );
        assert_eq!(
            "How to enforce exclusive time ranges in PostgreSQL",
            feed.entries[0].title
        );
        assert_eq!(
            "2023-01-15T00:00:00+00:00",
            feed.entries[0].updated.to_rfc3339()
        );
        assert_eq!("Jane Doe", feed.entries[0].authors[0].name);
        Ok(())
    }

    #[test]
    fn test_feed_updated_tracks_newest_post() -> Result<()> {
        let posts = vec![post(
            "Hello, world!",
            "/2021/04/16/hello-world",
            NaiveDate::from_ymd(2021, 4, 16),
        )];

        let feed = feed(config(), &posts)?;
        assert_eq!("2021-04-16T00:00:00+00:00", feed.updated.to_rfc3339());
        Ok(())
    }

    #[test]
    fn test_empty_feed() -> Result<()> {
        let feed = feed(config(), &[])?;
        assert!(feed.entries.is_empty());
        assert_eq!("https://example.org/", feed.id);
        Ok(())
    }
}
