//! Defines the [`Post`] type and the logic for parsing posts from the file
//! system into memory. A post source file is YAML frontmatter between `---`
//! fences followed by a Markdown body:
//!
//! ```md
//! ---
//! Title: Hello, world!
//! Date: 2021-04-16
//! ---
//! # Hello
//!
//! World
//! ```
//!
//! The post's URL is derived from its date and the source file name:
//! a post dated `2021-04-16` in `hello-world.md` is published at
//! `/2021/04/16/hello-world`.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use gtmpl_value::Value;
use serde::{Deserialize, Deserializer};
use walkdir::WalkDir;

use crate::{list, markdown};

const MARKDOWN_EXTENSION: &str = ".md";

/// A single blog entry. The lifecycle is: parsed from a source file by
/// [`parse_posts`], projected into the index listing by
/// [`crate::list::items`], and rendered to its own page by
/// [`crate::write::Writer`].
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// The title of the post, used verbatim as its display heading.
    pub title: String,

    /// The publish date.
    pub date: NaiveDate,

    /// The site-relative URL of the rendered page, e.g.
    /// `/2021/04/16/hello-world`.
    pub relative_url: String,

    /// The location of the rendered page on disk, relative to the output
    /// root, e.g. `2021/04/16/hello-world/index.html`.
    pub file_path: PathBuf,

    /// The post body, already rendered to HTML.
    pub body: String,
}

impl Post {
    /// Parses a single [`Post`] from a `slug` and the contents of its
    /// source file. The slug is the final path segment of the post's URL;
    /// [`parse_posts`] derives it from the source file name.
    pub fn from_str(slug: &str, input: &str) -> Result<Post> {
        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let frontmatter: Frontmatter =
            serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

        let prefix = frontmatter.date.format("%Y/%m/%d");
        let mut post = Post {
            title: frontmatter.title,
            date: frontmatter.date,
            relative_url: format!("/{}/{}", prefix, slug),
            file_path: PathBuf::from(format!("{}/{}/index.html", prefix, slug)),
            body: String::new(),
        };
        markdown::to_html(&mut post.body, &input[body_start..]);
        Ok(post)
    }

    /// Converts a [`Post`] into a [`Value`] for templating. The result is a
    /// [`Value::Object`] with fields `title`, `url`, `date` (rendered as
    /// `DD.MM.YYYY`), and `body`.
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(self.title.clone()));
        m.insert("url".to_owned(), Value::String(self.relative_url.clone()));
        m.insert(
            "date".to_owned(),
            Value::String(list::format_date(self.date)),
        );
        m.insert("body".to_owned(), Value::String(self.body.clone()));
        Value::Object(m)
    }
}

/// Searches `dir` (recursively) for post source files (extension = `.md`)
/// and returns the parsed [`Post`]s sorted by date, most recent first.
pub fn parse_posts(dir: &Path) -> Result<Vec<Post>> {
    let mut posts = Vec::new();
    for result in WalkDir::new(dir) {
        let entry = result?;
        if !entry.file_type().is_file() {
            continue;
        }
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        if file_name.ends_with(MARKDOWN_EXTENSION) {
            posts.push(parse_post(entry.path(), &file_name)?);
        }
    }

    posts.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(posts)
}

fn parse_post(full_path: &Path, file_name: &str) -> Result<Post> {
    let stem = file_name.trim_end_matches(MARKDOWN_EXTENSION);
    let slug = slug::slugify(strip_date_prefix(stem));

    let mut contents = String::new();
    File::open(full_path)?.read_to_string(&mut contents)?;
    Post::from_str(&slug, &contents).map_err(|e| {
        Error::Annotated(
            format!("parsing post `{}`", full_path.display()),
            Box::new(e),
        )
    })
}

// Source file names may carry a `YYYY-MM-DD-` prefix. The date already
// appears in the permalink, so the prefix is dropped from the slug.
fn strip_date_prefix(stem: &str) -> &str {
    let bytes = stem.as_bytes();
    let dated = bytes.len() > 11
        && bytes[10] == b'-'
        && bytes[..10].iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if dated {
        &stem[11..]
    } else {
        stem
    }
}

// Locates the frontmatter fences in `input` and returns the offsets of
// the YAML document and of the body that follows it.
fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
    const FENCE: &str = "---";
    if !input.starts_with(FENCE) {
        return Err(Error::FrontmatterMissingStartFence);
    }
    match input[FENCE.len()..].find(FENCE) {
        None => Err(Error::FrontmatterMissingEndFence),
        Some(offset) => Ok((
            FENCE.len(),                        // yaml_start
            FENCE.len() + offset,               // yaml_stop
            FENCE.len() + offset + FENCE.len(), // body_start
        )),
    }
}

#[derive(Deserialize)]
struct Frontmatter {
    /// The title of the post.
    #[serde(rename = "Title")]
    title: String,

    /// The publish date of the post, `YYYY-MM-DD`.
    #[serde(rename = "Date", deserialize_with = "deserialize_date")]
    date: NaiveDate,
}

fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one
    /// was missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned for I/O errors while walking the posts directory.
    WalkDir(walkdir::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator while walking the posts directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_str() -> Result<()> {
        let post = Post::from_str(
            "hello-world",
            "---\nTitle: Hello, world!\nDate: 2021-04-16\n---\n# Hello\n\nWorld",
        )?;
        assert_eq!("Hello, world!", post.title);
        assert_eq!(NaiveDate::from_ymd(2021, 4, 16), post.date);
        assert_eq!("/2021/04/16/hello-world", post.relative_url);
        assert_eq!(
            PathBuf::from("2021/04/16/hello-world/index.html"),
            post.file_path
        );
        assert_eq!("<h3>Hello</h3>\n<p>World</p>\n", post.body);
        Ok(())
    }

    #[test]
    fn test_from_str_missing_start_fence() {
        let result = Post::from_str("busted", "Title: busted\n");
        assert!(matches!(result, Err(Error::FrontmatterMissingStartFence)));
    }

    #[test]
    fn test_from_str_missing_end_fence() {
        let result = Post::from_str("busted", "---\nTitle: busted\n");
        assert!(matches!(result, Err(Error::FrontmatterMissingEndFence)));
    }

    #[test]
    fn test_from_str_bad_date() {
        let result =
            Post::from_str("busted", "---\nTitle: busted\nDate: 16.04.2021\n---\n");
        assert!(matches!(result, Err(Error::DeserializeYaml(_))));
    }

    #[test]
    fn test_strip_date_prefix() {
        assert_eq!("hello-world", strip_date_prefix("2021-04-16-hello-world"));
        assert_eq!("hello-world", strip_date_prefix("hello-world"));
        // A bare date is not a prefix.
        assert_eq!("2021-04-16", strip_date_prefix("2021-04-16"));
        assert_eq!("2021-April-16-x", strip_date_prefix("2021-April-16-x"));
    }

    #[test]
    fn test_parse_posts() -> Result<()> {
        let posts = parse_posts(Path::new("./testdata/posts"))?;

        // Most recent first.
        assert_eq!(2, posts.len());
        assert_eq!("/2023/01/15/exclusive-ranges", posts[0].relative_url);
        assert_eq!(
            "How to enforce exclusive time ranges in PostgreSQL",
            posts[0].title
        );
        assert_eq!("/2021/04/16/hello-world", posts[1].relative_url);
        assert_eq!("Hello, world!", posts[1].title);
        Ok(())
    }
}
