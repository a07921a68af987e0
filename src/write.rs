//! Responsible for templating and writing HTML pages to disk from
//! [`Post`] sources: one page per post, plus the index page listing every
//! post ([`crate::list`]).

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use gtmpl::{Template, Value};

use crate::list;
use crate::post::Post;

/// Writes the rendered site pages to disk.
pub struct Writer<'a> {
    /// The template for post pages.
    pub posts_template: &'a Template,

    /// The template for the index page.
    pub index_template: &'a Template,

    /// The directory in which the output HTML files will be written. The
    /// index page lands at `{output_directory}/index.html`; each post page
    /// lands at `{output_directory}/{post.file_path}`.
    pub output_directory: &'a Path,

    /// The title of the site. This is made available to all templates,
    /// typically for the site-header text.
    pub site_title: &'a str,

    /// The URL for the site's home page. This is made available to all
    /// templates, typically as the destination for the site-header link.
    pub home_page: &'a str,
}

impl Writer<'_> {
    /// Takes a single [`Page`], templates it, and writes it to disk.
    fn write_page(&self, page: &Page) -> Result<()> {
        let mut value = page.to_value();
        if let Value::Object(obj) = &mut value {
            obj.insert(
                "site".to_owned(),
                Value::String(self.site_title.to_owned()),
            );
            obj.insert(
                "home_page".to_owned(),
                Value::String(self.home_page.to_owned()),
            );
        }
        page.template.execute(
            &mut std::fs::File::create(&page.file_path)?,
            &gtmpl::Context::from(value).unwrap(),
        )?;
        Ok(())
    }

    /// Takes a slice of [`Post`]s and writes the index page and the post
    /// pages to disk. The posts are written in the order given; the index
    /// listing preserves that order as well.
    pub fn write_posts(&self, posts: &[Post]) -> Result<()> {
        pages(
            posts,
            self.output_directory,
            self.posts_template,
            self.index_template,
        )
        .map(|page| {
            let dir = page.file_path.parent().unwrap(); // there should always be a dir
            std::fs::create_dir_all(dir)?;
            self.write_page(&page)
        })
        .collect()
    }
}

/// An object representing an output HTML file. A [`Page`] can be converted
/// to a [`Value`] and thus rendered in a template via [`Page::to_value`].
struct Page<'a> {
    /// The main item for the page: the post itself for post pages, the
    /// list of index entries for the index page.
    item: Value,

    /// The target location on disk for the output file.
    file_path: PathBuf,

    /// The URL of the previous (newer) post, if any.
    prev: Option<String>,

    /// The URL of the next (older) post, if any.
    next: Option<String>,

    /// The template with which the page will be rendered.
    template: &'a Template,
}

impl Page<'_> {
    /// Converts a [`Page`] into a [`Value`]. The result is a
    /// [`Value::Object`] with fields `item`, `prev`, and `next` (see
    /// [`Page`] for descriptions).
    fn to_value(&self) -> Value {
        use std::collections::HashMap;

        let option_to_value = |opt: &Option<String>| match opt {
            Some(url) => Value::String(url.clone()),
            None => Value::Nil,
        };

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("item".to_owned(), self.item.clone());
        m.insert("prev".to_owned(), option_to_value(&self.prev));
        m.insert("next".to_owned(), option_to_value(&self.next));
        Value::Object(m)
    }
}

/// Creates the index [`Page`] and the post [`Page`]s for a set of
/// [`Post`]s. See [`Writer`] for a description of arguments.
fn pages<'a>(
    posts: &'a [Post],
    output_directory: &'a Path,
    posts_template: &'a Template,
    index_template: &'a Template,
) -> impl Iterator<Item = Page<'a>> {
    std::iter::once(index_page(posts, output_directory, index_template))
        .chain(post_pages(posts, output_directory, posts_template))
}

/// Creates the index [`Page`]: the post listing projected by
/// [`list::items`], rendered with the index template.
fn index_page<'a>(
    posts: &[Post],
    output_directory: &Path,
    template: &'a Template,
) -> Page<'a> {
    Page {
        item: Value::Array(list::items(posts).iter().map(Value::from).collect()),
        file_path: output_directory.join("index.html"),
        prev: None,
        next: None,
        template,
    }
}

/// Creates the post [`Page`]s for a set of [`Post`]s. Neighboring posts in
/// the input order are linked through the `prev` and `next` fields.
fn post_pages<'a>(
    posts: &'a [Post],
    output_directory: &'a Path,
    template: &'a Template,
) -> impl Iterator<Item = Page<'a>> {
    posts.iter().enumerate().map(move |(i, post)| Page {
        item: post.to_value(),
        file_path: output_directory.join(&post.file_path),
        prev: match i < 1 {
            true => None,
            false => Some(posts[i - 1].relative_url.clone()),
        },
        next: match i >= posts.len() - 1 {
            true => None,
            false => Some(posts[i + 1].relative_url.clone()),
        },
        template,
    })
}

/// The result of a fallible page-writing operation.
type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`].
    /// This allows us to use the `?` operator for fallible template
    /// operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}
