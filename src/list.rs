//! Builds the index-page post listing. Each [`Post`] is projected into one
//! [`ListItem`]: a link to the post's page, the post's title as a heading,
//! and the publish date rendered as `DD.MM.YYYY`. The projection is pure
//! and order-preserving; the caller decides the order (typically
//! newest-first, as returned by [`crate::post::parse_posts`]).

use std::collections::HashMap;

use chrono::NaiveDate;
use gtmpl_value::Value;

use crate::post::Post;

/// One entry in the index-page post listing.
#[derive(Clone, Debug, PartialEq)]
pub struct ListItem {
    /// The link target. Copied verbatim from the post's `relative_url`.
    pub url: String,

    /// The heading text. Copied verbatim from the post's title.
    pub title: String,

    /// The publish date rendered as `DD.MM.YYYY`.
    pub date: String,
}

/// Projects `posts` into list items, one per post, in the same order.
pub fn items(posts: &[Post]) -> Vec<ListItem> {
    posts
        .iter()
        .map(|post| ListItem {
            url: post.relative_url.clone(),
            title: post.title.clone(),
            date: format_date(post.date),
        })
        .collect()
}

/// Renders a date as zero-padded day, zero-padded month, and four-digit
/// year separated by periods, e.g. `15.01.2023`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

impl From<&ListItem> for Value {
    /// Converts [`ListItem`]s into [`Value`]s for templating. The result is
    /// a [`Value::Object`] with fields `url`, `title`, and `date`.
    fn from(item: &ListItem) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("url".to_owned(), Value::String(item.url.clone()));
        m.insert("title".to_owned(), Value::String(item.title.clone()));
        m.insert("date".to_owned(), Value::String(item.date.clone()));
        Value::Object(m)
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

    #[test]
    fn test_items_preserve_length_and_order() {
        // Deliberately not sorted by date: the listing must not reorder.
        let posts = vec![
            post("b", "/2021/04/16/b", NaiveDate::from_ymd(2021, 4, 16)),
            post("c", "/2023/01/15/c", NaiveDate::from_ymd(2023, 1, 15)),
            post("a", "/2019/12/31/a", NaiveDate::from_ymd(2019, 12, 31)),
        ];

        let items = items(&posts);
        assert_eq!(posts.len(), items.len());
        assert_eq!(
            vec!["b", "c", "a"],
            items.iter().map(|i| i.title.as_str()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_items_copy_url_and_title_verbatim() {
        let items = items(&[post(
            "How to enforce exclusive time ranges in PostgreSQL",
            "/2023/01/15/postgresql-exclusive-ranges",
            NaiveDate::from_ymd(2023, 1, 15),
        )]);

        assert_eq!(1, items.len());
        assert_eq!("/2023/01/15/postgresql-exclusive-ranges", items[0].url);
        assert_eq!(
            "How to enforce exclusive time ranges in PostgreSQL",
            items[0].title
        );
        assert_eq!("15.01.2023", items[0].date);
    }

    #[test]
    fn test_items_empty() {
        assert!(items(&[]).is_empty());
    }

    #[test]
    fn test_format_date() {
        assert_eq!("15.01.2023", format_date(NaiveDate::from_ymd(2023, 1, 15)));
    }

    #[test]
    fn test_format_date_zero_pads() {
        assert_eq!("06.04.2021", format_date(NaiveDate::from_ymd(2021, 4, 6)));
    }

    #[test]
    fn test_list_item_to_value() {
        let value = Value::from(&ListItem {
            url: "/2021/04/16/hello-world".to_owned(),
            title: "Hello, world!".to_owned(),
            date: "16.04.2021".to_owned(),
        });

        match value {
            Value::Object(m) => {
                assert_eq!(
                    Some(&Value::String("/2021/04/16/hello-world".to_owned())),
                    m.get("url")
                );
                assert_eq!(
                    Some(&Value::String("Hello, world!".to_owned())),
                    m.get("title")
                );
                assert_eq!(
                    Some(&Value::String("16.04.2021".to_owned())),
                    m.get("date")
                );
            }
            other => panic!("wanted an object; found {:?}", other),
        }
    }
}
