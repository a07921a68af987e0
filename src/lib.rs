//! The library code for the `leafpress` static site generator. The
//! architecture can be generally broken down into two distinct steps:
//!
//! 1. Parsing posts from source files on disk ([`crate::post`])
//! 2. Converting the posts into output files on disk ([`crate::write`])
//!
//! The second step renders one page per post plus a single index page
//! listing every post by date. The listing itself is a pure projection:
//! each post becomes one entry with a link to the post's page, the post's
//! title as a heading, and the publish date rendered as `DD.MM.YYYY`
//! ([`crate::list`]). The index page applies the index template to that
//! projection; post pages apply the post template to the post itself.
//!
//! Around those two steps sit the project configuration
//! ([`crate::config`]), the Atom feed ([`crate::feed`]), and the
//! [`crate::build::build_site`] function which stitches everything
//! together.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod feed;
pub mod list;
pub mod markdown;
pub mod post;
pub mod write;
