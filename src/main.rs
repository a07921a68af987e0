use std::path::Path;
use std::process::exit;

use clap::{crate_version, App, Arg};

use leafpress::build::build_site;
use leafpress::config::Config;

fn main() {
    let matches = App::new("leafpress")
        .version(crate_version!())
        .about("Renders markdown posts into a static blog")
        .arg(
            Arg::with_name("project")
                .help(
                    "Path to the project directory; searched upward for \
                     `blog.yaml`",
                )
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .help("Directory into which the site is written")
                .takes_value(true)
                .default_value("_site"),
        )
        .get_matches();

    let project = Path::new(matches.value_of("project").unwrap_or("."));
    let output = Path::new(matches.value_of("output").unwrap());

    let config = Config::from_directory(project, output).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        exit(1);
    });

    if let Err(e) = build_site(&config) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}
