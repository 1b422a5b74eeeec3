use anyhow::bail;
use clap::{command, Arg};
use std::path::PathBuf;

mod date;
mod extractor;
mod generator;
mod metadata;
mod renderer;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = command!()
        .args([
            Arg::new("posts_dir")
                .help("Directory of saved post files")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("posts"),
            Arg::new("out_file")
                .help("Path of the generated index page. Overwritten on every run.")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("index.html"),
            Arg::new("title")
                .long("title")
                .help("Heading of the generated page")
                .default_value("Saved Blog Archive"),
        ])
        .get_matches();

    let posts_dir: &PathBuf = matches.get_one("posts_dir").unwrap();
    if !posts_dir.exists() || !posts_dir.is_dir() {
        bail!("posts_dir must be a directory.");
    }
    let out_file: &PathBuf = matches.get_one("out_file").unwrap();
    let page_title: &String = matches.get_one("title").unwrap();

    let count = generator::generate(posts_dir, out_file, page_title)?;

    println!(
        "✔ {} rebuilt: {} posts indexed (nothing re-fetched, nothing deleted)",
        out_file.display(),
        count
    );
    Ok(())
}
