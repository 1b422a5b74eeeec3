use std::cmp::Reverse;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;
use log::{debug, warn};

use crate::date::{normalize, NormalizedDate};
use crate::extractor;
use crate::metadata::PostRecord;
use crate::renderer;

/// Case-insensitive extension that marks a file as a post.
const POST_EXTENSION: &str = "html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum YearKey {
    Year(i32),
    Unknown,
}

impl fmt::Display for YearKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearKey::Year(year) => write!(f, "{year}"),
            YearKey::Unknown => f.write_str("unknown"),
        }
    }
}

/// One year bucket of the index, posts already in output order.
#[derive(Debug)]
pub(crate) struct YearGroup {
    pub key: YearKey,
    pub posts: Vec<PostRecord>,
}

/// Runs the whole pipeline: list, extract, sort, group, render, write.
/// The page is assembled fully in memory and written in a single call, so a
/// failed run never leaves partial output behind. Returns the post count.
pub(crate) fn generate(
    posts_dir: &Path,
    out_file: &Path,
    page_title: &str,
) -> anyhow::Result<usize> {
    let filenames = list_post_files(posts_dir)?;

    let mut records = Vec::with_capacity(filenames.len());
    for filename in filenames {
        records.push(read_record(posts_dir, &filename)?);
    }
    let count = records.len();

    let groups = sort_and_group(records);
    let page = renderer::render_index(page_title, &groups);
    fs::write(out_file, page).with_context(|| format!("while writing {:?}", out_file))?;

    Ok(count)
}

/// Flat listing of the posts directory: files only, no recursion, extension
/// compared case-insensitively. Order is whatever the filesystem yields; the
/// sort below imposes the real order.
fn list_post_files(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut filenames = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("while listing {:?}", dir))? {
        let entry = entry?;
        if !entry.metadata()?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_post = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case(POST_EXTENSION));
        if is_post {
            filenames.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    Ok(filenames)
}

fn read_record(posts_dir: &Path, filename: &str) -> anyhow::Result<PostRecord> {
    let path = posts_dir.join(filename);

    // Lossy decoding: saved pages with broken encodings still get indexed.
    let bytes = fs::read(&path).with_context(|| format!("while reading {:?}", path))?;
    let html = String::from_utf8_lossy(&bytes);

    let id = Path::new(filename)
        .file_stem()
        .map_or_else(|| filename.to_string(), |stem| stem.to_string_lossy().to_string());

    let (title, date) = extractor::extract(&html);
    let title = title.unwrap_or_else(|| {
        debug!("{filename}: no <title> element, using the file stem");
        id.clone()
    });
    if !date.is_empty() && normalize(&date) == NormalizedDate::Unknown {
        warn!("{filename}: extracted date {date:?} does not parse, treating as undated");
    }

    debug!("{filename}: title {title:?}, date {date:?}");
    Ok(PostRecord {
        id,
        title,
        date,
        filename: filename.to_string(),
    })
}

/// Stable sort, newest first; undated posts compare as the minimum and end
/// up last. Ties keep their listing order.
fn sort_and_group(records: Vec<PostRecord>) -> Vec<YearGroup> {
    let mut keyed: Vec<(NormalizedDate, PostRecord)> = records
        .into_iter()
        .map(|record| (normalize(&record.date), record))
        .collect();
    keyed.sort_by_key(|(date, _)| Reverse(*date));
    group_by_year(keyed)
}

/// Cuts the date-descending sequence into year buckets. Equal years are
/// contiguous after sorting, so one pass suffices, and the unknown bucket —
/// if any — always comes out last.
fn group_by_year(sorted: Vec<(NormalizedDate, PostRecord)>) -> Vec<YearGroup> {
    let mut groups: Vec<YearGroup> = Vec::new();
    for (date, record) in sorted {
        let key = match date.year() {
            Some(year) => YearKey::Year(year),
            None => YearKey::Unknown,
        };
        match groups.last_mut() {
            Some(group) if group.key == key => group.posts.push(record),
            _ => groups.push(YearGroup {
                key,
                posts: vec![record],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, date: &str) -> PostRecord {
        PostRecord {
            id: id.to_string(),
            title: id.to_string(),
            date: date.to_string(),
            filename: format!("{id}.html"),
        }
    }

    fn ids(groups: &[YearGroup]) -> Vec<&str> {
        groups
            .iter()
            .flat_map(|group| group.posts.iter().map(|post| post.id.as_str()))
            .collect()
    }

    #[test]
    fn sort_is_stable_descending_with_undated_last() {
        let groups = sort_and_group(vec![
            record("old", "2023-01-01"),
            record("tie1", "2024-06-01"),
            record("undated", "no date at all"),
            record("tie2", "2024-06-01"),
        ]);
        assert_eq!(ids(&groups), vec!["tie1", "tie2", "old", "undated"]);
    }

    #[test]
    fn grouping_partitions_by_year_descending_with_unknown_last() {
        let groups = sort_and_group(vec![
            record("a", "2023-07-15"),
            record("b", ""),
            record("c", "2024/1/2"),
            record("d", "2023.12.31"),
        ]);

        let keys: Vec<YearKey> = groups.iter().map(|group| group.key).collect();
        assert_eq!(
            keys,
            vec![YearKey::Year(2024), YearKey::Year(2023), YearKey::Unknown]
        );
        assert_eq!(ids(&groups), vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn grouping_is_a_total_partition() {
        let records: Vec<PostRecord> = (0..10)
            .map(|i| record(&format!("p{i}"), if i % 3 == 0 { "" } else { "2020-1-1" }))
            .collect();
        let total = records.len();
        let groups = sort_and_group(records);

        let mut seen = ids(&groups);
        assert_eq!(seen.len(), total);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }

    #[test]
    fn lister_skips_subdirectories_and_other_extensions() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("a.html"), "<title>A</title>")?;
        fs::write(dir.path().join("b.HTML"), "<title>B</title>")?;
        fs::write(dir.path().join("notes.txt"), "not a post")?;
        fs::create_dir(dir.path().join("ignored.html"))?;

        let mut filenames = list_post_files(dir.path())?;
        filenames.sort_unstable();
        assert_eq!(filenames, vec!["a.html", "b.HTML"]);
        Ok(())
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(generate(&missing, &dir.path().join("index.html"), "t").is_err());
    }

    #[test]
    fn end_to_end_orders_years_and_posts() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let posts = dir.path().join("posts");
        fs::create_dir(&posts)?;
        fs::write(
            posts.join("a.html"),
            "<html><head><title>Hello</title></head><body><time>2024-05-01</time></body></html>",
        )?;
        fs::write(
            posts.join("b.html"),
            "<html><head><title>World</title></head><body><p>posted 2023/12/31</p></body></html>",
        )?;

        let out = dir.path().join("index.html");
        let count = generate(&posts, &out, "Archive")?;
        assert_eq!(count, 2);

        let page = fs::read_to_string(&out)?;
        let hello = page.find("Hello").unwrap();
        let world = page.find("World").unwrap();
        assert!(hello < world);

        let year_2024 = page.find(">2024<").unwrap();
        let year_2023 = page.find(">2023<").unwrap();
        assert!(year_2024 < year_2023);
        Ok(())
    }

    #[test]
    fn missing_title_falls_back_to_the_file_stem() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let posts = dir.path().join("posts");
        fs::create_dir(&posts)?;
        fs::write(posts.join("untitled-post.html"), "<body><p>hi</p></body>")?;

        let out = dir.path().join("index.html");
        generate(&posts, &out, "Archive")?;

        let page = fs::read_to_string(&out)?;
        assert!(page.contains(">untitled-post</a>"));
        Ok(())
    }

    #[test]
    fn regeneration_is_idempotent() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let posts = dir.path().join("posts");
        fs::create_dir(&posts)?;
        fs::write(
            posts.join("a.html"),
            "<title>Hello</title><body><time>2024-05-01</time></body>",
        )?;
        fs::write(posts.join("b.html"), "<title>World</title><body></body>")?;

        let out = dir.path().join("index.html");
        generate(&posts, &out, "Archive")?;
        let first = fs::read(&out)?;
        generate(&posts, &out, "Archive")?;
        let second = fs::read(&out)?;
        assert_eq!(first, second);
        Ok(())
    }
}
