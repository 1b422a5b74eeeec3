use chrono::NaiveDate;

/// Publication date of a post after normalization. `Unknown` is the sentinel
/// for "no date could be recovered" and the derived `Ord` places it before
/// every real date, so a descending sort pushes undated posts to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum NormalizedDate {
    Unknown,
    Known(NaiveDate),
}

impl NormalizedDate {
    pub fn year(self) -> Option<i32> {
        match self {
            NormalizedDate::Known(date) => Some(chrono::Datelike::year(&date)),
            NormalizedDate::Unknown => None,
        }
    }
}

/// Turns a raw extracted date string into a comparable value. `.` and `/`
/// are accepted as separators interchangeably with `-`; month and day may be
/// one or two digits. Anything that does not parse as a full calendar date
/// (empty input, out-of-range month/day, trailing garbage) becomes
/// `Unknown` — never an error.
pub(crate) fn normalize(raw: &str) -> NormalizedDate {
    let unified = raw.trim().replace(['.', '/'], "-");
    if unified.is_empty() {
        return NormalizedDate::Unknown;
    }
    match NaiveDate::parse_from_str(&unified, "%Y-%m-%d") {
        Ok(date) => NormalizedDate::Known(date),
        Err(_) => NormalizedDate::Unknown,
    }
}
