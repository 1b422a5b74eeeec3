/// Metadata recovered from one saved post file. Built once while scanning the
/// posts directory and never mutated afterwards; `date` keeps the raw
/// extracted string (possibly empty) so the index can show it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PostRecord {
    pub id: String,
    pub title: String,
    pub date: String,
    pub filename: String,
}
