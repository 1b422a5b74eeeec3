use maud::{html, PreEscaped, DOCTYPE};

use crate::generator::{YearGroup, YearKey};

const STYLESHEET: &str = "\
body{font-family:'Noto Sans JP',sans-serif;background:#f3f4f6;margin:0;padding:24px;}
.box{max-width:950px;margin:0 auto;background:white;padding:24px 28px 40px;
     border-radius:12px;box-shadow:0 10px 25px rgba(0,0,0,0.05);}
h1{margin-top:0;}
.year{font-size:1.3rem;margin-top:1.6rem;padding-left:8px;border-left:4px solid #60a5fa;}
table{width:100%;border-collapse:collapse;font-size:.9rem;}
th,td{padding:6px 4px;}
th{text-align:left;color:#6b7280;border-bottom:1px solid #ddd;}
tr:nth-child(even){background:#fafafa;}
a{color:#2563eb;text-decoration:none;}
a:hover{text-decoration:underline;}
";

/// Serializes the grouped, sorted posts into one self-contained page.
///
/// Every spliced string goes through maud's escaping, so titles or dates
/// containing markup characters cannot corrupt the document.
pub(crate) fn render_index(page_title: &str, groups: &[YearGroup]) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (page_title) }
                style { (PreEscaped(STYLESHEET)) }
            }
            body {
                div.box {
                    h1 { (page_title) }
                    p { "Newest first." }
                    @for group in groups {
                        div.year { (group.key) }
                        table {
                            thead {
                                tr { th { "ID" } th { "Date" } th { "Title" } }
                            }
                            tbody {
                                @for post in &group.posts {
                                    tr {
                                        td { (post.id) }
                                        td { (post.date) }
                                        td {
                                            a href={ "posts/" (post.filename) } { (post.title) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    .into_string()
}
