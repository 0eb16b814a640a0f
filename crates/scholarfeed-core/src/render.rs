use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt::Write;

use regex::{Captures, Regex};

use crate::config::HighlightRules;
use crate::doi::doi_url;
use crate::types::Publication;

/// Wraps the portfolio owner's name variants in `<strong>`.
///
/// One pass over `name[\w*#]?` handles the starred, hashed, and bare forms
/// together: a trailing `*`/`#` is kept inside the emphasis, a trailing word
/// character means the match is part of a longer name and is left alone.
/// The spelled-out form is substituted afterwards and never overlaps.
pub struct AuthorHighlighter {
    short_name: String,
    short_re: Regex,
    full_re: Regex,
}

impl AuthorHighlighter {
    pub fn new(rules: &HighlightRules) -> Self {
        let short = regex::escape(&rules.short_name);
        let short_re = Regex::new(&format!(r"{short}[\w*#]?")).expect("valid regex");
        // Optional period after initials: "Shailesh S. Nair" / "Shailesh S Nair".
        let full = regex::escape(&rules.full_name).replace(r"\.", r"\.?");
        let full_re = Regex::new(&full).expect("valid regex");
        Self {
            short_name: rules.short_name.clone(),
            short_re,
            full_re,
        }
    }

    /// `authors` must already be HTML-escaped.
    pub fn highlight(&self, authors: &str) -> String {
        let pass = self.short_re.replace_all(authors, |caps: &Captures<'_>| {
            let matched = &caps[0];
            let trailing = matched
                .strip_prefix(self.short_name.as_str())
                .and_then(|rest| rest.chars().next());
            match trailing {
                None | Some('*') | Some('#') => format!("<strong>{matched}</strong>"),
                Some(_) => matched.to_string(),
            }
        });
        self.full_re
            .replace_all(&pass, "<strong>${0}</strong>")
            .into_owned()
    }
}

/// Render the publication list as an HTML fragment.
///
/// Pure and deterministic: records are grouped by year, years walk downwards,
/// records within a year keep their input order, so the same input always
/// produces the same bytes and re-rendering fully replaces prior output.
pub fn render_publications(publications: &[Publication], rules: &HighlightRules) -> String {
    let highlighter = AuthorHighlighter::new(rules);
    let groups = group_by_year(publications);

    let mut out = String::new();
    for (year_index, (year, group)) in groups.iter().enumerate() {
        for (pub_index, publication) in group.iter().enumerate() {
            let delay = year_index * 50 + pub_index * 50;
            render_item(&mut out, publication, year, delay, &highlighter);
        }
    }
    out
}

fn group_by_year(publications: &[Publication]) -> Vec<(String, Vec<&Publication>)> {
    let mut groups: BTreeMap<String, Vec<&Publication>> = BTreeMap::new();
    for publication in publications {
        groups
            .entry(publication.year.clone())
            .or_default()
            .push(publication);
    }

    let mut ordered: Vec<(String, Vec<&Publication>)> = groups.into_iter().collect();
    // Descending numeric year; unparsable years sink to the bottom.
    ordered.sort_by_key(|(year, _)| Reverse(year.parse::<i64>().unwrap_or(i64::MIN)));
    ordered
}

fn render_item(
    out: &mut String,
    publication: &Publication,
    year: &str,
    delay: usize,
    highlighter: &AuthorHighlighter,
) {
    let authors = highlighter.highlight(&escape_html(&publication.authors));
    let title = escape_html(&publication.title);
    let venue = escape_html(&publication.venue);
    let year = escape_html(year);
    let link = link_markup(publication);

    let _ = write!(
        out,
        "<div class=\"publication-item\" data-aos=\"fade-up\" data-aos-delay=\"{delay}\">\n\
         \x20 <div class=\"publication-year\">{year}</div>\n\
         \x20 <div class=\"publication-content\">\n\
         \x20   <p>{authors}. {title}. <i>{venue}</i>, {year}.{link}</p>\n\
         \x20 </div>\n\
         </div>\n"
    );
}

/// `doi` wins over `link`; with neither, a disabled placeholder keeps the
/// element present but non-navigable.
fn link_markup(publication: &Publication) -> String {
    if !publication.doi.is_empty() {
        let doi = escape_html(&publication.doi);
        let href = escape_html(&doi_url(&publication.doi));
        format!(" doi: <a href=\"{href}\" target=\"_blank\">{doi}</a>")
    } else if !publication.link.is_empty() {
        let href = escape_html(&publication.link);
        format!(" <a href=\"{href}\" target=\"_blank\">View</a>")
    } else {
        " <a class=\"publication-link-disabled\">No link available</a>".to_string()
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
