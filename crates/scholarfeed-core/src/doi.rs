use once_cell::sync::Lazy;
use regex::Regex;

static DOI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"10\.\d{4,}/[-._;()/:a-zA-Z0-9]+").expect("valid regex"));

/// Pull the first DOI substring out of an arbitrary URL, if any.
///
/// Total: empty input and DOI-free input both yield `None`.
pub fn extract_doi(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    DOI_RE.find(url).map(|m| m.as_str().to_string())
}

pub fn doi_url(doi: &str) -> String {
    format!("https://doi.org/{doi}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doi_from_doi_org_url() {
        assert_eq!(
            extract_doi("https://doi.org/10.1038/s41396-023-01510-0").as_deref(),
            Some("10.1038/s41396-023-01510-0")
        );
    }

    #[test]
    fn doi_embedded_in_publisher_url() {
        assert_eq!(
            extract_doi("https://pubs.acs.org/doi/abs/10.1021/acs.est.3c09921?ref=pdf").as_deref(),
            Some("10.1021/acs.est.3c09921")
        );
    }

    #[test]
    fn empty_input_yields_none() {
        assert_eq!(extract_doi(""), None);
    }

    #[test]
    fn url_without_doi_yields_none() {
        assert_eq!(extract_doi("https://example.com/no-doi-here"), None);
    }

    #[test]
    fn doi_url_prefixes_resolver() {
        assert_eq!(
            doi_url("10.1126/sciadv.abf4792"),
            "https://doi.org/10.1126/sciadv.abf4792"
        );
    }
}
