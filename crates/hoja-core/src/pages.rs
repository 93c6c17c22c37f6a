use crate::error::HojaError;

/// A parsed page-selector expression: `"all"`, a single page number, a
/// comma-separated list, hyphenated ranges, or any mixture ("1,3-5,9").
///
/// Page numbers are 1-based in the selector and resolve to 0-based
/// indices. Out-of-range numbers are dropped silently so that one bad
/// number never aborts a run. Negative entries like `"-3"` are not
/// out-of-range numbers: the hyphen reads as a range separator, leaving
/// an empty bound, so they are rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelection {
    All,
    Parts(Vec<PagePart>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePart {
    Single(usize),
    Range(usize, usize),
}

impl PageSelection {
    pub fn parse(s: &str) -> Result<PageSelection, HojaError> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        let mut parts = Vec::new();
        for part in trimmed.split(',') {
            let part = part.trim();
            match part.split_once('-') {
                Some((start, end)) => {
                    let start = parse_page(start, s)?;
                    let end = parse_page(end, s)?;
                    parts.push(PagePart::Range(start, end));
                }
                None => parts.push(PagePart::Single(parse_page(part, s)?)),
            }
        }
        Ok(PageSelection::Parts(parts))
    }

    /// Resolve to an ascending, duplicate-free list of 0-based indices,
    /// always a subset of `[0, total_pages)`.
    pub fn resolve(&self, total_pages: usize) -> Vec<usize> {
        match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Parts(parts) => {
                let mut indices = std::collections::BTreeSet::new();
                for part in parts {
                    let (start, end) = match *part {
                        PagePart::Single(p) => (p, p),
                        PagePart::Range(a, b) => (a, b),
                    };
                    for p in start..=end {
                        if (1..=total_pages).contains(&p) {
                            indices.insert(p - 1);
                        }
                    }
                }
                indices.into_iter().collect()
            }
        }
    }
}

impl Default for PageSelection {
    fn default() -> Self {
        PageSelection::All
    }
}

fn parse_page(part: &str, selector: &str) -> Result<usize, HojaError> {
    part.trim()
        .parse()
        .map_err(|_| HojaError::InvalidPages(selector.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_yields_every_page() {
        assert_eq!(PageSelection::parse("all").unwrap().resolve(4), vec![0, 1, 2, 3]);
        assert_eq!(PageSelection::parse("  ALL ").unwrap().resolve(2), vec![0, 1]);
    }

    #[test]
    fn test_single_page() {
        assert_eq!(PageSelection::parse("3").unwrap().resolve(10), vec![2]);
    }

    #[test]
    fn test_list_and_range_mixture() {
        let sel = PageSelection::parse("1, 3-5, 9").unwrap();
        assert_eq!(sel.resolve(10), vec![0, 2, 3, 4, 8]);
    }

    #[test]
    fn test_duplicates_collapse_and_sort() {
        let sel = PageSelection::parse("5,1,3-5,1").unwrap();
        assert_eq!(sel.resolve(10), vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_out_of_range_dropped_silently() {
        let sel = PageSelection::parse("2,99").unwrap();
        assert_eq!(sel.resolve(3), vec![1]);
        let sel = PageSelection::parse("8-12").unwrap();
        assert_eq!(sel.resolve(10), vec![7, 8, 9]);
    }

    #[test]
    fn test_zero_is_out_of_range() {
        assert_eq!(PageSelection::parse("0,1").unwrap().resolve(3), vec![0]);
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(PageSelection::parse("1,x").is_err());
        assert!(PageSelection::parse("").is_err());
    }

    #[test]
    fn test_negative_entry_is_rejected_not_dropped() {
        assert!(PageSelection::parse("-3").is_err());
        assert!(PageSelection::parse("1,-3").is_err());
    }
}
