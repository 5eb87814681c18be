//! Combining case sequences
//!
//! Two modes: [`zip_cases`] joins rows from several sources by position,
//! [`concat`] flattens the fields of one row from several parts.
//!
//! Zipping stops at the shortest source. Sources of unequal length are
//! truncated without notice, so a 10-row sheet zipped with a 7-row sheet
//! yields 7 cases.

/// Concatenate parts into one flat list
pub fn concat<T, P>(parts: impl IntoIterator<Item = P>) -> Vec<T>
where
    P: IntoIterator<Item = T>,
{
    parts.into_iter().flatten().collect()
}

/// Zip sources by position, concatenating each step's rows
pub fn zip_cases<I, T>(sources: Vec<I>) -> ZipCases<I>
where
    I: Iterator<Item = Vec<T>>,
{
    ZipCases { sources }
}

/// Iterator returned by [`zip_cases`]
#[derive(Debug, Clone)]
pub struct ZipCases<I> {
    sources: Vec<I>,
}

impl<I, T> Iterator for ZipCases<I>
where
    I: Iterator<Item = Vec<T>>,
{
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.sources.is_empty() {
            return None;
        }
        let mut combined = Vec::new();
        for source in &mut self.sources {
            match source.next() {
                Some(row) => combined.extend(row),
                None => {
                    // Shortest source is exhausted; stay exhausted.
                    self.sources.clear();
                    return None;
                }
            }
        }
        Some(combined)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.sources
            .iter()
            .map(Iterator::size_hint)
            .reduce(|(lo_a, hi_a), (lo_b, hi_b)| {
                let hi = match (hi_a, hi_b) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
                (lo_a.min(lo_b), hi)
            })
            .unwrap_or((0, Some(0)))
    }
}
