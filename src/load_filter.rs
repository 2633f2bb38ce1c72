use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use thiserror::Error;

/// Output of [`encode_loads`]: the non-empty load values and the range-string
/// naming the slots they came from.
///
/// `filter` is `None` when every slot `0..N` was occupied, since an absent
/// filter already means "fill sequentially from slot 0".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedLoads {
    pub loads: Vec<String>,
    pub filter: Option<String>,
}

/// Positional write target for [`decode_loads`].
pub trait LoadSlots {
    /// Number of addressable slots.
    fn slot_count(&self) -> usize;

    /// Overwrite slot `index`. Only called with `index < slot_count()`.
    fn set_slot(&mut self, index: usize, value: &str);
}

impl LoadSlots for Vec<String> {
    fn slot_count(&self) -> usize {
        self.len()
    }

    fn set_slot(&mut self, index: usize, value: &str) {
        self[index] = value.to_string();
    }
}

/// Errors reported by the strict load-points filter parser.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid load point index: {0}")]
    InvalidIndex(String),
    #[error("invalid load point range: {0}")]
    InvalidRange(String),
    #[error("open range '-i' is only allowed as the first token: {0}")]
    OpenStartNotFirst(String),
    #[error("open range 'i-' is only allowed as the last token: {0}")]
    OpenEndNotLast(String),
    #[error("load point {index} out of bounds for {count} load points")]
    OutOfBounds { index: usize, count: usize },
}

/// Group sorted indices into maximal runs of consecutive integers.
pub fn index_runs(indices: &[usize]) -> Vec<RangeInclusive<usize>> {
    let mut runs = Vec::new();
    let mut iter = indices.iter().copied();
    let Some(first) = iter.next() else {
        return runs;
    };
    let (mut start, mut end) = (first, first);
    for i in iter {
        if i == end + 1 {
            end = i;
        } else {
            runs.push(start..=end);
            start = i;
            end = i;
        }
    }
    runs.push(start..=end);
    runs
}

/// Render runs as a range-string: `"i"` for single slots, `"a-b"` otherwise.
pub fn render_runs(runs: &[RangeInclusive<usize>]) -> String {
    runs.iter()
        .map(|r| {
            if r.start() == r.end() {
                r.start().to_string()
            } else {
                format!("{}-{}", r.start(), r.end())
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Compress a load sequence into its non-empty values and a range-string.
///
/// ```
/// use loadform::encode_loads;
/// let enc = encode_loads(&["", "a", "b", "", "", "c"]);
/// assert_eq!(enc.loads, vec!["a", "b", "c"]);
/// assert_eq!(enc.filter.as_deref(), Some("1-2,5"));
/// ```
pub fn encode_loads<S: AsRef<str>>(seq: &[S]) -> EncodedLoads {
    let mut loads = Vec::new();
    let mut indices = Vec::new();
    for (i, value) in seq.iter().enumerate() {
        let value = value.as_ref();
        if !value.is_empty() {
            loads.push(value.to_string());
            indices.push(i);
        }
    }
    if indices.is_empty() {
        return EncodedLoads::default();
    }

    let runs = index_runs(&indices);
    let full = runs.len() == 1 && *runs[0].start() == 0 && *runs[0].end() == seq.len() - 1;
    let filter = if full { None } else { Some(render_runs(&runs)) };
    EncodedLoads { loads, filter }
}

/// Parse one lenient decoder token into the slot range it names.
///
/// Returns `None` for anything that is not `i` or `a-b` with numeric parts.
fn lenient_token(token: &str) -> Option<RangeInclusive<usize>> {
    let token = token.trim();
    if token.contains('-') {
        let (start, end) = token.split_once('-')?;
        let start = start.trim().parse().ok()?;
        let end = end.trim().parse().ok()?;
        Some(start..=end)
    } else {
        let i = token.parse().ok()?;
        Some(i..=i)
    }
}

/// Write compact load values back into their slots.
///
/// Malformed filter tokens are skipped, inverted ranges write nothing and
/// slots named after the values run out receive `""`. Slots past the end of
/// `slots` are ignored without consuming a value. Without a filter the values
/// fill slots `0..` in order and later slots keep their content.
pub fn decode_loads<T, S>(values: &[S], filter: Option<&str>, slots: &mut T)
where
    T: LoadSlots + ?Sized,
    S: AsRef<str>,
{
    let values: Vec<&str> = values
        .iter()
        .map(|v| v.as_ref())
        .filter(|v| !v.is_empty())
        .collect();
    let count = slots.slot_count();

    let filter = match filter {
        Some(f) if !f.is_empty() => f,
        _ => {
            for (i, value) in values.iter().enumerate().take(count) {
                slots.set_slot(i, value);
            }
            return;
        }
    };

    let mut cursor = 0usize;
    for token in filter.split(',') {
        let Some(range) = lenient_token(token) else {
            tracing::debug!(token, "skipping malformed load filter token");
            continue;
        };
        // Slots past the end never consume a value, so stop at the last slot.
        let (start, end) = range.into_inner();
        if count == 0 || start >= count {
            continue;
        }
        for i in start..=end.min(count - 1) {
            slots.set_slot(i, values.get(cursor).copied().unwrap_or(""));
            cursor += 1;
        }
    }
}

fn parse_bound(part: &str, token: &str) -> Result<usize, FilterError> {
    part.parse()
        .map_err(|_| FilterError::InvalidRange(token.to_string()))
}

/// Strictly parse a load-points filter against `count` load points.
///
/// An empty filter selects every point. Besides `i` and `a-b`, an open start
/// `-b` is accepted as the first token and an open end `a-` as the last one.
pub fn parse_load_points(filter: &str, count: usize) -> Result<Vec<usize>, FilterError> {
    if filter.trim().is_empty() {
        return Ok((0..count).collect());
    }

    let tokens: Vec<&str> = filter.split(',').map(str::trim).collect();
    let last = tokens.len() - 1;
    let mut indices = Vec::new();

    for (pos, &token) in tokens.iter().enumerate() {
        if token.contains('-') {
            let parts: Vec<&str> = token.split('-').map(str::trim).collect();
            if parts.len() != 2 || (parts[0].is_empty() && parts[1].is_empty()) {
                return Err(FilterError::InvalidRange(token.to_string()));
            }
            let (start, end) = if parts[0].is_empty() {
                if pos != 0 {
                    return Err(FilterError::OpenStartNotFirst(token.to_string()));
                }
                (0, parse_bound(parts[1], token)?)
            } else if parts[1].is_empty() {
                if pos != last {
                    return Err(FilterError::OpenEndNotLast(token.to_string()));
                }
                (parse_bound(parts[0], token)?, count.saturating_sub(1))
            } else {
                (parse_bound(parts[0], token)?, parse_bound(parts[1], token)?)
            };
            if start > end || end >= count {
                return Err(FilterError::InvalidRange(format!("{start}-{end}")));
            }
            indices.extend(start..=end);
        } else {
            let index: usize = token
                .parse()
                .map_err(|_| FilterError::InvalidIndex(token.to_string()))?;
            if index >= count {
                return Err(FilterError::OutOfBounds { index, count });
            }
            indices.push(index);
        }
    }
    Ok(indices)
}

/// Select load points from `values` with a strict filter.
pub fn select_load_points<T: Clone>(
    values: &[T],
    filter: &str,
) -> Result<BTreeMap<usize, T>, FilterError> {
    let indices = parse_load_points(filter, values.len())?;
    Ok(indices.into_iter().map(|i| (i, values[i].clone())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_split_on_gaps() {
        assert_eq!(index_runs(&[0, 1, 2, 5]), vec![0..=2, 5..=5]);
        assert_eq!(render_runs(&index_runs(&[0, 1, 2, 5])), "0-2,5");
        assert!(index_runs(&[]).is_empty());
    }

    #[test]
    fn lenient_token_shapes() {
        assert_eq!(lenient_token(" 3 "), Some(3..=3));
        assert_eq!(lenient_token("1-4"), Some(1..=4));
        assert_eq!(lenient_token("bogus-range"), None);
        assert_eq!(lenient_token("x"), None);
        assert_eq!(lenient_token("1-2-3"), None);
    }

    #[test]
    fn single_trailing_slot_is_not_full_range() {
        let enc = encode_loads(&["", "", "z"]);
        assert_eq!(enc.filter.as_deref(), Some("2"));
    }
}
