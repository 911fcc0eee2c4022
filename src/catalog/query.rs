//! In-memory evaluation of request parameters over catalog rows.

use std::cmp::Ordering;

use serde_json::Value;

use crate::output::{Row, scalar};
use crate::params::{FilterExpression, Operator, Pagination, SortExpression};

/// Page size applied when a page is requested without `--per-page`.
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Returns `true` when `row` satisfies `filter`.
///
/// Missing properties only satisfy `null` and `neq`. Ordering operators
/// compare numerically when both sides are numbers and lexically otherwise.
/// Wildcard matches ignore ASCII case.
#[must_use]
pub fn matches_filter(row: &Row, filter: &FilterExpression) -> bool {
    let field = row.get(&filter.property).filter(|value| !value.is_null());
    match filter.operator {
        Operator::Null => field.is_none(),
        Operator::NotNull => field.is_some(),
        Operator::Neq => field.is_none_or(|value| {
            filter
                .values
                .iter()
                .all(|wanted| compare(value, wanted) != Ordering::Equal)
        }),
        operator => field.is_some_and(|value| {
            filter
                .values
                .iter()
                .any(|wanted| satisfies(operator, value, wanted))
        }),
    }
}

/// Orders rows by the sort expressions, first expression taking precedence.
/// The sort is stable, so rows that tie on every key keep catalog order.
pub fn sort_rows(rows: &mut [Row], sorts: &[SortExpression]) {
    if sorts.is_empty() {
        return;
    }
    rows.sort_by(|left, right| {
        sorts.iter().fold(Ordering::Equal, |ordering, sort| {
            ordering.then_with(|| {
                let ordered = compare_fields(left.get(&sort.property), right.get(&sort.property));
                if sort.descending {
                    ordered.reverse()
                } else {
                    ordered
                }
            })
        })
    });
}

/// Slices one page out of `rows`. Without paging every row is returned.
#[must_use]
pub fn paginate(rows: Vec<Row>, pagination: Pagination) -> Vec<Row> {
    if pagination.is_default() {
        return rows;
    }
    let per_page = pagination
        .per_page
        .map_or(DEFAULT_PER_PAGE, |per_page| per_page.get());
    let page = pagination.page.map_or(1, |page| page.get());
    let size = usize::try_from(per_page).unwrap_or(usize::MAX);
    let skip = usize::try_from(page.saturating_sub(1))
        .unwrap_or(usize::MAX)
        .saturating_mul(size);
    rows.into_iter().skip(skip).take(size).collect()
}

fn satisfies(operator: Operator, value: &Value, wanted: &str) -> bool {
    match operator {
        Operator::Eq | Operator::In => compare(value, wanted) == Ordering::Equal,
        Operator::Gt => compare(value, wanted) == Ordering::Greater,
        Operator::Gte => compare(value, wanted) != Ordering::Less,
        Operator::Lt => compare(value, wanted) == Ordering::Less,
        Operator::Lte => compare(value, wanted) != Ordering::Greater,
        Operator::Like => wildcard_match(
            &wanted.to_ascii_lowercase(),
            &scalar(Some(value)).to_ascii_lowercase(),
        ),
        Operator::Neq | Operator::Null | Operator::NotNull => false,
    }
}

fn compare(value: &Value, wanted: &str) -> Ordering {
    let text = scalar(Some(value));
    match (text.parse::<f64>(), wanted.parse::<f64>()) {
        (Ok(left), Ok(right)) => left.total_cmp(&right),
        _ => text.as_str().cmp(wanted),
    }
}

fn compare_fields(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    let present = |value: &&Value| !value.is_null();
    match (left.filter(present), right.filter(present)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(a)), Some(Value::Number(b))) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => a.to_string().cmp(&b.to_string()),
        },
        (Some(a), Some(b)) => scalar(Some(a)).cmp(&scalar(Some(b))),
    }
}

/// Matches `text` against a pattern where `*` stands for any run of
/// characters. A pattern without `*` must match exactly.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let mut parts = pattern.split('*');
    let head = parts.next().unwrap_or_default();
    let Some(mut rest) = text.strip_prefix(head) else {
        return false;
    };
    let tail: Vec<&str> = parts.collect();
    let Some((last, middle)) = tail.split_last() else {
        return rest.is_empty();
    };
    for part in middle {
        match rest.split_once(part) {
            Some((_, after)) => rest = after,
            None => return false,
        }
    }
    rest.ends_with(last)
}
