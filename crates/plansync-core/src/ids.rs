//! Natural numeric ordering for dot-separated ids (`"1.9" < "1.10"`).

use std::cmp::Ordering;

/// Compare two ids segment by segment, numerically where both segments are
/// numbers. Non-numeric segments sort after numeric ones and compare as text.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(ln), Ok(rn)) => ln.cmp(&rn),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Sort a list of ids in place using [`natural_cmp`].
pub fn sort_natural(ids: &mut [String]) {
    ids.sort_by(|a, b| natural_cmp(a, b));
}

/// Split a task id of the form `{phase}.{index}` into its two numbers.
pub fn parse_task_id(id: &str) -> Option<(u32, u32)> {
    let (phase, index) = id.split_once('.')?;
    let phase = phase.parse::<u32>().ok()?;
    let index = index.parse::<u32>().ok()?;
    Some((phase, index))
}
