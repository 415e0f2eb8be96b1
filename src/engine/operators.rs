//! Relational operators over typed records
//!
//! Sorts are stable and place null keys after every non-null key in both
//! directions. Grouped outputs come out in ascending key order.

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

fn compare_nulls_last<K: Ord>(a: Option<K>, b: Option<K>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Ascending => a.cmp(&b),
            SortOrder::Descending => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_stable<T, K, F>(rows: &mut [T], key: F, order: SortOrder)
where
    K: Ord,
    F: Fn(&T) -> Option<K>,
{
    rows.sort_by(|a, b| compare_nulls_last(key(a), key(b), order));
}

/// Stable sort by `key`, then keep the first `n` rows.
pub fn top_n<T, K, F>(mut rows: Vec<T>, key: F, order: SortOrder, n: usize) -> Vec<T>
where
    K: Ord,
    F: Fn(&T) -> Option<K>,
{
    sort_stable(&mut rows, key, order);
    rows.truncate(n);
    rows
}

/// Per-group aggregates: value sum, row count and distinct member count.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotals {
    pub key: String,
    pub sum: Decimal,
    pub count: u64,
    pub distinct: u64,
}

#[derive(Default)]
struct Accumulator<'a> {
    sum: Decimal,
    count: u64,
    members: HashSet<&'a str>,
}

/// Partition `rows` by `key` and aggregate. Rows with a null key form the
/// empty-label group so sums across groups equal the ungrouped sum. Null
/// values are skipped by the sum but still counted; null members are not
/// counted as distinct.
pub fn group_aggregate<'a, T, K, V, M>(rows: &'a [T], key: K, value: V, member: M) -> Vec<GroupTotals>
where
    K: Fn(&'a T) -> Option<&'a str>,
    V: Fn(&T) -> Option<Decimal>,
    M: Fn(&'a T) -> Option<&'a str>,
{
    let mut groups: BTreeMap<&'a str, Accumulator<'a>> = BTreeMap::new();
    for row in rows {
        let acc = groups.entry(key(row).unwrap_or("")).or_default();
        if let Some(v) = value(row) {
            acc.sum += v;
        }
        acc.count += 1;
        if let Some(m) = member(row) {
            acc.members.insert(m);
        }
    }

    groups
        .into_iter()
        .map(|(key, acc)| GroupTotals {
            key: key.to_string(),
            sum: acc.sum,
            count: acc.count,
            distinct: acc.members.len() as u64,
        })
        .collect()
}

/// Left outer join on a text key. Every left row appears at least once;
/// unmatched rows pair with `None`, and a key present several times on the
/// right repeats the left row once per match. Null keys never match.
pub fn left_join<'l, 'r, L, R, LK, RK>(
    left: &'l [L],
    right: &'r [R],
    left_key: LK,
    right_key: RK,
) -> Vec<(&'l L, Option<&'r R>)>
where
    LK: Fn(&'l L) -> Option<&'l str>,
    RK: Fn(&'r R) -> Option<&'r str>,
{
    let mut index: HashMap<&'r str, Vec<&'r R>> = HashMap::new();
    for row in right {
        if let Some(k) = right_key(row) {
            index.entry(k).or_default().push(row);
        }
    }

    let mut joined = Vec::with_capacity(left.len());
    for row in left {
        match left_key(row).and_then(|k| index.get(k)) {
            Some(matches) => joined.extend(matches.iter().map(|m| (row, Some(*m)))),
            None => joined.push((row, None)),
        }
    }
    joined
}

/// `total / count`, or zero when there is nothing to divide by.
pub fn safe_ratio(total: Decimal, count: u64) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}
