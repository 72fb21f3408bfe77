//! Derived views over a loop collection.
//!
//! Everything here is a pure function of a snapshot. Views borrow from the
//! snapshot and keep its order unless they sort.

use serde::Serialize;

use crate::domain::Loop;

/// Open loops in collection order
pub fn open_loops(loops: &[Loop]) -> Vec<&Loop> {
    loops.iter().filter(|l| l.is_open()).collect()
}

/// Closed loops in collection order
pub fn closed_loops(loops: &[Loop]) -> Vec<&Loop> {
    loops.iter().filter(|l| l.is_closed()).collect()
}

/// Loops carrying `tag`; `None` passes the set through unchanged.
pub fn filter_by_tag<'a>(set: Vec<&'a Loop>, tag: Option<&str>) -> Vec<&'a Loop> {
    match tag {
        Some(tag) => set.into_iter().filter(|l| l.has_tag(tag)).collect(),
        None => set,
    }
}

/// Highest energy first; unspecified counts as 0 and ties keep their order.
pub fn sort_by_energy_desc(mut set: Vec<&Loop>) -> Vec<&Loop> {
    // sort_by_key is stable
    set.sort_by_key(|l| std::cmp::Reverse(l.energy_or_zero()));
    set
}

/// Sum of energy levels over the open loops in `set`
pub fn total_energy_drain<'a, I>(set: I) -> u32
where
    I: IntoIterator<Item = &'a Loop>,
{
    set.into_iter()
        .filter(|l| l.is_open())
        .map(Loop::energy_or_zero)
        .sum()
}

/// The main list: open loops, optionally narrowed to one tag, heaviest first.
pub fn open_board<'a>(loops: &'a [Loop], tag: Option<&str>) -> Vec<&'a Loop> {
    sort_by_energy_desc(filter_by_tag(open_loops(loops), tag))
}

/// Header numbers for a collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    pub open: usize,
    pub closed: usize,
    pub energy_drain: u32,
}

impl LoopStats {
    pub fn compute(loops: &[Loop]) -> Self {
        let open = loops.iter().filter(|l| l.is_open()).count();
        Self {
            open,
            closed: loops.len() - open,
            energy_drain: total_energy_drain(loops),
        }
    }
}
