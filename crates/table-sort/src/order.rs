//! Index-based ordering primitives.
//!
//! `slice::sort_by` requires a comparator that implements a strict total order and may panic
//! otherwise. The table comparators report "equal" for pairs they refuse to judge,
//! which is not transitive, so ordering is computed with a bottom-up merge sort over row indices
//! that accepts any comparator, then applied to the rows as a permutation.

use std::cmp::Ordering;

/// Computes the order of `len` items under `cmp`, returning `order[position] = original index`.
///
/// Runs `O(n log n)` comparisons, never panics on inconsistent comparators, and stops at the
/// first comparator error.
pub(crate) fn merge_sort_indices<E, F>(len: usize, mut cmp: F) -> Result<Vec<usize>, E>
where
    F: FnMut(usize, usize) -> Result<Ordering, E>,
{
    let mut order: Vec<usize> = (0..len).collect();
    if len < 2 {
        return Ok(order);
    }

    let mut scratch = order.clone();
    let mut width = 1;
    while width < len {
        let mut start = 0;
        while start < len {
            let mid = start.saturating_add(width).min(len);
            let end = start.saturating_add(width.saturating_mul(2)).min(len);
            merge(
                &order[start..mid],
                &order[mid..end],
                &mut scratch[start..end],
                &mut cmp,
            )?;
            start = end;
        }
        std::mem::swap(&mut order, &mut scratch);
        width = width.saturating_mul(2);
    }

    Ok(order)
}

fn merge<E, F>(left: &[usize], right: &[usize], out: &mut [usize], cmp: &mut F) -> Result<(), E>
where
    F: FnMut(usize, usize) -> Result<Ordering, E>,
{
    let (mut i, mut j, mut k) = (0, 0, 0);
    while i < left.len() && j < right.len() {
        // Only a strictly greater left side yields to the right, so ties keep input order.
        if cmp(left[i], right[j])? == Ordering::Greater {
            out[k] = right[j];
            j += 1;
        } else {
            out[k] = left[i];
            i += 1;
        }
        k += 1;
    }

    let rest_left = left.len() - i;
    out[k..k + rest_left].copy_from_slice(&left[i..]);
    k += rest_left;
    out[k..].copy_from_slice(&right[j..]);
    Ok(())
}

/// Rearranges `items` so that position `p` holds the element previously at `order[p]`.
///
/// `order` must be a permutation of `0..items.len()`.
pub(crate) fn apply_permutation<T>(items: &mut [T], order: &[usize]) {
    debug_assert_eq!(items.len(), order.len());

    let mut placed = vec![false; items.len()];
    for start in 0..items.len() {
        if placed[start] {
            continue;
        }
        let mut current = start;
        loop {
            placed[current] = true;
            let next = order[current];
            if next == start {
                break;
            }
            items.swap(current, next);
            current = next;
        }
    }
}
