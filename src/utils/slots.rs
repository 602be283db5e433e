//! Disjoint mutable access into flat particle storage.

/// Returns mutable references to two distinct elements, in argument order.
///
/// `None` when the indices are equal or either is out of range.
pub fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> Option<(&mut T, &mut T)> {
    if a == b || a >= items.len() || b >= items.len() {
        return None;
    }

    let (first, second, flipped) = if a < b { (a, b, false) } else { (b, a, true) };
    let (left, right) = items.split_at_mut(second);
    let first_slot = &mut left[first];
    let second_slot = &mut right[0];

    if flipped {
        Some((second_slot, first_slot))
    } else {
        Some((first_slot, second_slot))
    }
}
