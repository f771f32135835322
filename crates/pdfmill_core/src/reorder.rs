/// Move the element at `source` to `target`, with the target position
/// interpreted against the list after removal (standard move semantics).
///
/// Total on any input: out-of-range indices leave the list unchanged and
/// `source == target` is the identity.
pub fn move_item<T: Clone>(list: &[T], source: usize, target: usize) -> Vec<T> {
    let mut updated = list.to_vec();
    if source == target || source >= updated.len() {
        return updated;
    }
    let moved = updated.remove(source);
    let target = target.min(updated.len());
    updated.insert(target, moved);
    updated
}
