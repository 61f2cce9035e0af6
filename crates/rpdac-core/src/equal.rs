// ── Order-insensitive collection equality ──
//
// Both sides are copied, sorted by key and compared pairwise. `None` is
// only equal to `None`; in particular `None != Some(vec![])`.

/// An element of a collection compared as a set.
pub trait SetMember {
    /// Sort key. Expected to be unique within one collection.
    fn set_key(&self) -> String;

    fn same_as(&self, other: &Self) -> bool;
}

impl SetMember for String {
    fn set_key(&self) -> String {
        self.clone()
    }

    fn same_as(&self, other: &Self) -> bool {
        self == other
    }
}

/// Compare two optional collections ignoring element order.
pub fn sets_equal<T: SetMember>(left: Option<&[T]>, right: Option<&[T]>) -> bool {
    let (left, right) = match (left, right) {
        (Some(l), Some(r)) => (l, r),
        (None, None) => return true,
        _ => return false,
    };

    if left.len() != right.len() {
        return false;
    }

    let left = sorted(left);
    let right = sorted(right);

    left.iter().zip(&right).all(|(l, r)| l.same_as(r))
}

fn sorted<T: SetMember>(items: &[T]) -> Vec<&T> {
    let mut refs: Vec<&T> = items.iter().collect();
    refs.sort_by_cached_key(|item| item.set_key());
    refs
}
