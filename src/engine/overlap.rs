use crate::model::Window;

/// The booking collision predicate: true iff `b.start` falls within
/// `[a.start, a.end]` or `b.end` falls within `[a.start, a.end]`,
/// inclusive on both ends.
///
/// This is an endpoint-containment test, not a true interval
/// intersection: it does NOT report the case where `b` strictly contains
/// `a` without either endpoint landing inside `a`. The asymmetry is kept
/// deliberately — committed data was validated under this exact rule, and
/// widening it to true intersection is a behavioral change needing
/// sign-off. Callers pass the committed meeting's window as `a` and the
/// candidate as `b`.
pub fn overlaps(a: &Window, b: &Window) -> bool {
    a.contains(b.start) || a.contains(b.end)
}
