use crate::syntax::ast::{Comment, Stmt};
use crate::utils::Spanned;

/// Comments lying between `target` and the statement before it.
///
/// `siblings` is the block holding `target`, which is found by identity.
/// When `target` opens the block the lower bound is `floor`, the offset at
/// which the block starts.
pub fn associated_comments<'c>(
    comments: &'c [Comment],
    siblings: &[Spanned<Stmt>],
    floor: usize,
    target: &Spanned<Stmt>,
) -> Vec<&'c Comment> {
    let min = siblings
        .iter()
        .position(|stmt| std::ptr::eq(stmt, target))
        .and_then(|i| i.checked_sub(1))
        .map_or(floor, |prev| siblings[prev].end());

    comments
        .iter()
        .filter(|c| c.location.start >= min && c.location.end <= target.start())
        .collect()
}
