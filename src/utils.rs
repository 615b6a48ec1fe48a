use crate::syntax::lexer::SourceLoc;

/// A source node together with the location it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub target: T,
    pub location: SourceLoc,
}

pub fn spanned<T>(target: T, location: SourceLoc) -> Spanned<T> {
    Spanned { target, location }
}

/// Helpful functions to work with `Spanned` values
impl<T> Spanned<T> {
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Spanned<U> {
        Spanned {
            target: f(self.target),
            location: self.location,
        }
    }

    pub fn start(&self) -> usize {
        self.location.start
    }

    pub fn end(&self) -> usize {
        self.location.end
    }
}
