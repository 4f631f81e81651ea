use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use crate::common::source::Code;

/// A region of a single parsed source string.
///
/// A `mathcore` parse always works over one source string at a time, so
/// `Span` only needs an offset and a length against the shared `Code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    code: Option<Rc<Code>>,
    pub offset: usize,
    pub length: usize,
}

impl Span {
    pub fn new(code: &Rc<Code>, offset: usize, length: usize) -> Span {
        Span { code: Some(Rc::clone(code)), offset, length }
    }

    /// A zero-width span, used for synthesized nodes that have no source text.
    pub fn empty() -> Span {
        Span { code: None, offset: 0, length: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_none()
    }

    /// Combines two spans into the smallest span covering both.
    pub fn combine(a: &Span, b: &Span) -> Span {
        if a.is_empty() {
            return b.clone();
        }
        if b.is_empty() {
            return a.clone();
        }
        let start = a.offset.min(b.offset);
        let end = (a.offset + a.length).max(b.offset + b.length);
        Span { code: a.code.clone(), offset: start, length: end - start }
    }

    pub fn contents(&self) -> &str {
        match &self.code {
            None => "",
            Some(code) => &code.text()[self.offset..self.offset + self.length],
        }
    }

    fn line_col(&self, at: usize) -> (usize, usize) {
        match &self.code {
            None => (0, 0),
            Some(code) => code.line_col(at),
        }
    }
}

impl Display for Span {
    /// Renders a `Line N:M` header followed by the offending source line and
    /// a `^^^` underline.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "<no location>");
        }
        let code = self.code.as_ref().unwrap();
        let (line, col) = self.line_col(self.offset);
        let text = code.text();
        let line_start = text[..self.offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = text[self.offset..]
            .find('\n')
            .map(|i| self.offset + i)
            .unwrap_or(text.len());

        writeln!(f, "Line {}:{}", line + 1, col + 1)?;
        writeln!(f, "  | {}", &text[line_start..line_end])?;
        write!(
            f,
            "  | {}{}",
            " ".repeat(col),
            "^".repeat(self.length.max(1))
        )
    }
}

/// A value annotated with the span of source it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub item: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(item: T, span: Span) -> Spanned<T> {
        Spanned { item, span }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned { item: f(self.item), span: self.span }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn combine_spans() {
        let code = Rc::new(Code::new("hello, world"));
        let a = Span::new(&code, 0, 5);
        let b = Span::new(&code, 7, 5);
        let combined = Span::combine(&a, &b);
        assert_eq!(combined.offset, 0);
        assert_eq!(combined.length, 12);
    }

    #[test]
    fn empty_combine_is_identity() {
        let code = Rc::new(Code::new("abc"));
        let a = Span::new(&code, 1, 2);
        assert_eq!(Span::combine(&a, &Span::empty()), a);
        assert_eq!(Span::combine(&Span::empty(), &a), a);
    }
}
