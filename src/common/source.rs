/// A wrapper around the raw source string being parsed, with lazily computed
/// line-break offsets for error reporting.
///
/// Holds a single in-memory string: `mathcore` parses one expression string
/// per `Model::parse` call, so there is no need for file paths or a
/// multi-source registry.
#[derive(Debug, PartialEq, Eq)]
pub struct Code {
    text: String,
    line_breaks: Vec<usize>,
}

impl Code {
    pub fn new(text: impl Into<String>) -> Code {
        let text = text.into();
        let line_breaks = text
            .char_indices()
            .filter(|(_, c)| *c == '\n')
            .map(|(i, _)| i)
            .collect();
        Code { text, line_breaks }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the zero-indexed (line, column) for a byte offset into the source.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line_breaks.partition_point(|&nl| nl < offset);
        let line_start = if line == 0 { 0 } else { self.line_breaks[line - 1] + 1 };
        (line, offset - line_start)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn line_col_first_line() {
        let code = Code::new("abc\ndef\nghi");
        assert_eq!(code.line_col(0), (0, 0));
        assert_eq!(code.line_col(2), (0, 2));
    }

    #[test]
    fn line_col_later_lines() {
        let code = Code::new("abc\ndef\nghi");
        assert_eq!(code.line_col(4), (1, 0));
        assert_eq!(code.line_col(9), (2, 1));
    }
}
