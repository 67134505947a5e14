use std::rc::Rc;

use crate::Position;

/// Line-buffered character cursor over an input text stream.
///
/// The cursor is addressed by (line, column); columns are byte offsets into
/// the current line. A line never includes its terminator, so running off the
/// end of a line is a distinct state (`at_line_end`) from running off the end
/// of the input (`at_eof`); the lexer turns the former into Newline tokens.
pub struct SourceCursor {
    lines: Vec<String>,
    line: usize,
    column: usize,
    file: Rc<String>,
}

impl SourceCursor {
    pub fn new(source: &str, file: Option<String>) -> Self {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("session"))
        };

        let mut lines: Vec<String> = source
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();

        // A trailing terminator produces a phantom empty line; drop it.
        if lines.len() > 1 && lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        SourceCursor {
            lines,
            line: 0,
            column: 0,
            file: file_name,
        }
    }

    pub fn at_eof(&self) -> bool {
        self.line >= self.lines.len()
    }

    pub fn at_line_end(&self) -> bool {
        !self.at_eof() && self.column >= self.lines[self.line].len()
    }

    /// Remainder of the current line from the cursor onwards.
    pub fn rest(&self) -> &str {
        if self.at_eof() {
            ""
        } else {
            &self.lines[self.line][self.column..]
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peeks the nth character after the cursor on the current line.
    pub fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.column += c.len_utf8();
        Some(c)
    }

    /// Advances by `n` bytes within the current line.
    pub fn advance_n(&mut self, n: usize) {
        self.column += n;
    }

    /// Moves to the start of the next physical line.
    pub fn next_line(&mut self) {
        self.line += 1;
        self.column = 0;
    }

    /// The cursor's current (line, column) position, 1-based.
    pub fn position(&self) -> Position {
        Position(
            (self.line + 1) as u32,
            (self.column + 1) as u32,
            Rc::clone(&self.file),
        )
    }

    pub fn file(&self) -> Rc<String> {
        Rc::clone(&self.file)
    }
}
