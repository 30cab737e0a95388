use crate::error::{SyntaxError, SyntaxErrorKind};

/// A position in the source text.
///
/// Rows are 1-based. Columns count the characters already read on the
/// current row, so the first character of a row sits at column 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// 1-based row.
    pub row:    usize,
    /// 0-based column.
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// Character reader over UTF-8 text.
///
/// Reading past the end of the input is not an error: `peek()` and `read()`
/// simply keep returning `None`, which acts as the end-of-input marker.
///
/// # Example
/// ```
/// use qformula::interpreter::input_stream::{InputStream, Position};
///
/// let mut stream = InputStream::new("a\nb");
/// assert_eq!(stream.read(), Some('a'));
/// assert_eq!(stream.read(), Some('\n'));
/// assert_eq!(stream.get_position(), Position::new(2, 0));
/// assert_eq!(stream.read(), Some('b'));
/// assert_eq!(stream.read(), None);
/// ```
#[derive(Debug, Clone)]
pub struct InputStream {
    input:    Vec<char>,
    offset:   usize,
    position: Position,
    previous: Position,
}

impl InputStream {
    /// Creates a stream positioned before the first character.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self { input:    input.chars().collect(),
               offset:   0,
               position: Position::default(),
               previous: Position::default(), }
    }

    /// Returns the next character without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.input.get(self.offset).copied()
    }

    /// Looks `n` characters ahead without consuming anything; `peek_nth(0)`
    /// is the same as `peek()`.
    #[must_use]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.input.get(self.offset + n).copied()
    }

    /// Consumes and returns the next character.
    ///
    /// Reading a newline moves the position to column 0 of the next row.
    pub fn read(&mut self) -> Option<char> {
        let current = self.peek()?;
        self.previous = self.position;
        self.offset += 1;

        if current == '\n' {
            self.position.row += 1;
            self.position.column = 0;
        } else {
            self.position.column += 1;
        }

        Some(current)
    }

    /// Returns the current position.
    #[must_use]
    pub const fn get_position(&self) -> Position {
        self.position
    }

    /// Returns `true` once every character has been consumed.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.input.len()
    }

    /// Builds a syntax error located before the most recent `read()`, which
    /// is where the offending token started.
    #[must_use]
    pub const fn die(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(kind, self.previous)
    }
}
