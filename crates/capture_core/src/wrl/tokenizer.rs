//! Line tokenizer for WRL text.
//!
//! The producer writes one statement per line, so the grammar is expressed
//! over lines: a line is split on whitespace and only its first token
//! decides what it is. Block and list delimiters (`{ } [ ]`) are recognised
//! only in that first position. Blank lines carry no meaning and are dropped.

use crate::error::{ParseError, ParseResult};

/// One non-blank source line, split on whitespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the source
    pub number: usize,
    pub tokens: Vec<&'a str>,
}

impl<'a> Line<'a> {
    /// First token; never empty because blank lines are dropped.
    pub fn head(&self) -> &'a str {
        self.tokens[0]
    }

    pub fn token(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).copied()
    }

    /// Whether the line opens a `{ ... }` block.
    pub fn opens_block(&self) -> bool {
        self.tokens.last() == Some(&"{")
    }

    /// Whether the line opens a `[ ... ]` list.
    pub fn opens_list(&self) -> bool {
        self.tokens.last() == Some(&"[")
    }

    /// Whether the line closes the current block.
    pub fn closes_block(&self) -> bool {
        self.head() == "}"
    }

    /// Whether the line closes the current list.
    pub fn closes_list(&self) -> bool {
        self.head() == "]"
    }

    /// Require `token` at `index`.
    pub fn expect(&self, index: usize, token: &str) -> ParseResult<()> {
        match self.token(index) {
            Some(found) if found == token => Ok(()),
            found => Err(ParseError::MalformedBlock {
                line: self.number,
                message: format!(
                    "expected '{}' after '{}', found '{}'",
                    token,
                    self.head(),
                    found.unwrap_or("end of line")
                ),
            }),
        }
    }
}

/// Forward-only cursor over the tokenized lines.
#[derive(Clone, Debug)]
pub struct LineCursor<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(content: &'a str) -> Self {
        let lines = content
            .lines()
            .enumerate()
            .filter_map(|(i, text)| {
                let tokens: Vec<&str> = text.split_whitespace().collect();
                (!tokens.is_empty()).then_some(Line {
                    number: i + 1,
                    tokens,
                })
            })
            .collect();

        Self { lines, pos: 0 }
    }

    pub fn peek(&self) -> Option<&Line<'a>> {
        self.lines.get(self.pos)
    }

    /// Take the next line, if any.
    pub fn advance(&mut self) -> Option<Line<'a>> {
        let line = self.lines.get(self.pos).cloned();
        if line.is_some() {
            self.pos += 1;
        }
        line
    }

    /// Take the next line inside a block opened at `opened_at`.
    ///
    /// Running out of lines before the block closes is an error.
    pub fn next_in_block(&mut self, opened_at: usize) -> ParseResult<Line<'a>> {
        self.advance()
            .ok_or(ParseError::UnexpectedEndOfContent { line: opened_at })
    }

    /// Consume lines up to and including the `}` matching a block opened at `opened_at`.
    pub fn skip_block(&mut self, opened_at: usize) -> ParseResult<()> {
        self.skip_nested(opened_at, Line::opens_block, Line::closes_block)
    }

    /// Consume lines up to and including the `]` matching a list opened at `opened_at`.
    pub fn skip_list(&mut self, opened_at: usize) -> ParseResult<()> {
        self.skip_nested(opened_at, Line::opens_list, Line::closes_list)
    }

    fn skip_nested(
        &mut self,
        opened_at: usize,
        opens: fn(&Line<'a>) -> bool,
        closes: fn(&Line<'a>) -> bool,
    ) -> ParseResult<()> {
        let mut depth = 1usize;
        while depth > 0 {
            let line = self.next_in_block(opened_at)?;
            if closes(&line) {
                depth -= 1;
            } else if opens(&line) {
                depth += 1;
            }
        }
        Ok(())
    }
}
