//! Indentation-delimited text blocks.
//!
//! A block opens with `|`, optionally followed on the same line by an
//! indent specification made of `\t` and `\s` tokens. Each content line
//! must begin with the indentation of the opening line plus that indent;
//! the remainder of the line is content. A line that hits the closing `|`
//! before its required indentation is complete ends the block.
//!
//! ```rust
//! use sigil_format::parse_str;
//!
//! let doc = "  |\n  \tone\n  \t  two\n  |";
//! let values = parse_str(doc).unwrap();
//! assert_eq!(values[0].as_str().unwrap(), "one\n  two");
//! ```

use crate::factory::ValueFactory;
use crate::grammar::BLOCK_CLOSE_SIGN;
use crate::reader::{PositionedReader, Source};
use crate::{Error, Parser, Position, Result, Value};

fn is_line_break(ch: char) -> bool {
    ch == '\r' || ch == '\n'
}

/// Reads `|` text blocks.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextBlockFactory;

impl ValueFactory for TextBlockFactory {
    fn produce(&self, parser: &mut Parser<'_>, start: Position) -> Result<Value> {
        let reader = parser.reader();
        let baseline = reader.line_indent().to_string();

        let spec = reader.read_until(is_line_break)?;
        let indent = decode_indent_spec(spec.trim(), start, reader.position())?;
        read_line_break(reader, start)?;

        let required: Vec<char> = baseline.chars().chain(indent.chars()).collect();
        let mut text = String::new();
        'lines: loop {
            for &expected in &required {
                match reader.peek()? {
                    Some(ch) if ch == expected => {
                        reader.read()?;
                    }
                    Some(BLOCK_CLOSE_SIGN) => {
                        reader.read()?;
                        break 'lines;
                    }
                    Some(ch) => {
                        return Err(Error::malformed(
                            start,
                            reader.position(),
                            format!(
                                "text block line must start with {:?}, found {:?}",
                                required.iter().collect::<String>(),
                                ch
                            ),
                        ))
                    }
                    None => {
                        return Err(Error::unexpected_end(
                            reader.position(),
                            "the closing sign of a text block",
                        ))
                    }
                }
            }
            let line = reader.read_until(is_line_break)?;
            read_line_break(reader, start)?;
            text.push_str(&line);
            text.push('\n');
        }

        if text.ends_with('\n') {
            text.pop();
        }
        Ok(Value::text(text))
    }
}

/// Decodes `\t` and `\s` tokens; an empty specification means one tab.
fn decode_indent_spec(spec: &str, start: Position, end: Position) -> Result<String> {
    if spec.is_empty() {
        return Ok("\t".to_string());
    }
    let invalid = || {
        Error::malformed(
            start,
            end,
            format!("invalid text block indent specification {:?}", spec),
        )
    };
    let mut indent = String::new();
    let mut chars = spec.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            return Err(invalid());
        }
        match chars.next() {
            Some('t') => indent.push('\t'),
            Some('s') => indent.push(' '),
            _ => return Err(invalid()),
        }
    }
    Ok(indent)
}

/// Consumes `\n` or `\r\n`.
fn read_line_break<S: Source>(reader: &mut PositionedReader<S>, start: Position) -> Result<()> {
    match reader.read()? {
        '\r' => match reader.peek()? {
            Some('\n') => {
                reader.read()?;
                Ok(())
            }
            _ => Err(Error::malformed(
                start,
                reader.position(),
                "carriage return not followed by a line feed in text block",
            )),
        },
        _ => Ok(()),
    }
}
