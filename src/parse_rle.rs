use std::str::Utf8Error;

use thiserror::Error;
use tracing::warn;

use crate::CellOffset;
use crate::parse_util;
use crate::parse_util::ConvertError;
use crate::parse_util::ParseError;
use crate::rule_set::RuleError;
use crate::rule_set::RuleSet;

#[derive(Debug, Default)]
pub struct RleFile<'a> {
    pub name: Option<&'a [u8]>,
    pub author: Option<&'a [u8]>,

    /// Offset of the pattern's top-left corner, from `#P` or `#R` lines
    pub offset: Option<(CellOffset, CellOffset)>,

    /// Declared `(width, height)` of the pattern, from the header line
    pub size: Option<(u32, u32)>,

    /// Rule from the header line or a `#r` line. `None` means the file did not say.
    pub rule: Option<RuleSet>,
}

#[derive(Debug, Error)]
pub enum RleError {
    #[error("Comment line error: {0}")]
    CommentLine(#[from] RleCommentLineError),

    #[error("Header line error: {0}")]
    HeaderLine(#[from] RleHeaderLineError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] RleEncodingError),
}

/// Parse the RLE file format, calling `f` with the position of every alive cell. Rows grow
/// downwards, so the second row of the pattern is at `y = 1`.
///
/// See: https://conwaylife.com/wiki/Run_Length_Encoded
pub fn read_rle<F>(mut bytes: &'_ [u8], f: F) -> Result<RleFile<'_>, RleError>
where
    F: FnMut(CellOffset, CellOffset),
{
    let mut file = RleFile::default();

    // Parse as many comment lines as possible
    loop {
        bytes = parse_util::take_ws(bytes);

        let (Some(line), rest) = read_line_comment(bytes)? else {
            break;
        };

        match line {
            RleCommentLine::Comment => {}
            RleCommentLine::Name { name } => {
                if file.name.is_some() {
                    warn!("RLE file name already defined. Using latest");
                }

                file.name = Some(name);
            }
            RleCommentLine::Author { author } => {
                if file.author.is_some() {
                    warn!("RLE author already defined. Using latest");
                }

                file.author = Some(author);
            }
            RleCommentLine::Offset { x, y } => {
                if file.offset.is_some() {
                    warn!("RLE offset already defined. Using latest");
                }

                file.offset = Some((x, y))
            }
            RleCommentLine::RuleSet { set } => {
                if file.rule.is_some() {
                    warn!("RLE rule already defined. Using latest");
                }

                file.rule = Some(set);
            }
        }

        bytes = rest;
    }

    // Parse header line, if it's present
    if let (Some(header), rest) = read_line_header(bytes)? {
        let RleHeaderLine {
            width,
            height,
            rule,
        } = header;

        file.size = Some((width, height));

        if let Some(rule) = rule {
            if file.rule.is_some() {
                warn!("RLE rule already defined. Using the header's");
            }

            file.rule = Some(rule);
        }

        bytes = rest;
    }

    let (dx, dy) = file.offset.unwrap_or_default();

    // Parse encoding
    read_encoding(bytes, dx, dy, f)?;

    Ok(file)
}

enum RleCommentLine<'a> {
    Comment,
    Name { name: &'a [u8] },
    Author { author: &'a [u8] },
    Offset { x: CellOffset, y: CellOffset },
    RuleSet { set: RuleSet },
}

#[derive(Debug, Error)]
pub enum RleCommentLineError {
    #[error("No comment type")]
    NoType,

    #[error("Empty name line")]
    EmptyName,

    #[error("Empty author line")]
    EmptyAuthor,

    #[error("Rule is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Invalid coordinates: {0}")]
    InvalidCoord(#[from] RleCoordError),

    #[error("Invalid comment type, found '{got}'")]
    InvalidType { got: char },
}

/// Attempt to parse a comment line, otherwise leaves `bytes` as-is.
fn read_line_comment(
    bytes: &'_ [u8],
) -> Result<(Option<RleCommentLine<'_>>, &'_ [u8]), RleCommentLineError> {
    let Ok(bytes) = parse_util::expect(b'#', bytes) else {
        return Ok((None, bytes));
    };

    let (Some(b), bytes) = parse_util::take_1(bytes) else {
        return Err(RleCommentLineError::NoType);
    };

    match b {
        // Comment line
        b'C' | b'c' => {
            let (_, bytes) = parse_util::take_line(bytes);

            Ok((Some(RleCommentLine::Comment), bytes))
        }

        // Pattern name
        b'N' => {
            let bytes = parse_util::take_inline_ws(bytes);
            let (name, bytes) = parse_util::take_line(bytes);
            let name = name.trim_ascii_end();

            if name.is_empty() {
                return Err(RleCommentLineError::EmptyName);
            }

            Ok((Some(RleCommentLine::Name { name }), bytes))
        }

        // Pattern author
        b'O' => {
            let bytes = parse_util::take_inline_ws(bytes);
            let (author, bytes) = parse_util::take_line(bytes);
            let author = author.trim_ascii_end();

            if author.is_empty() {
                return Err(RleCommentLineError::EmptyAuthor);
            }

            Ok((Some(RleCommentLine::Author { author }), bytes))
        }

        // Pattern offset
        b'R' | b'P' => {
            let (line, bytes) = parse_util::take_line(bytes);
            let (x, y) = read_offset(line)?;

            Ok((Some(RleCommentLine::Offset { x, y }), bytes))
        }

        // Pattern rules, survivals first
        b'r' => {
            let (line, bytes) = parse_util::take_line(bytes);
            let set: RuleSet = std::str::from_utf8(line)?.parse()?;

            Ok((Some(RleCommentLine::RuleSet { set }), bytes))
        }

        b => Err(RleCommentLineError::InvalidType { got: b as char }),
    }
}

struct RleHeaderLine {
    width: u32,
    height: u32,
    rule: Option<RuleSet>,
}

#[derive(Debug, Error)]
pub enum RleHeaderLineError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Empty header field")]
    EmptyField,

    #[error("Unknown header field \"{key}\"")]
    UnknownField { key: String },

    #[error("Header is missing its x field")]
    NoX,

    #[error("Failed to parse x: {0}")]
    ParseX(#[source] ConvertError),

    #[error("Header is missing its y field")]
    NoY,

    #[error("Failed to parse y: {0}")]
    ParseY(#[source] ConvertError),

    #[error("Rule is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),
}

/// Attempt to parse a header line such as `x = 3, y = 3, rule = B3/S23`, otherwise leaves
/// `bytes` as-is.
fn read_line_header(bytes: &[u8]) -> Result<(Option<RleHeaderLine>, &[u8]), RleHeaderLineError> {
    let Some(b'x') = parse_util::peek_1(bytes) else {
        return Ok((None, bytes));
    };

    let (line, bytes) = parse_util::take_line(bytes);

    let (mut width, mut height, mut rule) = (None, None, None);

    for field in line.split(|&b| b == b',') {
        let field = parse_util::take_ws(field);

        let (Some(key), rest) =
            parse_util::take_until_fn(|b| b == b'=' || b.is_ascii_whitespace(), field)
        else {
            return Err(RleHeaderLineError::EmptyField);
        };

        let rest = parse_util::take_ws(rest);
        let value = parse_util::expect(b'=', rest)?;

        match key {
            b"x" => {
                width = Some(parse_util::convert(value).map_err(RleHeaderLineError::ParseX)?);
            }
            b"y" => {
                height = Some(parse_util::convert(value).map_err(RleHeaderLineError::ParseY)?);
            }
            b"rule" => {
                rule = Some(std::str::from_utf8(value)?.parse::<RuleSet>()?);
            }
            key => {
                return Err(RleHeaderLineError::UnknownField {
                    key: String::from_utf8_lossy(key).to_string(),
                });
            }
        }
    }

    let width = width.ok_or(RleHeaderLineError::NoX)?;
    let height = height.ok_or(RleHeaderLineError::NoY)?;

    let line = RleHeaderLine {
        width,
        height,
        rule,
    };

    Ok((Some(line), bytes))
}

#[derive(Debug, Error)]
pub enum RleEncodingError {
    #[error("Unexpected EOF, expected '!'")]
    UnexpectedEof,

    #[error("Failed to convert run length: {0}")]
    RunLength(#[from] ConvertError),

    #[error("Run length must be at least 1")]
    ZeroRunLength,

    #[error("Cell ({x}, {y}) is outside of the grid")]
    OutOfRange { x: i64, y: i64 },

    #[error("Unrecognized byte: 0x{got:0X}")]
    UnrecognizedByte { got: u8 },
}

fn read_encoding<F>(
    mut bytes: &[u8],
    dx: CellOffset,
    dy: CellOffset,
    mut f: F,
) -> Result<(), RleEncodingError>
where
    F: FnMut(CellOffset, CellOffset),
{
    let mut rep: u32 = 1;

    let (mut x, mut y): (i64, i64) = (0, 0);

    loop {
        let Some(b) = parse_util::peek_1(bytes) else {
            return Err(RleEncodingError::UnexpectedEof);
        };

        match b {
            w if w.is_ascii_whitespace() => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;
            }

            // End of input
            b'!' => break,

            // Dead cell
            b'b' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                x += i64::from(rep);

                rep = 1;
            }

            // Live cell
            b'o' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                for i in 0..i64::from(rep) {
                    let (cx, cy) = cell_at(dx, dy, x + i, y)?;
                    f(cx, cy)
                }

                x += i64::from(rep);

                rep = 1;
            }

            // End of line
            b'$' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                y += i64::from(rep);
                x = 0;

                rep = 1;
            }

            n if n.is_ascii_digit() => {
                let (Some(n), rest) = parse_util::take_until_fn(|b| !b.is_ascii_digit(), bytes)
                else {
                    unreachable!("We peeked and found a digit")
                };
                bytes = rest;

                rep = parse_util::convert(n)?;

                if rep == 0 {
                    return Err(RleEncodingError::ZeroRunLength);
                }
            }

            b => return Err(RleEncodingError::UnrecognizedByte { got: b }),
        }
    }

    Ok(())
}

/// Place pattern position `(x, y)` relative to `(dx, dy)`.
fn cell_at(
    dx: CellOffset,
    dy: CellOffset,
    x: i64,
    y: i64,
) -> Result<(CellOffset, CellOffset), RleEncodingError> {
    let (x, y) = (i64::from(dx) + x, i64::from(dy) + y);

    match (CellOffset::try_from(x), CellOffset::try_from(y)) {
        (Ok(x), Ok(y)) => Ok((x, y)),
        _ => Err(RleEncodingError::OutOfRange { x, y }),
    }
}

#[derive(Debug, Error)]
pub enum RleCoordError {
    #[error("Expected x coordinate, found end of line")]
    NoX,

    #[error("Failed to parse x coordinate: {0}")]
    ParseX(#[source] ConvertError),

    #[error("Expected y coordinate, found end of line")]
    NoY,

    #[error("Failed to parse y coordinate: {0}")]
    ParseY(#[source] ConvertError),
}

/// Read the two whitespace separated coordinates of a `#P x y` line.
fn read_offset(bytes: &[u8]) -> Result<(CellOffset, CellOffset), RleCoordError> {
    let bytes = parse_util::take_inline_ws(bytes);
    let (Some(x_bytes), bytes) = parse_util::take_until_ws(bytes) else {
        return Err(RleCoordError::NoX);
    };
    let x = parse_util::convert(x_bytes).map_err(RleCoordError::ParseX)?;

    let bytes = parse_util::take_inline_ws(bytes);
    let (Some(y_bytes), _) = parse_util::take_until_ws(bytes) else {
        return Err(RleCoordError::NoY);
    };
    let y = parse_util::convert(y_bytes).map_err(RleCoordError::ParseY)?;

    Ok((x, y))
}
