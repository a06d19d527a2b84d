// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! INP command block tokenizer using nom combinators
//!
//! Parses a single scanned block (comments already removed) into tokens.

use doe2_lite_model::InpValue;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit0, digit1, multispace0, multispace1},
    combinator::{eof, map, not, opt, peek, recognize},
    error::{Error, ErrorKind},
    multi::{many0, separated_list0, separated_list1},
    sequence::preceded,
    IResult, Parser,
};

/// Raw token from an INP block (before conversion to InpValue)
#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    /// Numeric literal
    Number(f64),
    /// Quoted string ("text"), quotes removed
    String(&'a str),
    /// Bare word
    Symbol(&'a str),
    /// List of tokens
    List(Vec<Token<'a>>),
    /// Expression ({...}), braces removed
    Expression(&'a str),
}

impl<'a> Token<'a> {
    /// Convert token to owned InpValue
    pub fn to_inp_value(&self) -> InpValue {
        match self {
            Token::Number(n) => InpValue::Number(*n),
            Token::String(s) => InpValue::String((*s).to_string()),
            Token::Symbol(s) => InpValue::Symbol((*s).to_string()),
            Token::List(items) => InpValue::List(items.iter().map(|t| t.to_inp_value()).collect()),
            Token::Expression(e) => InpValue::Expression((*e).to_string()),
        }
    }
}

/// A tokenized command block
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedBlock<'a> {
    /// `"U-NAME" = COMMAND [LIKE "Other"]` followed by field assignments
    Object {
        name: &'a str,
        command: &'a str,
        like: Option<&'a str>,
        fields: Vec<(&'a str, Token<'a>)>,
    },
    /// `PARAMETER` followed by `"NAME" = value` assignments
    Parameters(Vec<(&'a str, Token<'a>)>),
}

/// Why a block could not be tokenized
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockError {
    /// 0-based line within the block
    pub line_offset: usize,
    pub message: String,
}

// ============================================================================
// Parsing Primitives
// ============================================================================

/// Parse whitespace (comments are removed by the scanner)
fn ws(input: &str) -> IResult<&str, ()> {
    let (input, _) = multispace0(input)?;
    Ok((input, ()))
}

fn is_keyword_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '/' | '_' | ':' | '&')
}

fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b',' | b'(' | b')' | b'=' | b'"' | b'{' | b'}')
}

/// Parse a keyword (SHAPE, FLOW/AREA, C-SUB-SYSTEM-TYPE)
fn keyword(input: &str) -> IResult<&str, &str> {
    take_while1(is_keyword_char)(input)
}

/// Parse a quoted string's content
fn quoted(input: &str) -> IResult<&str, &str> {
    let (input, _) = char('"')(input)?;
    match input.find('"') {
        Some(end) => Ok((&input[end + 1..], &input[..end])),
        None => Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    }
}

/// Parse an object or parameter name (quoted or bare)
fn name(input: &str) -> IResult<&str, &str> {
    alt((quoted, keyword)).parse(input)
}

/// Check that a value ends here (delimiter, terminator or end of block)
fn value_end(input: &str) -> IResult<&str, ()> {
    if input.is_empty() {
        return Ok((input, ()));
    }
    alt((
        map(multispace1, |_| ()),
        map(char(','), |_| ()),
        map(char(')'), |_| ()),
        map(tag(".."), |_| ()),
    ))
    .parse(input)
}

/// Parse a number (integer, decimal or scientific)
fn number(input: &str) -> IResult<&str, Token<'_>> {
    let (rest, num_str) = recognize((
        opt(alt((char('-'), char('+')))),
        alt((
            recognize((digit1, opt(preceded(not(tag("..")), (char('.'), digit0))))),
            recognize((char('.'), digit1)),
        )),
        opt((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            digit1,
        )),
    ))
    .parse(input)?;

    // Reject things like 1ST-FLOOR; they are symbols
    let (rest, _) = peek(value_end).parse(rest)?;

    // lexical-core for speed, std as fallback for forms like "5."
    let parsed = lexical_core::parse::<f64>(num_str.as_bytes())
        .ok()
        .or_else(|| num_str.parse::<f64>().ok());

    match parsed {
        Some(n) => Ok((rest, Token::Number(n))),
        None => Err(nom::Err::Error(Error::new(input, ErrorKind::Float))),
    }
}

/// Parse a bare symbol (YES, EXTERIOR-WALL, &D)
///
/// Stops at delimiters and at the `..` terminator.
fn symbol(input: &str) -> IResult<&str, Token<'_>> {
    let bytes = input.as_bytes();
    let mut end = 0;
    while end < bytes.len() {
        let b = bytes[end];
        if is_delimiter(b) || (b == b'.' && bytes.get(end + 1) == Some(&b'.')) {
            break;
        }
        end += 1;
    }

    if end == 0 {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::TakeWhile1)));
    }
    Ok((&input[end..], Token::Symbol(&input[..end])))
}

/// Parse an eQuest starred text (*Office (General)*), stars removed
fn starred(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('*')(input)?;
    match input.find('*') {
        Some(end) => Ok((&input[end + 1..], Token::String(&input[..end]))),
        None => Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    }
}

/// Parse an expression ({...})
fn expression(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('{')(input)?;
    match input.find('}') {
        Some(end) => Ok((&input[end + 1..], Token::Expression(input[..end].trim()))),
        None => Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    }
}

/// Parse a list item separator (comma or plain whitespace)
fn list_separator(input: &str) -> IResult<&str, ()> {
    alt((map((ws, char(','), ws), |_| ()), map(multispace1, |_| ()))).parse(input)
}

/// Deepest list or parenthesis nesting accepted in a value
pub(crate) const MAX_NESTING: usize = 64;

/// Parse a list of tokens, tolerating a trailing comma
fn list<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Token<'a>> {
    let (input, _) = (char('('), ws).parse(input)?;
    if depth >= MAX_NESTING {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
    }
    let (input, items) =
        separated_list0(list_separator, |i: &'a str| nested_value(i, depth + 1)).parse(input)?;
    let (input, _) = (ws, opt((char(','), ws)), char(')')).parse(input)?;
    Ok((input, Token::List(items)))
}

/// Parse any value
fn value(input: &str) -> IResult<&str, Token<'_>> {
    nested_value(input, 0)
}

fn nested_value<'a>(input: &'a str, depth: usize) -> IResult<&'a str, Token<'a>> {
    alt((
        map(quoted, Token::String),
        starred,
        expression,
        |i: &'a str| list(i, depth),
        number,
        symbol,
    ))
    .parse(input)
}

/// Parse `KEYWORD = value`
fn field(input: &str) -> IResult<&str, (&str, Token<'_>)> {
    let (input, key) = keyword(input)?;
    let (input, _) = (ws, char('='), ws).parse(input)?;
    let (input, val) = value(input)?;
    Ok((input, (key, val)))
}

/// Parse `"NAME" = value`
fn parameter(input: &str) -> IResult<&str, (&str, Token<'_>)> {
    let (input, key) = name(input)?;
    let (input, _) = (ws, char('='), ws).parse(input)?;
    let (input, val) = value(input)?;
    Ok((input, (key, val)))
}

// ============================================================================
// Block Parsing
// ============================================================================

fn parameter_block(input: &str) -> IResult<&str, ParsedBlock<'_>> {
    let (input, _) = (tag("PARAMETER"), multispace1).parse(input)?;
    let (input, assignments) = separated_list1(multispace1, parameter).parse(input)?;
    Ok((input, ParsedBlock::Parameters(assignments)))
}

fn object_block(input: &str) -> IResult<&str, ParsedBlock<'_>> {
    let (input, name) = name(input)?;
    let (input, _) = (ws, char('='), ws).parse(input)?;
    let (input, command) = keyword(input)?;
    let (input, like) =
        opt(preceded((multispace1, tag("LIKE"), multispace1), quoted)).parse(input)?;
    let (input, fields) = many0(preceded(ws, field)).parse(input)?;
    Ok((
        input,
        ParsedBlock::Object {
            name,
            command,
            like,
            fields,
        },
    ))
}

fn block(input: &str) -> IResult<&str, ParsedBlock<'_>> {
    let (input, _) = ws(input)?;
    let (input, parsed) = alt((parameter_block, object_block)).parse(input)?;
    let (input, _) = (ws, tag(".."), ws, eof).parse(input)?;
    Ok((input, parsed))
}

/// Parse a complete command block
///
/// Format:
///
/// ```text
/// "U-NAME" = COMMAND
///    KEYWORD = value
///    ..
/// ```
pub fn parse_block(input: &str) -> Result<ParsedBlock<'_>, BlockError> {
    block(input)
        .map(|(_, parsed)| parsed)
        .map_err(|e| describe_error(input, e))
}

/// Turn a nom error into a message pointing at the offending text
fn describe_error(input: &str, err: nom::Err<Error<&str>>) -> BlockError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let rest = e.input.trim_start();
            let consumed = &input[..input.len() - rest.len()];
            let line_offset = consumed.matches('\n').count();
            if e.code == ErrorKind::TooLarge {
                return BlockError {
                    line_offset,
                    message: format!("values nested deeper than {} levels", MAX_NESTING),
                };
            }
            let snippet: String = rest
                .lines()
                .next()
                .unwrap_or_default()
                .chars()
                .take(40)
                .collect();
            let message = if snippet.is_empty() {
                "unexpected end of block".to_string()
            } else {
                format!("unexpected input {:?}", snippet)
            };
            BlockError {
                line_offset,
                message,
            }
        }
        nom::Err::Incomplete(_) => BlockError {
            line_offset: 0,
            message: "incomplete block".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quoted() {
        let (remaining, token) = value("\"Core Spc (G.1)\" rest").unwrap();
        assert_eq!(remaining, " rest");
        assert_eq!(token, Token::String("Core Spc (G.1)"));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(value("42 ").unwrap().1, Token::Number(42.0));
        assert_eq!(value("-0.25,").unwrap().1, Token::Number(-0.25));
        assert_eq!(value(".5)").unwrap().1, Token::Number(0.5));
        assert_eq!(value("1.5E-3").unwrap().1, Token::Number(0.0015));
    }

    #[test]
    fn test_number_before_terminator() {
        let (remaining, token) = value("5..").unwrap();
        assert_eq!(token, Token::Number(5.0));
        assert_eq!(remaining, "..");
    }

    #[test]
    fn test_number_like_symbol() {
        assert_eq!(value("1ST-FLOOR ").unwrap().1, Token::Symbol("1ST-FLOOR"));
    }

    #[test]
    fn test_parse_starred_text() {
        let (remaining, token) = value("*Office (General)*\n").unwrap();
        assert_eq!(token, Token::String("Office (General)"));
        assert_eq!(remaining, "\n");
    }

    #[test]
    fn test_parse_symbol() {
        assert_eq!(value("EXTERIOR-WALL\n").unwrap().1, Token::Symbol("EXTERIOR-WALL"));
        let (remaining, token) = value("YES ..").unwrap();
        assert_eq!(token, Token::Symbol("YES"));
        assert_eq!(remaining, " ..");
    }

    #[test]
    fn test_parse_list() {
        let (remaining, token) = value("( 0, 10.5 )").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(token, Token::List(vec![Token::Number(0.0), Token::Number(10.5)]));
    }

    #[test]
    fn test_parse_multiline_list_trailing_comma() {
        let (_, token) = value("(\n      \"Wk A\",\n      &D,\n      \"Wk B\",\n   )").unwrap();
        assert_eq!(
            token,
            Token::List(vec![
                Token::String("Wk A"),
                Token::Symbol("&D"),
                Token::String("Wk B"),
            ])
        );
    }

    #[test]
    fn test_parse_nested_list() {
        let (_, token) = value("((1, 2), (3, 4))").unwrap();
        if let Token::List(items) = token {
            assert_eq!(items.len(), 2);
            assert!(matches!(items[0], Token::List(_)));
        } else {
            panic!("Expected list");
        }
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}1{} ", "(".repeat(depth), ")".repeat(depth));
        assert!(value(&nested(MAX_NESTING)).is_ok());

        let block = format!("\"X\" = SPACE\n   V = {}\n   ..\n", nested(MAX_NESTING + 1));
        let err = parse_block(&block).unwrap_err();
        assert_eq!(err.line_offset, 1);
        assert_eq!(err.message, format!("values nested deeper than {} levels", MAX_NESTING));
    }

    #[test]
    fn test_parse_expression() {
        let (_, token) = value("{ 0.66 * #PA(\"Height\") }").unwrap();
        assert_eq!(token, Token::Expression("0.66 * #PA(\"Height\")"));
    }

    #[test]
    fn test_parse_object_block() {
        let block = "\"L1 Spc\" = SPACE\n   SHAPE = POLYGON\n   AREA = 120.5\n   ..\n";
        match parse_block(block).unwrap() {
            ParsedBlock::Object {
                name,
                command,
                like,
                fields,
            } => {
                assert_eq!(name, "L1 Spc");
                assert_eq!(command, "SPACE");
                assert_eq!(like, None);
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[1], ("AREA", Token::Number(120.5)));
            }
            other => panic!("Expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_like_header() {
        let block = "\"Spc 2\" = SPACE LIKE \"Spc 1\"\n   Z = 3 ..\n";
        match parse_block(block).unwrap() {
            ParsedBlock::Object { like, fields, .. } => {
                assert_eq!(like, Some("Spc 1"));
                assert_eq!(fields, vec![("Z", Token::Number(3.0))]);
            }
            other => panic!("Expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_keywordless_object() {
        let block = "\"Site\" = SITE-PARAMETERS\n   ..\n";
        match parse_block(block).unwrap() {
            ParsedBlock::Object { fields, .. } => assert!(fields.is_empty()),
            other => panic!("Expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_parameter_block() {
        let block = "PARAMETER\n   \"Flr Height\" = 12\n   ..\n";
        assert_eq!(
            parse_block(block).unwrap(),
            ParsedBlock::Parameters(vec![("Flr Height", Token::Number(12.0))])
        );
    }

    #[test]
    fn test_malformed_block() {
        let block = "SET-DEFAULT FOR SPACE\n   AREA/PERSON = 200\n   ..\n";
        let err = parse_block(block).unwrap_err();
        assert!(err.message.contains("unexpected input"));
    }

    #[test]
    fn test_error_points_at_line() {
        let block = "\"X\" = SPACE\n   AREA = 1\n   = 2\n   ..\n";
        let err = parse_block(block).unwrap_err();
        assert_eq!(err.line_offset, 2);
    }
}
