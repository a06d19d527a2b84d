// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Evaluation of inline math expressions referencing global parameters
//!
//! Handles `{...}` expressions made of numbers, `+ - * /`, parentheses,
//! unary signs and `#PA("NAME")` parameter references. Anything else
//! (`#SI`, `#L`, `IF`, `SWITCH`, ...) is left unevaluated.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{all_consuming, opt, recognize},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, preceded},
    IResult, Parser,
};
use crate::tokenizer::MAX_NESTING;
use rustc_hash::FxHashMap;

/// Numeric global parameters by name
pub type ParameterValues = FxHashMap<String, f64>;

/// Evaluate an expression (braces already removed)
///
/// Returns `None` when the expression uses unsupported syntax, references
/// an unknown parameter, nests too deeply or does not produce a finite number.
pub fn evaluate(expr: &str, parameters: &ParameterValues) -> Option<f64> {
    let evaluator = Evaluator { parameters };
    let (_, value) = evaluator.expression(expr).ok()?;
    value.is_finite().then_some(value)
}

struct Evaluator<'p> {
    parameters: &'p ParameterValues,
}

impl Evaluator<'_> {
    /// The whole input, surrounding whitespace allowed
    fn expression<'a>(&self, input: &'a str) -> IResult<&'a str, f64> {
        all_consuming(delimited(
            multispace0,
            |i: &'a str| self.sum(i, 0),
            multispace0,
        ))
        .parse(input)
    }

    /// sum := product (('+' | '-') product)*
    fn sum<'a>(&self, input: &'a str, depth: usize) -> IResult<&'a str, f64> {
        let (input, first) = self.product(input, depth)?;
        let (input, rest) = many0((
            delimited(multispace0, one_of("+-"), multispace0),
            |i: &'a str| self.product(i, depth),
        ))
        .parse(input)?;

        let value = rest.into_iter().fold(first, |acc, (op, v)| match op {
            '+' => acc + v,
            _ => acc - v,
        });
        Ok((input, value))
    }

    /// product := factor (('*' | '/') factor)*
    fn product<'a>(&self, input: &'a str, depth: usize) -> IResult<&'a str, f64> {
        let (input, first) = self.factor(input, depth)?;
        let (input, rest) = many0((
            delimited(multispace0, one_of("*/"), multispace0),
            |i: &'a str| self.factor(i, depth),
        ))
        .parse(input)?;

        let value = rest.into_iter().fold(first, |acc, (op, v)| match op {
            '*' => acc * v,
            _ => acc / v,
        });
        Ok((input, value))
    }

    /// factor := number | parameter | '(' sum ')' | signed
    fn factor<'a>(&self, input: &'a str, depth: usize) -> IResult<&'a str, f64> {
        if depth >= MAX_NESTING {
            return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
        }
        alt((
            number,
            |i: &'a str| self.parameter(i),
            delimited(
                (char('('), multispace0),
                |i: &'a str| self.sum(i, depth + 1),
                (multispace0, char(')')),
            ),
            |i: &'a str| self.signed(i, depth + 1),
        ))
        .parse(input)
    }

    /// signed := ('-' | '+') factor
    fn signed<'a>(&self, input: &'a str, depth: usize) -> IResult<&'a str, f64> {
        let (input, (sign, _)) = (one_of("+-"), multispace0).parse(input)?;
        let (input, value) = self.factor(input, depth)?;
        Ok((input, if sign == '-' { -value } else { value }))
    }

    /// parameter := '#PA' '(' '"' NAME '"' ')'
    fn parameter<'a>(&self, input: &'a str) -> IResult<&'a str, f64> {
        let (rest, name) = preceded(
            (tag("#PA"), multispace0, char('('), multispace0),
            delimited(char('"'), take_until("\""), char('"')),
        )
        .parse(input)?;
        let (rest, _) = (multispace0, char(')')).parse(rest)?;

        match self.parameters.get(name) {
            Some(v) => Ok((rest, *v)),
            None => Err(nom::Err::Failure(Error::new(input, ErrorKind::MapOpt))),
        }
    }
}

/// Parse an unsigned number literal
fn number(input: &str) -> IResult<&str, f64> {
    let (rest, num_str) = recognize((
        alt((recognize((digit1, opt((char('.'), digit0)))), recognize((char('.'), digit1)))),
        opt((one_of("eE"), opt(one_of("+-")), digit1)),
    ))
    .parse(input)?;

    match num_str.parse::<f64>() {
        Ok(v) => Ok((rest, v)),
        Err(_) => Err(nom::Err::Error(Error::new(input, ErrorKind::Float))),
    }
}
