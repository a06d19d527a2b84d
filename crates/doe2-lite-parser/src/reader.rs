// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Assembly of a [`CommandDict`] from scanned and tokenized blocks

use crate::expression::{evaluate, ParameterValues};
use crate::scanner::{BlockScanner, ScannedBlock};
use crate::tokenizer::{parse_block, ParsedBlock, Token};
use doe2_lite_model::{
    CommandDict, Doe2Error, InpValue, OrderedTable, ParseWarning, Result,
};
use log::{debug, warn};

/// How malformed or unterminated blocks are handled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Skip the block, log a warning and record it on the dict
    #[default]
    Lenient,
    /// Fail on the first bad block
    Strict,
}

/// Field name under which the `LIKE` target of an object is stored
pub const LIKE_FIELD: &str = "LIKE";

/// Collects blocks into a command dictionary
pub(crate) struct DictReader {
    mode: ParseMode,
    resolve_parameters: bool,
    dict: CommandDict,
    parameters: Vec<(String, InpValue)>,
    numeric: ParameterValues,
}

impl DictReader {
    pub(crate) fn new(mode: ParseMode, resolve_parameters: bool) -> Self {
        Self {
            mode,
            resolve_parameters,
            dict: CommandDict::new(),
            parameters: Vec::new(),
            numeric: ParameterValues::default(),
        }
    }

    /// Read all blocks of an INP file
    pub(crate) fn read(mut self, content: &str) -> Result<CommandDict> {
        for block in BlockScanner::new(content) {
            self.read_block(&block)?;
        }

        // parameters come after the objects in the dict
        for (name, value) in std::mem::take(&mut self.parameters) {
            self.dict.insert_parameter(name, value);
        }

        debug!(
            "Read {} objects in {} commands ({} warnings)",
            self.dict.object_count(),
            self.dict.len(),
            self.dict.warnings().len()
        );
        Ok(self.dict)
    }

    fn read_block(&mut self, block: &ScannedBlock) -> Result<()> {
        if block.is_ignored() {
            debug!("Skipping {} block at line {}", block.head(), block.line);
            return Ok(());
        }
        if !block.terminated {
            return self.reject(block.line, "block is not terminated with \"..\"");
        }

        match parse_block(&block.text) {
            Ok(ParsedBlock::Parameters(assignments)) => {
                for (name, token) in assignments {
                    let value = self.resolve(&token);
                    if let Some(n) = value.as_number() {
                        self.numeric.insert(name.to_string(), n);
                    }
                    self.parameters.retain(|(existing, _)| existing != name);
                    self.parameters.push((name.to_string(), value));
                }
                Ok(())
            }
            Ok(ParsedBlock::Object {
                name,
                command,
                like,
                fields,
            }) => {
                if fields.is_empty() && like.is_none() {
                    debug!("Skipping {} \"{}\" with no keywords", command, name);
                    return Ok(());
                }
                let mut table = OrderedTable::new();
                if let Some(target) = like {
                    table.insert(LIKE_FIELD, InpValue::String(target.to_string()));
                }
                for (keyword, token) in &fields {
                    table.insert(*keyword, self.resolve(token));
                }
                self.dict.insert_object(command, name, table);
                Ok(())
            }
            Err(err) => {
                let message = format!("malformed {} block: {}", block.head(), err.message);
                self.reject(block.line + err.line_offset, &message)
            }
        }
    }

    fn reject(&mut self, line: usize, message: &str) -> Result<()> {
        match self.mode {
            ParseMode::Strict => Err(Doe2Error::invalid_block(line, message)),
            ParseMode::Lenient => {
                warn!("INP line {}: {}", line, message);
                self.dict.push_warning(ParseWarning {
                    line,
                    message: message.to_string(),
                });
                Ok(())
            }
        }
    }

    /// Convert a token, evaluating expressions against known parameters
    fn resolve(&self, token: &Token<'_>) -> InpValue {
        match token {
            Token::Expression(expr) if self.resolve_parameters => {
                match evaluate(expr, &self.numeric) {
                    Some(n) => InpValue::Number(n),
                    None => InpValue::Expression((*expr).to_string()),
                }
            }
            Token::List(items) => InpValue::List(items.iter().map(|t| self.resolve(t)).collect()),
            other => other.to_inp_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(content: &str, mode: ParseMode) -> Result<CommandDict> {
        DictReader::new(mode, true).read(content)
    }

    #[test]
    fn test_like_field() {
        let dict = read(
            "\"Base\" = SPACE\n   AREA = 10\n   ..\n\
             \"Copy\" = SPACE LIKE \"Base\"\n   ..\n",
            ParseMode::Lenient,
        )
        .unwrap();
        let copy = dict.object("SPACE", "Copy").unwrap();
        assert_eq!(copy.get_str(LIKE_FIELD), Some("Base"));
        assert_eq!(copy.sequence, 2);
    }

    #[test]
    fn test_parameters_resolve_in_order() {
        let content = "PARAMETER\n   \"Height\" = 3\n   ..\n\
                       PARAMETER\n   \"Double\" = {#PA(\"Height\") * 2}\n   ..\n\
                       \"Wall\" = EXTERIOR-WALL\n   HEIGHT = {#PA(\"Double\") + 1}\n   ..\n";
        let dict = read(content, ParseMode::Lenient).unwrap();
        assert_eq!(dict.parameter("Double").and_then(InpValue::as_number), Some(6.0));
        assert_eq!(dict.object("EXTERIOR-WALL", "Wall").unwrap().get_number("HEIGHT"), Some(7.0));
        // parameters follow the objects
        let order: Vec<&str> = dict.commands().map(|(c, _)| c).collect();
        assert_eq!(order, vec!["EXTERIOR-WALL", "PARAMETER"]);
    }

    #[test]
    fn test_unresolved_expression_kept() {
        let dict = read(
            "\"S\" = SPACE\n   AREA = {#PA(\"Missing\") * 2}\n   ..\n",
            ParseMode::Lenient,
        )
        .unwrap();
        assert_eq!(
            dict.object("SPACE", "S").unwrap().get("AREA"),
            Some(&InpValue::Expression("#PA(\"Missing\") * 2".to_string()))
        );
    }

    #[test]
    fn test_expressions_left_alone_when_disabled() {
        let dict = DictReader::new(ParseMode::Lenient, false)
            .read("\"S\" = SPACE\n   AREA = {2 * 3}\n   ..\n")
            .unwrap();
        assert!(dict.object("SPACE", "S").unwrap()["AREA"].is_expression());
    }

    #[test]
    fn test_unterminated_block() {
        let content = "\"S\" = SPACE\n   AREA = 10\n   ..\n\"T\" = SPACE\n   AREA = 5\n";
        let dict = read(content, ParseMode::Lenient).unwrap();
        assert_eq!(dict.object_count(), 1);
        assert_eq!(dict.warnings().len(), 1);
        assert_eq!(dict.warnings()[0].line, 4);

        let err = read(content, ParseMode::Strict).unwrap_err();
        assert!(matches!(err, Doe2Error::InvalidBlock { line: 4, .. }));
    }
}
