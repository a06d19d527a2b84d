// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DOE2-Lite Parser - Reader and writer for DOE-2 INP files
//!
//! This crate turns eQuest/DOE-2 INP text into a [`CommandDict`] and back.
//! It implements the [`CommandParser`] trait from `doe2-lite-model`.
//!
//! # Features
//!
//! - **Block scanning** using `memchr` to hop between lines
//! - **Tokenization** using `nom` combinators
//! - **Global parameters** - `{#PA("NAME") * 2}` style expressions are evaluated
//! - **Lenient or strict** handling of malformed blocks
//! - **INP writing** in the layout eQuest produces
//!
//! # Example
//!
//! ```ignore
//! use doe2_lite_parser::InpParser;
//! use doe2_lite_model::CommandParser;
//!
//! let parser = InpParser::new();
//! let commands = parser.parse(inp_content)?;
//!
//! for (name, space) in commands["SPACE"].iter() {
//!     println!("{}: {:?}", name, space.get_number("AREA"));
//! }
//! ```

mod expression;
mod reader;
mod scanner;
mod tokenizer;
pub mod writer;

pub use expression::{evaluate, ParameterValues};
pub use reader::{ParseMode, LIKE_FIELD};
pub use scanner::{strip_comment, BlockScanner, ScannedBlock, IGNORED_COMMANDS};
pub use tokenizer::{parse_block, BlockError, ParsedBlock, Token};
pub use writer::{
    generate_inp_string, generate_inp_string_list_format, header_comment_major,
    header_comment_minor, switch_statement_id, to_inp_string,
};

use doe2_lite_model::{CommandDict, CommandParser, Doe2Error, Result};
use reader::DictReader;
use std::path::{Path, PathBuf};

/// INP parser implementing the `CommandParser` trait
///
/// This is the entry point for reading INP files into a `CommandDict`.
#[derive(Clone, Debug)]
pub struct InpParser {
    /// How malformed blocks are handled
    pub mode: ParseMode,
    /// Whether `{...}` expressions are evaluated against global parameters
    pub resolve_parameters: bool,
}

impl Default for InpParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InpParser {
    /// Create a new lenient parser that evaluates expressions
    pub fn new() -> Self {
        Self {
            mode: ParseMode::Lenient,
            resolve_parameters: true,
        }
    }

    /// Create a parser that fails on the first malformed block
    pub fn strict() -> Self {
        Self::new().with_mode(ParseMode::Strict)
    }

    /// Set the handling of malformed blocks
    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set whether expressions are evaluated
    pub fn with_parameters(mut self, enabled: bool) -> Self {
        self.resolve_parameters = enabled;
        self
    }
}

impl CommandParser for InpParser {
    fn parse(&self, content: &str) -> Result<CommandDict> {
        DictReader::new(self.mode, self.resolve_parameters).read(content)
    }
}

/// Quick parse function using the lenient parser
pub fn command_dict_from_inp(content: &str) -> Result<CommandDict> {
    InpParser::new().parse(content)
}

/// Read and parse an INP file
pub fn read_inp_file(path: impl AsRef<Path>) -> Result<CommandDict> {
    InpParser::new().parse_file(path.as_ref())
}

/// Locate an INP file in a folder
///
/// With a `filename` the file must exist in the folder. Without one, the
/// first `.inp` file in name order is returned.
pub fn find_inp_file(folder: impl AsRef<Path>, filename: Option<&str>) -> Result<PathBuf> {
    let folder = folder.as_ref();

    if let Some(filename) = filename {
        let path = folder.join(filename);
        if !path.is_file() {
            return Err(Doe2Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("INP file not found: {}", path.display()),
            )));
        }
        return Ok(path);
    }

    let mut inp_files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        let is_inp = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("inp"));
        if is_inp && path.is_file() {
            inp_files.push(path);
        }
    }
    inp_files.sort();

    if inp_files.len() > 1 {
        log::info!(
            "Multiple .inp files found in {}, using {}",
            folder.display(),
            inp_files[0].display()
        );
    }
    inp_files.into_iter().next().ok_or_else(|| {
        Doe2Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("No .inp files found in {}", folder.display()),
        ))
    })
}
