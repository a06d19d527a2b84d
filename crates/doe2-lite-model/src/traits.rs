// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core traits for INP parsing

use crate::{CommandDict, Result};
use std::path::Path;

/// Main parsing interface - entry point for reading INP content
///
/// Implementations turn the text of a DOE-2 INP file into a [`CommandDict`].
///
/// # Example
///
/// ```ignore
/// use doe2_lite_model::CommandParser;
///
/// let parser: Box<dyn CommandParser> = get_parser();
/// let commands = parser.parse(inp_content)?;
/// for (name, _) in commands["SPACE"].iter() {
///     println!("Space: {}", name);
/// }
/// ```
pub trait CommandParser: Send + Sync {
    /// Parse INP content
    ///
    /// # Arguments
    /// * `content` - The full INP file content
    ///
    /// # Returns
    /// The command dictionary, or an error if the parser is strict and a
    /// block could not be parsed
    fn parse(&self, content: &str) -> Result<CommandDict>;

    /// Read and parse an INP file
    fn parse_file(&self, path: &Path) -> Result<CommandDict> {
        let content = std::fs::read_to_string(path)?;
        self.parse(&content)
    }
}
