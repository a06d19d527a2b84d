// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! INP text generation
//!
//! Writes DOE-2 objects in the layout eQuest produces, so that files
//! written here read back into an equal [`CommandDict`].

use doe2_lite_model::{CommandDict, InpValue};
use std::fmt;

/// Column at which `=` is aligned in object bodies
const KEYWORD_WIDTH: usize = 25;

fn padding(keyword: &str) -> String {
    " ".repeat(KEYWORD_WIDTH.saturating_sub(keyword.len()).max(1))
}

/// Get the INP string of a single object
///
/// # Arguments
/// * `u_name` - Unique name of the object (32 characters or less for DOE-2)
/// * `command` - Instruction type (SPACE, FLOOR, POLYGON, ...)
/// * `keywords` - Attribute names
/// * `values` - Attribute values, aligned with `keywords`
pub fn generate_inp_string<K, V>(u_name: &str, command: &str, keywords: &[K], values: &[V]) -> String
where
    K: AsRef<str>,
    V: fmt::Display,
{
    let body: Vec<String> = keywords
        .iter()
        .zip(values)
        .map(|(kwd, val)| {
            let kwd = kwd.as_ref();
            format!("   {}{}= {}", kwd, padding(kwd), val)
        })
        .collect();
    format!("\"{}\" = {}\n{}\n   ..\n", u_name, command, body.join("\n"))
}

/// Get the INP string of an object, writing list values one item per line
pub fn generate_inp_string_list_format<K>(
    u_name: &str,
    command: &str,
    keywords: &[K],
    values: &[InpValue],
) -> String
where
    K: AsRef<str>,
{
    let mut body = String::new();
    for (kwd, val) in keywords.iter().zip(values) {
        let kwd = kwd.as_ref();
        match val {
            InpValue::List(items) => {
                body.push_str(&format!("   {}{}= (\n", kwd, padding(kwd)));
                for item in items {
                    body.push_str(&format!("      {},\n", item));
                }
                body.push_str("   )\n");
            }
            _ => {
                body.push_str(&format!("   {}{}= {}\n", kwd, padding(kwd), val));
            }
        }
    }
    format!("\"{}\" = {}\n{}   ..\n", u_name, command, body)
}

/// Get the INP string of a global parameter
pub fn generate_parameter_string(name: &str, value: &InpValue) -> String {
    format!("PARAMETER\n   \"{}\" = {}\n   ..\n", name, value)
}

/// Banner comment for a group of objects
pub fn header_comment_minor(header_text: &str) -> String {
    format!(
        "$ ---------------------------------------------------------\n\
         $              {}\n\
         $ ---------------------------------------------------------\n\n",
        header_text
    )
}

/// Banner comment for a major section of the file
pub fn header_comment_major(header_text: &str) -> String {
    format!(
        "$ *********************************************************\n\
         $ **                                                     **\n\
         $                   {}\n\
         $ **                                                     **\n\
         $ *********************************************************\n\n",
        header_text
    )
}

/// Convert a name into the 4-character ID DOE-2 requires for switch statements
pub fn switch_statement_id(value: &str) -> String {
    let val: String = value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == ':')
        .collect();
    if val.len() <= 4 {
        return val;
    }

    // drop lower-case vowels for readability
    let mut val: String = val
        .chars()
        .filter(|c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y'))
        .collect();

    // ids coming from openstudio-standards look like "Space::Office"
    if let Some((_, last)) = val.rsplit_once("::") {
        if last.len() >= 4 {
            return last[..4].to_string();
        }
        val = last.to_string();
    }

    let val = val.replace(':', "");
    if val.len() >= 4 {
        return val[val.len() - 4..].to_string();
    }
    val
}

/// Write a whole command dictionary as INP text
///
/// Parameters come first, then every object in its original sequence.
pub fn to_inp_string(commands: &CommandDict) -> String {
    let mut out = String::new();

    for (name, value) in commands.parameters() {
        out.push_str(&generate_parameter_string(name, value));
        out.push('\n');
    }

    for (command, name, object) in commands.objects_in_sequence() {
        let keywords: Vec<&str> = object.fields.keys().collect();
        let values: Vec<InpValue> = object.fields.values().cloned().collect();
        out.push_str(&generate_inp_string_list_format(
            name, command, &keywords, &values,
        ));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_inp_string() {
        let inp = generate_inp_string(
            "Floor2W ClosedOffice5",
            "SPACE",
            &["SHAPE", "ZONE-TYPE"],
            &["POLYGON", "CONDITIONED"],
        );
        assert_eq!(
            inp,
            "\"Floor2W ClosedOffice5\" = SPACE\n\
             \x20  SHAPE                    = POLYGON\n\
             \x20  ZONE-TYPE                = CONDITIONED\n\
             \x20  ..\n"
        );
    }

    #[test]
    fn test_long_keyword_keeps_one_space() {
        let kwd = "A-VERY-LONG-KEYWORD-BEYOND-WIDTH";
        let inp = generate_inp_string("X", "SPACE", &[kwd], &[1]);
        assert!(inp.contains("A-VERY-LONG-KEYWORD-BEYOND-WIDTH = 1"));
    }

    #[test]
    fn test_list_format() {
        let inp = generate_inp_string_list_format(
            "Plg",
            "POLYGON",
            &["V1"],
            &[InpValue::List(vec![InpValue::Number(0.0), InpValue::Number(10.0)])],
        );
        assert!(inp.contains("= (\n      0,\n      10,\n   )\n"));
        assert!(inp.ends_with("   ..\n"));
    }

    #[test]
    fn test_header_comments() {
        assert!(header_comment_minor("Floors").contains("$              Floors\n"));
        assert!(header_comment_major("Building").starts_with("$ ****"));
    }

    #[test]
    fn test_switch_statement_id() {
        assert_eq!(switch_statement_id("Off"), "Off");
        assert_eq!(switch_statement_id("Of_f i"), "Offi");
        assert_eq!(switch_statement_id("Space::OfficeOpen"), "Offc");
        assert_eq!(switch_statement_id("LargeOfficeLobby"), "cLbb");
        assert_eq!(switch_statement_id("ab::cd::Ei"), "E");
    }
}
