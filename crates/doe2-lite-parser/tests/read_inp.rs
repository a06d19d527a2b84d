// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use doe2_lite_model::{CommandParser, Doe2Error, InpValue};
use doe2_lite_parser::{
    command_dict_from_inp, find_inp_file, read_inp_file, to_inp_string, InpParser,
};
use std::path::PathBuf;

fn assets() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("assets")
}

fn test_project() -> PathBuf {
    assets().join("test_project.inp")
}

#[test]
fn parse_test_project() {
    let dict = read_inp_file(test_project()).unwrap();

    assert!(dict.contains_command("SPACE"));
    assert!(dict.contains_command("PARAMETER"));
    assert_eq!(dict.object_count(), 9);

    let space = dict.object("SPACE", "L1WNE Perim Spc (G.NE1)").unwrap();
    assert_eq!(space.get_str("POLYGON"), Some("EL1 Space Polygon 1"));
    assert_eq!(space.get_number("AREA/PERSON"), Some(200.0));
    assert_eq!(space.get_str("C-ACTIVITY-DESC"), Some("Office (General)"));
    assert_eq!(space["ZONE-TYPE"], InpValue::Symbol("CONDITIONED".to_string()));
    assert_eq!(
        space.get_list("LIGHTING-W/AREA"),
        Some(&[InpValue::Number(0.9)][..])
    );
}

#[test]
fn sequence_follows_file_order() {
    let dict = read_inp_file(test_project()).unwrap();
    let order: Vec<&str> = dict
        .objects_in_sequence()
        .into_iter()
        .map(|(_, name, _)| name)
        .collect();
    assert_eq!(order.first(), Some(&"Bldg Location"));
    assert_eq!(order.last(), Some(&"EM1"));

    let floor = dict.object("FLOOR", "EL1 Ground Flr").unwrap();
    let space = dict.object("SPACE", "L1WNE Perim Spc (G.NE1)").unwrap();
    assert!(floor.sequence < space.sequence);
}

#[test]
fn global_parameters_are_resolved() {
    let dict = read_inp_file(test_project()).unwrap();

    assert_eq!(dict.parameter("Floor Height").and_then(InpValue::as_number), Some(12.5));
    assert_eq!(dict.parameter("Space Height").and_then(InpValue::as_number), Some(10.0));

    let floor = dict.object("FLOOR", "EL1 Ground Flr").unwrap();
    assert_eq!(floor.get_number("FLOOR-HEIGHT"), Some(12.5));
    assert_eq!(floor.get_number("SPACE-HEIGHT"), Some(10.0));
}

#[test]
fn like_and_scientific_values() {
    let dict = read_inp_file(test_project()).unwrap();

    let copy = dict.object("SPACE", "L1WNE Copy Spc").unwrap();
    assert_eq!(copy.get_str("LIKE"), Some("L1WNE Perim Spc (G.NE1)"));
    assert_eq!(copy.get_number("AREA"), Some(1000.0));

    let window = dict.object("WINDOW", "EL1 East Win").unwrap();
    assert_eq!(window.get_number("WIDTH"), Some(12.0));
}

#[test]
fn malformed_block_is_reported() {
    let dict = read_inp_file(test_project()).unwrap();
    assert_eq!(dict.warnings().len(), 1);
    let warning = &dict.warnings()[0];
    assert!(warning.line >= 32);
    assert!(warning.message.contains("SET-DEFAULT"));

    let content = std::fs::read_to_string(test_project()).unwrap();
    let err = InpParser::strict().parse(&content).unwrap_err();
    assert!(matches!(err, Doe2Error::InvalidBlock { .. }));
}

#[test]
fn written_file_reads_back_equal() {
    let dict = read_inp_file(test_project()).unwrap();
    let written = to_inp_string(&dict);
    let reread = command_dict_from_inp(&written).unwrap();

    assert!(reread.warnings().is_empty());
    assert!(!dict.warnings().is_empty());
    assert_eq!(dict, reread, "round trip changed the command dict");
}

#[test]
fn starred_text_with_quotes_reads_back_equal() {
    let content = "\"S\" = SPACE\n   C-ACTIVITY-DESC = *Office \"A\"*\n   AREA = 10\n   ..\n";
    let dict = command_dict_from_inp(content).unwrap();
    assert_eq!(
        dict.object("SPACE", "S").unwrap().get_str("C-ACTIVITY-DESC"),
        Some("Office \"A\"")
    );

    let reread = command_dict_from_inp(&to_inp_string(&dict)).unwrap();
    assert!(reread.warnings().is_empty());
    assert_eq!(dict, reread);
}

#[test]
fn deeply_nested_value_is_skipped() {
    let depth = 5000;
    let content = format!(
        "\"Deep\" = SPACE\n   V = {}1{}\n   ..\n\"Ok\" = SPACE\n   AREA = 10\n   ..\n",
        "(".repeat(depth),
        ")".repeat(depth)
    );

    let dict = command_dict_from_inp(&content).unwrap();
    assert_eq!(dict.object_count(), 1);
    assert!(dict.object("SPACE", "Ok").is_some());
    assert_eq!(dict.warnings().len(), 1);
    assert_eq!(dict.warnings()[0].line, 2);
    assert!(dict.warnings()[0].message.contains("nested deeper"));

    let err = InpParser::strict().parse(&content).unwrap_err();
    assert!(matches!(err, Doe2Error::InvalidBlock { line: 2, .. }));
}

#[test]
fn locate_inp_file() {
    assert_eq!(find_inp_file(assets(), None).unwrap(), test_project());
    assert_eq!(
        find_inp_file(assets(), Some("test_project.inp")).unwrap(),
        test_project()
    );
    assert!(find_inp_file(assets(), Some("missing.inp")).is_err());
}

#[test]
fn dict_serializes_to_nested_json() {
    let dict = read_inp_file(test_project()).unwrap();
    let json = dict.to_json();
    assert_eq!(json["SPACE"]["L1WNE Perim Spc (G.NE1)"]["AREA/PERSON"], 200.0);
    assert_eq!(json["PARAMETER"]["Floor Height"]["VALUE"], 12.5);
    assert!(json["WINDOW"]["EL1 East Win"]["__line__"].is_u64());
}
