// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use doe2_lite_parser::{command_dict_from_inp, generate_inp_string_list_format, to_inp_string};
use doe2_lite_model::InpValue;

/// Build an INP file with `count` polygon spaces
fn synthetic_inp(count: usize) -> String {
    let mut inp = String::from("INPUT ..\nPARAMETER\n   \"Height\" = 3.5\n   ..\n");
    for i in 0..count {
        let vertices: Vec<InpValue> = (0..4)
            .map(|v| {
                InpValue::List(vec![
                    InpValue::Number((i * 10 + v) as f64),
                    InpValue::Number((v * 5) as f64),
                ])
            })
            .collect();
        inp.push_str(&generate_inp_string_list_format(
            &format!("Plg {}", i),
            "POLYGON",
            &["V1", "V2", "V3", "V4"],
            &vertices,
        ));
        inp.push_str(&format!(
            "\"Spc {i}\" = SPACE\n   SHAPE = POLYGON\n   POLYGON = \"Plg {i}\"\n   \
             HEIGHT = {{#PA(\"Height\") * 2}}\n   AREA = 402.5   $ ft2\n   ..\n"
        ));
    }
    inp.push_str("END ..\nCOMPUTE ..\nSTOP ..\n");
    inp
}

pub fn parse_small(c: &mut Criterion) {
    let content = synthetic_inp(50);
    c.bench_function("parse_50_spaces", |b| {
        b.iter(|| command_dict_from_inp(black_box(&content)))
    });
}

pub fn parse_large(c: &mut Criterion) {
    let content = synthetic_inp(2000);
    c.bench_function("parse_2000_spaces", |b| {
        b.iter(|| command_dict_from_inp(black_box(&content)))
    });
}

pub fn write_large(c: &mut Criterion) {
    let dict = command_dict_from_inp(&synthetic_inp(2000)).unwrap();
    c.bench_function("write_2000_spaces", |b| b.iter(|| to_inp_string(black_box(&dict))));
}

criterion_group!(benches, parse_small, parse_large, write_large);
criterion_main!(benches);
