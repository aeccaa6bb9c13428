// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Human and JSON renderings of encoded values and contexts.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use fixscale::{BigInt, Context, FixedPoint};
use serde::Serialize;

/// Everything `encode` reports about one value.
#[derive(Debug, Serialize)]
pub struct EncodeReport {
    pub format: &'static str,
    pub wordlength: u32,
    pub precision: u32,
    pub value: String,
    pub int: String,
    pub hex: String,
    pub bin: String,
    pub lower_bound: String,
    pub upper_bound: String,
    pub lsb: String,
    pub ratio: [String; 2],
}

impl EncodeReport {
    pub fn new(x: &FixedPoint) -> Result<Self> {
        // Bounds are themselves representable, so render them as values.
        let bound = |int: BigInt| {
            FixedPoint::from_stored(x.format(), int, Some(x.wordlength()), Some(x.precision()))
                .map(|b| b.to_string())
        };
        let (numer, denom) = x.as_exact_ratio();
        Ok(Self {
            format: x.format().name(),
            wordlength: x.wordlength(),
            precision: x.precision(),
            value: x.to_string(),
            int: x.int().to_string(),
            hex: x.hex(),
            bin: x.bin(),
            lower_bound: bound(x.min_int())?,
            upper_bound: bound(x.max_int())?,
            lsb: format!("{}^-{}", x.base(), x.precision()),
            ratio: [numer.to_string(), denom.to_string()],
        })
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec!["field", "value"]);
        let rows: [(&str, String); 10] = [
            ("format", self.format.to_owned()),
            ("wordlength", self.wordlength.to_string()),
            ("precision", self.precision.to_string()),
            ("value", self.value.clone()),
            ("int", self.int.clone()),
            ("hex", format!("0x{}", self.hex)),
            ("bin", format!("0b{}", self.bin)),
            ("range", format!("{} .. {}", self.lower_bound, self.upper_bound)),
            ("lsb", self.lsb.clone()),
            ("ratio", format!("{}/{}", self.ratio[0], self.ratio[1])),
        ];
        for (field, value) in rows {
            table.add_row(vec![field.to_owned(), value]);
        }
        table
    }
}

/// One family's resolved context.
#[derive(Debug, Serialize)]
pub struct ContextReport {
    pub family: String,
    pub base: u32,
    pub wordlength: u32,
    pub precision: u32,
    pub overflow: String,
}

impl From<&Context> for ContextReport {
    fn from(ctx: &Context) -> Self {
        Self {
            family: ctx.family().to_string(),
            base: ctx.base(),
            wordlength: ctx.wordlength(),
            precision: ctx.precision(),
            overflow: ctx.overflow().to_string(),
        }
    }
}

pub fn context_table(reports: &[ContextReport]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["family", "base", "wordlength", "precision", "overflow"]);
    for r in reports {
        table.add_row(vec![
            r.family.clone(),
            r.base.to_string(),
            r.wordlength.to_string(),
            r.precision.to_string(),
            r.overflow.clone(),
        ]);
    }
    table
}
