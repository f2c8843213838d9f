/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

use crate::errors::ParseError;
use crate::parser::json::{DataSpec, VariableSpec};
use ra_data_structures::prelude::{ContingencyTable, VariableList};

/// One row of a `:nominal` section: `NAME,cardinality,type,abbrev` with
/// `type` in `{0=excluded, 1=independent, 2=dependent}` (spec.md §4.9).
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyNominalVariable {
    pub name: String,
    pub cardinality: u32,
    pub type_code: u8,
    pub abbrev: String,
}

impl LegacyNominalVariable {
    pub fn is_excluded(&self) -> bool {
        self.type_code == 0
    }

    pub fn is_dependent(&self) -> bool {
        self.type_code == 2
    }
}

/// A parsed legacy `.in` document: the line-oriented format whose
/// sections are introduced by a `:keyword` line (spec.md §4.9). Built by
/// [`LegacyInDocument::parse`]; converted to the canonical dataset JSON
/// form by [`LegacyInDocument::to_json`], which is what the rest of this
/// crate actually consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyInDocument {
    pub action: Option<String>,
    pub nominal: Vec<LegacyNominalVariable>,
    pub short_model: Option<String>,
    pub optimize_search_width: Option<usize>,
    pub search_levels: Option<usize>,
    pub no_frequency: bool,
    /// One entry per declared nominal variable, one row per observation,
    /// values already resolved to their 0-based integer index.
    pub data_rows: Vec<Vec<u32>>,
    /// Parallel to `data_rows`; all `1.0` when [`LegacyInDocument::no_frequency`] is set.
    pub data_counts: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Action,
    Nominal,
    ShortModel,
    OptimizeSearchWidth,
    SearchLevels,
    Data,
}

impl LegacyInDocument {
    /// Parses a `.in` document. Scalar sections (`:action`,
    /// `:short-model`, `:optimize-search-width`, `:search-levels`) take
    /// their value either inline on the keyword's own line or on the
    /// single non-blank line that follows it; list sections (`:nominal`,
    /// `:data`) consume every non-blank line up to the next `:keyword`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut document = LegacyInDocument::default();
        let mut section = Section::None;

        for (line_number, raw_line) in text.lines().enumerate() {
            let line_number = line_number + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix(':') {
                let mut parts = rest.splitn(2, char::is_whitespace);
                let keyword = parts.next().unwrap_or("");
                let inline_value = parts.next().map(str::trim).filter(|s| !s.is_empty());

                section = match keyword {
                    "action" => {
                        if let Some(value) = inline_value {
                            document.action = Some(value.to_string());
                        }
                        Section::Action
                    }
                    "nominal" => Section::Nominal,
                    "short-model" => {
                        if let Some(value) = inline_value {
                            document.short_model = Some(value.to_string());
                        }
                        Section::ShortModel
                    }
                    "optimize-search-width" => {
                        if let Some(value) = inline_value {
                            document.optimize_search_width = Some(parse_usize(value, line_number)?);
                        }
                        Section::OptimizeSearchWidth
                    }
                    "search-levels" => {
                        if let Some(value) = inline_value {
                            document.search_levels = Some(parse_usize(value, line_number)?);
                        }
                        Section::SearchLevels
                    }
                    "no-frequency" => {
                        document.no_frequency = true;
                        Section::None
                    }
                    "data" => Section::Data,
                    other => {
                        return Err(ParseError::Legacy { line: line_number, message: format!("unknown section ':{other}'") });
                    }
                };
                continue;
            }

            match section {
                Section::None => {
                    return Err(ParseError::Legacy { line: line_number, message: "data line outside of any section".to_string() });
                }
                Section::Action => document.action = Some(line.to_string()),
                Section::ShortModel => document.short_model = Some(line.to_string()),
                Section::OptimizeSearchWidth => document.optimize_search_width = Some(parse_usize(line, line_number)?),
                Section::SearchLevels => document.search_levels = Some(parse_usize(line, line_number)?),
                Section::Nominal => document.nominal.push(parse_nominal_line(line, line_number)?),
                Section::Data => {
                    let (values, count) = parse_data_line(line, line_number, document.nominal.len(), document.no_frequency)?;
                    document.data_rows.push(values);
                    document.data_counts.push(count);
                }
            }
        }

        Ok(document)
    }

    /// Re-emits this document as the canonical dataset [`DataSpec`] JSON
    /// form: variable labels become their stringified integer index (the
    /// `.in` format carries no label text), and — when `exclude_type0` is
    /// set, the default per spec.md §4.9 — every `type_code == 0`
    /// ("excluded") variable is dropped from `variables` and its column
    /// truncated out of every data row.
    pub fn to_json(&self, exclude_type0: bool) -> DataSpec {
        let keep: Vec<bool> = self.nominal.iter().map(|v| !(exclude_type0 && v.is_excluded())).collect();

        let variables: Vec<VariableSpec> = self
            .nominal
            .iter()
            .zip(keep.iter())
            .filter(|(_, &keep)| keep)
            .map(|(v, _)| VariableSpec {
                name: v.name.clone(),
                abbrev: v.abbrev.clone(),
                cardinality: v.cardinality,
                values: (0..v.cardinality).map(|i| i.to_string()).collect(),
                is_dependent: v.is_dependent(),
            })
            .collect();

        let data: Vec<Vec<serde_json::Value>> = self
            .data_rows
            .iter()
            .map(|row| row.iter().zip(keep.iter()).filter(|(_, &keep)| keep).map(|(&v, _)| serde_json::Value::from(v)).collect())
            .collect();

        DataSpec { name: "legacy-in".to_string(), sample_size: None, variables, data, counts: self.data_counts.clone() }
    }

    /// Convenience: [`LegacyInDocument::to_json`] followed by
    /// `DataSpec::to_variable_list`/`DataSpec::to_table`.
    pub fn to_variable_list_and_table(&self, exclude_type0: bool) -> Result<(VariableList, ContingencyTable), crate::errors::InvalidInputError> {
        let spec = self.to_json(exclude_type0);
        let list = spec.to_variable_list()?;
        let table = spec.to_table(&list)?;
        Ok((list, table))
    }
}

fn parse_usize(value: &str, line_number: usize) -> Result<usize, ParseError> {
    value.parse().map_err(|_| ParseError::Legacy { line: line_number, message: format!("expected an integer, got '{value}'") })
}

fn parse_nominal_line(line: &str, line_number: usize) -> Result<LegacyNominalVariable, ParseError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 4 {
        return Err(ParseError::Legacy { line: line_number, message: format!("expected 'NAME,cardinality,type,abbrev', got '{line}'") });
    }
    let cardinality: u32 = fields[1].parse().map_err(|_| ParseError::Legacy { line: line_number, message: format!("invalid cardinality '{}'", fields[1]) })?;
    let type_code: u8 = fields[2].parse().map_err(|_| ParseError::Legacy { line: line_number, message: format!("invalid type code '{}'", fields[2]) })?;
    if type_code > 2 {
        return Err(ParseError::Legacy { line: line_number, message: format!("type code must be 0, 1, or 2, got {type_code}") });
    }
    Ok(LegacyNominalVariable { name: fields[0].to_string(), cardinality, type_code, abbrev: fields[3].to_string() })
}

fn parse_data_line(line: &str, line_number: usize, variable_count: usize, no_frequency: bool) -> Result<(Vec<u32>, f64), ParseError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let expected_len = if no_frequency { variable_count } else { variable_count + 1 };
    if fields.len() != expected_len {
        return Err(ParseError::Legacy {
            line: line_number,
            message: format!("expected {expected_len} comma-separated fields, got {}", fields.len()),
        });
    }
    let (value_fields, count) = if no_frequency {
        (fields.as_slice(), 1.0)
    } else {
        let (values, count_field) = fields.split_at(variable_count);
        let count: f64 = count_field[0]
            .parse()
            .map_err(|_| ParseError::Legacy { line: line_number, message: format!("invalid frequency '{}'", count_field[0]) })?;
        (values, count)
    };
    let values = value_fields
        .iter()
        .map(|field| field.parse::<u32>().map_err(|_| ParseError::Legacy { line: line_number, message: format!("invalid data value '{field}'") }))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((values, count))
}
