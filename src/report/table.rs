//! Result-table assembly.
//!
//! One row per unit; columns grouped per input signal, named
//! `{prefix}{signal}_{suffix}` and tagged with the semantics downstream
//! consumers need (circular columns wrap at ±π and must not be averaged
//! naively). The schema depends on the run mode: point-estimate-only runs
//! carry just the `PD` and `Moddepth` columns, bootstrap runs add the CI,
//! significance, and raw-bootstrap columns.
//!
//! Formatting code lives here so the math/fitting code stays clean and
//! output changes are localized.

use serde::{Deserialize, Serialize};

use crate::domain::{ColumnSemantics, Distribution, SignalSelector, UnitTuning};

/// Column payload, one entry per unit (row-aligned with `ResultTable::units`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnValues {
    Scalars(Vec<f64>),
    Intervals(Vec<[f64; 2]>),
    Flags(Vec<bool>),
    /// Raw bootstrap direction samples per unit.
    Samples(Vec<Vec<f64>>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultColumn {
    pub name: String,
    pub semantics: ColumnSemantics,
    pub values: ColumnValues,
}

/// The sole output artifact of a tuning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    /// Unit labels, in response-column order.
    pub units: Vec<String>,
    pub columns: Vec<ResultColumn>,
}

impl ResultTable {
    pub fn num_rows(&self) -> usize {
        self.units.len()
    }

    pub fn column(&self, name: &str) -> Option<&ResultColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Append the `_` separator to a non-empty prefix that lacks one.
pub fn normalize_prefix(prefix: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('_') {
        prefix.to_string()
    } else {
        format!("{prefix}_")
    }
}

/// Column-concatenate the per-signal results into the final table.
///
/// `rows` must all carry one `SignalTuning` per input signal, in selector
/// order; `prefix` is assumed already normalized.
pub fn build_table(
    rows: &[UnitTuning],
    in_signals: &[SignalSelector],
    prefix: &str,
    boot_enabled: bool,
) -> ResultTable {
    let units = rows.iter().map(|r| r.unit.clone()).collect();
    let mut columns = Vec::new();

    for (s, sel) in in_signals.iter().enumerate() {
        let base = format!("{prefix}{}", sel.name);

        columns.push(ResultColumn {
            name: format!("{base}_PD"),
            semantics: ColumnSemantics::Circular,
            values: ColumnValues::Scalars(rows.iter().map(|r| r.signals[s].pd).collect()),
        });
        if boot_enabled {
            columns.push(ResultColumn {
                name: format!("{base}_PDCI"),
                semantics: ColumnSemantics::Circular,
                values: ColumnValues::Intervals(
                    rows.iter()
                        .map(|r| r.signals[s].pd_ci.unwrap_or([f64::NAN, f64::NAN]))
                        .collect(),
                ),
            });
        }
        columns.push(ResultColumn {
            name: format!("{base}_Moddepth"),
            semantics: ColumnSemantics::Linear,
            values: ColumnValues::Scalars(rows.iter().map(|r| r.signals[s].moddepth).collect()),
        });
        if boot_enabled {
            columns.push(ResultColumn {
                name: format!("{base}_ModdepthCI"),
                semantics: ColumnSemantics::Linear,
                values: ColumnValues::Intervals(
                    rows.iter()
                        .map(|r| r.signals[s].moddepth_ci.unwrap_or([f64::NAN, f64::NAN]))
                        .collect(),
                ),
            });
            columns.push(ResultColumn {
                name: format!("{base}_Tuned"),
                semantics: ColumnSemantics::Logical,
                values: ColumnValues::Flags(
                    rows.iter()
                        .map(|r| r.signals[s].tuned.unwrap_or(false))
                        .collect(),
                ),
            });
            columns.push(ResultColumn {
                name: format!("{base}_bootstraps"),
                semantics: ColumnSemantics::Circular,
                values: ColumnValues::Samples(
                    rows.iter()
                        .map(|r| r.signals[s].boot_pds.clone().unwrap_or_default())
                        .collect(),
                ),
            });
        }
    }

    ResultTable { units, columns }
}

/// Format the full run summary (per-unit PD/depth/significance lines).
pub fn format_run_summary(
    rows: &[UnitTuning],
    in_signals: &[SignalSelector],
    distribution: Distribution,
    num_boots: usize,
    boot_enabled: bool,
) -> String {
    let mut out = String::new();

    out.push_str("=== pd-tuning - preferred-direction fit ===\n");
    out.push_str(&format!("Family: {}\n", distribution.display_name()));
    if boot_enabled {
        out.push_str(&format!("Bootstraps: {num_boots} per unit (+{num_boots} scramble)\n"));
    } else {
        out.push_str("Bootstraps: disabled (point estimates only)\n");
    }
    out.push_str(&format!(
        "Units: n={} | input signals: {}\n",
        rows.len(),
        in_signals
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    ));

    for row in rows {
        for (sel, sig) in in_signals.iter().zip(row.signals.iter()) {
            out.push_str(&format!(
                "  {:<12} {:<8} PD={:+.3} rad",
                row.unit, sel.name, sig.pd
            ));
            if let Some([lo, hi]) = sig.pd_ci {
                out.push_str(&format!("  CI=[{lo:+.3}, {hi:+.3}]"));
            }
            out.push_str(&format!("  depth={:.3}", sig.moddepth));
            match sig.tuned {
                Some(true) => out.push_str("  tuned=yes"),
                Some(false) => out.push_str("  tuned=no"),
                None => {}
            }
            out.push('\n');
        }
    }

    out
}
