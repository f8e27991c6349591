// 🔄 Cycle Engine - Partition monetary line items into month ranges
// group_cycles folds table rows into non-overlapping billing cycles,
// ungroup_cycles flattens cycles back into rows for tabular editing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

// ============================================================================
// LINE ENTRY (table row shape)
// ============================================================================

/// One monetary line item, as the billing table edits it.
///
/// This is both the input of `group_cycles` and the output of
/// `ungroup_cycles`. Numeric fields arrive from the frontend as numbers or
/// numeric strings; both deserialize through the coercion helpers below,
/// and anything non-numeric reads as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineEntry {
    /// Stable row identity, carried into the cycle's contributions when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Grouping key: a row may only share a cycle with a matching cycle_id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_id: Option<String>,

    /// First month of the range, inclusive
    #[serde(default, deserialize_with = "month_or_zero")]
    pub initial_month: i64,

    /// Last month of the range, inclusive
    #[serde(default, deserialize_with = "month_or_zero")]
    pub final_month: i64,

    #[serde(default, deserialize_with = "number_or_zero")]
    pub amount: f64,

    /// Charge type: "base-rent", "rent-discount", "taxes", ...
    #[serde(rename = "type", default, deserialize_with = "string_or_empty")]
    pub entry_type: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub description: String,

    #[serde(default, deserialize_with = "number_or_zero")]
    pub adjustment: f64,

    #[serde(default, deserialize_with = "bool_or_false")]
    pub adjustable: bool,
}

impl LineEntry {
    /// Default base-rent row the UI seeds an empty cycles table with.
    pub fn seed_row() -> Self {
        LineEntry {
            id: None,
            cycle_id: None,
            initial_month: 0,
            final_month: 0,
            amount: 1.0,
            entry_type: "base-rent".to_string(),
            description: String::new(),
            adjustment: 0.0,
            adjustable: false,
        }
    }

    /// Grouping scope of this row. Empty-string ids count as unset.
    fn scope(&self) -> Option<&str> {
        self.cycle_id.as_deref().filter(|id| !id.is_empty())
    }
}

// ============================================================================
// BASE AMOUNT (a cycle's per-entry contribution)
// ============================================================================

/// A line item's contribution to a cycle, stripped of its month bounds
/// (the cycle owns the range).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseAmount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "number_or_zero")]
    pub amount: f64,

    #[serde(rename = "type", default, deserialize_with = "string_or_empty")]
    pub entry_type: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub description: String,

    #[serde(default, deserialize_with = "number_or_zero")]
    pub adjustment: f64,

    #[serde(default, deserialize_with = "bool_or_false")]
    pub adjustable: bool,
}

impl BaseAmount {
    fn from_entry(entry: &LineEntry) -> Self {
        BaseAmount {
            id: entry.id.clone().filter(|id| !id.is_empty()),
            amount: entry.amount,
            entry_type: entry.entry_type.clone(),
            description: entry.description.clone(),
            adjustment: entry.adjustment,
            adjustable: entry.adjustable,
        }
    }
}

// ============================================================================
// CYCLE
// ============================================================================

/// A contiguous, inclusive month range with the contributions active
/// throughout it. One grouping run never produces overlapping ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub initial_month: i64,

    pub final_month: i64,

    #[serde(default)]
    pub base_amounts: Vec<BaseAmount>,
}

impl Cycle {
    fn for_entry(entry: &LineEntry) -> Self {
        Cycle {
            id: entry.scope().map(str::to_string),
            initial_month: entry.initial_month,
            final_month: entry.final_month,
            base_amounts: vec![BaseAmount::from_entry(entry)],
        }
    }

    /// Inclusive containment of the entry's month range.
    fn contains(&self, entry: &LineEntry) -> bool {
        self.initial_month <= entry.initial_month && self.final_month >= entry.final_month
    }
}

// ============================================================================
// GROUPING
// ============================================================================

/// Partition line items into non-overlapping cycles.
///
/// Entries are processed ascending by initial month, wider ranges first
/// among equal starts. Each entry either opens a new cycle, joins a cycle
/// whose range it matches exactly, or splits the containing cycle into the
/// months before it, the exact overlap, and the months after it. Only
/// cycles whose id matches the entry's cycle_id qualify; untagged entries
/// only ever share untagged cycles.
///
/// The caller's slice is not touched; sorting happens on an internal copy.
pub fn group_cycles(entries: &[LineEntry]) -> Vec<Cycle> {
    let mut sorted: Vec<LineEntry> = entries.to_vec();

    // Stable sort: rows with identical ranges keep their table order,
    // which fixes which one "arrives first" at a given month.
    sorted.sort_by(|a, b| {
        a.initial_month
            .cmp(&b.initial_month)
            .then(b.final_month.cmp(&a.final_month))
    });

    let mut cycles: Vec<Cycle> = Vec::new();

    for entry in &sorted {
        let position = cycles
            .iter()
            .position(|cycle| cycle.id.as_deref() == entry.scope() && cycle.contains(entry));

        match position {
            None => cycles.push(Cycle::for_entry(entry)),
            Some(position) => {
                let parts = split_cycle(&cycles[position], entry);
                cycles.splice(position..=position, parts);
            }
        }
    }

    debug!(entries = sorted.len(), cycles = cycles.len(), "grouped line items");
    cycles
}

/// Replace a containing cycle with up to three parts, in left-middle-right
/// order. The middle part is the exact overlap and gains the entry's
/// contribution; the remainders keep only the prior contributions. A cycle
/// whose range equals the entry's collapses to a single updated part.
fn split_cycle(cycle: &Cycle, entry: &LineEntry) -> Vec<Cycle> {
    let mut parts = Vec::with_capacity(3);

    if cycle.initial_month < entry.initial_month {
        parts.push(Cycle {
            final_month: entry.initial_month - 1,
            ..cycle.clone()
        });
    }

    let mut middle = Cycle {
        initial_month: cycle.initial_month.max(entry.initial_month),
        final_month: cycle.final_month.min(entry.final_month),
        ..cycle.clone()
    };
    middle.base_amounts.push(BaseAmount::from_entry(entry));
    parts.push(middle);

    if cycle.final_month > entry.final_month {
        parts.push(Cycle {
            initial_month: entry.final_month + 1,
            ..cycle.clone()
        });
    }

    if parts.len() > 1 {
        debug!(
            from = entry.initial_month,
            to = entry.final_month,
            parts = parts.len(),
            "split cycle"
        );
    }

    parts
}

// ============================================================================
// UNGROUPING
// ============================================================================

/// Flatten cycles back into one row per contribution.
///
/// Empty input yields the single seed row the UI bootstraps an empty table
/// with. A cycle without contributions yields one placeholder row carrying
/// only its range and id. Rows come out in cycle order, contributions in
/// their stored order.
pub fn ungroup_cycles(cycles: &[Cycle]) -> Vec<LineEntry> {
    if cycles.is_empty() {
        return vec![LineEntry::seed_row()];
    }

    let mut rows = Vec::new();

    for cycle in cycles {
        if cycle.base_amounts.is_empty() {
            rows.push(LineEntry {
                id: None,
                cycle_id: cycle.id.clone(),
                initial_month: cycle.initial_month,
                final_month: cycle.final_month,
                amount: 0.0,
                entry_type: String::new(),
                description: String::new(),
                adjustment: 0.0,
                adjustable: false,
            });
            continue;
        }

        for base in &cycle.base_amounts {
            rows.push(LineEntry {
                id: base.id.clone().filter(|id| !id.is_empty()),
                cycle_id: cycle.id.clone(),
                initial_month: cycle.initial_month,
                final_month: cycle.final_month,
                amount: base.amount,
                entry_type: base.entry_type.clone(),
                description: base.description.clone(),
                adjustment: base.adjustment,
                adjustable: base.adjustable,
            });
        }
    }

    rows
}

// ============================================================================
// WIRE COERCION (string-or-number payloads)
// ============================================================================

/// Best-effort numeric read of a wire value. Numbers pass through, numeric
/// strings parse, everything else reads as 0.
fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_number(&value))
}

fn month_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_number(&value) as i64)
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn bool_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or(false))
}

// ============================================================================
// TESTS
// ============================================================================
