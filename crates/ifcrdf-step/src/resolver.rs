//! Reference resolution and duplicate merging.
//!
//! Both passes run strictly after the whole file has been parsed. Duplicate
//! merging removes records whose statement text is identical to an earlier
//! record and remembers where they went. Resolution then checks every
//! reference (through that index first) and fails the whole file when a
//! target does not exist.

use crate::error::StepError;
use crate::record::{ContentKey, Record, RecordTable, Value};
use std::collections::HashMap;
use tracing::{debug, error, info, trace, warn};

/// Deepest list nesting whose references are resolved (0 = record attributes).
const MAX_LIST_DEPTH: usize = 2;

/// Maps ids of removed duplicate records to their canonical record.
#[derive(Debug, Clone, Default)]
pub struct DuplicateIndex {
    redirects: HashMap<u64, u64>,
}

impl DuplicateIndex {
    /// Canonical id for a removed duplicate.
    pub fn get(&self, id: u64) -> Option<u64> {
        self.redirects.get(&id).copied()
    }

    /// Canonical id for any id: the redirect if there is one, otherwise the id itself.
    pub fn canonical(&self, id: u64) -> u64 {
        self.get(id).unwrap_or(id)
    }

    /// Number of removed duplicates.
    pub fn len(&self) -> usize {
        self.redirects.len()
    }

    /// True if no duplicates were found.
    pub fn is_empty(&self) -> bool {
        self.redirects.is_empty()
    }
}

/// Counters collected during resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// References resolved in this pass.
    pub resolved: usize,
    /// References already resolved while parsing.
    pub already_resolved: usize,
    /// References moved to a canonical record.
    pub redirected: usize,
}

/// Remove records whose statement text duplicates an earlier record.
///
/// The record with the lowest id is canonical. Records without a content key
/// (parsed without [`crate::ParseOptions::retain_content_keys`]) never merge.
pub fn merge_duplicates(table: &mut RecordTable) -> DuplicateIndex {
    let mut canonical: HashMap<ContentKey, u64> = HashMap::new();
    let mut index = DuplicateIndex::default();
    let mut missing_keys = 0usize;

    for record in table.iter() {
        let Some(key) = record.content_key else {
            missing_keys += 1;
            continue;
        };
        match canonical.get(&key) {
            Some(&first) => {
                trace!(record = record.id, canonical = first, "found duplicate");
                index.redirects.insert(record.id, first);
            }
            None => {
                canonical.insert(key, record.id);
            }
        }
    }

    if missing_keys > 0 {
        warn!(
            records = missing_keys,
            "records without content key were not checked for duplicates"
        );
    }
    for id in index.redirects.keys() {
        table.remove(*id);
    }
    info!(duplicates = index.len(), "found and removed duplicates");
    index
}

/// Replace every reference with a checked, resolved reference.
///
/// References are looked up through `duplicates` first, then the table.
/// Lists are descended up to two levels deep. A reference whose target is
/// missing fails the whole file.
pub fn resolve_references(
    table: &mut RecordTable,
    duplicates: Option<&DuplicateIndex>,
) -> Result<ResolveStats, StepError> {
    let mut stats = ResolveStats::default();

    for id in table.ids() {
        let Some(record) = table.get_mut(id) else {
            continue;
        };
        let mut attributes = std::mem::take(&mut record.attributes);
        let result = attributes
            .iter_mut()
            .try_for_each(|value| resolve_value(value, 0, table, duplicates, &mut stats));
        if let Some(record) = table.get_mut(id) {
            record.attributes = attributes;
        }

        if let Err(target) = result {
            let text = table.get(id).map(Record::to_string).unwrap_or_default();
            error!(record = id, target, text = %text, "reference to non-existing record");
            return Err(StepError::dangling(id, target, text));
        }
    }

    debug!(
        resolved = stats.resolved,
        during_parsing = stats.already_resolved,
        redirected = stats.redirected,
        "references resolved"
    );
    Ok(stats)
}

/// Resolve one value in place. On failure returns the missing target id.
fn resolve_value(
    value: &mut Value,
    depth: usize,
    table: &RecordTable,
    duplicates: Option<&DuplicateIndex>,
    stats: &mut ResolveStats,
) -> Result<(), u64> {
    let was_resolved = matches!(value, Value::Resolved(_));
    match value {
        Value::Unresolved(target) | Value::Resolved(target) => {
            let original = *target;
            let canonical = duplicates.map_or(original, |d| d.canonical(original));
            if !table.contains(canonical) {
                return Err(original);
            }
            if canonical != original {
                stats.redirected += 1;
            }
            if was_resolved {
                stats.already_resolved += 1;
            } else {
                stats.resolved += 1;
            }
            *value = Value::Resolved(canonical);
            Ok(())
        }
        Value::List(items) if depth < MAX_LIST_DEPTH => items
            .iter_mut()
            .try_for_each(|item| resolve_value(item, depth + 1, table, duplicates, stats)),
        _ => Ok(()),
    }
}
