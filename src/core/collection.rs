//! In-memory asset collection: canonical records, filtered view, sort and selection.
//!
//! The canonical list is replaced wholesale on every successful load and is
//! otherwise never reordered. Search derives the filtered view from it;
//! sort reorders only the filtered view. Selection is tracked by record id
//! and survives filtering, so ids hidden by the active search stay selected.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::{AssetRecord, SortConfig, SortDirection, SortKey};

/// Selection coverage of the currently visible records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// Nothing visible is selected (or nothing is visible)
    None,
    /// Some, but not all, visible records are selected
    Partial,
    /// Every visible record is selected
    All,
}

/// Owned asset collection
#[derive(Debug, Clone, Default)]
pub struct AssetCollection {
    /// Canonical records, in extraction order
    records: Vec<AssetRecord>,

    /// Indices into `records`, in display order
    filtered: Vec<usize>,

    /// Active sort column and direction
    sort: SortConfig,

    /// Selected record ids
    selected: HashSet<String>,

    /// Last applied search query (trimmed, lower-cased)
    query: String,
}

impl AssetCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the canonical list, reset the filtered view and clear the selection
    pub fn load(&mut self, records: Vec<AssetRecord>) {
        self.filtered = (0..records.len()).collect();
        self.records = records;
        self.selected.clear();
        self.query.clear();
    }

    /// Filter the canonical list by a case-insensitive substring of name, url or extension.
    ///
    /// Always starts again from canonical order, so any earlier sort of the
    /// filtered view is dropped. The sort configuration itself is kept.
    pub fn search(&mut self, query: &str) {
        self.query = query.trim().to_lowercase();

        self.filtered = if self.query.is_empty() {
            (0..self.records.len()).collect()
        } else {
            self.records
                .iter()
                .enumerate()
                .filter(|(_, record)| record.matches(&self.query))
                .map(|(idx, _)| idx)
                .collect()
        };
    }

    /// Set the sort configuration explicitly and reorder the filtered view
    pub fn sort(&mut self, key: SortKey, direction: SortDirection) {
        self.sort = SortConfig {
            key: Some(key),
            direction,
        };
        self.apply_sort();
    }

    /// Sort as a column header click would: the active key flips direction,
    /// a new key starts ascending.
    pub fn sort_by_click(&mut self, key: SortKey) {
        self.sort.click(key);
        self.apply_sort();
    }

    fn apply_sort(&mut self) {
        let Some(key) = self.sort.key.as_ref() else {
            return;
        };
        let direction = self.sort.direction;
        let records = &self.records;

        // Vec::sort_by is stable, so equal keys keep their current relative order
        self.filtered.sort_by(|&a, &b| {
            let ordering = compare(&records[a], &records[b], key);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    /// Flip one record's selection. Returns whether it is now selected.
    ///
    /// Works whether or not the record is currently visible; ids that are not
    /// in the canonical list are ignored.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Set one record's selection explicitly
    pub fn set_checked(&mut self, id: &str, checked: bool) {
        if !self.contains(id) {
            return;
        }
        if checked {
            self.selected.insert(id.to_string());
        } else {
            self.selected.remove(id);
        }
    }

    /// Select every visible record; hidden selections are left alone
    pub fn select_all(&mut self) {
        self.select_all_checked(true);
    }

    /// Deselect every visible record; hidden selections are left alone
    pub fn deselect_all(&mut self) {
        self.select_all_checked(false);
    }

    /// Set the selection of every visible record
    pub fn select_all_checked(&mut self, checked: bool) {
        for &idx in &self.filtered {
            let id = &self.records[idx].id;
            if checked {
                self.selected.insert(id.clone());
            } else {
                self.selected.remove(id);
            }
        }
    }

    /// Select all visible records unless they already are, in which case
    /// deselect them. Returns whether the visible records end up selected.
    pub fn toggle_select_all(&mut self) -> bool {
        let select = !self.all_filtered_selected();
        self.select_all_checked(select);
        select
    }

    /// Whether every visible record is selected (vacuously true when none are visible)
    pub fn all_filtered_selected(&self) -> bool {
        self.filtered
            .iter()
            .all(|&idx| self.selected.contains(&self.records[idx].id))
    }

    /// Selection coverage of the visible records
    pub fn selection_state(&self) -> SelectionState {
        let selected = self
            .filtered
            .iter()
            .filter(|&&idx| self.selected.contains(&self.records[idx].id))
            .count();

        if selected == 0 {
            SelectionState::None
        } else if selected == self.filtered.len() {
            SelectionState::All
        } else {
            SelectionState::Partial
        }
    }

    /// Canonical records, in extraction order
    pub fn records(&self) -> &[AssetRecord] {
        &self.records
    }

    /// Visible records, in display order
    pub fn filtered(&self) -> Vec<&AssetRecord> {
        self.filtered.iter().map(|&idx| &self.records[idx]).collect()
    }

    /// Number of visible records
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Selected records, in canonical order
    pub fn selected_records(&self) -> Vec<&AssetRecord> {
        self.records
            .iter()
            .filter(|record| self.selected.contains(&record.id))
            .collect()
    }

    /// Selected ids, in canonical order
    pub fn selected_ids(&self) -> Vec<&str> {
        self.selected_records()
            .into_iter()
            .map(|record| record.id.as_str())
            .collect()
    }

    /// Number of selected records, visible or not
    pub fn selected_len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&AssetRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn sort_config(&self) -> &SortConfig {
        &self.sort
    }

    /// Last applied search query, normalized
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A record field value as seen by the sort comparator
enum SortValue<'a> {
    Number(u64),
    Text(&'a str),
}

fn sort_value<'a>(record: &'a AssetRecord, key: &SortKey) -> SortValue<'a> {
    match key {
        SortKey::Size => SortValue::Number(record.size),
        SortKey::Name => SortValue::Text(&record.display_name),
        SortKey::Width => SortValue::Number(record.area()),
        SortKey::Field(field) => match field.as_str() {
            "size" => SortValue::Number(record.size),
            "width" => SortValue::Number(record.width.unwrap_or(0)),
            "height" => SortValue::Number(record.height.unwrap_or(0)),
            "id" => SortValue::Text(&record.id),
            "name" | "display_name" => SortValue::Text(&record.display_name),
            "url" => SortValue::Text(record.url.as_deref().unwrap_or("")),
            "ext" => SortValue::Text(&record.ext),
            "type" => SortValue::Text(&record.asset_type),
            _ => SortValue::Text(""),
        },
    }
}

fn compare(a: &AssetRecord, b: &AssetRecord, key: &SortKey) -> Ordering {
    match (sort_value(a, key), sort_value(b, key)) {
        (SortValue::Number(x), SortValue::Number(y)) => x.cmp(&y),
        (SortValue::Text(x), SortValue::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        // A key maps every record to the same variant
        (SortValue::Number(_), SortValue::Text(_)) => Ordering::Greater,
        (SortValue::Text(_), SortValue::Number(_)) => Ordering::Less,
    }
}
