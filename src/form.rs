//! In-memory form state.
//!
//! `FormContext` owns every control the actions read or write. It replaces
//! lookups of a global form element by id: callers build or deserialize a
//! context and pass it explicitly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::load_filter::LoadSlots;

/// Plain checkbox identified by its submitted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkbox {
    pub value: String,
    #[serde(default)]
    pub checked: bool,
}

impl Checkbox {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            checked: false,
        }
    }
}

/// Directory checkbox paired with its label text input.
///
/// The label is editable only while the directory is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub value: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub label_enabled: bool,
}

impl DirectoryEntry {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            checked: false,
            label: String::new(),
            label_enabled: false,
        }
    }

    /// Check or uncheck, keeping the label's enabled state in step.
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
        self.label_enabled = checked;
    }

    fn reset(&mut self) {
        self.checked = false;
        self.label_enabled = false;
        self.label.clear();
    }
}

/// Accordion section of metric checkboxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricGroup {
    pub id: String,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default)]
    pub metrics: Vec<Checkbox>,
}

impl MetricGroup {
    pub fn new<I, S>(id: impl Into<String>, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            expanded: false,
            metrics: metrics.into_iter().map(Checkbox::new).collect(),
        }
    }

    pub fn set_all(&mut self, checked: bool) {
        for m in &mut self.metrics {
            m.checked = checked;
        }
    }

    pub fn checked(&self) -> Vec<String> {
        self.metrics
            .iter()
            .filter(|m| m.checked)
            .map(|m| m.value.clone())
            .collect()
    }
}

/// Named radio group; at most one option is selected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RadioGroup {
    pub options: Vec<String>,
    #[serde(default)]
    pub selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormContext {
    /// Text and select inputs by id.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    /// Radio groups by name.
    #[serde(default)]
    pub radios: BTreeMap<String, RadioGroup>,
    /// Standalone boolean checkboxes by id.
    #[serde(default)]
    pub toggles: BTreeMap<String, bool>,
    #[serde(default)]
    pub directories: Vec<DirectoryEntry>,
    #[serde(default)]
    pub metric_groups: Vec<MetricGroup>,
    /// Load inputs `load-0`..`load-(N-1)`.
    #[serde(default)]
    pub loads: Vec<String>,
}

impl FormContext {
    /// Blank form with `load_slots` empty load inputs.
    pub fn with_load_slots(load_slots: usize) -> Self {
        Self {
            loads: vec![String::new(); load_slots],
            ..Self::default()
        }
    }

    pub fn field(&self, id: &str) -> Result<&str, FormError> {
        self.fields
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| FormError::MissingElement(id.to_string()))
    }

    /// Like [`field`](Self::field) but absent inputs read as `""`.
    pub fn field_or_empty(&self, id: &str) -> &str {
        self.fields.get(id).map(String::as_str).unwrap_or("")
    }

    pub fn set_field(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(id.into(), value.into());
    }

    pub fn radio_value(&self, name: &str) -> Option<&str> {
        self.radios.get(name).and_then(|g| g.selected.as_deref())
    }

    pub fn select_radio(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let group = self
            .radios
            .get_mut(name)
            .ok_or_else(|| FormError::MissingElement(name.to_string()))?;
        if !group.options.iter().any(|o| o == value) {
            return Err(FormError::MissingElement(format!("{name}={value}")));
        }
        group.selected = Some(value.to_string());
        Ok(())
    }

    pub fn toggle(&self, id: &str) -> bool {
        self.toggles.get(id).copied().unwrap_or(false)
    }

    pub fn set_toggle(&mut self, id: impl Into<String>, on: bool) {
        self.toggles.insert(id.into(), on);
    }

    pub fn directory_mut(&mut self, value: &str) -> Result<&mut DirectoryEntry, FormError> {
        self.directories
            .iter_mut()
            .find(|d| d.value == value)
            .ok_or_else(|| FormError::MissingElement(value.to_string()))
    }

    pub fn checked_directories(&self) -> Vec<String> {
        self.directories
            .iter()
            .filter(|d| d.checked)
            .map(|d| d.value.clone())
            .collect()
    }

    /// Labels of the checked directories, in the same order.
    pub fn directory_labels(&self) -> Vec<String> {
        self.directories
            .iter()
            .filter(|d| d.checked)
            .map(|d| d.label.clone())
            .collect()
    }

    pub fn select_all_directories(&mut self) {
        for d in &mut self.directories {
            d.set_checked(true);
        }
    }

    pub fn deselect_all_directories(&mut self) {
        for d in &mut self.directories {
            d.set_checked(false);
        }
    }

    /// Initial page state: nothing checked, labels disabled and blank.
    pub fn reset_directories(&mut self) {
        for d in &mut self.directories {
            d.reset();
        }
    }

    pub fn metric_group_mut(&mut self, id: &str) -> Result<&mut MetricGroup, FormError> {
        self.metric_groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| FormError::MissingElement(id.to_string()))
    }

    pub fn select_all_metrics(&mut self) {
        for g in &mut self.metric_groups {
            g.set_all(true);
        }
    }

    pub fn deselect_all_metrics(&mut self) {
        for g in &mut self.metric_groups {
            g.set_all(false);
        }
    }

    /// Check the first metric checkbox with this value, in any group.
    pub fn check_metric(&mut self, value: &str) -> bool {
        for g in &mut self.metric_groups {
            if let Some(m) = g.metrics.iter_mut().find(|m| m.value == value) {
                m.checked = true;
                return true;
            }
        }
        false
    }

    pub fn checked_metrics(&self) -> Vec<String> {
        self.metric_groups.iter().flat_map(|g| g.checked()).collect()
    }

    /// Checked metrics by group id; groups with nothing checked are left out.
    pub fn grouped_metrics(&self) -> BTreeMap<String, Vec<String>> {
        self.metric_groups
            .iter()
            .filter_map(|g| {
                let checked = g.checked();
                (!checked.is_empty()).then(|| (g.id.clone(), checked))
            })
            .collect()
    }

    /// Non-empty load inputs keyed by their slot index as a string.
    pub fn load_map(&self) -> BTreeMap<String, String> {
        self.loads
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_empty())
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect()
    }
}

impl LoadSlots for FormContext {
    fn slot_count(&self) -> usize {
        self.loads.len()
    }

    fn set_slot(&mut self, index: usize, value: &str) {
        self.loads[index] = value.to_string();
    }
}
