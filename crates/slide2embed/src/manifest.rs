use std::path::Path;

use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;

use crate::logging;

/// Slide manifest grouped by patient. Group order is first appearance
/// in the table; slide order within a group is row order, which fixes
/// left-to-right placement in the virtual slide.
#[derive(Debug)]
pub struct SlideTable {
    groups: IndexMap<String, Vec<String>>,
}

impl SlideTable {
    pub fn load(path: &Path, patient_label: &str, filename_label: &str) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to read slide table {}", path.display()))?;
        let headers = reader.headers()?.clone();
        let patient_idx = headers
            .iter()
            .position(|header| header == patient_label)
            .ok_or_else(|| anyhow!("slide table has no '{patient_label}' column"))?;
        let filename_idx = headers
            .iter()
            .position(|header| header == filename_label)
            .ok_or_else(|| anyhow!("slide table has no '{filename_label}' column"))?;
        let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("bad manifest row {}", row + 2))?;
            let patient = record.get(patient_idx).unwrap_or("").trim();
            let filename = record.get(filename_idx).unwrap_or("").trim();
            if patient.is_empty() || filename.is_empty() {
                logging::verbose(format!("ignoring manifest row {} with empty fields", row + 2));
                continue;
            }
            groups
                .entry(patient.to_string())
                .or_default()
                .push(filename.to_string());
        }
        Ok(Self { groups })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.groups.iter()
    }
}
