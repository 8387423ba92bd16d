// Type directory: every extracted record, keyed by name, in first-seen order

use crate::config::DuplicatePolicy;
use crate::parser::{ParsedUnit, TypeRecord};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// A type name declared more than once across the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub name: String,
    /// Unit holding the record that was kept
    pub first: PathBuf,
    /// Unit of the later declaration
    pub other: PathBuf,
}

#[derive(Debug, Clone)]
struct Entry {
    origin: PathBuf,
    record: TypeRecord,
}

/// Ordered mapping from type name to its record.
///
/// Iteration follows first insertion, so output order follows input order.
/// The directory is read-only once built.
#[derive(Debug, Clone, Default)]
pub struct TypeDirectory {
    entries: IndexMap<String, Entry>,
}

impl TypeDirectory {
    /// Merge the records of every unit, in the order the units are given
    pub fn build(
        units: impl IntoIterator<Item = ParsedUnit>,
        policy: DuplicatePolicy,
    ) -> (Self, Vec<Duplicate>) {
        let mut directory = Self::default();
        let mut duplicates = Vec::new();

        for unit in units {
            for record in unit.types {
                if let Some(duplicate) = directory.insert(&unit.path, record, policy) {
                    tracing::warn!(
                        name = %duplicate.name,
                        first = %duplicate.first.display(),
                        other = %duplicate.other.display(),
                        ?policy,
                        "type declared more than once"
                    );
                    duplicates.push(duplicate);
                }
            }
        }

        (directory, duplicates)
    }

    fn insert(
        &mut self,
        origin: &Path,
        record: TypeRecord,
        policy: DuplicatePolicy,
    ) -> Option<Duplicate> {
        match self.entries.get_mut(&record.name) {
            Some(existing) => {
                let duplicate = Duplicate {
                    name: record.name.clone(),
                    first: existing.origin.clone(),
                    other: origin.to_path_buf(),
                };
                if policy == DuplicatePolicy::Merge {
                    existing.record.merge(record);
                }
                Some(duplicate)
            }
            None => {
                self.entries.insert(
                    record.name.clone(),
                    Entry {
                        origin: origin.to_path_buf(),
                        record,
                    },
                );
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypeRecord> {
        self.entries.get(name).map(|e| &e.record)
    }

    /// Unit the record was first seen in
    pub fn origin(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(|e| e.origin.as_path())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Records in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &TypeRecord> {
        self.entries.values().map(|e| &e.record)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn interface_count(&self) -> usize {
        self.iter().filter(|r| r.is_interface()).count()
    }
}
