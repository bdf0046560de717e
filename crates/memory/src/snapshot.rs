//! Materialized result sets.
//!
//! A `Snapshot` is one consistent state of a fetch: the matching entities,
//! sorted and grouped into sections. Controllers hold the current snapshot
//! and rebuild it from the entity map on every store mutation.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use vitrine_core::{Entity, EntityId, FetchRequest, IndexPath, SectionInfo};

/// One section of a snapshot.
#[derive(Clone, Debug)]
pub(crate) struct Section<E> {
    pub(crate) name: String,
    pub(crate) objects: Vec<E>,
}

/// A filtered, sorted, sectioned view over an entity map.
///
/// An empty snapshot (zero sections) is the pre-fetch state. A fetched
/// unsectioned request always has exactly one section with an empty name.
#[derive(Clone, Debug)]
pub(crate) struct Snapshot<E> {
    sections: Vec<Section<E>>,
}

impl<E: Entity> Snapshot<E> {
    /// The pre-fetch snapshot: no sections at all.
    pub(crate) fn empty() -> Self {
        Self { sections: Vec::new() }
    }

    /// Materializes `request` against `entities`.
    ///
    /// The sort is stable over the map's id order, so entities the
    /// descriptor chain does not distinguish keep a deterministic order.
    /// Sections are formed by grouping consecutive section-key values
    /// after sorting.
    pub(crate) fn build(request: &FetchRequest<E>, entities: &BTreeMap<EntityId, E>) -> Self {
        let mut matched: Vec<E> = entities
            .values()
            .filter(|entity| request.matches(entity))
            .cloned()
            .collect();
        matched.sort_by(|a, b| request.compare(a, b));

        if !request.is_sectioned() {
            return Self {
                sections: alloc::vec![Section {
                    name: String::new(),
                    objects: matched,
                }],
            };
        }

        let mut sections: Vec<Section<E>> = Vec::new();
        for entity in matched {
            let name = request.section_of(&entity).unwrap_or_default();
            match sections.last_mut() {
                Some(section) if section.name == name => section.objects.push(entity),
                _ => sections.push(Section {
                    name,
                    objects: alloc::vec![entity],
                }),
            }
        }
        Self { sections }
    }

    pub(crate) fn section_infos(&self) -> Vec<SectionInfo> {
        self.sections
            .iter()
            .map(|section| SectionInfo::new(section.name.clone(), section.objects.len()))
            .collect()
    }

    pub(crate) fn number_of_sections(&self) -> usize {
        self.sections.len()
    }

    pub(crate) fn number_of_rows(&self, section: usize) -> usize {
        self.sections
            .get(section)
            .map(|section| section.objects.len())
            .unwrap_or(0)
    }

    pub(crate) fn section_name(&self, section: usize) -> Option<&str> {
        self.sections.get(section).map(|section| section.name.as_str())
    }

    pub(crate) fn has_section_named(&self, name: &str) -> bool {
        self.sections.iter().any(|section| section.name == name)
    }

    pub(crate) fn object_at(&self, at: IndexPath) -> Option<&E> {
        self.sections.get(at.section)?.objects.get(at.row)
    }

    pub(crate) fn object_at_index(&self, index: usize) -> Option<&E> {
        self.iter().nth(index)
    }

    pub(crate) fn index_path_of(&self, id: EntityId) -> Option<IndexPath> {
        for (section_index, section) in self.sections.iter().enumerate() {
            for (row, entity) in section.objects.iter().enumerate() {
                if entity.entity_id() == id {
                    return Some(IndexPath::new(section_index, row));
                }
            }
        }
        None
    }

    pub(crate) fn index_of(&self, id: EntityId) -> Option<usize> {
        self.iter().position(|entity| entity.entity_id() == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.sections.iter().map(|section| section.objects.len()).sum()
    }

    /// Iterates entities in section-major order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &E> {
        self.sections.iter().flat_map(|section| section.objects.iter())
    }
}
