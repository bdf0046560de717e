//! Benchmarks for the widget adapter change path.
//!
//! Target: one change batch through the table adapter < 100μs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::cell::RefCell;
use std::rc::Rc;
use vitrine_core::{Entity, EntityId, FetchContext, IndexPath, SortDescriptor};
use vitrine_datasource::{
    EntityCell, PickerDataSource, PickerWidget, TableDataSource, TableWidget,
};
use vitrine_memory::MemoryContext;

#[derive(Clone, Debug)]
struct Track {
    id: EntityId,
    title: String,
    genre: String,
}

impl Entity for Track {
    fn entity_id(&self) -> EntityId {
        self.id
    }
}

fn track(id: EntityId, title: &str, genre: &str) -> Track {
    Track {
        id,
        title: title.to_string(),
        genre: genre.to_string(),
    }
}

#[derive(Default)]
struct Slot(Option<EntityId>);

impl EntityCell<Track> for Slot {
    fn set_entity(&mut self, entity: Option<Track>) {
        self.0 = entity.map(|t| t.id);
    }
}

/// Structural table fake so the bench pays for realistic row shuffling.
#[derive(Default)]
struct BenchTable {
    sections: Vec<Vec<Slot>>,
}

impl TableWidget<Track> for BenchTable {
    fn begin_updates(&mut self) {}
    fn end_updates(&mut self) {}
    fn insert_row(&mut self, at: IndexPath) {
        self.sections[at.section].insert(at.row, Slot::default());
    }
    fn delete_row(&mut self, at: IndexPath) {
        self.sections[at.section].remove(at.row);
    }
    fn move_row(&mut self, from: IndexPath, to: IndexPath) {
        let slot = self.sections[from.section].remove(from.row);
        self.sections[to.section].insert(to.row, slot);
    }
    fn insert_section(&mut self, index: usize) {
        self.sections.insert(index, Vec::new());
    }
    fn delete_section(&mut self, index: usize) {
        self.sections.remove(index);
    }
    fn reload_section(&mut self, _index: usize) {}
    fn reload_data(&mut self) {}
    fn cell_at(&mut self, at: IndexPath) -> Option<&mut dyn EntityCell<Track>> {
        self.sections
            .get_mut(at.section)
            .and_then(|rows| rows.get_mut(at.row))
            .map(|slot| slot as &mut dyn EntityCell<Track>)
    }
    fn dequeue_cell(
        &mut self,
        _reuse_identifier: &str,
        at: IndexPath,
    ) -> &mut dyn EntityCell<Track> {
        &mut self.sections[at.section][at.row]
    }
}

struct Wheel;

impl PickerWidget for Wheel {
    fn reload_all_components(&mut self) {}
}

type Store = Rc<RefCell<MemoryContext<Track>>>;
type Table = TableDataSource<Track, MemoryContext<Track>, BenchTable>;

fn by_title() -> SortDescriptor<Track> {
    SortDescriptor::by_key("title", true, |t: &Track| t.title.clone())
}

/// Seeds `rows` tracks, starts the live query, and primes the fake's
/// structure to match.
fn table_fixture(rows: usize) -> (Store, Rc<RefCell<BenchTable>>, Table) {
    let store: Store = Rc::new(RefCell::new(MemoryContext::new(|id| track(id, "", ""))));
    for i in 0..rows {
        store.borrow_mut().insert_entity(track(
            (i + 1) as EntityId,
            &format!("t{:05}", i),
            "rock",
        ));
    }
    let widget = Rc::new(RefCell::new(BenchTable::default()));
    let mut adapter = TableDataSource::new(widget.clone(), "TrackCell", store.clone(), None);
    adapter.set_sort_descriptors(vec![by_title()]);
    adapter.initiate_fetch();
    widget.borrow_mut().sections = vec![(0..rows).map(|_| Slot::default()).collect()];
    (store, widget, adapter)
}

fn bench_initiate_fetch(c: &mut Criterion) {
    let mut group = c.benchmark_group("fetch");

    for size in [100, 1000] {
        let (_store, _widget, mut adapter) = table_fixture(size);
        group.bench_with_input(BenchmarkId::new("initiate", size), &size, |b, _| {
            b.iter(|| adapter.initiate_fetch())
        });
    }

    group.finish();
}

fn bench_change_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("change");

    // Insert plus delete per iteration, so the result set stays put.
    for size in [100, 1000] {
        let (store, _widget, _adapter) = table_fixture(size);
        group.bench_with_input(BenchmarkId::new("insert_delete", size), &size, |b, _| {
            b.iter(|| {
                store
                    .borrow_mut()
                    .insert_entity(track(9_000_000, "mmmmm", "rock"));
                store.borrow_mut().delete(9_000_000);
            })
        });
    }

    // In-place update: the sort key is untouched, so each iteration is
    // one update event reconfiguring a visible cell.
    for size in [100, 1000] {
        let (store, _widget, _adapter) = table_fixture(size);
        group.bench_with_input(BenchmarkId::new("update_in_place", size), &size, |b, _| {
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                let genre = if flip { "jazz" } else { "rock" };
                store
                    .borrow_mut()
                    .update(track(1, "t00000", genre))
                    .unwrap();
            })
        });
    }

    // Sort-key update bouncing one row between the ends of the list.
    for size in [100, 1000] {
        let (store, _widget, _adapter) = table_fixture(size);
        group.bench_with_input(BenchmarkId::new("move_across", size), &size, |b, _| {
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                let title = if flip { "zzzzzz" } else { "aaaaaa" };
                store.borrow_mut().update(track(1, title, "rock")).unwrap();
            })
        });
    }

    group.finish();
}

fn bench_picker_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("picker");

    for size in [100, 1000] {
        let store: Store = Rc::new(RefCell::new(MemoryContext::new(|id| track(id, "", ""))));
        for i in 0..size {
            store.borrow_mut().insert_entity(track(
                (i + 1) as EntityId,
                &format!("t{:05}", i),
                "rock",
            ));
        }
        let wheel = Rc::new(RefCell::new(Wheel));
        let mut picker = PickerDataSource::new(wheel, store.clone(), None, true);
        picker.set_sort_descriptors(vec![by_title()]);
        picker.initiate_fetch();
        let middle = store.borrow().get((size / 2) as EntityId).unwrap();

        group.bench_with_input(BenchmarkId::new("entity_at_row", size), &size, |b, _| {
            b.iter(|| picker.entity_at_row(black_box(size / 2)))
        });
        group.bench_with_input(BenchmarkId::new("row_for_entity", size), &size, |b, _| {
            b.iter(|| picker.row_for_entity(black_box(&middle)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_initiate_fetch,
    bench_change_path,
    bench_picker_lookups,
);

criterion_main!(benches);
