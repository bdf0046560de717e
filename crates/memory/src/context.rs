//! In-memory fetch context.

use crate::controller::{MemoryController, Mutation};
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use vitrine_core::{
    next_entity_id, set_next_entity_id_if_greater, Entity, EntityId, Error, FetchContext,
    FetchRequest, Result,
};

/// An entity store held entirely in memory.
///
/// The context owns the entity map and a registry of live controllers; every
/// mutation flows to the controllers synchronously, before the mutating call
/// returns. `save` is a durability point only and never changes the graph,
/// which makes the failure-injection hooks below sufficient to exercise a
/// host's error paths.
pub struct MemoryContext<E: Entity> {
    entities: Rc<RefCell<BTreeMap<EntityId, E>>>,
    controllers: RefCell<Vec<Weak<RefCell<MemoryController<E>>>>>,
    make_entity: Box<dyn Fn(EntityId) -> E>,
    fail_fetches: Rc<Cell<bool>>,
    fail_saves: Cell<bool>,
}

impl<E: Entity> MemoryContext<E> {
    /// Creates an empty context. `make_entity` produces the blank entity
    /// `insert` hands out, already carrying its minted id.
    pub fn new<F>(make_entity: F) -> Self
    where
        F: Fn(EntityId) -> E + 'static,
    {
        Self {
            entities: Rc::new(RefCell::new(BTreeMap::new())),
            controllers: RefCell::new(Vec::new()),
            make_entity: Box::new(make_entity),
            fail_fetches: Rc::new(Cell::new(false)),
            fail_saves: Cell::new(false),
        }
    }

    /// Adds an existing entity value to the graph, replacing any previous
    /// state of the same entity. The id allocator is advanced past the
    /// entity's id so later `insert` calls cannot collide; `EntityId::MAX`
    /// cannot be advanced past and leaves the allocator untouched.
    pub fn insert_entity(&mut self, entity: E) {
        let id = entity.entity_id();
        if let Some(next) = id.checked_add(1) {
            set_next_entity_id_if_greater(next);
        }
        let replaced = self
            .entities
            .borrow_mut()
            .insert(id, entity.clone())
            .is_some();
        if replaced {
            self.broadcast(Mutation::Updated(entity));
        } else {
            self.broadcast(Mutation::Inserted(entity));
        }
    }

    /// Replaces the state of an entity already in the graph.
    pub fn update(&mut self, entity: E) -> Result<()> {
        let id = entity.entity_id();
        {
            let mut entities = self.entities.borrow_mut();
            if !entities.contains_key(&id) {
                return Err(Error::not_found(id));
            }
            entities.insert(id, entity.clone());
        }
        self.broadcast(Mutation::Updated(entity));
        Ok(())
    }

    /// Returns the current state of the entity with `id`.
    pub fn get(&self, id: EntityId) -> Option<E> {
        self.entities.borrow().get(&id).cloned()
    }

    /// Returns true if the graph contains the entity with `id`.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.borrow().contains_key(&id)
    }

    /// Returns the number of entities in the graph.
    pub fn len(&self) -> usize {
        self.entities.borrow().len()
    }

    /// Returns true if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.borrow().is_empty()
    }

    /// Returns the number of live controllers.
    pub fn controller_count(&self) -> usize {
        self.controllers
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Makes every subsequent fetch fail until reset. Lets hosts exercise
    /// their fetch error paths.
    pub fn set_fail_fetches(&self, fail: bool) {
        self.fail_fetches.set(fail);
    }

    /// Makes every subsequent save fail until reset. Lets hosts exercise
    /// their save error paths.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Routes one mutation to every live controller, pruning dead entries.
    fn broadcast(&self, mutation: Mutation<E>) {
        let mut live: Vec<Rc<RefCell<MemoryController<E>>>> = Vec::new();
        self.controllers.borrow_mut().retain(|weak| match weak.upgrade() {
            Some(controller) => {
                live.push(controller);
                true
            }
            None => false,
        });

        for controller in live {
            let batch = controller.borrow_mut().apply_mutation(&mutation);
            if !batch.is_empty() {
                controller.borrow().notify(&batch);
            }
        }
    }
}

impl<E: Entity> FetchContext<E> for MemoryContext<E> {
    type Controller = MemoryController<E>;

    fn controller(&self, request: FetchRequest<E>) -> Rc<RefCell<Self::Controller>> {
        let controller = Rc::new(RefCell::new(MemoryController::new(
            request,
            Rc::downgrade(&self.entities),
            Rc::downgrade(&self.fail_fetches),
        )));
        self.controllers.borrow_mut().push(Rc::downgrade(&controller));
        controller
    }

    fn insert(&mut self) -> E {
        let id = next_entity_id();
        let entity = (self.make_entity)(id);
        self.entities.borrow_mut().insert(id, entity.clone());
        self.broadcast(Mutation::Inserted(entity.clone()));
        entity
    }

    fn delete(&mut self, id: EntityId) {
        let removed = self.entities.borrow_mut().remove(&id).is_some();
        if removed {
            self.broadcast(Mutation::Deleted(id));
        }
    }

    fn save(&mut self) -> Result<()> {
        if self.fail_saves.get() {
            return Err(Error::save_failed("simulated save failure"));
        }
        Ok(())
    }
}
