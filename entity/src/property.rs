//! Observable entity properties and typed value bindings.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use schema::{PropEntry, ServerClass};

use crate::value::{PropertyValue, Vector};

/// Observer invoked with a property's new value after each decoded update.
pub type UpdateHandler = Box<dyn FnMut(&PropertyValue)>;

/// A single observable, named, typed slot of an entity.
///
/// A property's entry never changes after construction; its value is
/// mutated only through the update-application path.
pub struct Property {
    class: Arc<ServerClass>,
    index: usize,
    value: PropertyValue,
    handlers: Vec<UpdateHandler>,
}

impl Property {
    pub(crate) fn new(class: Arc<ServerClass>, index: usize) -> Self {
        let value = PropertyValue::default_for(&class.entries()[index].codec);
        Self {
            class,
            index,
            value,
            handlers: Vec::new(),
        }
    }

    /// Returns the flattened entry this property was built from.
    #[must_use]
    pub fn entry(&self) -> &PropEntry {
        &self.class.entries()[self.index]
    }

    /// Returns the property's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.entry().name
    }

    /// Returns the property's index within its entity.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the property's current value.
    #[must_use]
    pub const fn value(&self) -> &PropertyValue {
        &self.value
    }

    /// Registers an observer fired on every value update, after any
    /// previously registered observers.
    pub fn on_update(&mut self, handler: impl FnMut(&PropertyValue) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Binds the property's value to a typed destination.
    ///
    /// On every subsequent update the new value is converted and stored
    /// into the destination. The destination is not written at bind time;
    /// it keeps its caller-supplied value until the first update. Binding a
    /// destination whose shape does not match the property's codec is a
    /// caller error; such updates do not write through the binding.
    pub fn bind(&mut self, target: BindTarget) {
        self.on_update(move |value| target.store(value));
    }

    /// Sets the value and fires all registered observers in order.
    pub(crate) fn update(&mut self, value: PropertyValue) {
        self.value = value;
        for handler in &mut self.handlers {
            handler(&self.value);
        }
    }

    /// Sets the value without firing observers (baseline seeding).
    pub(crate) fn set_silent(&mut self, value: PropertyValue) {
        self.value = value;
    }

    /// Drops every registered observer.
    pub(crate) fn clear_handlers(&mut self) {
        self.handlers = Vec::new();
    }

    #[cfg(test)]
    pub(crate) fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name())
            .field("index", &self.index)
            .field("value", &self.value)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// A typed destination for a property binding.
///
/// One variant per supported value shape, each carrying a shared handle the
/// binding writes through. The handle keeps the destination alive for as
/// long as the binding exists, so a dropped consumer cannot leave a
/// dangling write target.
#[derive(Debug, Clone)]
pub enum BindTarget {
    /// Integer value stored as-is.
    Int(Rc<Cell<i64>>),
    /// Integer value read as a flag: `true` iff the value equals 1.
    BoolInt(Rc<Cell<bool>>),
    /// Float value stored as-is.
    Float32(Rc<Cell<f32>>),
    /// Float value widened to 64 bits.
    Float64(Rc<Cell<f64>>),
    /// String value, cloned on update.
    String(Rc<RefCell<String>>),
    /// Vector value stored as-is.
    Vector(Rc<Cell<Vector>>),
    /// Array elements, cloned on update.
    Array(Rc<RefCell<Vec<PropertyValue>>>),
}

impl BindTarget {
    fn store(&self, value: &PropertyValue) {
        match (self, value) {
            (Self::Int(cell), PropertyValue::Int(v)) => cell.set(*v),
            (Self::BoolInt(cell), PropertyValue::Int(v)) => cell.set(*v == 1),
            (Self::Float32(cell), PropertyValue::Float(v)) => cell.set(*v),
            (Self::Float64(cell), PropertyValue::Float(v)) => cell.set(f64::from(*v)),
            (Self::String(slot), PropertyValue::String(v)) => *slot.borrow_mut() = v.clone(),
            (Self::Vector(cell), PropertyValue::Vector(v)) => cell.set(*v),
            (Self::Array(slot), PropertyValue::Array(v)) => *slot.borrow_mut() = v.clone(),
            // Wrong-shape bindings are a caller error; nothing to write.
            _ => {}
        }
    }
}
