//! Entities and update application.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use bitstream::BitReader;
use schema::ServerClass;

use crate::delta::read_field_index;
use crate::error::{EntityError, EntityResult};
use crate::limits::DecodeLimits;
use crate::property::{BindTarget, Property};
use crate::scratch::IndexPool;
use crate::value::{decode_value, PropertyValue, Vector};

/// Half-extent of the cell grid; cell origins are stored as unsigned grid
/// indices and recentered by this amount.
const MAX_COORD: i64 = 16384;

const CELL_BITS_PROP: &str = "m_cellbits";
const CELL_X_PROP: &str = "m_cellX";
const CELL_Y_PROP: &str = "m_cellY";
const CELL_Z_PROP: &str = "m_cellZ";
const ORIGIN_PROP: &str = "m_vecOrigin";

type LifecycleHandler = Box<dyn FnMut()>;

/// A game object instance with a class-defined flat list of properties.
///
/// The property count is fixed at construction; property *i* always
/// corresponds to flattened entry *i* of the class.
pub struct Entity {
    class: Arc<ServerClass>,
    id: u32,
    props: Vec<Property>,
    on_destroy: Vec<LifecycleHandler>,
    on_create_finished: Vec<LifecycleHandler>,
    destroyed: bool,
}

impl Entity {
    /// Creates an entity of the given class, every property at its codec's
    /// default value.
    #[must_use]
    pub fn new(class: Arc<ServerClass>, id: u32) -> Self {
        let props = (0..class.entries().len())
            .map(|index| Property::new(Arc::clone(&class), index))
            .collect();
        Self {
            class,
            id,
            props,
            on_destroy: Vec::new(),
            on_create_finished: Vec::new(),
            destroyed: false,
        }
    }

    /// Returns the entity's server class.
    #[must_use]
    pub fn class(&self) -> &ServerClass {
        &self.class
    }

    /// Returns the entity's ID.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Returns all properties in wire order.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.props
    }

    /// Finds a property by name.
    ///
    /// Returns `Ok(None)` if no property matches. More than one match means
    /// the upstream schema flattening produced a corrupt class and is fatal.
    pub fn find_property(&self, name: &str) -> EntityResult<Option<&Property>> {
        Ok(self.find_property_index(name)?.map(|index| &self.props[index]))
    }

    /// Finds a property by name for mutation. Same contract as
    /// [`find_property`](Self::find_property).
    pub fn find_property_mut(&mut self, name: &str) -> EntityResult<Option<&mut Property>> {
        let found = self.find_property_index(name)?;
        Ok(found.map(move |index| &mut self.props[index]))
    }

    /// Binds a named property's value to a typed destination.
    ///
    /// Combines [`find_property_mut`](Self::find_property_mut) and
    /// [`Property::bind`]; absence of the property is an error here since a
    /// binding to nothing can never fire.
    pub fn bind_property(&mut self, name: &str, target: BindTarget) -> EntityResult<()> {
        match self.find_property_mut(name)? {
            Some(prop) => {
                prop.bind(target);
                Ok(())
            }
            None => Err(EntityError::MissingProperty {
                name: name.to_owned(),
            }),
        }
    }

    /// Reads one update record and applies it to this entity's properties,
    /// firing each changed property's observers in order.
    ///
    /// The record is one `new_way` bit, the changed-index list, then each
    /// changed property's value in index order. The scratch buffer for the
    /// index list comes from `pool` and goes back cleared on every path.
    pub fn apply_update(
        &mut self,
        reader: &mut BitReader<'_>,
        pool: &IndexPool,
        limits: &DecodeLimits,
    ) -> EntityResult<()> {
        let mut indices = pool.checkout();
        let result = self.apply_update_into(reader, limits, &mut indices);
        pool.give_back(indices);
        result
    }

    fn apply_update_into(
        &mut self,
        reader: &mut BitReader<'_>,
        limits: &DecodeLimits,
        indices: &mut Vec<usize>,
    ) -> EntityResult<()> {
        let new_way = reader.read_bit()?;

        let mut last = None;
        while let Some(index) = read_field_index(reader, last, new_way)? {
            if indices.len() >= limits.max_updated_props {
                return Err(EntityError::TooManyUpdates {
                    limit: limits.max_updated_props,
                    actual: indices.len() + 1,
                });
            }
            indices.push(index);
            last = Some(index);
        }

        for &index in indices.iter() {
            let Some(entry) = self.class.entry(index) else {
                return Err(EntityError::IndexOutOfRange {
                    index,
                    count: self.props.len(),
                });
            };
            let value = decode_value(&entry.codec, reader, limits)?;
            self.props[index].update(value);
        }
        Ok(())
    }

    /// Decodes a baseline record into a reusable snapshot of the properties
    /// it touches.
    ///
    /// Every property temporarily gets a recording observer, the record is
    /// applied through the normal update path, then every handler list is
    /// replaced with an empty one, pre-existing observers included. Use on
    /// a throwaway entity of the class, then seed real instances with
    /// [`apply_baseline`](Self::apply_baseline).
    pub fn capture_baseline(
        &mut self,
        reader: &mut BitReader<'_>,
        pool: &IndexPool,
        limits: &DecodeLimits,
    ) -> EntityResult<Baseline> {
        let captured: Rc<RefCell<HashMap<usize, PropertyValue>>> =
            Rc::new(RefCell::new(HashMap::new()));
        for (index, prop) in self.props.iter_mut().enumerate() {
            let sink = Rc::clone(&captured);
            prop.on_update(move |value| {
                sink.borrow_mut().insert(index, value.clone());
            });
        }

        let result = self.apply_update(reader, pool, limits);
        for prop in &mut self.props {
            prop.clear_handlers();
        }
        result?;

        // All recorder clones were just dropped with the handlers.
        let values = match Rc::try_unwrap(captured) {
            Ok(cell) => cell.into_inner(),
            Err(shared) => shared.borrow().clone(),
        };
        Ok(Baseline { values })
    }

    /// Seeds property values from a captured baseline without firing any
    /// observer.
    pub fn apply_baseline(&mut self, baseline: &Baseline) -> EntityResult<()> {
        for (&index, value) in &baseline.values {
            match self.props.get_mut(index) {
                Some(prop) => prop.set_silent(value.clone()),
                None => {
                    return Err(EntityError::IndexOutOfRange {
                        index,
                        count: self.props.len(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Reconstructs the entity's world-space position from its cell grid
    /// properties and fine origin offset.
    pub fn position(&self) -> EntityResult<Vector> {
        let exponent = self.int_prop(CELL_BITS_PROP)?;
        if !(0..=30).contains(&exponent) {
            return Err(EntityError::InvalidCellExponent { exponent });
        }
        let cell_width = 1i64 << exponent;

        let cell_x = self.int_prop(CELL_X_PROP)?;
        let cell_y = self.int_prop(CELL_Y_PROP)?;
        let cell_z = self.int_prop(CELL_Z_PROP)?;
        let offset = self.vector_prop(ORIGIN_PROP)?;

        Ok(Vector::new(
            coord_from_cell(cell_x, cell_width, offset.x),
            coord_from_cell(cell_y, cell_width, offset.y),
            coord_from_cell(cell_z, cell_width, offset.z),
        ))
    }

    /// Registers a callback fired when the entity is destroyed.
    pub fn on_destroy(&mut self, handler: impl FnMut() + 'static) {
        self.on_destroy.push(Box::new(handler));
    }

    /// Fires all destruction callbacks in registration order.
    ///
    /// A second call is a no-op; callbacks fire at most once per
    /// registration.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for handler in &mut self.on_destroy {
            handler();
        }
    }

    /// Returns `true` once [`destroy`](Self::destroy) has run.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Registers a callback for when the entity is fully created.
    ///
    /// The decoder itself cannot tell when creation is finished; the caller
    /// invokes [`fire_create_finished`](Self::fire_create_finished) after
    /// the creating record's property updates have all been applied.
    pub fn on_create_finished(&mut self, handler: impl FnMut() + 'static) {
        self.on_create_finished.push(Box::new(handler));
    }

    /// Fires all creation-finished callbacks in registration order.
    pub fn fire_create_finished(&mut self) {
        for handler in &mut self.on_create_finished {
            handler();
        }
    }

    fn find_property_index(&self, name: &str) -> EntityResult<Option<usize>> {
        let mut found = None;
        for (index, prop) in self.props.iter().enumerate() {
            if prop.name() == name {
                if found.is_some() {
                    return Err(EntityError::DuplicateProperty {
                        name: name.to_owned(),
                    });
                }
                found = Some(index);
            }
        }
        Ok(found)
    }

    fn require_property(&self, name: &str) -> EntityResult<&Property> {
        self.find_property(name)?
            .ok_or_else(|| EntityError::MissingProperty {
                name: name.to_owned(),
            })
    }

    fn int_prop(&self, name: &str) -> EntityResult<i64> {
        let prop = self.require_property(name)?;
        prop.value()
            .as_int()
            .ok_or_else(|| EntityError::ValueShape {
                expected: "integer",
                found: prop.value().shape(),
            })
    }

    fn vector_prop(&self, name: &str) -> EntityResult<Vector> {
        let prop = self.require_property(name)?;
        prop.value()
            .as_vector()
            .ok_or_else(|| EntityError::ValueShape {
                expected: "vector",
                found: prop.value().shape(),
            })
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("class", &self.class.name())
            .field("id", &self.id)
            .field("props", &self.props.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

fn coord_from_cell(cell: i64, cell_width: i64, offset: f64) -> f64 {
    let grid = i128::from(cell) * i128::from(cell_width) - i128::from(MAX_COORD);
    grid as f64 + offset
}

/// A captured snapshot of the property values one baseline record touched,
/// keyed by property index.
///
/// Captured once per class from its baseline bitstream, then applied to
/// every new instance of the class without re-decoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Baseline {
    values: HashMap<usize, PropertyValue>,
}

impl Baseline {
    /// Returns the captured value for a property index, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PropertyValue> {
        self.values.get(&index)
    }

    /// Returns the number of captured values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the baseline captured nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over captured `(index, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &PropertyValue)> {
        self.values.iter().map(|(&index, value)| (index, value))
    }
}
