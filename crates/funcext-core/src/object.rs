//! Explicit object model: type objects, instances, and the descriptor
//! protocol used to read callables off them.
//!
//! A `TypeHandle` owns an attribute table of descriptors. Reading an
//! attribute through the type (`TypeHandle::lookup`) or through an instance
//! (`Instance::lookup`) asks the stored descriptor for the callable to hand
//! back, passing the instance (if any) and the owning type.
//!
//! Handles compare by identity, never by name.

use crate::callable::Callable;
use crate::namespace::Namespace;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Attribute stored on a type that decides what an access returns
pub trait Descriptor: Send + Sync {
    /// Produce the callable for an access through `owner`, with `instance`
    /// present when the access went through an object.
    fn get(self: Arc<Self>, instance: Option<&Instance>, owner: &TypeHandle) -> Callable;
}

struct TypeInner {
    name: String,
    attributes: RwLock<BTreeMap<String, Arc<dyn Descriptor>>>,
}

/// A named type object
#[derive(Clone)]
pub struct TypeHandle {
    inner: Arc<TypeInner>,
}

impl TypeHandle {
    /// Create a new type with an empty attribute table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(TypeInner {
                name: name.into(),
                attributes: RwLock::new(BTreeMap::new()),
            }),
        }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Store a descriptor under `name`, replacing any previous one
    pub fn define(&self, name: impl Into<String>, descriptor: Arc<dyn Descriptor>) {
        let name = name.into();
        trace!(owner = %self.inner.name, attribute = %name, "Defined attribute");
        self.inner.attributes.write().insert(name, descriptor);
    }

    /// Remove an attribute, returning whether it existed
    pub fn undefine(&self, name: &str) -> bool {
        self.inner.attributes.write().remove(name).is_some()
    }

    /// Whether an attribute is defined
    pub fn has_attribute(&self, name: &str) -> bool {
        self.inner.attributes.read().contains_key(name)
    }

    /// Read an attribute through the type itself (no instance)
    pub fn lookup(&self, name: &str) -> Option<Callable> {
        let descriptor = self.descriptor(name)?;
        Some(descriptor.get(None, self))
    }

    /// Create a fresh instance of this type
    pub fn instantiate(&self) -> Instance {
        Instance::new(self)
    }

    // The table lock is released before the descriptor runs, so descriptors
    // may define attributes on the same type.
    fn descriptor(&self, name: &str) -> Option<Arc<dyn Descriptor>> {
        self.inner.attributes.read().get(name).cloned()
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for TypeHandle {}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHandle")
            .field("name", &self.inner.name)
            .field("attributes", &self.inner.attributes.read().len())
            .finish()
    }
}

struct InstanceInner {
    class: TypeHandle,
    attributes: RwLock<Namespace>,
}

/// An object of some type, with its own attribute namespace
#[derive(Clone)]
pub struct Instance {
    inner: Arc<InstanceInner>,
}

impl Instance {
    /// Create an instance of `class`
    pub fn new(class: &TypeHandle) -> Self {
        Self {
            inner: Arc::new(InstanceInner {
                class: class.clone(),
                attributes: RwLock::new(Namespace::new()),
            }),
        }
    }

    /// The type this object was created from
    pub fn class(&self) -> &TypeHandle {
        &self.inner.class
    }

    /// Identity check against `class`
    pub fn is_instance_of(&self, class: &TypeHandle) -> bool {
        self.inner.class == *class
    }

    /// Read an instance attribute
    pub fn get_attr(&self, name: &str) -> Option<Value> {
        self.inner.attributes.read().get(name).cloned()
    }

    /// Set an instance attribute, returning the previous value
    pub fn set_attr(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner.attributes.write().set(name, value)
    }

    /// Snapshot of the instance attributes
    pub fn attributes(&self) -> Namespace {
        self.inner.attributes.read().clone()
    }

    /// Read a type attribute through this instance
    pub fn lookup(&self, name: &str) -> Option<Callable> {
        let class = self.class();
        let descriptor = class.descriptor(name)?;
        Some(descriptor.get(Some(self), class))
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Instance {}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.inner.class.name())
            .field("attributes", &*self.inner.attributes.read())
            .finish()
    }
}

/// What a bound callable is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receiver {
    /// A type object (class-bound)
    Type(TypeHandle),
    /// An object (instance-bound)
    Instance(Instance),
}

impl Receiver {
    /// Whether this is a type receiver
    pub fn is_type(&self) -> bool {
        matches!(self, Self::Type(_))
    }

    /// The type, for a type receiver
    pub fn as_type(&self) -> Option<&TypeHandle> {
        match self {
            Self::Type(class) => Some(class),
            Self::Instance(_) => None,
        }
    }

    /// The object, for an instance receiver
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(instance) => Some(instance),
            Self::Type(_) => None,
        }
    }
}

impl From<TypeHandle> for Receiver {
    fn from(class: TypeHandle) -> Self {
        Self::Type(class)
    }
}

impl From<Instance> for Receiver {
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}
