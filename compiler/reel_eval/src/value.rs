//! Runtime values for the Reel evaluator.
//!
//! # Heap Enforcement
//!
//! Heap allocations go through factory methods on `Value`; the `Heap<T>`
//! wrapper has a crate-private constructor, so external code cannot build
//! heap values directly:
//!
//! ```text
//! let s = Value::string("hello");               // OK
//! let a = Value::array(vec![Value::int(1)]);    // OK
//! ```
//!
//! Values are immutable once constructed. Passing a value never transfers
//! ownership of an underlying clip, only shares a reference.

use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Shared immutable heap storage.
///
/// `#[repr(transparent)]` over `Arc<T>`; cloning is a refcount bump.
#[repr(transparent)]
pub struct Heap<T: ?Sized>(Arc<T>);

impl<T> Heap<T> {
    /// Crate-private factory; external code goes through `Value`.
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }
}

impl<T: ?Sized> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: ?Sized + PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

/// Opaque handle to a stream of media frames.
///
/// The core never looks inside a clip: it compares handles by identity,
/// splices them through the environment, and passes them along. The host
/// attaches whatever payload it likes.
#[derive(Clone)]
pub struct Clip(Arc<dyn Any + Send + Sync>);

impl Clip {
    /// Create a clip handle around a host payload.
    pub fn new(payload: impl Any + Send + Sync) -> Self {
        Clip(Arc::new(payload))
    }

    /// Identity comparison: two handles are equal iff they share the same
    /// underlying stream.
    #[inline]
    pub fn ptr_eq(&self, other: &Clip) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Recover the host payload, if it has the given type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Clip({:p})", Arc::as_ptr(&self.0))
    }
}

impl PartialEq for Clip {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// Runtime value: a tagged union with exactly one active variant.
///
/// Querying the wrong variant returns `None` rather than coercing; the only
/// conversions the language performs are the explicit per-operator rules in
/// `operators`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The no-value result of assignments and empty constructs.
    Undefined,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Immutable string.
    Str(Heap<String>),
    /// Opaque clip handle (identity-compared).
    Clip(Clip),
    /// Ordered sequence of values.
    Array(Heap<Vec<Value>>),
}

impl Value {
    /// Create an integer value.
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    /// Create a float value.
    #[inline]
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    /// Create a string value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Create an array value.
    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(items))
    }

    /// Create a clip value from a handle.
    #[inline]
    pub fn clip(clip: Clip) -> Self {
        Value::Clip(clip)
    }

    /// Name of the active variant, for logging and diagnostics.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Clip(_) => "clip",
            Value::Array(_) => "array",
        }
    }

    /// Whether this value is a clip.
    #[inline]
    pub const fn is_clip(&self) -> bool {
        matches!(self, Value::Clip(_))
    }

    /// Whether this value is `Undefined`.
    #[inline]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// The boolean payload, if this is a `Bool`.
    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if this is an `Int`.
    #[inline]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The float payload, if this is a `Float`.
    #[inline]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The string payload, if this is a `Str`.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The clip handle, if this is a `Clip`.
    #[inline]
    pub const fn as_clip(&self) -> Option<&Clip> {
        match self {
            Value::Clip(c) => Some(c),
            _ => None,
        }
    }
}
