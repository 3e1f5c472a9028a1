//! Structural access to opaque external objects.
//!
//! Rust has no runtime introspection, so an external type describes itself with a
//! [`TypeLayout`]: its runtime name, the names it is assignable to, and its fields
//! in declaration order. Objects expose their layout and positional field reads
//! through [`Structure`]. A [`Reflector`] turns a layout into a
//! [`StructureModifier`], the indexable read handles over every field of one
//! primitive kind.

use std::error;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Primitive kind of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Reference,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Reference => "reference",
        };
        f.write_str(name)
    }
}

/// A single declared field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: PrimitiveKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Runtime type descriptor of an external type.
///
/// `name` identifies the type for instance checks. Host versions may declare
/// different fields under the same name, so caches key on the whole layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeLayout {
    pub name: String,
    /// Names of the types this type can be used as (superclasses, interfaces).
    #[serde(default)]
    pub supertypes: Vec<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl TypeLayout {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            supertypes: Vec::new(),
            fields,
        }
    }

    pub fn with_supertype(mut self, name: impl Into<String>) -> Self {
        self.supertypes.push(name.into());
        self
    }

    /// Whether an instance of this type is an instance of `name`.
    pub fn is_assignable_to(&self, name: &str) -> bool {
        self.name == name || self.supertypes.iter().any(|s| s == name)
    }

    /// Declared index of the field called `name` with the given kind.
    pub fn index_of(&self, name: &str, kind: PrimitiveKind) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.name == name && field.kind == kind)
    }

    /// Whether every field in `names` is declared with `kind`.
    ///
    /// This is the capability check that decides between named and positional
    /// access.
    pub fn supports_named_access(&self, names: &[&str], kind: PrimitiveKind) -> bool {
        names.iter().all(|name| self.index_of(name, kind).is_some())
    }

    /// Declared indices of every field of `kind`, in declaration order.
    pub fn indices_of_kind(&self, kind: PrimitiveKind) -> impl Iterator<Item = usize> + '_ {
        self.fields
            .iter()
            .enumerate()
            .filter(move |(_, field)| field.kind == kind)
            .map(|(index, _)| index)
    }
}

/// Value read from a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    /// Opaque object handle, `None` for a null reference.
    Reference(Option<u64>),
}

impl FieldValue {
    /// The default value a freshly constructed field of `kind` holds.
    pub fn zero(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Byte => Self::Byte(0),
            PrimitiveKind::Short => Self::Short(0),
            PrimitiveKind::Int => Self::Int(0),
            PrimitiveKind::Long => Self::Long(0),
            PrimitiveKind::Float => Self::Float(0.0),
            PrimitiveKind::Double => Self::Double(0.0),
            PrimitiveKind::Boolean => Self::Boolean(false),
            PrimitiveKind::Reference => Self::Reference(None),
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Byte(_) => PrimitiveKind::Byte,
            Self::Short(_) => PrimitiveKind::Short,
            Self::Int(_) => PrimitiveKind::Int,
            Self::Long(_) => PrimitiveKind::Long,
            Self::Float(_) => PrimitiveKind::Float,
            Self::Double(_) => PrimitiveKind::Double,
            Self::Boolean(_) => PrimitiveKind::Boolean,
            Self::Reference(_) => PrimitiveKind::Reference,
        }
    }
}

/// Failure reading a field through a structural handle.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldAccessError {
    OutOfBounds {
        index: usize,
        len: usize,
    },
    KindMismatch {
        field: String,
        expected: PrimitiveKind,
        found: PrimitiveKind,
    },
    Unreadable {
        field: String,
        reason: String,
    },
}

impl error::Error for FieldAccessError {}

impl fmt::Display for FieldAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { index, len } => {
                write!(f, "field index {} out of bounds ({} fields)", index, len)
            }
            Self::KindMismatch {
                field,
                expected,
                found,
            } => write!(f, "field {} holds {}, expected {}", field, found, expected),
            Self::Unreadable { field, reason } => {
                write!(f, "field {} cannot be read: {}", field, reason)
            }
        }
    }
}

/// An opaque object that can be read structurally.
pub trait Structure {
    /// Layout of the object's runtime type.
    fn layout(&self) -> &TypeLayout;

    /// Reads the field at `index` in declaration order.
    fn read_field(&self, index: usize) -> Result<FieldValue, FieldAccessError>;
}

/// Readable handle to one declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHandle {
    pub declared_index: usize,
    pub name: String,
}

/// Indexable read handles over every field of one primitive kind of a type.
#[derive(Debug, Clone)]
pub struct StructureModifier {
    type_name: String,
    kind: PrimitiveKind,
    handles: Vec<FieldHandle>,
}

impl StructureModifier {
    pub fn new(layout: &TypeLayout, kind: PrimitiveKind) -> Self {
        let handles = layout
            .indices_of_kind(kind)
            .map(|declared_index| FieldHandle {
                declared_index,
                name: layout.fields[declared_index].name.clone(),
            })
            .collect();

        Self {
            type_name: layout.name.clone(),
            kind,
            handles,
        }
    }

    /// Number of matching fields.
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn field(&self, index: usize) -> Option<&FieldHandle> {
        self.handles.get(index)
    }

    /// Reads the `index`-th matching field of `target`.
    pub fn read(
        &self,
        target: &dyn Structure,
        index: usize,
    ) -> Result<FieldValue, FieldAccessError> {
        let handle = self.handles.get(index).ok_or(FieldAccessError::OutOfBounds {
            index,
            len: self.handles.len(),
        })?;

        let value = target.read_field(handle.declared_index)?;
        if value.kind() != self.kind {
            return Err(FieldAccessError::KindMismatch {
                field: handle.name.clone(),
                expected: self.kind,
                found: value.kind(),
            });
        }

        Ok(value)
    }

    pub fn read_int(&self, target: &dyn Structure, index: usize) -> Result<i32, FieldAccessError> {
        match self.read(target, index)? {
            FieldValue::Int(value) => Ok(value),
            other => Err(FieldAccessError::KindMismatch {
                field: self.handles[index].name.clone(),
                expected: PrimitiveKind::Int,
                found: other.kind(),
            }),
        }
    }
}

/// Structural-reflection capability.
///
/// Given a runtime type, enumerates the fields of one primitive kind in
/// declaration order.
pub trait Reflector: Send + Sync {
    fn structure_of(&self, layout: &TypeLayout, kind: PrimitiveKind) -> StructureModifier;
}

/// Reflector that reads the declared [`TypeLayout`] as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutReflector;

impl Reflector for LayoutReflector {
    fn structure_of(&self, layout: &TypeLayout, kind: PrimitiveKind) -> StructureModifier {
        StructureModifier::new(layout, kind)
    }
}

impl<R: Reflector + ?Sized> Reflector for Arc<R> {
    fn structure_of(&self, layout: &TypeLayout, kind: PrimitiveKind) -> StructureModifier {
        (**self).structure_of(layout, kind)
    }
}
