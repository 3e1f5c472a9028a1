//! Dynamic host objects.
//!
//! A [`HostObject`] is an instance of an external type known only through its
//! [`TypeLayout`]. It is what the converter hands back when turning a
//! [`ChunkPosition`](crate::ChunkPosition) into its external form.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::reflect::{FieldAccessError, FieldValue, PrimitiveKind, Structure, TypeLayout};
use crate::{COORDINATE_NAMES, MIN_INT_FIELDS};

#[derive(Debug, Clone, PartialEq)]
pub struct HostObject {
    layout: Arc<TypeLayout>,
    values: Vec<FieldValue>,
}

impl HostObject {
    /// Creates an object with every field set to the zero value of its kind.
    pub fn new(layout: Arc<TypeLayout>) -> Self {
        let values = layout
            .fields
            .iter()
            .map(|field| FieldValue::zero(field.kind))
            .collect();

        Self { layout, values }
    }

    /// Creates an object from explicit field values in declaration order.
    pub fn with_values(layout: Arc<TypeLayout>, values: Vec<FieldValue>) -> Result<Self> {
        if values.len() != layout.fields.len() {
            return Err(Error::InvalidArgument(format!(
                "{} declares {} fields, got {} values",
                layout.name,
                layout.fields.len(),
                values.len()
            )));
        }

        if let Some((field, value)) = layout
            .fields
            .iter()
            .zip(&values)
            .find(|(field, value)| field.kind != value.kind())
        {
            return Err(Error::InvalidArgument(format!(
                "field {} of {} is {}, got {}",
                field.name,
                layout.name,
                field.kind,
                value.kind()
            )));
        }

        Ok(Self { layout, values })
    }

    /// Runs the three-integer constructor of `layout`.
    ///
    /// Arguments are assigned to the `x`, `y`, `z` int fields when the layout
    /// declares them, otherwise to its first three int fields in declaration order.
    pub fn construct_int3(layout: Arc<TypeLayout>, args: [i32; 3]) -> Result<Self> {
        let targets: Vec<usize> =
            if layout.supports_named_access(&COORDINATE_NAMES, PrimitiveKind::Int) {
                COORDINATE_NAMES
                    .iter()
                    .filter_map(|name| layout.index_of(name, PrimitiveKind::Int))
                    .collect()
            } else {
                layout
                    .indices_of_kind(PrimitiveKind::Int)
                    .take(MIN_INT_FIELDS)
                    .collect()
            };

        if targets.len() < MIN_INT_FIELDS {
            return Err(Error::StructuralMismatch {
                type_name: layout.name.clone(),
                found: targets.len(),
            });
        }

        let mut object = Self::new(layout);
        for (index, arg) in targets.into_iter().zip(args) {
            object.values[index] = FieldValue::Int(arg);
        }

        Ok(object)
    }

    /// Value of the first field called `name`.
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.layout
            .fields
            .iter()
            .position(|field| field.name == name)
            .map(|index| self.values[index])
    }
}

impl Structure for HostObject {
    fn layout(&self) -> &TypeLayout {
        &self.layout
    }

    fn read_field(&self, index: usize) -> std::result::Result<FieldValue, FieldAccessError> {
        self.values
            .get(index)
            .copied()
            .ok_or(FieldAccessError::OutOfBounds {
                index,
                len: self.values.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::FieldDescriptor;

    fn obfuscated() -> Arc<TypeLayout> {
        Arc::new(TypeLayout::new(
            "host.ObfPos",
            vec![
                FieldDescriptor::new("a", PrimitiveKind::Int),
                FieldDescriptor::new("cached", PrimitiveKind::Boolean),
                FieldDescriptor::new("b", PrimitiveKind::Int),
                FieldDescriptor::new("c", PrimitiveKind::Int),
                FieldDescriptor::new("d", PrimitiveKind::Int),
            ],
        ))
    }

    #[test]
    fn construct_assigns_named_fields_regardless_of_order() {
        let layout = Arc::new(TypeLayout::new(
            "host.Pos",
            vec![
                FieldDescriptor::new("z", PrimitiveKind::Int),
                FieldDescriptor::new("x", PrimitiveKind::Int),
                FieldDescriptor::new("y", PrimitiveKind::Int),
            ],
        ));

        let object = HostObject::construct_int3(layout, [1, 2, 3]).unwrap();

        assert_eq!(object.get("x"), Some(FieldValue::Int(1)));
        assert_eq!(object.get("y"), Some(FieldValue::Int(2)));
        assert_eq!(object.get("z"), Some(FieldValue::Int(3)));
    }

    #[test]
    fn construct_falls_back_to_declared_int_order() {
        let object = HostObject::construct_int3(obfuscated(), [4, 5, 6]).unwrap();

        assert_eq!(object.get("a"), Some(FieldValue::Int(4)));
        assert_eq!(object.get("cached"), Some(FieldValue::Boolean(false)));
        assert_eq!(object.get("b"), Some(FieldValue::Int(5)));
        assert_eq!(object.get("c"), Some(FieldValue::Int(6)));
        assert_eq!(object.get("d"), Some(FieldValue::Int(0)));
    }

    #[test]
    fn construct_rejects_too_few_int_fields() {
        let layout = Arc::new(TypeLayout::new(
            "host.Flat",
            vec![
                FieldDescriptor::new("x", PrimitiveKind::Int),
                FieldDescriptor::new("z", PrimitiveKind::Int),
            ],
        ));

        match HostObject::construct_int3(layout, [1, 2, 3]) {
            Err(Error::StructuralMismatch { type_name, found }) => {
                assert_eq!(type_name, "host.Flat");
                assert_eq!(found, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn with_values_validates_kinds() {
        let result = HostObject::with_values(
            obfuscated(),
            vec![
                FieldValue::Int(1),
                FieldValue::Int(0),
                FieldValue::Int(2),
                FieldValue::Int(3),
                FieldValue::Int(4),
            ],
        );

        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn read_field_past_end_is_out_of_bounds() {
        let object = HostObject::new(obfuscated());

        assert_eq!(
            object.read_field(5),
            Err(FieldAccessError::OutOfBounds { index: 5, len: 5 })
        );
    }
}
