//! Conversion between [`ChunkPosition`] and its opaque external counterpart.
//!
//! The external type declares its coordinates as three `int` fields named `x`,
//! `y` and `z`, but builds of the host are free to rename them. Reading goes by
//! name when the runtime type still declares those names. Otherwise the
//! converter probes the type once for its `int` fields and reads the first three
//! by declaration order. The probe outcome is remembered per runtime layout for
//! the lifetime of the converter, failures included.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::{debug, error, trace, warn};

use crate::error::{Error, Result};
use crate::host::HostObject;
use crate::position::ChunkPosition;
use crate::reflect::{
    FieldAccessError, FieldValue, LayoutReflector, PrimitiveKind, Reflector, Structure,
    StructureModifier, TypeLayout,
};
use crate::{COORDINATE_NAMES, DEFAULT_EXTERNAL_TYPE, MIN_INT_FIELDS};

/// Two-way conversion between a crate type and an opaque external object.
pub trait EquivalentConverter {
    type Specific;
    type Generic;

    /// Builds an external object of `generic_type` from `specific`.
    fn to_generic(
        &self,
        generic_type: &Arc<TypeLayout>,
        specific: &Self::Specific,
    ) -> Result<Self::Generic>;

    /// Reads `generic` into the crate type.
    ///
    /// Returns `Ok(None)` when `generic` is absent or not of the supported
    /// external type.
    fn to_specific(&self, generic: Option<&dyn Structure>) -> Result<Option<Self::Specific>>;

    fn specific_type_name(&self) -> &'static str {
        std::any::type_name::<Self::Specific>()
    }
}

/// Outcome of probing one runtime type for positional access.
#[derive(Debug, Clone)]
enum Probe {
    Valid(Arc<StructureModifier>),
    Mismatch { found: usize },
}

/// Converter for [`ChunkPosition`].
pub struct PositionConverter<R = LayoutReflector> {
    expected_type: String,
    reflector: R,
    /// Probe outcomes keyed by the full runtime layout, so host versions that
    /// reuse a type name with different fields never share an entry. Entries
    /// are inserted whole and never replaced.
    fallbacks: RwLock<HashMap<TypeLayout, Probe>>,
}

impl PositionConverter<LayoutReflector> {
    /// Creates a converter accepting objects assignable to `expected_type`.
    pub fn new(expected_type: impl Into<String>) -> Self {
        Self {
            expected_type: expected_type.into(),
            reflector: LayoutReflector,
            fallbacks: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for PositionConverter<LayoutReflector> {
    fn default() -> Self {
        Self::new(DEFAULT_EXTERNAL_TYPE)
    }
}

impl<R: Reflector> std::fmt::Debug for PositionConverter<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionConverter")
            .field("expected_type", &self.expected_type)
            .field("probed_types", &self.probed_types())
            .finish()
    }
}

impl<R: Reflector> PositionConverter<R> {
    /// Replaces the reflection capability used for positional fallback.
    ///
    /// Probe outcomes of the previous reflector are discarded.
    pub fn with_reflector<S: Reflector>(self, reflector: S) -> PositionConverter<S> {
        PositionConverter {
            expected_type: self.expected_type,
            reflector,
            fallbacks: RwLock::new(HashMap::new()),
        }
    }

    pub fn expected_type(&self) -> &str {
        &self.expected_type
    }

    /// Number of runtime layouts that have been probed for positional access.
    pub fn probed_types(&self) -> usize {
        self.fallbacks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Reads an external object into a [`ChunkPosition`].
    pub fn from_external(&self, external: Option<&dyn Structure>) -> Result<Option<ChunkPosition>> {
        let Some(external) = external else {
            return Ok(None);
        };

        let layout = external.layout();
        if !layout.is_assignable_to(&self.expected_type) {
            trace!(type_name = %layout.name, "not an external position");
            return Ok(None);
        }

        let probe = match self.cached(layout) {
            Some(probe) => probe,
            None => match named_indices(layout) {
                Some(indices) => return read_named(external, indices).map(Some),
                None => {
                    debug!(type_name = %layout.name, "named coordinate fields unavailable");
                    self.probe(layout)
                }
            },
        };

        match probe {
            Probe::Valid(modifier) => read_positional(external, &modifier).map(Some),
            Probe::Mismatch { found } => Err(Error::StructuralMismatch {
                type_name: layout.name.clone(),
                found,
            }),
        }
    }

    /// Builds a new external object of `generic_type` holding `position`.
    pub fn to_external(
        &self,
        generic_type: &Arc<TypeLayout>,
        position: &ChunkPosition,
    ) -> Result<HostObject> {
        HostObject::construct_int3(
            Arc::clone(generic_type),
            [position.x(), position.y(), position.z()],
        )
    }

    fn cached(&self, layout: &TypeLayout) -> Option<Probe> {
        let probe = self
            .fallbacks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(layout)
            .cloned();

        if probe.is_some() {
            trace!(type_name = %layout.name, "using cached probe");
        }

        probe
    }

    /// Probes `layout` and publishes the outcome.
    ///
    /// Racing probes of the same type build equivalent outcomes; the first one
    /// published wins and is returned to every caller.
    #[tracing::instrument(level = "debug", skip(self, layout), fields(type_name = %layout.name))]
    fn probe(&self, layout: &TypeLayout) -> Probe {
        let modifier = self.reflector.structure_of(layout, PrimitiveKind::Int);

        let probe = if modifier.size() < MIN_INT_FIELDS {
            error!(found = modifier.size(), "cannot read external type for its integer fields");
            Probe::Mismatch {
                found: modifier.size(),
            }
        } else {
            let fields: Vec<&str> = (0..MIN_INT_FIELDS)
                .filter_map(|index| modifier.field(index))
                .map(|handle| handle.name.as_str())
                .collect();
            warn!(?fields, "falling back to positional coordinate access");
            Probe::Valid(Arc::new(modifier))
        };

        self.fallbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(layout.clone())
            .or_insert(probe)
            .clone()
    }
}

impl<R: Reflector> EquivalentConverter for PositionConverter<R> {
    type Specific = ChunkPosition;
    type Generic = HostObject;

    fn to_generic(
        &self,
        generic_type: &Arc<TypeLayout>,
        specific: &ChunkPosition,
    ) -> Result<HostObject> {
        self.to_external(generic_type, specific)
    }

    fn to_specific(&self, generic: Option<&dyn Structure>) -> Result<Option<ChunkPosition>> {
        self.from_external(generic)
    }
}

impl ChunkPosition {
    /// The process-wide converter for [`DEFAULT_EXTERNAL_TYPE`].
    pub fn converter() -> &'static PositionConverter {
        static CONVERTER: OnceLock<PositionConverter> = OnceLock::new();
        CONVERTER.get_or_init(PositionConverter::default)
    }
}

/// Declared indices of the `x`, `y`, `z` int fields, if the type has all three.
fn named_indices(layout: &TypeLayout) -> Option<[usize; 3]> {
    let [x, y, z] = COORDINATE_NAMES.map(|name| layout.index_of(name, PrimitiveKind::Int));
    Some([x?, y?, z?])
}

fn read_named(external: &dyn Structure, indices: [usize; 3]) -> Result<ChunkPosition> {
    let layout = external.layout();
    let read = |index: usize| match external.read_field(index) {
        Ok(FieldValue::Int(value)) => Ok(value),
        Ok(other) => Err(internal(
            layout,
            FieldAccessError::KindMismatch {
                field: layout.fields[index].name.clone(),
                expected: PrimitiveKind::Int,
                found: other.kind(),
            },
        )),
        Err(e) => Err(internal(layout, e)),
    };

    Ok(ChunkPosition::new(
        read(indices[0])?,
        read(indices[1])?,
        read(indices[2])?,
    ))
}

fn read_positional(
    external: &dyn Structure,
    modifier: &StructureModifier,
) -> Result<ChunkPosition> {
    let read = |index: usize| {
        modifier
            .read_int(external, index)
            .map_err(|e| internal(external.layout(), e))
    };

    Ok(ChunkPosition::new(read(0)?, read(1)?, read(2)?))
}

fn internal(layout: &TypeLayout, source: FieldAccessError) -> Error {
    error!(type_name = %layout.name, %source, "field access error");
    Error::Internal {
        type_name: layout.name.clone(),
        source,
    }
}
