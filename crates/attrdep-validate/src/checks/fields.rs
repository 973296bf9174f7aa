//! Field resolution: every configured attribute must exist in the schema.

use attrdep_model::{AttributeDependency, FieldDescriptor, Schema, Side};

use super::super::finding::Finding;

/// Field descriptors per attribute position; `None` where the schema has no
/// such field.
pub struct ResolvedFields<'s> {
    source: Vec<Option<&'s FieldDescriptor>>,
    target: Vec<Option<&'s FieldDescriptor>>,
    missing: Vec<(Side, String)>,
}

impl<'s> ResolvedFields<'s> {
    pub fn side(&self, side: Side) -> &[Option<&'s FieldDescriptor>] {
        match side {
            Side::Source => &self.source,
            Side::Target => &self.target,
        }
    }

    /// One `MissingField` per unresolved attribute, source side first.
    pub fn findings(&self) -> Vec<Finding> {
        self.missing
            .iter()
            .map(|(side, attribute)| Finding::MissingField {
                attribute: attribute.clone(),
                side: *side,
            })
            .collect()
    }
}

/// Resolve the attributes of both sides against `schema`.
pub fn resolve<'s, S: Schema + ?Sized>(
    dependency: &AttributeDependency,
    schema: &'s S,
) -> ResolvedFields<'s> {
    let mut missing = Vec::new();
    let mut resolve_side = |side: Side| -> Vec<Option<&'s FieldDescriptor>> {
        dependency
            .attributes(side)
            .iter()
            .map(|attribute| {
                let field = schema.find_field(&attribute.name);
                if field.is_none() {
                    missing.push((side, attribute.name.clone()));
                }
                field
            })
            .collect()
    };

    let source = resolve_side(Side::Source);
    let target = resolve_side(Side::Target);

    tracing::debug!(
        dataset = %schema.dataset_name(),
        source = source.len(),
        target = target.len(),
        missing = missing.len(),
        "resolved attribute fields"
    );

    ResolvedFields {
        source,
        target,
        missing,
    }
}
