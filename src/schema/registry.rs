//! Declaration store for one schema, partitioned by context.
//!
//! Lookups resolve a missing context to [`DEFAULT_CONTEXT`] and then search
//! that bucket only. A spec declared under `"admin"` is never found by a
//! lookup for `"default"` and vice versa.

use std::collections::HashMap;

use super::spec::{AssociationKind, AssociationSpec, InputSpec, DEFAULT_CONTEXT};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    inputs: HashMap<String, Vec<InputSpec>>,
    associations: HashMap<String, Vec<AssociationSpec>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an input. An input with the same name in the same context is replaced.
    pub fn register_input(&mut self, spec: InputSpec) {
        let bucket = self.inputs.entry(spec.context.clone()).or_default();
        match bucket.iter_mut().find(|existing| existing.name == spec.name) {
            Some(existing) => *existing = spec,
            None => bucket.push(spec),
        }
    }

    /// Stores an association in declaration order. Redeclaring the same name
    /// and kind in the same context replaces the entry in place.
    pub fn register_association(&mut self, spec: AssociationSpec) {
        let bucket = self.associations.entry(spec.context.clone()).or_default();
        match bucket
            .iter_mut()
            .find(|existing| existing.name == spec.name && existing.kind == spec.kind)
        {
            Some(existing) => *existing = spec,
            None => bucket.push(spec),
        }
    }

    pub fn lookup_input(&self, context: Option<&str>, name: &str) -> Option<&InputSpec> {
        self.inputs(context).find(|spec| spec.name == name)
    }

    /// Finds the first association of `kind` whose raw input key is `key`.
    pub fn lookup_association(
        &self,
        context: Option<&str>,
        key: &str,
        kind: AssociationKind,
    ) -> Option<&AssociationSpec> {
        self.associations(context)
            .find(|spec| spec.kind == kind && spec.key == key)
    }

    /// Inputs declared in one context, in declaration order.
    pub fn inputs(&self, context: Option<&str>) -> impl Iterator<Item = &InputSpec> {
        self.inputs
            .get(context.unwrap_or(DEFAULT_CONTEXT))
            .into_iter()
            .flatten()
    }

    /// Associations declared in one context, in declaration order.
    pub fn associations(&self, context: Option<&str>) -> impl Iterator<Item = &AssociationSpec> {
        self.associations
            .get(context.unwrap_or(DEFAULT_CONTEXT))
            .into_iter()
            .flatten()
    }

    /// Every input across all contexts.
    pub fn all_inputs(&self) -> impl Iterator<Item = &InputSpec> {
        self.inputs.values().flatten()
    }

    /// Every association across all contexts.
    pub fn all_associations(&self) -> impl Iterator<Item = &AssociationSpec> {
        self.associations.values().flatten()
    }
}
