use tracing::debug;

use super::registry::Registry;
use super::spec::{
    AssociationKind, AssociationOptions, AssociationSpec, InputSpec, DEFAULT_CONTEXT,
};
use super::SchemaError;
use crate::parser::TypeTag;
use crate::value::Map;

/// An immutable set of input and association declarations.
///
/// Built once at startup with [`Schema::builder`] and then handed to a
/// [`Catalog`](crate::Catalog), which never mutates it.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    registry: Registry,
}

impl Schema {
    /// Creates a builder for a schema called `name`.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            registry: Registry::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Builder for a [`Schema`].
///
/// Declarations without an explicit context land in `"default"`. Use
/// [`with_context`](Self::with_context) to declare rules for another context.
///
/// ## Example
///
/// ```
/// use decanter::schema::{AssociationOptions, Schema};
/// use decanter::{Map, TypeTag};
///
/// let trip = Schema::builder("trip")
///     .input("name", TypeTag::String, Map::new())
///     .input("start_date", TypeTag::Date, Map::new())
///     .has_many("destinations", AssociationOptions::new())
///     .with_context("admin", |scope| {
///         scope.input("approved", TypeTag::Boolean, Map::new())
///     })?
///     .build();
///
/// assert!(trip.registry().lookup_input(Some("admin"), "approved").is_some());
/// assert!(trip.registry().lookup_input(None, "approved").is_none());
/// # Ok::<(), decanter::schema::SchemaError>(())
/// ```
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct SchemaBuilder {
    name: String,
    registry: Registry,
}

impl SchemaBuilder {
    /// Declares a scalar input. A `None` type passes the raw value through.
    pub fn input(
        self,
        name: impl Into<String>,
        type_tag: impl Into<Option<TypeTag>>,
        options: Map,
    ) -> Self {
        self.declare_input(DEFAULT_CONTEXT, name.into(), type_tag.into(), options)
    }

    /// Declares a nested single mapping.
    pub fn has_one(self, name: impl Into<String>, options: AssociationOptions) -> Self {
        self.declare_association(DEFAULT_CONTEXT, name.into(), AssociationKind::HasOne, options)
    }

    /// Declares a nested sequence of mappings.
    pub fn has_many(self, name: impl Into<String>, options: AssociationOptions) -> Self {
        self.declare_association(DEFAULT_CONTEXT, name.into(), AssociationKind::HasMany, options)
    }

    /// Routes every declaration made inside `body` to `context`.
    ///
    /// The name is stored exactly as given, so it must also be passed
    /// exactly at decant time. Fails with [`SchemaError::MissingContext`] if
    /// `context` is blank, and with [`SchemaError::InvalidContext`] if it has
    /// leading or trailing whitespace, since no lookup could match it.
    pub fn with_context<F>(self, context: &str, body: F) -> Result<Self, SchemaError>
    where
        F: FnOnce(ContextScope) -> ContextScope,
    {
        if context.trim().is_empty() {
            return Err(SchemaError::MissingContext);
        }
        if context.trim() != context {
            return Err(SchemaError::InvalidContext(context.to_string()));
        }

        let scope = ContextScope {
            builder: self,
            context: context.to_string(),
        };
        Ok(body(scope).builder)
    }

    pub fn build(self) -> Schema {
        debug!(schema = %self.name, "schema built");
        Schema {
            name: self.name,
            registry: self.registry,
        }
    }

    fn declare_input(
        mut self,
        context: &str,
        name: String,
        type_tag: Option<TypeTag>,
        options: Map,
    ) -> Self {
        self.registry
            .register_input(InputSpec::new(context, name, type_tag, options));
        self
    }

    fn declare_association(
        mut self,
        context: &str,
        name: String,
        kind: AssociationKind,
        options: AssociationOptions,
    ) -> Self {
        self.registry
            .register_association(AssociationSpec::new(context, name, kind, options));
        self
    }
}

/// Declaration surface bound to one context, handed out by
/// [`SchemaBuilder::with_context`].
#[derive(Debug)]
#[must_use = "declarations are only kept when the scope is returned"]
pub struct ContextScope {
    builder: SchemaBuilder,
    context: String,
}

impl ContextScope {
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn input(
        mut self,
        name: impl Into<String>,
        type_tag: impl Into<Option<TypeTag>>,
        options: Map,
    ) -> Self {
        self.builder =
            self.builder
                .declare_input(&self.context, name.into(), type_tag.into(), options);
        self
    }

    pub fn has_one(mut self, name: impl Into<String>, options: AssociationOptions) -> Self {
        self.builder = self.builder.declare_association(
            &self.context,
            name.into(),
            AssociationKind::HasOne,
            options,
        );
        self
    }

    pub fn has_many(mut self, name: impl Into<String>, options: AssociationOptions) -> Self {
        self.builder = self.builder.declare_association(
            &self.context,
            name.into(),
            AssociationKind::HasMany,
            options,
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_context_is_rejected() {
        let result = Schema::builder("trip").with_context("  ", |scope| scope);
        assert!(matches!(result, Err(SchemaError::MissingContext)));
    }

    #[test]
    fn test_padded_context_is_rejected() {
        for padded in [" admin", "admin ", "\tadmin\n"] {
            let result = Schema::builder("trip").with_context(padded, |scope| scope);
            match result {
                Err(SchemaError::InvalidContext(name)) => assert_eq!(name, padded),
                other => panic!("unexpected result for {padded:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_scope_routes_declarations() {
        let schema = Schema::builder("trip")
            .with_context("admin", |scope| {
                assert_eq!(scope.context(), "admin");
                scope
                    .input("approved", TypeTag::Boolean, Map::new())
                    .has_one("owner", AssociationOptions::new())
            })
            .unwrap()
            .build();

        let registry = schema.registry();
        assert!(registry.lookup_input(Some("admin"), "approved").is_some());
        assert!(registry
            .lookup_association(Some("admin"), "owner_attributes", AssociationKind::HasOne)
            .is_some());
        assert_eq!(registry.inputs(None).count(), 0);
    }

    #[test]
    fn test_declarations_after_scope_use_default() {
        let schema = Schema::builder("trip")
            .with_context("admin", |scope| scope.input("approved", None, Map::new()))
            .unwrap()
            .input("name", None, Map::new())
            .build();

        let registry = schema.registry();
        assert!(registry.lookup_input(None, "name").is_some());
        assert!(registry.lookup_input(Some("admin"), "name").is_none());
    }
}
