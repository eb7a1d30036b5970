//! Module bootstrap
//!
//! Wires the preprocessor, the schema validator and the lookup service into
//! a `fibre_ioc` container. The environment is read and validated exactly
//! once, during `init`; any failure aborts before a single service has been
//! registered.

use crate::error::{EnvError, Result};
use crate::preprocess::{EnvironmentPreprocessor, RawEnvironment, read_process_env};
use crate::schema::{SchemaValidator, StructSchema, ValidationSchema};
use crate::service::EnvironmentService;
use crate::shape::EnvironmentShape;
use crate::transform::{FieldTransforms, TransformOptions, TransformRegistry};
use fibre_ioc::Container;
use std::any::type_name;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// Registration options for [`EnvironmentModule::for_root`]
pub struct EnvironmentConfig<E> {
    schema: Box<dyn ValidationSchema<E>>,
    transforms: FieldTransforms,
}

impl<E: EnvironmentShape> EnvironmentConfig<E> {
    /// Use an externally supplied schema
    pub fn new(schema: impl ValidationSchema<E> + 'static) -> Self {
        Self {
            schema: Box::new(schema),
            transforms: FieldTransforms::new(),
        }
    }

    /// Annotate a field in addition to (or instead of) the derived annotations
    pub fn transform(mut self, field: impl Into<String>, options: TransformOptions) -> Self {
        self.transforms.insert(field, options);
        self
    }
}

impl<E: EnvironmentShape + Validate> EnvironmentConfig<E> {
    /// Validate with the shape's own serde and `validator` declarations
    pub fn structured() -> Self {
        Self::new(StructSchema::new())
    }
}

/// Module descriptor produced by [`EnvironmentModule::for_root`]
pub struct EnvironmentModule<E> {
    preprocessor: EnvironmentPreprocessor,
    validator: SchemaValidator<E>,
}

impl<E: EnvironmentShape> EnvironmentModule<E> {
    pub fn for_root(config: EnvironmentConfig<E>) -> Self {
        let mut registry = TransformRegistry::new();
        registry.register_shape::<E>();
        for (field, options) in config.transforms.iter() {
            registry.register::<E>(field, options.clone());
        }

        Self {
            preprocessor: EnvironmentPreprocessor::new(registry.transforms_for::<E>()),
            validator: SchemaValidator::from_boxed(config.schema),
        }
    }

    /// Transform table the preprocessor will apply
    pub fn transforms(&self) -> &FieldTransforms {
        self.preprocessor.transforms()
    }

    /// Validate the process environment and register the services
    pub fn init(self, container: &Container) -> Result<Arc<EnvironmentService<E>>> {
        self.init_with(container, read_process_env())
    }

    /// Same as [`init`](Self::init) against the global container
    pub fn init_global(self) -> Result<Arc<EnvironmentService<E>>> {
        self.init(fibre_ioc::global())
    }

    /// Validate an explicit raw environment and register the services
    pub fn init_with(
        self,
        container: &Container,
        raw: RawEnvironment,
    ) -> Result<Arc<EnvironmentService<E>>> {
        let shape = type_name::<E>();

        let preprocessed = self.preprocessor.preprocess(&raw)?;
        let env = self.validator.validate(&preprocessed)?;

        info!(
            shape,
            fields = E::field_names().len(),
            transforms = self.preprocessor.transforms().len(),
            "Environment validated"
        );

        // The preprocessor is not generic, so it is keyed by shape name
        container.add_instance_with_name(shape, self.preprocessor);
        container.add_instance(self.validator);
        container.add_instance(EnvironmentService::new(env));

        resolve_environment::<E>(container)
    }
}

/// Fetch the lookup service registered for shape `E`
pub fn resolve_environment<E: EnvironmentShape>(
    container: &Container,
) -> Result<Arc<EnvironmentService<E>>> {
    container
        .get::<EnvironmentService<E>>(None)
        .ok_or_else(EnvError::not_registered::<EnvironmentService<E>>)
}

/// Fetch the preprocessor registered for shape `E`
pub fn resolve_preprocessor<E: EnvironmentShape>(
    container: &Container,
) -> Result<Arc<EnvironmentPreprocessor>> {
    container
        .get::<EnvironmentPreprocessor>(Some(type_name::<E>()))
        .ok_or_else(EnvError::not_registered::<EnvironmentPreprocessor>)
}
