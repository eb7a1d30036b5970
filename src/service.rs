//! Environment lookup service

use crate::shape::EnvKey;

/// Read-only access to the validated environment.
///
/// Built once by the module bootstrap and shared through the container.
/// There is no way to mutate or reload the held value.
#[derive(Debug)]
pub struct EnvironmentService<E> {
    env: E,
}

impl<E> EnvironmentService<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    /// Value of one declared field.
    ///
    /// ```ignore
    /// let port: &u16 = service.get(AppEnv::PORT);
    /// ```
    pub fn get<V: ?Sized>(&self, key: EnvKey<E, V>) -> &V {
        key.read(&self.env)
    }

    /// The whole validated environment
    pub fn environment(&self) -> &E {
        &self.env
    }
}
