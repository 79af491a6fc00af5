//! Builder for [`MethodCallTarget`].

use crate::{options::TargetOptions, target::MethodCallTarget};
use methodcall_core::{
    ConfigError, DefaultClassifier, FailureClassifier, InvocationDriver, Invoker, Parameter,
};

/// Builder for constructing a [`MethodCallTarget`].
///
/// # Example
///
/// ```rust,ignore
/// let target = TargetBuilder::new(table.resolve("Audit.Record")?)
///     .parameter(Parameter::new(TemplateLayout::parse("${logger}")?))
///     .parameter(Parameter::new(TemplateLayout::parse("${message}")?))
///     .optimize_buffer_reuse(true)
///     .build()?;
/// ```
pub struct TargetBuilder<E, I, C = DefaultClassifier> {
    invoker: I,
    parameters: Vec<Parameter<E>>,
    options: TargetOptions,
    classifier: C,
}

impl<E, I: Invoker> TargetBuilder<E, I> {
    /// Create a builder with no parameters and default options.
    pub fn new(invoker: I) -> Self {
        Self {
            invoker,
            parameters: Vec::new(),
            options: TargetOptions::default(),
            classifier: DefaultClassifier,
        }
    }
}

impl<E, I, C> TargetBuilder<E, I, C>
where
    I: Invoker,
    C: FailureClassifier + 'static,
{
    /// Append a parameter. Parameters become arguments in the order added.
    pub fn parameter(mut self, parameter: Parameter<E>) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Append several parameters.
    pub fn parameters(mut self, parameters: impl IntoIterator<Item = Parameter<E>>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Reuse render buffers across calls.
    pub fn optimize_buffer_reuse(mut self, enabled: bool) -> Self {
        self.options.optimize_buffer_reuse = enabled;
        self
    }

    /// Override the group output length at which rendering switches to local
    /// buffers.
    pub fn group_buffer_threshold(mut self, threshold: usize) -> Self {
        self.options.group_buffer_threshold = threshold;
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, options: TargetOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a different fatal-failure classifier.
    pub fn classifier<C2>(self, classifier: C2) -> TargetBuilder<E, I, C2>
    where
        C2: FailureClassifier + 'static,
    {
        TargetBuilder {
            invoker: self.invoker,
            parameters: self.parameters,
            options: self.options,
            classifier,
        }
    }

    /// Validate the configuration and build the target.
    ///
    /// Fails if the invoker rejects the number of parameters, or if buffer
    /// reuse is enabled with a pool that cannot hold a buffer.
    pub fn build(self) -> Result<MethodCallTarget<E, I, C>, ConfigError> {
        self.invoker.validate(self.parameters.len())?;

        if self.options.optimize_buffer_reuse && self.options.pool_size == 0 {
            return Err(ConfigError::Invalid(
                "buffer reuse needs a pool size of at least 1".to_owned(),
            ));
        }

        let renderer = self.options.renderer();
        let driver = InvocationDriver::with_parts(self.parameters, renderer, self.classifier);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            parameters = driver.parameters().len(),
            grouped = driver.has_grouped_parameters(),
            buffer_reuse = self.options.optimize_buffer_reuse,
            "method call target built"
        );

        Ok(MethodCallTarget::from_parts(
            driver,
            self.invoker,
            self.options,
        ))
    }
}
