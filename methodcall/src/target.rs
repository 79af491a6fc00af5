//! The method-call target.

use crate::{builder::TargetBuilder, options::TargetOptions};
use methodcall_core::{
    AsyncLogEvent, Continuation, DefaultClassifier, FailureClassifier, InvocationDriver, Invoker,
    Parameter, ParameterValue, Unrecoverable,
};
use std::fmt;

/// A target that turns each written event into one method call.
///
/// Built with [`TargetBuilder`]. All write methods take `&self`; a target can
/// be shared between threads and written to concurrently.
///
/// Every write reports exactly one outcome per event to its continuation,
/// unless the failure is fatal, in which case it is returned as
/// [`Unrecoverable`] and the continuation is dropped uncompleted.
pub struct MethodCallTarget<E, I, C = DefaultClassifier> {
    driver: InvocationDriver<E, C>,
    invoker: I,
    options: TargetOptions,
}

impl<E, I: Invoker> MethodCallTarget<E, I> {
    /// Start building a target around `invoker`.
    pub fn builder(invoker: I) -> TargetBuilder<E, I> {
        TargetBuilder::new(invoker)
    }
}

impl<E, I, C> MethodCallTarget<E, I, C>
where
    I: Invoker,
    C: FailureClassifier + 'static,
{
    pub(crate) fn from_parts(
        driver: InvocationDriver<E, C>,
        invoker: I,
        options: TargetOptions,
    ) -> Self {
        Self {
            driver,
            invoker,
            options,
        }
    }

    /// The configured parameters, in argument order.
    pub fn parameters(&self) -> &[Parameter<E>] {
        self.driver.parameters()
    }

    /// The invocation backend.
    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// The options the target was built with.
    pub fn options(&self) -> &TargetOptions {
        &self.options
    }

    /// The underlying driver.
    pub fn driver(&self) -> &InvocationDriver<E, C> {
        &self.driver
    }

    /// Write a single event.
    pub fn write(&self, event: AsyncLogEvent<E>) -> Result<(), Unrecoverable> {
        let (event, continuation) = event.into_parts();
        self.write_event(&event, continuation)
    }

    /// Write a borrowed event, reporting to `continuation`.
    pub fn write_event(&self, event: &E, continuation: Continuation) -> Result<(), Unrecoverable> {
        self.driver.execute(&self.invoker, event, continuation)
    }

    /// Write a batch of events.
    ///
    /// Without grouped parameters each event is written on its own, in order.
    ///
    /// With grouped parameters, consecutive events whose other arguments are
    /// equal form a run. Each run is invoked once, with every grouped
    /// parameter rendered over the whole run, and the run's outcome is
    /// reported to each of its events. An event that fails to prepare is
    /// reported on its own and does not interrupt the run around it.
    ///
    /// A fatal failure stops the batch. Runs that precede a fatal Prepare
    /// failure are invoked first. Events after it are dropped with their
    /// continuations uncompleted.
    pub fn write_group(&self, events: Vec<AsyncLogEvent<E>>) -> Result<(), Unrecoverable> {
        if events.is_empty() {
            return Ok(());
        }

        if !self.driver.has_grouped_parameters() {
            for event in events {
                self.write(event)?;
            }
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(events = events.len(), "writing grouped batch");

        let mut run = Run::default();
        for event in events {
            let (event, continuation) = event.into_parts();
            let probed = match self.driver.probe(&event) {
                Ok(probed) => probed,
                Err(err) => {
                    // Events before a fatal failure are still invoked.
                    if self.driver.is_fatal(&err) {
                        self.flush(std::mem::take(&mut run))?;
                    }
                    self.driver.report(err, continuation)?;
                    continue;
                }
            };

            if !run.extends(&probed) {
                self.flush(std::mem::take(&mut run))?;
                run.key = Some(probed);
            }
            run.events.push(event);
            run.continuations.push(continuation);
        }
        self.flush(run)
    }

    fn flush(&self, run: Run<E>) -> Result<(), Unrecoverable> {
        let Run {
            key,
            events,
            mut continuations,
        } = run;
        let Some(key) = key else {
            return Ok(());
        };

        let arguments = self.driver.fill_grouped(key, events.iter());
        let continuation = if continuations.len() == 1 {
            match continuations.pop() {
                Some(continuation) => continuation,
                None => return Ok(()),
            }
        } else {
            Continuation::fan_out(continuations)
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(events = events.len(), "invoking grouped run");

        self.driver.invoke(&self.invoker, arguments, continuation)
    }
}

/// Consecutive events sharing their non-grouped arguments.
struct Run<E> {
    key: Option<Vec<Option<ParameterValue>>>,
    events: Vec<E>,
    continuations: Vec<Continuation>,
}

impl<E> Run<E> {
    /// Returns `true` if an event probing to `probed` belongs to this run.
    fn extends(&self, probed: &[Option<ParameterValue>]) -> bool {
        let Some(key) = &self.key else {
            return false;
        };
        key.len() == probed.len()
            && key.iter().zip(probed).all(|pair| match pair {
                (Some(a), Some(b)) => a.same_as(b),
                (None, None) => true,
                _ => false,
            })
    }
}

impl<E> Default for Run<E> {
    fn default() -> Self {
        Self {
            key: None,
            events: Vec::new(),
            continuations: Vec::new(),
        }
    }
}

impl<E, I, C> fmt::Debug for MethodCallTarget<E, I, C>
where
    C: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodCallTarget")
            .field("driver", &self.driver)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
