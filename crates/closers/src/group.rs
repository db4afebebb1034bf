//! Ordered groups of releasable resources

use crate::releasable::Releasable;
use crate::scoped::{no_transform, run_then_release};
use closers_config::ReleaseConfig;
use closers_errors::Error;
use std::fmt;

type Entry<'a, E> = Box<dyn Releasable<Error = E> + 'a>;

/// A growable set of resources released in reverse registration order
///
/// Entries are owned by the group once added. [`Group::release`] visits
/// them last-added first, attempts every one of them, and reports the
/// first failure it met. The group is not consumed by a release and can be
/// released again, which replays the full pass.
///
/// # Example
///
/// ```
/// use closers::{release_fn, Error, Group};
/// use std::cell::RefCell;
///
/// let order = RefCell::new(Vec::new());
/// let mut group: Group<'_, Error> = Group::new()
///     .with(release_fn(|| {
///         order.borrow_mut().push("database");
///         Ok(())
///     }))
///     .with(release_fn(|| {
///         order.borrow_mut().push("transaction");
///         Ok(())
///     }));
///
/// group.release().unwrap();
/// drop(group);
/// assert_eq!(order.into_inner(), ["transaction", "database"]);
/// ```
pub struct Group<'a, E = Error> {
    entries: Vec<Entry<'a, E>>,
    label: Option<String>,
    report_suppressed: bool,
}

impl<'a, E> Group<'a, E> {
    /// Create an empty group
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            label: None,
            report_suppressed: true,
        }
    }

    /// Create a group pre-seeded with `entries`, released in reverse order
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = Entry<'a, E>>,
    {
        Self {
            entries: entries.into_iter().collect(),
            ..Self::new()
        }
    }

    /// Builder form of [`Group::add`]
    #[must_use]
    pub fn with<R>(mut self, resource: R) -> Self
    where
        R: Releasable<Error = E> + 'a,
    {
        self.add(resource);
        self
    }

    /// Name recorded on the tracing span of each release pass
    #[must_use]
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Apply release settings; an explicit label on the group is kept
    #[must_use]
    pub fn with_config(mut self, config: &ReleaseConfig) -> Self {
        self.report_suppressed = config.report_suppressed;
        if self.label.is_none() {
            self.label.clone_from(&config.label);
        }
        self
    }

    /// Register a resource; it will be released before everything added earlier
    pub fn add<R>(&mut self, resource: R) -> &mut Self
    where
        R: Releasable<Error = E> + 'a,
    {
        self.entries.push(Box::new(resource));
        self
    }

    /// Register several resources, keeping their relative order
    pub fn add_all<I, R>(&mut self, resources: I) -> &mut Self
    where
        I: IntoIterator<Item = R>,
        R: Releasable<Error = E> + 'a,
    {
        self.extend(resources);
        self
    }

    /// Number of registered entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label recorded on release spans, if any
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl<E: fmt::Display> Group<'_, E> {
    /// Release every entry, last-added first
    ///
    /// A failing entry does not stop the pass. Later failures in release
    /// order are logged and discarded.
    ///
    /// # Errors
    ///
    /// Returns the error of the first entry, in release order, that failed.
    pub fn release(&mut self) -> Result<(), E> {
        let span = tracing::debug_span!(
            "release",
            group = self.label.as_deref().unwrap_or("unnamed"),
            entries = self.entries.len()
        );
        let _enter = span.enter();

        let report_suppressed = self.report_suppressed;
        let mut first_failure: Option<(usize, E)> = None;

        for (index, entry) in self.entries.iter_mut().enumerate().rev() {
            tracing::trace!(index, "releasing entry");
            let Err(err) = entry.release() else {
                continue;
            };

            match first_failure.as_ref().map(|(reported, _)| *reported) {
                None => {
                    tracing::debug!(index, error = %err, "release failed");
                    first_failure = Some((index, err));
                }
                Some(reported) if report_suppressed => {
                    tracing::warn!(
                        index,
                        reported,
                        error = %err,
                        "release failed, discarding in favour of earlier failure"
                    );
                }
                Some(reported) => {
                    tracing::debug!(
                        index,
                        reported,
                        error = %err,
                        "release failed, discarding in favour of earlier failure"
                    );
                }
            }
        }

        match first_failure {
            Some((_, err)) => Err(err),
            None => Ok(()),
        }
    }

    /// Run `work`, then release the group
    ///
    /// # Errors
    ///
    /// Returns the work's error if it failed, otherwise the release error.
    pub fn close_after<T, W>(&mut self, work: W) -> Result<T, E>
    where
        W: FnOnce() -> Result<T, E>,
    {
        run_then_release(self, work, no_transform())
    }

    /// Like [`Group::close_after`], passing a release failure through `transform`
    ///
    /// # Errors
    ///
    /// Returns the work's error if it failed, otherwise the transformed
    /// release error.
    pub fn close_after_with<T, W, F>(&mut self, work: W, transform: F) -> Result<T, E>
    where
        W: FnOnce() -> Result<T, E>,
        F: FnOnce(E) -> E,
    {
        run_then_release(self, work, Some(transform))
    }
}

impl<E: fmt::Display> Releasable for Group<'_, E> {
    type Error = E;

    fn release(&mut self) -> Result<(), E> {
        Group::release(self)
    }
}

impl<E> Default for Group<'_, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, E, R> Extend<R> for Group<'a, E>
where
    R: Releasable<Error = E> + 'a,
{
    fn extend<I: IntoIterator<Item = R>>(&mut self, resources: I) {
        for resource in resources {
            self.add(resource);
        }
    }
}

impl<'a, E, R> FromIterator<R> for Group<'a, E>
where
    R: Releasable<Error = E> + 'a,
{
    fn from_iter<I: IntoIterator<Item = R>>(resources: I) -> Self {
        let mut group = Self::new();
        group.extend(resources);
        group
    }
}

impl<E> fmt::Debug for Group<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("label", &self.label)
            .field("entries", &self.entries.len())
            .field("report_suppressed", &self.report_suppressed)
            .finish()
    }
}
