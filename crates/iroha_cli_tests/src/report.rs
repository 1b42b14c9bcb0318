//! Report annotations for scenarios.
//!
//! Stories, labels and steps are emitted as structured [`tracing`] events and
//! spans under the `report` target; a reporter can pick them up from the log.
//! Nothing is written to disk here.
//!
//! Scenarios open a [`scenario`] span first, so that their annotations stay
//! attributable when tests run in parallel.

use core::fmt::Display;

use tracing::{error, info, info_span, span::EnteredSpan};

/// Log target of every annotation.
pub const TARGET: &str = "report";

/// Start the scenario `sdk_test_id` belonging to `story_name`.
///
/// Installs the test logger, enters a `scenario` span and emits the story and
/// the `sdk_test_id` label inside it. Everything logged while the returned
/// guard is alive belongs to the scenario.
///
/// # Panics
/// If [`crate::logger::init_global`] was called before.
#[must_use = "the scenario ends when the guard is dropped"]
pub fn scenario(story_name: &str, sdk_test_id: &str) -> EnteredSpan {
    crate::logger::test_logger();

    let span = info_span!(target: TARGET, "scenario", sdk_test_id).entered();
    story(story_name);
    label("sdk_test_id", sdk_test_id);
    span
}

/// Attribute the current scenario to a user story.
pub fn story(name: &str) {
    info!(target: TARGET, story = name, "Story");
}

/// Attach a `key = value` label to the current scenario.
pub fn label(key: &str, value: &str) {
    info!(target: TARGET, label = key, value, "Label");
}

/// Run `body` as a named step.
///
/// Everything logged inside `body` is attributed to the step, and the step's
/// result is logged when it ends.
///
/// # Errors
/// Whatever `body` returns.
pub fn step<T, E, F>(description: impl Display, body: F) -> Result<T, E>
where
    E: Display,
    F: FnOnce() -> Result<T, E>,
{
    let description = description.to_string();
    let span = info_span!(target: TARGET, "step", step = %description);
    let _entered = span.enter();

    info!(target: TARGET, "Step started");
    let result = body();
    match &result {
        Ok(_) => info!(target: TARGET, "Step passed"),
        Err(err) => error!(target: TARGET, %err, "Step failed"),
    }
    result
}
