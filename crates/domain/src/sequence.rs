//! Sequences — scripted lists of patches and timing/reset directives.
//!
//! JSON form: an array whose elements are either settings patches (objects)
//! or commands (`["sleep", seconds]`, `["reset"]`).

use std::time::Duration;

use serde_json::Value;

use crate::config::RegionsConfig;
use crate::error::{InvalidSequenceStep, LumenError, NotFoundError};
use crate::settings::SettingsPatch;

/// One element of a [`Sequence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceStep {
    /// Apply a settings patch.
    Apply(SettingsPatch),
    /// Hold the worker for the given duration.
    Sleep(Duration),
    /// Re-apply the state captured when the sequence started.
    Reset,
}

impl SequenceStep {
    /// Decode one sequence element.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::InvalidSequenceStep`] for unknown commands, bad
    /// `sleep` arguments or non-object/non-array elements, and
    /// [`LumenError::MalformedPayload`] for malformed patches.
    pub fn from_value(value: Value) -> Result<Self, LumenError> {
        match value {
            Value::Object(_) => Ok(Self::Apply(SettingsPatch::from_value(value)?)),
            Value::Array(ref items) => match items.as_slice() {
                [Value::String(name), Value::Number(seconds)] if name == "sleep" => seconds
                    .as_f64()
                    .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                    .map(Self::Sleep)
                    .ok_or_else(|| invalid(&value)),
                [Value::String(name)] if name == "reset" => Ok(Self::Reset),
                _ => Err(invalid(&value)),
            },
            other => Err(invalid(&other)),
        }
    }
}

fn invalid(value: &Value) -> LumenError {
    InvalidSequenceStep {
        step: value.to_string(),
    }
    .into()
}

/// An ordered script executed without interleaving other requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence(Vec<SequenceStep>);

impl Sequence {
    /// Decode a sequence from its JSON array form.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::InvalidSequenceStep`] when `value` is not an
    /// array or any element is invalid.
    pub fn from_value(value: Value) -> Result<Self, LumenError> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(SequenceStep::from_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Self),
            other => Err(invalid(&other)),
        }
    }

    pub fn steps(&self) -> impl Iterator<Item = &SequenceStep> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check every patch step against the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for the first unknown region or zone.
    pub fn validate(&self, regions: &RegionsConfig) -> Result<(), NotFoundError> {
        self.0.iter().try_for_each(|step| match step {
            SequenceStep::Apply(patch) => patch.validate(regions),
            SequenceStep::Sleep(_) | SequenceStep::Reset => Ok(()),
        })
    }
}

impl From<Vec<SequenceStep>> for Sequence {
    fn from(steps: Vec<SequenceStep>) -> Self {
        Self(steps)
    }
}
