// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Context profiles and the storage port they are persisted through.
//!
//! A profile only ever produces scope contexts; the process-wide defaults are
//! not configurable.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::context::{current_context, set_current_context, Context, Family};
use crate::error::FixedPointError;
use crate::overflow::Overflow;

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Profile holds settings no context can take.
    #[error("invalid profile: {0}")]
    Invalid(#[from] FixedPointError),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Overrides for one family; `None` keeps the family default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextSettings {
    /// Wordlength override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordlength: Option<u32>,
    /// Precision override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    /// Overflow policy override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<Overflow>,
}

impl ContextSettings {
    /// Applies the overrides on top of the family default.
    pub fn resolve(&self, family: Family) -> Result<Context, FixedPointError> {
        let mut ctx = Context::new(family);
        if let Some(wordlength) = self.wordlength {
            ctx.set_wordlength(wordlength)?;
        }
        if let Some(precision) = self.precision {
            ctx.set_precision(precision);
        }
        if let Some(overflow) = self.overflow {
            ctx.set_overflow(overflow);
        }
        Ok(ctx)
    }

    /// `self` with every field `update` sets replaced by `update`'s value.
    pub fn overlay(self, update: Self) -> Self {
        Self {
            wordlength: update.wordlength.or(self.wordlength),
            precision: update.precision.or(self.precision),
            overflow: update.overflow.or(self.overflow),
        }
    }

    /// Every field of `ctx`, as explicit overrides.
    pub fn from_context(ctx: &Context) -> Self {
        Self {
            wordlength: Some(ctx.wordlength()),
            precision: Some(ctx.precision()),
            overflow: Some(ctx.overflow()),
        }
    }
}

/// Named set of context overrides for both families.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextProfile {
    /// Binary family overrides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<ContextSettings>,
    /// Decimal family overrides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal: Option<ContextSettings>,
}

impl ContextProfile {
    /// Settings recorded for `family`, if any.
    pub fn settings(&self, family: Family) -> Option<&ContextSettings> {
        match family {
            Family::Binary => self.binary.as_ref(),
            Family::Decimal => self.decimal.as_ref(),
        }
    }

    /// Context the profile yields for `family` (the default when absent).
    pub fn resolve(&self, family: Family) -> Result<Context, FixedPointError> {
        self.settings(family)
            .copied()
            .unwrap_or_default()
            .resolve(family)
    }

    /// Installs the profile's contexts into the calling scope.
    ///
    /// Both families are validated before either is installed. Families the
    /// profile does not mention keep their current scope context.
    pub fn apply(&self) -> Result<(), FixedPointError> {
        let mut resolved = Vec::with_capacity(Family::ALL.len());
        for family in Family::ALL {
            if self.settings(family).is_some() {
                resolved.push(self.resolve(family)?);
            }
        }
        resolved.into_iter().for_each(set_current_context);
        Ok(())
    }

    /// Snapshot of the calling scope's contexts as a profile.
    pub fn capture() -> Self {
        Self {
            binary: Some(ContextSettings::from_context(&current_context(
                Family::Binary,
            ))),
            decimal: Some(ContextSettings::from_context(&current_context(
                Family::Decimal,
            ))),
        }
    }
}

/// Thin service that serializes config values and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize a config value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let value = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }

    /// Load a profile, validating it against both families.
    pub fn load_profile(&self, key: &str) -> Result<Option<ContextProfile>, ConfigError> {
        let Some(profile) = self.load::<ContextProfile>(key)? else {
            return Ok(None);
        };
        for family in Family::ALL {
            profile.resolve(family)?;
        }
        Ok(Some(profile))
    }

    /// Validate and persist a profile.
    pub fn save_profile(&self, key: &str, profile: &ContextProfile) -> Result<(), ConfigError> {
        for family in Family::ALL {
            profile.resolve(family)?;
        }
        self.save(key, profile)
    }
}
