//! Targeting conditions and feature evaluation for remotely configured feature flags.
//!
//! # Overview
//!
//! Targeting rules are written as MongoDB-style condition documents. A document is compiled once
//! with [`Condition::build`] and then evaluated against an attribute object with
//! [`Condition::evaluate`]. Evaluation never fails: when attributes don't have the expected shape
//! the condition simply doesn't match.
//!
//! Features payloads are parsed into an immutable [`Configuration`] where every condition is
//! already compiled. [`configuration_loader::ConfigurationLoader`] publishes configurations to a
//! [`configuration_store::ConfigurationStore`] (and persists them in a [`cache::Cache`]), and an
//! [`Evaluator`] evaluates features against whatever configuration is active at the moment.
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum. Malformed conditions are reported at build time
//! as [`condition::BuildError`].
//!
//! In production, it is recommended to ignore evaluation errors and serve a default value, as
//! feature flag evaluation should not be critical enough to cause system crashes. However, the
//! returned errors are valuable for debugging and usually indicate that developer's attention is
//! needed.
//!
//! # Logging
//!
//! The package uses the [`log`](https://docs.rs/log/latest/log/) crate for logging messages under
//! the `flag_targeting` target. Consider integrating a `log`-compatible logger implementation for
//! better visibility into evaluation.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

pub mod cache;
pub mod compare;
pub mod condition;
pub mod configuration_loader;
pub mod configuration_store;
pub mod features;

mod attributes;
mod configuration;
mod error;
mod evaluator;
mod value;

pub use attributes::{Attributes, SavedGroups};
pub use condition::Condition;
pub use configuration::Configuration;
pub use error::{Error, Result};
pub use evaluator::Evaluator;
pub use value::{Value, ValueType};
