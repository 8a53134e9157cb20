//! Task configurations: which regressors each task models and which
//! contrasts are estimated from them.
//!
//! Definitions are declared with the [`TaskDefinition`](config::TaskDefinition)
//! builder and validated into a [`TaskRegistry`](registry::TaskRegistry).
//! Validation checks every task at once and reports all problems together.
//!
//! ```
//! use taskglm_tasks::registry::TaskRegistry;
//!
//! let registry = TaskRegistry::builtin(true).unwrap();
//! let stop_signal = registry.get("stopSignal").unwrap();
//! assert!(stop_signal.contrast_names().any(|name| name == "stop_success-go"));
//! assert!(registry.get("stroop").is_err());
//! ```

mod builtin;
pub mod config;
pub mod registry;
