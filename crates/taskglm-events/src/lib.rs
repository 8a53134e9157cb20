//! Behavioral event logs and the rules that act on them.
//!
//! This crate owns everything that happens to an event log before it is
//! turned into regressors:
//!
//! - [`table`]: the columnar [`EventTable`](table::EventTable) read from a
//!   tab-separated event file, with the required-column contract
//! - [`filter`]: the typed row-filter expression tree used by regressor
//!   specifications in place of query strings
//! - [`nuisance`]: omission / commission / too-fast trial classification,
//!   dispatched on the task family
//! - [`augment`]: subject-level response-time centering and the derived
//!   columns appended to every event table
//!
//! # Example
//!
//! ```
//! use taskglm_events::{
//!     filter::Filter,
//!     nuisance::{NuisanceFlags, TaskFamily},
//!     table::EventTable,
//! };
//!
//! let tsv = "\
//! onset\tduration\ttrial_id\ttrial_type\tkey_press\tcorrect_response\tresponse_time
//! 0.0\t1.0\ttest_trial\tcongruent\t37\t37\t0.61
//! 2.5\t1.0\ttest_trial\tincongruent\t-1\t39\tn/a
//! 5.0\t1.0\ttest_trial\tincongruent\t37\t39\t0.15
//! ";
//! let events = EventTable::from_tsv_reader(tsv.as_bytes()).unwrap();
//! let flags = NuisanceFlags::classify(&events, &TaskFamily::TestTrial).unwrap();
//! assert_eq!(flags.omission, [false, true, false]);
//! assert_eq!(flags.rt_too_fast, [false, false, true]);
//!
//! let congruent = Filter::eq("trial_type", "congruent").evaluate(&events).unwrap();
//! assert_eq!(congruent, [true, false, false]);
//! ```

pub mod augment;
pub mod filter;
pub mod nuisance;
pub mod table;
