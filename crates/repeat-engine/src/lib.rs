//! # repeat-engine
//!
//! Next-occurrence evaluation for repeating calendar entries and resource bookings.
//!
//! A repeat rule is one of a small, closed set of patterns (daily, weekly,
//! monthly by date, monthly by weekday, yearly, or no real repetition), an
//! optional inclusive end date, and a set of additional dates. Repeating
//! additions seed further progressions under the same pattern; the rest are
//! one-off occurrences. The engine answers "what is the next occurrence at or
//! after T", and derived questions built on top of it.
//!
//! Instants are wall-clock [`chrono::NaiveDateTime`] values; there is no
//! timezone handling and no text parsing.
//!
//! ## Modules
//!
//! - [`kind`] -- Repeat kinds and weekday ordinals with their numeric codes
//! - [`rule`] -- `RepeatRule` data model and its builder
//! - [`stepper`] -- One "next member of the progression" function per pattern
//! - [`search`] -- Multi-seed next-occurrence search, last occurrence, iteration
//! - [`expander`] -- Occurrences → start/end spans within a window
//! - [`record`] -- Deserializable upstream record → `RepeatRule`
//! - [`error`] -- Error types

pub mod error;
pub mod expander;
pub mod kind;
pub mod record;
pub mod rule;
pub mod search;
pub mod stepper;

pub use error::{RepeatError, Result};
pub use expander::{expand_occurrences, ExpandedOccurrence};
pub use kind::{RepeatKind, WeekdayOrdinal};
pub use record::RepeatRecord;
pub use rule::{AdditionalOccurrence, ExceptionDate, Pattern, RepeatRule, RepeatRuleBuilder};
pub use search::{last_occurrence, next_occurrence_after, occurrences, occurrences_between};
