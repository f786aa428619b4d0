//! Calendar document generation and parsing.
//!
//! This module handles the wire format exchanged with the remote calendar:
//! one VCALENDAR document holding a VEVENT per group entry.

mod generate;
mod parse;

pub use generate::generate_calendar;
pub use parse::parse_calendar;
