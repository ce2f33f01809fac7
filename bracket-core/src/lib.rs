pub mod calculations;
pub mod jurisdiction;
pub mod models;
pub mod schedule;

pub use calculations::{build_brackets, resolve};
pub use jurisdiction::{Jurisdiction, SelectorError};
pub use models::*;
pub use schedule::{ScheduleError, ScheduleTable};
