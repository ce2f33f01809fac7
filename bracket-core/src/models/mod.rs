mod bracket;
mod income_record;
mod schedule_row;

pub use bracket::{Bracket, UpperBound};
pub use income_record::IncomeRecord;
pub use schedule_row::{RawScheduleRow, ScheduleCell, ScheduleRow, VariableKind};
