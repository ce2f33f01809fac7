pub mod cells;
pub mod income;
pub mod loader;
pub mod logging;
pub mod pipeline;
pub mod writer;

pub use income::{IncomeColumns, IncomeDataset, IncomeLoadError, IncomeLoader, IncomeRow};
pub use loader::{ScheduleColumns, ScheduleLoadError, ScheduleLoader};
pub use pipeline::{RunConfig, RunReport, run};
pub use writer::{AnnotatedWriter, DERIVED_HEADERS, WriteError, default_output_path};
