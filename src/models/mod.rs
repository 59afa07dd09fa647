// Estructuras de datos principales del planificador

mod course;
mod curriculum;
mod grid;
mod plan;
mod warning;

pub use course::{Course, CourseType, Requisite, RequisiteKind};
pub use curriculum::{Curriculum, PrescribedCount, QuotaDeclaration};
pub use grid::{GridError, PlacedCourse, SemesterGrid, SemesterKey, Term};
pub use plan::{PlanEntry, PlanLoad, SavedPlanEntry, SkipReason, SkippedEntry, seed_grid};
pub use warning::Warning;

// Helpers de parseo tolerante compartidos con `datafiles`
pub(crate) use course::{units_from_value, value_to_string, whole_number, year_from_value};
