//! Day-ahead PV / battery / grid dispatch: scenario model, LP transcription,
//! solver seam, and plan KPIs.

pub mod error;
pub mod lp;
pub mod optimizer;
pub mod summary;
pub mod types;

pub use error::OptimizationError;
pub use lp::{LinearProgram, LpSolution, LpSolver, MiniLpSolver, Relation, VarId};
pub use optimizer::DispatchOptimizer;
pub use summary::DispatchSummary;
pub use types::{DispatchResult, HourlyDispatch, Scenario};
