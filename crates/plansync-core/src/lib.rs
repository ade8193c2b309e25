pub mod config;
pub mod error;
pub mod hash;
pub mod heal;
pub mod ids;
pub mod io;
pub mod migrate;
pub mod paths;
pub mod plan;
pub mod render;
pub mod store;
pub mod task;
pub mod types;

pub use error::{PlanError, Result};
pub use heal::{load, load_with_outcome, read_canonical_only, LoadOutcome, LoadReport};
pub use plan::{Phase, Plan, Task, SCHEMA_VERSION};
pub use store::save;
pub use task::update_status;
