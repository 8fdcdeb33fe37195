pub mod students;
pub mod system;

pub use students::{StatsGeneration, StudentService};
pub use system::SystemService;
