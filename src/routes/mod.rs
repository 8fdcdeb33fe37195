pub mod students;

pub mod system;

pub use students::configure_student_routes;
pub use system::configure_system_routes;
