pub mod prelude;

pub mod attendance;
pub mod classes;
pub mod students;
pub mod teachers;
