pub use super::attendance::Entity as Attendance;
pub use super::classes::Entity as Classes;
pub use super::students::Entity as Students;
pub use super::teachers::Entity as Teachers;
