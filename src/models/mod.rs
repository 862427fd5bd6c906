pub mod assignment;
pub mod class;

pub use assignment::{
    Assignment, AssignmentView, CountdownResponse, DashboardStats, FileRef, NewAssignmentRequest,
};
pub use class::{
    Class, ClassDetail, ClassView, GeneratedPasscode, NewClassRequest, StudentClassView,
};
