//! Database models and their client-safe projections.

pub mod course;
pub mod user;

pub use course::{format_price, CourseDetail, CourseSummary, LectureInfo, OrderInfo};
#[cfg(feature = "server")]
pub use user::User;
pub use user::{ProfileInfo, ROLE_INSTRUCTOR, ROLE_LEARNER};
