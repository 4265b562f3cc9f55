mod login;
pub use login::Login;

mod register;
pub use register::Register;

mod courses;
pub use courses::Courses;

mod course_detail;
pub use course_detail::CourseDetail;

mod profile;
pub use profile::Profile;
