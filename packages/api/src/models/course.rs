//! Course, lecture, and order models.
//!
//! Server rows derive [`sqlx::FromRow`]; the client-safe projections are
//! plain serde structs crossing the server-function boundary.

use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
use chrono::{DateTime, Utc};
#[cfg(feature = "server")]
use sqlx::FromRow;
#[cfg(feature = "server")]
use uuid::Uuid;

/// Full course row.
#[cfg(feature = "server")]
#[derive(Debug, Clone, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub instructor_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Full lecture row.
#[cfg(feature = "server")]
#[derive(Debug, Clone, FromRow)]
pub struct Lecture {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub video_url: String,
    pub position: i32,
}

/// Card-level course info for the catalog view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub instructor_name: String,
    pub lecture_count: i64,
}

/// A lecture as the client sees it. `video_url` is only populated for
/// enrolled learners and the owning instructor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LectureInfo {
    pub id: String,
    pub title: String,
    pub video_url: Option<String>,
    pub position: i32,
}

/// Everything the course detail page needs in one round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseDetail {
    pub summary: CourseSummary,
    pub lectures: Vec<LectureInfo>,
    /// The requesting user has purchased this course.
    pub enrolled: bool,
    /// The requesting user is the owning instructor.
    pub owned: bool,
}

/// A created order, handed to the checkout collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderInfo {
    pub order_ref: String,
    pub amount_cents: i64,
    pub currency: String,
    /// Hosted checkout page, absent when no gateway is configured.
    pub checkout_url: Option<String>,
}

/// Human-readable price, e.g. `"$49.00"` / `"49.00 EUR"`.
pub fn format_price(amount_cents: i64, currency: &str) -> String {
    let units = amount_cents / 100;
    let rest = (amount_cents % 100).abs();
    match currency {
        "USD" => format!("${units}.{rest:02}"),
        other => format!("{units}.{rest:02} {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(4900, "USD"), "$49.00");
        assert_eq!(format_price(105, "USD"), "$1.05");
        assert_eq!(format_price(4900, "EUR"), "49.00 EUR");
    }
}
