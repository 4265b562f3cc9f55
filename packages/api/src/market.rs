//! Course catalog, purchases, and lecture management.
//!
//! Same dual-definition pattern as the crate root: server logic behind
//! `feature = "server"`, thin client stubs otherwise. Lecture endpoints
//! require the session user to own the course; lecture video URLs only
//! leave the server for enrolled learners and the owning instructor.

use dioxus::prelude::*;

use crate::models::{CourseDetail, CourseSummary, LectureInfo, OrderInfo};

#[cfg(feature = "server")]
use crate::{auth, db::get_pool, models, payments::PaymentGateway, require_user};

/// Resolve the optional session user without failing for anonymous visitors.
#[cfg(feature = "server")]
async fn session_user_id(
    session: &tower_sessions::Session,
) -> Result<Option<uuid::Uuid>, ServerFnError> {
    let user_id: Option<String> = session
        .get(auth::SESSION_USER_ID_KEY)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    match user_id {
        Some(id) => Ok(Some(
            uuid::Uuid::parse_str(&id).map_err(|e| ServerFnError::new(e.to_string()))?,
        )),
        None => Ok(None),
    }
}

/// Load a course and check that `user_id` is its instructor.
#[cfg(feature = "server")]
async fn require_owned_course(
    pool: &sqlx::PgPool,
    course_id: &str,
    user_id: uuid::Uuid,
) -> Result<models::course::Course, ServerFnError> {
    let course_uuid =
        uuid::Uuid::parse_str(course_id).map_err(|e| ServerFnError::new(e.to_string()))?;

    let course: Option<models::course::Course> =
        sqlx::query_as("SELECT * FROM courses WHERE id = $1")
            .bind(course_uuid)
            .fetch_optional(pool)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;

    let Some(course) = course else {
        return Err(ServerFnError::new("Course not found"));
    };
    if course.instructor_id != user_id {
        return Err(ServerFnError::new("Only the course instructor can do that"));
    }
    Ok(course)
}

/// List the catalog, optionally filtered by a search term over title and
/// description.
#[cfg(feature = "server")]
#[get("/api/courses")]
pub async fn list_courses(search: Option<String>) -> Result<Vec<CourseSummary>, ServerFnError> {
    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let pattern = search
        .as_deref()
        .map(|s| format!("%{}%", s.trim()))
        .unwrap_or_else(|| "%".to_string());

    let rows: Vec<(uuid::Uuid, String, String, i64, String, String, i64)> = sqlx::query_as(
        "SELECT c.id, c.title, c.description, c.price_cents, c.currency, u.name,
                (SELECT COUNT(*) FROM lectures l WHERE l.course_id = c.id)
         FROM courses c
         JOIN users u ON u.id = c.instructor_id
         WHERE c.title ILIKE $1 OR c.description ILIKE $1
         ORDER BY c.created_at DESC",
    )
    .bind(&pattern)
    .fetch_all(pool)
    .await
    .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(rows
        .into_iter()
        .map(
            |(id, title, description, price_cents, currency, instructor_name, lecture_count)| {
                CourseSummary {
                    id: id.to_string(),
                    title,
                    description,
                    price_cents,
                    currency,
                    instructor_name,
                    lecture_count,
                }
            },
        )
        .collect())
}

#[cfg(not(feature = "server"))]
#[get("/api/courses")]
pub async fn list_courses(search: Option<String>) -> Result<Vec<CourseSummary>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Course detail with lectures, plus the viewer's relationship to it.
#[cfg(feature = "server")]
#[get("/api/courses/:course_id", session: tower_sessions::Session)]
pub async fn get_course(course_id: String) -> Result<CourseDetail, ServerFnError> {
    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let course_uuid =
        uuid::Uuid::parse_str(&course_id).map_err(|e| ServerFnError::new(e.to_string()))?;

    let row: Option<(uuid::Uuid, String, String, i64, String, uuid::Uuid, String)> =
        sqlx::query_as(
            "SELECT c.id, c.title, c.description, c.price_cents, c.currency, c.instructor_id, u.name
             FROM courses c JOIN users u ON u.id = c.instructor_id
             WHERE c.id = $1",
        )
        .bind(course_uuid)
        .fetch_optional(pool)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let Some((id, title, description, price_cents, currency, instructor_id, instructor_name)) = row
    else {
        return Err(ServerFnError::new("Course not found"));
    };

    let viewer = session_user_id(&session).await?;
    let owned = viewer == Some(instructor_id);
    let enrolled = match viewer {
        Some(user_id) => {
            let hit: Option<(i64,)> = sqlx::query_as(
                "SELECT 1 as n FROM enrollments WHERE user_id = $1 AND course_id = $2",
            )
            .bind(user_id)
            .bind(course_uuid)
            .fetch_optional(pool)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;
            hit.is_some()
        }
        None => false,
    };

    let lectures: Vec<models::course::Lecture> =
        sqlx::query_as("SELECT * FROM lectures WHERE course_id = $1 ORDER BY position")
            .bind(course_uuid)
            .fetch_all(pool)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;

    let lectures: Vec<LectureInfo> = lectures
        .into_iter()
        .map(|l| LectureInfo {
            id: l.id.to_string(),
            title: l.title,
            video_url: (enrolled || owned).then_some(l.video_url),
            position: l.position,
        })
        .collect();
    let lecture_count = lectures.len() as i64;

    Ok(CourseDetail {
        summary: CourseSummary {
            id: id.to_string(),
            title,
            description,
            price_cents,
            currency,
            instructor_name,
            lecture_count,
        },
        lectures,
        enrolled,
        owned,
    })
}

#[cfg(not(feature = "server"))]
#[get("/api/courses/:course_id")]
pub async fn get_course(course_id: String) -> Result<CourseDetail, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Create a payment order for a course. The returned `checkout_url` (when
/// a gateway is configured) is where the checkout collaborator sends the
/// user.
#[cfg(feature = "server")]
#[post("/api/orders", session: tower_sessions::Session)]
pub async fn create_order(course_id: String) -> Result<OrderInfo, ServerFnError> {
    let user = require_user(&session).await?;

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let course_uuid =
        uuid::Uuid::parse_str(&course_id).map_err(|e| ServerFnError::new(e.to_string()))?;

    let course: Option<models::course::Course> =
        sqlx::query_as("SELECT * FROM courses WHERE id = $1")
            .bind(course_uuid)
            .fetch_optional(pool)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;

    let Some(course) = course else {
        return Err(ServerFnError::new("Course not found"));
    };
    if course.instructor_id == user.id {
        return Err(ServerFnError::new("You already own this course"));
    }

    let already: Option<(i64,)> =
        sqlx::query_as("SELECT 1 as n FROM enrollments WHERE user_id = $1 AND course_id = $2")
            .bind(user.id)
            .bind(course_uuid)
            .fetch_optional(pool)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;
    if already.is_some() {
        return Err(ServerFnError::new("You are already enrolled"));
    }

    let receipt = uuid::Uuid::new_v4().to_string();
    let gateway = PaymentGateway::from_env();
    let order = gateway
        .create_order(course.price_cents, &course.currency, &receipt)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    sqlx::query(
        "INSERT INTO orders (order_ref, user_id, course_id, amount_cents, currency, status)
         VALUES ($1, $2, $3, $4, $5, 'created')",
    )
    .bind(&order.order_ref)
    .bind(user.id)
    .bind(course_uuid)
    .bind(course.price_cents)
    .bind(&course.currency)
    .execute(pool)
    .await
    .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(OrderInfo {
        order_ref: order.order_ref,
        amount_cents: course.price_cents,
        currency: course.currency,
        checkout_url: order.checkout_url,
    })
}

#[cfg(not(feature = "server"))]
#[post("/api/orders")]
pub async fn create_order(course_id: String) -> Result<OrderInfo, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Confirm a purchase after checkout: asks the gateway whether the order
/// was paid, then enrolls the user.
#[cfg(feature = "server")]
#[post("/api/orders/confirm", session: tower_sessions::Session)]
pub async fn confirm_purchase(order_ref: String) -> Result<String, ServerFnError> {
    let user = require_user(&session).await?;

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let row: Option<(uuid::Uuid, String)> =
        sqlx::query_as("SELECT course_id, status FROM orders WHERE order_ref = $1 AND user_id = $2")
            .bind(&order_ref)
            .bind(user.id)
            .fetch_optional(pool)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;

    let Some((course_id, status)) = row else {
        return Err(ServerFnError::new("Order not found"));
    };

    let already_paid = status == "paid";
    if !already_paid {
        let gateway = PaymentGateway::from_env();
        let paid = gateway
            .is_paid(&order_ref)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;
        if !paid {
            return Err(ServerFnError::new("Payment has not completed yet"));
        }
    }

    // The status flip and the enrollment land in one transaction, and the
    // already-paid path re-runs both, so a retry always reaches the
    // enrolled state even after an earlier partial failure.
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    sqlx::query("UPDATE orders SET status = 'paid' WHERE order_ref = $1")
        .bind(&order_ref)
        .execute(&mut *tx)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    sqlx::query(
        "INSERT INTO enrollments (user_id, course_id, order_ref)
         VALUES ($1, $2, $3)
         ON CONFLICT (user_id, course_id) DO NOTHING",
    )
    .bind(user.id)
    .bind(course_id)
    .bind(&order_ref)
    .execute(&mut *tx)
    .await
    .map_err(|e| ServerFnError::new(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(if already_paid {
        "Purchase already confirmed".to_string()
    } else {
        "Purchase complete — you are enrolled".to_string()
    })
}

#[cfg(not(feature = "server"))]
#[post("/api/orders/confirm")]
pub async fn confirm_purchase(order_ref: String) -> Result<String, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Append a lecture to an owned course.
#[cfg(feature = "server")]
#[post("/api/lectures/add", session: tower_sessions::Session)]
pub async fn add_lecture(
    course_id: String,
    title: String,
    video_url: String,
) -> Result<LectureInfo, ServerFnError> {
    let user = require_user(&session).await?;

    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(ServerFnError::new("Lecture title is required"));
    }

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    let course = require_owned_course(pool, &course_id, user.id).await?;

    let lecture: models::course::Lecture = sqlx::query_as(
        "INSERT INTO lectures (course_id, title, video_url, position)
         VALUES ($1, $2, $3,
                 (SELECT COALESCE(MAX(position), 0) + 1 FROM lectures WHERE course_id = $1))
         RETURNING *",
    )
    .bind(course.id)
    .bind(&title)
    .bind(video_url.trim())
    .fetch_one(pool)
    .await
    .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(LectureInfo {
        id: lecture.id.to_string(),
        title: lecture.title,
        video_url: Some(lecture.video_url),
        position: lecture.position,
    })
}

#[cfg(not(feature = "server"))]
#[post("/api/lectures/add")]
pub async fn add_lecture(
    course_id: String,
    title: String,
    video_url: String,
) -> Result<LectureInfo, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Rename a lecture on an owned course.
#[cfg(feature = "server")]
#[post("/api/lectures/update", session: tower_sessions::Session)]
pub async fn update_lecture(lecture_id: String, title: String) -> Result<(), ServerFnError> {
    let user = require_user(&session).await?;

    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(ServerFnError::new("Lecture title is required"));
    }

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let lecture_uuid =
        uuid::Uuid::parse_str(&lecture_id).map_err(|e| ServerFnError::new(e.to_string()))?;

    let course_id: Option<(uuid::Uuid,)> =
        sqlx::query_as("SELECT course_id FROM lectures WHERE id = $1")
            .bind(lecture_uuid)
            .fetch_optional(pool)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;
    let Some((course_id,)) = course_id else {
        return Err(ServerFnError::new("Lecture not found"));
    };
    require_owned_course(pool, &course_id.to_string(), user.id).await?;

    sqlx::query("UPDATE lectures SET title = $1 WHERE id = $2")
        .bind(&title)
        .bind(lecture_uuid)
        .execute(pool)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/lectures/update")]
pub async fn update_lecture(lecture_id: String, title: String) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Delete a lecture from an owned course.
#[cfg(feature = "server")]
#[post("/api/lectures/delete", session: tower_sessions::Session)]
pub async fn delete_lecture(lecture_id: String) -> Result<(), ServerFnError> {
    let user = require_user(&session).await?;

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let lecture_uuid =
        uuid::Uuid::parse_str(&lecture_id).map_err(|e| ServerFnError::new(e.to_string()))?;

    let course_id: Option<(uuid::Uuid,)> =
        sqlx::query_as("SELECT course_id FROM lectures WHERE id = $1")
            .bind(lecture_uuid)
            .fetch_optional(pool)
            .await
            .map_err(|e| ServerFnError::new(e.to_string()))?;
    let Some((course_id,)) = course_id else {
        return Err(ServerFnError::new("Lecture not found"));
    };
    require_owned_course(pool, &course_id.to_string(), user.id).await?;

    sqlx::query("DELETE FROM lectures WHERE id = $1")
        .bind(lecture_uuid)
        .execute(pool)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/lectures/delete")]
pub async fn delete_lecture(lecture_id: String) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}
