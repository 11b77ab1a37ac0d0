//! Fee ledger handlers
//!
//! Every route is scoped to a school. Students and classes are not stored
//! by the ledger, so callers pass them in the query string or body.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use core_kernel::{AcademicPeriod, ClassId, Money, SchoolId, StudentId};
use domain_fees::{ClassStatistics, Student, StatusAggregator};

use crate::dto::fees::*;
use crate::{error::ApiError, AppState};

/// Lists the fee catalog of a school
pub async fn list_fee_types(
    State(state): State<AppState>,
    Path(school_id): Path<Uuid>,
) -> Result<Json<Vec<FeeTypeResponse>>, ApiError> {
    let catalog = state.ledger.load_catalog(SchoolId::from(school_id)).await?;
    Ok(Json(catalog.all().iter().map(FeeTypeResponse::from).collect()))
}

/// Records a payment event
pub async fn record_payment(
    State(state): State<AppState>,
    Path(school_id): Path<Uuid>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<FeeRecordResponse>), ApiError> {
    request.validate()?;

    let period = AcademicPeriod::new(request.period.as_str())?;
    let collector = request.collector();
    let fee_type_id = request.fee_type();
    let amount = request.amount();
    let student = Student::from(request.student);

    let record = state
        .ledger
        .record_payment(SchoolId::from(school_id), &student, fee_type_id, collector, period, amount)
        .await?;

    info!(record_id = %record.id, status = %record.status.as_str(), "Payment recorded");
    Ok((StatusCode::CREATED, Json(FeeRecordResponse::from(&record))))
}

/// Overall fee status of a student in a period
pub async fn student_status(
    State(state): State<AppState>,
    Path((school_id, student_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<StudentQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let period = query.period()?;
    let student = query.student(student_id)?;
    let status = state
        .ledger
        .student_status(SchoolId::from(school_id), &student, &period)
        .await?;

    Ok(Json(StatusResponse {
        student_id,
        period: period.label().to_string(),
        status,
    }))
}

/// Per-fee-type balances of a student in a period
pub async fn student_balances(
    State(state): State<AppState>,
    Path((school_id, student_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<StudentQuery>,
) -> Result<Json<BalancesResponse>, ApiError> {
    let period = query.period()?;
    let student = query.student(student_id)?;
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());

    let balances = state
        .ledger
        .student_balances(SchoolId::from(school_id), &student, &period)
        .await?;
    let total_outstanding: Money = balances.iter().map(|b| b.outstanding).sum();

    Ok(Json(BalancesResponse {
        student_id,
        period: period.label().to_string(),
        status: StatusAggregator::status_of(&balances),
        balances: balances.iter().map(|b| BalanceResponse::new(b, as_of)).collect(),
        total_outstanding: total_outstanding.round_to_display().amount(),
    }))
}

/// Payment history of a student grouped by period
pub async fn student_history(
    State(state): State<AppState>,
    Path((school_id, student_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let buckets = state
        .ledger
        .student_history(
            SchoolId::from(school_id),
            StudentId::from(student_id),
            query.sort == HistorySort::Chronological,
        )
        .await?;

    Ok(Json(HistoryResponse::new(student_id, &buckets)))
}

/// Rendered multi-period statement of a student
pub async fn student_statement(
    State(state): State<AppState>,
    Path((school_id, student_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<StudentQuery>,
) -> Result<Response, ApiError> {
    let student = query.identity(student_id);
    let statement = state
        .ledger
        .student_statement(SchoolId::from(school_id), &student)
        .await?;

    let renderer = state.ledger.renderer();
    let body = renderer.render_statement(&statement)?;
    Ok(([(header::CONTENT_TYPE, renderer.content_type())], body).into_response())
}

/// Collection statistics of a class
pub async fn class_statistics(
    State(state): State<AppState>,
    Path((school_id, class_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<ClassStatisticsRequest>,
) -> Result<Json<ClassStatistics>, ApiError> {
    request.validate()?;

    let period = AcademicPeriod::new(request.period.as_str())?;
    let students: Vec<Student> = request.students.into_iter().map(Student::from).collect();
    let statistics = state
        .ledger
        .class_statistics(SchoolId::from(school_id), ClassId::from(class_id), &period, &students)
        .await?;

    Ok(Json(statistics))
}

/// Rendered class fee report
pub async fn class_report(
    State(state): State<AppState>,
    Path((school_id, class_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<ClassReportRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;

    let period = AcademicPeriod::new(request.period.as_str())?;
    let class = request.class(class_id);
    let students: Vec<Student> = request.students.into_iter().map(Student::from).collect();
    let report = state
        .ledger
        .class_report(SchoolId::from(school_id), &class, &period, &students)
        .await?;

    let renderer = state.ledger.renderer();
    let body = renderer.render_class_report(&report)?;
    Ok(([(header::CONTENT_TYPE, renderer.content_type())], body).into_response())
}
