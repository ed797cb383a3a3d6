use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::ApiResponse;
use crate::models::classes::responses::{AssignmentStats, ClassStatsResponse};
use crate::services::access::internal_error;

// 由 RequireClassRole::new(Professor) 保护
pub async fn get_class_stats(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let assignments = match storage.list_class_assignments(class_id).await {
        Ok(assignments) => assignments,
        Err(e) => return Ok(internal_error("Failed to list assignments", e)),
    };
    let submissions = match storage.list_class_submissions(class_id).await {
        Ok(submissions) => submissions,
        Err(e) => return Ok(internal_error("Failed to list class submissions", e)),
    };
    let student_count = match storage.list_class_members(class_id).await {
        Ok(members) => members.iter().filter(|(cu, _)| !cu.is_professor()).count() as u64,
        Err(e) => return Ok(internal_error("Failed to list class members", e)),
    };

    let response = ClassStatsResponse {
        class_id,
        student_count,
        assignments: assignments
            .iter()
            .map(|a| AssignmentStats::from_submissions(a, &submissions))
            .collect(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Class statistics retrieved successfully",
    )))
}
