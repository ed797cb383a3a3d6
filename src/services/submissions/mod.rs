pub mod create;
pub mod detail;
pub mod grade;
pub mod list;
pub mod regrade;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::grading::GradingService;
use crate::models::submissions::requests::{
    CreateSubmissionRequest, ProfessorGradeRequest, SubmissionListParams,
};
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_grading(&self, request: &HttpRequest) -> Arc<GradingService> {
        request
            .app_data::<actix_web::web::Data<Arc<GradingService>>>()
            .expect("GradingService not found in app data")
            .get_ref()
            .clone()
    }

    // 提交代码并评分
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        submission: CreateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, request, submission).await
    }

    // 上传源文件提交
    pub async fn upload_submission(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::upload_submission(self, request, payload).await
    }

    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        query: SubmissionListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, query).await
    }

    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_submission(self, request, submission_id).await
    }

    // 教授评分
    pub async fn professor_grade(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        grade: ProfessorGradeRequest,
    ) -> ActixResult<HttpResponse> {
        grade::professor_grade(self, request, submission_id, grade).await
    }

    // 重新进行 AI 评分
    pub async fn regrade(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        regrade::regrade_submission(self, request, submission_id).await
    }
}
