pub mod create;
pub mod enroll;
pub mod get;
pub mod list;
pub mod stats;
pub mod submissions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classes::requests::{ClassQueryParams, CreateClassRequest};
use crate::storage::Storage;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassService {
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

    // 获取课程列表
    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_classes(self, request, query).await
    }

    pub async fn create_class(
        &self,
        req: &HttpRequest,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, req, class_data).await
    }

    // 课程详情（成员与作业）
    pub async fn get_class(&self, req: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        get::get_class(self, req, class_id).await
    }

    // 学生选课
    pub async fn enroll(&self, req: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        enroll::enroll_student(self, req, class_id).await
    }

    // 添加共同授课教授
    pub async fn add_professor(
        &self,
        req: &HttpRequest,
        class_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        enroll::add_professor(self, req, class_id, user_id).await
    }

    // 课程内的提交
    pub async fn list_class_submissions(
        &self,
        req: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        submissions::list_class_submissions(self, req, class_id).await
    }

    // 课程评分统计
    pub async fn get_class_stats(
        &self,
        req: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        stats::get_class_stats(self, req, class_id).await
    }
}
