// src/services/request_service.rs
use crate::domain::account::Account;
use crate::domain::catalog::TitleKind;
use crate::domain::request::{validate_request, Request, RequestState};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, RequestClosed, RequestSubmitted};
use crate::repositories::RequestRepository;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SubmitRequestRequest {
    pub title: String,
    pub kind: TitleKind,
    pub note: Option<String>,
}

pub struct RequestService {
    request_repo: Arc<dyn RequestRepository>,
    event_bus: Arc<EventBus>,
}

impl RequestService {
    pub fn new(request_repo: Arc<dyn RequestRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            request_repo,
            event_bus,
        }
    }

    pub fn submit_request(
        &self,
        author: &Account,
        request: SubmitRequestRequest,
    ) -> AppResult<Request> {
        let entry = Request::new(author.id, request.title, request.kind, request.note);

        validate_request(&entry).map_err(AppError::Domain)?;
        self.request_repo.save(&entry)?;

        self.event_bus.emit(RequestSubmitted::new(
            entry.id,
            author.id,
            entry.title.clone(),
        ));

        Ok(entry)
    }

    pub fn my_requests(&self, author: &Account) -> AppResult<Vec<Request>> {
        self.request_repo.list_by_account(author.id)
    }

    pub fn open_requests(&self) -> AppResult<Vec<Request>> {
        self.request_repo.list_by_state(RequestState::Open)
    }

    pub fn close_request(&self, admin: &Account, request_id: Uuid) -> AppResult<Request> {
        if !admin.is_administrator() {
            return Err(AppError::Forbidden(
                "only administrators can close requests".to_string(),
            ));
        }

        let mut entry = self
            .request_repo
            .get_by_id(request_id)?
            .ok_or(AppError::NotFound)?;

        entry.close(admin.id)?;
        self.request_repo.save(&entry)?;

        self.event_bus.emit(RequestClosed::new(entry.id, admin.id));

        Ok(entry)
    }
}
