use std::sync::Arc;

use async_trait::async_trait;
use models::messages::{
    AddUserRequest, AddUserResponse, FindUserRequest, FindUserResponse, FindUsersRequest,
    FindUsersResponse,
};
use tracing::{error, info, instrument, warn, Span};
use uuid::Uuid;

use super::store::UserStore;
use crate::api::UserService;
use crate::errors::StoreError;
use crate::status::Status;

/// Request handler for the user service. Holds the store it fronts and is
/// the only place store outcomes are turned into protocol statuses.
pub struct UserHandler<S: UserStore> {
    store: Arc<S>,
}

impl<S: UserStore> UserHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: UserStore> UserService for UserHandler<S> {
    #[instrument(skip(self, req), fields(user_id = %req.user.id))]
    async fn add_user(&self, req: AddUserRequest) -> Result<AddUserResponse, Status> {
        let mut user = req.user;
        info!("received a create-user request");

        if user.id.is_empty() {
            user.id = Uuid::new_v4().to_string();
            Span::current().record("user_id", user.id.as_str());
        } else if let Err(e) = Uuid::parse_str(&user.id) {
            warn!(error = %e, "rejected create-user request with malformed id");
            return Err(Status::invalid_argument(format!("user ID is not a valid UUID: {e}")));
        }

        let id = user.id.clone();
        match self.store.save(user).await {
            Ok(()) => {
                info!("saved user");
                Ok(AddUserResponse { id })
            }
            Err(e @ StoreError::AlreadyExists) => {
                warn!("cannot save user since it already exists");
                Err(Status::already_exists(format!("cannot save user to store: {e}")))
            }
            Err(e) => {
                error!(error = %e, "cannot save user");
                Err(Status::internal(format!("cannot save user to store: {e}")))
            }
        }
    }

    #[instrument(skip(self, req), fields(user_id = %req.id))]
    async fn find_user(&self, req: FindUserRequest) -> Result<FindUserResponse, Status> {
        match self.store.find(&req.id).await {
            Ok(user) => {
                info!("found user");
                Ok(FindUserResponse { user })
            }
            Err(StoreError::NotFound) => {
                warn!("user is not found");
                Err(Status::not_found(format!("user {} is not found", req.id)))
            }
            Err(e) => {
                error!(error = %e, "cannot find user");
                Err(Status::internal(format!("cannot find user: {e}")))
            }
        }
    }

    #[instrument(skip(self, _req))]
    async fn find_users(&self, _req: FindUsersRequest) -> Result<FindUsersResponse, Status> {
        let users = self.store.find_all().await.map_err(|e| {
            error!(error = %e, "cannot find users");
            Status::internal(format!("cannot find users: {e}"))
        })?;

        // An empty collection is reported as not-found, not as an empty list.
        if users.is_empty() {
            warn!("no users found");
            return Err(Status::not_found("no users found"));
        }

        info!(count = users.len(), "listed users");
        Ok(FindUsersResponse { users })
    }
}
