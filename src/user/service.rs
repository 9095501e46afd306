use async_trait::async_trait;

use super::model::User;
use super::{Id, Repository};

#[async_trait]
pub trait UserService {
    async fn find_by_id(&self, id: &Id) -> super::Result<User>;

    async fn find_by_ids(&self, ids: &[Id]) -> super::Result<Vec<User>>;
}

#[derive(Clone)]
pub struct UserServiceImpl {
    repo: Repository,
}

impl UserServiceImpl {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn find_by_id(&self, id: &Id) -> super::Result<User> {
        self.repo.find_by_id(id)
    }

    async fn find_by_ids(&self, ids: &[Id]) -> super::Result<Vec<User>> {
        self.repo.find_by_ids(ids)
    }
}
