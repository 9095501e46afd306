use diesel::ExpressionMethods;
use diesel::OptionalExtension;
use diesel::QueryDsl;
use diesel::RunQueryDsl;
use diesel::SelectableHelper;

use crate::integration::db;
use crate::schema::users;

use super::Id;
use super::model::User;

pub trait UserRepository {
    fn find_by_id(&self, id: &Id) -> super::Result<User>;

    fn find_by_ids(&self, ids: &[Id]) -> super::Result<Vec<User>>;
}

pub struct PgUserRepository {
    pool: db::Pool,
}

impl PgUserRepository {
    pub fn new(pool: db::Pool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    fn find_by_id(&self, id: &Id) -> super::Result<User> {
        let mut conn = self.pool.get()?;

        users::table
            .find(id)
            .select(User::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| super::Error::NotFound(id.clone()))
    }

    fn find_by_ids(&self, ids: &[Id]) -> super::Result<Vec<User>> {
        let mut conn = self.pool.get()?;

        let users = users::table
            .filter(users::id.eq_any(ids))
            .select(User::as_select())
            .load(&mut conn)?;

        Ok(users)
    }
}
