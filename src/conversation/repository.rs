use diesel::{
    Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper,
};

use crate::integration::db;
use crate::schema::{conversations, conversations_users, users};
use crate::user::{self, model::User};

use super::Id;
use super::model::{Conversation, NewConversation, NewMember};

pub trait ConversationRepository {
    fn find_by_id(&self, id: &Id) -> super::Result<Conversation>;

    /// Conversations the user takes part in, most recently active first.
    fn find_by_member(&self, user_id: &user::Id) -> super::Result<Vec<Conversation>>;

    /// Oldest conversation having at least one of the given users as a member.
    fn find_first_by_any_member(
        &self,
        user_ids: &[user::Id],
    ) -> super::Result<Option<Conversation>>;

    fn find_members(&self, id: &Id) -> super::Result<Vec<User>>;

    /// Inserts the conversation and its members atomically.
    fn create(
        &self,
        new: &NewConversation<'_>,
        members: &[user::Id],
    ) -> super::Result<Conversation>;

    /// Deletes the conversation only if the user is one of its members.
    fn delete_by_member(&self, id: &Id, user_id: &user::Id) -> super::Result<usize>;
}

pub struct PgConversationRepository {
    pool: db::Pool,
}

impl PgConversationRepository {
    pub fn new(pool: db::Pool) -> Self {
        Self { pool }
    }
}

impl ConversationRepository for PgConversationRepository {
    fn find_by_id(&self, id: &Id) -> super::Result<Conversation> {
        let mut conn = self.pool.get()?;

        conversations::table
            .find(id)
            .select(Conversation::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| super::Error::NotFound(id.clone()))
    }

    fn find_by_member(&self, user_id: &user::Id) -> super::Result<Vec<Conversation>> {
        let mut conn = self.pool.get()?;

        let conversations = conversations::table
            .inner_join(conversations_users::table)
            .filter(conversations_users::user_id.eq(user_id))
            .order(conversations::last_message_at.desc())
            .select(Conversation::as_select())
            .load(&mut conn)?;

        Ok(conversations)
    }

    fn find_first_by_any_member(
        &self,
        user_ids: &[user::Id],
    ) -> super::Result<Option<Conversation>> {
        let mut conn = self.pool.get()?;

        let membership = conversations_users::table
            .filter(conversations_users::user_id.eq_any(user_ids))
            .select(conversations_users::conversation_id);

        let conversation = conversations::table
            .filter(conversations::id.eq_any(membership))
            .order(conversations::created_at.asc())
            .select(Conversation::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(conversation)
    }

    fn find_members(&self, id: &Id) -> super::Result<Vec<User>> {
        let mut conn = self.pool.get()?;

        let members = conversations_users::table
            .inner_join(users::table)
            .filter(conversations_users::conversation_id.eq(id))
            .order(users::email.asc())
            .select(User::as_select())
            .load(&mut conn)?;

        Ok(members)
    }

    fn create(
        &self,
        new: &NewConversation<'_>,
        members: &[user::Id],
    ) -> super::Result<Conversation> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, super::Error, _>(|conn| {
            let conversation = diesel::insert_into(conversations::table)
                .values(new)
                .returning(Conversation::as_returning())
                .get_result(conn)?;

            let new_members = members
                .iter()
                .map(|user_id| NewMember::new(conversation.id(), user_id))
                .collect::<Vec<_>>();

            diesel::insert_into(conversations_users::table)
                .values(&new_members)
                .execute(conn)?;

            Ok(conversation)
        })
    }

    fn delete_by_member(&self, id: &Id, user_id: &user::Id) -> super::Result<usize> {
        let mut conn = self.pool.get()?;

        let membership = conversations_users::table
            .filter(conversations_users::user_id.eq(user_id))
            .select(conversations_users::conversation_id);

        let count = diesel::delete(
            conversations::table
                .filter(conversations::id.eq(id))
                .filter(conversations::id.eq_any(membership)),
        )
        .execute(&mut conn)?;

        Ok(count)
    }
}
