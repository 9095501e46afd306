use diesel::{
    Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper,
};

use crate::conversation;
use crate::integration::db;
use crate::schema::{conversations, message_templates, messages, messages_seen, users};
use crate::template::{self, MessageTemplate};
use crate::user::model::User;

use super::Id;
use super::model::{Message, NewMessage, NewSeen};

pub trait MessageRepository {
    /// Stores the message in a single transaction: bumps the template usage,
    /// inserts the message, marks it seen by its sender and moves the
    /// conversation's last activity to the message timestamp.
    fn create(&self, new: &NewMessage<'_>) -> super::Result<(Message, Option<MessageTemplate>)>;

    /// Messages of a conversation with their senders, oldest first.
    fn find_by_conversation(
        &self,
        conversation_id: &conversation::Id,
    ) -> super::Result<Vec<(Message, User)>>;

    fn find_seen(&self, message_ids: &[Id]) -> super::Result<Vec<(Id, User)>>;

    fn find_templates(&self, ids: &[template::Id]) -> super::Result<Vec<MessageTemplate>>;
}

pub struct PgMessageRepository {
    pool: db::Pool,
}

impl PgMessageRepository {
    pub fn new(pool: db::Pool) -> Self {
        Self { pool }
    }
}

impl MessageRepository for PgMessageRepository {
    fn create(&self, new: &NewMessage<'_>) -> super::Result<(Message, Option<MessageTemplate>)> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, super::Error, _>(|conn| {
            let template = match new.template_id() {
                Some(template_id) => {
                    let template = diesel::update(message_templates::table.find(template_id))
                        .set(message_templates::usage_count.eq(message_templates::usage_count + 1))
                        .returning(MessageTemplate::as_returning())
                        .get_result(conn)
                        .optional()?
                        .ok_or_else(|| super::Error::TemplateNotFound(template_id.clone()))?;
                    Some(template)
                }
                None => None,
            };

            let message = diesel::insert_into(messages::table)
                .values(new)
                .returning(Message::as_returning())
                .get_result(conn)?;

            diesel::insert_into(messages_seen::table)
                .values(NewSeen::new(message.id(), message.sender_id()))
                .execute(conn)?;

            diesel::update(conversations::table.find(message.conversation_id()))
                .set(conversations::last_message_at.eq(message.created_at()))
                .execute(conn)?;

            Ok((message, template))
        })
    }

    fn find_by_conversation(
        &self,
        conversation_id: &conversation::Id,
    ) -> super::Result<Vec<(Message, User)>> {
        let mut conn = self.pool.get()?;

        let messages = messages::table
            .inner_join(users::table)
            .filter(messages::conversation_id.eq(conversation_id))
            .order(messages::created_at.asc())
            .select((Message::as_select(), User::as_select()))
            .load(&mut conn)?;

        Ok(messages)
    }

    fn find_seen(&self, message_ids: &[Id]) -> super::Result<Vec<(Id, User)>> {
        let mut conn = self.pool.get()?;

        let seen = messages_seen::table
            .inner_join(users::table)
            .filter(messages_seen::message_id.eq_any(message_ids))
            .select((messages_seen::message_id, User::as_select()))
            .load(&mut conn)?;

        Ok(seen)
    }

    fn find_templates(&self, ids: &[template::Id]) -> super::Result<Vec<MessageTemplate>> {
        let mut conn = self.pool.get()?;

        let templates = message_templates::table
            .filter(message_templates::id.eq_any(ids))
            .select(MessageTemplate::as_select())
            .load(&mut conn)?;

        Ok(templates)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::model::NewConversation;
    use crate::conversation::repository::{ConversationRepository, PgConversationRepository};
    use crate::integration::db::tests::TestContainer;
    use crate::message::model::Content;
    use crate::user;

    fn insert_user(pool: &db::Pool, email: &str) -> user::Id {
        let mut conn = pool.get().unwrap();
        diesel::insert_into(users::table)
            .values(users::email.eq(email))
            .returning(users::id)
            .get_result(&mut conn)
            .unwrap()
    }

    fn insert_template(pool: &db::Pool, creator: &user::Id) -> template::Id {
        let mut conn = pool.get().unwrap();
        diesel::insert_into(message_templates::table)
            .values((
                message_templates::creator_id.eq(creator),
                message_templates::name.eq("greeting"),
                message_templates::content.eq("Hello there"),
            ))
            .returning(message_templates::id)
            .get_result(&mut conn)
            .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn should_create_message_atomically() {
        let container = TestContainer::init().await;
        let conversations = PgConversationRepository::new(container.pool.clone());
        let repo = PgMessageRepository::new(container.pool.clone());
        let a = insert_user(&container.pool, "a@x.com");
        let b = insert_user(&container.pool, "b@x.com");
        let c = conversations
            .create(&NewConversation::direct(), &[a.clone(), b])
            .unwrap();
        let template_id = insert_template(&container.pool, &a);

        let content = Content::text("hello");
        let new = NewMessage::new(c.id(), &a, &content, Some(&template_id));
        let (message, template) = repo.create(&new).unwrap();

        assert_eq!(template.map(|t| t.usage_count()), Some(1));

        let updated = conversations.find_by_id(c.id()).unwrap();
        assert_eq!(updated.last_message_at(), message.created_at());

        let seen = repo.find_seen(&[message.id().clone()]).unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1.id(), &a);

        let listed = repo.find_by_conversation(c.id()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0.id(), message.id());
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn should_roll_back_on_unknown_template() {
        let container = TestContainer::init().await;
        let conversations = PgConversationRepository::new(container.pool.clone());
        let repo = PgMessageRepository::new(container.pool.clone());
        let a = insert_user(&container.pool, "a@x.com");
        let b = insert_user(&container.pool, "b@x.com");
        let c = conversations
            .create(&NewConversation::direct(), &[a.clone(), b])
            .unwrap();

        let content = Content::text("hello");
        let unknown = template::Id::random();
        let new = NewMessage::new(c.id(), &a, &content, Some(&unknown));

        assert!(matches!(
            repo.create(&new),
            Err(crate::message::Error::TemplateNotFound(_))
        ));
        assert!(repo.find_by_conversation(c.id()).unwrap().is_empty());
    }
}
