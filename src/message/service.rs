use std::collections::HashMap;

use async_trait::async_trait;
use log::info;

use crate::auth;
use crate::conversation::{self, model::ConversationDto};
use crate::event::{self, ConversationUpdate, Notification, Subject, service::fan_out};
use crate::template::{self, TemplateDto};
use crate::user::{self, model::UserDto};

use super::model::{Content, MessageDto, NewMessage};
use super::{Id, Repository};

#[async_trait]
pub trait MessageService {
    /// Persists a message from the caller and relays it to everyone in the
    /// conversation. Relay failures never fail the call.
    async fn create(
        &self,
        auth_user: &auth::User,
        conversation_id: &conversation::Id,
        content: Content,
        template_id: Option<&template::Id>,
    ) -> super::Result<MessageDto>;

    async fn find_by_conversation(
        &self,
        auth_user: &auth::User,
        conversation_id: &conversation::Id,
    ) -> super::Result<Vec<MessageDto>>;
}

#[derive(Clone)]
pub struct MessageServiceImpl {
    repo: Repository,
    conversation_service: conversation::Service,
    event_service: event::Service,
}

impl MessageServiceImpl {
    pub fn new(
        repo: Repository,
        conversation_service: conversation::Service,
        event_service: event::Service,
    ) -> Self {
        Self {
            repo,
            conversation_service,
            event_service,
        }
    }
}

#[async_trait]
impl MessageService for MessageServiceImpl {
    async fn create(
        &self,
        auth_user: &auth::User,
        conversation_id: &conversation::Id,
        content: Content,
        template_id: Option<&template::Id>,
    ) -> super::Result<MessageDto> {
        let conversation = self
            .conversation_service
            .find_one(auth_user, conversation_id)
            .await?;

        if content.is_empty() {
            return Err(super::Error::EmptyContent);
        }

        let new = NewMessage::new(conversation_id, auth_user.id(), &content, template_id);
        let (message, template) = self.repo.create(&new)?;

        let sender = member(&conversation, message.sender_id())?;
        let msg = MessageDto::new(
            message,
            sender.clone(),
            vec![sender],
            template.map(TemplateDto::from),
        );

        info!("{} posted {} to {conversation_id}", auth_user.id(), msg.id());
        self.relay(&conversation, &msg).await;

        Ok(msg)
    }

    async fn find_by_conversation(
        &self,
        auth_user: &auth::User,
        conversation_id: &conversation::Id,
    ) -> super::Result<Vec<MessageDto>> {
        self.conversation_service
            .find_one(auth_user, conversation_id)
            .await?;

        let rows = self.repo.find_by_conversation(conversation_id)?;

        let ids = rows.iter().map(|(m, _)| m.id().clone()).collect::<Vec<_>>();
        let mut seen: HashMap<Id, Vec<UserDto>> = HashMap::new();
        for (message_id, user) in self.repo.find_seen(&ids)? {
            seen.entry(message_id).or_default().push(user.into());
        }

        let template_ids = rows
            .iter()
            .filter_map(|(m, _)| m.template_id().cloned())
            .collect::<Vec<_>>();
        let templates = self
            .repo
            .find_templates(&template_ids)?
            .into_iter()
            .map(|t| (t.id().clone(), TemplateDto::from(t)))
            .collect::<HashMap<_, _>>();

        let messages = rows
            .into_iter()
            .map(|(m, sender)| {
                let seen = seen.remove(m.id()).unwrap_or_default();
                let template = m.template_id().and_then(|id| templates.get(id).cloned());
                MessageDto::new(m, sender.into(), seen, template)
            })
            .collect();

        Ok(messages)
    }
}

impl MessageServiceImpl {
    /// Personal channels learn about the new activity first, then the
    /// conversation channel receives the message itself.
    async fn relay(&self, conversation: &ConversationDto, msg: &MessageDto) {
        let subjects = conversation
            .users()
            .iter()
            .map(|u| Subject::User(u.email()))
            .collect::<Vec<_>>();
        let update = Notification::ConversationUpdate(ConversationUpdate {
            id: conversation.id().clone(),
            messages: vec![msg.clone()],
        });
        fan_out(self.event_service.as_ref(), &subjects, &update).await;

        fan_out(
            self.event_service.as_ref(),
            &[Subject::Conversation(conversation.id())],
            &Notification::NewMessage(msg.clone()),
        )
        .await;
    }
}

fn member(conversation: &ConversationDto, id: &user::Id) -> super::Result<UserDto> {
    conversation
        .users()
        .iter()
        .find(|u| u.id() == id)
        .cloned()
        .ok_or_else(|| conversation::Error::NotFound(conversation.id().clone()).into())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::conversation::model::Conversation;
    use crate::conversation::repository::fake::InMemoryConversationRepository;
    use crate::conversation::service::ConversationServiceImpl;
    use crate::event::service::fake::RecordingEventService;
    use crate::message::repository::fake::InMemoryMessageRepository;
    use crate::template::MessageTemplate;
    use crate::user::model::User;
    use crate::user::repository::fake::InMemoryUserRepository;
    use crate::user::service::UserServiceImpl;

    struct Fixture {
        a: User,
        b: User,
        outsider: User,
        c1: Conversation,
        repo: Arc<InMemoryMessageRepository>,
        events: Arc<RecordingEventService>,
        service: MessageServiceImpl,
    }

    fn fixture_with(
        events: RecordingEventService,
        configure: impl FnOnce(InMemoryMessageRepository, &User) -> InMemoryMessageRepository,
    ) -> Fixture {
        let a = User::new(user::Id::random(), "a@x.com", Some("A"));
        let b = User::new(user::Id::random(), "b@x.com", Some("B"));
        let outsider = User::new(user::Id::random(), "o@x.com", None);
        let users = vec![a.clone(), b.clone(), outsider.clone()];

        let c1 = Conversation::new(conversation::Id::random(), None, false);
        let conversations = Arc::new(
            InMemoryConversationRepository::new(users.clone())
                .with_conversation(c1.clone(), &[a.id(), b.id()]),
        );

        let events = Arc::new(events);
        let user_service = Arc::new(UserServiceImpl::new(Arc::new(
            InMemoryUserRepository::new(users.clone()),
        )));
        let conversation_service = Arc::new(ConversationServiceImpl::new(
            conversations,
            user_service,
            events.clone(),
        ));

        let repo = Arc::new(configure(InMemoryMessageRepository::new(users), &a));
        let service = MessageServiceImpl::new(repo.clone(), conversation_service, events.clone());

        Fixture {
            a,
            b,
            outsider,
            c1,
            repo,
            events,
            service,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(RecordingEventService::default(), |repo, _| repo)
    }

    #[tokio::test]
    async fn should_store_and_relay_text_message() {
        let f = fixture();

        let msg = f
            .service
            .create(
                &auth::User::from(f.a.clone()),
                f.c1.id(),
                Content::text("hello"),
                None,
            )
            .await
            .unwrap();

        let stored = f.repo.messages();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id(), msg.id());
        assert_eq!(stored[0].sender_id(), f.a.id());
        assert_eq!(f.repo.seen(), vec![(msg.id().clone(), f.a.id().clone())]);
        assert_eq!(
            f.repo.last_activity(f.c1.id()).as_ref(),
            Some(stored[0].created_at())
        );

        assert_eq!(msg.body(), Some("hello"));
        assert_eq!(msg.sender().id(), f.a.id());
        let seen = msg.seen().iter().map(|u| u.id()).collect::<Vec<_>>();
        assert_eq!(seen, vec![f.a.id()]);

        let published = f.events.published();
        assert_eq!(published.len(), 3);

        let new_messages = published
            .iter()
            .filter(|(_, n)| n.name() == "messages:new")
            .collect::<Vec<_>>();
        assert_eq!(new_messages.len(), 1);
        assert_eq!(new_messages[0].0, format!("conversation.{}", f.c1.id()));
        assert_eq!(new_messages[0].1, Notification::NewMessage(msg.clone()));

        let expected_update = Notification::ConversationUpdate(ConversationUpdate {
            id: f.c1.id().clone(),
            messages: vec![msg.clone()],
        });
        let mut updated = published
            .iter()
            .filter(|(_, n)| *n == expected_update)
            .map(|(s, _)| s.as_str())
            .collect::<Vec<_>>();
        updated.sort();
        assert_eq!(updated, vec!["user.a@x.com", "user.b@x.com"]);
    }

    #[tokio::test]
    async fn should_reject_non_member_without_writes() {
        let f = fixture();

        let res = f
            .service
            .create(
                &auth::User::from(f.outsider.clone()),
                f.c1.id(),
                Content::text("hello"),
                None,
            )
            .await;

        assert!(matches!(
            res,
            Err(super::super::Error::_Conversation(conversation::Error::NotFound(_)))
        ));
        assert!(f.repo.messages().is_empty());
        assert!(f.events.published().is_empty());
    }

    #[tokio::test]
    async fn should_reject_empty_content_without_writes() {
        let f = fixture();

        let res = f
            .service
            .create(
                &auth::User::from(f.a.clone()),
                f.c1.id(),
                Content::new(Some("   ".into()), None, Some(String::new())),
                None,
            )
            .await;

        assert!(matches!(res, Err(super::super::Error::EmptyContent)));
        assert!(f.repo.messages().is_empty());
        assert!(f.events.published().is_empty());
    }

    #[tokio::test]
    async fn should_count_template_usage() {
        let template_id = template::Id::random();
        let f = fixture_with(RecordingEventService::default(), |repo, creator| {
            repo.with_template(MessageTemplate::new(
                template_id.clone(),
                creator.id().clone(),
                "greeting",
                "Hello there",
            ))
        });

        let msg = f
            .service
            .create(
                &auth::User::from(f.b.clone()),
                f.c1.id(),
                Content::text("Hello there"),
                Some(&template_id),
            )
            .await
            .unwrap();

        assert_eq!(f.repo.template(&template_id).map(|t| t.usage_count()), Some(1));
        assert!(msg.message_template().is_some());
        assert_eq!(f.repo.messages()[0].template_id(), Some(&template_id));
    }

    #[tokio::test]
    async fn should_reject_unknown_template_without_relay() {
        let f = fixture();
        let unknown = template::Id::random();

        let res = f
            .service
            .create(
                &auth::User::from(f.a.clone()),
                f.c1.id(),
                Content::text("hello"),
                Some(&unknown),
            )
            .await;

        assert!(matches!(res, Err(super::super::Error::TemplateNotFound(id)) if id == unknown));
        assert!(f.repo.messages().is_empty());
        assert!(f.events.published().is_empty());
    }

    #[tokio::test]
    async fn should_return_message_when_some_recipients_fail() {
        let f = fixture_with(
            RecordingEventService::failing_for(&["user.a@x.com"]),
            |repo, _| repo,
        );

        let msg = f
            .service
            .create(
                &auth::User::from(f.a.clone()),
                f.c1.id(),
                Content::text("hello"),
                None,
            )
            .await
            .unwrap();

        assert_eq!(f.repo.messages().len(), 1);

        let mut subjects = f.events.subjects();
        subjects.sort();
        assert_eq!(
            subjects,
            vec![format!("conversation.{}", f.c1.id()), "user.b@x.com".to_string()]
        );
        assert_eq!(msg.body(), Some("hello"));
    }

    #[tokio::test]
    async fn should_list_messages_with_viewers() {
        let f = fixture();
        let a = auth::User::from(f.a.clone());
        let b = auth::User::from(f.b.clone());

        let first = f
            .service
            .create(&a, f.c1.id(), Content::text("hello"), None)
            .await
            .unwrap();
        let second = f
            .service
            .create(&b, f.c1.id(), Content::text("hi"), None)
            .await
            .unwrap();

        let messages = f.service.find_by_conversation(&a, f.c1.id()).await.unwrap();

        assert_eq!(messages, vec![first, second]);

        let foreign = f
            .service
            .find_by_conversation(&auth::User::from(f.outsider.clone()), f.c1.id())
            .await;
        assert!(foreign.is_err());
    }
}
