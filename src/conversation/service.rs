use std::collections::HashSet;

use async_trait::async_trait;
use log::{debug, info};

use crate::event::{self, Notification, Subject, service::fan_out};
use crate::{auth, user};

use super::model::{Conversation, ConversationDto, NewConversation};
use super::{Id, Repository};

#[async_trait]
pub trait ConversationService {
    /// Returns the first conversation already reaching either party, or
    /// creates a new two-member one.
    async fn create_direct(
        &self,
        auth_user: &auth::User,
        recipient: Option<&user::Id>,
    ) -> super::Result<ConversationDto>;

    async fn create_group(
        &self,
        auth_user: &auth::User,
        name: &str,
        members: &[user::Id],
    ) -> super::Result<ConversationDto>;

    async fn find_all(&self, auth_user: &auth::User) -> super::Result<Vec<ConversationDto>>;

    async fn find_one(&self, auth_user: &auth::User, id: &Id) -> super::Result<ConversationDto>;

    async fn delete(&self, auth_user: &auth::User, id: &Id) -> super::Result<usize>;
}

#[derive(Clone)]
pub struct ConversationServiceImpl {
    repo: Repository,
    user_service: user::Service,
    event_service: event::Service,
}

impl ConversationServiceImpl {
    pub fn new(
        repo: Repository,
        user_service: user::Service,
        event_service: event::Service,
    ) -> Self {
        Self {
            repo,
            user_service,
            event_service,
        }
    }
}

#[async_trait]
impl ConversationService for ConversationServiceImpl {
    async fn create_direct(
        &self,
        auth_user: &auth::User,
        recipient: Option<&user::Id>,
    ) -> super::Result<ConversationDto> {
        let recipient = recipient.ok_or(super::Error::MissingRecipient)?;
        if recipient == auth_user.id() {
            return Err(super::Error::SelfReference);
        }

        match self.user_service.find_by_id(recipient).await {
            Ok(_) => {}
            Err(user::Error::NotFound(id)) => return Err(super::Error::NonExistingUser(id)),
            Err(e) => return Err(e.into()),
        }

        // Not atomic with the insert below: concurrent requests may both miss
        // and create duplicates.
        let parties = [auth_user.id().clone(), recipient.clone()];
        if let Some(existing) = self.repo.find_first_by_any_member(&parties)? {
            debug!(
                "reusing conversation {} for {}",
                existing.id(),
                auth_user.id()
            );
            return self.project(existing);
        }

        let new = NewConversation::direct();
        let conversation = self.repo.create(&new, &parties)?;
        let dto = self.project(conversation)?;

        info!("created direct conversation {}", dto.id());
        self.notify(&dto, Notification::NewConversation(dto.clone()))
            .await;

        Ok(dto)
    }

    async fn create_group(
        &self,
        auth_user: &auth::User,
        name: &str,
        members: &[user::Id],
    ) -> super::Result<ConversationDto> {
        let mut seen = HashSet::new();
        let mut members = members
            .iter()
            .filter(|m| *m != auth_user.id() && seen.insert(*m))
            .cloned()
            .collect::<Vec<_>>();

        if members.len() < 2 {
            return Err(super::Error::NotEnoughMembers(members.len()));
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(super::Error::MissingName);
        }

        let existing = self.user_service.find_by_ids(&members).await?;
        if let Some(missing) = members
            .iter()
            .find(|m| !existing.iter().any(|u| u.id() == *m))
        {
            return Err(super::Error::NonExistingUser(missing.clone()));
        }

        members.push(auth_user.id().clone());

        let new = NewConversation::group(name);
        let conversation = self.repo.create(&new, &members)?;
        let dto = self.project(conversation)?;

        info!(
            "created group conversation {} with {} members",
            dto.id(),
            members.len()
        );
        self.notify(&dto, Notification::NewConversation(dto.clone()))
            .await;

        Ok(dto)
    }

    async fn find_all(&self, auth_user: &auth::User) -> super::Result<Vec<ConversationDto>> {
        self.repo
            .find_by_member(auth_user.id())?
            .into_iter()
            .map(|c| self.project(c))
            .collect()
    }

    async fn find_one(&self, auth_user: &auth::User, id: &Id) -> super::Result<ConversationDto> {
        let conversation = self.repo.find_by_id(id)?;
        let dto = self.project(conversation)?;

        if !dto.has_member(auth_user.id()) {
            return Err(super::Error::NotFound(id.clone()));
        }

        Ok(dto)
    }

    async fn delete(&self, auth_user: &auth::User, id: &Id) -> super::Result<usize> {
        let conversation = self.repo.find_by_id(id)?;
        // Members are gone once the row is, so they are read up front.
        let dto = self.project(conversation)?;

        let count = self.repo.delete_by_member(id, auth_user.id())?;
        if count == 0 {
            debug!("{} is not a member of {id}, nothing deleted", auth_user.id());
            return Ok(count);
        }

        info!("deleted conversation {id}");
        self.notify(&dto, Notification::RemovedConversation(dto.clone()))
            .await;

        Ok(count)
    }
}

impl ConversationServiceImpl {
    fn project(&self, conversation: Conversation) -> super::Result<ConversationDto> {
        let members = self.repo.find_members(conversation.id())?;
        Ok(ConversationDto::new(conversation, members))
    }

    async fn notify(&self, dto: &ConversationDto, noti: Notification) {
        let subjects = dto
            .users()
            .iter()
            .map(|u| Subject::User(u.email()))
            .collect::<Vec<_>>();

        fan_out(self.event_service.as_ref(), &subjects, &noti).await;
    }
}
