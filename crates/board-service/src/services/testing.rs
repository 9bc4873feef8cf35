//! In-memory repositories and session store for service unit tests

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use board_cache::RefreshSession;
use board_common::auth::JwtService;
use board_core::entities::{
    AuthorSummary, Comment, CommentView, NewComment, NewUser, Reaction, ReactionTransition, User,
    UserUpdate,
};
use board_core::traits::{
    CommentListing, CommentQuery, CommentRepository, CommentSort, ParentFilter,
    ReactionRepository, RepoResult, ToggleOutcome, UserRepository,
};
use board_core::{CommentContent, DomainError, ReactionKind, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::session::SessionStore;

#[derive(Default)]
struct State {
    users: HashMap<Snowflake, (User, String)>,
    comments: BTreeMap<Snowflake, Comment>,
    reactions: HashMap<(Snowflake, Snowflake), Reaction>,
    sessions: HashMap<String, RefreshSession>,
}

impl State {
    fn view(&self, comment: &Comment) -> CommentView {
        let username = self
            .users
            .get(&comment.author_id)
            .map(|(u, _)| u.username.clone())
            .unwrap_or_default();
        let replies = self
            .comments
            .values()
            .filter(|c| c.parent_id == Some(comment.id))
            .count();
        CommentView {
            comment: comment.clone(),
            author: AuthorSummary {
                id: comment.author_id,
                username,
            },
            replies_count: replies as i64,
            user_reaction: None,
        }
    }
}

/// Every repository plus the session store over one shared map
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    pub fn reaction_count(&self, comment_id: Snowflake) -> usize {
        self.lock()
            .reactions
            .values()
            .filter(|r| r.comment_id == comment_id)
            .count()
    }

    /// A service context wired entirely to this store
    pub fn context(&self) -> ServiceContext {
        ServiceContext::builder()
            .user_repo(Arc::new(self.clone()))
            .comment_repo(Arc::new(self.clone()))
            .reaction_repo(Arc::new(self.clone()))
            .sessions(Arc::new(self.clone()))
            .jwt_service(Arc::new(JwtService::new(
                "unit-test-secret-with-enough-length",
                900,
                3600,
            )))
            .build()
            .unwrap()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.lock().users.get(&id).map(|(u, _)| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = User::normalize_email(email);
        Ok(self
            .lock()
            .users
            .values()
            .find(|(u, _)| u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let username = username.trim();
        Ok(self
            .lock()
            .users
            .values()
            .find(|(u, _)| u.username == username)
            .map(|(u, _)| u.clone()))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn create(&self, user: &NewUser) -> RepoResult<User> {
        let created = User::new(user.id, user.username.clone(), &user.email);
        let mut state = self.lock();
        if state.users.values().any(|(u, _)| u.email == created.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        if state.users.values().any(|(u, _)| u.username == created.username) {
            return Err(DomainError::UsernameAlreadyExists);
        }
        state
            .users
            .insert(user.id, (created.clone(), user.password_hash.clone()));
        Ok(created)
    }

    async fn update_profile(&self, id: Snowflake, update: &UserUpdate) -> RepoResult<User> {
        let mut state = self.lock();
        let (user, _) = state
            .users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        if let Some(username) = &update.username {
            user.username.clone_from(username);
        }
        if let Some(email) = &update.email {
            user.email = User::normalize_email(email);
        }
        Ok(user.clone())
    }

    async fn set_active(&self, id: Snowflake, active: bool) -> RepoResult<()> {
        let mut state = self.lock();
        let (user, _) = state
            .users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        user.is_active = active;
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.lock();
        if state.users.remove(&id).is_none() {
            return Err(DomainError::UserNotFound(id));
        }

        let withdrawn: Vec<Reaction> = state
            .reactions
            .values()
            .filter(|r| r.user_id == id)
            .cloned()
            .collect();
        for reaction in withdrawn {
            state.reactions.remove(&(reaction.user_id, reaction.comment_id));
            if let Some(comment) = state.comments.get_mut(&reaction.comment_id) {
                comment.apply_delta(ReactionTransition::Remove(reaction.kind).deltas());
            }
        }

        let owned: Vec<Snowflake> = state
            .comments
            .values()
            .filter(|c| c.author_id == id)
            .map(|c| c.id)
            .collect();
        state.comments.retain(|_, c| {
            !owned.contains(&c.id) && !c.parent_id.is_some_and(|p| owned.contains(&p))
        });
        let remaining: Vec<Snowflake> = state.comments.keys().copied().collect();
        state
            .reactions
            .retain(|(_, comment_id), _| remaining.contains(comment_id));
        Ok(())
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self.lock().users.get(&id).map(|(_, h)| h.clone()))
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        Ok(self.lock().comments.get(&id).cloned())
    }

    async fn find_view(&self, id: Snowflake) -> RepoResult<Option<CommentView>> {
        let state = self.lock();
        Ok(state.comments.get(&id).map(|c| state.view(c)))
    }

    async fn list(&self, query: &CommentQuery) -> RepoResult<CommentListing> {
        let state = self.lock();
        let mut matching: Vec<&Comment> = state
            .comments
            .values()
            .filter(|c| match query.parent {
                ParentFilter::Any => true,
                ParentFilter::TopLevel => c.parent_id.is_none(),
                ParentFilter::RepliesTo(parent) => c.parent_id == Some(parent),
            })
            .collect();

        let newest = |a: &Comment, b: &Comment| {
            b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
        };
        matching.sort_by(|a, b| match query.sort {
            CommentSort::Newest => newest(a, b),
            CommentSort::Oldest => a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
            CommentSort::MostLiked => b.likes_count.cmp(&a.likes_count).then(newest(a, b)),
            CommentSort::MostDisliked => {
                b.dislikes_count.cmp(&a.dislikes_count).then(newest(a, b))
            }
        });

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .map(|c| state.view(c))
            .collect();
        Ok(CommentListing { items, total })
    }

    async fn create(&self, comment: &NewComment) -> RepoResult<Comment> {
        let mut state = self.lock();
        if !state.users.contains_key(&comment.author_id) {
            return Err(DomainError::UserNotFound(comment.author_id));
        }
        if let Some(parent) = comment.parent_id {
            if !state.comments.contains_key(&parent) {
                return Err(DomainError::ParentCommentNotFound(parent));
            }
        }
        let created = Comment::new(comment.clone());
        state.comments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_content(
        &self,
        id: Snowflake,
        content: &CommentContent,
    ) -> RepoResult<Comment> {
        let mut state = self.lock();
        let comment = state
            .comments
            .get_mut(&id)
            .ok_or(DomainError::CommentNotFound(id))?;
        comment.edit(content.clone());
        Ok(comment.clone())
    }

    async fn delete_cascade(&self, id: Snowflake) -> RepoResult<u64> {
        let mut state = self.lock();
        if !state.comments.contains_key(&id) {
            return Err(DomainError::CommentNotFound(id));
        }
        let before = state.comments.len();
        state
            .comments
            .retain(|_, c| c.id != id && c.parent_id != Some(id));
        let removed = (before - state.comments.len()) as u64;
        let remaining: Vec<Snowflake> = state.comments.keys().copied().collect();
        state
            .reactions
            .retain(|(_, comment_id), _| remaining.contains(comment_id));
        Ok(removed)
    }
}

#[async_trait]
impl ReactionRepository for MemoryStore {
    async fn find(
        &self,
        user_id: Snowflake,
        comment_id: Snowflake,
    ) -> RepoResult<Option<Reaction>> {
        Ok(self.lock().reactions.get(&(user_id, comment_id)).cloned())
    }

    async fn find_kinds_for_comments(
        &self,
        user_id: Snowflake,
        comment_ids: &[Snowflake],
    ) -> RepoResult<HashMap<Snowflake, ReactionKind>> {
        let state = self.lock();
        Ok(comment_ids
            .iter()
            .filter_map(|id| state.reactions.get(&(user_id, *id)).map(|r| (*id, r.kind)))
            .collect())
    }

    async fn toggle(
        &self,
        new_id: Snowflake,
        user_id: Snowflake,
        comment_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<ToggleOutcome> {
        let mut state = self.lock();
        if !state.comments.contains_key(&comment_id) {
            return Err(DomainError::CommentNotFound(comment_id));
        }

        let key = (user_id, comment_id);
        let current = state.reactions.get(&key).map(|r| r.kind);
        let transition = ReactionTransition::decide(current, kind);
        match transition.resulting_kind() {
            Some(resulting) => {
                state
                    .reactions
                    .entry(key)
                    .and_modify(|r| r.kind = resulting)
                    .or_insert_with(|| Reaction::new(new_id, user_id, comment_id, resulting));
            }
            None => {
                state.reactions.remove(&key);
            }
        }

        let comment = state
            .comments
            .get_mut(&comment_id)
            .ok_or(DomainError::CommentNotFound(comment_id))?;
        comment.apply_delta(transition.deltas());
        Ok(ToggleOutcome {
            transition,
            comment: comment.clone(),
        })
    }

    async fn count_by_kind(&self, comment_id: Snowflake) -> RepoResult<(i64, i64)> {
        let state = self.lock();
        let (likes, dislikes) = state
            .reactions
            .values()
            .filter(|r| r.comment_id == comment_id)
            .fold((0, 0), |(l, d), r| match r.kind {
                ReactionKind::Like => (l + 1, d),
                ReactionKind::Dislike => (l, d + 1),
            });
        Ok((likes, dislikes))
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn store(&self, session: &RefreshSession) -> ServiceResult<()> {
        self.lock()
            .sessions
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn consume(&self, session_id: &str) -> ServiceResult<Option<RefreshSession>> {
        Ok(self.lock().sessions.remove(session_id))
    }

    async fn revoke(&self, session_id: &str) -> ServiceResult<bool> {
        Ok(self.lock().sessions.remove(session_id).is_some())
    }

    async fn revoke_all_for_user(&self, user_id: Snowflake) -> ServiceResult<usize> {
        let mut state = self.lock();
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.user_id != user_id);
        Ok(before - state.sessions.len())
    }
}
