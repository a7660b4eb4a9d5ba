use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use gym_data::{
    Delete, EditTarget, Insert, Member, MemberDraft, MemberFilter, MemberId, MemberPayload, Query,
    Result, RosterError, Update,
};

use crate::{Credentials, Session, Snapshot};

/// Everything the roster needs from the member service
pub trait MemberService:
    Query<Member, Filter = MemberFilter>
    + Insert<MemberPayload>
    + Update<MemberPayload, Key = MemberId>
    + Delete<Member, Key = MemberId>
    + Send
    + Sync
{
}

impl<T> MemberService for T where
    T: Query<Member, Filter = MemberFilter>
        + Insert<MemberPayload>
        + Update<MemberPayload, Key = MemberId>
        + Delete<Member, Key = MemberId>
        + Send
        + Sync
{
}

/// Asks the operator before a member is deleted
pub trait Confirm {
    fn confirm(&self, member: &Member) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&Member) -> bool,
{
    fn confirm(&self, member: &Member) -> bool {
        self(member)
    }
}

/// The local view of the remote member collection.
///
/// Every change goes through the member service and becomes visible
/// with the following refresh; the snapshot itself is only ever
/// replaced, never edited.
pub struct Roster<DB> {
    db: DB,
    credentials: Credentials,
    session: RwLock<Session>,
    snapshot: RwLock<Arc<Snapshot>>,
    issued: AtomicU64,
    server_filter: RwLock<MemberFilter>,
    edit_target: Mutex<Option<EditTarget>>,
}

impl<DB> Roster<DB> {
    pub fn new(db: DB, credentials: Credentials) -> Self {
        Self {
            db,
            credentials,
            session: RwLock::new(Session::default()),
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
            issued: AtomicU64::new(0),
            server_filter: RwLock::new(MemberFilter::default()),
            edit_target: Mutex::new(None),
        }
    }

    /// Scope the refreshes by status from the start
    pub fn with_server_filter(mut self, filter: MemberFilter) -> Self {
        self.server_filter = RwLock::new(filter);
        self
    }

    pub fn connection(&self) -> &DB {
        &self.db
    }

    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    async fn ensure_authenticated(&self) -> Result<()> {
        self.session.read().await.ensure_authenticated()
    }

    /// The current snapshot
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().await.clone()
    }

    pub async fn server_filter(&self) -> MemberFilter {
        *self.server_filter.read().await
    }

    /// Take the next refresh sequence number
    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// End the session and forget all members
    pub async fn logout(&self) {
        let mut session = self.session.write().await;
        let sequence = self.issue();
        *session = Session::default();
        *self.snapshot.write().await = Arc::new(Snapshot::new(sequence, vec![]));
        *self.edit_target.lock().await = None;
        info!("logged out");
    }

    /// A copy of the open edit, if any
    pub async fn edit_target(&self) -> Option<EditTarget> {
        self.edit_target.lock().await.clone()
    }

    /// Open an edit of a member in the current snapshot.
    /// An edit already open is replaced.
    pub async fn begin_edit(&self, id: &MemberId) -> Result<MemberDraft> {
        self.ensure_authenticated().await?;
        let snapshot = self.snapshot().await;
        let member = snapshot
            .get(id)
            .ok_or_else(|| RosterError::NotFound(id.clone()))?;
        let draft = MemberDraft::from(member);
        *self.edit_target.lock().await = Some(EditTarget {
            id: id.clone(),
            draft: draft.clone(),
        });
        debug!(%id, "edit opened");
        Ok(draft)
    }

    /// Replace the draft of the open edit
    pub async fn revise_edit(&self, draft: MemberDraft) -> Result<()> {
        let mut target = self.edit_target.lock().await;
        match target.as_mut() {
            Some(target) => {
                target.draft = draft;
                Ok(())
            }
            None => Err(RosterError::Validation("no member is being edited".to_string())),
        }
    }

    pub async fn cancel_edit(&self) {
        if let Some(target) = self.edit_target.lock().await.take() {
            debug!(id = %target.id, "edit cancelled");
        }
    }

    /// Close the edit of `id`, if it is the one open
    async fn close_edit(&self, id: &MemberId) {
        let mut target = self.edit_target.lock().await;
        if target.as_ref().map(|t| &t.id) == Some(id) {
            *target = None;
        }
    }
}

impl<DB> Roster<DB>
where
    DB: Query<Member, Filter = MemberFilter> + Send + Sync,
{
    /// Check the credentials and, on success, load the roster
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let session = Session::login(&self.credentials, username, password).map_err(|err| {
            warn!(username, "login rejected");
            err
        })?;
        *self.session.write().await = session;
        info!(operator = username, "logged in");
        self.reload().await
    }

    /// Change the server side scope and reload
    pub async fn set_server_filter(&self, filter: MemberFilter) -> Result<()> {
        *self.server_filter.write().await = filter;
        self.reload().await
    }

    /// Refresh with the current server side scope
    pub async fn reload(&self) -> Result<()> {
        let filter = self.server_filter().await;
        self.refresh(filter).await
    }

    /// Fetch the full member collection and replace the snapshot.
    ///
    /// On failure the snapshot stays as it is. A result arriving after
    /// a newer refresh was started is dropped.
    pub async fn refresh(&self, filter: MemberFilter) -> Result<()> {
        // A logout can not slip in between the check and the sequence number
        let sequence = {
            let session = self.session.read().await;
            session.ensure_authenticated()?;
            self.issue()
        };
        debug!(sequence, status = ?filter.status, "refreshing roster");

        let members = match self.db.query(&filter).await {
            Ok(members) => members,
            Err(err) => {
                error!(sequence, error = %err, "failed to fetch members");
                return Err(err);
            }
        };

        let mut snapshot = self.snapshot.write().await;
        let latest = self.issued.load(Ordering::SeqCst);
        if sequence != latest {
            debug!(sequence, latest, "dropping result of superseded refresh");
            return Ok(());
        }
        *snapshot = Arc::new(Snapshot::new(sequence, members));
        info!(sequence, members = snapshot.len(), "roster refreshed");
        Ok(())
    }
}

impl<DB> Roster<DB>
where
    DB: MemberService,
{
    /// Submit a new member. The draft is cleared once the service
    /// accepted it and kept as entered otherwise.
    ///
    /// Once accepted, the member counts as created even if the
    /// following refresh fails.
    pub async fn create(&self, draft: &mut MemberDraft) -> Result<()> {
        self.ensure_authenticated().await?;
        let payload = draft.normalize().map_err(|err| {
            warn!(error = %err, "member not created");
            err
        })?;
        let name = payload.name.clone();
        if let Err(err) = self.db.insert(payload).await {
            error!(%name, error = %err, "failed to create member");
            return Err(err);
        }
        info!(%name, "member created");
        draft.clear();
        self.reload_after_change().await;
        Ok(())
    }

    /// Replace a member. The open edit of this member is closed once
    /// the service accepted it and stays open otherwise.
    pub async fn update(&self, id: &MemberId, draft: &MemberDraft) -> Result<()> {
        self.ensure_authenticated().await?;
        let payload = draft.normalize().map_err(|err| {
            warn!(%id, error = %err, "member not updated");
            err
        })?;
        if let Err(err) = self.db.update(id, payload).await {
            error!(%id, error = %err, "failed to update member");
            return Err(err);
        }
        info!(%id, "member updated");
        self.close_edit(id).await;
        self.reload_after_change().await;
        Ok(())
    }

    /// Submit the open edit
    pub async fn submit_edit(&self) -> Result<()> {
        self.ensure_authenticated().await?;
        let target = self
            .edit_target()
            .await
            .ok_or_else(|| RosterError::Validation("no member is being edited".to_string()))?;
        self.update(&target.id, &target.draft).await
    }

    /// Delete a member after the operator confirmed it.
    /// Nothing is sent if the operator declines.
    pub async fn remove<C>(&self, id: &MemberId, confirm: &C) -> Result<()>
    where
        C: Confirm + ?Sized,
    {
        self.ensure_authenticated().await?;
        let snapshot = self.snapshot().await;
        let member = snapshot
            .get(id)
            .ok_or_else(|| RosterError::NotFound(id.clone()))?;

        if !confirm.confirm(member) {
            info!(%id, "deletion cancelled");
            return Ok(());
        }
        if let Err(err) = self.db.delete(id).await {
            error!(%id, error = %err, "failed to delete member");
            return Err(err);
        }
        info!(%id, name = %member.name, "member deleted");
        self.close_edit(id).await;
        self.reload_after_change().await;
        Ok(())
    }

    /// Reload after the service accepted a change. A failure leaves
    /// the previous snapshot in place and is only logged.
    async fn reload_after_change(&self) {
        if let Err(err) = self.reload().await {
            warn!(error = %err, "change saved, roster not refreshed");
        }
    }
}
