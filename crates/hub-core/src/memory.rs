//! # In-Memory Store
//!
//! A complete `Store` kept in process memory, for local development
//! (`STORE_BACKEND=memory`) and tests. All collections sit behind one mutex,
//! so the uniqueness checks and their inserts happen as one step.

use crate::contest::{Contest, ContestEdit, ContestFilter, ContestStatus, StatusPatch};
use crate::error::{HubError, HubResult};
use crate::id::RecordId;
use crate::payment::{Payment, PaymentFilter};
use crate::store::{
    ContestStore, DeleteOutcome, InsertOutcome, PaymentStore, SubmissionStore, UpdateOutcome,
    UserStore,
};
use crate::submission::{Submission, SubmissionContentPatch, WinnerPatch};
use crate::user::{RolePatch, User};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    contests: Vec<Contest>,
    submissions: Vec<Submission>,
    payments: Vec<Payment>,
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> HubResult<MutexGuard<'_, Collections>> {
        self.inner
            .lock()
            .map_err(|_| HubError::Internal("memory store lock poisoned".to_string()))
    }
}

fn update_one<T>(
    records: &mut [T],
    matches: impl Fn(&T) -> bool,
    apply: impl FnOnce(&mut T) -> bool,
) -> UpdateOutcome {
    match records.iter_mut().find(|r| matches(&**r)) {
        Some(record) => {
            let modified = apply(record);
            UpdateOutcome::new(1, u64::from(modified))
        }
        None => UpdateOutcome::unmatched(),
    }
}

fn delete_one<T>(records: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> DeleteOutcome {
    match records.iter().position(matches) {
        Some(index) => {
            records.remove(index);
            DeleteOutcome::new(1)
        }
        None => DeleteOutcome::new(0),
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> HubResult<Vec<User>> {
        Ok(self.lock()?.users.clone())
    }

    async fn find_user_by_email(&self, email: &str) -> HubResult<Option<User>> {
        Ok(self.lock()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: User) -> HubResult<InsertOutcome> {
        let mut db = self.lock()?;
        if db.users.iter().any(|u| u.email == user.email) {
            return Err(HubError::Duplicate {
                collection: "users",
                key: user.email,
            });
        }
        let id = user.id;
        db.users.push(user);
        Ok(InsertOutcome::new(id))
    }

    async fn update_user_role(&self, id: RecordId, patch: RolePatch) -> HubResult<UpdateOutcome> {
        let mut db = self.lock()?;
        Ok(update_one(
            &mut db.users,
            |u| u.id == id,
            |u| {
                let changed = u.role != patch.role;
                u.role = patch.role.clone();
                changed
            },
        ))
    }
}

#[async_trait]
impl ContestStore for MemoryStore {
    async fn list_contests(&self, filter: &ContestFilter) -> HubResult<Vec<Contest>> {
        let db = self.lock()?;
        let mut contests: Vec<Contest> = db
            .contests
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        contests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(contests)
    }

    async fn popular_contests(
        &self,
        status: Option<ContestStatus>,
        limit: usize,
    ) -> HubResult<Vec<Contest>> {
        let db = self.lock()?;
        let mut contests: Vec<Contest> = db
            .contests
            .iter()
            .filter(|c| status.as_ref().map_or(true, |s| c.status == *s))
            .cloned()
            .collect();
        contests.sort_by(|a, b| b.participants_count.cmp(&a.participants_count));
        contests.truncate(limit);
        Ok(contests)
    }

    async fn find_contest(&self, id: RecordId) -> HubResult<Option<Contest>> {
        Ok(self.lock()?.contests.iter().find(|c| c.id == id).cloned())
    }

    async fn insert_contest(&self, contest: Contest) -> HubResult<InsertOutcome> {
        let id = contest.id;
        self.lock()?.contests.push(contest);
        Ok(InsertOutcome::new(id))
    }

    async fn edit_contest(&self, id: RecordId, edit: ContestEdit) -> HubResult<UpdateOutcome> {
        let mut db = self.lock()?;
        Ok(update_one(&mut db.contests, |c| c.id == id, |c| edit.apply(c)))
    }

    async fn update_contest_status(
        &self,
        id: RecordId,
        patch: StatusPatch,
    ) -> HubResult<UpdateOutcome> {
        let mut db = self.lock()?;
        Ok(update_one(
            &mut db.contests,
            |c| c.id == id,
            |c| {
                let changed = c.status != patch.status;
                c.status = patch.status.clone();
                changed
            },
        ))
    }

    async fn increment_participants(&self, id: RecordId) -> HubResult<UpdateOutcome> {
        let mut db = self.lock()?;
        Ok(update_one(
            &mut db.contests,
            |c| c.id == id,
            |c| {
                c.participants_count += 1;
                true
            },
        ))
    }

    async fn delete_contest(&self, id: RecordId) -> HubResult<DeleteOutcome> {
        let mut db = self.lock()?;
        Ok(delete_one(&mut db.contests, |c| c.id == id))
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn winning_submissions(&self, limit: usize) -> HubResult<Vec<Submission>> {
        let db = self.lock()?;
        let mut winners: Vec<Submission> =
            db.submissions.iter().filter(|s| s.is_winner).cloned().collect();
        winners.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        winners.truncate(limit);
        Ok(winners)
    }

    async fn submissions_for_contest(&self, contest_id: RecordId) -> HubResult<Vec<Submission>> {
        let db = self.lock()?;
        Ok(db
            .submissions
            .iter()
            .filter(|s| s.contest_id == contest_id)
            .cloned()
            .collect())
    }

    async fn submissions_for_participant(&self, email: &str) -> HubResult<Vec<Submission>> {
        let db = self.lock()?;
        Ok(db
            .submissions
            .iter()
            .filter(|s| s.participant_email == email)
            .cloned()
            .collect())
    }

    async fn insert_submission(&self, submission: Submission) -> HubResult<InsertOutcome> {
        let mut db = self.lock()?;
        let exists = db.submissions.iter().any(|s| {
            s.contest_id == submission.contest_id
                && s.participant_email == submission.participant_email
        });
        if exists {
            return Err(HubError::Duplicate {
                collection: "submissions",
                key: format!("{}/{}", submission.contest_id, submission.participant_email),
            });
        }
        let id = submission.id;
        db.submissions.push(submission);
        Ok(InsertOutcome::new(id))
    }

    async fn set_winner(&self, id: RecordId, patch: WinnerPatch) -> HubResult<UpdateOutcome> {
        let mut db = self.lock()?;
        Ok(update_one(
            &mut db.submissions,
            |s| s.id == id,
            |s| {
                let changed = s.is_winner != patch.is_winner;
                s.is_winner = patch.is_winner;
                changed
            },
        ))
    }

    async fn update_submission_content(
        &self,
        id: RecordId,
        patch: SubmissionContentPatch,
    ) -> HubResult<UpdateOutcome> {
        let mut db = self.lock()?;
        Ok(update_one(
            &mut db.submissions,
            |s| s.id == id,
            |s| {
                let changed = s.submission_data != patch.submission_data;
                s.submission_data = patch.submission_data;
                changed
            },
        ))
    }

    async fn delete_submission(&self, id: RecordId) -> HubResult<DeleteOutcome> {
        let mut db = self.lock()?;
        Ok(delete_one(&mut db.submissions, |s| s.id == id))
    }
}

#[async_trait]
impl PaymentStore for MemoryStore {
    async fn find_payment_by_transaction(
        &self,
        transaction_id: &str,
    ) -> HubResult<Option<Payment>> {
        let db = self.lock()?;
        Ok(db
            .payments
            .iter()
            .find(|p| p.transaction_id == transaction_id)
            .cloned())
    }

    async fn payments_for_customer(&self, email: &str) -> HubResult<Vec<Payment>> {
        let db = self.lock()?;
        let mut payments: Vec<Payment> = db
            .payments
            .iter()
            .filter(|p| p.customer_email == email)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
        Ok(payments)
    }

    async fn find_payment(&self, filter: &PaymentFilter) -> HubResult<Option<Payment>> {
        let db = self.lock()?;
        Ok(db.payments.iter().find(|p| filter.matches(p)).cloned())
    }

    async fn insert_payment(&self, payment: Payment) -> HubResult<InsertOutcome> {
        let mut db = self.lock()?;
        if db
            .payments
            .iter()
            .any(|p| p.transaction_id == payment.transaction_id)
        {
            return Err(HubError::Duplicate {
                collection: "payments",
                key: payment.transaction_id,
            });
        }
        let id = payment.id;
        db.payments.push(payment);
        Ok(InsertOutcome::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contest::NewContest;
    use crate::submission::NewSubmission;
    use crate::user::{NewUser, Role};
    use chrono::{Duration, Utc};

    fn contest_with(participants: i64, status: ContestStatus) -> Contest {
        let mut contest = NewContest {
            name: format!("contest-{participants}"),
            image: None,
            description: String::new(),
            price: 5.0,
            prize: 50.0,
            instruction: String::new(),
            contest_type: "Article Writing".into(),
            start_time: None,
            end_time: None,
            status: Some(status),
            creator_email: "c@x.com".into(),
        }
        .into_contest(Utc::now());
        contest.participants_count = participants;
        contest
    }

    fn submission(contest_id: RecordId, email: &str, minutes_ago: i64) -> Submission {
        NewSubmission {
            contest_id,
            participant_email: email.into(),
            participant_name: None,
            submission_data: "entry".into(),
        }
        .into_submission(Utc::now() - Duration::minutes(minutes_ago))
    }

    #[tokio::test]
    async fn test_duplicate_user_rejected() {
        let store = MemoryStore::new();
        let new_user = || NewUser {
            name: None,
            email: "a@x.com".into(),
            photo_url: None,
        };

        store.insert_user(new_user().into_user(Utc::now())).await.unwrap();
        let err = store
            .insert_user(new_user().into_user(Utc::now()))
            .await
            .unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_role_update() {
        let store = MemoryStore::new();
        let user = NewUser {
            name: None,
            email: "a@x.com".into(),
            photo_url: None,
        }
        .into_user(Utc::now());
        let id = user.id;
        store.insert_user(user).await.unwrap();

        let outcome = store
            .update_user_role(id, RolePatch { role: Role::Admin })
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::new(1, 1));

        let stored = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.role, Role::Admin);

        let missing = store
            .update_user_role(RecordId::new(), RolePatch { role: Role::Admin })
            .await
            .unwrap();
        assert_eq!(missing, UpdateOutcome::unmatched());
    }

    #[tokio::test]
    async fn test_popular_contests_sorted_and_capped() {
        let store = MemoryStore::new();
        for n in [3, 9, 1, 7, 5, 2, 8, 4] {
            store
                .insert_contest(contest_with(n, ContestStatus::Confirmed))
                .await
                .unwrap();
        }
        store
            .insert_contest(contest_with(100, ContestStatus::Pending))
            .await
            .unwrap();

        let popular = store
            .popular_contests(Some(ContestStatus::Confirmed), 6)
            .await
            .unwrap();
        let counts: Vec<i64> = popular.iter().map(|c| c.participants_count).collect();
        assert_eq!(counts, vec![9, 8, 7, 5, 4, 3]);

        let unfiltered = store.popular_contests(None, 6).await.unwrap();
        assert_eq!(unfiltered[0].participants_count, 100);
    }

    #[tokio::test]
    async fn test_duplicate_submission_rejected() {
        let store = MemoryStore::new();
        let contest = RecordId::new();

        store
            .insert_submission(submission(contest, "p@x.com", 0))
            .await
            .unwrap();
        let err = store
            .insert_submission(submission(contest, "p@x.com", 0))
            .await
            .unwrap_err();
        assert!(err.is_duplicate());

        // Same participant, different contest is fine
        store
            .insert_submission(submission(RecordId::new(), "p@x.com", 0))
            .await
            .unwrap();

        assert_eq!(store.submissions_for_contest(contest).await.unwrap().len(), 1);
        assert_eq!(
            store.submissions_for_participant("p@x.com").await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_winner_feed() {
        let store = MemoryStore::new();
        let contest = RecordId::new();
        let mut ids = Vec::new();
        for i in 0..8 {
            let s = submission(contest, &format!("p{i}@x.com"), i);
            ids.push(s.id);
            store.insert_submission(s).await.unwrap();
        }
        store
            .insert_submission(submission(contest, "loser@x.com", 100))
            .await
            .unwrap();
        for id in &ids {
            store
                .set_winner(*id, WinnerPatch { is_winner: true })
                .await
                .unwrap();
        }

        let winners = store.winning_submissions(6).await.unwrap();
        assert_eq!(winners.len(), 6);
        assert!(winners.iter().all(|s| s.is_winner));
        assert!(winners
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
        assert_eq!(winners[0].participant_email, "p0@x.com");
    }

    #[tokio::test]
    async fn test_duplicate_payment_rejected() {
        let store = MemoryStore::new();
        let payment = Payment {
            id: RecordId::new(),
            customer_email: "p@x.com".into(),
            contest_id: RecordId::new(),
            contest_name: "Logo Sprint".into(),
            amount: 10.0,
            currency: "usd".into(),
            transaction_id: "pi_1".into(),
            payment_status: "paid".into(),
            paid_at: Utc::now(),
        };

        store.insert_payment(payment.clone()).await.unwrap();
        let err = store
            .insert_payment(Payment {
                id: RecordId::new(),
                ..payment
            })
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(store.payments_for_customer("p@x.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_reports_count() {
        let store = MemoryStore::new();
        let contest = contest_with(0, ContestStatus::Pending);
        let id = contest.id;
        store.insert_contest(contest).await.unwrap();

        assert_eq!(store.delete_contest(id).await.unwrap().deleted_count, 1);
        assert_eq!(store.delete_contest(id).await.unwrap().deleted_count, 0);
        assert!(store.find_contest(id).await.unwrap().is_none());
    }
}
