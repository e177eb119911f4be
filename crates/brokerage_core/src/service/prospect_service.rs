//! Renewal prospect use-case service.
//!
//! # Responsibility
//! - Seed, list, save and delete prospects in local storage.
//! - Filter prospect lists by free text and expiry window.
//!
//! # Invariants
//! - Stored records never carry commission fields; every read recomputes
//!   them through `ProspectWithCommissions`.
//! - New prospects are prepended; edits keep list position.

use super::record_matches;
use crate::context::AppContext;
use crate::model::generate_id;
use crate::model::prospect::{Prospect, ProspectWithCommissions};
use crate::repo::kv_repo::{KeyValueRepository, StorageError};
use crate::repo::local_store::LocalStore;
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ProspectServiceError {
    /// Edit targeted an id that is not stored.
    NotFound(String),
    AttachmentTooLarge { size: u64, limit: u64 },
    BlankClient,
    Storage(StorageError),
}

impl Display for ProspectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "prospect not found: {id}"),
            Self::AttachmentTooLarge { size, limit } => {
                write!(f, "attachment of {size} bytes exceeds the {limit} byte limit")
            }
            Self::BlankClient => write!(f, "prospect client must not be blank"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProspectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for ProspectServiceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

pub type ProspectResult<T> = Result<T, ProspectServiceError>;

/// Upcoming-expiry window used by the prospect list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpiryFilter {
    #[default]
    All,
    /// Policy ends between 1 and `n` days from today, inclusive.
    Days(u32),
}

impl ExpiryFilter {
    /// Parses the list's `todos`/`30d`/`60d`/`90d` selector values.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("todos") || value.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        value
            .strip_suffix('d')
            .and_then(|days| days.parse().ok())
            .map(Self::Days)
    }

    fn keeps(self, prospect: &Prospect, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Days(window) => prospect
                .days_until_expiry(today)
                .is_some_and(|days| days > 0 && days <= i64::from(window)),
        }
    }
}

pub struct ProspectService<'ctx, R: KeyValueRepository> {
    store: LocalStore<R>,
    ctx: &'ctx AppContext,
}

impl<'ctx, R: KeyValueRepository> ProspectService<'ctx, R> {
    pub fn new(repo: R, ctx: &'ctx AppContext) -> Self {
        Self {
            store: LocalStore::new(repo),
            ctx,
        }
    }

    fn key(&self) -> &str {
        &self.ctx.config().storage_keys.prospects
    }

    /// Returns stored prospects, writing the demo set first when the key
    /// has never been written.
    pub fn load_or_seed(&self) -> ProspectResult<Vec<ProspectWithCommissions>> {
        if !self.store.contains(self.key())? {
            let seeded = crate::seed::prospects();
            self.store.save(self.key(), &seeded)?;
            info!(
                "event=prospects_seed module=service status=ok count={}",
                seeded.len()
            );
            return Ok(seeded.into_iter().map(Into::into).collect());
        }
        self.list()
    }

    pub fn list(&self) -> ProspectResult<Vec<ProspectWithCommissions>> {
        Ok(self.records()?.into_iter().map(Into::into).collect())
    }

    pub fn get(&self, id: &str) -> ProspectResult<Option<ProspectWithCommissions>> {
        Ok(self
            .records()?
            .into_iter()
            .find(|prospect| prospect.id == id)
            .map(Into::into))
    }

    pub(crate) fn records(&self) -> ProspectResult<Vec<Prospect>> {
        Ok(self.store.load(self.key())?)
    }

    pub(crate) fn persist(&self, records: &[Prospect]) -> ProspectResult<()> {
        Ok(self.store.save(self.key(), records)?)
    }

    /// Creates (`is_new`) or replaces a prospect, as the form submit does.
    ///
    /// Numeric inputs are normalized and `lastModified` is stamped today.
    pub fn save_prospect(
        &self,
        mut prospect: Prospect,
        is_new: bool,
    ) -> ProspectResult<ProspectWithCommissions> {
        if prospect.client.trim().is_empty() {
            return Err(ProspectServiceError::BlankClient);
        }
        let limit = self.ctx.config().max_attachment_bytes;
        if let Some(attachment) = &prospect.attachment {
            if attachment.size > limit {
                warn!(
                    "event=prospect_save module=service status=error error_code=attachment_too_large size={}",
                    attachment.size
                );
                return Err(ProspectServiceError::AttachmentTooLarge {
                    size: attachment.size,
                    limit,
                });
            }
        }

        prospect.normalize_inputs();
        prospect.last_modified = Some(self.ctx.clock().today());

        let mut records = self.records()?;
        if is_new {
            prospect.id = generate_id("PROS");
            records.insert(0, prospect.clone());
        } else {
            let Some(slot) = records.iter_mut().find(|stored| stored.id == prospect.id) else {
                return Err(ProspectServiceError::NotFound(prospect.id));
            };
            *slot = prospect.clone();
        }
        self.persist(&records)?;

        info!(
            "event=prospect_save module=service status=ok prospect_id={} new={is_new}",
            prospect.id
        );
        Ok(prospect.into())
    }

    /// Removes a prospect; unknown ids leave storage untouched.
    pub fn delete_prospect(&self, id: &str) -> ProspectResult<Option<Prospect>> {
        let mut records = self.records()?;
        let Some(index) = records.iter().position(|prospect| prospect.id == id) else {
            return Ok(None);
        };
        let removed = records.remove(index);
        self.persist(&records)?;
        info!("event=prospect_delete module=service status=ok prospect_id={id}");
        Ok(Some(removed))
    }
}

/// Applies the list's search box and expiry selector.
///
/// The result is sorted by policy end ascending; records without an end date
/// sort last.
pub fn filter_prospects(
    prospects: &[ProspectWithCommissions],
    search: &str,
    expiry: ExpiryFilter,
    today: NaiveDate,
) -> Vec<ProspectWithCommissions> {
    let mut result: Vec<ProspectWithCommissions> = prospects
        .iter()
        .filter(|item| record_matches(*item, search))
        .filter(|item| expiry.keeps(&item.prospect, today))
        .cloned()
        .collect();
    result.sort_by_key(|item| {
        (
            item.prospect.policy_end.is_none(),
            item.prospect.policy_end,
        )
    });
    result
}

#[cfg(test)]
mod tests {
    use super::{filter_prospects, ExpiryFilter};
    use crate::model::prospect::ProspectWithCommissions;
    use chrono::NaiveDate;

    fn seeded() -> Vec<ProspectWithCommissions> {
        crate::seed::prospects().into_iter().map(Into::into).collect()
    }

    #[test]
    fn expiry_selector_values_parse() {
        assert_eq!(ExpiryFilter::parse("todos"), Some(ExpiryFilter::All));
        assert_eq!(ExpiryFilter::parse("30d"), Some(ExpiryFilter::Days(30)));
        assert_eq!(ExpiryFilter::parse("soon"), None);
    }

    #[test]
    fn expiry_window_excludes_today_and_past() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let ids: Vec<String> = filter_prospects(&seeded(), "", ExpiryFilter::Days(30), today)
            .into_iter()
            .map(|item| item.prospect.id)
            .collect();
        assert_eq!(ids, vec!["PROS001".to_string()]);
    }

    #[test]
    fn results_sort_by_policy_end_with_undated_last() {
        let mut prospects = seeded();
        prospects[1].prospect.policy_end = None;
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let ids: Vec<String> = filter_prospects(&prospects, "", ExpiryFilter::All, today)
            .into_iter()
            .map(|item| item.prospect.id)
            .collect();
        assert_eq!(ids, vec!["PROS003", "PROS001", "PROS002"]);
    }

    #[test]
    fn search_reaches_derived_commission_values() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let hits = filter_prospects(&seeded(), "350", ExpiryFilter::All, today);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].prospect.id, "PROS001");
    }
}
