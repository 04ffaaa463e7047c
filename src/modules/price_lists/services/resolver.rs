use std::sync::Arc;

use chrono::NaiveDate;

use crate::core::{AppError, BusinessClock, Result};
use crate::modules::price_lists::models::{PriceList, SalesChannel};
use crate::modules::price_lists::repositories::PriceListRepository;

/// Scope a caller wants a price list for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceListQuery {
    pub company_id: i64,
    pub branch_id: Option<i64>,
    pub channel: Option<SalesChannel>,
    /// Defaults to the business clock's today
    pub as_of: Option<NaiveDate>,
}

/// Pick the list in force on `as_of` among `candidates`.
///
/// A branch or channel filter only applies when the query names one, and it
/// is an exact match: a branch query never falls back to company-wide lists.
/// Overlapping matches resolve to the latest start date, then the highest id.
pub fn select_current<'a>(
    candidates: &'a [PriceList],
    query: &PriceListQuery,
    as_of: NaiveDate,
) -> Option<&'a PriceList> {
    candidates
        .iter()
        .filter(|list| list.company_id == query.company_id)
        .filter(|list| list.is_valid_on(as_of))
        .filter(|list| query.branch_id.map_or(true, |branch| list.branch_id == Some(branch)))
        .filter(|list| query.channel.map_or(true, |channel| list.channel == Some(channel)))
        .max_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.id.cmp(&b.id))
        })
}

/// Finds the single price list in force for a company scope
pub struct PriceListResolver {
    repo: Arc<dyn PriceListRepository>,
    clock: BusinessClock,
}

impl PriceListResolver {
    pub fn new(repo: Arc<dyn PriceListRepository>, clock: BusinessClock) -> Self {
        Self { repo, clock }
    }

    pub async fn resolve(&self, query: &PriceListQuery) -> Result<PriceList> {
        let as_of = query.as_of.unwrap_or_else(|| self.clock.today());
        let candidates = self.repo.find_active_for_company(query.company_id).await?;

        let list = select_current(&candidates, query, as_of).cloned().ok_or_else(|| {
            AppError::not_found(format!(
                "No valid price list for company {} on {}",
                query.company_id, as_of
            ))
        })?;

        tracing::debug!(
            price_list_id = list.id,
            price_list = %list.name,
            company_id = query.company_id,
            as_of = %as_of,
            "Price list resolved"
        );

        Ok(list)
    }
}
