//! Record to model mappers

use super::entity::ListingRecord;
use crate::contract::{ListingSummary, SearchMode};

impl TryFrom<ListingRecord> for ListingSummary {
    type Error = anyhow::Error;

    fn try_from(record: ListingRecord) -> Result<Self, Self::Error> {
        let mode = SearchMode::parse(&record.mode)
            .ok_or_else(|| anyhow::anyhow!("listing {} has unknown mode '{}'", record.id, record.mode))?;

        Ok(Self {
            id: record.id,
            title: record.title,
            teaser: record.teaser,
            mode,
            category_code: record.category_code,
            subcategory_code: record.subcategory_code,
            location: record.location,
            asking_price: record.asking_price,
            revenue: record.revenue,
            ebitda: record.ebitda,
            mrr: record.mrr,
            churn_rate: record.churn_rate,
            verified: record.verified,
            created_at: record.created_at,
        })
    }
}
