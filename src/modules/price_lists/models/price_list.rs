// A price list is a named, time-bounded table of base prices for one company,
// optionally narrowed to a branch and a sales channel. Rules and bundles hang
// off a list, so resolving the list fixes the whole pricing context.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// Open-ended windows are treated as lasting this many days when checking overlaps
const OPEN_ENDED_WINDOW_DAYS: u64 = 36_500;

/// Commercial flavour of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceListType {
    #[serde(rename = "GENERAL")]
    General,
    #[serde(rename = "MAYORISTA")]
    Wholesale,
    #[serde(rename = "MINORISTA")]
    Retail,
    #[serde(rename = "ESPECIAL")]
    Special,
}

impl std::fmt::Display for PriceListType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceListType::General => write!(f, "GENERAL"),
            PriceListType::Wholesale => write!(f, "MAYORISTA"),
            PriceListType::Retail => write!(f, "MINORISTA"),
            PriceListType::Special => write!(f, "ESPECIAL"),
        }
    }
}

impl std::str::FromStr for PriceListType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "GENERAL" => Ok(PriceListType::General),
            "MAYORISTA" => Ok(PriceListType::Wholesale),
            "MINORISTA" => Ok(PriceListType::Retail),
            "ESPECIAL" => Ok(PriceListType::Special),
            _ => Err(format!("Invalid price list type: {}", s)),
        }
    }
}

/// Sales channel a list or rule is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalesChannel {
    /// Physical store
    #[serde(rename = "TIENDA")]
    Store,
    #[serde(rename = "ONLINE")]
    Online,
    #[serde(rename = "DISTRIBUIDOR")]
    Distributor,
    #[serde(rename = "CORPORATIVO")]
    Corporate,
}

impl std::fmt::Display for SalesChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SalesChannel::Store => write!(f, "TIENDA"),
            SalesChannel::Online => write!(f, "ONLINE"),
            SalesChannel::Distributor => write!(f, "DISTRIBUIDOR"),
            SalesChannel::Corporate => write!(f, "CORPORATIVO"),
        }
    }
}

impl std::str::FromStr for SalesChannel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "TIENDA" => Ok(SalesChannel::Store),
            "ONLINE" => Ok(SalesChannel::Online),
            "DISTRIBUIDOR" => Ok(SalesChannel::Distributor),
            "CORPORATIVO" => Ok(SalesChannel::Corporate),
            _ => Err(format!("Invalid sales channel: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceList {
    pub id: i64,
    pub company_id: i64,
    pub branch_id: Option<i64>,
    pub name: String,
    pub list_type: PriceListType,
    pub channel: Option<SalesChannel>,
    pub start_date: NaiveDate,
    /// `None` means open-ended
    pub end_date: Option<NaiveDate>,
    pub active: bool,
}

impl PriceList {
    /// Whether the list is active and its window covers `date`
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.active
            && self.start_date <= date
            && self.end_date.map_or(true, |end| date <= end)
    }

    /// Inclusive window end used for overlap checks
    pub fn effective_end(&self) -> NaiveDate {
        effective_end(self.start_date, self.end_date)
    }

    /// Whether two validity windows share at least one day
    pub fn overlaps(&self, start_date: NaiveDate, end_date: Option<NaiveDate>) -> bool {
        self.start_date <= effective_end(start_date, end_date) && start_date <= self.effective_end()
    }
}

fn effective_end(start_date: NaiveDate, end_date: Option<NaiveDate>) -> NaiveDate {
    end_date.unwrap_or_else(|| {
        start_date
            .checked_add_days(Days::new(OPEN_ENDED_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX)
    })
}

/// Payload for creating a price list
#[derive(Debug, Clone, Deserialize)]
pub struct NewPriceList {
    pub company_id: i64,
    pub branch_id: Option<i64>,
    pub name: String,
    pub list_type: PriceListType,
    pub channel: Option<SalesChannel>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Raw `price_lists` row
#[derive(Debug, FromRow)]
pub struct PriceListRow {
    pub id: i64,
    pub company_id: i64,
    pub branch_id: Option<i64>,
    pub name: String,
    pub list_type: String,
    pub channel: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
}

impl TryFrom<PriceListRow> for PriceList {
    type Error = AppError;

    fn try_from(row: PriceListRow) -> Result<Self> {
        let list_type = row.list_type.parse().map_err(AppError::Internal)?;
        let channel = row
            .channel
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(AppError::Internal)?;

        Ok(PriceList {
            id: row.id,
            company_id: row.company_id,
            branch_id: row.branch_id,
            name: row.name,
            list_type,
            channel,
            start_date: row.start_date,
            end_date: row.end_date,
            active: row.active,
        })
    }
}
