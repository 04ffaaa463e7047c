// Product bundles ("combinations"): a discount granted when an order
// contains enough units matching every requirement of the bundle.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::rule::DiscountKind;
use crate::core::{AppError, Result};
use crate::modules::catalog::ItemScope;

/// What a bundle requirement counts. Exactly one target per requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleTarget {
    Item(i64),
    Group(i64),
    Line(i64),
}

impl BundleTarget {
    pub fn matches(&self, item: &ItemScope) -> bool {
        match self {
            BundleTarget::Item(item_id) => *item_id == item.item_id,
            BundleTarget::Group(group_id) => *group_id == item.group_id,
            BundleTarget::Line(line_id) => *line_id == item.line_id,
        }
    }

    /// (item_id, group_id, line_id) storage columns
    pub fn to_columns(self) -> (Option<i64>, Option<i64>, Option<i64>) {
        match self {
            BundleTarget::Item(id) => (Some(id), None, None),
            BundleTarget::Group(id) => (None, Some(id), None),
            BundleTarget::Line(id) => (None, None, Some(id)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleRequirement {
    pub target: BundleTarget,
    pub required_quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBundle {
    /// Assigned by storage; ignored on create
    #[serde(default)]
    pub id: i64,
    pub price_list_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Minimum trigger quantity configured on the bundle
    pub trigger_quantity: u32,
    pub discount_kind: DiscountKind,
    pub discount_value: Decimal,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Evaluated in storage order
    pub requirements: Vec<BundleRequirement>,
}

fn default_active() -> bool {
    true
}

impl ProductBundle {
    pub fn apply(&self, price: Decimal) -> Decimal {
        self.discount_kind.apply(price, self.discount_value)
    }
}

/// Raw `product_bundles` row
#[derive(Debug, FromRow)]
pub struct BundleRow {
    pub id: i64,
    pub price_list_id: i64,
    pub name: String,
    pub description: String,
    pub trigger_quantity: i32,
    pub discount_kind: String,
    pub discount_value: Decimal,
    pub active: bool,
}

/// Raw `bundle_requirements` row
#[derive(Debug, FromRow)]
pub struct BundleRequirementRow {
    pub id: i64,
    pub bundle_id: i64,
    pub item_id: Option<i64>,
    pub group_id: Option<i64>,
    pub line_id: Option<i64>,
    pub required_quantity: i32,
}

impl TryFrom<BundleRequirementRow> for BundleRequirement {
    type Error = AppError;

    fn try_from(row: BundleRequirementRow) -> Result<Self> {
        let target = match (row.item_id, row.group_id, row.line_id) {
            (Some(id), None, None) => BundleTarget::Item(id),
            (None, Some(id), None) => BundleTarget::Group(id),
            (None, None, Some(id)) => BundleTarget::Line(id),
            _ => {
                return Err(AppError::internal(format!(
                    "Bundle requirement {} must name exactly one item, group or line",
                    row.id
                )))
            }
        };
        let required_quantity = u32::try_from(row.required_quantity).map_err(|_| {
            AppError::internal(format!(
                "Bundle requirement {} has negative quantity",
                row.id
            ))
        })?;

        Ok(BundleRequirement {
            target,
            required_quantity,
        })
    }
}

impl BundleRow {
    pub fn into_bundle(self, requirements: Vec<BundleRequirement>) -> Result<ProductBundle> {
        let trigger_quantity = u32::try_from(self.trigger_quantity).map_err(|_| {
            AppError::internal(format!("Bundle {} has negative trigger quantity", self.id))
        })?;

        Ok(ProductBundle {
            id: self.id,
            price_list_id: self.price_list_id,
            name: self.name,
            description: self.description,
            trigger_quantity,
            discount_kind: self.discount_kind.parse().map_err(AppError::Internal)?,
            discount_value: self.discount_value,
            active: self.active,
            requirements,
        })
    }
}
