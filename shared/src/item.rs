use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::de;
use crate::ValidationError;

/// Fields a create request must carry, in the order they are reported.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "gsm",
    "sale_bill_number",
    "size",
    "rate",
    "bf",
    "weight",
    "shade",
    "sold_to",
];

/// A persisted paper-roll transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i32,
    pub gsm: i32,
    pub sale_bill_number: String,
    pub size: String,
    pub rate: BigDecimal,
    pub bf: BigDecimal,
    pub weight: BigDecimal,
    pub shade: String,
    pub bought_from_mill: Option<String>,
    pub sold_to: String,
    pub purchase_bill_number: Option<String>,
    pub sale_bill_date: Option<NaiveDate>,
    pub purchase_bill_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// A candidate record as submitted by the entry form.
///
/// Every field is optional at this stage; [`ItemDraft::validate`] decides
/// whether the draft can become a [`NewItem`]. Server-owned keys such as
/// `id` and `created_at` are not part of the draft and are ignored if sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    #[serde(default, deserialize_with = "de::opt_i32")]
    pub gsm: Option<i32>,
    #[serde(default)]
    pub sale_bill_number: Option<String>,
    /// Older clients send `bill_number`; `sale_bill_number` wins when both are set.
    #[serde(default, rename = "bill_number", skip_serializing)]
    pub legacy_bill_number: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub rate: Option<BigDecimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub bf: Option<BigDecimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub weight: Option<BigDecimal>,
    #[serde(default)]
    pub shade: Option<String>,
    #[serde(default)]
    pub bought_from_mill: Option<String>,
    #[serde(default)]
    pub sold_to: Option<String>,
    #[serde(default)]
    pub purchase_bill_number: Option<String>,
    #[serde(default, deserialize_with = "de::opt_date")]
    pub sale_bill_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::opt_date")]
    pub purchase_bill_date: Option<NaiveDate>,
}

/// A validated record ready for insertion. Carries no `id` or `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub gsm: i32,
    pub sale_bill_number: String,
    pub size: String,
    pub rate: BigDecimal,
    pub bf: BigDecimal,
    pub weight: BigDecimal,
    pub shade: String,
    pub bought_from_mill: Option<String>,
    pub sold_to: String,
    pub purchase_bill_number: Option<String>,
    pub sale_bill_date: Option<NaiveDate>,
    pub purchase_bill_date: Option<NaiveDate>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ItemDraft {
    /// Checks the required fields and normalizes text.
    ///
    /// Strings are trimmed and blank ones count as absent. Zero is a valid
    /// `rate`, `bf` or `weight`; a zero `gsm` is treated as missing.
    pub fn validate(self) -> Result<NewItem, ValidationError> {
        let gsm = self.gsm.filter(|g| *g != 0);
        let sale_bill_number = clean(self.sale_bill_number).or_else(|| clean(self.legacy_bill_number));
        let size = clean(self.size);
        let shade = clean(self.shade);
        let sold_to = clean(self.sold_to);

        let present = [
            gsm.is_some(),
            sale_bill_number.is_some(),
            size.is_some(),
            self.rate.is_some(),
            self.bf.is_some(),
            self.weight.is_some(),
            shade.is_some(),
            sold_to.is_some(),
        ];
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| *name)
            .collect();

        match (gsm, sale_bill_number, size, self.rate, self.bf, self.weight, shade, sold_to) {
            (
                Some(gsm),
                Some(sale_bill_number),
                Some(size),
                Some(rate),
                Some(bf),
                Some(weight),
                Some(shade),
                Some(sold_to),
            ) => Ok(NewItem {
                gsm,
                sale_bill_number,
                size,
                rate,
                bf,
                weight,
                shade,
                bought_from_mill: clean(self.bought_from_mill),
                sold_to,
                purchase_bill_number: clean(self.purchase_bill_number),
                sale_bill_date: self.sale_bill_date,
                purchase_bill_date: self.purchase_bill_date,
            }),
            _ => Err(ValidationError::MissingFields(missing)),
        }
    }
}

/// Prefill: a draft carrying every client-editable field of an existing record.
impl From<&Item> for ItemDraft {
    fn from(item: &Item) -> Self {
        Self {
            gsm: Some(item.gsm),
            sale_bill_number: Some(item.sale_bill_number.clone()),
            legacy_bill_number: None,
            size: Some(item.size.clone()),
            rate: Some(item.rate.clone()),
            bf: Some(item.bf.clone()),
            weight: Some(item.weight.clone()),
            shade: Some(item.shade.clone()),
            bought_from_mill: item.bought_from_mill.clone(),
            sold_to: Some(item.sold_to.clone()),
            purchase_bill_number: item.purchase_bill_number.clone(),
            sale_bill_date: item.sale_bill_date,
            purchase_bill_date: item.purchase_bill_date,
        }
    }
}

/// Columns that feed autocomplete suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupField {
    Shade,
    BoughtFromMill,
    SoldTo,
}

impl LookupField {
    pub const ALL: [LookupField; 3] = [Self::Shade, Self::BoughtFromMill, Self::SoldTo];

    pub fn column(&self) -> &'static str {
        match self {
            Self::Shade => "shade",
            Self::BoughtFromMill => "bought_from_mill",
            Self::SoldTo => "sold_to",
        }
    }
}

impl FromStr for LookupField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shade" => Ok(Self::Shade),
            "boughtFromMill" | "bought_from_mill" => Ok(Self::BoughtFromMill),
            "soldTo" | "sold_to" => Ok(Self::SoldTo),
            _ => Err(ValidationError::InvalidField),
        }
    }
}

/// Notification that the item table changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemChange {
    Created { id: i32 },
    Deleted { id: i32 },
}

impl ItemChange {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Deleted { .. } => "deleted",
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Self::Created { id } | Self::Deleted { id } => *id,
        }
    }
}
