use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use shared::{Item, NewItem};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemRow {
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

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::items)]
pub struct NewItemRow {
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

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            gsm: row.gsm,
            sale_bill_number: row.sale_bill_number,
            size: row.size,
            rate: row.rate,
            bf: row.bf,
            weight: row.weight,
            shade: row.shade,
            bought_from_mill: row.bought_from_mill,
            sold_to: row.sold_to,
            purchase_bill_number: row.purchase_bill_number,
            sale_bill_date: row.sale_bill_date,
            purchase_bill_date: row.purchase_bill_date,
            created_at: row.created_at,
        }
    }
}

impl From<NewItem> for NewItemRow {
    fn from(item: NewItem) -> Self {
        Self {
            gsm: item.gsm,
            sale_bill_number: item.sale_bill_number,
            size: item.size,
            rate: item.rate,
            bf: item.bf,
            weight: item.weight,
            shade: item.shade,
            bought_from_mill: item.bought_from_mill,
            sold_to: item.sold_to,
            purchase_bill_number: item.purchase_bill_number,
            sale_bill_date: item.sale_bill_date,
            purchase_bill_date: item.purchase_bill_date,
        }
    }
}
