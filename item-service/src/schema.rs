diesel::table! {
    items (id) {
        id -> Int4,
        gsm -> Int4,
        sale_bill_number -> Varchar,
        size -> Varchar,
        rate -> Numeric,
        bf -> Numeric,
        weight -> Numeric,
        shade -> Varchar,
        bought_from_mill -> Nullable<Varchar>,
        sold_to -> Varchar,
        purchase_bill_number -> Nullable<Varchar>,
        sale_bill_date -> Nullable<Date>,
        purchase_bill_date -> Nullable<Date>,
        created_at -> Timestamptz,
    }
}
