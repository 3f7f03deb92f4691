use tabled::{settings::Style, Table, Tabled};
use crate::slip::Slip;

#[derive(Tabled)]
struct SlipRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Discount")]
    discount: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
}

impl From<&Slip> for SlipRow {
    fn from(slip: &Slip) -> Self {
        let [name, phone, address, price, discount, total, timestamp] = slip.fields();
        Self { name, phone, address, price, discount, total, timestamp }
    }
}

/// Render slips as a rounded table with a header row
pub fn slip_table(slips: &[Slip]) -> String {
    let rows: Vec<SlipRow> = slips.iter().map(SlipRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}
