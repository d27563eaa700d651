use super::ui;
use crate::core::{ExchangeDetails, RateRecord};
use crate::gateway::RateGateway;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::{Cell, CellAlignment};
use rust_decimal::Decimal;

/// Prints every candidate rate for `currency` in the window ending at `date`.
pub async fn run_rates(gateway: &RateGateway, currency: &str, date: NaiveDate) -> Result<()> {
    let pb = ui::new_spinner("Looking up exchange rates...");
    let records = gateway.lookup(currency, date).await;
    pb.finish_and_clear();
    let mut records = records?;

    if records.is_empty() {
        println!("No exchange rates found for {currency} on or before {date}.");
        return Ok(());
    }

    records.sort_by(|a, b| b.record_date.cmp(&a.record_date));
    println!(
        "\nRates for {}",
        ui::style_text(&records[0].country_currency_description, ui::StyleType::Title)
    );
    println!("{}", rates_table(&records));
    Ok(())
}

pub(crate) fn rates_table(records: &[RateRecord]) -> comfy_table::Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Country"),
        ui::header_cell("Currency"),
        ui::header_cell("Record Date"),
        ui::header_cell("Rate"),
    ]);
    for record in records {
        table.add_row(vec![
            Cell::new(&record.originating_country),
            Cell::new(&record.currency_label),
            ui::format_optional_cell(record.record_date, |d| d.to_string()),
            Cell::new(record.exchange_rate.to_string()).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Converts `amount` USD at the rate in effect on `date`.
pub async fn run_convert(
    gateway: &RateGateway,
    amount: Decimal,
    currency: &str,
    date: NaiveDate,
) -> Result<()> {
    let pb = ui::new_spinner("Looking up exchange rates...");
    let details = gateway.quote(amount, currency, date).await;
    pb.finish_and_clear();
    let details = details?;

    println!("{}", details_table(amount, date, &details));
    println!(
        "{} {}",
        ui::style_text("Converted amount:", ui::StyleType::TotalLabel),
        ui::style_text(
            &format!("{} {}", details.converted_amount, details.currency_label),
            ui::StyleType::TotalValue
        )
    );
    Ok(())
}

pub(crate) fn details_table(
    amount: Decimal,
    date: NaiveDate,
    details: &ExchangeDetails,
) -> comfy_table::Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Field"), ui::header_cell("Value")]);
    table.add_row(vec![Cell::new("Purchase Date"), Cell::new(date.to_string())]);
    table.add_row(vec![Cell::new("Amount (USD)"), Cell::new(amount.to_string())]);
    table.add_row(vec![
        Cell::new("Country"),
        Cell::new(&details.originating_country),
    ]);
    table.add_row(vec![Cell::new("Currency"), Cell::new(&details.currency_label)]);
    table.add_row(vec![
        Cell::new("Rate Date"),
        ui::format_optional_cell(details.exchange_rate_record_date, |d| d.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Exchange Rate"),
        Cell::new(details.exchange_rate.to_string()),
    ]);
    table.add_row(vec![
        Cell::new(ui::style_text("Converted", ui::StyleType::TotalLabel)),
        ui::amount_cell(details.converted_amount.to_string()),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rates_table_lists_every_record() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let records = vec![
            RateRecord::new("Brazil", "Real", day, dec!(5.033)),
            RateRecord::new("Canada", "Dollar", day, dec!(1.354)),
        ];

        let rendered = rates_table(&records).to_string();
        assert!(rendered.contains("Brazil"));
        assert!(rendered.contains("1.354"));
        assert!(rendered.contains("2024-03-31"));
    }
}
