use super::ui;
use crate::core::catalog::{self, CurrencyInfo};
use crate::service::ExchangeRateService;
use anyhow::Result;
use comfy_table::Cell;
use std::collections::BTreeSet;

/// Renders catalog entries, marking those present in `supported` when it is known.
pub fn display_as_table(currencies: &[&CurrencyInfo], supported: Option<&BTreeSet<String>>) -> String {
    let mut table = ui::new_styled_table();
    let mut header = vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell("Symbol"),
    ];
    if supported.is_some() {
        header.push(ui::header_cell("Available"));
    }
    table.set_header(header);

    for currency in currencies {
        let mut row = vec![
            Cell::new(currency.code),
            Cell::new(currency.name),
            Cell::new(currency.symbol),
        ];
        if let Some(supported) = supported {
            let mark = if supported.contains(currency.code) { "yes" } else { "no" };
            row.push(Cell::new(mark));
        }
        table.add_row(row);
    }
    table.to_string()
}

pub async fn run(service: &ExchangeRateService, query: Option<&str>) -> Result<()> {
    let matches = catalog::search(query.unwrap_or_default());
    if matches.is_empty() {
        println!(
            "{}",
            ui::style_text(
                &format!("No currency matches '{}'", query.unwrap_or_default()),
                ui::StyleType::Error
            )
        );
        return Ok(());
    }

    // Only mark availability from rates already cached; listing never fetches.
    let supported = service.cached_snapshot().await.map(|s| s.currencies());
    println!("{}", display_as_table(&matches, supported.as_ref()));
    Ok(())
}
