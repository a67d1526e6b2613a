use super::ui;
use crate::core::{RateSnapshot, catalog};
use crate::service::ExchangeRateService;
use anyhow::Result;

impl RateSnapshot {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Code"),
            ui::header_cell("Currency"),
            ui::header_cell(&format!("Per 1 {}", self.base)),
            ui::header_cell(&format!("In {}", self.base)),
        ]);

        let mut codes: Vec<&String> = self.rates.keys().collect();
        codes.sort();
        for code in codes {
            let rate = self.rates[code];
            let name = catalog::find(code).map_or("", |c| c.name);
            let inverse = if rate > 0.0 {
                ui::format_amount(1.0 / rate, 6)
            } else {
                "N/A".to_string()
            };
            table.add_row(vec![
                comfy_table::Cell::new(code),
                comfy_table::Cell::new(name),
                ui::number_cell(ui::format_amount(rate, 4)),
                ui::number_cell(inverse),
            ]);
        }

        format!(
            "Rates for {} as of {}\n\n{}",
            ui::style_text(&self.base, ui::StyleType::Title),
            self.date,
            table
        )
    }
}

pub async fn run(service: &ExchangeRateService) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let snapshot = service.get_rates().await;
    pb.finish_and_clear();

    println!("{}", snapshot?.display_as_table());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_display_as_table() {
        console::set_colors_enabled(false);
        let snapshot = RateSnapshot {
            base: "EUR".to_string(),
            date: "2025-01-15".to_string(),
            rates: HashMap::from([("USD".to_string(), 1.1), ("JPY".to_string(), 160.0)]),
            fetched_at_ms: 0,
        };

        let output = snapshot.display_as_table();
        assert!(output.starts_with("Rates for EUR as of 2025-01-15"), "{output}");
        assert!(output.contains("Japanese Yen"));
        assert!(output.contains("160.0000"));
        assert!(output.contains("0.909091"));
        // Rows are sorted by code
        assert!(output.find("JPY").unwrap() < output.find("USD").unwrap());
    }
}
