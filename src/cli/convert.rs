use super::ui;
use crate::core::RateSnapshot;
use crate::service::ExchangeRateService;
use anyhow::Result;

/// Result of a single conversion, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub amount: f64,
    pub from: String,
    pub converted: f64,
    pub to: String,
    pub date: String,
    pub is_stale: bool,
}

impl Conversion {
    /// Units of `to` per one unit of `from`.
    pub fn unit_rate(&self) -> Option<f64> {
        if self.amount == 0.0 {
            None
        } else {
            Some(self.converted / self.amount)
        }
    }

    pub fn display(&self) -> String {
        let mut output = format!(
            "{} {} = {} {}",
            ui::format_amount(self.amount, 2),
            self.from,
            ui::style_text(&ui::format_amount(self.converted, 2), ui::StyleType::Amount),
            self.to,
        );

        let mut details = Vec::new();
        if let Some(rate) = self.unit_rate() {
            details.push(format!(
                "1 {} = {} {}",
                self.from,
                ui::format_amount(rate, 4),
                self.to
            ));
        }
        if !self.date.is_empty() {
            details.push(format!("rates as of {}", self.date));
        }
        if !details.is_empty() {
            output.push('\n');
            output.push_str(&ui::style_text(&details.join(" · "), ui::StyleType::Subtle));
        }
        if self.is_stale {
            output.push('\n');
            output.push_str(&ui::style_text(
                "Rates could not be refreshed; showing cached rates.",
                ui::StyleType::Warning,
            ));
        }
        output
    }
}

pub async fn convert(
    service: &ExchangeRateService,
    amount: f64,
    from: &str,
    to: &str,
) -> Result<Conversion> {
    let converted = service.convert(amount, from, to).await?;
    let snapshot: Option<RateSnapshot> = if from == to {
        None
    } else {
        service.cached_snapshot().await
    };
    let is_stale = snapshot.is_some() && !service.cache_status().await.is_fresh;

    Ok(Conversion {
        amount,
        from: from.to_string(),
        converted,
        to: to.to_string(),
        date: snapshot.map(|s| s.date).unwrap_or_default(),
        is_stale,
    })
}

pub async fn run(service: &ExchangeRateService, amount: f64, from: &str, to: &str) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let result = convert(service, amount, from, to).await;
    pb.finish_and_clear();

    println!("{}", result?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversion() -> Conversion {
        Conversion {
            amount: 1000.0,
            from: "USD".to_string(),
            converted: 145454.545,
            to: "JPY".to_string(),
            date: "2025-01-15".to_string(),
            is_stale: false,
        }
    }

    #[test]
    fn test_display_includes_amounts_and_rate() {
        console::set_colors_enabled(false);
        let output = conversion().display();
        assert!(output.contains("1,000.00 USD = 145,454.55 JPY"), "{output}");
        assert!(output.contains("1 USD = 145.4545 JPY"), "{output}");
        assert!(output.contains("rates as of 2025-01-15"), "{output}");
        assert!(!output.contains("cached rates"), "{output}");
    }

    #[test]
    fn test_display_marks_stale_rates() {
        console::set_colors_enabled(false);
        let stale = Conversion {
            is_stale: true,
            ..conversion()
        };
        assert!(stale.display().contains("showing cached rates"));
    }

    #[test]
    fn test_zero_amount_has_no_unit_rate() {
        let zero = Conversion {
            amount: 0.0,
            converted: 0.0,
            ..conversion()
        };
        assert_eq!(zero.unit_rate(), None);
        console::set_colors_enabled(false);
        assert!(!zero.display().contains("1 USD ="));
    }
}
