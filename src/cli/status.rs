use super::ui;
use crate::core::CacheStatus;
use crate::service::ExchangeRateService;
use anyhow::Result;

impl CacheStatus {
    pub fn display(&self, base: &str, date: Option<&str>) -> String {
        let (Some(cached_at), Some(expires_at)) = (self.cached_at_ms, self.expires_at_ms) else {
            return ui::style_text("No exchange rates cached yet.", ui::StyleType::Warning);
        };

        let state = if self.is_fresh {
            ui::style_text("fresh", ui::StyleType::Amount)
        } else {
            ui::style_text("stale", ui::StyleType::Warning)
        };
        let mut lines = vec![
            format!("Cache:      {state}"),
            format!("Base:       {base}"),
        ];
        if let Some(date) = date {
            lines.push(format!("Rates date: {date}"));
        }
        lines.push(format!("Cached at:  {}", ui::format_timestamp(cached_at)));
        let expiry_label = if self.is_fresh { "Expires at" } else { "Expired at" };
        lines.push(format!("{expiry_label}: {}", ui::format_timestamp(expires_at)));
        lines.join("\n")
    }
}

pub async fn run(service: &ExchangeRateService) -> Result<()> {
    let status = service.cache_status().await;
    let snapshot = service.cached_snapshot().await;
    let base = snapshot
        .as_ref()
        .map_or(service.base_currency(), |s| s.base.as_str());

    println!(
        "{}",
        status.display(base, snapshot.as_ref().map(|s| s.date.as_str()))
    );
    Ok(())
}
