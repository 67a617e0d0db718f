//! The dashboard command.

use crate::commands::Out;
use crate::model::{ChartPoint, Summary};
use crate::{App, Result};
use serde::Serialize;

/// The structured output of the dashboard command.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub summary: Summary,
    pub chart_data: Vec<ChartPoint>,
}

/// Loads everything and renders the financial summary with per-category expense totals.
pub async fn dashboard(app: &App) -> Result<Out<DashboardView>> {
    app.store().load_all().await;

    let summary = app.store().summary();
    let chart_data = app.store().chart_data();

    let mut lines = vec![
        format!("Income:   {}", summary.total_income),
        format!("Expenses: {}", summary.total_expenses),
        format!("Net:      {}", summary.net_balance),
    ];
    if !chart_data.is_empty() {
        lines.push("Spending by category:".to_string());
        for point in &chart_data {
            lines.push(format!("  {:<20} {}", point.category_name, point.total_amount));
        }
    }

    Ok(Out::new(
        lines.join("\n"),
        DashboardView {
            summary,
            chart_data,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_dashboard_renders_summary_and_chart() {
        let env = TestEnv::new().await;
        let app = env.app();
        let out = dashboard(&app).await.unwrap();
        let view = out.structure().unwrap();
        assert!(!view.summary.net_balance.is_zero());
        assert!(!view.chart_data.is_empty());
        assert!(out.message().contains("Spending by category"));
    }
}
