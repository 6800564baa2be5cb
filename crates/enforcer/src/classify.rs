//! Threshold classification of budget events.
//!
//! A pure decision: given a normalized [`BudgetEvent`], pick one of four
//! classifications and render the operator-facing message for it.

use serde::Serialize;

use crate::event::BudgetEvent;

/// What a budget notification means for the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// No threshold field was present on the notification.
    NoThresholdCrossed,
    /// An alert threshold was crossed but spend is still under budget.
    AlertThreshold,
    /// A forecast threshold was crossed.
    ForecastThreshold,
    /// Spend has reached or exceeded the budget; enforcement kicks in.
    HardOverbudget,
}

/// Classify a budget event and render its notification message.
///
/// Branch order matters and mirrors the notification contract: an alert
/// threshold takes priority over a forecast threshold when both are present,
/// and only the alert branch compares cost against budget.
#[must_use]
pub fn classify(event: &BudgetEvent) -> (Classification, String) {
    let account = &event.billing_account_id;
    let budget = &event.budget_name;
    let cost = event.cost_amount;
    let amount = event.budget_amount;

    if let Some(fraction) = event.alert_threshold_fraction {
        let percent = fraction * 100.0;
        if event.cost_amount < event.budget_amount {
            let message = format!(
                "Billing account \"{account}\" crossed the {percent:.2}% alert threshold \
                 for budget \"{budget}\". (Current cost: {cost}, Budget: {amount})"
            );
            (Classification::AlertThreshold, message)
        } else {
            let message = format!(
                "Billing account \"{account}\" crossed the {percent:.2}% alert threshold \
                 and has exceeded budget \"{budget}\"! (Current cost: {cost}, Budget: {amount}) \
                 Disabling billing on non-exempt projects..."
            );
            (Classification::HardOverbudget, message)
        }
    } else if let Some(fraction) = event.forecast_threshold_fraction {
        let percent = fraction * 100.0;
        let message = format!(
            "Billing account \"{account}\" is forecast to reach {percent:.2}% of \
             budget \"{budget}\". (Current cost: {cost}, Budget: {amount})"
        );
        (Classification::ForecastThreshold, message)
    } else {
        let message = format!(
            "No budget threshold exceeded for billing account \"{account}\". \
             (Current cost: {cost}, Budget: {amount})"
        );
        (Classification::NoThresholdCrossed, message)
    }
}
