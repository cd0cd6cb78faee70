// src/prompt.rs
use crate::models::{Holding, InvestmentRequest, PortfolioSnapshot};

pub const ANALYST_ROLE: &str = "You are a professional stock market analyst.";
pub const PORTFOLIO_MANAGER_ROLE: &str = "You are a professional portfolio manager.";

// Floats go through `{:?}` so whole numbers keep their decimal point ("10.0").
pub fn investment_prompt(investment: &InvestmentRequest, current_price: f64) -> String {
    format!(
        "Analyze the following stock investment:\n\
         Symbol: {}\n\
         Quantity: {:?}\n\
         Purchase Price: ${:?}\n\
         Purchase Date: {}\n\
         Current Price: ${:?}\n\
         \n\
         Provide insights on:\n\
         1. Investment performance\n\
         2. Risk assessment\n\
         3. Market trends\n\
         4. Recommendations\n",
        investment.symbol,
        investment.quantity,
        investment.purchase_price,
        investment.purchase_date,
        current_price,
    )
}

// Renders holdings as `[{'symbol': 'AAPL', 'quantity': 10, ...}]`.
fn holdings_listing(holdings: &[Holding]) -> String {
    let entries: Vec<String> = holdings
        .iter()
        .map(|h| {
            format!(
                "{{'symbol': '{}', 'quantity': {}, 'current_value': {:?}, 'gain_loss': {:?}}}",
                h.symbol, h.quantity, h.current_value, h.gain_loss
            )
        })
        .collect();
    format!("[{}]", entries.join(", "))
}

pub fn portfolio_prompt(portfolio: &PortfolioSnapshot) -> String {
    let holdings = holdings_listing(&portfolio.holdings);
    format!(
        "Analyze the following portfolio:\n\
         Total Value: ${:?}\n\
         Total Gain/Loss: ${:?}\n\
         Holdings: {}\n\
         \n\
         Provide insights on:\n\
         1. Portfolio diversification\n\
         2. Risk assessment\n\
         3. Performance analysis\n\
         4. Recommendations\n",
        portfolio.total_value, portfolio.total_gain_loss, holdings,
    )
}
