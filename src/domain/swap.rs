//! Price-ratio swap quotes for simulated swaps.

use color_eyre::eyre::{Result, bail};

use super::token::TokenRecord;

/// What the user pays and receives for a swap at current unit prices.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapQuote {
    pub pay_token: String,
    pub receive_token: String,
    pub pay_amount: f64,
    pub receive_amount: f64,
    /// Units of the receive token per unit of the pay token.
    pub rate: f64,
    /// Pay amount valued in USD.
    pub pay_value: f64,
}

impl SwapQuote {
    pub fn receive_amount_display(&self) -> String {
        format!("{:.6}", self.receive_amount)
    }

    /// e.g. `1 SOL ≈ 150.0000 USDC`
    pub fn rate_display(&self) -> String {
        format!(
            "1 {} ≈ {:.4} {}",
            self.pay_token, self.rate, self.receive_token
        )
    }
}

pub fn quote(pay: &TokenRecord, receive: &TokenRecord, pay_amount: f64) -> Result<SwapQuote> {
    if pay.id == receive.id {
        bail!("Cannot swap {} for itself", pay.symbol);
    }
    if !pay_amount.is_finite() || pay_amount <= 0.0 {
        bail!("Swap amount must be positive");
    }
    if receive.price <= 0.0 {
        bail!("No price available for {}", receive.symbol);
    }

    let rate = pay.price / receive.price;
    Ok(SwapQuote {
        pay_token: pay.symbol.clone(),
        receive_token: receive.symbol.clone(),
        pay_amount,
        receive_amount: pay_amount * rate,
        rate,
        pay_value: pay_amount * pay.price,
    })
}
