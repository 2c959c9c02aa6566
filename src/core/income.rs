use super::types::{IncomeError, RequiredIncome, SavingsProjection, SavingsStatus};

pub const LOW_SAVINGS_RATE: f64 = 10.0;
pub const HEALTHY_SAVINGS_RATE: f64 = 20.0;

/// Gross income needed to cover `total_monthly_expense` plus savings targets.
///
/// Cash savings come out of net pay and are grossed up by the tax rate.
/// Retirement contributions are treated as pre-tax and added after the
/// gross-up.
pub fn required_gross_income(
    total_monthly_expense: f64,
    annual_cash_savings: f64,
    annual_retirement_savings: f64,
    tax_rate_percent: f64,
) -> Result<RequiredIncome, IncomeError> {
    if !tax_rate_percent.is_finite() || tax_rate_percent >= 100.0 {
        return Err(IncomeError::TaxRateOutOfRange(tax_rate_percent));
    }

    let monthly_cash_savings = annual_cash_savings / 12.0;
    let net_needed_monthly = total_monthly_expense + monthly_cash_savings;
    let taxable_gross_monthly = net_needed_monthly / (1.0 - tax_rate_percent / 100.0);
    let required_monthly_gross = taxable_gross_monthly + annual_retirement_savings / 12.0;

    Ok(RequiredIncome {
        monthly_cash_savings,
        net_needed_monthly,
        required_monthly_gross,
        required_annual_gross: required_monthly_gross * 12.0,
    })
}

pub fn project_savings(
    gross_monthly_income: f64,
    tax_rate_percent: f64,
    total_monthly_expense: f64,
) -> SavingsProjection {
    let net_monthly_income = gross_monthly_income * (1.0 - tax_rate_percent / 100.0);
    let monthly_savings = net_monthly_income - total_monthly_expense;
    let savings_rate_percent = if net_monthly_income > 0.0 {
        monthly_savings / net_monthly_income * 100.0
    } else {
        0.0
    };

    let status = if monthly_savings < 0.0 {
        SavingsStatus::Deficit
    } else if savings_rate_percent < LOW_SAVINGS_RATE {
        SavingsStatus::Low
    } else if savings_rate_percent >= HEALTHY_SAVINGS_RATE {
        SavingsStatus::Healthy
    } else {
        SavingsStatus::OnTrack
    };

    SavingsProjection {
        net_monthly_income,
        monthly_savings,
        annual_savings: monthly_savings * 12.0,
        savings_rate_percent,
        status,
    }
}
