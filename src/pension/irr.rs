//! Rate at which a pension's monthly payments are worth a lump sum
//!
//! Payments are monthly in arrears and never negative, so their discounted
//! value falls as the rate rises and there is at most one break-even rate.

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 200;

/// Monthly rates are searched in (-99%, 1000%)
const MONTHLY_RATE_FLOOR: f64 = -0.99;
const MONTHLY_RATE_CEILING: f64 = 10.0;

/// Starting guess: 5% a year
const INITIAL_MONTHLY_RATE: f64 = 0.05 / 12.0;

/// Value today of monthly payments, the first one month from now
pub fn discounted_value(monthly_payments: &[f64], monthly_rate: f64) -> f64 {
    let mut discount = 1.0;
    monthly_payments
        .iter()
        .map(|payment| {
            discount /= 1.0 + monthly_rate;
            payment * discount
        })
        .sum()
}

/// Effective annual rate at which `monthly_payments` are worth `lump_sum`
///
/// Returns a fraction (0.05 = 5%). None when there is nothing to compare
/// or the break-even rate lies outside the searched range.
pub fn implied_annual_rate(lump_sum: f64, monthly_payments: &[f64]) -> Option<f64> {
    let nominal: f64 = monthly_payments.iter().sum();
    if lump_sum <= 0.0 || nominal <= 0.0 {
        return None;
    }

    let monthly = newton(lump_sum, monthly_payments)
        .or_else(|| bisection(lump_sum, monthly_payments))?;
    Some((1.0 + monthly).powi(12) - 1.0)
}

/// Discounted value minus the lump sum, and its slope in the monthly rate
fn shortfall_with_slope(lump_sum: f64, payments: &[f64], monthly_rate: f64) -> (f64, f64) {
    let growth = 1.0 + monthly_rate;
    let mut discount = 1.0;
    let mut value = -lump_sum;
    let mut slope = 0.0;

    for (month, payment) in (1u32..).zip(payments) {
        discount /= growth;
        value += payment * discount;
        slope -= f64::from(month) * payment * discount / growth;
    }

    (value, slope)
}

fn newton(lump_sum: f64, payments: &[f64]) -> Option<f64> {
    let mut rate = INITIAL_MONTHLY_RATE;

    for _ in 0..MAX_ITERATIONS {
        let (shortfall, slope) = shortfall_with_slope(lump_sum, payments, rate);
        if slope.abs() < 1e-20 {
            return None;
        }

        let next = (rate - shortfall / slope).clamp(MONTHLY_RATE_FLOOR, MONTHLY_RATE_CEILING);
        if (next - rate).abs() < TOLERANCE {
            return Some(next);
        }
        rate = next;
    }

    None
}

/// Halve the bracket until the discounted value matches the lump sum
fn bisection(lump_sum: f64, payments: &[f64]) -> Option<f64> {
    let shortfall = |rate: f64| discounted_value(payments, rate) - lump_sum;

    // Value falls with the rate, so the root is bracketed only if the
    // ceiling undershoots the lump sum and the floor overshoots it
    if shortfall(MONTHLY_RATE_CEILING) > 0.0 || shortfall(MONTHLY_RATE_FLOOR) < 0.0 {
        return None;
    }

    let mut low = MONTHLY_RATE_FLOOR;
    let mut high = MONTHLY_RATE_CEILING;
    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let gap = shortfall(mid);
        if gap.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }
        if gap > 0.0 {
            low = mid;
        } else {
            high = mid;
        }
    }

    None
}
