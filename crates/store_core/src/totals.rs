use shared::{domain::Money, protocol::Totals};

/// Sales tax applied to the cart sub-total, in basis points (15%).
pub const DEFAULT_TAX_RATE_BASIS_POINTS: u32 = 1_500;

/// Sums cart line totals and derives tax and grand total.
pub fn compute_totals<I>(line_totals: I, tax_rate_basis_points: u32) -> Totals
where
    I: IntoIterator<Item = Money>,
{
    let sub_total: Money = line_totals.into_iter().sum();
    let tax = sub_total.apply_basis_points(tax_rate_basis_points);
    Totals {
        sub_total,
        tax,
        total: sub_total + tax,
    }
}
