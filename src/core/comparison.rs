use super::engine::ExpenseBreakdown;
use super::types::{ComparisonRow, ReferenceData, SpendingStyle, UnitType};

/// Estimated monthly total for every neighborhood, for the map layer.
///
/// Every row reuses the non-rent costs of `current`, the breakdown for the
/// selected neighborhood, and only swaps in each neighborhood's rent and
/// flat adjustment. Utility and grocery scaling are not recomputed per row.
pub fn compare_neighborhoods(
    data: &ReferenceData,
    current: &ExpenseBreakdown,
    selected: &str,
    unit_type: UnitType,
    style: SpendingStyle,
) -> Vec<ComparisonRow> {
    let shared_non_rent = current.non_rent_total();

    data.neighborhoods
        .iter()
        .map(|n| {
            let rent = f64::from(n.rent.rent(unit_type, style));
            let non_rent = shared_non_rent + n.non_rent_adjustment;
            ComparisonRow {
                neighborhood: n.name,
                region_id: n.region_id,
                centroid: n.centroid,
                rent,
                non_rent,
                estimated_total: rent + non_rent,
                selected: n.name == selected,
            }
        })
        .collect()
}
