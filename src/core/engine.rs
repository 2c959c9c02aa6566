use serde::Serialize;

use super::types::{
    CatalogError, CategoryShare, ExpenseCategory, LineItem, Neighborhood, PricedOption,
    ReferenceData, SpendingStyle, TransportCost, TransportMode, UnitType,
};

/// Average days per month used for the daily figure.
pub const DAYS_PER_MONTH: f64 = 30.44;

/// A user's choices. Neighborhood, transport, gym and streaming entries
/// are referenced by their display names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub neighborhood: String,
    pub unit_type: UnitType,
    pub spending_style: SpendingStyle,
    pub transport: String,
    pub dining_out_per_month: u32,
    pub gym: String,
    pub streaming: Vec<String>,
    pub healthcare: f64,
    pub parking: f64,
    pub other_entertainment: f64,
}

impl Selection {
    pub fn resolve<'a>(&self, data: &'a ReferenceData) -> Result<ExpenseInputs<'a>, CatalogError> {
        let streaming = self
            .streaming
            .iter()
            .map(|name| data.streaming_service(name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ExpenseInputs {
            neighborhood: data.neighborhood(&self.neighborhood)?,
            unit_type: self.unit_type,
            spending_style: self.spending_style,
            transport: data.transport_mode(&self.transport)?,
            dining_out_per_month: self.dining_out_per_month,
            gym: data.gym(&self.gym)?,
            streaming,
            healthcare: self.healthcare,
            parking: self.parking,
            other_entertainment: self.other_entertainment,
        })
    }
}

/// Selection with every key resolved against the reference tables.
#[derive(Debug, Clone)]
pub struct ExpenseInputs<'a> {
    pub neighborhood: &'a Neighborhood,
    pub unit_type: UnitType,
    pub spending_style: SpendingStyle,
    pub transport: &'a TransportMode,
    pub dining_out_per_month: u32,
    pub gym: &'a PricedOption,
    pub streaming: Vec<&'a PricedOption>,
    pub healthcare: f64,
    pub parking: f64,
    pub other_entertainment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExpenseBreakdown {
    items: Vec<LineItem>,
}

impl ExpenseBreakdown {
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn amount(&self, category: ExpenseCategory) -> f64 {
        self.items
            .iter()
            .find(|item| item.category == category)
            .map_or(0.0, |item| item.amount)
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }

    pub fn annual_total(&self) -> f64 {
        self.total() * 12.0
    }

    pub fn daily_average(&self) -> f64 {
        self.total() / DAYS_PER_MONTH
    }

    pub fn non_rent_total(&self) -> f64 {
        self.items
            .iter()
            .filter(|item| item.category != ExpenseCategory::Rent)
            .map(|item| item.amount)
            .sum()
    }

    /// Non-zero categories in breakdown order with their share of the total.
    pub fn shares(&self) -> Vec<CategoryShare> {
        let total = self.total();
        self.items
            .iter()
            .filter(|item| item.amount > 0.0)
            .map(|item| CategoryShare {
                label: item.label,
                amount: item.amount,
                percent: if total > 0.0 {
                    item.amount / total * 100.0
                } else {
                    0.0
                },
            })
            .collect()
    }

    /// Non-zero categories sorted ascending by amount, as the bar chart
    /// draws them bottom-up.
    pub fn chart_series(&self) -> Vec<LineItem> {
        let mut series: Vec<LineItem> = self
            .items
            .iter()
            .filter(|item| item.amount > 0.0)
            .copied()
            .collect();
        series.sort_by(|a, b| a.amount.total_cmp(&b.amount));
        series
    }
}

pub fn compute_expenses(data: &ReferenceData, inputs: &ExpenseInputs<'_>) -> ExpenseBreakdown {
    let style = inputs.spending_style;
    let neighborhood = inputs.neighborhood;

    let rent = f64::from(neighborhood.rent.rent(inputs.unit_type, style));

    let utilities = (data.utilities.electric_gas
        * neighborhood.utility_factor
        * inputs.unit_type.energy_factor())
    .round_ties_even()
        + data.utilities.internet
        + data.utilities.renters_insurance;

    // parking is never folded in here, the user enters it separately
    let transportation = match inputs.transport.cost {
        TransportCost::OwnCar => data.car.monthly(),
        TransportCost::Plan { fixed, variable } => fixed + variable,
    };

    let groceries = (data.food.groceries.get(style) * neighborhood.grocery_factor).round_ties_even();
    let dining_out = f64::from(inputs.dining_out_per_month) * data.food.dining_per_meal.get(style);
    let streaming: f64 = inputs.streaming.iter().map(|s| s.monthly).sum();

    let items = [
        (ExpenseCategory::Rent, rent),
        (ExpenseCategory::Utilities, utilities),
        (ExpenseCategory::Transportation, transportation),
        (ExpenseCategory::Parking, inputs.parking),
        (ExpenseCategory::Groceries, groceries),
        (ExpenseCategory::DiningOut, dining_out),
        (ExpenseCategory::Coffee, data.food.coffee.get(style)),
        (ExpenseCategory::Healthcare, inputs.healthcare),
        (ExpenseCategory::Gym, inputs.gym.monthly),
        (ExpenseCategory::Streaming, streaming),
        (
            ExpenseCategory::Entertainment,
            data.lifestyle.entertainment.get(style),
        ),
        (
            ExpenseCategory::OtherEntertainment,
            inputs.other_entertainment,
        ),
        (
            ExpenseCategory::PersonalCare,
            data.lifestyle.personal_care.get(style),
        ),
        (ExpenseCategory::Clothing, data.lifestyle.clothing.get(style)),
    ]
    .into_iter()
    .map(|(category, amount)| LineItem {
        category,
        label: category.label(),
        amount,
    })
    .collect();

    ExpenseBreakdown { items }
}
