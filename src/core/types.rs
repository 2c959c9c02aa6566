use serde::Serialize;
use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub enum SpendingStyle {
    Frugal,
    Moderate,
    Comfortable,
}

impl SpendingStyle {
    pub const ALL: [SpendingStyle; 3] = [
        SpendingStyle::Frugal,
        SpendingStyle::Moderate,
        SpendingStyle::Comfortable,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SpendingStyle::Frugal => "Frugal",
            SpendingStyle::Moderate => "Moderate",
            SpendingStyle::Comfortable => "Comfortable",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub enum UnitType {
    #[serde(rename = "studio")]
    Studio,
    #[serde(rename = "1BR")]
    OneBedroom,
    #[serde(rename = "2BR")]
    TwoBedroom,
}

impl UnitType {
    pub const ALL: [UnitType; 3] = [UnitType::Studio, UnitType::OneBedroom, UnitType::TwoBedroom];

    pub fn label(self) -> &'static str {
        match self {
            UnitType::Studio => "studio",
            UnitType::OneBedroom => "1BR",
            UnitType::TwoBedroom => "2BR",
        }
    }

    /// Multiplier applied to the electric+gas baseline for the unit size.
    pub fn energy_factor(self) -> f64 {
        match self {
            UnitType::Studio => 0.80,
            UnitType::OneBedroom => 1.00,
            UnitType::TwoBedroom => 1.22,
        }
    }
}

/// One value per spending style. Every tiered price table uses this shape,
/// so a table cannot be missing a tier.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tiered<T> {
    pub frugal: T,
    pub moderate: T,
    pub comfortable: T,
}

impl<T: Copy> Tiered<T> {
    pub const fn new(frugal: T, moderate: T, comfortable: T) -> Self {
        Self {
            frugal,
            moderate,
            comfortable,
        }
    }

    pub fn get(&self, style: SpendingStyle) -> T {
        match style {
            SpendingStyle::Frugal => self.frugal,
            SpendingStyle::Moderate => self.moderate,
            SpendingStyle::Comfortable => self.comfortable,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentTable {
    pub studio: Tiered<u32>,
    #[serde(rename = "1BR")]
    pub one_bedroom: Tiered<u32>,
    #[serde(rename = "2BR")]
    pub two_bedroom: Tiered<u32>,
}

impl RentTable {
    pub fn rent(&self, unit: UnitType, style: SpendingStyle) -> u32 {
        match unit {
            UnitType::Studio => self.studio.get(style),
            UnitType::OneBedroom => self.one_bedroom.get(style),
            UnitType::TwoBedroom => self.two_bedroom.get(style),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Centroid {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Neighborhood {
    pub name: &'static str,
    pub description: &'static str,
    pub centroid: Centroid,
    pub region_id: &'static str,
    pub rent: RentTable,
    pub utility_factor: f64,
    pub grocery_factor: f64,
    pub non_rent_adjustment: f64,
    /// Typical monthly parking in the area. Shown as a hint only; the
    /// calculator always takes parking from the user.
    pub typical_parking: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TransportCost {
    OwnCar,
    Plan { fixed: f64, variable: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransportMode {
    pub name: &'static str,
    pub cost: TransportCost,
    pub notes: &'static str,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarCostProfile {
    pub gas: f64,
    pub insurance: f64,
    pub maintenance: f64,
}

impl CarCostProfile {
    pub fn monthly(&self) -> f64 {
        self.gas + self.insurance + self.maintenance
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityProfile {
    pub electric_gas: f64,
    pub internet: f64,
    pub renters_insurance: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodProfile {
    pub groceries: Tiered<f64>,
    pub dining_per_meal: Tiered<f64>,
    pub coffee: Tiered<f64>,
}

/// A named option with a flat monthly price (gym memberships, streaming).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PricedOption {
    pub name: &'static str,
    pub monthly: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifestyleProfile {
    pub gyms: Vec<PricedOption>,
    pub streaming: Vec<PricedOption>,
    pub entertainment: Tiered<f64>,
    pub personal_care: Tiered<f64>,
    pub clothing: Tiered<f64>,
}

/// Per-additional-person multipliers for multi-person households. Not
/// applied by the calculator yet.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonScaling {
    pub rent: f64,
    pub utilities: f64,
    pub food: f64,
    pub transport: f64,
    pub entertainment: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceData {
    pub neighborhoods: Vec<Neighborhood>,
    pub transport: Vec<TransportMode>,
    pub car: CarCostProfile,
    pub utilities: UtilityProfile,
    pub food: FoodProfile,
    pub lifestyle: LifestyleProfile,
    pub person_scaling: PersonScaling,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CatalogKind {
    Neighborhood,
    Transport,
    Gym,
    Streaming,
}

impl CatalogKind {
    fn label(self) -> &'static str {
        match self {
            CatalogKind::Neighborhood => "neighborhood",
            CatalogKind::Transport => "transport mode",
            CatalogKind::Gym => "gym option",
            CatalogKind::Streaming => "streaming service",
        }
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown {kind}: {key:?}")]
    KeyNotFound { kind: CatalogKind, key: String },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum ExpenseCategory {
    Rent,
    Utilities,
    Transportation,
    Parking,
    Groceries,
    DiningOut,
    Coffee,
    Healthcare,
    Gym,
    Streaming,
    Entertainment,
    OtherEntertainment,
    PersonalCare,
    Clothing,
}

impl ExpenseCategory {
    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Rent => "Rent",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Transportation => "Transportation",
            ExpenseCategory::Parking => "Parking",
            ExpenseCategory::Groceries => "Groceries",
            ExpenseCategory::DiningOut => "Dining Out",
            ExpenseCategory::Coffee => "Coffee / Cafes",
            ExpenseCategory::Healthcare => "Healthcare",
            ExpenseCategory::Gym => "Gym / Fitness",
            ExpenseCategory::Streaming => "Streaming",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::OtherEntertainment => "Other Entertainment",
            ExpenseCategory::PersonalCare => "Personal Care",
            ExpenseCategory::Clothing => "Clothing",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub category: ExpenseCategory,
    pub label: &'static str,
    pub amount: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub label: &'static str,
    pub amount: f64,
    pub percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub neighborhood: &'static str,
    pub region_id: &'static str,
    pub centroid: Centroid,
    pub rent: f64,
    pub non_rent: f64,
    pub estimated_total: f64,
    pub selected: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredIncome {
    pub monthly_cash_savings: f64,
    pub net_needed_monthly: f64,
    pub required_monthly_gross: f64,
    pub required_annual_gross: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SavingsStatus {
    Deficit,
    Low,
    OnTrack,
    Healthy,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsProjection {
    pub net_monthly_income: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    pub savings_rate_percent: f64,
    pub status: SavingsStatus,
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum IncomeError {
    #[error("tax rate must be a finite percentage below 100, got {0}")]
    TaxRateOutOfRange(f64),
}
