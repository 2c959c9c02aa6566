mod comparison;
mod data;
mod engine;
mod income;
mod session;
mod types;

pub use comparison::compare_neighborhoods;
pub use data::{NO_GYM, OWN_CAR};
pub use engine::{DAYS_PER_MONTH, ExpenseBreakdown, ExpenseInputs, Selection, compute_expenses};
pub use income::{HEALTHY_SAVINGS_RATE, LOW_SAVINGS_RATE, project_savings, required_gross_income};
pub use session::{SessionEvent, SessionState, apply_map_click};
pub use types::{
    CarCostProfile, CatalogError, CatalogKind, CategoryShare, Centroid, ComparisonRow,
    ExpenseCategory, FoodProfile, IncomeError, LifestyleProfile, LineItem, Neighborhood,
    PersonScaling, PricedOption, ReferenceData, RentTable, RequiredIncome, SavingsProjection,
    SavingsStatus, SpendingStyle, Tiered, TransportCost, TransportMode, UnitType, UtilityProfile,
};
