//! Madison, WI reference tables (2024-2025 market estimates).
//!
//! Tiered values are ordered frugal, moderate, comfortable.

use std::sync::OnceLock;

use super::types::{
    CarCostProfile, CatalogError, CatalogKind, Centroid, FoodProfile, LifestyleProfile,
    Neighborhood, PersonScaling, PricedOption, ReferenceData, RentTable, Tiered, TransportCost,
    TransportMode, UtilityProfile,
};

pub const OWN_CAR: &str = "Own Car";
pub const NO_GYM: &str = "None";

impl ReferenceData {
    /// Process-wide Madison tables, built on first use.
    pub fn madison() -> &'static ReferenceData {
        static DATA: OnceLock<ReferenceData> = OnceLock::new();
        DATA.get_or_init(build_madison)
    }

    pub fn neighborhood(&self, name: &str) -> Result<&Neighborhood, CatalogError> {
        self.neighborhoods
            .iter()
            .find(|n| n.name == name)
            .ok_or_else(|| not_found(CatalogKind::Neighborhood, name))
    }

    pub fn transport_mode(&self, name: &str) -> Result<&TransportMode, CatalogError> {
        self.transport
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| not_found(CatalogKind::Transport, name))
    }

    pub fn gym(&self, name: &str) -> Result<&PricedOption, CatalogError> {
        self.lifestyle
            .gyms
            .iter()
            .find(|g| g.name == name)
            .ok_or_else(|| not_found(CatalogKind::Gym, name))
    }

    pub fn streaming_service(&self, name: &str) -> Result<&PricedOption, CatalogError> {
        self.lifestyle
            .streaming
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| not_found(CatalogKind::Streaming, name))
    }

    pub fn neighborhood_names(&self) -> Vec<&'static str> {
        self.neighborhoods.iter().map(|n| n.name).collect()
    }

    pub fn transport_names(&self) -> Vec<&'static str> {
        self.transport.iter().map(|t| t.name).collect()
    }

    pub fn gym_names(&self) -> Vec<&'static str> {
        self.lifestyle.gyms.iter().map(|g| g.name).collect()
    }

    pub fn streaming_names(&self) -> Vec<&'static str> {
        self.lifestyle.streaming.iter().map(|s| s.name).collect()
    }
}

fn not_found(kind: CatalogKind, key: &str) -> CatalogError {
    CatalogError::KeyNotFound {
        kind,
        key: key.to_string(),
    }
}

const fn rent(studio: [u32; 3], one_bedroom: [u32; 3], two_bedroom: [u32; 3]) -> RentTable {
    RentTable {
        studio: Tiered::new(studio[0], studio[1], studio[2]),
        one_bedroom: Tiered::new(one_bedroom[0], one_bedroom[1], one_bedroom[2]),
        two_bedroom: Tiered::new(two_bedroom[0], two_bedroom[1], two_bedroom[2]),
    }
}

fn priced(entries: &[(&'static str, f64)]) -> Vec<PricedOption> {
    entries
        .iter()
        .map(|&(name, monthly)| PricedOption { name, monthly })
        .collect()
}

fn build_madison() -> ReferenceData {
    let neighborhoods = vec![
        Neighborhood {
            name: "Downtown / Capitol Square",
            description: "High walkability, close to State St, restaurants, nightlife, and the Capitol.",
            centroid: Centroid {
                lat: 43.0747,
                lon: -89.3841,
            },
            region_id: "downtown-capitol",
            rent: rent([950, 1150, 1400], [1200, 1500, 1900], [1700, 2100, 2600]),
            utility_factor: 1.0,
            grocery_factor: 1.0,
            non_rent_adjustment: 0.0,
            typical_parking: 150,
        },
        Neighborhood {
            name: "Near East Side",
            description: "Trendy and bikeable, close to Willy St Co-op, coffee shops, and the lake path.",
            centroid: Centroid {
                lat: 43.0842,
                lon: -89.3652,
            },
            region_id: "near-east",
            rent: rent([850, 1000, 1250], [1050, 1300, 1600], [1400, 1700, 2100]),
            // older housing stock, drafty in winter
            utility_factor: 1.10,
            grocery_factor: 0.97,
            non_rent_adjustment: 0.0,
            typical_parking: 50,
        },
        Neighborhood {
            name: "Willy Street / Marquette",
            description: "Eclectic and walkable neighborhood between the lakes, strong community feel.",
            centroid: Centroid {
                lat: 43.0893,
                lon: -89.3537,
            },
            region_id: "willy-marquette",
            rent: rent([850, 1000, 1200], [1000, 1250, 1550], [1350, 1650, 2000]),
            utility_factor: 1.12,
            grocery_factor: 0.98,
            non_rent_adjustment: 0.0,
            typical_parking: 50,
        },
        Neighborhood {
            name: "Isthmus / Broom St",
            description: "Dense urban corridor between Lake Mendota and Lake Monona, very central.",
            centroid: Centroid {
                lat: 43.0706,
                lon: -89.3905,
            },
            region_id: "isthmus-broom",
            rent: rent([900, 1100, 1350], [1100, 1400, 1750], [1500, 1900, 2350]),
            utility_factor: 0.95,
            grocery_factor: 1.0,
            non_rent_adjustment: 0.0,
            typical_parking: 100,
        },
        Neighborhood {
            name: "University Ave / Campus Area",
            description: "High-density student corridor, very walkable, close to UW and Memorial Union.",
            centroid: Centroid {
                lat: 43.0730,
                lon: -89.4040,
            },
            region_id: "campus-university",
            rent: rent([800, 950, 1150], [950, 1200, 1450], [1300, 1600, 1950]),
            utility_factor: 1.05,
            grocery_factor: 0.95,
            non_rent_adjustment: -10.0,
            typical_parking: 120,
        },
        Neighborhood {
            name: "Middleton",
            description: "Western neighbor city, quieter residential feel, good access to West Madison employers.",
            centroid: Centroid {
                lat: 43.0972,
                lon: -89.5043,
            },
            region_id: "middleton",
            rent: rent([800, 950, 1150], [1000, 1200, 1500], [1300, 1600, 2000]),
            utility_factor: 0.92,
            grocery_factor: 1.03,
            // longer trips for errands
            non_rent_adjustment: 40.0,
            typical_parking: 0,
        },
        Neighborhood {
            name: "Monona",
            description: "Peaceful lakeside community southeast of Madison, mostly single-family and quiet.",
            centroid: Centroid {
                lat: 43.0622,
                lon: -89.3340,
            },
            region_id: "monona",
            rent: rent([750, 900, 1100], [950, 1150, 1400], [1250, 1500, 1850]),
            utility_factor: 0.97,
            grocery_factor: 1.02,
            non_rent_adjustment: 25.0,
            typical_parking: 0,
        },
    ];

    let transport = vec![
        TransportMode {
            name: "Metro Bus (monthly pass)",
            cost: TransportCost::Plan {
                fixed: 52.0,
                variable: 0.0,
            },
            notes: "Madison Metro unlimited monthly pass (2024 rate)",
        },
        TransportMode {
            name: OWN_CAR,
            cost: TransportCost::OwnCar,
            notes: "Gas + insurance + maintenance; parking is entered separately",
        },
        TransportMode {
            name: "Bike / Walk",
            cost: TransportCost::Plan {
                fixed: 10.0,
                variable: 0.0,
            },
            notes: "Maintenance amortized; occasional B-Cycle day pass",
        },
        TransportMode {
            name: "Hybrid (Bus + occasional rideshare)",
            cost: TransportCost::Plan {
                fixed: 52.0,
                variable: 60.0,
            },
            notes: "Metro pass + Lyft/Uber buffer",
        },
    ];

    ReferenceData {
        neighborhoods,
        transport,
        // ~$3.20/gal at ~25 mpg; WI single-adult insurance; amortized upkeep
        car: CarCostProfile {
            gas: 80.0,
            insurance: 105.0,
            maintenance: 60.0,
        },
        utilities: UtilityProfile {
            electric_gas: 100.0,
            internet: 65.0,
            renters_insurance: 15.0,
        },
        food: FoodProfile {
            groceries: Tiered::new(200.0, 320.0, 450.0),
            dining_per_meal: Tiered::new(12.0, 25.0, 45.0),
            coffee: Tiered::new(20.0, 50.0, 90.0),
        },
        lifestyle: LifestyleProfile {
            gyms: priced(&[
                (NO_GYM, 0.0),
                ("Planet Fitness", 25.0),
                ("UW SERF (non-student)", 35.0),
                ("Madison YMCA", 52.0),
                ("Anytime Fitness", 40.0),
                ("Boutique Studio", 120.0),
            ]),
            streaming: priced(&[
                ("Netflix", 17.0),
                ("Spotify", 11.0),
                ("Hulu", 18.0),
                ("Max (HBO)", 16.0),
                ("Disney+", 14.0),
                ("YouTube Premium", 14.0),
                ("Apple TV+", 10.0),
                ("Amazon Prime", 15.0),
            ]),
            entertainment: Tiered::new(30.0, 80.0, 175.0),
            personal_care: Tiered::new(30.0, 60.0, 100.0),
            clothing: Tiered::new(20.0, 60.0, 130.0),
        },
        person_scaling: PersonScaling {
            rent: 1.0,
            utilities: 0.15,
            food: 1.0,
            transport: 1.0,
            entertainment: 0.7,
        },
    }
}
