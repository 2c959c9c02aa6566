use super::engine::Selection;
use super::types::{CatalogError, ReferenceData, SpendingStyle, UnitType};

/// Selector and map interactions that change the current selection.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SelectNeighborhood(String),
    MapClick(String),
    SetUnitType(UnitType),
    SetSpendingStyle(SpendingStyle),
    SetTransport(String),
    SetDiningOut(u32),
    SetGym(String),
    SetStreaming(Vec<String>),
    SetHealthcare(f64),
    SetParking(f64),
    SetOtherEntertainment(f64),
}

/// The one piece of mutable state in an interactive session. Transitions
/// consume the old state and hand back the next one; key changes are
/// checked against the reference data before they are accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    selection: Selection,
}

impl SessionState {
    pub fn new(data: &ReferenceData, selection: Selection) -> Result<Self, CatalogError> {
        selection.resolve(data)?;
        Ok(Self { selection })
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn into_selection(self) -> Selection {
        self.selection
    }

    pub fn apply(self, data: &ReferenceData, event: SessionEvent) -> Result<Self, CatalogError> {
        let mut selection = self.selection;
        match event {
            SessionEvent::SelectNeighborhood(name) | SessionEvent::MapClick(name) => {
                data.neighborhood(&name)?;
                selection.neighborhood = name;
            }
            SessionEvent::SetUnitType(unit) => selection.unit_type = unit,
            SessionEvent::SetSpendingStyle(style) => selection.spending_style = style,
            SessionEvent::SetTransport(name) => {
                data.transport_mode(&name)?;
                selection.transport = name;
            }
            SessionEvent::SetDiningOut(count) => selection.dining_out_per_month = count,
            SessionEvent::SetGym(name) => {
                data.gym(&name)?;
                selection.gym = name;
            }
            SessionEvent::SetStreaming(names) => {
                for name in &names {
                    data.streaming_service(name)?;
                }
                selection.streaming = names;
            }
            SessionEvent::SetHealthcare(amount) => selection.healthcare = amount,
            SessionEvent::SetParking(amount) => selection.parking = amount,
            SessionEvent::SetOtherEntertainment(amount) => selection.other_entertainment = amount,
        }
        Ok(Self { selection })
    }
}

pub fn apply_map_click(
    state: SessionState,
    data: &ReferenceData,
    neighborhood: &str,
) -> Result<SessionState, CatalogError> {
    state.apply(data, SessionEvent::MapClick(neighborhood.to_string()))
}
