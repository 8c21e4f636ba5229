use crate::facility::Facility;
use crate::model::{Bay, BayInput, Floor, FloorInput, Spot, SpotFeature, SpotInput, SpotStatus,
    SpotType};
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Dashboard,
    Layout,
    Spots,
    Vehicles,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusPanel {
    Floors,
    Bays,
    Spots,
}

/// Which prompt the footer input line is collecting, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    CheckIn,
    CheckOut,
    PlateLookup,
    Search,
}

pub struct App {
    pub facility: Facility,
    pub view: View,
    pub focus_panel: FocusPanel,
    pub selected_spot: usize,
    pub table_row: usize,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub status_line: Option<String>,
    pub history_plate: Option<String>,
    pub should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(facility: Facility) -> Self {
        Self {
            facility,
            view: View::Dashboard,
            focus_panel: FocusPanel::Floors,
            selected_spot: 0,
            table_row: 0,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            status_line: None,
            history_plate: None,
            should_quit: false,
        }
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Dashboard => super::views::draw_dashboard(frame, self),
            View::Layout => super::views::draw_layout(frame, self),
            View::Spots => super::views::draw_spots(frame, self),
            View::Vehicles => super::views::draw_vehicles(frame, self),
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }
            if self.input_mode != InputMode::Normal {
                self.handle_input_keys(key.code);
                return Ok(());
            }
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('1') => self.view = View::Dashboard,
                KeyCode::Char('2') => self.view = View::Layout,
                KeyCode::Char('3') => self.view = View::Spots,
                KeyCode::Char('4') => self.view = View::Vehicles,
                KeyCode::Tab => self.next_view(),
                KeyCode::Char('b') => self.next_building(),
                code => match self.view {
                    View::Dashboard => {}
                    View::Layout => self.handle_layout_keys(code),
                    View::Spots => self.handle_spots_keys(code),
                    View::Vehicles => self.handle_vehicles_keys(code),
                },
            }
        }
        Ok(())
    }

    fn next_view(&mut self) {
        self.view = match self.view {
            View::Dashboard => View::Layout,
            View::Layout => View::Spots,
            View::Spots => View::Vehicles,
            View::Vehicles => View::Dashboard,
        };
    }

    // --- Input line -------------------------------------------------------

    fn handle_input_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Enter => self.submit_input(),
            KeyCode::Char(c) => self.input_buffer.push(c),
            _ => {}
        }
    }

    fn submit_input(&mut self) {
        let input = std::mem::take(&mut self.input_buffer);
        let mode = self.input_mode;
        self.input_mode = InputMode::Normal;

        match mode {
            InputMode::Normal => {}
            InputMode::CheckIn => {
                let Some(building_id) = self.selected_building_id() else {
                    self.status_line = Some("No building selected".to_string());
                    return;
                };
                match self.facility.check_in(&input, &building_id) {
                    Ok(car) => {
                        self.history_plate = Some(car.license_plate.clone());
                        self.status_line = Some(format!(
                            "Checked in {} at spot {}",
                            car.license_plate,
                            car.spot_id.as_deref().unwrap_or("-")
                        ));
                    }
                    Err(err) => self.status_line = Some(err.to_string()),
                }
            }
            InputMode::CheckOut => match self.facility.check_out(&input) {
                Ok(record) => {
                    self.history_plate = Some(record.license_plate.clone());
                    self.status_line = Some(format!(
                        "Checked out {} | fee {}",
                        record.license_plate,
                        record.fee.unwrap_or(0)
                    ));
                }
                Err(err) => self.status_line = Some(err.to_string()),
            },
            InputMode::PlateLookup => match self.facility.ledger.find_by_plate(&input) {
                Some(car) => {
                    self.history_plate = Some(car.license_plate.clone());
                    self.status_line = Some(format!(
                        "{}: {}",
                        car.license_plate,
                        if car.is_active() { "checked in" } else { "checked out" }
                    ));
                }
                None => {
                    self.history_plate = None;
                    self.status_line = Some(format!("No vehicle matching '{input}'"));
                }
            },
            InputMode::Search => {
                self.facility.spot_query.set_search_query(input);
                self.table_row = 0;
            }
        }
    }

    // --- Building selection -----------------------------------------------

    #[must_use]
    pub fn selected_building_id(&self) -> Option<String> {
        self.facility.buildings.selected_id().map(str::to_string)
    }

    /// Cycle to the next building and reset the layout selection to its
    /// first floor and bay.
    fn next_building(&mut self) {
        let ids: Vec<String> = self
            .facility
            .buildings
            .buildings()
            .iter()
            .map(|b| b.id.clone())
            .collect();
        if ids.is_empty() {
            return;
        }
        let current = self.facility.buildings.selected_id();
        let next = match current.and_then(|id| ids.iter().position(|i| i == id)) {
            Some(pos) => ids[(pos + 1) % ids.len()].clone(),
            None => ids[0].clone(),
        };
        self.facility.buildings.select(&next);
        self.reset_layout_selection();
    }

    fn reset_layout_selection(&mut self) {
        let floor_id = self
            .selected_building_id()
            .and_then(|bid| {
                self.facility
                    .layout
                    .floors_by_building(&bid)
                    .first()
                    .map(|f| f.id.clone())
            });
        let bay_id = floor_id.as_deref().and_then(|fid| {
            self.facility
                .layout
                .bays_by_floor(fid)
                .first()
                .map(|b| b.id.clone())
        });
        self.facility.layout.set_selected_floor(floor_id);
        self.facility.layout.set_selected_bay(bay_id);
        self.selected_spot = 0;
        self.table_row = 0;
    }

    // --- Layout view ------------------------------------------------------

    fn handle_layout_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.navigate_up(),
            KeyCode::Down | KeyCode::Char('j') => self.navigate_down(),
            KeyCode::Left | KeyCode::Char('h') => self.navigate_left(),
            KeyCode::Right | KeyCode::Char('l') => self.navigate_right(),
            KeyCode::Char('a') => self.add_in_focus(),
            KeyCode::Char('d') => self.delete_in_focus(),
            KeyCode::Char('t') => self.toggle_layout_spot(),
            _ => {}
        }
    }

    fn navigate_left(&mut self) {
        match self.focus_panel {
            FocusPanel::Spots => self.focus_panel = FocusPanel::Bays,
            FocusPanel::Bays => self.focus_panel = FocusPanel::Floors,
            FocusPanel::Floors => {}
        }
    }

    fn navigate_right(&mut self) {
        match self.focus_panel {
            FocusPanel::Floors => self.focus_panel = FocusPanel::Bays,
            FocusPanel::Bays => self.focus_panel = FocusPanel::Spots,
            FocusPanel::Spots => {}
        }
    }

    fn navigate_up(&mut self) {
        match self.focus_panel {
            FocusPanel::Floors => self.step_floor(-1),
            FocusPanel::Bays => self.step_bay(-1),
            FocusPanel::Spots => self.selected_spot = self.selected_spot.saturating_sub(1),
        }
    }

    fn navigate_down(&mut self) {
        match self.focus_panel {
            FocusPanel::Floors => self.step_floor(1),
            FocusPanel::Bays => self.step_bay(1),
            FocusPanel::Spots => {
                let count = self.visible_spots().len();
                if self.selected_spot + 1 < count {
                    self.selected_spot += 1;
                }
            }
        }
    }

    fn step_floor(&mut self, delta: i64) {
        let floors: Vec<String> = self.visible_floors().iter().map(|f| f.id.clone()).collect();
        if floors.is_empty() {
            return;
        }
        let current = self
            .facility
            .layout
            .selected_floor_id()
            .and_then(|id| floors.iter().position(|f| f == id));
        let next = step_index(current, floors.len(), delta);
        let floor_id = floors[next].clone();
        let bay_id = self
            .facility
            .layout
            .bays_by_floor(&floor_id)
            .first()
            .map(|b| b.id.clone());
        self.facility.layout.set_selected_floor(Some(floor_id));
        self.facility.layout.set_selected_bay(bay_id);
        self.selected_spot = 0;
    }

    fn step_bay(&mut self, delta: i64) {
        let Some(floor_id) = self.facility.layout.selected_floor_id().map(str::to_string) else {
            return;
        };
        let bays: Vec<String> = self
            .facility
            .layout
            .bays_by_floor(&floor_id)
            .iter()
            .map(|b| b.id.clone())
            .collect();
        if bays.is_empty() {
            return;
        }
        let current = self
            .facility
            .layout
            .selected_bay_id()
            .and_then(|id| bays.iter().position(|b| b == id));
        let next = step_index(current, bays.len(), delta);
        self.facility.layout.set_selected_bay(Some(bays[next].clone()));
        self.selected_spot = 0;
    }

    /// Add a floor/bay/spot under the current selection, numbered after the
    /// last sibling.
    fn add_in_focus(&mut self) {
        match self.focus_panel {
            FocusPanel::Floors => {
                let Some(building_id) = self.selected_building_id() else {
                    return;
                };
                let number = self
                    .facility
                    .layout
                    .floors_by_building(&building_id)
                    .last()
                    .map_or(1, |f| f.floor_number + 1);
                let id = self
                    .facility
                    .layout
                    .add_floor(FloorInput {
                        building_id,
                        floor_number: number,
                        description: None,
                    })
                    .id
                    .clone();
                self.facility.layout.set_selected_floor(Some(id));
                self.facility.layout.set_selected_bay(None);
                self.status_line = Some(format!("Added floor {number}"));
            }
            FocusPanel::Bays => {
                let Some(floor_id) = self.facility.layout.selected_floor_id().map(str::to_string)
                else {
                    return;
                };
                let number = self
                    .facility
                    .layout
                    .bays_by_floor(&floor_id)
                    .last()
                    .map_or(1, |b| b.bay_number + 1);
                let id = self
                    .facility
                    .layout
                    .add_bay(BayInput {
                        floor_id,
                        bay_number: number,
                        description: None,
                    })
                    .id
                    .clone();
                self.facility.layout.set_selected_bay(Some(id));
                self.status_line = Some(format!("Added bay {number}"));
            }
            FocusPanel::Spots => {
                let Some(bay_id) = self.facility.layout.selected_bay_id().map(str::to_string)
                else {
                    return;
                };
                let number = self
                    .facility
                    .layout
                    .spots_by_bay(&bay_id)
                    .last()
                    .map_or(1, |s| s.spot_number + 1);
                self.facility.layout.add_spot(SpotInput {
                    bay_id,
                    spot_number: number,
                    kind: SpotType::Standard,
                    status: SpotStatus::Available,
                    features: Vec::new(),
                });
                self.status_line = Some(format!("Added spot {number}"));
            }
        }
    }

    fn delete_in_focus(&mut self) {
        match self.focus_panel {
            FocusPanel::Floors => {
                if let Some(id) = self.facility.layout.selected_floor_id().map(str::to_string) {
                    self.facility.layout.delete_floor(&id);
                    self.selected_spot = 0;
                    self.status_line = Some("Deleted floor and its bays".to_string());
                }
            }
            FocusPanel::Bays => {
                if let Some(id) = self.facility.layout.selected_bay_id().map(str::to_string) {
                    self.facility.layout.delete_bay(&id);
                    self.selected_spot = 0;
                    self.status_line = Some("Deleted bay and its spots".to_string());
                }
            }
            FocusPanel::Spots => {
                if let Some(id) = self.layout_spot_id(self.selected_spot) {
                    self.facility.layout.delete_spot(&id);
                    self.selected_spot = self.selected_spot.saturating_sub(1);
                    self.status_line = Some("Deleted spot".to_string());
                }
            }
        }
    }

    fn toggle_layout_spot(&mut self) {
        if self.focus_panel != FocusPanel::Spots {
            return;
        }
        if let Some(id) = self.layout_spot_id(self.selected_spot) {
            self.facility.toggle_spot_status(&id);
        }
    }

    fn layout_spot_id(&self, index: usize) -> Option<String> {
        self.visible_spots().get(index).map(|s| s.id.clone())
    }

    // --- Spots view -------------------------------------------------------

    fn handle_spots_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.table_row = self.table_row.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                let count = self.filtered_spot_ids().len();
                if self.table_row + 1 < count {
                    self.table_row += 1;
                }
            }
            KeyCode::Char('s') => {
                let next = cycle_status(self.facility.spot_query.filters().status);
                self.facility.spot_query.set_status_filter(next);
                self.table_row = 0;
            }
            KeyCode::Char('y') => {
                let next = cycle_type(self.facility.spot_query.filters().kind);
                self.facility.spot_query.set_type_filter(next);
                self.table_row = 0;
            }
            KeyCode::Char('f') => {
                let next = cycle_feature(self.facility.spot_query.filters().feature);
                self.facility.spot_query.set_feature_filter(next);
                self.table_row = 0;
            }
            KeyCode::Char('r') => {
                self.facility.spot_query.reset_filters();
                self.table_row = 0;
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                self.input_buffer = self.facility.spot_query.filters().search.clone();
            }
            KeyCode::Char('t') => {
                if let Some(id) = self.filtered_spot_ids().get(self.table_row).cloned() {
                    self.facility.toggle_spot_status(&id);
                }
            }
            _ => {}
        }
    }

    fn filtered_spot_ids(&self) -> Vec<String> {
        let building_id = self.selected_building_id();
        self.facility
            .spot_query
            .filtered_spots(&self.facility.layout, building_id.as_deref())
            .iter()
            .map(|s| s.id.clone())
            .collect()
    }

    // --- Vehicles view ----------------------------------------------------

    fn handle_vehicles_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('i') => {
                self.input_mode = InputMode::CheckIn;
                self.input_buffer.clear();
            }
            KeyCode::Char('o') => {
                self.input_mode = InputMode::CheckOut;
                self.input_buffer.clear();
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::PlateLookup;
                self.input_buffer.clear();
            }
            _ => {}
        }
    }

    // --- Accessors used by the views --------------------------------------

    #[must_use]
    pub fn visible_floors(&self) -> Vec<&Floor> {
        match self.facility.buildings.selected_id() {
            Some(id) => self.facility.layout.floors_by_building(id),
            None => Vec::new(),
        }
    }

    #[must_use]
    pub fn visible_bays(&self) -> Vec<&Bay> {
        match self.facility.layout.selected_floor_id() {
            Some(id) => self.facility.layout.bays_by_floor(id),
            None => Vec::new(),
        }
    }

    #[must_use]
    pub fn visible_spots(&self) -> Vec<&Spot> {
        match self.facility.layout.selected_bay_id() {
            Some(id) => self.facility.layout.spots_by_bay(id),
            None => Vec::new(),
        }
    }

    #[must_use]
    pub fn filtered_spots(&self) -> Vec<&Spot> {
        let building_id = self.facility.buildings.selected_id();
        self.facility
            .spot_query
            .filtered_spots(&self.facility.layout, building_id)
    }
}

fn step_index(current: Option<usize>, len: usize, delta: i64) -> usize {
    match current {
        None => 0,
        Some(pos) => {
            if delta < 0 {
                pos.saturating_sub(1)
            } else {
                (pos + 1).min(len - 1)
            }
        }
    }
}

fn cycle_status(current: Option<SpotStatus>) -> Option<SpotStatus> {
    match current {
        None => Some(SpotStatus::Available),
        Some(SpotStatus::Available) => Some(SpotStatus::Occupied),
        Some(SpotStatus::Occupied) => Some(SpotStatus::Reserved),
        Some(SpotStatus::Reserved) => Some(SpotStatus::Maintenance),
        Some(SpotStatus::Maintenance) => None,
    }
}

fn cycle_type(current: Option<SpotType>) -> Option<SpotType> {
    match current {
        None => Some(SpotType::Standard),
        Some(SpotType::Standard) => Some(SpotType::Compact),
        Some(SpotType::Compact) => Some(SpotType::Oversized),
        Some(SpotType::Oversized) => None,
    }
}

fn cycle_feature(current: Option<SpotFeature>) -> Option<SpotFeature> {
    match current {
        None => Some(SpotFeature::EvCharging),
        Some(SpotFeature::EvCharging) => Some(SpotFeature::Handicap),
        Some(SpotFeature::Handicap) => Some(SpotFeature::Premium),
        Some(SpotFeature::Premium) => Some(SpotFeature::Covered),
        Some(SpotFeature::Covered) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_step_index_clamps_at_both_ends() {
        assert_eq!(step_index(None, 3, 1), 0);
        assert_eq!(step_index(Some(0), 3, -1), 0);
        assert_eq!(step_index(Some(2), 3, 1), 2);
        assert_eq!(step_index(Some(1), 3, 1), 2);
    }

    #[test]
    fn test_filter_cycles_pass_through_all_and_back_to_none() {
        let mut status = None;
        for _ in 0..5 {
            status = cycle_status(status);
        }
        assert_eq!(status, None);

        let mut feature = None;
        for _ in 0..5 {
            feature = cycle_feature(feature);
        }
        assert_eq!(feature, None);
    }
}
