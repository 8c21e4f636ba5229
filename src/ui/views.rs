use crate::model::{Spot, SpotStatus};
use crate::report;
use crate::service::filter::occupancy_counts;
use crate::ui::app::{App, FocusPanel, InputMode};
use chrono::{Local, NaiveTime};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, Paragraph, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table,
    },
    Frame,
};

const HEADER_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);
const SELECTED_STYLE: Style = Style::new()
    .bg(Color::DarkGray)
    .add_modifier(Modifier::BOLD);
const FOCUS_BORDER: Style = Style::new().fg(Color::Cyan);
const MUTED: Style = Style::new().fg(Color::Gray);

fn status_color(status: SpotStatus) -> Color {
    match status {
        SpotStatus::Available => Color::Green,
        SpotStatus::Occupied => Color::Red,
        SpotStatus::Reserved => Color::Yellow,
        SpotStatus::Maintenance => Color::DarkGray,
    }
}

fn frame_chunks(frame: &Frame) -> [Rect; 3] {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(3),
    ])
    .split(frame.area());
    [chunks[0], chunks[1], chunks[2]]
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App, view_name: &str) {
    let building = app
        .facility
        .buildings
        .selected()
        .map_or("no building".to_string(), |b| b.name.clone());
    let title = format!(" {} | {} | {} ", app.facility.name, building, view_name);
    let header = Paragraph::new(title)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

/// Footer shows the active prompt while typing, otherwise the last action
/// result, otherwise the key help.
fn draw_footer(frame: &mut Frame, area: Rect, app: &App, help: &str) {
    let text = match app.input_mode {
        InputMode::CheckIn => format!(" Check in plate: {}_", app.input_buffer),
        InputMode::CheckOut => format!(" Check out plate: {}_", app.input_buffer),
        InputMode::PlateLookup => format!(" Find plate: {}_", app.input_buffer),
        InputMode::Search => format!(" Search spots: {}_", app.input_buffer),
        InputMode::Normal => match &app.status_line {
            Some(status) => format!(" {status} "),
            None => help.to_string(),
        },
    };
    let footer = Paragraph::new(text)
        .style(MUTED)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

// --- Dashboard --------------------------------------------------------------

pub fn draw_dashboard(frame: &mut Frame, app: &App) {
    let [header, main, footer] = frame_chunks(frame);
    draw_header(frame, header, app, "Dashboard");

    let columns = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main);
    draw_building_list(frame, columns[0], app);

    let right = Layout::vertical([Constraint::Length(8), Constraint::Min(6)]).split(columns[1]);
    draw_summary(frame, right[0], app);
    draw_recent_activity(frame, right[1], app);

    draw_footer(
        frame,
        footer,
        app,
        " b Building | 1-4 Views | Tab Next View | q Quit ",
    );
}

fn draw_building_list(frame: &mut Frame, area: Rect, app: &App) {
    let selected_id = app.facility.buildings.selected_id();
    let items: Vec<ListItem> = app
        .facility
        .buildings
        .buildings()
        .iter()
        .map(|building| {
            let counts = occupancy_counts(&app.facility.layout, &building.id);
            let is_selected = Some(building.id.as_str()) == selected_id;
            let style = if is_selected {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(building.name.clone(), style),
                Span::styled(
                    format!(" {}/{} occupied", counts.occupied, counts.total()),
                    MUTED,
                ),
            ]))
        })
        .collect();

    let title = format!(" Buildings ({}) ", app.facility.buildings.buildings().len());
    let list = List::new(items).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn draw_summary(frame: &mut Frame, area: Rect, app: &App) {
    let Some(building_id) = app.selected_building_id() else {
        let empty = Paragraph::new("No building selected")
            .block(Block::default().title(" Summary ").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let counts = occupancy_counts(&app.facility.layout, &building_id);
    let now = Local::now();
    let midnight = now.with_time(NaiveTime::MIN).earliest().unwrap_or(now);
    let revenue_today = report::revenue_between(&app.facility.ledger, midnight, now);
    let check_ins_today = app
        .facility
        .ledger
        .todays_check_ins_at(&building_id, now)
        .len();

    let lines = vec![
        Line::from(vec![
            Span::styled("Available ", Style::default().fg(Color::Green)),
            Span::raw(counts.available.to_string()),
            Span::styled("   Occupied ", Style::default().fg(Color::Red)),
            Span::raw(counts.occupied.to_string()),
            Span::styled("   Reserved ", Style::default().fg(Color::Yellow)),
            Span::raw(counts.reserved.to_string()),
            Span::styled("   Maintenance ", MUTED),
            Span::raw(counts.maintenance.to_string()),
        ]),
        Line::from(format!("Occupancy rate: {}%", counts.occupancy_rate())),
        Line::from(format!("Check-ins today: {check_ins_today}")),
        Line::from(format!("Revenue today: {revenue_today}")),
        Line::from(format!(
            "Active vehicles: {}",
            app.facility.ledger.active_cars().len()
        )),
    ];

    let summary =
        Paragraph::new(lines).block(Block::default().title(" Summary ").borders(Borders::ALL));
    frame.render_widget(summary, area);
}

fn draw_recent_activity(frame: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = match app.selected_building_id() {
        Some(building_id) => app
            .facility
            .ledger
            .recent_activity(&building_id, 10)
            .iter()
            .map(|record| {
                let action = if record.check_out_time.is_some() {
                    Span::styled("check-out", Style::default().fg(Color::Yellow))
                } else {
                    Span::styled("check-in", Style::default().fg(Color::Green))
                };
                Row::new(vec![
                    Line::from(record.license_plate.clone()),
                    Line::from(action),
                    Line::from(record.activity_time().format("%H:%M").to_string()),
                    Line::from(record.spot_id.clone()),
                ])
            })
            .collect(),
        None => Vec::new(),
    };

    let header = Row::new(vec!["Plate", "Action", "Time", "Spot"]).style(HEADER_STYLE);
    let widths = [
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(20),
        Constraint::Percentage(30),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(" Recent Activity ").borders(Borders::ALL));
    frame.render_widget(table, area);
}

// --- Layout browser ---------------------------------------------------------

pub fn draw_layout(frame: &mut Frame, app: &App) {
    let [header, main, footer] = frame_chunks(frame);
    draw_header(frame, header, app, "Layout");

    let columns = Layout::horizontal([
        Constraint::Percentage(20),
        Constraint::Percentage(25),
        Constraint::Percentage(55),
    ])
    .split(main);

    draw_floor_panel(frame, columns[0], app);
    draw_bay_panel(frame, columns[1], app);
    draw_spot_panel(frame, columns[2], app);

    draw_footer(
        frame,
        footer,
        app,
        " ←→ Panel | ↑↓ Select | a Add | d Delete | t Toggle Spot | q Quit ",
    );
}

fn panel_border(focused: bool) -> Style {
    if focused {
        FOCUS_BORDER
    } else {
        Style::default()
    }
}

fn draw_floor_panel(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Floors;
    let selected = app.facility.layout.selected_floor_id();

    let items: Vec<ListItem> = app
        .visible_floors()
        .iter()
        .map(|floor| {
            let is_selected = Some(floor.id.as_str()) == selected;
            let style = if is_selected && is_focused {
                SELECTED_STYLE
            } else if is_selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = vec![Span::styled(format!("Floor {}", floor.floor_number), style)];
            if let Some(description) = &floor.description {
                spans.push(Span::styled(format!(" {description}"), MUTED));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" Floors ({}) ", app.visible_floors().len());
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(panel_border(is_focused)),
    );
    frame.render_widget(list, area);
}

fn draw_bay_panel(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Bays;
    let selected = app.facility.layout.selected_bay_id();

    let items: Vec<ListItem> = app
        .visible_bays()
        .iter()
        .map(|bay| {
            let is_selected = Some(bay.id.as_str()) == selected;
            let style = if is_selected && is_focused {
                SELECTED_STYLE
            } else if is_selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let spot_count = app.facility.layout.spots_by_bay(&bay.id).len();
            ListItem::new(Line::from(vec![
                Span::styled(format!("Bay {}", bay.bay_number), style),
                Span::styled(format!(" ({spot_count})"), MUTED),
            ]))
        })
        .collect();

    let title = format!(" Bays ({}) ", app.visible_bays().len());
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(panel_border(is_focused)),
    );
    frame.render_widget(list, area);
}

fn spot_row(spot: &Spot, style: Style) -> Row<'static> {
    let features = spot
        .features
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Row::new(vec![
        Line::from(spot.spot_number.to_string()),
        Line::from(spot.kind.to_string()),
        Line::from(Span::styled(
            spot.status.to_string(),
            Style::default().fg(status_color(spot.status)),
        )),
        Line::from(features),
    ])
    .style(style)
}

fn draw_spot_panel(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Spots;
    let spots = app.visible_spots();

    let visible_rows = (area.height as usize).saturating_sub(3);
    let scroll_offset = if app.selected_spot >= visible_rows {
        app.selected_spot - visible_rows + 1
    } else {
        0
    };

    let rows: Vec<Row> = spots
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_rows)
        .map(|(i, spot)| {
            let style = if i == app.selected_spot && is_focused {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            spot_row(spot, style)
        })
        .collect();

    let header = Row::new(vec!["Spot", "Type", "Status", "Features"]).style(HEADER_STYLE);
    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(20),
        Constraint::Percentage(25),
        Constraint::Percentage(45),
    ];
    let title = format!(" Spots ({}) ", spots.len());
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(panel_border(is_focused)),
    );
    frame.render_widget(table, area);

    if spots.len() > visible_rows {
        draw_scrollbar(frame, area, spots.len(), app.selected_spot);
    }
}

fn draw_scrollbar(frame: &mut Frame, area: Rect, total: usize, position: usize) {
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"));
    let mut state = ScrollbarState::new(total).position(position);
    let scrollbar_area = Rect {
        x: area.x + area.width - 1,
        y: area.y + 2,
        width: 1,
        height: area.height.saturating_sub(3),
    };
    frame.render_stateful_widget(scrollbar, scrollbar_area, &mut state);
}

// --- Spot management --------------------------------------------------------

pub fn draw_spots(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(3),
    ])
    .split(frame.area());

    draw_header(frame, chunks[0], app, "Spot Management");
    draw_filter_bar(frame, chunks[1], app);
    draw_spot_table(frame, chunks[2], app);
    draw_footer(
        frame,
        chunks[3],
        app,
        " s Status | y Type | f Feature | / Search | r Reset | t Toggle | q Quit ",
    );
}

fn draw_filter_bar(frame: &mut Frame, area: Rect, app: &App) {
    let filters = app.facility.spot_query.filters();
    let counts = match app.selected_building_id() {
        Some(id) => app.facility.spot_query.status_counts(&app.facility.layout, &id),
        None => Default::default(),
    };

    let fmt_opt = |label: &str, value: Option<String>| {
        format!("{label}: {}", value.unwrap_or_else(|| "all".to_string()))
    };
    let text = format!(
        " {} | {} | {} | search: {} || {} available, {} occupied, {} reserved, {} maintenance ",
        fmt_opt("status", filters.status.map(|s| s.to_string())),
        fmt_opt("type", filters.kind.map(|k| k.to_string())),
        fmt_opt("feature", filters.feature.map(|f| f.to_string())),
        if filters.search.is_empty() {
            "-"
        } else {
            filters.search.as_str()
        },
        counts.available,
        counts.occupied,
        counts.reserved,
        counts.maintenance,
    );

    let bar = Paragraph::new(text).block(Block::default().title(" Filters ").borders(Borders::ALL));
    frame.render_widget(bar, area);
}

fn draw_spot_table(frame: &mut Frame, area: Rect, app: &App) {
    let spots = app.filtered_spots();

    let visible_rows = (area.height as usize).saturating_sub(3);
    let scroll_offset = if app.table_row >= visible_rows {
        app.table_row - visible_rows + 1
    } else {
        0
    };

    let rows: Vec<Row> = spots
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_rows)
        .map(|(i, spot)| {
            let features = spot
                .features
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            let style = if i == app.table_row {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            Row::new(vec![
                Line::from(spot.id.clone()),
                Line::from(spot.spot_number.to_string()),
                Line::from(spot.kind.to_string()),
                Line::from(Span::styled(
                    spot.status.to_string(),
                    Style::default().fg(status_color(spot.status)),
                )),
                Line::from(features),
                Line::from(spot.last_updated.format("%m-%d %H:%M").to_string()),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec!["Id", "Spot", "Type", "Status", "Features", "Updated"])
        .style(HEADER_STYLE);
    let widths = [
        Constraint::Percentage(20),
        Constraint::Length(6),
        Constraint::Percentage(14),
        Constraint::Percentage(16),
        Constraint::Percentage(28),
        Constraint::Percentage(16),
    ];
    let title = format!(" Spots ({}) ", spots.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);

    if spots.len() > visible_rows {
        draw_scrollbar(frame, area, spots.len(), app.table_row);
    }
}

// --- Vehicles ---------------------------------------------------------------

pub fn draw_vehicles(frame: &mut Frame, app: &App) {
    let [header, main, footer] = frame_chunks(frame);
    draw_header(frame, header, app, "Vehicles");

    let columns = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main);
    draw_active_cars(frame, columns[0], app);
    draw_history(frame, columns[1], app);

    draw_footer(
        frame,
        footer,
        app,
        " i Check In | o Check Out | / Find Plate | q Quit ",
    );
}

fn draw_active_cars(frame: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = app
        .facility
        .ledger
        .active_cars()
        .iter()
        .map(|car| {
            Row::new(vec![
                Line::from(car.license_plate.clone()),
                Line::from(car.spot_id.clone().unwrap_or_default()),
                Line::from(car.check_in_time.format("%m-%d %H:%M").to_string()),
            ])
        })
        .collect();

    let header = Row::new(vec!["Plate", "Spot", "Checked In"]).style(HEADER_STYLE);
    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(35),
        Constraint::Percentage(35),
    ];
    let title = format!(" Active Vehicles ({}) ", app.facility.ledger.active_cars().len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn draw_history(frame: &mut Frame, area: Rect, app: &App) {
    let (title, rows): (String, Vec<Row>) = match &app.history_plate {
        Some(plate) => {
            let rows = app
                .facility
                .ledger
                .parking_history(plate)
                .iter()
                .map(|record| {
                    let check_out = record
                        .check_out_time
                        .map_or("-".to_string(), |t| t.format("%m-%d %H:%M").to_string());
                    let fee = record.fee.map_or("-".to_string(), |f| f.to_string());
                    Row::new(vec![
                        Line::from(record.check_in_time.format("%m-%d %H:%M").to_string()),
                        Line::from(check_out),
                        Line::from(record.spot_id.clone()),
                        Line::from(fee),
                    ])
                })
                .collect();
            (format!(" History: {plate} "), rows)
        }
        None => (" History (find a plate with /) ".to_string(), Vec::new()),
    };

    let header = Row::new(vec!["Check In", "Check Out", "Spot", "Fee"]).style(HEADER_STYLE);
    let widths = [
        Constraint::Percentage(28),
        Constraint::Percentage(28),
        Constraint::Percentage(28),
        Constraint::Percentage(16),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}
