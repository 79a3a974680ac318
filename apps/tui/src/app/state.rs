use precinct_map_tui::api::DataService;
use precinct_map_tui::config::AppConfig;
use precinct_map_tui::districts::{DistrictLoader, DistrictOption};
use precinct_map_tui::domain::FilterSnapshot;
use precinct_map_tui::export::ExportTrigger;
use precinct_map_tui::filters::FilterStore;
use precinct_map_tui::map::{MapSync, Viewport};
use precinct_map_tui::selection::Selection;
use std::sync::Arc;
use throbber_widgets_tui::ThrobberState;

use super::input::helpers::{step_clamped, wrap_decrement, wrap_increment};

pub const YOUTH_RANGE: (f64, f64) = (0.0, 0.5);
pub const MARGIN_RANGE: (f64, f64) = (-0.5, 0.5);
pub const SLIDER_STEP: f64 = 0.01;

/// Sidebar control that Left/Right adjusts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarField {
    District,
    YouthMin,
    MarginFloor,
}

impl SidebarField {
    pub const ALL: [Self; 3] = [Self::District, Self::YouthMin, Self::MarginFloor];

    const fn index(self) -> usize {
        match self {
            Self::District => 0,
            Self::YouthMin => 1,
            Self::MarginFloor => 2,
        }
    }

    pub const fn next(self) -> Self {
        Self::ALL[wrap_increment(self.index(), Self::ALL.len())]
    }

    pub const fn prev(self) -> Self {
        Self::ALL[wrap_decrement(self.index(), Self::ALL.len())]
    }
}

pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub status_message: String,
    pub focus: SidebarField,
    pub config: AppConfig,
    pub filters: FilterStore,
    pub map: MapSync,
    pub viewport: Viewport,
    pub selection: Selection,
    pub districts: DistrictLoader,
    pub export: ExportTrigger,
    pub service: Arc<dyn DataService>,
    pub throbber: ThrobberState,
}

impl App {
    pub fn new(config: AppConfig, initial: FilterSnapshot, service: Arc<dyn DataService>) -> Self {
        let filters = FilterStore::new(initial);
        let map = MapSync::new(Arc::clone(&service), filters.subscribe());
        let export = ExportTrigger::new(&config.api_url, precinct_map_tui::export::SystemBrowser);

        Self {
            running: true,
            show_help: false,
            status_message: String::new(),
            focus: SidebarField::District,
            config,
            filters,
            map,
            viewport: Viewport::default(),
            selection: Selection::default(),
            districts: DistrictLoader::new(),
            export,
            service,
            throbber: ThrobberState::default(),
        }
    }

    /// Kick off the district load and mount the map.
    pub fn start(&mut self) {
        self.districts.ensure_started(&self.service);
        self.map.mount();
    }

    /// Per-frame housekeeping: collect finished fetches and advance the spinner.
    pub fn update(&mut self) {
        self.districts.tick();
        self.map.tick();

        if let Some(err) = self.map.take_failure() {
            self.status_message = format!("Error: {err}");
        }

        if self.map.is_loading() {
            self.throbber.calc_next();
        }
    }

    pub fn district_options(&self) -> Vec<DistrictOption> {
        self.districts.options()
    }

    /// Label of the live district choice, as shown in the selector.
    pub fn live_district_label(&self) -> String {
        let live = self.filters.live().district;
        self.district_options()
            .into_iter()
            .find(|option| option.value == live)
            .map_or_else(
                || live.map_or_else(String::new, precinct_map_tui::format::district),
                |option| option.label,
            )
    }

    /// Move the focused control one step. `forward` is Right.
    pub fn adjust_focused(&mut self, forward: bool) {
        let direction = if forward { 1.0 } else { -1.0 };
        let live = *self.filters.live();

        match self.focus {
            SidebarField::District => self.cycle_district(forward),
            SidebarField::YouthMin => self.filters.set_youth_min(step_clamped(
                live.youth_min,
                direction * SLIDER_STEP,
                YOUTH_RANGE,
            )),
            SidebarField::MarginFloor => self.filters.set_margin_floor(step_clamped(
                live.margin_floor,
                direction * SLIDER_STEP,
                MARGIN_RANGE,
            )),
        }
    }

    fn cycle_district(&mut self, forward: bool) {
        let options = self.district_options();
        let current = self.filters.live().district;
        let index = options
            .iter()
            .position(|option| option.value == current)
            .unwrap_or(0);

        let next = if forward {
            wrap_increment(index, options.len())
        } else {
            wrap_decrement(index, options.len())
        };

        if let Some(option) = options.get(next) {
            self.filters.set_district(option.value);
        }
    }

    pub fn apply_filters(&mut self) {
        self.status_message = if self.filters.apply_filters() {
            "Filters applied".to_string()
        } else {
            "Filters unchanged".to_string()
        };
    }

    pub fn export_csv(&mut self) {
        self.status_message = match self.export.trigger(&self.filters) {
            Ok(url) => format!("Opened export: {url}"),
            Err(err) => format!("Error: {err}"),
        };
    }

    /// Drop the map and build it again from the applied filters.
    pub fn remount_map(&mut self) {
        self.map.teardown();
        self.map.mount();
        self.status_message = "Map reloaded".to_string();
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}
