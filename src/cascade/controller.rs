use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    boundary::{units_or_warn, AdminLevel, AdminUnit, BoundarySource, LookupRequest},
    error::{Error, Result, Warning},
};

use super::state::CascadeState;

/// Handle for an in-flight child-list fetch.
///
/// Carries the request and the generation of its level at the time it was
/// issued. `CascadeController::complete` drops results whose ticket no longer
/// matches the current generation and parent selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchTicket {
    pub request: LookupRequest,
    pub generation: u64,
}

/// District -> taluka -> village selection state machine.
#[derive(Debug, Default)]
pub struct CascadeController {
    state: CascadeState,
    generations: [u64; 3], // indexed by level: district, taluka, village
    warnings: Vec<Warning>,
}

impl CascadeController {
    /// Controller with no options loaded yet.
    pub fn empty() -> Self { Self::default() }

    /// Controller with the district list fetched once from `source`.
    pub fn new(source: &dyn BoundarySource) -> Self {
        let mut controller = Self::empty();
        controller.load_districts(source);
        controller
    }

    #[inline] pub fn state(&self) -> &CascadeState { &self.state }

    /// Drain the warnings queued by degraded fetches.
    pub fn take_warnings(&mut self) -> Vec<Warning> { std::mem::take(&mut self.warnings) }

    /// Start (re)loading the district list. Completing it resets every selection.
    pub fn begin_load_districts(&mut self) -> FetchTicket {
        let generation = self.bump(AdminLevel::District);
        FetchTicket { request: LookupRequest::Districts, generation }
    }

    /// Select a district (or clear it with `None`).
    ///
    /// Clears the taluka and village selections and both child lists, and
    /// invalidates any fetch still in flight below this level. Returns the
    /// taluka fetch to run, if a district was selected.
    pub fn begin_select_district(&mut self, code: Option<&str>) -> Result<Option<FetchTicket>> {
        let unit = self.resolve(AdminLevel::District, code)?;
        debug!(district = ?unit.as_ref().map(|u| u.code.as_str()), "select district");

        self.state.selected_district = unit;
        self.reset_below(AdminLevel::District);
        Ok(self.child_ticket(AdminLevel::District))
    }

    /// Select a taluka of the current district (or clear it with `None`).
    pub fn begin_select_taluka(&mut self, code: Option<&str>) -> Result<Option<FetchTicket>> {
        self.require_parent(AdminLevel::Taluka, code)?;
        let unit = self.resolve(AdminLevel::Taluka, code)?;
        debug!(taluka = ?unit.as_ref().map(|u| u.code.as_str()), "select taluka");

        self.state.selected_taluka = unit;
        self.reset_below(AdminLevel::Taluka);
        Ok(self.child_ticket(AdminLevel::Taluka))
    }

    /// Select a village of the current taluka (or clear it with `None`). Terminal level.
    pub fn select_village(&mut self, code: Option<&str>) -> Result<()> {
        self.require_parent(AdminLevel::Village, code)?;
        let unit = self.resolve(AdminLevel::Village, code)?;
        debug!(village = ?unit.as_ref().map(|u| u.code.as_str()), "select village");

        self.state.selected_village = unit;
        debug_assert!(self.state.check_invariants().is_ok(), "{:?}", self.state.check_invariants());
        Ok(())
    }

    /// Apply the outcome of a fetch started by one of the `begin_*` calls.
    ///
    /// Returns false when the ticket is stale (a newer selection superseded it)
    /// and the result was discarded. Errors on a current ticket degrade to an
    /// empty list plus a queued warning.
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<Vec<AdminUnit>>) -> bool {
        let level = ticket.request.level();
        if !self.is_current(ticket) {
            debug!(request = %ticket.request.describe(), generation = ticket.generation, "discarding stale lookup result");
            return false;
        }

        let units = units_or_warn(&ticket.request, result, &mut self.warnings);
        match level {
            AdminLevel::District => {
                self.state = CascadeState { districts: units, ..Default::default() };
                self.reset_below(AdminLevel::District);
            }
            AdminLevel::Taluka => self.state.talukas = units,
            AdminLevel::Village => self.state.villages = units,
        }
        // A ticket applies at most once.
        self.bump(level);

        debug_assert!(self.state.check_invariants().is_ok(), "{:?}", self.state.check_invariants());
        true
    }

    /// Whether `ticket` is still the latest fetch for the current parent selection.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        let level = ticket.request.level();
        if ticket.generation != self.generations[index(level)] {
            return false;
        }
        match (level.parent(), ticket.request.parent_code()) {
            (None, None) => true,
            (Some(parent), Some(code)) => self.state.selected(parent).is_some_and(|u| u.code == code),
            _ => false,
        }
    }

    /// Load the district list synchronously.
    pub fn load_districts(&mut self, source: &dyn BoundarySource) {
        let ticket = self.begin_load_districts();
        self.run(Some(ticket), source);
    }

    /// Select a district and fetch its talukas synchronously.
    pub fn select_district(&mut self, code: Option<&str>, source: &dyn BoundarySource) -> Result<()> {
        let ticket = self.begin_select_district(code)?;
        self.run(ticket, source);
        Ok(())
    }

    /// Select a taluka and fetch its villages synchronously.
    pub fn select_taluka(&mut self, code: Option<&str>, source: &dyn BoundarySource) -> Result<()> {
        let ticket = self.begin_select_taluka(code)?;
        self.run(ticket, source);
        Ok(())
    }

    pub fn select_district_by_name(&mut self, name: &str, source: &dyn BoundarySource) -> Result<()> {
        let code = self.code_for_name(AdminLevel::District, name)?;
        self.select_district(Some(&code), source)
    }

    pub fn select_taluka_by_name(&mut self, name: &str, source: &dyn BoundarySource) -> Result<()> {
        let code = self.code_for_name(AdminLevel::Taluka, name)?;
        self.select_taluka(Some(&code), source)
    }

    pub fn select_village_by_name(&mut self, name: &str) -> Result<()> {
        let code = self.code_for_name(AdminLevel::Village, name)?;
        self.select_village(Some(&code))
    }

    fn run(&mut self, ticket: Option<FetchTicket>, source: &dyn BoundarySource) {
        if let Some(ticket) = ticket {
            let result = source.fetch(&ticket.request);
            self.complete(&ticket, result);
        }
    }

    fn resolve(&self, level: AdminLevel, code: Option<&str>) -> Result<Option<AdminUnit>> {
        match code {
            None => Ok(None),
            Some(code) => self.state.find(level, code)
                .cloned()
                .map(Some)
                .ok_or_else(|| Error::invalid_selection(level, code, "not among the current options")),
        }
    }

    fn require_parent(&self, level: AdminLevel, code: Option<&str>) -> Result<()> {
        match level.parent() {
            Some(parent) if self.state.selected(parent).is_none() => Err(Error::invalid_selection(
                level,
                code.unwrap_or_default(),
                match parent {
                    AdminLevel::District => "no district selected",
                    _ => "no taluka selected",
                },
            )),
            _ => Ok(()),
        }
    }

    fn code_for_name(&self, level: AdminLevel, name: &str) -> Result<String> {
        self.state.find_by_name(level, name)
            .map(|u| u.code.clone())
            .ok_or_else(|| Error::invalid_selection(level, name, "no option with this name"))
    }

    /// Clear every selection and list below `level`, superseding in-flight fetches there.
    fn reset_below(&mut self, level: AdminLevel) {
        let mut next = level.child();
        while let Some(child) = next {
            self.bump(child);
            match child {
                AdminLevel::District => {}
                AdminLevel::Taluka => {
                    self.state.selected_taluka = None;
                    self.state.talukas.clear();
                }
                AdminLevel::Village => {
                    self.state.selected_village = None;
                    self.state.villages.clear();
                }
            }
            next = child.child();
        }
    }

    fn child_ticket(&self, level: AdminLevel) -> Option<FetchTicket> {
        let child = level.child()?;
        let code = self.state.selected(level)?.code.clone();
        let request = match child {
            AdminLevel::Taluka => LookupRequest::Talukas { district: code },
            AdminLevel::Village => LookupRequest::Villages { taluka: code },
            AdminLevel::District => return None,
        };
        Some(FetchTicket { request, generation: self.generations[index(child)] })
    }

    fn bump(&mut self, level: AdminLevel) -> u64 {
        let slot = &mut self.generations[index(level)];
        *slot += 1;
        *slot
    }
}

#[inline]
fn index(level: AdminLevel) -> usize {
    match level {
        AdminLevel::District => 0,
        AdminLevel::Taluka => 1,
        AdminLevel::Village => 2,
    }
}
