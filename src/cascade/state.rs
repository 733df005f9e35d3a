use serde::Serialize;

use crate::boundary::{AdminLevel, AdminUnit, BoundingBox};

/// Three-level selection plus the option lists it was made from.
///
/// Every selected unit is an element of its list, and a child list is only
/// ever non-empty while its parent is selected. Mutated only through
/// `CascadeController`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CascadeState {
    pub(crate) districts: Vec<AdminUnit>,
    pub(crate) selected_district: Option<AdminUnit>,
    pub(crate) talukas: Vec<AdminUnit>,
    pub(crate) selected_taluka: Option<AdminUnit>,
    pub(crate) villages: Vec<AdminUnit>,
    pub(crate) selected_village: Option<AdminUnit>,
}

impl CascadeState {
    #[inline] pub fn districts(&self) -> &[AdminUnit] { &self.districts }
    #[inline] pub fn talukas(&self) -> &[AdminUnit] { &self.talukas }
    #[inline] pub fn villages(&self) -> &[AdminUnit] { &self.villages }

    #[inline] pub fn selected_district(&self) -> Option<&AdminUnit> { self.selected_district.as_ref() }
    #[inline] pub fn selected_taluka(&self) -> Option<&AdminUnit> { self.selected_taluka.as_ref() }
    #[inline] pub fn selected_village(&self) -> Option<&AdminUnit> { self.selected_village.as_ref() }

    /// Current option list for `level`.
    pub fn options(&self, level: AdminLevel) -> &[AdminUnit] {
        match level {
            AdminLevel::District => &self.districts,
            AdminLevel::Taluka => &self.talukas,
            AdminLevel::Village => &self.villages,
        }
    }

    /// Current selection at `level`.
    pub fn selected(&self, level: AdminLevel) -> Option<&AdminUnit> {
        match level {
            AdminLevel::District => self.selected_district.as_ref(),
            AdminLevel::Taluka => self.selected_taluka.as_ref(),
            AdminLevel::Village => self.selected_village.as_ref(),
        }
    }

    /// Look up an option by code in the current list for `level`.
    pub fn find(&self, level: AdminLevel, code: &str) -> Option<&AdminUnit> {
        self.options(level).iter().find(|u| u.code == code)
    }

    /// Look up an option by display name in the current list for `level`.
    /// Names are not guaranteed unique; the first match wins, as in a select box.
    pub fn find_by_name(&self, level: AdminLevel, name: &str) -> Option<&AdminUnit> {
        self.options(level).iter().find(|u| u.name == name)
    }

    /// Deepest selected level, if any.
    pub fn depth(&self) -> Option<AdminLevel> {
        AdminLevel::ALL.into_iter().rev().find(|&level| self.selected(level).is_some())
    }

    /// Extent of the deepest selection, for fitting the map view.
    pub fn focus_bounds(&self) -> Option<BoundingBox> {
        self.depth().and_then(|level| self.selected(level)).map(|u| u.bbox)
    }

    /// Check the structural invariants, describing the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        for level in AdminLevel::ALL {
            if let Some(unit) = self.selected(level) {
                if !self.options(level).contains(unit) {
                    return Err(format!("selected {level} {unit} is not in the current {}", level.plural()));
                }
            }
            if let Some(parent) = level.parent() {
                if self.selected(parent).is_none() {
                    if self.selected(level).is_some() {
                        return Err(format!("{level} selected without a {parent}"));
                    }
                    if !self.options(level).is_empty() {
                        return Err(format!("{} listed without a selected {parent}", level.plural()));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(level: AdminLevel, code: &str, name: &str) -> AdminUnit {
        AdminUnit::new(level, code, name, BoundingBox::new(0.0, 1.0, 0.0, 1.0))
    }

    #[test]
    fn default_state_is_empty_and_consistent() {
        let state = CascadeState::default();
        assert!(state.districts().is_empty());
        assert_eq!(state.depth(), None);
        assert_eq!(state.focus_bounds(), None);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn focus_follows_deepest_selection() {
        let pune = AdminUnit::new(AdminLevel::District, "01", "Pune", BoundingBox::new(73.0, 75.0, 18.0, 19.0));
        let haveli = AdminUnit::new(AdminLevel::Taluka, "0101", "Haveli", BoundingBox::new(73.5, 74.5, 18.2, 18.8));
        let mut state = CascadeState {
            districts: vec![pune.clone()],
            selected_district: Some(pune.clone()),
            ..Default::default()
        };
        assert_eq!(state.depth(), Some(AdminLevel::District));
        assert_eq!(state.focus_bounds(), Some(pune.bbox));

        state.talukas = vec![haveli.clone()];
        state.selected_taluka = Some(haveli.clone());
        assert_eq!(state.depth(), Some(AdminLevel::Taluka));
        assert_eq!(state.focus_bounds(), Some(haveli.bbox));
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn invariants_catch_selection_outside_list() {
        let state = CascadeState {
            districts: vec![unit(AdminLevel::District, "01", "Pune")],
            selected_district: Some(unit(AdminLevel::District, "02", "Satara")),
            ..Default::default()
        };
        assert!(state.check_invariants().is_err());
    }

    #[test]
    fn invariants_catch_orphaned_children() {
        let state = CascadeState {
            districts: vec![unit(AdminLevel::District, "01", "Pune")],
            talukas: vec![unit(AdminLevel::Taluka, "0101", "Haveli")],
            ..Default::default()
        };
        let err = state.check_invariants().unwrap_err();
        assert!(err.contains("talukas listed without a selected district"), "{err}");
    }

    #[test]
    fn find_by_code_and_name() {
        let state = CascadeState {
            districts: vec![unit(AdminLevel::District, "01", "Pune"), unit(AdminLevel::District, "02", "Satara")],
            ..Default::default()
        };
        assert_eq!(state.find(AdminLevel::District, "02").map(|u| u.name.as_str()), Some("Satara"));
        assert_eq!(state.find_by_name(AdminLevel::District, "Pune").map(|u| u.code.as_str()), Some("01"));
        assert!(state.find(AdminLevel::District, "03").is_none());
        assert!(state.find(AdminLevel::Taluka, "01").is_none());
    }
}
