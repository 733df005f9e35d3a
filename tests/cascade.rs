// Integration tests for the district -> taluka -> village cascade:
//   transitions, invariants after arbitrary walks, stale-fetch rejection and
//   degraded lookups.

mod common;

use common::FakeSource;
use ndvi_aoi::{AdminLevel, BoundarySource, CascadeController, Error, LookupRequest};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn codes(units: &[ndvi_aoi::AdminUnit]) -> Vec<&str> {
    units.iter().map(|u| u.code.as_str()).collect()
}

#[test]
fn selecting_pune_then_haveli_fetches_each_child_list() {
    let source = FakeSource::new();
    let mut cascade = CascadeController::new(&source);
    cascade.select_district_by_name("Pune", &source).unwrap();
    cascade.select_taluka_by_name("Haveli", &source).unwrap();

    assert_eq!(source.requests(), vec![
        LookupRequest::Districts,
        LookupRequest::Talukas { district: "01".into() },
        LookupRequest::Villages { taluka: "0101".into() },
    ]);
    assert_eq!(codes(cascade.state().villages()), vec!["0101001", "0101002"]);
}

#[test]
fn selecting_a_district_empties_villages_from_a_previous_district() {
    let source = FakeSource::new();
    let mut cascade = CascadeController::new(&source);
    cascade.select_district(Some("01"), &source).unwrap();
    cascade.select_taluka(Some("0101"), &source).unwrap();
    cascade.select_village(Some("0101002")).unwrap();

    cascade.select_district(Some("02"), &source).unwrap();

    let state = cascade.state();
    assert_eq!(state.selected_district().map(|u| u.code.as_str()), Some("02"));
    assert!(state.selected_taluka().is_none());
    assert!(state.selected_village().is_none());
    assert!(state.villages().is_empty());
    assert_eq!(codes(state.talukas()), vec!["0201", "0202"]);
    assert!(state.check_invariants().is_ok());
}

#[test]
fn reselecting_the_same_district_refetches_and_resets() {
    let source = FakeSource::new();
    let mut cascade = CascadeController::new(&source);
    cascade.select_district(Some("01"), &source).unwrap();
    cascade.select_taluka(Some("0102"), &source).unwrap();
    cascade.select_district(Some("01"), &source).unwrap();

    assert!(cascade.state().selected_taluka().is_none());
    let talukas_requests = source.requests().iter()
        .filter(|r| matches!(r, LookupRequest::Talukas { .. }))
        .count();
    assert_eq!(talukas_requests, 2);
}

#[test]
fn late_response_for_previous_district_is_discarded() {
    let source = FakeSource::new();
    let mut cascade = CascadeController::new(&source);

    let for_pune = cascade.begin_select_district(Some("01")).unwrap().unwrap();
    let for_satara = cascade.begin_select_district(Some("02")).unwrap().unwrap();

    // Satara's talukas arrive first, then Pune's stale answer.
    assert!(cascade.complete(&for_satara, source.fetch(&for_satara.request)));
    assert!(!cascade.complete(&for_pune, source.fetch(&for_pune.request)));

    assert_eq!(cascade.state().selected_district().map(|u| u.code.as_str()), Some("02"));
    assert_eq!(codes(cascade.state().talukas()), vec!["0201", "0202"]);
}

#[test]
fn stale_response_is_discarded_even_if_it_arrives_before_the_current_one() {
    let source = FakeSource::new();
    let mut cascade = CascadeController::new(&source);
    cascade.select_district(Some("01"), &source).unwrap();

    let for_haveli = cascade.begin_select_taluka(Some("0101")).unwrap().unwrap();
    let for_mulshi = cascade.begin_select_taluka(Some("0102")).unwrap().unwrap();

    assert!(!cascade.complete(&for_haveli, source.fetch(&for_haveli.request)));
    assert!(cascade.state().villages().is_empty());

    assert!(cascade.complete(&for_mulshi, source.fetch(&for_mulshi.request)));
    assert_eq!(codes(cascade.state().villages()), vec!["0102001", "0102002"]);
}

#[test]
fn unknown_or_stale_codes_are_rejected_without_changing_state() {
    let source = FakeSource::new();
    let mut cascade = CascadeController::new(&source);

    // No district yet: a taluka cannot be chosen.
    let err = cascade.select_taluka(Some("0101"), &source).unwrap_err();
    assert!(matches!(err, Error::InvalidSelection { level: AdminLevel::Taluka, .. }));

    cascade.select_district(Some("01"), &source).unwrap();
    cascade.select_taluka(Some("0101"), &source).unwrap();
    let before = cascade.state().clone();

    // Satara's taluka is not in Pune's list.
    assert!(matches!(
        cascade.select_taluka(Some("0201"), &source),
        Err(Error::InvalidSelection { .. })
    ));
    // A village of a different taluka.
    assert!(matches!(
        cascade.select_village(Some("0102001")),
        Err(Error::InvalidSelection { level: AdminLevel::Village, .. })
    ));
    assert!(matches!(
        cascade.select_district(Some("99"), &source),
        Err(Error::InvalidSelection { level: AdminLevel::District, .. })
    ));
    assert_eq!(cascade.state(), &before);
}

#[test]
fn village_without_a_taluka_is_rejected() {
    let source = FakeSource::new();
    let mut cascade = CascadeController::new(&source);
    cascade.select_district(Some("01"), &source).unwrap();
    let before = cascade.state().clone();

    let err = cascade.select_village(Some("0101001")).unwrap_err();
    assert!(matches!(err, Error::InvalidSelection { level: AdminLevel::Village, .. }), "{err:?}");
    assert!(matches!(
        cascade.select_village(None),
        Err(Error::InvalidSelection { level: AdminLevel::Village, .. })
    ));
    assert_eq!(cascade.state(), &before);
}

#[test]
fn village_from_a_replaced_list_is_stale() {
    let source = FakeSource::new();
    let mut cascade = CascadeController::new(&source);
    cascade.select_district(Some("01"), &source).unwrap();
    cascade.select_taluka(Some("0101"), &source).unwrap();
    let village = cascade.state().villages()[0].code.clone();

    cascade.select_taluka(Some("0102"), &source).unwrap();
    assert!(matches!(cascade.select_village(Some(&village)), Err(Error::InvalidSelection { .. })));
}

#[test]
fn failed_taluka_lookup_degrades_to_no_options() {
    let source = FakeSource::new();
    source.fail(LookupRequest::Talukas { district: "02".into() });
    let mut cascade = CascadeController::new(&source);

    cascade.select_district(Some("02"), &source).unwrap();
    assert!(cascade.state().talukas().is_empty());
    assert_eq!(cascade.state().selected_district().map(|u| u.code.as_str()), Some("02"));

    let warnings = cascade.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("talukas of 02"));

    // The cascade stays usable.
    cascade.select_district(Some("01"), &source).unwrap();
    assert_eq!(cascade.state().talukas().len(), 2);
}

#[test]
fn failed_district_lookup_leaves_an_empty_cascade() {
    let source = FakeSource::new();
    source.fail(LookupRequest::Districts);
    let mut cascade = CascadeController::new(&source);
    assert!(cascade.state().districts().is_empty());
    assert_eq!(cascade.take_warnings().len(), 1);
    assert!(cascade.select_district(Some("01"), &source).is_err());
}

#[test]
fn invariants_hold_across_random_walks() {
    let source = FakeSource::new();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..50 {
        let mut cascade = CascadeController::new(&source);
        for _ in 0..40 {
            let state = cascade.state();
            // Pick a level, then a valid option from its current list or a clear.
            let level = AdminLevel::ALL[rng.random_range(0..3)];
            let options = state.options(level);
            let parent_selected = level.parent().is_none_or(|p| state.selected(p).is_some());
            if !parent_selected {
                continue;
            }
            let code = if options.is_empty() || rng.random_range(0..5) == 0 {
                None
            } else {
                Some(options[rng.random_range(0..options.len())].code.clone())
            };

            let result = match level {
                AdminLevel::District => cascade.select_district(code.as_deref(), &source),
                AdminLevel::Taluka => cascade.select_taluka(code.as_deref(), &source),
                AdminLevel::Village => cascade.select_village(code.as_deref()),
            };
            assert!(result.is_ok(), "valid selection rejected: {result:?}");

            let state = cascade.state();
            assert!(state.check_invariants().is_ok(), "{:?}", state.check_invariants());

            // Child lists are the latest fetch for the selected parent.
            if let Some(district) = state.selected_district() {
                let expected = FakeSource::answer(&LookupRequest::Talukas { district: district.code.clone() });
                assert_eq!(state.talukas(), &expected[..]);
            }
            if let Some(taluka) = state.selected_taluka() {
                let expected = FakeSource::answer(&LookupRequest::Villages { taluka: taluka.code.clone() });
                assert_eq!(state.villages(), &expected[..]);
            }
        }
    }
}
