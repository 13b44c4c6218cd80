use super::*;

fn store_with_departments(college: College, departments: &[&str]) -> FacetStore {
    let mut store = FacetStore::new();
    let lookup = store.set_college(Some(college)).expect("lookup ticket");
    assert!(store.apply_departments(
        lookup,
        Ok(departments.iter().map(|d| d.to_string()).collect())
    ));
    store
}

#[test]
fn changing_college_always_clears_department() {
    let mut store = store_with_departments(College::CAS, &["CS", "MA"]);
    store.set_department(Some("CS")).expect("known department");
    assert_eq!(store.selection().department.as_deref(), Some("CS"));

    let lookup = store.set_college(Some(College::ENG));
    assert_eq!(lookup.map(|l| l.college), Some(College::ENG));
    assert_eq!(store.selection().department, None);
    assert!(store.departments().is_empty());
}

#[test]
fn clearing_college_skips_lookup() {
    let mut store = store_with_departments(College::CAS, &["CS"]);
    store.set_department(Some("CS")).expect("department");
    assert_eq!(store.set_college(None), None);
    assert_eq!(store.selection().college, None);
    assert_eq!(store.selection().department, None);
    assert!(store.departments().is_empty());
    assert!(!store.snapshot().departments_loading);
}

#[test]
fn reselecting_same_college_keeps_department() {
    let mut store = store_with_departments(College::CAS, &["CS"]);
    store.set_department(Some("CS")).expect("department");
    assert_eq!(store.set_college(Some(College::CAS)), None);
    assert_eq!(store.selection().department.as_deref(), Some("CS"));
}

#[test]
fn cascading_invariant_holds_over_interleaved_calls() {
    let colleges = [College::CAS, College::ENG, College::CAS, College::QST, College::QST];
    let mut store = FacetStore::new();
    let mut previous = None;
    for college in colleges {
        if let Some(lookup) = store.set_college(Some(college)) {
            store.apply_departments(lookup, Ok(vec!["CS".into(), "EC".into()]));
        }
        if previous != Some(college) {
            assert_eq!(store.selection().department, None);
        }
        let _ = store.set_department(Some("EC"));
        previous = Some(college);
    }
}

#[test]
fn department_requires_loaded_list() {
    let mut store = FacetStore::new();
    assert_eq!(
        store.set_department(Some("CS")),
        Err(FacetError::DepartmentsUnavailable(
            "the selected college".to_string()
        ))
    );

    let mut store = store_with_departments(College::CAS, &["CS"]);
    assert_eq!(
        store.set_department(Some("PH")),
        Err(FacetError::UnknownDepartment("PH".to_string()))
    );
    assert_eq!(store.selection().department, None);
    store.set_department(Some(" CS ")).expect("trimmed");
    store.set_department(None).expect("clear");
    assert_eq!(store.selection().department, None);
}

#[test]
fn stale_department_lookup_is_ignored() {
    let mut store = FacetStore::new();
    let cas = store.set_college(Some(College::CAS)).expect("cas ticket");
    let eng = store.set_college(Some(College::ENG)).expect("eng ticket");

    assert!(!store.apply_departments(cas, Ok(vec!["CS".into()])));
    assert!(store.departments().is_empty());
    assert!(store.snapshot().departments_loading);

    assert!(store.apply_departments(eng, Ok(vec!["ME".into(), "EK".into(), "ME".into(), " ".into()])));
    assert_eq!(store.departments(), ["EK".to_string(), "ME".to_string()]);
}

#[test]
fn failed_lookup_degrades_to_empty_list_with_soft_error() {
    let mut store = FacetStore::new();
    let lookup = store.set_college(Some(College::COM)).expect("ticket");
    store.toggle_hub_requirement(HubRequirement::WRI);
    assert!(store.apply_departments(
        lookup,
        Err(SearchError::Status {
            status: 503,
            message: "down".into()
        })
    ));
    assert!(store.departments().is_empty());
    assert!(store
        .department_error()
        .expect("soft error")
        .contains("COM"));
    assert!(store
        .selection()
        .hub_requirements
        .contains(&HubRequirement::WRI));
}

#[test]
fn ratings_are_clamped() {
    let mut store = FacetStore::new();
    store.set_minimum_rating(7.5);
    assert_eq!(store.selection().minimum_rating, 5.0);
    store.set_minimum_rating(-1.0);
    assert_eq!(store.selection().minimum_rating, 0.0);
    store.set_minimum_rating(f64::NAN);
    assert_eq!(store.selection().minimum_rating, 0.0);
    store.set_max_difficulty(0);
    assert_eq!(store.selection().max_difficulty, 1);
    store.set_max_workload(9);
    assert_eq!(store.selection().max_workload, 5);
}

#[test]
fn toggling_hub_requirement_twice_removes_it() {
    let mut store = FacetStore::new();
    assert!(store.toggle_hub_requirement(HubRequirement::QR1));
    assert!(!store.toggle_hub_requirement(HubRequirement::QR1));
    assert!(store.selection().hub_requirements.is_empty());
}

#[test]
fn reset_restores_initial_selection_and_invalidates_lookup() {
    let initial = FacetStore::new().snapshot();
    let mut store = FacetStore::new();
    let lookup = store.set_college(Some(College::CAS)).expect("ticket");
    store.toggle_hub_requirement(HubRequirement::ETR);
    store.set_no_prerequisites_only(true);
    store.set_minimum_rating(3.0);
    store.set_sort_key(Some(SortKey::ByRating));
    store.set_min_course_code(Some(300));
    store.set_min_review_count(Some(4));
    store.set_min_teacher(2.5);

    store.reset();
    assert_eq!(store.snapshot(), initial);
    assert_eq!(store.selection(), &FacetSelection::default());
    assert!(!store.apply_departments(lookup, Ok(vec!["CS".into()])));

    store.reset();
    assert_eq!(store.snapshot(), initial);
}
