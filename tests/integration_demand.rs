mod common;

use std::path::PathBuf;

use elec_trainer::config::SiteConfig;
use elec_trainer::demand::{
    AdvisoryRule, ChargerLoad, ChargerLoadSet, DemandParameters, DemandReport, compute_demand,
    recommended_diversity,
};

use common::{EPS, default_params, one_rapid, two_sevens};

#[test]
fn connected_load_is_sum_of_power_times_quantity() {
    let loads = [
        ChargerLoad::new(1, 7.0, 3),
        ChargerLoad::new(2, 22.0, 2),
        ChargerLoad::new(3, 3.6, 1),
    ];
    let r = compute_demand(&loads, &default_params());
    assert!((r.connected_load_kw - (21.0 + 44.0 + 3.6)).abs() < EPS);
}

#[test]
fn total_formula_holds_with_out_of_range_factors() {
    let loads = [ChargerLoad::new(1, 10.0, 1)];
    let params = DemandParameters::new(150.0, 80.0, 5.0);
    let r = compute_demand(&loads, &params);

    let expected = (10.0 * 1.5 + 5.0) * 1.8;
    assert!((r.total_max_demand_kw - expected).abs() < EPS);
    assert_eq!(params.out_of_range_fields().len(), 2);
}

#[test]
fn currents_follow_total_and_scale_linearly() {
    let single = compute_demand(&two_sevens(), &default_params());
    let doubled = compute_demand(&[ChargerLoad::new(1, 7.0, 4)], &default_params());

    assert!((single.current_at_230v_a - single.total_max_demand_kw / 0.23).abs() < EPS);
    assert!(
        (single.current_at_400v_3ph_a - single.total_max_demand_kw / (0.4 * 3f64.sqrt())).abs()
            < EPS
    );
    assert!((doubled.current_at_230v_a - 2.0 * single.current_at_230v_a).abs() < 1e-6);
    assert!((doubled.current_at_400v_3ph_a - 2.0 * single.current_at_400v_3ph_a).abs() < 1e-6);
}

#[test]
fn diversity_breakpoints() {
    let cases = [
        (1, 100),
        (2, 85),
        (5, 85),
        (6, 75),
        (10, 75),
        (11, 70),
        (20, 70),
        (21, 65),
    ];
    for (count, expected) in cases {
        assert_eq!(recommended_diversity(count), expected, "count {count}");
    }
}

#[test]
fn high_power_rule_boundary() {
    let at = [ChargerLoad::new(1, 22.0, 1)];
    let above = [ChargerLoad::new(1, 22.01, 1)];
    let params = default_params();

    let fired = |loads: &[ChargerLoad]| {
        DemandReport::evaluate(loads, &params)
            .advisories
            .iter()
            .any(|a| a.rule == AdvisoryRule::HighPowerCharger)
    };
    assert!(!fired(&at));
    assert!(fired(&above));
}

#[test]
fn two_seven_kw_chargers_worked_example() {
    let report = DemandReport::evaluate(&two_sevens(), &default_params());
    let r = &report.result;

    assert!((r.connected_load_kw - 14.0).abs() < EPS);
    assert!((r.charging_demand_kw - 14.0).abs() < EPS);
    assert!((r.total_max_demand_kw - 16.1).abs() < 1e-9);
    assert!((r.current_at_230v_a - 70.0).abs() < 1e-9);
    assert!((r.current_at_400v_3ph_a - 23.24).abs() < 0.01);
    assert_eq!(report.recommended_diversity_pct, 85);
    assert!(!report.has_warnings());
    assert!(
        report
            .advisories
            .iter()
            .any(|a| a.rule == AdvisoryRule::LowDiversitySmallFleet)
    );
}

#[test]
fn rapid_charger_worked_example() {
    let report = DemandReport::evaluate(&one_rapid(), &default_params());
    let rules: Vec<AdvisoryRule> = report.advisories.iter().map(|a| a.rule).collect();

    assert!((report.result.total_max_demand_kw - 57.5).abs() < 1e-9);
    assert!(rules.contains(&AdvisoryRule::HighPowerCharger));
    assert!(rules.contains(&AdvisoryRule::HighCurrentDemand));
    assert!(!rules.contains(&AdvisoryRule::HighTotalDemand));
    assert!(report.has_warnings());
}

#[test]
fn working_set_edits_flow_through_to_demand() {
    let mut set = ChargerLoadSet::new();
    let id = set.add(11.0, 1);
    set.set_power(id, 22.0).expect("charger should exist");
    set.set_quantity(id, 3).expect("charger should exist");

    let r = compute_demand(set.loads(), &default_params());
    assert!((r.connected_load_kw - (7.0 + 66.0)).abs() < EPS);
    assert_eq!(set.total_charger_count(), 4);

    set.remove(id).expect("charger should exist");
    assert!(set.remove(1).is_err());
}

#[test]
fn site_files_match_presets() {
    for name in SiteConfig::PRESETS {
        let preset = SiteConfig::from_preset(name).expect("preset should exist");
        let path = PathBuf::from(format!("sites/{name}.toml"));
        let file = SiteConfig::from_toml_file(&path).expect("site file should parse");
        assert!(file.validate().is_empty(), "{name}: {:?}", file.validate());

        let a = preset.evaluate().expect("preset should evaluate");
        let b = file.evaluate().expect("site should evaluate");
        assert!(
            (a.result.total_max_demand_kw - b.result.total_max_demand_kw).abs() < EPS,
            "{name}: preset {} vs file {}",
            a.result.total_max_demand_kw,
            b.result.total_max_demand_kw
        );
    }
}
