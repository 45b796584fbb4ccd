use approx::assert_relative_eq;
use quanty_setup::calculation::{Calculation, CalculationError, SelectionKey};
use quanty_setup::database::ParameterDatabase;
use quanty_setup::hamiltonian::CheckState;
use quanty_setup::utils::Vector3D;
use rstest::rstest;

const DATABASE: &str = include_str!("../data/parameters.json");

fn database() -> ParameterDatabase {
    ParameterDatabase::from_json_str(DATABASE).unwrap()
}

fn ni_l23() -> Calculation {
    Calculation::new(&database(), &SelectionKey::default()).unwrap()
}

fn is_out_of_range<T: std::fmt::Debug>(result: Result<T, CalculationError>) -> bool {
    matches!(result, Err(CalculationError::OutOfRangeValue(_)))
}

#[test]
fn test_default_settings() {
    let calculation = ni_l23();
    let settings = calculation.settings();
    assert_relative_eq!(settings.temperature, 10.0);
    assert_relative_eq!(settings.magnetic_field, 0.0);
    assert_eq!(settings.kin, Vector3D::new(0.0, 0.0, -1.0));
    assert_eq!(settings.ein1, Vector3D::new(0.0, 1.0, 0.0));
    assert!(settings.calculate_iso);
    assert!(!settings.calculate_cd);
    assert!(!settings.calculate_ld);
    assert!(settings.n_psis_auto);
    assert_eq!(settings.n_psis, 45);
    assert_relative_eq!(settings.fk, 0.8);
    assert_relative_eq!(settings.gk, 0.8);
    assert_relative_eq!(settings.zeta, 1.0);
    assert_eq!(calculation.label(), "Ni | 2+ | Oh | XAS | L2,3 (2p)");
    assert!(calculation.spectra.is_empty());
}

#[test]
fn test_temperature() {
    let mut calculation = ni_l23();
    assert!(is_out_of_range(calculation.set_temperature(-1.0)));
    assert_relative_eq!(calculation.settings().temperature, 10.0);

    calculation.set_temperature(300.0).unwrap();
    assert_relative_eq!(calculation.settings().temperature, 300.0);
    assert!(calculation.settings().n_psis_auto);

    calculation.set_temperature(0.0).unwrap();
    assert!(!calculation.settings().n_psis_auto);
    assert_eq!(calculation.settings().n_psis, 1);
}

#[test]
fn test_energy_limits() {
    let mut calculation = ni_l23();
    assert!(is_out_of_range(calculation.set_energy_min(0, 40.0)));
    assert!(is_out_of_range(calculation.set_energy_max(0, -20.0)));
    calculation.set_energy_min(0, -5.0).unwrap();
    calculation.set_energy_max(0, 25.0).unwrap();
    let axis = &calculation.settings().energy_axes[0];
    assert_relative_eq!(axis.min, -5.0);
    assert_relative_eq!(axis.max, 25.0);

    assert!(matches!(
        calculation.set_energy_min(1, 0.0),
        Err(CalculationError::UnknownNode(_))
    ));
}

#[test]
fn test_energy_limits_keep_broadening_pivot_inside() {
    let mut calculation = ni_l23();
    calculation.set_lorentzian(0, &[0.2, 0.4, 25.0]).unwrap();
    assert!(is_out_of_range(calculation.set_energy_max(0, 20.0)));
    assert!(is_out_of_range(calculation.set_energy_max(0, 25.0)));
    assert!(is_out_of_range(calculation.set_energy_min(0, 26.0)));
    let axis = &calculation.settings().energy_axes[0];
    assert_relative_eq!(axis.min, -10.0);
    assert_relative_eq!(axis.max, 30.0);

    calculation.set_energy_max(0, 26.0).unwrap();
    calculation.set_energy_min(0, 24.0).unwrap();
}

#[test]
fn test_energy_points_must_resolve_broadening() {
    let mut calculation = ni_l23();
    // (30 - (-10)) / 0.2 = 200 points at least.
    assert!(is_out_of_range(calculation.set_energy_points(0, 100)));
    assert_eq!(calculation.settings().energy_axes[0].n_points, 2000);
    calculation.set_energy_points(0, 250).unwrap();
    assert_eq!(calculation.settings().energy_axes[0].n_points, 250);
}

#[rstest]
#[case(&[-0.1])]
#[case(&[0.2, -0.4])]
#[case(&[0.2, 0.4, 50.0])]
#[case(&[0.2, 0.4, -10.0])]
#[case(&[0.1, 0.2, 0.3, 0.4])]
#[case(&[f64::NAN])]
#[case(&[0.2, f64::INFINITY])]
#[case(&[0.2, 0.4, f64::NAN])]
fn test_invalid_lorentzian(#[case] lorentzian: &[f64]) {
    let mut calculation = ni_l23();
    assert!(is_out_of_range(calculation.set_lorentzian(0, lorentzian)));
    assert_eq!(calculation.settings().energy_axes[0].lorentzian, vec![0.2, 0.4]);
}

#[test]
fn test_lorentzian_text() {
    let mut calculation = ni_l23();
    calculation.set_lorentzian_text(0, "[0.3, 0.5, 5.0]").unwrap();
    assert_eq!(calculation.settings().energy_axes[0].lorentzian, vec![0.3, 0.5, 5.0]);

    assert!(matches!(
        calculation.set_lorentzian_text(0, "[0.3, abc]"),
        Err(CalculationError::MalformedList(_))
    ));
    assert!(matches!(
        calculation.set_lorentzian_text(0, "[]"),
        Err(CalculationError::MalformedList(_))
    ));
    assert_eq!(calculation.settings().energy_axes[0].lorentzian, vec![0.3, 0.5, 5.0]);
}

#[test]
fn test_gaussian() {
    let mut calculation = ni_l23();
    assert!(is_out_of_range(calculation.set_gaussian(0, -0.1)));
    calculation.set_gaussian(0, 0.3).unwrap();
    assert_relative_eq!(calculation.settings().energy_axes[0].gaussian, 0.3);
}

#[test]
fn test_wave_vector_resets_polarization() {
    let mut calculation = ni_l23();
    assert!(is_out_of_range(calculation.set_wave_vector(Vector3D::default())));

    calculation.set_wave_vector(Vector3D::new(1.0, 1.0, 1.0)).unwrap();
    let settings = calculation.settings();
    assert_eq!(settings.ein1, Vector3D::new(1.0, 1.0, -2.0));
    assert!(settings.kin.is_perpendicular(&settings.ein1));

    assert!(matches!(
        calculation.set_wave_vector_text("1, 1"),
        Err(CalculationError::MalformedList(_))
    ));
}

#[test]
fn test_polarization_must_be_perpendicular() {
    let mut calculation = ni_l23();
    assert!(is_out_of_range(
        calculation.set_polarization_vector(Vector3D::new(0.0, 1.0, 1.0))
    ));
    assert!(is_out_of_range(calculation.set_polarization_vector(Vector3D::default())));
    assert_eq!(calculation.settings().ein1, Vector3D::new(0.0, 1.0, 0.0));

    calculation
        .set_polarization_vector(Vector3D::new(1.0, 1.0, 0.0))
        .unwrap();
    assert_eq!(calculation.settings().ein1, Vector3D::new(1.0, 1.0, 0.0));
}

#[test]
fn test_magnetic_field() {
    let mut calculation = ni_l23();
    calculation.set_magnetic_field(1.5).unwrap();
    assert!(calculation.settings().calculate_cd);
    assert_eq!(
        calculation.tree().check_state("Magnetic Field").unwrap(),
        CheckState::On
    );

    // Turning the wave vector turns the field with it.
    calculation.set_wave_vector(Vector3D::new(2.0, 0.0, 0.0)).unwrap();
    let bx = calculation
        .tree()
        .iter()
        .find(|e| e.term == "Magnetic Field" && e.parameter == "Bx")
        .map(|e| e.value)
        .unwrap();
    assert_relative_eq!(bx, -1.5);

    calculation.set_magnetic_field(0.0).unwrap();
    assert!(!calculation.settings().calculate_cd);
    assert_eq!(
        calculation.tree().check_state("Magnetic Field").unwrap(),
        CheckState::Off
    );
}

#[test]
fn test_field_component_edit_enables_dichroism() {
    let mut calculation = ni_l23();
    calculation
        .set_value("Magnetic Field", "Initial Hamiltonian", "Bz", 2.0)
        .unwrap();
    assert!(calculation.settings().calculate_cd);
    assert_eq!(
        calculation.tree().check_state("Magnetic Field").unwrap(),
        CheckState::On
    );
}

#[test]
fn test_magnetic_field_needs_polarization() {
    let key = SelectionKey::new("Ni", "2+", "Oh", "XAS", "K (1s)");
    let mut calculation = Calculation::new(&database(), &key).unwrap();
    assert!(is_out_of_range(calculation.set_magnetic_field(1.0)));
    calculation.set_magnetic_field(0.0).unwrap();
}

#[test]
fn test_scaling_factors() {
    let mut calculation = ni_l23();
    let before = calculation.tree().clone();
    assert!(is_out_of_range(calculation.set_scaling_factors(-0.1, 0.8, 1.0)));
    assert_eq!(calculation.tree(), &before);

    calculation.set_scaling_factors(0.7, 0.6, 0.9).unwrap();
    for entry in calculation.tree().iter().filter(|e| e.term == "Atomic") {
        let expected = match entry.parameter.chars().next() {
            Some('F') => Some(0.7),
            Some('G') => Some(0.6),
            Some('ζ') => Some(0.9),
            _ => Some(1.0),
        };
        assert_eq!(entry.scaling, expected, "{}", entry.parameter);
    }
}

#[test]
fn test_number_of_states() {
    let mut calculation = ni_l23();
    assert!(is_out_of_range(calculation.set_n_psis(0)));
    calculation.set_n_psis(1000).unwrap();
    assert_eq!(calculation.settings().n_psis, 45);
    calculation.set_n_psis(10).unwrap();
    calculation.set_n_psis_auto(false);
    assert_eq!(calculation.settings().n_psis, 10);
    calculation.set_n_psis_auto(true);
    assert_eq!(calculation.settings().n_psis, 45);
}

#[test]
fn test_explicit_number_of_states_disables_auto() {
    let mut calculation = ni_l23();
    assert!(calculation.settings().n_psis_auto);
    calculation.set_n_psis(3).unwrap();
    assert!(!calculation.settings().n_psis_auto);
    assert_eq!(calculation.settings().n_psis, 3);
}

#[test]
fn test_number_of_configurations() {
    let mut calculation = ni_l23();
    assert!(is_out_of_range(calculation.set_n_configurations(2)));
    assert_eq!(calculation.tree().n_configurations(), 1);

    calculation
        .tree_mut()
        .set_check_state("3d-Ligands Hybridization", CheckState::On)
        .unwrap();
    // A 3d8 shell can take at most 10 - 8 + 1 configurations.
    calculation.set_n_configurations(5).unwrap();
    assert_eq!(calculation.tree().n_configurations(), 3);
}

#[test]
fn test_spectra_flags() {
    let mut calculation = ni_l23();
    calculation.set_spectra_to_calculate(false, true, true);
    let settings = calculation.settings();
    assert!(!settings.calculate_iso);
    assert!(settings.calculate_cd);
    assert!(settings.calculate_ld);
}

#[test]
fn test_select_replaces_everything_or_nothing() {
    let db = database();
    let mut calculation = ni_l23();
    calculation.set_temperature(50.0).unwrap();

    let result = calculation.select(&db, &SelectionKey::new("Xx", "2+", "Oh", "XAS", "L2,3 (2p)"));
    assert!(matches!(result, Err(CalculationError::InvalidSelection(_))));
    assert!(!result.unwrap_err().is_recoverable());
    assert_relative_eq!(calculation.settings().temperature, 50.0);

    calculation
        .select(&db, &SelectionKey::new("Ni", "3+", "Oh", "XAS", "L2,3 (2p)"))
        .unwrap();
    assert_eq!(calculation.spec().n_electrons, 7);
    assert_eq!(calculation.settings().n_psis, 120);
    assert_relative_eq!(calculation.settings().temperature, 10.0);
}
