use super::*;

const PERSISTED: [PersistedPreference; 3] =
    [PersistedPreference::Unset, PersistedPreference::Light, PersistedPreference::Dark];
const SYSTEM: [Option<bool>; 3] = [Some(true), Some(false), None];
const OVERRIDE: [Option<bool>; 3] = [Some(true), Some(false), None];

/// Precedence table written out independently of `resolve`.
fn expected(persisted: PersistedPreference, system: Option<bool>, forced: Option<bool>) -> ThemeState {
    match (forced, persisted, system) {
        (Some(true), _, _) => ThemeState::Dark,
        (Some(false), _, _) => ThemeState::Light,
        (None, PersistedPreference::Dark, _) => ThemeState::Dark,
        (None, PersistedPreference::Light, _) => ThemeState::Light,
        (None, PersistedPreference::Unset, Some(true)) => ThemeState::Dark,
        (None, PersistedPreference::Unset, Some(false) | None) => ThemeState::Light,
    }
}

// =============================================================
// Full table
// =============================================================

#[test]
fn every_combination_matches_precedence_table() {
    let mut checked = 0;
    for persisted in PERSISTED {
        for system in SYSTEM {
            for forced in OVERRIDE {
                assert_eq!(
                    resolve(persisted, system, forced),
                    expected(persisted, system, forced),
                    "persisted={persisted:?} system={system:?} override={forced:?}"
                );
                checked += 1;
            }
        }
    }
    assert_eq!(checked, 27);
}

// =============================================================
// Named edge cases
// =============================================================

#[test]
fn unset_and_light_system_resolves_light() {
    assert_eq!(resolve(PersistedPreference::Unset, Some(false), None), ThemeState::Light);
}

#[test]
fn persisted_dark_outranks_light_system() {
    assert_eq!(resolve(PersistedPreference::Dark, Some(false), None), ThemeState::Dark);
}

#[test]
fn persisted_light_outranks_dark_system() {
    assert_eq!(resolve(PersistedPreference::Light, Some(true), None), ThemeState::Light);
}

#[test]
fn override_outranks_persisted() {
    assert_eq!(resolve(PersistedPreference::Dark, Some(true), Some(false)), ThemeState::Light);
    assert_eq!(resolve(PersistedPreference::Light, Some(false), Some(true)), ThemeState::Dark);
}

#[test]
fn no_signal_at_all_falls_back_to_light() {
    assert_eq!(resolve(PersistedPreference::Unset, None, None), ThemeState::Light);
}

#[test]
fn unset_follows_dark_system() {
    assert_eq!(resolve(PersistedPreference::Unset, Some(true), None), ThemeState::Dark);
}
