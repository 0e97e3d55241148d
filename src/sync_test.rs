use super::*;

fn synchronizer(surface: MemorySurface) -> Synchronizer<MemorySurface> {
    Synchronizer::new(surface, ThemeConfig::default())
}

fn tokens(classes: &[&str]) -> Vec<String> {
    classes.iter().map(|class| (*class).to_owned()).collect()
}

// =============================================================
// SyncPlan
// =============================================================

#[test]
fn dark_plan_offers_light_action() {
    let plan = SyncPlan::for_state(ThemeState::Dark, &ThemeConfig::default());
    assert!(plan.root_flag());
    assert_eq!(plan.root_class, "dark-mode");
    assert_eq!(plan.icon_on, tokens(&["bi", "bi-sun"]));
    assert_eq!(plan.icon_off, tokens(&["bi-moon"]));
    assert_eq!(plan.label, "Light Mode");
    assert_eq!(plan.aria_pressed, "true");
    assert_eq!(plan.action_label, "Switch to light mode");
}

#[test]
fn light_plan_offers_dark_action() {
    let plan = SyncPlan::for_state(ThemeState::Light, &ThemeConfig::default());
    assert!(!plan.root_flag());
    assert_eq!(plan.icon_on, tokens(&["bi", "bi-moon"]));
    assert_eq!(plan.icon_off, tokens(&["bi-sun"]));
    assert_eq!(plan.label, "Dark Mode");
    assert_eq!(plan.aria_pressed, "false");
    assert_eq!(plan.action_label, "Switch to dark mode");
}

#[test]
fn icon_switch_keeps_unrelated_classes() {
    let plan = SyncPlan::for_state(ThemeState::Dark, &ThemeConfig::default());
    assert_eq!(plan.switch_icon_classes("bi bi-moon ms-1"), "bi ms-1 bi-sun");
    assert_eq!(plan.switch_icon_classes("me-2  bi-moon"), "me-2 bi bi-sun");
    assert_eq!(plan.switch_icon_classes(""), "bi bi-sun");
}

#[test]
fn icon_switch_is_idempotent() {
    let plan = SyncPlan::for_state(ThemeState::Light, &ThemeConfig::default());
    let once = plan.switch_icon_classes("fs-5 bi bi-sun");
    assert_eq!(once, "fs-5 bi bi-moon");
    assert_eq!(plan.switch_icon_classes(&once), once);
}

// =============================================================
// apply
// =============================================================

#[test]
fn apply_updates_every_indicator_identically() {
    let mut sync = synchronizer(MemorySurface::with_indicators(2, 3, 2));
    sync.apply(ThemeState::Dark);
    let surface = sync.surface();
    assert!(surface.root_dark);
    assert!(surface.icons.iter().all(|icon| icon == "bi bi-sun"));
    assert!(surface.labels.iter().all(|label| label == "Light Mode"));
    assert!(surface.toggles.iter().all(|toggle| toggle.aria_pressed == "true"
        && toggle.aria_label == "Switch to light mode"
        && toggle.title == "Switch to light mode"));
}

#[test]
fn apply_tolerates_page_without_indicators() {
    let mut sync = synchronizer(MemorySurface::default());
    assert_eq!(sync.apply(ThemeState::Dark), Some(ThemeChange { is_dark: true }));
    assert!(sync.surface().root_dark);
}

#[test]
fn apply_twice_leaves_identical_state() {
    let mut sync = synchronizer(MemorySurface::with_indicators(1, 1, 1));
    sync.apply(ThemeState::Dark);
    let after_first = sync.surface().clone();
    sync.apply(ThemeState::Dark);
    let after_second = sync.surface();
    assert_eq!(after_second.root_dark, after_first.root_dark);
    assert_eq!(after_second.icons, after_first.icons);
    assert_eq!(after_second.labels, after_first.labels);
    assert_eq!(after_second.toggles, after_first.toggles);
}

#[test]
fn repeated_apply_does_not_renotify() {
    let mut sync = synchronizer(MemorySurface::default());
    assert_eq!(sync.apply(ThemeState::Light), Some(ThemeChange { is_dark: false }));
    assert_eq!(sync.apply(ThemeState::Light), None);
    assert_eq!(sync.apply(ThemeState::Dark), Some(ThemeChange { is_dark: true }));
    assert_eq!(sync.surface().writes, 3);
}

#[test]
fn current_tracks_last_apply() {
    let mut sync = synchronizer(MemorySurface::default());
    assert_eq!(sync.current(), None);
    sync.apply(ThemeState::Dark);
    assert_eq!(sync.current(), Some(ThemeState::Dark));
    sync.apply(ThemeState::Light);
    assert_eq!(sync.current(), Some(ThemeState::Light));
}

#[test]
fn switching_back_to_light_clears_root_flag() {
    let mut sync = synchronizer(MemorySurface::with_indicators(1, 1, 1));
    sync.apply(ThemeState::Dark);
    sync.apply(ThemeState::Light);
    let surface = sync.surface();
    assert!(!surface.root_dark);
    assert_eq!(surface.icons, vec!["bi bi-moon"]);
    assert_eq!(surface.labels, vec!["Dark Mode"]);
    assert_eq!(surface.toggles[0].aria_pressed, "false");
}

#[test]
fn indicator_markup_classes_survive_theme_switches() {
    let mut surface = MemorySurface::with_indicators(0, 1, 0);
    surface.icons[0] = "bi bi-moon ms-1".to_owned();
    let mut sync = synchronizer(surface);
    sync.apply(ThemeState::Dark);
    assert_eq!(sync.surface().icons, vec!["bi ms-1 bi-sun"]);
    sync.apply(ThemeState::Light);
    assert_eq!(sync.surface().icons, vec!["bi ms-1 bi-moon"]);
}
