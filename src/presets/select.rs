use crate::presets::types::PresetLike;

/// Applies one click on `preset` to the current selection of a category.
///
/// Single-select categories are replaced outright. In multi-select
/// categories the sentinel collapses the selection, any other preset toggles
/// its membership, and an emptied selection falls back to the sentinel.
pub fn select<'a, P: PresetLike>(
    preset: &'a P,
    current: &[&'a P],
    catalog: &'a [P],
    single_select: bool,
) -> Vec<&'a P> {
    if single_select {
        return vec![preset];
    }

    let Some(none) = sentinel(catalog) else {
        return toggle(preset, current);
    };

    if preset.is_none_sentinel() {
        return vec![none];
    }

    let next = toggle(preset, current);
    if next.is_empty() {
        vec![none]
    } else {
        next
    }
}

fn toggle<'a, P: PresetLike>(preset: &'a P, current: &[&'a P]) -> Vec<&'a P> {
    let was_selected = current.iter().any(|entry| entry.id() == preset.id());
    let mut next: Vec<&'a P> = current
        .iter()
        .copied()
        .filter(|entry| !entry.is_none_sentinel() && entry.id() != preset.id())
        .collect();
    if !was_selected {
        next.push(preset);
    }
    next
}

pub fn sentinel<P: PresetLike>(catalog: &[P]) -> Option<&P> {
    catalog.iter().find(|entry| entry.is_none_sentinel())
}

/// Comma-joined names of the real presets in a selection, or `"None"`.
pub fn joined_names<P: PresetLike>(selection: &[&P]) -> String {
    let names = selection
        .iter()
        .filter(|entry| !entry.is_none_sentinel())
        .map(|entry| entry.name())
        .collect::<Vec<_>>();
    if names.is_empty() {
        "None".to_string()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::catalog::{CAMERA_PRESETS, LIGHTING_PRESETS};
    use crate::presets::types::Preset;

    fn lighting(id: &str) -> &'static Preset {
        LIGHTING_PRESETS.iter().find(|preset| preset.id == id).unwrap()
    }

    fn ids(selection: &[&Preset]) -> Vec<&'static str> {
        selection.iter().map(|preset| preset.id).collect()
    }

    #[test]
    fn selecting_sentinel_collapses_any_selection() {
        let current = vec![lighting("day-01"), lighting("night-02")];
        let next = select(lighting("none"), &current, LIGHTING_PRESETS, false);
        assert_eq!(ids(&next), vec!["none"]);

        let next = select(lighting("none"), &[lighting("none")], LIGHTING_PRESETS, false);
        assert_eq!(ids(&next), vec!["none"]);
    }

    #[test]
    fn adding_a_preset_evicts_the_sentinel() {
        let next = select(lighting("day-01"), &[lighting("none")], LIGHTING_PRESETS, false);
        assert_eq!(ids(&next), vec!["day-01"]);
    }

    #[test]
    fn toggling_a_present_preset_removes_it() {
        let current = vec![lighting("day-01"), lighting("day-02")];
        let next = select(lighting("day-01"), &current, LIGHTING_PRESETS, false);
        assert_eq!(ids(&next), vec!["day-02"]);
    }

    #[test]
    fn emptied_selection_falls_back_to_sentinel() {
        let next = select(lighting("day-03"), &[lighting("day-03")], LIGHTING_PRESETS, false);
        assert_eq!(ids(&next), vec!["none"]);
    }

    #[test]
    fn single_select_always_holds_one_entry() {
        let mut current = vec![&CAMERA_PRESETS[0]];
        for preset in CAMERA_PRESETS.iter().chain(CAMERA_PRESETS.iter().rev()) {
            current = select(preset, &current, CAMERA_PRESETS, true);
            assert_eq!(current.len(), 1);
            assert_eq!(current[0].id, preset.id);
        }
    }

    #[test]
    fn selection_preserves_click_order() {
        let mut current = vec![lighting("none")];
        for id in ["night-05", "day-01", "night-01"] {
            current = select(lighting(id), &current, LIGHTING_PRESETS, false);
        }
        assert_eq!(ids(&current), vec!["night-05", "day-01", "night-01"]);
        assert_eq!(
            joined_names(&current),
            "Night-05: RGB Neo-Rim, Day-01: Window Soft + Negative Fill, Night-01: Low-Key Double Strip"
        );
    }

    #[test]
    fn joined_names_of_sentinel_is_none() {
        assert_eq!(joined_names(&[lighting("none")]), "None");
    }
}
