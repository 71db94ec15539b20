use std::sync::Arc;

use super::{normalize_label, NutritionInfo, ReferenceData};

/// Resolves recognized labels to nutrition facts and display names.
#[derive(Debug, Clone)]
pub struct NutritionService {
    reference: Arc<ReferenceData>,
}

impl NutritionService {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self { reference }
    }

    /// Exact match first, then the first substring match in table order,
    /// then the `unknown` entry. Never fails.
    pub fn lookup(&self, label: &str) -> NutritionInfo {
        find_entry(self.reference.nutrition_entries(), label)
            .cloned()
            .unwrap_or_else(|| self.reference.unknown().clone())
    }

    /// Same matching rules as [`lookup`](Self::lookup); an unmatched label
    /// comes back as given.
    pub fn localize(&self, label: &str) -> String {
        find_entry(self.reference.translations(), label)
            .cloned()
            .unwrap_or_else(|| label.to_string())
    }

    pub fn is_known(&self, label: &str) -> bool {
        find_entry(self.reference.nutrition_entries(), label).is_some()
    }
}

fn find_entry<'a, T>(entries: &'a [(String, T)], label: &str) -> Option<&'a T> {
    let needle = normalize_label(label);
    // an empty needle would be a substring of every key
    if needle.is_empty() {
        return None;
    }

    if let Some((_, v)) = entries.iter().find(|(k, _)| *k == needle) {
        return Some(v);
    }

    entries
        .iter()
        .find(|(k, _)| needle.contains(k.as_str()) || k.contains(needle.as_str()))
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> NutritionService {
        NutritionService::new(Arc::new(ReferenceData::builtin()))
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let svc = service();
        let a = svc.lookup("Pizza");
        let b = svc.lookup("pizza");
        let c = svc.lookup("  PIZZA \n");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.calories_kcal, 266.0);
        assert_eq!(a.serving_unit, "per slice");
    }

    #[test]
    fn fuzzy_lookup_matches_contained_key() {
        let svc = service();
        let info = svc.lookup("chicken parm");
        assert_eq!(info.calories_kcal, 165.0);
        assert_eq!(info.protein_grams, 31.0);
    }

    #[test]
    fn exact_match_beats_earlier_fuzzy_candidate() {
        let svc = service();
        // "chicken" precedes "fried chicken" but the exact key wins
        assert_eq!(svc.lookup("fried chicken").calories_kcal, 320.0);
        // "rice" precedes "fried rice"
        assert_eq!(svc.lookup("Fried Rice").calories_kcal, 350.0);
    }

    #[test]
    fn fuzzy_lookup_matches_label_inside_key() {
        let svc = service();
        // "noodle" is a substring of the "noodles" key
        assert_eq!(svc.lookup("noodle").calories_kcal, 300.0);
    }

    #[test]
    fn fuzzy_lookup_uses_table_order() {
        let svc = service();
        // contains both "steak" and "salad"; steak comes first in the table
        assert_eq!(svc.lookup("steak salad").calories_kcal, 271.0);
    }

    #[test]
    fn unmatched_and_empty_labels_fall_back_to_unknown() {
        let svc = service();
        let unknown = svc.lookup("beef_tartare");
        assert_eq!(unknown.calories_kcal, 250.0);
        assert_eq!(unknown.serving_unit, "estimated");
        assert_eq!(svc.lookup("   "), unknown);
        assert!(!svc.is_known("beef_tartare"));
        assert!(svc.is_known("Ramen"));
    }

    #[test]
    fn localize_exact_fuzzy_and_raw() {
        let svc = service();
        assert_eq!(svc.localize("Sushi"), "壽司");
        assert_eq!(svc.localize("doughnut"), "甜甜圈");
        assert_eq!(svc.localize("hot dog bun"), "熱狗");
        assert_eq!(svc.localize("beef_tartare"), "beef_tartare");
        assert_eq!(svc.localize(""), "");
    }

    #[test]
    fn custom_tables_are_normalized() {
        let reference = ReferenceData::new(
            vec![(
                "  Kimchi ".to_string(),
                NutritionInfo {
                    calories_kcal: 15.0,
                    carbs_grams: 2.4,
                    protein_grams: 1.1,
                    fat_grams: 0.5,
                    serving_unit: "per 100g".to_string(),
                },
            )],
            ReferenceData::builtin().unknown().clone(),
            vec![("KIMCHI".to_string(), "泡菜".to_string())],
        );
        let svc = NutritionService::new(Arc::new(reference));
        assert_eq!(svc.lookup("kimchi stew").calories_kcal, 15.0);
        assert_eq!(svc.localize("kimchi"), "泡菜");
    }
}
