//! Hide/promote recommendations from relative click frequency

use wayfinder_api::{NavigationUsageRecord, Recommendation, RecommendationKind};
use wayfinder_config::RecommendationConfig;

/// Suggest hiding rarely used items and promoting heavily used ones,
/// relative to the mean click count. Sorted by confidence, descending.
pub fn recommend<'a>(
    records: impl IntoIterator<Item = &'a NavigationUsageRecord>,
    config: &RecommendationConfig,
) -> Vec<Recommendation> {
    let records: Vec<_> = records.into_iter().collect();
    if records.is_empty() {
        return Vec::new();
    }

    let total: u64 = records.iter().map(|r| r.click_count).sum();
    let average = total as f64 / records.len() as f64;
    if average <= 0.0 {
        return Vec::new();
    }

    let mut recommendations: Vec<Recommendation> = records
        .iter()
        .filter_map(|record| {
            let clicks = record.click_count as f64;
            let ratio = clicks / average;

            // Never-clicked items stay out of hide suggestions
            if record.click_count > 0 && clicks < config.hide_ratio * average {
                Some(Recommendation {
                    kind: RecommendationKind::Hide,
                    item_id: record.item_id.clone(),
                    reason: format!(
                        "{} is used {:.0}% as often as the average item",
                        record.title,
                        ratio * 100.0
                    ),
                    confidence: config.hide_confidence.clamp(0.0, 1.0),
                })
            } else if clicks > config.promote_ratio * average {
                Some(Recommendation {
                    kind: RecommendationKind::Promote,
                    item_id: record.item_id.clone(),
                    reason: format!(
                        "{} is used {:.1}x as often as the average item",
                        record.title, ratio
                    ),
                    confidence: config.promote_confidence.clamp(0.0, 1.0),
                })
            } else {
                None
            }
        })
        .collect();

    recommendations.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use wayfinder_util::ItemId;

    fn records(clicks: &[u64]) -> Vec<NavigationUsageRecord> {
        let now = Local.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        clicks
            .iter()
            .enumerate()
            .map(|(i, &click_count)| NavigationUsageRecord {
                item_id: ItemId::new(format!("item{i}")),
                title: format!("Item {i}"),
                href: format!("/item{i}"),
                category: "main".into(),
                click_count,
                last_accessed: now,
                time_spent_ms: 0,
                access_history: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_single_heavy_item_is_promoted() {
        // avg 4.8: nothing is under 0.48, only 20 is over 9.6
        let recs = recommend(&records(&[1, 1, 1, 1, 20]), &RecommendationConfig::default());

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::Promote);
        assert_eq!(recs[0].item_id, ItemId::new("item4"));
        assert_eq!(recs[0].confidence, 0.9);
    }

    #[test]
    fn test_rare_item_is_hidden() {
        // avg 20.2: 1 is under 2.02
        let recs = recommend(&records(&[1, 20, 20, 30, 30]), &RecommendationConfig::default());

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::Hide);
        assert_eq!(recs[0].item_id, ItemId::new("item0"));
        assert_eq!(recs[0].confidence, 0.8);
    }

    #[test]
    fn test_zero_click_items_never_hidden() {
        let recs = recommend(&records(&[0, 0, 50, 50]), &RecommendationConfig::default());
        assert!(recs.iter().all(|r| r.kind != RecommendationKind::Hide));
    }

    #[test]
    fn test_sorted_by_confidence() {
        // avg 13.1: 1 hides, 50 promotes
        let recs = recommend(
            &records(&[1, 50, 10, 10, 10, 10, 10, 10, 10, 10]),
            &RecommendationConfig::default(),
        );

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].kind, RecommendationKind::Promote);
        assert_eq!(recs[1].kind, RecommendationKind::Hide);
        assert!(recs.iter().all(|r| (0.0..=1.0).contains(&r.confidence)));
    }

    #[test]
    fn test_empty_and_all_zero() {
        assert!(recommend(&records(&[]), &RecommendationConfig::default()).is_empty());
        assert!(recommend(&records(&[0, 0, 0]), &RecommendationConfig::default()).is_empty());
    }

    #[test]
    fn test_uniform_usage_yields_nothing() {
        assert!(recommend(&records(&[5, 5, 5, 5]), &RecommendationConfig::default()).is_empty());
    }
}
