#[cfg(test)]
mod tests {
    use crate::strategic::{
        group_by_region, SelectionPolicy, StrategicSelector, WarehouseRecord,
    };
    use crate::Result;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn wh(name: &str, lat: f64, lon: f64, region: &str) -> WarehouseRecord {
        WarehouseRecord::new(name, lat, lon, "City", "ST", "Country", region)
    }

    /// `blobs` tight groups of five, 15° apart.
    fn blob_region(region: &str, blobs: usize) -> Vec<WarehouseRecord> {
        (0..blobs)
            .flat_map(|b| {
                (0..5).map(move |i| {
                    wh(
                        &format!("{region}-{b}-{i}"),
                        30.0 + (b % 2) as f64 * 15.0 + i as f64 * 0.05,
                        -120.0 + (b / 2) as f64 * 15.0 + (i % 2) as f64 * 0.05,
                        region,
                    )
                })
            })
            .collect()
    }

    fn as_slices(groups: &[(String, Vec<WarehouseRecord>)]) -> Vec<(&str, &[WarehouseRecord])> {
        groups
            .iter()
            .map(|(r, ws)| (r.as_str(), ws.as_slice()))
            .collect()
    }

    fn assert_unique(records: &[&WarehouseRecord]) {
        for (i, a) in records.iter().enumerate() {
            for b in &records[i + 1..] {
                assert!(!std::ptr::eq(*a, *b), "duplicate record {}", a.name);
            }
        }
    }

    #[test]
    fn test_small_region_kept_verbatim() -> Result<()> {
        let usa = vec![
            wh("a", 40.0, -74.0, "usa"),
            wh("b", 34.0, -118.0, "usa"),
            wh("c", 41.9, -87.6, "usa"),
        ];
        let selection = StrategicSelector::new(SelectionPolicy::default())
            .with_seed(3)
            .select([("usa", usa.as_slice())])?;

        assert_eq!(selection.records.len(), 3);
        for (picked, original) in selection.records.iter().zip(&usa) {
            assert!(std::ptr::eq(*picked, original));
        }
        let summary = &selection.regions[0];
        assert!(summary.kept_all);
        assert_eq!(summary.score, None);
        assert_eq!(summary.selected, 3);
        Ok(())
    }

    #[test]
    fn test_region_at_min_k_is_kept() -> Result<()> {
        let japan: Vec<_> = (0..2).map(|i| wh("j", 35.0 + i as f64, 139.0, "japan")).collect();
        let selection = StrategicSelector::new(SelectionPolicy::default())
            .select([("japan", japan.as_slice())])?;
        assert_eq!(selection.records.len(), 2);
        assert!(selection.regions[0].kept_all);
        Ok(())
    }

    #[test]
    fn test_clustered_region_picks_members_within_range() -> Result<()> {
        let usa = blob_region("usa", 5);
        let selection = StrategicSelector::new(SelectionPolicy::default())
            .with_seed(17)
            .select([("usa", usa.as_slice())])?;

        let summary = &selection.regions[0];
        assert!(!summary.kept_all);
        assert!((4..=7).contains(&summary.k));
        assert!(summary.score.is_some());
        assert!(summary.selected >= 1 && summary.selected <= summary.k);
        assert_eq!(summary.selected, selection.records.len());

        for picked in &selection.records {
            assert!(usa.iter().any(|w| std::ptr::eq(w, *picked)));
        }
        assert_unique(&selection.records);
        Ok(())
    }

    #[test]
    fn test_region_order_is_preserved() -> Result<()> {
        let mut all = blob_region("europe", 4);
        all.extend(vec![wh("t", 35.7, 139.7, "japan")]);
        all.extend(blob_region("brazil", 3));
        let groups = group_by_region(all, |w| w.region.as_str());

        let selection = StrategicSelector::new(SelectionPolicy::default())
            .with_seed(5)
            .select(as_slices(&groups))?;

        let order: Vec<_> = selection.regions.iter().map(|s| s.region.as_str()).collect();
        assert_eq!(order, ["europe", "japan", "brazil"]);

        // Records come out grouped in the same order.
        let mut seen = Vec::new();
        for r in &selection.records {
            if seen.last() != Some(&r.region) {
                seen.push(r.region.clone());
            }
        }
        assert_eq!(seen, ["europe", "japan", "brazil"]);
        Ok(())
    }

    #[test]
    fn test_same_records_under_two_regions_not_repeated() -> Result<()> {
        let shared = blob_region("x", 3);
        let selection = StrategicSelector::new(SelectionPolicy::default())
            .with_seed(9)
            .select([("x", shared.as_slice()), ("y", shared.as_slice())])?;

        assert_unique(&selection.records);
        let first = selection.regions[0].selected;
        assert_eq!(selection.records.len(), first + selection.regions[1].selected);
        Ok(())
    }

    #[test]
    fn test_seeded_runs_agree() -> Result<()> {
        let usa = blob_region("usa", 6);
        let run = |seed| -> Result<Vec<String>> {
            let selection = StrategicSelector::new(SelectionPolicy::default())
                .with_seed(seed)
                .select([("usa", usa.as_slice())])?;
            Ok(selection.records.iter().map(|w| w.name.clone()).collect())
        };
        assert_eq!(run(21)?, run(21)?);

        let mut a = StdRng::seed_from_u64(4);
        let mut b = StdRng::seed_from_u64(4);
        let sel = StrategicSelector::new(SelectionPolicy::default());
        let x = sel.select_with_rng([("usa", usa.as_slice())], &mut a)?;
        let y = sel.select_with_rng([("usa", usa.as_slice())], &mut b)?;
        assert_eq!(x.regions, y.regions);
        Ok(())
    }

    proptest! {
        #[test]
        fn output_has_no_duplicates(
            raw in proptest::collection::vec((-60.0f64..60.0, -170.0f64..170.0, 0usize..3), 0..40),
            seed in any::<u64>(),
        ) {
            let regions = ["usa", "europe", "india"];
            let records: Vec<WarehouseRecord> = raw
                .iter()
                .enumerate()
                .map(|(i, &(lat, lon, r))| wh(&i.to_string(), lat, lon, regions[r]))
                .collect();
            let groups = group_by_region(records, |w| w.region.as_str());
            let policy = SelectionPolicy::default();

            let selection = StrategicSelector::new(policy.clone())
                .with_seed(seed)
                .select(as_slices(&groups))
                .unwrap();

            for (i, a) in selection.records.iter().enumerate() {
                for b in &selection.records[i + 1..] {
                    prop_assert!(!std::ptr::eq(*a, *b));
                }
            }

            for ((region, items), summary) in groups.iter().zip(&selection.regions) {
                let range = policy.range_for(region);
                if items.len() <= range.min_k {
                    prop_assert!(summary.kept_all);
                    prop_assert_eq!(summary.selected, items.len());
                } else {
                    prop_assert!(summary.k >= range.min_k && summary.k <= range.max_k);
                    prop_assert!(summary.selected <= summary.k);
                }
            }
        }
    }
}
