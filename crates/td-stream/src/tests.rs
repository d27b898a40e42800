//! Unit and end-to-end tests for td-stream.

// ── Mix ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod mix {
    use td_core::{BucketId, DemandConfig, Direction, VehicleClass};

    use crate::{VehicleClassMix, apportion};

    #[test]
    fn largest_remainder_breaks_ties_by_order() {
        assert_eq!(apportion(10, &[1.0, 1.0, 1.0]), vec![4, 3, 3]);
        assert_eq!(apportion(11, &[1.0, 1.0, 1.0]), vec![4, 4, 3]);
    }

    #[test]
    fn apportion_sums_exactly() {
        let weights = [33.3, 12.7, 0.4, 53.6];
        for total in [0, 1, 7, 100, 4_158, 99_999] {
            let counts = apportion(total, &weights);
            assert_eq!(counts.iter().sum::<usize>(), total, "total {total}");
            let sum: f64 = weights.iter().sum();
            for (c, w) in counts.iter().zip(weights) {
                let quota = total as f64 * w / sum;
                assert!((*c as f64 - quota).abs() < 1.0);
            }
        }
    }

    #[test]
    fn apportion_zero_weights() {
        assert_eq!(apportion(5, &[0.0, 0.0]), vec![0, 0]);
        assert!(apportion(5, &[]).is_empty());
    }

    #[test]
    fn rush_hour_targets() {
        use Direction::*;
        use VehicleClass::*;

        let mix = VehicleClassMix::from_config(&DemandConfig::rush_hour());
        assert_eq!(mix.total(), 4_158);
        assert_eq!(mix.buckets().len(), 9);

        let t = |c, d| mix.target(BucketId::new(c, d)).unwrap();
        assert_eq!(t(Motorcycle, Westbound), 2_000);
        assert_eq!(t(Motorcycle, Eastbound), 800);
        assert_eq!(t(Motorcycle, NorthSouth), 600);
        assert_eq!(t(Car, Westbound), 300);
        assert_eq!(t(Car, Eastbound), 150);
        assert_eq!(t(Car, NorthSouth), 120);
        assert_eq!(t(Delivery, Uniform), 100);
        assert_eq!(t(Bus, Uniform), 80);
        assert_eq!(t(Truck, Uniform), 8);

        let dirs = mix.direction_totals();
        assert_eq!(dirs[&Westbound], 2_300);
        assert_eq!(dirs[&Eastbound], 950);
        assert_eq!(dirs[&NorthSouth], 720);
        assert_eq!(dirs[&Uniform], 188);
        assert_eq!(mix.class_totals()[&Motorcycle], 3_400);
    }

    #[test]
    fn bucket_order_is_class_major() {
        let mix = VehicleClassMix::from_config(&DemandConfig::rush_hour());
        let ids: Vec<String> = mix.buckets().iter().map(|b| b.id.to_string()).collect();
        assert_eq!(ids[0], "motorcycle/westbound");
        assert_eq!(ids[2], "motorcycle/north-south");
        assert_eq!(ids[3], "car/westbound");
        assert_eq!(ids[8], "truck/uniform");
    }

    #[test]
    fn zero_share_class_has_no_buckets() {
        let mut config = DemandConfig::rush_hour();
        let truck = config.classes.get_mut(&VehicleClass::Truck).unwrap();
        truck.share_pct = 0.0;
        truck.directions.clear();
        let mix = VehicleClassMix::from_config(&config);
        assert_eq!(mix.buckets().len(), 8);
        assert_eq!(mix.total(), 4_158);
    }
}

// ── Histogram ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod histogram {
    use crate::DepartureHistogram;

    #[test]
    fn binning() {
        let mut h = DepartureHistogram::new(300.0, 3_600.0);
        assert_eq!(h.counts().len(), 12);
        for t in [0.0, 299.99, 300.0, 3_599.99] {
            h.record(t);
        }
        assert_eq!(h.counts()[0], 2);
        assert_eq!(h.counts()[1], 1);
        assert_eq!(h.counts()[11], 1);
        assert_eq!(h.total(), 4);
    }

    #[test]
    fn short_last_bin() {
        let h = DepartureHistogram::new(300.0, 1_000.0);
        let bins: Vec<(f64, f64, usize)> = h.bins().collect();
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[3].0, 900.0);
    }

    #[test]
    fn window_statistics() {
        let mut h = DepartureHistogram::new(100.0, 400.0);
        for (bin, n) in [(0.0, 1), (100.0, 3), (200.0, 5), (300.0, 1)] {
            for _ in 0..n {
                h.record(bin + 50.0);
            }
        }
        assert_eq!(h.mean_count(100.0, 300.0), 4.0);
        assert!((h.share(0.0, 200.0) - 0.4).abs() < 1e-12);
        assert_eq!(h.mean_count(1_000.0, 2_000.0), 0.0);
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use std::collections::BTreeMap;

    use td_core::{
        BucketId, ClassConfig, CurvePoint, DemandConfig, Direction, EdgeId, PlatoonParams, TripRecord,
        VehicleClass,
    };
    use td_network::{BoundaryRegistry, InvalidEndpointError};
    use td_profile::GenerationError;

    use crate::builder::check_unique_ids;
    use crate::{
        Bucket, BucketFailure, BucketReport, BucketTrips, BuildPhase, DepartureHistogram, NoopObserver,
        StreamError, StreamObserver, TripStream, TripStreamBuilder,
    };

    fn build(config: &DemandConfig, registry: &BoundaryRegistry) -> TripStream {
        TripStreamBuilder::new(config, registry)
            .merged(true)
            .build(&mut NoopObserver)
            .unwrap()
    }

    fn east_west_only() -> BoundaryRegistry {
        BoundaryRegistry::builder()
            .entries(Direction::Westbound, &["N_out_6_to_J6", "N_out_3e_to_J3", "N_out_9s_to_J9"])
            .exits(
                Direction::Westbound,
                &["J4_to_N_out_4", "J1_to_N_out_1w", "J7_to_N_out_7s", "J7_to_N_out_7"],
            )
            .entries(Direction::Eastbound, &["N_out_4_to_J4", "N_out_1w_to_J1", "N_out_7s_to_J7"])
            .exits(
                Direction::Eastbound,
                &["J6_to_N_out_6", "J3_to_N_out_3e", "J9_to_N_out_9s", "J9_to_N_out_9"],
            )
            .infer_reverse_pairs()
            .build()
    }

    fn bucket_trips(stream: &TripStream, id: BucketId) -> &[TripRecord] {
        &stream.buckets.iter().find(|b| b.bucket.id == id).unwrap().trips
    }

    #[test]
    fn rush_hour_end_to_end() {
        let config = DemandConfig::rush_hour();
        let registry = BoundaryRegistry::grid_3x3();
        let stream = build(&config, &registry);

        assert!(stream.report.is_complete());
        assert_eq!(stream.len(), 4_158);
        for b in &stream.report.buckets {
            assert_eq!(b.emitted, b.target, "{}", b.bucket);
        }

        let merged = stream.merged.as_ref().unwrap();
        assert_eq!(merged.len(), 4_158);
        assert!(merged.windows(2).all(|w| w[0].depart <= w[1].depart));

        for trip in merged {
            assert!((0.0..3_600.0).contains(&trip.depart), "{} departs at {}", trip.id, trip.depart);
            assert!(!registry.is_excluded_pair(&trip.origin, &trip.destination), "{}", trip.id);
            let sets = registry.edges(trip.id.direction).unwrap();
            assert!(sets.entries.contains(&trip.origin));
            assert!(sets.exits.contains(&trip.destination));
        }
    }

    #[test]
    fn ids_follow_departure_order() {
        let stream = build(&DemandConfig::rush_hour(), &BoundaryRegistry::grid_3x3());
        for b in &stream.buckets {
            assert!(b.trips.windows(2).all(|w| w[0].depart <= w[1].depart));
            for (seq, trip) in b.trips.iter().enumerate() {
                assert_eq!(trip.id.seq as usize, seq);
                assert_eq!(trip.id.bucket(), b.bucket.id);
            }
        }
        let car = BucketId::new(VehicleClass::Car, Direction::Eastbound);
        assert_eq!(bucket_trips(&stream, car)[0].id.to_string(), "car_eb_0");
        let bus = BucketId::new(VehicleClass::Bus, Direction::Uniform);
        assert_eq!(bucket_trips(&stream, bus)[0].id.to_string(), "bus_0");
    }

    #[test]
    fn departures_follow_rush_hour_curve() {
        let stream = build(&DemandConfig::rush_hour(), &BoundaryRegistry::grid_3x3());
        let h = DepartureHistogram::from_trips(stream.trips(), 300.0, 3_600.0);
        assert_eq!(h.total(), 4_158);

        // Build-up holds 720/3150 of the mass, the peak 1800/3150.
        assert!(h.share(0.0, 900.0) < 0.6);
        assert!((h.share(900.0, 2_700.0) - 0.571).abs() < 0.04);

        let ideal_peak_bin = 4_158.0 * 300.0 / 3_150.0;
        let peak = h.mean_count(900.0, 2_700.0);
        assert!(peak >= 0.9 * ideal_peak_bin, "peak bin mean {peak}");
        assert!(h.mean_count(2_700.0, 3_600.0) < peak);
        assert!(h.mean_count(0.0, 900.0) < peak);
    }

    #[test]
    fn motorcycle_platooning_rate() {
        let stream = build(&DemandConfig::rush_hour(), &BoundaryRegistry::grid_3x3());
        let id = BucketId::new(VehicleClass::Motorcycle, Direction::Westbound);
        let report = stream.report.bucket(id).unwrap();
        let fraction = report.platooned as f64 / report.emitted as f64;
        assert!((fraction - 0.6).abs() < 0.08, "platooned fraction {fraction}");
        assert!(report.platoons > 0);
    }

    #[test]
    fn same_seed_same_output() {
        let config = DemandConfig::rush_hour();
        let registry = BoundaryRegistry::grid_3x3();
        let a = build(&config, &registry);
        let b = build(&config, &registry);
        assert_eq!(a.merged, b.merged);

        let mut other = config.clone();
        other.seed = 7;
        let c = build(&other, &registry);
        assert_ne!(a.merged, c.merged);
    }

    #[test]
    fn missing_directions_fail_only_their_buckets() {
        let config = DemandConfig::rush_hour();
        let full = build(&config, &BoundaryRegistry::grid_3x3());
        let partial = build(&config, &east_west_only());

        assert!(!partial.report.is_complete());
        let short: Vec<BucketId> = partial.report.shortfalls().map(|b| b.bucket).collect();
        assert_eq!(
            short,
            vec![
                BucketId::new(VehicleClass::Motorcycle, Direction::NorthSouth),
                BucketId::new(VehicleClass::Car, Direction::NorthSouth),
            ]
        );
        let ns = partial
            .report
            .bucket(BucketId::new(VehicleClass::Car, Direction::NorthSouth))
            .unwrap();
        assert_eq!(ns.emitted, 0);
        assert!(matches!(
            ns.failure,
            Some(BucketFailure::Endpoint(InvalidEndpointError::NoEdges { .. }))
        ));
        assert_eq!(partial.report.shortfall_total(), 720);

        // Healthy buckets are untouched by the failures elsewhere.
        let wb = BucketId::new(VehicleClass::Motorcycle, Direction::Westbound);
        assert_eq!(bucket_trips(&full, wb), bucket_trips(&partial, wb));
    }

    #[test]
    fn empty_bucket_needs_no_endpoints() {
        let mut config = DemandConfig::rush_hour();
        config.total_vehicles = 1_000;
        config.classes = BTreeMap::from([(VehicleClass::Car, ClassConfig {
            share_pct:  100.0,
            directions: BTreeMap::from([(Direction::Westbound, 100.0), (Direction::Eastbound, 0.0)]),
            platoon:    None,
        })]);
        let registry = BoundaryRegistry::builder()
            .entries(Direction::Westbound, &["N_out_6_to_J6", "N_out_3e_to_J3"])
            .exits(Direction::Westbound, &["J4_to_N_out_4", "J1_to_N_out_1w"])
            .build();
        let stream = build(&config, &registry);

        assert!(stream.report.is_complete());
        assert_eq!(stream.report.shortfall_total(), 0);
        assert_eq!(stream.report.emitted_total(), 1_000);
        let eb = stream.report.bucket(BucketId::new(VehicleClass::Car, Direction::Eastbound)).unwrap();
        assert_eq!(eb.target, 0);
        assert!(eb.failure.is_none());
    }

    #[test]
    fn duplicate_ids_across_buckets_abort() {
        let id = BucketId::new(VehicleClass::Car, Direction::Westbound);
        let bucket_with = |depart: f64| BucketTrips {
            bucket: Bucket { id, target: 1, platoon: PlatoonParams::NONE },
            trips:  vec![TripRecord {
                id: id.trip(0),
                origin: EdgeId::new("N_out_6_to_J6"),
                destination: EdgeId::new("J4_to_N_out_4"),
                depart,
                platoon: None,
            }],
        };

        assert!(check_unique_ids(&[bucket_with(10.0)]).is_ok());
        let err = check_unique_ids(&[bucket_with(10.0), bucket_with(20.0)]).unwrap_err();
        assert!(matches!(err, StreamError::DuplicateTripId(ref dup) if dup == "car_wb_0"), "{err}");
    }

    #[test]
    fn flat_zero_curve_exhausts_every_bucket() {
        let mut config = DemandConfig::rush_hour();
        config.demand_curve = vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(3_600.0, 0.0)];
        let stream = build(&config, &BoundaryRegistry::grid_3x3());
        assert!(stream.is_empty());
        assert_eq!(stream.report.shortfalls().count(), 9);
        assert!(stream.report.buckets.iter().all(|b| matches!(
            b.failure,
            Some(BucketFailure::Generation(GenerationError::BudgetExhausted { attempts: 0, .. }))
        )));
    }

    #[test]
    fn invalid_config_aborts() {
        let mut config = DemandConfig::rush_hour();
        config.horizon_secs = 0.0;
        let registry = BoundaryRegistry::grid_3x3();
        assert!(TripStreamBuilder::new(&config, &registry).build(&mut NoopObserver).is_err());
    }

    #[test]
    fn merge_is_optional() {
        let config = DemandConfig::rush_hour();
        let registry = BoundaryRegistry::grid_3x3();
        let stream = TripStreamBuilder::new(&config, &registry).build(&mut NoopObserver).unwrap();
        assert!(stream.merged.is_none());
        assert_eq!(stream.len(), 4_158);
    }

    #[derive(Default)]
    struct Recorder {
        phases:  Vec<BuildPhase>,
        buckets: usize,
        merged:  Option<usize>,
    }

    impl StreamObserver for Recorder {
        fn on_phase(&mut self, phase: BuildPhase) {
            self.phases.push(phase);
        }
        fn on_bucket_done(&mut self, _report: &BucketReport) {
            self.buckets += 1;
        }
        fn on_merged(&mut self, total: usize) {
            self.merged = Some(total);
        }
    }

    /// Phase changes and bucket results as one ordered log.
    #[derive(Default)]
    struct Timeline(Vec<String>);

    impl StreamObserver for Timeline {
        fn on_phase(&mut self, phase: BuildPhase) {
            if let BuildPhase::GeneratingBucket(id) = phase {
                self.0.push(format!("start {id}"));
            }
        }
        fn on_bucket_done(&mut self, report: &BucketReport) {
            self.0.push(format!("done {}", report.bucket));
        }
    }

    #[test]
    fn bucket_phase_precedes_its_result() {
        let config = DemandConfig::rush_hour();
        let registry = BoundaryRegistry::grid_3x3();
        let mut timeline = Timeline::default();
        TripStreamBuilder::new(&config, &registry).build(&mut timeline).unwrap();

        assert_eq!(timeline.0.len(), 18);
        for pair in timeline.0.chunks(2) {
            let bucket = pair[0].strip_prefix("start ").unwrap();
            assert_eq!(pair[1], format!("done {bucket}"));
        }
    }

    #[test]
    fn observer_sees_every_phase() {
        let config = DemandConfig::rush_hour();
        let registry = BoundaryRegistry::grid_3x3();
        let mut builder = TripStreamBuilder::new(&config, &registry).merged(true);
        assert_eq!(builder.phase(), BuildPhase::Idle);

        let mut rec = Recorder::default();
        builder.build(&mut rec).unwrap();

        assert_eq!(builder.phase(), BuildPhase::Done);
        assert_eq!(rec.buckets, 9);
        assert_eq!(rec.merged, Some(4_158));
        assert_eq!(rec.phases.len(), 11);
        assert_eq!(
            rec.phases[0],
            BuildPhase::GeneratingBucket(BucketId::new(VehicleClass::Motorcycle, Direction::Westbound))
        );
        assert_eq!(rec.phases[9], BuildPhase::Merging);
        assert_eq!(rec.phases[10], BuildPhase::Done);
    }
}
