//! Tests for td-pipeline.

#[cfg(test)]
mod route {
    use std::path::PathBuf;

    use crate::{Duarouter, PipelineError, RouteArtifact, RouteAssigner, RouteRequest, count_vehicles};

    fn request(dir: &std::path::Path) -> RouteRequest {
        RouteRequest {
            trip_files:    vec![dir.join("vn.car.wb.trips.xml"), dir.join("vn.bus.trips.xml")],
            vtypes_file:   dir.join("vtypes.add.xml"),
            output_file:   dir.join("vn.rou.xml"),
            horizon_secs:  3_600.0,
            trips_written: 10,
        }
    }

    const ROUTES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<routes>
    <vehicle id="car_wb_0" type="car" depart="0.00">
        <route edges="N_out_6_to_J6 J6_to_J5 J5_to_J4 J4_to_N_out_4"/>
    </vehicle>
    <vehicle id="bus_0" type="bus" depart="1.50"/>
</routes>
"#;

    #[test]
    fn counts_vehicle_elements() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vn.rou.xml");
        std::fs::write(&path, ROUTES).unwrap();
        assert_eq!(count_vehicles(&path).unwrap(), 2);
    }

    #[test]
    fn missing_route_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = count_vehicles(&dir.path().join("absent.rou.xml")).unwrap_err();
        assert!(matches!(err, PipelineError::RouteFile { .. }), "{err}");
    }

    #[test]
    fn drops_become_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vn.rou.xml");
        std::fs::write(&path, ROUTES).unwrap();

        let artifact = RouteArtifact::read(&path, 3).unwrap();
        assert_eq!(artifact.vehicles, 2);
        assert_eq!(artifact.dropped, 1);
        assert_eq!(artifact.warnings.len(), 1);

        let clean = RouteArtifact::read(&path, 2).unwrap();
        assert_eq!(clean.dropped, 0);
        assert!(clean.warnings.is_empty());
    }

    #[test]
    fn duarouter_command_line() {
        let dir = PathBuf::from("/out");
        let router = Duarouter::new("grid.net.xml");
        let cmd = router.command(&request(&dir));
        assert_eq!(cmd.get_program(), "duarouter");
        let args: Vec<String> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, [
            "--net-file",
            "grid.net.xml",
            "--route-files",
            "/out/vn.car.wb.trips.xml,/out/vn.bus.trips.xml",
            "--additional-files",
            "/out/vtypes.add.xml",
            "--output-file",
            "/out/vn.rou.xml",
            "--begin",
            "0",
            "--end",
            "3600",
            "--ignore-errors",
            "--no-step-log",
        ]);
    }

    #[test]
    fn missing_binary_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let router = Duarouter::with_binary(dir.path().join("no-such-duarouter"), "grid.net.xml");
        let err = router.assign(&request(dir.path())).unwrap_err();
        assert!(matches!(err, PipelineError::Spawn { .. }), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let router = Duarouter::with_binary("false", "grid.net.xml");
        let err = router.assign(&request(dir.path())).unwrap_err();
        match err {
            PipelineError::ExternalTool { tool, status, .. } => {
                assert_eq!(tool, "false");
                assert!(status.contains('1'), "{status}");
            }
            other => panic!("expected ExternalTool, got {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_without_output_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let router = Duarouter::with_binary("true", "grid.net.xml");
        let err = router.assign(&request(dir.path())).unwrap_err();
        assert!(matches!(err, PipelineError::RouteFile { .. }), "{err}");
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pipeline {
    use std::cell::RefCell;
    use std::fmt::Write as _;
    use std::rc::Rc;

    use std::collections::BTreeMap;

    use td_core::{ClassConfig, DemandConfig, Direction, VehicleClass};
    use td_network::BoundaryRegistry;
    use td_stream::NoopObserver;

    use crate::{Pipeline, PipelineError, PipelineResult, RouteArtifact, RouteAssigner, RouteRequest};

    /// Writes a route file with one vehicle per trip, minus `drop`.
    struct FakeRouter {
        drop: usize,
        seen: Rc<RefCell<Vec<RouteRequest>>>,
    }

    impl RouteAssigner for FakeRouter {
        fn name(&self) -> &str {
            "fake"
        }

        fn assign(&self, request: &RouteRequest) -> PipelineResult<RouteArtifact> {
            self.seen.borrow_mut().push(request.clone());
            let mut xml = String::from("<routes>\n");
            for i in 0..request.trips_written.saturating_sub(self.drop) {
                writeln!(xml, "    <vehicle id=\"v{i}\"/>").unwrap();
            }
            xml.push_str("</routes>\n");
            std::fs::write(&request.output_file, xml).unwrap();
            RouteArtifact::read(&request.output_file, request.trips_written)
        }
    }

    struct FailingRouter;

    impl RouteAssigner for FailingRouter {
        fn name(&self) -> &str {
            "failing"
        }

        fn assign(&self, _request: &RouteRequest) -> PipelineResult<RouteArtifact> {
            Err(PipelineError::ExternalTool {
                tool:   "failing".into(),
                status: "exit status: 2".into(),
                stderr: "network not found".into(),
            })
        }
    }

    fn fake(drop: usize) -> (FakeRouter, Rc<RefCell<Vec<RouteRequest>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        (FakeRouter { drop, seen: Rc::clone(&seen) }, seen)
    }

    #[test]
    fn merged_run_routes_merged_file() {
        let config = DemandConfig::rush_hour();
        let registry = BoundaryRegistry::grid_3x3();
        let dir = tempfile::tempdir().unwrap();
        let (router, seen) = fake(0);

        let outcome = Pipeline::new(&config, &registry, dir.path())
            .merged(true)
            .csv(true)
            .route_with(router)
            .run(&mut NoopObserver)
            .unwrap();

        assert!(outcome.report.is_complete());
        assert_eq!(outcome.trips.trips_written(), 4_158);
        let routes = outcome.routes.unwrap();
        assert_eq!(routes.vehicles, 4_158);
        assert_eq!(routes.dropped, 0);
        assert_eq!(routes.path, dir.path().join("vn.rou.xml"));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].trip_files, vec![dir.path().join("vn.all.trips.xml")]);
        assert_eq!(seen[0].vtypes_file, dir.path().join("vtypes.add.xml"));
        assert_eq!(seen[0].horizon_secs, 3_600.0);

        assert!(dir.path().join("trips.csv").exists());
        assert!(dir.path().join("departure_histogram.csv").exists());
    }

    #[test]
    fn unmerged_run_routes_every_bucket_file() {
        let config = DemandConfig::rush_hour();
        let registry = BoundaryRegistry::grid_3x3();
        let dir = tempfile::tempdir().unwrap();
        let (router, seen) = fake(0);

        Pipeline::new(&config, &registry, dir.path())
            .prefix("peak")
            .route_with(router)
            .run(&mut NoopObserver)
            .unwrap();

        let seen = seen.borrow();
        assert_eq!(seen[0].trip_files.len(), 9);
        assert_eq!(seen[0].trip_files[0], dir.path().join("peak.motorcycle.wb.trips.xml"));
        assert_eq!(seen[0].output_file, dir.path().join("peak.rou.xml"));
        assert!(!dir.path().join("peak.all.trips.xml").exists());
    }

    #[test]
    fn dropped_trips_are_reported_not_fatal() {
        let config = DemandConfig::rush_hour();
        let registry = BoundaryRegistry::grid_3x3();
        let dir = tempfile::tempdir().unwrap();
        let (router, _) = fake(3);

        let outcome = Pipeline::new(&config, &registry, dir.path())
            .merged(true)
            .route_with(router)
            .run(&mut NoopObserver)
            .unwrap();
        let routes = outcome.routes.unwrap();
        assert_eq!(routes.dropped, 3);
        assert_eq!(routes.warnings.len(), 1);
    }

    #[test]
    fn router_failure_is_fatal() {
        let config = DemandConfig::rush_hour();
        let registry = BoundaryRegistry::grid_3x3();
        let dir = tempfile::tempdir().unwrap();

        let err = Pipeline::new(&config, &registry, dir.path())
            .route_with(FailingRouter)
            .run(&mut NoopObserver)
            .unwrap_err();
        assert!(matches!(err, PipelineError::ExternalTool { .. }), "{err}");
        assert!(err.to_string().contains("network not found"));
    }

    #[test]
    fn shortfall_skips_routing() {
        let config = DemandConfig::rush_hour();
        let registry = BoundaryRegistry::builder()
            .entries(Direction::Westbound, &["N_out_6_to_J6"])
            .exits(Direction::Westbound, &["J4_to_N_out_4"])
            .entries(Direction::Eastbound, &["N_out_4_to_J4"])
            .exits(Direction::Eastbound, &["J6_to_N_out_6"])
            .infer_reverse_pairs()
            .build();
        let dir = tempfile::tempdir().unwrap();
        let (router, seen) = fake(0);

        let err = Pipeline::new(&config, &registry, dir.path())
            .route_with(router)
            .run(&mut NoopObserver)
            .unwrap_err();
        match err {
            PipelineError::Shortfall { missing, target, report } => {
                assert_eq!(missing, 720);
                assert_eq!(target, 4_158);
                assert_eq!(report.shortfalls().count(), 2);
            }
            other => panic!("expected Shortfall, got {other}"),
        }
        assert!(seen.borrow().is_empty());
        assert!(dir.path().join("vn.motorcycle.wb.trips.xml").exists());
        assert!(!dir.path().join("vn.motorcycle.ns.trips.xml").exists());
    }

    #[test]
    fn unregistered_zero_share_direction_is_complete() {
        let mut config = DemandConfig::rush_hour();
        config.total_vehicles = 1_000;
        config.classes = BTreeMap::from([(VehicleClass::Car, ClassConfig {
            share_pct:  100.0,
            directions: BTreeMap::from([(Direction::Westbound, 100.0), (Direction::Eastbound, 0.0)]),
            platoon:    None,
        })]);
        let registry = BoundaryRegistry::builder()
            .entries(Direction::Westbound, &["N_out_6_to_J6"])
            .exits(Direction::Westbound, &["J4_to_N_out_4"])
            .build();
        let dir = tempfile::tempdir().unwrap();
        let (router, seen) = fake(0);

        let outcome = Pipeline::new(&config, &registry, dir.path())
            .route_with(router)
            .run(&mut NoopObserver)
            .unwrap();
        assert!(outcome.report.is_complete());
        assert_eq!(outcome.trips.trips_written(), 1_000);
        assert_eq!(outcome.trips.bucket_files.len(), 1);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn generation_only() {
        let config = DemandConfig::rush_hour();
        let registry = BoundaryRegistry::grid_3x3();
        let dir = tempfile::tempdir().unwrap();
        let outcome = Pipeline::new(&config, &registry, dir.path()).run(&mut NoopObserver).unwrap();
        assert!(outcome.routes.is_none());
        assert_eq!(outcome.trips.bucket_files.len(), 9);
    }
}
