use trailsim::simulation::states::{Color, Entity, EntityKind, NVec2};
use trailsim::simulation::params::{Domain, Parameters};
use trailsim::simulation::rules::{RuleKind, UpdateRule};
use trailsim::simulation::forces::NewtonianGravity;
use trailsim::simulation::kinematic::Kinematic;
use trailsim::simulation::partition::partition;
use trailsim::simulation::store::EntityStore;
use trailsim::simulation::trail::Trail;
use trailsim::simulation::error::StepError;
use trailsim::simulation::scenario::Scenario;
use trailsim::configuration::config::{ConfigError, SimulationConfig};
use trailsim::visualization::render::{Frame, RenderStyle};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const WHITE: Color = Color::rgb(255, 255, 255);

/// Build a simple 2-body system separated along x, centred on `center`
pub fn two_body_system(center: NVec2, dist: f64, m1: f64, m2: f64) -> Vec<Entity> {
    let half = NVec2::new(dist / 2.0, 0.0);
    vec![
        Entity::body(center - half, NVec2::zeros(), WHITE, 0.0, m1),
        Entity::body(center + half, NVec2::zeros(), WHITE, 0.0, m2),
    ]
}

/// Default per-tick parameters for tests
pub fn test_params(width: f64, height: f64) -> Parameters {
    Parameters {
        tick_interval_ms: 20,
        trail_length: 0,
        domain: Domain::new(width, height),
    }
}

/// Gravity with the speed clamp disabled and no position scaling
#[allow(non_snake_case)]
pub fn gravity(G: f64) -> NewtonianGravity {
    NewtonianGravity {
        G,
        velocity_multiplier: 1.0,
        max_velocity: 0.0,
    }
}

/// Apply `rule` to every entity once, sequentially
pub fn step_all(rule: &dyn UpdateRule, entities: &[Entity], params: &Parameters) -> Vec<Entity> {
    (0..entities.len())
        .map(|i| rule.next_state(i, entities, params).expect("step failed"))
        .collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ==================================================================================
// Partition tests
// ==================================================================================

#[test]
fn partition_covers_range_exactly_once() {
    for n in 0..=64 {
        for workers in 1..=12 {
            let ranges = partition(n, workers);
            assert!(ranges.len() <= workers, "n={n} t={workers}: too many ranges");

            let mut seen = vec![0u32; n];
            let mut expected_begin = 0;
            for r in &ranges {
                assert_eq!(r.start, expected_begin, "n={n} t={workers}: gap or overlap");
                assert!(r.start < r.end, "n={n} t={workers}: empty range {r:?}");
                for i in r.clone() {
                    seen[i] += 1;
                }
                expected_begin = r.end;
            }
            assert_eq!(expected_begin, n);
            assert!(seen.iter().all(|&c| c == 1));
        }
    }
}

#[test]
fn partition_uses_ceil_stride_with_short_tail() {
    assert_eq!(partition(10, 4), vec![0..3, 3..6, 6..9, 9..10]);
    assert_eq!(partition(10, 3), vec![0..4, 4..8, 8..10]);
    // last full-size chunk already reaches n: fewer ranges than workers
    assert_eq!(partition(4, 3), vec![0..2, 2..4]);
}

#[test]
fn partition_edge_cases() {
    assert!(partition(0, 4).is_empty());
    assert_eq!(partition(3, 8), vec![0..1, 1..2, 2..3]);
    assert_eq!(partition(5, 1), vec![0..5]);
    assert_eq!(partition(5, 0), vec![0..5]);
    assert_eq!(partition(1000, 7), partition(1000, 7));
}

// ==================================================================================
// Trail tests
// ==================================================================================

#[test]
fn trail_prepends_and_evicts_oldest() {
    let mut trail = Trail::default();
    for k in 0..6 {
        trail.record(NVec2::new(k as f64, 0.0), 3);
        assert!(trail.len() <= 3);
    }
    let xs: Vec<f64> = trail.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![5.0, 4.0, 3.0]);
    assert_eq!(trail.newest().map(|p| p.x), Some(5.0));
    assert_eq!(trail.oldest().map(|p| p.x), Some(3.0));
    assert_eq!(trail.segments().count(), 2);
}

#[test]
fn trail_disabled_stays_empty() {
    let mut trail = Trail::default();
    trail.record(NVec2::new(1.0, 1.0), 0);
    assert!(trail.is_empty());
}

// ==================================================================================
// Kinematic rule tests
// ==================================================================================

#[test]
fn kinematic_moves_by_velocity_each_step() {
    let params = test_params(800.0, 600.0);
    let rule = Kinematic { bounce: false };
    let start = NVec2::new(100.0, 200.0);
    let mut balls = vec![Entity::kinematic(start, NVec2::new(1.0, 0.0), WHITE, 0)];

    for _ in 0..5 {
        balls = step_all(&rule, &balls, &params);
    }

    assert!(close(balls[0].position.x, start.x + 5.0));
    assert_eq!(balls[0].position.y, start.y);
}

#[test]
fn kinematic_delay_holds_for_ceil_steps() {
    let params = test_params(800.0, 600.0); // 20 ms ticks
    let rule = Kinematic { bounce: true };

    for (delay, held) in [(50, 3), (40, 2), (1, 1), (0, 0)] {
        let start = NVec2::new(400.0, 300.0);
        let mut balls = vec![Entity::kinematic(start, NVec2::new(2.0, 1.0), WHITE, delay)];

        for step in 0..held {
            balls = step_all(&rule, &balls, &params);
            assert_eq!(balls[0].position, start, "delay {delay}: moved early at step {step}");
            assert!(balls[0].trail.is_empty());
        }
        assert!(balls[0].is_active());

        balls = step_all(&rule, &balls, &params);
        assert_ne!(balls[0].position, start, "delay {delay}: did not launch");
    }
}

#[test]
fn kinematic_delay_counts_down_by_tick_interval() {
    let params = test_params(800.0, 600.0);
    let rule = Kinematic { bounce: false };
    let mut balls = vec![Entity::kinematic(NVec2::new(1.0, 1.0), NVec2::zeros(), WHITE, 50)];

    let mut remaining = Vec::new();
    for _ in 0..3 {
        balls = step_all(&rule, &balls, &params);
        remaining.push(balls[0].delay_remaining_ms());
    }
    assert_eq!(remaining, vec![30, 10, 0]);
}

#[test]
fn kinematic_bounce_flips_velocity_near_right_edge() {
    let params = test_params(100.0, 100.0);
    let rule = Kinematic { bounce: true };
    let balls = vec![Entity::kinematic(NVec2::new(89.5, 50.0), NVec2::new(1.0, 0.5), WHITE, 0)];

    let next = step_all(&rule, &balls, &params);

    assert!(next[0].position.x > 100.0 - 10.0);
    assert_eq!(next[0].velocity.x, -1.0);
    assert_eq!(next[0].velocity.y, 0.5);
}

#[test]
fn kinematic_bounce_flips_velocity_near_left_and_top_edges() {
    let params = test_params(100.0, 100.0);
    let rule = Kinematic { bounce: true };
    let balls = vec![Entity::kinematic(NVec2::new(10.5, 10.5), NVec2::new(-1.0, -1.0), WHITE, 0)];

    let next = step_all(&rule, &balls, &params);

    assert_eq!(next[0].position, NVec2::new(9.5, 9.5));
    assert_eq!(next[0].velocity, NVec2::new(1.0, 1.0));
}

#[test]
fn kinematic_bounce_flips_only_the_bottom_axis() {
    let params = test_params(100.0, 100.0);
    let rule = Kinematic { bounce: true };
    let balls = vec![Entity::kinematic(NVec2::new(50.0, 89.5), NVec2::new(0.5, 1.0), WHITE, 0)];

    let next = step_all(&rule, &balls, &params);

    assert!(next[0].position.y > 100.0 - 10.0);
    assert_eq!(next[0].velocity, NVec2::new(0.5, -1.0));
}

#[test]
fn kinematic_keeps_velocity_exactly_on_margin() {
    let params = test_params(100.0, 100.0);
    let rule = Kinematic { bounce: true };
    // lands exactly on the margin on both axes: not beyond it
    let balls = vec![Entity::kinematic(NVec2::new(11.0, 89.0), NVec2::new(-1.0, 1.0), WHITE, 0)];

    let next = step_all(&rule, &balls, &params);

    assert_eq!(next[0].position, NVec2::new(10.0, 90.0));
    assert_eq!(next[0].velocity, NVec2::new(-1.0, 1.0));
}

#[test]
fn kinematic_without_bounce_keeps_velocity() {
    let params = test_params(100.0, 100.0);
    let rule = Kinematic { bounce: false };
    let balls = vec![Entity::kinematic(NVec2::new(95.0, 5.0), NVec2::new(1.0, -1.0), WHITE, 0)];

    let next = step_all(&rule, &balls, &params);

    assert_eq!(next[0].velocity, NVec2::new(1.0, -1.0));
}

#[test]
fn kinematic_trail_is_bounded() {
    let mut params = test_params(1000.0, 1000.0);
    params.trail_length = 4;
    let rule = Kinematic { bounce: true };
    let mut balls = vec![Entity::kinematic(NVec2::new(500.0, 500.0), NVec2::new(3.0, -2.0), WHITE, 0)];

    for step in 1..=10 {
        let before = balls[0].position;
        balls = step_all(&rule, &balls, &params);
        let trail = &balls[0].trail;
        assert!(trail.len() <= 4);
        assert_eq!(trail.len(), step.min(4));
        assert_eq!(trail.newest(), Some(&before));
    }
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_two_body_reference_step() {
    let params = test_params(1000.0, 1000.0);
    let bodies = vec![
        Entity::body(NVec2::new(0.0, 0.0), NVec2::zeros(), WHITE, 0.0, 10.0),
        Entity::body(NVec2::new(10.0, 0.0), NVec2::zeros(), WHITE, 0.0, 10.0),
    ];

    let accel = gravity(100.0).acceleration(0, &bodies).unwrap();
    assert!(close(accel.x, 10.0) && close(accel.y, 0.0), "accel {accel:?}");

    let next = step_all(&gravity(100.0), &bodies, &params);
    assert!(close(next[0].velocity.x, 10.0) && close(next[0].velocity.y.abs(), 0.0));
    assert!(close(next[0].position.x, 10.0) && close(next[0].position.y, 0.0));
}

#[test]
fn gravity_points_toward_other_body() {
    let bodies = two_body_system(NVec2::new(500.0, 500.0), 2.0, 1.0, 1.0);
    let g = gravity(0.1);

    let dx = bodies[1].position - bodies[0].position;
    let a0 = g.acceleration(0, &bodies).unwrap();
    let a1 = g.acceleration(1, &bodies).unwrap();

    assert!(a0.dot(&dx) > 0.0, "Acceleration is not toward second body");
    assert!(a1.dot(&dx) < 0.0, "Acceleration is not toward first body");
}

#[test]
fn gravity_newton_third_law() {
    let bodies = two_body_system(NVec2::new(500.0, 500.0), 3.0, 2.0, 3.0);
    let g = gravity(0.1);

    let a0 = g.acceleration(0, &bodies).unwrap();
    let a1 = g.acceleration(1, &bodies).unwrap();
    let net = a0 * 2.0 + a1 * 3.0;

    assert!(net.norm() < 1e-12, "Net momentum not zero: {:?}", net);
}

#[test]
fn gravity_inverse_square_law() {
    let g = gravity(0.1);
    let near = two_body_system(NVec2::new(500.0, 500.0), 1.0, 1.0, 1.0);
    let far = two_body_system(NVec2::new(500.0, 500.0), 2.0, 1.0, 1.0);

    let ratio = g.acceleration(0, &near).unwrap().norm() / g.acceleration(0, &far).unwrap().norm();

    assert!((ratio - 4.0).abs() < 1e-9, "Expected 4x, got {}", ratio);
}

#[test]
fn gravity_radii_soften_contact() {
    let g = gravity(100.0);
    let center = NVec2::new(500.0, 500.0);
    let hard = vec![
        Entity::body(center, NVec2::zeros(), WHITE, 0.0, 1.0),
        Entity::body(center + NVec2::new(1e-6, 0.0), NVec2::zeros(), WHITE, 0.0, 1.0),
    ];
    let soft = vec![
        Entity::body(center, NVec2::zeros(), WHITE, 5.0, 1.0),
        Entity::body(center + NVec2::new(1e-6, 0.0), NVec2::zeros(), WHITE, 5.0, 1.0),
    ];

    let a_hard = g.acceleration(0, &hard).unwrap().norm();
    let a_soft = g.acceleration(0, &soft).unwrap().norm();

    assert!(a_soft < 1.0, "softened acceleration too large: {a_soft}");
    assert!(a_soft < a_hard);
}

#[test]
fn gravity_coincident_point_masses_contribute_nothing() {
    let params = test_params(1000.0, 1000.0);
    let p = NVec2::new(300.0, 300.0);
    let bodies = vec![
        Entity::body(p, NVec2::new(1.0, 0.0), WHITE, 0.0, 1.0),
        Entity::body(p, NVec2::zeros(), WHITE, 0.0, 1.0),
    ];

    assert_eq!(gravity(100.0).acceleration(0, &bodies).unwrap(), NVec2::zeros());
    let next = step_all(&gravity(100.0), &bodies, &params);
    assert!(next.iter().all(Entity::is_finite));
    assert_eq!(next[0].position, NVec2::new(301.0, 300.0));
}

#[test]
fn gravity_reflects_off_low_edges() {
    let params = test_params(1000.0, 1000.0);
    let bodies = vec![Entity::body(NVec2::new(10.5, 10.5), NVec2::new(-1.0, -1.0), WHITE, 1.0, 1.0)];

    let next = step_all(&gravity(0.0), &bodies, &params);

    assert_eq!(next[0].position, NVec2::new(9.5, 9.5));
    assert_eq!(next[0].velocity, NVec2::new(1.0, 1.0));
}

#[test]
fn gravity_reflects_after_scaled_move_past_high_edge() {
    let params = test_params(1000.0, 1000.0);
    let rule = NewtonianGravity {
        G: 0.0,
        velocity_multiplier: 4.0,
        max_velocity: 0.0,
    };
    let bodies = vec![Entity::body(NVec2::new(985.0, 500.0), NVec2::new(2.0, 0.0), WHITE, 1.0, 1.0)];

    let next = step_all(&rule, &bodies, &params);

    assert_eq!(next[0].position, NVec2::new(993.0, 500.0));
    assert_eq!(next[0].velocity, NVec2::new(-2.0, 0.0));
}

#[test]
fn gravity_rejects_non_positive_mass() {
    let params = test_params(1000.0, 1000.0);
    let bodies = vec![
        Entity::body(NVec2::new(100.0, 100.0), NVec2::zeros(), WHITE, 1.0, 0.0),
        Entity::body(NVec2::new(200.0, 100.0), NVec2::zeros(), WHITE, 1.0, 1.0),
    ];

    let err = gravity(1.0).next_state(0, &bodies, &params).unwrap_err();
    assert_eq!(err, StepError::NonPositiveMass { index: 0, mass: 0.0 });
}

#[test]
fn gravity_clamps_speed() {
    let params = test_params(10_000.0, 10_000.0);
    let bodies = two_body_system(NVec2::new(5000.0, 5000.0), 20.0, 1000.0, 1000.0);
    let rule = NewtonianGravity {
        G: 1000.0,
        velocity_multiplier: 4.0,
        max_velocity: 2.0,
    };

    let next = step_all(&rule, &bodies, &params);

    for (before, after) in bodies.iter().zip(&next) {
        assert!(after.velocity.norm() <= 2.0 + 1e-12);
        assert!(((after.position - before.position).norm() - 8.0).abs() < 1e-9);
    }
}

#[test]
fn gravity_center_of_mass_stays_put() {
    let params = test_params(10_000.0, 10_000.0);
    let center = params.domain.center();
    let mut bodies = vec![
        Entity::body(center - NVec2::new(100.0, 0.0), NVec2::new(0.0, 0.5), WHITE, 1.0, 5.0),
        Entity::body(center + NVec2::new(100.0, 0.0), NVec2::new(0.0, -0.5), WHITE, 1.0, 5.0),
    ];
    let rule = gravity(1.0);

    for step in 0..200 {
        bodies = step_all(&rule, &bodies, &params);
        let com = (bodies[0].position + bodies[1].position) / 2.0;
        assert!((com - center).norm() < 1e-9, "centre of mass drifted at step {step}: {com:?}");
    }
}

#[test]
fn gravity_ignores_kinematic_entities() {
    let mut bodies = two_body_system(NVec2::new(500.0, 500.0), 10.0, 1.0, 1.0);
    let reference = gravity(10.0).acceleration(0, &bodies).unwrap();

    bodies.push(Entity::kinematic(NVec2::new(505.0, 520.0), NVec2::zeros(), WHITE, 0));

    assert_eq!(gravity(10.0).acceleration(0, &bodies).unwrap(), reference);
}

// ==================================================================================
// Store tests
// ==================================================================================

#[test]
fn store_swaps_and_recycles() {
    let balls: Vec<Entity> = (0..4)
        .map(|i| Entity::kinematic(NVec2::new(i as f64, 0.0), NVec2::zeros(), WHITE, 0))
        .collect();
    let mut store = EntityStore::new(balls.clone());

    let target = store.take_target();
    assert_eq!(target.len(), 4);
    assert!(target.iter().all(|e| *e == Entity::default()));

    let mut written = target;
    written[2].position = NVec2::new(42.0, 0.0);
    store.swap(written).unwrap();

    assert_eq!(store.len(), 4);
    assert_eq!(store.current()[2].position.x, 42.0);

    // old current comes back cleared as the next write target
    let recycled = store.take_target();
    assert_eq!(recycled.len(), 4);
    assert!(recycled.iter().all(|e| *e == Entity::default()));
}

#[test]
fn store_rejects_wrong_length() {
    let mut store = EntityStore::new(vec![Entity::default(); 3]);
    let err = store.swap(vec![Entity::default(); 2]).unwrap_err();

    assert_eq!(err, StepError::BufferLength { expected: 3, actual: 2 });
    assert_eq!(store.current().len(), 3);
}

#[test]
fn store_snapshot_survives_swap() {
    let mut store = EntityStore::new(vec![Entity::kinematic(NVec2::new(1.0, 2.0), NVec2::zeros(), WHITE, 0)]);
    let held = store.snapshot();

    store.swap(vec![Entity::default()]).unwrap();
    let _target = store.take_target();

    assert_eq!(held[0].position, NVec2::new(1.0, 2.0));
}

// ==================================================================================
// Configuration + scenario tests
// ==================================================================================

const THREE_BODY: &str = r#"
engine:
  rule: "gravitational"
  threads: 2
  tick_interval_ms: 20
  seed: 7

domain:
  width: 800
  height: 600

parameters:
  trail_length: 16
  G: 100.0

entities:
  positions: [[200, 200], [600, 300]]
  colors: [[255, 0, 0]]
  radii: [10, 20]
  masses: [64]
"#;

#[test]
fn config_parses_yaml_with_rule_defaults() {
    let cfg = SimulationConfig::from_yaml(THREE_BODY).unwrap();

    assert_eq!(cfg.engine.rule, RuleKind::Gravitational);
    assert_eq!(cfg.engine.threads, Some(2));
    assert_eq!(cfg.entity_count(), 3);
    assert_eq!(cfg.trail_length(), 16);
    assert_eq!(cfg.entities.colors, vec![Color::rgb(255, 0, 0)]);
    assert_eq!(cfg.entities.radius(2), 20.0);
    assert_eq!(cfg.entities.mass(2), 64.0);
    assert!(cfg.validate().is_ok());
}

#[test]
fn config_empty_document_is_kinematic_default() {
    let cfg = SimulationConfig::from_yaml("{}").unwrap();

    assert_eq!(cfg.engine.rule, RuleKind::Kinematic);
    assert_eq!(cfg.entity_count(), 1000);
    assert_eq!(cfg.trail_length(), 0);
    assert_eq!(cfg.engine.tick_interval_ms, 20);
    assert!(cfg.parameters.bounce);
}

#[test]
fn config_rejects_bad_values() {
    let mut cfg = SimulationConfig::default();
    cfg.engine.threads = Some(0);
    assert_eq!(cfg.validate(), Err(ConfigError::ZeroWorkers));

    let mut cfg = SimulationConfig::default();
    cfg.engine.tick_interval_ms = 0;
    assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveTickInterval));

    let mut cfg = SimulationConfig::default();
    cfg.domain.width = 0.0;
    assert!(matches!(cfg.validate(), Err(ConfigError::InvalidDomain { .. })));

    let mut cfg = SimulationConfig::from_yaml(THREE_BODY).unwrap();
    cfg.entities.masses = vec![64.0, -1.0];
    assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveMass { index: 1, mass: -1.0 }));

    let mut cfg = SimulationConfig::from_yaml(THREE_BODY).unwrap();
    cfg.entities.radii = vec![-3.0];
    assert!(matches!(cfg.validate(), Err(ConfigError::NegativeRadius { index: 0, .. })));

    let mut cfg = SimulationConfig::from_yaml(THREE_BODY).unwrap();
    cfg.parameters.G = f64::NAN;
    assert_eq!(cfg.validate(), Err(ConfigError::NonFinite { field: "G" }));
}

#[test]
fn scenario_building_validates_first() {
    let mut cfg = SimulationConfig::default();
    cfg.engine.tick_interval_ms = 0;
    assert!(matches!(Scenario::build_scenario(&cfg), Err(ConfigError::NonPositiveTickInterval)));
}

#[test]
fn scenario_same_seed_same_entities() {
    let cfg = SimulationConfig::from_yaml(THREE_BODY).unwrap();

    let a = Scenario::build_scenario(&cfg).unwrap();
    let b = Scenario::build_scenario(&cfg).unwrap();

    assert_eq!(a.entities, b.entities);
    assert_eq!(a.engine.threads, 2);
}

#[test]
fn scenario_bodies_use_overrides_then_fallbacks() {
    let cfg = SimulationConfig::from_yaml(THREE_BODY).unwrap();
    let s = Scenario::build_with_rng(&cfg, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();

    assert_eq!(s.entities.len(), 3);
    assert_eq!(s.entities[0].position, NVec2::new(200.0, 200.0));
    assert_eq!(s.entities[1].position, NVec2::new(600.0, 300.0));
    assert_eq!(s.entities[0].color, Color::rgb(255, 0, 0));

    let radii: Vec<f64> = s.entities.iter().filter_map(Entity::radius).collect();
    assert_eq!(radii, vec![10.0, 20.0, 20.0]);
    assert!(s.entities.iter().all(|e| e.mass() == Some(64.0)));

    // random positions stay inside min(w, h) - 20
    let p = s.entities[2].position;
    assert!((0.0..580.0).contains(&p.x) && (0.0..580.0).contains(&p.y));
    // random launch velocity in [0, 0.01)
    assert!(s.entities[2].velocity.iter().all(|v| (0.0..0.01).contains(v)));

    assert_eq!(s.rule.kind(), RuleKind::Gravitational);
    assert_eq!(s.parameters.trail_length, 16);
}

#[test]
fn scenario_balls_launch_from_center() {
    let mut cfg = SimulationConfig::default();
    cfg.parameters.entity_count = Some(50);
    cfg.parameters.max_delay_ms = 1000;
    cfg.entities.delays_ms = vec![0, 250];
    cfg.entities.velocities = vec![[1.0, -1.0]];

    let s = Scenario::build_with_rng(&cfg, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();

    assert_eq!(s.entities.len(), 50);
    assert!(s.entities.iter().all(|e| e.position == NVec2::new(400.0, 400.0)));
    assert_eq!(s.entities[0].velocity, NVec2::new(1.0, -1.0));
    assert_eq!(s.entities[0].delay_remaining_ms(), 0);
    assert_eq!(s.entities[1].delay_remaining_ms(), 250);
    for e in &s.entities[1..] {
        assert!(e.velocity.iter().all(|v| (-1.5..1.5).contains(v)));
        assert!(e.delay_remaining_ms() < 1000);
        assert!(matches!(e.kind, EntityKind::Kinematic { .. }));
    }
}

#[test]
fn scenario_delay_disabled_launches_everything() {
    let mut cfg = SimulationConfig::default();
    cfg.parameters.entity_count = Some(20);
    cfg.parameters.enable_delay = false;

    let s = Scenario::build_with_rng(&cfg, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();

    assert!(s.entities.iter().all(Entity::is_active));
}

// ==================================================================================
// Render tests
// ==================================================================================

#[test]
fn frame_fades_trails_and_hides_delayed() {
    let mut params = test_params(1000.0, 1000.0);
    params.trail_length = 4;
    let rule = Kinematic { bounce: false };
    let mut balls = vec![
        Entity::kinematic(NVec2::new(100.0, 100.0), NVec2::new(1.0, 0.0), WHITE, 0),
        Entity::kinematic(NVec2::new(200.0, 100.0), NVec2::new(1.0, 0.0), WHITE, 10_000),
    ];
    for _ in 0..6 {
        balls = step_all(&rule, &balls, &params);
    }

    let style = RenderStyle::for_rule(RuleKind::Kinematic);
    let frame = Frame::build(&balls, style, params.trail_length);

    assert_eq!(frame.stroke_width, 1.0);
    assert_eq!(frame.discs.len(), 1);
    assert_eq!(frame.discs[0].index, 0);
    assert_eq!(frame.discs[0].radius, 5.0);

    let alphas: Vec<(f32, f32)> = frame.segments.iter().map(|s| (s.alpha_from, s.alpha_to)).collect();
    assert_eq!(alphas, vec![(1.0, 0.75), (0.75, 0.5), (0.5, 0.25)]);
    assert!(frame.segments.iter().all(|s| s.index == 0));
}

#[test]
fn frame_without_trails_has_no_segments() {
    let balls = vec![Entity::kinematic(NVec2::new(1.0, 1.0), NVec2::zeros(), WHITE, 0)];
    let frame = Frame::build(&balls, RenderStyle::for_rule(RuleKind::Gravitational), 0);

    assert!(frame.segments.is_empty());
    assert_eq!(frame.stroke_width, 5.0);
    assert_eq!(frame.discs[0].radius, 10.0);
}
