use std::time::Duration;

use bevy::math::primitives::Circle;
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::window::WindowResolution;

use crate::configuration::config::SimulationConfig;
use crate::simulation::pipeline::Pipeline;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{self, NVec2};
use crate::visualization::render::{Frame, RenderStyle};

/// Tags each disc with its index into the pipeline's current snapshot
#[derive(Component)]
struct EntityIndex(pub usize);

/// Configuration kept around so `R` can re-apply it
#[derive(Resource)]
struct ViewerSettings {
    config: SimulationConfig,
    style: RenderStyle,
}

pub fn run_viewer(config: SimulationConfig, pipeline: Pipeline) {
    log::info!("run_viewer: starting 2D viewer with {} entities", pipeline.len());

    let interval = Duration::from_millis(u64::from(config.engine.tick_interval_ms));
    let style = RenderStyle::for_rule(pipeline.rule_kind());
    let resolution = WindowResolution::new(config.domain.width as f32, config.domain.height as f32);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "trailsim".into(),
                resolution,
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(Time::<Fixed>::from_duration(interval))
        .insert_resource(ViewerSettings { config, style })
        .insert_non_send_resource(pipeline)
        .add_systems(Startup, setup_viewer)
        .add_systems(FixedUpdate, tick_system)
        .add_systems(Update, (reinitialize_system, sync_discs_system, draw_trails_system).chain())
        .run();
}

fn setup_viewer(
    mut commands: Commands,
    settings: Res<ViewerSettings>,
    pipeline: NonSend<Pipeline>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut gizmo_store: ResMut<GizmoConfigStore>,
) {
    commands.spawn(Camera2dBundle::default());

    let (gizmo_config, _) = gizmo_store.config_mut::<DefaultGizmoConfigGroup>();
    gizmo_config.line_width = settings.style.stroke_width;

    spawn_discs(&mut commands, &pipeline, settings.style, &mut meshes, &mut materials);
}

fn spawn_discs(
    commands: &mut Commands,
    pipeline: &Pipeline,
    style: RenderStyle,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
) {
    let mesh = Mesh2dHandle(meshes.add(Circle::new(style.disc_radius)));
    let domain = pipeline.parameters().domain;

    for (i, entity) in pipeline.current().iter().enumerate() {
        let p = to_world(&entity.position, domain.width, domain.height);
        commands.spawn((
            MaterialMesh2dBundle {
                mesh: mesh.clone(),
                material: materials.add(ColorMaterial::from(to_bevy(entity.color, 1.0))),
                transform: Transform::from_xyz(p.x, p.y, 1.0),
                visibility: if entity.is_active() { Visibility::Visible } else { Visibility::Hidden },
                ..Default::default()
            },
            EntityIndex(i),
        ));
    }
}

fn tick_system(mut pipeline: NonSendMut<Pipeline>) {
    if let Err(err) = pipeline.tick() {
        log::error!("tick failed, showing last good snapshot: {err}");
    }
}

fn reinitialize_system(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<ViewerSettings>,
    mut pipeline: NonSendMut<Pipeline>,
    mut time: ResMut<Time<Fixed>>,
    discs: Query<Entity, With<EntityIndex>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if !keys.just_pressed(KeyCode::KeyR) {
        return;
    }

    let scenario = match Scenario::build_scenario(&settings.config) {
        Ok(scenario) => scenario,
        Err(err) => {
            log::error!("cannot reinitialise: {err}");
            return;
        }
    };

    time.set_timestep(scenario.engine.tick_interval);
    if let Err(err) = pipeline.reinitialize_from(scenario) {
        log::error!("cannot rebuild worker pool: {err}");
        return;
    }

    for disc in &discs {
        commands.entity(disc).despawn();
    }
    spawn_discs(&mut commands, &pipeline, settings.style, &mut meshes, &mut materials);
}

fn sync_discs_system(pipeline: NonSend<Pipeline>, mut query: Query<(&EntityIndex, &mut Transform, &mut Visibility)>) {
    let domain = pipeline.parameters().domain;
    let current = pipeline.current();

    for (EntityIndex(i), mut transform, mut visibility) in &mut query {
        if let Some(e) = current.get(*i) {
            let p = to_world(&e.position, domain.width, domain.height);
            transform.translation.x = p.x;
            transform.translation.y = p.y;
            *visibility = if e.is_active() { Visibility::Visible } else { Visibility::Hidden };
        }
    }
}

fn draw_trails_system(pipeline: NonSend<Pipeline>, settings: Res<ViewerSettings>, mut gizmos: Gizmos) {
    let params = pipeline.parameters();
    let (width, height) = (params.domain.width, params.domain.height);
    let frame = Frame::build(pipeline.current(), settings.style, params.trail_length);

    for segment in &frame.segments {
        gizmos.line_gradient_2d(
            to_world(&segment.from, width, height),
            to_world(&segment.to, width, height),
            to_bevy(segment.color, segment.alpha_from),
            to_bevy(segment.color, segment.alpha_to),
        );
    }
}

/// Screen space (origin top-left, y down) to Bevy world space (origin centre, y up)
fn to_world(p: &NVec2, width: f64, height: f64) -> Vec2 {
    Vec2::new((p.x - width / 2.0) as f32, (height / 2.0 - p.y) as f32)
}

fn to_bevy(color: states::Color, alpha: f32) -> Color {
    Color::srgba(
        f32::from(color.r) / 255.0,
        f32::from(color.g) / 255.0,
        f32::from(color.b) / 255.0,
        alpha,
    )
}
