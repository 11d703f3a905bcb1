//! FlowSim Viewer - interactive dashboard for the allocation model
//!
//! Sidebar inputs feed one synchronous calculate-and-render pass per
//! change; the central panel paints the resulting figure.

mod canvas;
mod controls;
mod state;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use flowsim_logic::config::DashboardControls;

use crate::state::{Dashboard, DashboardChange};

fn main() {
    let config = ViewerConfig::default();
    let dashboard = Dashboard::new(config.controls.default_inputs());

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Economic Flow Simulator".to_string(),
                resolution: (1280.0, 720.0).into(),
                present_mode: bevy::window::PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .insert_resource(config)
        .insert_resource(dashboard)
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                controls::keyboard_shortcuts,
                controls::controls_panel,
                refresh_dashboard,
                canvas::figure_panel,
            )
                .chain(),
        )
        .run();
}

#[derive(Resource)]
pub struct ViewerConfig {
    pub controls: DashboardControls,
    pub sidebar_width: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            controls: DashboardControls::default(),
            sidebar_width: 260.0,
        }
    }
}

fn setup(mut commands: Commands, dashboard: Res<Dashboard>) {
    commands.spawn(Camera2d::default());

    let diagram = dashboard.diagram();
    info!(
        "Dashboard ready: policy={}, status={}, public=${:.0}B of ${}B",
        diagram.inputs.policy,
        diagram.status.text(),
        diagram.allocation.public_allocation,
        diagram.inputs.total_value
    );
}

/// Recompute the figure once per frame in which inputs changed.
fn refresh_dashboard(mut dashboard: ResMut<Dashboard>) {
    if !dashboard.is_dirty() {
        return;
    }
    for change in dashboard.refresh() {
        match change {
            DashboardChange::Policy { from, to } => {
                info!("Active policy changed: {} -> {}", from, to);
            }
            DashboardChange::Status { from, to } => {
                info!(
                    "System status changed: {} -> {} ({})",
                    from.text(),
                    to.text(),
                    dashboard.diagram().policy_label()
                );
            }
        }
    }
}
