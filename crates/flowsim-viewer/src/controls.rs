//! Sidebar: the five simulation inputs plus a live read-out.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use flowsim_logic::figure::format_billions;
use flowsim_logic::policy::Policy;

use crate::canvas::color32;
use crate::state::Dashboard;
use crate::ViewerConfig;

pub fn controls_panel(
    mut contexts: EguiContexts,
    mut dashboard: ResMut<Dashboard>,
    config: Res<ViewerConfig>,
) {
    let controls = config.controls;
    let mut inputs = dashboard.inputs();

    egui::SidePanel::left("simulation_parameters")
        .resizable(false)
        .default_width(config.sidebar_width)
        .show(contexts.ctx_mut(), |ui| {
            ui.spacing_mut().item_spacing.y = 6.0;
            ui.heading("Simulation Parameters");
            ui.separator();

            let tvg = controls.total_value;
            ui.label("Total Value ($B)");
            ui.add(
                egui::Slider::new(&mut inputs.total_value, tvg.min..=tvg.max).step_by(tvg.step),
            );

            let jobs = controls.jobs;
            ui.label("Jobs (Millions)");
            ui.add(
                egui::Slider::new(&mut inputs.jobs_available, jobs.min..=jobs.max)
                    .step_by(jobs.step),
            );

            ui.separator();

            ui.label("Population (M)");
            ui.add(egui::DragValue::new(&mut inputs.population).speed(0.1));

            ui.label("QLT Threshold ($B)");
            ui.add(egui::DragValue::new(&mut inputs.qlt).speed(1.0));

            ui.label("Active Policy");
            egui::ComboBox::from_id_salt("active_policy")
                .selected_text(inputs.policy.name())
                .show_ui(ui, |ui| {
                    for policy in Policy::ALL {
                        ui.selectable_value(&mut inputs.policy, policy, policy.name());
                    }
                });

            ui.separator();

            // Read-out reflects the last refresh, one frame behind an edit.
            let diagram = dashboard.diagram();
            let allocation = diagram.allocation;
            egui::Grid::new("allocation_readout")
                .num_columns(2)
                .show(ui, |ui| {
                    for (name, value) in [
                        ("Labor", allocation.labor),
                        ("Automation", allocation.automation),
                        ("Public", allocation.public_allocation),
                        ("Elites", allocation.elite_surplus),
                    ] {
                        ui.label(name);
                        ui.label(format_billions(value));
                        ui.end_row();
                    }
                });
            ui.label(diagram.policy_label());
            ui.colored_label(
                color32(diagram.status.color(), 1.0),
                diagram.status.text(),
            );

            ui.separator();
            ui.small("R: reset   1/2/3: select policy");
        });

    dashboard.set_inputs(inputs);
}

/// Keyboard shortcuts, ignored while an egui widget has focus.
pub fn keyboard_shortcuts(
    mut contexts: EguiContexts,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut dashboard: ResMut<Dashboard>,
    config: Res<ViewerConfig>,
) {
    if contexts.ctx_mut().wants_keyboard_input() {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        info!("Inputs reset to defaults");
        dashboard.set_inputs(config.controls.default_inputs());
        return;
    }

    let selected = if keyboard.just_pressed(KeyCode::Digit1) {
        Some(Policy::None)
    } else if keyboard.just_pressed(KeyCode::Digit2) {
        Some(Policy::NationalDividend)
    } else if keyboard.just_pressed(KeyCode::Digit3) {
        Some(Policy::StabilizationFund)
    } else {
        None
    };

    if let Some(policy) = selected {
        let inputs = dashboard.inputs().with_policy(policy);
        dashboard.set_inputs(inputs);
    }
}
