//! Frame Solver Example - Simple Portal Frame

use anyhow::Context;
use frame_solver::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Frame Solver Example: Portal Frame ===\n");

    // Create a simple portal frame (z points down)
    //
    //     N2 -------- N3
    //     |          |
    //     |          |
    //     |          |
    //     N1        N4
    //   Fixed     Fixed
    //
    let height = 4.0; // 4m column height
    let span = 6.0; // 6m beam span

    // Steel HEA 200 (approximate): E = 210 GPa, A = 5.38e-3 m², I = 3.69e-5 m⁴
    let ea = 210e9 * 5.38e-3;
    let ei = 210e9 * 3.69e-5;

    let mut system = SystemElements::with_options(AnalysisOptions::linear().quiet());
    system.add_element((0.0, 0.0), (0.0, -height), ea, ei)?;
    let beam = system.add_element((0.0, -height), (span, -height), ea, ei)?;
    system.add_element((span, -height), (span, 0.0), ea, ei)?;

    system.add_support_fixed(1)?;
    system.add_support_fixed(4)?;

    // Gravity load: 20 kN/m on the beam
    system.q_load(beam, 20_000.0, LoadSense::Towards)?;
    // Lateral load: 10 kN at roof level
    system.point_load(10_000.0, 0.0, 2)?;

    println!("Running linear analysis...\n");
    if !system.assemble_system_matrix() {
        anyhow::bail!("assembled stiffness matrix is not symmetric");
    }
    system.process_conditions()?;
    system.solve().context("analysis failed")?;

    println!("Node Displacements:");
    for node in 1..=system.node_count() {
        let [ux, uz, phi] = system.node_displacement(node)?;
        println!(
            "  N{}: UX={:.4}mm, UZ={:.4}mm, PHI={:.6}rad",
            node,
            ux * 1000.0,
            uz * 1000.0,
            phi
        );
    }

    println!("\nSupport Reactions:");
    for reaction in system.reactions()? {
        println!(
            "  N{}: FX={:.2}kN, FZ={:.2}kN, TY={:.2}kN·m",
            reaction.node,
            reaction.fx / 1000.0,
            reaction.fz / 1000.0,
            reaction.ty / 1000.0
        );
    }

    println!("\nElement Forces:");
    for element in system.elements() {
        let (Some(n1), Some(n2), Some(normal)) = (element.node_1(), element.node_2(), element.normal_force())
        else {
            continue;
        };
        println!(
            "  E{}: N={:.2}kN, T1={:.2}kN·m, T2={:.2}kN·m, Mmid={:.2}kN·m",
            element.id,
            normal / 1000.0,
            n1.ty / 1000.0,
            n2.ty / 1000.0,
            element.midspan_moment().unwrap_or(0.0) / 1000.0
        );
    }

    let summary = system.summary()?;
    println!("\nSummary:");
    println!("  Max displacement: {:.4}mm at N{}", summary.max_displacement * 1000.0, summary.max_disp_node);
    println!("  Max moment: {:.2}kN·m in E{}", summary.max_moment / 1000.0, summary.max_moment_element);
    println!(
        "  Max normal force: {:.2}kN in E{}",
        summary.max_normal_force / 1000.0,
        summary.max_normal_force_element
    );
    println!("  Free DOFs: {} of {}", summary.free_dofs, summary.total_dofs);

    println!("\n=== Analysis Complete ===");
    Ok(())
}
