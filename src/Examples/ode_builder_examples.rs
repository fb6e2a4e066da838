use crate::Kinetics::reaction_system::{
    ElementaryReaction, KineticSystemTask, build_kinetic_equations,
};
use std::collections::HashMap;

pub fn ode_builder_examples(task: usize) {
    //

    match task {
        0 => {
            // ROBERTSON'S PROBLEM: build the symbolic system from explicit mappings
            let reactions = vec![
                ElementaryReaction::new(
                    "k1",
                    HashMap::from([("A".to_string(), 1.0)]),
                    HashMap::from([("A".to_string(), -1.0), ("B".to_string(), 1.0)]),
                ),
                ElementaryReaction::new(
                    "k2",
                    HashMap::from([("B".to_string(), 1.0), ("C".to_string(), 1.0)]),
                    HashMap::from([("A".to_string(), 1.0), ("B".to_string(), -1.0)]),
                ),
                ElementaryReaction::new(
                    "k3",
                    HashMap::from([("B".to_string(), 2.0)]),
                    HashMap::from([("B".to_string(), -1.0), ("C".to_string(), 1.0)]),
                ),
            ];
            let substances = vec!["A".to_string(), "B".to_string(), "C".to_string()];
            let system = build_kinetic_equations(&reactions, &substances).unwrap();
            // dA/dt = k2*B*C - k1*A
            // dB/dt = k1*A - k2*B*C - k3*B^2
            // dC/dt = k3*B^2
            system.pretty_print_equations();
            println!("substances: {:?}", system.substances);
            println!("rate constants: {:?}", system.rate_constant_names);
            println!("stoichiometric matrix: {:?}", system.stoich.stoich_matrix);
        }
        1 => {
            // TWO-STEP DECAY from equation strings, with Jacobian
            let mut kinetic_task = KineticSystemTask::new();
            kinetic_task.set_problem_name("two-step decay");
            kinetic_task
                .set_reactions_from_equations(vec![("x => y", "l1"), ("y => z", "l2")])
                .unwrap();
            kinetic_task.set_substances(vec![
                "x".to_string(),
                "y".to_string(),
                "z".to_string(),
            ]);
            kinetic_task.build().unwrap();
            kinetic_task.pretty_print_system().unwrap();

            let jacobian = kinetic_task.jacobian().unwrap();
            for (i, row) in jacobian.iter().enumerate() {
                for (l, entry) in row.iter().enumerate() {
                    println!("J[{}][{}] = {}", i, l, entry);
                }
            }
        }
        2 => {
            // KINETIC TASK DOCUMENT: save to file and load back
            use crate::Utils::load_from_file::{LoadData, save_reaction_task};
            let reactions = vec![
                ElementaryReaction::from_equation("2 H2 + O2 => 2 H2O", "kb").unwrap(),
            ];
            let substances =
                vec!["H2".to_string(), "O2".to_string(), "H2O".to_string()];
            save_reaction_task("kinetic_task.txt", &substances, &reactions).unwrap();

            let ld = LoadData::new("kinetic_task.txt".to_string());
            let loaded_reactions = ld.load_reactions().unwrap();
            let loaded_substances = ld.load_substance_list().unwrap();
            let system =
                build_kinetic_equations(&loaded_reactions, &loaded_substances).unwrap();
            system.pretty_print_equations();
        }
        3 => {
            // STIFF IVP: Robertson's problem solved with BDF
            use crate::KineticsIVP::kinetic_ivp::KineticIVP;
            use RustedSciThe::numerical::ODE_api2::SolverType;
            let reactions = vec![
                ElementaryReaction::from_equation("A => B", "k1").unwrap(),
                ElementaryReaction::from_equation("B + C => A + C", "k2").unwrap(),
                ElementaryReaction::from_equation("2 B => B + C", "k3").unwrap(),
            ];
            let substances = vec!["A".to_string(), "B".to_string(), "C".to_string()];
            let mut ivp = KineticIVP::new(SolverType::BDF);
            ivp.set_reactions(&reactions, &substances).unwrap();
            ivp.set_rate_constants(HashMap::from([
                ("k1".to_string(), 0.04),
                ("k2".to_string(), 1.0e4),
                ("k3".to_string(), 3.0e7),
            ]));
            ivp.set_initial_concentrations(HashMap::from([
                ("A".to_string(), 1.0),
                ("B".to_string(), 0.0),
                ("C".to_string(), 0.0),
            ]));
            ivp.set_time(0.0, 40.0).unwrap();
            ivp.solve().unwrap();
            let (t, y) = ivp.get_result().unwrap();
            println!("mesh points: {}", t.len());
            let last = y.nrows() - 1;
            println!(
                "final state: A = {:.6}, B = {:.6e}, C = {:.6}",
                y[(last, 0)],
                y[(last, 1)],
                y[(last, 2)]
            );
            ivp.plot_in_terminal().unwrap();
        }

        _ => {
            println!("Wrong task number");
        }
    }
}
