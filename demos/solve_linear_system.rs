use hyperplanes::{
    hyperplane::Hyperplane,
    linear_system::{LinearSystem, Solution},
    printer::{LinearSystemPrinter, PrintOptions},
};

fn main() {
    let systems = [
        vec![
            ([5.862, 1.178, -10.366], -8.15),
            ([-2.931, -0.589, 5.183], -4.075),
        ],
        vec![
            ([8.631, 5.112, -1.816], -5.113),
            ([4.315, 11.132, -5.27], -6.775),
            ([-2.158, 3.01, -1.727], -0.831),
        ],
        vec![
            ([5.262, 2.739, -9.878], -3.441),
            ([5.111, 6.358, 7.638], -2.152),
            ([2.016, -9.924, -1.367], -9.278),
            ([2.167, -13.543, -18.883], -10.567),
        ],
    ];

    for equations in systems {
        let rows = equations
            .iter()
            .map(|(n, k)| Hyperplane::from_coefficients(*n, *k).unwrap())
            .collect();
        let system = LinearSystem::new(rows).unwrap();

        println!("{}", system);
        println!(
            "Reduced row-echelon form:\n{}",
            LinearSystemPrinter {
                system: &system.compute_rref(),
                opts: PrintOptions {
                    decimal_places: 6,
                    ..PrintOptions::default()
                },
            }
        );

        let solution = system.solve();
        println!("{}", solution);

        if let Solution::Unique(x) = &solution {
            for row in system.rows() {
                assert_eq!(row.contains(x), Ok(true));
            }
        }
        println!();
    }
}
