use std::fmt::{self, Display, Write};

use crate::{
    decimal::Decimal,
    hyperplane::Hyperplane,
    linear_system::{LinearSystem, Parametrization, Solution},
};

/// Options that control how equations and solutions are written.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// Coefficients are rounded to this many decimal places.
    pub decimal_places: u32,
    /// The prefix of the variables, as in `x_1`.
    pub variable_name: &'static str,
    /// The prefix of free parameters, as in `t_1`.
    pub parameter_name: &'static str,
}

impl PrintOptions {
    pub const fn new() -> Self {
        Self {
            decimal_places: 3,
            variable_name: "x",
            parameter_name: "t",
        }
    }
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a rounded number: integers without a decimal point, everything else
/// with exactly `opts.decimal_places` places.
fn write_number(f: &mut fmt::Formatter, x: &Decimal, opts: &PrintOptions) -> fmt::Result {
    let x = x.round_to_places(opts.decimal_places);
    if x.is_integer() {
        f.write_str(&x.to_fixed_string(0, false))
    } else {
        f.write_str(&x.to_fixed_string(opts.decimal_places as usize, false))
    }
}

/// Writes a hyperplane as `c_1 x_1 + c_2 x_2 + ... = k`.
pub struct HyperplanePrinter<'a> {
    pub hyperplane: &'a Hyperplane,
    pub opts: PrintOptions,
}

impl<'a> HyperplanePrinter<'a> {
    pub fn new(hyperplane: &'a Hyperplane) -> HyperplanePrinter<'a> {
        HyperplanePrinter {
            hyperplane,
            opts: PrintOptions::default(),
        }
    }

    pub fn new_with_options(hyperplane: &'a Hyperplane, opts: PrintOptions) -> HyperplanePrinter<'a> {
        HyperplanePrinter { hyperplane, opts }
    }
}

impl<'a> Display for HyperplanePrinter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (i, c) in self.hyperplane.normal().iter().enumerate() {
            let c = c.round_to_places(self.opts.decimal_places);
            if c.is_zero() {
                continue;
            }

            if first {
                if c.is_negative() {
                    f.write_char('-')?;
                }
            } else if c.is_negative() {
                f.write_str(" - ")?;
            } else {
                f.write_str(" + ")?;
            }

            let c = c.abs();
            if !c.is_one() {
                write_number(f, &c, &self.opts)?;
            }
            write!(f, "{}_{}", self.opts.variable_name, i + 1)?;

            first = false;
        }

        if first {
            f.write_char('0')?;
        }

        f.write_str(" = ")?;
        write_number(f, self.hyperplane.constant(), &self.opts)
    }
}

impl Display for Hyperplane {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        HyperplanePrinter::new(self).fmt(f)
    }
}

/// Writes a linear system with one numbered equation per line.
pub struct LinearSystemPrinter<'a> {
    pub system: &'a LinearSystem,
    pub opts: PrintOptions,
}

impl<'a> Display for LinearSystemPrinter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Linear System:")?;
        for (i, row) in self.system.rows().iter().enumerate() {
            write!(
                f,
                "\nEquation {}: {}",
                i + 1,
                HyperplanePrinter::new_with_options(row, self.opts)
            )?;
        }
        Ok(())
    }
}

impl Display for LinearSystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        LinearSystemPrinter {
            system: self,
            opts: PrintOptions::default(),
        }
        .fmt(f)
    }
}

/// Writes a parametrization as one line per coordinate:
/// `x_i = b_i + d_1 t_1 + ...`.
pub struct ParametrizationPrinter<'a> {
    pub parametrization: &'a Parametrization,
    pub opts: PrintOptions,
}

impl<'a> Display for ParametrizationPrinter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let p = self.parametrization;
        for i in 0..p.dimension() {
            if i > 0 {
                f.write_char('\n')?;
            }

            write!(f, "{}_{} = ", self.opts.variable_name, i + 1)?;
            write_number(f, &p.basepoint()[i], &self.opts)?;

            for (j, direction) in p.direction_vectors().iter().enumerate() {
                let c = direction[i].round_to_places(self.opts.decimal_places);
                if c.is_zero() {
                    continue;
                }

                f.write_str(if c.is_negative() { " - " } else { " + " })?;
                let c = c.abs();
                if !c.is_one() {
                    write_number(f, &c, &self.opts)?;
                    f.write_char(' ')?;
                }
                write!(f, "{}_{}", self.opts.parameter_name, j + 1)?;
            }
        }
        Ok(())
    }
}

impl Display for Parametrization {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        ParametrizationPrinter {
            parametrization: self,
            opts: PrintOptions::default(),
        }
        .fmt(f)
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Solution::Unique(p) => {
                f.write_str("Unique solution:")?;
                let opts = PrintOptions::default();
                for (i, x) in p.iter().enumerate() {
                    write!(f, "\n{}_{} = ", opts.variable_name, i + 1)?;
                    write_number(f, x, &opts)?;
                }
                Ok(())
            }
            Solution::Infinite(p) => write!(f, "Infinitely many solutions:\n{}", p),
            Solution::NoSolution => f.write_str("No solutions"),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{
        decimal::Decimal,
        hyperplane::Hyperplane,
        linear_system::{LinearSystem, Solution},
    };

    use super::{HyperplanePrinter, PrintOptions};

    #[test]
    fn hyperplanes() {
        let h = Hyperplane::from_coefficients([1, 1, 1], 1).unwrap();
        assert_eq!(h.to_string(), "x_1 + x_2 + x_3 = 1");

        let h = Hyperplane::from_coefficients([0, 0, -2], 2).unwrap();
        assert_eq!(h.to_string(), "-2x_3 = 2");

        let h = Hyperplane::from_coefficients([4.046, 2.836], 1.21).unwrap();
        assert_eq!(h.to_string(), "4.046x_1 + 2.836x_2 = 1.210");

        let h = Hyperplane::from_coefficients(["0.5", "-1", "-2.00049"], "-0.25").unwrap();
        assert_eq!(h.to_string(), "0.500x_1 - x_2 - 2x_3 = -0.250");

        let h = Hyperplane::from_coefficients(["-1", "0.0001", "3"], "0").unwrap();
        assert_eq!(h.to_string(), "-x_1 + 3x_3 = 0");

        let h = Hyperplane::from_constant(3, Decimal::one()).unwrap();
        assert_eq!(h.to_string(), "0 = 1");

        let h = Hyperplane::from_coefficients(["0.0001", "0.0002"], "5").unwrap();
        assert_eq!(h.to_string(), "0 = 5");
    }

    #[test]
    fn custom_options() {
        let h = Hyperplane::from_coefficients(["1.23456", "-7"], "2.5").unwrap();
        let opts = PrintOptions {
            decimal_places: 1,
            variable_name: "y",
            ..PrintOptions::default()
        };
        assert_eq!(
            HyperplanePrinter::new_with_options(&h, opts).to_string(),
            "1.2y_1 - 7y_2 = 2.5"
        );
    }

    #[test]
    fn systems_and_solutions() {
        let s = LinearSystem::new(vec![
            Hyperplane::from_coefficients([1, 1, 1], 1).unwrap(),
            Hyperplane::from_coefficients([0, 1, 1], 2).unwrap(),
        ])
        .unwrap();
        assert_eq!(
            s.to_string(),
            "Linear System:\nEquation 1: x_1 + x_2 + x_3 = 1\nEquation 2: x_2 + x_3 = 2"
        );

        assert_eq!(
            s.solve().to_string(),
            "Infinitely many solutions:\nx_1 = -1\nx_2 = 2 - t_1\nx_3 = 0 + t_1"
        );

        let s = LinearSystem::new(vec![
            Hyperplane::from_coefficients([2, 0], 1).unwrap(),
            Hyperplane::from_coefficients([0, 3], -1).unwrap(),
        ])
        .unwrap();
        assert_eq!(
            s.solve().to_string(),
            "Unique solution:\nx_1 = 0.500\nx_2 = -0.333"
        );

        assert_eq!(Solution::NoSolution.to_string(), "No solutions");
    }
}
