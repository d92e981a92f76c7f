use simpsonir::callbacks::SimpleCallback;
use simpsonir::core::*;
use simpsonir::integrators::simpson;

struct Paraboloid;

/// Integrating the function x^2 + y^2
/// over the square [0,1] x [0,1]
/// which gives the result: 2/3
impl Integrand<f64> for Paraboloid {
    /// Call the integrand with a sample point chosen by the integrator.
    fn call(&self, x: &[f64]) -> f64 {
        x[0] * x[0] + x[1] * x[1]
    }

    /// The dimension of the integrand.
    ///
    /// This method is checked by the integrator against the dimension of the region.
    fn dim(&self) -> usize {
        2
    }
}

fn main() {
    let region = Region::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
    let subdivision = Subdivision::uniform(2, 16).unwrap();

    // define a callback function that prints the finished result
    let callback = SimpleCallback {};

    let sequential = simpson::integrate(&Paraboloid {}, &region, &subdivision, &callback).unwrap();

    let parallel =
        simpson::integrate_parallel(&Paraboloid {}, &region, &subdivision, 4, &callback).unwrap();

    println!(
        "\nsequential: {:?}\nparallel on 4 cores: {:?}\nexact: {:?}",
        sequential.integral(),
        parallel.integral(),
        2.0 / 3.0
    );
}
