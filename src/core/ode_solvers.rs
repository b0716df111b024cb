//! Explicit ODE solvers

use nalgebra::Vector2;

/// One step of semi-implicit (symplectic) Euler for a second-order system:
///
/// v_next = v + dt * acc(q, v)
/// q_next = q + dt * v_next
///
/// The position update uses the *updated* velocity. Swapping the order gives
/// plain explicit Euler, which gains energy every step.
pub fn semi_implicit_euler_step<F>(
    dt: f64,
    position: &mut Vector2<f64>,
    velocity: &mut Vector2<f64>,
    acceleration: &F,
) where
    F: Fn(&Vector2<f64>, &Vector2<f64>) -> Vector2<f64>,
{
    let acc = acceleration(position, velocity);
    *velocity += dt * acc;
    *position += dt * *velocity;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use more_asserts::assert_lt;

    /// Two decoupled undamped oscillators: q'' = -omega^2 * q
    fn oscillator(omega: f64) -> impl Fn(&Vector2<f64>, &Vector2<f64>) -> Vector2<f64> {
        move |q: &Vector2<f64>, _: &Vector2<f64>| -omega * omega * *q
    }

    fn energy(omega: f64, q: &Vector2<f64>, v: &Vector2<f64>) -> f64 {
        0.5 * (v.dot(v) + omega * omega * q.dot(q))
    }

    #[test]
    fn test_velocity_is_updated_before_position() {
        let mut q = Vector2::new(1.0, -2.0);
        let mut v = Vector2::new(0.5, 0.0);
        let constant = |_: &Vector2<f64>, _: &Vector2<f64>| Vector2::new(1.0, 3.0);
        semi_implicit_euler_step(1.0, &mut q, &mut v, &constant);
        assert_eq!(v, Vector2::new(1.5, 3.0));
        assert_eq!(q, Vector2::new(2.5, 1.0));
    }

    #[test]
    fn test_unit_step_is_exact_sum() {
        // With dt == 1 the update must reduce to `v += acc; q += v` bit for bit.
        let acc = |q: &Vector2<f64>, v: &Vector2<f64>| Vector2::new(q[0].sin() * 0.1, v[1] * 0.3);
        let mut q = Vector2::new(0.3, 1.7);
        let mut v = Vector2::new(-0.2, 0.9);
        let (mut q_ref, mut v_ref) = (q, v);
        for _ in 0..100 {
            semi_implicit_euler_step(1.0, &mut q, &mut v, &acc);
            let a = acc(&q_ref, &v_ref);
            v_ref[0] += a[0];
            v_ref[1] += a[1];
            q_ref[0] += v_ref[0];
            q_ref[1] += v_ref[1];
        }
        assert_eq!(q, q_ref);
        assert_eq!(v, v_ref);
    }

    #[test]
    fn test_oscillator_energy_stays_bounded() {
        let omega = 0.2;
        let dt = 1.0;
        let dynamics = oscillator(omega);
        let mut q = Vector2::new(1.0, 0.0);
        let mut v = Vector2::new(0.0, 0.5);
        let initial_energy = energy(omega, &q, &v);
        for _ in 0..10_000 {
            semi_implicit_euler_step(dt, &mut q, &mut v, &dynamics);
            let drift = (energy(omega, &q, &v) - initial_energy).abs() / initial_energy;
            assert_lt!(drift, 0.15);
        }
    }

    #[test]
    fn test_oscillator_matches_analytic_solution_for_small_steps() {
        let omega = 2.0;
        let n_steps = 20_000;
        let t_final = 1.0;
        let dt = t_final / (n_steps as f64);
        let dynamics = oscillator(omega);
        let mut q = Vector2::new(1.0, 0.0);
        let mut v = Vector2::new(0.0, 0.0);
        for _ in 0..n_steps {
            semi_implicit_euler_step(dt, &mut q, &mut v, &dynamics);
        }
        assert_relative_eq!(q[0], (omega * t_final).cos(), epsilon = 1e-3);
        assert_relative_eq!(q[1], 0.0);
    }
}
