//! Homing planner for guided projectiles.
//!
//! `plan` samples thrust directions around the current heading, scores each
//! candidate with the trajectory evaluator, and only adopts a maneuver that
//! clearly beats coasting. Sampling order is fixed by index, and the winner
//! is the first candidate with the strictly lowest score, so the result is
//! reproducible whether or not the fan-out runs on the rayon pool.

use log::trace;
use rayon::prelude::*;

use gravwell_core::config::{HomingConfig, TrajectoryParams};
use gravwell_core::constants::*;
use gravwell_core::homing::{HomingContext, HomingDiagnostics, HomingResult, Phase};
use gravwell_core::types::Vector2D;

use crate::trajectory::{evaluate_multi_phase_trajectory, evaluate_trajectory, Launch};

/// Number of thrust phases to plan for `remaining_ms` of thrust budget.
pub fn phase_count(remaining_ms: f64) -> usize {
    if remaining_ms >= THREE_PHASE_MIN_REMAINING_MS {
        3
    } else if remaining_ms >= TWO_PHASE_MIN_REMAINING_MS {
        2
    } else {
        1
    }
}

/// Choose a thrust direction for this instant.
///
/// Degrades to "no thrust" when the window is closed, the budget is spent,
/// or there is no live target.
pub fn plan(context: &HomingContext<'_>, config: &HomingConfig) -> HomingResult {
    let target = match context.target {
        Some(t) if !t.destroyed => t.position,
        _ => return HomingResult::no_thrust(),
    };
    if !context.window.allowed || context.window.remaining_ms <= 0.0 {
        return HomingResult::no_thrust();
    }

    let planner = Planner {
        launch: Launch {
            position: context.position,
            velocity: context.velocity,
        },
        target,
        context,
        params: TrajectoryParams {
            gravity_constant: context.gravity_constant,
            ..TrajectoryParams::default()
        },
        parallel: config.parallel,
    };

    let count = phase_count(context.window.remaining_ms);
    let result = if count == 1 {
        planner.single_phase()
    } else {
        planner.multi_phase(count)
    };

    let d = &result.diagnostics;
    trace!(
        "homing plan: phases={} evals={} baseline={:?} best={:?} active={}",
        d.phase_count,
        d.evaluation_count,
        d.baseline_distance,
        d.best_distance,
        d.homing_active
    );
    result
}

struct Planner<'c, 'w> {
    launch: Launch,
    target: Vector2D,
    context: &'c HomingContext<'w>,
    params: TrajectoryParams,
    parallel: bool,
}

impl Planner<'_, '_> {
    fn coast(&self) -> f64 {
        evaluate_trajectory(
            self.launch,
            None,
            0.0,
            0.0,
            self.target,
            self.context.wells,
            &self.params,
        )
        .min_distance
    }

    fn score_directions(&self, directions: &[Vector2D]) -> Vec<f64> {
        let remaining = self.context.window.remaining_ms;
        let score = |dir: &Vector2D| {
            evaluate_trajectory(
                self.launch,
                Some(*dir),
                self.context.thrust_force,
                remaining,
                self.target,
                self.context.wells,
                &self.params,
            )
            .min_distance
        };
        if self.parallel {
            directions.par_iter().map(score).collect()
        } else {
            directions.iter().map(score).collect()
        }
    }

    fn score_plans(&self, plans: &[Vec<Phase>]) -> Vec<f64> {
        let score = |phases: &Vec<Phase>| {
            evaluate_multi_phase_trajectory(
                self.launch,
                phases,
                self.context.thrust_force,
                self.target,
                self.context.wells,
                &self.params,
            )
            .min_distance
        };
        if self.parallel {
            plans.par_iter().map(score).collect()
        } else {
            plans.iter().map(score).collect()
        }
    }

    fn heading(&self) -> f64 {
        self.launch.velocity.angle()
    }

    fn single_phase(&self) -> HomingResult {
        let remaining = self.context.window.remaining_ms;
        let baseline = self.coast();
        let mut evaluations = 1;

        let coarse = fan(
            self.heading(),
            SINGLE_PHASE_SAMPLES,
            FULL_THRUST_ARC / 2.0,
        );
        let scores = self.score_directions(&coarse);
        evaluations += scores.len();

        let mut best_dir = self.launch.velocity.normalize();
        let mut best = baseline;
        if let Some(i) = first_below(&scores, best) {
            best = scores[i];
            best_dir = coarse[i];
        }

        if best < baseline * SINGLE_PHASE_REFINE_THRESHOLD {
            let fine = fan(
                best_dir.angle(),
                SINGLE_PHASE_REFINE_SAMPLES,
                SINGLE_PHASE_REFINE_ARC / 2.0,
            );
            let scores = self.score_directions(&fine);
            evaluations += scores.len();
            if let Some(i) = first_below(&scores, best) {
                best = scores[i];
                best_dir = fine[i];
            }
        }

        let accepted = best < baseline * SINGLE_PHASE_ACCEPT_THRESHOLD;
        let planned = if accepted {
            vec![Phase {
                direction: Some(best_dir),
                duration_ms: remaining,
            }]
        } else {
            Vec::new()
        };

        HomingResult {
            thrust: accepted.then_some(best_dir),
            phases: planned.clone(),
            diagnostics: HomingDiagnostics {
                sampled_directions: coarse,
                best_direction: Some(best_dir),
                planned_phases: planned,
                homing_active: accepted,
                phase_count: 1,
                evaluation_count: evaluations,
                baseline_distance: finite(baseline),
                best_distance: finite(best),
            },
        }
    }

    fn multi_phase(&self, count: usize) -> HomingResult {
        let duration = self.context.window.remaining_ms / count as f64;
        let baseline = self.coast();

        let first = fan(self.heading(), MULTI_PHASE_FIRST_SAMPLES, FULL_THRUST_ARC / 2.0);
        let mut plans = Vec::new();
        for &d1 in &first {
            for d2 in fan(d1.angle(), MULTI_PHASE_SECOND_SAMPLES, MULTI_PHASE_FOLLOW_ARC) {
                if count == 2 {
                    plans.push(phases_of(&[d1, d2], duration));
                    continue;
                }
                for d3 in fan(d2.angle(), MULTI_PHASE_THIRD_SAMPLES, MULTI_PHASE_FOLLOW_ARC) {
                    plans.push(phases_of(&[d1, d2, d3], duration));
                }
            }
        }

        let scores = self.score_plans(&plans);
        let (best, best_plan) = match first_below(&scores, baseline) {
            Some(i) => (scores[i], plans.swap_remove(i)),
            None => (baseline, Vec::new()),
        };

        let accepted = best < baseline * MULTI_PHASE_ACCEPT_THRESHOLD && !best_plan.is_empty();
        let best_dir = best_plan.first().and_then(|p| p.direction);

        HomingResult {
            thrust: if accepted { best_dir } else { None },
            phases: if accepted { best_plan.clone() } else { Vec::new() },
            diagnostics: HomingDiagnostics {
                sampled_directions: first,
                best_direction: best_dir,
                planned_phases: best_plan,
                homing_active: accepted,
                phase_count: count,
                evaluation_count: scores.len() + 1,
                baseline_distance: finite(baseline),
                best_distance: finite(best),
            },
        }
    }
}

/// Hard-fail scores (`f64::INFINITY`) become `None` for the diagnostics.
fn finite(score: f64) -> Option<f64> {
    score.is_finite().then_some(score)
}

/// `samples` unit directions spread evenly over `center ± half_width`,
/// endpoints included, in increasing angle order.
fn fan(center: f64, samples: usize, half_width: f64) -> Vec<Vector2D> {
    if samples == 1 {
        return vec![Vector2D::from_angle(center, 1.0)];
    }
    let last = (samples - 1) as f64;
    (0..samples)
        .map(|i| {
            let offset = (i as f64 / last - 0.5) * 2.0 * half_width;
            Vector2D::from_angle(center + offset, 1.0)
        })
        .collect()
}

fn phases_of(directions: &[Vector2D], duration_ms: f64) -> Vec<Phase> {
    directions
        .iter()
        .map(|&d| Phase {
            direction: Some(d),
            duration_ms,
        })
        .collect()
}

/// Index of the first score that sets a new strict minimum below `bar`,
/// scanning in order and keeping the earliest of equal scores.
fn first_below(scores: &[f64], bar: f64) -> Option<usize> {
    let mut best = bar;
    let mut index = None;
    for (i, &s) in scores.iter().enumerate() {
        if s < best {
            best = s;
            index = Some(i);
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use gravwell_core::homing::{TargetSnapshot, WellSnapshot};
    use gravwell_core::timing::ThrustWindow;

    fn context<'a>(
        wells: &'a [WellSnapshot],
        velocity: Vector2D,
        remaining_ms: f64,
    ) -> HomingContext<'a> {
        HomingContext {
            position: Vector2D::new(100.0, 400.0),
            velocity,
            target: Some(TargetSnapshot {
                position: Vector2D::new(1100.0, 400.0),
                destroyed: false,
            }),
            wells,
            window: ThrustWindow {
                allowed: true,
                remaining_ms,
            },
            thrust_force: MISSILE_THRUST_FORCE,
            gravity_constant: GRAVITY_CONSTANT,
        }
    }

    fn sequential() -> HomingConfig {
        HomingConfig { parallel: false }
    }

    #[test]
    fn phase_count_thresholds() {
        assert_eq!(phase_count(2000.0), 3);
        assert_eq!(phase_count(600.0), 3);
        assert_eq!(phase_count(599.0), 2);
        assert_eq!(phase_count(300.0), 2);
        assert_eq!(phase_count(299.0), 1);
    }

    #[test]
    fn fan_spans_arc_in_order() {
        let dirs = fan(0.0, SINGLE_PHASE_SAMPLES, FULL_THRUST_ARC / 2.0);
        assert_eq!(dirs.len(), 16);
        assert_abs_diff_eq!(dirs[0].angle(), -0.75 * std::f64::consts::PI, epsilon = 1e-12);
        assert_abs_diff_eq!(dirs[15].angle(), 0.75 * std::f64::consts::PI, epsilon = 1e-12);
        for d in &dirs {
            assert_abs_diff_eq!(d.magnitude(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn first_below_keeps_earliest_tie() {
        let scores = [5.0, 3.0, 3.0, f64::INFINITY];
        assert_eq!(first_below(&scores, 10.0), Some(1));
        assert_eq!(first_below(&scores, 3.0), None);
        assert_eq!(first_below(&[f64::INFINITY], f64::INFINITY), None);
    }

    #[test]
    fn closed_window_means_no_thrust() {
        let mut ctx = context(&[], Vector2D::new(100.0, 0.0), 1000.0);
        ctx.window = ThrustWindow::CLOSED;
        assert_eq!(plan(&ctx, &sequential()), HomingResult::no_thrust());
    }

    #[test]
    fn destroyed_or_missing_target_means_no_thrust() {
        let mut ctx = context(&[], Vector2D::new(100.0, 0.0), 1000.0);
        ctx.target = Some(TargetSnapshot {
            position: Vector2D::new(1100.0, 400.0),
            destroyed: true,
        });
        assert_eq!(plan(&ctx, &sequential()), HomingResult::no_thrust());

        ctx.target = None;
        assert_eq!(plan(&ctx, &sequential()), HomingResult::no_thrust());
    }

    #[test]
    fn single_phase_thrusts_toward_target() {
        // Slow and 1000 units away: coasting gets nowhere near.
        let ctx = context(&[], Vector2D::new(50.0, 0.0), 200.0);
        let result = plan(&ctx, &sequential());
        let d = &result.diagnostics;
        assert_eq!(d.phase_count, 1);
        assert_eq!(d.sampled_directions.len(), SINGLE_PHASE_SAMPLES);
        assert!(d.homing_active);
        let thrust = result.thrust.unwrap();
        assert!(thrust.x > 0.9);
        assert_eq!(result.phases.len(), 1);
        assert_eq!(result.phases[0].duration_ms, 200.0);
    }

    #[test]
    fn multi_phase_plans_three_legs() {
        let ctx = context(&[], Vector2D::new(50.0, 0.0), 1500.0);
        let result = plan(&ctx, &sequential());
        let d = &result.diagnostics;
        assert_eq!(d.phase_count, 3);
        assert_eq!(d.evaluation_count, 12 * 6 * 4 + 1);
        assert!(d.homing_active);
        assert_eq!(result.phases.len(), 3);
        for phase in &result.phases {
            assert_abs_diff_eq!(phase.duration_ms, 500.0, epsilon = 1e-9);
        }
        assert_eq!(result.thrust, result.phases[0].direction);
    }

    #[test]
    fn two_phase_sample_count() {
        let ctx = context(&[], Vector2D::new(50.0, 0.0), 400.0);
        let result = plan(&ctx, &sequential());
        assert_eq!(result.diagnostics.phase_count, 2);
        assert_eq!(result.diagnostics.evaluation_count, 12 * 6 + 1);
    }

    #[test]
    fn on_course_projectile_keeps_coasting() {
        // Already flying straight through the target: nothing beats that by 5%.
        let ctx = context(&[], Vector2D::new(400.0, 0.0), 250.0);
        let result = plan(&ctx, &sequential());
        assert!(result.thrust.is_none());
        assert!(result.phases.is_empty());
        assert!(!result.diagnostics.homing_active);
        assert!(result.diagnostics.best_direction.is_some());
        assert!(result.diagnostics.planned_phases.is_empty());
        assert!(result.diagnostics.baseline_distance.is_some());
    }

    #[test]
    fn unavoidable_impact_reports_no_scores() {
        // 200ms of thrust cannot pull a 100 u/s shot out of a well 140 units ahead.
        let wells = [WellSnapshot {
            position: Vector2D::new(300.0, 400.0),
            radius: 60.0,
            mass: 60.0 * 60.0 * WELL_MASS_FACTOR,
        }];
        let ctx = context(&wells, Vector2D::new(100.0, 0.0), 200.0);
        let result = plan(&ctx, &sequential());
        assert!(result.thrust.is_none());
        assert_eq!(result.diagnostics.baseline_distance, None);
        assert_eq!(result.diagnostics.best_distance, None);
        assert!(result.diagnostics.planned_phases.is_empty());
    }

    #[test]
    fn plan_is_reproducible_and_parallel_agrees() {
        let wells = [
            WellSnapshot {
                position: Vector2D::new(500.0, 380.0),
                radius: 40.0,
                mass: 160.0,
            },
            WellSnapshot {
                position: Vector2D::new(800.0, 470.0),
                radius: 25.0,
                mass: 62.5,
            },
        ];
        let ctx = context(&wells, Vector2D::new(120.0, -30.0), 1800.0);
        let a = plan(&ctx, &sequential());
        let b = plan(&ctx, &sequential());
        let c = plan(&ctx, &HomingConfig { parallel: true });
        assert_eq!(a, b);
        assert_eq!(a, c);
    }
}
